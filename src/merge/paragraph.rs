use crate::core::model::Text;

/// True when `a` and `b` overlap horizontally and are less than
/// `max_line_gap` rows apart.
pub fn is_adjacent_line(a: &Text, b: &Text, max_line_gap: i32) -> bool {
    a.bbox.overlap(&b.bbox, (0, max_line_gap)).inter > 0
}

fn join(kept: &mut Text, other: Text) {
    kept.content = if other.bbox.row_min < kept.bbox.row_min {
        format!("{}\n{}", other.content, kept.content)
    } else {
        format!("{}\n{}", kept.content, other.content)
    };
    kept.bbox = kept.bbox.union(&other.bbox);
}

/// Groups vertically adjacent text lines into paragraphs until no two
/// results are adjacent.
pub fn merge_lines_to_paragraphs(mut texts: Vec<Text>, max_line_gap: i32) -> Vec<Text> {
    loop {
        let mut changed = false;
        let mut merged: Vec<Text> = Vec::with_capacity(texts.len());
        for text in texts {
            match merged
                .iter_mut()
                .find(|kept| is_adjacent_line(kept, &text, max_line_gap))
            {
                Some(kept) => {
                    join(kept, text);
                    changed = true;
                }
                None => merged.push(text),
            }
        }
        texts = merged;
        if !changed {
            return texts;
        }
    }
}
