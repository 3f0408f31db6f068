use crate::core::model::Element;

/// Links every element to its tightest enclosing element.
///
/// Candidates are ordered by `(area, id)`; an element's parent is the
/// smallest candidate ranked above it that contains it within `bias`.
/// The ordering makes the links acyclic even for identical boxes.
/// Children are listed by ascending id.
pub fn build_containment(elements: &mut [Element], bias: (i32, i32)) {
    let keys: Vec<(i64, usize)> = elements.iter().map(|e| (e.bbox.area(), e.id)).collect();
    let parents: Vec<Option<usize>> = (0..elements.len())
        .map(|child| {
            (0..elements.len())
                .filter(|&candidate| keys[candidate] > keys[child])
                .filter(|&candidate| elements[child].bbox.is_within(&elements[candidate].bbox, bias))
                .min_by_key(|&candidate| keys[candidate])
        })
        .collect();

    for element in elements.iter_mut() {
        element.parent_id = None;
        element.children.clear();
    }
    for (child, parent) in parents.into_iter().enumerate() {
        if let Some(parent) = parent {
            elements[child].parent_id = Some(elements[parent].id);
            let child_id = elements[child].id;
            elements[parent].children.push(child_id);
        }
    }
    for element in elements.iter_mut() {
        element.children.sort_unstable();
    }
}
