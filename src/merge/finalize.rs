use crate::core::model::Element;

const TOP_BAR_MAX_ROW: i32 = 10;
const TOP_BAR_HEIGHT_RATIO: f64 = 0.04;

/// Drops thin elements hugging the top edge, such as a mobile status bar.
pub fn remove_top_bar(elements: Vec<Element>, image_height: u32) -> Vec<Element> {
    let max_height = TOP_BAR_HEIGHT_RATIO * image_height as f64;
    elements
        .into_iter()
        .filter(|element| {
            !(element.bbox.row_min < TOP_BAR_MAX_ROW && (element.bbox.height() as f64) < max_height)
        })
        .collect()
}

pub fn assign_ids(elements: &mut [Element]) {
    for (id, element) in elements.iter_mut().enumerate() {
        element.id = id;
    }
}
