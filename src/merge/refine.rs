use crate::core::geometry::ratio;
use crate::core::model::{Component, Element, Text};

/// Share of a box that must be covered before one element swallows another.
pub const CONTAINMENT_RATIO: f64 = 0.8;

/// Resolves overlaps between components and text.
///
/// A non-Block component is dropped when a single text covers most of it.
/// Any component, Blocks included, is dropped when texts cover most of it
/// together. A text lying mostly inside a
/// surviving non-Block component is absorbed; a component that absorbs
/// exactly one text takes over its content. Survivors come back as
/// components first, then texts, each in input order, with ids unset.
pub fn refine_elements(
    components: Vec<Component>,
    texts: Vec<Text>,
    bias: (i32, i32),
    containment_ratio: f64,
) -> Vec<Element> {
    let mut absorbed = vec![false; texts.len()];
    let mut elements = Vec::with_capacity(components.len() + texts.len());

    'components: for component in components {
        let is_block = component.is_block();
        let mut text_area = 0i64;
        let mut inside = Vec::new();
        for (index, text) in texts.iter().enumerate() {
            let overlap = component.bbox.overlap(&text.bbox, bias);
            if overlap.inter <= 0 {
                continue;
            }
            if !is_block && overlap.ioa >= containment_ratio {
                continue 'components;
            }
            text_area += overlap.inter;
            if !is_block && overlap.iob >= containment_ratio {
                inside.push(index);
            }
        }
        if ratio(text_area as f64, component.bbox.area() as f64) >= containment_ratio {
            continue;
        }

        let mut element = Element::from_component(component);
        if let [only] = inside[..] {
            element.text_content = Some(texts[only].content.clone());
        }
        for index in inside {
            absorbed[index] = true;
        }
        elements.push(element);
    }

    elements.extend(
        texts
            .into_iter()
            .zip(absorbed)
            .filter_map(|(text, absorbed)| (!absorbed).then(|| Element::from_text(text))),
    );
    elements
}
