//! Merging detected components with recognized text into the final
//! element forest.

pub mod containment;
pub mod finalize;
pub mod paragraph;
pub mod refine;

use tracing::debug;

use crate::core::config::SegmentationParams;
use crate::core::model::{Component, Element, Text};

pub trait MergeEngine {
    /// `components` and `texts` are in original-image coordinates.
    fn merge(&self, components: Vec<Component>, texts: Vec<Text>, image_height: u32) -> Vec<Element>;
}

#[derive(Debug, Clone)]
pub struct SimpleMergeEngine {
    merge_paragraphs: bool,
    max_line_gap: i32,
    bias: (i32, i32),
    remove_bar: bool,
}

impl SimpleMergeEngine {
    pub fn new(params: &SegmentationParams) -> Self {
        Self {
            merge_paragraphs: params.merge_line_to_paragraph,
            max_line_gap: params.max_line_gap,
            bias: params.bias(),
            remove_bar: params.remove_bar,
        }
    }
}

impl MergeEngine for SimpleMergeEngine {
    fn merge(&self, components: Vec<Component>, texts: Vec<Text>, image_height: u32) -> Vec<Element> {
        let line_count = texts.len();
        let texts = if self.merge_paragraphs {
            paragraph::merge_lines_to_paragraphs(texts, self.max_line_gap)
        } else {
            texts
        };
        debug!(lines = line_count, paragraphs = texts.len(), "text lines grouped");

        let mut elements =
            refine::refine_elements(components, texts, self.bias, refine::CONTAINMENT_RATIO);
        if self.remove_bar {
            elements = finalize::remove_top_bar(elements, image_height);
        }
        finalize::assign_ids(&mut elements);
        containment::build_containment(&mut elements, self.bias);
        debug!(elements = elements.len(), "elements merged");
        elements
    }
}
