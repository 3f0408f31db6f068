use std::fmt;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use crate::core::geometry::Bbox;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Category {
    Component,
    Block,
    Text,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Component => "Component",
            Category::Block => "Block",
            Category::Text => "Text",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Non-text region found by the component detector.
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub bbox: Bbox,
    pub is_rectangle: bool,
    pub category: Category,
    pub subcategory: Option<String>,
    /// Indices of other components that lie inside this one. Only valid for
    /// the list returned by `ComponentDetector::detect`; the merge stage drops
    /// and reorders components and builds its own links.
    pub contains: Vec<usize>,
}

impl Component {
    pub fn new(bbox: Bbox) -> Self {
        Self {
            bbox,
            is_rectangle: false,
            category: Category::Component,
            subcategory: None,
            contains: Vec::new(),
        }
    }

    pub fn rectangle(bbox: Bbox) -> Self {
        Self {
            is_rectangle: true,
            ..Self::new(bbox)
        }
    }

    pub fn is_block(&self) -> bool {
        self.category == Category::Block
    }

    /// Grows this component to cover `other`. Shape attributes follow the
    /// larger of the two.
    pub fn absorb(&mut self, other: &Component) {
        if other.bbox.area() > self.bbox.area() {
            self.is_rectangle = other.is_rectangle;
            self.category = other.category;
        }
        self.bbox = self.bbox.union(&other.bbox);
    }

    pub fn rescaled(self, factor: f64) -> Self {
        Self {
            bbox: self.bbox.scale(factor),
            ..self
        }
    }
}

/// Recognized text line or paragraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub bbox: Bbox,
    pub content: String,
}

impl Text {
    pub fn new(bbox: Bbox, content: impl Into<String>) -> Self {
        Self {
            bbox,
            content: content.into(),
        }
    }
}

/// Node of the final containment forest. `parent_id` and `children` refer
/// to `id`s of elements of the same result.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub id: usize,
    pub category: Category,
    pub subcategory: Option<String>,
    pub bbox: Bbox,
    pub text_content: Option<String>,
    pub parent_id: Option<usize>,
    pub children: Vec<usize>,
}

impl Element {
    pub fn from_component(component: Component) -> Self {
        Self {
            id: 0,
            category: component.category,
            subcategory: component.subcategory,
            bbox: component.bbox,
            text_content: None,
            parent_id: None,
            children: Vec::new(),
        }
    }

    pub fn from_text(text: Text) -> Self {
        Self {
            id: 0,
            category: Category::Text,
            subcategory: None,
            bbox: text.bbox,
            text_content: Some(text.content),
            parent_id: None,
            children: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Position {
    pub column_min: i32,
    pub row_min: i32,
    pub column_max: i32,
    pub row_max: i32,
}

/// Serialized form of one element.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub id: usize,
    pub class: Category,
    pub subclass: Option<String>,
    pub height: i32,
    pub width: i32,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_content: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<usize>,
}

impl From<&Element> for Segment {
    fn from(element: &Element) -> Self {
        let bbox = element.bbox;
        Self {
            id: element.id,
            class: element.category,
            subclass: element.subcategory.clone(),
            height: bbox.height(),
            width: bbox.width(),
            position: Position {
                column_min: bbox.col_min,
                row_min: bbox.row_min,
                column_max: bbox.col_max,
                row_max: bbox.row_max,
            },
            text_content: element.text_content.clone(),
            children: element.children.clone(),
            parent: element.parent_id,
        }
    }
}

/// Result document of one screenshot.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segmentation {
    /// `[height, width, channels]` of the original image.
    pub img_shape: [u32; 3],
    pub segments: Vec<Segment>,
}

impl Segmentation {
    pub fn from_elements(elements: &[Element], width: u32, height: u32) -> Self {
        Self {
            img_shape: [height, width, 3],
            segments: elements.iter().map(Segment::from).collect(),
        }
    }

    pub fn count(&self, class: Category) -> usize {
        self.segments.iter().filter(|s| s.class == class).count()
    }
}

/// A screenshot together with its segmentation, as handed to exporters.
#[derive(Debug, Clone)]
pub struct SegmentedScreenshot {
    /// File stem used to name exported artifacts.
    pub name: String,
    pub image: RgbImage,
    pub segmentation: Segmentation,
}
