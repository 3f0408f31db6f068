pub mod html_debug_export;
pub mod json_export;
pub mod preview_export;

use anyhow::Result;

use crate::core::model::SegmentedScreenshot;

pub use html_debug_export::HtmlDebugExporter;
pub use json_export::JsonExporter;
pub use preview_export::PreviewExporter;

pub trait Exporter {
    fn export(&self, screenshot: &SegmentedScreenshot) -> Result<()>;
}
