use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::SegmentedScreenshot;
use crate::export::Exporter;

/// Writes `<name>.json` with the segmentation document.
#[derive(Debug, Clone)]
pub struct JsonExporter {
    out_dir: PathBuf,
}

impl JsonExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.out_dir.join(format!("{name}.json"))
    }
}

impl Exporter for JsonExporter {
    fn export(&self, screenshot: &SegmentedScreenshot) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let path = self.path_for(&screenshot.name);
        let data = serde_json::to_string_pretty(&screenshot.segmentation)?;
        fs::write(&path, data).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
