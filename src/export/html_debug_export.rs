use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::core::model::{Category, Segment, SegmentedScreenshot};
use crate::export::Exporter;

/// Writes `<name>.html`, an inspectable overlay of all segments on top of
/// a copy of the screenshot (`<name>_source.png`).
#[derive(Debug, Clone)]
pub struct HtmlDebugExporter {
    out_dir: PathBuf,
}

impl HtmlDebugExporter {
    pub fn new(out_dir: PathBuf) -> Self {
        Self { out_dir }
    }

    fn segment_to_div(segment: &Segment) -> String {
        let class = class_label(segment.class);
        let children = segment
            .children
            .iter()
            .map(|id| id.to_string())
            .collect::<Vec<_>>()
            .join(",");
        format!(
            r#"<div class='bbox {class}' style='left:{x0}px; top:{y0}px; width:{w}px; height:{h}px;' data-id='{id}' data-class='{class}' data-subclass='{subclass}' data-text='{text}' data-parent='{parent}' data-children='{children}'></div>"#,
            x0 = segment.position.column_min,
            y0 = segment.position.row_min,
            w = segment.width,
            h = segment.height,
            id = segment.id,
            subclass = html_escape::encode_single_quoted_attribute(
                segment.subclass.as_deref().unwrap_or("")
            ),
            text = html_escape::encode_single_quoted_attribute(
                segment.text_content.as_deref().unwrap_or("")
            ),
            parent = segment
                .parent
                .map(|id| id.to_string())
                .unwrap_or_default(),
        )
    }
}

fn class_label(class: Category) -> &'static str {
    match class {
        Category::Component => "component",
        Category::Block => "block",
        Category::Text => "text",
    }
}

impl Exporter for HtmlDebugExporter {
    fn export(&self, screenshot: &SegmentedScreenshot) -> Result<()> {
        fs::create_dir_all(&self.out_dir)?;
        let name = &screenshot.name;
        let image_name = format!("{name}_source.png");
        let image_path = self.out_dir.join(&image_name);
        screenshot
            .image
            .save(&image_path)
            .with_context(|| format!("failed to write {}", image_path.display()))?;

        let mut segments_html = String::new();
        // largest first so nested boxes stay clickable
        let mut segments: Vec<&Segment> = screenshot.segmentation.segments.iter().collect();
        segments.sort_by_key(|s| std::cmp::Reverse(s.width as i64 * s.height as i64));
        for segment in segments {
            segments_html.push_str(&HtmlDebugExporter::segment_to_div(segment));
        }

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset='utf-8'>
<title>uiseg debug {title}</title>
<style>
body {{ margin: 0; font-family: Arial, sans-serif; }}
#canvas {{ position: relative; }}
#canvas img {{ display: block; }}
.bbox {{ position: absolute; border: 2px solid; box-sizing: border-box; }}
.bbox.component {{ border-color: rgba(0,160,0,0.7); background: rgba(0,200,0,0.05); }}
.bbox.block {{ border-color: rgba(0,0,255,0.6); border-style: dashed; }}
.bbox.text {{ border-color: rgba(255,0,0,0.7); background: rgba(255,0,0,0.08); }}
#info {{ position: fixed; right: 10px; top: 10px; background: #fff; padding: 10px; border: 1px solid #ddd; max-width: 300px; white-space: pre-wrap; }}
#legend {{ position: fixed; right: 10px; bottom: 10px; background: #fff; padding: 10px; border: 1px solid #ddd; font-size: 12px; }}
.legend-item {{ margin: 5px 0; }}
.legend-box {{ display: inline-block; width: 20px; height: 15px; border: 2px solid; vertical-align: middle; margin-right: 5px; }}
</style>
</head>
<body>
<div id='info'>Click a segment to inspect.</div>
<div id='legend'>
<div class='legend-item'><span class='legend-box' style='border-color: rgba(0,160,0,0.7);'></span>Component</div>
<div class='legend-item'><span class='legend-box' style='border: 2px dashed rgba(0,0,255,0.6);'></span>Block</div>
<div class='legend-item'><span class='legend-box' style='border-color: rgba(255,0,0,0.7);'></span>Text</div>
</div>
<div id='canvas'>
<img src='{image}' />
{segments}
</div>
<script>
const info = document.getElementById('info');
for (const el of document.querySelectorAll('.bbox')) {{
  el.addEventListener('click', (event) => {{
    event.stopPropagation();
    info.textContent = `id: ${{el.dataset.id}}\nclass: ${{el.dataset.class}}\nsubclass: ${{el.dataset.subclass}}\nparent: ${{el.dataset.parent}}\nchildren: ${{el.dataset.children}}\ntext: ${{el.dataset.text}}`;
  }});
}}
</script>
</body>
</html>"#,
            title = html_escape::encode_text(name),
            image = html_escape::encode_single_quoted_attribute(&image_name),
            segments = segments_html
        );
        let path = self.out_dir.join(format!("{name}.html"));
        fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }
}
