use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut};
use imageproc::rect::Rect;
use pretty_assertions::assert_eq;

use uiseg::core::geometry::Bbox;
use uiseg::core::model::{Position, Segment};
use uiseg::detect::PatchClassifier;
use uiseg::export::{Exporter, JsonExporter};
use uiseg::ocr::{OcrLine, StaticTextDetector, TextDetector};
use uiseg::{Category, SegmentationError, SegmentationParams, Segmenter, SegmentedScreenshot};

const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const GREY: Rgb<u8> = Rgb([90, 90, 90]);

fn temp_output_dir(prefix: &str) -> PathBuf {
    let mut out = std::env::temp_dir();
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis();
    let pid = std::process::id();
    out.push(format!("{prefix}-{pid}-{now}"));
    out
}

fn canvas(width: u32, height: u32) -> RgbImage {
    RgbImage::from_pixel(width, height, WHITE)
}

fn bbox_of(segment: &Segment) -> Bbox {
    let Position {
        column_min,
        row_min,
        column_max,
        row_max,
    } = segment.position;
    Bbox::new(column_min, row_min, column_max, row_max)
}

fn close_to(actual: Bbox, expected: Bbox, tolerance: i32) -> bool {
    (actual.col_min - expected.col_min).abs() <= tolerance
        && (actual.row_min - expected.row_min).abs() <= tolerance
        && (actual.col_max - expected.col_max).abs() <= tolerance
        && (actual.row_max - expected.row_max).abs() <= tolerance
}

fn segmenter_with_lines(lines: Vec<OcrLine>) -> Segmenter {
    Segmenter::new(SegmentationParams::desktop())
        .with_text_detector(Box::new(StaticTextDetector::new(lines)))
}

/// A settings-like page: an outlined panel with two buttons and a caption,
/// a standalone icon and a footer line of text.
fn busy_screenshot() -> (RgbImage, Vec<OcrLine>) {
    let mut image = canvas(800, 600);
    draw_hollow_rect_mut(&mut image, Rect::at(50, 50).of_size(400, 400), BLACK);
    draw_filled_rect_mut(&mut image, Rect::at(100, 100).of_size(80, 30), GREY);
    draw_filled_rect_mut(&mut image, Rect::at(100, 200).of_size(80, 30), GREY);
    draw_filled_rect_mut(&mut image, Rect::at(600, 100).of_size(60, 60), BLACK);
    let lines = vec![
        OcrLine::from_rect(100.0, 300.0, 200.0, 320.0, "Caption"),
        OcrLine::from_rect(500.0, 500.0, 600.0, 520.0, "Footer"),
    ];
    (image, lines)
}

#[test]
fn blank_images_have_no_segments() -> Result<()> {
    let segmenter = Segmenter::new(SegmentationParams::desktop());

    let white = segmenter.segment(&canvas(800, 600))?;
    assert!(white.segments.is_empty());
    assert_eq!(white.img_shape, [600, 800, 3]);

    let black = segmenter.segment(&RgbImage::from_pixel(300, 500, BLACK))?;
    assert!(black.segments.is_empty());
    assert_eq!(black.img_shape, [500, 300, 3]);
    Ok(())
}

#[test]
fn two_squares_become_two_components() -> Result<()> {
    let mut image = canvas(800, 400);
    draw_filled_rect_mut(&mut image, Rect::at(100, 100).of_size(40, 40), BLACK);
    draw_filled_rect_mut(&mut image, Rect::at(145, 100).of_size(40, 40), BLACK);

    let segmentation = Segmenter::new(SegmentationParams::desktop()).segment(&image)?;

    assert_eq!(segmentation.segments.len(), 2);
    let mut boxes: Vec<Bbox> = segmentation.segments.iter().map(bbox_of).collect();
    boxes.sort_by_key(|b| b.col_min);
    assert!(close_to(boxes[0], Bbox::new(100, 100, 140, 140), 2), "{boxes:?}");
    assert!(close_to(boxes[1], Bbox::new(145, 100, 185, 140), 2), "{boxes:?}");
    for segment in &segmentation.segments {
        assert_eq!(segment.class, Category::Component);
        assert_eq!(segment.parent, None);
        assert!(segment.children.is_empty());
    }
    Ok(())
}

#[test]
fn outlined_panel_is_a_block_holding_its_content() -> Result<()> {
    let mut image = canvas(800, 600);
    draw_hollow_rect_mut(&mut image, Rect::at(250, 150).of_size(300, 300), BLACK);
    draw_filled_rect_mut(&mut image, Rect::at(375, 290).of_size(50, 20), BLACK);

    let segmentation = Segmenter::new(SegmentationParams::desktop()).segment(&image)?;

    let block = segmentation
        .segments
        .iter()
        .find(|s| s.class == Category::Block)
        .expect("panel should be recognized as a block");
    assert!(close_to(bbox_of(block), Bbox::new(250, 150, 550, 450), 3));

    let inner = segmentation
        .segments
        .iter()
        .find(|s| s.class == Category::Component)
        .expect("inner rectangle should be a component");
    assert!(close_to(bbox_of(inner), Bbox::new(375, 290, 425, 310), 2));
    assert_eq!(inner.parent, Some(block.id));
    assert!(block.children.contains(&inner.id));
    Ok(())
}

#[test]
fn stacked_lines_form_one_paragraph() -> Result<()> {
    let segmenter = segmenter_with_lines(vec![
        OcrLine::from_rect(100.0, 100.0, 160.0, 120.0, "Hello"),
        OcrLine::from_rect(100.0, 124.0, 160.0, 144.0, "World"),
    ]);

    let segmentation = segmenter.segment(&canvas(800, 600))?;

    assert_eq!(segmentation.segments.len(), 1);
    let paragraph = &segmentation.segments[0];
    assert_eq!(paragraph.class, Category::Text);
    assert_eq!(paragraph.text_content.as_deref(), Some("Hello\nWorld"));
    assert_eq!(bbox_of(paragraph), Bbox::new(100, 100, 160, 144));
    Ok(())
}

#[test]
fn noisy_ocr_lines_are_discarded() -> Result<()> {
    let segmenter = segmenter_with_lines(vec![
        OcrLine::from_rect(10.0, 10.0, 20.0, 30.0, "|"),
        OcrLine::from_rect(10.0, 100.0, 400.0, 400.0, "Watermark"),
    ]);
    let segmentation = segmenter.segment(&canvas(800, 600))?;
    assert!(segmentation.segments.is_empty());
    Ok(())
}

#[test]
fn button_absorbs_its_label() -> Result<()> {
    let mut image = canvas(800, 600);
    draw_filled_rect_mut(&mut image, Rect::at(200, 300).of_size(120, 40), GREY);
    let segmenter = segmenter_with_lines(vec![OcrLine::from_rect(230.0, 310.0, 290.0, 328.0, "Submit")]);

    let segmentation = segmenter.segment(&image)?;

    assert_eq!(segmentation.segments.len(), 1);
    let button = &segmentation.segments[0];
    assert_eq!(button.class, Category::Component);
    assert_eq!(button.text_content.as_deref(), Some("Submit"));
    Ok(())
}

#[test]
fn forest_links_are_consistent() -> Result<()> {
    let (image, lines) = busy_screenshot();
    let segmentation = segmenter_with_lines(lines).segment(&image)?;
    let segments = &segmentation.segments;
    assert!(!segments.is_empty());

    let ids: Vec<usize> = segments.iter().map(|s| s.id).collect();
    assert_eq!(ids, (0..segments.len()).collect::<Vec<_>>());

    let by_id: HashMap<usize, &Segment> = segments.iter().map(|s| (s.id, s)).collect();
    for segment in segments {
        if let Some(parent) = segment.parent {
            let parent = by_id[&parent];
            assert!(parent.children.contains(&segment.id));
            assert!(bbox_of(segment).is_within(&bbox_of(parent), (2, 2)));
        }
        for child in &segment.children {
            assert_eq!(by_id[child].parent, Some(segment.id));
        }
        let mut sorted = segment.children.clone();
        sorted.sort_unstable();
        assert_eq!(segment.children, sorted);

        // walking up must terminate
        let mut steps = 0;
        let mut current = segment.parent;
        while let Some(id) = current {
            steps += 1;
            assert!(steps <= segments.len());
            current = by_id[&id].parent;
        }
    }

    let footer = segments
        .iter()
        .find(|s| s.text_content.as_deref() == Some("Footer"))
        .expect("footer text should survive");
    assert_eq!(footer.class, Category::Text);
    assert_eq!(footer.parent, None);
    Ok(())
}

#[test]
fn segmentation_is_deterministic() -> Result<()> {
    let (image, lines) = busy_screenshot();
    let first = segmenter_with_lines(lines.clone()).segment(&image)?;
    let second = segmenter_with_lines(lines).segment(&image)?;
    assert_eq!(serde_json::to_string(&first)?, serde_json::to_string(&second)?);
    Ok(())
}

#[test]
fn large_screenshots_map_back_to_original_coordinates() -> Result<()> {
    let mut image = canvas(1600, 800);
    draw_filled_rect_mut(&mut image, Rect::at(200, 200).of_size(80, 80), BLACK);

    let segmentation = Segmenter::new(SegmentationParams::desktop()).segment(&image)?;

    assert_eq!(segmentation.img_shape, [800, 1600, 3]);
    assert_eq!(segmentation.segments.len(), 1);
    assert!(close_to(
        bbox_of(&segmentation.segments[0]),
        Bbox::new(200, 200, 280, 280),
        6
    ));
    Ok(())
}

struct FailingDetector;

impl TextDetector for FailingDetector {
    fn detect_text(&self, _image: &RgbImage) -> Result<Vec<OcrLine>, SegmentationError> {
        Err(SegmentationError::TextDetector("engine crashed".to_string()))
    }
}

#[test]
fn text_detector_failures_surface() {
    let segmenter =
        Segmenter::new(SegmentationParams::desktop()).with_text_detector(Box::new(FailingDetector));
    let result = segmenter.segment(&canvas(100, 100));
    assert!(matches!(result, Err(SegmentationError::TextDetector(_))));
}

struct FixedLabel;

impl PatchClassifier for FixedLabel {
    fn classify(&self, _patch: &RgbImage) -> Result<String, SegmentationError> {
        Ok("Button".to_string())
    }
}

#[test]
fn classifier_labels_become_subclasses() -> Result<()> {
    let mut image = canvas(800, 600);
    draw_filled_rect_mut(&mut image, Rect::at(200, 300).of_size(120, 40), GREY);
    let segmenter =
        Segmenter::new(SegmentationParams::desktop()).with_classifier(Box::new(FixedLabel));

    let segmentation = segmenter.segment(&image)?;

    assert_eq!(segmentation.segments.len(), 1);
    assert_eq!(segmentation.segments[0].subclass.as_deref(), Some("Button"));
    Ok(())
}

#[test]
fn json_export_writes_the_segmentation() -> Result<()> {
    let output = temp_output_dir("uiseg-json");
    let (image, lines) = busy_screenshot();
    let segmentation = segmenter_with_lines(lines).segment(&image)?;
    let screenshot = SegmentedScreenshot {
        name: "settings".to_string(),
        image,
        segmentation: segmentation.clone(),
    };

    JsonExporter::new(output.clone()).export(&screenshot)?;

    let data = fs::read_to_string(output.join("settings.json"))?;
    let value: serde_json::Value = serde_json::from_str(&data)?;
    assert_eq!(value["img_shape"], serde_json::json!([600, 800, 3]));
    assert_eq!(
        value["segments"].as_array().map(|s| s.len()),
        Some(segmentation.segments.len())
    );
    let parsed: uiseg::Segmentation = serde_json::from_str(&data)?;
    assert_eq!(parsed, segmentation);

    let _ = fs::remove_dir_all(&output);
    Ok(())
}
