use image::{imageops, RgbImage};

use crate::core::error::SegmentationError;
use crate::core::model::Component;

/// Assigns a fine-grained widget label to an image patch.
pub trait PatchClassifier: Send + Sync {
    fn classify(&self, patch: &RgbImage) -> Result<String, SegmentationError>;
}

/// Crops every component from `image` and stores the classifier's label as
/// its subcategory. Components whose box falls outside the image keep no
/// label.
pub fn classify_components(
    image: &RgbImage,
    components: &mut [Component],
    classifier: &dyn PatchClassifier,
) -> Result<(), SegmentationError> {
    let (width, height) = image.dimensions();
    for component in components.iter_mut() {
        let clip = component.bbox.clip(width, height);
        if clip.width() <= 0 || clip.height() <= 0 {
            continue;
        }
        let patch = imageops::crop_imm(
            image,
            clip.col_min as u32,
            clip.row_min as u32,
            clip.width() as u32,
            clip.height() as u32,
        )
        .to_image();
        component.subcategory = Some(classifier.classify(&patch)?);
    }
    Ok(())
}
