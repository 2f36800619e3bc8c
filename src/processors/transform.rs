// crop1080/src/processors/transform.rs
use crate::core::{Crop1080Error, CropSpec, ResizeSpec, Result};
use image::{imageops::FilterType, DynamicImage, GenericImageView, Limits};

// Same ceiling the decoder applies to its own allocations.
fn default_max_output_bytes() -> u64 {
    Limits::default().max_alloc.unwrap_or(512 * 1024 * 1024)
}

/// Crops the configured margins and scales the remainder to the target width.
pub struct Transformer {
    crop: CropSpec,
    resize: ResizeSpec,
    max_output_bytes: u64,
}

impl Transformer {
    pub fn new(crop: CropSpec, resize: ResizeSpec) -> Self {
        Self {
            crop,
            resize,
            max_output_bytes: default_max_output_bytes(),
        }
    }

    /// Caps the size of the resampled buffer, in bytes.
    pub fn with_max_output_bytes(mut self, limit: u64) -> Self {
        self.max_output_bytes = limit;
        self
    }

    /// Returns a new image; `image` is left untouched on success and failure.
    pub fn transform(&self, image: &DynamicImage) -> Result<DynamicImage> {
        let (width, height) = image.dimensions();
        let (cropped_width, cropped_height) = self.crop.cropped_size(width, height)?;

        log::debug!(
            "Cropping {}x{} to {}x{} at ({}, {})",
            width,
            height,
            cropped_width,
            cropped_height,
            self.crop.left,
            self.crop.top
        );

        let cropped = image.crop_imm(self.crop.left, self.crop.top, cropped_width, cropped_height);

        if cropped_width == self.resize.target_width {
            log::debug!("Cropped width already matches target, skipping resize");
            return Ok(cropped);
        }

        let new_height = self.resize.scaled_height(cropped_width, cropped_height);
        let bytes = (self.resize.target_width as u64)
            .saturating_mul(new_height)
            .saturating_mul(cropped.color().bytes_per_pixel() as u64);

        if new_height > u32::MAX as u64 || bytes > self.max_output_bytes {
            return Err(Crop1080Error::OutputTooLarge {
                width: self.resize.target_width,
                height: new_height,
                bytes,
                limit: self.max_output_bytes,
                source_width: width,
                source_height: height,
            });
        }
        let new_height = new_height as u32;

        log::debug!(
            "Resizing image from {}x{} to {}x{}",
            cropped_width,
            cropped_height,
            self.resize.target_width,
            new_height
        );

        Ok(cropped.resize_exact(self.resize.target_width, new_height, FilterType::Lanczos3))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn solid(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 100, 50])))
    }

    #[test]
    fn crops_and_resizes_reference_image() {
        let transformer = Transformer::new(CropSpec::horizontal(34, 34), ResizeSpec::new(1080));
        let out = transformer.transform(&solid(1200, 800)).unwrap();
        assert_eq!(out.dimensions(), (1080, 763));
    }

    #[test]
    fn small_image_is_out_of_bounds_and_untouched() {
        let source = solid(50, 50);
        let before = source.clone();
        let transformer = Transformer::new(CropSpec::horizontal(34, 34), ResizeSpec::new(1080));

        let err = transformer.transform(&source).unwrap_err();
        assert!(matches!(err, Crop1080Error::CropOutOfBounds { width: 50, height: 50, .. }));
        assert_eq!(source, before);
    }

    #[test]
    fn vertical_margins_are_applied() {
        let transformer = Transformer::new(CropSpec::new(10, 10, 20, 30), ResizeSpec::new(40));
        // cropped to 80x50, scaled by 0.5
        let out = transformer.transform(&solid(100, 100)).unwrap();
        assert_eq!(out.dimensions(), (40, 25));
    }

    #[test]
    fn matching_width_skips_resampling() {
        let mut source = RgbImage::new(120, 10);
        source.put_pixel(10, 0, Rgb([255, 0, 0]));
        let transformer = Transformer::new(CropSpec::horizontal(10, 10), ResizeSpec::new(100));

        let out = transformer.transform(&DynamicImage::ImageRgb8(source)).unwrap();
        assert_eq!(out.dimensions(), (100, 10));
        // left edge of the crop is the marked pixel, unblurred
        assert_eq!(out.to_rgb8().get_pixel(0, 0), &Rgb([255, 0, 0]));
    }

    #[test]
    fn sliver_crop_is_rejected_before_resampling() {
        // 69px wide with 34/34 margins leaves one column, scaled 1080x taller
        let transformer = Transformer::new(CropSpec::horizontal(34, 34), ResizeSpec::new(1080))
            .with_max_output_bytes(10_000_000);
        let source = solid(69, 1000);

        let err = transformer.transform(&source).unwrap_err();
        match err {
            Crop1080Error::OutputTooLarge { width, height, bytes, source_width, .. } => {
                assert_eq!((width, height), (1080, 1_080_000));
                assert_eq!(bytes, 1080 * 1_080_000 * 3);
                assert_eq!(source_width, 69);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn default_budget_rejects_heights_past_u32() {
        // 1x10_000 crop at width 1_000_000 would be 1e10 rows tall
        let transformer = Transformer::new(CropSpec::horizontal(1, 1), ResizeSpec::new(1_000_000));
        let err = transformer.transform(&solid(3, 10_000)).unwrap_err();
        assert!(matches!(err, Crop1080Error::OutputTooLarge { height: 10_000_000_000, .. }));
    }

    #[test]
    fn upscales_when_crop_is_narrower_than_target() {
        let transformer = Transformer::new(CropSpec::horizontal(34, 34), ResizeSpec::new(1080));
        let out = transformer.transform(&solid(608, 300)).unwrap();
        // 540x300 doubled
        assert_eq!(out.dimensions(), (1080, 600));
    }
}
