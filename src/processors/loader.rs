// crop1080/src/processors/loader.rs
use crate::core::{Crop1080Error, Result};
use crate::processors::OrientationCorrector;
use image::{DynamicImage, GenericImageView, ImageReader};
use std::io::Cursor;

/// Decodes raw bytes and returns the orientation-corrected image.
pub struct Loader {
    orientation: OrientationCorrector,
}

impl Loader {
    pub fn new() -> Self {
        Self {
            orientation: OrientationCorrector::new(),
        }
    }

    pub fn load_from_bytes(&self, data: &[u8]) -> Result<DynamicImage> {
        let image = ImageReader::new(Cursor::new(data))
            .with_guessed_format()?
            .decode()
            .map_err(Crop1080Error::Decode)?;

        let image = self.orientation.correct(image, data);

        let (width, height) = image.dimensions();
        log::debug!(
            "Loaded image: {}x{} pixels, color: {:?}",
            width,
            height,
            image.color()
        );

        Ok(image)
    }

    /// Displayed size of an encoded image, after orientation correction.
    pub fn dimensions(&self, data: &[u8]) -> Result<(u32, u32)> {
        Ok(self.load_from_bytes(data)?.dimensions())
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}
