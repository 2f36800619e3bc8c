// crop1080/src/processors/orientation.rs
use exif::{In, Reader, Tag};
use image::metadata::Orientation;
use image::DynamicImage;
use std::io::Cursor;

/// Reads the EXIF orientation tag and rotates/mirrors decoded pixels so they
/// match what a viewer displays.
pub struct OrientationCorrector;

impl OrientationCorrector {
    pub fn new() -> Self {
        Self
    }

    /// Orientation stored in the container, `NoTransforms` when absent.
    pub fn read_orientation(&self, data: &[u8]) -> Orientation {
        let mut cursor = Cursor::new(data);

        let exif = match Reader::new().read_from_container(&mut cursor) {
            Ok(exif) => exif,
            Err(exif::Error::NotFound(_)) => {
                log::debug!("No EXIF data found");
                return Orientation::NoTransforms;
            }
            Err(e) => {
                log::warn!("Failed to read EXIF, assuming upright image: {}", e);
                return Orientation::NoTransforms;
            }
        };

        exif.get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .and_then(|value| u8::try_from(value).ok())
            .and_then(Orientation::from_exif)
            .unwrap_or(Orientation::NoTransforms)
    }

    pub fn correct(&self, mut image: DynamicImage, data: &[u8]) -> DynamicImage {
        let orientation = self.read_orientation(data);
        if orientation != Orientation::NoTransforms {
            log::debug!("Applying EXIF orientation {:?}", orientation);
            image.apply_orientation(orientation);
        }
        image
    }
}

impl Default for OrientationCorrector {
    fn default() -> Self {
        Self::new()
    }
}
