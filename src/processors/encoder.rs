// crop1080/src/processors/encoder.rs
use crate::core::{Crop1080Error, OutputFormat, Result};
use image::DynamicImage;
use jpeg_encoder::{ColorType, Encoder as JpegEncoder};
use std::io::Cursor;

pub struct Encoder {
    jpeg_quality: u8,
    progressive_jpeg: bool,
    optimize_jpeg: bool,
}

impl Encoder {
    pub fn new(jpeg_quality: u8) -> Self {
        Self {
            jpeg_quality: jpeg_quality.clamp(1, 100),
            progressive_jpeg: true,
            optimize_jpeg: true,
        }
    }

    pub fn with_progressive_jpeg(mut self, progressive: bool) -> Self {
        self.progressive_jpeg = progressive;
        self
    }

    pub fn with_optimized_jpeg(mut self, optimize: bool) -> Self {
        self.optimize_jpeg = optimize;
        self
    }

    pub fn encode(&self, image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        log::debug!(
            "Encoding {}x{} image as {}",
            image.width(),
            image.height(),
            format
        );

        match format {
            OutputFormat::Jpeg => self.encode_jpeg(image),
            OutputFormat::WebP | OutputFormat::Bmp => {
                Self::write_with_image(&Self::to_8bit(image), format)
            }
            OutputFormat::Png | OutputFormat::Tiff => Self::write_with_image(image, format),
        }
    }

    fn encode_jpeg(&self, image: &DynamicImage) -> Result<Vec<u8>> {
        let encode_error = |source: Box<dyn std::error::Error + Send + Sync>| {
            Crop1080Error::Encode {
                format: OutputFormat::Jpeg,
                source,
            }
        };

        let (width, height) = match (u16::try_from(image.width()), u16::try_from(image.height())) {
            (Ok(w), Ok(h)) => (w, h),
            _ => {
                return Err(encode_error(
                    format!(
                        "{}x{} exceeds the JPEG limit of {} pixels per side",
                        image.width(),
                        image.height(),
                        u16::MAX
                    )
                    .into(),
                ))
            }
        };

        // JPEG has no alpha channel; flatten right before encoding
        let rgb = image.to_rgb8();

        let mut buffer = Vec::new();
        let mut encoder = JpegEncoder::new(&mut buffer, self.jpeg_quality);
        encoder.set_progressive(self.progressive_jpeg);
        encoder.set_optimized_huffman_tables(self.optimize_jpeg);
        encoder
            .encode(rgb.as_raw(), width, height, ColorType::Rgb)
            .map_err(|e| encode_error(Box::new(e)))?;

        Ok(buffer)
    }

    fn write_with_image(image: &DynamicImage, format: OutputFormat) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        image
            .write_to(&mut buffer, format.image_format())
            .map_err(|e| Crop1080Error::Encode {
                format,
                source: Box::new(e),
            })?;
        Ok(buffer.into_inner())
    }

    // The WebP and BMP encoders only take 8-bit RGB(A).
    fn to_8bit(image: &DynamicImage) -> DynamicImage {
        if image.color().has_alpha() {
            DynamicImage::ImageRgba8(image.to_rgba8())
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        }
    }
}

impl Default for Encoder {
    fn default() -> Self {
        Self::new(crate::core::DEFAULT_JPEG_QUALITY)
    }
}
