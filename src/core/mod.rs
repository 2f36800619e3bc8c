// crop1080/src/core/mod.rs
pub mod processor;

use image::ImageFormat;
use thiserror::Error;

pub use processor::{ImageProcessor, ItemOutcome, ProcessedItem};

pub const DEFAULT_MARGIN: u32 = 34;
pub const DEFAULT_TARGET_WIDTH: u32 = 1080;
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Pixel margins removed from each edge before resizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CropSpec {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
}

impl CropSpec {
    pub fn new(left: u32, right: u32, top: u32, bottom: u32) -> Self {
        Self { left, right, top, bottom }
    }

    /// Left/right only, as the batch form offers.
    pub fn horizontal(left: u32, right: u32) -> Self {
        Self::new(left, right, 0, 0)
    }

    /// Checks the margins against a source size and returns the cropped size.
    pub fn cropped_size(&self, width: u32, height: u32) -> Result<(u32, u32)> {
        let horizontal = self.left as u64 + self.right as u64;
        let vertical = self.top as u64 + self.bottom as u64;

        if width as u64 <= horizontal || height as u64 <= vertical {
            return Err(Crop1080Error::CropOutOfBounds {
                width,
                height,
                left: self.left,
                right: self.right,
                top: self.top,
                bottom: self.bottom,
            });
        }

        Ok((width - self.left - self.right, height - self.top - self.bottom))
    }
}

impl Default for CropSpec {
    fn default() -> Self {
        Self::horizontal(DEFAULT_MARGIN, DEFAULT_MARGIN)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeSpec {
    pub target_width: u32,
}

impl ResizeSpec {
    pub fn new(target_width: u32) -> Self {
        Self { target_width }
    }

    /// Height that keeps the aspect ratio of a `width`x`height` image once it
    /// is scaled to the target width. Halves round to even, never below 1.
    /// Returned as `u64` since a sliver-wide crop can exceed `u32::MAX`.
    pub fn scaled_height(&self, width: u32, height: u32) -> u64 {
        let exact = height as f64 * self.target_width as f64 / width as f64;
        (exact.round_ties_even() as u64).max(1)
    }
}

impl Default for ResizeSpec {
    fn default() -> Self {
        Self::new(DEFAULT_TARGET_WIDTH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputFormat {
    Jpeg,
    Png,
    WebP,
    Bmp,
    Tiff,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 5] = [
        OutputFormat::Jpeg,
        OutputFormat::Png,
        OutputFormat::WebP,
        OutputFormat::Bmp,
        OutputFormat::Tiff,
    ];

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            "png" => Some(OutputFormat::Png),
            "webp" => Some(OutputFormat::WebP),
            "bmp" => Some(OutputFormat::Bmp),
            "tif" | "tiff" => Some(OutputFormat::Tiff),
            _ => None,
        }
    }

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "jpg",
            OutputFormat::Png => "png",
            OutputFormat::WebP => "webp",
            OutputFormat::Bmp => "bmp",
            OutputFormat::Tiff => "tiff",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg => "image/jpeg",
            OutputFormat::Png => "image/png",
            OutputFormat::WebP => "image/webp",
            OutputFormat::Bmp => "image/bmp",
            OutputFormat::Tiff => "image/tiff",
        }
    }

    pub fn image_format(self) -> ImageFormat {
        match self {
            OutputFormat::Jpeg => ImageFormat::Jpeg,
            OutputFormat::Png => ImageFormat::Png,
            OutputFormat::WebP => ImageFormat::WebP,
            OutputFormat::Bmp => ImageFormat::Bmp,
            OutputFormat::Tiff => ImageFormat::Tiff,
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            OutputFormat::Jpeg => "JPEG",
            OutputFormat::Png => "PNG",
            OutputFormat::WebP => "WebP",
            OutputFormat::Bmp => "BMP",
            OutputFormat::Tiff => "TIFF",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatPolicy {
    /// Keep the container implied by the input's extension.
    DeriveFromExtension { fallback: OutputFormat },
    /// Flatten every output to one format.
    Force(OutputFormat),
}

impl Default for FormatPolicy {
    fn default() -> Self {
        FormatPolicy::DeriveFromExtension {
            fallback: OutputFormat::Jpeg,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutputPolicy {
    pub format: FormatPolicy,
    pub jpeg_quality: u8,
}

impl OutputPolicy {
    pub fn derive(fallback: OutputFormat) -> Self {
        Self {
            format: FormatPolicy::DeriveFromExtension { fallback },
            ..Default::default()
        }
    }

    pub fn force(format: OutputFormat) -> Self {
        Self {
            format: FormatPolicy::Force(format),
            ..Default::default()
        }
    }
}

impl Default for OutputPolicy {
    fn default() -> Self {
        Self {
            format: FormatPolicy::default(),
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }
}

/// Everything one run needs, built once from user input and never mutated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessConfig {
    pub crop: CropSpec,
    pub resize: ResizeSpec,
    pub output: OutputPolicy,
}

impl ProcessConfig {
    pub fn validate(&self) -> Result<()> {
        if self.resize.target_width == 0 {
            return Err(Crop1080Error::InvalidParameter(
                "Target width must be positive".to_string(),
            ));
        }

        if self.resize.target_width > 100_000 {
            return Err(Crop1080Error::InvalidParameter(
                "Target width too large (max 100,000 pixels)".to_string(),
            ));
        }

        if self.output.jpeg_quality == 0 || self.output.jpeg_quality > 100 {
            return Err(Crop1080Error::InvalidParameter(
                "Quality must be between 1 and 100".to_string(),
            ));
        }

        Ok(())
    }
}

#[derive(Error, Debug)]
pub enum Crop1080Error {
    #[error("input not found: {0}")]
    InputNotFound(String),

    #[error("cannot decode image: {0}")]
    Decode(#[source] image::ImageError),

    #[error(
        "crop exceeds image size {width}x{height} \
         (left={left}, right={right}, top={top}, bottom={bottom})"
    )]
    CropOutOfBounds {
        width: u32,
        height: u32,
        left: u32,
        right: u32,
        top: u32,
        bottom: u32,
    },

    #[error(
        "output {width}x{height} needs {bytes} bytes, over the {limit} byte limit \
         (source {source_width}x{source_height})"
    )]
    OutputTooLarge {
        width: u32,
        height: u64,
        bytes: u64,
        limit: u64,
        source_width: u32,
        source_height: u32,
    },

    #[error("cannot encode {format} image: {source}")]
    Encode {
        format: OutputFormat,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("destination exists: {0}")]
    DestinationExists(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
}

impl Crop1080Error {
    /// Kinds a batch reports as skipped rather than failed.
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            Crop1080Error::CropOutOfBounds { .. } | Crop1080Error::DestinationExists(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Crop1080Error>;
