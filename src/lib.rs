pub mod cli;
mod core;
pub mod forms;
mod processors;
#[cfg(test)]
mod test_helpers;
mod utils;

pub use crate::core::{
    Crop1080Error, CropSpec, FormatPolicy, ImageProcessor, ItemOutcome, OutputFormat,
    OutputPolicy, ProcessConfig, ProcessedItem, ResizeSpec, Result, DEFAULT_JPEG_QUALITY,
    DEFAULT_MARGIN, DEFAULT_TARGET_WIDTH,
};
pub use crate::forms::{BatchDownload, BatchForm, SingleImageDownload, SingleImageForm, Upload};
pub use crate::processors::{
    BatchEntry, BatchInput, BatchProcessor, BatchReport, DirectorySink, Encoder, FormatResolver,
    InputSource, Loader, MemorySink, OrientationCorrector, OutputSink, Transformer, ZipSink,
};
pub use crate::utils::{
    directory_output_root, format_file_size, is_supported_format, single_file_output_path,
    SUPPORTED_EXTENSIONS,
};

pub mod prelude {
    pub use crate::processors::prelude::*;
    pub use crate::{CropSpec, ImageProcessor, OutputPolicy, ProcessConfig, ResizeSpec};
}

// Re-export commonly used types
pub use image::DynamicImage;
