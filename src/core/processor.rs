// crop1080/src/core/processor.rs
use super::{Crop1080Error, OutputFormat, ProcessConfig, Result};
use crate::processors::{Encoder, FormatResolver, Loader, Transformer};
use image::GenericImageView;
use std::path::Path;

/// One successfully transformed and encoded image.
#[derive(Debug, Clone)]
pub struct ProcessedItem {
    pub input_name: String,
    pub output_name: String,
    pub format: OutputFormat,
    pub source_width: u32,
    pub source_height: u32,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub enum ItemOutcome {
    Success(ProcessedItem),
    Failure {
        input_name: String,
        error: Crop1080Error,
    },
}

impl ItemOutcome {
    pub fn from_result(input_name: &str, result: Result<ProcessedItem>) -> Self {
        match result {
            Ok(item) => ItemOutcome::Success(item),
            Err(error) => ItemOutcome::Failure {
                input_name: input_name.to_string(),
                error,
            },
        }
    }

    pub fn input_name(&self) -> &str {
        match self {
            ItemOutcome::Success(item) => &item.input_name,
            ItemOutcome::Failure { input_name, .. } => input_name,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ItemOutcome::Success(_))
    }
}

/// Decode, orient, crop/resize and encode a single image.
pub struct ImageProcessor {
    loader: Loader,
    transformer: Transformer,
    resolver: FormatResolver,
    encoder: Encoder,
}

impl ImageProcessor {
    pub fn new(config: ProcessConfig) -> Self {
        let transformer = Transformer::new(config.crop, config.resize);
        let resolver = FormatResolver::new(config.output.format);
        let encoder = Encoder::new(config.output.jpeg_quality);

        Self {
            loader: Loader::new(),
            transformer,
            resolver,
            encoder,
        }
    }

    /// Never fails: every error becomes an [`ItemOutcome::Failure`].
    pub fn process_bytes(&self, input_name: &str, data: &[u8]) -> ItemOutcome {
        ItemOutcome::from_result(input_name, self.try_process_bytes(input_name, data))
    }

    pub fn process_path(&self, input_name: &str, path: &Path) -> ItemOutcome {
        ItemOutcome::from_result(input_name, self.try_process_path(input_name, path))
    }

    pub fn try_process_path(&self, input_name: &str, path: &Path) -> Result<ProcessedItem> {
        if !path.exists() {
            return Err(Crop1080Error::InputNotFound(path.display().to_string()));
        }
        let data = std::fs::read(path)?;
        self.try_process_bytes(input_name, &data)
    }

    pub fn try_process_bytes(&self, input_name: &str, data: &[u8]) -> Result<ProcessedItem> {
        let image = self.loader.load_from_bytes(data)?;
        let (source_width, source_height) = image.dimensions();

        let transformed = self.transformer.transform(&image)?;
        drop(image);

        let format = self.resolver.resolve(input_name);
        let bytes = self.encoder.encode(&transformed, format)?;
        let (width, height) = transformed.dimensions();

        log::info!(
            "Processed {}: {}x{} -> {}x{} {} ({} bytes)",
            input_name,
            source_width,
            source_height,
            width,
            height,
            format,
            bytes.len()
        );

        Ok(ProcessedItem {
            input_name: input_name.to_string(),
            output_name: FormatResolver::output_name(input_name, format),
            format,
            source_width,
            source_height,
            width,
            height,
            bytes,
        })
    }
}
