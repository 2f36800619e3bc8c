// crop1080/src/processors/sink.rs
use crate::core::{Crop1080Error, ProcessedItem, Result};
use crate::processors::BatchInput;
use crate::utils::format_file_size;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Where a batch puts its encoded images.
pub trait OutputSink {
    /// Called before the input is decoded. An error skips the item.
    fn prepare(&mut self, _input: &BatchInput) -> Result<()> {
        Ok(())
    }

    /// Persists one item and returns where it went.
    fn accept(&mut self, input: &BatchInput, item: &ProcessedItem) -> Result<String>;
}

/// Packs every output into a single in-memory zip archive.
pub struct ZipSink {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    options: SimpleFileOptions,
    entries: usize,
}

impl ZipSink {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            options: SimpleFileOptions::default().compression_method(CompressionMethod::Deflated),
            entries: 0,
        }
    }

    pub fn entries(&self) -> usize {
        self.entries
    }

    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.writer.finish()?;
        log::debug!("Finished archive with {} entries", self.entries);
        Ok(cursor.into_inner())
    }
}

impl Default for ZipSink {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputSink for ZipSink {
    fn accept(&mut self, _input: &BatchInput, item: &ProcessedItem) -> Result<String> {
        // zip entries always use forward slashes
        let entry = item.output_name.replace('\\', "/");
        self.writer.start_file(entry.as_str(), self.options)?;
        self.writer.write_all(&item.bytes)?;
        self.entries += 1;
        Ok(entry)
    }
}

/// Mirrors each input's relative path under an output root.
pub struct DirectorySink {
    root: PathBuf,
    overwrite: bool,
}

impl DirectorySink {
    pub fn new(root: impl Into<PathBuf>, overwrite: bool) -> Self {
        Self {
            root: root.into(),
            overwrite,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn destination(&self, input: &BatchInput) -> PathBuf {
        self.root.join(&input.name)
    }
}

impl OutputSink for DirectorySink {
    fn prepare(&mut self, input: &BatchInput) -> Result<()> {
        let destination = self.destination(input);
        if destination.exists() && !self.overwrite {
            return Err(Crop1080Error::DestinationExists(
                destination.display().to_string(),
            ));
        }
        Ok(())
    }

    fn accept(&mut self, input: &BatchInput, item: &ProcessedItem) -> Result<String> {
        let destination = self.destination(input);
        if let Some(parent) = destination.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&destination, &item.bytes)?;
        log::info!(
            "Saved image: {} ({})",
            destination.display(),
            format_file_size(item.bytes.len() as u64)
        );
        Ok(destination.display().to_string())
    }
}

/// Keeps encoded outputs in memory, in the order they were accepted.
#[derive(Default)]
pub struct MemorySink {
    pub outputs: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OutputSink for MemorySink {
    fn accept(&mut self, _input: &BatchInput, item: &ProcessedItem) -> Result<String> {
        self.outputs.push((item.output_name.clone(), item.bytes.clone()));
        Ok(item.output_name.clone())
    }
}
