// crop1080/src/processors/batch.rs
use crate::core::{Crop1080Error, ImageProcessor, ItemOutcome, ProcessConfig, Result};
use crate::processors::OutputSink;
use crate::utils::is_supported_format;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone)]
pub enum InputSource {
    Bytes(Vec<u8>),
    Path(PathBuf),
}

/// One batch item. `name` is the upload name or the path relative to the
/// walked root.
#[derive(Debug, Clone)]
pub struct BatchInput {
    pub name: String,
    pub source: InputSource,
}

impl BatchInput {
    pub fn bytes(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            source: InputSource::Bytes(data),
        }
    }

    pub fn path(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source: InputSource::Path(path.into()),
        }
    }

    /// Human-facing label: the file path for disk inputs, the name otherwise.
    pub fn display_name(&self) -> String {
        match &self.source {
            InputSource::Path(path) => path.display().to_string(),
            InputSource::Bytes(_) => self.name.clone(),
        }
    }
}

/// Outcomes of one run, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BatchEntry>,
}

#[derive(Debug)]
pub struct BatchEntry {
    pub input: String,
    /// Where the sink put the output, for successes.
    pub destination: Option<String>,
    pub outcome: ItemOutcome,
}

impl BatchReport {
    pub fn success_count(&self) -> usize {
        self.outcomes.iter().filter(|e| e.outcome.is_success()).count()
    }

    pub fn failure_count(&self) -> usize {
        self.outcomes.len() - self.success_count()
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&str, &Crop1080Error)> {
        self.outcomes.iter().filter_map(|entry| match &entry.outcome {
            ItemOutcome::Failure { input_name, error } => Some((input_name.as_str(), error)),
            ItemOutcome::Success(_) => None,
        })
    }

    /// `"name: reason"` lines for every non-success, in input order.
    pub fn failure_messages(&self) -> Vec<String> {
        self.failures()
            .map(|(name, error)| format!("{}: {}", name, error))
            .collect()
    }
}

/// Runs the single-item processor over every input, sequentially.
pub struct BatchProcessor {
    processor: ImageProcessor,
}

impl BatchProcessor {
    pub fn new(config: ProcessConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            processor: ImageProcessor::new(config),
        })
    }

    pub fn run<I>(&self, inputs: I, sink: &mut dyn OutputSink) -> BatchReport
    where
        I: IntoIterator<Item = BatchInput>,
    {
        self.run_with(inputs, sink, |_| {})
    }

    /// Like [`run`](Self::run) but hands each entry to `on_item` as soon as it
    /// is finished.
    pub fn run_with<I, F>(&self, inputs: I, sink: &mut dyn OutputSink, mut on_item: F) -> BatchReport
    where
        I: IntoIterator<Item = BatchInput>,
        F: FnMut(&BatchEntry),
    {
        let mut report = BatchReport::default();

        for input in inputs {
            let entry = self.process_one(&input, sink);
            on_item(&entry);
            report.outcomes.push(entry);
        }

        if report.is_empty() {
            log::warn!("Batch had no inputs");
        } else {
            log::info!(
                "Batch finished: {} succeeded, {} skipped/failed",
                report.success_count(),
                report.failure_count()
            );
        }

        report
    }

    fn process_one(&self, input: &BatchInput, sink: &mut dyn OutputSink) -> BatchEntry {
        let label = input.display_name();

        if let Err(error) = sink.prepare(input) {
            log::debug!("Sink refused {}: {}", label, error);
            return BatchEntry {
                input: label,
                destination: None,
                outcome: ItemOutcome::Failure {
                    input_name: input.name.clone(),
                    error,
                },
            };
        }

        let outcome = match &input.source {
            InputSource::Bytes(data) => self.processor.process_bytes(&input.name, data),
            InputSource::Path(path) => self.processor.process_path(&input.name, path),
        };

        match outcome {
            ItemOutcome::Success(item) => match sink.accept(input, &item) {
                Ok(destination) => BatchEntry {
                    input: label,
                    destination: Some(destination),
                    outcome: ItemOutcome::Success(item),
                },
                Err(error) => BatchEntry {
                    input: label,
                    destination: None,
                    outcome: ItemOutcome::Failure {
                        input_name: input.name.clone(),
                        error,
                    },
                },
            },
            failure => {
                if let ItemOutcome::Failure { error, .. } = &failure {
                    log::debug!("Failed {}: {}", label, error);
                }
                BatchEntry {
                    input: label,
                    destination: None,
                    outcome: failure,
                }
            }
        }
    }

    /// Recursively finds images under `root`, sorted by path.
    pub fn collect_directory(root: &Path) -> Result<Vec<BatchInput>> {
        if !root.exists() {
            return Err(Crop1080Error::InputNotFound(root.display().to_string()));
        }

        let mut inputs = Vec::new();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if !entry.file_type().is_file() || !is_supported_format(entry.path()) {
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .unwrap_or(entry.path())
                .to_string_lossy()
                .into_owned();
            inputs.push(BatchInput::path(relative, entry.into_path()));
        }

        log::info!("Found {} images under {}", inputs.len(), root.display());
        Ok(inputs)
    }
}
