// crop1080/src/processors/format.rs
use crate::core::{FormatPolicy, OutputFormat};
use std::path::Path;

pub struct FormatResolver {
    policy: FormatPolicy,
}

impl FormatResolver {
    pub fn new(policy: FormatPolicy) -> Self {
        Self { policy }
    }

    pub fn resolve(&self, input_name: &str) -> OutputFormat {
        match self.policy {
            FormatPolicy::Force(format) => format,
            FormatPolicy::DeriveFromExtension { fallback } => Path::new(input_name)
                .extension()
                .and_then(|ext| ext.to_str())
                .and_then(OutputFormat::from_extension)
                .unwrap_or(fallback),
        }
    }

    /// `input_name` with its extension replaced by the format's canonical one.
    /// Directory components are kept.
    pub fn output_name(input_name: &str, format: OutputFormat) -> String {
        Path::new(input_name)
            .with_extension(format.extension())
            .to_string_lossy()
            .into_owned()
    }
}
