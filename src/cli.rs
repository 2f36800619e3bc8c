// crop1080/src/cli.rs
use crate::core::{
    CropSpec, Crop1080Error, ItemOutcome, OutputPolicy, OutputFormat, ProcessConfig, ResizeSpec,
    DEFAULT_MARGIN, DEFAULT_TARGET_WIDTH,
};
use crate::processors::{BatchEntry, BatchInput, BatchProcessor, BatchReport, DirectorySink};
use crate::utils::{directory_output_root, single_file_output_path};
use anyhow::Context;
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

/// Exit code when `--strict` is set and some items did not succeed.
pub const STRICT_FAILURE_EXIT: i32 = 2;

#[derive(Parser, Debug, Clone)]
#[command(name = "crop1080", version)]
#[command(about = "Crop left/right 34px and resize width to 1080px (keep filename)")]
pub struct Cli {
    /// Image file or directory to process
    pub input: PathBuf,

    /// Output file or directory
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub left: u32,

    #[arg(long, default_value_t = DEFAULT_MARGIN)]
    pub right: u32,

    #[arg(long, default_value_t = 0)]
    pub top: u32,

    #[arg(long, default_value_t = 0)]
    pub bottom: u32,

    /// Output width in pixels; height follows the aspect ratio
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
    pub target_width: u32,

    /// Overwrite existing output files
    #[arg(long)]
    pub force: bool,

    /// Exit with a non-zero code when any image is skipped or fails
    #[arg(long)]
    pub strict: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn config(&self) -> ProcessConfig {
        ProcessConfig {
            crop: CropSpec::new(self.left, self.right, self.top, self.bottom),
            resize: ResizeSpec::new(self.target_width),
            output: OutputPolicy::derive(OutputFormat::Jpeg),
        }
    }
}

/// Runs the tool, writing the per-item report to `out`. Returns the exit code.
pub fn run<W: Write>(cli: &Cli, out: &mut W) -> anyhow::Result<i32> {
    let input = &cli.input;

    if !input.exists() {
        writeln!(out, "input not found: {}", input.display())?;
        return Ok(1);
    }

    let batch = BatchProcessor::new(cli.config()).context("invalid settings")?;

    let (inputs, mut sink) = if input.is_file() {
        let destination = single_file_output_path(input, cli.output.as_deref());
        let file_name = destination
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .with_context(|| format!("no file name in {}", destination.display()))?;
        let root = destination.parent().map(PathBuf::from).unwrap_or_default();

        (
            vec![BatchInput::path(file_name, input.clone())],
            DirectorySink::new(root, cli.force),
        )
    } else {
        let root = directory_output_root(input, cli.output.as_deref());
        let inputs = BatchProcessor::collect_directory(input)
            .with_context(|| format!("cannot read {}", input.display()))?;
        (inputs, DirectorySink::new(root, cli.force))
    };

    log::debug!("Writing outputs under {}", sink.root().display());

    let mut write_error = None;
    let report = batch.run_with(inputs, &mut sink, |entry| {
        if write_error.is_none() {
            if let Err(e) = report_line(out, entry) {
                write_error = Some(e);
            }
        }
    });
    if let Some(e) = write_error {
        return Err(e.into());
    }

    writeln!(
        out,
        "done. success={}, skipped/failed={}",
        report.success_count(),
        report.failure_count()
    )?;

    Ok(exit_code(cli, &report))
}

fn report_line<W: Write>(out: &mut W, entry: &BatchEntry) -> std::io::Result<()> {
    match &entry.outcome {
        ItemOutcome::Success(_) => writeln!(
            out,
            "ok: {} -> {}",
            entry.input,
            entry.destination.as_deref().unwrap_or_default()
        ),
        ItemOutcome::Failure { error, .. } => match error {
            Crop1080Error::DestinationExists(destination) => {
                writeln!(out, "skip (exists): {}", destination)
            }
            Crop1080Error::CropOutOfBounds { .. } => {
                writeln!(out, "skip (too small): {}", entry.input)
            }
            other => writeln!(out, "error: {} ({})", entry.input, other),
        },
    }
}

// Failures never change the exit code unless --strict is given.
fn exit_code(cli: &Cli, report: &BatchReport) -> i32 {
    if cli.strict && report.failure_count() > 0 {
        STRICT_FAILURE_EXIT
    } else {
        0
    }
}
