// crop1080/src/forms.rs
//! Handlers behind the two interactive forms.
//!
//! A UI collects field values into [`SingleImageForm`] or [`BatchForm`],
//! which are validated once and then turned into a [`ProcessConfig`]. Nothing
//! here reads widget state; everything a page shows comes back in the
//! returned values.

use crate::core::{
    CropSpec, Crop1080Error, ImageProcessor, OutputFormat, OutputPolicy, ProcessConfig,
    ProcessedItem, ResizeSpec, Result, DEFAULT_MARGIN, DEFAULT_TARGET_WIDTH,
};
use crate::processors::{BatchInput, BatchProcessor, BatchReport, Loader, MemorySink, OutputSink, ZipSink};
use crate::utils::is_supported_format;
use std::ops::RangeInclusive;
use std::path::Path;

pub const SINGLE_DOWNLOAD_NAME: &str = "cropped_1080.jpg";
pub const BATCH_ARCHIVE_NAME: &str = "crop1080_batch.zip";

const SINGLE_MARGIN_RANGE: RangeInclusive<u32> = 0..=200;
const SINGLE_WIDTH_RANGE: RangeInclusive<u32> = 100..=5000;
const BATCH_MARGIN_RANGE: RangeInclusive<u32> = 0..=2000;
const BATCH_WIDTH_RANGE: RangeInclusive<u32> = 100..=10_000;

/// A file handed over by the upload widget.
#[derive(Debug, Clone)]
pub struct Upload {
    pub name: String,
    pub data: Vec<u8>,
}

impl Upload {
    pub fn new(name: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            data,
        }
    }

    pub fn is_accepted(&self) -> bool {
        is_supported_format(Path::new(&self.name))
    }
}

fn check_accepted(name: &str) -> Result<()> {
    if is_supported_format(Path::new(name)) {
        Ok(())
    } else {
        Err(Crop1080Error::UnsupportedFormat(name.to_string()))
    }
}

fn check_range(field: &str, value: u32, range: &RangeInclusive<u32>) -> Result<()> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(Crop1080Error::InvalidParameter(format!(
            "{} must be between {} and {}, got {}",
            field,
            range.start(),
            range.end(),
            value
        )))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleImageForm {
    pub left: u32,
    pub right: u32,
    pub top: u32,
    pub bottom: u32,
    pub target_width: u32,
}

impl Default for SingleImageForm {
    fn default() -> Self {
        Self {
            left: DEFAULT_MARGIN,
            right: DEFAULT_MARGIN,
            top: 0,
            bottom: 0,
            target_width: DEFAULT_TARGET_WIDTH,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SingleImageDownload {
    pub file_name: &'static str,
    pub mime: &'static str,
    pub bytes: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub source_width: u32,
    pub source_height: u32,
}

impl SingleImageForm {
    pub fn validate(&self) -> Result<()> {
        check_range("left", self.left, &SINGLE_MARGIN_RANGE)?;
        check_range("right", self.right, &SINGLE_MARGIN_RANGE)?;
        check_range("top", self.top, &SINGLE_MARGIN_RANGE)?;
        check_range("bottom", self.bottom, &SINGLE_MARGIN_RANGE)?;
        check_range("target width", self.target_width, &SINGLE_WIDTH_RANGE)
    }

    /// Always JPEG, whatever was uploaded.
    pub fn config(&self) -> Result<ProcessConfig> {
        self.validate()?;
        Ok(ProcessConfig {
            crop: CropSpec::new(self.left, self.right, self.top, self.bottom),
            resize: ResizeSpec::new(self.target_width),
            output: OutputPolicy::force(OutputFormat::Jpeg),
        })
    }

    /// Source size shown next to the upload, after orientation correction.
    pub fn inspect(&self, upload: &Upload) -> Result<(u32, u32)> {
        Loader::new().dimensions(&upload.data)
    }

    pub fn submit(&self, upload: &Upload) -> Result<SingleImageDownload> {
        if !upload.is_accepted() {
            return Err(Crop1080Error::UnsupportedFormat(upload.name.clone()));
        }
        let processor = ImageProcessor::new(self.config()?);
        let item = processor.try_process_bytes(&upload.name, &upload.data)?;

        Ok(SingleImageDownload {
            file_name: SINGLE_DOWNLOAD_NAME,
            mime: item.format.mime_type(),
            bytes: item.bytes,
            width: item.width,
            height: item.height,
            source_width: item.source_width,
            source_height: item.source_height,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchForm {
    pub left: u32,
    pub right: u32,
    pub target_width: u32,
    pub preserve_format: bool,
    pub show_preview: bool,
}

impl Default for BatchForm {
    fn default() -> Self {
        Self {
            left: DEFAULT_MARGIN,
            right: DEFAULT_MARGIN,
            target_width: DEFAULT_TARGET_WIDTH,
            preserve_format: true,
            show_preview: false,
        }
    }
}

#[derive(Debug)]
pub struct BatchDownload {
    pub archive_name: &'static str,
    pub archive: Vec<u8>,
    pub report: BatchReport,
    /// Output name and encoded bytes, filled only when previews are on.
    pub previews: Vec<(String, Vec<u8>)>,
}

impl BatchDownload {
    /// Lines for the error detail panel.
    pub fn error_panel(&self) -> Vec<String> {
        self.report.failure_messages()
    }
}

/// Zip sink that also keeps a copy of each output for the preview strip.
struct PreviewingSink {
    archive: ZipSink,
    previews: Option<MemorySink>,
}

impl OutputSink for PreviewingSink {
    // Same extension filter as the upload widget.
    fn prepare(&mut self, input: &BatchInput) -> Result<()> {
        check_accepted(&input.name)
    }

    // Only items that made it into the archive get a preview.
    fn accept(&mut self, input: &BatchInput, item: &ProcessedItem) -> Result<String> {
        let entry = self.archive.accept(input, item)?;
        if let Some(previews) = self.previews.as_mut() {
            previews.accept(input, item)?;
        }
        Ok(entry)
    }
}

impl BatchForm {
    pub fn validate(&self) -> Result<()> {
        check_range("left", self.left, &BATCH_MARGIN_RANGE)?;
        check_range("right", self.right, &BATCH_MARGIN_RANGE)?;
        check_range("target width", self.target_width, &BATCH_WIDTH_RANGE)
    }

    pub fn config(&self) -> Result<ProcessConfig> {
        self.validate()?;
        let output = if self.preserve_format {
            OutputPolicy::derive(OutputFormat::Jpeg)
        } else {
            OutputPolicy::force(OutputFormat::Jpeg)
        };

        Ok(ProcessConfig {
            crop: CropSpec::horizontal(self.left, self.right),
            resize: ResizeSpec::new(self.target_width),
            output,
        })
    }

    pub fn submit(&self, uploads: Vec<Upload>) -> Result<BatchDownload> {
        let batch = BatchProcessor::new(self.config()?)?;
        let mut sink = PreviewingSink {
            archive: ZipSink::new(),
            previews: self.show_preview.then(MemorySink::new),
        };

        let inputs = uploads
            .into_iter()
            .map(|upload| BatchInput::bytes(upload.name, upload.data));
        let report = batch.run(inputs, &mut sink);

        Ok(BatchDownload {
            archive_name: BATCH_ARCHIVE_NAME,
            archive: sink.archive.finish()?,
            report,
            previews: sink.previews.map(|p| p.outputs).unwrap_or_default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers;
    use image::{DynamicImage, GenericImageView, RgbImage, RgbaImage};
    use std::io::{Cursor, Read};

    fn encoded(image: DynamicImage, format: image::ImageFormat) -> Vec<u8> {
        test_helpers::encoded(&image, format)
    }

    #[test]
    fn single_form_returns_jpeg_download() {
        let form = SingleImageForm::default();
        let upload = Upload::new(
            "shot.png",
            encoded(DynamicImage::ImageRgba8(RgbaImage::new(1200, 800)), image::ImageFormat::Png),
        );

        assert_eq!(form.inspect(&upload).unwrap(), (1200, 800));

        let download = form.submit(&upload).unwrap();
        assert_eq!(download.file_name, "cropped_1080.jpg");
        assert_eq!(download.mime, "image/jpeg");
        assert_eq!((download.width, download.height), (1080, 763));

        let decoded = image::load_from_memory(&download.bytes).unwrap();
        assert_eq!(decoded.dimensions(), (1080, 763));
    }

    #[test]
    fn single_form_bounds_fields() {
        let form = SingleImageForm {
            left: 201,
            ..Default::default()
        };
        assert!(matches!(form.validate(), Err(Crop1080Error::InvalidParameter(_))));

        let form = SingleImageForm {
            target_width: 99,
            ..Default::default()
        };
        assert!(form.config().is_err());
    }

    #[test]
    fn single_form_reports_oversized_margins() {
        let form = SingleImageForm::default();
        let upload = Upload::new(
            "tiny.jpg",
            encoded(DynamicImage::ImageRgb8(RgbImage::new(50, 50)), image::ImageFormat::Jpeg),
        );
        assert!(matches!(
            form.submit(&upload),
            Err(Crop1080Error::CropOutOfBounds { .. })
        ));
    }

    #[test]
    fn batch_form_zips_successes_and_lists_errors() {
        let form = BatchForm {
            show_preview: true,
            ..Default::default()
        };
        let uploads = vec![
            Upload::new(
                "a.png",
                encoded(DynamicImage::ImageRgb8(RgbImage::new(400, 200)), image::ImageFormat::Png),
            ),
            Upload::new("b.jpg", b"not a jpeg".to_vec()),
            Upload::new(
                "c.bmp",
                encoded(DynamicImage::ImageRgb8(RgbImage::new(300, 100)), image::ImageFormat::Bmp),
            ),
        ];

        let download = form.submit(uploads).unwrap();
        assert_eq!(download.archive_name, "crop1080_batch.zip");
        assert_eq!(download.report.success_count(), 2);
        assert_eq!(download.report.failure_count(), 1);
        assert_eq!(download.previews.len(), 2);

        let panel = download.error_panel();
        assert_eq!(panel.len(), 1);
        assert!(panel[0].starts_with("b.jpg: "));

        let mut archive = zip::ZipArchive::new(Cursor::new(download.archive)).unwrap();
        let mut names: Vec<_> = archive.file_names().map(str::to_string).collect();
        names.sort();
        assert_eq!(names, ["a.png", "c.bmp"]);

        let mut bytes = Vec::new();
        archive.by_name("a.png").unwrap().read_to_end(&mut bytes).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Png);
    }

    #[test]
    fn batch_form_can_flatten_to_jpeg() {
        let form = BatchForm {
            preserve_format: false,
            ..Default::default()
        };
        let uploads = vec![Upload::new(
            "a.webp",
            encoded(DynamicImage::ImageRgba8(RgbaImage::new(200, 100)), image::ImageFormat::WebP),
        )];

        let download = form.submit(uploads).unwrap();
        assert!(download.previews.is_empty());

        let mut archive = zip::ZipArchive::new(Cursor::new(download.archive)).unwrap();
        let mut bytes = Vec::new();
        archive.by_name("a.jpg").unwrap().read_to_end(&mut bytes).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), image::ImageFormat::Jpeg);
    }

    #[test]
    fn uploads_are_filtered_by_extension() {
        assert!(Upload::new("a.TIFF", Vec::new()).is_accepted());
        assert!(!Upload::new("a.gif", Vec::new()).is_accepted());
    }

    #[test]
    fn single_form_rejects_unlisted_extension() {
        // decodable bytes, but .gif is not on the upload list
        let upload = Upload::new(
            "anim.gif",
            encoded(DynamicImage::ImageRgb8(RgbImage::new(400, 200)), image::ImageFormat::Png),
        );
        match SingleImageForm::default().submit(&upload) {
            Err(Crop1080Error::UnsupportedFormat(name)) => assert_eq!(name, "anim.gif"),
            other => panic!("expected unsupported format, got {other:?}"),
        }
    }

    #[test]
    fn batch_form_reports_unlisted_extension() {
        let png = encoded(DynamicImage::ImageRgb8(RgbImage::new(400, 200)), image::ImageFormat::Png);
        let uploads = vec![
            Upload::new("a.png", png.clone()),
            Upload::new("b.gif", png),
        ];

        let download = BatchForm::default().submit(uploads).unwrap();
        assert_eq!(download.report.success_count(), 1);
        assert_eq!(download.report.failure_count(), 1);
        assert_eq!(download.error_panel(), ["b.gif: Unsupported format: b.gif"]);

        let archive = zip::ZipArchive::new(Cursor::new(download.archive)).unwrap();
        assert_eq!(archive.file_names().collect::<Vec<_>>(), ["a.png"]);
    }

    #[test]
    fn previews_only_cover_archived_items() {
        // both flatten to a.jpg, so the second archive write is refused
        let form = BatchForm {
            preserve_format: false,
            show_preview: true,
            ..Default::default()
        };
        let uploads = vec![
            Upload::new(
                "a.png",
                encoded(DynamicImage::ImageRgb8(RgbImage::new(400, 200)), image::ImageFormat::Png),
            ),
            Upload::new(
                "a.jpg",
                encoded(DynamicImage::ImageRgb8(RgbImage::new(300, 100)), image::ImageFormat::Jpeg),
            ),
        ];

        let download = form.submit(uploads).unwrap();
        assert_eq!(download.report.success_count(), 1);
        assert_eq!(download.report.failure_count(), 1);
        assert_eq!(download.previews.len(), 1);
        assert_eq!(download.previews[0].0, "a.jpg");

        let archive = zip::ZipArchive::new(Cursor::new(download.archive)).unwrap();
        assert_eq!(archive.len(), 1);
    }
}
