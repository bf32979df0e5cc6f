use image::ImageReader;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::coco::CocoFile;
use crate::error::ConvertError;
use crate::types::AnnotationSource;

/// Source of pixel dimensions for image files on disk
pub trait ImageSizeReader {
    /// Return `(width, height)` of the image at `path`
    fn read_size(&self, path: &Path) -> Result<(u32, u32), ConvertError>;
}

/// Reads dimensions from the image header using the `image` crate.
/// The format is sniffed from the file content, not the extension, and the
/// file is closed again before this returns.
#[derive(Debug, Default, Clone, Copy)]
pub struct ImageCrateReader;

impl ImageSizeReader for ImageCrateReader {
    fn read_size(&self, path: &Path) -> Result<(u32, u32), ConvertError> {
        let unreadable = |source: image::ImageError| ConvertError::UnreadableImage {
            path: path.to_path_buf(),
            source,
        };

        ImageReader::open(path)
            .and_then(ImageReader::with_guessed_format)
            .map_err(|e| unreadable(image::ImageError::IoError(e)))?
            .into_dimensions()
            .map_err(unreadable)
    }
}

/// Join an image file name onto the images directory, failing when nothing is there
pub fn locate_image(images_dir: &Path, file_name: &str) -> Result<PathBuf, ConvertError> {
    let image_path = images_dir.join(file_name);
    if image_path.exists() {
        Ok(image_path)
    } else {
        Err(ConvertError::MissingImage { path: image_path })
    }
}

/// Read and parse the annotation file, streaming it from disk
pub fn read_annotation_source(path: &Path) -> Result<AnnotationSource, ConvertError> {
    let file = File::open(path).map_err(|source| ConvertError::ReadAnnotations {
        path: path.to_path_buf(),
        source,
    })?;

    let malformed = |message: String| ConvertError::MalformedInput {
        path: path.to_path_buf(),
        message,
    };

    let value: Value =
        serde_json::from_reader(BufReader::new(file)).map_err(|e| malformed(e.to_string()))?;
    match value {
        Value::Object(object) => AnnotationSource::from_json_object(object).map_err(malformed),
        _ => Err(malformed(
            "top-level value must be an object of image file names".to_string(),
        )),
    }
}

/// Write the COCO document as indented JSON, replacing any existing file
pub fn write_coco_file(path: &Path, coco: &CocoFile) -> Result<(), ConvertError> {
    let write_failure = |source: std::io::Error| ConvertError::OutputWriteFailure {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(write_failure)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, coco).map_err(|e| write_failure(e.into()))?;
    writer.flush().map_err(write_failure)
}

/// Create a progress bar with the given length and label
pub fn create_progress_bar(len: u64, label: &str) -> ProgressBar {
    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{}] [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{pos}}/{{len}} ({{eta}})",
                label
            ))
            .progress_chars("#>-"),
    );
    pb
}
