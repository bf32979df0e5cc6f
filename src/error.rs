use std::path::PathBuf;

/// Errors raised while converting an annotation file.
///
/// Only [`ConvertError::MissingImage`] is recovered by the converter; every
/// other variant aborts the run before any output is written.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("failed to open annotation file {}: {source}", path.display())]
    ReadAnnotations {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed annotation file {}: {message}", path.display())]
    MalformedInput { path: PathBuf, message: String },

    #[error("image file not found: {}", path.display())]
    MissingImage { path: PathBuf },

    #[error("failed to read image {}: {source}", path.display())]
    UnreadableImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("failed to write COCO file {}: {source}", path.display())]
    OutputWriteFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
