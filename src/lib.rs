//! Embrapa ADD 256 to COCO format converter
//!
//! This library converts the circle-marker annotations of the Embrapa ADD 256
//! apple dataset into a single-category COCO object-detection document.

pub mod coco;
pub mod config;
pub mod conversion;
pub mod error;
pub mod types;
pub mod utils;

// Re-export commonly used types and functions
pub use config::Args;
pub use conversion::{build_coco_file, convert_to_coco, ConversionSummary};
pub use error::ConvertError;
pub use types::{AnnotationSource, MarkerRecord, ProcessingStats};

// COCO-specific exports
pub use coco::{Annotation, Category, CocoFile, CocoWriter, Image, Info, License};
pub use utils::{ImageCrateReader, ImageSizeReader};
