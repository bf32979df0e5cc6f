use clap::Parser;
use std::path::PathBuf;

/// Command-line arguments for converting Embrapa ADD 256 annotations to COCO format.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Directory containing the image files
    #[arg(long = "images", default_value = "data/images")]
    pub images: PathBuf,

    /// Path to the JSON file containing annotations (training.json or test.json)
    #[arg(long = "annotations")]
    pub annotations: PathBuf,

    /// Path to save the COCO format JSON file
    #[arg(long = "output")]
    pub output: PathBuf,
}
