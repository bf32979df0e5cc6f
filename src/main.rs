use clap::Parser;
use log::{error, info};
use std::process::ExitCode;

use add256_coco::{convert_to_coco, Args};

fn main() -> ExitCode {
    // Initialize the logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    info!("Starting Embrapa ADD 256 to COCO conversion...");

    match convert_to_coco(&args.images, &args.annotations, &args.output) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Conversion failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
