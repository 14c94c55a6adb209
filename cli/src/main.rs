//! faceblur CLI entrypoint.
//!
//! ```bash
//! faceblur                                   # Dress/ -> blur_image/
//! faceblur --input photos --output blurred
//! faceblur --model seeta_fd_frontal_v1.0.bin
//! faceblur --json > report.json
//! ```

mod logger;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};

use faceblur::{
    DetectionParams, FaceBlurPipeline, GaussianBlur, RustfaceDetector, DEFAULT_JPEG_QUALITY,
    DEFAULT_RADIUS_SCALE,
};

#[derive(Parser, Debug)]
#[command(
    name = "faceblur",
    version,
    about = "Blur every detected face in a folder of photos with a circular Gaussian mask"
)]
struct Cli {
    /// Folder of .jpg/.jpeg/.png images to read (not searched recursively).
    #[arg(short = 'i', long = "input", default_value = "Dress")]
    input: PathBuf,

    /// Folder to write results to; created if missing.
    #[arg(short = 'o', long = "output", default_value = "blur_image")]
    output: PathBuf,

    /// SeetaFace frontal face model file [default: bundled model].
    #[arg(short = 'm', long = "model")]
    model: Option<PathBuf>,

    /// Gaussian kernel edge length (odd).
    #[arg(long = "kernel-size", default_value_t = 99)]
    kernel_size: u32,

    /// Gaussian standard deviation.
    #[arg(long = "sigma", default_value_t = 30.0)]
    sigma: f32,

    /// Disk radius multiplier applied to half the larger face edge.
    #[arg(long = "radius-scale", default_value_t = DEFAULT_RADIUS_SCALE)]
    radius_scale: f64,

    /// Detector scale step between pyramid levels.
    #[arg(long = "scale-factor", default_value_t = 1.1)]
    scale_factor: f64,

    /// Neighbouring detections required to keep a face (cascade backends).
    #[arg(long = "min-neighbors", default_value_t = 4)]
    min_neighbors: u32,

    /// Quality for re-encoded JPEG outputs (1-100).
    #[arg(long = "jpeg-quality", default_value_t = DEFAULT_JPEG_QUALITY)]
    jpeg_quality: u8,

    /// Print the batch report as JSON on stdout.
    #[arg(long = "json")]
    json: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    if !cli.input.exists() {
        error!("Input folder '{}' does not exist!", cli.input.display());
        return Ok(ExitCode::FAILURE);
    }

    let detector = match &cli.model {
        Some(path) => RustfaceDetector::from_file(path)
            .with_context(|| format!("loading face model {}", path.display()))?,
        None => RustfaceDetector::new().context("loading bundled face model")?,
    };

    let pipeline = FaceBlurPipeline::new(Box::new(detector))
        .blur(GaussianBlur {
            kernel_size: cli.kernel_size,
            sigma: cli.sigma,
        })
        .detection(DetectionParams {
            scale_factor: cli.scale_factor,
            min_neighbors: cli.min_neighbors,
            ..DetectionParams::default()
        })
        .radius_scale(cli.radius_scale)
        .jpeg_quality(cli.jpeg_quality);

    let report = pipeline
        .process(&cli.input, &cli.output)
        .context("face blur batch failed")?;

    info!(
        "Processing complete! {} written, {} failed, {} face(s) blurred",
        report.processed(),
        report.failed(),
        report.faces_blurred()
    );

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    Ok(ExitCode::SUCCESS)
}
