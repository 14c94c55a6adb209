//! Face anonymisation for folders of photos: detect faces, cover each one with
//! a circular patch of Gaussian blur, and write the results to another folder.
//!
//! # Example
//!
//! ```no_run
//! use faceblur::{FaceBlurPipeline, RustfaceDetector};
//!
//! let detector = RustfaceDetector::new().unwrap();
//! let report = FaceBlurPipeline::new(Box::new(detector))
//!     .process("Dress", "blur_image")
//!     .unwrap();
//! println!("{} file(s) written, {} face(s) blurred", report.processed(), report.faces_blurred());
//! ```
#![warn(missing_docs)]

/// Masked blending of the blurred copy over the working image.
pub mod blend;
/// Gaussian kernel construction and whole-image blur.
pub mod blur;
mod error;
/// Face detection traits and data types.
pub mod face_detector;
/// Face disks and their single-channel masks.
pub mod mask;
mod pipeline;
mod report;
#[cfg(feature = "rustface")]
/// Built-in SeetaFace-based face detector backend.
pub mod rustface_backend;

use std::path::Path;

use image::RgbImage;

pub use blur::GaussianBlur;
/// Error type returned by faceblur operations.
pub use error::FaceBlurError;
/// Face detection trait, detection tuning and face bounding-box type.
pub use face_detector::{DetectionParams, FaceDetector, FaceRegion};
pub use mask::{CircularMask, Disk};
pub use pipeline::{
    is_eligible, list_images, read_image, to_grayscale, write_image, BlurredImage,
    IMAGE_EXTENSIONS,
};
pub use report::{BatchReport, FileOutcome, FileReport};
#[cfg(feature = "rustface")]
/// Built-in detector that loads a SeetaFace model file.
pub use rustface_backend::RustfaceDetector;

use pipeline::Settings;

/// Default disk enlargement over half the larger face-box edge.
pub const DEFAULT_RADIUS_SCALE: f64 = 1.2;

/// Default JPEG quality for re-encoded `.jpg`/`.jpeg` outputs.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Builder for the batch face-blur pipeline.
///
/// Owns the face detector for its whole lifetime; the detector is only ever
/// borrowed immutably, so one pipeline can be reused across many runs.
pub struct FaceBlurPipeline {
    detector: Box<dyn FaceDetector>,
    settings: Settings,
}

impl FaceBlurPipeline {
    /// Create a pipeline around `detector` with the default settings
    /// (99×99 kernel, sigma 30, radius scale 1.2, scale factor 1.1,
    /// min neighbors 4, JPEG quality 95).
    pub fn new(detector: Box<dyn FaceDetector>) -> Self {
        Self {
            detector,
            settings: Settings {
                blur: GaussianBlur::default(),
                detection: DetectionParams::default(),
                radius_scale: DEFAULT_RADIUS_SCALE,
                jpeg_quality: DEFAULT_JPEG_QUALITY,
            },
        }
    }

    /// Set the Gaussian blur kernel (default: 99×99, sigma 30).
    pub fn blur(mut self, blur: GaussianBlur) -> Self {
        self.settings.blur = blur;
        self
    }

    /// Set the parameters passed to the detector on every image.
    pub fn detection(mut self, params: DetectionParams) -> Self {
        self.settings.detection = params;
        self
    }

    /// Set the disk enlargement factor (default: 1.2).
    ///
    /// The radius is `max(w, h) / 2` floor-divided, then multiplied by this
    /// factor and truncated.
    pub fn radius_scale(mut self, scale: f64) -> Self {
        self.settings.radius_scale = scale;
        self
    }

    /// Set the quality used when writing JPEG outputs (1–100, default: 95).
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.settings.jpeg_quality = quality;
        self
    }

    /// Blur every face in every `.jpg`, `.jpeg` or `.png` file directly inside
    /// `input_dir`, writing each result under the same name in `output_dir`.
    ///
    /// Returns [`FaceBlurError::InputDirMissing`] without touching the
    /// filesystem when `input_dir` does not exist. Otherwise `output_dir` is
    /// created if needed and every file is attempted; per-file failures are
    /// recorded in the [`BatchReport`] and never stop the batch.
    pub fn process(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<BatchReport, FaceBlurError> {
        pipeline::run_batch(
            input_dir.as_ref(),
            output_dir.as_ref(),
            self.detector.as_ref(),
            &self.settings,
        )
    }

    /// Process a single file into `output_dir`, which must already exist.
    pub fn process_file(
        &self,
        input: impl AsRef<Path>,
        output_dir: impl AsRef<Path>,
    ) -> Result<FileReport, FaceBlurError> {
        self.settings.validate()?;
        Ok(pipeline::process_file(
            input.as_ref(),
            output_dir.as_ref(),
            self.detector.as_ref(),
            &self.settings,
        ))
    }

    /// Blur the faces in an already-decoded image.
    pub fn blur_image(&self, image: &RgbImage) -> Result<BlurredImage, FaceBlurError> {
        self.settings.validate()?;
        pipeline::blur_faces(image, self.detector.as_ref(), &self.settings)
    }
}
