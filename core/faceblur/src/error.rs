use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FaceBlurError {
    #[error("input directory does not exist: {}", .0.display())]
    InputDirMissing(PathBuf),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to decode image: {0}")]
    DecodeError(String),

    #[error("failed to encode image: {0}")]
    EncodeError(String),

    #[error("unsupported output format: {0}")]
    UnsupportedFormat(String),

    #[error("image dimensions are zero")]
    ZeroDimensions,

    #[error("face detection failed: {0}")]
    DetectionError(String),

    #[error("failed to load face detection model: {0}")]
    ModelLoad(String),

    #[error("gaussian kernel size must be odd and between 1 and 4095, got {0}")]
    InvalidKernelSize(u32),

    #[error("gaussian sigma must be finite and > 0, got {0}")]
    InvalidSigma(f32),

    #[error("radius scale must be finite and > 0, got {0}")]
    InvalidRadiusScale(f64),

    #[error("detection scale factor must be > 1.0, got {0}")]
    InvalidScaleFactor(f64),

    #[error("jpeg quality must be between 1 and 100, got {0}")]
    InvalidJpegQuality(u8),
}

impl FaceBlurError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
