use crate::error::FaceBlurError;

/// Bounding box of a detected face within an image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FaceRegion {
    /// X coordinate of the top-left corner (pixels). May be negative for
    /// faces clipped by the left border.
    pub x: i32,
    /// Y coordinate of the top-left corner (pixels).
    pub y: i32,
    /// Width of the bounding box (pixels).
    pub width: u32,
    /// Height of the bounding box (pixels).
    pub height: u32,
    /// Detection confidence score. Backends without a score report 0.0.
    pub confidence: f64,
}

impl FaceRegion {
    /// Region with no confidence score attached.
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
            confidence: 0.0,
        }
    }
}

/// Tuning knobs handed to the detector on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionParams {
    /// Ratio between successive scan scales. Must be > 1.0.
    pub scale_factor: f64,
    /// How many overlapping candidates a detection needs to be kept.
    pub min_neighbors: u32,
    /// Smallest face edge length, in pixels, worth scanning for.
    pub min_face_size: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 4,
            min_face_size: 20,
        }
    }
}

impl DetectionParams {
    pub(crate) fn validate(&self) -> Result<(), FaceBlurError> {
        if !self.scale_factor.is_finite() || self.scale_factor <= 1.0 {
            return Err(FaceBlurError::InvalidScaleFactor(self.scale_factor));
        }
        Ok(())
    }
}

/// Pluggable face detection backend.
///
/// The pipeline borrows one detector for the whole batch and never mutates
/// it, so implementations must be safe to call repeatedly through `&self`.
/// Implement this trait to plug in a different engine (ONNX, dlib, a Haar
/// cascade binding, or a fixed list of boxes in tests) and pass it to
/// [`crate::FaceBlurPipeline::new`].
pub trait FaceDetector: Send + Sync {
    /// Detect faces in a row-major grayscale buffer of `width` × `height` bytes.
    ///
    /// Output order is not significant.
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
        params: &DetectionParams,
    ) -> Result<Vec<FaceRegion>, FaceBlurError>;
}
