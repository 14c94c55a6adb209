use std::io::Read;
use std::path::Path;

use crate::error::FaceBlurError;
use crate::face_detector::{DetectionParams, FaceDetector, FaceRegion};

/// Smallest face size the SeetaFace engine accepts.
const MIN_SUPPORTED_FACE_SIZE: u32 = 20;

/// Edge length of the SeetaFace scan window. Smaller images hold no faces.
const WINDOW_SIZE: u32 = 40;

/// Pyramid shrink factors the SeetaFace engine accepts.
const PYRAMID_FACTOR_RANGE: std::ops::RangeInclusive<f32> = 0.01..=0.99;

/// Face detector backed by the `rustface` crate (SeetaFace frontal cascade).
///
/// The model is loaded once at construction and cloned into a fresh engine
/// for every call, so a single instance can serve the whole batch.
///
/// rustface merges overlapping candidates with its own non-maximum
/// suppression, so [`DetectionParams::min_neighbors`] is ignored here.
pub struct RustfaceDetector {
    model: rustface::Model,
}

impl RustfaceDetector {
    /// Create a detector with the bundled SeetaFace model.
    ///
    /// The model is embedded in the binary via `include_bytes!`, so no
    /// external files are needed at runtime.
    pub fn new() -> Result<Self, FaceBlurError> {
        let model_data: &[u8] = include_bytes!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/../../model/seeta_fd_frontal_v1.0.bin"
        ));
        Self::from_bytes(model_data)
    }

    /// Load a SeetaFace model (e.g. `seeta_fd_frontal_v1.0.bin`) from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FaceBlurError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .map_err(|e| FaceBlurError::ModelLoad(format!("{}: {e}", path.display())))?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    /// Load a SeetaFace model from an in-memory copy of the model file.
    pub fn from_bytes(data: &[u8]) -> Result<Self, FaceBlurError> {
        Self::from_reader(std::io::Cursor::new(data))
    }

    fn from_reader<R: Read>(reader: R) -> Result<Self, FaceBlurError> {
        let model =
            rustface::read_model(reader).map_err(|e| FaceBlurError::ModelLoad(e.to_string()))?;
        Ok(Self { model })
    }
}

/// Cascade scale factors grow the window; the SeetaFace pyramid shrinks the
/// image. Factors whose inverse falls outside the engine's range are refused
/// here because the engine panics on them.
fn pyramid_factor(scale_factor: f64) -> Result<f32, FaceBlurError> {
    let factor = (1.0 / scale_factor) as f32;
    if !PYRAMID_FACTOR_RANGE.contains(&factor) {
        return Err(FaceBlurError::DetectionError(format!(
            "scale factor {scale_factor} outside the supported range {:.4}..={:.0}",
            1.0 / PYRAMID_FACTOR_RANGE.end(),
            1.0 / PYRAMID_FACTOR_RANGE.start()
        )));
    }
    Ok(factor)
}

impl FaceDetector for RustfaceDetector {
    fn detect(
        &self,
        gray: &[u8],
        width: u32,
        height: u32,
        params: &DetectionParams,
    ) -> Result<Vec<FaceRegion>, FaceBlurError> {
        let pyramid = pyramid_factor(params.scale_factor)?;
        if width < WINDOW_SIZE || height < WINDOW_SIZE {
            return Ok(Vec::new());
        }

        let mut detector = rustface::create_detector_with_model(self.model.clone());
        detector.set_min_face_size(params.min_face_size.max(MIN_SUPPORTED_FACE_SIZE));
        detector.set_score_thresh(2.0);
        detector.set_pyramid_scale_factor(pyramid);
        detector.set_slide_window_step(4, 4);

        let faces = detector.detect(&rustface::ImageData::new(gray, width, height));

        Ok(faces
            .iter()
            .map(|face| {
                let bbox = face.bbox();
                FaceRegion {
                    x: bbox.x(),
                    y: bbox.y(),
                    width: bbox.width(),
                    height: bbox.height(),
                    confidence: face.score(),
                }
            })
            .collect())
    }
}
