use std::fs;
use std::path::{Path, PathBuf};

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{GrayImage, ImageEncoder, ImageFormat, Luma, RgbImage};
use tracing::{debug, info, instrument, warn};

use crate::blend::apply_disks;
use crate::blur::{gaussian_blur, GaussianBlur};
use crate::error::FaceBlurError;
use crate::face_detector::{DetectionParams, FaceDetector};
use crate::mask::Disk;
use crate::report::{BatchReport, FileOutcome, FileReport};

/// File extensions picked up from the input directory (compared lowercase).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// Everything the per-image work needs besides the detector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settings {
    pub blur: GaussianBlur,
    pub detection: DetectionParams,
    pub radius_scale: f64,
    pub jpeg_quality: u8,
}

impl Settings {
    pub(crate) fn validate(&self) -> Result<(), FaceBlurError> {
        self.blur.validate()?;
        self.detection.validate()?;
        if !self.radius_scale.is_finite() || self.radius_scale <= 0.0 {
            return Err(FaceBlurError::InvalidRadiusScale(self.radius_scale));
        }
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(FaceBlurError::InvalidJpegQuality(self.jpeg_quality));
        }
        Ok(())
    }
}

/// Result of blurring the faces in one in-memory image.
#[derive(Debug, Clone)]
pub struct BlurredImage {
    /// The output image, same size and layout as the input.
    pub image: RgbImage,
    /// Number of faces the detector reported (and that were blurred).
    pub faces: usize,
}

/// Whether `path` carries one of the [`IMAGE_EXTENSIONS`], ignoring case.
pub fn is_eligible(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|candidate| ext.eq_ignore_ascii_case(candidate))
        })
        .unwrap_or(false)
}

/// List eligible image files directly inside `dir` (no recursion), sorted by name.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, FaceBlurError> {
    let entries = fs::read_dir(dir).map_err(|e| FaceBlurError::io(dir, e))?;

    let mut images = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| FaceBlurError::io(dir, e))?.path();
        if path.is_file() && is_eligible(&path) {
            images.push(path);
        }
    }
    images.sort();
    Ok(images)
}

/// Decode raw bytes into a 3-channel colour image. Alpha is discarded.
pub(crate) fn decode_image(input: &[u8]) -> Result<RgbImage, FaceBlurError> {
    let decoded =
        image::load_from_memory(input).map_err(|e| FaceBlurError::DecodeError(e.to_string()))?;
    if decoded.width() == 0 || decoded.height() == 0 {
        return Err(FaceBlurError::ZeroDimensions);
    }
    Ok(decoded.to_rgb8())
}

/// Read and decode an image file.
pub fn read_image(path: &Path) -> Result<RgbImage, FaceBlurError> {
    let bytes = fs::read(path).map_err(|e| FaceBlurError::io(path, e))?;
    decode_image(&bytes)
}

/// Rec.601 luma weights in 14-bit fixed point (0.299, 0.587, 0.114).
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Rec.601 luma copy used only for detection.
pub fn to_grayscale(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let sum = r as u32 * LUMA_R
            + g as u32 * LUMA_G
            + b as u32 * LUMA_B
            + (1 << (LUMA_SHIFT - 1));
        Luma([(sum >> LUMA_SHIFT) as u8])
    })
}

/// Encode `image` in the format implied by `path`'s extension.
pub(crate) fn encode_image(
    image: &RgbImage,
    path: &Path,
    jpeg_quality: u8,
) -> Result<Vec<u8>, FaceBlurError> {
    let format = ImageFormat::from_path(path)
        .map_err(|_| FaceBlurError::UnsupportedFormat(path.display().to_string()))?;

    let mut buffer = Vec::new();
    match format {
        ImageFormat::Jpeg => JpegEncoder::new_with_quality(&mut buffer, jpeg_quality)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| FaceBlurError::EncodeError(e.to_string()))?,
        ImageFormat::Png => PngEncoder::new(&mut buffer)
            .write_image(
                image.as_raw(),
                image.width(),
                image.height(),
                image::ExtendedColorType::Rgb8,
            )
            .map_err(|e| FaceBlurError::EncodeError(e.to_string()))?,
        other => return Err(FaceBlurError::UnsupportedFormat(format!("{other:?}"))),
    }

    Ok(buffer)
}

/// Encode and write `image` to `path`.
pub fn write_image(image: &RgbImage, path: &Path, jpeg_quality: u8) -> Result<(), FaceBlurError> {
    let data = encode_image(image, path, jpeg_quality)?;
    fs::write(path, data).map_err(|e| FaceBlurError::io(path, e))
}

/// Detect faces and cover each with a blurred disk: grayscale → detect →
/// blur once → fold one disk per face over the working image.
pub(crate) fn blur_faces(
    image: &RgbImage,
    detector: &dyn FaceDetector,
    settings: &Settings,
) -> Result<BlurredImage, FaceBlurError> {
    let gray = to_grayscale(image);
    let faces = detector.detect(gray.as_raw(), gray.width(), gray.height(), &settings.detection)?;
    debug!("detector returned {} region(s)", faces.len());

    if faces.is_empty() {
        return Ok(BlurredImage {
            image: image.clone(),
            faces: 0,
        });
    }

    let blurred = gaussian_blur(image, &settings.blur)?;
    let disks: Vec<Disk> = faces
        .iter()
        .map(|face| Disk::from_region(face, settings.radius_scale))
        .collect();

    Ok(BlurredImage {
        image: apply_disks(image.clone(), &blurred, &disks),
        faces: faces.len(),
    })
}

fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Process one input file into `output_dir`. Errors are captured in the
/// returned report instead of propagating.
#[instrument(level = "debug", skip_all, fields(file = %file_name_of(input)))]
pub(crate) fn process_file(
    input: &Path,
    output_dir: &Path,
    detector: &dyn FaceDetector,
    settings: &Settings,
) -> FileReport {
    let file_name = file_name_of(input);
    // Join the raw OS name so non-UTF-8 names come out byte-identical.
    let Some(raw_name) = input.file_name() else {
        warn!("Error processing {file_name}: path has no file name");
        return FileReport {
            file_name,
            outcome: FileOutcome::Failed {
                reason: "path has no file name".into(),
            },
        };
    };
    let output = output_dir.join(raw_name);

    let result = read_image(input)
        .and_then(|image| blur_faces(&image, detector, settings))
        .and_then(|blurred| {
            write_image(&blurred.image, &output, settings.jpeg_quality)?;
            Ok(blurred.faces)
        });

    let outcome = match result {
        Ok(0) => {
            info!("No faces detected in {file_name}");
            FileOutcome::NoFaces { output }
        }
        Ok(faces) => {
            info!("Processed {file_name} - {faces} face(s) blurred with circular mask");
            FileOutcome::Blurred { faces, output }
        }
        Err(e) => {
            warn!("Error processing {file_name}: {e}");
            FileOutcome::Failed {
                reason: e.to_string(),
            }
        }
    };

    FileReport { file_name, outcome }
}

/// Run the whole batch: check input, create output, visit every eligible file once.
pub(crate) fn run_batch(
    input_dir: &Path,
    output_dir: &Path,
    detector: &dyn FaceDetector,
    settings: &Settings,
) -> Result<BatchReport, FaceBlurError> {
    if !input_dir.exists() {
        return Err(FaceBlurError::InputDirMissing(input_dir.to_path_buf()));
    }
    settings.validate()?;

    if !output_dir.exists() {
        fs::create_dir_all(output_dir).map_err(|e| FaceBlurError::io(output_dir, e))?;
        info!("Created output directory: {}", output_dir.display());
    }

    let mut report = BatchReport::new(input_dir.to_path_buf(), output_dir.to_path_buf());

    let images = list_images(input_dir)?;
    if images.is_empty() {
        warn!("No images found in {}", input_dir.display());
        return Ok(report);
    }
    info!("Found {} images to process.", images.len());

    report.files = images
        .iter()
        .map(|path| process_file(path, output_dir, detector, settings))
        .collect();

    Ok(report)
}
