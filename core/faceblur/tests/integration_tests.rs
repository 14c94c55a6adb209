use std::fs;
use std::path::Path;

use faceblur::blur::gaussian_blur;
use faceblur::{
    BatchReport, DetectionParams, Disk, FaceBlurError, FaceBlurPipeline, FaceDetector, FaceRegion,
    FileOutcome, GaussianBlur,
};
use image::{Rgb, RgbImage};

/// Mock face detector returning a fixed set of boxes for every image.
struct MockDetector {
    faces: Vec<FaceRegion>,
}

impl MockDetector {
    fn none() -> Self {
        Self { faces: vec![] }
    }

    fn with_faces(faces: &[(i32, i32, u32, u32)]) -> Self {
        Self {
            faces: faces
                .iter()
                .map(|&(x, y, w, h)| FaceRegion::new(x, y, w, h))
                .collect(),
        }
    }
}

impl FaceDetector for MockDetector {
    fn detect(
        &self,
        _gray: &[u8],
        _width: u32,
        _height: u32,
        _params: &DetectionParams,
    ) -> Result<Vec<FaceRegion>, FaceBlurError> {
        Ok(self.faces.clone())
    }
}

/// Fails on images of one particular width, finds nothing elsewhere.
struct PickyDetector {
    fail_width: u32,
}

impl FaceDetector for PickyDetector {
    fn detect(
        &self,
        _gray: &[u8],
        width: u32,
        _height: u32,
        _params: &DetectionParams,
    ) -> Result<Vec<FaceRegion>, FaceBlurError> {
        if width == self.fail_width {
            Err(FaceBlurError::DetectionError(format!("cannot scan width {width}")))
        } else {
            Ok(vec![])
        }
    }
}

fn make_test_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, y| {
        Rgb([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            if (x / 3 + y / 3) % 2 == 0 { 20 } else { 235 },
        ])
    })
}

fn write_png(dir: &Path, name: &str, image: &RgbImage) {
    image.save(dir.join(name)).unwrap();
}

fn read_rgb(path: &Path) -> RgbImage {
    image::open(path).unwrap().to_rgb8()
}

fn output_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn outcome_of<'a>(report: &'a BatchReport, name: &str) -> &'a FileOutcome {
    &report
        .files
        .iter()
        .find(|f| f.file_name == name)
        .unwrap_or_else(|| panic!("{name} missing from report"))
        .outcome
}

#[test]
fn missing_input_directory_does_no_work() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("Dress");
    let output = root.path().join("blur_image");

    let result = FaceBlurPipeline::new(Box::new(MockDetector::none())).process(&input, &output);

    assert!(matches!(result, Err(FaceBlurError::InputDirMissing(ref p)) if p == &input));
    assert!(!output.exists(), "output directory must not be created");
}

#[test]
fn empty_input_directory_creates_output_only() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::write(input.join("readme.txt"), b"not an image").unwrap();

    let report = FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    assert!(report.files.is_empty());
    assert!(output.is_dir());
    assert!(output_names(&output).is_empty());
}

#[test]
fn valid_jpeg_and_corrupt_png_yield_one_output() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();

    make_test_rgb(48, 32).save(input.join("good.jpg")).unwrap();
    fs::write(input.join("broken.png"), b"\x89PNG but not really").unwrap();

    let report = FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    assert_eq!(report.files.len(), 2);
    assert_eq!(report.processed(), 1);
    assert_eq!(report.failed(), 1);
    assert!(matches!(
        outcome_of(&report, "broken.png"),
        FileOutcome::Failed { .. }
    ));
    assert_eq!(output_names(&output), vec!["good.jpg".to_string()]);

    let written = read_rgb(&output.join("good.jpg"));
    assert_eq!(written.dimensions(), (48, 32));
}

#[test]
fn no_faces_png_is_pixel_identical() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    let original = make_test_rgb(40, 30);
    write_png(&input, "plain.png", &original);

    let report = FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    assert_eq!(
        outcome_of(&report, "plain.png"),
        &FileOutcome::NoFaces {
            output: output.join("plain.png")
        }
    );
    assert_eq!(read_rgb(&output.join("plain.png")), original);
}

#[test]
fn single_face_blurs_inside_disk_and_preserves_outside() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    let original = make_test_rgb(80, 60);
    write_png(&input, "face.png", &original);

    let face = (30, 20, 20, 16);
    let report = FaceBlurPipeline::new(Box::new(MockDetector::with_faces(&[face])))
        .process(&input, &output)
        .unwrap();
    assert_eq!(report.faces_blurred(), 1);

    let result = read_rgb(&output.join("face.png"));
    let blurred = gaussian_blur(&original, &GaussianBlur::default()).unwrap();
    let disk = Disk::from_region(&FaceRegion::new(face.0, face.1, face.2, face.3), 1.2);
    assert_eq!((disk.center_x, disk.center_y, disk.radius), (40, 28, 12));

    assert_eq!(result.dimensions(), original.dimensions());
    assert_eq!(result.get_pixel(40, 28), blurred.get_pixel(40, 28));
    for (x, y, pixel) in result.enumerate_pixels() {
        if !disk.contains(x as i64, y as i64) {
            assert_eq!(pixel, original.get_pixel(x, y), "outside pixel ({x}, {y})");
        } else {
            assert_eq!(pixel, blurred.get_pixel(x, y), "inside pixel ({x}, {y})");
        }
    }
}

#[test]
fn overlapping_faces_stay_blurred_at_overlap() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    let original = make_test_rgb(90, 50);
    write_png(&input, "group.png", &original);

    let detector = MockDetector::with_faces(&[(20, 10, 30, 30), (36, 10, 30, 30)]);
    FaceBlurPipeline::new(Box::new(detector))
        .process(&input, &output)
        .unwrap();

    let result = read_rgb(&output.join("group.png"));
    let blurred = gaussian_blur(&original, &GaussianBlur::default()).unwrap();
    // Disk centers (35, 25) and (51, 25), radius 18: x = 43 is inside both
    assert_eq!(result.get_pixel(43, 25), blurred.get_pixel(43, 25));
    assert_eq!(result.get_pixel(0, 0), original.get_pixel(0, 0));
    assert_eq!(result.get_pixel(89, 49), original.get_pixel(89, 49));
}

#[test]
fn extensions_match_case_insensitively_without_recursion() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir_all(input.join("nested")).unwrap();

    let img = make_test_rgb(16, 16);
    img.save_with_format(input.join("UPPER.PNG"), image::ImageFormat::Png)
        .unwrap();
    img.save_with_format(input.join("Mixed.JpEg"), image::ImageFormat::Jpeg)
        .unwrap();
    write_png(&input.join("nested"), "deep.png", &img);
    fs::write(input.join("notes.png.txt"), b"not an image").unwrap();

    let report = FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    let mut names: Vec<&str> = report.files.iter().map(|f| f.file_name.as_str()).collect();
    names.sort();
    assert_eq!(names, vec!["Mixed.JpEg", "UPPER.PNG"]);
    assert_eq!(
        output_names(&output),
        vec!["Mixed.JpEg".to_string(), "UPPER.PNG".to_string()]
    );
}

#[test]
fn detector_failure_is_isolated_to_one_file() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    write_png(&input, "a.png", &make_test_rgb(13, 10));
    write_png(&input, "b.png", &make_test_rgb(20, 10));

    let report = FaceBlurPipeline::new(Box::new(PickyDetector { fail_width: 13 }))
        .process(&input, &output)
        .unwrap();

    match outcome_of(&report, "a.png") {
        FileOutcome::Failed { reason } => assert!(reason.contains("cannot scan width 13")),
        other => panic!("expected failure, got {other:?}"),
    }
    assert!(matches!(
        outcome_of(&report, "b.png"),
        FileOutcome::NoFaces { .. }
    ));
    assert_eq!(output_names(&output), vec!["b.png".to_string()]);
}

#[test]
fn existing_output_directory_is_reused() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    fs::create_dir(&output).unwrap();
    fs::write(output.join("keep.txt"), b"left alone").unwrap();
    write_png(&input, "x.png", &make_test_rgb(8, 8));

    FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    assert_eq!(
        output_names(&output),
        vec!["keep.txt".to_string(), "x.png".to_string()]
    );
}

#[test]
fn process_file_reports_single_outcome() {
    let root = tempfile::tempdir().unwrap();
    let output = root.path().join("out");
    fs::create_dir(&output).unwrap();
    let path = root.path().join("solo.png");
    make_test_rgb(24, 24).save(&path).unwrap();

    let report = FaceBlurPipeline::new(Box::new(MockDetector::with_faces(&[(4, 4, 10, 10)])))
        .process_file(&path, &output)
        .unwrap();

    assert_eq!(report.file_name, "solo.png");
    assert_eq!(
        report.outcome,
        FileOutcome::Blurred {
            faces: 1,
            output: output.join("solo.png")
        }
    );
    assert!(output.join("solo.png").is_file());
}

#[cfg(unix)]
#[test]
fn non_utf8_file_names_are_written_byte_identical() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    let output = root.path().join("out");
    fs::create_dir(&input).unwrap();
    let name = OsStr::from_bytes(b"\xffphoto.png");
    // Some filesystems refuse non-UTF-8 names; nothing to check there.
    if make_test_rgb(10, 10)
        .save_with_format(input.join(name), image::ImageFormat::Png)
        .is_err()
    {
        return;
    }

    let report = FaceBlurPipeline::new(Box::new(MockDetector::none()))
        .process(&input, &output)
        .unwrap();

    assert_eq!(report.processed(), 1);
    assert!(output.join(name).is_file(), "output must keep the raw name");
    assert!(!output.join("\u{FFFD}photo.png").exists());
    match &report.files[0].outcome {
        FileOutcome::NoFaces { output: written } => {
            assert_eq!(written.file_name(), Some(name));
        }
        other => panic!("expected NoFaces, got {other:?}"),
    }
}

#[cfg(feature = "rustface")]
mod seetaface {
    use super::*;
    use faceblur::{to_grayscale, RustfaceDetector};

    const FIXTURE_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../../tests/fixtures");

    fn load_fixture(name: &str) -> RgbImage {
        let path = format!("{FIXTURE_DIR}/{name}");
        image::open(&path)
            .unwrap_or_else(|e| panic!("failed to load fixture {path}: {e}"))
            .to_rgb8()
    }

    #[test]
    fn bundled_detector_finds_faces_in_group_portrait() {
        let image = load_fixture("group_portrait.png");
        let gray = to_grayscale(&image);
        let detector = RustfaceDetector::new().unwrap();

        let faces = detector
            .detect(
                gray.as_raw(),
                gray.width(),
                gray.height(),
                &DetectionParams::default(),
            )
            .unwrap();

        assert!(!faces.is_empty(), "rustface should find faces in the portrait");
        for face in &faces {
            assert!(face.confidence >= 2.0, "score below threshold: {face:?}");
            assert!(face.width >= 20 && face.height >= 20, "too small: {face:?}");
            assert!(face.x < image.width() as i32 && face.y < image.height() as i32);
            assert!(face.x + face.width as i32 > 0 && face.y + face.height as i32 > 0);
        }
    }

    #[test]
    fn bundled_detector_drives_the_batch() {
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("Dress");
        let output = root.path().join("blur_image");
        fs::create_dir(&input).unwrap();
        let original = load_fixture("group_portrait.png");
        write_png(&input, "group_portrait.png", &original);

        let detector = RustfaceDetector::new().unwrap();
        let report = FaceBlurPipeline::new(Box::new(detector))
            .process(&input, &output)
            .unwrap();

        assert!(report.faces_blurred() >= 1, "report: {report:?}");
        let result = read_rgb(&output.join("group_portrait.png"));
        assert_eq!(result.dimensions(), original.dimensions());
        assert_ne!(result, original, "at least one face must be blurred");
    }
}
