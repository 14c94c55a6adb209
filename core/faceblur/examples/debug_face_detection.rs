//! Print the face boxes and blur disks found in every image of a folder,
//! without writing anything.
//!
//! Usage:
//!   cargo run --example debug_face_detection -- <image-folder> [model.bin]

use faceblur::{
    list_images, read_image, to_grayscale, DetectionParams, Disk, FaceDetector, RustfaceDetector,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let folder = args.next().unwrap_or_else(|| "Dress".into());
    let detector = match args.next() {
        Some(model) => RustfaceDetector::from_file(model)?,
        None => RustfaceDetector::new()?,
    };
    let params = DetectionParams::default();

    for path in list_images(folder.as_ref())? {
        let image = match read_image(&path) {
            Ok(image) => image,
            Err(e) => {
                println!("=== {} ===\n  unreadable: {e}\n", path.display());
                continue;
            }
        };
        let gray = to_grayscale(&image);
        let (width, height) = gray.dimensions();
        println!("=== {} ({width}x{height}) ===", path.display());

        let faces = detector.detect(gray.as_raw(), width, height, &params)?;
        if faces.is_empty() {
            println!("  NO FACES DETECTED");
        }
        for (i, face) in faces.iter().enumerate() {
            let disk = Disk::from_region(face, faceblur::DEFAULT_RADIUS_SCALE);
            println!(
                "  face {i}: score={:.2}, bbox=({}, {}, {}x{}) -> disk center=({}, {}) r={}",
                face.confidence,
                face.x,
                face.y,
                face.width,
                face.height,
                disk.center_x,
                disk.center_y,
                disk.radius,
            );
        }
        println!();
    }

    Ok(())
}
