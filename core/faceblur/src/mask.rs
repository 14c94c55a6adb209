use image::{GrayImage, Luma};

use crate::face_detector::FaceRegion;

/// Mask value for pixels inside the disk.
pub const MASK_ON: u8 = 255;

/// Filled circle covering one detected face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disk {
    /// Center column in image coordinates.
    pub center_x: i32,
    /// Center row in image coordinates.
    pub center_y: i32,
    /// Radius in pixels; a pixel is inside when its squared distance is <= radius².
    pub radius: i32,
}

impl Disk {
    /// Derive the covering disk for a face box.
    ///
    /// The center uses floor division of the box size. The radius is half the
    /// larger box edge, floor-divided first, then scaled by `radius_scale` and
    /// truncated, so `100×80` at scale 1.2 gives radius 60.
    pub fn from_region(region: &FaceRegion, radius_scale: f64) -> Self {
        let center_x = region.x + (region.width / 2) as i32;
        let center_y = region.y + (region.height / 2) as i32;
        let half_edge = region.width.max(region.height) / 2;
        let radius = (half_edge as f64 * radius_scale) as i32;
        Self {
            center_x,
            center_y,
            radius,
        }
    }

    /// Whether pixel `(x, y)` lies inside or on the circle.
    pub fn contains(&self, x: i64, y: i64) -> bool {
        let dx = x - self.center_x as i64;
        let dy = y - self.center_y as i64;
        let r = self.radius as i64;
        dx * dx + dy * dy <= r * r
    }
}

/// Single-channel binary mask, the same size as the source image, with one
/// disk set to [`MASK_ON`] and everything else zero.
#[derive(Debug, Clone)]
pub struct CircularMask {
    mask: GrayImage,
}

impl CircularMask {
    /// Rasterise `disk` into a fresh all-zero mask. Parts of the disk that
    /// fall outside the image are clipped.
    pub fn render(width: u32, height: u32, disk: &Disk) -> Self {
        let mut mask = GrayImage::new(width, height);

        let r = disk.radius.max(0) as i64;
        let (cx, cy) = (disk.center_x as i64, disk.center_y as i64);
        let x_start = (cx - r).max(0);
        let x_end = (cx + r).min(width as i64 - 1);
        let y_start = (cy - r).max(0);
        let y_end = (cy + r).min(height as i64 - 1);

        for y in y_start..=y_end {
            for x in x_start..=x_end {
                if disk.contains(x, y) {
                    mask.put_pixel(x as u32, y as u32, Luma([MASK_ON]));
                }
            }
        }

        Self { mask }
    }

    /// Mask value at `(x, y)`: 0 or [`MASK_ON`].
    pub fn value(&self, x: u32, y: u32) -> u8 {
        self.mask.get_pixel(x, y).0[0]
    }

    /// Mask width in pixels.
    pub fn width(&self) -> u32 {
        self.mask.width()
    }

    /// Mask height in pixels.
    pub fn height(&self) -> u32 {
        self.mask.height()
    }

    /// Borrow the raw mask raster.
    pub fn as_image(&self) -> &GrayImage {
        &self.mask
    }
}
