use image::RgbImage;

use crate::error::FaceBlurError;

const CHANNELS: usize = 3;

/// Largest accepted kernel edge length.
pub const MAX_KERNEL_SIZE: u32 = 4095;

/// Gaussian blur parameters: an explicit square kernel size and the
/// standard deviation of the bell curve sampled across it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    /// Kernel edge length in pixels. Must be odd and at most [`MAX_KERNEL_SIZE`].
    pub kernel_size: u32,
    /// Standard deviation in pixels, shared by both axes.
    pub sigma: f32,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self {
            kernel_size: 99,
            sigma: 30.0,
        }
    }
}

impl GaussianBlur {
    pub(crate) fn validate(&self) -> Result<(), FaceBlurError> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 || self.kernel_size > MAX_KERNEL_SIZE
        {
            return Err(FaceBlurError::InvalidKernelSize(self.kernel_size));
        }
        if !self.sigma.is_finite() || self.sigma <= 0.0 {
            return Err(FaceBlurError::InvalidSigma(self.sigma));
        }
        Ok(())
    }
}

/// Build the normalised 1-D Gaussian taps for a kernel of `size` samples.
pub fn gaussian_kernel(size: u32, sigma: f32) -> Result<Vec<f32>, FaceBlurError> {
    GaussianBlur {
        kernel_size: size,
        sigma,
    }
    .validate()?;

    let center = (size as f64 - 1.0) / 2.0;
    let two_sigma_sq = 2.0 * sigma as f64 * sigma as f64;
    let taps: Vec<f64> = (0..size)
        .map(|i| {
            let d = i as f64 - center;
            (-(d * d) / two_sigma_sq).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();

    Ok(taps.into_iter().map(|t| (t / sum) as f32).collect())
}

/// Map an out-of-range coordinate back into `0..len` by mirroring around
/// the edge pixels without repeating them (`gfedcb|abcdefgh|gfedcba`).
///
/// Mirrors as many times as needed, so kernels wider than the image work.
pub(crate) fn reflect_101(index: isize, len: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as isize - 1);
    let folded = index.rem_euclid(period);
    if folded >= len as isize {
        (period - folded) as usize
    } else {
        folded as usize
    }
}

/// Blur the whole image with a separable Gaussian.
///
/// Runs a horizontal pass then a vertical pass, keeping the intermediate
/// in `f32` so rounding happens once per channel.
pub fn gaussian_blur(image: &RgbImage, params: &GaussianBlur) -> Result<RgbImage, FaceBlurError> {
    let kernel = gaussian_kernel(params.kernel_size, params.sigma)?;
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Ok(image.clone());
    }

    let (w, h) = (width as usize, height as usize);
    let half = (kernel.len() / 2) as isize;
    let src = image.as_raw();

    let mut horizontal = vec![0f32; w * h * CHANNELS];
    for y in 0..h {
        let row = &src[y * w * CHANNELS..(y + 1) * w * CHANNELS];
        for x in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sx = reflect_101(x as isize + k as isize - half, w);
                let px = &row[sx * CHANNELS..sx * CHANNELS + CHANNELS];
                for c in 0..CHANNELS {
                    acc[c] += weight * px[c] as f32;
                }
            }
            let idx = (y * w + x) * CHANNELS;
            horizontal[idx..idx + CHANNELS].copy_from_slice(&acc);
        }
    }

    let mut output = RgbImage::new(width, height);
    let dst: &mut [u8] = &mut output;
    for y in 0..h {
        for x in 0..w {
            let mut acc = [0f32; CHANNELS];
            for (k, weight) in kernel.iter().enumerate() {
                let sy = reflect_101(y as isize + k as isize - half, h);
                let idx = (sy * w + x) * CHANNELS;
                for c in 0..CHANNELS {
                    acc[c] += weight * horizontal[idx + c];
                }
            }
            let idx = (y * w + x) * CHANNELS;
            for c in 0..CHANNELS {
                dst[idx + c] = acc[c].round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    Ok(output)
}
