//! Cover art decoding and pixel sampling for the card's art block.
//!
//! Embedded pictures are decoded once at startup and kept as a small RGB
//! grid; the renderer samples it per cell, so redraws never touch the
//! image codecs again.

use tracing::debug;

/// Largest edge kept after decoding. Terminal art blocks are a few dozen
/// cells at most, so anything bigger is wasted memory.
const MAX_EDGE: u32 = 64;

/// A decoded cover picture, downscaled for terminal rendering.
pub struct CoverArt {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl CoverArt {
    /// Decode raw picture bytes (as found in a tag or a sidecar file).
    ///
    /// Returns `None` when the bytes are not a decodable image; the card
    /// then falls back to its placeholder block.
    pub fn decode(bytes: &[u8]) -> Option<Self> {
        match image::load_from_memory(bytes) {
            Ok(img) => {
                let small = img.thumbnail(MAX_EDGE, MAX_EDGE).to_rgb8();
                let (width, height) = small.dimensions();
                let pixels = small.pixels().map(|p| p.0).collect();
                Some(Self {
                    width,
                    height,
                    pixels,
                })
            }
            Err(e) => {
                debug!("cover art decode failed: {e}");
                None
            }
        }
    }

    /// Nearest pixel at normalized coordinates `u`, `v` in `0.0..=1.0`.
    pub fn sample(&self, u: f64, v: f64) -> (u8, u8, u8) {
        let x = ((u.clamp(0.0, 1.0) * self.width as f64) as u32).min(self.width - 1);
        let y = ((v.clamp(0.0, 1.0) * self.height as f64) as u32).min(self.height - 1);
        let p = self.pixels[(y * self.width + x) as usize];
        (p[0], p[1], p[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};
    use std::io::Cursor;

    fn png_bytes(img: RgbImage) -> Vec<u8> {
        let mut bytes = Vec::new();
        img.write_to(&mut Cursor::new(&mut bytes), image::ImageFormat::Png)
            .unwrap();
        bytes
    }

    #[test]
    fn decode_rejects_garbage_bytes() {
        assert!(CoverArt::decode(b"definitely not an image").is_none());
        assert!(CoverArt::decode(&[]).is_none());
    }

    #[test]
    fn sample_hits_the_expected_quadrants() {
        // 2x2 image: red, green / blue, white. Small enough that the
        // thumbnail pass leaves it untouched.
        let mut img = RgbImage::new(2, 2);
        img.put_pixel(0, 0, Rgb([255, 0, 0]));
        img.put_pixel(1, 0, Rgb([0, 255, 0]));
        img.put_pixel(0, 1, Rgb([0, 0, 255]));
        img.put_pixel(1, 1, Rgb([255, 255, 255]));

        let art = CoverArt::decode(&png_bytes(img)).unwrap();
        assert_eq!(art.sample(0.1, 0.1), (255, 0, 0));
        assert_eq!(art.sample(0.9, 0.1), (0, 255, 0));
        assert_eq!(art.sample(0.1, 0.9), (0, 0, 255));
        assert_eq!(art.sample(0.9, 0.9), (255, 255, 255));
        // Edge coordinates stay in bounds.
        assert_eq!(art.sample(1.0, 1.0), (255, 255, 255));
        assert_eq!(art.sample(-0.5, 2.0), (0, 0, 255));
    }

    #[test]
    fn large_images_are_downscaled_but_still_sampled() {
        let img = RgbImage::from_pixel(300, 300, Rgb([10, 20, 30]));
        let art = CoverArt::decode(&png_bytes(img)).unwrap();
        assert!(art.width <= MAX_EDGE && art.height <= MAX_EDGE);
        assert_eq!(art.sample(0.5, 0.5), (10, 20, 30));
    }
}
