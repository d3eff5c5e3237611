// Copyright 2026 the Vello Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A single channel 8-bit coverage image, the output of the tile rasterizer.
///
/// Pixels are stored in row-major order. Each pixel is written by exactly one
/// invocation of the rasterizer, so there is no blending.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl Framebuffer {
    /// Creates a framebuffer with every pixel set to 0 (no coverage).
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// The coverage at `(x, y)`, or `None` outside of the framebuffer.
    pub fn get(&self, x: u32, y: u32) -> Option<u8> {
        self.index(x, y).map(|ix| self.pixels[ix])
    }

    /// Writes the coverage at `(x, y)`. Writes outside of the framebuffer are dropped.
    pub fn set(&mut self, x: u32, y: u32, value: u8) {
        if let Some(ix) = self.index(x, y) {
            self.pixels[ix] = value;
        }
    }

    /// The raw pixels, one byte each, row-major.
    pub fn data(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // `chunks_exact` panics on a zero chunk size.
        self.pixels.chunks_exact(self.width.max(1) as usize)
    }

    /// The image as RGB8, with the coverage replicated to all three channels.
    pub fn to_rgb8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&v| [v, v, v]).collect()
    }

    /// The image as opaque RGBA8, with the coverage replicated to the color channels.
    pub fn to_rgba8(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|&v| [v, v, v, 0xff]).collect()
    }

    /// Converts to an [`image::GrayImage`] for display or saving.
    #[cfg(feature = "image")]
    pub fn to_image(&self) -> image::GrayImage {
        image::GrayImage::from_fn(self.width, self.height, |x, y| {
            image::Luma([self.pixels[y as usize * self.width as usize + x as usize]])
        })
    }

    /// Converts to an [`image::RgbImage`], with the coverage replicated to all channels.
    #[cfg(feature = "image")]
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            let v = self.pixels[y as usize * self.width as usize + x as usize];
            image::Rgb([v, v, v])
        })
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}
