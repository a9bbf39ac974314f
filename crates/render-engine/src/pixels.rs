//! Dense RGBA pixel buffers.
//!
//! Pixels are stored row-major as `R, G, B, A` bytes with row 0 at the top,
//! which is the layout `image::RgbaImage` uses. Buffers convert to and from
//! `RgbaImage` without reordering channels.

use image::RgbaImage;

/// Fully transparent pixel.
pub const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Bytes per pixel.
pub(crate) const CHANNELS: usize = 4;

/// Fixed-size RGBA8 pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) data: Vec<u8>,
}

impl PixelBuffer {
    /// Transparent buffer of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Buffer of the given size filled with one color.
    pub fn filled(width: u32, height: u32, color: [u8; 4]) -> Self {
        let mut data = Vec::with_capacity(byte_len(width, height));
        for _ in 0..(width as usize * height as usize) {
            data.extend_from_slice(&color);
        }
        Self {
            width,
            height,
            data,
        }
    }

    /// Wrap raw RGBA bytes. Returns `None` if the length does not match.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Option<Self> {
        (data.len() == byte_len(width, height)).then_some(Self {
            width,
            height,
            data,
        })
    }

    pub fn from_rgba_image(image: RgbaImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }

    /// Hand the pixels to the `image` crate. Channel order is already RGBA.
    pub fn into_rgba_image(self) -> RgbaImage {
        let (width, height) = (self.width, self.height);
        RgbaImage::from_raw(width, height, self.data)
            .unwrap_or_else(|| RgbaImage::new(width, height))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn is_square(&self) -> bool {
        self.width == self.height
    }

    /// Raw RGBA bytes, row 0 first.
    pub fn as_raw(&self) -> &[u8] {
        &self.data
    }

    /// Pixel at column `x`, row `row` (row 0 at the top).
    pub fn pixel(&self, x: u32, row: u32) -> [u8; 4] {
        let i = self.offset(x, row);
        [
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ]
    }

    pub fn put_pixel(&mut self, x: u32, row: u32, color: [u8; 4]) {
        let i = self.offset(x, row);
        self.data[i..i + CHANNELS].copy_from_slice(&color);
    }

    /// Whether every pixel in the rectangle has the given color.
    pub fn region_is(&self, x: u32, row: u32, width: u32, height: u32, color: [u8; 4]) -> bool {
        (row..row + height).all(|r| (x..x + width).all(|c| self.pixel(c, r) == color))
    }

    pub(crate) fn offset(&self, x: u32, row: u32) -> usize {
        debug_assert!(x < self.width && row < self.height);
        (row as usize * self.width as usize + x as usize) * CHANNELS
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    width as usize * height as usize * CHANNELS
}
