//! Cell orientation: mapping grid transforms onto pixel remaps.
//!
//! Remaps are written in grid coordinates, where `y` grows upward:
//!
//! ```text
//! Clockwise90   dst[x, y] = src[N-1-y, x]
//! Clockwise270  dst[x, y] = src[y, N-1-x]
//! Half          dst[x, y] = src[N-1-x, N-1-y]
//! mirror H      dst[x, y] = src[N-1-x, y]
//! mirror V      dst[x, y] = src[x, N-1-y]
//! ```
//!
//! Rotation is applied first, then the horizontal mirror, then the vertical
//! mirror. Each step writes into a scratch buffer that is swapped in.

use tilebake_tilemap_model::CellTransform;

use crate::pixels::{PixelBuffer, CHANNELS};

/// Tolerance when matching an angle against a right angle, in degrees.
pub const ANGLE_TOLERANCE_DEG: f32 = 1e-3;

/// One of the four supported rotations, named by their clockwise turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Half,
    Clockwise270,
}

impl Rotation {
    /// Match a z rotation (counter-clockwise, degrees) against the four
    /// right angles. `90` and `-270` both give `Clockwise270`; `270` and `-90`
    /// both give `Clockwise90`. Returns `None` for any other angle.
    pub fn from_degrees(degrees: f32) -> Option<Rotation> {
        if !degrees.is_finite() {
            return None;
        }
        let normalized = degrees.rem_euclid(360.0);
        if approx(normalized, 0.0) || approx(normalized, 360.0) {
            Some(Rotation::None)
        } else if approx(normalized, 90.0) {
            Some(Rotation::Clockwise270)
        } else if approx(normalized, 180.0) {
            Some(Rotation::Half)
        } else if approx(normalized, 270.0) {
            Some(Rotation::Clockwise90)
        } else {
            None
        }
    }
}

/// The pixel operations needed to draw one cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Orientation {
    pub rotation: Rotation,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
}

/// Result of reading a cell transform.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResolvedOrientation {
    pub orientation: Orientation,

    /// Set when the z rotation was not a right angle and was ignored.
    pub unsupported_angle: Option<f32>,
}

impl Orientation {
    pub const IDENTITY: Orientation = Orientation {
        rotation: Rotation::None,
        flip_horizontal: false,
        flip_vertical: false,
    };

    /// Derive the orientation for a cell transform.
    ///
    /// A negative x scale or a half turn around the y axis both mirror the
    /// cell horizontally; likewise negative y scale or a half turn around x
    /// mirror it vertically.
    pub fn resolve(transform: &CellTransform) -> ResolvedOrientation {
        let [rot_x, rot_y, rot_z] = transform.rotation;
        let [scale_x, scale_y] = transform.scale;

        let (rotation, unsupported_angle) = match Rotation::from_degrees(rot_z) {
            Some(rotation) => (rotation, None),
            None => (Rotation::None, Some(rot_z)),
        };

        ResolvedOrientation {
            orientation: Orientation {
                rotation,
                flip_horizontal: scale_x < 0.0 || is_half_turn(rot_y),
                flip_vertical: scale_y < 0.0 || is_half_turn(rot_x),
            },
            unsupported_angle,
        }
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Apply this orientation to a square region.
    pub fn apply(&self, region: &mut PixelBuffer) {
        if self.is_identity() {
            return;
        }
        debug_assert!(region.is_square(), "rotation requires a square region");

        let mut scratch = Vec::with_capacity(region.data.len());
        match self.rotation {
            Rotation::None => {}
            Rotation::Clockwise90 => remap(region, &mut scratch, |n, x, y| (n - 1 - y, x)),
            Rotation::Clockwise270 => remap(region, &mut scratch, |n, x, y| (y, n - 1 - x)),
            Rotation::Half => remap(region, &mut scratch, |n, x, y| (n - 1 - x, n - 1 - y)),
        }
        if self.flip_horizontal {
            remap(region, &mut scratch, |n, x, y| (n - 1 - x, y));
        }
        if self.flip_vertical {
            remap(region, &mut scratch, |n, x, y| (x, n - 1 - y));
        }
    }
}

/// Rotate a square region 90° clockwise.
pub fn rotate_cw90(region: &mut PixelBuffer) {
    Orientation {
        rotation: Rotation::Clockwise90,
        ..Orientation::IDENTITY
    }
    .apply(region);
}

/// Rotate a square region 270° clockwise (90° counter-clockwise).
pub fn rotate_cw270(region: &mut PixelBuffer) {
    Orientation {
        rotation: Rotation::Clockwise270,
        ..Orientation::IDENTITY
    }
    .apply(region);
}

/// Rotate a square region by 180°.
pub fn rotate_half(region: &mut PixelBuffer) {
    Orientation {
        rotation: Rotation::Half,
        ..Orientation::IDENTITY
    }
    .apply(region);
}

/// Mirror a square region left to right.
pub fn mirror_horizontal(region: &mut PixelBuffer) {
    Orientation {
        flip_horizontal: true,
        ..Orientation::IDENTITY
    }
    .apply(region);
}

/// Mirror a square region top to bottom.
pub fn mirror_vertical(region: &mut PixelBuffer) {
    Orientation {
        flip_vertical: true,
        ..Orientation::IDENTITY
    }
    .apply(region);
}

fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() <= ANGLE_TOLERANCE_DEG
}

fn is_half_turn(degrees: f32) -> bool {
    degrees.is_finite() && approx(degrees.rem_euclid(360.0), 180.0)
}

/// Rebuild `region` so that `dst[x, y] = src[source_of(n, x, y)]`, with both
/// positions in grid (y-up) coordinates, then swap the result in.
fn remap(
    region: &mut PixelBuffer,
    scratch: &mut Vec<u8>,
    source_of: impl Fn(u32, u32, u32) -> (u32, u32),
) {
    let n = region.width;
    scratch.clear();
    scratch.resize(region.data.len(), 0);

    for y in 0..n {
        for x in 0..n {
            let (sx, sy) = source_of(n, x, y);
            let dst = grid_offset(n, x, y);
            let src = grid_offset(n, sx, sy);
            scratch[dst..dst + CHANNELS].copy_from_slice(&region.data[src..src + CHANNELS]);
        }
    }

    std::mem::swap(&mut region.data, scratch);
}

/// Byte offset of grid position `(x, y)` in a top-down `n × n` buffer.
fn grid_offset(n: u32, x: u32, y: u32) -> usize {
    ((n - 1 - y) as usize * n as usize + x as usize) * CHANNELS
}
