//! Per-cell transform as the grid stores it.
//!
//! The grid keeps the decomposed parts of each cell's affine matrix: an Euler
//! rotation in degrees and a 2D scale. Mapping these onto the four supported
//! pixel orientations is a render-time concern.

use serde::{Deserialize, Serialize};

/// Rotation (degrees, Euler `x`/`y`/`z`) and scale of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CellTransform {
    /// Euler rotation in degrees around the x, y, and z axes.
    #[serde(default)]
    pub rotation: [f32; 3],

    /// Scale along x and y. Negative values mirror the cell.
    #[serde(default = "unit_scale")]
    pub scale: [f32; 2],
}

fn unit_scale() -> [f32; 2] {
    [1.0, 1.0]
}

impl CellTransform {
    /// No rotation, unit scale.
    pub const IDENTITY: CellTransform = CellTransform {
        rotation: [0.0, 0.0, 0.0],
        scale: [1.0, 1.0],
    };

    /// Rotation around the z axis. Positive angles turn counter-clockwise.
    pub fn rotated(degrees: f32) -> Self {
        Self {
            rotation: [0.0, 0.0, degrees],
            ..Self::IDENTITY
        }
    }

    /// Copy of this transform with the x scale negated.
    pub fn flipped_x(mut self) -> Self {
        self.scale[0] = -self.scale[0];
        self
    }

    /// Copy of this transform with the y scale negated.
    pub fn flipped_y(mut self) -> Self {
        self.scale[1] = -self.scale[1];
        self
    }

    /// Rotation around the z axis in degrees.
    pub fn rotation_z(&self) -> f32 {
        self.rotation[2]
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for CellTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
