#![warn(missing_docs)]

//! Math types for the lodmap light codec.
//!
//! Thin wrappers around nalgebra providing the geometry a light map needs:
//! points, vectors, orientations, bounding boxes, and the two lossy encodings
//! the map format uses for a light's shape (a direction vector in place of a
//! full rotation, and integer cone angles in place of spot parameters).

use nalgebra::{UnitQuaternion, Vector3};

mod bbox;
mod cone;
mod orientation;

pub use bbox::Aabb3;
pub use cone::{cone_from_spot_params, spot_params_from_cone, SpotParams};
pub use orientation::{direction_to_orientation, forward_axis, orientation_to_direction};

/// A point in 3D world space.
pub type Point3 = nalgebra::Point3<f64>;

/// A vector in 3D space.
pub type Vec3 = Vector3<f64>;

/// Rotation of a light relative to its rest pose.
pub type Orientation = UnitQuaternion<f64>;

/// Tolerance for geometric comparisons.
#[derive(Debug, Clone, Copy)]
pub struct Tolerance {
    /// Linear distance tolerance in world units.
    pub linear: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9 linear).
    pub const DEFAULT: Self = Self { linear: 1e-9 };

    /// Check if a vector is effectively the zero vector.
    pub fn is_zero_vec(&self, v: &Vec3) -> bool {
        v.norm() < self.linear
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}
