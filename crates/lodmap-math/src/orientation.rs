//! Conversion between a light's stored direction and its orientation.
//!
//! A light shines along its local `-Z` axis. The map format only keeps the
//! world-space direction of that axis, so the roll around it is lost; the
//! orientation rebuilt here is the minimal rotation from `-Z` to the stored
//! direction.

use std::f64::consts::PI;

use crate::{Orientation, Tolerance, Vec3};

/// The local axis a light points along (`-Z`).
pub fn forward_axis() -> Vec3 {
    -Vec3::z()
}

/// Orientation that points a light's `-Z` axis along `direction`.
///
/// The direction does not need to be normalized. A zero vector has no
/// orientation; it maps to the identity rotation, which points the light
/// straight down `-Z`.
pub fn direction_to_orientation(direction: &Vec3) -> Orientation {
    let tol = Tolerance::DEFAULT;
    if tol.is_zero_vec(direction) {
        return Orientation::identity();
    }

    let target = direction.normalize();
    let forward = forward_axis();

    match Orientation::rotation_between(&forward, &target) {
        Some(rotation) => rotation,
        // Antiparallel: any half turn about an axis perpendicular to -Z works.
        None => Orientation::from_axis_angle(&Vec3::x_axis(), PI),
    }
}

/// World-space direction of a light's `-Z` axis under `orientation`.
pub fn orientation_to_direction(orientation: &Orientation) -> Vec3 {
    let d = orientation * forward_axis();
    let norm = d.norm();
    if norm > 0.0 {
        d / norm
    } else {
        forward_axis()
    }
}
