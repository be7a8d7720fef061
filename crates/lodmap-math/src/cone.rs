//! Spot cone encoding.
//!
//! The map stores a spot light's cone as two whole-degree angles. Scene
//! lights describe the same cone as a full opening angle in radians plus a
//! blend fraction (the share of the cone that fades out).

/// Spot light cone as the scene sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotParams {
    /// Cone angle in radians.
    pub size: f64,
    /// Fraction of the cone that is soft, in `0.0..=1.0`.
    pub blend: f64,
}

/// Spot parameters for a stored cone (`inner_deg`, `outer_deg`).
///
/// An outer angle of zero has no meaningful blend and yields `0.5`.
pub fn spot_params_from_cone(inner_deg: u32, outer_deg: u32) -> SpotParams {
    let outer = outer_deg as f64;
    let inner = inner_deg as f64;
    let blend = if outer_deg > 0 {
        ((outer - inner) / outer).clamp(0.0, 1.0)
    } else {
        0.5
    };
    SpotParams {
        size: outer.to_radians(),
        blend,
    }
}

/// Stored cone angles (`inner_deg`, `outer_deg`) for spot parameters,
/// rounded to the nearest whole degree.
pub fn cone_from_spot_params(size: f64, blend: f64) -> (u32, u32) {
    let blend = blend.clamp(0.0, 1.0);
    let outer = size.to_degrees().round().max(0.0);
    let inner = (size * (1.0 - blend)).to_degrees().round().max(0.0);
    (inner as u32, outer as u32)
}
