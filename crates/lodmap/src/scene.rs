//! Scene-side view of a light.
//!
//! Editors describe a light by its transform and a small set of render
//! parameters. [`SceneLight`] is that shape; converting to and from
//! [`LightRecord`] reconstructs an orientation from the stored direction and
//! spot parameters from the stored cone angles.

use lodmap_math::{
    cone_from_spot_params, direction_to_orientation, orientation_to_direction,
    spot_params_from_cone, Orientation, Point3, SpotParams,
};
use lodmap_soa::{clamp_to_byte, name_hash, to_signed32, LightRecord, POINT_CONE};

/// Point or spot light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LightKind {
    /// Omnidirectional light.
    Point,
    /// Cone light.
    Spot(SpotParams),
}

/// Map-specific values carried on a scene light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LodProperties {
    /// Stored hash; `None` for lights created in the editor.
    pub hash: Option<i64>,
    /// Falloff exponent.
    pub falloff_exponent: u8,
    /// Corona intensity.
    pub corona_intensity: u8,
    /// Time-of-day and state bit flags.
    pub time_state_flags: u32,
    /// Intensity byte of the packed RGBI word.
    pub rgbi_intensity: u8,
}

/// A light as an editor sees it.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneLight {
    /// Display name.
    pub name: String,
    /// Point or spot.
    pub kind: LightKind,
    /// World position.
    pub location: Point3,
    /// Rotation from the rest pose, which faces `-Z`.
    pub rotation: Orientation,
    /// Linear color with components in `[0, 1]`.
    pub color: [f64; 3],
    /// Light energy; maps to the falloff distance.
    pub energy: f64,
    /// Map-specific values.
    pub lod: LodProperties,
}

impl SceneLight {
    /// Build a scene light from an imported record.
    ///
    /// An unmerged record is placed at the origin and colored white.
    pub fn from_record(record: &LightRecord) -> Self {
        let kind = if record.is_spot() {
            LightKind::Spot(spot_params_from_cone(
                record.cone_inner_deg,
                record.cone_outer_deg,
            ))
        } else {
            LightKind::Point
        };
        let rgb = record.color_rgb.unwrap_or([255, 255, 255]);

        Self {
            name: format!("LOD_Light_{}", record.hash),
            kind,
            location: record.position.unwrap_or_else(Point3::origin),
            rotation: direction_to_orientation(&record.direction),
            color: rgb.map(|c| f64::from(c) / 255.0),
            energy: record.falloff,
            lod: LodProperties {
                hash: Some(record.hash),
                falloff_exponent: record.falloff_exponent,
                corona_intensity: record.corona_intensity,
                time_state_flags: record.time_state_flags,
                rgbi_intensity: record.intensity_byte.unwrap_or(0),
            },
        }
    }

    /// Convert to a positioned record ready for export.
    ///
    /// Point lights get the point-light cone. Lights without a stored hash
    /// hash their name.
    pub fn to_record(&self) -> LightRecord {
        let (cone_inner_deg, cone_outer_deg) = match self.kind {
            LightKind::Point => POINT_CONE,
            LightKind::Spot(p) => cone_from_spot_params(p.size, p.blend),
        };
        LightRecord {
            direction: orientation_to_direction(&self.rotation),
            hash: self.lod.hash.unwrap_or_else(|| name_hash(&self.name)),
            falloff: self.energy,
            falloff_exponent: self.lod.falloff_exponent,
            cone_inner_deg,
            cone_outer_deg,
            corona_intensity: self.lod.corona_intensity,
            time_state_flags: self.lod.time_state_flags,
            position: Some(self.location),
            color_rgb: Some(self.color.map(|c| clamp_to_byte((c * 255.0).round()))),
            intensity_byte: Some(self.lod.rgbi_intensity),
        }
    }

    /// Hash as a signed 32-bit value, for hosts that cannot store larger ints.
    pub fn hash_i32(&self) -> Option<i32> {
        self.lod.hash.map(to_signed32)
    }
}
