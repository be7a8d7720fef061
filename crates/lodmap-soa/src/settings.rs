//! Codec settings.
//!
//! Every constant the map format relies on lives here so a caller can
//! override it from a TOML snippet. Missing keys keep their defaults.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::POINT_CONE;

/// Values used for per-light columns that are shorter than `direction`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightDefaults {
    /// Falloff distance.
    pub falloff: f64,
    /// Falloff exponent.
    pub falloff_exponent: u8,
    /// Corona intensity.
    pub corona_intensity: u8,
    /// Time-of-day and state bit flags.
    pub time_state_flags: u32,
    /// Inner cone angle in degrees.
    pub cone_inner_deg: u32,
    /// Outer cone angle in degrees.
    pub cone_outer_deg: u32,
}

impl Default for LightDefaults {
    fn default() -> Self {
        Self {
            falloff: 2.3,
            falloff_exponent: 64,
            corona_intensity: 0,
            time_state_flags: 149_946_431,
            cone_inner_deg: POINT_CONE.0,
            cone_outer_deg: POINT_CONE.1,
        }
    }
}

/// `flags` / `contentFlags` pair written into a map header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFlags {
    /// Map flags.
    pub flags: u32,
    /// Content flags.
    pub content_flags: u32,
}

/// Settings shared by the reader and the writer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecSettings {
    /// File extension of map documents, without the leading dot.
    pub extension: String,
    /// Distance the streaming box extends past the light bounds.
    pub streaming_margin: f64,
    /// Grid spacing for lights that have no stored position.
    pub fallback_spacing: f64,
    /// Grid width (in lights) for lights that have no stored position.
    pub fallback_columns: usize,
    /// Column defaults.
    pub defaults: LightDefaults,
    /// Header flags of the LOD light document.
    pub primary_flags: HeaderFlags,
    /// Header flags of the distant light document.
    pub companion_flags: HeaderFlags,
    /// `category` written into a populated distant section.
    pub distant_category: u8,
    /// `block/version` value.
    pub block_version: u32,
}

impl Default for CodecSettings {
    fn default() -> Self {
        Self {
            extension: "ymap.xml".into(),
            streaming_margin: 2000.0,
            fallback_spacing: 5.0,
            fallback_columns: 10,
            defaults: LightDefaults::default(),
            primary_flags: HeaderFlags {
                flags: 1,
                content_flags: 128,
            },
            companion_flags: HeaderFlags {
                flags: 3,
                content_flags: 256,
            },
            distant_category: 1,
            block_version: 1_040_236_171,
        }
    }
}

impl CodecSettings {
    /// Load settings from TOML, keeping defaults for absent keys.
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// File name for a map called `name`.
    pub fn file_name(&self, name: &str) -> String {
        format!("{}.{}", name, self.extension)
    }
}
