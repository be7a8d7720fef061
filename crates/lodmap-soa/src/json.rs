//! JSON light lists.
//!
//! A lighter interchange format holding only point lights:
//!
//! ```json
//! {"lights": [{"name": "lamp", "intensity": 2.0, "color": [1.0, 0.5, 0.0],
//!              "lod_distance": 100.0, "location": [0.0, 1.0, 2.0]}]}
//! ```

use serde::{Deserialize, Serialize};

use lodmap_math::{Point3, Vec3};

use crate::error::Result;
use crate::model::LightRecord;
use crate::numeric::{clamp_to_byte, name_hash};
use crate::settings::LightDefaults;

/// Top-level JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JsonLightList {
    /// Lights in file order.
    #[serde(default)]
    pub lights: Vec<JsonLight>,
}

/// One JSON light.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JsonLight {
    /// Light name.
    pub name: String,
    /// Intensity, imported as the falloff distance.
    pub intensity: f64,
    /// Linear color with components in `[0, 1]`.
    pub color: [f64; 3],
    /// Draw distance. Carried for completeness; the map format has no slot for it.
    pub lod_distance: f64,
    /// World position.
    pub location: [f64; 3],
}

impl Default for JsonLight {
    fn default() -> Self {
        Self {
            name: "LOD_Light".into(),
            intensity: 1.0,
            color: [1.0; 3],
            lod_distance: 100.0,
            location: [0.0; 3],
        }
    }
}

impl JsonLight {
    /// Positioned point-light record; the hash is derived from the name.
    pub fn to_record(&self, defaults: &LightDefaults) -> LightRecord {
        let mut record = LightRecord::new(name_hash(&self.name), Vec3::zeros(), defaults);
        record.falloff = self.intensity;
        record.position = Some(Point3::from(self.location));
        record.color_rgb = Some(self.color.map(|c| clamp_to_byte(c * 255.0)));
        record
    }
}

/// Read a JSON light list into positioned records.
pub fn read_json_lights(text: &str, defaults: &LightDefaults) -> Result<Vec<LightRecord>> {
    let list: JsonLightList = serde_json::from_str(text)?;
    Ok(list.lights.iter().map(|l| l.to_record(defaults)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FormatError;

    #[test]
    fn test_full_entry() {
        let text = r#"{"lights": [{"name": "lamp", "intensity": 2.5, "color": [1.0, 0.5, 0.0],
                        "lod_distance": 50.0, "location": [1.0, 2.0, 3.0]}]}"#;
        let records = read_json_lights(text, &LightDefaults::default()).unwrap();
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.hash, name_hash("lamp"));
        assert_eq!(r.falloff, 2.5);
        assert_eq!(r.position, Some(Point3::new(1.0, 2.0, 3.0)));
        assert_eq!(r.color_rgb, Some([255, 127, 0]));
        assert_eq!(r.intensity_byte, None);
        assert!(!r.is_spot());
    }

    #[test]
    fn test_defaults_fill_missing_keys() {
        let records = read_json_lights(r#"{"lights": [{}]}"#, &LightDefaults::default()).unwrap();
        let r = &records[0];
        assert_eq!(r.hash, name_hash("LOD_Light"));
        assert_eq!(r.falloff, 1.0);
        assert_eq!(r.position, Some(Point3::origin()));
        assert_eq!(r.color_rgb, Some([255, 255, 255]));
        assert_eq!(r.falloff_exponent, 64);
    }

    #[test]
    fn test_no_lights_key() {
        assert!(read_json_lights("{}", &LightDefaults::default()).unwrap().is_empty());
    }

    #[test]
    fn test_malformed_json() {
        let err = read_json_lights("{\"lights\": [", &LightDefaults::default()).unwrap_err();
        assert!(matches!(err, FormatError::Json(_)));
    }
}
