//! In-memory light map model.
//!
//! A map is stored as a pair of documents. The LOD document carries the
//! per-light shape columns ([`LightRecord`]); its distant companion carries
//! positions and packed colors ([`DistantLightRecord`]). Rows in the two
//! documents are matched by index only.

use lodmap_math::{Aabb3, Point3, Vec3};

use crate::error::{FormatError, Result};
use crate::naming::MapNames;
use crate::rgbi::Rgbi;
use crate::settings::{CodecSettings, HeaderFlags, LightDefaults};

/// Cone angles (`inner`, `outer`) that mark a point light. Any wider cone
/// makes the light a spot.
pub const POINT_CONE: (u32, u32) = (14, 35);

/// One LOD light.
#[derive(Debug, Clone, PartialEq)]
pub struct LightRecord {
    /// Direction the light faces: unit length, or zero for no orientation.
    pub direction: Vec3,
    /// Light hash, wide enough to hold both signed and unsigned 32-bit forms.
    pub hash: i64,
    /// Falloff distance.
    pub falloff: f64,
    /// Falloff exponent.
    pub falloff_exponent: u8,
    /// Inner cone angle in degrees.
    pub cone_inner_deg: u32,
    /// Outer cone angle (or capsule extent) in degrees.
    pub cone_outer_deg: u32,
    /// Corona intensity.
    pub corona_intensity: u8,
    /// Time-of-day and state bit flags.
    pub time_state_flags: u32,
    /// World position; `None` until merged with distant data.
    pub position: Option<Point3>,
    /// Color bytes; `None` until merged with distant data.
    pub color_rgb: Option<[u8; 3]>,
    /// Intensity byte of the packed RGBI word; `None` until merged.
    pub intensity_byte: Option<u8>,
}

impl LightRecord {
    /// Record with every column at its default value.
    ///
    /// A nonzero `direction` is normalized.
    pub fn new(hash: i64, direction: Vec3, defaults: &LightDefaults) -> Self {
        Self {
            direction: unit_or_zero(&direction),
            hash,
            falloff: defaults.falloff,
            falloff_exponent: defaults.falloff_exponent,
            cone_inner_deg: defaults.cone_inner_deg,
            cone_outer_deg: defaults.cone_outer_deg,
            corona_intensity: defaults.corona_intensity,
            time_state_flags: defaults.time_state_flags,
            position: None,
            color_rgb: None,
            intensity_byte: None,
        }
    }

    /// True when the cone is wider than [`POINT_CONE`].
    pub fn is_spot(&self) -> bool {
        self.cone_outer_deg > POINT_CONE.1 || self.cone_inner_deg > POINT_CONE.0
    }

    /// Packed color/intensity, white with zero intensity where unset.
    pub fn rgbi(&self) -> Rgbi {
        Rgbi::new(
            self.color_rgb.unwrap_or([255, 255, 255]),
            self.intensity_byte.unwrap_or(0),
        )
    }

    /// Take color and intensity from a packed RGBI word.
    pub fn set_rgbi(&mut self, word: u32) {
        let rgbi = Rgbi::unpack(word);
        self.color_rgb = Some(rgbi.rgb());
        self.intensity_byte = Some(rgbi.intensity);
    }
}

/// Normalize a vector, leaving (near-)zero vectors at exactly zero.
pub fn unit_or_zero(v: &Vec3) -> Vec3 {
    v.try_normalize(f64::EPSILON).unwrap_or_else(Vec3::zeros)
}

/// One distant light.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistantLightRecord {
    /// World position.
    pub position: Point3,
    /// Packed RGBI word.
    pub packed_color_intensity: u32,
    /// Light category.
    pub category: u8,
}

/// Columns of a `DistantLODLightsSOA` section.
///
/// The position and RGBI arrays are kept separately because files in the
/// wild do not always give them the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DistantSection {
    /// Light positions.
    pub positions: Vec<Point3>,
    /// Packed RGBI words.
    pub rgbi: Vec<u32>,
    /// Street light count.
    pub num_street_lights: u32,
    /// Section category.
    pub category: u8,
}

impl DistantSection {
    /// Build a section from complete rows.
    pub fn from_records(records: &[DistantLightRecord], category: u8) -> Self {
        Self {
            positions: records.iter().map(|r| r.position).collect(),
            rgbi: records.iter().map(|r| r.packed_color_intensity).collect(),
            num_street_lights: 0,
            category,
        }
    }

    /// True when the section holds no positions.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Bounds of a map: the lights themselves and the padded streaming box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapExtents {
    /// Bounds of all light positions.
    pub entities: Aabb3,
    /// `entities` grown by the streaming margin.
    pub streaming: Aabb3,
}

impl MapExtents {
    /// Extents of a set of positions, or [`FormatError::EmptyInput`] when
    /// there are none.
    pub fn from_positions<'a>(
        positions: impl IntoIterator<Item = &'a Point3>,
        margin: f64,
    ) -> Result<Self> {
        let entities = Aabb3::from_points(positions).ok_or(FormatError::EmptyInput)?;
        Ok(Self {
            entities,
            streaming: entities.expanded(margin),
        })
    }
}

/// Header fields of a map document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapHeader {
    /// Map name.
    pub name: String,
    /// Companion map name, if this document references one.
    pub parent: Option<String>,
    /// Map flags.
    pub flags: u32,
    /// Content flags.
    pub content_flags: u32,
}

impl MapHeader {
    fn new(name: &str, parent: Option<&str>, flags: HeaderFlags) -> Self {
        Self {
            name: name.to_string(),
            parent: parent.map(str::to_string),
            flags: flags.flags,
            content_flags: flags.content_flags,
        }
    }
}

/// One parsed or about-to-be-written map document.
#[derive(Debug, Clone, PartialEq)]
pub struct SoaDocument {
    /// Header.
    pub header: MapHeader,
    /// Extents as stored in (or to be written to) the file.
    pub extents: Option<MapExtents>,
    /// LOD light rows; `None` when the `direction` column is absent.
    pub lod_lights: Option<Vec<LightRecord>>,
    /// Distant light columns.
    pub distant: DistantSection,
}

impl SoaDocument {
    /// Center of the stored entity extents, or the origin.
    pub fn center(&self) -> Point3 {
        self.extents
            .map(|e| e.entities.center())
            .unwrap_or_else(Point3::origin)
    }
}

/// A LOD document and its distant companion.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDocument {
    /// LOD light document; its header references the companion.
    pub primary: SoaDocument,
    /// Distant light document.
    pub companion: SoaDocument,
}

impl MapDocument {
    /// Build the document pair for a set of positioned lights.
    ///
    /// Extents are derived from the records. Fails with
    /// [`FormatError::EmptyInput`] for an empty slice and
    /// [`FormatError::Unpositioned`] when any record lacks a position.
    pub fn from_records(
        records: &[LightRecord],
        names: &MapNames,
        settings: &CodecSettings,
    ) -> Result<Self> {
        if records.is_empty() {
            return Err(FormatError::EmptyInput);
        }

        let positions = records
            .iter()
            .enumerate()
            .map(|(i, r)| r.position.ok_or(FormatError::Unpositioned(i)))
            .collect::<Result<Vec<_>>>()?;
        let extents = MapExtents::from_positions(&positions, settings.streaming_margin)?;

        let lod_lights = records
            .iter()
            .map(|r| LightRecord {
                direction: unit_or_zero(&r.direction),
                ..r.clone()
            })
            .collect();

        let distant: Vec<DistantLightRecord> = records
            .iter()
            .zip(&positions)
            .map(|(r, &position)| DistantLightRecord {
                position,
                packed_color_intensity: r.rgbi().pack(),
                category: settings.distant_category,
            })
            .collect();

        let primary = SoaDocument {
            header: MapHeader::new(&names.primary, Some(&names.companion), settings.primary_flags),
            extents: Some(extents),
            lod_lights: Some(lod_lights),
            distant: DistantSection::default(),
        };
        let companion = SoaDocument {
            header: MapHeader::new(&names.companion, None, settings.companion_flags),
            extents: Some(extents),
            lod_lights: Some(Vec::new()),
            distant: DistantSection::from_records(&distant, settings.distant_category),
        };

        Ok(Self { primary, companion })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names() -> MapNames {
        MapNames {
            primary: "foo_lodlights".into(),
            companion: "foo_distlodlights".into(),
        }
    }

    fn positioned(x: f64) -> LightRecord {
        let mut r = LightRecord::new(7, -Vec3::z(), &LightDefaults::default());
        r.position = Some(Point3::new(x, 0.0, 0.0));
        r
    }

    #[test]
    fn test_point_spot_classification() {
        let mut r = LightRecord::new(0, Vec3::zeros(), &LightDefaults::default());
        assert!(!r.is_spot());
        r.cone_outer_deg = 36;
        assert!(r.is_spot());
        r.cone_outer_deg = 35;
        r.cone_inner_deg = 15;
        assert!(r.is_spot());
    }

    #[test]
    fn test_new_normalizes_direction() {
        let r = LightRecord::new(0, Vec3::new(0.0, 0.0, -4.0), &LightDefaults::default());
        assert_eq!(r.direction, -Vec3::z());
        let z = LightRecord::new(0, Vec3::zeros(), &LightDefaults::default());
        assert_eq!(z.direction, Vec3::zeros());
    }

    #[test]
    fn test_set_rgbi() {
        let mut r = LightRecord::new(1, Vec3::zeros(), &LightDefaults::default());
        assert_eq!(r.rgbi(), Rgbi::new([255, 255, 255], 0));
        let word = Rgbi::new([10, 20, 30], 40).pack();
        r.set_rgbi(word);
        assert_eq!(r.color_rgb, Some([10, 20, 30]));
        assert_eq!(r.intensity_byte, Some(40));
        assert_eq!(r.rgbi().pack(), word);
    }

    #[test]
    fn test_extents_from_two_lights() {
        let records = [positioned(0.0), positioned(100.0)];
        let doc = MapDocument::from_records(&records, &names(), &CodecSettings::default()).unwrap();
        let e = doc.primary.extents.unwrap();
        assert_eq!(e.entities.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(e.entities.max, Point3::new(100.0, 0.0, 0.0));
        assert_eq!(e.streaming.min, Point3::new(-2000.0, -2000.0, -2000.0));
        assert_eq!(e.streaming.max, Point3::new(2100.0, 2000.0, 2000.0));
        assert_eq!(doc.companion.extents, Some(e));
    }

    #[test]
    fn test_document_pair_layout() {
        let doc =
            MapDocument::from_records(&[positioned(5.0)], &names(), &CodecSettings::default())
                .unwrap();
        assert_eq!(doc.primary.header.parent.as_deref(), Some("foo_distlodlights"));
        assert_eq!(doc.primary.header.flags, 1);
        assert_eq!(doc.primary.header.content_flags, 128);
        assert!(doc.primary.distant.is_empty());
        assert_eq!(doc.companion.header.parent, None);
        assert_eq!(doc.companion.header.flags, 3);
        assert_eq!(doc.companion.lod_lights.as_deref(), Some(&[][..]));
        assert_eq!(doc.companion.distant.category, 1);
        assert_eq!(doc.companion.distant.rgbi, vec![Rgbi::new([255, 255, 255], 0).pack()]);
    }

    #[test]
    fn test_empty_records() {
        let err = MapDocument::from_records(&[], &names(), &CodecSettings::default()).unwrap_err();
        assert!(matches!(err, FormatError::EmptyInput));
    }

    #[test]
    fn test_unpositioned_record() {
        let r = LightRecord::new(0, Vec3::zeros(), &LightDefaults::default());
        let records = [positioned(1.0), r];
        let err = MapDocument::from_records(&records, &names(), &CodecSettings::default())
            .unwrap_err();
        assert!(matches!(err, FormatError::Unpositioned(1)));
    }
}
