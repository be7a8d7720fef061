#![warn(missing_docs)]

//! Structure-of-arrays LOD light maps.
//!
//! A light map is a pair of XML documents: a LOD document with the per-light
//! shape columns and a distant companion with positions and packed colors.
//! This crate holds the typed record model and converts it to and from that
//! layout. File access lives one level up, in the `lodmap` crate.
//!
//! # Example
//!
//! ```
//! use lodmap_soa::{read_document, write_document, CodecSettings, MapDocument, resolve_names};
//! # use lodmap_soa::LightRecord;
//! # use lodmap_math::{Point3, Vec3};
//!
//! let settings = CodecSettings::default();
//! let mut light = LightRecord::new(1, -Vec3::z(), &settings.defaults);
//! light.position = Some(Point3::new(10.0, 0.0, 5.0));
//!
//! let names = resolve_names("hw1_lodlights", None);
//! let pair = MapDocument::from_records(&[light], &names, &settings).unwrap();
//! let xml = write_document(&pair.primary, &settings);
//!
//! let doc = read_document(&xml, &settings).unwrap();
//! assert_eq!(doc.header.parent.as_deref(), Some("hw1_distlodlights"));
//! ```

mod dom;
mod error;
mod json;
mod model;
mod naming;
mod numeric;
mod reader;
mod rgbi;
mod settings;
mod writer;

pub use error::{FormatError, Result};
pub use json::{read_json_lights, JsonLight, JsonLightList};
pub use model::{
    unit_or_zero, DistantLightRecord, DistantSection, LightRecord, MapDocument, MapExtents,
    MapHeader, SoaDocument, POINT_CONE,
};
pub use naming::{
    companion_name_for, is_companion_name, map_name_from_path, primary_name_for, resolve_names,
    MapNames,
};
pub use numeric::{
    clamp_to_byte, format_g6, name_hash, parse_locale_float, parse_truncated, parse_wide_int,
    to_signed32, to_unsigned32,
};
pub use reader::{merge_distant, read_document};
pub use rgbi::Rgbi;
pub use settings::{CodecSettings, HeaderFlags, LightDefaults};
pub use writer::write_document;
