#![warn(missing_docs)]

//! lodmap: import and export of paired LOD light maps.
//!
//! A LOD light map is written as two files. The LOD document holds each
//! light's shape (direction, falloff, cone, flags, hash) and names its
//! distant companion, which holds positions and packed colors. Import reads
//! both and merges them by index; export derives extents and writes both.
//!
//! # Example
//!
//! ```no_run
//! use lodmap::{export_map, import_map, SceneLight};
//!
//! let records = import_map("maps/hw1_lodlights.ymap.xml").unwrap();
//! let lights: Vec<SceneLight> = records.iter().map(SceneLight::from_record).collect();
//!
//! let back: Vec<_> = lights.iter().map(SceneLight::to_record).collect();
//! let (primary, companion) = export_map(&back, "out", "hw1_lodlights").unwrap();
//! println!("{} {}", primary.display(), companion.display());
//! ```

mod error;
mod export;
mod import;
mod scene;
mod store;

pub use error::{ExportError, ImportError, Stage};
pub use export::{export_map, export_map_with};
pub use import::{
    import_batch, import_json_with, import_map, import_map_with, BatchReport, ImportedMap,
};
pub use scene::{LightKind, LodProperties, SceneLight};
pub use store::{FsStore, MapStore, MemoryStore};

pub use lodmap_math as math;
pub use lodmap_soa as soa;
pub use lodmap_soa::{CodecSettings, FormatError, LightRecord, MapNames};
