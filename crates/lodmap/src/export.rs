//! Map export: writes the LOD document and its distant companion.

use std::path::{Path, PathBuf};

use lodmap_soa::{resolve_names, write_document, CodecSettings, LightRecord, MapDocument, MapNames};

use crate::error::{ExportError, Stage};
use crate::store::{FsStore, MapStore};

/// Export lights to `output_dir` with default settings.
///
/// Returns the paths of the LOD document and the distant document.
pub fn export_map(
    records: &[LightRecord],
    output_dir: impl AsRef<Path>,
    collection_name: &str,
) -> Result<(PathBuf, PathBuf), ExportError> {
    let names = resolve_names(collection_name, None);
    export_map_with(
        &mut FsStore,
        records,
        output_dir.as_ref(),
        &names,
        &CodecSettings::default(),
    )
}

/// Export lights under explicit names.
///
/// Both documents are built before anything is written, so invalid input
/// (no lights, or a light without a position) leaves the store untouched.
/// The primary is written first; if the companion write then fails, the
/// primary is removed again and the companion's error is returned.
pub fn export_map_with<S: MapStore + ?Sized>(
    store: &mut S,
    records: &[LightRecord],
    output_dir: &Path,
    names: &MapNames,
    settings: &CodecSettings,
) -> Result<(PathBuf, PathBuf), ExportError> {
    let pair = MapDocument::from_records(records, names, settings)
        .map_err(|e| ExportError::new(output_dir, Stage::Build, e))?;

    let primary_path = output_dir.join(settings.file_name(&names.primary));
    let companion_path = output_dir.join(settings.file_name(&names.companion));
    let primary_xml = write_document(&pair.primary, settings);
    let companion_xml = write_document(&pair.companion, settings);

    store
        .write(&primary_path, &primary_xml)
        .map_err(|e| ExportError::new(&primary_path, Stage::Write, e))?;
    if let Err(e) = store.write(&companion_path, &companion_xml) {
        if let Err(cleanup) = store.remove(&primary_path) {
            log::warn!("could not remove {}: {cleanup}", primary_path.display());
        }
        return Err(ExportError::new(&companion_path, Stage::Write, e));
    }

    log::info!(
        "wrote {} lights to {} and {}",
        records.len(),
        primary_path.display(),
        companion_path.display()
    );
    Ok((primary_path, companion_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::import::import_map_with;
    use crate::store::MemoryStore;
    use lodmap_math::{Point3, Vec3};
    use lodmap_soa::{read_document, FormatError};
    use std::io;

    /// Memory store whose writes to one path fail.
    struct ReadOnlyPath {
        inner: MemoryStore,
        denied: PathBuf,
    }

    impl MapStore for ReadOnlyPath {
        fn read_to_string(&self, path: &Path) -> io::Result<String> {
            self.inner.read_to_string(path)
        }

        fn write(&mut self, path: &Path, contents: &str) -> io::Result<()> {
            if path == self.denied {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.inner.write(path, contents)
        }

        fn remove(&mut self, path: &Path) -> io::Result<()> {
            self.inner.remove(path)
        }
    }

    fn light(hash: i64, x: f64) -> LightRecord {
        let mut r = LightRecord::new(hash, -Vec3::z(), &CodecSettings::default().defaults);
        r.position = Some(Point3::new(x, 0.0, 0.0));
        r.color_rgb = Some([10, 20, 30]);
        r.intensity_byte = Some(40);
        r
    }

    #[test]
    fn test_export_writes_pair() {
        let mut store = MemoryStore::new();
        let settings = CodecSettings::default();
        let names = resolve_names("hw1_lodlights", None);
        let (primary, companion) = export_map_with(
            &mut store,
            &[light(1, 0.0), light(2, 100.0)],
            Path::new("out"),
            &names,
            &settings,
        )
        .unwrap();
        assert_eq!(primary, PathBuf::from("out/hw1_lodlights.ymap.xml"));
        assert_eq!(companion, PathBuf::from("out/hw1_distlodlights.ymap.xml"));

        let doc = read_document(store.get(&primary).unwrap(), &settings).unwrap();
        let extents = doc.extents.unwrap();
        assert_eq!(extents.entities.min, Point3::new(0.0, 0.0, 0.0));
        assert_eq!(extents.entities.max, Point3::new(100.0, 0.0, 0.0));
        assert_eq!(extents.streaming.min, Point3::new(-2000.0, -2000.0, -2000.0));
        assert_eq!(extents.streaming.max, Point3::new(2100.0, 2000.0, 2000.0));
        assert_eq!(doc.header.parent.as_deref(), Some("hw1_distlodlights"));
    }

    #[test]
    fn test_empty_export_writes_nothing() {
        let mut store = MemoryStore::new();
        let names = resolve_names("empty", None);
        let settings = CodecSettings::default();
        let err =
            export_map_with(&mut store, &[], Path::new("out"), &names, &settings).unwrap_err();
        assert_eq!(err.stage, Stage::Build);
        assert!(matches!(err.source, FormatError::EmptyInput));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unpositioned_light_writes_nothing() {
        let mut store = MemoryStore::new();
        let mut bad = light(3, 1.0);
        bad.position = None;
        let names = resolve_names("a", None);
        let records = [light(1, 0.0), bad];
        let settings = CodecSettings::default();
        let err = export_map_with(&mut store, &records, Path::new("out"), &names, &settings)
            .unwrap_err();
        assert!(matches!(err.source, FormatError::Unpositioned(1)));
        assert!(store.is_empty());
    }

    #[test]
    fn test_failed_companion_write_removes_primary() {
        let names = resolve_names("hw1_lodlights", None);
        let mut store = ReadOnlyPath {
            inner: MemoryStore::new(),
            denied: PathBuf::from("out/hw1_distlodlights.ymap.xml"),
        };
        let settings = CodecSettings::default();
        let records = [light(1, 0.0)];
        let err = export_map_with(&mut store, &records, Path::new("out"), &names, &settings)
            .unwrap_err();
        assert_eq!(err.stage, Stage::Write);
        assert_eq!(err.path, store.denied);
        assert!(matches!(err.source, FormatError::Io(_)));
        assert!(store.inner.is_empty());
    }

    #[test]
    fn test_export_then_import() {
        let mut store = MemoryStore::new();
        let settings = CodecSettings::default();
        let input = vec![light(5, -3.5), light(6, 12.25), light(7, 40.0)];
        let names = resolve_names("city_lod", None);
        let (primary, _) =
            export_map_with(&mut store, &input, Path::new("maps"), &names, &settings).unwrap();

        let map = import_map_with(&store, &primary, &settings).unwrap();
        assert_eq!(map.names(), names);
        assert_eq!(map.records, input);
    }

    #[test]
    fn test_export_to_filesystem() {
        let dir = std::env::temp_dir().join(format!("lodmap-export-{}", std::process::id()));
        let (primary, companion) = export_map(&[light(1, 0.0)], &dir, "street_lodlights").unwrap();
        assert!(primary.ends_with("street_lodlights.ymap.xml"));
        assert!(companion.ends_with("street_distlodlights.ymap.xml"));

        let records = crate::import::import_map(&primary).unwrap();
        assert_eq!(records, vec![light(1, 0.0)]);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
