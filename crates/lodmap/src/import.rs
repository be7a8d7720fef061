//! Map import: primary document, companion lookup and position merge.

use std::path::{Path, PathBuf};

use lodmap_soa::{
    companion_name_for, map_name_from_path, merge_distant, read_document, read_json_lights,
    resolve_names, CodecSettings, DistantSection, FormatError, LightRecord, MapNames,
};

use crate::error::{ImportError, Stage};
use crate::store::{FsStore, MapStore};

/// Lights read from one file, with the names needed to write them back.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportedMap {
    /// Collection name: the file name without its map extension.
    pub name: String,
    /// Companion map name, as stored in the file or derived from `name`.
    pub companion_name: String,
    /// Positioned light records.
    pub records: Vec<LightRecord>,
}

impl ImportedMap {
    /// Names to export this map under.
    pub fn names(&self) -> MapNames {
        MapNames {
            primary: self.name.clone(),
            companion: self.companion_name.clone(),
        }
    }
}

/// Outcome of a batch import. Each file succeeds or fails on its own.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files that imported.
    pub imported: Vec<ImportedMap>,
    /// Files that did not.
    pub failed: Vec<ImportError>,
}

impl BatchReport {
    /// Total number of lights across all imported files.
    pub fn light_count(&self) -> usize {
        self.imported.iter().map(|m| m.records.len()).sum()
    }
}

/// Import a LOD map from the filesystem with default settings.
pub fn import_map(primary_path: impl AsRef<Path>) -> Result<Vec<LightRecord>, ImportError> {
    import_map_with(&FsStore, primary_path.as_ref(), &CodecSettings::default()).map(|m| m.records)
}

/// Import a LOD map and merge in its companion's positions and colors.
///
/// The companion is looked up next to `primary_path`, by the name stored
/// in the primary's `parent` element or, failing that, by the derived name.
/// A missing or unreadable companion is logged and the primary's own
/// distant section is used instead.
pub fn import_map_with<S: MapStore + ?Sized>(
    store: &S,
    primary_path: &Path,
    settings: &CodecSettings,
) -> Result<ImportedMap, ImportError> {
    let text = store
        .read_to_string(primary_path)
        .map_err(|e| ImportError::new(primary_path, Stage::Read, e))?;
    let doc = read_document(&text, settings)
        .map_err(|e| ImportError::new(primary_path, Stage::Parse, e))?;
    let center = doc.center();
    let mut records = doc.lod_lights.ok_or_else(|| {
        ImportError::new(
            primary_path,
            Stage::Parse,
            FormatError::missing("LODLightsSOA/direction"),
        )
    })?;

    let name = map_name_from_path(primary_path);
    let names = resolve_names(&name, doc.header.parent.as_deref());
    let companion_path = sibling(primary_path, &settings.file_name(&names.companion));

    let distant = if companion_path == primary_path {
        doc.distant
    } else {
        match load_companion(store, &companion_path, &names.companion, settings) {
            Ok(section) if !section.is_empty() => section,
            Ok(_) => {
                log::warn!(
                    "companion {} has no distant lights, using embedded section",
                    companion_path.display()
                );
                doc.distant
            }
            Err(e) => {
                log::warn!("{e}; using embedded section");
                doc.distant
            }
        }
    };

    log::debug!(
        "{}: {} lights, {} stored positions, {} colors",
        primary_path.display(),
        records.len(),
        distant.positions.len().min(records.len()),
        distant.rgbi.len().min(records.len()),
    );
    merge_distant(&mut records, &distant, center, settings);

    Ok(ImportedMap {
        name,
        companion_name: names.companion,
        records,
    })
}

fn load_companion<S: MapStore + ?Sized>(
    store: &S,
    path: &Path,
    name: &str,
    settings: &CodecSettings,
) -> Result<DistantSection, FormatError> {
    let text = store
        .read_to_string(path)
        .map_err(|e| FormatError::companion(name, e))?;
    let doc = read_document(&text, settings).map_err(|e| FormatError::companion(name, e))?;
    Ok(doc.distant)
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    match path.parent() {
        Some(dir) => dir.join(file_name),
        None => PathBuf::from(file_name),
    }
}

/// Import a JSON light list.
pub fn import_json_with<S: MapStore + ?Sized>(
    store: &S,
    path: &Path,
    settings: &CodecSettings,
) -> Result<ImportedMap, ImportError> {
    let text = store
        .read_to_string(path)
        .map_err(|e| ImportError::new(path, Stage::Read, e))?;
    let records = read_json_lights(&text, &settings.defaults)
        .map_err(|e| ImportError::new(path, Stage::Parse, e))?;
    let name = map_name_from_path(path);
    Ok(ImportedMap {
        companion_name: companion_name_for(&name),
        name,
        records,
    })
}

/// Import each file in turn, dispatching on the extension.
///
/// `.xml` files are read as maps and `.json` files as light lists. Any other
/// file, and any file that fails, is recorded in [`BatchReport::failed`]
/// without stopping the batch.
pub fn import_batch<S, P>(store: &S, paths: &[P], settings: &CodecSettings) -> BatchReport
where
    S: MapStore + ?Sized,
    P: AsRef<Path>,
{
    let mut report = BatchReport::default();
    for path in paths {
        let path = path.as_ref();
        let extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        let result = match extension.as_str() {
            "xml" => import_map_with(store, path, settings),
            "json" => import_json_with(store, path, settings),
            _ => Err(ImportError::new(
                path,
                Stage::Read,
                FormatError::UnsupportedFile(path.display().to_string()),
            )),
        };
        match result {
            Ok(map) => report.imported.push(map),
            Err(e) => {
                log::warn!("skipping {}: {e}", path.display());
                report.failed.push(e);
            }
        }
    }
    report
}
