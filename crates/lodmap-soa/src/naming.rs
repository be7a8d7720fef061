//! Map naming conventions.
//!
//! A LOD map and its distant companion are linked by name. The LOD document
//! stores the companion's name in its `parent` element; when that link is
//! missing the companion name is derived from the LOD map's name.

use std::path::Path;

/// Names of a LOD map and its distant companion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapNames {
    /// LOD light map name.
    pub primary: String,
    /// Distant light map name.
    pub companion: String,
}

/// Resolve the output names for a collection.
///
/// A stored back-reference to the companion is used verbatim. Otherwise the
/// companion name is derived from `collection`, unless `collection` is itself
/// a distant map name, in which case the LOD name is derived from it.
pub fn resolve_names(collection: &str, stored_companion: Option<&str>) -> MapNames {
    match stored_companion.filter(|c| !c.trim().is_empty()) {
        Some(companion) => MapNames {
            primary: collection.to_string(),
            companion: companion.to_string(),
        },
        None if is_companion_name(collection) => MapNames {
            primary: primary_name_for(collection),
            companion: collection.to_string(),
        },
        None => MapNames {
            primary: collection.to_string(),
            companion: companion_name_for(collection),
        },
    }
}

/// Derive a distant map name from a LOD map name.
pub fn companion_name_for(primary: &str) -> String {
    replace_ignore_case(primary, "lodlights", "distlodlights")
        .or_else(|| replace_ignore_case(primary, "_lod", "_dist"))
        .unwrap_or_else(|| format!("{primary}_distantlights"))
}

/// Derive a LOD map name from a distant map name.
pub fn primary_name_for(companion: &str) -> String {
    if let Some(replaced) = replace_ignore_case(companion, "distlodlights", "lodlights") {
        return replaced;
    }
    if let Some(base) = strip_suffix_ignore_case(companion, "_distantlights") {
        return base.to_string();
    }
    replace_ignore_case(companion, "_dist", "_lod")
        .unwrap_or_else(|| format!("{companion}_lodlights"))
}

/// True for names that follow a distant map convention.
pub fn is_companion_name(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    lower.contains("distlodlights") || lower.ends_with("_distantlights")
}

/// Map name for a file: the file name without `.ymap.xml`, `.xml` or `.json`.
pub fn map_name_from_path(path: &Path) -> String {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    match strip_suffix_ignore_case(&stem, ".ymap") {
        Some(base) => base.to_string(),
        None => stem,
    }
}

/// Replace every case-insensitive occurrence of `needle`; `None` if absent.
fn replace_ignore_case(haystack: &str, needle: &str, replacement: &str) -> Option<String> {
    // ASCII lowercasing keeps byte offsets aligned with `haystack`.
    let lower = haystack.to_ascii_lowercase();
    let needle = needle.to_ascii_lowercase();

    let mut out = String::with_capacity(haystack.len() + replacement.len());
    let mut last = 0;
    let mut found = false;
    for (start, _) in lower.match_indices(&needle) {
        out.push_str(&haystack[last..start]);
        out.push_str(replacement);
        last = start + needle.len();
        found = true;
    }
    if !found {
        return None;
    }
    out.push_str(&haystack[last..]);
    Some(out)
}

fn strip_suffix_ignore_case<'a>(s: &'a str, suffix: &str) -> Option<&'a str> {
    let cut = s.len().checked_sub(suffix.len())?;
    (s.is_char_boundary(cut) && s[cut..].eq_ignore_ascii_case(suffix)).then(|| &s[..cut])
}
