//! Map document reader: converts XML text to a [`SoaDocument`].

use lodmap_math::{Aabb3, Point3, Vec3};

use crate::dom::Element;
use crate::error::{FormatError, Result};
use crate::model::{
    unit_or_zero, DistantSection, LightRecord, MapExtents, MapHeader, SoaDocument,
};
use crate::numeric::{
    clamp_to_byte, parse_locale_float, parse_truncated, parse_wide_int, to_unsigned32,
};
use crate::settings::{CodecSettings, LightDefaults};

/// Read a map document from XML text.
///
/// Only the XML structure and the root element are required. A missing
/// `LODLightsSOA/direction` column leaves [`SoaDocument::lod_lights`] as
/// `None`; a missing `DistantLODLightsSOA` leaves [`SoaDocument::distant`]
/// empty. Shorter per-light columns are padded from `settings.defaults`.
pub fn read_document(xml: &str, settings: &CodecSettings) -> Result<SoaDocument> {
    let root = Element::parse(xml)?;

    let header = read_header(&root)?;
    let extents = read_extents(&root, settings.streaming_margin)?;
    let lod_lights = match root.find("LODLightsSOA") {
        Some(section) => read_lod_lights(section, &settings.defaults)?,
        None => None,
    };
    let distant = match root.find("DistantLODLightsSOA") {
        Some(section) => read_distant(section)?,
        None => DistantSection::default(),
    };

    Ok(SoaDocument {
        header,
        extents,
        lod_lights,
        distant,
    })
}

/// Give every record a position and color.
///
/// Row `i` takes `positions[i]` and `rgbi[i]` from `distant` where present.
/// Rows past the end of the position column are laid out on a grid around
/// `center`; rows past the end of the RGBI column keep no color.
pub fn merge_distant(
    records: &mut [LightRecord],
    distant: &DistantSection,
    center: Point3,
    settings: &CodecSettings,
) {
    let columns = settings.fallback_columns.max(1);
    for (i, record) in records.iter_mut().enumerate() {
        record.position = Some(match distant.positions.get(i) {
            Some(&p) => p,
            None => {
                let col = (i % columns) as f64;
                let row = (i / columns) as f64;
                Point3::new(
                    center.x + col * settings.fallback_spacing,
                    center.y + row * settings.fallback_spacing,
                    center.z,
                )
            }
        });
        if let Some(&word) = distant.rgbi.get(i) {
            record.set_rgbi(word);
        }
    }
}

fn read_header(root: &Element) -> Result<MapHeader> {
    Ok(MapHeader {
        name: root
            .child("name")
            .and_then(Element::non_empty_text)
            .unwrap_or_default()
            .to_string(),
        parent: root
            .child("parent")
            .and_then(Element::non_empty_text)
            .map(str::to_string),
        flags: read_value(root, "flags")?.map(to_unsigned32).unwrap_or(0),
        content_flags: read_value(root, "contentFlags")?.map(to_unsigned32).unwrap_or(0),
    })
}

/// `<tag value="..."/>` integer scalar.
fn read_value(parent: &Element, tag: &str) -> Result<Option<i64>> {
    parent
        .child(tag)
        .and_then(|e| e.attr("value"))
        .map(|v| parse_wide_int(tag, v))
        .transpose()
}

fn read_extents(root: &Element, margin: f64) -> Result<Option<MapExtents>> {
    let entities = read_bounds(root, "entitiesExtentsMin", "entitiesExtentsMax")?;
    let streaming = read_bounds(root, "streamingExtentsMin", "streamingExtentsMax")?;
    Ok(entities.map(|entities| MapExtents {
        entities,
        streaming: streaming.unwrap_or_else(|| entities.expanded(margin)),
    }))
}

fn read_bounds(root: &Element, min_tag: &str, max_tag: &str) -> Result<Option<Aabb3>> {
    let (Some(min), Some(max)) = (root.child(min_tag), root.child(max_tag)) else {
        return Ok(None);
    };
    Ok(Some(Aabb3::new(
        read_xyz_attrs(min, min_tag)?.into(),
        read_xyz_attrs(max, max_tag)?.into(),
    )))
}

/// `x`/`y`/`z` attributes of one element; missing ones read as zero.
fn read_xyz_attrs(element: &Element, field: &str) -> Result<Vec3> {
    let axis = |key: &str| -> Result<f64> {
        element
            .attr(key)
            .map(|v| parse_locale_float(field, v))
            .transpose()
            .map(|v| v.unwrap_or(0.0))
    };
    Ok(Vec3::new(axis("x")?, axis("y")?, axis("z")?))
}

/// `<Item><x value=".."/><y value=".."/><z value=".."/></Item>`; missing
/// components read as zero.
fn read_xyz_item(item: &Element, field: &str) -> Result<Vec3> {
    let axis = |key: &str| -> Result<f64> {
        item.child(key)
            .and_then(|c| c.attr("value"))
            .map(|v| parse_locale_float(field, v))
            .transpose()
            .map(|v| v.unwrap_or(0.0))
    };
    Ok(Vec3::new(axis("x")?, axis("y")?, axis("z")?))
}

fn read_items(section: &Element, tag: &str) -> Result<Vec<Vec3>> {
    match section.child(tag) {
        Some(list) => list
            .children_named("Item")
            .map(|item| read_xyz_item(item, tag))
            .collect(),
        None => Ok(Vec::new()),
    }
}

/// Whitespace-separated scalar column; absent or empty reads as no values.
fn read_column<T>(
    section: &Element,
    tag: &str,
    parse: impl Fn(&str, &str) -> Result<T>,
) -> Result<Vec<T>> {
    match section.child(tag) {
        Some(column) => column
            .text
            .split_whitespace()
            .map(|token| parse(tag, token))
            .collect(),
        None => Ok(Vec::new()),
    }
}

fn read_lod_lights(
    section: &Element,
    defaults: &LightDefaults,
) -> Result<Option<Vec<LightRecord>>> {
    if section.child("direction").is_none() {
        return Ok(None);
    }
    let directions = read_items(section, "direction")?;

    let hashes = read_column(section, "hash", parse_wide_int)?;
    let falloffs = read_column(section, "falloff", parse_locale_float)?;
    let exponents = read_column(section, "falloffExponent", parse_truncated)?;
    let flags = read_column(section, "timeAndStateFlags", parse_wide_int)?;
    let inner = read_column(section, "coneInnerAngle", parse_truncated)?;
    let outer = read_column(section, "coneOuterAngleOrCapExt", parse_truncated)?;
    let coronas = read_column(section, "coronaIntensity", parse_truncated)?;

    let records = directions
        .into_iter()
        .enumerate()
        .map(|(i, direction)| LightRecord {
            direction: unit_or_zero(&direction),
            hash: hashes.get(i).copied().unwrap_or(i as i64),
            falloff: falloffs.get(i).copied().unwrap_or(defaults.falloff),
            falloff_exponent: exponents
                .get(i)
                .map(|&v| clamp_to_byte(v))
                .unwrap_or(defaults.falloff_exponent),
            cone_inner_deg: inner
                .get(i)
                .map(|&v| v.max(0.0) as u32)
                .unwrap_or(defaults.cone_inner_deg),
            cone_outer_deg: outer
                .get(i)
                .map(|&v| v.max(0.0) as u32)
                .unwrap_or(defaults.cone_outer_deg),
            corona_intensity: coronas
                .get(i)
                .map(|&v| clamp_to_byte(v))
                .unwrap_or(defaults.corona_intensity),
            time_state_flags: flags
                .get(i)
                .map(|&v| to_unsigned32(v))
                .unwrap_or(defaults.time_state_flags),
            position: None,
            color_rgb: None,
            intensity_byte: None,
        })
        .collect();

    Ok(Some(records))
}

fn read_distant(section: &Element) -> Result<DistantSection> {
    let positions = read_items(section, "position")?
        .into_iter()
        .map(Point3::from)
        .collect();
    let rgbi = read_column(section, "RGBI", parse_wide_int)?
        .into_iter()
        .map(to_unsigned32)
        .collect();
    let num_street_lights = read_value(section, "numStreetLights")?
        .map(to_unsigned32)
        .unwrap_or(0);
    let category = read_value(section, "category")?
        .map(|v| u8::try_from(v).map_err(|_| FormatError::numeric("category", v.to_string())))
        .transpose()?
        .unwrap_or(0);

    Ok(DistantSection {
        positions,
        rgbi,
        num_street_lights,
        category,
    })
}
