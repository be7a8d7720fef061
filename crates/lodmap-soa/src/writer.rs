//! Map document writer.
//!
//! Output is indented by one space per level. Scalar columns are framed on
//! their own line so large maps stay diffable.

use quick_xml::escape::escape;

use lodmap_math::{Aabb3, Point3, Vec3};

use crate::model::{DistantSection, LightRecord, MapHeader, SoaDocument};
use crate::numeric::format_g6;
use crate::settings::CodecSettings;

const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
const FLOAT_XYZ: (&str, &str) = ("itemType", "FloatXYZ");

/// Serialize one map document.
///
/// Missing extents are written as a zero box; a `None` light list is
/// written as empty columns.
pub fn write_document(doc: &SoaDocument, settings: &CodecSettings) -> String {
    let mut out = XmlOut::default();
    out.line(XML_DECLARATION);
    out.open("CMapData", &[]);

    write_header(&mut out, &doc.header);

    let zero = Aabb3::new(Point3::origin(), Point3::origin());
    let (entities, streaming) = doc
        .extents
        .map(|e| (e.entities, e.streaming))
        .unwrap_or((zero, zero));
    out.point_attrs("streamingExtentsMin", &streaming.min);
    out.point_attrs("streamingExtentsMax", &streaming.max);
    out.point_attrs("entitiesExtentsMin", &entities.min);
    out.point_attrs("entitiesExtentsMax", &entities.max);

    write_placeholders(&mut out);
    write_lod_lights(&mut out, doc.lod_lights.as_deref().unwrap_or_default());
    write_distant(&mut out, &doc.distant);
    write_block(&mut out, settings.block_version);

    out.close("CMapData");
    out.buf
}

fn write_header(out: &mut XmlOut, header: &MapHeader) {
    out.text("name", &header.name);
    out.text("parent", header.parent.as_deref().unwrap_or_default());
    out.value("flags", header.flags);
    out.value("contentFlags", header.content_flags);
}

/// Sections this codec does not interpret; always written empty.
fn write_placeholders(out: &mut XmlOut) {
    out.empty("entities", &[]);
    out.empty("containerLods", &[("itemType", "rage__fwContainerLodDef")]);
    out.empty("boxOccluders", &[("itemType", "BoxOccluder")]);
    out.empty("occludeModels", &[("itemType", "OccludeModel")]);
    out.empty("physicsDictionaries", &[]);
    out.open("instancedData", &[]);
    out.empty("ImapLink", &[]);
    out.empty("PropInstanceList", &[("itemType", "rage__fwPropInstanceListDef")]);
    out.empty("GrassInstanceList", &[("itemType", "rage__fwGrassInstanceListDef")]);
    out.close("instancedData");
    out.empty("timeCycleModifiers", &[("itemType", "CTimeCycleModifier")]);
    out.empty("carGenerators", &[("itemType", "CCarGen")]);
}

fn write_lod_lights(out: &mut XmlOut, lights: &[LightRecord]) {
    out.open("LODLightsSOA", &[]);
    out.xyz_items("direction", lights.iter().map(|l| l.direction));
    out.column("falloff", lights.iter().map(|l| format_g6(l.falloff)));
    out.column("falloffExponent", lights.iter().map(|l| l.falloff_exponent.to_string()));
    out.column("timeAndStateFlags", lights.iter().map(|l| l.time_state_flags.to_string()));
    out.column("hash", lights.iter().map(|l| l.hash.to_string()));
    out.column("coneInnerAngle", lights.iter().map(|l| l.cone_inner_deg.to_string()));
    out.column("coneOuterAngleOrCapExt", lights.iter().map(|l| l.cone_outer_deg.to_string()));
    out.column("coronaIntensity", lights.iter().map(|l| l.corona_intensity.to_string()));
    out.close("LODLightsSOA");
}

fn write_distant(out: &mut XmlOut, distant: &DistantSection) {
    out.open("DistantLODLightsSOA", &[]);
    out.xyz_items("position", distant.positions.iter().map(|p| p.coords));
    out.column("RGBI", distant.rgbi.iter().map(u32::to_string));
    out.value("numStreetLights", distant.num_street_lights);
    out.value("category", distant.category);
    out.close("DistantLODLightsSOA");
}

fn write_block(out: &mut XmlOut, version: u32) {
    out.open("block", &[]);
    out.value("version", version);
    out.value("flags", 0);
    for tag in ["name", "exportedBy", "owner", "time"] {
        out.empty(tag, &[]);
    }
    out.close("block");
}

#[derive(Default)]
struct XmlOut {
    buf: String,
    depth: usize,
}

impl XmlOut {
    fn indent(&mut self) {
        for _ in 0..self.depth {
            self.buf.push(' ');
        }
    }

    fn line(&mut self, content: &str) {
        self.indent();
        self.buf.push_str(content);
        self.buf.push('\n');
    }

    fn start_tag(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.indent();
        self.buf.push('<');
        self.buf.push_str(tag);
        for (key, value) in attrs {
            self.buf.push_str(&format!(" {}=\"{}\"", key, escape(*value)));
        }
    }

    fn open(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_tag(tag, attrs);
        self.buf.push_str(">\n");
        self.depth += 1;
    }

    fn close(&mut self, tag: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.line(&format!("</{tag}>"));
    }

    fn empty(&mut self, tag: &str, attrs: &[(&str, &str)]) {
        self.start_tag(tag, attrs);
        self.buf.push_str("/>\n");
    }

    /// `<tag>text</tag>`, or `<tag/>` when `text` is empty.
    fn text(&mut self, tag: &str, text: &str) {
        if text.is_empty() {
            self.empty(tag, &[]);
        } else {
            self.line(&format!("<{tag}>{}</{tag}>", escape(text)));
        }
    }

    fn value(&mut self, tag: &str, value: impl ToString) {
        self.empty(tag, &[("value", &value.to_string())]);
    }

    fn point_attrs(&mut self, tag: &str, p: &Point3) {
        let (x, y, z) = (format_g6(p.x), format_g6(p.y), format_g6(p.z));
        self.empty(tag, &[("x", &x), ("y", &y), ("z", &z)]);
    }

    fn xyz_items(&mut self, tag: &str, items: impl ExactSizeIterator<Item = Vec3>) {
        if items.len() == 0 {
            self.empty(tag, &[FLOAT_XYZ]);
            return;
        }
        self.open(tag, &[FLOAT_XYZ]);
        for v in items {
            self.open("Item", &[]);
            self.value("x", format_g6(v.x));
            self.value("y", format_g6(v.y));
            self.value("z", format_g6(v.z));
            self.close("Item");
        }
        self.close(tag);
    }

    /// Whitespace-separated values framed on their own line.
    fn column(&mut self, tag: &str, values: impl Iterator<Item = String>) {
        let joined = values.collect::<Vec<_>>().join(" ");
        if joined.is_empty() {
            self.empty(tag, &[]);
            return;
        }
        self.indent();
        self.buf.push_str(&format!("<{tag}>\n"));
        self.depth += 1;
        self.indent();
        self.buf.push_str(&joined);
        self.buf.push('\n');
        self.depth -= 1;
        self.line(&format!("</{tag}>"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MapDocument;
    use crate::naming::MapNames;
    use crate::reader::read_document;
    use crate::rgbi::Rgbi;

    fn names() -> MapNames {
        MapNames {
            primary: "hw1_lodlights".into(),
            companion: "hw1_distlodlights".into(),
        }
    }

    fn lights() -> Vec<LightRecord> {
        let settings = CodecSettings::default();
        let mut a = LightRecord::new(3_000_000_000, -Vec3::z(), &settings.defaults);
        a.position = Some(Point3::new(0.0, 0.0, 0.0));
        a.color_rgb = Some([255, 128, 0]);
        a.intensity_byte = Some(200);

        let mut b = LightRecord::new(-12, Vec3::x(), &settings.defaults);
        b.falloff = 4.5;
        b.falloff_exponent = 16;
        b.cone_inner_deg = 20;
        b.cone_outer_deg = 60;
        b.corona_intensity = 90;
        b.time_state_flags = u32::MAX;
        b.position = Some(Point3::new(100.0, 0.0, 0.0));
        vec![a, b]
    }

    fn pair() -> MapDocument {
        MapDocument::from_records(&lights(), &names(), &CodecSettings::default()).unwrap()
    }

    #[test]
    fn test_primary_layout() {
        let xml = write_document(&pair().primary, &CodecSettings::default());
        let head = concat!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
            "<CMapData>\n",
            " <name>hw1_lodlights</name>\n",
            " <parent>hw1_distlodlights</parent>\n",
            " <flags value=\"1\"/>\n",
            " <contentFlags value=\"128\"/>\n",
        );
        assert!(xml.starts_with(head));
        assert!(xml.contains(" <streamingExtentsMin x=\"-2000\" y=\"-2000\" z=\"-2000\"/>\n"));
        assert!(xml.contains(" <entitiesExtentsMax x=\"100\" y=\"0\" z=\"0\"/>\n"));
        assert!(xml.contains("  <falloff>\n   2.3 4.5\n  </falloff>\n"));
        assert!(xml.contains("  <hash>\n   3000000000 -12\n  </hash>\n"));
        assert!(xml.contains(
            "  <timeAndStateFlags>\n   149946431 4294967295\n  </timeAndStateFlags>\n"
        ));
        assert!(xml.contains(concat!(
            "   <Item>\n",
            "    <x value=\"0\"/>\n",
            "    <y value=\"0\"/>\n",
            "    <z value=\"-1\"/>\n",
            "   </Item>\n",
        )));
        assert!(xml.contains(concat!(
            "  <position itemType=\"FloatXYZ\"/>\n",
            "  <RGBI/>\n",
            "  <numStreetLights value=\"0\"/>\n",
            "  <category value=\"0\"/>\n",
        )));
        assert!(xml.contains("  <PropInstanceList itemType=\"rage__fwPropInstanceListDef\"/>\n"));
        assert!(xml.contains(concat!(
            " <block>\n",
            "  <version value=\"1040236171\"/>\n",
            "  <flags value=\"0\"/>\n",
        )));
        assert!(xml.ends_with("</CMapData>\n"));
    }

    #[test]
    fn test_companion_layout() {
        let xml = write_document(&pair().companion, &CodecSettings::default());
        assert!(xml.contains(concat!(
            " <name>hw1_distlodlights</name>\n",
            " <parent/>\n",
            " <flags value=\"3\"/>\n",
            " <contentFlags value=\"256\"/>\n",
        )));
        assert!(xml.contains("  <direction itemType=\"FloatXYZ\"/>\n  <falloff/>\n"));
        assert!(xml.contains("  <coronaIntensity/>\n"));
        let packed = Rgbi::new([255, 128, 0], 200).pack();
        let white = Rgbi::new([255, 255, 255], 0).pack();
        assert!(xml.contains(&format!("  <RGBI>\n   {packed} {white}\n  </RGBI>\n")));
        assert!(xml.contains("  <category value=\"1\"/>\n"));
    }

    #[test]
    fn test_primary_reads_back() {
        let settings = CodecSettings::default();
        let doc = pair();
        let back = read_document(&write_document(&doc.primary, &settings), &settings).unwrap();
        assert_eq!(back.header, doc.primary.header);
        assert_eq!(back.extents, doc.primary.extents);

        let expected: Vec<LightRecord> = lights()
            .into_iter()
            .map(|l| LightRecord {
                position: None,
                color_rgb: None,
                intensity_byte: None,
                ..l
            })
            .collect();
        assert_eq!(back.lod_lights, Some(expected));
    }

    #[test]
    fn test_companion_reads_back() {
        let settings = CodecSettings::default();
        let doc = pair();
        let back = read_document(&write_document(&doc.companion, &settings), &settings).unwrap();
        assert_eq!(back.header.parent, None);
        assert_eq!(back.lod_lights, Some(Vec::new()));
        assert_eq!(back.distant, doc.companion.distant);
    }

    #[test]
    fn test_name_is_escaped() {
        let mut doc = pair().primary;
        doc.header.name = "a<b&c".into();
        let xml = write_document(&doc, &CodecSettings::default());
        assert!(xml.contains("<name>a&lt;b&amp;c</name>"));
        let back = read_document(&xml, &CodecSettings::default()).unwrap();
        assert_eq!(back.header.name, "a<b&c");
    }

    #[test]
    fn test_document_without_extents() {
        let mut doc = pair().companion;
        doc.extents = None;
        doc.lod_lights = None;
        let xml = write_document(&doc, &CodecSettings::default());
        assert!(xml.contains(" <entitiesExtentsMin x=\"0\" y=\"0\" z=\"0\"/>\n"));
        assert!(xml.contains("  <direction itemType=\"FloatXYZ\"/>\n"));
    }
}
