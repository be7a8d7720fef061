//! Minimal XML element tree.
//!
//! Map documents are small and their sections are looked up by name in no
//! fixed order, so the reader first builds a tree from quick-xml events and
//! then queries it.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{FormatError, Result};

/// An XML element with its attributes, text and children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Element {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attributes: Vec<(String, String)>,
    /// Concatenated text content (trimmed pieces joined by a space).
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<Element>,
}

impl Element {
    /// Parse a document and return its root element.
    pub fn parse(xml: &str) -> Result<Element> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => stack.push(Element::from_start(&e)?),
                Event::Empty(e) => {
                    let element = Element::from_start(&e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::End(_) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| FormatError::Xml("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Event::Text(t) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_text(&t.unescape()?);
                    }
                }
                Event::CData(c) => {
                    if let Some(top) = stack.last_mut() {
                        top.push_text(&String::from_utf8_lossy(&c.into_inner()));
                    }
                }
                Event::Eof => break,
                _ => {}
            }
        }

        if let Some(open) = stack.last() {
            return Err(FormatError::Xml(format!("unclosed element <{}>", open.name)));
        }
        root.ok_or_else(|| FormatError::missing("root element"))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Element> {
        let mut element = Element {
            name: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            ..Default::default()
        };
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attributes.push((key, value));
        }
        Ok(element)
    }

    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(text);
    }

    /// First direct child with the given name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// First descendant with the given name, depth-first in document order.
    pub fn find(&self, name: &str) -> Option<&Element> {
        for child in &self.children {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = child.find(name) {
                return Some(found);
            }
        }
        None
    }

    /// Attribute value by key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Text content, `None` when empty.
    pub fn non_empty_text(&self) -> Option<&str> {
        let t = self.text.trim();
        (!t.is_empty()).then_some(t)
    }
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<()> {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
        Ok(())
    } else if root.is_some() {
        Err(FormatError::Xml(format!(
            "second root element <{}>",
            element.name
        )))
    } else {
        *root = Some(element);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let root = Element::parse(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<CMapData>
 <name>hw1_lodlights</name>
 <flags value="1"/>
 <LODLightsSOA>
  <falloff>
   2.3 4,5
  </falloff>
 </LODLightsSOA>
 <block>
  <name/>
 </block>
</CMapData>
"#,
        )
        .unwrap();
        assert_eq!(root.name, "CMapData");
        assert_eq!(root.child("name").unwrap().text, "hw1_lodlights");
        assert_eq!(root.child("flags").unwrap().attr("value"), Some("1"));
        assert_eq!(root.find("falloff").unwrap().text, "2.3 4,5");
        assert_eq!(root.children_named("name").count(), 1);
        assert!(root.child("block").unwrap().child("name").unwrap().non_empty_text().is_none());
    }

    #[test]
    fn test_escaped_text() {
        let root = Element::parse("<a><b k=\"x &amp; y\">1 &lt; 2</b></a>").unwrap();
        let b = root.child("b").unwrap();
        assert_eq!(b.attr("k"), Some("x & y"));
        assert_eq!(b.text, "1 < 2");
    }

    #[test]
    fn test_mismatched_tag() {
        let err = Element::parse("<a><b></c></a>").unwrap_err();
        assert!(err.is_structural());
    }

    #[test]
    fn test_unclosed_tag() {
        let err = Element::parse("<a><b>").unwrap_err();
        assert!(matches!(err, FormatError::Xml(_)));
    }

    #[test]
    fn test_empty_document() {
        let err = Element::parse("   ").unwrap_err();
        assert!(matches!(err, FormatError::MissingSection(_)));
    }
}
