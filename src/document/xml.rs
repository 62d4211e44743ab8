//! XML reading and writing
//!
//! XML has no native lists or typed scalars, so the mapping is lossy in
//! both directions:
//!
//! - repeated sibling elements fold into a list at the first occurrence
//! - attributes become leading child entries
//! - elements with only text become strings; empty elements become null
//! - lists are written as repeated item elements inside their parent
//!
//! Element structure survives a write: every map entry and list item is
//! one child element. A reparse does not restore every list, since a list
//! with one item reads back as a single child and an empty list as null.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fmt::Display;
use tracing::debug;

use super::{Document, Format, Node, SyntaxError};

/// Options for rendering XML
#[derive(Debug, Clone)]
pub struct XmlOptions {
    pub indent: usize,
    /// Root element name used when the document has none
    pub root_element: String,
    /// List item element name used when the document has none
    pub item_element: String,
}

impl Default for XmlOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            root_element: "root".to_string(),
            item_element: "item".to_string(),
        }
    }
}

/// Element being built while reading
struct Frame {
    name: String,
    entries: Vec<(String, Node)>,
    text: String,
}

impl Frame {
    fn new(name: String, entries: Vec<(String, Node)>) -> Self {
        Self {
            name,
            entries,
            text: String::new(),
        }
    }

    fn push_child(&mut self, name: String, node: Node) {
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some((_, Node::List(items))) => items.push(node),
            Some((_, existing)) => {
                let first = std::mem::replace(existing, Node::List(Vec::new()));
                *existing = Node::List(vec![first, node]);
            }
            None => self.entries.push((name, node)),
        }
    }

    fn finish(self) -> (String, Node) {
        let node = if !self.entries.is_empty() {
            if !self.text.is_empty() {
                debug!(element = %self.name, "dropping text mixed with child elements");
            }
            Node::Map(self.entries)
        } else if !self.text.is_empty() {
            Node::string(self.text)
        } else {
            Node::null()
        };
        (self.name, node)
    }
}

/// Parse an XML document
pub fn parse(source: &str, filename: &str) -> Result<Document, SyntaxError> {
    let mut reader = Reader::from_str(source);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Node)> = None;

    let error_at = |message: String, offset: usize| {
        SyntaxError::at_offset(Format::Xml, message, source, filename, offset)
    };

    loop {
        let position = reader.buffer_position() as usize;
        let event = reader
            .read_event()
            .map_err(|e| error_at(e.to_string(), reader.error_position() as usize))?;

        match event {
            Event::Start(e) => {
                if root.is_some() && stack.is_empty() {
                    return Err(error_at("found more than one root element".into(), position));
                }
                let name = element_name(&e);
                let attrs = attributes(&e).map_err(|msg| error_at(msg, position))?;
                stack.push(Frame::new(name, attrs));
            }
            Event::Empty(e) => {
                let name = element_name(&e);
                let attrs = attributes(&e).map_err(|msg| error_at(msg, position))?;
                let node = if attrs.is_empty() {
                    Node::null()
                } else {
                    Node::Map(attrs)
                };
                match stack.last_mut() {
                    Some(parent) => parent.push_child(name, node),
                    None if root.is_none() => root = Some((name, node)),
                    None => {
                        return Err(error_at("found more than one root element".into(), position))
                    }
                }
            }
            Event::Text(t) => {
                let text = t.unescape().map_err(|e| error_at(e.to_string(), position))?;
                match stack.last_mut() {
                    Some(frame) => frame.text.push_str(&text),
                    None if text.trim().is_empty() => {}
                    None => {
                        return Err(error_at("text outside the root element".into(), position))
                    }
                }
            }
            Event::CData(c) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(&c.into_inner()));
                }
            }
            Event::End(_) => {
                // Mismatched end tags are rejected by the reader itself
                if let Some(frame) = stack.pop() {
                    let (name, node) = frame.finish();
                    match stack.last_mut() {
                        Some(parent) => parent.push_child(name, node),
                        None => root = Some((name, node)),
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(error_at(
            format!("unclosed element <{}>", open.name),
            source.len(),
        ));
    }

    let (root_name, root_node) =
        root.ok_or_else(|| error_at("document has no root element".into(), 0))?;

    Ok(Document {
        root: root_node,
        root_name: Some(root_name),
        item_name: None,
    })
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).into_owned()
}

fn attributes(e: &BytesStart<'_>) -> Result<Vec<(String, Node)>, String> {
    let mut entries = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| err.to_string())?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr.unescape_value().map_err(|err| err.to_string())?;
        entries.push((key, Node::string(value.into_owned())));
    }
    Ok(entries)
}

/// Turn an arbitrary key into a valid XML element name
pub fn xml_name(raw: &str) -> String {
    let mut name: String = raw
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || matches!(c, '_' | '-' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let needs_prefix = match name.chars().next() {
        None => true,
        Some(c) => !(c.is_alphabetic() || c == '_'),
    } || name.to_ascii_lowercase().starts_with("xml");

    if needs_prefix {
        name.insert(0, '_');
    }
    name
}

/// Render a document as indented XML with a declaration
pub fn render(doc: &Document, options: &XmlOptions) -> Result<String, String> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', options.indent);

    writer
        .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
        .map_err(stringify)?;

    let root_name = xml_name(doc.root_name.as_deref().unwrap_or(&options.root_element));
    let item_name = xml_name(doc.item_name.as_deref().unwrap_or(&options.item_element));

    write_node(&mut writer, &root_name, &doc.root, &item_name)?;

    let mut out = String::from_utf8(writer.into_inner()).map_err(stringify)?;
    out.push('\n');
    Ok(out)
}

fn write_node(
    writer: &mut Writer<Vec<u8>>,
    name: &str,
    node: &Node,
    item_name: &str,
) -> Result<(), String> {
    match node {
        Node::Map(entries) if !entries.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(stringify)?;
            for (key, value) in entries {
                write_node(writer, &xml_name(key), value, item_name)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(stringify)?;
        }
        Node::List(items) if !items.is_empty() => {
            writer
                .write_event(Event::Start(BytesStart::new(name)))
                .map_err(stringify)?;
            for item in items {
                write_node(writer, item_name, item, item_name)?;
            }
            writer
                .write_event(Event::End(BytesEnd::new(name)))
                .map_err(stringify)?;
        }
        Node::Scalar(scalar) => match scalar.to_text() {
            Some(text) => {
                writer
                    .write_event(Event::Start(BytesStart::new(name)))
                    .map_err(stringify)?;
                writer
                    .write_event(Event::Text(BytesText::new(&text)))
                    .map_err(stringify)?;
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(stringify)?;
            }
            None => {
                writer
                    .write_event(Event::Empty(BytesStart::new(name)))
                    .map_err(stringify)?;
            }
        },
        // Empty map or list
        _ => {
            writer
                .write_event(Event::Empty(BytesStart::new(name)))
                .map_err(stringify)?;
        }
    }
    Ok(())
}

fn stringify<E: Display>(err: E) -> String {
    err.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Scalar;

    fn parse_ok(source: &str) -> Document {
        parse(source, "test.xml").unwrap()
    }

    #[test]
    fn test_parse_simple_elements() {
        let doc = parse_ok("<person><name>Alice</name><dob>1990-01-01</dob><note/></person>");
        assert_eq!(doc.root_name.as_deref(), Some("person"));
        assert_eq!(doc.root.get("name").and_then(Node::as_str), Some("Alice"));
        assert_eq!(doc.root.get("dob").and_then(Node::as_str), Some("1990-01-01"));
        assert_eq!(doc.root.get("note"), Some(&Node::Scalar(Scalar::Null)));
    }

    #[test]
    fn test_parse_folds_repeated_siblings() {
        let doc = parse_ok("<r><a>1</a><b>x</b><a>2</a><a>3</a></r>");
        assert_eq!(doc.root.keys(), vec!["a", "b"]);
        match doc.root.get("a") {
            Some(Node::List(items)) => assert_eq!(items.len(), 3),
            other => panic!("expected list, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_attributes_become_entries() {
        let doc = parse_ok(r#"<r id="7"><child kind="x"/></r>"#);
        assert_eq!(doc.root.keys(), vec!["id", "child", "kind"]);
        assert_eq!(doc.root.get("id").and_then(Node::as_str), Some("7"));
    }

    #[test]
    fn test_parse_unescapes_text_and_cdata() {
        let doc = parse_ok("<r><a>x &amp; y</a><b><![CDATA[<raw>]]></b></r>");
        assert_eq!(doc.root.get("a").and_then(Node::as_str), Some("x & y"));
        assert_eq!(doc.root.get("b").and_then(Node::as_str), Some("<raw>"));
    }

    #[test]
    fn test_parse_rejects_mismatched_tags() {
        let err = parse("<r><a>1</b></r>", "bad.xml").unwrap_err();
        assert_eq!(err.format(), Format::Xml);
    }

    #[test]
    fn test_parse_rejects_unclosed_and_empty() {
        assert!(parse("<r><a>1</a>", "bad.xml").is_err());
        assert!(parse("", "empty.xml").is_err());
        assert!(parse("<a/><b/>", "two.xml").is_err());
    }

    #[test]
    fn test_xml_name() {
        assert_eq!(xml_name("name"), "name");
        assert_eq!(xml_name("first name"), "first_name");
        assert_eq!(xml_name("1st"), "_1st");
        assert_eq!(xml_name(""), "_");
        assert_eq!(xml_name("xmlns"), "_xmlns");
        assert_eq!(xml_name("a@b"), "a_b");
    }

    #[test]
    fn test_render_and_reparse() {
        let root: Node =
            serde_json::from_str(r#"{"name": "A & B", "tags": ["x", "y"], "none": null}"#)
                .unwrap();
        let xml = render(&Document::new(root), &XmlOptions::default()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<name>A &amp; B</name>"));
        assert!(xml.contains("<item>x</item>"));
        assert!(xml.contains("<none/>"));

        let reparsed = parse_ok(&xml);
        assert_eq!(reparsed.root_name.as_deref(), Some("root"));
        assert_eq!(reparsed.root.get("name").and_then(Node::as_str), Some("A & B"));
    }

    #[test]
    fn test_render_uses_document_names() {
        let mut doc = Document::new(Node::List(vec![Node::string("a")]));
        doc.root_name = Some("people".into());
        doc.item_name = Some("entry".into());
        let xml = render(&doc, &XmlOptions::default()).unwrap();
        assert!(xml.contains("<people>"));
        assert!(xml.contains("<entry>a</entry>"));
    }
}
