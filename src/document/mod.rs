//! Document model - the in-memory tree every format is parsed into
//!
//! A [`Document`] is format-neutral: the loader builds it from JSON, XML or
//! YAML, the obfuscator rewrites it, and the writer emits it in the target
//! format. Map entries keep their source order.

pub mod diagnostics;
pub mod loader;
pub mod writer;
pub mod xml;

use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};
use std::fmt;
use std::path::Path;

pub use diagnostics::SyntaxError;
pub use loader::{load_document, parse_document};
pub use writer::{render_document, write_output, WriteOptions};

/// Supported data formats
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    Json,
    Xml,
    Yaml,
}

impl Format {
    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Json => "json",
            Format::Xml => "xml",
            Format::Yaml => "yaml",
        }
    }

    /// Detect a format from a file extension (case-insensitive)
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "json" => Some(Format::Json),
            "xml" => Some(Format::Xml),
            "yaml" | "yml" => Some(Format::Yaml),
            _ => None,
        }
    }

    /// Detect a format from a path's extension
    ///
    /// Returns `None` when the path has no extension or an unknown one.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    /// Guess a format from the first non-whitespace character of the content
    pub fn sniff(content: &str) -> Self {
        match content.trim_start_matches('\u{feff}').trim_start().chars().next() {
            Some('<') => Format::Xml,
            Some('{') | Some('[') => Format::Json,
            _ => Format::Yaml,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A numeric scalar, kept in the widest lossless representation
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    Int(i64),
    UInt(u64),
    Float(f64),
}

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::UInt(n) => write!(f, "{}", n),
            Number::Float(n) => write!(f, "{}", n),
        }
    }
}

/// A leaf value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl Scalar {
    /// Text form used by formats without typed scalars (XML)
    ///
    /// Null has no text form.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(b) => Some(b.to_string()),
            Scalar::Number(n) => Some(n.to_string()),
            Scalar::String(s) => Some(s.clone()),
        }
    }
}

/// A node of the document tree
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Ordered key/value entries
    Map(Vec<(String, Node)>),
    List(Vec<Node>),
    Scalar(Scalar),
}

impl Node {
    pub fn null() -> Self {
        Node::Scalar(Scalar::Null)
    }

    pub fn string(s: impl Into<String>) -> Self {
        Node::Scalar(Scalar::String(s.into()))
    }

    /// Look up a map entry by key
    pub fn get(&self, key: &str) -> Option<&Node> {
        match self {
            Node::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Visit every map key in document order
    pub fn for_each_key<F: FnMut(&str)>(&self, f: &mut F) {
        match self {
            Node::Map(entries) => {
                for (key, value) in entries {
                    f(key);
                    value.for_each_key(f);
                }
            }
            Node::List(items) => {
                for item in items {
                    item.for_each_key(f);
                }
            }
            Node::Scalar(_) => {}
        }
    }

    /// Collect every map key in document order (duplicates included)
    pub fn keys(&self) -> Vec<String> {
        let mut keys = Vec::new();
        self.for_each_key(&mut |k| keys.push(k.to_string()));
        keys
    }

    /// Check whether two trees have the same node shape and cardinality
    ///
    /// Keys and scalar values are ignored; only the kind of each node and
    /// the number of children at every level are compared.
    pub fn same_shape(&self, other: &Node) -> bool {
        match (self, other) {
            (Node::Map(a), Node::Map(b)) => {
                a.len() == b.len()
                    && a.iter().zip(b).all(|((_, x), (_, y))| x.same_shape(y))
            }
            (Node::List(a), Node::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.same_shape(y))
            }
            (Node::Scalar(_), Node::Scalar(_)) => true,
            _ => false,
        }
    }
}

/// A parsed document
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,

    /// Root element name, when the source format has one (XML)
    pub root_name: Option<String>,

    /// Element name used for list items when writing XML
    pub item_name: Option<String>,
}

impl Document {
    pub fn new(root: Node) -> Self {
        Self {
            root,
            root_name: None,
            item_name: None,
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl Serialize for Scalar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Scalar::Null => serializer.serialize_unit(),
            Scalar::Bool(b) => serializer.serialize_bool(*b),
            Scalar::Number(Number::Int(n)) => serializer.serialize_i64(*n),
            Scalar::Number(Number::UInt(n)) => serializer.serialize_u64(*n),
            Scalar::Number(Number::Float(n)) => serializer.serialize_f64(*n),
            Scalar::String(s) => serializer.serialize_str(s),
        }
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map, a list or a scalar value")
    }

    fn visit_bool<E: de::Error>(self, v: bool) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Bool(v)))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Number(Number::Int(v))))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Number(Number::UInt(v))))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Node, E> {
        Ok(Node::Scalar(Scalar::Number(Number::Float(v))))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Node, E> {
        Ok(Node::string(v))
    }

    fn visit_string<E: de::Error>(self, v: String) -> Result<Node, E> {
        Ok(Node::string(v))
    }

    fn visit_unit<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_none<E: de::Error>(self) -> Result<Node, E> {
        Ok(Node::null())
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Node, D::Error> {
        Node::deserialize(deserializer)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Node, A::Error> {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(item) = seq.next_element()? {
            items.push(item);
        }
        Ok(Node::List(items))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut entries: Vec<(String, Node)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((MapKey(key), value)) = map.next_entry::<MapKey, Node>()? {
            // Later duplicates win, like serde_json's own Value
            if let Some(existing) = entries.iter_mut().find(|(k, _)| *k == key) {
                existing.1 = value;
            } else {
                entries.push((key, value));
            }
        }
        Ok(Node::Map(entries))
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

/// Map key that accepts any scalar (YAML allows non-string keys)
struct MapKey(String);

impl<'de> Deserialize<'de> for MapKey {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct KeyVisitor;

        impl<'de> Visitor<'de> for KeyVisitor {
            type Value = MapKey;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a scalar map key")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<MapKey, E> {
                Ok(MapKey(v))
            }

            fn visit_bool<E: de::Error>(self, v: bool) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<MapKey, E> {
                Ok(MapKey(v.to_string()))
            }

            fn visit_unit<E: de::Error>(self) -> Result<MapKey, E> {
                Ok(MapKey("null".to_string()))
            }
        }

        deserializer.deserialize_any(KeyVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(Format::from_extension("JSON"), Some(Format::Json));
        assert_eq!(Format::from_extension("yml"), Some(Format::Yaml));
        assert_eq!(Format::from_extension("xml"), Some(Format::Xml));
        assert_eq!(Format::from_extension("csv"), None);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("data/in.Json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("out")), None);
    }

    #[test]
    fn test_format_sniff() {
        assert_eq!(Format::sniff("  <root/>"), Format::Xml);
        assert_eq!(Format::sniff("\n{\"a\": 1}"), Format::Json);
        assert_eq!(Format::sniff("[1, 2]"), Format::Json);
        assert_eq!(Format::sniff("a: 1"), Format::Yaml);
    }

    #[test]
    fn test_deserialize_keeps_key_order() {
        let node: Node = serde_json::from_str(r#"{"zeta": 1, "alpha": 2, "mid": 3}"#).unwrap();
        assert_eq!(node.keys(), vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_deserialize_yaml_non_string_keys() {
        let node: Node = serde_yml::from_str("1: one\ntrue: yes\n").unwrap();
        assert_eq!(node.keys(), vec!["1", "true"]);
    }

    #[test]
    fn test_serialize_json_round_trip() {
        let source = r#"{"a":[1,-2,3.5,null,true],"b":{"c":"d"}}"#;
        let node: Node = serde_json::from_str(source).unwrap();
        assert_eq!(serde_json::to_string(&node).unwrap(), source);
    }

    #[test]
    fn test_same_shape_ignores_keys_and_values() {
        let a: Node = serde_json::from_str(r#"{"a": [1, {"b": "x"}]}"#).unwrap();
        let b: Node = serde_json::from_str(r#"{"q": ["z", {"r": null}]}"#).unwrap();
        let c: Node = serde_json::from_str(r#"{"q": ["z"]}"#).unwrap();
        assert!(a.same_shape(&b));
        assert!(!a.same_shape(&c));
    }
}
