//! Generic configuration node
//!
//! [`Node`] is the universal representation of a boot document while it is
//! parsed, overridden and merged. It is a closed sum type so the merge
//! compatibility rules can match on it exhaustively.

use super::path::{OverridePath, Segment};
use serde::ser::{SerializeMap, SerializeSeq};
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use std::fmt;

/// Mapping representation used by [`Node::Map`]; keeps document key order
pub type NodeMap = IndexMap<String, Node>;

/// A recursively typed configuration value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Node {
    /// Absent value; also fills sequence slots no override assigned
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    Seq(Vec<Node>),
    Map(NodeMap),
}

/// The variant tag of a [`Node`], used for compatibility checks and messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Null,
    Bool,
    Int,
    Float,
    String,
    Seq,
    Map,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Null => "null",
            NodeKind::Bool => "bool",
            NodeKind::Int => "int",
            NodeKind::Float => "float",
            NodeKind::String => "string",
            NodeKind::Seq => "sequence",
            NodeKind::Map => "mapping",
        };
        f.write_str(s)
    }
}

impl Node {
    /// Creates an empty mapping node
    pub fn map() -> Self {
        Node::Map(NodeMap::new())
    }

    /// Returns the variant tag
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Null => NodeKind::Null,
            Node::Bool(_) => NodeKind::Bool,
            Node::Int(_) => NodeKind::Int,
            Node::Float(_) => NodeKind::Float,
            Node::String(_) => NodeKind::String,
            Node::Seq(_) => NodeKind::Seq,
            Node::Map(_) => NodeKind::Map,
        }
    }

    /// True for every variant except sequences and mappings
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Node::Seq(_) | Node::Map(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// True for a mapping without keys
    pub fn is_empty_map(&self) -> bool {
        matches!(self, Node::Map(m) if m.is_empty())
    }

    /// Infers a typed scalar from override text
    ///
    /// `true`/`false` become booleans, base-10 integers become `Int`, float
    /// literals become `Float`, `null` and `~` become `Null`; everything else
    /// stays a string. Surrounding whitespace is trimmed.
    pub fn infer_scalar(raw: &str) -> Node {
        let text = raw.trim();
        match text {
            "true" => return Node::Bool(true),
            "false" => return Node::Bool(false),
            "null" | "~" => return Node::Null,
            _ => {}
        }
        if let Ok(i) = text.parse::<i64>() {
            return Node::Int(i);
        }
        // Only plain decimal floats; "inf"/"nan" stay strings.
        if text.chars().any(|c| c.is_ascii_digit())
            && text
                .chars()
                .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
        {
            if let Ok(f) = text.parse::<f64>() {
                return Node::Float(f);
            }
        }
        Node::String(text.to_string())
    }

    /// Literal text of a scalar, `None` for `Null` and collections
    pub fn scalar_text(&self) -> Option<String> {
        match self {
            Node::Bool(b) => Some(b.to_string()),
            Node::Int(i) => Some(i.to_string()),
            Node::Float(f) => Some(f.to_string()),
            Node::String(s) => Some(s.clone()),
            Node::Null | Node::Seq(_) | Node::Map(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Node::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Node::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Node::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&NodeMap> {
        match self {
            Node::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&[Node]> {
        match self {
            Node::Seq(s) => Some(s),
            _ => None,
        }
    }

    /// Looks up a key in a mapping node
    pub fn get(&self, key: &str) -> Option<&Node> {
        self.as_map().and_then(|m| m.get(key))
    }

    /// Follows an override path from this node
    pub fn get_path(&self, path: &OverridePath) -> Option<&Node> {
        path.segments()
            .iter()
            .try_fold(self, |node, segment| match (segment, node) {
                (Segment::Key(k), Node::Map(m)) => m.get(k),
                (Segment::Index(i), Node::Seq(s)) => s.get(*i),
                _ => None,
            })
    }
}

impl From<serde_yaml::Value> for Node {
    fn from(value: serde_yaml::Value) -> Self {
        use serde_yaml::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Node::Int(i)
                } else {
                    Node::Float(n.as_f64().unwrap_or(f64::NAN))
                }
            }
            Value::String(s) => Node::String(s),
            Value::Sequence(seq) => Node::Seq(seq.into_iter().map(Node::from).collect()),
            Value::Mapping(mapping) => Node::Map(
                mapping
                    .into_iter()
                    .map(|(k, v)| (yaml_key(k), Node::from(v)))
                    .collect(),
            ),
            Value::Tagged(tagged) => Node::from(tagged.value),
        }
    }
}

/// Non-string YAML keys are stringified (`1: x` becomes key `"1"`)
fn yaml_key(key: serde_yaml::Value) -> String {
    match key {
        serde_yaml::Value::String(s) => s,
        other => Node::from(other).scalar_text().unwrap_or_default(),
    }
}

impl From<toml::Value> for Node {
    fn from(value: toml::Value) -> Self {
        use toml::Value;
        match value {
            Value::String(s) => Node::String(s),
            Value::Integer(i) => Node::Int(i),
            Value::Float(f) => Node::Float(f),
            Value::Boolean(b) => Node::Bool(b),
            Value::Datetime(dt) => Node::String(dt.to_string()),
            Value::Array(arr) => Node::Seq(arr.into_iter().map(Node::from).collect()),
            Value::Table(table) => {
                Node::Map(table.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl From<serde_json::Value> for Node {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Node::Int(i),
                None => Node::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            Value::String(s) => Node::String(s),
            Value::Array(arr) => Node::Seq(arr.into_iter().map(Node::from).collect()),
            Value::Object(obj) => {
                Node::Map(obj.into_iter().map(|(k, v)| (k, Node::from(v))).collect())
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::String(s) => serializer.serialize_str(s),
            Node::Seq(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}
