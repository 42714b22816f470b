//! Config decoder
//!
//! Decodes a resolved [`Node`] into a caller supplied type through `serde`.
//! Struct fields match keys in any case style, so `localPath`, `LOCAL_PATH`
//! and `local-path` all populate a `local_path` field. Two keys that land on
//! the same field are a decode error. Keys of map-typed fields are kept as
//! written.
//!
//! A decode failure means the boot configuration can't be interpreted. The
//! boot orchestrator and the CLI treat it as fatal and stop the process.

use super::de::NodeDeserializer;
use crate::domain::errors::BootError;
use crate::domain::node::Node;
use crate::domain::Result;
use serde::de::DeserializeOwned;

/// Section name reported when decoding a whole document
const ROOT_SECTION: &str = "<root>";

/// Decodes a whole node into `T`
///
/// # Errors
///
/// Returns [`BootError::Decode`] when the structure can't be coerced into
/// `T`, e.g. a mapping where `T` expects a number.
///
/// # Examples
///
/// ```
/// use rkboot::config::decode::decode;
/// use rkboot::domain::Node;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Gin {
///     port: u16,
///     enabled: bool,
/// }
///
/// let node = Node::from(serde_json::json!({"Port": 8080, "ENABLED": true}));
/// let gin: Gin = decode(&node).unwrap();
/// assert_eq!(gin.port, 8080);
/// assert!(gin.enabled);
/// ```
pub fn decode<T: DeserializeOwned>(node: &Node) -> Result<T> {
    decode_named(node, ROOT_SECTION)
}

/// Decodes one top-level section of a document
///
/// The section name is matched after snake_case folding. Returns `Ok(None)`
/// when the document has no such section.
pub fn decode_section<T: DeserializeOwned>(root: &Node, section: &str) -> Result<Option<T>> {
    match find_section(root, section) {
        Some(node) => decode_named(node, section).map(Some),
        None => Ok(None),
    }
}

/// Locates a top-level section by its folded name
pub fn find_section<'a>(root: &'a Node, section: &str) -> Option<&'a Node> {
    let wanted = to_snake_case(section);
    root.as_map()?
        .iter()
        .find(|(k, _)| to_snake_case(k) == wanted)
        .map(|(_, v)| v)
}

fn decode_named<T: DeserializeOwned>(node: &Node, section: &str) -> Result<T> {
    T::deserialize(NodeDeserializer::new(node))
        .map_err(|e| BootError::decode(section, e.to_string()))
}

/// Converts `camelCase`, `PascalCase`, `SCREAMING_CASE` and `kebab-case`
/// keys to snake_case
pub fn to_snake_case(key: &str) -> String {
    let chars: Vec<char> = key.chars().collect();
    let mut out = String::with_capacity(key.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c == '-' || c == ' ' {
            out.push('_');
            continue;
        }
        if c.is_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary && !out.ends_with('_') {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
