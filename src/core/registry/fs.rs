//! Embedded resource handles
//!
//! Adapters that serve bundled assets (API documentation, static files)
//! associate a read-only file set with their entry through
//! [`Registry::map_entry_fs`](super::Registry::map_entry_fs).

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt;

/// A read-only set of embedded files
pub trait EmbeddedFs: Send + Sync {
    /// Returns the file contents at `path`, if present
    fn open(&self, path: &str) -> Option<Cow<'static, [u8]>>;

    /// Lists every file path in the set
    fn list(&self) -> Vec<String>;
}

impl fmt::Debug for dyn EmbeddedFs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbeddedFs")
            .field("files", &self.list())
            .finish()
    }
}

/// File set backed by `'static` byte slices, typically from `include_bytes!`
///
/// ```
/// use rkboot::core::registry::{EmbeddedFs, StaticFs};
///
/// let fs = StaticFs::new()
///     .with_file("docs/index.html", b"<html></html>")
///     .with_file("/docs/swagger.json", b"{}");
/// assert!(fs.open("docs/swagger.json").is_some());
/// assert!(fs.open("./docs/index.html").is_some());
/// assert!(fs.open("missing").is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticFs {
    files: BTreeMap<String, &'static [u8]>,
}

impl StaticFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a file; a later file at the same path replaces an earlier one
    pub fn with_file(mut self, path: &str, contents: &'static [u8]) -> Self {
        self.files.insert(normalize(path).to_string(), contents);
        self
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl EmbeddedFs for StaticFs {
    fn open(&self, path: &str) -> Option<Cow<'static, [u8]>> {
        self.files.get(normalize(path)).map(|c| Cow::Borrowed(*c))
    }

    fn list(&self) -> Vec<String> {
        self.files.keys().cloned().collect()
    }
}

/// Strips leading `./` and `/` so lookups are root-relative
fn normalize(path: &str) -> &str {
    let mut p = path.trim();
    loop {
        if let Some(rest) = p.strip_prefix("./") {
            p = rest;
        } else if let Some(rest) = p.strip_prefix('/') {
            p = rest;
        } else {
            return p;
        }
    }
}
