//! Domain types for rkboot.
//!
//! # Overview
//!
//! - **Generic node** ([`Node`]): the recursive map/sequence/scalar value a
//!   boot document is held in while overrides are applied
//! - **Override paths** ([`OverridePath`]): `a.b[2].c` style addresses into a
//!   node tree
//! - **Error types** ([`BootError`], [`OverrideError`])
//! - **Result type alias** ([`Result`])
//!
//! ```rust
//! use rkboot::domain::{Node, OverridePath};
//!
//! let doc = Node::from(serde_json::json!({"gin": [{"port": 8080}]}));
//! let path: OverridePath = "gin[0].port".parse().unwrap();
//! assert_eq!(doc.get_path(&path), Some(&Node::Int(8080)));
//! ```

pub mod errors;
pub mod node;
pub mod path;
pub mod result;

// Re-export commonly used types for convenience
pub use errors::{BootError, OverrideError};
pub use node::{Node, NodeKind, NodeMap};
pub use path::{OverridePath, Segment};
pub use result::Result;
