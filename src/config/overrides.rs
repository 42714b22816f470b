//! Override grammar parser
//!
//! Parses the `--rkset` flag value: comma separated `path=value` assignments
//! such as `gin[0].port=2008,gin[0].enabled=false`. Commas and `=` inside
//! values are not supported; the first `=` splits path from value and every
//! comma ends an assignment.

use crate::domain::errors::OverrideError;
use crate::domain::node::Node;
use crate::domain::path::{OverridePath, Segment};

/// Largest sequence index an override may address
///
/// Sequences are materialized up to the highest index, so an unbounded index
/// would allocate arbitrarily large vectors.
pub const MAX_OVERRIDE_INDEX: usize = 4096;

/// A single parsed `path=value` assignment
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub path: OverridePath,
    pub value: Node,
}

impl Assignment {
    /// Parses one `path=value` fragment
    ///
    /// # Errors
    ///
    /// Returns [`OverrideError::Syntax`] naming the fragment when `=` is
    /// missing or the path is malformed.
    pub fn parse(fragment: &str) -> Result<Self, OverrideError> {
        let trimmed = fragment.trim();
        let (raw_path, raw_value) = trimmed
            .split_once('=')
            .ok_or_else(|| OverrideError::syntax(trimmed, "missing '='"))?;
        let path = raw_path.parse::<OverridePath>().map_err(|e| match e {
            OverrideError::Syntax { reason, .. } => OverrideError::syntax(trimmed, reason),
            other => other,
        })?;
        Ok(Self {
            path,
            value: Node::infer_scalar(raw_value),
        })
    }
}

/// Splits an override string into assignments without building a tree
///
/// Empty or whitespace-only input yields no assignments.
pub fn parse_assignments(input: &str) -> Result<Vec<Assignment>, OverrideError> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    input.split(',').map(Assignment::parse).collect()
}

/// Parses an override string into a mapping node
///
/// Array segments materialize as sequences sized to the largest index seen
/// plus one; slots no assignment touched stay [`Node::Null`].
///
/// # Errors
///
/// Fails when an assignment lacks `=`, a path segment is malformed, or one
/// path is assigned structurally incompatible values (mapping vs scalar).
///
/// # Examples
///
/// ```
/// use rkboot::config::overrides::parse_overrides;
/// use rkboot::domain::Node;
///
/// let node = parse_overrides("gin[0].port=2008").unwrap();
/// let port = node.get("gin").unwrap().as_seq().unwrap()[0].get("port");
/// assert_eq!(port, Some(&Node::Int(2008)));
///
/// assert!(parse_overrides("").unwrap().is_empty_map());
/// ```
pub fn parse_overrides(input: &str) -> Result<Node, OverrideError> {
    build_overrides(parse_assignments(input)?)
}

/// Builds a mapping node from already parsed assignments
pub fn build_overrides<I>(assignments: I) -> Result<Node, OverrideError>
where
    I: IntoIterator<Item = Assignment>,
{
    let mut root = Node::map();
    for assignment in assignments {
        assign(&mut root, &assignment.path, assignment.value)?;
    }
    Ok(root)
}

/// Writes `value` at `path` inside `root`, creating intermediate containers
///
/// A scalar may be reassigned (last write wins), but a path can't be a
/// scalar in one assignment and a container in another.
pub fn assign(root: &mut Node, path: &OverridePath, value: Node) -> Result<(), OverrideError> {
    assign_at(root, path.segments(), value, path)
}

fn assign_at(
    node: &mut Node,
    segments: &[Segment],
    value: Node,
    full: &OverridePath,
) -> Result<(), OverrideError> {
    let Some((head, rest)) = segments.split_first() else {
        if !node.is_scalar() {
            return Err(OverrideError::conflict(
                full.to_string(),
                format!("scalar assigned where a {} was already built", node.kind()),
            ));
        }
        *node = value;
        return Ok(());
    };

    match head {
        Segment::Key(key) => {
            if node.is_null() {
                *node = Node::map();
            }
            let kind = node.kind();
            let Node::Map(map) = node else {
                return Err(OverrideError::conflict(
                    full.to_string(),
                    format!("expected a mapping at '{key}' but found a {kind}"),
                ));
            };
            let child = map.entry(key.clone()).or_insert(Node::Null);
            assign_at(child, rest, value, full)
        }
        Segment::Index(index) => {
            if *index > MAX_OVERRIDE_INDEX {
                return Err(OverrideError::syntax(
                    full.to_string(),
                    format!("index {index} exceeds maximum of {MAX_OVERRIDE_INDEX}"),
                ));
            }
            if node.is_null() {
                *node = Node::Seq(Vec::new());
            }
            let kind = node.kind();
            let Node::Seq(seq) = node else {
                return Err(OverrideError::conflict(
                    full.to_string(),
                    format!("expected a sequence at [{index}] but found a {kind}"),
                ));
            };
            if seq.len() <= *index {
                seq.resize(index + 1, Node::Null);
            }
            assign_at(&mut seq[*index], rest, value, full)
        }
    }
}
