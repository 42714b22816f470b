//! Override paths
//!
//! An [`OverridePath`] addresses one location inside a [`Node`](super::Node)
//! tree. The grammar form `gin[0].port` and the environment form
//! `GIN_0_PORT` normalize to the same path.

use super::errors::OverrideError;
use std::fmt;
use std::str::FromStr;

/// One step of an override path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key
    Key(String),
    /// Sequence index
    Index(usize),
}

/// A sequence of path segments, always starting with a key
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct OverridePath {
    segments: Vec<Segment>,
}

impl OverridePath {
    /// Builds a path from segments
    ///
    /// # Errors
    ///
    /// Returns an error if the path is empty, starts with an index, or
    /// contains an empty key.
    pub fn new(segments: Vec<Segment>) -> Result<Self, OverrideError> {
        let path = Self { segments };
        path.check()?;
        Ok(path)
    }

    fn check(&self) -> Result<(), OverrideError> {
        match self.segments.first() {
            None => return Err(OverrideError::syntax("", "empty path")),
            Some(Segment::Index(_)) => {
                return Err(OverrideError::syntax(
                    self.to_string(),
                    "path must start with a key",
                ))
            }
            Some(Segment::Key(_)) => {}
        }
        if self
            .segments
            .iter()
            .any(|s| matches!(s, Segment::Key(k) if k.is_empty()))
        {
            return Err(OverrideError::syntax(self.to_string(), "empty key segment"));
        }
        Ok(())
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Normalizes the remainder of an environment key (prefix already removed)
    ///
    /// The key is lower-cased and split on `_`. A token that parses as a
    /// non-negative base-10 integer becomes an index on the preceding segment.
    ///
    /// ```
    /// use rkboot::domain::path::OverridePath;
    ///
    /// let path = OverridePath::from_env_key("ITEMS_0_NAME").unwrap();
    /// assert_eq!(path.to_string(), "items[0].name");
    /// ```
    pub fn from_env_key(key: &str) -> Result<Self, OverrideError> {
        let lowered = key.to_lowercase();
        let mut segments = Vec::new();
        for token in lowered.split('_') {
            if token.is_empty() {
                return Err(OverrideError::syntax(key, "empty segment between delimiters"));
            }
            match token.parse::<usize>() {
                Ok(index) if token.bytes().all(|b| b.is_ascii_digit()) => {
                    if segments.is_empty() {
                        return Err(OverrideError::syntax(key, "index without preceding key"));
                    }
                    segments.push(Segment::Index(index));
                }
                _ => segments.push(Segment::Key(token.to_string())),
            }
        }
        Self::new(segments).map_err(|_| OverrideError::syntax(key, "malformed environment key"))
    }
}

impl FromStr for OverridePath {
    type Err = OverrideError;

    /// Parses the grammar form: dotted keys with bracketed indices
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let text = raw.trim();
        let err = |reason: &str| OverrideError::syntax(raw, reason);

        let mut segments = Vec::new();
        let mut key = String::new();
        // Set after ']' so the next char must be '.', '[' or end of input.
        let mut after_index = false;
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '.' => {
                    if after_index {
                        after_index = false;
                        if chars.peek().is_none() {
                            return Err(err("trailing '.'"));
                        }
                        continue;
                    }
                    if key.is_empty() {
                        return Err(err("empty key segment"));
                    }
                    segments.push(Segment::Key(std::mem::take(&mut key)));
                    if chars.peek().is_none() {
                        return Err(err("trailing '.'"));
                    }
                }
                '[' => {
                    if !key.is_empty() {
                        segments.push(Segment::Key(std::mem::take(&mut key)));
                    } else if !after_index {
                        return Err(err("index without preceding key"));
                    }
                    let mut digits = String::new();
                    let mut closed = false;
                    for d in chars.by_ref() {
                        if d == ']' {
                            closed = true;
                            break;
                        }
                        digits.push(d);
                    }
                    if !closed {
                        return Err(err("unmatched '['"));
                    }
                    let digits = digits.trim();
                    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                        return Err(err("index must be a non-negative integer"));
                    }
                    let index = digits
                        .parse::<usize>()
                        .map_err(|_| err("index out of range"))?;
                    segments.push(Segment::Index(index));
                    after_index = true;
                }
                ']' => return Err(err("unmatched ']'")),
                other => {
                    if after_index {
                        return Err(err("expected '.' or '[' after index"));
                    }
                    key.push(other);
                }
            }
        }

        if !key.is_empty() {
            segments.push(Segment::Key(key));
        }

        Self::new(segments).map_err(|e| match e {
            OverrideError::Syntax { reason, .. } => err(&reason),
            other => other,
        })
    }
}

impl fmt::Display for OverridePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(k) if i == 0 => write!(f, "{k}")?,
                Segment::Key(k) => write!(f, ".{k}")?,
                Segment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}
