//! Environment key normalizer
//!
//! Turns variables such as `RK_GIN_0_PORT=8080` into override assignments
//! (`gin[0].port=8080`). Environment names can't carry the bracket syntax,
//! so a purely numeric token is read as an index on the preceding segment.

use super::overrides::{assign, Assignment};
use crate::domain::node::Node;
use crate::domain::path::OverridePath;
use serde::Serialize;

/// Default environment prefix
pub const DEFAULT_ENV_PREFIX: &str = "RK";

/// Audit record of one recognized environment override
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverrideRecord {
    /// Original variable name, e.g. `RK_GIN_0_PORT`
    pub env_key: String,
    /// Normalized path, e.g. `gin[0].port`
    pub path: String,
    /// Raw variable value
    pub value: String,
}

/// Overrides collected from the environment
#[derive(Debug, Clone, Default)]
pub struct EnvOverrides {
    /// Mapping node ready to be merged over the boot document
    pub node: Node,
    /// Every override that was recognized, in the order applied
    pub records: Vec<OverrideRecord>,
}

impl EnvOverrides {
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Collects overrides from the current process environment
pub fn env_overrides_from_process(prefix: &str) -> EnvOverrides {
    env_overrides(std::env::vars(), prefix)
}

/// Collects overrides from the given variables
///
/// Variables are matched against `PREFIX_` case-insensitively and processed
/// in sorted name order. Malformed keys and conflicting assignments are
/// skipped with a warning; they never fail the boot.
pub fn env_overrides<I, K, V>(vars: I, prefix: &str) -> EnvOverrides
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    let marker = format!("{}_", prefix.to_uppercase());

    let mut matching: Vec<(String, String)> = vars
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .filter(|(k, _)| {
            k.len() > marker.len()
                && k.is_char_boundary(marker.len())
                && k[..marker.len()].eq_ignore_ascii_case(&marker)
        })
        .collect();
    matching.sort();

    let mut node = Node::map();
    let mut records = Vec::new();

    for (env_key, value) in matching {
        let path = match OverridePath::from_env_key(&env_key[marker.len()..]) {
            Ok(path) => path,
            Err(e) => {
                tracing::warn!(env_key = %env_key, error = %e, "Skipping malformed environment override");
                continue;
            }
        };

        let assignment = Assignment {
            path,
            value: Node::infer_scalar(&value),
        };
        if let Err(e) = assign(&mut node, &assignment.path, assignment.value) {
            tracing::warn!(env_key = %env_key, error = %e, "Skipping conflicting environment override");
            continue;
        }

        tracing::debug!(env_key = %env_key, path = %assignment.path, "Recognized environment override");
        records.push(OverrideRecord {
            env_key,
            path: assignment.path.to_string(),
            value,
        });
    }

    EnvOverrides { node, records }
}

/// Serializes unit tests that set or read process environment variables
#[cfg(test)]
pub(crate) fn env_lock() -> std::sync::MutexGuard<'static, ()> {
    static ENV_MUTEX: std::sync::Mutex<()> = std::sync::Mutex::new(());
    ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner())
}
