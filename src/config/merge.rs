//! Recursive merger
//!
//! Applies an override tree onto the boot document in place. Overrides are
//! scoped to configuration that already exists: a key or index missing from
//! the base is never created, so a typo in an override can't inject new
//! settings.

use crate::domain::node::{Node, NodeMap};

/// Merges `overlay` into `base`
///
/// - mapping × mapping: recurse into keys present in both
/// - sequence × sequence: recurse element-wise up to the shorter length
/// - scalar × scalar of the same kind: replace
/// - anything else, including `2` over a string: left untouched
///
/// An overlay `Null` never replaces a value; it marks sequence slots that no
/// override assigned.
///
/// # Examples
///
/// ```
/// use rkboot::config::merge::merge;
/// use rkboot::config::overrides::parse_overrides;
/// use rkboot::domain::Node;
///
/// let mut base = Node::from(serde_json::json!({"port": 1949}));
/// merge(&mut base, &parse_overrides("port=2008,unknown=1").unwrap());
/// assert_eq!(serde_json::to_value(&base).unwrap(), serde_json::json!({"port": 2008}));
/// ```
pub fn merge(base: &mut Node, overlay: &Node) {
    match (base, overlay) {
        (_, Node::Null) => {}
        (Node::Map(base_map), Node::Map(overlay_map)) => merge_maps(base_map, overlay_map),
        (Node::Seq(base_seq), Node::Seq(overlay_seq)) => {
            for (b, o) in base_seq.iter_mut().zip(overlay_seq) {
                merge(b, o);
            }
        }
        (base, o) if base.is_scalar() && base.kind() == o.kind() => {
            *base = o.clone();
        }
        (base, o) => {
            tracing::trace!(
                base = %base.kind(),
                overlay = %o.kind(),
                "Skipping override with mismatched type"
            );
        }
    }
}

fn merge_maps(base: &mut NodeMap, overlay: &NodeMap) {
    for (key, value) in overlay {
        if let Some(target) = base.get_mut(key) {
            merge(target, value);
            continue;
        }
        // Environment overrides arrive lower-cased; fall back to a
        // case-insensitive match against keys declared in the document.
        if let Some(target) = base
            .iter_mut()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v)
        {
            merge(target, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::env_overrides;
    use crate::config::overrides::parse_overrides;
    use serde_json::json;

    fn node(value: serde_json::Value) -> Node {
        Node::from(value)
    }

    fn merged(base: serde_json::Value, overrides: &str) -> serde_json::Value {
        let mut base = node(base);
        merge(&mut base, &parse_overrides(overrides).unwrap());
        serde_json::to_value(&base).unwrap()
    }

    #[test]
    fn test_gin_scenario() {
        assert_eq!(
            merged(
                json!({"gin": [{"port": 1949, "enabled": true}]}),
                "gin[0].port=2008,gin[0].enabled=false"
            ),
            json!({"gin": [{"port": 2008, "enabled": false}]})
        );
    }

    #[test]
    fn test_no_key_injection() {
        let base = json!({"app": {"name": "demo"}, "gin": [{"port": 1}]});
        assert_eq!(merged(base.clone(), "app.version=v2"), base);
        assert_eq!(merged(base.clone(), "missing.key=1"), base);
        assert_eq!(merged(base.clone(), "gin[1].port=2"), base);
    }

    #[test]
    fn test_type_mismatch_leaves_base_unchanged() {
        let base = json!({"port": 1949, "enabled": true, "ratio": 0.5, "tags": ["a"]});
        assert_eq!(merged(base.clone(), "port=abc"), base);
        assert_eq!(merged(base.clone(), "enabled=1"), base);
        assert_eq!(merged(base.clone(), "ratio=yes"), base);
        assert_eq!(merged(base.clone(), "tags=x"), base);
        assert_eq!(merged(base.clone(), "port.inner=1"), base);
    }

    #[test]
    fn test_string_base_rejects_typed_scalars() {
        let base = json!({"version": "v1", "flag": "on"});
        assert_eq!(merged(base.clone(), "version=2,flag=false"), base);
        assert_eq!(merged(base.clone(), "version=1.5"), base);
        assert_eq!(
            merged(base, "version=v2"),
            json!({"version": "v2", "flag": "on"})
        );
    }

    #[test]
    fn test_sequence_base_length_is_authoritative() {
        assert_eq!(
            merged(json!({"ports": [1, 2]}), "ports[0]=10,ports[1]=20,ports[2]=30"),
            json!({"ports": [10, 20]})
        );
    }

    #[test]
    fn test_unassigned_slots_do_not_clear_base() {
        assert_eq!(
            merged(json!({"ports": [1, 2, 3]}), "ports[2]=30"),
            json!({"ports": [1, 2, 30]})
        );
    }

    #[test]
    fn test_empty_override_is_noop() {
        let base = json!({"a": {"b": [1, {"c": "d"}]}});
        assert_eq!(merged(base.clone(), ""), base);
    }

    #[test]
    fn test_case_insensitive_key_fallback() {
        let mut base = node(json!({"certEntry": [{"name": "tls", "enabled": false}]}));
        let env = env_overrides(vec![("RK_CERTENTRY_0_ENABLED", "true")], "RK");
        merge(&mut base, &env.node);
        assert_eq!(
            serde_json::to_value(&base).unwrap(),
            json!({"certEntry": [{"name": "tls", "enabled": true}]})
        );
    }

    #[test]
    fn test_flags_win_over_env() {
        let mut base = node(json!({"a": 1}));
        let env = env_overrides(vec![("RK_A", "2")], "RK");
        merge(&mut base, &env.node);
        merge(&mut base, &parse_overrides("a=3").unwrap());
        assert_eq!(serde_json::to_value(&base).unwrap(), json!({"a": 3}));
    }

    #[test]
    fn test_env_and_grammar_produce_identical_merge() {
        let base = json!({"items": [{"name": "old"}]});

        let mut from_env = node(base.clone());
        merge(
            &mut from_env,
            &env_overrides(vec![("PREFIX_ITEMS_0_NAME", "x")], "PREFIX").node,
        );

        let mut from_flag = node(base);
        merge(&mut from_flag, &parse_overrides("items[0].name=x").unwrap());

        assert_eq!(from_env, from_flag);
    }
}
