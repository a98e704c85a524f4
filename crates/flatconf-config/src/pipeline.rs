//! The flatten, resolve and publish pipeline.

use crate::{ConfigResult, FlatValue, KeyFilter, ResolvedMapping, flatten, interpolate};
use flatconf_core::{Node, PublishedEntry, Publisher};
use tracing::{debug, info};

/// Flatten a document and resolve every leaf in traversal order.
///
/// Each leaf can only reference keys that were flattened before it. Array markers
/// are stored with their raw, unresolved elements.
pub fn resolve_document(root: &Node) -> ConfigResult<ResolvedMapping> {
    let mut mapping = ResolvedMapping::new();

    for entry in flatten(root)? {
        let value = match entry.value {
            FlatValue::Leaf(scalar) => Node::Scalar(interpolate::resolve_scalar(scalar, &mapping)?),
            FlatValue::Array(items) => Node::Sequence(items.to_vec()),
        };
        debug!(key = %entry.key, "resolved");
        mapping.insert(entry.key, value);
    }

    Ok(mapping)
}

/// Filter, rename and stringify the resolved mapping, in insertion order.
pub fn published_entries(
    mapping: &ResolvedMapping,
    filter: &KeyFilter,
    env_prefix: Option<&str>,
) -> Vec<PublishedEntry> {
    mapping
        .iter()
        .filter_map(|(key, value)| {
            let decision = filter.apply(key);
            if !decision.include {
                debug!(key, "excluded by key filter");
                return None;
            }
            let entry = PublishedEntry::new(decision.output_key, value.to_string());
            Some(match env_prefix {
                Some(prefix) => entry.with_env_prefix(prefix),
                None => entry,
            })
        })
        .collect()
}

/// Publish every included entry. Returns the number of entries published.
pub fn publish(
    mapping: &ResolvedMapping,
    filter: &KeyFilter,
    env_prefix: Option<&str>,
    publisher: &mut dyn Publisher,
) -> ConfigResult<usize> {
    let entries = published_entries(mapping, filter, env_prefix);
    for entry in &entries {
        debug!(output = %entry.output_key, env = ?entry.env_name, "publishing");
        publisher.publish(entry)?;
    }
    info!(
        published = entries.len(),
        total = mapping.len(),
        filtered = !filter.is_pass_through(),
        "published configuration values"
    );
    Ok(entries.len())
}
