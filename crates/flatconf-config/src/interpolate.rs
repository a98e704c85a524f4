//! Variable interpolation for flattened values.
//!
//! String leaves may reference any key flattened before them with `$(key)`:
//! - `$(namespace)` - a top-level value
//! - `$(service.port)` - a nested value
//! - `$(servers.0.name)` - a sequence element
//! - `$(tags.array)` - the raw list as compact JSON (`["a","b"]`), not comma-joined
//!
//! A reference to a missing key, or to a key whose value is empty, zero, false or
//! null, is an error.

use crate::{ConfigError, ConfigResult};
use flatconf_core::{Node, Scalar};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Upper bound on substitutions within a single value.
pub const MAX_SUBSTITUTIONS: usize = 1024;

// Regex for matching $(...) references
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\$\(([^)]*)\)").unwrap());

/// Insertion-ordered mapping of flat keys to fully resolved values.
#[derive(Debug, Clone, Default)]
pub struct ResolvedMapping {
    entries: Vec<(String, Node)>,
    index: HashMap<String, usize>,
}

impl ResolvedMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a resolved value. Re-inserting a key replaces its value in place.
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.index.get(key).map(|&position| &self.entries[position].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Resolve every `$(name)` reference in `value` against `mapping`.
///
/// Non-string scalars are returned unchanged; containers are resolved element-wise.
pub fn resolve(value: &Node, mapping: &ResolvedMapping) -> ConfigResult<Node> {
    match value {
        Node::Scalar(scalar) => resolve_scalar(scalar, mapping).map(Node::Scalar),
        Node::Sequence(items) => items
            .iter()
            .map(|item| resolve(item, mapping))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Node::Sequence),
        Node::Mapping(fields) => fields
            .iter()
            .map(|(key, item)| Ok((key.clone(), resolve(item, mapping)?)))
            .collect::<ConfigResult<Vec<_>>>()
            .map(Node::Mapping),
    }
}

/// Resolve a single scalar leaf.
pub fn resolve_scalar(scalar: &Scalar, mapping: &ResolvedMapping) -> ConfigResult<Scalar> {
    match scalar {
        Scalar::String(text) => interpolate(text, mapping).map(Scalar::String),
        other => Ok(other.clone()),
    }
}

/// Substitute references one at a time, always rescanning from the start of the
/// string, until none remain.
pub fn interpolate(input: &str, mapping: &ResolvedMapping) -> ConfigResult<String> {
    let mut output = input.to_string();
    let mut substitutions = 0;

    loop {
        let Some((range, name)) = TOKEN_REGEX.captures(&output).and_then(|caps| {
            let token = caps.get(0)?;
            Some((token.range(), caps[1].to_string()))
        }) else {
            break;
        };

        let replacement = match mapping.get(&name) {
            Some(value) if value.is_truthy() => value.to_string(),
            _ => return Err(ConfigError::UndefinedVariable(name)),
        };

        if substitutions == MAX_SUBSTITUTIONS {
            return Err(ConfigError::InterpolationLimit {
                value: input.to_string(),
                limit: MAX_SUBSTITUTIONS,
            });
        }
        substitutions += 1;

        output.replace_range(range, &replacement);
    }

    Ok(output)
}
