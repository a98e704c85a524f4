//! Key filtering and rewriting.

use crate::{ConfigError, ConfigResult};
use regex::Regex;

/// Decision for a single key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyMatch {
    pub include: bool,
    pub output_key: String,
}

/// Decide whether `key` is included and compute its output name.
///
/// Without a pattern every key is included unchanged. With a pattern, keys that
/// do not match are excluded and matching keys lose their first matched span.
pub fn filter_and_rewrite(key: &str, pattern: Option<&Regex>) -> KeyMatch {
    let Some(pattern) = pattern else {
        return KeyMatch {
            include: true,
            output_key: key.to_string(),
        };
    };

    match pattern.find(key) {
        Some(m) => KeyMatch {
            include: true,
            output_key: format!("{}{}", &key[..m.start()], &key[m.end()..]),
        },
        None => KeyMatch {
            include: false,
            output_key: key.to_string(),
        },
    }
}

/// Compiled key filter.
#[derive(Debug, Clone, Default)]
pub struct KeyFilter {
    pattern: Option<Regex>,
}

impl KeyFilter {
    /// Compile a filter. `None` or an empty pattern includes everything.
    pub fn new(pattern: Option<&str>) -> ConfigResult<Self> {
        let pattern = match pattern.filter(|p| !p.is_empty()) {
            Some(p) => Some(Regex::new(p).map_err(|source| ConfigError::InvalidPattern {
                pattern: p.to_string(),
                source,
            })?),
            None => None,
        };
        Ok(Self { pattern })
    }

    pub fn is_pass_through(&self) -> bool {
        self.pattern.is_none()
    }

    pub fn apply(&self, key: &str) -> KeyMatch {
        filter_and_rewrite(key, self.pattern.as_ref())
    }
}
