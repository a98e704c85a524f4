//! Entries handed to the publishing boundary.

/// A resolved key/value pair ready to be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishedEntry {
    /// Output name after filtering and rewriting.
    pub output_key: String,
    /// Stringified value.
    pub value: String,
    /// Environment variable name, set only when a prefix is configured.
    pub env_name: Option<String>,
}

impl PublishedEntry {
    pub fn new(output_key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            output_key: output_key.into(),
            value: value.into(),
            env_name: None,
        }
    }

    /// Attach an environment variable name derived from `prefix` and the output key.
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_name = Some(env_var_name(prefix, &self.output_key));
        self
    }
}

/// Build `<prefix>_<key>` with every `.` and `-` in the key replaced by `_`.
pub fn env_var_name(prefix: &str, key: &str) -> String {
    let cleaned: String = key
        .chars()
        .map(|c| if c == '.' || c == '-' { '_' } else { c })
        .collect();
    format!("{}_{}", prefix, cleaned)
}
