//! Publishing boundary abstraction.

use crate::{PublishedEntry, Result};

/// Trait for backends that expose resolved values to the invoking environment.
pub trait Publisher {
    /// Set a named output.
    fn set_output(&mut self, name: &str, value: &str) -> Result<()>;

    /// Export an environment variable to later steps.
    fn export_variable(&mut self, name: &str, value: &str) -> Result<()>;

    /// Publish one entry: its output, then its environment variable if it has one.
    fn publish(&mut self, entry: &PublishedEntry) -> Result<()> {
        self.set_output(&entry.output_key, &entry.value)?;
        if let Some(env_name) = &entry.env_name {
            self.export_variable(env_name, &entry.value)?;
        }
        Ok(())
    }
}

/// Publisher that records everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryPublisher {
    pub outputs: Vec<(String, String)>,
    pub variables: Vec<(String, String)>,
}

impl MemoryPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up a recorded output by name.
    pub fn output(&self, name: &str) -> Option<&str> {
        self.outputs
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Look up a recorded environment variable by name.
    pub fn variable(&self, name: &str) -> Option<&str> {
        self.variables
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

impl Publisher for MemoryPublisher {
    fn set_output(&mut self, name: &str, value: &str) -> Result<()> {
        self.outputs.push((name.to_string(), value.to_string()));
        Ok(())
    }

    fn export_variable(&mut self, name: &str, value: &str) -> Result<()> {
        self.variables.push((name.to_string(), value.to_string()));
        Ok(())
    }
}
