//! Flatten, resolve and publish one configuration document.

use anyhow::{Context, Result};
use flatconf_config::document::load;
use flatconf_config::{ConfigError, Format, KeyFilter, publish, resolve_document};
use flatconf_core::Publisher;
use std::path::PathBuf;
use tracing::{error, info, warn};

/// Inputs for a single run.
#[derive(Debug, Clone, Default)]
pub struct RunInputs {
    pub config: PathBuf,
    pub format: Option<Format>,
    pub env_var_prefix: Option<String>,
    pub key_path: Option<String>,
}

/// Run the pipeline and return the number of published entries.
///
/// An unreadable document is logged and treated as an empty run rather than a
/// failure. Parse, pattern and interpolation errors fail the run.
pub fn run(inputs: &RunInputs, publisher: &mut dyn Publisher) -> Result<usize> {
    let root = match load(&inputs.config, inputs.format) {
        Ok(root) => root,
        Err(err @ ConfigError::Read { .. }) => {
            error!("{}", err);
            return Ok(0);
        }
        Err(err) => {
            return Err(err).with_context(|| {
                format!("Failed to parse config file: {}", inputs.config.display())
            });
        }
    };

    info!(config = %inputs.config.display(), "loaded configuration");

    let filter = KeyFilter::new(inputs.key_path.as_deref())?;
    let mapping = resolve_document(&root)?;
    if mapping.is_empty() {
        warn!(config = %inputs.config.display(), "document produced no values");
    }
    let published = publish(
        &mapping,
        &filter,
        inputs.env_var_prefix.as_deref(),
        publisher,
    )?;

    Ok(published)
}
