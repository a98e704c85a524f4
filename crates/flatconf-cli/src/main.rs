//! flatconf CLI.
//!
//! Reads inputs from flags or the `INPUT_*` variables a CI runner sets for an action.

use clap::Parser;
use flatconf_config::Format;
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod commands;
mod entitlement;
mod github;

use commands::run::RunInputs;
use entitlement::HttpEntitlementCheck;
use flatconf_core::{Entitlement, EntitlementCheck};

#[derive(Parser)]
#[command(name = "flatconf")]
#[command(about = "Flatten, interpolate and publish configuration values", long_about = None)]
struct Cli {
    /// Path to the configuration document
    #[arg(long, env = "INPUT_CONFIG")]
    config: PathBuf,

    /// Prefix for exported environment variables
    #[arg(long, env = "INPUT_ENV-VAR-PREFIX")]
    env_var_prefix: Option<String>,

    /// Regular expression selecting keys; the first match is stripped from each key
    #[arg(long, env = "INPUT_KEY-PATH")]
    key_path: Option<String>,

    /// Document format (yaml, json, kdl); inferred from the extension by default
    #[arg(long, env = "INPUT_FORMAT")]
    format: Option<String>,

    /// Entitlement service URL; the check is skipped when unset
    #[arg(long, env = "FLATCONF_ENTITLEMENT_URL")]
    entitlement_url: Option<String>,
}

/// Unset action inputs arrive as empty strings.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so stdout stays usable for published values
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Some(url) = non_empty(cli.entitlement_url) {
        let checker = HttpEntitlementCheck::new(url)
            .with_repository(std::env::var("GITHUB_REPOSITORY").ok());
        match checker.check().await {
            Entitlement::Granted => info!("entitlement check passed"),
            Entitlement::Denied(reason) => {
                error!(%reason, "entitlement denied");
                github::annotate_failure(&format!("Entitlement denied: {}", reason));
                std::process::exit(1);
            }
            Entitlement::Unavailable(reason) => {
                warn!(%reason, "entitlement check unavailable, continuing");
            }
        }
    }

    let format = non_empty(cli.format)
        .map(|f| f.parse::<Format>())
        .transpose()?;

    let inputs = RunInputs {
        config: cli.config,
        format,
        env_var_prefix: non_empty(cli.env_var_prefix),
        key_path: non_empty(cli.key_path),
    };

    let mut publisher = github::GithubPublisher::from_env();
    let result = commands::run::run(&inputs, &mut publisher);
    if let Err(err) = &result {
        github::annotate_failure(&format!("{:#}", err));
    }
    result.map(|_| ())
}
