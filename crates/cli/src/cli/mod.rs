pub mod catalog;
pub mod codec;
pub mod config;
pub mod demo;

use std::path::Path;

use clap::{Parser, Subcommand};

/// DomBridge: attribute-change messages from page nodes to the host.
#[derive(Debug, Parser)]
#[command(name = "dombridge", version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List registered attributes with their codes and encodings.
    Catalog,
    /// Encode a value the way a node update would carry it.
    Encode {
        /// Attribute name (e.g. "Rects", "Options").
        attribute: String,
        /// Value tokens: one scalar, list elements, or 4 numbers per rect.
        #[arg(allow_hyphen_values = true)]
        values: Vec<String>,
    },
    /// Parse a protocol message and print the decoded update as JSON.
    Decode {
        /// Full message, e.g. "DOM#upd#div#7#0#10;20;30;40#".
        message: String,
    },
    /// Drive a few simulated nodes through the notifier and print the
    /// resulting messages.
    Demo {
        /// Number of scroll steps to simulate.
        #[arg(long, default_value_t = 3)]
        steps: u32,
    },
    /// Configuration utilities.
    #[command(subcommand)]
    Config(ConfigCommand),
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Parse the config file and report any errors.
    Validate,
    /// Dump the resolved configuration (with defaults) as TOML.
    Show,
}

/// Load the config named by `BR_CONFIG` (default `dombridge.toml`), or
/// defaults when that file does not exist.
pub fn load_config() -> anyhow::Result<(br_domain::config::Config, String)> {
    let config_path = std::env::var("BR_CONFIG").unwrap_or_else(|_| "dombridge.toml".into());
    let config = br_domain::config::Config::load_or_default(Path::new(&config_path))
        .map_err(|e| anyhow::anyhow!("loading {config_path}: {e}"))?;
    Ok((config, config_path))
}
