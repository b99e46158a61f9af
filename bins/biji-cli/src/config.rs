//! Layered configuration: defaults, TOML file, `BIJI_*` environment, flags.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};

use biji_core::address::Network;
use biji_wallet::{SelectionPolicy, WalletConfig};

/// Values given on the command line. They win over every other layer.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub network: Option<Network>,
    pub server_url: Option<String>,
    pub key_file: Option<PathBuf>,
    pub timeout_secs: Option<u64>,
    pub selection_policy: Option<SelectionPolicy>,
}

/// `~/.biji/config.toml`.
pub fn default_config_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".biji")
        .join("config.toml")
}

/// Build the wallet configuration.
///
/// An explicit `file` must exist; the default file is optional. `env`
/// replaces the process environment when given.
pub fn load(
    file: Option<&Path>,
    env: Option<HashMap<String, String>>,
    overrides: &Overrides,
) -> Result<WalletConfig> {
    let (path, required) = match file {
        Some(path) => (path.to_path_buf(), true),
        None => (default_config_file(), false),
    };

    let cfg = Config::builder()
        .add_source(
            File::from(path.as_path())
                .format(FileFormat::Toml)
                .required(required),
        )
        .add_source(
            Environment::with_prefix("BIJI")
                .try_parsing(true)
                .source(env),
        )
        .set_override_option("network", overrides.network.map(|n| n.name()))?
        .set_override_option("server_url", overrides.server_url.clone())?
        .set_override_option(
            "key_file",
            overrides.key_file.as_ref().map(|p| p.display().to_string()),
        )?
        .set_override_option("timeout_secs", overrides.timeout_secs)?
        .set_override_option(
            "selection_policy",
            overrides.selection_policy.map(|p| p.to_string()),
        )?
        .build()
        .with_context(|| format!("Failed to read configuration from {}", path.display()))?;

    cfg.try_deserialize()
        .context("Invalid configuration")
}
