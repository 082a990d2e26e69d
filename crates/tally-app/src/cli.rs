//! CLI argument definitions for the Tally client.
//!
//! Priority resolution: CLI args > env vars > config file > defaults.

use clap::Parser;
use std::path::PathBuf;

use tally_core::{ResolveMode, TallyConfig};

/// Tally: track expenses by chatting with your expense backend.
#[derive(Parser, Debug)]
#[command(name = "tally", version, about)]
pub struct CliArgs {
    /// Path to the configuration file.
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Base URL of the expense backend (e.g. http://127.0.0.1:8000).
    #[arg(short = 'u', long = "base-url")]
    pub base_url: Option<String>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(short = 'l', long = "log-level")]
    pub log_level: Option<String>,

    /// Clear every pending status line when any request completes.
    #[arg(long = "legacy-resolve")]
    pub legacy_resolve: bool,

    /// Check backend health and exit.
    #[arg(long = "check")]
    pub check: bool,

    /// Send this message once and exit instead of starting a session.
    #[arg(trailing_var_arg = true)]
    pub message: Vec<String>,
}

impl CliArgs {
    /// Resolve the configuration file path.
    ///
    /// Priority: --config flag > TALLY_CONFIG env var > ~/.tally/config.toml.
    pub fn resolve_config_path(&self) -> PathBuf {
        if let Some(ref p) = self.config {
            return p.clone();
        }
        if let Ok(p) = std::env::var("TALLY_CONFIG") {
            return PathBuf::from(p);
        }
        default_config_path()
    }

    /// Resolve the backend base URL.
    ///
    /// Priority: --base-url flag > TALLY_BASE_URL env var > config file value.
    pub fn resolve_base_url(&self, config_url: &str) -> String {
        self.resolve_base_url_with(config_url, std::env::var("TALLY_BASE_URL").ok())
    }

    fn resolve_base_url_with(&self, config_url: &str, env_url: Option<String>) -> String {
        if let Some(ref u) = self.base_url {
            return u.clone();
        }
        match env_url {
            Some(u) if !u.trim().is_empty() => u,
            _ => config_url.to_string(),
        }
    }

    /// Resolve the log level. Priority: --log-level flag > config file value.
    pub fn resolve_log_level(&self, config_level: &str) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| config_level.to_string())
    }

    /// The one-shot message, if any words were given.
    pub fn one_shot(&self) -> Option<String> {
        if self.message.is_empty() {
            None
        } else {
            Some(self.message.join(" "))
        }
    }

    /// Apply CLI and environment overrides to a loaded configuration.
    pub fn apply(&self, config: &mut TallyConfig) {
        config.backend.base_url = self.resolve_base_url(&config.backend.base_url);
        config.general.log_level = self.resolve_log_level(&config.general.log_level);
        if self.legacy_resolve {
            config.chat.resolve_mode = ResolveMode::Legacy;
        }
    }
}

/// Default config file path for the current platform.
fn default_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    if let Ok(home) = std::env::var("USERPROFILE") {
        return PathBuf::from(home).join(".tally").join("config.toml");
    }
    #[cfg(not(target_os = "windows"))]
    if let Ok(home) = std::env::var("HOME") {
        return PathBuf::from(home).join(".tally").join("config.toml");
    }
    PathBuf::from("config.toml")
}
