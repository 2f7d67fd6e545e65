//! Configuration management for the dashboard server

use anyhow::{Context, Result};
use clap::Parser;
use opsdesk::DashboardConfig;
use std::path::{Path, PathBuf};

/// Server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host (default: 0.0.0.0)
    pub host: String,

    /// Server port (default: 8080)
    pub port: u16,

    /// Acting user for requests without an `x-user-id` header
    pub default_user: String,

    /// CORS allowed origins (comma-separated). If empty, any origin is allowed.
    pub cors_allowed_origins: Option<String>,

    /// Emit JSON log lines instead of the human-readable format
    pub log_json: bool,

    /// Dashboard behaviour, from the TOML file named by `OPSDESK_CONFIG`
    pub dashboard: DashboardConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_user() -> String {
    "anonymous".to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("OPSDESK_HOST").unwrap_or_else(|_| default_host());
        let port = std::env::var("OPSDESK_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_else(default_port);
        let default_user = std::env::var("OPSDESK_DEFAULT_USER")
            .ok()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(default_user);
        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS").ok();
        let log_json = std::env::var("LOG_FORMAT")
            .map(|s| s.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let mut dashboard = match std::env::var("OPSDESK_CONFIG") {
            Ok(path) => load_dashboard_config(Path::new(&path))?,
            Err(_) => DashboardConfig::default(),
        };
        if let Ok(seed) = std::env::var("OPSDESK_SEED_DEMO_DATA") {
            dashboard.seed_demo_data = !matches!(seed.to_lowercase().as_str(), "0" | "false" | "no");
        }

        Ok(Self {
            host,
            port,
            default_user,
            cors_allowed_origins,
            log_json,
            dashboard,
        })
    }

    /// Allowed CORS origins, `None` meaning any
    pub fn cors_origins(&self) -> Option<Vec<String>> {
        let origins: Vec<String> = self
            .cors_allowed_origins
            .as_deref()?
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        if origins.is_empty() {
            None
        } else {
            Some(origins)
        }
    }
}

/// Read a `DashboardConfig` from a TOML file
pub fn load_dashboard_config(path: &Path) -> Result<DashboardConfig> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dashboard config {}", path.display()))?;
    toml::from_str(&raw)
        .with_context(|| format!("Invalid dashboard config {}", path.display()))
}

/// Command line overrides, applied on top of the environment
#[derive(Debug, Parser)]
#[command(name = "opsdesk-server", version, about = "IT operations dashboard server")]
pub struct Args {
    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Dashboard config file (TOML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Start with an empty repository
    #[arg(long)]
    pub no_seed: bool,
}

impl Args {
    pub fn apply(self, config: &mut Config) -> Result<()> {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(path) = self.config {
            config.dashboard = load_dashboard_config(&path)?;
        }
        if self.no_seed {
            config.dashboard.seed_demo_data = false;
        }
        Ok(())
    }
}
