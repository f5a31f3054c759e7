use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

use crate::llm_client::ModelId;
use crate::session::registry::OracleSettings;

/// Application configuration loaded from environment variables.
/// Fails at startup if a variable is present but malformed.
#[derive(Clone)]
pub struct Config {
    /// Default credential for new sessions. Sessions may set their own.
    pub anthropic_api_key: Option<String>,
    pub default_model: ModelId,
    pub port: u16,
    pub rust_log: String,
    /// Snapshot document loaded into a session at startup, if set.
    pub seed_session_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            default_model: match optional_env("DEFAULT_MODEL") {
                Some(model) => model
                    .parse::<ModelId>()
                    .map_err(|e| anyhow!(e))
                    .context("DEFAULT_MODEL must be a supported model id")?,
                None => ModelId::default(),
            },
            port: optional_env("PORT")
                .unwrap_or_else(|| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: optional_env("RUST_LOG").unwrap_or_else(|| "info".to_string()),
            seed_session_file: optional_env("SEED_SESSION_FILE").map(PathBuf::from),
        })
    }

    /// Credential and model a new session starts with.
    pub fn default_oracle_settings(&self) -> OracleSettings {
        OracleSettings {
            api_key: self.anthropic_api_key.clone(),
            model: self.default_model,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            anthropic_api_key: None,
            default_model: ModelId::default(),
            port: 8080,
            rust_log: "info".to_string(),
            seed_session_file: None,
        }
    }
}

// Hand-written so the credential never reaches logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("anthropic_api_key", &self.anthropic_api_key.as_ref().map(|_| "<redacted>"))
            .field("default_model", &self.default_model)
            .field("port", &self.port)
            .field("rust_log", &self.rust_log)
            .field("seed_session_file", &self.seed_session_file)
            .finish()
    }
}

/// Unset and blank variables are both treated as absent.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
