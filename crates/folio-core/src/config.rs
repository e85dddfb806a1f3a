//! Folio configuration: built-in defaults, optional TOML file, then `FOLIO__*` environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | FOLIO_CONFIG | config/folio.toml | Path of the optional TOML file. |
//! | PORT / FOLIO__PORT | 5000 | HTTP port. |
//! | FOLIO__HOST | 0.0.0.0 | Bind address. |
//! | FOLIO__STORAGE_PATH | ./data/folio | sled directory. |
//! | CLIENT_URL / FOLIO__CORS_ORIGINS | http://localhost:5173 | Comma-separated allowed origins. |
//! | GROQ_API_KEY / FOLIO__LLM_API_KEY | (none) | Completion provider key. |
//! | FOLIO__LLM_API_URL | Groq chat completions | Completion endpoint. |
//! | FOLIO__LLM_MODEL | llama-3.1-8b-instant | Model identifier. |
//! | ADMIN_EMAIL / ADMIN_PASSWORD | (none) | Admin credentials; admin login is disabled when unset. |
//! | FOLIO__ADMIN_TOKEN | random per process | Session token handed out on login. |
//!
//! The unprefixed variables replace built-in defaults; the file and `FOLIO__*` win over them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::completion::{DEFAULT_COMPLETION_URL, DEFAULT_MODEL};

const DEFAULT_CONFIG_PATH: &str = "config/folio.toml";
const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FolioConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    pub storage_path: String,
    /// Comma-separated list of origins allowed by CORS.
    pub cors_origins: String,
    pub llm_api_url: String,
    pub llm_model: String,
    #[serde(default)]
    pub llm_api_key: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
    #[serde(default)]
    pub admin_password: Option<String>,
    #[serde(default)]
    pub admin_token: Option<String>,
}

/// Conventional unprefixed variables (`PORT`, `GROQ_API_KEY`, ...) used as defaults.
#[derive(Debug, Clone, Default)]
pub struct EnvFallbacks {
    pub port: Option<u16>,
    pub client_url: Option<String>,
    pub groq_api_key: Option<String>,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

impl EnvFallbacks {
    pub fn from_env() -> Self {
        let port = env_opt_string("PORT").and_then(|p| match p.parse::<u16>() {
            Ok(port) => Some(port),
            Err(_) => {
                tracing::warn!(value = %p, "ignoring invalid PORT");
                None
            }
        });
        Self {
            port,
            client_url: env_opt_string("CLIENT_URL"),
            groq_api_key: env_opt_string("GROQ_API_KEY"),
            admin_email: env_opt_string("ADMIN_EMAIL"),
            admin_password: env_opt_string("ADMIN_PASSWORD"),
        }
    }
}

impl FolioConfig {
    /// Load using `FOLIO_CONFIG` (or `config/folio.toml`) and the process environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        let path = std::env::var("FOLIO_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::load_with(Path::new(&path), &EnvFallbacks::from_env())
    }

    pub fn load_with(path: &Path, fallbacks: &EnvFallbacks) -> Result<Self, config::ConfigError> {
        let builder = config::Config::builder()
            .set_default("app_name", "Folio")?
            .set_default("host", "0.0.0.0")?
            .set_default("port", i64::from(fallbacks.port.unwrap_or(DEFAULT_PORT)))?
            .set_default("storage_path", "./data/folio")?
            .set_default(
                "cors_origins",
                fallbacks
                    .client_url
                    .clone()
                    .unwrap_or_else(|| "http://localhost:5173".to_string()),
            )?
            .set_default("llm_api_url", DEFAULT_COMPLETION_URL)?
            .set_default("llm_model", DEFAULT_MODEL)?
            .set_default("llm_api_key", fallbacks.groq_api_key.clone())?
            .set_default("admin_email", fallbacks.admin_email.clone())?
            .set_default("admin_password", fallbacks.admin_password.clone())?;

        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        builder
            .add_source(config::Environment::with_prefix("FOLIO").separator("__"))
            .build()?
            .try_deserialize()
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Allowed CORS origins, trimmed, empties dropped.
    pub fn cors_origin_list(&self) -> Vec<String> {
        self.cors_origins
            .split(',')
            .map(|s| s.trim().trim_end_matches('/').to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn admin_login_enabled(&self) -> bool {
        self.admin_email.as_deref().is_some_and(|s| !s.trim().is_empty())
            && self.admin_password.as_deref().is_some_and(|s| !s.is_empty())
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = FolioConfig::load_with(&dir.path().join("absent.toml"), &EnvFallbacks::default())
            .unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.llm_model, DEFAULT_MODEL);
        assert_eq!(cfg.llm_api_url, DEFAULT_COMPLETION_URL);
        assert_eq!(cfg.cors_origin_list(), vec!["http://localhost:5173"]);
        assert!(cfg.llm_api_key.is_none());
        assert!(!cfg.admin_login_enabled());
    }

    #[test]
    fn file_overrides_conventional_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("folio.toml");
        std::fs::write(
            &path,
            "port = 8080\nllm_model = \"llama-3.3-70b-versatile\"\nadmin_token = \"t0ken\"\n",
        )
        .unwrap();
        let fallbacks = EnvFallbacks {
            port: Some(6000),
            client_url: Some("https://me.dev/, http://localhost:5173".into()),
            groq_api_key: Some("gsk_abc".into()),
            admin_email: Some("admin@me.dev".into()),
            admin_password: Some("hunter2".into()),
        };

        let cfg = FolioConfig::load_with(&path, &fallbacks).unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.llm_model, "llama-3.3-70b-versatile");
        assert_eq!(cfg.admin_token.as_deref(), Some("t0ken"));
        assert_eq!(cfg.llm_api_key.as_deref(), Some("gsk_abc"));
        assert_eq!(
            cfg.cors_origin_list(),
            vec!["https://me.dev", "http://localhost:5173"]
        );
        assert!(cfg.admin_login_enabled());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
    }
}
