//! Runtime configuration.
//!
//! Values are read from environment variables first; command-line flags
//! (`--bind`, `--backend`) override them.

use anyhow::{Result, anyhow};
use std::net::SocketAddr;
use std::str::FromStr;

/// Which search backend the server talks to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Elasticsearch,
    Memory,
}

impl FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "elasticsearch" | "es" => Ok(BackendKind::Elasticsearch),
            "memory" => Ok(BackendKind::Memory),
            other => Err(anyhow!("Unknown search backend: {}", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub elasticsearch_url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub accept_invalid_certs: bool,
    pub products_index: String,
    pub bind_addr: SocketAddr,
    pub backend: BackendKind,
    pub log_level: tracing::Level,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary variable source. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let username = var("ELASTICSEARCH_USERNAME", "elastic");
        let password = var("ELASTICSEARCH_PASSWORD", "changeme");

        Ok(Self {
            elasticsearch_url: var("ELASTICSEARCH_URL", "http://localhost:9200"),
            username: (!username.is_empty()).then_some(username),
            password: (!password.is_empty()).then_some(password),
            accept_invalid_certs: parse_bool(&var("ELASTICSEARCH_ACCEPT_INVALID_CERTS", "true"))?,
            products_index: var("PRODUCTS_INDEX", "products"),
            bind_addr: var("BIND_ADDR", "0.0.0.0:3000").parse()?,
            backend: var("SEARCH_BACKEND", "elasticsearch").parse()?,
            log_level: var("LOG_LEVEL", "INFO")
                .parse()
                .map_err(|e| anyhow!("Invalid LOG_LEVEL: {}", e))?,
        })
    }

    /// Applies command-line overrides. Unknown arguments are ignored.
    pub fn apply_args(&mut self, args: &[String]) -> Result<()> {
        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "--bind" => {
                    let value = args.get(i + 1).ok_or_else(|| anyhow!("--bind needs a value"))?;
                    self.bind_addr = value.parse()?;
                    i += 2;
                }
                "--backend" => {
                    let value = args
                        .get(i + 1)
                        .ok_or_else(|| anyhow!("--backend needs a value"))?;
                    self.backend = value.parse()?;
                    i += 2;
                }
                _ => {
                    i += 1;
                }
            }
        }
        Ok(())
    }
}

/// Usage text for the binary. `args[0]` names the program when present.
pub fn usage(args: &[String]) -> String {
    let program = args
        .first()
        .map(String::as_str)
        .unwrap_or(env!("CARGO_PKG_NAME"));
    format!(
        "Usage: {0} [--bind <addr:port>] [--backend <elasticsearch|memory>]\n\
         Example: {0} --bind 127.0.0.1:3000 --backend memory",
        program
    )
}

fn parse_bool(value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(anyhow!("Expected a boolean, got '{}'", other)),
    }
}
