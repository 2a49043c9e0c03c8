//! Configuration loading from disk and the environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{RelayConfig, ResolverMode};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: {value:?}")]
    Env { key: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),

    #[error("Invalid header name: {0}")]
    Header(#[from] axum::http::header::InvalidHeaderName),

    #[error("HTTP client setup failed: {0}")]
    HttpClient(#[from] reqwest::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse configuration from a TOML file without validating it.
pub fn read_config(path: &Path) -> Result<RelayConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Build the startup configuration: defaults, then the optional file, then
/// `FC_SVC_*` environment variables, then validation.
pub fn load_config(path: Option<&Path>) -> Result<RelayConfig, ConfigError> {
    let mut config = match path {
        Some(path) => read_config(path)?,
        None => RelayConfig::default(),
    };

    apply_env(&mut config, |key| std::env::var(key).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values onto `config`.
///
/// `lookup` is injected so tests do not have to mutate the process environment.
pub fn apply_env<F>(config: &mut RelayConfig, lookup: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(name) = lookup("FC_SVC_NAME") {
        config.service.name = name;
    }
    if let Some(secret) = lookup("FC_SVC_SECRET") {
        config.service.secret = secret;
    }
    if let Some(host) = lookup("FC_SVC_HOST") {
        config.listener.host = host;
    }
    if let Some(port) = lookup("FC_SVC_PORT") {
        config.listener.port = port.trim().parse().map_err(|_| ConfigError::Env {
            key: "FC_SVC_PORT",
            value: port.clone(),
        })?;
    }
    if let Some(protocol) = lookup("FC_SVC_PROTOCOL") {
        config.upstream.protocol = protocol;
    }
    if let Some(debug) = lookup("FC_SVC_DEBUG") {
        if parse_flag("FC_SVC_DEBUG", &debug)? {
            config.routing.mode = ResolverMode::Local;
        }
    }
    if let Some(metrics) = lookup("FC_SVC_METRICS") {
        config.observability.metrics_enabled = parse_flag("FC_SVC_METRICS", &metrics)?;
    }
    Ok(())
}

fn parse_flag(key: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        _ => Err(ConfigError::Env {
            key,
            value: value.to_string(),
        }),
    }
}
