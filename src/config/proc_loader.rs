use std::{fs, path::Path};

use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::ServiceConfig;
use crate::errors::ConfigError;

/// Load config from YAML file, expanding `${VAR}` and `${VAR:default}`
pub fn file_to_config(path: &Path) -> Result<ServiceConfig, ConfigError> {
    let content = fs::read_to_string(path)
        .map_err(|e| ConfigError::InvalidFormat(format!("{}: {}", path.display(), e)))?;

    let expanded = expand_env_vars(&content);
    parse_config(&expanded)
}

pub fn parse_config(content: &str) -> Result<ServiceConfig, ConfigError> {
    // an empty document is a valid, all-defaults config
    if content.trim().is_empty() {
        return Ok(ServiceConfig::default());
    }
    let service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;

    debug!("config parsed, stage source: {:?}", service_config.settings.stage);
    Ok(service_config)
}

pub fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("valid env var pattern");
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
