use std::path::Path;
use anyhow::{anyhow, Result};

use crate::config::proc_loader::file_to_config;
use crate::config::settings::ServiceConfig;

/// Load the YAML config if a path is given, otherwise run on defaults.
pub fn run(config_path: Option<&str>) -> Result<ServiceConfig> {
    match config_path {
        Some(config_path) => {
            let path = Path::new(config_path);
            file_to_config(path).map_err(|e| anyhow!(format!("Invalid config format: {}", e)))
        }
        None => Ok(ServiceConfig::default()),
    }
}
