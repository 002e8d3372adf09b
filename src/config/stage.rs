use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

use crate::errors::DeliveryError;

/// Deployment environment selecting the ingestion endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Dev,
    Staging,
    Prod,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::Dev => "dev",
            Stage::Staging => "staging",
            Stage::Prod => "prod",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Stage {
    type Err = DeliveryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dev" => Ok(Stage::Dev),
            "staging" => Ok(Stage::Staging),
            "prod" => Ok(Stage::Prod),
            other => Err(DeliveryError::UnknownStage(other.to_owned())),
        }
    }
}

/// Base URLs of the security service API gateway, per stage.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EndpointsConfig {
    #[serde(default = "default_dev")]
    pub dev: String,
    #[serde(default = "default_staging")]
    pub staging: String,
    #[serde(default = "default_prod")]
    pub prod: String,
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            dev: default_dev(),
            staging: default_staging(),
            prod: default_prod(),
        }
    }
}

impl EndpointsConfig {
    pub fn base_url(&self, stage: Stage) -> &str {
        match stage {
            Stage::Dev => &self.dev,
            Stage::Staging => &self.staging,
            Stage::Prod => &self.prod,
        }
    }

    pub fn scores_url(&self, stage: Stage, project_sfid: &str) -> String {
        format!(
            "{}/security-service/v2/{}/ossf-scores",
            self.base_url(stage).trim_end_matches('/'),
            project_sfid
        )
    }
}

fn default_dev() -> String {
    "https://api-gw.dev.platform.linuxfoundation.org".to_string()
}

fn default_staging() -> String {
    "https://api-gw.staging.platform.linuxfoundation.org".to_string()
}

fn default_prod() -> String {
    "https://api-gw.platform.linuxfoundation.org".to_string()
}
