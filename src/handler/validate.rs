use tracing::error;

use crate::config::settings::ServiceConfig;
use crate::errors::ValidationError;
use crate::handler::event::{ScanEvent, ScanRequest};

/// Check the environment and the event, logging every missing item.
///
/// Stage values are not checked here: an unknown stage only disables
/// delivery.
pub fn validate_input(event: &ScanEvent, config: &ServiceConfig) -> Result<ScanRequest, ValidationError> {
    let mut missing = Vec::new();

    let stage = config.settings.stage.resolve().ok();
    if stage.is_none() {
        if let Some(item) = config.settings.stage.describe_missing("settings.stage") {
            missing.push(item);
        }
    }
    missing.extend(config.auth.missing());

    let required = [
        ("github_auth_token", &event.github_auth_token),
        ("repository", &event.repository),
        ("repository_id", &event.repository_id),
        ("project_id", &event.project_id),
        ("project_sfid", &event.project_sfid),
    ];
    for (name, value) in required {
        if value.is_none() {
            missing.push(format!("{} from event data", name));
        }
    }

    for item in &missing {
        error!("unable to generate criticality score report - missing {}", item);
    }

    match (stage, missing.is_empty()) {
        (Some(stage), true) => Ok(ScanRequest {
            stage,
            repository: event.repository.clone().unwrap_or_default(),
            repository_id: event.repository_id.clone().unwrap_or_default(),
            project_id: event.project_id.clone().unwrap_or_default(),
            project_sfid: event.project_sfid.clone().unwrap_or_default(),
            project_name: event.project_name.clone(),
            github_auth_token: event.github_auth_token.clone().unwrap_or_default(),
        }),
        _ => Err(ValidationError { missing }),
    }
}
