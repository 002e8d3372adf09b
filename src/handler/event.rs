use serde_json::Value;
use tracing::warn;

/// Inbound invocation payload. Fields are `None` when absent; an empty
/// string still counts as present.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanEvent {
    pub repository: Option<String>,
    pub repository_id: Option<String>,
    pub project_id: Option<String>,
    pub project_sfid: Option<String>,
    pub project_name: Option<String>,
    pub github_auth_token: Option<String>,
}

/// A validated event plus the stage it runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub stage: String,
    pub repository: String,
    pub repository_id: String,
    pub project_id: String,
    pub project_sfid: String,
    pub project_name: Option<String>,
    pub github_auth_token: String,
}

impl ScanEvent {
    /// Read the event, unwrapping a JSON-encoded `body` field if present.
    pub fn from_value(event: &Value) -> Self {
        let unwrapped;
        let event = match event.get("body") {
            Some(Value::String(body)) => match serde_json::from_str::<Value>(body) {
                Ok(parsed) => {
                    unwrapped = parsed;
                    &unwrapped
                }
                Err(e) => {
                    warn!("event body is not valid JSON: {}", e);
                    event
                }
            },
            Some(body @ Value::Object(_)) => body,
            _ => event,
        };

        Self {
            repository: field(event, "repository"),
            repository_id: field(event, "repository_id"),
            project_id: field(event, "project_id"),
            project_sfid: field(event, "project_sfid"),
            project_name: field(event, "project_name"),
            github_auth_token: field(event, "github_auth_token"),
        }
    }
}

fn field(event: &Value, name: &str) -> Option<String> {
    match event.get(name)? {
        Value::String(s) => Some(s.to_owned()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}
