use crate::error::ActionError;
use crate::ActionEnv;
use serde::Deserialize;
use serde_json::Map;
use tocsin_common::RunContext;

const EVENTS_URL: &str = "https://events.pagerduty.com/generic/2010-04-15/create_event.json";

/// Submits a trigger event to the PagerDuty Events v1 API.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PagerDutyAction {
    /// Dedup key for the incident; defaults to the alert name.
    #[serde(default)]
    pub incident_key: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub details: Map<String, serde_json::Value>,
}

impl PagerDutyAction {
    pub(crate) async fn perform(
        &self,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<(), ActionError> {
        let Some(service_key) = env.pagerduty_key.as_deref().filter(|k| !k.is_empty()) else {
            return Err(ActionError::MissingCredential {
                service: "pagerduty",
            });
        };

        let incident_key = if self.incident_key.is_empty() {
            ctx.name.as_str()
        } else {
            self.incident_key.as_str()
        };

        let body = serde_json::json!({
            "service_key": service_key,
            "event_type": "trigger",
            "description": self.description,
            "incident_key": incident_key,
            "details": self.details,
        });

        let resp = env.http.post(EVENTS_URL).json(&body).send().await?;
        // TODO: surface non-2xx responses as errors; they have always been
        // silently drained here.
        let _ = resp.bytes().await;
        Ok(())
    }
}
