use crate::error::ActionError;
use crate::ActionEnv;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tocsin_common::RunContext;

const ALERT_URL: &str = "https://api.opsgenie.com/v1/json/alert";

/// Creates an alert through the OpsGenie v1 JSON API. The whole mapping
/// is posted as-is with the API key merged in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OpsGenieAction {
    /// Required by the API; checked at perform time so templated alerts
    /// can fail with a clear error.
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub teams: Vec<String>,
    /// Dedup alias; defaults to the alert name.
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub recipients: Vec<String>,
    #[serde(default)]
    pub actions: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub tags: String,
    #[serde(default)]
    pub details: HashMap<String, String>,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub note: String,
}

impl OpsGenieAction {
    pub(crate) async fn perform(
        &self,
        ctx: &RunContext,
        env: &ActionEnv,
    ) -> Result<(), ActionError> {
        let Some(api_key) = env.opsgenie_key.as_deref().filter(|k| !k.is_empty()) else {
            return Err(ActionError::MissingCredential { service: "opsgenie" });
        };
        if self.message.is_empty() {
            return Err(ActionError::MissingField("message"));
        }

        let mut body = serde_json::to_value(self)?;
        body["apiKey"] = api_key.into();
        if self.alias.is_empty() {
            body["alias"] = ctx.name.as_str().into();
        }

        let resp = env.http.post(ALERT_URL).json(&body).send().await?;
        // TODO: surface non-2xx responses as errors; they have always been
        // silently drained here.
        let _ = resp.bytes().await;
        Ok(())
    }
}
