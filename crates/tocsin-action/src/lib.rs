//! The actions an alert can take when its condition fires.
//!
//! Actions are decoded per tick from rendered alert definitions: the
//! lowercased `type` key picks the variant, the remaining fields decode
//! into it. Every variant exposes the same `perform` contract; the first
//! failing action aborts the rest of the tick's actions.

pub mod error;
mod http;
mod log;
mod opsgenie;
mod pagerduty;


pub use error::ActionError;
pub use http::HttpAction;
pub use log::LogAction;
pub use opsgenie::OpsGenieAction;
pub use pagerduty::PagerDutyAction;

use serde_json::Value;
use tocsin_common::RunContext;

/// Shared dispatch environment: one HTTP client for every action in the
/// process, plus the service credentials from the startup config.
#[derive(Debug, Clone, Default)]
pub struct ActionEnv {
    pub http: reqwest::Client,
    pub pagerduty_key: Option<String>,
    pub opsgenie_key: Option<String>,
}

/// A decoded action, tagged by its `type` discriminator.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    Log(LogAction),
    Http(HttpAction),
    PagerDuty(PagerDutyAction),
    OpsGenie(OpsGenieAction),
}

impl Action {
    /// Decodes an action from a rendered definition mapping. The `type`
    /// key is matched case-insensitively; everything else is exact.
    pub fn from_value(value: Value) -> Result<Self, ActionError> {
        let kind = value
            .get("type")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase();

        match kind.as_str() {
            "log" => Ok(Action::Log(serde_json::from_value(value)?)),
            "http" => Ok(Action::Http(serde_json::from_value(value)?)),
            "pagerduty" => Ok(Action::PagerDuty(serde_json::from_value(value)?)),
            "opsgenie" => Ok(Action::OpsGenie(serde_json::from_value(value)?)),
            _ => Err(ActionError::UnknownType(kind)),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Action::Log(_) => "log",
            Action::Http(_) => "http",
            Action::PagerDuty(_) => "pagerduty",
            Action::OpsGenie(_) => "opsgenie",
        }
    }

    /// Performs the action once. Errors abort the tick's remaining
    /// actions; nothing is retried.
    pub async fn perform(&self, ctx: &RunContext, env: &ActionEnv) -> Result<(), ActionError> {
        match self {
            Action::Log(a) => a.perform(),
            Action::Http(a) => a.perform(env).await,
            Action::PagerDuty(a) => a.perform(ctx, env).await,
            Action::OpsGenie(a) => a.perform(ctx, env).await,
        }
    }
}
