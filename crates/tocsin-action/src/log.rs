use crate::error::ActionError;
use serde::Deserialize;

/// Prints a log message and nothing else. Useful while developing an
/// alert before wiring up real actions.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LogAction {
    #[serde(default)]
    pub message: String,
}

impl LogAction {
    pub(crate) fn perform(&self) -> Result<(), ActionError> {
        tracing::info!(message = %self.message, "log action");
        Ok(())
    }
}
