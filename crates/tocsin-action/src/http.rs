use crate::error::ActionError;
use crate::ActionEnv;
use reqwest::Method;
use serde::Deserialize;
use std::collections::HashMap;

/// One HTTP request with a fully caller-controlled method, URL, headers
/// and body. Anything outside 2xx is a failure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct HttpAction {
    #[serde(default)]
    pub method: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    #[serde(default)]
    pub body: String,
}

impl HttpAction {
    pub(crate) async fn perform(&self, env: &ActionEnv) -> Result<(), ActionError> {
        let method = if self.method.is_empty() {
            Method::GET
        } else {
            Method::from_bytes(self.method.to_uppercase().as_bytes())
                .map_err(|_| ActionError::InvalidMethod(self.method.clone()))?
        };

        let mut req = env.http.request(method, &self.url);
        for (name, value) in &self.headers {
            req = req.header(name, value);
        }
        let resp = req.body(self.body.clone()).send().await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ActionError::BadStatus(status.as_u16()));
        }
        Ok(())
    }
}
