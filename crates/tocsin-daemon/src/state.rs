use crate::config::Config;
use anyhow::Context;
use tocsin_action::ActionEnv;
use tocsin_script::ScriptPool;
use tocsin_search::SearchClient;

/// Everything a tick needs, built once at startup and shared by every
/// concurrently running tick.
pub struct TickDeps {
    pub search: SearchClient,
    pub scripts: ScriptPool,
    pub actions: ActionEnv,
    pub warn_missing_index: bool,
}

impl TickDeps {
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let scripts = ScriptPool::spawn(config.lua_vms, config.lua_init.clone())
            .context("initializing lua vms")?;

        Ok(Self {
            search: SearchClient::new(&config.elasticsearch_addr),
            scripts,
            actions: ActionEnv {
                http: reqwest::Client::new(),
                pagerduty_key: config.pagerduty_key.clone(),
                opsgenie_key: config.opsgenie_key.clone(),
            },
            warn_missing_index: config.warn_missing_index,
        })
    }
}
