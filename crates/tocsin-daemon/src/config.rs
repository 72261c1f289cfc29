use clap::Parser;
use std::path::PathBuf;

/// Process-wide configuration, parsed once at startup and read-only after
/// that. Components receive what they need at construction rather than
/// reaching for globals.
#[derive(Debug, Clone, Parser)]
#[command(name = "tocsin", version, about = "Periodic alerting against an elasticsearch backend")]
pub struct Config {
    /// A yaml file, or directory of yaml files, containing alert definitions
    #[arg(short = 'a', long = "alerts", value_name = "PATH")]
    pub alerts: PathBuf,

    /// Address of the elasticsearch instance to query
    #[arg(long = "elasticsearch-addr", default_value = "127.0.0.1:9200")]
    pub elasticsearch_addr: String,

    /// Lua script executed once at the initialization of every vm
    #[arg(long = "lua-init", value_name = "PATH")]
    pub lua_init: Option<PathBuf>,

    /// How many lua vms to run. Each is independent; scripts execute on
    /// whichever vm is free, so blocking calls don't serialize everything
    #[arg(long = "lua-vms", default_value_t = 1)]
    pub lua_vms: usize,

    /// PagerDuty api key, required if any alert uses pagerduty actions
    #[arg(long = "pagerduty-key")]
    pub pagerduty_key: Option<String>,

    /// OpsGenie api key, required if any alert uses opsgenie actions
    #[arg(long = "opsgenie-key")]
    pub opsgenie_key: Option<String>,

    /// Run the named alert once in the foreground and exit. Useful for
    /// testing changes to alert definitions
    #[arg(long = "force-run", value_name = "ALERT")]
    pub force_run: Option<String>,

    /// Log a warning instead of an error when a search hits a missing index
    #[arg(long = "warn-missing-index")]
    pub warn_missing_index: bool,

    /// Log level: error, warn, info or debug
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}
