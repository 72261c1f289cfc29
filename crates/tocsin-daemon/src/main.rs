use anyhow::Context;
use clap::Parser;
use std::sync::Arc;
use tocsin_daemon::config::Config;
use tocsin_daemon::state::TickDeps;
use tocsin_daemon::{loader, scheduler};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::parse();

    let filter = EnvFilter::try_new(&config.log_level)
        .with_context(|| format!("invalid log level {:?}", config.log_level))?;
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let alerts = loader::load(&config.alerts)?;
    tracing::info!(alerts = alerts.len(), "alert definitions loaded");

    let deps = Arc::new(TickDeps::from_config(&config)?);

    if let Some(name) = &config.force_run {
        return scheduler::force_run(&alerts, &deps, name).await;
    }

    scheduler::run(alerts, deps).await;
    Ok(())
}
