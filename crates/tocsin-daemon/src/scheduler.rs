use crate::alert::Alert;
use crate::state::TickDeps;
use anyhow::Context;
use chrono::Utc;
use std::sync::Arc;

/// Starts one driver task per alert and then parks forever. Each driver
/// sleeps until the next cron instant and launches the tick in its own
/// task, so a slow tick never delays the following wake-up, neither for
/// its own alert nor for any other.
pub async fn run(alerts: Vec<Arc<Alert>>, deps: Arc<TickDeps>) {
    for alert in alerts {
        tokio::spawn(drive(alert, deps.clone()));
    }
    std::future::pending::<()>().await
}

async fn drive(alert: Arc<Alert>, deps: Arc<TickDeps>) {
    loop {
        let now = Utc::now();
        let Some(next) = alert.next_tick(now) else {
            // validated at compile time; only reachable for schedules that
            // run out (e.g. an explicit year)
            tracing::warn!(alert = %alert.name, "no upcoming ticks, stopping driver");
            return;
        };

        let wait = (next - now).to_std().unwrap_or_default();
        tokio::time::sleep(wait).await;

        let alert = alert.clone();
        let deps = deps.clone();
        tokio::spawn(async move { alert.run(&deps).await });
    }
}

/// Runs the named alert exactly once in the foreground. An unknown name
/// is an error, which the binary turns into a non-zero exit.
pub async fn force_run(
    alerts: &[Arc<Alert>],
    deps: &TickDeps,
    name: &str,
) -> anyhow::Result<()> {
    let alert = alerts
        .iter()
        .find(|a| a.name == name)
        .with_context(|| format!("no alert named {name:?}"))?;
    alert.run(deps).await;
    Ok(())
}
