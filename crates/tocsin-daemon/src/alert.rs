use crate::state::TickDeps;
use crate::template::TemplateSet;
use anyhow::Context;
use chrono::{DateTime, Utc};
use cron::Schedule;
use serde::Deserialize;
use serde_json::Value;
use std::str::FromStr;
use tocsin_action::Action;
use tocsin_common::RunContext;
use tocsin_script::ScriptRef;

const TPL_SEARCH_INDEX: &str = "search_index";
const TPL_SEARCH_TYPE: &str = "search_type";
const TPL_SEARCH: &str = "search";

fn action_slot(i: usize) -> String {
    format!("action.{i}")
}

/// An alert definition as written in an alert file: a search run on a cron
/// interval, a condition checked against the result, and the actions
/// performed when the condition holds.
#[derive(Debug, Deserialize)]
pub struct AlertDef {
    pub name: String,
    pub interval: String,
    #[serde(default)]
    pub search_index: String,
    #[serde(default)]
    pub search_type: String,
    #[serde(default)]
    pub search: Value,
    #[serde(default)]
    pub condition: Option<ScriptRef>,
    #[serde(default)]
    pub actions: Vec<Value>,
}

/// A compiled alert: parsed schedule, compiled templates, validated
/// condition. Immutable once compiled; ticks share it through an `Arc`.
#[derive(Debug)]
pub struct Alert {
    pub name: String,
    schedule: Schedule,
    templates: TemplateSet,
    condition: Option<ScriptRef>,
    action_count: usize,
}

impl Alert {
    pub fn compile(def: AlertDef) -> anyhow::Result<Self> {
        let schedule = parse_interval(&def.interval)
            .with_context(|| format!("parsing interval {:?}", def.interval))?;

        let mut templates = TemplateSet::new();
        templates.add_string(TPL_SEARCH_INDEX, &def.search_index)?;
        templates.add_string(TPL_SEARCH_TYPE, &def.search_type)?;
        templates.add_value(TPL_SEARCH, &def.search)?;
        for (i, action) in def.actions.iter().enumerate() {
            templates.add_value(&action_slot(i), action)?;
        }

        let condition = match def.condition {
            Some(c) => {
                c.validate().context("validating condition")?;
                // a condition stanza with no source means "always fire"
                (!c.is_empty()).then_some(c)
            }
            None => None,
        };

        let alert = Self {
            name: def.name,
            schedule,
            templates,
            condition,
            action_count: def.actions.len(),
        };
        if alert.next_tick(Utc::now()).is_none() {
            anyhow::bail!("interval {:?} has no upcoming ticks", def.interval);
        }
        Ok(alert)
    }

    pub fn next_tick(&self, after: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.schedule.after(&after).next()
    }

    /// Renders the three search templates into a concrete search request.
    pub fn render_search(&self, ctx: &Value) -> anyhow::Result<(String, String, Value)> {
        let index = self.templates.render(TPL_SEARCH_INDEX, ctx)?;
        let doc_type = self.templates.render(TPL_SEARCH_TYPE, ctx)?;
        let query = self.templates.render_value(TPL_SEARCH, ctx)?;
        Ok((index, doc_type, query))
    }

    /// Renders every action template and decodes the results, in declared
    /// order.
    pub fn render_actions(&self, ctx: &Value) -> anyhow::Result<Vec<Action>> {
        (0..self.action_count)
            .map(|i| {
                let value = self.templates.render_value(&action_slot(i), ctx)?;
                Action::from_value(value).with_context(|| format!("decoding action {i}"))
            })
            .collect()
    }

    /// One tick of the pipeline. Errors abort the tick and are logged, not
    /// retried; the next scheduled tick is the retry.
    pub async fn run(&self, deps: &TickDeps) {
        tracing::info!(alert = %self.name, "running alert");

        if self.action_count == 0 {
            tracing::warn!(alert = %self.name, "no actions defined, not even going to bother running");
            return;
        }

        let mut ctx = RunContext::new(self.name.clone(), Utc::now());

        let (index, doc_type, query) = match self.render_search(&ctx.to_value()) {
            Ok(parts) => parts,
            Err(e) => {
                tracing::error!(alert = %self.name, error = %e, "failed to create search data");
                return;
            }
        };

        tracing::debug!(alert = %self.name, index = %index, "running search step");
        match deps.search.search(&index, &doc_type, &query).await {
            Ok(result) => ctx.result = Some(result),
            Err(e) if e.is_index_missing() && deps.warn_missing_index => {
                tracing::warn!(alert = %self.name, error = %e, "failed at search step");
                return;
            }
            Err(e) => {
                tracing::error!(alert = %self.name, error = %e, "failed at search step");
                return;
            }
        }

        if let Some(condition) = &self.condition {
            tracing::debug!(alert = %self.name, "running condition step");
            match deps.scripts.eval(ctx.to_value(), condition).await {
                Ok(Value::Bool(true)) => {}
                Ok(_) => {
                    tracing::debug!(alert = %self.name, "condition not met, skipping actions");
                    return;
                }
                Err(e) => {
                    tracing::error!(alert = %self.name, error = %e, "failed at condition step");
                    return;
                }
            }
        }

        let actions = match self.render_actions(&ctx.to_value()) {
            Ok(actions) => actions,
            Err(e) => {
                tracing::error!(alert = %self.name, error = %e, "failed to create action data");
                return;
            }
        };

        for action in &actions {
            tracing::info!(alert = %self.name, action = action.kind(), "performing action");
            if let Err(e) = action.perform(&ctx, &deps.actions).await {
                tracing::error!(
                    alert = %self.name,
                    action = action.kind(),
                    error = %e,
                    "failed to complete action"
                );
                return;
            }
        }
    }
}

/// Parses a cron interval. Plain 5-field crontab expressions get a zero
/// seconds field prepended; 6/7-field extended expressions pass through.
pub fn parse_interval(interval: &str) -> anyhow::Result<Schedule> {
    let interval = interval.trim();
    let normalized = if interval.split_whitespace().count() == 5 {
        format!("0 {interval}")
    } else {
        interval.to_string()
    };
    Ok(Schedule::from_str(&normalized)?)
}
