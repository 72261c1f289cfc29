use crate::alert::{Alert, AlertDef};
use anyhow::Context;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Loads and compiles every alert under `path`: a directory means every
/// non-directory entry in it (no recursion), anything else is read as a
/// single file. Each file holds a YAML sequence of alert definitions. Any
/// failure is fatal to startup.
pub fn load(path: &Path) -> anyhow::Result<Vec<Arc<Alert>>> {
    let meta = fs::metadata(path)
        .with_context(|| format!("reading alert definitions at {}", path.display()))?;

    let mut files = Vec::new();
    if meta.is_dir() {
        for entry in
            fs::read_dir(path).with_context(|| format!("listing {}", path.display()))?
        {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                files.push(entry.path());
            }
        }
        files.sort();
    } else {
        files.push(path.to_path_buf());
    }

    let mut alerts: Vec<Arc<Alert>> = Vec::new();
    let mut names: HashSet<String> = HashSet::new();

    for file in files {
        let raw = fs::read_to_string(&file)
            .with_context(|| format!("reading alert file {}", file.display()))?;
        let defs: Vec<AlertDef> = serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing alert file {}", file.display()))?;

        for def in defs {
            tracing::info!(file = %file.display(), alert = %def.name, "initializing alert");
            if !names.insert(def.name.clone()) {
                anyhow::bail!(
                    "duplicate alert name {:?} in {}",
                    def.name,
                    file.display()
                );
            }
            let alert = Alert::compile(def)
                .with_context(|| format!("initializing alert in {}", file.display()))?;
            alerts.push(Arc::new(alert));
        }
    }

    Ok(alerts)
}
