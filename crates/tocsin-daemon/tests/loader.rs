use std::fs;
use tocsin_daemon::loader;

const ALERT_A: &str = r#"
- name: cpu-high
  interval: "* * * * *"
  search_index: metrics
  search_type: doc
  search:
    query:
      match_all: {}
  actions:
    - type: log
      message: cpu is high
- name: disk-full
  interval: "*/5 * * * *"
  search_index: metrics
  search_type: doc
  search: {}
  actions:
    - type: log
      message: disk is full
"#;

const ALERT_B: &str = r#"
- name: errors-spiking
  interval: "0 * * * * *"
  search_index: logs-{{name}}
  search_type: event
  search: {}
  condition:
    lua_inline: return ctx.result.total > 100
  actions:
    - type: pagerduty
      description: error spike
"#;

#[test]
fn loads_every_file_in_a_directory() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.yml"), ALERT_A).unwrap();
    fs::write(dir.path().join("b.yml"), ALERT_B).unwrap();
    fs::create_dir(dir.path().join("nested")).unwrap();

    let alerts = loader::load(dir.path()).unwrap();
    let names: Vec<&str> = alerts.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, vec!["cpu-high", "disk-full", "errors-spiking"]);
}

#[test]
fn loads_a_single_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("alerts.yml");
    fs::write(&file, ALERT_B).unwrap();

    let alerts = loader::load(&file).unwrap();
    assert_eq!(alerts.len(), 1);
    assert_eq!(alerts[0].name, "errors-spiking");
}

#[test]
fn duplicate_alert_names_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.yml"), ALERT_A).unwrap();
    fs::write(dir.path().join("b.yml"), ALERT_A).unwrap();

    let err = loader::load(dir.path()).unwrap_err();
    assert!(err.to_string().contains("duplicate alert name"));
}

#[test]
fn unparseable_files_are_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("alerts.yml");
    fs::write(&file, "this is not an alert file").unwrap();
    assert!(loader::load(&file).is_err());
}

#[test]
fn bad_interval_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("alerts.yml");
    fs::write(
        &file,
        r#"
- name: broken
  interval: whenever
  actions: [{type: log}]
"#,
    )
    .unwrap();
    let err = loader::load(&file).unwrap_err();
    assert!(err.to_string().contains("initializing alert"));
}

#[test]
fn missing_path_is_fatal() {
    assert!(loader::load(std::path::Path::new("/nonexistent/alerts")).is_err());
}
