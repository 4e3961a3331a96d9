mod common;

use crate::common::builders::{GroupFileBuilder, TargetConfigBuilder};
use crate::common::init_tracing;

use std::error::Error;
use std::path::PathBuf;

use fleetrun::config::loader::load_group_from_path;
use fleetrun::config::resolve_targets;
use fleetrun::errors::FleetrunError;

type TestResult = Result<(), Box<dyn Error>>;

const GROUP_TOML: &str = r#"
[default]
user = "ops"
ssh_key = "/home/ops/.ssh/id_ed25519"

[target.node0]
host = "203.0.113.7"

[target.node1]
host = "203.0.113.8"
user = "admin"
port = 2222
"#;

#[test]
fn group_file_round_trips_through_toml() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("staging.toml");
    std::fs::write(&path, GROUP_TOML)?;

    let group = load_group_from_path(&path)?;
    let targets = resolve_targets(&group, &[])?;

    assert_eq!(targets.len(), 2);
    assert_eq!(targets[0].name, "node0");
    assert_eq!(targets[0].host, "203.0.113.7");
    assert_eq!(targets[0].user, "ops");
    assert_eq!(targets[0].port, 22);
    assert_eq!(
        targets[0].ssh_key,
        Some(PathBuf::from("/home/ops/.ssh/id_ed25519"))
    );
    assert_eq!(targets[1].name, "node1");
    assert_eq!(targets[1].user, "admin");
    assert_eq!(targets[1].port, 2222);
    Ok(())
}

#[test]
fn resolved_target_builds_an_ssh_context() -> TestResult {
    init_tracing();

    let group = GroupFileBuilder::new()
        .with_default_user("ops")
        .with_target("node0", TargetConfigBuilder::new("198.51.100.4").build())
        .build();
    let targets = resolve_targets(&group, &[])?;
    let prefix = targets[0].ssh_prefix();

    assert_eq!(prefix.first().map(String::as_str), Some("ssh"));
    assert_eq!(prefix.last().map(String::as_str), Some("--"));
    assert!(prefix.contains(&"ops@198.51.100.4".to_string()));
    Ok(())
}

#[test]
fn selectors_narrow_the_target_set() -> TestResult {
    init_tracing();

    let group = GroupFileBuilder::new()
        .with_default_user("ops")
        .with_target("db-primary", TargetConfigBuilder::new("10.0.0.1").build())
        .with_target("db-replica", TargetConfigBuilder::new("10.0.0.2").build())
        .with_target("web", TargetConfigBuilder::new("10.0.0.3").build())
        .build();

    let targets = resolve_targets(&group, &["primary".to_string(), "web".to_string()])?;
    let names: Vec<&str> = targets.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["db-primary", "web"]);

    // "db" matches two targets.
    let err = resolve_targets(&group, &["db".to_string()]).unwrap_err();
    assert!(matches!(err, FleetrunError::ConfigError(_)));
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("broken.toml");
    std::fs::write(&path, "[target.node0\nhost =")?;

    let err = load_group_from_path(&path).unwrap_err();
    assert!(matches!(err, FleetrunError::TomlError(_)));
    Ok(())
}

#[test]
fn group_without_targets_fails_validation() -> TestResult {
    init_tracing();

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("empty.toml");
    std::fs::write(&path, "[default]\nuser = \"ops\"\n")?;

    let group = load_group_from_path(&path)?;
    let err = resolve_targets(&group, &[]).unwrap_err();
    assert!(matches!(err, FleetrunError::ConfigError(_)));
    Ok(())
}
