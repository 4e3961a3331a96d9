// src/config/validate.rs

use crate::config::model::GroupFile;
use crate::errors::{FleetrunError, Result};
use crate::remote::Target;

/// Validate a group and resolve it into concrete targets.
///
/// - Defaults from `[default]` are applied per target.
/// - With no selectors, every target is returned.
/// - Each selector is a substring matched against target names and must
///   match exactly one target.
///
/// The result is ordered by target name (the group file's `BTreeMap`
/// order), which is also the order used for status lines and the final
/// report.
pub fn resolve_targets(group: &GroupFile, selectors: &[String]) -> Result<Vec<Target>> {
    validate_group(group)?;

    let all: Vec<Target> = group
        .target
        .iter()
        .map(|(name, cfg)| resolve_one(group, name, cfg))
        .collect::<Result<_>>()?;

    if selectors.is_empty() {
        return Ok(all);
    }

    let mut picked: Vec<&Target> = Vec::with_capacity(selectors.len());
    for selector in selectors {
        let matches: Vec<&Target> = all
            .iter()
            .filter(|t| t.name.contains(selector.as_str()))
            .collect();
        match matches.as_slice() {
            [one] => {
                if !picked.iter().any(|t| t.name == one.name) {
                    picked.push(one);
                }
            }
            [] => {
                return Err(FleetrunError::ConfigError(format!(
                    "selector '{selector}' matches no target"
                )));
            }
            many => {
                let names: Vec<&str> = many.iter().map(|t| t.name.as_str()).collect();
                return Err(FleetrunError::ConfigError(format!(
                    "selector '{selector}' is ambiguous: matches {}",
                    names.join(", ")
                )));
            }
        }
    }

    picked.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(picked.into_iter().cloned().collect())
}

fn validate_group(group: &GroupFile) -> Result<()> {
    if group.target.is_empty() {
        return Err(FleetrunError::ConfigError(
            "group must contain at least one [target.<name>] section".to_string(),
        ));
    }
    for name in group.target.keys() {
        if name.is_empty() || name.contains('/') {
            return Err(FleetrunError::ConfigError(format!(
                "invalid target name '{name}' (must be non-empty, without '/')"
            )));
        }
    }
    Ok(())
}

fn resolve_one(
    group: &GroupFile,
    name: &str,
    cfg: &crate::config::model::TargetConfig,
) -> Result<Target> {
    if cfg.host.trim().is_empty() {
        return Err(FleetrunError::ConfigError(format!(
            "target '{name}' has an empty host"
        )));
    }
    let user = cfg
        .user
        .clone()
        .or_else(|| group.default.user.clone())
        .ok_or_else(|| {
            FleetrunError::ConfigError(format!(
                "target '{name}' has no user and [default] sets none"
            ))
        })?;

    Ok(Target {
        name: name.to_string(),
        host: cfg.host.clone(),
        port: cfg.port.or(group.default.port).unwrap_or(22),
        user,
        ssh_key: cfg.ssh_key.clone().or_else(|| group.default.ssh_key.clone()),
    })
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::path::PathBuf;

    use crate::config::model::{DefaultSection, TargetConfig};

    use super::*;

    fn group() -> GroupFile {
        let mut target = BTreeMap::new();
        target.insert(
            "node0".to_string(),
            TargetConfig {
                host: "203.0.113.7".to_string(),
                user: None,
                ssh_key: None,
                port: None,
            },
        );
        target.insert(
            "node1".to_string(),
            TargetConfig {
                host: "203.0.113.8".to_string(),
                user: Some("admin".to_string()),
                ssh_key: None,
                port: Some(2222),
            },
        );
        GroupFile {
            default: DefaultSection {
                user: Some("ops".to_string()),
                ssh_key: Some(PathBuf::from("/key")),
                port: None,
            },
            target,
        }
    }

    #[test]
    fn defaults_are_applied() {
        let targets = resolve_targets(&group(), &[]).unwrap();
        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].name, "node0");
        assert_eq!(targets[0].user, "ops");
        assert_eq!(targets[0].port, 22);
        assert_eq!(targets[0].ssh_key, Some(PathBuf::from("/key")));
        assert_eq!(targets[1].user, "admin");
        assert_eq!(targets[1].port, 2222);
    }

    #[test]
    fn selector_picks_exactly_one() {
        let targets = resolve_targets(&group(), &["de1".to_string()]).unwrap();
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].name, "node1");
    }

    #[test]
    fn ambiguous_selector_is_an_error() {
        let err = resolve_targets(&group(), &["node".to_string()]).unwrap_err();
        assert!(matches!(err, FleetrunError::ConfigError(_)));
    }

    #[test]
    fn unmatched_selector_is_an_error() {
        let err = resolve_targets(&group(), &["gone".to_string()]).unwrap_err();
        assert!(matches!(err, FleetrunError::ConfigError(_)));
    }

    #[test]
    fn empty_group_is_an_error() {
        let empty = GroupFile::default();
        assert!(resolve_targets(&empty, &[]).is_err());
    }

    #[test]
    fn missing_user_is_an_error() {
        let mut g = group();
        g.default.user = None;
        let err = resolve_targets(&g, &[]).unwrap_err();
        assert!(matches!(err, FleetrunError::ConfigError(_)));
    }
}
