// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::GroupFile;
use crate::errors::{FleetrunError, Result};

/// Directory holding group files (`~/.fleetrun/groups`).
pub fn groups_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".fleetrun")
        .join("groups")
}

/// Path of one group's file.
pub fn group_path(name: &str) -> PathBuf {
    groups_dir().join(format!("{name}.toml"))
}

/// Load a group by name from the groups directory.
pub fn load_group(name: &str) -> Result<GroupFile> {
    let path = group_path(name);
    if !path.is_file() {
        return Err(FleetrunError::GroupNotFound(name.to_string()));
    }
    load_group_from_path(&path)
}

/// Load a group file from an explicit path.
///
/// This only performs TOML deserialization; semantic validation and
/// target resolution live in [`validate`].
///
/// [`validate`]: crate::config::validate
pub fn load_group_from_path(path: impl AsRef<Path>) -> Result<GroupFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let group: GroupFile = toml::from_str(&contents)?;
    Ok(group)
}

/// Names of all configured groups, sorted.
pub fn list_groups() -> Result<Vec<String>> {
    let dir = groups_dir();
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.extension().is_some_and(|ext| ext == "toml") {
            if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                names.push(stem.to_string());
            }
        }
    }
    names.sort();
    Ok(names)
}
