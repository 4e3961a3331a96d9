// src/config/model.rs

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::Deserialize;

/// Top-level group file as read from TOML.
///
/// All sections are optional except that at least one `[target.<name>]`
/// must be present (checked by [`validate`]).
///
/// [`validate`]: crate::config::validate
#[derive(Debug, Clone, Default, Deserialize)]
pub struct GroupFile {
    /// Defaults applied to targets that do not override them.
    #[serde(default)]
    pub default: DefaultSection,

    /// All targets from `[target.<name>]`, keyed by target name.
    #[serde(default)]
    pub target: BTreeMap<String, TargetConfig>,
}

/// `[default]` section.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DefaultSection {
    /// Default login user.
    #[serde(default)]
    pub user: Option<String>,

    /// Default private key path.
    #[serde(default)]
    pub ssh_key: Option<PathBuf>,

    /// Default ssh port (22 when absent).
    #[serde(default)]
    pub port: Option<u16>,
}

/// `[target.<name>]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Network address (hostname or IP).
    pub host: String,

    /// Login user; falls back to `default.user`.
    #[serde(default)]
    pub user: Option<String>,

    /// Private key path; falls back to `default.ssh_key`.
    #[serde(default)]
    pub ssh_key: Option<PathBuf>,

    /// Ssh port; falls back to `default.port`, then 22.
    #[serde(default)]
    pub port: Option<u16>,
}
