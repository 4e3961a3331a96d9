// src/config/mod.rs

//! Group configuration.
//!
//! A *group* is a named, ordered set of targets, stored as a TOML file
//! under the groups directory (`~/.fleetrun/groups/<name>.toml`):
//!
//! ```toml
//! [default]
//! user = "ops"
//! ssh_key = "/home/ops/.ssh/id_ed25519"
//!
//! [target.node0]
//! host = "203.0.113.7"
//!
//! [target.node1]
//! host = "203.0.113.8"
//! user = "admin"
//! port = 2222
//! ```
//!
//! - [`model`] is the serde mapping of that file.
//! - [`loader`] finds and reads group files.
//! - [`validate`] checks a loaded group and resolves it into [`Target`]s.
//!
//! [`Target`]: crate::remote::Target

pub mod loader;
pub mod model;
pub mod validate;

pub use model::{DefaultSection, GroupFile, TargetConfig};
pub use validate::resolve_targets;
