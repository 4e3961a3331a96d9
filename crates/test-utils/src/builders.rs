#![allow(dead_code)]

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use fleetrun::config::{DefaultSection, GroupFile, TargetConfig};
use fleetrun::exec::ExecutionContext;
use fleetrun::fleet::ExecTarget;

/// Builder for `GroupFile` to simplify test setup.
pub struct GroupFileBuilder {
    group: GroupFile,
}

impl GroupFileBuilder {
    pub fn new() -> Self {
        Self {
            group: GroupFile {
                default: DefaultSection::default(),
                target: BTreeMap::new(),
            },
        }
    }

    pub fn with_target(mut self, name: &str, target: TargetConfig) -> Self {
        self.group.target.insert(name.to_string(), target);
        self
    }

    pub fn with_default_user(mut self, user: &str) -> Self {
        self.group.default.user = Some(user.to_string());
        self
    }

    pub fn with_default_ssh_key(mut self, key: &str) -> Self {
        self.group.default.ssh_key = Some(PathBuf::from(key));
        self
    }

    pub fn with_default_port(mut self, port: u16) -> Self {
        self.group.default.port = Some(port);
        self
    }

    pub fn build(self) -> GroupFile {
        self.group
    }
}

impl Default for GroupFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `TargetConfig`.
pub struct TargetConfigBuilder {
    target: TargetConfig,
}

impl TargetConfigBuilder {
    pub fn new(host: &str) -> Self {
        Self {
            target: TargetConfig {
                host: host.to_string(),
                user: None,
                ssh_key: None,
                port: None,
            },
        }
    }

    pub fn user(mut self, user: &str) -> Self {
        self.target.user = Some(user.to_string());
        self
    }

    pub fn ssh_key(mut self, key: &str) -> Self {
        self.target.ssh_key = Some(PathBuf::from(key));
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.target.port = Some(port);
        self
    }

    pub fn build(self) -> TargetConfig {
        self.target
    }
}

/// A fleet target executing under the local shell, for tests that need
/// real processes without any remote machinery.
pub fn local_target(name: &str) -> ExecTarget {
    ExecTarget {
        name: name.to_string(),
        context: ExecutionContext::Local,
    }
}

/// `n` local fleet targets named `t0..t{n-1}`.
pub fn local_fleet(n: usize) -> Vec<ExecTarget> {
    (0..n).map(|i| local_target(&format!("t{i}"))).collect()
}

/// A fleet target whose wrapper binary does not exist, so spawning fails.
pub fn broken_target(name: &str) -> ExecTarget {
    ExecTarget {
        name: name.to_string(),
        context: ExecutionContext::Wrapped {
            prefix: vec!["/nonexistent/fleetrun-remote-shell".to_string()],
        },
    }
}

/// Write a fake remote-shell wrapper script into `dir` and return its path.
///
/// The script behaves like `ssh host --`: it runs the trailing command
/// under `sh -c`, but forces the exit code given as its first argument
/// when that argument is non-zero. This stands in for a remote channel
/// whose far end misbehaves.
#[cfg(unix)]
pub fn write_fake_remote_shell(dir: &Path) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-remote-shell.sh");
    let script = "#!/bin/sh\nforce=$1; shift\nsh -c \"$1\"\nstatus=$?\nif [ \"$force\" -ne 0 ]; then exit \"$force\"; fi\nexit $status\n";
    std::fs::write(&path, script).expect("write fake remote shell");
    let mut perms = std::fs::metadata(&path)
        .expect("stat fake remote shell")
        .permissions();
    perms.set_mode(0o755);
    std::fs::set_permissions(&path, perms).expect("chmod fake remote shell");
    path
}

/// A fleet target routed through the fake remote shell, forcing `code` as
/// the exit code when non-zero.
#[cfg(unix)]
pub fn fake_remote_target(name: &str, shell: &Path, code: i32) -> ExecTarget {
    ExecTarget {
        name: name.to_string(),
        context: ExecutionContext::Wrapped {
            prefix: vec![shell.display().to_string(), code.to_string()],
        },
    }
}
