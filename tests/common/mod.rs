// tests/common/mod.rs

//! Shared fixtures and helpers for integration tests.

#![allow(dead_code)]

use ign2rpm::Options;
use std::path::PathBuf;
use tempfile::TempDir;

/// Fixed pack time so runs are comparable
pub const PACK_TIME: u32 = 1_700_000_000;

/// Ignition 3.2.0 config touching every entity kind
pub const IGNITION_FULL: &str = r#"{
  "ignition": {"version": "3.2.0"},
  "passwd": {
    "users": [
      {"name": "core", "sshAuthorizedKeys": ["ssh-ed25519 AAAA-one", "ssh-ed25519 AAAA-two"]},
      {"name": "someone-else", "sshAuthorizedKeys": ["ssh-ed25519 AAAA-ignored"]}
    ]
  },
  "storage": {
    "directories": [
      {"path": "/var/lib/app", "mode": 700, "user": {"name": "app"}}
    ],
    "files": [
      {"path": "/etc/app.conf", "mode": 644, "contents": {"source": "data:,key%3Dvalue%0A"}},
      {"path": "/usr/local/bin/tool", "contents": {"source": "data:;base64,IyEvYmluL3NoCg=="}}
    ],
    "links": [
      {"path": "/usr/local/bin/tool-link", "target": "/usr/bin/tool"}
    ]
  },
  "systemd": {
    "units": [
      {
        "name": "app.service",
        "enabled": true,
        "contents": "[Service]\nExecStart=/usr/local/bin/tool\n",
        "dropins": [{"name": "10-env.conf", "contents": "[Service]\nEnvironment=A=1\n"}]
      }
    ]
  }
}"#;

/// MachineConfig carrying a small Ignition payload
pub const MACHINE_CONFIG: &str = r#"apiVersion: machineconfiguration.openshift.io/v1
kind: MachineConfig
metadata:
  name: 99-worker-motd
  labels:
    machineconfiguration.openshift.io/role: worker
spec:
  config:
    ignition:
      version: 3.2.0
    storage:
      files:
        - path: /etc/motd
          mode: 644
          contents:
            source: "data:,welcome%0A"
"#;

/// MachineConfig whose payload is not a valid Ignition config
pub const MACHINE_CONFIG_BAD_PAYLOAD: &str = r#"apiVersion: machineconfiguration.openshift.io/v1
kind: MachineConfig
metadata:
  name: 99-broken
spec:
  config:
    ignition:
      version: 9.9.9
"#;

/// Butane fcos config using inline contents
pub const BUTANE_FCOS: &str = r#"variant: fcos
version: 1.3.0
passwd:
  users:
    - name: core
      ssh_authorized_keys:
        - ssh-ed25519 AAAA-butane
storage:
  files:
    - path: /etc/hostname
      mode: 420
      contents:
        inline: node1
systemd:
  units:
    - name: hello.service
      enabled: true
      contents: |
        [Service]
        ExecStart=/usr/bin/echo hello
"#;

/// Butane document with a variant outside the allow-list
pub const BUTANE_UNKNOWN_VARIANT: &str = "variant: flatcar\nversion: 1.0.0\n";

/// Butane document with a version outside the allow-list
pub const BUTANE_UNKNOWN_VERSION: &str = "variant: fcos\nversion: 9.9.9\n";

/// Write `contents` into a fresh temporary directory.
///
/// Returns (TempDir, path) - keep the TempDir alive to prevent cleanup.
pub fn write_input(name: &str, contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = tempfile::tempdir().unwrap();
    let path = temp_dir.path().join(name);
    std::fs::write(&path, contents).unwrap();
    (temp_dir, path)
}

/// Options for packing `input`, writing into `out_dir`
pub fn options_into(input: &std::path::Path, out_dir: &std::path::Path, output: &str) -> Options {
    let mut options = Options::new(input.display().to_string());
    options.output_name = Some(out_dir.join(output).display().to_string());
    options
}

/// Butane config using the usual leading-zero octal mode
pub const BUTANE_OCTAL_MODE: &str = r#"variant: fcos
version: 1.3.0
storage:
  files:
    - path: /etc/motd
      mode: 0644
      contents:
        inline: hi
"#;
