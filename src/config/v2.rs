// src/config/v2.rs

//! Ignition spec 2.2 upgrade
//!
//! Spec 2 documents name a filesystem per node and use boolean `append`.
//! Only nodes on the `root` filesystem can be expressed in spec 3, and
//! appends are refused rather than silently reinterpreted.

use super::{Config, Directory, Dropin, File, Link, NodeOwner, Passwd, Resource, Storage, Systemd, Unit, User};
use crate::error::{Error, Result};
use serde::Deserialize;

const ROOT_FILESYSTEM: &str = "root";

#[derive(Deserialize)]
struct V2Config {
    #[serde(default)]
    passwd: V2Passwd,

    #[serde(default)]
    storage: V2Storage,

    #[serde(default)]
    systemd: V2Systemd,
}

#[derive(Default, Deserialize)]
struct V2Passwd {
    #[serde(default)]
    users: Vec<User>,
}

#[derive(Default, Deserialize)]
struct V2Storage {
    #[serde(default)]
    directories: Vec<V2Directory>,

    #[serde(default)]
    files: Vec<V2File>,

    #[serde(default)]
    links: Vec<V2Link>,
}

#[derive(Deserialize)]
struct V2Directory {
    #[serde(default)]
    filesystem: Option<String>,
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    #[serde(default)]
    mode: Option<u32>,
}

#[derive(Deserialize)]
struct V2File {
    #[serde(default)]
    filesystem: Option<String>,
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    #[serde(default)]
    mode: Option<u32>,
    #[serde(default)]
    contents: Resource,
    #[serde(default)]
    append: bool,
}

#[derive(Deserialize)]
struct V2Link {
    #[serde(default)]
    filesystem: Option<String>,
    path: String,
    #[serde(default)]
    user: NodeOwner,
    #[serde(default)]
    group: NodeOwner,
    target: String,
    #[serde(default)]
    hard: Option<bool>,
}

#[derive(Default, Deserialize)]
struct V2Systemd {
    #[serde(default)]
    units: Vec<V2Unit>,
}

#[derive(Deserialize)]
struct V2Unit {
    name: String,
    #[serde(default)]
    enabled: Option<bool>,
    /// Deprecated spelling of `enabled`
    #[serde(default)]
    enable: bool,
    #[serde(default)]
    contents: Option<String>,
    #[serde(default)]
    dropins: Vec<Dropin>,
}

fn check_filesystem(filesystem: Option<&str>, path: &str) -> Result<()> {
    match filesystem {
        None | Some(ROOT_FILESYSTEM) => Ok(()),
        Some(other) => Err(Error::InvalidConfig(format!(
            "{path} is on filesystem {other:?}; only {ROOT_FILESYSTEM:?} can be upgraded"
        ))),
    }
}

/// Parse a spec 2.2 document and upgrade it to the canonical shape
pub(super) fn parse_and_upgrade(raw: &[u8]) -> Result<Config> {
    let old: V2Config = serde_json::from_slice(raw)
        .map_err(|e| Error::Parse(format!("Failed to parse ignition 2.2 config: {e}")))?;

    let mut storage = Storage::default();

    for d in old.storage.directories {
        check_filesystem(d.filesystem.as_deref(), &d.path)?;
        storage.directories.push(Directory {
            path: d.path,
            user: d.user,
            group: d.group,
            mode: d.mode,
        });
    }

    for f in old.storage.files {
        check_filesystem(f.filesystem.as_deref(), &f.path)?;
        if f.append {
            return Err(Error::InvalidConfig(format!(
                "{} uses append, which cannot be upgraded",
                f.path
            )));
        }
        storage.files.push(File {
            path: f.path,
            user: f.user,
            group: f.group,
            mode: f.mode,
            contents: f.contents,
            append: Vec::new(),
        });
    }

    for l in old.storage.links {
        check_filesystem(l.filesystem.as_deref(), &l.path)?;
        storage.links.push(Link {
            path: l.path,
            user: l.user,
            group: l.group,
            target: l.target,
            hard: l.hard,
        });
    }

    let units = old
        .systemd
        .units
        .into_iter()
        .map(|u| Unit {
            enabled: u.enabled.or(u.enable.then_some(true)),
            name: u.name,
            contents: u.contents,
            dropins: u.dropins,
        })
        .collect();

    Ok(Config {
        ignition: Default::default(),
        passwd: Passwd {
            users: old.passwd.users,
        },
        storage,
        systemd: Systemd { units },
    })
}
