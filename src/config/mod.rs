// src/config/mod.rs

//! Canonical provisioning configuration
//!
//! Every accepted input format is normalized into [`Config`], which mirrors
//! the Ignition 3.2.0 schema. Only the fields the packer consumes are
//! modelled; unknown fields are ignored on decode so newer or richer
//! documents still load.
//!
//! Decoders for the individual input formats live in submodules:
//!
//! - [`ignition`] - Ignition 3.x documents (and 2.2 via [`v2`])
//! - [`machineconfig`] - the MachineConfig wrapper
//! - [`butane`] - Butane documents, translated down to Ignition
//! - [`dataurl`] - RFC 2397 data URLs carried in file contents

pub mod butane;
pub mod dataurl;
pub mod ignition;
pub mod machineconfig;
mod v2;

pub use ignition::{parse_and_convert, CURRENT_VERSION};

use serde::{Deserialize, Serialize};

/// Name of the only account whose SSH keys are packed
pub const CORE_USERNAME: &str = "core";

/// A normalized Ignition config
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub ignition: IgnitionSection,

    #[serde(default)]
    pub passwd: Passwd,

    #[serde(default)]
    pub storage: Storage,

    #[serde(default)]
    pub systemd: Systemd,
}

/// The `ignition` metadata section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IgnitionSection {
    /// Spec version marker; empty when the document carried none
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Passwd {
    #[serde(default)]
    pub users: Vec<User>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub name: String,

    #[serde(default)]
    pub ssh_authorized_keys: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Storage {
    #[serde(default)]
    pub directories: Vec<Directory>,

    #[serde(default)]
    pub files: Vec<File>,

    #[serde(default)]
    pub links: Vec<Link>,
}

/// Owner reference; either field may be set
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeOwner {
    #[serde(default)]
    pub id: Option<i64>,

    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Directory {
    pub path: String,

    #[serde(default)]
    pub user: NodeOwner,

    #[serde(default)]
    pub group: NodeOwner,

    #[serde(default)]
    pub mode: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct File {
    pub path: String,

    #[serde(default)]
    pub user: NodeOwner,

    #[serde(default)]
    pub group: NodeOwner,

    #[serde(default)]
    pub mode: Option<u32>,

    #[serde(default)]
    pub contents: Resource,

    /// Fragments appended after `contents`, in order
    #[serde(default)]
    pub append: Vec<Resource>,
}

/// An embedded payload reference
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    /// Payload URL; only `data:` URLs can be packed
    #[serde(default)]
    pub source: Option<String>,

    /// Compression applied to the decoded payload (`gzip` or none)
    #[serde(default)]
    pub compression: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub path: String,

    #[serde(default)]
    pub user: NodeOwner,

    #[serde(default)]
    pub group: NodeOwner,

    /// Where the link points
    pub target: String,

    #[serde(default)]
    pub hard: Option<bool>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Systemd {
    #[serde(default)]
    pub units: Vec<Unit>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Unit {
    pub name: String,

    #[serde(default)]
    pub enabled: Option<bool>,

    #[serde(default)]
    pub contents: Option<String>,

    #[serde(default)]
    pub dropins: Vec<Dropin>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dropin {
    pub name: String,

    #[serde(default)]
    pub contents: Option<String>,
}
