// src/lib.rs

//! ign2rpm - pack machine provisioning configs into RPMs
//!
//! Reads an Ignition config, a MachineConfig wrapping one, or a Butane
//! document, and produces an RPM carrying the same files, directories,
//! links, systemd units and core-user SSH keys, laid out so rpm-ostree
//! will accept it.
//!
//! # Pipeline
//!
//! - [`load`]: fetch the raw bytes from a URL or local path
//! - [`sense`]: work out the document format
//! - [`envelope`]: unwrap MachineConfigs into plain Ignition
//! - [`translate`]: turn config entities into payload entries
//! - [`packages`]: write the entries out as an RPM
//!
//! [`pipeline::pack`] runs all of them.

pub mod config;
pub mod envelope;
mod error;
pub mod load;
pub mod options;
pub mod packages;
pub mod pipeline;
pub mod sense;
pub mod translate;

pub use config::Config;
pub use error::{Error, Result};
pub use options::Options;
pub use packages::{PackageMetadata, PackageWriter, PayloadEntry, RpmWriter};
pub use pipeline::{entries_from_bytes, pack, pack_bytes, PackResult};
pub use sense::{Envelope, FormatOrigin};
