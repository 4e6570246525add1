// src/translate/mod.rs

//! Config to payload translation
//!
//! Walks a canonical config and produces the ordered list of payload
//! entries for the package. Categories are emitted in a fixed order so the
//! same config always yields the same package:
//!
//! 1. users (SSH keys are only collected here)
//! 2. directories
//! 3. files
//! 4. links
//! 5. units and their drop-ins
//! 6. the core user's `authorized_keys`, if any keys were collected
//!
//! The config itself is never modified; relocation and defaulting only
//! affect the entries.

pub mod defaults;
pub mod relocate;
pub mod systemd;

use crate::config::{dataurl, Config, Directory, File, Link, Resource, Unit, CORE_USERNAME};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::packages::{PayloadEntry, S_IFDIR, S_IFLNK};
use defaults::{resolve_bool, resolve_mode, resolve_string};
use flate2::read::GzDecoder;
use relocate::relocate;
use std::io::Read;
use tracing::{debug, info, warn};

/// Owner and group for entries that do not name one
pub const ROOT_USERNAME: &str = "root";

/// Default mode for directories and files
pub const DEFAULT_NODE_MODE: u32 = 0o755;

/// Mode for links before the type bits are added
pub const LINK_MODE: u32 = 0o755;

/// Mode for units, drop-ins and authorized keys
pub const UNIT_MODE: u32 = 0o644;

/// Where the core user's keys are installed
///
/// `/var/home` is where `/home` really lives on rpm-ostree systems.
pub const CORE_AUTHORIZED_KEYS_PATH: &str = "/var/home/core/.ssh/authorized_keys";

/// Translate every entity in `config` into payload entries
///
/// `pack_time` becomes the modification time of every entry.
pub fn translate(config: &Config, options: &Options, pack_time: u32) -> Result<Vec<PayloadEntry>> {
    let mut translator = Translator::new(options, pack_time);

    for user in &config.passwd.users {
        // Only the default core user is supported
        if user.name == CORE_USERNAME {
            info!("Found the core user, adding authorized_keys");
            for key in &user.ssh_authorized_keys {
                translator.add_ssh_key(key);
            }
        }
    }

    for directory in &config.storage.directories {
        translator.add_directory(directory);
    }

    for file in &config.storage.files {
        if options.is_excluded(&file.path) {
            info!("SKIPPING (prefix): {}", file.path);
            continue;
        }
        translator.add_file(file)?;
    }

    for link in &config.storage.links {
        translator.add_link(link);
    }

    for unit in &config.systemd.units {
        translator.add_unit(unit)?;
    }

    Ok(translator.finish())
}

/// Accumulates entries for one translation run
struct Translator<'a> {
    options: &'a Options,
    pack_time: u32,
    entries: Vec<PayloadEntry>,
    ssh_keys: Vec<String>,
}

impl<'a> Translator<'a> {
    fn new(options: &'a Options, pack_time: u32) -> Self {
        Self {
            options,
            pack_time,
            entries: Vec::new(),
            ssh_keys: Vec::new(),
        }
    }

    fn push(&mut self, path: String, body: Vec<u8>, mode: u32, owner: &str, group: &str) {
        self.entries.push(PayloadEntry {
            path,
            body,
            mode,
            owner: owner.to_string(),
            group: group.to_string(),
            mtime: self.pack_time,
        });
    }

    fn add_ssh_key(&mut self, key: &str) {
        self.ssh_keys.push(key.to_string());
    }

    fn add_directory(&mut self, d: &Directory) {
        info!(
            "DIR: {} ({:?} {:?}) ({:?} {:?})",
            d.path, d.user.id, d.user.name, d.group.id, d.group.name
        );

        let mode = resolve_mode(d.mode, DEFAULT_NODE_MODE) | S_IFDIR;
        self.push(
            relocate(&d.path),
            Vec::new(),
            mode,
            resolve_string(d.user.name.as_deref(), ROOT_USERNAME),
            resolve_string(d.group.name.as_deref(), ROOT_USERNAME),
        );
    }

    fn add_file(&mut self, f: &File) -> Result<()> {
        info!("FILE: {}", f.path);

        let mut body = decode_resource(&f.path, &f.contents)?;
        for fragment in &f.append {
            body.extend(decode_resource(&f.path, fragment)?);
        }

        self.push(
            relocate(&f.path),
            body,
            resolve_mode(f.mode, DEFAULT_NODE_MODE),
            resolve_string(f.user.name.as_deref(), ROOT_USERNAME),
            resolve_string(f.group.name.as_deref(), ROOT_USERNAME),
        );
        Ok(())
    }

    /// The entry sits at the link's target and points back at its path
    fn add_link(&mut self, l: &Link) {
        info!("LINK: {} {}", l.path, l.target);
        if l.hard == Some(true) {
            warn!("Hard link {} will be packed as a symbolic link", l.path);
        }

        let source = relocate(&l.path);
        self.push(
            l.target.clone(),
            source.into_bytes(),
            LINK_MODE | S_IFLNK,
            resolve_string(l.user.name.as_deref(), ROOT_USERNAME),
            resolve_string(l.group.name.as_deref(), ROOT_USERNAME),
        );
    }

    fn add_unit(&mut self, u: &Unit) -> Result<()> {
        let unit_file = systemd::unit_path(&u.name)?;

        // Enablement is not materialized into the package
        info!(
            "UNIT: {} {} {}",
            u.name,
            unit_file.display(),
            resolve_bool(u.enabled, true)
        );
        self.push(
            unit_file.display().to_string(),
            u.contents.clone().unwrap_or_default().into_bytes(),
            UNIT_MODE,
            ROOT_USERNAME,
            ROOT_USERNAME,
        );

        for dropin in &u.dropins {
            let dropin_file = systemd::dropin_path(&u.name, &dropin.name)?;
            info!("\tDROPIN: {} {}", dropin.name, dropin_file.display());
            self.push(
                dropin_file.display().to_string(),
                dropin.contents.clone().unwrap_or_default().into_bytes(),
                UNIT_MODE,
                ROOT_USERNAME,
                ROOT_USERNAME,
            );
        }
        Ok(())
    }

    fn finish(mut self) -> Vec<PayloadEntry> {
        if !self.ssh_keys.is_empty() {
            let mut body = String::new();
            for key in &self.ssh_keys {
                body.push_str(key);
                body.push('\n');
            }

            self.push(
                CORE_AUTHORIZED_KEYS_PATH.to_string(),
                body.into_bytes(),
                UNIT_MODE,
                CORE_USERNAME,
                CORE_USERNAME,
            );
        }

        debug!(
            "Translated {} entries (excluding with {:?})",
            self.entries.len(),
            self.options.exclude_prefix()
        );
        self.entries
    }
}

/// Decode a file's embedded payload; no source means an empty body
fn decode_resource(path: &str, resource: &Resource) -> Result<Vec<u8>> {
    let Some(source) = resource.source.as_deref() else {
        return Ok(Vec::new());
    };

    let decode_error = |reason: String| Error::PayloadDecode {
        path: path.to_string(),
        reason,
    };

    let data = dataurl::decode(source).map_err(|e| decode_error(e.to_string()))?;

    match resource.compression.as_deref() {
        None | Some("") => Ok(data),
        Some("gzip") => {
            let mut out = Vec::new();
            GzDecoder::new(data.as_slice())
                .read_to_end(&mut out)
                .map_err(|e| decode_error(format!("invalid gzip data: {e}")))?;
            Ok(out)
        }
        Some(other) => Err(decode_error(format!("unsupported compression {other:?}"))),
    }
}
