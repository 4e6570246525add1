// src/pipeline.rs

//! End-to-end packing
//!
//! Ties the stages together: load, sense, unwrap, translate, write. Any
//! failure aborts the run before the output file is created.

use crate::envelope;
use crate::error::Result;
use crate::load;
use crate::options::Options;
use crate::packages::{self, PackageMetadata, PackageWriter, PayloadEntry, RpmWriter};
use crate::sense::{self, FormatOrigin};
use crate::translate;
use std::path::PathBuf;
use tracing::{debug, info};

/// Outcome of a completed packing run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackResult {
    /// Where the package was written
    pub path: PathBuf,
    /// Package name recorded in the metadata
    pub name: String,
    /// Number of payload entries
    pub entries: usize,
    /// Size of the package file in bytes
    pub size: u64,
}

/// Run the translation half of the pipeline on raw config bytes
///
/// Returns the options (with the output name possibly filled in from a
/// MachineConfig) and the ordered payload entries. Given the same bytes
/// and `pack_time`, the result is always identical.
pub fn entries_from_bytes(
    raw: &[u8],
    options: Options,
    pack_time: u32,
) -> Result<(Options, Vec<PayloadEntry>)> {
    let envelope = sense::sense(raw)?;
    let (config, options) = envelope::unwrap(envelope, options)?;
    let entries = translate::translate(&config, &options, pack_time)?;
    Ok((options, entries))
}

/// Load the configured input, translate it and write the package
pub fn pack(options: Options) -> Result<PackResult> {
    let pack_time = current_time();

    let (raw, origin) = load::load_config(&options.input)?;
    debug!("Loaded {} bytes from {} config", raw.len(), origin);

    pack_bytes(&raw, origin, options, pack_time)
}

/// Translate already-loaded bytes and write the package
pub fn pack_bytes(
    raw: &[u8],
    origin: FormatOrigin,
    options: Options,
    pack_time: u32,
) -> Result<PackResult> {
    let (options, entries) = entries_from_bytes(raw, options, pack_time)?;

    let build_host = packages::common::local_hostname().unwrap_or_else(|| "localhost".to_string());
    let metadata = PackageMetadata::for_options(&options, build_host, pack_time);

    let mut writer = RpmWriter::new(metadata);
    for entry in entries {
        writer.add_entry(entry);
    }

    let path = options.output_path();
    let size = packages::write_package(&writer, &path)?;
    info!(
        "Packed {} config {} into {} ({} entries)",
        origin,
        options.input,
        path.display(),
        writer.entries().len()
    );

    Ok(PackResult {
        path,
        name: writer.metadata().name.clone(),
        entries: writer.entries().len(),
        size,
    })
}

/// Seconds since the epoch, saturating into the RPM timestamp range
fn current_time() -> u32 {
    u32::try_from(chrono::Utc::now().timestamp()).unwrap_or(u32::MAX)
}
