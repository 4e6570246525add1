// src/packages/rpm.rs

//! RPM package writer
//!
//! Builds RPMs from payload entries using the `rpm` crate's PackageBuilder.
//! Each entry's body is staged into a scratch directory first, since the
//! builder reads file contents and modification times from disk.

use crate::error::{Error, Result};
use crate::packages::common::PackageMetadata;
use crate::packages::traits::{EntryType, PackageWriter, PayloadEntry};
use rpm::PackageBuilder;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Accumulates payload entries and writes them out as an RPM
pub struct RpmWriter {
    metadata: PackageMetadata,
    entries: Vec<PayloadEntry>,
}

impl RpmWriter {
    pub fn new(metadata: PackageMetadata) -> Self {
        Self {
            metadata,
            entries: Vec::new(),
        }
    }

    pub fn metadata(&self) -> &PackageMetadata {
        &self.metadata
    }

    fn archive_error(&self, reason: impl ToString) -> Error {
        Error::ArchiveWrite {
            path: self.metadata.name.clone(),
            reason: reason.to_string(),
        }
    }

    /// Write an entry's body to `dir`, stamped with the entry's mtime
    fn stage(&self, dir: &Path, index: usize, entry: &PayloadEntry) -> Result<PathBuf> {
        let staged = dir.join(format!("entry-{index}"));
        let mut file = fs::File::create(&staged)
            .map_err(|e| self.archive_error(format!("Failed to stage {}: {e}", entry.path)))?;

        file.write_all(&entry.body)
            .map_err(|e| self.archive_error(format!("Failed to stage {}: {e}", entry.path)))?;

        let mtime = SystemTime::UNIX_EPOCH + Duration::from_secs(u64::from(entry.mtime));
        file.set_modified(mtime).map_err(|e| {
            self.archive_error(format!("Failed to set mtime of {}: {e}", entry.path))
        })?;

        Ok(staged)
    }

    /// Assemble the package in memory
    pub fn build(&self) -> Result<rpm::Package> {
        let meta = &self.metadata;

        let mut builder = PackageBuilder::new(
            &meta.name,
            &meta.version,
            &meta.license,
            &meta.arch,
            &meta.summary,
        )
        .release(&meta.release)
        .description(&meta.description)
        .vendor(&meta.vendor)
        .packager(&meta.packager)
        .build_host(&meta.build_host)
        // Clamps every file's mtime to the build time
        .source_date(meta.build_time)
        .compression(rpm::CompressionType::Gzip);

        for capability in &meta.provides {
            builder = builder.provides(rpm::Dependency::any(capability));
        }

        let staging = tempfile::tempdir()
            .map_err(|e| self.archive_error(format!("Failed to create staging dir: {e}")))?;

        for (index, entry) in self.entries.iter().enumerate() {
            let staged = self.stage(staging.path(), index, entry)?;
            debug!(
                "Adding {} ({:?}, {:o})",
                entry.path,
                entry.entry_type(),
                entry.permissions()
            );

            let mut options = rpm::FileOptions::new(&entry.path)
                .mode(rpm::FileMode::from(entry.typed_mode() as i32))
                .user(&entry.owner)
                .group(&entry.group);

            if entry.entry_type() == EntryType::Symlink {
                options = options.symlink(String::from_utf8_lossy(&entry.body));
            }

            builder = builder
                .with_file(&staged, options)
                .map_err(|e| self.archive_error(format!("Failed to add {}: {e}", entry.path)))?;
        }

        debug!(
            "Building RPM {}-{}-{} with {} entries",
            meta.name,
            meta.version,
            meta.release,
            self.entries.len()
        );

        builder
            .build()
            .map_err(|e| self.archive_error(format!("Failed to build RPM package: {e}")))
    }
}

impl PackageWriter for RpmWriter {
    fn add_entry(&mut self, entry: PayloadEntry) {
        self.entries.push(entry);
    }

    fn entries(&self) -> &[PayloadEntry] {
        &self.entries
    }

    fn write(&self, mut out: &mut dyn Write) -> Result<()> {
        let package = self.build()?;
        package
            .write(&mut out)
            .map_err(|e| self.archive_error(format!("Failed to write RPM: {e}")))
    }
}
