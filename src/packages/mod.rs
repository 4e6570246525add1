// src/packages/mod.rs

//! Package output
//!
//! Payload entries produced by translation are collected by a
//! [`PackageWriter`] and serialized into a package file. RPM is the only
//! output format.

pub mod common;
pub mod rpm;
pub mod traits;

pub use common::PackageMetadata;
pub use self::rpm::RpmWriter;
pub use traits::{EntryType, PackageWriter, PayloadEntry, S_IFDIR, S_IFLNK, S_IFMT, S_IFREG};

use crate::error::{Error, Result};
use std::path::Path;
use tracing::info;

/// Write a package to `path` without ever leaving a partial file behind
///
/// The package is written to a temporary file next to `path` and renamed
/// into place once complete. Returns the size of the written package.
pub fn write_package(writer: &dyn PackageWriter, path: &Path) -> Result<u64> {
    let write_error = |reason: String| Error::ArchiveWrite {
        path: path.display().to_string(),
        reason,
    };

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let mut temp = tempfile::NamedTempFile::new_in(dir)
        .map_err(|e| write_error(format!("Failed to create temporary file: {e}")))?;

    writer.write(temp.as_file_mut())?;

    temp.as_file_mut()
        .sync_all()
        .map_err(|e| write_error(format!("Failed to sync: {e}")))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(temp.path(), std::fs::Permissions::from_mode(0o644))
            .map_err(|e| write_error(format!("Failed to set permissions: {e}")))?;
    }

    temp.persist(path)
        .map_err(|e| write_error(format!("Failed to move into place: {}", e.error)))?;

    let size = std::fs::metadata(path)
        .map_err(|e| write_error(e.to_string()))?
        .len();

    info!("Wrote {} ({} bytes)", path.display(), size);
    Ok(size)
}
