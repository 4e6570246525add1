// src/packages/traits.rs

//! Common types for package writers

use crate::error::Result;
use std::io::Write;

/// File type mask
pub const S_IFMT: u32 = 0o170000;
/// Directory type bit
pub const S_IFDIR: u32 = 0o040000;
/// Regular file type bit
pub const S_IFREG: u32 = 0o100000;
/// Symbolic link type bits
pub const S_IFLNK: u32 = 0o120000;

/// One file-system object to place in a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEntry {
    /// Absolute path inside the package
    pub path: String,
    /// File contents; the link target for symlinks
    pub body: Vec<u8>,
    /// Permission bits, plus type bits for directories and symlinks
    pub mode: u32,
    pub owner: String,
    pub group: String,
    /// Modification time (seconds since the epoch)
    pub mtime: u32,
}

/// What kind of object an entry describes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    Regular,
    Directory,
    Symlink,
}

impl PayloadEntry {
    /// Entry type from the mode's type bits; no type bits means a regular file
    pub fn entry_type(&self) -> EntryType {
        match self.mode & S_IFMT {
            S_IFDIR => EntryType::Directory,
            S_IFLNK => EntryType::Symlink,
            _ => EntryType::Regular,
        }
    }

    /// Mode with explicit type bits, as archive formats expect
    pub fn typed_mode(&self) -> u32 {
        if self.mode & S_IFMT == 0 {
            self.mode | S_IFREG
        } else {
            self.mode
        }
    }

    /// Permission bits only
    pub fn permissions(&self) -> u32 {
        self.mode & !S_IFMT
    }
}

/// Common interface for package output formats
pub trait PackageWriter {
    /// Append an entry; entries are written in the order added
    fn add_entry(&mut self, entry: PayloadEntry);

    /// Entries added so far
    fn entries(&self) -> &[PayloadEntry];

    /// Serialize the complete package
    fn write(&self, out: &mut dyn Write) -> Result<()>;
}
