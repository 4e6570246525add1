// src/options.rs

//! Run options
//!
//! Everything that varies between runs travels in [`Options`]; nothing is
//! kept in process-wide state.

use std::path::{Path, PathBuf};

/// Package file extension
pub const RPM_EXTENSION: &str = "rpm";

/// Package name used when neither output nor input yield one
const FALLBACK_PACKAGE_NAME: &str = "ignition";

/// Options for a single packing run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Files whose path starts with this prefix are left out
    pub exclude_prefix: Option<String>,
    /// URL or local path of the config
    pub input: String,
    /// Output package name or path
    pub output_name: Option<String>,
    /// Mark the package as allowed to override files owned by others
    pub allow_override: bool,
}

impl Options {
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            ..Self::default()
        }
    }

    /// Output name, treating an empty string as unset
    pub fn output_name(&self) -> Option<&str> {
        self.output_name.as_deref().filter(|s| !s.is_empty())
    }

    /// Exclusion prefix, treating an empty string as unset
    pub fn exclude_prefix(&self) -> Option<&str> {
        self.exclude_prefix.as_deref().filter(|s| !s.is_empty())
    }

    /// Whether a (pre-relocation) file path is excluded
    pub fn is_excluded(&self, path: &str) -> bool {
        self.exclude_prefix()
            .is_some_and(|prefix| path.starts_with(prefix))
    }

    /// Package name: the output name without `.rpm`, else the input's stem
    pub fn package_name(&self) -> String {
        let name = match self.output_name() {
            Some(output) => file_name(output)
                .map(|n| {
                    n.strip_suffix(&format!(".{RPM_EXTENSION}"))
                        .unwrap_or(&n)
                        .to_string()
                }),
            None => Path::new(&self.input)
                .file_stem()
                .map(|s| s.to_string_lossy().to_string()),
        };

        name.filter(|n| !n.is_empty())
            .unwrap_or_else(|| FALLBACK_PACKAGE_NAME.to_string())
    }

    /// Where the package file is written
    pub fn output_path(&self) -> PathBuf {
        match self.output_name() {
            Some(output) if output.ends_with(&format!(".{RPM_EXTENSION}")) => PathBuf::from(output),
            Some(output) => PathBuf::from(format!("{output}.{RPM_EXTENSION}")),
            None => PathBuf::from(format!("{}.{RPM_EXTENSION}", self.package_name())),
        }
    }
}

fn file_name(path: &str) -> Option<String> {
    Path::new(path)
        .file_name()
        .map(|s| s.to_string_lossy().to_string())
}
