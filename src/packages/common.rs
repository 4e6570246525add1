// src/packages/common.rs
//! Package metadata shared by package writers
//!
//! Generated packages carry fixed boilerplate: they are versioned `1-1`,
//! architecture independent, and say where their content came from.

use crate::options::Options;

/// Version of every generated package
pub const PACKAGE_VERSION: &str = "1";
/// Release of every generated package
pub const PACKAGE_RELEASE: &str = "1";
/// Generated packages hold no binaries
pub const PACKAGE_ARCH: &str = "noarch";
pub const PACKAGE_LICENSE: &str = "Unspecified";
pub const PACKAGE_PACKAGER: &str = "ignition2rpm";
pub const PACKAGE_VENDOR: &str = "ignition2rpm";
pub const PACKAGE_DESCRIPTION: &str =
    "This is a machine-packed RPM that has been packed by 'ignition2rpm'";

/// Capability telling rpm-ostree the package may replace files of others
pub const OVERRIDE_CAPABILITY: &str = "rpmostree(override)";

/// Metadata written into a generated package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    pub name: String,
    pub version: String,
    pub release: String,
    pub arch: String,
    pub license: String,
    pub summary: String,
    pub description: String,
    pub packager: String,
    pub vendor: String,
    pub build_host: String,
    /// Build time, also used as every file's modification time
    pub build_time: u32,
    /// Extra capabilities the package provides
    pub provides: Vec<String>,
}

impl PackageMetadata {
    /// Metadata for a run with the given options
    pub fn for_options(options: &Options, build_host: impl Into<String>, build_time: u32) -> Self {
        let mut provides = Vec::new();
        if options.allow_override {
            provides.push(OVERRIDE_CAPABILITY.to_string());
        }

        Self {
            name: options.package_name(),
            version: PACKAGE_VERSION.to_string(),
            release: PACKAGE_RELEASE.to_string(),
            arch: PACKAGE_ARCH.to_string(),
            license: PACKAGE_LICENSE.to_string(),
            summary: format!("A package packed from {}", options.input),
            description: PACKAGE_DESCRIPTION.to_string(),
            packager: PACKAGE_PACKAGER.to_string(),
            vendor: PACKAGE_VENDOR.to_string(),
            build_host: build_host.into(),
            build_time,
            provides,
        }
    }
}

/// Short host name of this machine, if it can be determined
pub fn local_hostname() -> Option<String> {
    #[cfg(unix)]
    {
        use std::ffi::CStr;
        let mut buf = [0u8; 256];
        // SAFETY: buf is writable for its full length and gethostname
        // NUL-terminates on success when the name fits.
        unsafe {
            if libc::gethostname(buf.as_mut_ptr() as *mut libc::c_char, buf.len()) == 0 {
                buf[buf.len() - 1] = 0;
                if let Ok(name) = CStr::from_ptr(buf.as_ptr() as *const libc::c_char).to_str() {
                    if !name.is_empty() {
                        return Some(name.to_string());
                    }
                }
            }
        }
    }
    None
}
