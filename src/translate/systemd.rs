// src/translate/systemd.rs

//! systemd unit locations
//!
//! Unit and drop-in names are single path components; anything that could
//! land outside the units directory is rejected.

use crate::error::{Error, Result};
use std::path::PathBuf;

/// Directory administrator units are installed into
pub const UNITS_DIR: &str = "/etc/systemd/system";

fn check_name(kind: &str, name: &str) -> Result<()> {
    if name.is_empty() || name == "." || name == ".." || name.contains('/') {
        return Err(Error::InvalidConfig(format!(
            "{kind} name {name:?} must be a plain file name"
        )));
    }
    Ok(())
}

/// Path of a unit file
pub fn unit_path(unit: &str) -> Result<PathBuf> {
    check_name("unit", unit)?;
    Ok(PathBuf::from(UNITS_DIR).join(unit))
}

/// Directory holding a unit's drop-ins
pub fn dropins_dir(unit: &str) -> Result<PathBuf> {
    check_name("unit", unit)?;
    Ok(PathBuf::from(UNITS_DIR).join(format!("{unit}.d")))
}

/// Path of one drop-in for a unit
pub fn dropin_path(unit: &str, dropin: &str) -> Result<PathBuf> {
    check_name("drop-in", dropin)?;
    Ok(dropins_dir(unit)?.join(dropin))
}
