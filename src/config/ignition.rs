// src/config/ignition.rs

//! Ignition document decoding
//!
//! Accepts spec 3.0.0 through 3.2.0 directly (the later specs only add
//! fields) and upgrades spec 2.2.0 documents. The result is always
//! stamped with [`CURRENT_VERSION`]. A document without a version marker
//! decodes to a config with an empty version; callers decide whether that
//! is acceptable.

use super::{v2, Config};
use crate::error::{Error, Result};
use serde::Deserialize;
use tracing::debug;

/// The spec version every decoded config is normalized to
pub const CURRENT_VERSION: &str = "3.2.0";

/// Spec 3 versions that decode without translation
const V3_VERSIONS: &[&str] = &["3.0.0", "3.1.0", "3.2.0"];

/// Spec 2 versions upgraded through [`v2`]
const V2_VERSIONS: &[&str] = &["2.2.0"];

#[derive(Deserialize)]
struct VersionProbe {
    #[serde(default)]
    ignition: ProbeSection,
}

#[derive(Default, Deserialize)]
struct ProbeSection {
    #[serde(default)]
    version: Option<String>,
}

/// Parse raw Ignition JSON of any supported spec version
pub fn parse_and_convert(raw: &[u8]) -> Result<Config> {
    let probe: VersionProbe = serde_json::from_slice(raw)
        .map_err(|e| Error::Parse(format!("Failed to parse ignition config: {e}")))?;
    let version = probe.ignition.version.unwrap_or_default();

    if version.is_empty() {
        debug!("Ignition config carries no version marker");
        return serde_json::from_slice(raw)
            .map_err(|e| Error::Parse(format!("Failed to parse ignition config: {e}")));
    }

    let mut config = if V3_VERSIONS.contains(&version.as_str()) {
        serde_json::from_slice::<Config>(raw)
            .map_err(|e| Error::Parse(format!("Failed to parse ignition {version} config: {e}")))?
    } else if V2_VERSIONS.contains(&version.as_str()) {
        debug!("Upgrading ignition {} config to {}", version, CURRENT_VERSION);
        v2::parse_and_upgrade(raw)?
    } else {
        return Err(Error::Parse(format!(
            "Unsupported ignition config version {version}; supported versions ({})",
            V2_VERSIONS
                .iter()
                .chain(V3_VERSIONS)
                .copied()
                .collect::<Vec<_>>()
                .join(", ")
        )));
    };

    config.ignition.version = CURRENT_VERSION.to_string();
    Ok(config)
}
