// src/sense.rs

//! Format sensing
//!
//! Works out which kind of document a blob of bytes is by running an
//! ordered chain of decoders and keeping the first one that accepts it:
//!
//! 1. Ignition (must carry a non-empty version marker)
//! 2. MachineConfig wrapper (payload left undecoded)
//! 3. Butane (gated on its `variant`/`version` pair)

use crate::config::butane::{self, Discriminator};
use crate::config::machineconfig::{self, MachineConfig};
use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::load;
use tracing::debug;

/// Where a config's bytes were obtained; diagnostic only
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatOrigin {
    #[default]
    Unknown,
    Local,
    Remote,
}

impl std::fmt::Display for FormatOrigin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Local => write!(f, "local"),
            Self::Remote => write!(f, "remote"),
        }
    }
}

/// A sensed top-level document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Envelope {
    /// Already a canonical config (Ignition, or Butane translated to it)
    Config(Box<Config>),
    /// A MachineConfig still holding its raw Ignition payload
    Wrapper(MachineConfig),
}

type Decoder = fn(&[u8]) -> Result<Envelope>;

/// The decoder chain, in the order it is tried
const DECODERS: &[(&str, Decoder)] = &[
    ("Ignition", decode_ignition),
    ("MachineConfig", decode_machine_config),
    ("Butane", decode_butane),
];

fn decode_ignition(raw: &[u8]) -> Result<Envelope> {
    let config = config::parse_and_convert(raw)?;
    if config.ignition.version.is_empty() {
        return Err(Error::Parse(
            "Ignition config has no version marker".to_string(),
        ));
    }
    Ok(Envelope::Config(Box::new(config)))
}

fn decode_machine_config(raw: &[u8]) -> Result<Envelope> {
    machineconfig::read_machine_config(raw).map(Envelope::Wrapper)
}

fn decode_butane(raw: &[u8]) -> Result<Envelope> {
    butane::parse_butane(raw).map(|c| Envelope::Config(Box::new(c)))
}

/// Decide what `raw` is and decode it
///
/// A document that names a Butane variant but fails the allow-list gets
/// that rejection back directly, since it is clearly Butane. Every other
/// failure is reported as [`Error::UnrecognizedFormat`] wrapping the last
/// decoder's error.
pub fn sense(raw: &[u8]) -> Result<Envelope> {
    let mut last_err = None;

    for (name, decode) in DECODERS {
        match decode(raw) {
            Ok(envelope) => {
                debug!("Config is of type {}", name);
                return Ok(envelope);
            }
            Err(e) => {
                debug!("Config is not {}: {}", name, e);
                last_err = Some(e);
            }
        }
    }

    let err = last_err.unwrap_or_else(|| Error::Parse("no decoders configured".to_string()));
    match err {
        Error::UnsupportedVariant { .. } | Error::UnsupportedVersion { .. }
            if names_butane_variant(raw) =>
        {
            Err(err)
        }
        other => Err(Error::UnrecognizedFormat {
            source: Box::new(other),
        }),
    }
}

fn names_butane_variant(raw: &[u8]) -> bool {
    Discriminator::probe(raw).is_ok_and(|d| !d.variant.is_empty())
}

/// Load a config from a locator and sense its format
pub fn sense_and_load(locator: &str) -> Result<(Envelope, FormatOrigin)> {
    let (raw, origin) = load::load_config(locator)?;
    let envelope = sense(&raw)?;
    Ok((envelope, origin))
}
