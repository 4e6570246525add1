// src/envelope.rs

//! Envelope unwrapping
//!
//! Turns a sensed [`Envelope`] into a canonical config. MachineConfig
//! wrappers have their embedded Ignition decoded here, and lend their name
//! to the output package when the caller did not pick one.

use crate::config::{self, Config};
use crate::error::{Error, Result};
use crate::options::Options;
use crate::sense::Envelope;
use tracing::info;

/// Produce the canonical config, filling in the output name from a wrapper
pub fn unwrap(envelope: Envelope, mut options: Options) -> Result<(Config, Options)> {
    match envelope {
        Envelope::Config(config) => Ok((*config, options)),
        Envelope::Wrapper(mc) => {
            let config = config::parse_and_convert(&mc.raw_config).map_err(|e| {
                Error::EnvelopeUnwrap {
                    name: mc.name.clone(),
                    source: Box::new(e),
                }
            })?;

            if options.output_name().is_none() {
                info!("Using machine config name {} as output name", mc.name);
                options.output_name = Some(mc.name);
            }

            Ok((config, options))
        }
    }
}
