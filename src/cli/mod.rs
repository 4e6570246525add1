// src/cli/mod.rs
//! CLI definitions for ignition2rpm
//!
//! A single command: point it at a config and it writes an RPM.

use clap::Parser;
use ign2rpm::Options;

#[derive(Parser, Debug)]
#[command(name = "ignition2rpm")]
#[command(version)]
#[command(about = "Pack an Ignition config, MachineConfig or Butane document into an RPM")]
#[command(long_about = None)]
pub struct Cli {
    /// Path or http(s) URL of the config to pack
    #[arg(short, long, value_name = "PATH|URL")]
    pub config: String,

    /// Skip every entity whose path starts with this prefix
    #[arg(short, long, value_name = "PREFIX")]
    pub exclude_prefix: Option<String>,

    /// Output file name (defaults to <input name>.rpm)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// Let the package replace files owned by other packages on rpm-ostree systems
    #[arg(long)]
    pub can_override: bool,
}

impl Cli {
    pub fn into_options(self) -> Options {
        Options {
            exclude_prefix: self.exclude_prefix,
            input: self.config,
            output_name: self.output,
            allow_override: self.can_override,
        }
    }
}
