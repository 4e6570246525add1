// src/config/machineconfig.rs

//! MachineConfig wrapper decoding
//!
//! A MachineConfig is a Kubernetes-style object whose `spec.config` holds a
//! raw Ignition document. Only the wrapper's own fields are validated here;
//! the embedded payload is kept as bytes and decoded later.

use crate::error::{Error, Result};
use serde::Deserialize;

pub const API_VERSION: &str = "machineconfiguration.openshift.io/v1";
pub const KIND: &str = "MachineConfig";

/// A decoded MachineConfig with its Ignition payload still raw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MachineConfig {
    /// `metadata.name`
    pub name: String,
    /// `spec.config`, re-serialized as JSON
    pub raw_config: Vec<u8>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Object {
    #[serde(default)]
    api_version: String,
    #[serde(default)]
    kind: String,
    #[serde(default)]
    metadata: Metadata,
    #[serde(default)]
    spec: Spec,
}

#[derive(Default, Deserialize)]
struct Metadata {
    #[serde(default)]
    name: String,
}

#[derive(Default, Deserialize)]
struct Spec {
    #[serde(default)]
    config: serde_json::Value,
}

/// Read the first MachineConfig in a YAML or JSON stream
pub fn read_machine_config(raw: &[u8]) -> Result<MachineConfig> {
    let first = serde_yaml::Deserializer::from_slice(raw)
        .next()
        .ok_or_else(|| Error::Parse("Empty machine config document".to_string()))?;
    let object = Object::deserialize(first)
        .map_err(|e| Error::Parse(format!("Failed to parse machine config: {e}")))?;

    if object.api_version != API_VERSION || object.kind != KIND {
        return Err(Error::Parse(format!(
            "Not a machine config: apiVersion {:?} kind {:?}",
            object.api_version, object.kind
        )));
    }

    if object.metadata.name.is_empty() {
        return Err(Error::Parse(
            "Machine config is missing metadata.name".to_string(),
        ));
    }

    let raw_config = serde_json::to_vec(&object.spec.config)
        .map_err(|e| Error::Parse(format!("Failed to re-encode spec.config: {e}")))?;

    Ok(MachineConfig {
        name: object.metadata.name,
        raw_config,
    })
}
