//! Configuration for building an address space

use crate::services::{BootstrapError, EncodingCapabilities};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest node table pre-allocation accepted
const MAX_INITIAL_CAPACITY: usize = 1 << 24;

/// Configuration for the address space store and its bootstrap
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AddressSpaceConfig {
    /// Optional encodings the server supports (capability gate data)
    pub encodings: EncodingCapabilities,

    /// Number of nodes the store is pre-sized for
    pub initial_capacity: usize,

    /// Per-subscriber buffer of the change notification channel
    pub event_channel_capacity: usize,

    /// Run the integrity pass after the standard table is loaded
    pub check_integrity_after_load: bool,
}

impl Default for AddressSpaceConfig {
    fn default() -> Self {
        Self {
            encodings: EncodingCapabilities::all(),
            initial_capacity: 32_768,
            event_channel_capacity: 1024,
            check_integrity_after_load: true,
        }
    }
}

impl AddressSpaceConfig {
    /// Parse and validate a JSON configuration
    ///
    /// Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self, BootstrapError> {
        let config: AddressSpaceConfig = serde_json::from_str(json)?;
        config.validate().map_err(BootstrapError::InvalidConfig)?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, BootstrapError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| BootstrapError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.initial_capacity == 0 {
            return Err("initial_capacity must be greater than 0".to_string());
        }

        if self.initial_capacity > MAX_INITIAL_CAPACITY {
            return Err(format!(
                "initial_capacity cannot exceed {}",
                MAX_INITIAL_CAPACITY
            ));
        }

        if self.event_channel_capacity == 0 {
            return Err("event_channel_capacity must be greater than 0".to_string());
        }

        Ok(())
    }
}
