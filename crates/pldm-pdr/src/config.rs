// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! PDR acquisition configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::codec::platform::GET_PDR_MIN_RESP_BYTES;

/// Acquisition configuration shared by every terminus.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdrConfig {
    /// Per-attempt response timeout in milliseconds
    #[serde(default = "default_command_timeout")]
    pub command_timeout_ms: u64,

    /// Additional attempts on no-response, handled by the transport
    #[serde(default = "default_command_retry_count")]
    pub command_retry_count: u8,

    /// Largest PLDM response body the requester accepts (bytes)
    #[serde(default = "default_max_message_len")]
    pub max_message_len: usize,

    /// Request/response round trips allowed for one record
    #[serde(default = "default_multipart_transfer_limit")]
    pub multipart_transfer_limit: usize,

    /// Longest record-handle chain walked in one acquisition
    #[serde(default = "default_max_record_handles")]
    pub max_record_handles: u32,
}

fn default_command_timeout() -> u64 {
    100
}

fn default_command_retry_count() -> u8 {
    2
}

fn default_max_message_len() -> usize {
    64 // MCTP baseline transmission unit
}

fn default_multipart_transfer_limit() -> usize {
    100
}

fn default_max_record_handles() -> u32 {
    u16::MAX as u32
}

impl Default for PdrConfig {
    fn default() -> Self {
        Self {
            command_timeout_ms: default_command_timeout(),
            command_retry_count: default_command_retry_count(),
            max_message_len: default_max_message_len(),
            multipart_transfer_limit: default_multipart_transfer_limit(),
            max_record_handles: default_max_record_handles(),
        }
    }
}

impl PdrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file.
    pub fn to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;

        std::fs::write(path, content).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Get command timeout as Duration.
    pub fn command_timeout(&self) -> Duration {
        Duration::from_millis(self.command_timeout_ms)
    }

    /// Record data bytes requested per GetPDR exchange.
    pub fn request_count(&self) -> u16 {
        let count = self.max_message_len.saturating_sub(GET_PDR_MIN_RESP_BYTES);
        u16::try_from(count).unwrap_or(u16::MAX)
    }

    /// Validate configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "command_timeout_ms cannot be 0".into(),
            ));
        }
        if self.max_message_len <= GET_PDR_MIN_RESP_BYTES {
            return Err(ConfigError::InvalidValue(format!(
                "max_message_len must exceed {} bytes",
                GET_PDR_MIN_RESP_BYTES
            )));
        }
        if self.multipart_transfer_limit == 0 {
            return Err(ConfigError::InvalidValue(
                "multipart_transfer_limit cannot be 0".into(),
            ));
        }
        if self.max_record_handles == 0 {
            return Err(ConfigError::InvalidValue(
                "max_record_handles cannot be 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Serialize error: {0}")]
    Serialize(String),
    #[error("Invalid value: {0}")]
    InvalidValue(String),
}
