//! Garbling scheme parameters shared by both parties.

use serde::{Deserialize, Serialize};

use crate::errors::ProtocolError;

/// Both parties must run with the same configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GcConfig {
    /// Width of label keys in bits. Also sizes the OT group.
    pub security_param: usize,
    /// Use a global offset so XOR gates need no table.
    pub free_xor: bool,
    /// Fix one output label per gate so its last row is zero and not sent.
    pub row_reduction: bool,
}

impl Default for GcConfig {
    fn default() -> Self {
        Self {
            security_param: 128,
            free_xor: true,
            row_reduction: true,
        }
    }
}

impl GcConfig {
    pub fn new(security_param: usize, free_xor: bool, row_reduction: bool) -> Self {
        Self {
            security_param,
            free_xor,
            row_reduction,
        }
    }

    pub fn validate(&self) -> Result<(), ProtocolError> {
        if self.security_param == 0 {
            return Err(ProtocolError::InvalidConfig(
                "security_param must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Bytes on the wire for one label: the key then one colour byte.
    pub fn label_bytes(&self) -> usize {
        crypto_core::key::byte_len(self.security_param) + 1
    }
}
