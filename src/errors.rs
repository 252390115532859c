//! Errors related to validating and encoding router plans.
use thiserror::Error;

use crate::ops::Opcode;
use crate::types::ParamType;

/// Represents an error in instruction validation, encoding or plan assembly.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum PlanError {
    /// This error occurs when the argument tuple does not match the row
    /// of the opcode in the schema registry (wrong arity or argument kind).
    #[error("Unknown instruction: {opcode} does not accept these argument types")]
    UnknownInstruction {
        /// Opcode the arguments were supplied for.
        opcode: Opcode,
    },

    /// This error occurs when a value handed to the codec does not match its declared type.
    #[error("Type mismatch: expected {expected}, found {found}")]
    SchemaMismatch {
        /// Canonical name of the declared type.
        expected: String,
        /// Short description of the supplied value.
        found: String,
    },

    /// This error occurs when an address string does not decode to exactly 20 bytes.
    #[error("Invalid address: {0:?}")]
    InvalidAddress(String),

    /// This error occurs when a structured swap path does not alternate
    /// between addresses and fee tiers, starting and ending with an address.
    #[error("Invalid swap path: {0}")]
    InvalidPath(String),

    /// This error occurs when the allow-revert flag is requested for an opcode
    /// that the dispatcher never lets revert.
    #[error("{opcode} cannot be allowed to revert")]
    RevertNotAllowed {
        /// Opcode the flag was requested for.
        opcode: Opcode,
    },

    /// This error occurs when an integer does not fit its declared unsigned bit width.
    #[error("Value does not fit into uint{bits}")]
    EncodingOverflow {
        /// Declared width of the slot.
        bits: usize,
    },

    /// This error occurs when an opcode name does not match any assigned opcode.
    #[error("Unknown opcode name {0:?}")]
    UnknownOpcodeName(String),

    /// This error occurs when a command byte carries an unassigned instruction type.
    #[error("Invalid command byte 0x{0:02x}")]
    InvalidOpcode(u8),
}

impl PlanError {
    pub(crate) fn mismatch(expected: &ParamType, found: impl Into<String>) -> Self {
        PlanError::SchemaMismatch {
            expected: expected.to_string(),
            found: found.into(),
        }
    }
}
