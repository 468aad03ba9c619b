//! Error types for address arithmetic.
//!
//! Every fallible operation in the crate returns [`AddrResult`], so callers
//! can match on the exact invariant that failed instead of parsing strings.

use crate::models::Family;
use thiserror::Error;

/// Errors produced by parsing and address arithmetic.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddrError {
    /// Malformed address, mask, prefix or CIDR text.
    #[error("invalid format '{input}': {reason}")]
    InvalidFormat { input: String, reason: String },

    /// IPv4 and IPv6 operands mixed where one family is required.
    #[error("address family mismatch: expected {expected}, found {found}")]
    FamilyMismatch { expected: Family, found: Family },

    /// Subnet mask is not a run of ones followed by zeros.
    #[error("subnet mask {0} is not contiguous")]
    NotContiguous(String),

    /// Arithmetic would leave the valid range for the family.
    #[error("address arithmetic overflow: {0}")]
    Overflow(String),

    /// VLSM ran out of space in the parent network.
    #[error("no room left for '{name}' ({hosts_needed} hosts)")]
    Exhausted { name: String, hosts_needed: u64 },

    /// Embedded IPv4 extraction attempted on an address of the wrong form.
    #[error("{input} is not {suggestion}")]
    NotMapped { input: String, suggestion: String },
}

/// Result type for address operations.
pub type AddrResult<T> = Result<T, AddrError>;

impl AddrError {
    pub(crate) fn invalid(input: impl Into<String>, reason: impl Into<String>) -> Self {
        AddrError::InvalidFormat {
            input: input.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn mismatch(expected: Family, found: Family) -> Self {
        AddrError::FamilyMismatch { expected, found }
    }

    pub(crate) fn not_mapped(input: impl Into<String>, suggestion: impl Into<String>) -> Self {
        AddrError::NotMapped {
            input: input.into(),
            suggestion: suggestion.into(),
        }
    }
}
