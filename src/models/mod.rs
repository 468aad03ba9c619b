//! Address value types.
//!
//! This module contains the core data structures used throughout the crate:
//! - [`Address`] - IPv4 or IPv6 address as a family-tagged integer
//! - [`Prefix`] and [`Network`] - CIDR prefix lengths and blocks
//! - [`AddressRange`] - inclusive span of addresses

mod address;
mod network;
mod range;

// Re-export public types
pub use address::{Address, Family, ScopedAddress};
pub(crate) use address::host_mask;
pub use network::{Network, Prefix};
pub use range::AddressRange;
