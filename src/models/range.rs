//! Inclusive address ranges.

use super::address::{Address, Family};
use super::network::Network;
use crate::error::{AddrError, AddrResult};
use num_bigint::BigUint;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Inclusive `[start, end]` span of same-family addresses.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct AddressRange {
    start: Address,
    end: Address,
}

impl AddressRange {
    pub fn new(start: Address, end: Address) -> AddrResult<AddressRange> {
        start.ensure_family(end.family())?;
        if start > end {
            return Err(AddrError::invalid(
                format!("{start}-{end}"),
                "range start is after range end",
            ));
        }
        Ok(AddressRange { start, end })
    }

    /// Caller guarantees same family and `start <= end`.
    pub(crate) fn new_unchecked(start: Address, end: Address) -> AddressRange {
        debug_assert!(start.family() == end.family() && start <= end);
        AddressRange { start, end }
    }

    /// Parse `start-end`, or a CIDR, or a single address.
    pub fn parse(text: &str) -> AddrResult<AddressRange> {
        if let Some((start, end)) = text.split_once('-') {
            let start = Address::parse(start.trim(), None)?;
            let end = Address::parse(end.trim(), Some(start.family()))?;
            return AddressRange::new(start, end);
        }
        if text.contains('/') {
            return Ok(Network::parse(text)?.into());
        }
        let addr = Address::parse(text, None)?;
        Ok(AddressRange {
            start: addr,
            end: addr,
        })
    }

    pub fn start(&self) -> Address {
        self.start
    }

    pub fn end(&self) -> Address {
        self.end
    }

    pub fn family(&self) -> Family {
        self.start.family()
    }

    /// Number of addresses covered, up to 2^128.
    pub fn count(&self) -> BigUint {
        BigUint::from(self.end.value() - self.start.value()) + 1u32
    }

    pub fn contains_address(&self, addr: &Address) -> bool {
        addr.family() == self.family() && *addr >= self.start && *addr <= self.end
    }

    pub fn overlaps(&self, other: &AddressRange) -> bool {
        self.family() == other.family() && self.start <= other.end && other.start <= self.end
    }

    /// True if `other` begins right after this range ends.
    pub fn touches(&self, other: &AddressRange) -> bool {
        self.family() == other.family()
            && self.end.checked_next().map_or(false, |next| next == other.start)
    }
}

impl From<Network> for AddressRange {
    fn from(net: Network) -> Self {
        AddressRange {
            start: net.base(),
            end: net.last(),
        }
    }
}

impl From<Address> for AddressRange {
    fn from(addr: Address) -> Self {
        AddressRange {
            start: addr,
            end: addr,
        }
    }
}

impl FromStr for AddressRange {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AddressRange::parse(s)
    }
}

impl fmt::Display for AddressRange {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
