//! Prefixes and CIDR networks.
//!
//! [`Network`] covers both address families and always stores its base
//! address with the host bits cleared.

use super::address::{host_mask, Address, Family};
use crate::error::{AddrError, AddrResult};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// A prefix length bound to an address family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Prefix {
    family: Family,
    length: u8,
}

impl Prefix {
    pub fn new(family: Family, length: u8) -> AddrResult<Prefix> {
        if length > family.bits() {
            return Err(AddrError::invalid(
                format!("/{length}"),
                format!("{family} prefix must be between 0-{}", family.bits()),
            ));
        }
        Ok(Prefix { family, length })
    }

    /// Parse `24` or `/24` for the given family.
    pub fn parse(text: &str, family: Family) -> AddrResult<Prefix> {
        let digits = text.strip_prefix('/').unwrap_or(text);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) || digits.len() > 3 {
            return Err(AddrError::invalid(text, "prefix must be a number"));
        }
        if digits.len() > 1 && digits.starts_with('0') {
            return Err(AddrError::invalid(text, "prefix must not have leading zeros"));
        }
        let length: u8 = digits
            .parse()
            .map_err(|_| AddrError::invalid(text, "prefix out of range"))?;
        Prefix::new(family, length)
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn length(&self) -> u8 {
        self.length
    }

    /// Number of host bits left after the prefix.
    pub fn host_bits(&self) -> u8 {
        self.family.bits() - self.length
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "/{}", self.length)
    }
}

/// A CIDR block: base address plus prefix length.
///
/// Ordering is by base address (IPv4 first), then prefix length.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Network {
    base: Address,
    prefix_len: u8,
}

impl Network {
    /// Build a network from any address inside it.
    pub fn new(addr: Address, prefix_len: u8) -> AddrResult<Network> {
        let prefix = Prefix::new(addr.family(), prefix_len)?;
        Ok(Self::from_prefix_unchecked(addr, prefix))
    }

    /// Build a network from an address and a prefix of the same family.
    pub fn from_prefix(addr: Address, prefix: Prefix) -> AddrResult<Network> {
        addr.ensure_family(prefix.family())?;
        Ok(Self::from_prefix_unchecked(addr, prefix))
    }

    fn from_prefix_unchecked(addr: Address, prefix: Prefix) -> Network {
        let host = host_mask(prefix.host_bits());
        let base = Address::new(addr.family(), addr.value() & !host)
            .unwrap_or_else(|_| Address::zero(addr.family()));
        Network {
            base,
            prefix_len: prefix.length(),
        }
    }

    /// Parse `a.b.c.d/n` or `x:y::/n`. Host bits are cleared.
    ///
    /// # Examples
    /// ```
    /// use net_toolbox::models::Network;
    /// let n = Network::parse("192.168.1.100/24").unwrap();
    /// assert_eq!(n.to_string(), "192.168.1.0/24");
    /// ```
    pub fn parse(text: &str) -> AddrResult<Network> {
        let (addr, len) = text
            .split_once('/')
            .ok_or_else(|| AddrError::invalid(text, "CIDR must be in format IP/prefix"))?;
        let addr = Address::parse(addr, None)?;
        let prefix = Prefix::parse(len, addr.family())?;
        Ok(Self::from_prefix_unchecked(addr, prefix))
    }

    /// Caller guarantees `base` is aligned to `prefix_len`.
    pub(crate) fn from_parts_unchecked(base: Address, prefix_len: u8) -> Network {
        debug_assert!(prefix_len <= base.bits());
        debug_assert!(base.value() & host_mask(base.bits() - prefix_len) == 0);
        Network { base, prefix_len }
    }

    /// Single-address network (`/32` or `/128`).
    pub fn host(addr: Address) -> Network {
        Network {
            base: addr,
            prefix_len: addr.bits(),
        }
    }

    /// Lowest address (network address).
    pub fn base(&self) -> Address {
        self.base
    }

    pub fn prefix_len(&self) -> u8 {
        self.prefix_len
    }

    pub fn prefix(&self) -> Prefix {
        Prefix {
            family: self.family(),
            length: self.prefix_len,
        }
    }

    pub fn family(&self) -> Family {
        self.base.family()
    }

    pub fn bits(&self) -> u8 {
        self.base.bits()
    }

    /// Host bits of the block.
    pub fn host_bits(&self) -> u8 {
        self.bits() - self.prefix_len
    }

    /// Highest address (broadcast for IPv4).
    pub fn last(&self) -> Address {
        Address::new(self.family(), self.base.value() | host_mask(self.host_bits()))
            .unwrap_or_else(|_| Address::max(self.family()))
    }

    pub fn contains_address(&self, addr: &Address) -> bool {
        addr.family() == self.family() && *addr >= self.base && *addr <= self.last()
    }

    /// True if `other` lies entirely inside this network.
    pub fn contains(&self, other: &Network) -> bool {
        other.family() == self.family()
            && other.prefix_len >= self.prefix_len
            && self.contains_address(&other.base)
    }

    /// True if the two blocks share at least one address.
    pub fn overlaps(&self, other: &Network) -> bool {
        self.contains(other) || other.contains(self)
    }

    /// The enclosing block one bit shorter, `None` at `/0`.
    pub fn parent(&self) -> Option<Network> {
        if self.prefix_len == 0 {
            return None;
        }
        Network::new(self.base, self.prefix_len - 1).ok()
    }

    /// The other half of this block's parent, `None` at `/0`.
    pub fn sibling(&self) -> Option<Network> {
        if self.prefix_len == 0 {
            return None;
        }
        let flip = 1u128 << self.host_bits();
        let base = Address::new(self.family(), self.base.value() ^ flip).ok()?;
        Some(Network {
            base,
            prefix_len: self.prefix_len,
        })
    }

    /// Split into the two halves one bit longer, `None` for a single address.
    pub fn halves(&self) -> Option<(Network, Network)> {
        if self.prefix_len == self.bits() {
            return None;
        }
        let lower = Network {
            base: self.base,
            prefix_len: self.prefix_len + 1,
        };
        let upper = lower.sibling()?;
        Some((lower, upper))
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}/{}", self.base, self.prefix_len)
    }
}

impl FromStr for Network {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Network::parse(s)
    }
}

impl Serialize for Network {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Network {
    fn deserialize<D>(deserializer: D) -> Result<Network, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Network::parse(&s).map_err(|e| de::Error::custom(format!("invalid CIDR {s}: {e}")))
    }
}
