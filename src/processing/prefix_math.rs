//! Prefix, mask and host-range arithmetic.
//!
//! All masks are computed in unsigned arithmetic of the family's width, so
//! `/0` and `/128` never shift out of range.

use super::conversions::{ipv4_class, ClassInfo};
use crate::error::{AddrError, AddrResult};
use crate::models::{host_mask, Address, Family, Network, Prefix};
use num_bigint::BigUint;
use serde::{Serialize, Serializer};

/// Mask with the top `prefix.length()` bits set.
///
/// # Examples
/// ```
/// use net_toolbox::models::{Family, Prefix};
/// use net_toolbox::processing::mask_for;
/// let mask = mask_for(Prefix::new(Family::V4, 24).unwrap());
/// assert_eq!(mask.to_string(), "255.255.255.0");
/// ```
pub fn mask_for(prefix: Prefix) -> Address {
    let family = prefix.family();
    let value = family.max_value() ^ host_mask(prefix.host_bits());
    Address::new(family, value).unwrap_or_else(|_| Address::zero(family))
}

/// Complement of [`mask_for`] within the address width.
pub fn wildcard_for(prefix: Prefix) -> Address {
    let family = prefix.family();
    Address::new(family, host_mask(prefix.host_bits())).unwrap_or_else(|_| Address::max(family))
}

/// Prefix length of a contiguous mask (`1*0*` in binary).
pub fn prefix_from_mask(mask: Address) -> AddrResult<Prefix> {
    let family = mask.family();
    let wildcard = !mask.value() & family.max_value();
    // A valid wildcard is 2^k - 1: no bit of it survives adding one.
    let contiguous = wildcard
        .checked_add(1)
        .map_or(true, |next| wildcard & next == 0);
    if !contiguous {
        return Err(AddrError::NotContiguous(mask.to_string()));
    }
    Prefix::new(family, family.bits() - wildcard.count_ones() as u8)
}

/// Network containing `address` for the given prefix.
pub fn network_of(address: Address, prefix: Prefix) -> AddrResult<Network> {
    Network::from_prefix(address, prefix)
}

/// Highest address of the block (the IPv4 broadcast address).
pub fn broadcast_of(network: &Network) -> Address {
    network.last()
}

/// Number of addresses in the block, 2^(bits - prefix).
pub fn total_addresses(network: &Network) -> BigUint {
    BigUint::from(1u8) << usize::from(network.host_bits())
}

/// Usable host span of a network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HostRange {
    pub first: Address,
    pub last: Address,
    #[serde(serialize_with = "serialize_count")]
    pub usable_count: BigUint,
}

/// First and last usable host plus the usable count.
///
/// `/31` and `/127` keep both addresses (RFC 3021), `/32` and `/128` hold
/// exactly one; every other block loses its first and last address.
pub fn host_range(network: &Network) -> HostRange {
    let first = network.base();
    let last = network.last();
    match network.host_bits() {
        0 => HostRange {
            first,
            last,
            usable_count: BigUint::from(1u8),
        },
        1 => HostRange {
            first,
            last,
            usable_count: BigUint::from(2u8),
        },
        _ => HostRange {
            // host_bits >= 2 keeps both neighbours inside the block
            first: first.checked_next().unwrap_or(first),
            last: last.checked_prev().unwrap_or(last),
            usable_count: total_addresses(network) - 2u8,
        },
    }
}

/// True if `address` lies inside `network`; always false across families.
pub fn is_in_subnet(address: &Address, network: &Network) -> bool {
    network.contains_address(address)
}

/// Dotted IPv4 subnet mask for a prefix length.
///
/// # Examples
/// ```
/// use net_toolbox::processing::cidr_to_mask;
/// assert_eq!(cidr_to_mask(30).unwrap(), "255.255.255.252");
/// ```
pub fn cidr_to_mask(len: u8) -> AddrResult<String> {
    Ok(mask_for(Prefix::new(Family::V4, len)?).to_string())
}

/// Prefix length of a subnet mask written as an address.
pub fn mask_to_cidr(mask: &str) -> AddrResult<u8> {
    let mask = Address::parse(mask, None)?;
    Ok(prefix_from_mask(mask)?.length())
}

/// Full calculator output for an address and prefix.
#[derive(Debug, Clone, Serialize)]
pub struct SubnetInfo {
    pub address: Address,
    pub network: Network,
    pub broadcast: Address,
    pub mask: Address,
    pub wildcard: Address,
    pub prefix: u8,
    #[serde(serialize_with = "serialize_count")]
    pub total_addresses: BigUint,
    #[serde(serialize_with = "serialize_count")]
    pub usable_hosts: BigUint,
    pub first_host: Address,
    pub last_host: Address,
    pub class: Option<ClassInfo>,
}

/// Compute every derived value of `address/prefix_len`.
pub fn calculate_subnet(address: Address, prefix_len: u8) -> AddrResult<SubnetInfo> {
    let prefix = Prefix::new(address.family(), prefix_len)?;
    let network = network_of(address, prefix)?;
    let hosts = host_range(&network);
    Ok(SubnetInfo {
        address,
        network,
        broadcast: broadcast_of(&network),
        mask: mask_for(prefix),
        wildcard: wildcard_for(prefix),
        prefix: prefix_len,
        total_addresses: total_addresses(&network),
        usable_hosts: hosts.usable_count,
        first_host: hosts.first,
        last_host: hosts.last,
        class: address.is_v4().then(|| ipv4_class(&address)),
    })
}

/// Serialize a count as a decimal string; JSON numbers cannot hold 2^128.
pub(crate) fn serialize_count<S>(count: &BigUint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&count.to_str_radix(10))
}
