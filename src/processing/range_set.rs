//! Normalized address range sets and CIDR summarization.
//!
//! A [`RangeSet`] keeps its ranges sorted, non-overlapping and
//! non-touching, which is what lets difference, intersection and
//! containment work with a single ordered sweep.

use crate::models::{host_mask, Address, AddressRange, Network};
use num_bigint::BigUint;
use serde::Serialize;
use std::fmt;

/// Sorted set of disjoint, non-adjacent address ranges.
///
/// IPv4 ranges sort before IPv6 ranges and the two families never merge.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RangeSet {
    ranges: Vec<AddressRange>,
}

impl RangeSet {
    pub fn new() -> RangeSet {
        RangeSet::default()
    }

    /// Sort `ranges` and merge every overlapping or touching pair.
    pub fn normalize(ranges: impl IntoIterator<Item = AddressRange>) -> RangeSet {
        let mut sorted: Vec<AddressRange> = ranges.into_iter().collect();
        sorted.sort();

        let mut merged: Vec<AddressRange> = Vec::with_capacity(sorted.len());
        for range in sorted {
            match merged.last_mut() {
                Some(last) if last.overlaps(&range) || last.touches(&range) => {
                    if range.end() > last.end() {
                        *last = AddressRange::new_unchecked(last.start(), range.end());
                    }
                }
                _ => merged.push(range),
            }
        }
        RangeSet { ranges: merged }
    }

    /// Set covering every network in `networks`.
    pub fn from_networks<'a>(networks: impl IntoIterator<Item = &'a Network>) -> RangeSet {
        RangeSet::normalize(networks.into_iter().map(|n| AddressRange::from(*n)))
    }

    pub fn ranges(&self) -> &[AddressRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AddressRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of addresses in the set.
    pub fn address_count(&self) -> BigUint {
        self.ranges.iter().map(|r| r.count()).sum()
    }

    pub fn contains_address(&self, addr: &Address) -> bool {
        self.ranges.iter().any(|r| r.contains_address(addr))
    }

    /// Every address in either set.
    pub fn union(&self, other: &RangeSet) -> RangeSet {
        RangeSet::normalize(self.ranges.iter().chain(other.ranges.iter()).copied())
    }

    /// Addresses in `self` that are not in `other`.
    ///
    /// A range of `other` falling strictly inside a range of `self` splits
    /// it in two.
    pub fn difference(&self, other: &RangeSet) -> RangeSet {
        let mut pieces = Vec::new();
        for a in &self.ranges {
            // None once the tail of `a` has been removed entirely.
            let mut cursor = Some(a.start());
            for b in other.ranges.iter().filter(|b| b.overlaps(a)) {
                let Some(current) = cursor else {
                    break;
                };
                if b.start() > current {
                    if let Some(before) = b.start().checked_prev() {
                        pieces.push(AddressRange::new_unchecked(current, before));
                    }
                }
                cursor = if b.end() >= a.end() {
                    None
                } else {
                    b.end().checked_next()
                };
            }
            if let Some(current) = cursor {
                pieces.push(AddressRange::new_unchecked(current, a.end()));
            }
        }
        RangeSet::normalize(pieces)
    }

    /// Addresses in both sets.
    pub fn intersect(&self, other: &RangeSet) -> RangeSet {
        let mut pieces = Vec::new();
        for a in &self.ranges {
            for b in other.ranges.iter().filter(|b| b.overlaps(a)) {
                pieces.push(AddressRange::new_unchecked(
                    a.start().max(b.start()),
                    a.end().min(b.end()),
                ));
            }
        }
        RangeSet::normalize(pieces)
    }

    /// True if every address of `other` is also in `self`.
    pub fn contains(&self, other: &RangeSet) -> bool {
        other.difference(self).is_empty()
    }

    /// Smallest list of CIDR blocks covering exactly this set.
    pub fn to_minimal_cidrs(&self) -> Vec<Network> {
        self.ranges.iter().flat_map(range_to_cidrs).collect()
    }
}

impl From<Network> for RangeSet {
    fn from(net: Network) -> Self {
        RangeSet {
            ranges: vec![net.into()],
        }
    }
}

impl From<AddressRange> for RangeSet {
    fn from(range: AddressRange) -> Self {
        RangeSet {
            ranges: vec![range],
        }
    }
}

impl FromIterator<AddressRange> for RangeSet {
    fn from_iter<T: IntoIterator<Item = AddressRange>>(iter: T) -> Self {
        RangeSet::normalize(iter)
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a AddressRange;
    type IntoIter = std::slice::Iter<'a, AddressRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "{}", parts.join(","))
    }
}

/// Decompose one range into maximal aligned CIDR blocks.
///
/// At each step the block size is the largest power of two that both
/// divides the current start address and fits in what is left of the
/// range.
///
/// # Examples
/// ```
/// use net_toolbox::models::AddressRange;
/// use net_toolbox::processing::range_to_cidrs;
/// let r = AddressRange::parse("10.0.0.0-10.0.0.9").unwrap();
/// let cidrs: Vec<String> = range_to_cidrs(&r).iter().map(|n| n.to_string()).collect();
/// assert_eq!(cidrs, vec!["10.0.0.0/29", "10.0.0.8/31"]);
/// ```
pub fn range_to_cidrs(range: &AddressRange) -> Vec<Network> {
    let family = range.family();
    let bits = u32::from(family.bits());
    let end = range.end().value();
    let mut start = range.start().value();
    let mut blocks = Vec::new();

    loop {
        let align = if start == 0 {
            bits
        } else {
            start.trailing_zeros().min(bits)
        };
        let remaining = end - start;
        // floor(log2(remaining + 1)) without overflowing at the full space
        let fit = if remaining == u128::MAX {
            128
        } else {
            127 - (remaining + 1).leading_zeros()
        };
        let host_bits = align.min(fit).min(bits) as u8;

        let base = Address::new(family, start).unwrap_or_else(|_| Address::zero(family));
        blocks.push(Network::from_parts_unchecked(base, family.bits() - host_bits));

        let block_end = start + host_mask(host_bits);
        if block_end >= end {
            break;
        }
        start = block_end + 1;
    }
    blocks
}
