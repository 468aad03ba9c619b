//! Address arithmetic and planning.
//!
//! This module contains the operations built on the address models:
//! - [`prefix_math`] - Masks, networks, broadcast and host ranges
//! - [`ipv6_notation`] - IPv6 expansion, compression and embedded IPv4 forms
//! - [`conversions`] - Binary/decimal/hex forms and IPv4 classes
//! - [`range_set`] - Normalized range sets and minimal CIDR covers
//! - [`vlsm`] - Variable-length subnet allocation
//! - [`aggregate`] - Supernet aggregation
//! - [`gap_finder`] - Free space inside a parent block
//! - [`overlap`] - Overlapping network detection

pub mod aggregate;
pub mod conversions;
pub mod gap_finder;
pub mod ipv6_notation;
pub mod overlap;
pub mod prefix_math;
pub mod range_set;
pub mod vlsm;

// Re-export public functions
pub use aggregate::aggregate;
pub use conversions::{
    address_from_binary, address_from_decimal, address_from_hex, convert_formats, ipv4_class,
    AddressFormats, ClassInfo,
};
pub use gap_finder::{find_gaps, MAX_GAP_BLOCKS};
pub use ipv6_notation::{
    classify, compress, compress_value, expand, expand_value, from_6to4, from_ipv4_mapped,
    nat64_extract, nat64_synthesize, parse_ula, teredo_decode, teredo_encode, to_6to4,
    to_ipv4_mapped, ula_prefix, well_known_nat64_prefix, Ipv6Class, MappedForms, TeredoInfo,
    UlaParts, NAT64_PREFIX_LENGTHS, WELL_KNOWN_NAT64_PREFIX,
};
pub use overlap::{find_overlaps, log_overlaps, OverlapConflict, OverlapKind};
pub use prefix_math::{
    broadcast_of, calculate_subnet, cidr_to_mask, host_range, is_in_subnet, mask_for,
    mask_to_cidr, network_of, prefix_from_mask, total_addresses, wildcard_for, HostRange,
    SubnetInfo,
};
pub use range_set::{range_to_cidrs, RangeSet};
pub use vlsm::{allocate, VlsmAllocation, VlsmOptions, VlsmPlan, VlsmRequest};
