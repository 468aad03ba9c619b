// cargo watch -x 'fmt' -x 'test'

//! IPv4/IPv6 address arithmetic and subnet planning.
//!
//! - [`models`] - Address, prefix, network and range value types
//! - [`processing`] - Prefix math, IPv6 notation, range sets, VLSM, aggregation
//! - [`output`] - CSV, terminal and JSON rendering
//! - [`config`] - Environment configuration and logging setup
//! - [`cli`] - The `net-toolbox` command line

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;

pub use error::{AddrError, AddrResult};
pub use models::{Address, AddressRange, Family, Network, Prefix, ScopedAddress};
pub use processing::{
    aggregate, allocate, calculate_subnet, cidr_to_mask, compress, expand, find_gaps,
    find_overlaps, mask_to_cidr, RangeSet, VlsmOptions, VlsmPlan, VlsmRequest,
};
