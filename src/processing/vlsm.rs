//! Variable-length subnet planning.
//!
//! Requests are placed largest first into a parent block. Each block is
//! the smallest power of two whose usable hosts (size minus network and
//! broadcast) cover the request, aligned on its own size.

use super::prefix_math::{host_range, serialize_count};
use super::range_set::RangeSet;
use crate::error::{AddrError, AddrResult};
use crate::models::{host_mask, Address, Network};
use num_bigint::BigUint;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Smallest block handed out unless point-to-point links are allowed.
const MIN_HOST_BITS: u8 = 2;

/// A named request for a number of usable hosts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VlsmRequest {
    pub name: String,
    pub hosts_needed: u64,
}

impl VlsmRequest {
    pub fn new(name: impl Into<String>, hosts_needed: u64) -> VlsmRequest {
        VlsmRequest {
            name: name.into(),
            hosts_needed,
        }
    }
}

/// Parse `NAME:HOSTS`, as given on the command line.
impl FromStr for VlsmRequest {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, hosts) = s
            .rsplit_once(':')
            .ok_or_else(|| AddrError::invalid(s, "request must be in format NAME:HOSTS"))?;
        if name.trim().is_empty() {
            return Err(AddrError::invalid(s, "request name is empty"));
        }
        let hosts_needed = hosts
            .trim()
            .parse::<u64>()
            .map_err(|_| AddrError::invalid(s, "host count must be a non-negative integer"))?;
        Ok(VlsmRequest::new(name.trim(), hosts_needed))
    }
}

impl fmt::Display for VlsmRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.name, self.hosts_needed)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VlsmOptions {
    /// Give requests of one or two hosts a `/31` (or `/127`) block.
    pub allow_point_to_point: bool,
}

/// One placed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlsmAllocation {
    pub request: VlsmRequest,
    pub network: Network,
    #[serde(serialize_with = "serialize_count")]
    pub usable_hosts: BigUint,
}

/// Result of [`allocate`]: placements in allocation order plus the space
/// left over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VlsmPlan {
    pub parent: Network,
    pub allocations: Vec<VlsmAllocation>,
    pub free: Vec<Network>,
}

/// Host bits of the smallest block that serves `hosts` usable addresses.
fn host_bits_for(hosts: u64, options: VlsmOptions) -> u8 {
    if options.allow_point_to_point && hosts <= 2 {
        return 1;
    }
    let mut bits = MIN_HOST_BITS;
    // hosts fits in 64 bits, so this stops by 65
    while (1u128 << bits) - 2 < u128::from(hosts) {
        bits += 1;
    }
    bits
}

/// Place every request inside `parent`.
///
/// Requests are sorted by `hosts_needed` descending; equal sizes keep
/// their input order. Fails with [`AddrError::Exhausted`] on the first
/// request that no longer fits.
///
/// # Examples
/// ```
/// use net_toolbox::models::Network;
/// use net_toolbox::processing::{allocate, VlsmOptions, VlsmRequest};
/// let parent = Network::parse("192.168.1.0/24").unwrap();
/// let requests = vec![VlsmRequest::new("IT", 25), VlsmRequest::new("Sales", 100)];
/// let plan = allocate(&parent, &requests, VlsmOptions::default()).unwrap();
/// assert_eq!(plan.allocations[0].network.to_string(), "192.168.1.0/25");
/// assert_eq!(plan.allocations[1].network.to_string(), "192.168.1.128/27");
/// ```
pub fn allocate(
    parent: &Network,
    requests: &[VlsmRequest],
    options: VlsmOptions,
) -> AddrResult<VlsmPlan> {
    if let Some(empty) = requests.iter().find(|r| r.hosts_needed == 0) {
        return Err(AddrError::invalid(
            empty.to_string(),
            "hosts_needed must be at least 1",
        ));
    }

    let mut ordered: Vec<&VlsmRequest> = requests.iter().collect();
    // sort_by is stable: ties keep input order
    ordered.sort_by(|a, b| b.hosts_needed.cmp(&a.hosts_needed));
    log::trace!(
        "vlsm order: {}",
        ordered
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<String>>()
            .join(", ")
    );

    let family = parent.family();
    let parent_last = parent.last().value();
    let mut cursor = Some(parent.base().value());
    let mut allocations = Vec::with_capacity(ordered.len());

    for request in ordered {
        let exhausted = || AddrError::Exhausted {
            name: request.name.clone(),
            hosts_needed: request.hosts_needed,
        };
        let host_bits = host_bits_for(request.hosts_needed, options);
        if host_bits > parent.host_bits() {
            log::debug!(
                "'{}' needs /{} which is larger than {parent}",
                request.name,
                parent.bits().saturating_sub(host_bits)
            );
            return Err(exhausted());
        }

        let span = host_mask(host_bits);
        let start = cursor
            .and_then(|c| c.checked_add(span))
            .map(|c| c & !span)
            .ok_or_else(exhausted)?;
        let end = start.checked_add(span).ok_or_else(exhausted)?;
        if end > parent_last {
            log::debug!(
                "'{}' does not fit: block would end past {}",
                request.name,
                parent.last()
            );
            return Err(exhausted());
        }

        let base = Address::new(family, start)?;
        let network = Network::from_parts_unchecked(base, family.bits() - host_bits);
        log::debug!(
            "placed '{}' ({} hosts) at {network}",
            request.name,
            request.hosts_needed
        );
        allocations.push(VlsmAllocation {
            request: request.clone(),
            network,
            usable_hosts: host_range(&network).usable_count,
        });
        cursor = end.checked_add(1);
    }

    let used = RangeSet::from_networks(allocations.iter().map(|a| &a.network));
    let free = RangeSet::from(*parent).difference(&used).to_minimal_cidrs();
    log::debug!(
        "vlsm {parent}: {} allocations, {} free blocks",
        allocations.len(),
        free.len()
    );

    Ok(VlsmPlan {
        parent: *parent,
        allocations,
        free,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn net(s: &str) -> Network {
        Network::parse(s).unwrap()
    }

    fn placed(plan: &VlsmPlan) -> Vec<(String, String)> {
        plan.allocations
            .iter()
            .map(|a| (a.request.name.clone(), a.network.to_string()))
            .collect()
    }

    #[test]
    fn test_sales_and_it() {
        let requests = vec![VlsmRequest::new("Sales", 100), VlsmRequest::new("IT", 25)];
        let plan = allocate(&net("192.168.1.0/24"), &requests, VlsmOptions::default()).unwrap();
        assert_eq!(plan.allocations[0].network, net("192.168.1.0/25"));
        assert_eq!(plan.allocations[0].usable_hosts, BigUint::from(126u32));
        assert_eq!(plan.allocations[1].network, net("192.168.1.128/27"));
        assert_eq!(plan.allocations[1].usable_hosts, BigUint::from(30u32));
        assert_eq!(plan.free, vec![net("192.168.1.160/27"), net("192.168.1.192/26")]);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let requests = vec![
            VlsmRequest::new("A", 10),
            VlsmRequest::new("B", 10),
            VlsmRequest::new("C", 50),
        ];
        let plan = allocate(&net("10.0.0.0/24"), &requests, VlsmOptions::default()).unwrap();
        assert_eq!(
            placed(&plan),
            vec![
                ("C".to_string(), "10.0.0.0/26".to_string()),
                ("A".to_string(), "10.0.0.64/28".to_string()),
                ("B".to_string(), "10.0.0.80/28".to_string()),
            ]
        );
        assert_eq!(plan.free, vec![net("10.0.0.96/27"), net("10.0.0.128/25")]);
    }

    #[test]
    fn test_block_sizes() {
        let opts = VlsmOptions::default();
        assert_eq!(host_bits_for(1, opts), 2);
        assert_eq!(host_bits_for(2, opts), 2);
        assert_eq!(host_bits_for(3, opts), 3);
        assert_eq!(host_bits_for(6, opts), 3);
        assert_eq!(host_bits_for(7, opts), 4);
        assert_eq!(host_bits_for(254, opts), 8);
        assert_eq!(host_bits_for(255, opts), 9);
        assert_eq!(host_bits_for(u64::MAX, opts), 65);

        let p2p = VlsmOptions {
            allow_point_to_point: true,
        };
        assert_eq!(host_bits_for(1, p2p), 1);
        assert_eq!(host_bits_for(2, p2p), 1);
        assert_eq!(host_bits_for(3, p2p), 3);
    }

    #[test]
    fn test_point_to_point_links() {
        let requests = vec![
            VlsmRequest::new("lan", 5),
            VlsmRequest::new("wan1", 2),
            VlsmRequest::new("wan2", 2),
        ];
        let p2p = VlsmOptions {
            allow_point_to_point: true,
        };
        let plan = allocate(&net("10.0.0.0/28"), &requests, p2p).unwrap();
        assert_eq!(plan.allocations[1].network, net("10.0.0.8/31"));
        assert_eq!(plan.allocations[1].usable_hosts, BigUint::from(2u32));
        assert_eq!(plan.allocations[2].network, net("10.0.0.10/31"));

        let plan = allocate(&net("10.0.0.0/28"), &requests, VlsmOptions::default()).unwrap();
        assert_eq!(plan.allocations[1].network, net("10.0.0.8/30"));
        assert_eq!(plan.allocations[2].network, net("10.0.0.12/30"));
        assert!(plan.free.is_empty());
    }

    #[test]
    fn test_exhausted() {
        let err = allocate(
            &net("10.0.0.0/28"),
            &[VlsmRequest::new("big", 20)],
            VlsmOptions::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            AddrError::Exhausted {
                name: "big".to_string(),
                hosts_needed: 20
            }
        );

        let requests = vec![
            VlsmRequest::new("a", 100),
            VlsmRequest::new("b", 100),
            VlsmRequest::new("c", 100),
        ];
        let err = allocate(&net("10.0.0.0/24"), &requests, VlsmOptions::default()).unwrap_err();
        assert!(matches!(err, AddrError::Exhausted { ref name, .. } if name == "c"));
    }

    #[test]
    fn test_end_of_address_space() {
        let requests = vec![VlsmRequest::new("a", 2), VlsmRequest::new("b", 2)];
        let plan = allocate(
            &net("255.255.255.248/29"),
            &requests,
            VlsmOptions::default(),
        )
        .unwrap();
        assert_eq!(plan.allocations[1].network, net("255.255.255.252/30"));

        let requests = vec![
            VlsmRequest::new("a", 2),
            VlsmRequest::new("b", 2),
            VlsmRequest::new("c", 1),
        ];
        let err = allocate(&net("255.255.255.248/29"), &requests, VlsmOptions::default());
        assert!(matches!(err, Err(AddrError::Exhausted { .. })));
    }

    #[test]
    fn test_ipv6_plan() {
        let requests = vec![VlsmRequest::new("hosts", 1000)];
        let plan = allocate(&net("2001:db8::/64"), &requests, VlsmOptions::default()).unwrap();
        assert_eq!(plan.allocations[0].network, net("2001:db8::/118"));
        assert_eq!(plan.allocations[0].usable_hosts, BigUint::from(1022u32));
    }

    #[test]
    fn test_zero_hosts_rejected() {
        let err = allocate(
            &net("10.0.0.0/24"),
            &[VlsmRequest::new("none", 0)],
            VlsmOptions::default(),
        );
        assert!(matches!(err, Err(AddrError::InvalidFormat { .. })));
    }

    #[test]
    fn test_request_parse() {
        let r: VlsmRequest = "Sales:100".parse().unwrap();
        assert_eq!(r, VlsmRequest::new("Sales", 100));
        assert!("Sales".parse::<VlsmRequest>().is_err());
        assert!(":10".parse::<VlsmRequest>().is_err());
        assert!("Sales:-1".parse::<VlsmRequest>().is_err());

        let json = r#"{"name": "IT", "hosts_needed": 25}"#;
        let r: VlsmRequest = serde_json::from_str(json).unwrap();
        assert_eq!(r.hosts_needed, 25);
    }
}
