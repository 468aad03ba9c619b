//! Supernet aggregation of CIDR lists.

use crate::models::Network;
use itertools::Itertools;
use std::collections::BTreeSet;

/// Merge sibling blocks into their parent until nothing more merges.
///
/// Exact duplicates are dropped. Blocks nested in a larger block without
/// a sibling to merge with are kept as given. The result is sorted by
/// family, base address and prefix length.
///
/// # Examples
/// ```
/// use net_toolbox::models::Network;
/// use net_toolbox::processing::aggregate;
/// let nets: Vec<Network> = ["10.0.0.0/25", "10.0.0.128/25"]
///     .iter()
///     .map(|s| s.parse().unwrap())
///     .collect();
/// assert_eq!(aggregate(&nets), vec![Network::parse("10.0.0.0/24").unwrap()]);
/// ```
pub fn aggregate(networks: &[Network]) -> Vec<Network> {
    let mut current: BTreeSet<Network> = networks.iter().copied().collect();
    log::debug!(
        "aggregating {} networks ({} unique): {}",
        networks.len(),
        current.len(),
        current
            .iter()
            .counts_by(|n| n.family())
            .iter()
            .sorted()
            .map(|(family, count)| format!("{family}={count}"))
            .join(" ")
    );

    let mut pass = 0;
    loop {
        pass += 1;
        let mut merged = false;
        let snapshot: Vec<Network> = current.iter().copied().collect();
        for net in snapshot {
            // Only the lower half of a pair starts a merge.
            let (Some(sibling), Some(parent)) = (net.sibling(), net.parent()) else {
                continue;
            };
            if sibling < net || !current.contains(&net) || !current.contains(&sibling) {
                continue;
            }
            log::trace!("pass {pass}: {net} + {sibling} -> {parent}");
            current.remove(&net);
            current.remove(&sibling);
            current.insert(parent);
            merged = true;
        }
        if !merged {
            break;
        }
    }

    log::debug!("aggregated to {} networks after {pass} passes", current.len());
    current.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn nets(items: &[&str]) -> Vec<Network> {
        items.iter().map(|s| Network::parse(s).unwrap()).collect()
    }

    #[test]
    fn test_four_24s() {
        let input = nets(&[
            "192.168.0.0/24",
            "192.168.1.0/24",
            "192.168.2.0/24",
            "192.168.3.0/24",
        ]);
        assert_eq!(aggregate(&input), nets(&["192.168.0.0/22"]));
    }

    #[test]
    fn test_unaligned_pair_stays() {
        let input = nets(&["192.168.1.0/24", "192.168.2.0/24"]);
        assert_eq!(aggregate(&input), input);
    }

    #[test]
    fn test_duplicates_and_order() {
        let input = nets(&[
            "10.0.3.0/24",
            "2001:db8::/33",
            "10.0.2.0/24",
            "10.0.3.0/24",
            "2001:db8:8000::/33",
            "10.0.0.0/24",
        ]);
        assert_eq!(
            aggregate(&input),
            nets(&["10.0.0.0/24", "10.0.2.0/23", "2001:db8::/32"])
        );
    }

    #[test]
    fn test_nested_blocks_pass_through() {
        let input = nets(&["10.0.0.0/16", "10.0.5.0/24"]);
        assert_eq!(aggregate(&input), input);

        let input = nets(&["10.0.0.0/24", "10.0.0.0/25", "10.0.0.128/25"]);
        assert_eq!(aggregate(&input), nets(&["10.0.0.0/24"]));
    }

    #[test]
    fn test_families_never_merge() {
        let input = nets(&["0.0.0.0/1", "128.0.0.0/1", "::/1", "8000::/1"]);
        assert_eq!(aggregate(&input), nets(&["0.0.0.0/0", "::/0"]));
        assert!(aggregate(&[]).is_empty());
    }
}
