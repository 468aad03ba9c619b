//! Overlapping network detection.
//!
//! Detects CIDR blocks in a list that share addresses: either the same
//! block listed more than once or one block nested inside another.

use crate::models::Network;
use itertools::Itertools;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OverlapKind {
    /// The same block appears more than once.
    Identical,
    /// `outer` strictly contains `inner`.
    Contains,
}

impl fmt::Display for OverlapKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OverlapKind::Identical => write!(f, "identical"),
            OverlapKind::Contains => write!(f, "contains"),
        }
    }
}

/// Represents one overlapping pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OverlapConflict {
    pub outer: Network,
    pub inner: Network,
    pub kind: OverlapKind,
}

/// Find every pair of overlapping networks.
///
/// CIDR blocks either nest or are disjoint, so each overlapping pair is
/// reported once with the larger block as `outer`. Results are sorted by
/// outer network, then inner network.
pub fn find_overlaps(networks: &[Network]) -> Vec<OverlapConflict> {
    let sorted: Vec<Network> = networks.iter().copied().sorted().collect();

    // Repeated blocks are reported once as Identical and then checked once
    let identical = sorted
        .iter()
        .tuple_windows()
        .filter(|(a, b)| a == b)
        .map(|(a, _)| (*a, *a, OverlapKind::Identical));

    // Sorted order puts the containing block first in every pair
    let contains = sorted
        .iter()
        .dedup()
        .tuple_combinations()
        .filter(|(outer, inner)| outer.contains(inner))
        .map(|(outer, inner)| (*outer, *inner, OverlapKind::Contains));

    let conflicts: Vec<OverlapConflict> = identical
        .chain(contains)
        .sorted()
        .dedup()
        .map(|(outer, inner, kind)| OverlapConflict { outer, inner, kind })
        .collect();

    log::debug!(
        "checked {} networks, {} overlapping pairs",
        networks.len(),
        conflicts.len()
    );
    conflicts
}

/// Log overlapping networks as warnings.
pub fn log_overlaps(conflicts: &[OverlapConflict]) {
    if conflicts.is_empty() {
        log::info!("No overlapping networks found.");
        return;
    }

    log::warn!("Found {} overlapping network pair(s):", conflicts.len());

    for (outer, group) in &conflicts.iter().group_by(|c| c.outer) {
        let inner: Vec<String> = group
            .map(|c| format!("{} ({})", c.inner, c.kind))
            .collect();
        log::warn!("  {} overlaps {}", outer, inner.join(", "));
    }
}
