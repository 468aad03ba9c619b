//! CSV output formatting for plans and network lists.

use crate::models::Network;
use crate::processing::{host_range, OverlapConflict, VlsmPlan};
use colored::Colorize;

use super::terminal::format_field;

const VLSM_HEADER: &str = r#" "cnt",     "name", "hosts_needed",     "subnet_cidr", "usable", "first_host",   "last_host",     "broadcast""#;
const NETWORK_HEADER: &str =
    r#" "cnt",     "kind",     "subnet_cidr", "usable", "first_host",   "last_host""#;

/// CSV rows for a VLSM plan: allocations first, then the free blocks.
pub fn vlsm_rows(plan: &VlsmPlan) -> Vec<String> {
    let mut rows = Vec::with_capacity(plan.allocations.len() + plan.free.len());
    for (i, a) in plan.allocations.iter().enumerate() {
        let hosts = host_range(&a.network);
        rows.push(format!(
            "{j},{name},{needed},{cidr},{usable},{first},{last},{broadcast}",
            j = format_field(i + 1, 6),
            name = format_field(&a.request.name, 10),
            needed = format_field(a.request.hosts_needed, 15),
            cidr = format_field(a.network, 18),
            usable = format_field(&a.usable_hosts, 9),
            first = format_field(hosts.first, 15),
            last = format_field(hosts.last, 15),
            broadcast = format_field(a.network.last(), 15),
        ));
    }
    rows.extend(
        plan.free
            .iter()
            .map(|net| network_row(0, "-free-", net)),
    );
    rows
}

/// CSV rows for a list of networks tagged with `kind` (gap, summary, ...).
pub fn network_rows(kind: &str, networks: &[Network]) -> Vec<String> {
    networks
        .iter()
        .enumerate()
        .map(|(i, net)| network_row(i + 1, kind, net))
        .collect()
}

fn network_row(j: usize, kind: &str, net: &Network) -> String {
    let hosts = host_range(net);
    format!(
        "{j},{kind},{cidr},{usable},{first},{last}",
        j = format_field(j, 6),
        kind = format_field(kind, 10),
        cidr = format_field(net, 18),
        usable = format_field(&hosts.usable_count, 9),
        first = format_field(hosts.first, 15),
        last = format_field(hosts.last, 15),
    )
}

/// Print a VLSM plan as CSV to stdout.
pub fn print_vlsm_plan(plan: &VlsmPlan) {
    log::info!(
        "#Start print_vlsm_plan() parent {} with {} allocations",
        plan.parent,
        plan.allocations.len()
    );
    println!("{VLSM_HEADER}");
    for row in vlsm_rows(plan) {
        println!("{row}");
    }
    println!(
        "#{}# {} allocated, {} free block(s) left in {}",
        "NOTE".on_red(),
        plan.allocations.len(),
        plan.free.len(),
        plan.parent
    );
}

/// Print networks as CSV to stdout.
pub fn print_networks(kind: &str, networks: &[Network]) {
    println!("{NETWORK_HEADER}");
    for row in network_rows(kind, networks) {
        println!("{row}");
    }
}

/// Print overlap conflicts as CSV to stdout.
pub fn print_overlaps(conflicts: &[OverlapConflict]) {
    println!(r#" "cnt",         "outer",         "inner",       "kind""#);
    for (i, c) in conflicts.iter().enumerate() {
        println!(
            "{j},{outer},{inner},{kind}",
            j = format_field(i + 1, 6),
            outer = format_field(c.outer, 15),
            inner = format_field(c.inner, 15),
            kind = format_field(c.kind, 12),
        );
    }
    if conflicts.is_empty() {
        println!("#{}# no overlapping networks", "NOTE".on_green());
    }
}
