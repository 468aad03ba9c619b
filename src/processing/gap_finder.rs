//! Gap finding inside a parent block.
//!
//! Identifies unused address space between allocated networks and
//! reports it as aligned CIDR blocks.

use super::range_set::RangeSet;
use crate::error::{AddrError, AddrResult};
use crate::models::{host_mask, Address, Network};

/// Upper bound on the number of gap blocks one call may return.
pub const MAX_GAP_BLOCKS: usize = 1 << 20;

/// Free space of `parent` not covered by `used`.
///
/// Networks in `used` that fall outside `parent` are ignored. With
/// `max_block`, no returned block is larger than `/max_block`.
///
/// # Arguments
/// * `parent` - The block to search
/// * `used` - Allocated networks, any order, overlaps allowed
/// * `max_block` - Shortest prefix length a gap block may have
///
/// # Returns
/// Gap blocks in ascending order, or `FamilyMismatch` when a used network
/// is of the other family.
pub fn find_gaps(
    parent: &Network,
    used: &[Network],
    max_block: Option<u8>,
) -> AddrResult<Vec<Network>> {
    for net in used {
        parent.base().ensure_family(net.family())?;
    }
    let min_prefix = match max_block {
        Some(len) if len > parent.bits() => {
            return Err(AddrError::invalid(
                format!("/{len}"),
                format!("{} prefix must be between 0-{}", parent.family(), parent.bits()),
            ));
        }
        Some(len) => len,
        None => 0,
    };

    let free = RangeSet::from(*parent).difference(&RangeSet::from_networks(used));
    let mut gaps = Vec::new();

    for range in free.iter() {
        let end = range.end();
        let mut next = range.start();
        loop {
            if gaps.len() >= MAX_GAP_BLOCKS {
                return Err(AddrError::Overflow(format!(
                    "more than {MAX_GAP_BLOCKS} gap blocks in {parent}, use a shorter max block"
                )));
            }
            let prefix_len = find_biggest_block(next, min_prefix, end);
            let block = Network::from_parts_unchecked(next, prefix_len);
            log::trace!("gap {block}");
            gaps.push(block);

            let block_last = block.last();
            match block_last.checked_next() {
                Some(after) if block_last < end => next = after,
                _ => break,
            }
        }
    }

    log::debug!(
        "{parent}: {} used networks, {} gap blocks",
        used.len(),
        gaps.len()
    );
    Ok(gaps)
}

/// Prefix length of the biggest block starting at `start` that ends at or
/// before `last`.
///
/// The result is constrained by:
/// 1. `min_prefix` (never a shorter prefix)
/// 2. the alignment of `start`, which must be the block's base address
/// 3. the block must not run past `last`
fn find_biggest_block(start: Address, min_prefix: u8, last: Address) -> u8 {
    let bits = start.bits();
    debug_assert!(start <= last);

    // Minimum prefix for alignment from trailing zeros
    let align = if start.value() == 0 {
        bits
    } else {
        (start.value().trailing_zeros() as u8).min(bits)
    };
    let mut prefix_len = min_prefix.max(bits - align);

    while prefix_len < bits && (start.value() | host_mask(bits - prefix_len)) > last.value() {
        prefix_len += 1;
    }
    prefix_len
}
