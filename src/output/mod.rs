//! Output formatting for reports and plans.
//!
//! This module handles formatting and outputting results:
//! - [`csv`] - CSV output for plans and network lists
//! - [`terminal`] - Terminal output with colors and JSON

mod csv;
mod terminal;

pub use csv::{network_rows, print_networks, print_overlaps, print_vlsm_plan, vlsm_rows};
pub use terminal::{format_field, format_pair, print_heading, print_json, print_pairs};
