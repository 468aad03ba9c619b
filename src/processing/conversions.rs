//! Numeric format conversions and classful IPv4 information.

use crate::error::{AddrError, AddrResult};
use crate::models::{Address, Family};
use regex::Regex;
use serde::Serialize;
use std::sync::OnceLock;

/// Separators accepted between groups of binary or hex digits.
static SEPARATOR_REGEX: OnceLock<Regex> = OnceLock::new();
static BINARY_REGEX: OnceLock<Regex> = OnceLock::new();
static HEX_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_separator_regex() -> &'static Regex {
    SEPARATOR_REGEX.get_or_init(|| Regex::new(r"0[xX]|[.:\s]").expect("Invalid Regex"))
}

fn get_binary_regex() -> &'static Regex {
    BINARY_REGEX.get_or_init(|| Regex::new(r"^(?:[01]{32}|[01]{128})$").expect("Invalid Regex"))
}

fn get_hex_regex() -> &'static Regex {
    HEX_REGEX.get_or_init(|| {
        Regex::new(r"^(?:[0-9a-fA-F]{8}|[0-9a-fA-F]{32})$").expect("Invalid Regex")
    })
}

/// An address written in several number bases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressFormats {
    pub binary: String,
    pub decimal: String,
    pub hex: String,
    /// Per-octet octal, IPv4 only.
    pub octal: Option<String>,
}

/// Render an address as binary, decimal, hex and (IPv4) octal.
pub fn convert_formats(address: &Address) -> AddressFormats {
    match address.family() {
        Family::V4 => {
            let octets = address.to_octets();
            AddressFormats {
                binary: address.to_binary_string(),
                decimal: address.to_decimal_string(),
                hex: octets
                    .iter()
                    .map(|o| format!("0x{o:02X}"))
                    .collect::<Vec<String>>()
                    .join("."),
                octal: Some(
                    octets
                        .iter()
                        .map(|o| format!("0{o:o}"))
                        .collect::<Vec<String>>()
                        .join("."),
                ),
            }
        }
        Family::V6 => AddressFormats {
            binary: address.to_binary_string(),
            decimal: address.to_decimal_string(),
            hex: address
                .to_hex_groups()
                .iter()
                .map(|g| format!("{g:04x}"))
                .collect::<Vec<String>>()
                .join(":"),
            octal: None,
        },
    }
}

/// Address from an unsigned decimal integer.
pub fn address_from_decimal(text: &str, family: Family) -> AddrResult<Address> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AddrError::invalid(text, "decimal value must contain only digits"));
    }
    let value: u128 = text
        .parse()
        .map_err(|_| AddrError::Overflow(format!("{text} exceeds 128 bits")))?;
    Address::new(family, value)
}

/// Address from 32 or 128 binary digits; `.`, `:` and whitespace are ignored.
pub fn address_from_binary(text: &str) -> AddrResult<Address> {
    let clean = get_separator_regex().replace_all(text, "");
    if !get_binary_regex().is_match(&clean) {
        return Err(AddrError::invalid(text, "binary string must be 32 or 128 bits"));
    }
    let value =
        u128::from_str_radix(&clean, 2).map_err(|e| AddrError::invalid(text, e.to_string()))?;
    let family = if clean.len() == 32 { Family::V4 } else { Family::V6 };
    Address::new(family, value)
}

/// Address from 8 or 32 hex digits; `0x`, `.`, `:` and whitespace are ignored.
pub fn address_from_hex(text: &str) -> AddrResult<Address> {
    let clean = get_separator_regex().replace_all(text, "");
    if !get_hex_regex().is_match(&clean) {
        return Err(AddrError::invalid(text, "hex string must be 8 or 32 characters"));
    }
    let value =
        u128::from_str_radix(&clean, 16).map_err(|e| AddrError::invalid(text, e.to_string()))?;
    let family = if clean.len() == 8 { Family::V4 } else { Family::V6 };
    Address::new(family, value)
}

/// Classful view of an IPv4 address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub class: &'static str,
    pub kind: &'static str,
    pub description: &'static str,
}

/// Historic class (A-E) of an IPv4 address, decided by its first octet.
pub fn ipv4_class(address: &Address) -> ClassInfo {
    let first = address.to_octets().first().copied().unwrap_or(0);
    let (class, kind, description) = match first {
        1..=126 => ("A", "Unicast", "Large networks"),
        127 => ("A", "Loopback", "Loopback addresses"),
        128..=191 => ("B", "Unicast", "Medium networks"),
        192..=223 => ("C", "Unicast", "Small networks"),
        224..=239 => ("D", "Multicast", "Multicast addresses"),
        240..=255 => ("E", "Reserved", "Experimental/Reserved"),
        _ => ("Invalid", "Invalid", "Invalid IP address"),
    };
    if !address.is_v4() {
        return ClassInfo {
            class: "Invalid",
            kind: "Invalid",
            description: "Classes apply to IPv4 only",
        };
    }
    ClassInfo {
        class,
        kind,
        description,
    }
}
