//! IPv4 and IPv6 address values.
//!
//! Provides [`Address`], a family-tagged unsigned integer wide enough for
//! both 32-bit and 128-bit addresses, with the text parsers and renderers
//! every other module builds on.

use crate::error::{AddrError, AddrResult};
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use std::str::FromStr;

/// Address family.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Family {
    V4,
    V6,
}

impl Family {
    /// Address width in bits (32 or 128).
    pub const fn bits(self) -> u8 {
        match self {
            Family::V4 => 32,
            Family::V6 => 128,
        }
    }

    /// Largest address value of this family.
    pub const fn max_value(self) -> u128 {
        host_mask(self.bits())
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Family::V4 => write!(f, "IPv4"),
            Family::V6 => write!(f, "IPv6"),
        }
    }
}

/// Value with the low `host_bits` bits set.
///
/// Saturates at 128 bits so `/0` on IPv6 never shifts out of range.
pub(crate) const fn host_mask(host_bits: u8) -> u128 {
    if host_bits >= 128 {
        u128::MAX
    } else {
        (1u128 << host_bits) - 1
    }
}

/// An IPv4 or IPv6 address.
///
/// The numeric value is always within `[0, 2^bits - 1]` for its family.
/// Ordering sorts every IPv4 address before every IPv6 address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Address {
    family: Family,
    value: u128,
}

impl Address {
    /// Create an address, rejecting values wider than the family.
    pub fn new(family: Family, value: u128) -> AddrResult<Address> {
        if value > family.max_value() {
            return Err(AddrError::Overflow(format!(
                "{value} does not fit in {} bits",
                family.bits()
            )));
        }
        Ok(Address { family, value })
    }

    pub const fn v4(value: u32) -> Address {
        Address {
            family: Family::V4,
            value: value as u128,
        }
    }

    pub const fn v6(value: u128) -> Address {
        Address {
            family: Family::V6,
            value,
        }
    }

    /// Parse an address, detecting the family unless one is given.
    ///
    /// # Examples
    /// ```
    /// use net_toolbox::models::{Address, Family};
    /// let a = Address::parse("192.168.1.1", None).unwrap();
    /// assert_eq!(a.family(), Family::V4);
    /// assert!(Address::parse("192.168.01.1", None).is_err());
    /// ```
    pub fn parse(text: &str, family: Option<Family>) -> AddrResult<Address> {
        Ok(Self::parse_scoped_as(text, family)?.address)
    }

    /// Parse an address and keep any IPv6 zone id.
    pub fn parse_scoped(text: &str) -> AddrResult<ScopedAddress> {
        Self::parse_scoped_as(text, None)
    }

    fn parse_scoped_as(text: &str, family: Option<Family>) -> AddrResult<ScopedAddress> {
        if text.is_empty() {
            return Err(AddrError::invalid(text, "address is required"));
        }
        let detected = if text.contains(':') || text.starts_with('[') {
            Family::V6
        } else {
            Family::V4
        };
        if let Some(expected) = family {
            if expected != detected {
                return Err(AddrError::mismatch(expected, detected));
            }
        }
        match detected {
            Family::V4 => Ok(ScopedAddress {
                address: Address::v4(parse_ipv4(text)?),
                zone: None,
            }),
            Family::V6 => {
                let (value, zone) = parse_ipv6(text)?;
                Ok(ScopedAddress {
                    address: Address::v6(value),
                    zone,
                })
            }
        }
    }

    pub fn family(&self) -> Family {
        self.family
    }

    pub fn value(&self) -> u128 {
        self.value
    }

    pub fn bits(&self) -> u8 {
        self.family.bits()
    }

    pub fn is_v4(&self) -> bool {
        self.family == Family::V4
    }

    /// Lowest address of the family.
    pub const fn zero(family: Family) -> Address {
        Address { family, value: 0 }
    }

    /// Highest address of the family.
    pub const fn max(family: Family) -> Address {
        Address {
            family,
            value: family.max_value(),
        }
    }

    /// Big-endian bytes: 4 for IPv4, 16 for IPv6.
    pub fn to_octets(&self) -> Vec<u8> {
        match self.family {
            Family::V4 => (self.value as u32).to_be_bytes().to_vec(),
            Family::V6 => self.value.to_be_bytes().to_vec(),
        }
    }

    /// 16-bit groups: 2 for IPv4, 8 for IPv6.
    pub fn to_hex_groups(&self) -> Vec<u16> {
        let count = self.bits() / 16;
        (0..count)
            .rev()
            .map(|i| ((self.value >> (u32::from(i) * 16)) & 0xffff) as u16)
            .collect()
    }

    /// Zero-padded binary, `.`-grouped per octet (IPv4) or `:`-grouped per
    /// 16-bit group (IPv6).
    pub fn to_binary_string(&self) -> String {
        match self.family {
            Family::V4 => self
                .to_octets()
                .iter()
                .map(|o| format!("{o:08b}"))
                .collect::<Vec<String>>()
                .join("."),
            Family::V6 => self
                .to_hex_groups()
                .iter()
                .map(|g| format!("{g:016b}"))
                .collect::<Vec<String>>()
                .join(":"),
        }
    }

    /// Full-width unsigned decimal value.
    pub fn to_decimal_string(&self) -> String {
        self.value.to_string()
    }

    /// Offset the address, failing instead of wrapping.
    pub fn add(&self, offset: i128) -> AddrResult<Address> {
        let moved = if offset >= 0 {
            self.value.checked_add(offset as u128)
        } else {
            self.value.checked_sub(offset.unsigned_abs())
        };
        match moved {
            Some(value) if value <= self.family.max_value() => Ok(Address {
                family: self.family,
                value,
            }),
            _ => Err(AddrError::Overflow(format!(
                "{self} {offset:+} leaves the {} range",
                self.family
            ))),
        }
    }

    pub(crate) fn checked_next(&self) -> Option<Address> {
        self.add(1).ok()
    }

    pub(crate) fn checked_prev(&self) -> Option<Address> {
        self.add(-1).ok()
    }

    /// Unsigned numeric comparison of two same-family addresses.
    pub fn compare(&self, other: &Address) -> AddrResult<Ordering> {
        self.ensure_family(other.family)?;
        Ok(self.value.cmp(&other.value))
    }

    pub(crate) fn ensure_family(&self, family: Family) -> AddrResult<()> {
        if self.family != family {
            return Err(AddrError::mismatch(self.family, family));
        }
        Ok(())
    }

    pub fn to_ip_addr(&self) -> IpAddr {
        match self.family {
            Family::V4 => IpAddr::V4(Ipv4Addr::from(self.value as u32)),
            Family::V6 => IpAddr::V6(Ipv6Addr::from(self.value)),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::v4(u32::from(addr))
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::v6(u128::from(addr))
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => v4.into(),
            IpAddr::V6(v6) => v6.into(),
        }
    }
}

impl FromStr for Address {
    type Err = AddrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Address::parse(s, None)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.family {
            Family::V4 => write!(f, "{}", Ipv4Addr::from(self.value as u32)),
            Family::V6 => write!(
                f,
                "{}",
                crate::processing::ipv6_notation::compress_value(self.value)
            ),
        }
    }
}

impl Serialize for Address {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D>(deserializer: D) -> Result<Address, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Address::parse(&s, None).map_err(de::Error::custom)
    }
}

/// An address together with its IPv6 zone id (`fe80::1%eth0`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ScopedAddress {
    pub address: Address,
    pub zone: Option<String>,
}

impl fmt::Display for ScopedAddress {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.zone {
            Some(zone) => write!(f, "{}%{}", self.address, zone),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Strict dotted-quad parser: four decimal octets, no leading zeros.
fn parse_ipv4(text: &str) -> AddrResult<u32> {
    let octets: Vec<&str> = text.split('.').collect();
    if octets.len() != 4 {
        return Err(AddrError::invalid(text, "IPv4 address must have 4 octets"));
    }
    let mut value: u32 = 0;
    for (i, octet) in octets.iter().enumerate() {
        let n = i + 1;
        if octet.is_empty() {
            return Err(AddrError::invalid(text, format!("octet {n} is empty")));
        }
        if !octet.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AddrError::invalid(
                text,
                format!("octet {n} contains non-numeric characters"),
            ));
        }
        if octet.len() > 1 && octet.starts_with('0') {
            return Err(AddrError::invalid(
                text,
                format!("octet {n} has leading zeros"),
            ));
        }
        let parsed = if octet.len() > 3 {
            None
        } else {
            octet.parse::<u16>().ok().filter(|v| *v <= 255)
        };
        let byte = parsed.ok_or_else(|| {
            AddrError::invalid(text, format!("octet {n} must be between 0-255"))
        })?;
        value = (value << 8) | u32::from(byte);
    }
    Ok(value)
}

/// RFC 4291 text parser with brackets, zone ids and a trailing dotted quad.
fn parse_ipv6(text: &str) -> AddrResult<(u128, Option<String>)> {
    let unbracketed = if let Some(inner) = text.strip_prefix('[') {
        inner
            .strip_suffix(']')
            .ok_or_else(|| AddrError::invalid(text, "unbalanced brackets"))?
    } else if text.ends_with(']') {
        return Err(AddrError::invalid(text, "unbalanced brackets"));
    } else {
        text
    };

    let (body, zone) = match unbracketed.split_once('%') {
        Some((_, "")) => return Err(AddrError::invalid(text, "empty zone id")),
        Some((body, zone)) => (body, Some(zone.to_string())),
        None => (unbracketed, None),
    };
    if body.is_empty() {
        return Err(AddrError::invalid(text, "address is required"));
    }

    // A trailing dotted quad becomes the last two hex groups.
    let rewritten;
    let body = if body.contains('.') {
        let (head, quad) = body
            .rsplit_once(':')
            .ok_or_else(|| AddrError::invalid(text, "embedded IPv4 needs a hex prefix"))?;
        let v4 = parse_ipv4(quad)
            .map_err(|_| AddrError::invalid(text, "invalid embedded IPv4 address"))?;
        rewritten = format!("{}:{:x}:{:x}", head, v4 >> 16, v4 & 0xffff);
        rewritten.as_str()
    } else {
        body
    };

    let groups = match body.find("::") {
        Some(pos) => {
            let (head, tail) = (&body[..pos], &body[pos + 2..]);
            if tail.contains("::") {
                return Err(AddrError::invalid(text, "more than one '::'"));
            }
            let head = parse_groups(head, text)?;
            let tail = parse_groups(tail, text)?;
            if head.len() + tail.len() > 7 {
                return Err(AddrError::invalid(text, "too many groups"));
            }
            let mut groups = head;
            groups.resize(8 - tail.len(), 0);
            groups.extend(tail);
            groups
        }
        None => {
            let groups = parse_groups(body, text)?;
            if groups.len() != 8 {
                return Err(AddrError::invalid(
                    text,
                    format!("expected 8 groups, found {}", groups.len()),
                ));
            }
            groups
        }
    };

    let value = groups
        .iter()
        .fold(0u128, |acc, g| (acc << 16) | u128::from(*g));
    Ok((value, zone))
}

fn parse_groups(part: &str, text: &str) -> AddrResult<Vec<u16>> {
    if part.is_empty() {
        return Ok(Vec::new());
    }
    part.split(':')
        .map(|g| {
            if g.is_empty() || g.len() > 4 || !g.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(AddrError::invalid(text, format!("invalid group '{g}'")));
            }
            u16::from_str_radix(g, 16).map_err(|e| AddrError::invalid(text, e.to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_ipv4_valid() {
        for ip in [
            "0.0.0.0",
            "127.0.0.1",
            "192.168.1.1",
            "255.255.255.255",
            "10.0.0.1",
            "172.16.0.1",
        ] {
            let a = Address::parse(ip, None).unwrap();
            assert_eq!(a.family(), Family::V4);
            let joined = a
                .to_octets()
                .iter()
                .map(|o| o.to_string())
                .collect::<Vec<String>>()
                .join(".");
            assert_eq!(joined, ip, "octets should round trip");
        }
    }

    #[test]
    fn test_parse_ipv4_invalid() {
        for ip in [
            "256.1.1.1",
            "1.256.1.1",
            "1.1.256.1",
            "1.1.1.256",
            "1.1.1",
            "1.1.1.1.1",
            "abc.1.1.1",
            "1.abc.1.1",
            "192.168.1.",
            ".192.168.1.1",
            " 192.168.1.1 ",
            "1.1.1.1000",
            "",
        ] {
            assert!(
                matches!(
                    Address::parse(ip, None),
                    Err(AddrError::InvalidFormat { .. })
                ),
                "{ip} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_ipv4_leading_zero() {
        let err = Address::parse("192.168.01.1", None).unwrap_err();
        assert_eq!(
            err,
            AddrError::invalid("192.168.01.1", "octet 3 has leading zeros")
        );
        assert!(Address::parse("0.0.0.0", None).is_ok());
    }

    #[test]
    fn test_parse_ipv6_valid() {
        let cases = [
            ("::1", 1u128),
            ("::", 0),
            ("2001:db8::1", 0x2001_0db8_0000_0000_0000_0000_0000_0001),
            (
                "2001:0db8:0000:0000:0000:0000:0000:0001",
                0x2001_0db8_0000_0000_0000_0000_0000_0001,
            ),
            ("fe80::1", 0xfe80_0000_0000_0000_0000_0000_0000_0001),
            ("::ffff:192.0.2.1", 0xffff_c000_0201),
            ("::ffff:c000:0201", 0xffff_c000_0201),
            ("[2001:db8::1]", 0x2001_0db8_0000_0000_0000_0000_0000_0001),
            ("2001:DB8::1", 0x2001_0db8_0000_0000_0000_0000_0000_0001),
            ("1::", 0x0001_0000_0000_0000_0000_0000_0000_0000),
            ("1:2:3:4:5:6:7::", 0x0001_0002_0003_0004_0005_0006_0007_0000),
        ];
        for (text, value) in cases {
            let a = Address::parse(text, None).unwrap();
            assert_eq!(a.family(), Family::V6, "{text}");
            assert_eq!(a.value(), value, "{text}");
        }
    }

    #[test]
    fn test_parse_ipv6_invalid() {
        for ip in [
            "gggg::1",
            "2001:db8:::1",
            "2001:db8::1::1",
            "2001:db8:1:2:3:4:5:6:7",
            "2001:db8::12345",
            "1:2:3:4:5:6:7:8::",
            ":1::",
            "[::1",
            "::1]",
            "::1%",
            " ::1 ",
            "1:2:3:4:5:6:7",
        ] {
            assert!(Address::parse(ip, None).is_err(), "{ip} should be rejected");
        }
    }

    #[test]
    fn test_parse_zone() {
        let scoped = Address::parse_scoped("fe80::1%eth0").unwrap();
        assert_eq!(scoped.zone.as_deref(), Some("eth0"));
        assert_eq!(scoped.address, Address::parse("fe80::1", None).unwrap());
        assert_eq!(scoped.to_string(), "fe80::1%eth0");

        let bracketed = Address::parse_scoped("[fe80::1%2]").unwrap();
        assert_eq!(bracketed.zone.as_deref(), Some("2"));
    }

    #[test]
    fn test_parse_family_hint() {
        assert_eq!(
            Address::parse("::1", Some(Family::V4)).unwrap_err(),
            AddrError::mismatch(Family::V4, Family::V6)
        );
        assert!(Address::parse("10.0.0.1", Some(Family::V4)).is_ok());
    }

    #[test]
    fn test_binary_and_decimal() {
        let a = Address::parse("192.168.1.1", None).unwrap();
        assert_eq!(
            a.to_binary_string(),
            "11000000.10101000.00000001.00000001"
        );
        assert_eq!(a.to_decimal_string(), "3232235777");
        assert_eq!(a.to_hex_groups(), vec![0xc0a8, 0x0101]);

        let max = Address::max(Family::V6);
        assert_eq!(
            max.to_decimal_string(),
            "340282366920938463463374607431768211455"
        );
        let one = Address::parse("::1", None).unwrap();
        assert!(one.to_binary_string().ends_with(":0000000000000001"));
        assert_eq!(one.to_binary_string().split(':').count(), 8);
    }

    #[test]
    fn test_add_overflow() {
        let a = Address::parse("255.255.255.254", None).unwrap();
        assert_eq!(a.add(1).unwrap().to_string(), "255.255.255.255");
        assert!(matches!(a.add(2), Err(AddrError::Overflow(_))));
        assert!(matches!(
            Address::zero(Family::V4).add(-1),
            Err(AddrError::Overflow(_))
        ));
        assert!(Address::max(Family::V6).add(1).is_err());
        assert_eq!(
            Address::parse("10.0.1.0", None).unwrap().add(-1).unwrap().to_string(),
            "10.0.0.255"
        );
    }

    #[test]
    fn test_new_rejects_wide_value() {
        assert!(Address::new(Family::V4, 1u128 << 32).is_err());
        assert!(Address::new(Family::V4, u32::MAX as u128).is_ok());
    }

    #[test]
    fn test_compare() {
        let a = Address::parse("10.0.0.1", None).unwrap();
        let b = Address::parse("10.0.0.2", None).unwrap();
        assert_eq!(a.compare(&b).unwrap(), Ordering::Less);
        assert_eq!(b.compare(&a).unwrap(), Ordering::Greater);
        assert_eq!(a.compare(&a).unwrap(), Ordering::Equal);
        let v6 = Address::parse("::1", None).unwrap();
        assert!(matches!(
            a.compare(&v6),
            Err(AddrError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_serde_string() {
        let a = Address::parse("2001:db8::1", None).unwrap();
        let json = serde_json::to_string(&a).unwrap();
        assert_eq!(json, "\"2001:db8::1\"");
        let back: Address = serde_json::from_str(&json).unwrap();
        assert_eq!(back, a);
    }
}
