//! IPv6 text forms and embedded IPv4 addresses.
//!
//! Covers full expansion, RFC 5952 canonical compression, zone ids, the
//! IPv4-mapped / NAT64 / 6to4 / Teredo encodings, address classification
//! and RFC 4193 unique local prefixes.

use crate::error::{AddrError, AddrResult};
use crate::models::{Address, Family, Network};
use serde::Serialize;

/// Well-known NAT64 prefix (RFC 6052).
pub const WELL_KNOWN_NAT64_PREFIX: &str = "64:ff9b::/96";

/// Prefix lengths RFC 6052 allows for NAT64 translation.
pub const NAT64_PREFIX_LENGTHS: [u8; 6] = [32, 40, 48, 56, 64, 96];

const SIX_TO_FOUR_TAG: u128 = 0x2002;
const TEREDO_TAG: u128 = 0x2001_0000;
const MAPPED_TAG: u128 = 0xffff;

fn groups_of(value: u128) -> [u16; 8] {
    let mut groups = [0u16; 8];
    for (i, group) in groups.iter_mut().enumerate() {
        *group = ((value >> ((7 - i) * 16)) & 0xffff) as u16;
    }
    groups
}

fn join_groups(groups: &[u16]) -> String {
    groups
        .iter()
        .map(|g| format!("{g:x}"))
        .collect::<Vec<String>>()
        .join(":")
}

/// RFC 5952 text for a 128-bit value.
///
/// The longest run of two or more zero groups becomes `::`; the leftmost
/// run wins a tie and a lone zero group is never compressed.
pub fn compress_value(value: u128) -> String {
    let groups = groups_of(value);

    let mut best: Option<(usize, usize)> = None;
    let mut run_start = 0;
    let mut run_len = 0;
    for (i, group) in groups.iter().enumerate() {
        if *group == 0 {
            if run_len == 0 {
                run_start = i;
            }
            run_len += 1;
            // strictly longer only, so the leftmost run keeps a tie
            if run_len >= 2 && best.map_or(true, |(_, len)| run_len > len) {
                best = Some((run_start, run_len));
            }
        } else {
            run_len = 0;
        }
    }

    match best {
        Some((start, len)) => format!(
            "{}::{}",
            join_groups(&groups[..start]),
            join_groups(&groups[start + len..])
        ),
        None => join_groups(&groups),
    }
}

/// Eight zero-padded lowercase groups for a 128-bit value.
pub fn expand_value(value: u128) -> String {
    groups_of(value)
        .iter()
        .map(|g| format!("{g:04x}"))
        .collect::<Vec<String>>()
        .join(":")
}

fn require_v6(addr: &Address) -> AddrResult<()> {
    if addr.family() != Family::V6 {
        return Err(AddrError::mismatch(Family::V6, addr.family()));
    }
    Ok(())
}

fn require_v4(addr: &Address) -> AddrResult<()> {
    if addr.family() != Family::V4 {
        return Err(AddrError::mismatch(Family::V4, addr.family()));
    }
    Ok(())
}

fn with_zone(text: String, zone: Option<String>) -> String {
    match zone {
        Some(zone) => format!("{text}%{zone}"),
        None => text,
    }
}

/// Fully expanded form: 8 groups of 4 lowercase hex digits.
///
/// # Examples
/// ```
/// use net_toolbox::processing::expand;
/// assert_eq!(expand("2001:db8::1").unwrap(), "2001:0db8:0000:0000:0000:0000:0000:0001");
/// ```
pub fn expand(text: &str) -> AddrResult<String> {
    let scoped = Address::parse_scoped(text)?;
    require_v6(&scoped.address)?;
    Ok(with_zone(expand_value(scoped.address.value()), scoped.zone))
}

/// RFC 5952 canonical form.
///
/// # Examples
/// ```
/// use net_toolbox::processing::compress;
/// assert_eq!(compress("1:0:0:2:0:0:3:4").unwrap(), "1::2:0:0:3:4");
/// ```
pub fn compress(text: &str) -> AddrResult<String> {
    let scoped = Address::parse_scoped(text)?;
    require_v6(&scoped.address)?;
    Ok(with_zone(compress_value(scoped.address.value()), scoped.zone))
}

/// The three spellings of an IPv4-mapped IPv6 address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MappedForms {
    pub address: Address,
    /// `::ffff:a.b.c.d`
    pub dotted: String,
    /// `::ffff:HHHH:HHHH` (RFC 5952)
    pub compressed: String,
    pub expanded: String,
}

/// Map an IPv4 address into `::ffff:0:0/96`.
pub fn to_ipv4_mapped(ipv4: &Address) -> AddrResult<MappedForms> {
    require_v4(ipv4)?;
    let value = (MAPPED_TAG << 32) | ipv4.value();
    Ok(MappedForms {
        address: Address::v6(value),
        dotted: format!("::ffff:{ipv4}"),
        compressed: compress_value(value),
        expanded: expand_value(value),
    })
}

/// Recover the IPv4 address from `::ffff:a.b.c.d`.
pub fn from_ipv4_mapped(ipv6: &Address) -> AddrResult<Address> {
    require_v6(ipv6)?;
    if ipv6.value() >> 32 != MAPPED_TAG {
        return Err(AddrError::not_mapped(
            ipv6.to_string(),
            "IPv4-mapped (expected ::ffff:a.b.c.d or ::ffff:HHHH:HHHH)",
        ));
    }
    Ok(Address::v4(ipv6.value() as u32))
}

/// Parsed [`WELL_KNOWN_NAT64_PREFIX`].
pub fn well_known_nat64_prefix() -> Network {
    Network::new(Address::v6(0x0064_ff9b << 96), 96)
        .unwrap_or_else(|_| Network::host(Address::v6(0)))
}

/// Byte positions of the embedded IPv4 address for a NAT64 prefix length.
/// Bits 64-71 (byte 8) are the reserved u-octet and never carry address bits.
fn nat64_positions(prefix: &Network) -> AddrResult<Vec<usize>> {
    if prefix.family() != Family::V6 || !NAT64_PREFIX_LENGTHS.contains(&prefix.prefix_len()) {
        return Err(AddrError::invalid(
            prefix.to_string(),
            "NAT64 prefix must be an IPv6 /32, /40, /48, /56, /64 or /96",
        ));
    }
    let start = usize::from(prefix.prefix_len() / 8);
    Ok((start..16).filter(|i| *i != 8).take(4).collect())
}

/// Embed an IPv4 address in a NAT64 prefix (RFC 6052).
pub fn nat64_synthesize(ipv4: &Address, prefix: &Network) -> AddrResult<Address> {
    require_v4(ipv4)?;
    let positions = nat64_positions(prefix)?;
    let mut bytes = [0u8; 16];
    bytes.copy_from_slice(&prefix.base().to_octets());
    for (pos, byte) in positions.iter().zip(ipv4.to_octets()) {
        bytes[*pos] = byte;
    }
    Ok(Address::v6(u128::from_be_bytes(bytes)))
}

/// Extract the IPv4 address from a NAT64 address under `prefix`.
pub fn nat64_extract(ipv6: &Address, prefix: &Network) -> AddrResult<Address> {
    require_v6(ipv6)?;
    let positions = nat64_positions(prefix)?;
    let suggestion = format!("a NAT64 address (expected inside {prefix})");
    if !prefix.contains_address(ipv6) {
        return Err(AddrError::not_mapped(ipv6.to_string(), suggestion));
    }
    let bytes = ipv6.value().to_be_bytes();
    if prefix.prefix_len() < 96 && bytes[8] != 0 {
        return Err(AddrError::not_mapped(ipv6.to_string(), suggestion));
    }
    let value = positions
        .iter()
        .fold(0u32, |acc, pos| (acc << 8) | u32::from(bytes[*pos]));
    Ok(Address::v4(value))
}

/// The `2002:WWXX:YYZZ::/48` 6to4 prefix of an IPv4 address (RFC 3056).
pub fn to_6to4(ipv4: &Address) -> AddrResult<Network> {
    require_v4(ipv4)?;
    Network::new(Address::v6((SIX_TO_FOUR_TAG << 112) | (ipv4.value() << 80)), 48)
}

/// The IPv4 address embedded in a `2002::/16` address.
pub fn from_6to4(ipv6: &Address) -> AddrResult<Address> {
    require_v6(ipv6)?;
    if ipv6.value() >> 112 != SIX_TO_FOUR_TAG {
        return Err(AddrError::not_mapped(
            ipv6.to_string(),
            "a 6to4 address (expected 2002:WWXX:YYZZ::/48)",
        ));
    }
    Ok(Address::v4((ipv6.value() >> 80) as u32))
}

/// Decoded fields of a Teredo address (RFC 4380).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TeredoInfo {
    pub server: Address,
    pub flags: u16,
    /// Cone NAT bit (highest flag bit).
    pub cone: bool,
    /// Client UDP port with the obfuscation removed.
    pub port: u16,
    /// Client public IPv4 with the obfuscation removed.
    pub client: Address,
}

/// Split a `2001:0::/32` address into server, flags, port and client.
pub fn teredo_decode(ipv6: &Address) -> AddrResult<TeredoInfo> {
    require_v6(ipv6)?;
    let value = ipv6.value();
    if value >> 96 != TEREDO_TAG {
        return Err(AddrError::not_mapped(
            ipv6.to_string(),
            "a Teredo address (expected 2001:0::/32)",
        ));
    }
    let flags = (value >> 48) as u16;
    Ok(TeredoInfo {
        server: Address::v4((value >> 64) as u32),
        flags,
        cone: flags & 0x8000 != 0,
        port: !((value >> 32) as u16),
        client: Address::v4(!(value as u32)),
    })
}

/// Build a Teredo address, obfuscating the client port and address.
pub fn teredo_encode(
    server: &Address,
    flags: u16,
    port: u16,
    client: &Address,
) -> AddrResult<Address> {
    require_v4(server)?;
    require_v4(client)?;
    let value = (TEREDO_TAG << 96)
        | (server.value() << 64)
        | (u128::from(flags) << 48)
        | (u128::from(!port) << 32)
        | u128::from(!(client.value() as u32));
    Ok(Address::v6(value))
}

/// Category of an IPv6 address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ipv6Class {
    Unspecified,
    Loopback,
    Ipv4Mapped,
    Nat64,
    LinkLocal,
    UniqueLocal,
    Multicast,
    GlobalUnicast,
    Reserved,
    Documentation,
    SixToFour,
    Teredo,
}

impl Ipv6Class {
    pub fn name(&self) -> &'static str {
        match self {
            Ipv6Class::Unspecified => "Unspecified",
            Ipv6Class::Loopback => "Loopback",
            Ipv6Class::Ipv4Mapped => "IPv4-mapped",
            Ipv6Class::Nat64 => "NAT64",
            Ipv6Class::LinkLocal => "Link-local",
            Ipv6Class::UniqueLocal => "Unique Local",
            Ipv6Class::Multicast => "Multicast",
            Ipv6Class::GlobalUnicast => "Global Unicast",
            Ipv6Class::Reserved => "Reserved",
            Ipv6Class::Documentation => "Documentation",
            Ipv6Class::SixToFour => "6to4",
            Ipv6Class::Teredo => "Teredo",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Ipv6Class::Unspecified => "The unspecified address (::)",
            Ipv6Class::Loopback => "The loopback address (::1)",
            Ipv6Class::Ipv4Mapped => "IPv4-mapped IPv6 address (::ffff:0:0/96)",
            Ipv6Class::Nat64 => "NAT64 well-known prefix (64:ff9b::/96)",
            Ipv6Class::LinkLocal => "Link-local unicast (fe80::/10)",
            Ipv6Class::UniqueLocal => "Unique local unicast (fc00::/7)",
            Ipv6Class::Multicast => "IPv6 multicast (ff00::/8)",
            Ipv6Class::GlobalUnicast => "Global unicast (2000::/3)",
            Ipv6Class::Reserved => "Reserved by IETF",
            Ipv6Class::Documentation => "Documentation prefix (2001:db8::/32)",
            Ipv6Class::SixToFour => "6to4 transition address (2002::/16)",
            Ipv6Class::Teredo => "Teredo tunneling address (2001::/32)",
        }
    }
}

/// Whether the top `len` bits of `value` equal those of `prefix`.
fn has_prefix(value: u128, prefix: u128, len: u32) -> bool {
    let shift = 128 - len;
    value >> shift == prefix >> shift
}

/// Every category matching an IPv6 address, primary category first.
pub fn classify(address: &Address) -> AddrResult<Vec<Ipv6Class>> {
    require_v6(address)?;
    let v = address.value();
    let primary = if v == 0 {
        Ipv6Class::Unspecified
    } else if v == 1 {
        Ipv6Class::Loopback
    } else if v >> 32 == MAPPED_TAG {
        Ipv6Class::Ipv4Mapped
    } else if has_prefix(v, 0x0064_ff9b << 96, 96) {
        Ipv6Class::Nat64
    } else if has_prefix(v, 0xfe80 << 112, 10) {
        Ipv6Class::LinkLocal
    } else if has_prefix(v, 0xfc00 << 112, 7) {
        Ipv6Class::UniqueLocal
    } else if has_prefix(v, 0xff00 << 112, 8) {
        Ipv6Class::Multicast
    } else if has_prefix(v, 0x2000 << 112, 3) {
        Ipv6Class::GlobalUnicast
    } else {
        Ipv6Class::Reserved
    };

    let mut classes = vec![primary];
    if has_prefix(v, 0x2001_0db8 << 96, 32) {
        classes.push(Ipv6Class::Documentation);
    }
    if v >> 112 == SIX_TO_FOUR_TAG {
        classes.push(Ipv6Class::SixToFour);
    }
    if v >> 96 == TEREDO_TAG {
        classes.push(Ipv6Class::Teredo);
    }
    Ok(classes)
}

/// Components of a unique local address (RFC 4193).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UlaParts {
    /// The `/48` routing prefix.
    pub prefix: Network,
    pub global_id: u64,
    pub subnet_id: u16,
    pub interface_id: u64,
    /// L bit: set for locally assigned (`fd00::/8`) prefixes.
    pub locally_assigned: bool,
}

/// The `fdXX:XXXX:XXXX:SSSS::/64` prefix for a 40-bit global id.
pub fn ula_prefix(global_id: u64, subnet_id: u16) -> AddrResult<Network> {
    if global_id > 0xff_ffff_ffff {
        return Err(AddrError::Overflow(format!(
            "global id {global_id:#x} does not fit in 40 bits"
        )));
    }
    let value = (0xfd << 120) | (u128::from(global_id) << 80) | (u128::from(subnet_id) << 64);
    Network::new(Address::v6(value), 64)
}

/// Split an `fc00::/7` address into its RFC 4193 fields.
pub fn parse_ula(address: &Address) -> AddrResult<UlaParts> {
    require_v6(address)?;
    let v = address.value();
    if !has_prefix(v, 0xfc00 << 112, 7) {
        return Err(AddrError::not_mapped(
            address.to_string(),
            "a unique local address (expected fc00::/7)",
        ));
    }
    Ok(UlaParts {
        prefix: Network::new(*address, 48)?,
        global_id: ((v >> 80) & 0xff_ffff_ffff) as u64,
        subnet_id: (v >> 64) as u16,
        interface_id: v as u64,
        locally_assigned: (v >> 120) & 1 == 1,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(s: &str) -> Address {
        Address::parse(s, None).unwrap()
    }

    #[test]
    fn test_expand() {
        let cases = [
            ("::1", "0000:0000:0000:0000:0000:0000:0000:0001"),
            ("::", "0000:0000:0000:0000:0000:0000:0000:0000"),
            ("2001:db8::1", "2001:0db8:0000:0000:0000:0000:0000:0001"),
            ("fe80::1", "fe80:0000:0000:0000:0000:0000:0000:0001"),
            ("2001:db8:1::1", "2001:0db8:0001:0000:0000:0000:0000:0001"),
            ("::ffff:192.0.2.1", "0000:0000:0000:0000:0000:ffff:c000:0201"),
            ("[::1]", "0000:0000:0000:0000:0000:0000:0000:0001"),
            ("FE80::1%eth0", "fe80:0000:0000:0000:0000:0000:0000:0001%eth0"),
        ];
        for (input, expected) in cases {
            assert_eq!(expand(input).unwrap(), expected, "{input}");
        }
        let full = "2001:0db8:0000:0000:0000:0000:0000:0001";
        assert_eq!(expand(full).unwrap(), full);
        assert!(matches!(
            expand("10.0.0.1"),
            Err(AddrError::FamilyMismatch { .. })
        ));
    }

    #[test]
    fn test_compress() {
        let cases = [
            ("0000:0000:0000:0000:0000:0000:0000:0001", "::1"),
            ("0000:0000:0000:0000:0000:0000:0000:0000", "::"),
            ("2001:0db8:0000:0000:0000:0000:0000:0001", "2001:db8::1"),
            ("fe80:0000:0000:0000:0000:0000:0000:0001", "fe80::1"),
            ("2001:0db8:0001:0000:0000:0000:0000:0001", "2001:db8:1::1"),
            ("2001:0db8:0001:0002:0003:0004:0005:0006", "2001:db8:1:2:3:4:5:6"),
            ("2001:0000:0000:0000:0000:0000:0000:0001", "2001::1"),
            ("2001:0db8:0000:0000:0000:0000:0000:0000", "2001:db8::"),
            ("0000:0000:0000:0000:0000:0000:0db8:0001", "::db8:1"),
            ("2001:DB8::A", "2001:db8::a"),
        ];
        for (input, expected) in cases {
            assert_eq!(compress(input).unwrap(), expected, "{input}");
        }
    }

    #[test]
    fn test_compress_tie_and_single_zero() {
        assert_eq!(compress("1:0:0:2:0:0:3:4").unwrap(), "1::2:0:0:3:4");
        assert_eq!(compress("1:0:1:0:1:0:1:1").unwrap(), "1:0:1:0:1:0:1:1");
        assert_eq!(compress("2001:db8:0:1:1:1:1:1").unwrap(), "2001:db8:0:1:1:1:1:1");
        // the longer run wins over an earlier shorter one
        assert_eq!(compress("1:0:0:2:0:0:0:3").unwrap(), "1:0:0:2::3");
        assert_eq!(compress("fe80::1%eth0").unwrap(), "fe80::1%eth0");
    }

    #[test]
    fn test_round_trip() {
        for original in ["::1", "2001:db8::1", "fe80::1", "2001:db8:1::1"] {
            let expanded = expand(original).unwrap();
            assert_eq!(compress(&expanded).unwrap(), original);
            assert_eq!(addr(&expanded), addr(original));
        }
    }

    #[test]
    fn test_ipv4_mapped() {
        let forms = to_ipv4_mapped(&addr("192.0.2.1")).unwrap();
        assert_eq!(forms.dotted, "::ffff:192.0.2.1");
        assert_eq!(forms.compressed, "::ffff:c000:201");
        assert_eq!(forms.expanded, "0000:0000:0000:0000:0000:ffff:c000:0201");
        assert_eq!(from_ipv4_mapped(&forms.address).unwrap(), addr("192.0.2.1"));

        assert_eq!(
            from_ipv4_mapped(&addr("::FFFF:C000:0201")).unwrap(),
            addr("192.0.2.1")
        );
        assert_eq!(
            from_ipv4_mapped(&addr("[::ffff:192.0.2.1]")).unwrap(),
            addr("192.0.2.1")
        );
        for ip in ["2001:db8::1", "fe80::1", "::1", "fc00::1", "1::ffff:1.2.3.4"] {
            let err = from_ipv4_mapped(&addr(ip)).unwrap_err();
            assert!(err.to_string().contains("not IPv4-mapped"), "{ip}");
            match err {
                AddrError::NotMapped { suggestion, .. } => assert!(suggestion.contains("::ffff:")),
                other => panic!("unexpected error {other:?}"),
            }
        }
        assert!(to_ipv4_mapped(&addr("::1")).is_err());
    }

    #[test]
    fn test_nat64_well_known() {
        let prefix = well_known_nat64_prefix();
        assert_eq!(prefix.to_string(), WELL_KNOWN_NAT64_PREFIX);
        let v6 = nat64_synthesize(&addr("192.0.2.33"), &prefix).unwrap();
        assert_eq!(v6.to_string(), "64:ff9b::c000:221");
        assert_eq!(nat64_extract(&v6, &prefix).unwrap(), addr("192.0.2.33"));
        assert!(matches!(
            nat64_extract(&addr("2001:db8::1"), &prefix),
            Err(AddrError::NotMapped { .. })
        ));
    }

    #[test]
    fn test_nat64_custom_prefixes() {
        // RFC 6052 section 2.4 examples for 192.0.2.33
        let cases = [
            ("2001:db8::/32", "2001:db8:c000:221::"),
            ("2001:db8:100::/40", "2001:db8:1c0:2:21::"),
            ("2001:db8:122::/48", "2001:db8:122:c000:2:2100::"),
            ("2001:db8:122:300::/56", "2001:db8:122:3c0:0:221::"),
            ("2001:db8:122:344::/64", "2001:db8:122:344:c0:2:2100:0"),
            ("2001:db8:122:344::/96", "2001:db8:122:344::c000:221"),
        ];
        let v4 = addr("192.0.2.33");
        for (prefix, expected) in cases {
            let prefix = Network::parse(prefix).unwrap();
            let v6 = nat64_synthesize(&v4, &prefix).unwrap();
            assert_eq!(v6.to_string(), expected, "{prefix}");
            assert_eq!(nat64_extract(&v6, &prefix).unwrap(), v4, "{prefix}");
        }
        let bad = Network::parse("2001:db8::/33").unwrap();
        assert!(matches!(
            nat64_synthesize(&v4, &bad),
            Err(AddrError::InvalidFormat { .. })
        ));
    }

    #[test]
    fn test_6to4() {
        let net = to_6to4(&addr("192.0.2.1")).unwrap();
        assert_eq!(net.to_string(), "2002:c000:201::/48");
        assert_eq!(from_6to4(&addr("2002:c000:201::1")).unwrap(), addr("192.0.2.1"));
        assert!(from_6to4(&addr("2001:db8::1")).is_err());
    }

    #[test]
    fn test_teredo() {
        // RFC 4380 appendix example
        let info = teredo_decode(&addr("2001:0:4136:e378:8000:63bf:3fff:fdd2")).unwrap();
        assert_eq!(info.server, addr("65.54.227.120"));
        assert_eq!(info.flags, 0x8000);
        assert!(info.cone);
        assert_eq!(info.port, 40000);
        assert_eq!(info.client, addr("192.0.2.45"));

        let encoded = teredo_encode(&info.server, info.flags, info.port, &info.client).unwrap();
        assert_eq!(encoded, addr("2001:0:4136:e378:8000:63bf:3fff:fdd2"));
        assert!(teredo_decode(&addr("2001:db8::1")).is_err());
    }

    #[test]
    fn test_classify() {
        let primary = |s: &str| classify(&addr(s)).unwrap()[0];
        assert_eq!(primary("::1"), Ipv6Class::Loopback);
        assert_eq!(primary("::"), Ipv6Class::Unspecified);
        assert_eq!(primary("::ffff:192.0.2.1"), Ipv6Class::Ipv4Mapped);
        assert_eq!(primary("fe80::1"), Ipv6Class::LinkLocal);
        assert_eq!(primary("fc00::1"), Ipv6Class::UniqueLocal);
        assert_eq!(primary("fd00::1"), Ipv6Class::UniqueLocal);
        assert_eq!(primary("ff00::1"), Ipv6Class::Multicast);
        assert_eq!(primary("2001:db8::1"), Ipv6Class::GlobalUnicast);
        assert_eq!(primary("64:ff9b::1"), Ipv6Class::Nat64);
        assert_eq!(primary("100::1"), Ipv6Class::Reserved);

        let all = classify(&addr("2001:db8::1")).unwrap();
        assert!(all.contains(&Ipv6Class::Documentation));
        assert!(all[0].description().contains("Global unicast"));
        assert!(classify(&addr("2002:c000:201::1")).unwrap().contains(&Ipv6Class::SixToFour));
        assert!(classify(&addr("2001:0:4136:e378::1")).unwrap().contains(&Ipv6Class::Teredo));
        assert!(Ipv6Class::Loopback.description().contains("loopback"));
        assert!(classify(&addr("10.0.0.1")).is_err());
    }

    #[test]
    fn test_ula() {
        let net = ula_prefix(0x12_3456_789a, 0x0001).unwrap();
        assert_eq!(net.to_string(), "fd12:3456:789a:1::/64");
        assert!(matches!(
            ula_prefix(0x100_0000_0000, 0),
            Err(AddrError::Overflow(_))
        ));

        let parts = parse_ula(&addr("fd12:3456:789a:1::42")).unwrap();
        assert_eq!(parts.prefix.to_string(), "fd12:3456:789a::/48");
        assert_eq!(parts.global_id, 0x12_3456_789a);
        assert_eq!(parts.subnet_id, 1);
        assert_eq!(parts.interface_id, 0x42);
        assert!(parts.locally_assigned);
        assert!(!parse_ula(&addr("fc00::1")).unwrap().locally_assigned);
        assert!(parse_ula(&addr("2001:db8::1")).is_err());
    }
}
