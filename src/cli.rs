//! Command line interface.
//!
//! Each subcommand maps onto one library operation. Output is plain or
//! CSV text by default and pretty JSON with `--json`.

use crate::config::ToolboxConfig;
use crate::error::AddrError;
use crate::models::{Address, AddressRange, Family, Network, Prefix};
use crate::output::{
    print_heading, print_json, print_networks, print_overlaps, print_pairs, print_vlsm_plan,
};
use crate::processing::{
    address_from_binary, address_from_decimal, address_from_hex, aggregate, allocate,
    calculate_subnet, cidr_to_mask, classify, compress, convert_formats, expand, find_gaps,
    find_overlaps, from_6to4, from_ipv4_mapped, ipv4_class, log_overlaps, mask_for,
    mask_to_cidr, nat64_extract, nat64_synthesize, parse_ula, teredo_decode, to_6to4,
    to_ipv4_mapped, AddressFormats, ClassInfo, Ipv6Class, MappedForms, RangeSet, TeredoInfo,
    UlaParts, VlsmOptions, VlsmRequest,
};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use serde_json::json;
use std::error::Error;
use std::fs;
use std::path::Path;

/// IPv4/IPv6 subnet calculator and address planner
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Print results as JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Network, broadcast, mask and host range of `address/prefix` or `address mask`.
    Calc {
        target: String,
        mask: Option<String>,
    },
    /// Convert between a prefix length (`24`, `/24`) and a dotted mask.
    Mask {
        value: String,
        /// Treat a bare prefix length as IPv6.
        #[arg(long)]
        v6: bool,
    },
    /// Fully expand an IPv6 address.
    Expand { address: String },
    /// Compress an IPv6 address to its RFC 5952 form.
    Compress { address: String },
    /// Classify an address and decode any embedded IPv4 address.
    Info {
        address: String,
        /// NAT64 prefix to synthesize or extract with.
        #[arg(long)]
        nat64_prefix: Option<Network>,
    },
    /// Show an address in binary, decimal, hex and octal, or parse one of those.
    Convert {
        value: String,
        /// Input format; an address is expected when omitted.
        #[arg(long, value_enum)]
        from: Option<InputFormat>,
        /// Read a decimal value as IPv6.
        #[arg(long)]
        v6: bool,
    },
    /// Minimal CIDR list covering ranges, CIDRs and single addresses.
    Summarize {
        #[arg(required = true)]
        ranges: Vec<AddressRange>,
    },
    /// Merge adjacent CIDR blocks into supernets.
    Aggregate {
        #[arg(required = true)]
        cidrs: Vec<Network>,
    },
    /// Allocate named host requests (`NAME:HOSTS`) inside a parent block.
    Vlsm {
        parent: Network,
        requests: Vec<VlsmRequest>,
        /// JSON file holding `[{"name": ..., "hosts_needed": ...}]`.
        #[arg(long = "requests", value_name = "FILE")]
        requests_file: Option<String>,
        /// Allocate /31 blocks for one or two host requests.
        #[arg(long, overrides_with = "no_p2p")]
        p2p: bool,
        /// Never allocate /31 blocks.
        #[arg(long)]
        no_p2p: bool,
    },
    /// Unused space inside a parent block.
    Gaps {
        parent: Network,
        used: Vec<Network>,
        /// Shortest prefix length a gap block may have.
        #[arg(long)]
        max_block: Option<u8>,
    },
    /// Report CIDR blocks that overlap each other.
    Overlaps {
        #[arg(required = true)]
        cidrs: Vec<Network>,
    },
    /// Compare two comma separated lists of ranges or CIDRs.
    Diff { a: String, b: String },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum InputFormat {
    Decimal,
    Binary,
    Hex,
}

/// Everything `info` reports about one address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddressReport {
    pub address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zone: Option<String>,
    pub family: Family,
    pub formats: AddressFormats,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ClassInfo>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ipv6_classes: Vec<Ipv6Class>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub embedded_ipv4: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teredo: Option<TeredoInfo>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ula: Option<UlaParts>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mapped: Option<MappedForms>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nat64: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub six_to_four: Option<Network>,
}

/// Build the `info` report for `text` (zone ids allowed).
pub fn address_report(text: &str, nat64_prefix: &Network) -> Result<AddressReport, AddrError> {
    let scoped = Address::parse_scoped(text)?;
    let address = scoped.address;
    let mut report = AddressReport {
        address,
        zone: scoped.zone,
        family: address.family(),
        formats: convert_formats(&address),
        class: None,
        ipv6_classes: Vec::new(),
        embedded_ipv4: None,
        teredo: None,
        ula: None,
        mapped: None,
        nat64: None,
        six_to_four: None,
    };
    match address.family() {
        Family::V4 => {
            report.class = Some(ipv4_class(&address));
            report.mapped = Some(to_ipv4_mapped(&address)?);
            report.nat64 = match nat64_synthesize(&address, nat64_prefix) {
                Ok(nat64) => Some(nat64),
                Err(e) => {
                    log::warn!("no NAT64 address for {address}: {e}");
                    None
                }
            };
            report.six_to_four = Some(to_6to4(&address)?);
        }
        Family::V6 => {
            report.ipv6_classes = classify(&address)?;
            report.embedded_ipv4 = from_ipv4_mapped(&address)
                .or_else(|_| nat64_extract(&address, nat64_prefix))
                .or_else(|_| from_6to4(&address))
                .ok();
            report.teredo = teredo_decode(&address).ok();
            report.ula = parse_ula(&address).ok();
        }
    }
    Ok(report)
}

/// Read VLSM requests from a JSON file.
///
/// Errors name the failing element, e.g. `[2].hosts_needed`.
pub fn load_requests(path: &Path) -> Result<Vec<VlsmRequest>, Box<dyn Error>> {
    let text = fs::read_to_string(path)
        .map_err(|e| format!("cannot read requests file {}: {e}", path.display()))?;
    let deserializer = &mut serde_json::Deserializer::from_str(&text);
    let requests: Vec<VlsmRequest> = serde_path_to_error::deserialize(deserializer)
        .map_err(|e| format!("{}: {} at {}", path.display(), e.inner(), e.path()))?;
    log::debug!("read {} requests from {}", requests.len(), path.display());
    Ok(requests)
}

/// Parse a comma separated list of ranges, CIDRs or addresses.
pub fn parse_range_list(text: &str) -> Result<RangeSet, AddrError> {
    text.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(AddressRange::parse)
        .collect::<Result<Vec<AddressRange>, AddrError>>()
        .map(RangeSet::normalize)
}

/// Execute the parsed command line.
pub fn run(cli: Cli, config: &ToolboxConfig) -> Result<(), Box<dyn Error>> {
    let json = cli.json;
    match cli.command {
        Commands::Calc { target, mask } => calc(&target, mask.as_deref(), json),
        Commands::Mask { value, v6 } => mask(&value, v6, json),
        Commands::Expand { address } => {
            let expanded = expand(&address)?;
            log::info!("expand {address} -> {expanded}");
            print_text_or_json(json, "expanded", &address, &expanded)
        }
        Commands::Compress { address } => {
            let compressed = compress(&address)?;
            log::info!("compress {address} -> {compressed}");
            print_text_or_json(json, "compressed", &address, &compressed)
        }
        Commands::Info {
            address,
            nat64_prefix,
        } => {
            let prefix = nat64_prefix.unwrap_or(config.nat64_prefix);
            let report = address_report(&address, &prefix)?;
            log::info!("info {address}");
            if json {
                return print_json(&report);
            }
            print_report(&report);
            Ok(())
        }
        Commands::Convert { value, from, v6 } => convert(&value, from, v6, json),
        Commands::Summarize { ranges } => {
            let set = RangeSet::normalize(ranges);
            let cidrs = set.to_minimal_cidrs();
            log::info!("summarize {} ranges into {} CIDRs", set.len(), cidrs.len());
            if json {
                return print_json(&json!({
                    "ranges": set,
                    "cidrs": cidrs,
                    "addresses": set.address_count().to_string(),
                }));
            }
            print_networks("summary", &cidrs);
            Ok(())
        }
        Commands::Aggregate { cidrs } => {
            let merged = aggregate(&cidrs);
            log::info!("aggregate {} -> {} networks", cidrs.len(), merged.len());
            if json {
                return print_json(&merged);
            }
            print_networks("supernet", &merged);
            Ok(())
        }
        Commands::Vlsm {
            parent,
            mut requests,
            requests_file,
            p2p,
            no_p2p,
        } => {
            if let Some(path) = requests_file {
                requests.extend(load_requests(Path::new(&path))?);
            }
            if requests.is_empty() {
                return Err("vlsm needs at least one NAME:HOSTS request or --requests FILE".into());
            }
            let options = VlsmOptions {
                allow_point_to_point: if p2p {
                    true
                } else if no_p2p {
                    false
                } else {
                    config.vlsm_p2p
                },
            };
            log::info!(
                "vlsm {parent}: {} requests, p2p={}",
                requests.len(),
                options.allow_point_to_point
            );
            let plan = allocate(&parent, &requests, options)?;
            if json {
                return print_json(&plan);
            }
            print_vlsm_plan(&plan);
            Ok(())
        }
        Commands::Gaps {
            parent,
            used,
            max_block,
        } => {
            let max_block = max_block.or(config.gap_max_block);
            let gaps = find_gaps(&parent, &used, max_block)?;
            log::info!("gaps in {parent}: {}", gaps.len());
            if json {
                return print_json(&gaps);
            }
            print_networks("-gap-", &gaps);
            Ok(())
        }
        Commands::Overlaps { cidrs } => {
            let conflicts = find_overlaps(&cidrs);
            log_overlaps(&conflicts);
            if json {
                return print_json(&conflicts);
            }
            print_overlaps(&conflicts);
            Ok(())
        }
        Commands::Diff { a, b } => {
            let a = parse_range_list(&a)?;
            let b = parse_range_list(&b)?;
            let only_a = a.difference(&b).to_minimal_cidrs();
            let only_b = b.difference(&a).to_minimal_cidrs();
            let common = a.intersect(&b).to_minimal_cidrs();
            log::info!(
                "diff: {} only in a, {} only in b, {} common",
                only_a.len(),
                only_b.len(),
                common.len()
            );
            if json {
                return print_json(&json!({
                    "only_a": only_a,
                    "only_b": only_b,
                    "common": common,
                    "a_contains_b": a.contains(&b),
                    "b_contains_a": b.contains(&a),
                }));
            }
            print_networks("only-a", &only_a);
            print_networks("only-b", &only_b);
            print_networks("common", &common);
            Ok(())
        }
    }
}

fn print_text_or_json(
    json: bool,
    key: &str,
    input: &str,
    output: &str,
) -> Result<(), Box<dyn Error>> {
    if json {
        return print_json(&json!({ "input": input, key: output }));
    }
    println!("{output}");
    Ok(())
}

fn calc(target: &str, mask: Option<&str>, json: bool) -> Result<(), Box<dyn Error>> {
    let (address, prefix_len) = match (target.split_once('/'), mask) {
        (Some((addr, len)), None) => {
            let address = Address::parse(addr, None)?;
            (address, Prefix::parse(len, address.family())?.length())
        }
        (None, Some(mask)) => (Address::parse(target, None)?, mask_to_cidr(mask)?),
        (Some(_), Some(_)) => {
            return Err("give either address/prefix or address plus mask, not both".into())
        }
        (None, None) => {
            return Err(AddrError::invalid(target, "CIDR must be in format IP/prefix").into())
        }
    };
    let info = calculate_subnet(address, prefix_len)?;
    log::info!("calc {address}/{prefix_len} -> {}", info.network);
    if json {
        return print_json(&info);
    }

    print_heading(&info.network.to_string());
    let mut pairs = vec![
        ("Address", info.address.to_string()),
        ("Network", info.network.base().to_string()),
        ("Netmask", format!("{} = /{}", info.mask, info.prefix)),
        ("Wildcard", info.wildcard.to_string()),
        ("Broadcast", info.broadcast.to_string()),
        ("First host", info.first_host.to_string()),
        ("Last host", info.last_host.to_string()),
        ("Total", info.total_addresses.to_string()),
        ("Usable", info.usable_hosts.to_string()),
    ];
    if let Some(class) = &info.class {
        pairs.push(("Class", format!("{} ({}, {})", class.class, class.kind, class.description)));
    }
    print_pairs(&pairs);
    Ok(())
}

fn mask(value: &str, v6: bool, json: bool) -> Result<(), Box<dyn Error>> {
    let digits = value.strip_prefix('/').unwrap_or(value);
    if !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()) {
        let family = if v6 { Family::V6 } else { Family::V4 };
        let prefix = Prefix::parse(digits, family)?;
        let mask = match family {
            Family::V4 => cidr_to_mask(prefix.length())?,
            Family::V6 => mask_for(prefix).to_string(),
        };
        log::info!("mask /{} -> {mask}", prefix.length());
        if json {
            return print_json(&json!({ "prefix": prefix.length(), "mask": mask }));
        }
        println!("{mask}");
        return Ok(());
    }

    let prefix = mask_to_cidr(value)?;
    log::info!("mask {value} -> /{prefix}");
    if json {
        return print_json(&json!({ "prefix": prefix, "mask": value }));
    }
    println!("/{prefix}");
    Ok(())
}

fn convert(
    value: &str,
    from: Option<InputFormat>,
    v6: bool,
    json: bool,
) -> Result<(), Box<dyn Error>> {
    let address = match from {
        None => Address::parse(value, None)?,
        Some(InputFormat::Decimal) => {
            address_from_decimal(value, if v6 { Family::V6 } else { Family::V4 })?
        }
        Some(InputFormat::Binary) => address_from_binary(value)?,
        Some(InputFormat::Hex) => address_from_hex(value)?,
    };
    let formats = convert_formats(&address);
    log::info!("convert {value} -> {address}");
    if json {
        return print_json(&json!({ "address": address, "formats": formats }));
    }
    let mut pairs = vec![
        ("Address", address.to_string()),
        ("Binary", formats.binary),
        ("Decimal", formats.decimal),
        ("Hex", formats.hex),
    ];
    if let Some(octal) = formats.octal {
        pairs.push(("Octal", octal));
    }
    print_pairs(&pairs);
    Ok(())
}

fn print_report(report: &AddressReport) {
    let address = match &report.zone {
        Some(zone) => format!("{}%{zone}", report.address),
        None => report.address.to_string(),
    };
    print_heading(&address);
    let mut pairs = vec![
        ("Family", report.family.to_string()),
        ("Binary", report.formats.binary.clone()),
        ("Decimal", report.formats.decimal.clone()),
        ("Hex", report.formats.hex.clone()),
    ];
    if let Some(class) = &report.class {
        pairs.push(("Class", format!("{} ({})", class.class, class.kind)));
    }
    if !report.ipv6_classes.is_empty() {
        let names: Vec<&str> = report.ipv6_classes.iter().map(|c| c.name()).collect();
        pairs.push(("Type", names.join(", ")));
        if let Some(primary) = report.ipv6_classes.first() {
            pairs.push(("Description", primary.description().to_string()));
        }
    }
    if let Some(mapped) = &report.mapped {
        pairs.push(("IPv4-mapped", format!("{} ({})", mapped.compressed, mapped.dotted)));
    }
    if let Some(nat64) = &report.nat64 {
        pairs.push(("NAT64", nat64.to_string()));
    }
    if let Some(net) = &report.six_to_four {
        pairs.push(("6to4", net.to_string()));
    }
    if let Some(v4) = &report.embedded_ipv4 {
        pairs.push(("Embedded IPv4", v4.to_string()));
    }
    if let Some(teredo) = &report.teredo {
        pairs.push((
            "Teredo",
            format!(
                "server {} client {}:{} cone={}",
                teredo.server, teredo.client, teredo.port, teredo.cone
            ),
        ));
    }
    if let Some(ula) = &report.ula {
        pairs.push((
            "ULA",
            format!(
                "prefix {} global id {:#012x} subnet {:#06x}",
                ula.prefix, ula.global_id, ula.subnet_id
            ),
        ));
    }
    print_pairs(&pairs);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::well_known_nat64_prefix;

    #[test]
    fn test_parse_vlsm_command() {
        let cli = Cli::try_parse_from([
            "net-toolbox",
            "--json",
            "vlsm",
            "192.168.1.0/24",
            "Sales:100",
            "IT:25",
            "--p2p",
        ])
        .unwrap();
        assert!(cli.json);
        match cli.command {
            Commands::Vlsm {
                parent,
                requests,
                p2p,
                ..
            } => {
                assert_eq!(parent.to_string(), "192.168.1.0/24");
                assert_eq!(
                    requests,
                    vec![VlsmRequest::new("Sales", 100), VlsmRequest::new("IT", 25)]
                );
                assert!(p2p);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_bad_cidr() {
        assert!(Cli::try_parse_from(["net-toolbox", "aggregate", "10.0.0.0/33"]).is_err());
        assert!(Cli::try_parse_from(["net-toolbox", "summarize"]).is_err());
        assert!(
            Cli::try_parse_from(["net-toolbox", "gaps", "10.0.0.0/8", "--max-block", "x"]).is_err()
        );
    }

    #[test]
    fn test_address_report_v4() {
        let report = address_report("192.0.2.33", &well_known_nat64_prefix()).unwrap();
        assert_eq!(report.class.as_ref().map(|c| c.class), Some("C"));
        assert_eq!(report.nat64.unwrap().to_string(), "64:ff9b::c000:221");
        assert_eq!(report.six_to_four.unwrap().to_string(), "2002:c000:221::/48");
        assert_eq!(report.mapped.unwrap().compressed, "::ffff:c000:221");
        assert!(report.ipv6_classes.is_empty());
    }

    #[test]
    fn test_address_report_v4_bad_nat64_prefix() {
        let prefix = Network::parse("2001:db8::/95").unwrap();
        let report = address_report("192.0.2.33", &prefix).unwrap();
        assert!(report.nat64.is_none());
        assert!(report.mapped.is_some());
        assert_eq!(report.six_to_four.unwrap().to_string(), "2002:c000:221::/48");
    }

    #[test]
    fn test_address_report_v6() {
        let prefix = well_known_nat64_prefix();
        let report = address_report("64:ff9b::c000:221", &prefix).unwrap();
        assert_eq!(report.embedded_ipv4.unwrap().to_string(), "192.0.2.33");
        assert_eq!(report.ipv6_classes.first(), Some(&Ipv6Class::Nat64));

        let report = address_report("fe80::1%eth0", &prefix).unwrap();
        assert_eq!(report.zone.as_deref(), Some("eth0"));
        assert!(report.embedded_ipv4.is_none());

        let report = address_report("fd12:3456:789a:1::1", &prefix).unwrap();
        assert_eq!(report.ula.unwrap().global_id, 0x12_3456_789a);
    }

    #[test]
    fn test_parse_range_list() {
        let set = parse_range_list("10.0.0.0/25, 10.0.0.128-10.0.0.255,").unwrap();
        assert_eq!(set.to_minimal_cidrs(), vec![Network::parse("10.0.0.0/24").unwrap()]);
        assert!(parse_range_list("10.0.0.0/25,bogus").is_err());
    }

    #[test]
    fn test_load_requests() {
        let dir = std::env::temp_dir();
        let good = dir.join("net_toolbox_requests_ok.json");
        fs::write(&good, r#"[{"name": "Sales", "hosts_needed": 100}]"#).unwrap();
        assert_eq!(load_requests(&good).unwrap(), vec![VlsmRequest::new("Sales", 100)]);

        let bad = dir.join("net_toolbox_requests_bad.json");
        fs::write(
            &bad,
            r#"[{"name": "a", "hosts_needed": 1}, {"name": "b", "hosts_needed": "ten"}]"#,
        )
        .unwrap();
        let err = load_requests(&bad).unwrap_err().to_string();
        assert!(err.contains("[1].hosts_needed"), "{err}");

        assert!(load_requests(&dir.join("net_toolbox_missing.json")).is_err());
    }

    #[test]
    fn test_run_commands() {
        let config = ToolboxConfig::default();
        for args in [
            vec!["net-toolbox", "calc", "192.168.1.100/24"],
            vec!["net-toolbox", "calc", "192.168.1.100", "255.255.255.0"],
            vec!["net-toolbox", "--json", "mask", "24"],
            vec!["net-toolbox", "mask", "255.255.255.252"],
            vec!["net-toolbox", "compress", "2001:0db8:0000:0000:0000:0000:0000:0001"],
            vec!["net-toolbox", "convert", "c0a80101", "--from", "hex"],
            vec!["net-toolbox", "gaps", "10.0.0.0/24", "10.0.0.0/26"],
            vec!["net-toolbox", "diff", "10.0.0.0/24", "10.0.0.64/26"],
        ] {
            let cli = Cli::try_parse_from(args.clone()).unwrap();
            assert!(run(cli, &config).is_ok(), "{args:?}");
        }

        let cli = Cli::try_parse_from(["net-toolbox", "mask", "255.255.255.253"]).unwrap();
        assert!(run(cli, &config).is_err());
        let cli = Cli::try_parse_from(["net-toolbox", "vlsm", "10.0.0.0/24"]).unwrap();
        assert!(run(cli, &config).is_err());
    }
}
