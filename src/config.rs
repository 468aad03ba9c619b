//! Runtime configuration read from the environment.
//!
//! `main` loads `.env` through `dotenv` first, so every value below may
//! also come from that file. Command line flags override these values.

use crate::models::Network;
use crate::processing::{NAT64_PREFIX_LENGTHS, WELL_KNOWN_NAT64_PREFIX};
use log::LevelFilter;
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Root};
use log4rs::encode::pattern::PatternEncoder;
use std::env;
use std::path::Path;
use thiserror::Error;

pub const ENV_LOG_CONFIG: &str = "NET_TOOLBOX_LOG_CONFIG";
pub const ENV_VLSM_P2P: &str = "NET_TOOLBOX_VLSM_P2P";
pub const ENV_NAT64_PREFIX: &str = "NET_TOOLBOX_NAT64_PREFIX";
pub const ENV_GAP_MAX_BLOCK: &str = "NET_TOOLBOX_GAP_MAX_BLOCK";

pub const DEFAULT_LOG_CONFIG: &str = "log4rs.yml";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("invalid value '{value}' for {var}: {reason}")]
pub struct ConfigError {
    pub var: &'static str,
    pub value: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolboxConfig {
    /// log4rs YAML file.
    pub log_config: String,
    /// Allow `/31` (`/127`) blocks for one or two host VLSM requests.
    pub vlsm_p2p: bool,
    /// Prefix used to synthesize and extract NAT64 addresses.
    pub nat64_prefix: Network,
    /// Largest gap block reported by the gap finder.
    pub gap_max_block: Option<u8>,
}

impl Default for ToolboxConfig {
    fn default() -> Self {
        ToolboxConfig {
            log_config: DEFAULT_LOG_CONFIG.to_string(),
            vlsm_p2p: false,
            nat64_prefix: crate::processing::well_known_nat64_prefix(),
            gap_max_block: None,
        }
    }
}

impl ToolboxConfig {
    /// Read every setting from the process environment.
    pub fn from_env() -> Result<ToolboxConfig, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Read every setting through `lookup`; unset keys keep their default.
    pub fn from_lookup<F>(lookup: F) -> Result<ToolboxConfig, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ToolboxConfig::default();

        if let Some(path) = lookup(ENV_LOG_CONFIG).filter(|p| !p.trim().is_empty()) {
            config.log_config = path;
        }
        if let Some(value) = lookup(ENV_VLSM_P2P) {
            config.vlsm_p2p = parse_flag(ENV_VLSM_P2P, &value)?;
        }
        if let Some(value) = lookup(ENV_NAT64_PREFIX) {
            config.nat64_prefix = parse_nat64_prefix(&value)?;
        }
        if let Some(value) = lookup(ENV_GAP_MAX_BLOCK) {
            let trimmed = value.trim().trim_start_matches('/');
            let len = trimmed
                .parse::<u8>()
                .ok()
                .filter(|len| *len <= 128)
                .ok_or_else(|| {
                    invalid(ENV_GAP_MAX_BLOCK, &value, "expected a prefix length 0-128")
                })?;
            config.gap_max_block = Some(len);
        }

        log::debug!("config: {config:?}");
        Ok(config)
    }
}

/// Start log4rs from `path`, or log warnings to stderr when the file is missing.
pub fn init_logging(path: &str) -> Result<(), Box<dyn std::error::Error>> {
    if Path::new(path).exists() {
        log4rs::init_file(path, Default::default())?;
        return Ok(());
    }
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new("{h({l})} {m}{n}")))
        .build();
    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Warn))?;
    log4rs::init_config(config)?;
    log::debug!("{path} not found, logging warnings to stderr");
    Ok(())
}

fn invalid(var: &'static str, value: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.into(),
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}

fn parse_nat64_prefix(value: &str) -> Result<Network, ConfigError> {
    let prefix = Network::parse(value.trim())
        .map_err(|e| invalid(ENV_NAT64_PREFIX, value, e.to_string()))?;
    if prefix.base().is_v4() {
        return Err(invalid(ENV_NAT64_PREFIX, value, "NAT64 prefix must be IPv6"));
    }
    if !NAT64_PREFIX_LENGTHS.contains(&prefix.prefix_len()) {
        return Err(invalid(
            ENV_NAT64_PREFIX,
            value,
            format!(
                "expected a /32, /40, /48, /56, /64 or /96 prefix like {WELL_KNOWN_NAT64_PREFIX}"
            ),
        ));
    }
    Ok(prefix)
}
