//! Resolution of command-line input into an immutable run configuration.

use std::fmt;
use std::net::IpAddr;

use cidr::IpInet;
use http::Uri;

use crate::cli::Cli;
use crate::error::ConfigError;
use crate::types::AddressFamily;

/// Token that explicitly closes an address family.
pub const NONE_TOKEN: &str = "none";

/// Desired allow-list for one address family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidrSetting {
    /// Not given: existing CIDRs are left alone.
    Unset,
    /// `none`: no source of this family may connect.
    Clear,
    /// Only this canonical CIDR may connect.
    Allow(String),
}

impl CidrSetting {
    /// Parse a flag value for `family`. An empty value counts as not given.
    pub fn parse(value: Option<&str>, family: AddressFamily) -> Result<Self, ConfigError> {
        match value {
            None | Some("") => Ok(CidrSetting::Unset),
            Some(NONE_TOKEN) => Ok(CidrSetting::Clear),
            Some(cidr) => normalize_cidr(cidr, family).map(CidrSetting::Allow),
        }
    }

    pub fn is_set(&self) -> bool {
        !matches!(self, CidrSetting::Unset)
    }
}

impl fmt::Display for CidrSetting {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CidrSetting::Unset => write!(f, "(unchanged)"),
            CidrSetting::Clear => write!(f, "{NONE_TOKEN}"),
            CidrSetting::Allow(cidr) => write!(f, "{cidr}"),
        }
    }
}

/// Everything a run needs, resolved once and never mutated.
#[derive(Debug, Clone)]
pub struct DesiredConfig {
    pub region: String,
    pub instance: String,
    pub cidr4: CidrSetting,
    pub cidr6: CidrSetting,
    pub force: bool,
    pub dry_run: bool,
    pub profile: Option<String>,
    /// Endpoint override; `None` lets the SDK resolve the regional endpoint.
    pub endpoint: Option<String>,
    pub json: bool,
}

impl DesiredConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let region = non_empty(cli.region.as_deref()).ok_or(ConfigError::MissingRegion)?;
        if !is_valid_region(region) {
            return Err(ConfigError::InvalidRegion {
                region: region.to_string(),
            });
        }

        let instance = non_empty(cli.instance.as_deref()).ok_or(ConfigError::MissingInstance)?;

        if non_empty(cli.ipv4.as_deref()).is_none() && non_empty(cli.ipv6.as_deref()).is_none() {
            return Err(ConfigError::MissingCidr);
        }
        let cidr4 = CidrSetting::parse(cli.ipv4.as_deref(), AddressFamily::Ipv4)?;
        let cidr6 = CidrSetting::parse(cli.ipv6.as_deref(), AddressFamily::Ipv6)?;

        let endpoint = non_empty(cli.endpoint_url.as_deref())
            .map(check_endpoint)
            .transpose()?;

        Ok(DesiredConfig {
            region: region.to_string(),
            instance: instance.to_string(),
            cidr4,
            cidr6,
            force: cli.force,
            dry_run: cli.dry_run,
            profile: non_empty(cli.profile.as_deref()).map(str::to_string),
            endpoint,
            json: cli.json,
        })
    }

    pub fn cidr(&self, family: AddressFamily) -> &CidrSetting {
        match family {
            AddressFamily::Ipv4 => &self.cidr4,
            AddressFamily::Ipv6 => &self.cidr6,
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Regions end up in a hostname, so only allow what AWS region names use.
fn is_valid_region(region: &str) -> bool {
    region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// An override must be an absolute URL with a host, e.g. `http://127.0.0.1:4566`.
fn check_endpoint(url: &str) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidEndpoint {
        url: url.to_string(),
    };
    let uri: Uri = url.parse().map_err(|_| invalid())?;
    match (uri.scheme_str(), uri.host()) {
        (Some("http" | "https"), Some(host)) if !host.is_empty() => Ok(url.to_string()),
        _ => Err(invalid()),
    }
}

/// Canonicalize a CIDR: host bits are masked off and the address is printed
/// in its shortest form, e.g. `203.0.113.7/24` becomes `203.0.113.0/24`.
pub fn normalize_cidr(input: &str, family: AddressFamily) -> Result<String, ConfigError> {
    let invalid = || ConfigError::InvalidCidr {
        cidr: input.to_string(),
    };

    let (address, length) = input.split_once('/').ok_or_else(invalid)?;
    if length.is_empty() || !length.bytes().all(|b| b.is_ascii_digit()) {
        return Err(invalid());
    }
    let address: IpAddr = address.parse().map_err(|_| invalid())?;
    let length: u8 = length.parse().map_err(|_| invalid())?;

    let matches_family = match family {
        AddressFamily::Ipv4 => address.is_ipv4(),
        AddressFamily::Ipv6 => address.is_ipv6(),
    };
    if !matches_family {
        return Err(ConfigError::WrongFamily {
            cidr: input.to_string(),
            expected: family,
        });
    }

    let network = IpInet::new(address, length).map_err(|_| invalid())?.network();
    Ok(format!(
        "{}/{}",
        network.first_address(),
        network.network_length()
    ))
}
