//! Client IP detection, private/public classification and geolocation
//! via the internal geo service.

use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::sync::LazyLock;

use http::HeaderMap;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const MAX_USER_AGENT_CHARS: usize = 512;

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

#[derive(Debug, Error)]
pub enum IpLookupError {
    #[error("Geolocation service URL is not configured")]
    MissingConfig,

    #[error("Geolocation request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl IpLookupError {
    pub fn is_upstream(&self) -> bool {
        !matches!(self, IpLookupError::MissingConfig)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GeoInfo {
    pub country: Option<String>,
    pub region: Option<String>,
    pub city: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub timezone: Option<String>,
    /// Accuracy radius in kilometers
    pub accuracy: Option<f64>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AsnInfo {
    pub number: Option<u32>,
    pub organization: Option<String>,
}

/// Response of the geo service's `/lookup` endpoint
#[derive(Debug, Deserialize)]
struct GeoLookupResponse {
    #[serde(flatten)]
    geo: GeoInfo,
    asn: Option<AsnInfo>,
}

#[derive(Clone, Debug)]
pub struct GeoClient {
    client: Client,
    base_url: Option<String>,
}

impl GeoClient {
    pub fn new(client: Client, base_url: Option<&str>) -> Self {
        Self {
            client,
            base_url: base_url.map(|u| u.trim_end_matches('/').to_string()),
        }
    }

    pub async fn lookup(&self, ip: IpAddr) -> Result<(GeoInfo, Option<AsnInfo>), IpLookupError> {
        let base_url = self
            .base_url
            .as_deref()
            .ok_or(IpLookupError::MissingConfig)?;
        tracing::debug!("Looking up geolocation for {}", ip);
        let resp: GeoLookupResponse = self
            .client
            .get(format!("{}/lookup", base_url))
            .query(&[("ip", ip.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok((resp.geo, resp.asn))
    }
}

/// First hop of `x-forwarded-for`, then `x-real-ip`, then the socket
/// peer.
pub fn client_ip(headers: &HeaderMap, peer: Option<SocketAddr>) -> Option<IpAddr> {
    let forwarded = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .and_then(parse_ip);
    let real_ip = || {
        headers
            .get("x-real-ip")
            .and_then(|v| v.to_str().ok())
            .and_then(parse_ip)
    };
    forwarded.or_else(real_ip).or(peer.map(|p| p.ip()))
}

fn parse_ip(raw: &str) -> Option<IpAddr> {
    let raw = raw.trim();
    raw.parse::<IpAddr>()
        .ok()
        .or_else(|| raw.parse::<SocketAddr>().ok().map(|s| s.ip()))
}

/// Addresses that never leave a private network and so have nothing
/// to look up.
pub fn is_private(ip: &IpAddr) -> bool {
    match ip {
        IpAddr::V4(v4) => is_private_v4(v4),
        IpAddr::V6(v6) => match v6.to_ipv4_mapped() {
            Some(v4) => is_private_v4(&v4),
            None => is_private_v6(v6),
        },
    }
}

fn is_private_v4(ip: &Ipv4Addr) -> bool {
    let [a, b, ..] = ip.octets();
    ip.is_private()
        || ip.is_loopback()
        || ip.is_link_local()
        || ip.is_unspecified()
        || ip.is_broadcast()
        // Carrier-grade NAT, 100.64.0.0/10
        || (a == 100 && (b & 0xc0) == 64)
}

fn is_private_v6(ip: &Ipv6Addr) -> bool {
    let first = ip.segments()[0];
    ip.is_loopback()
        || ip.is_unspecified()
        // Unique local, fc00::/7
        || (first & 0xfe00) == 0xfc00
        // Link local, fe80::/10
        || (first & 0xffc0) == 0xfe80
}

pub fn normalize_user_agent(raw: Option<&str>) -> Option<String> {
    let collapsed = WHITESPACE_RE.replace_all(raw?.trim(), " ");
    if collapsed.is_empty() {
        return None;
    }
    Some(collapsed.chars().take(MAX_USER_AGENT_CHARS).collect())
}
