//! HTTP fetcher for per-country zone files.

use anyhow::{Context, Result};
use async_trait::async_trait;
use ipnet::IpNet;
use reqwest::{Client, StatusCode};
use std::net::IpAddr;
use tracing::debug;

use crate::config::{Sources, COUNTRY_PLACEHOLDER};
use crate::country::{CountryCode, IpVersion};
use crate::error::GeoblockError;

/// Raw response for one zone file
#[derive(Debug, Clone)]
pub struct ZoneResponse {
    pub status: u16,
    pub body: String,
}

impl ZoneResponse {
    pub fn is_ok(&self) -> bool {
        self.status == StatusCode::OK.as_u16()
    }
}

/// Source of zone files, one per country and IP version
#[async_trait]
pub trait ZoneSource: Send + Sync {
    /// Download the zone. Any HTTP status is `Ok`; only transport
    /// failures are errors.
    async fn fetch_zone(&self, country: &CountryCode, version: IpVersion)
        -> Result<ZoneResponse>;
}

/// HTTP client for downloading zone files
pub struct Fetcher {
    client: Client,
    sources: Sources,
}

impl Fetcher {
    /// Create a new fetcher with library default timeouts
    pub fn new(sources: Sources) -> Result<Self> {
        let client = Client::builder()
            .user_agent(format!("geoblock/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client, sources })
    }

    /// URL of the zone file for `country` and `version`
    pub fn zone_url(&self, country: &CountryCode, version: IpVersion) -> String {
        zone_url(&self.sources, country, version)
    }
}

#[async_trait]
impl ZoneSource for Fetcher {
    async fn fetch_zone(
        &self,
        country: &CountryCode,
        version: IpVersion,
    ) -> Result<ZoneResponse> {
        let url = self.zone_url(country, version);
        debug!("GET {}", url);

        let fetch_error = |reason: String| GeoblockError::Fetch {
            country: country.to_string(),
            version: version.to_string(),
            reason,
        };

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;

        let status = response.status().as_u16();
        if status != StatusCode::OK.as_u16() {
            return Ok(ZoneResponse {
                status,
                body: String::new(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| fetch_error(e.to_string()))?;
        debug!("{} {} zone: {} bytes", country, version, body.len());

        Ok(ZoneResponse { status, body })
    }
}

/// Fill the country placeholder of the template for `version`
pub fn zone_url(sources: &Sources, country: &CountryCode, version: IpVersion) -> String {
    let template = match version {
        IpVersion::V4 => &sources.ipv4,
        IpVersion::V6 => &sources.ipv6,
    };
    template.replace(COUNTRY_PLACEHOLDER, country.as_str())
}

/// Parse one line as a network.
///
/// Accepts a bare address (host network) or `addr/prefix` with no host bits
/// set past the prefix. Anything else is `None`.
pub fn parse_network(line: &str) -> Option<IpNet> {
    let trimmed = line.trim();
    if trimmed.contains('/') {
        let net = trimmed.parse::<IpNet>().ok()?;
        (net.trunc() == net).then_some(net)
    } else {
        trimmed.parse::<IpAddr>().ok().map(IpNet::from)
    }
}
