//! Ban command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::{error, info};

use super::Firewall;
use crate::country::{CountryCode, IpVersion};
use crate::enforcer::DropRule;
use crate::error::GeoblockError;
use crate::fetcher::{Fetcher, ZoneResponse, ZoneSource};
use crate::synchronizer::Synchronizer;
use crate::utils::format_count;

/// What a ban run did
#[derive(Debug, Default)]
pub struct BanSummary {
    pub banned: Vec<CountryCode>,
    pub skipped: Vec<CountryCode>,
    pub networks_added: usize,
    pub rules_inserted: usize,
}

/// Run the ban command
pub async fn run(countries: &[CountryCode], config_path: &Path, show_progress: bool) -> Result<()> {
    let (config, firewall) = super::prepare(config_path, show_progress)?;
    let fetcher = Fetcher::new(config.sources)?;

    let summary = ban_countries(countries, &fetcher, &firewall).await?;

    println!();
    println!(
        "[OK] {} banned ({} networks added, {} rules inserted), {} skipped",
        summary.banned.len(),
        format_count(summary.networks_added),
        summary.rules_inserted,
        summary.skipped.len()
    );
    Ok(())
}

/// Ban each country in turn.
///
/// A country whose v4 or v6 zone cannot be downloaded is skipped entirely;
/// the next one is still processed.
pub async fn ban_countries(
    countries: &[CountryCode],
    zones: &dyn ZoneSource,
    firewall: &Firewall,
) -> Result<BanSummary> {
    let mut summary = BanSummary::default();

    for country in countries {
        info!("downloading {} zones ...", country);
        let v4 = zones.fetch_zone(country, IpVersion::V4).await;
        let v6 = zones.fetch_zone(country, IpVersion::V6).await;

        let Some(v4) = usable_zone(country, IpVersion::V4, v4) else {
            summary.skipped.push(country.clone());
            continue;
        };
        let Some(v6) = usable_zone(country, IpVersion::V6, v6) else {
            summary.skipped.push(country.clone());
            continue;
        };

        let sync = Synchronizer::new(&firewall.ipset, firewall.show_progress);
        for (version, payload) in [(IpVersion::V4, &v4), (IpVersion::V6, &v6)] {
            let report = sync.sync(&country.set_name(version), payload)?;
            summary.networks_added += report.added;
        }

        for version in IpVersion::ALL {
            let rule = DropRule::new(&firewall.chain, country.set_name(version), version);
            if firewall.rules.ensure(&rule)? {
                summary.rules_inserted += 1;
            }
        }

        summary.banned.push(country.clone());
    }

    Ok(summary)
}

/// Body of a successful download, or `None` after logging why it is unusable
fn usable_zone(
    country: &CountryCode,
    version: IpVersion,
    response: Result<ZoneResponse>,
) -> Option<String> {
    match response {
        Ok(response) if response.is_ok() => Some(response.body),
        Ok(response) => {
            let err = GeoblockError::HttpStatus {
                country: country.to_string(),
                version: version.to_string(),
                status: response.status,
            };
            error!("{}", err);
            None
        }
        Err(e) => {
            error!("{:#}", e);
            None
        }
    }
}
