//! Unban command implementation.

use anyhow::Result;
use std::path::Path;
use tracing::info;

use super::Firewall;
use crate::country::{CountryCode, IpVersion};
use crate::enforcer::DropRule;

/// What an unban run did
#[derive(Debug, Default)]
pub struct UnbanSummary {
    pub countries: usize,
    pub rules_removed: usize,
    pub sets_destroyed: usize,
}

/// Run the unban command
pub async fn run(countries: &[CountryCode], config_path: &Path) -> Result<()> {
    let (_, firewall) = super::prepare(config_path, false)?;

    let summary = unban_countries(countries, &firewall)?;

    println!();
    println!(
        "[OK] {} unbanned ({} rules removed, {} sets destroyed)",
        summary.countries, summary.rules_removed, summary.sets_destroyed
    );
    Ok(())
}

/// Delete both drop rules, then destroy both sets, for each country.
///
/// Nothing is checked beforehand: a rule or set that does not exist makes
/// the underlying tool complain and the run moves on.
pub fn unban_countries(countries: &[CountryCode], firewall: &Firewall) -> Result<UnbanSummary> {
    let mut summary = UnbanSummary::default();

    for country in countries {
        info!("removing iptables rules for {} ...", country);
        for version in IpVersion::ALL {
            let rule = DropRule::new(&firewall.chain, country.set_name(version), version);
            if firewall.rules.delete(&rule)? {
                summary.rules_removed += 1;
            }
        }

        info!("removing {} zones from ipset ...", country);
        for version in IpVersion::ALL {
            if firewall.ipset.destroy(&country.set_name(version))? {
                summary.sets_destroyed += 1;
            }
        }

        summary.countries += 1;
    }

    Ok(summary)
}
