//! Merges a downloaded zone file into its ipset.

use anyhow::Result;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info};

use crate::enforcer::IpsetStore;
use crate::fetcher::parse_network;
use crate::utils::format_count;

/// Outcome of one set synchronization
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncReport {
    /// Networks newly added to the set
    pub added: usize,
    /// Networks skipped because the set already held them
    pub already_present: usize,
    /// Lines that were not a valid network
    pub invalid: usize,
    /// Adds the store refused
    pub rejected: usize,
}

/// Populates ipsets from zone payloads, one `ipset add` per new network
pub struct Synchronizer<'a> {
    ipset: &'a IpsetStore,
    show_progress: bool,
}

impl<'a> Synchronizer<'a> {
    pub fn new(ipset: &'a IpsetStore, show_progress: bool) -> Self {
        Self {
            ipset,
            show_progress,
        }
    }

    /// Add every valid network of `payload` that `set_name` does not hold
    /// yet, creating the set if needed.
    pub fn sync(&self, set_name: &str, payload: &str) -> Result<SyncReport> {
        let mut existing = self.ipset.get_or_create(set_name)?;
        let lines: Vec<&str> = payload.lines().collect();

        info!("adding {} zone to ipset ...", set_name);
        let progress = self.progress_bar(lines.len() as u64, set_name);

        let mut report = SyncReport::default();
        for line in lines {
            progress.inc(1);

            let Some(net) = parse_network(line) else {
                report.invalid += 1;
                continue;
            };
            if existing.contains(&net) {
                report.already_present += 1;
                continue;
            }

            if self.ipset.add(set_name, &net)? {
                report.added += 1;
                existing.insert(net);
            } else {
                report.rejected += 1;
            }
        }
        progress.finish_and_clear();

        debug!(
            "{}: {} added, {} already present, {} invalid, {} rejected",
            set_name, report.added, report.already_present, report.invalid, report.rejected
        );
        info!(
            "{} now holds {} networks",
            set_name,
            format_count(existing.len())
        );

        Ok(report)
    }

    fn progress_bar(&self, len: u64, set_name: &str) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        let progress = ProgressBar::new(len);
        progress.set_style(
            ProgressStyle::default_bar()
                .template("{msg} [{bar:40}] {pos}/{len} ({eta})")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("=> "),
        );
        progress.set_message(set_name.to_string());
        progress
    }
}
