//! ipset store: named hash:net sets, one per country and IP version.

use anyhow::Result;
use ipnet::IpNet;
use std::collections::HashSet;
use tracing::{debug, info};

use super::SystemCommands;
use crate::country::IpVersion;
use crate::fetcher::parse_network;

/// Thin wrapper over the `ipset` tool
pub struct IpsetStore {
    system: SystemCommands,
    program: String,
}

impl IpsetStore {
    pub fn new(system: SystemCommands, program: impl Into<String>) -> Self {
        Self {
            system,
            program: program.into(),
        }
    }

    /// Current members of `name`, or `None` if the set does not exist
    pub fn list(&self, name: &str) -> Result<Option<HashSet<IpNet>>> {
        let output = self.system.query(&self.program, &["list", name])?;
        if !output.success {
            return Ok(None);
        }
        Ok(Some(parse_members(&output.stdout)))
    }

    /// Create a hash:net set for `version`
    pub fn create(&self, name: &str, version: IpVersion) -> Result<bool> {
        let output = self.system.run(
            &self.program,
            &["create", name, "hash:net", "family", version.family()],
        )?;
        Ok(output.success)
    }

    /// Members of `name`, creating the set first if it is missing.
    ///
    /// The family comes from the `_v4`/`_v6` marker in the name; a name
    /// without one is left uncreated.
    pub fn get_or_create(&self, name: &str) -> Result<HashSet<IpNet>> {
        if let Some(existing) = self.list(name)? {
            debug!("{} exists with {} members", name, existing.len());
            return Ok(existing);
        }

        info!("{} does not exist, creating ...", name);
        if let Some(version) = IpVersion::from_set_name(name) {
            self.create(name, version)?;
        }
        Ok(HashSet::new())
    }

    pub fn add(&self, name: &str, net: &IpNet) -> Result<bool> {
        let output = self
            .system
            .run(&self.program, &["add", name, &net.to_string()])?;
        Ok(output.success)
    }

    pub fn destroy(&self, name: &str) -> Result<bool> {
        let output = self.system.run(&self.program, &["destroy", name])?;
        Ok(output.success)
    }
}

/// Parse the members section of `ipset list` output.
///
/// Entries may carry extra columns (`timeout 300`, `nomatch`); only the
/// first token is used. Lines that are not a network are ignored.
pub fn parse_members(output: &str) -> HashSet<IpNet> {
    output
        .lines()
        .skip_while(|line| !line.starts_with("Members:"))
        .skip(1)
        .filter_map(|line| line.split_whitespace().next())
        .filter_map(parse_network)
        .collect()
}
