//! CLI command implementations.

pub mod ban;
pub mod unban;

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;

use crate::cmd_abstraction::RealCommandExecutor;
use crate::config::Config;
use crate::enforcer::{acquire_privileges, IpsetStore, RuleManager, SystemCommands};

/// The ipset store and rule manager a command works against
pub struct Firewall {
    pub ipset: IpsetStore,
    pub rules: RuleManager,
    pub chain: String,
    pub show_progress: bool,
}

impl Firewall {
    pub fn new(system: SystemCommands, config: &Config, show_progress: bool) -> Self {
        Self {
            ipset: IpsetStore::new(system.clone(), config.binaries.ipset.clone()),
            rules: RuleManager::new(system, config.binaries.clone()),
            chain: config.chain.clone(),
            show_progress,
        }
    }
}

/// Load the config and acquire privileges, in that order
fn prepare(config_path: &Path, show_progress: bool) -> Result<(Config, Firewall)> {
    let config = Config::load_or_default(config_path)?;
    let system = acquire_privileges(Arc::new(RealCommandExecutor::new()), &config.elevation)?;
    let firewall = Firewall::new(system, &config, show_progress);
    Ok((config, firewall))
}
