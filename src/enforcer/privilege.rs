//! Root detection and elevation priming.

use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::SystemCommands;
use crate::cmd_abstraction::CommandExecutor;
use crate::config::Elevation;
use crate::error::GeoblockError;

/// Effective UID is 0
pub fn is_root() -> bool {
    // SAFETY: geteuid() has no preconditions, never fails and reads no
    // memory owned by Rust.
    unsafe { libc::geteuid() == 0 }
}

/// Make sure the tools below can run with root rights, once, upfront.
///
/// Root runs commands directly. Otherwise the elevation command is primed
/// with `true` (prompting for a password if needed) and used as a prefix
/// for every later command.
pub fn acquire_privileges(
    executor: Arc<dyn CommandExecutor>,
    elevation: &Elevation,
) -> Result<SystemCommands> {
    acquire_privileges_as(executor, elevation, is_root())
}

fn acquire_privileges_as(
    executor: Arc<dyn CommandExecutor>,
    elevation: &Elevation,
    root: bool,
) -> Result<SystemCommands> {
    if root {
        debug!("Running as root, no elevation needed");
        return Ok(SystemCommands::new(executor));
    }

    if elevation.command.is_empty() {
        warn!("Not running as root and elevation is disabled; ipset and iptables may fail");
        return Ok(SystemCommands::new(executor));
    }

    info!(
        "getting {} rights (needed for ipset and iptables) ...",
        elevation.command
    );
    let output = executor
        .execute(&elevation.command, &["true".to_string()])
        .map_err(|e| GeoblockError::Permission(e.to_string()))?;

    if !output.success {
        return Err(GeoblockError::Permission(format!(
            "{} true failed: {}",
            elevation.command,
            output.stderr.trim()
        ))
        .into());
    }

    Ok(SystemCommands::new(executor).with_elevation(elevation.command.clone()))
}
