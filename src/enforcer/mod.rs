//! Firewall enforcement through ipset and iptables/ip6tables.
//!
//! All system tools are reached through [`SystemCommands`], which adds the
//! privilege elevation prefix (e.g. `sudo`) when the process is not root.

mod ipset;
mod iptables;
mod privilege;

use anyhow::Result;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, warn};

pub use ipset::{parse_members, IpsetStore};
pub use iptables::{DropRule, RuleManager};
pub use privilege::{acquire_privileges, is_root};

use crate::cmd_abstraction::{args_to_strings, CommandExecutor, CommandOutput};

/// Runs system tools, optionally behind an elevation command.
#[derive(Clone)]
pub struct SystemCommands {
    executor: Arc<dyn CommandExecutor>,
    elevation: Option<String>,
}

impl fmt::Debug for SystemCommands {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SystemCommands")
            .field("elevation", &self.elevation)
            .finish_non_exhaustive()
    }
}

impl SystemCommands {
    /// Run commands directly, without elevation
    pub fn new(executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            executor,
            elevation: None,
        }
    }

    /// Prefix every command with `command` (e.g. `sudo`)
    pub fn with_elevation(mut self, command: impl Into<String>) -> Self {
        self.elevation = Some(command.into());
        self
    }

    /// Run a command that changes system state.
    ///
    /// A non-zero exit is returned as-is in the output and the tool's stderr
    /// is logged as a warning.
    pub fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.execute(program, args)?;
        if !output.success {
            warn!("{}", failure_message(program, &output));
        }
        Ok(output)
    }

    /// Run a read-only command whose failure is an expected answer
    /// (`ipset list` of a missing set, `iptables -C` of a missing rule).
    pub fn query(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let output = self.execute(program, args)?;
        if !output.success {
            debug!("{}", failure_message(program, &output));
        }
        Ok(output)
    }

    fn execute(&self, program: &str, args: &[&str]) -> Result<CommandOutput> {
        let (cmd, full_args) = match &self.elevation {
            Some(prefix) => {
                let mut prefixed = vec![program];
                prefixed.extend_from_slice(args);
                (prefix.as_str(), args_to_strings(&prefixed))
            }
            None => (program, args_to_strings(args)),
        };

        debug!("Running {} {}", cmd, full_args.join(" "));
        self.executor.execute(cmd, &full_args)
    }
}

fn failure_message(program: &str, output: &CommandOutput) -> String {
    let stderr = output.stderr.trim();
    if stderr.is_empty() {
        format!("{} exited with {:?}", program, output.code)
    } else {
        format!("{}: {}", program, stderr)
    }
}
