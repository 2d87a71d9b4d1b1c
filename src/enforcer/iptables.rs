//! iptables/ip6tables drop rules that match a country's ipset.

use anyhow::Result;
use tracing::{debug, info};

use super::SystemCommands;
use crate::config::Binaries;
use crate::country::IpVersion;

/// `<chain> -p all -m set --match-set <set> src -j DROP`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropRule {
    pub chain: String,
    pub set_name: String,
    pub version: IpVersion,
}

impl DropRule {
    pub fn new(chain: impl Into<String>, set_name: impl Into<String>, version: IpVersion) -> Self {
        Self {
            chain: chain.into(),
            set_name: set_name.into(),
            version,
        }
    }

    /// Rule arguments, chain first, as passed after -C/-I/-D
    pub fn rule_args(&self) -> Vec<&str> {
        vec![
            self.chain.as_str(),
            "-p",
            "all",
            "-m",
            "set",
            "--match-set",
            self.set_name.as_str(),
            "src",
            "-j",
            "DROP",
        ]
    }
}

/// Checks, inserts and deletes drop rules
pub struct RuleManager {
    system: SystemCommands,
    binaries: Binaries,
}

impl RuleManager {
    pub fn new(system: SystemCommands, binaries: Binaries) -> Self {
        Self { system, binaries }
    }

    /// iptables or ip6tables, as configured
    pub fn program(&self, version: IpVersion) -> &str {
        match version {
            IpVersion::V4 => &self.binaries.iptables,
            IpVersion::V6 => &self.binaries.ip6tables,
        }
    }

    fn args<'a>(action: &'a str, rule: &'a DropRule) -> Vec<&'a str> {
        let mut args = vec![action];
        args.extend(rule.rule_args());
        args
    }

    fn run(&self, action: &str, rule: &DropRule) -> Result<bool> {
        let output = self
            .system
            .run(self.program(rule.version), &Self::args(action, rule))?;
        Ok(output.success)
    }

    /// Whether the rule is already present (`-C`)
    pub fn exists(&self, rule: &DropRule) -> Result<bool> {
        let output = self
            .system
            .query(self.program(rule.version), &Self::args("-C", rule))?;
        Ok(output.success)
    }

    /// Insert the rule at the head of its chain (`-I`)
    pub fn insert(&self, rule: &DropRule) -> Result<bool> {
        self.run("-I", rule)
    }

    /// Delete the rule (`-D`). A missing rule is reported as `false`.
    pub fn delete(&self, rule: &DropRule) -> Result<bool> {
        self.run("-D", rule)
    }

    /// Insert the rule unless it already exists. Returns true if inserted.
    pub fn ensure(&self, rule: &DropRule) -> Result<bool> {
        if self.exists(rule)? {
            debug!("{} rule for {} already present", self.program(rule.version), rule.set_name);
            return Ok(false);
        }
        info!("adding {} rule for {} ...", self.program(rule.version), rule.set_name);
        self.insert(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd_abstraction::{CommandOutput, MockCommandExecutor};
    use crate::enforcer::mock::{capture_info_logs, FakeSystem};
    use std::sync::Arc;

    fn manager(fake: Arc<FakeSystem>) -> RuleManager {
        RuleManager::new(SystemCommands::new(fake), Binaries::default())
    }

    #[test]
    fn test_rule_args() {
        let rule = DropRule::new("INPUT", "cn_v4", IpVersion::V4);
        assert_eq!(
            rule.rule_args().join(" "),
            "INPUT -p all -m set --match-set cn_v4 src -j DROP"
        );
    }

    #[test]
    fn test_ensure_inserts_once() {
        let fake = Arc::new(FakeSystem::new());
        let rules = manager(fake.clone());
        let rule = DropRule::new("INPUT", "cn_v4", IpVersion::V4);

        assert!(rules.ensure(&rule).unwrap());
        assert!(!rules.ensure(&rule).unwrap());

        assert_eq!(fake.count("iptables", "-I"), 1);
        assert_eq!(fake.rules("iptables").len(), 1);
    }

    #[test]
    fn test_ensure_checks_before_inserting() {
        let fake = Arc::new(FakeSystem::new());
        let rules = manager(fake.clone());
        rules
            .ensure(&DropRule::new("INPUT", "cn_v4", IpVersion::V4))
            .unwrap();

        let actions: Vec<String> = fake.calls().iter().map(|c| c[1].clone()).collect();
        assert_eq!(actions, vec!["-C", "-I"]);
    }

    #[test]
    fn test_missing_rule_check_is_not_a_warning() {
        let fake = Arc::new(FakeSystem::new());
        let rules = manager(fake);
        let logs = capture_info_logs(|| {
            assert!(!rules
                .exists(&DropRule::new("INPUT", "cn_v4", IpVersion::V4))
                .unwrap());
        });
        assert!(!logs.contains("Bad rule"), "logs: {}", logs);
    }

    #[test]
    fn test_v6_rule_uses_ip6tables() {
        let fake = Arc::new(FakeSystem::new());
        let rules = manager(fake.clone());
        rules
            .ensure(&DropRule::new("INPUT", "cn_v6", IpVersion::V6))
            .unwrap();

        assert_eq!(fake.rules("ip6tables").len(), 1);
        assert!(fake.rules("iptables").is_empty());
    }

    #[test]
    fn test_delete_missing_rule() {
        let fake = Arc::new(FakeSystem::new());
        let deleted = manager(fake)
            .delete(&DropRule::new("INPUT", "zz_v4", IpVersion::V4))
            .unwrap();
        assert!(!deleted);
    }

    #[test]
    fn test_custom_binaries() {
        let mut mock = MockCommandExecutor::new();
        mock.expect_execute()
            .withf(|cmd, args| cmd == "iptables-nft" && args[0] == "-C")
            .times(1)
            .returning(|_, _| Ok(CommandOutput::ok("")));

        let binaries = Binaries {
            iptables: "iptables-nft".to_string(),
            ..Binaries::default()
        };
        let rules = RuleManager::new(SystemCommands::new(Arc::new(mock)), binaries);
        let inserted = rules
            .ensure(&DropRule::new("INPUT", "de_v4", IpVersion::V4))
            .unwrap();
        assert!(!inserted);
    }
}
