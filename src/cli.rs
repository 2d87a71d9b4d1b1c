//! CLI argument parsing with clap.

use anyhow::Result;
use clap::{ArgGroup, Parser};
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;
use crate::country::CountryCode;

/// Exit code for argument misuse
pub const USAGE_EXIT_CODE: i32 = 1;

#[derive(Parser, Debug)]
#[command(name = "geoblock")]
#[command(author, version, about = "Ban or unban whole countries with ipset and iptables")]
#[command(group(ArgGroup::new("action").required(true).args(["ban", "unban"])))]
pub struct Cli {
    /// Country codes to ban
    #[arg(short, long, num_args = 1.., value_name = "CC")]
    pub ban: Option<Vec<String>>,

    /// Country codes to unban
    #[arg(short, long, num_args = 1.., value_name = "CC")]
    pub unban: Option<Vec<String>>,

    /// Config file path
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    /// Quiet mode (errors only, no progress bar)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug output)
    #[arg(short, long)]
    pub verbose: bool,
}

/// What to do, with normalized country codes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Ban(Vec<CountryCode>),
    Unban(Vec<CountryCode>),
}

impl Cli {
    /// Resolve the ban/unban flags into a single action.
    ///
    /// clap already rejects both/neither; this guards values built without it.
    pub fn action(&self) -> Result<Action> {
        match (&self.ban, &self.unban) {
            (Some(_), Some(_)) => anyhow::bail!("please specify either --ban or --unban, not both"),
            (Some(codes), None) => Ok(Action::Ban(normalize(codes))),
            (None, Some(codes)) => Ok(Action::Unban(normalize(codes))),
            (None, None) => anyhow::bail!("please specify either --ban or --unban"),
        }
    }
}

fn normalize(codes: &[String]) -> Vec<CountryCode> {
    codes.iter().map(|c| CountryCode::new(c)).collect()
}

/// Exit code for a parse failure: 0 for --help/--version, 1 otherwise
pub fn parse_error_exit_code(err: &clap::Error) -> i32 {
    if err.use_stderr() {
        USAGE_EXIT_CODE
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn test_cli_parses_help() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_ban() {
        let cli = Cli::try_parse_from(["geoblock", "--ban", "CN", "ru"]).unwrap();
        assert_eq!(
            cli.action().unwrap(),
            Action::Ban(vec![CountryCode::new("cn"), CountryCode::new("ru")])
        );
    }

    #[test]
    fn test_cli_unban_short() {
        let cli = Cli::try_parse_from(["geoblock", "-u", "de"]).unwrap();
        assert_eq!(
            cli.action().unwrap(),
            Action::Unban(vec![CountryCode::new("de")])
        );
    }

    #[test]
    fn test_cli_rejects_both() {
        let err = Cli::try_parse_from(["geoblock", "--ban", "cn", "--unban", "ru"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
        assert_eq!(parse_error_exit_code(&err), 1);
    }

    #[test]
    fn test_cli_rejects_neither() {
        let err = Cli::try_parse_from(["geoblock"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
        assert_eq!(parse_error_exit_code(&err), 1);
    }

    #[test]
    fn test_cli_requires_a_code() {
        let err = Cli::try_parse_from(["geoblock", "--ban"]).unwrap_err();
        assert_eq!(parse_error_exit_code(&err), 1);
    }

    #[test]
    fn test_cli_help_exits_zero() {
        let err = Cli::try_parse_from(["geoblock", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
        assert_eq!(parse_error_exit_code(&err), 0);
    }

    #[test]
    fn test_action_rejects_both_without_clap() {
        let cli = Cli {
            ban: Some(vec!["cn".to_string()]),
            unban: Some(vec!["ru".to_string()]),
            config: PathBuf::from(DEFAULT_CONFIG_PATH),
            quiet: false,
            verbose: false,
        };
        assert!(cli.action().is_err());
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from([
            "geoblock",
            "-q",
            "-v",
            "--config",
            "/custom/path.yaml",
            "--unban",
            "cn",
        ])
        .unwrap();
        assert!(cli.quiet);
        assert!(cli.verbose);
        assert_eq!(cli.config.to_str().unwrap(), "/custom/path.yaml");
    }
}
