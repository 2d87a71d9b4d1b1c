//! # geoblock - country-wide IP blocking for Linux
//!
//! Bans or unbans whole countries: zone files listing every network of a
//! country are downloaded from ipdeny.com, loaded into one ipset per IP
//! version (`{cc}_v4`, `{cc}_v6`), and a drop rule matching each set is
//! inserted at the head of the inbound chain.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        geoblock                             │
//! ├─────────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                                 │
//! │    └── --ban CC... | --unban CC...                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Config (serde_yaml, optional)                              │
//! │    └── zone URL templates, chain, elevation, binaries       │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls)                                 │
//! │    └── {cc}.zone for IPv4 and IPv6                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Synchronizer                                               │
//! │    └── new networks only, one `ipset add` each              │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Enforcer (CommandExecutor trait)                           │
//! │    ├── IpsetStore (list/create/add/destroy)                 │
//! │    └── RuleManager (iptables/ip6tables -C/-I/-D)            │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Usage
//!
//! ```no_run
//! use std::sync::Arc;
//! use geoblock::cmd_abstraction::RealCommandExecutor;
//! use geoblock::commands::{ban::ban_countries, Firewall};
//! use geoblock::config::Config;
//! use geoblock::country::CountryCode;
//! use geoblock::enforcer::acquire_privileges;
//! use geoblock::fetcher::Fetcher;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let system = acquire_privileges(Arc::new(RealCommandExecutor::new()), &config.elevation)?;
//!     let firewall = Firewall::new(system, &config, true);
//!     let fetcher = Fetcher::new(config.sources.clone())?;
//!
//!     ban_countries(&[CountryCode::new("xx")], &fetcher, &firewall).await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`cli`] - Command-line interface definitions
//! - [`cmd_abstraction`] - Mockable system command execution
//! - [`commands`] - Ban and unban implementations
//! - [`config`] - Configuration parsing and validation
//! - [`country`] - Country codes, IP versions and set names
//! - [`enforcer`] - Privileges, ipset and iptables
//! - [`error`] - Domain error type
//! - [`fetcher`] - Zone file download and parsing
//! - [`synchronizer`] - Zone to ipset merging
//! - [`utils`] - Formatting helpers

pub mod cli;
pub mod cmd_abstraction;
pub mod commands;
pub mod config;
pub mod country;
pub mod enforcer;
pub mod error;
pub mod fetcher;
pub mod synchronizer;
pub mod utils;

pub use cli::{Action, Cli};
pub use config::Config;
pub use error::GeoblockError;
