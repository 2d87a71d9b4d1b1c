//! Error types for geoblock.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum GeoblockError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to download {country} {version} zone: {reason}")]
    Fetch {
        country: String,
        version: String,
        reason: String,
    },

    #[error("error downloading {country} {version} zone, registry returned http {status}")]
    HttpStatus {
        country: String,
        version: String,
        status: u16,
    },

    #[error("Permission denied: {0}")]
    Permission(String),

    #[error("Failed to execute {program}: {reason}")]
    Command { program: String, reason: String },
}
