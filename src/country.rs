//! Country codes and IP versions, and the set names derived from them.

use std::fmt;

/// A country code as given on the command line, normalized to lowercase.
///
/// The code is not checked against ISO 3166; an unknown code simply yields
/// a non-200 response from the registry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CountryCode(String);

impl CountryCode {
    pub fn new(code: &str) -> Self {
        Self(code.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Name of the address set holding this country's networks for `version`
    pub fn set_name(&self, version: IpVersion) -> String {
        format!("{}{}", self.0, version.set_suffix())
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IpVersion {
    V4,
    V6,
}

impl IpVersion {
    pub const ALL: [IpVersion; 2] = [IpVersion::V4, IpVersion::V6];

    pub fn set_suffix(self) -> &'static str {
        match self {
            IpVersion::V4 => "_v4",
            IpVersion::V6 => "_v6",
        }
    }

    /// ipset `family` argument
    pub fn family(self) -> &'static str {
        match self {
            IpVersion::V4 => "inet",
            IpVersion::V6 => "inet6",
        }
    }

    /// Infer the version from a set name's `_v4`/`_v6` marker.
    pub fn from_set_name(name: &str) -> Option<Self> {
        if name.contains("_v4") {
            Some(IpVersion::V4)
        } else if name.contains("_v6") {
            Some(IpVersion::V6)
        } else {
            None
        }
    }
}

impl fmt::Display for IpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IpVersion::V4 => f.write_str("v4"),
            IpVersion::V6 => f.write_str("v6"),
        }
    }
}
