//! package.json `packageManager` pin extraction
//!
//! The pin has the form `<tool>@<version>`, optionally followed by a corepack
//! integrity hash: `pnpm@9.1.0+sha512.6e8c...`.

use semver::Version;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ManifestError {
    #[error("package.json is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("invalid packageManager pin {0:?}")]
    InvalidPin(String),
}

#[derive(Debug, Deserialize)]
struct Manifest {
    #[serde(rename = "packageManager", default)]
    package_manager: Option<serde_json::Value>,
}

/// The tool and version a manifest pins
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageManagerPin {
    pub tool: String,
    /// `major.minor.patch[-pre]`, integrity hash removed
    pub version: String,
    pub major: u64,
}

impl PackageManagerPin {
    pub fn parse(pin: &str) -> Result<Self, ManifestError> {
        let invalid = || ManifestError::InvalidPin(pin.to_string());

        let (tool, rest) = pin.trim().split_once('@').ok_or_else(invalid)?;
        if tool.is_empty() {
            return Err(invalid());
        }

        let version = rest.split('+').next().unwrap_or(rest);
        let parsed = Version::parse(version).map_err(|_| invalid())?;

        Ok(Self {
            tool: tool.to_string(),
            version: version.to_string(),
            major: parsed.major,
        })
    }
}

/// Read the `packageManager` pin from package.json content
///
/// Returns `Ok(None)` when the field is absent or not a string.
pub fn read_pin(content: &str) -> Result<Option<PackageManagerPin>, ManifestError> {
    let manifest: Manifest =
        serde_json::from_str(content).map_err(|e| ManifestError::InvalidJson(e.to_string()))?;

    match manifest.package_manager.as_ref().and_then(|v| v.as_str()) {
        Some(pin) => PackageManagerPin::parse(pin).map(Some),
        None => Ok(None),
    }
}
