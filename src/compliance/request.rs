//! Check requests and their validation

use std::fmt;

use crate::compliance::error::ConfigurationError;
use crate::compliance::requirement::Requirement;

/// Package managers that can be pinned via `packageManager`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum PackageManager {
    Pnpm,
    Yarn,
}

impl PackageManager {
    pub fn as_str(&self) -> &'static str {
        match self {
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapses multiple matched versions into one
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Reduction {
    Min,
    Max,
}

/// What a check looks at
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// A library resolved from the repository's lockfile
    Library(String),
    /// The `packageManager` pin in package.json
    PackageManager(PackageManager),
}

impl Target {
    pub fn identifier(&self) -> &str {
        match self {
            Target::Library(name) => name,
            Target::PackageManager(pm) => pm.as_str(),
        }
    }
}

/// Caller-supplied options, unvalidated
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOptions {
    pub requirement: Option<String>,
    pub library: Option<String>,
    pub package_manager: Option<PackageManager>,
    pub reduce: Option<Reduction>,
}

/// A validated request, read-only once built
#[derive(Debug, Clone)]
pub struct CheckRequest {
    pub target: Target,
    pub requirement: Requirement,
    /// Only applied to lockfile checks
    pub reduction: Option<Reduction>,
}

impl CheckRequest {
    pub fn new(options: CheckOptions) -> Result<Self, ConfigurationError> {
        let raw_requirement = options
            .requirement
            .filter(|r| !r.trim().is_empty())
            .ok_or(ConfigurationError::MissingRequirement)?;

        let library = options.library.filter(|l| !l.trim().is_empty());

        let target = match (library, options.package_manager) {
            (Some(_), Some(_)) => return Err(ConfigurationError::ConflictingTargets),
            (Some(library), None) => Target::Library(library.trim().to_string()),
            (None, Some(pm)) => Target::PackageManager(pm),
            (None, None) => return Err(ConfigurationError::MissingTarget),
        };

        let requirement = Requirement::parse(&raw_requirement)
            .ok_or(ConfigurationError::InvalidRequirement(raw_requirement))?;

        Ok(Self {
            target,
            requirement,
            reduction: options.reduce,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn options(
        requirement: Option<&str>,
        library: Option<&str>,
        package_manager: Option<PackageManager>,
    ) -> CheckOptions {
        CheckOptions {
            requirement: requirement.map(str::to_string),
            library: library.map(str::to_string),
            package_manager,
            reduce: None,
        }
    }

    #[rstest]
    #[case(options(None, Some("lodash"), None), ConfigurationError::MissingRequirement)]
    #[case(options(Some(" "), Some("lodash"), None), ConfigurationError::MissingRequirement)]
    // Missing requirement wins over conflicting targets
    #[case(options(None, Some("lodash"), Some(PackageManager::Pnpm)), ConfigurationError::MissingRequirement)]
    #[case(options(Some(">=1.0.0"), Some("lodash"), Some(PackageManager::Pnpm)), ConfigurationError::ConflictingTargets)]
    #[case(options(Some(">=1.0.0"), None, None), ConfigurationError::MissingTarget)]
    #[case(options(Some("newest"), Some("lodash"), None), ConfigurationError::InvalidRequirement("newest".to_string()))]
    fn new_rejects_invalid_options(
        #[case] options: CheckOptions,
        #[case] expected: ConfigurationError,
    ) {
        assert_eq!(CheckRequest::new(options).unwrap_err(), expected);
    }

    #[test]
    fn new_builds_library_request() {
        let request = CheckRequest::new(CheckOptions {
            reduce: Some(Reduction::Max),
            ..options(Some(">=5.15.0"), Some("@scope/name"), None)
        })
        .unwrap();

        assert_eq!(request.target, Target::Library("@scope/name".to_string()));
        assert_eq!(request.requirement.as_str(), ">=5.15.0");
        assert_eq!(request.reduction, Some(Reduction::Max));
    }

    #[test]
    fn new_builds_package_manager_request() {
        let request =
            CheckRequest::new(options(Some(">=9.0.0"), None, Some(PackageManager::Yarn))).unwrap();

        assert_eq!(request.target, Target::PackageManager(PackageManager::Yarn));
        assert_eq!(request.target.identifier(), "yarn");
    }
}
