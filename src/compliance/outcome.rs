//! Results of a single repository check

use crate::compliance::error::CheckFault;

/// Classification of one retained version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub repository: String,
    /// Library name, or `<tool> v<major>` for package-manager pins
    pub identifier: String,
    pub version: String,
    pub requirement: String,
    pub satisfies: bool,
}

/// Why a repository produced no outcome without failing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    Archived,
    /// package.json absent or not pinning the requested tool
    NoPin,
    /// Neither lockfile could be fetched
    MissingLockfile,
    /// The lockfile does not mention the library
    NotInLockfile,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Disposition {
    Skipped(SkipReason),
    Evaluated(Vec<Outcome>),
    Failed(CheckFault),
}

/// Everything one check produced, mirroring what was emitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    pub repository: String,
    pub disposition: Disposition,
}

impl CheckReport {
    pub fn outcomes(&self) -> &[Outcome] {
        match &self.disposition {
            Disposition::Evaluated(outcomes) => outcomes,
            _ => &[],
        }
    }

    /// At least one outcome, and every outcome satisfied the requirement
    pub fn is_compliant(&self) -> bool {
        matches!(
            &self.disposition,
            Disposition::Evaluated(o) if !o.is_empty() && o.iter().all(|o| o.satisfies)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_evaluation_is_not_compliant() {
        let report = CheckReport {
            repository: "octo/app".to_string(),
            disposition: Disposition::Evaluated(Vec::new()),
        };

        assert!(!report.is_compliant());
    }
}
