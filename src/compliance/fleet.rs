//! Fleet iteration: resolve repository patterns and check each repository in turn

use crate::compliance::checker::check;
use crate::compliance::event::{EventSink, Severity};
use crate::compliance::outcome::{CheckReport, Disposition};
use crate::compliance::request::CheckRequest;
use crate::source::fetcher::ContentFetcher;
use crate::source::lister::{RepositoryLister, RepositoryPattern};

/// Tally of a fleet run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FleetSummary {
    pub checked: usize,
    /// Every retained version satisfied the requirement
    pub compliant: usize,
    /// At least one retained version did not
    pub non_compliant: usize,
    pub skipped: usize,
    /// Per-repository faults and patterns that could not be listed
    pub failed: usize,
}

impl FleetSummary {
    fn record(&mut self, report: &CheckReport) {
        self.checked += 1;
        match &report.disposition {
            Disposition::Evaluated(_) if report.is_compliant() => self.compliant += 1,
            Disposition::Evaluated(_) => self.non_compliant += 1,
            Disposition::Skipped(_) => self.skipped += 1,
            Disposition::Failed(_) => self.failed += 1,
        }
    }
}

/// Check every repository matched by `patterns`, one at a time
///
/// A pattern that cannot be listed is reported and skipped; the run always
/// continues with the next pattern.
pub async fn run_fleet<L, F, S>(
    lister: &L,
    fetcher: &F,
    sink: &S,
    patterns: &[RepositoryPattern],
    request: &CheckRequest,
) -> FleetSummary
where
    L: RepositoryLister + ?Sized,
    F: ContentFetcher + ?Sized,
    S: EventSink + ?Sized,
{
    let mut summary = FleetSummary::default();

    for pattern in patterns {
        let repositories = match lister.list(pattern).await {
            Ok(repositories) => repositories,
            Err(e) => {
                sink.emit(Severity::Error, &format!("could not list {pattern}: {e}"));
                summary.failed += 1;
                continue;
            }
        };

        for repository in &repositories {
            let report = check(fetcher, sink, repository, request).await;
            summary.record(&report);
        }
    }

    summary
}
