//! Compliance check for a single repository
//!
//! Resolves the installed versions of the requested target and classifies
//! each against the requirement. Everything except invalid options (rejected
//! earlier by `CheckRequest::new`) is reported through the event sink and the
//! returned `CheckReport`; nothing here fails the caller.

use semver::Version;
use tracing::debug;

use crate::compliance::error::CheckFault;
use crate::compliance::event::{EventSink, Severity};
use crate::compliance::outcome::{CheckReport, Disposition, Outcome, SkipReason};
use crate::compliance::reduction::reduce;
use crate::compliance::request::{CheckRequest, PackageManager, Target};
use crate::config::MANIFEST_PATH;
use crate::lockfile::manifest::read_pin;
use crate::lockfile::pnpm_lock::PnpmLockParser;
use crate::lockfile::traits::LockfileParser;
use crate::lockfile::types::ParsedLock;
use crate::lockfile::yarn_lock::YarnLockParser;
use crate::source::fetcher::{ContentFetcher, FileContent, RemoteContent};
use crate::source::lister::RepositoryRef;

/// Lockfile parsers in lookup order
const LOCKFILE_PARSERS: [&dyn LockfileParser; 2] = [&PnpmLockParser, &YarnLockParser];

/// Check one repository
pub async fn check<F, S>(
    fetcher: &F,
    sink: &S,
    repository: &RepositoryRef,
    request: &CheckRequest,
) -> CheckReport
where
    F: ContentFetcher + ?Sized,
    S: EventSink + ?Sized,
{
    let repo = repository.full_name.as_str();

    if repository.archived {
        sink.emit(Severity::Debug, &format!("{repo} is archived, skipping"));
        return CheckReport {
            repository: repo.to_string(),
            disposition: Disposition::Skipped(SkipReason::Archived),
        };
    }

    let result = match &request.target {
        Target::PackageManager(pm) => check_package_manager(fetcher, sink, repo, *pm, request).await,
        Target::Library(library) => check_library(fetcher, sink, repo, library, request).await,
    };

    let disposition = result.unwrap_or_else(|fault| {
        sink.emit(Severity::Error, &format!("{repo} {fault}"));
        Disposition::Failed(fault)
    });

    CheckReport {
        repository: repo.to_string(),
        disposition,
    }
}

async fn check_package_manager<F, S>(
    fetcher: &F,
    sink: &S,
    repo: &str,
    pm: PackageManager,
    request: &CheckRequest,
) -> Result<Disposition, CheckFault>
where
    F: ContentFetcher + ?Sized,
    S: EventSink + ?Sized,
{
    let file = match fetcher.fetch(repo, MANIFEST_PATH).await {
        Ok(RemoteContent::File(file)) => file,
        Ok(RemoteContent::Other { kind, .. }) => {
            debug!("{}/{} is a {}", repo, MANIFEST_PATH, kind);
            return Ok(no_pin(sink, repo, pm));
        }
        Err(e) => {
            debug!("Could not fetch {}/{}: {}", repo, MANIFEST_PATH, e);
            return Ok(no_pin(sink, repo, pm));
        }
    };

    let content = decode(&file)?;
    let pin = read_pin(&content).map_err(|e| CheckFault::Malformed {
        path: MANIFEST_PATH.to_string(),
        reason: e.to_string(),
    })?;

    let Some(pin) = pin.filter(|pin| pin.tool == pm.as_str()) else {
        return Ok(no_pin(sink, repo, pm));
    };

    let label = format!("{} v{}", pin.tool, pin.major);
    let outcome = classify(sink, repo, "package manager", &label, &pin.version, request);

    Ok(Disposition::Evaluated(vec![outcome]))
}

fn no_pin<S: EventSink + ?Sized>(sink: &S, repo: &str, pm: PackageManager) -> Disposition {
    sink.emit(
        Severity::Debug,
        &format!("{repo} does not specify a packageManager pin for {pm}"),
    );
    Disposition::Skipped(SkipReason::NoPin)
}

async fn check_library<F, S>(
    fetcher: &F,
    sink: &S,
    repo: &str,
    library: &str,
    request: &CheckRequest,
) -> Result<Disposition, CheckFault>
where
    F: ContentFetcher + ?Sized,
    S: EventSink + ?Sized,
{
    let Some((parser, file)) = locate_lockfile(fetcher, repo).await? else {
        sink.emit(Severity::Warn, &format!("{repo} missing lockfile, quitting"));
        return Ok(Disposition::Skipped(SkipReason::MissingLockfile));
    };

    let path = parser.kind().path();
    let content = decode(&file)?;

    let lock = parser.parse(&content);
    if let ParsedLock::Malformed(reason) = &lock {
        return Err(CheckFault::Malformed {
            path: path.to_string(),
            reason: reason.clone(),
        });
    }

    let records = parser.versions_for(&lock, library);
    if records.is_empty() {
        sink.emit(
            Severity::Debug,
            &format!("{repo} library {library} not found in {path}"),
        );
        return Ok(Disposition::Skipped(SkipReason::NotInLockfile));
    }

    let outcomes = reduce(records, request.reduction)
        .into_iter()
        .map(|record| classify(sink, repo, "library", library, &record.version, request))
        .collect();

    Ok(Disposition::Evaluated(outcomes))
}

/// Find the first lockfile that can be fetched
///
/// Only an unfetchable path moves on to the next format; a path that exists
/// but is not a regular file stops the search.
async fn locate_lockfile<F>(
    fetcher: &F,
    repo: &str,
) -> Result<Option<(&'static dyn LockfileParser, FileContent)>, CheckFault>
where
    F: ContentFetcher + ?Sized,
{
    for parser in LOCKFILE_PARSERS {
        let path = parser.kind().path();
        match fetcher.fetch(repo, path).await {
            Ok(RemoteContent::File(file)) => return Ok(Some((parser, file))),
            Ok(RemoteContent::Other { path, kind }) => {
                return Err(CheckFault::WrongArtifactType { path, kind });
            }
            Err(e) => debug!("Could not fetch {}/{}: {}", repo, path, e),
        }
    }

    Ok(None)
}

fn decode(file: &FileContent) -> Result<String, CheckFault> {
    file.decode()
        .map_err(|e| CheckFault::Unexpected(e.to_string()))
}

/// Evaluate one version and emit its record
fn classify<S: EventSink + ?Sized>(
    sink: &S,
    repo: &str,
    subject: &str,
    identifier: &str,
    version: &str,
    request: &CheckRequest,
) -> Outcome {
    let requirement = &request.requirement;
    // Versions that do not parse never satisfy anything
    let satisfies = Version::parse(version)
        .map(|v| requirement.satisfies(&v))
        .unwrap_or(false);

    if satisfies {
        sink.emit(
            Severity::Info,
            &format!("{repo} {subject} {identifier} at version {version} satisfies {requirement}"),
        );
    } else {
        sink.emit(
            Severity::Warn,
            &format!(
                "{repo} {subject} {identifier} at version {version} DOES NOT satisfy {requirement}"
            ),
        );
    }

    Outcome {
        repository: repo.to_string(),
        identifier: identifier.to_string(),
        version: version.to_string(),
        requirement: requirement.to_string(),
        satisfies,
    }
}
