//! Fleet runs over an in-memory host

mod helper;

use dep_compliance::compliance::{FleetSummary, RecordingSink, Severity, run_fleet};
use dep_compliance::source::RepositoryPattern;

use helper::{FakeHost, library_request};

const PNPM_LOCK: &str = include_str!("fixtures/pnpm-lock.yaml");
const YARN_LOCK: &str = include_str!("fixtures/yarn.lock");

fn patterns(raw: &[&str]) -> Vec<RepositoryPattern> {
    raw.iter().map(|p| p.parse().unwrap()).collect()
}

#[tokio::test]
async fn owner_pattern_checks_every_repository() {
    let host = FakeHost::new()
        .with_repository("octo/web", false)
        .with_repository("octo/legacy", false)
        .with_repository("octo/attic", true)
        .with_repository("other/web", false)
        .with_file("octo/web", "pnpm-lock.yaml", PNPM_LOCK)
        .with_file("octo/legacy", "yarn.lock", YARN_LOCK);
    let sink = RecordingSink::new();

    let summary = run_fleet(
        &host,
        &host,
        &sink,
        &patterns(&["octo/*"]),
        &library_request("lodash", ">=4.17.21", None),
    )
    .await;

    assert_eq!(
        summary,
        FleetSummary {
            checked: 3,
            compliant: 1,
            non_compliant: 1,
            skipped: 1,
            failed: 0,
        }
    );
    assert!(host.fetches().iter().all(|f| !f.starts_with("other/")));
    assert!(host.fetches().iter().all(|f| !f.starts_with("octo/attic/")));
}

#[tokio::test]
async fn unknown_owner_is_reported_and_run_continues() {
    let host = FakeHost::new()
        .with_repository("octo/web", false)
        .with_file("octo/web", "pnpm-lock.yaml", PNPM_LOCK);
    let sink = RecordingSink::new();

    let summary = run_fleet(
        &host,
        &host,
        &sink,
        &patterns(&["ghost/*", "octo/web"]),
        &library_request("lodash", "^4.17.0", None),
    )
    .await;

    assert_eq!(summary.failed, 1);
    assert_eq!(summary.compliant, 1);
    assert_eq!(
        sink.messages_at(Severity::Error),
        vec!["could not list ghost/*: Not found: ghost/*"]
    );
    assert_eq!(
        sink.messages_at(Severity::Info),
        vec!["octo/web library lodash at version 4.17.21 satisfies ^4.17.0"]
    );
}
