//! Candidate version reduction

use std::cmp::Ordering;

use semver::Version;

use crate::compliance::request::Reduction;
use crate::lockfile::types::VersionRecord;

/// Apply an optional reduction to the candidates
///
/// Without a reduction every candidate is kept in discovery order. With one,
/// exactly one record survives (given a non-empty input); on ties the
/// first-seen record wins. Unparseable versions lose to any parseable one, and
/// when none parse the first-seen record is kept so it is still classified.
pub fn reduce(records: Vec<VersionRecord>, reduction: Option<Reduction>) -> Vec<VersionRecord> {
    let Some(reduction) = reduction else {
        return records;
    };

    let wanted = match reduction {
        Reduction::Min => Ordering::Less,
        Reduction::Max => Ordering::Greater,
    };

    let mut best: Option<(usize, Version)> = None;
    for (index, record) in records.iter().enumerate() {
        let Ok(parsed) = Version::parse(&record.version) else {
            continue;
        };
        let replace = match &best {
            None => true,
            Some((_, current)) => parsed.cmp_precedence(current) == wanted,
        };
        if replace {
            best = Some((index, parsed));
        }
    }

    let keep = best.map_or(0, |(index, _)| index);
    records.into_iter().nth(keep).into_iter().collect()
}
