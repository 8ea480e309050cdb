//! Version requirements in npm range syntax
//!
//! Every range is desugared into sets of primitive comparators, the way npm's
//! `semver` does:
//!
//! - `1.2.3`, `=1.2.3`, `v1.2.3` - exact match
//! - `1.2`, `1.2.x`, `1`, `1.x`, `*` - X-ranges (`>=1.2.0 <1.3.0`, `>=1.0.0 <2.0.0`, any)
//! - `^1.2.3` - `>=1.2.3 <2.0.0` (`^0.2.3` - `<0.3.0`, `^0.0.3` - `<0.0.4`)
//! - `~1.2.3` - `>=1.2.3 <1.3.0` (`~1` - `>=1.0.0 <2.0.0`)
//! - `>1.2` - `>=1.3.0`, `<=1.2` - `<1.3.0`
//! - `1.0.0 - 2` - `>=1.0.0 <3.0.0`
//! - `>=1.0.0 <2.0.0` - all must hold
//! - `^1.0.0 || ^2.0.0` - any may hold
//!
//! A prerelease version only satisfies a set when some comparator in that set
//! carries a prerelease on the same `major.minor.patch`. Build metadata is
//! ignored throughout.

use std::cmp::Ordering;
use std::fmt;

use semver::{BuildMetadata, Prerelease, Version};

/// A parsed requirement, keeping its source text for reporting
#[derive(Debug, Clone)]
pub struct Requirement {
    raw: String,
    /// `||` alternatives; an empty set matches any release
    sets: Vec<Vec<Comparator>>,
}

impl Requirement {
    /// Parse a requirement; `None` if any part is not a valid range
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        let sets = raw
            .split("||")
            .map(|part| parse_set(part.trim()))
            .collect::<Option<Vec<_>>>()?;

        Some(Self {
            raw: raw.to_string(),
            sets,
        })
    }

    pub fn satisfies(&self, version: &Version) -> bool {
        self.sets.iter().any(|set| set_satisfies(set, version))
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for Requirement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

fn set_satisfies(set: &[Comparator], version: &Version) -> bool {
    if !set.iter().all(|c| c.matches(version)) {
        return false;
    }

    if version.pre.is_empty() {
        return true;
    }

    set.iter().any(|c| {
        !c.version.pre.is_empty()
            && c.version.major == version.major
            && c.version.minor == version.minor
            && c.version.patch == version.patch
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Comparator {
    op: Op,
    version: Version,
}

impl Comparator {
    fn new(op: Op, version: Version) -> Self {
        Self { op, version }
    }

    /// Matches nothing: `<0.0.0-0`
    fn never() -> Self {
        let mut floor = Version::new(0, 0, 0);
        floor.pre = Prerelease::new("0").unwrap_or(Prerelease::EMPTY);
        Self::new(Op::Lt, floor)
    }

    fn matches(&self, version: &Version) -> bool {
        let ord = version.cmp_precedence(&self.version);
        match self.op {
            Op::Eq => ord == Ordering::Equal,
            Op::Gt => ord == Ordering::Greater,
            Op::Gte => ord != Ordering::Less,
            Op::Lt => ord == Ordering::Less,
            Op::Lte => ord != Ordering::Greater,
        }
    }
}

/// A version whose trailing parts may be missing or wildcards
#[derive(Debug, Clone, PartialEq, Eq)]
struct Partial {
    major: Option<u64>,
    minor: Option<u64>,
    patch: Option<u64>,
    pre: Prerelease,
}

impl Partial {
    /// Parse `1`, `1.2`, `1.2.x`, `*`, `v1.2.3-rc.1+build`
    fn parse(input: &str) -> Option<Self> {
        let input = input.trim();
        let input = input.strip_prefix(['v', 'V']).unwrap_or(input);
        let input = input.split_once('+').map_or(input, |(core, _)| core);
        let (core, pre) = match input.split_once('-') {
            Some((core, pre)) => (core, Some(pre)),
            None => (input, None),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() > 3 {
            return None;
        }

        let mut numbers = [None; 3];
        for (slot, part) in numbers.iter_mut().zip(&parts) {
            if matches!(*part, "x" | "X" | "*") {
                break;
            }
            *slot = Some(part.parse::<u64>().ok()?);
        }

        let [major, minor, patch] = numbers;
        let pre = match pre {
            Some(_) if patch.is_none() => return None,
            Some(pre) => Prerelease::new(pre).ok()?,
            None => Prerelease::EMPTY,
        };

        Some(Self {
            major,
            minor,
            patch,
            pre,
        })
    }

    fn full(&self) -> Option<Version> {
        Some(Version {
            major: self.major?,
            minor: self.minor?,
            patch: self.patch?,
            pre: self.pre.clone(),
            build: BuildMetadata::EMPTY,
        })
    }
}

fn bounded(lower: Version, upper: Version) -> Vec<Comparator> {
    vec![
        Comparator::new(Op::Gte, lower),
        Comparator::new(Op::Lt, upper),
    ]
}

fn next_major(major: u64) -> Version {
    Version::new(major.saturating_add(1), 0, 0)
}

fn next_minor(major: u64, minor: u64) -> Version {
    Version::new(major, minor.saturating_add(1), 0)
}

fn parse_set(spec: &str) -> Option<Vec<Comparator>> {
    if spec.is_empty() {
        return None;
    }

    let tokens = join_operators(spec);

    if let [from, dash, to] = tokens.as_slice()
        && dash == "-"
    {
        return Some(hyphen(&Partial::parse(from)?, &Partial::parse(to)?));
    }

    let mut set = Vec::new();
    for token in &tokens {
        set.extend(parse_comparator(token)?);
    }
    Some(set)
}

/// Split on whitespace, re-joining operators written apart from their
/// version (`>= 1.2.3`)
fn join_operators(spec: &str) -> Vec<String> {
    let mut parts: Vec<String> = Vec::new();
    let mut pending_operator: Option<&str> = None;

    for token in spec.split_whitespace() {
        if let Some(op) = pending_operator.take() {
            parts.push(format!("{op}{token}"));
        } else if matches!(token, ">=" | ">" | "<=" | "<" | "=" | "^" | "~" | "~>") {
            pending_operator = Some(token);
        } else {
            parts.push(token.to_string());
        }
    }

    if let Some(op) = pending_operator {
        parts.push(op.to_string());
    }

    parts
}

fn parse_comparator(token: &str) -> Option<Vec<Comparator>> {
    if let Some(rest) = token.strip_prefix("~>").or_else(|| token.strip_prefix('~')) {
        Some(tilde(&Partial::parse(rest)?))
    } else if let Some(rest) = token.strip_prefix('^') {
        Some(caret(&Partial::parse(rest)?))
    } else if let Some(rest) = token.strip_prefix(">=") {
        Some(primitive(Op::Gte, &Partial::parse(rest)?))
    } else if let Some(rest) = token.strip_prefix("<=") {
        Some(primitive(Op::Lte, &Partial::parse(rest)?))
    } else if let Some(rest) = token.strip_prefix('>') {
        Some(primitive(Op::Gt, &Partial::parse(rest)?))
    } else if let Some(rest) = token.strip_prefix('<') {
        Some(primitive(Op::Lt, &Partial::parse(rest)?))
    } else {
        let rest = token.strip_prefix('=').unwrap_or(token);
        Some(x_range(&Partial::parse(rest)?))
    }
}

fn x_range(p: &Partial) -> Vec<Comparator> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => Vec::new(),
        (Some(major), None, _) => bounded(Version::new(major, 0, 0), next_major(major)),
        (Some(major), Some(minor), None) => {
            bounded(Version::new(major, minor, 0), next_minor(major, minor))
        }
        (Some(_), Some(_), Some(_)) => p
            .full()
            .map(|v| vec![Comparator::new(Op::Eq, v)])
            .unwrap_or_default(),
    }
}

fn tilde(p: &Partial) -> Vec<Comparator> {
    match (p.major, p.minor, p.full()) {
        (None, _, _) => Vec::new(),
        (Some(major), None, _) => bounded(Version::new(major, 0, 0), next_major(major)),
        (Some(major), Some(minor), None) => {
            bounded(Version::new(major, minor, 0), next_minor(major, minor))
        }
        (Some(major), Some(minor), Some(full)) => bounded(full, next_minor(major, minor)),
    }
}

fn caret(p: &Partial) -> Vec<Comparator> {
    match (p.major, p.minor, p.patch) {
        (None, _, _) => Vec::new(),
        (Some(major), None, _) => bounded(Version::new(major, 0, 0), next_major(major)),
        (Some(0), Some(minor), None) => bounded(Version::new(0, minor, 0), next_minor(0, minor)),
        (Some(major), Some(minor), None) => {
            bounded(Version::new(major, minor, 0), next_major(major))
        }
        (Some(major), Some(minor), Some(patch)) => {
            let upper = match (major, minor) {
                (0, 0) => Version::new(0, 0, patch.saturating_add(1)),
                (0, minor) => next_minor(0, minor),
                (major, _) => next_major(major),
            };
            p.full().map(|lower| bounded(lower, upper)).unwrap_or_default()
        }
    }
}

/// `>`, `>=`, `<`, `<=` applied to a possibly partial version
fn primitive(op: Op, p: &Partial) -> Vec<Comparator> {
    if let Some(full) = p.full() {
        return vec![Comparator::new(op, full)];
    }

    let lower_floor = match (p.major, p.minor) {
        (Some(major), Some(minor)) => Some(Version::new(major, minor, 0)),
        (Some(major), None) => Some(Version::new(major, 0, 0)),
        _ => None,
    };
    let next = match (p.major, p.minor) {
        (Some(major), Some(minor)) => Some(next_minor(major, minor)),
        (Some(major), None) => Some(next_major(major)),
        _ => None,
    };

    // `>*` and `<*` match nothing, `>=*` and `<=*` match everything
    let comparator = match op {
        Op::Gt => next.map(|v| Comparator::new(Op::Gte, v)).or(Some(Comparator::never())),
        Op::Gte => lower_floor.map(|v| Comparator::new(Op::Gte, v)),
        Op::Lt => lower_floor.map(|v| Comparator::new(Op::Lt, v)).or(Some(Comparator::never())),
        Op::Lte => next.map(|v| Comparator::new(Op::Lt, v)),
        Op::Eq => return x_range(p),
    };

    comparator.into_iter().collect()
}

/// `from - to`, inclusive; a partial upper bound becomes exclusive on the
/// next version
fn hyphen(from: &Partial, to: &Partial) -> Vec<Comparator> {
    let mut set = Vec::new();

    match (from.major, from.minor, from.full()) {
        (None, _, _) => {}
        (Some(major), None, _) => set.push(Comparator::new(Op::Gte, Version::new(major, 0, 0))),
        (Some(major), Some(minor), None) => {
            set.push(Comparator::new(Op::Gte, Version::new(major, minor, 0)))
        }
        (Some(_), Some(_), Some(full)) => set.push(Comparator::new(Op::Gte, full)),
    }

    match (to.major, to.minor, to.full()) {
        (None, _, _) => {}
        (Some(major), None, _) => set.push(Comparator::new(Op::Lt, next_major(major))),
        (Some(major), Some(minor), None) => {
            set.push(Comparator::new(Op::Lt, next_minor(major, minor)))
        }
        (Some(_), Some(_), Some(full)) => set.push(Comparator::new(Op::Lte, full)),
    }

    set
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn satisfies(requirement: &str, version: &str) -> bool {
        Requirement::parse(requirement)
            .unwrap()
            .satisfies(&Version::parse(version).unwrap())
    }

    #[rstest]
    #[case(">=5.15.0", "5.15.2", true)]
    #[case(">=5.15.0", "5.15.0", true)]
    #[case(">=5.15.0", "5.14.0", false)]
    #[case(">5.15.0", "5.15.0", false)]
    #[case("<=5.15.0", "5.15.0", true)]
    #[case("<6", "5.99.0", true)]
    #[case("<6", "6.0.0", false)]
    #[case(">= 9.0.0", "10.0.0", true)]
    fn comparison_operators(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case(">1", "1.0.1", false)]
    #[case(">1", "2.0.0", true)]
    #[case(">1.2", "1.2.9", false)]
    #[case(">1.2", "1.3.0", true)]
    #[case(">=1.2", "1.2.0", true)]
    #[case("<=1.2", "1.2.5", true)]
    #[case("<=1.2", "1.3.0", false)]
    #[case("<=1", "1.99.0", true)]
    #[case("<1.2", "1.2.0", false)]
    #[case(">*", "1.0.0", false)]
    #[case("<*", "0.0.1", false)]
    #[case(">=*", "0.0.1", true)]
    fn partial_versions_with_operators(
        #[case] req: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case("^1.2.3", "1.9.9", true)]
    #[case("^1.2.3", "1.2.2", false)]
    #[case("^1.2.3", "2.0.0", false)]
    #[case("^0.2.3", "0.2.9", true)]
    #[case("^0.2.3", "0.3.0", false)]
    #[case("^0.0.3", "0.0.3", true)]
    #[case("^0.0.3", "0.0.4", false)]
    #[case("^0", "0.5.0", true)]
    #[case("^0", "1.0.0", false)]
    #[case("^0.0", "0.0.9", true)]
    #[case("^0.0", "0.1.0", false)]
    #[case("^1.2", "1.9.0", true)]
    #[case("^1.2.x", "1.3.0", true)]
    #[case("^1.2.x", "1.1.9", false)]
    #[case("~1.2.3", "1.2.9", true)]
    #[case("~1.2.3", "1.3.0", false)]
    #[case("~1.2", "1.2.0", true)]
    #[case("~1", "1.5.0", true)]
    #[case("~1", "2.0.0", false)]
    #[case("~>1.2.3", "1.2.4", true)]
    fn caret_and_tilde(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case("*", "0.0.1", true)]
    #[case("x", "12.0.0", true)]
    #[case("10.x", "10.4.1", true)]
    #[case("10.x", "9.15.0", false)]
    #[case("1.2.X", "1.2.5", true)]
    #[case("1.2.x", "1.3.0", false)]
    #[case("1.x.x", "1.7.0", true)]
    #[case("1.2", "1.2.5", true)]
    #[case("1.2", "1.3.0", false)]
    #[case("1.0.0", "1.0.0", true)]
    #[case("=1.0.0", "1.0.1", false)]
    #[case("v2", "2.0.0", true)]
    fn x_ranges_and_exact(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case(">=1.0.0 <2.0.0", "1.5.0", true)]
    #[case(">=1.0.0 <2.0.0", "2.0.0", false)]
    #[case("1.0.0 - 2.0.0", "2.0.0", true)]
    #[case("1.0.0 - 2.0.0", "2.0.1", false)]
    #[case("1.0.0 - 2", "2.5.0", true)]
    #[case("1.0.0 - 2", "3.0.0", false)]
    #[case("1.2 - 2.3", "2.3.9", true)]
    #[case("1.2 - 2.3", "1.1.9", false)]
    #[case("^8.0.0 || ^9.0.0", "9.15.0", true)]
    #[case("^8.0.0 || ^9.0.0", "10.0.0", false)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "1.6.0", false)]
    #[case(">=1.0.0 <1.5.0 || >=2.0.0", "2.5.0", true)]
    fn compound_ranges(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case(">=3.0.0", "4.0.0-rc.42", false)]
    #[case("^4.0.0", "4.1.0-beta.1", false)]
    #[case("*", "1.0.0-alpha", false)]
    #[case(">=4.0.0-rc.1", "4.0.0-rc.42", true)]
    #[case(">=4.0.0-rc.1", "4.0.1-rc.1", false)]
    #[case(">=4.0.0-rc.1", "4.0.0", true)]
    #[case("^1.2.3-beta.2", "1.2.3-beta.4", true)]
    #[case("^1.2.3-beta.2", "1.2.3-beta.1", false)]
    #[case("<2.0.0", "2.0.0-rc.1", false)]
    fn prereleases_need_a_matching_comparator(
        #[case] req: &str,
        #[case] version: &str,
        #[case] expected: bool,
    ) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case("<=1.0.0", "1.0.0+build.1", true)]
    #[case(">=1.0.0", "1.0.0+build.1", true)]
    #[case(">1.0.0", "1.0.0+build.1", false)]
    #[case("1.0.0", "1.0.0+sha.5114f85", true)]
    #[case("=1.0.0+other", "1.0.0+build.1", true)]
    fn build_metadata_is_ignored(#[case] req: &str, #[case] version: &str, #[case] expected: bool) {
        assert_eq!(satisfies(req, version), expected);
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("latest")]
    #[case(">=banana")]
    #[case("^1.0.0 ||")]
    #[case(">=1.0.0 <two")]
    #[case("1.2-beta")]
    #[case("1.2.3.4")]
    fn parse_rejects_invalid_requirements(#[case] req: &str) {
        assert!(Requirement::parse(req).is_none());
    }

    #[test]
    fn display_keeps_source_text() {
        let requirement = Requirement::parse(" >=5.15.0 ").unwrap();
        assert_eq!(requirement.to_string(), ">=5.15.0");
    }
}
