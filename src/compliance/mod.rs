//! Compliance checking
//!
//! Decides whether a repository's installed version of a library, or its
//! pinned package manager, satisfies a version requirement.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │    Fleet    │────▶│   Checker   │────▶│  EventSink  │
//! │ (iterate)   │     │ (classify)  │     │  (report)   │
//! └─────────────┘     └─────────────┘     └─────────────┘
//!        │                   │
//!        ▼                   ▼
//! ┌─────────────┐     ┌─────────────┐
//! │   Lister    │     │  Fetcher +  │
//! │  (GitHub)   │     │  Lockfiles  │
//! └─────────────┘     └─────────────┘
//! ```
//!
//! # Modules
//!
//! - [`request`]: Options, validation, and the validated `CheckRequest`
//! - [`requirement`]: npm-style semver range matching
//! - [`reduction`]: MIN/MAX reduction of candidate versions
//! - [`checker`]: The per-repository check
//! - [`outcome`]: Per-version outcomes and per-repository reports
//! - [`event`]: Severity-levelled event sinks
//! - [`fleet`]: Iteration over many repositories
//! - [`error`]: Configuration errors and per-repository faults

pub mod checker;
pub mod error;
pub mod event;
pub mod fleet;
pub mod outcome;
pub mod reduction;
pub mod request;
pub mod requirement;

pub use checker::check;
pub use error::{CheckFault, ConfigurationError};
pub use event::{Event, EventSink, RecordingSink, Severity, TracingSink};
pub use fleet::{FleetSummary, run_fleet};
pub use outcome::{CheckReport, Disposition, Outcome, SkipReason};
pub use request::{CheckOptions, CheckRequest, PackageManager, Reduction, Target};
pub use requirement::Requirement;
