//! Lockfile and manifest parsing
//! - traits.rs: LockfileParser trait definition
//! - types.rs: Common types (ParsedLock, VersionRecord, LockfileKind)
//! - pnpm_lock.rs: pnpm-lock.yaml parser
//! - yarn_lock.rs: yarn.lock parser
//! - manifest.rs: package.json packageManager pin

pub mod manifest;
pub mod pnpm_lock;
pub mod traits;
pub mod types;
pub mod yarn_lock;

pub use manifest::{ManifestError, PackageManagerPin, read_pin};
pub use pnpm_lock::{PnpmLockParser, parse_dependency_path};
pub use traits::LockfileParser;
pub use types::{LockfileKind, ParsedLock, VersionRecord};
pub use yarn_lock::{YarnLockParser, extract_package_name};
