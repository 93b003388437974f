//! Tagged Cache Module
//!
//! A process-wide key/value store with TTL expiry, tag-indexed cascading
//! invalidation, and health/stat telemetry.
//!
//! ## Core Concepts
//! - **Entries**: JSON payloads stored under string keys with an absolute expiry.
//! - **Tag indices**: every tag maps to the set of keys carrying it; index
//!   entries are created and removed with the entry's own lifecycle, so no
//!   dangling references survive an invalidation.
//! - **Invalidation**: removing a tag deletes every key in its index and
//!   scrubs those keys from all other tag indices (collect-then-delete, no
//!   long-held lock).
//! - **Telemetry**: atomic hit/miss/set/delete counters feed a deterministic
//!   health report.
//!
//! The cache is a soft dependency for the orchestrator: it is an
//! optimization, never a correctness requirement.

pub mod store;
pub mod types;
