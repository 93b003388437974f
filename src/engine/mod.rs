//! Compliance Orchestration Module
//!
//! The public-facing analysis API. Wires the aggregator, allergen analyzer,
//! rule engine and safety assessor together, owns the composite nutrition
//! score and health-rating mapping, and reads/writes through the tagged
//! cache when one is attached.
//!
//! ## Architecture Overview
//! Every analysis is a pure function of its inputs plus cache lookups:
//! 1. **Validation**: structurally invalid items fail fast; incomplete data
//!    never does, it only degrades completeness and confidence.
//! 2. **Fan-out**: batch analysis runs items in parallel under a bounded
//!    concurrency cap; one item's failure never aborts its siblings.
//! 3. **Cache-aside**: cached analyses are keyed by item id and tagged for
//!    cascading invalidation; the cache is an optimization, never a
//!    correctness dependency.
//!
//! ## Submodules
//! - **`orchestrator`**: The `ComplianceOrchestrator` service.
//! - **`types`**: Analysis aggregate, batch shapes, config.

pub mod orchestrator;
pub mod types;

#[cfg(test)]
mod tests;
