//! Nutritional Compliance and Safety Engine Library
//!
//! This library crate defines the core modules that make up the analysis engine.
//! Callers construct a `ComplianceOrchestrator` and feed it menu items and
//! student profiles; every result is a pure function of its inputs.
//!
//! ## Architecture Modules
//! The system is composed of six loosely coupled subsystems:
//!
//! - **`nutrition`**: The aggregation layer. Sums per-ingredient nutrient
//!   records into menu-item totals and derives density, macro distribution
//!   and data completeness.
//! - **`allergen`**: Allergen detection and cross-contamination risk. Works
//!   over a closed allergen vocabulary and the item's preparation metadata.
//! - **`compliance`**: The rule engine. Dietary-restriction checks
//!   (vegetarian/vegan/Jain) and government-standard threshold tables with
//!   penalty-based scoring.
//! - **`safety`**: Per-student safety assessment. Folds allergen, dietary and
//!   medical dimensions into one verdict and builds emergency protocols for
//!   dangerous matches.
//! - **`engine`**: The orchestrator. Single-item and batch analysis, the
//!   composite nutrition score, personalized menu partitioning and menu-wide
//!   improvement scanning.
//! - **`cache`**: A concurrent TTL cache with tag-indexed invalidation, used
//!   by the orchestrator for cache-aside analysis.

pub mod allergen;
pub mod cache;
pub mod compliance;
pub mod engine;
pub mod nutrition;
pub mod safety;
