//! Allergen Analysis Module
//!
//! Derives allergen sets and cross-contamination risk from ingredient and
//! kitchen metadata, and assesses a specific student's exposure.
//!
//! ## Responsibilities
//! - **Normalization**: Free-text allergen labels map onto a closed, uppercase vocabulary.
//! - **Detection**: Union of declared allergens across ingredients, deduplicated.
//! - **Risk**: Contamination level + numeric score from allergen potency and equipment sharing.
//! - **Assessment**: Per-student matching with severity escalation.

pub mod analyzer;
pub mod types;
