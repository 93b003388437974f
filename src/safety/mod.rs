//! Safety Assessment Module
//!
//! Combines allergen, dietary and medical-condition checks into a single
//! safety verdict for one student and one menu item.
//!
//! ## Architecture Overview
//! The assessor evaluates three independent dimensions and folds them into a
//! verdict:
//! 1. **Allergen**: matches against the student's declared allergen set and
//!    per-allergen severity.
//! 2. **Dietary**: the student's restrictions run through the compliance
//!    rule engine.
//! 3. **Medical**: glycemic/sugar checks for diabetes, sodium for
//!    hypertension.
//!
//! Dangerous verdicts carry an emergency protocol payload; dispatching the
//! actual alert is the caller's responsibility (the engine performs no I/O).
//!
//! ## Submodules
//! - **`assessor`**: Verdict fold, emergency protocol, alternative-item ranking.
//! - **`types`**: Student profile, verdicts, protocol payloads.

pub mod assessor;
pub mod types;

#[cfg(test)]
mod tests;
