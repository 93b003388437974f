//! Compliance Rule Engine Module
//!
//! Evaluates dietary-restriction and government-standard rule sets against a
//! menu item, producing violation lists and a 0-100 compliance score.
//!
//! ## Architecture Overview
//! Two independent rule families share the `ComplianceResult` shape:
//! 1. **Dietary rules** (`rules`): pure predicates over ingredient categories
//!    and allergens. Restrictions nest (Vegetarian ⊂ Vegan ⊂ Jain) and
//!    violations accumulate across the requested set.
//! 2. **Government standards** (`standards`): threshold tables keyed by
//!    standard, age group and meal type. Each breached threshold emits a
//!    violation code and a fixed, named penalty against the starting score.
//!
//! ## Submodules
//! - **`rules`**: Dietary restriction predicates.
//! - **`standards`**: Threshold tables, penalties, pass score.
//! - **`types`**: Restrictions, standards, violation codes, result shape.

pub mod rules;
pub mod standards;
pub mod types;
