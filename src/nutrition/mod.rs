//! Nutrient Aggregation Module
//!
//! Owns the canonical nutrient data model and the aggregation pipeline that
//! turns a list of per-ingredient nutrient records into menu-item totals.
//!
//! ## Overview
//! Menu items arrive with uneven data quality: some ingredients carry a full
//! nutrient profile, some carry nothing. Aggregation is total over that input:
//! missing profiles contribute zero to the sums and lower the completeness
//! figure instead of failing the request.
//!
//! ## Submodules
//! - **`aggregator`**: Summation, micronutrient merging, density and completeness.
//! - **`types`**: Nutrient profiles, ingredients, menu items and their enums.

pub mod aggregator;
pub mod types;
