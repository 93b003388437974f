use crate::allergen::types::AllergenInfo;
use crate::compliance::types::{ComplianceResult, DietaryRestriction};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Warning appended whenever an analysis ran on partial nutrient data.
pub const WARNING_INCOMPLETE_DATA: &str = "INCOMPLETE_NUTRITIONAL_DATA";

/// Macro totals carried on the analysis aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Macronutrients {
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
}

/// Merged micronutrient maps carried on the analysis aggregate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Micronutrients {
    #[serde(default)]
    pub vitamins: HashMap<String, f64>,
    #[serde(default)]
    pub minerals: HashMap<String, f64>,
}

/// Both government checks, run on every analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernmentCompliance {
    pub indian_standards: ComplianceResult,
    pub who_guidelines: ComplianceResult,
}

/// Score-to-rating mapping, fixed breakpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthRating {
    Excellent,
    Good,
    Average,
    Poor,
}

/// The root analysis aggregate. Produced once per request, read-only
/// thereafter, never persisted as mutable state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionalAnalysis {
    pub menu_item_id: String,
    pub total_calories: f64,
    pub macronutrients: Macronutrients,
    pub micronutrients: Micronutrients,
    pub allergens: AllergenInfo,
    pub dietary_compliance: ComplianceResult,
    pub government_compliance: GovernmentCompliance,
    /// Weighted composite, 0..=100.
    pub nutrition_score: f64,
    pub health_rating: HealthRating,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    /// Share of ingredients with usable macro data, 0..=100.
    pub data_completeness: f64,
    /// Trust in the result, 0..=1, degraded by missing data.
    pub confidence: f64,
    /// Epoch milliseconds.
    pub analysis_timestamp: u64,
}

/// One failed item inside a batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchItemError {
    pub menu_item_id: String,
    pub error: String,
}

/// Batch result shape; field names match the existing caller contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchAnalysisResult {
    pub results: Vec<NutritionalAnalysis>,
    pub total_processed: usize,
    pub errors: Vec<BatchItemError>,
    pub processing_time_ms: f64,
}

/// Menu partition for one student profile.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuPartition {
    /// Ids of items safe for the student.
    pub recommended: Vec<String>,
    /// Ids with an allergen conflict or dietary non-compliance.
    pub avoid: Vec<String>,
}

/// Issue categories for menu-wide improvement scanning.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MenuIssueKind {
    LowProtein,
    HighSugar,
    LowFiber,
    LowMicronutrientDensity,
}

/// One suggestion per detected issue category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuSuggestion {
    #[serde(rename = "type")]
    pub kind: MenuIssueKind,
    pub message: String,
}

/// Output of `suggest_menu_improvements`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuImprovementReport {
    pub issues: Vec<String>,
    pub suggestions: Vec<MenuSuggestion>,
    /// 0..=100; grows with the number of detected issue categories.
    pub priority_score: f64,
}

/// Construction-time tunables for the orchestrator.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Restrictions applied by `analyze` when the caller supplies none.
    pub default_restrictions: Vec<DietaryRestriction>,
    /// Concurrency cap for batch fan-out.
    pub batch_concurrency: usize,
    /// TTL for cached analyses.
    pub cache_ttl: Duration,
    /// Composite score weights; must sum to 1.
    pub macro_balance_weight: f64,
    pub density_weight: f64,
    pub violation_weight: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_restrictions: Vec::new(),
            batch_concurrency: 16,
            cache_ttl: Duration::from_secs(300),
            macro_balance_weight: 0.4,
            density_weight: 0.2,
            violation_weight: 0.4,
        }
    }
}
