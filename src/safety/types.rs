use crate::allergen::types::{Allergen, AllergySeverity};
use crate::compliance::types::DietaryRestriction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Diagnosed conditions that constrain what a student can safely eat.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HealthCondition {
    Diabetes,
    Hypertension,
    CeliacDisease,
}

/// Daily targets from the student's nutrition plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutritionalNeeds {
    pub daily_calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Everything the engine knows about one student. External input, never
/// mutated by any check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentNutritionalProfile {
    pub student_id: String,
    pub age: u8,
    #[serde(default)]
    pub allergens: Vec<Allergen>,
    #[serde(default)]
    pub allergy_severity: HashMap<Allergen, AllergySeverity>,
    #[serde(default)]
    pub dietary_restrictions: Vec<DietaryRestriction>,
    #[serde(default)]
    pub health_conditions: Vec<HealthCondition>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_needs: Option<NutritionalNeeds>,
}

/// Verdict for a single safety dimension.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyStatus {
    Safe,
    Unsafe,
}

/// Overall verdict across the three dimensions.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SafetyVerdict {
    Safe,
    Caution,
    Dangerous,
}

/// Directives for staff when a Dangerous verdict is returned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmergencyAction {
    CallEmergency,
    AdministerEpiPen,
    NotifySchoolNurse,
    NotifyGuardian,
}

/// Payload accompanying Dangerous verdicts. The engine builds it; delivering
/// the alert (push/SMS/call) belongs to the caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmergencyProtocol {
    /// True when the student's medication list names an epinephrine
    /// auto-injector.
    pub requires_epi_pen: bool,
    pub immediate_actions: Vec<EmergencyAction>,
}

/// Result of `SafetyAssessor::comprehensive_check`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SafetyReport {
    pub overall_safety: SafetyVerdict,
    pub allergen_safety: SafetyStatus,
    pub dietary_safety: SafetyStatus,
    pub medical_safety: SafetyStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emergency_protocol: Option<EmergencyProtocol>,
    pub recommendations: Vec<String>,
    /// Ids of candidate items safe for this student, best-scoring first.
    pub alternative_items: Vec<String>,
}
