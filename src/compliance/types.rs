use serde::{Deserialize, Serialize};

/// Dietary restriction rule sets, ordered from least to most restrictive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DietaryRestriction {
    Vegetarian,
    Vegan,
    Jain,
}

/// Government nutrition standard to validate against.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GovernmentStandard {
    IndianGovernment,
    WhoRecommendations,
}

/// Closed violation vocabulary shared by both rule families.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ViolationCode {
    ContainsMeat,
    ContainsFish,
    ContainsPoultry,
    ContainsDairy,
    ContainsEggs,
    ContainsRootVegetables,
    ContainsAllium,
    InsufficientCalories,
    InsufficientProtein,
    ExcessiveSodium,
    ExcessiveSugar,
    InsufficientFiber,
}

/// Outcome of a dietary or government compliance check.
///
/// `score` is meaningful for government checks (starts at 100, fixed penalty
/// per violation type); dietary checks report 100 when compliant, 0 otherwise.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceResult {
    pub compliant: bool,
    pub violations: Vec<ViolationCode>,
    pub recommendations: Vec<String>,
    pub score: f64,
}
