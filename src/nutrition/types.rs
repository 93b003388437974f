use crate::allergen::types::Allergen;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Per-serving nutrient record for an ingredient or a whole menu item.
///
/// The four macros are required; everything else is optional and treated as
/// "zero contribution" when absent. Negative macro values mark the record as
/// malformed (see `has_valid_macros`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NutrientProfile {
    pub calories: f64,
    pub protein: f64,
    pub carbohydrates: f64,
    pub fat: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fiber: Option<f64>,
    /// Milligrams.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sodium: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sugar: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturated_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trans_fat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub glycemic_index: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vitamins: Option<HashMap<String, f64>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minerals: Option<HashMap<String, f64>>,
}

impl NutrientProfile {
    /// A record is usable for aggregation only when every macro is a
    /// non-negative finite number. Anything else counts as missing data.
    pub fn has_valid_macros(&self) -> bool {
        [self.calories, self.protein, self.carbohydrates, self.fat]
            .iter()
            .all(|v| v.is_finite() && *v >= 0.0)
    }
}

/// Broad ingredient classification used by the dietary rule tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IngredientCategory {
    Meat,
    Fish,
    Poultry,
    Dairy,
    Eggs,
    Vegetable,
    Fruit,
    Grain,
    Legume,
    /// Onion/garlic family, relevant for Jain compliance.
    Allium,
    Oil,
    Spice,
    Other,
}

/// Finer classification; `BelowGround` marks root vegetables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IngredientSubCategory {
    BelowGround,
    AboveGround,
    Leafy,
    Other,
}

/// Whether the kitchen preparing the item is shared with other product lines.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Facility {
    Shared,
    Dedicated,
}

/// Equipment provenance. A shared grinder is the classic tree-nut/peanut
/// cross-contamination vector and is tracked separately from generic sharing.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Equipment {
    SharedGrinder,
    Shared,
    Dedicated,
}

/// Kitchen metadata attached to a menu item, used for contamination-risk
/// derivation. Absent fields mean "unknown", not "dedicated".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PreparationMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facility: Option<Facility>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub equipment: Option<Equipment>,
}

/// A single ingredient of a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quantity: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_value: Option<NutrientProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allergens: Option<Vec<Allergen>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<IngredientCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sub_category: Option<IngredientSubCategory>,
}

impl Ingredient {
    /// Bare-bones constructor used heavily in tests and by callers that only
    /// know the ingredient name.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            quantity: None,
            nutritional_value: None,
            allergens: None,
            category: None,
            sub_category: None,
        }
    }
}

/// Meal slot the item is served in. Government thresholds scale per slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum MealType {
    Breakfast,
    Lunch,
    Snack,
    Dinner,
}

/// Student age bucket. Which government minimums apply depends on this.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AgeGroup {
    #[serde(rename = "3-5")]
    Age3To5,
    #[serde(rename = "6-10")]
    Age6To10,
    #[serde(rename = "11-13")]
    Age11To13,
    #[serde(rename = "14-18")]
    Age14To18,
}

impl AgeGroup {
    /// Bucket for a raw age in years.
    pub fn for_age(age: u8) -> Self {
        match age {
            0..=5 => Self::Age3To5,
            6..=10 => Self::Age6To10,
            11..=13 => Self::Age11To13,
            _ => Self::Age14To18,
        }
    }
}

/// A menu item as loaded by the caller. Immutable input to every analysis;
/// the engine never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    /// Pre-aggregated nutrition, used when ingredient-level detail is absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nutritional_info: Option<NutrientProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dietary_tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_type: Option<MealType>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_group: Option<AgeGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preparation: Option<PreparationMetadata>,
}

impl MenuItem {
    pub fn new(id: &str, name: &str, ingredients: Vec<Ingredient>) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            ingredients,
            nutritional_info: None,
            dietary_tags: None,
            meal_type: None,
            age_group: None,
            preparation: None,
        }
    }
}

/// Calorie-weighted macro split. Percentages sum to ~100 when calories > 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MacroDistribution {
    pub protein_pct: f64,
    pub carbohydrate_pct: f64,
    pub fat_pct: f64,
}

/// Output of `aggregator::aggregate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedNutrition {
    pub totals: NutrientProfile,
    /// Micronutrient richness relative to caloric load, in [0, 1).
    pub density: f64,
    /// Share of ingredients carrying a valid macro profile, 0..=100.
    pub completeness: f64,
    /// Names of ingredients that contributed no nutrient data.
    pub missing: Vec<String>,
}

/// Helper to get the current system time in milliseconds.
pub fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
