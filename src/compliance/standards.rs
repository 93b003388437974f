//! Government-standard threshold tables and scoring.
//!
//! Tables are lunch-calibrated per (standard, age group) and scaled by a
//! per-meal factor. Every tunable is a named constant so rule changes are a
//! one-line diff and each number is independently testable.

use super::types::{ComplianceResult, GovernmentStandard, ViolationCode};
use crate::nutrition::aggregator;
use crate::nutrition::types::{AgeGroup, MealType, MenuItem, NutrientProfile};

/// Score each government check starts from.
pub const STARTING_SCORE: f64 = 100.0;
/// Minimum score for a meal to pass (alongside zero violations).
pub const PASS_SCORE: f64 = 70.0;

/// Fixed penalty per violation type.
pub const CALORIE_SHORTFALL_PENALTY: f64 = 15.0;
pub const PROTEIN_SHORTFALL_PENALTY: f64 = 10.0;
pub const SODIUM_EXCESS_PENALTY: f64 = 20.0;
pub const SUGAR_EXCESS_PENALTY: f64 = 10.0;
pub const FIBER_SHORTFALL_PENALTY: f64 = 5.0;

/// Lunch-calibrated nutrient bounds for one (standard, age group) cell.
#[derive(Debug, Clone, Copy)]
pub struct NutrientThresholds {
    pub min_calories: f64,
    pub min_protein: f64,
    /// Milligrams.
    pub max_sodium: f64,
    pub max_sugar: f64,
    pub min_fiber: f64,
}

impl MealType {
    /// Share of the lunch-calibrated thresholds this meal slot carries.
    pub fn threshold_factor(&self) -> f64 {
        match self {
            MealType::Breakfast => 0.75,
            MealType::Lunch => 1.0,
            MealType::Snack => 0.4,
            MealType::Dinner => 0.9,
        }
    }
}

/// Threshold table lookup. Younger buckets require fewer calories, so the
/// same meal can pass for 6-10 and fail for 14-18.
pub fn thresholds_for(
    standard: GovernmentStandard,
    age_group: AgeGroup,
    meal_type: MealType,
) -> NutrientThresholds {
    let base = match (standard, age_group) {
        (GovernmentStandard::IndianGovernment, AgeGroup::Age3To5) => NutrientThresholds {
            min_calories: 300.0,
            min_protein: 8.0,
            max_sodium: 400.0,
            max_sugar: 15.0,
            min_fiber: 3.0,
        },
        (GovernmentStandard::IndianGovernment, AgeGroup::Age6To10) => NutrientThresholds {
            min_calories: 400.0,
            min_protein: 12.0,
            max_sodium: 600.0,
            max_sugar: 20.0,
            min_fiber: 4.0,
        },
        (GovernmentStandard::IndianGovernment, AgeGroup::Age11To13) => NutrientThresholds {
            min_calories: 550.0,
            min_protein: 18.0,
            max_sodium: 800.0,
            max_sugar: 25.0,
            min_fiber: 5.0,
        },
        (GovernmentStandard::IndianGovernment, AgeGroup::Age14To18) => NutrientThresholds {
            min_calories: 700.0,
            min_protein: 25.0,
            max_sodium: 1000.0,
            max_sugar: 30.0,
            min_fiber: 6.0,
        },
        (GovernmentStandard::WhoRecommendations, AgeGroup::Age3To5) => NutrientThresholds {
            min_calories: 350.0,
            min_protein: 10.0,
            max_sodium: 500.0,
            max_sugar: 12.0,
            min_fiber: 4.0,
        },
        (GovernmentStandard::WhoRecommendations, AgeGroup::Age6To10) => NutrientThresholds {
            min_calories: 450.0,
            min_protein: 15.0,
            max_sodium: 600.0,
            max_sugar: 18.0,
            min_fiber: 5.0,
        },
        (GovernmentStandard::WhoRecommendations, AgeGroup::Age11To13) => NutrientThresholds {
            min_calories: 600.0,
            min_protein: 20.0,
            max_sodium: 700.0,
            max_sugar: 22.0,
            min_fiber: 6.0,
        },
        (GovernmentStandard::WhoRecommendations, AgeGroup::Age14To18) => NutrientThresholds {
            min_calories: 750.0,
            min_protein: 28.0,
            max_sodium: 800.0,
            max_sugar: 25.0,
            min_fiber: 8.0,
        },
    };

    let factor = meal_type.threshold_factor();
    NutrientThresholds {
        min_calories: base.min_calories * factor,
        min_protein: base.min_protein * factor,
        max_sodium: base.max_sodium * factor,
        max_sugar: base.max_sugar * factor,
        min_fiber: base.min_fiber * factor,
    }
}

/// Validates a menu item against one government standard.
///
/// Uses the item's aggregated ingredient totals when ingredient detail is
/// present, otherwise falls back to the pre-aggregated `nutritional_info`.
/// Missing optional nutrients (sodium, sugar, fiber) are not penalized: the
/// check only fires on data the item actually carries, except fiber where an
/// absent value counts as zero (a school lunch with no recorded fiber is a
/// real finding, not a data gap).
pub fn check_government(item: &MenuItem, standard: GovernmentStandard) -> ComplianceResult {
    let profile = effective_profile(item);
    let age_group = item.age_group.unwrap_or(AgeGroup::Age6To10);
    let meal_type = item.meal_type.unwrap_or(MealType::Lunch);
    let thresholds = thresholds_for(standard, age_group, meal_type);

    let mut violations = Vec::new();
    let mut recommendations = Vec::new();
    let mut score = STARTING_SCORE;

    if profile.calories < thresholds.min_calories {
        violations.push(ViolationCode::InsufficientCalories);
        score -= CALORIE_SHORTFALL_PENALTY;
        recommendations.push(format!(
            "Increase calories to at least {:.0} kcal for this age group",
            thresholds.min_calories
        ));
    }

    if profile.protein < thresholds.min_protein {
        violations.push(ViolationCode::InsufficientProtein);
        score -= PROTEIN_SHORTFALL_PENALTY;
        recommendations.push(format!(
            "Add a protein source to reach {:.0} g",
            thresholds.min_protein
        ));
    }

    if let Some(sodium) = profile.sodium
        && sodium > thresholds.max_sodium
    {
        violations.push(ViolationCode::ExcessiveSodium);
        score -= SODIUM_EXCESS_PENALTY;
        recommendations.push(format!(
            "Reduce sodium below {:.0} mg",
            thresholds.max_sodium
        ));
    }

    if let Some(sugar) = profile.sugar
        && sugar > thresholds.max_sugar
    {
        violations.push(ViolationCode::ExcessiveSugar);
        score -= SUGAR_EXCESS_PENALTY;
        recommendations.push(format!("Reduce sugar below {:.0} g", thresholds.max_sugar));
    }

    if profile.fiber.unwrap_or(0.0) < thresholds.min_fiber {
        violations.push(ViolationCode::InsufficientFiber);
        score -= FIBER_SHORTFALL_PENALTY;
        recommendations.push(format!(
            "Include whole grains or vegetables for {:.0} g fiber",
            thresholds.min_fiber
        ));
    }

    let score = score.max(0.0);
    ComplianceResult {
        compliant: violations.is_empty() && score >= PASS_SCORE,
        violations,
        recommendations,
        score,
    }
}

/// Ingredient totals when available, pre-aggregated info otherwise.
pub fn effective_profile(item: &MenuItem) -> NutrientProfile {
    if !item.ingredients.is_empty() {
        let aggregated = aggregator::aggregate(&item.ingredients);
        if aggregated.completeness > 0.0 {
            return aggregated.totals;
        }
    }
    item.nutritional_info.clone().unwrap_or_default()
}
