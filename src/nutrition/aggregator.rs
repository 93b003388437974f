//! Summation and normalization of per-ingredient nutrient records.

use super::types::{AggregatedNutrition, Ingredient, MacroDistribution, NutrientProfile};
use std::collections::HashMap;

/// Calories per gram, used for the calorie-weighted macro split.
const KCAL_PER_G_PROTEIN: f64 = 4.0;
const KCAL_PER_G_CARBS: f64 = 4.0;
const KCAL_PER_G_FAT: f64 = 9.0;

/// Target macro split (% of calories) considered balanced for school meals.
const IDEAL_PROTEIN_PCT: f64 = 20.0;
const IDEAL_CARBS_PCT: f64 = 55.0;
const IDEAL_FAT_PCT: f64 = 25.0;

/// Sums ingredient nutrient records into menu-item totals.
///
/// Ingredients without a valid macro profile contribute zero to every total
/// and are reported in `missing`; they lower `completeness` instead of
/// producing an error. An empty ingredient list yields zero totals and
/// completeness 0.
pub fn aggregate(ingredients: &[Ingredient]) -> AggregatedNutrition {
    let mut totals = NutrientProfile::default();
    let mut vitamins: HashMap<String, f64> = HashMap::new();
    let mut minerals: HashMap<String, f64> = HashMap::new();
    let mut missing = Vec::new();
    let mut complete = 0usize;

    for ingredient in ingredients {
        let profile = match &ingredient.nutritional_value {
            Some(p) if p.has_valid_macros() => p,
            _ => {
                missing.push(ingredient.name.clone());
                continue;
            }
        };

        complete += 1;
        totals.calories += profile.calories;
        totals.protein += profile.protein;
        totals.carbohydrates += profile.carbohydrates;
        totals.fat += profile.fat;

        add_optional(&mut totals.fiber, profile.fiber);
        add_optional(&mut totals.sodium, profile.sodium);
        add_optional(&mut totals.sugar, profile.sugar);
        add_optional(&mut totals.saturated_fat, profile.saturated_fat);
        add_optional(&mut totals.trans_fat, profile.trans_fat);

        if let Some(map) = &profile.vitamins {
            merge_map(&mut vitamins, map);
        }
        if let Some(map) = &profile.minerals {
            merge_map(&mut minerals, map);
        }
    }

    if !vitamins.is_empty() {
        totals.vitamins = Some(vitamins);
    }
    if !minerals.is_empty() {
        totals.minerals = Some(minerals);
    }

    let completeness = if ingredients.is_empty() {
        0.0
    } else {
        complete as f64 / ingredients.len() as f64 * 100.0
    };

    let density = nutritional_density(&totals);

    AggregatedNutrition {
        totals,
        density,
        completeness,
        missing,
    }
}

/// Micronutrient richness relative to caloric load, mapped into [0, 1).
///
/// Monotonic in total vitamin/mineral mass and inverse in calories, so a
/// nutrient-dense low-calorie item (spinach) ranks above a calorie-dense
/// low-micronutrient one (refined flour).
pub fn nutritional_density(profile: &NutrientProfile) -> f64 {
    let micro_total: f64 = profile
        .vitamins
        .iter()
        .chain(profile.minerals.iter())
        .flat_map(|map| map.values())
        .sum();

    if micro_total <= 0.0 {
        return 0.0;
    }

    let per_calorie = micro_total / profile.calories.max(1.0);
    per_calorie / (per_calorie + 1.0)
}

/// Calorie-weighted macro percentages.
///
/// Weighted by 4/4/9 kcal per gram and normalized over the macro-derived
/// calories, so the three percentages sum to ~100 whenever any macro is
/// present. A zero profile yields all zeros.
pub fn macro_distribution(profile: &NutrientProfile) -> MacroDistribution {
    let protein_kcal = profile.protein * KCAL_PER_G_PROTEIN;
    let carbs_kcal = profile.carbohydrates * KCAL_PER_G_CARBS;
    let fat_kcal = profile.fat * KCAL_PER_G_FAT;
    let total = protein_kcal + carbs_kcal + fat_kcal;

    if total <= 0.0 {
        return MacroDistribution::default();
    }

    MacroDistribution {
        protein_pct: protein_kcal / total * 100.0,
        carbohydrate_pct: carbs_kcal / total * 100.0,
        fat_pct: fat_kcal / total * 100.0,
    }
}

/// Distance-from-ideal macro balance, 0..=100 (100 = perfectly balanced).
pub fn macro_balance_score(distribution: &MacroDistribution) -> f64 {
    let deviation = (distribution.protein_pct - IDEAL_PROTEIN_PCT).abs()
        + (distribution.carbohydrate_pct - IDEAL_CARBS_PCT).abs()
        + (distribution.fat_pct - IDEAL_FAT_PCT).abs();

    (100.0 - deviation).max(0.0)
}

fn add_optional(total: &mut Option<f64>, contribution: Option<f64>) {
    if let Some(value) = contribution
        && value.is_finite()
        && value >= 0.0
    {
        *total = Some(total.unwrap_or(0.0) + value);
    }
}

fn merge_map(total: &mut HashMap<String, f64>, contribution: &HashMap<String, f64>) {
    for (key, value) in contribution {
        if value.is_finite() && *value >= 0.0 {
            *total.entry(key.clone()).or_insert(0.0) += value;
        }
    }
}
