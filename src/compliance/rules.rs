//! Dietary restriction predicates.
//!
//! Each restriction is a pure function of ingredient categories, allergen
//! declarations and sub-categories. An item can violate several restrictions
//! at once; callers get the accumulated, deduplicated violation list.

use super::types::{ComplianceResult, DietaryRestriction, ViolationCode};
use crate::allergen::types::Allergen;
use crate::nutrition::types::{
    Ingredient, IngredientCategory, IngredientSubCategory, MenuItem,
};

/// Evaluates the requested restrictions against a menu item.
///
/// Violations accumulate across restrictions and are deduplicated;
/// `compliant` iff the list ends up empty. Calling twice with identical
/// inputs yields identical results (no hidden state).
pub fn check_dietary(item: &MenuItem, restrictions: &[DietaryRestriction]) -> ComplianceResult {
    let mut violations: Vec<ViolationCode> = Vec::new();

    for restriction in restrictions {
        for code in violations_for(item, *restriction) {
            if !violations.contains(&code) {
                violations.push(code);
            }
        }
    }

    let compliant = violations.is_empty();
    let recommendations = violations.iter().map(recommendation_for).collect();

    ComplianceResult {
        compliant,
        violations,
        recommendations,
        score: if compliant { 100.0 } else { 0.0 },
    }
}

fn violations_for(item: &MenuItem, restriction: DietaryRestriction) -> Vec<ViolationCode> {
    let mut codes = Vec::new();

    // Vegetarian baseline applies to all three restrictions
    for ingredient in &item.ingredients {
        match ingredient.category {
            Some(IngredientCategory::Meat) => push_unique(&mut codes, ViolationCode::ContainsMeat),
            Some(IngredientCategory::Fish) => push_unique(&mut codes, ViolationCode::ContainsFish),
            Some(IngredientCategory::Poultry) => {
                push_unique(&mut codes, ViolationCode::ContainsPoultry)
            }
            _ => {}
        }
    }

    if matches!(
        restriction,
        DietaryRestriction::Vegan | DietaryRestriction::Jain
    ) {
        for ingredient in &item.ingredients {
            if is_dairy(ingredient) {
                push_unique(&mut codes, ViolationCode::ContainsDairy);
            }
            if is_egg(ingredient) {
                push_unique(&mut codes, ViolationCode::ContainsEggs);
            }
        }
    }

    if restriction == DietaryRestriction::Jain {
        for ingredient in &item.ingredients {
            if ingredient.sub_category == Some(IngredientSubCategory::BelowGround) {
                push_unique(&mut codes, ViolationCode::ContainsRootVegetables);
            }
            if ingredient.category == Some(IngredientCategory::Allium) {
                push_unique(&mut codes, ViolationCode::ContainsAllium);
            }
        }
    }

    codes
}

fn is_dairy(ingredient: &Ingredient) -> bool {
    ingredient.category == Some(IngredientCategory::Dairy)
        || declares(ingredient, Allergen::Dairy)
        || declares(ingredient, Allergen::Milk)
}

fn is_egg(ingredient: &Ingredient) -> bool {
    ingredient.category == Some(IngredientCategory::Eggs) || declares(ingredient, Allergen::Eggs)
}

fn declares(ingredient: &Ingredient, allergen: Allergen) -> bool {
    ingredient
        .allergens
        .as_ref()
        .is_some_and(|list| list.contains(&allergen))
}

fn push_unique(codes: &mut Vec<ViolationCode>, code: ViolationCode) {
    if !codes.contains(&code) {
        codes.push(code);
    }
}

fn recommendation_for(code: &ViolationCode) -> String {
    match code {
        ViolationCode::ContainsMeat => "Replace meat with a plant-protein source".to_string(),
        ViolationCode::ContainsFish => "Remove fish or offer a separate preparation".to_string(),
        ViolationCode::ContainsPoultry => "Substitute poultry with paneer or legumes".to_string(),
        ViolationCode::ContainsDairy => "Use a plant-based milk or ghee substitute".to_string(),
        ViolationCode::ContainsEggs => "Offer an egg-free binding alternative".to_string(),
        ViolationCode::ContainsRootVegetables => {
            "Swap root vegetables for above-ground produce".to_string()
        }
        ViolationCode::ContainsAllium => "Omit onion and garlic from the preparation".to_string(),
        other => format!("Address {:?}", other),
    }
}
