//! Safety Assessor Tests
//!
//! Validates the three-dimension verdict fold, emergency protocol payloads,
//! and alternative-item suggestion.
//!
//! ## Test Scopes
//! - **Verdicts**: Safe / Caution / Dangerous derivation rules.
//! - **Emergency**: EpiPen detection and CALL_EMERGENCY directive.
//! - **Medical**: Diabetes and hypertension thresholds.
//! - **Alternatives**: Filtering, ordering, caps, empty results.

#[cfg(test)]
mod tests {
    use crate::allergen::types::{Allergen, AllergySeverity};
    use crate::compliance::types::DietaryRestriction;
    use crate::nutrition::types::{
        Equipment, Ingredient, IngredientCategory, MenuItem, NutrientProfile,
        PreparationMetadata,
    };
    use crate::safety::assessor::{SafetyAssessor, SafetyConfig};
    use crate::safety::types::{
        EmergencyAction, HealthCondition, SafetyStatus, SafetyVerdict,
        StudentNutritionalProfile,
    };
    use std::collections::HashMap;

    fn assessor() -> SafetyAssessor {
        SafetyAssessor::new(SafetyConfig::default())
    }

    fn allergen_ingredient(name: &str, allergens: Vec<Allergen>) -> Ingredient {
        Ingredient {
            allergens: Some(allergens),
            ..Ingredient::named(name)
        }
    }

    fn peanut_item() -> MenuItem {
        MenuItem::new(
            "peanut-butter-toast",
            "Peanut Butter Toast",
            vec![
                allergen_ingredient("peanut butter", vec![Allergen::Peanuts]),
                allergen_ingredient("bread", vec![Allergen::Wheat]),
            ],
        )
    }

    fn plain_item(id: &str) -> MenuItem {
        let mut item = MenuItem::new(id, id, vec![Ingredient::named("rice")]);
        item.nutritional_info = Some(NutrientProfile {
            calories: 200.0,
            protein: 10.0,
            carbohydrates: 28.0,
            fat: 5.0,
            ..Default::default()
        });
        item
    }

    fn student(allergens: Vec<Allergen>) -> StudentNutritionalProfile {
        StudentNutritionalProfile {
            student_id: "s-100".to_string(),
            age: 9,
            allergens,
            allergy_severity: HashMap::new(),
            dietary_restrictions: vec![],
            health_conditions: vec![],
            medications: vec![],
            nutritional_needs: None,
        }
    }

    // ============================================================
    // VERDICT TESTS
    // ============================================================

    #[test]
    fn test_all_dimensions_safe() {
        let report = assessor().comprehensive_check(&plain_item("rice"), &student(vec![]), &[]);

        assert_eq!(report.overall_safety, SafetyVerdict::Safe);
        assert_eq!(report.allergen_safety, SafetyStatus::Safe);
        assert_eq!(report.dietary_safety, SafetyStatus::Safe);
        assert_eq!(report.medical_safety, SafetyStatus::Safe);
        assert!(report.emergency_protocol.is_none());
    }

    #[test]
    fn test_life_threatening_allergen_is_dangerous() {
        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::LifeThreatening);

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[]);

        assert_eq!(report.overall_safety, SafetyVerdict::Dangerous);
        assert!(report.emergency_protocol.is_some());
    }

    #[test]
    fn test_moderate_allergen_is_caution() {
        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::Moderate);

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[]);

        assert_eq!(report.overall_safety, SafetyVerdict::Caution);
        assert!(report.emergency_protocol.is_none());
    }

    #[test]
    fn test_high_contamination_with_severe_allergy_is_dangerous() {
        // Shared grinder + peanuts + tree nuts => High contamination risk
        let mut item = MenuItem::new(
            "nut-laddu",
            "Nut Laddu",
            vec![
                allergen_ingredient("peanuts", vec![Allergen::Peanuts]),
                allergen_ingredient("cashews", vec![Allergen::TreeNuts]),
            ],
        );
        item.preparation = Some(PreparationMetadata {
            facility: None,
            equipment: Some(Equipment::SharedGrinder),
        });

        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::Severe);

        let report = assessor().comprehensive_check(&item, &profile, &[]);

        assert_eq!(report.overall_safety, SafetyVerdict::Dangerous);
    }

    #[test]
    fn test_dietary_violation_is_caution() {
        let meat = Ingredient {
            category: Some(IngredientCategory::Meat),
            ..Ingredient::named("mutton")
        };
        let item = MenuItem::new("curry", "Mutton Curry", vec![meat]);
        let mut profile = student(vec![]);
        profile.dietary_restrictions = vec![DietaryRestriction::Vegetarian];

        let report = assessor().comprehensive_check(&item, &profile, &[]);

        assert_eq!(report.overall_safety, SafetyVerdict::Caution);
        assert_eq!(report.dietary_safety, SafetyStatus::Unsafe);
        assert_eq!(report.allergen_safety, SafetyStatus::Safe);
    }

    // ============================================================
    // EMERGENCY PROTOCOL TESTS
    // ============================================================

    #[test]
    fn test_emergency_protocol_includes_call_emergency() {
        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::LifeThreatening);

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[]);
        let protocol = report.emergency_protocol.expect("protocol populated");

        assert!(
            protocol
                .immediate_actions
                .contains(&EmergencyAction::CallEmergency)
        );
    }

    #[test]
    fn test_epi_pen_detected_from_medications() {
        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::LifeThreatening);
        profile.medications = vec!["EpiPen Jr 0.15mg".to_string()];

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[]);
        let protocol = report.emergency_protocol.expect("protocol populated");

        assert!(protocol.requires_epi_pen);
        assert!(
            protocol
                .immediate_actions
                .contains(&EmergencyAction::AdministerEpiPen)
        );
    }

    #[test]
    fn test_no_epi_pen_without_matching_medication() {
        let mut profile = student(vec![Allergen::Peanuts]);
        profile
            .allergy_severity
            .insert(Allergen::Peanuts, AllergySeverity::LifeThreatening);
        profile.medications = vec!["Cetirizine".to_string()];

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[]);
        let protocol = report.emergency_protocol.expect("protocol populated");

        assert!(!protocol.requires_epi_pen);
        assert!(
            !protocol
                .immediate_actions
                .contains(&EmergencyAction::AdministerEpiPen)
        );
    }

    // ============================================================
    // MEDICAL DIMENSION TESTS
    // ============================================================

    #[test]
    fn test_diabetes_flags_high_glycemic_index() {
        let mut item = plain_item("sweet");
        item.nutritional_info.as_mut().unwrap().glycemic_index = Some(85.0);
        let mut profile = student(vec![]);
        profile.health_conditions = vec![HealthCondition::Diabetes];

        let report = assessor().comprehensive_check(&item, &profile, &[]);

        assert_eq!(report.medical_safety, SafetyStatus::Unsafe);
        assert_eq!(report.overall_safety, SafetyVerdict::Caution);
    }

    #[test]
    fn test_hypertension_flags_high_sodium() {
        let mut item = plain_item("salty");
        item.nutritional_info.as_mut().unwrap().sodium = Some(1200.0);
        let mut profile = student(vec![]);
        profile.health_conditions = vec![HealthCondition::Hypertension];

        let report = assessor().comprehensive_check(&item, &profile, &[]);

        assert_eq!(report.medical_safety, SafetyStatus::Unsafe);
    }

    #[test]
    fn test_conditions_ignore_other_items() {
        // High sodium without hypertension stays safe
        let mut item = plain_item("salty");
        item.nutritional_info.as_mut().unwrap().sodium = Some(1200.0);

        let report = assessor().comprehensive_check(&item, &student(vec![]), &[]);

        assert_eq!(report.medical_safety, SafetyStatus::Safe);
    }

    // ============================================================
    // ALTERNATIVE SUGGESTION TESTS
    // ============================================================

    #[test]
    fn test_exactly_one_alternative_for_peanut_allergy() {
        let profile = student(vec![Allergen::Peanuts]);
        let candidates = vec![peanut_item(), plain_item("veg-pulao")];

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &candidates);

        assert_eq!(report.alternative_items, vec!["veg-pulao".to_string()]);
    }

    #[test]
    fn test_no_alternatives_is_valid_result() {
        let profile = student(vec![Allergen::Peanuts]);

        let report = assessor().comprehensive_check(&peanut_item(), &profile, &[peanut_item()]);

        assert!(report.alternative_items.is_empty());
    }

    #[test]
    fn test_alternatives_capped_by_config() {
        let config = SafetyConfig {
            max_alternatives: 1,
            ..SafetyConfig::default()
        };
        let assessor = SafetyAssessor::new(config);
        let profile = student(vec![]);
        let candidates = vec![plain_item("a"), plain_item("b"), plain_item("c")];

        let alternatives = assessor.suggest_alternatives(&profile, &candidates);

        assert_eq!(alternatives.len(), 1);
    }

    #[test]
    fn test_alternatives_ordered_by_score_descending() {
        let balanced = plain_item("balanced");

        let mut skewed = plain_item("skewed");
        skewed.nutritional_info = Some(NutrientProfile {
            calories: 400.0,
            protein: 1.0,
            carbohydrates: 2.0,
            fat: 44.0,
            ..Default::default()
        });

        let alternatives =
            assessor().suggest_alternatives(&student(vec![]), &[skewed, balanced]);

        assert_eq!(alternatives[0], "balanced");
    }

    #[test]
    fn test_alternatives_respect_dietary_restrictions() {
        let meat = Ingredient {
            category: Some(IngredientCategory::Meat),
            ..Ingredient::named("mutton")
        };
        let meat_item = MenuItem::new("meat", "Meat", vec![meat]);
        let mut profile = student(vec![]);
        profile.dietary_restrictions = vec![DietaryRestriction::Vegetarian];

        let alternatives =
            assessor().suggest_alternatives(&profile, &[meat_item, plain_item("rice")]);

        assert_eq!(alternatives, vec!["rice".to_string()]);
    }
}
