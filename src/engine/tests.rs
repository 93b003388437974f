//! Orchestrator Tests
//!
//! Validates the single-item analysis contract (totals, validation errors,
//! incomplete-data degradation), the batch fan-out (attribution, partial
//! failure, cancellation), cache-aside behavior, and the menu-level helpers.
//!
//! ## Test Scopes
//! - **Analysis**: Totals flow from the aggregator; invalid input fails fast.
//! - **Batch**: Results stay attributed under parallelism; one failure never
//!   aborts siblings.
//! - **Cache**: Second analysis of the same item is served from the cache.
//! - **Menu**: Partitioning and improvement scanning over whole menus.

#[cfg(test)]
mod tests {
    use crate::allergen::types::Allergen;
    use crate::cache::store::TaggedCache;
    use crate::engine::orchestrator::{ComplianceOrchestrator, rating_for};
    use crate::engine::types::{EngineConfig, HealthRating, MenuIssueKind, WARNING_INCOMPLETE_DATA};
    use crate::nutrition::types::{Ingredient, MenuItem, NutrientProfile};
    use crate::safety::types::StudentNutritionalProfile;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    fn profile(calories: f64, protein: f64, carbohydrates: f64, fat: f64) -> NutrientProfile {
        NutrientProfile {
            calories,
            protein,
            carbohydrates,
            fat,
            ..NutrientProfile::default()
        }
    }

    fn ingredient(name: &str, nutrients: NutrientProfile) -> Ingredient {
        Ingredient {
            nutritional_value: Some(nutrients),
            ..Ingredient::named(name)
        }
    }

    fn rice_dal_lunch() -> MenuItem {
        MenuItem::new(
            "lunch-1",
            "Rice and Dal",
            vec![
                ingredient("Steamed Rice", profile(130.0, 3.0, 28.0, 0.3)),
                ingredient("Dal Tadka", profile(116.0, 9.0, 20.0, 0.4)),
            ],
        )
    }

    fn peanut_student() -> StudentNutritionalProfile {
        StudentNutritionalProfile {
            student_id: "student-7".to_string(),
            age: 9,
            allergens: vec![Allergen::Peanuts],
            allergy_severity: HashMap::new(),
            dietary_restrictions: Vec::new(),
            health_conditions: Vec::new(),
            medications: Vec::new(),
            nutritional_needs: None,
        }
    }

    // ============================================================
    // SINGLE-ITEM ANALYSIS TESTS
    // ============================================================

    #[test]
    fn test_analysis_carries_aggregated_totals() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());

        let analysis = orchestrator.analyze(&rice_dal_lunch()).unwrap();

        assert_eq!(analysis.menu_item_id, "lunch-1");
        assert!((analysis.total_calories - 246.0).abs() < 1e-9);
        assert!((analysis.macronutrients.protein - 12.0).abs() < 1e-9);
        assert!((analysis.macronutrients.carbohydrates - 48.0).abs() < 1e-9);
        assert!((analysis.macronutrients.fat - 0.7).abs() < 1e-9);
        assert!((analysis.data_completeness - 100.0).abs() < 1e-9);
        assert!((analysis.confidence - 1.0).abs() < 1e-9);
        assert!(!analysis.warnings.contains(&WARNING_INCOMPLETE_DATA.to_string()));
    }

    #[test]
    fn test_score_and_rating_are_consistent() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());

        let analysis = orchestrator.analyze(&rice_dal_lunch()).unwrap();

        assert!((0.0..=100.0).contains(&analysis.nutrition_score));
        assert_eq!(analysis.health_rating, rating_for(analysis.nutrition_score));
    }

    #[test]
    fn test_empty_id_is_invalid_input() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let item = MenuItem::new("", "Rice", Vec::new());

        let err = orchestrator.analyze(&item).unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_nameless_item_without_data_is_invalid_input() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let item = MenuItem::new("mystery-1", "  ", Vec::new());

        let err = orchestrator.analyze(&item).unwrap_err();
        assert!(err.to_string().contains("Invalid input"));
    }

    #[test]
    fn test_incomplete_data_degrades_instead_of_failing() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let item = MenuItem::new(
            "partial-1",
            "Mixed Plate",
            vec![
                ingredient("Rice", profile(130.0, 3.0, 28.0, 0.3)),
                Ingredient::named("Unlabeled Curry"),
            ],
        );

        let analysis = orchestrator.analyze(&item).unwrap();

        assert!((analysis.data_completeness - 50.0).abs() < 1e-9);
        assert!(analysis.warnings.contains(&WARNING_INCOMPLETE_DATA.to_string()));
        assert!(analysis.warnings.iter().any(|w| w.contains("Unlabeled Curry")));
        assert!(analysis.confidence < 1.0);
        // The one complete ingredient still contributed its totals
        assert!((analysis.total_calories - 130.0).abs() < 1e-9);
    }

    #[test]
    fn test_pre_aggregated_info_fallback() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let mut item = MenuItem::new("info-1", "Packed Meal", Vec::new());
        item.nutritional_info = Some(profile(450.0, 15.0, 60.0, 12.0));

        let analysis = orchestrator.analyze(&item).unwrap();

        assert!((analysis.total_calories - 450.0).abs() < 1e-9);
        assert!((analysis.data_completeness - 100.0).abs() < 1e-9);
        assert!(!analysis.warnings.contains(&WARNING_INCOMPLETE_DATA.to_string()));
    }

    #[test]
    fn test_unlabeled_ingredients_fall_back_to_info_everywhere() {
        // Ingredients present but carrying no macro data: the totals must
        // come from the same pre-aggregated profile the compliance checks
        // were evaluated against, not from the zero-sum aggregation
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let mut item = MenuItem::new(
            "packed-2",
            "Packed Thali",
            vec![Ingredient::named("Mixed Curry")],
        );
        item.nutritional_info = Some(NutrientProfile {
            fiber: Some(5.0),
            sodium: Some(400.0),
            sugar: Some(10.0),
            ..profile(450.0, 15.0, 60.0, 12.0)
        });

        let analysis = orchestrator.analyze(&item).unwrap();

        assert!((analysis.total_calories - 450.0).abs() < 1e-9);
        assert!((analysis.macronutrients.protein - 15.0).abs() < 1e-9);
        assert!(analysis.government_compliance.indian_standards.compliant);
        // Ingredient-level detail is still missing, so confidence degrades
        assert!((analysis.data_completeness - 0.0).abs() < 1e-9);
        assert!(analysis.warnings.contains(&WARNING_INCOMPLETE_DATA.to_string()));
    }

    #[test]
    fn test_recommendations_deduplicated_across_standards() {
        // Indian and WHO share the 600 mg sodium ceiling for 6-10, so both
        // emit the identical recommendation text at non-adjacent positions
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let mut item = MenuItem::new("salty-1", "Salted Snack Mix", Vec::new());
        item.nutritional_info = Some(NutrientProfile {
            sodium: Some(1500.0),
            ..NutrientProfile::default()
        });

        let analysis = orchestrator.analyze(&item).unwrap();

        let sodium_recs = analysis
            .recommendations
            .iter()
            .filter(|r| r.contains("sodium"))
            .count();
        assert_eq!(sodium_recs, 1);
    }

    #[test]
    fn test_rating_breakpoints() {
        assert_eq!(rating_for(95.0), HealthRating::Excellent);
        assert_eq!(rating_for(80.0), HealthRating::Excellent);
        assert_eq!(rating_for(79.9), HealthRating::Good);
        assert_eq!(rating_for(60.0), HealthRating::Good);
        assert_eq!(rating_for(59.9), HealthRating::Average);
        assert_eq!(rating_for(40.0), HealthRating::Average);
        assert_eq!(rating_for(39.9), HealthRating::Poor);
        assert_eq!(rating_for(0.0), HealthRating::Poor);
    }

    // ============================================================
    // BATCH TESTS
    // ============================================================

    #[tokio::test]
    async fn test_batch_processes_every_item() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let items: Vec<MenuItem> = (0..1000)
            .map(|i| {
                let mut item = MenuItem::new(&format!("item-{}", i), "Meal", Vec::new());
                item.nutritional_info = Some(profile(400.0, 12.0, 55.0, 10.0));
                item
            })
            .collect();

        let batch = orchestrator.batch_analyze(items).await;

        assert_eq!(batch.total_processed, 1000);
        assert_eq!(batch.results.len(), 1000);
        assert!(batch.errors.is_empty());
        assert!(batch.processing_time_ms >= 0.0);
    }

    #[tokio::test]
    async fn test_batch_results_stay_attributed_under_parallelism() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        // Each item carries a calorie count derived from its id, so a result
        // attached to the wrong id is detectable
        let items: Vec<MenuItem> = (0..100)
            .map(|i| {
                let mut item = MenuItem::new(&format!("item-{}", i), "Meal", Vec::new());
                item.nutritional_info = Some(profile(100.0 + i as f64, 10.0, 40.0, 8.0));
                item
            })
            .collect();

        let batch = orchestrator.batch_analyze(items).await;

        assert_eq!(batch.results.len(), 100);
        for analysis in &batch.results {
            let index: f64 = analysis
                .menu_item_id
                .strip_prefix("item-")
                .and_then(|s| s.parse().ok())
                .unwrap();
            assert!((analysis.total_calories - (100.0 + index)).abs() < 1e-9);
        }
    }

    #[tokio::test]
    async fn test_batch_captures_per_item_failures() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let items = vec![
            rice_dal_lunch(),
            MenuItem::new("bad-1", "  ", Vec::new()),
            {
                let mut item = MenuItem::new("ok-2", "Packed Meal", Vec::new());
                item.nutritional_info = Some(profile(400.0, 12.0, 55.0, 10.0));
                item
            },
        ];

        let batch = orchestrator.batch_analyze(items).await;

        assert_eq!(batch.total_processed, 3);
        assert_eq!(batch.results.len(), 2);
        assert_eq!(batch.errors.len(), 1);
        assert_eq!(batch.errors[0].menu_item_id, "bad-1");
        assert!(batch.errors[0].error.contains("Invalid input"));
    }

    #[tokio::test]
    async fn test_pre_cancelled_batch_processes_nothing() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let items: Vec<MenuItem> = (0..50).map(|i| {
            let mut item = MenuItem::new(&format!("item-{}", i), "Meal", Vec::new());
            item.nutritional_info = Some(profile(400.0, 12.0, 55.0, 10.0));
            item
        }).collect();

        let cancel = Arc::new(AtomicBool::new(false));
        cancel.store(true, Ordering::Relaxed);

        let batch = orchestrator.batch_analyze_with_cancel(items, cancel).await;

        assert_eq!(batch.total_processed, 0);
        assert!(batch.results.is_empty());
        assert!(batch.errors.is_empty());
    }

    // ============================================================
    // CACHE-ASIDE TESTS
    // ============================================================

    #[test]
    fn test_repeat_analysis_is_served_from_cache() {
        let cache = Arc::new(TaggedCache::default());
        let orchestrator = ComplianceOrchestrator::with_cache(EngineConfig::default(), cache.clone());
        let item = rice_dal_lunch();

        let first = orchestrator.analyze_cached(&item, &[]).unwrap();
        let second = orchestrator.analyze_cached(&item, &[]).unwrap();

        assert_eq!(first.menu_item_id, second.menu_item_id);
        assert!((first.total_calories - second.total_calories).abs() < 1e-9);
        let stats = cache.stats();
        assert_eq!(stats.sets, 1);
        assert_eq!(stats.hits, 1);
    }

    #[test]
    fn test_cached_analysis_invalidates_by_tag() {
        let cache = Arc::new(TaggedCache::default());
        let orchestrator = ComplianceOrchestrator::with_cache(EngineConfig::default(), cache.clone());
        let item = rice_dal_lunch();

        orchestrator
            .analyze_cached(&item, &["school:42".to_string()])
            .unwrap();

        let removed = cache.invalidate_by_tags(&["school:42".to_string()]);
        assert_eq!(removed, 1);

        // Next call recomputes and re-populates
        orchestrator.analyze_cached(&item, &[]).unwrap();
        assert_eq!(cache.stats().sets, 2);
    }

    #[test]
    fn test_without_cache_every_call_recomputes() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());
        let item = rice_dal_lunch();

        // Both calls succeed identically with no cache attached
        let first = orchestrator.analyze_cached(&item, &[]).unwrap();
        let second = orchestrator.analyze_cached(&item, &[]).unwrap();
        assert_eq!(first.menu_item_id, second.menu_item_id);
    }

    // ============================================================
    // MENU-LEVEL TESTS
    // ============================================================

    #[test]
    fn test_personalized_partition_avoids_allergen_conflicts() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());

        let mut peanut_item = MenuItem::new("snack-1", "Peanut Chikki", Vec::new());
        peanut_item.ingredients = vec![Ingredient {
            allergens: Some(vec![Allergen::Peanuts]),
            ..Ingredient::named("Peanuts")
        }];

        let menu = vec![rice_dal_lunch(), peanut_item];
        let partition = orchestrator.personalized_recommendations(&peanut_student(), &menu);

        assert_eq!(partition.recommended, vec!["lunch-1".to_string()]);
        assert_eq!(partition.avoid, vec!["snack-1".to_string()]);
    }

    #[test]
    fn test_menu_improvements_flag_sugar_and_fiber() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());

        let mut dessert = MenuItem::new("dessert-1", "Gulab Jamun", Vec::new());
        dessert.nutritional_info = Some(NutrientProfile {
            sugar: Some(35.0),
            fiber: Some(0.5),
            ..profile(300.0, 4.0, 45.0, 12.0)
        });

        let report = orchestrator.suggest_menu_improvements(&[dessert]);

        let kinds: Vec<MenuIssueKind> = report.suggestions.iter().map(|s| s.kind).collect();
        assert!(kinds.contains(&MenuIssueKind::HighSugar));
        assert!(kinds.contains(&MenuIssueKind::LowFiber));
        assert_eq!(report.issues.len(), report.suggestions.len());
        assert!(report.priority_score >= 50.0);
    }

    #[test]
    fn test_empty_menu_has_no_improvement_issues() {
        let orchestrator = ComplianceOrchestrator::new(EngineConfig::default());

        let report = orchestrator.suggest_menu_improvements(&[]);

        assert!(report.issues.is_empty());
        assert!(report.suggestions.is_empty());
        assert!((report.priority_score - 0.0).abs() < 1e-9);
    }
}
