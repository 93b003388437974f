//! The orchestrator service: single-item analysis, cached analysis, bounded
//! batch fan-out, personalized partitioning, and menu-wide improvement scans.

use super::types::{
    BatchAnalysisResult, BatchItemError, EngineConfig, GovernmentCompliance, HealthRating,
    Macronutrients, MenuImprovementReport, MenuIssueKind, MenuPartition, MenuSuggestion,
    Micronutrients, NutritionalAnalysis, WARNING_INCOMPLETE_DATA,
};
use crate::allergen::analyzer;
use crate::cache::store::TaggedCache;
use crate::compliance::rules;
use crate::compliance::standards;
use crate::compliance::types::GovernmentStandard;
use crate::nutrition::aggregator;
use crate::nutrition::types::{MenuItem, NutrientProfile, now_ms};
use crate::safety::assessor::{SafetyAssessor, SafetyConfig};
use crate::safety::types::{SafetyStatus, StudentNutritionalProfile};

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use uuid::Uuid;

/// Health-rating breakpoints over the composite score.
pub const RATING_EXCELLENT_MIN: f64 = 80.0;
pub const RATING_GOOD_MIN: f64 = 60.0;
pub const RATING_AVERAGE_MIN: f64 = 40.0;

/// Penalty applied to the violation component per dietary violation.
const DIETARY_VIOLATION_PENALTY: f64 = 10.0;

/// Menu-wide improvement thresholds.
const MENU_PROTEIN_SHARE_MIN_PCT: f64 = 15.0;
const MENU_SUGAR_PER_ITEM_MAX_G: f64 = 20.0;
const MENU_FIBER_PER_ITEM_MIN_G: f64 = 3.0;
const MENU_DENSITY_MIN: f64 = 0.05;
/// Priority added per detected issue category.
const ISSUE_PRIORITY_STEP: f64 = 25.0;

/// The public-facing compliance analysis service.
///
/// Holds no mutable state of its own: every analysis is a pure function of
/// the item plus optional cache lookups, so concurrent calls are trivially
/// safe and batch results match sequential execution.
pub struct ComplianceOrchestrator {
    config: EngineConfig,
    assessor: SafetyAssessor,
    cache: Option<Arc<TaggedCache>>,
}

impl ComplianceOrchestrator {
    pub fn new(config: EngineConfig) -> Arc<Self> {
        Arc::new(Self {
            config,
            assessor: SafetyAssessor::new(SafetyConfig::default()),
            cache: None,
        })
    }

    /// Composition-root constructor: the one shared cache for the process is
    /// injected here, not reached through a global.
    pub fn with_cache(config: EngineConfig, cache: Arc<TaggedCache>) -> Arc<Self> {
        Arc::new(Self {
            config,
            assessor: SafetyAssessor::new(SafetyConfig::default()),
            cache: Some(cache),
        })
    }

    /// Analyzes one menu item.
    ///
    /// Fails fast with an "Invalid input" error only for structurally
    /// invalid items (empty id, or empty name with nothing else to go on).
    /// Incomplete nutrient data never fails: it appends the
    /// `INCOMPLETE_NUTRITIONAL_DATA` warning and lowers completeness and
    /// confidence instead.
    pub fn analyze(&self, item: &MenuItem) -> Result<NutritionalAnalysis> {
        self.validate(item)?;

        let mut warnings = Vec::new();

        // Aggregate from ingredients; fall back to pre-aggregated info when
        // the ingredient list carries no usable macro data at all, matching
        // the profile the compliance checks evaluate against
        let (totals, density, completeness) = if !item.ingredients.is_empty() {
            let aggregated = aggregator::aggregate(&item.ingredients);
            for name in &aggregated.missing {
                warnings.push(format!("No nutrient data for ingredient '{}'", name));
            }
            if aggregated.completeness == 0.0
                && let Some(info) = &item.nutritional_info
            {
                (
                    info.clone(),
                    aggregator::nutritional_density(info),
                    aggregated.completeness,
                )
            } else {
                (aggregated.totals, aggregated.density, aggregated.completeness)
            }
        } else if let Some(info) = &item.nutritional_info {
            (info.clone(), aggregator::nutritional_density(info), 100.0)
        } else {
            (NutrientProfile::default(), 0.0, 0.0)
        };

        if completeness < 100.0 {
            warnings.push(WARNING_INCOMPLETE_DATA.to_string());
        }

        let allergens = analyzer::detect(item);
        let dietary_compliance = rules::check_dietary(item, &self.config.default_restrictions);
        let indian_standards =
            standards::check_government(item, GovernmentStandard::IndianGovernment);
        let who_guidelines =
            standards::check_government(item, GovernmentStandard::WhoRecommendations);

        let nutrition_score = self.composite_score(
            &totals,
            density,
            &dietary_compliance,
            &indian_standards,
            &who_guidelines,
        );
        let health_rating = rating_for(nutrition_score);

        // Both standards can emit identical texts (shared thresholds), so
        // dedup by membership rather than adjacency
        let mut recommendations = dietary_compliance.recommendations.clone();
        for rec in indian_standards
            .recommendations
            .iter()
            .chain(who_guidelines.recommendations.iter())
        {
            if !recommendations.contains(rec) {
                recommendations.push(rec.clone());
            }
        }

        let confidence = (0.3 + 0.7 * completeness / 100.0).clamp(0.0, 1.0);

        let (vitamins, minerals) = (
            totals.vitamins.clone().unwrap_or_default(),
            totals.minerals.clone().unwrap_or_default(),
        );

        Ok(NutritionalAnalysis {
            menu_item_id: item.id.clone(),
            total_calories: totals.calories,
            macronutrients: Macronutrients {
                protein: totals.protein,
                carbohydrates: totals.carbohydrates,
                fat: totals.fat,
            },
            micronutrients: Micronutrients { vitamins, minerals },
            allergens,
            dietary_compliance,
            government_compliance: GovernmentCompliance {
                indian_standards,
                who_guidelines,
            },
            nutrition_score,
            health_rating,
            recommendations,
            warnings,
            data_completeness: completeness,
            confidence,
            analysis_timestamp: now_ms(),
        })
    }

    /// Cache-aside variant of `analyze`.
    ///
    /// Keys by item id under the `menu` and `nutrition` tags plus any caller
    /// tags (e.g. `school:<id>`). The cache is a soft dependency: a decode
    /// failure falls back to recomputation with a warning, never a
    /// caller-visible error.
    pub fn analyze_cached(
        &self,
        item: &MenuItem,
        extra_tags: &[String],
    ) -> Result<NutritionalAnalysis> {
        let Some(cache) = &self.cache else {
            return self.analyze(item);
        };

        let key = format!("analysis:{}", item.id);

        if let Some(value) = cache.get(&key) {
            match serde_json::from_value::<NutritionalAnalysis>(value) {
                Ok(analysis) => {
                    tracing::debug!("Analysis cache hit for {}", item.id);
                    return Ok(analysis);
                }
                Err(e) => {
                    tracing::warn!("Discarding undecodable cached analysis for {}: {}", item.id, e);
                }
            }
        }

        let analysis = self.analyze(item)?;

        let mut tags = vec!["menu".to_string(), "nutrition".to_string()];
        tags.extend(extra_tags.iter().cloned());
        match serde_json::to_value(&analysis) {
            Ok(value) => cache.set(&key, value, Some(self.config.cache_ttl), &tags),
            Err(e) => tracing::warn!("Failed to encode analysis for {}: {}", item.id, e),
        }

        Ok(analysis)
    }

    /// Analyzes a batch of items with bounded parallel fan-out.
    ///
    /// One item's failure is captured in `errors` under its id and never
    /// aborts its siblings. Items are independent: no shared mutable state,
    /// so completion order cannot affect any individual result.
    pub async fn batch_analyze(self: &Arc<Self>, items: Vec<MenuItem>) -> BatchAnalysisResult {
        self.batch_analyze_with_cancel(items, Arc::new(AtomicBool::new(false)))
            .await
    }

    /// Like `batch_analyze` but supports early termination: once `cancel`
    /// is set, in-flight items are dropped while already-collected results
    /// stay valid.
    pub async fn batch_analyze_with_cancel(
        self: &Arc<Self>,
        items: Vec<MenuItem>,
        cancel: Arc<AtomicBool>,
    ) -> BatchAnalysisResult {
        let started = Instant::now();
        let op_id = Uuid::new_v4();
        let total = items.len();
        tracing::info!("Batch {} started with {} item(s)", op_id, total);

        let semaphore = Arc::new(Semaphore::new(self.config.batch_concurrency.max(1)));
        let mut join_set = JoinSet::new();

        for item in items {
            if cancel.load(Ordering::Relaxed) {
                break;
            }

            let orchestrator = self.clone();
            let semaphore = semaphore.clone();
            let cancel = cancel.clone();

            join_set.spawn(async move {
                // Acquire never fails: the semaphore is never closed
                let _permit = semaphore.acquire_owned().await.expect("semaphore open");
                if cancel.load(Ordering::Relaxed) {
                    return None;
                }
                Some((item.id.clone(), orchestrator.analyze(&item)))
            });
        }

        let mut results = Vec::new();
        let mut errors = Vec::new();

        while let Some(joined) = join_set.join_next().await {
            match joined {
                Ok(Some((_, Ok(analysis)))) => results.push(analysis),
                Ok(Some((menu_item_id, Err(e)))) => {
                    errors.push(BatchItemError {
                        menu_item_id,
                        error: e.to_string(),
                    });
                }
                Ok(None) => {} // Dropped by cancellation
                Err(e) => {
                    tracing::error!("Batch {} worker panicked: {}", op_id, e);
                }
            }
        }

        let processing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        tracing::info!(
            "Batch {} finished: {} ok, {} failed in {:.1} ms",
            op_id,
            results.len(),
            errors.len(),
            processing_time_ms
        );

        BatchAnalysisResult {
            total_processed: results.len() + errors.len(),
            results,
            errors,
            processing_time_ms,
        }
    }

    /// Partitions a menu for one student: items with an allergen conflict or
    /// a dietary non-compliance go to `avoid`, the rest to `recommended`.
    pub fn personalized_recommendations(
        &self,
        profile: &StudentNutritionalProfile,
        menu: &[MenuItem],
    ) -> MenuPartition {
        let mut recommended = Vec::new();
        let mut avoid = Vec::new();

        for item in menu {
            let report = self.assessor.comprehensive_check(item, profile, &[]);
            let unsafe_for_student = report.allergen_safety == SafetyStatus::Unsafe
                || report.dietary_safety == SafetyStatus::Unsafe;

            if unsafe_for_student {
                avoid.push(item.id.clone());
            } else {
                recommended.push(item.id.clone());
            }
        }

        MenuPartition { recommended, avoid }
    }

    /// Menu-wide heuristic scan: one suggestion per detected issue category.
    pub fn suggest_menu_improvements(&self, menu: &[MenuItem]) -> MenuImprovementReport {
        let mut combined = NutrientProfile::default();
        let mut sugar_total = 0.0;
        let mut fiber_total = 0.0;
        let mut micro_total = 0.0;

        for item in menu {
            let profile = standards::effective_profile(item);
            combined.calories += profile.calories;
            combined.protein += profile.protein;
            combined.carbohydrates += profile.carbohydrates;
            combined.fat += profile.fat;
            sugar_total += profile.sugar.unwrap_or(0.0);
            fiber_total += profile.fiber.unwrap_or(0.0);
            micro_total += aggregator::nutritional_density(&profile);
        }

        let item_count = menu.len().max(1) as f64;
        let distribution = aggregator::macro_distribution(&combined);

        let mut issues = Vec::new();
        let mut suggestions = Vec::new();

        if !menu.is_empty() && distribution.protein_pct < MENU_PROTEIN_SHARE_MIN_PCT {
            issues.push(format!(
                "Menu-wide protein share {:.1}% is below {:.0}%",
                distribution.protein_pct, MENU_PROTEIN_SHARE_MIN_PCT
            ));
            suggestions.push(MenuSuggestion {
                kind: MenuIssueKind::LowProtein,
                message: "Add dal, paneer or egg preparations across the menu".to_string(),
            });
        }

        if sugar_total / item_count > MENU_SUGAR_PER_ITEM_MAX_G {
            issues.push(format!(
                "Average sugar {:.1} g per item exceeds {:.0} g",
                sugar_total / item_count,
                MENU_SUGAR_PER_ITEM_MAX_G
            ));
            suggestions.push(MenuSuggestion {
                kind: MenuIssueKind::HighSugar,
                message: "Swap sweetened desserts for fruit-based options".to_string(),
            });
        }

        if !menu.is_empty() && fiber_total / item_count < MENU_FIBER_PER_ITEM_MIN_G {
            issues.push(format!(
                "Average fiber {:.1} g per item is below {:.0} g",
                fiber_total / item_count,
                MENU_FIBER_PER_ITEM_MIN_G
            ));
            suggestions.push(MenuSuggestion {
                kind: MenuIssueKind::LowFiber,
                message: "Prefer whole grains and add a vegetable side".to_string(),
            });
        }

        if !menu.is_empty() && micro_total / item_count < MENU_DENSITY_MIN {
            issues.push("Menu-wide micronutrient density is low".to_string());
            suggestions.push(MenuSuggestion {
                kind: MenuIssueKind::LowMicronutrientDensity,
                message: "Include leafy greens and seasonal produce".to_string(),
            });
        }

        let priority_score = (issues.len() as f64 * ISSUE_PRIORITY_STEP).min(100.0);

        MenuImprovementReport {
            issues,
            suggestions,
            priority_score,
        }
    }

    /// Read access to the assessor for callers composing their own flows.
    pub fn assessor(&self) -> &SafetyAssessor {
        &self.assessor
    }

    fn validate(&self, item: &MenuItem) -> Result<()> {
        if item.id.trim().is_empty() {
            return Err(anyhow::anyhow!("Invalid input: menu item id is empty"));
        }
        if item.name.trim().is_empty()
            && item.ingredients.is_empty()
            && item.nutritional_info.is_none()
        {
            return Err(anyhow::anyhow!(
                "Invalid input: menu item '{}' carries no name, ingredients or nutrition data",
                item.id
            ));
        }
        Ok(())
    }

    /// Weighted composite of macro balance, micronutrient density, and the
    /// absence of violations.
    fn composite_score(
        &self,
        totals: &NutrientProfile,
        density: f64,
        dietary: &crate::compliance::types::ComplianceResult,
        indian: &crate::compliance::types::ComplianceResult,
        who: &crate::compliance::types::ComplianceResult,
    ) -> f64 {
        let distribution = aggregator::macro_distribution(totals);
        let balance = aggregator::macro_balance_score(&distribution);

        let mut violation_component = (indian.score + who.score) / 2.0;
        violation_component -= dietary.violations.len() as f64 * DIETARY_VIOLATION_PENALTY;
        let violation_component = violation_component.clamp(0.0, 100.0);

        let score = balance * self.config.macro_balance_weight
            + density * 100.0 * self.config.density_weight
            + violation_component * self.config.violation_weight;

        score.clamp(0.0, 100.0)
    }
}

/// Fixed score-to-rating breakpoints.
pub fn rating_for(score: f64) -> HealthRating {
    if score >= RATING_EXCELLENT_MIN {
        HealthRating::Excellent
    } else if score >= RATING_GOOD_MIN {
        HealthRating::Good
    } else if score >= RATING_AVERAGE_MIN {
        HealthRating::Average
    } else {
        HealthRating::Poor
    }
}
