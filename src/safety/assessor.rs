//! Three-dimension safety fold and alternative-item suggestion.

use super::types::{
    EmergencyAction, EmergencyProtocol, HealthCondition, SafetyReport, SafetyStatus,
    SafetyVerdict, StudentNutritionalProfile,
};
use crate::allergen::analyzer;
use crate::allergen::types::{AllergySeverity, ContaminationRisk};
use crate::compliance::rules;
use crate::compliance::standards;
use crate::nutrition::aggregator;
use crate::nutrition::types::MenuItem;

/// Per-condition medical limits for a single served meal.
#[derive(Debug, Clone)]
pub struct SafetyConfig {
    /// Glycemic index above which a meal is unsafe for diabetic students.
    pub glycemic_index_limit: f64,
    /// Grams of sugar above which a meal is unsafe for diabetic students.
    pub sugar_limit_g: f64,
    /// Milligrams of sodium above which a meal is unsafe for hypertensive
    /// students.
    pub sodium_limit_mg: f64,
    /// Cap on suggested alternative items.
    pub max_alternatives: usize,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            glycemic_index_limit: 70.0,
            sugar_limit_g: 25.0,
            sodium_limit_mg: 800.0,
            max_alternatives: 3,
        }
    }
}

/// Folds allergen, dietary and medical checks into one verdict.
pub struct SafetyAssessor {
    config: SafetyConfig,
}

impl SafetyAssessor {
    pub fn new(config: SafetyConfig) -> Self {
        Self { config }
    }

    /// Full safety check of one item for one student.
    ///
    /// `candidates` is the menu to draw alternatives from; pass an empty
    /// slice when no suggestions are wanted. "No alternatives found" is a
    /// valid, non-error outcome.
    pub fn comprehensive_check(
        &self,
        item: &MenuItem,
        profile: &StudentNutritionalProfile,
        candidates: &[MenuItem],
    ) -> SafetyReport {
        let assessment = analyzer::assess_for_student(item, profile);
        let contamination = analyzer::detect(item);

        let allergen_safety = if assessment.safe {
            SafetyStatus::Safe
        } else {
            SafetyStatus::Unsafe
        };

        let dietary = rules::check_dietary(item, &profile.dietary_restrictions);
        let dietary_safety = if dietary.compliant {
            SafetyStatus::Safe
        } else {
            SafetyStatus::Unsafe
        };

        let medical_findings = self.medical_findings(item, profile);
        let medical_safety = if medical_findings.is_empty() {
            SafetyStatus::Safe
        } else {
            SafetyStatus::Unsafe
        };

        let severity = assessment.severity;
        let life_threatening = allergen_safety == SafetyStatus::Unsafe
            && severity == Some(AllergySeverity::LifeThreatening);
        let high_risk_severe = contamination.risk == ContaminationRisk::High
            && matches!(
                severity,
                Some(AllergySeverity::Severe) | Some(AllergySeverity::LifeThreatening)
            );

        let overall_safety = if life_threatening || high_risk_severe {
            SafetyVerdict::Dangerous
        } else if allergen_safety == SafetyStatus::Safe
            && dietary_safety == SafetyStatus::Safe
            && medical_safety == SafetyStatus::Safe
        {
            SafetyVerdict::Safe
        } else {
            SafetyVerdict::Caution
        };

        let emergency_protocol = if overall_safety == SafetyVerdict::Dangerous {
            Some(self.build_emergency_protocol(profile))
        } else {
            None
        };

        if overall_safety == SafetyVerdict::Dangerous {
            tracing::error!(
                "DANGEROUS verdict for student {} on item {}",
                profile.student_id,
                item.id
            );
        }

        let mut recommendations = assessment.warnings;
        recommendations.extend(dietary.recommendations);
        recommendations.extend(medical_findings);

        let alternative_items = self.suggest_alternatives(profile, candidates);

        SafetyReport {
            overall_safety,
            allergen_safety,
            dietary_safety,
            medical_safety,
            emergency_protocol,
            recommendations,
            alternative_items,
        }
    }

    /// Medical-dimension findings; empty means safe.
    fn medical_findings(
        &self,
        item: &MenuItem,
        profile: &StudentNutritionalProfile,
    ) -> Vec<String> {
        let nutrients = standards::effective_profile(item);
        let mut findings = Vec::new();

        if profile
            .health_conditions
            .contains(&HealthCondition::Diabetes)
        {
            if nutrients.glycemic_index.unwrap_or(0.0) > self.config.glycemic_index_limit {
                findings.push(format!(
                    "Glycemic index exceeds the diabetic limit of {:.0}",
                    self.config.glycemic_index_limit
                ));
            }
            if nutrients.sugar.unwrap_or(0.0) > self.config.sugar_limit_g {
                findings.push(format!(
                    "Sugar content exceeds the diabetic limit of {:.0} g",
                    self.config.sugar_limit_g
                ));
            }
        }

        if profile
            .health_conditions
            .contains(&HealthCondition::Hypertension)
            && nutrients.sodium.unwrap_or(0.0) > self.config.sodium_limit_mg
        {
            findings.push(format!(
                "Sodium exceeds the hypertension limit of {:.0} mg",
                self.config.sodium_limit_mg
            ));
        }

        findings
    }

    fn build_emergency_protocol(&self, profile: &StudentNutritionalProfile) -> EmergencyProtocol {
        let requires_epi_pen = profile.medications.iter().any(|m| {
            let lower = m.to_lowercase();
            lower.contains("epipen")
                || lower.contains("epi-pen")
                || lower.contains("epinephrine")
                || lower.contains("adrenaline auto")
        });

        let mut immediate_actions = vec![EmergencyAction::CallEmergency];
        if requires_epi_pen {
            immediate_actions.push(EmergencyAction::AdministerEpiPen);
        }
        immediate_actions.push(EmergencyAction::NotifySchoolNurse);
        immediate_actions.push(EmergencyAction::NotifyGuardian);

        EmergencyProtocol {
            requires_epi_pen,
            immediate_actions,
        }
    }

    /// Filters `candidates` down to items with zero allergen overlap and full
    /// dietary compliance, ordered by nutritional quality descending, capped
    /// at `max_alternatives`.
    pub fn suggest_alternatives(
        &self,
        profile: &StudentNutritionalProfile,
        candidates: &[MenuItem],
    ) -> Vec<String> {
        let mut scored: Vec<(String, f64)> = candidates
            .iter()
            .filter(|candidate| {
                analyzer::assess_for_student(candidate, profile).safe
                    && rules::check_dietary(candidate, &profile.dietary_restrictions).compliant
            })
            .map(|candidate| (candidate.id.clone(), candidate_score(candidate)))
            .collect();

        scored.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(self.config.max_alternatives);
        scored.into_iter().map(|(id, _)| id).collect()
    }
}

/// Lightweight nutrition score for ranking alternatives: macro balance plus
/// micronutrient density. The orchestrator owns the full composite score;
/// this only needs to produce a stable ordering.
fn candidate_score(item: &MenuItem) -> f64 {
    let profile = standards::effective_profile(item);
    let distribution = aggregator::macro_distribution(&profile);
    aggregator::macro_balance_score(&distribution) + aggregator::nutritional_density(&profile) * 100.0
}
