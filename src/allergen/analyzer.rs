//! Allergen detection and cross-contamination risk derivation.

use super::types::{
    Allergen, AllergenInfo, AllergySeverity, ContaminationRisk, StudentAllergenAssessment,
};
use crate::nutrition::types::{Equipment, Facility, MenuItem};
use crate::safety::types::StudentNutritionalProfile;
use std::collections::BTreeSet;

/// Risk-score weights. The numbers only need to preserve the ordering
/// guarantees (High derivations strictly above Low ones) while staying in
/// [0, 1] after clamping.
const RISK_PER_ALLERGEN: f64 = 0.10;
const RISK_PER_HIGH_POTENCY: f64 = 0.20;
const RISK_SHARED_EQUIPMENT: f64 = 0.30;
const RISK_DEDICATED_CREDIT: f64 = 0.20;

/// Number of co-occurring high-potency allergens that, combined with shared
/// equipment, escalates the level to High.
const HIGH_POTENCY_PAIR: usize = 2;

/// Collects the union of declared allergens and derives contamination risk.
pub fn detect(item: &MenuItem) -> AllergenInfo {
    // BTreeSet gives dedup + stable ordering in one pass
    let mut found: BTreeSet<Allergen> = BTreeSet::new();
    for ingredient in &item.ingredients {
        if let Some(declared) = &ingredient.allergens {
            found.extend(declared.iter().copied());
        }
    }

    let allergens: Vec<Allergen> = found.into_iter().collect();
    let high_potency = allergens.iter().filter(|a| a.is_high_potency()).count();
    let shared = has_shared_equipment(item);
    let dedicated = has_dedicated_equipment(item);

    let risk = if high_potency >= HIGH_POTENCY_PAIR && shared {
        ContaminationRisk::High
    } else if allergens.is_empty() && dedicated {
        ContaminationRisk::Low
    } else {
        ContaminationRisk::Medium
    };

    let mut score = allergens.len() as f64 * RISK_PER_ALLERGEN
        + high_potency as f64 * RISK_PER_HIGH_POTENCY;
    if shared {
        score += RISK_SHARED_EQUIPMENT;
    }
    if dedicated {
        score -= RISK_DEDICATED_CREDIT;
    }
    let risk_score = score.clamp(0.0, 1.0);

    let mut safety_notes = Vec::new();
    if shared && high_potency > 0 {
        safety_notes.push(
            "Prepared on shared equipment with high-potency allergens present".to_string(),
        );
    }
    if risk == ContaminationRisk::High {
        safety_notes.push("High cross-contamination risk: verify preparation line".to_string());
    }

    AllergenInfo {
        allergens,
        risk,
        risk_score,
        safety_notes,
    }
}

/// Matches the item's allergens against one student's declared set.
///
/// Emits one warning per matched allergen (carrying its label) and escalates
/// `severity` to the maximum declared severity across the matches. Allergens
/// without a declared severity default to Moderate.
pub fn assess_for_student(
    item: &MenuItem,
    profile: &StudentNutritionalProfile,
) -> StudentAllergenAssessment {
    let info = detect(item);

    let mut warnings = Vec::new();
    let mut matched = Vec::new();
    let mut severity: Option<AllergySeverity> = None;

    for allergen in &info.allergens {
        if !profile.allergens.contains(allergen) {
            continue;
        }

        let declared = profile
            .allergy_severity
            .get(allergen)
            .copied()
            .unwrap_or(AllergySeverity::Moderate);

        warnings.push(format!(
            "Contains {}: declared allergy ({:?} severity)",
            allergen.label(),
            declared
        ));
        matched.push(*allergen);
        severity = Some(match severity {
            Some(current) => current.max(declared),
            None => declared,
        });
    }

    if !matched.is_empty() {
        tracing::warn!(
            "Item {} matches {} declared allergen(s) for student {}",
            item.id,
            matched.len(),
            profile.student_id
        );
    }

    StudentAllergenAssessment {
        safe: matched.is_empty(),
        warnings,
        severity,
        matched,
    }
}

fn has_shared_equipment(item: &MenuItem) -> bool {
    match &item.preparation {
        Some(prep) => {
            matches!(prep.facility, Some(Facility::Shared))
                || matches!(
                    prep.equipment,
                    Some(Equipment::Shared) | Some(Equipment::SharedGrinder)
                )
        }
        None => false,
    }
}

fn has_dedicated_equipment(item: &MenuItem) -> bool {
    match &item.preparation {
        Some(prep) => {
            matches!(prep.equipment, Some(Equipment::Dedicated))
                && !matches!(prep.facility, Some(Facility::Shared))
        }
        None => false,
    }
}
