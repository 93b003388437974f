use serde::{Deserialize, Serialize};

/// Closed allergen vocabulary.
///
/// Wheat/Gluten and Milk/Dairy are tracked as distinct entries because
/// upstream ingredient data declares them separately and student profiles
/// may list either form.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Allergen {
    Dairy,
    Milk,
    Gluten,
    Wheat,
    TreeNuts,
    Peanuts,
    Shellfish,
    Fish,
    Eggs,
    Soy,
    Sesame,
    Mustard,
}

impl Allergen {
    /// Parses a free-text label (case-insensitive, common synonyms included).
    /// Unknown labels return `None` rather than polluting the vocabulary.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "DAIRY" => Some(Self::Dairy),
            "MILK" => Some(Self::Milk),
            "GLUTEN" => Some(Self::Gluten),
            "WHEAT" => Some(Self::Wheat),
            "TREE_NUTS" | "TREE NUTS" | "TREENUTS" | "NUTS" => Some(Self::TreeNuts),
            "PEANUTS" | "PEANUT" | "GROUNDNUT" => Some(Self::Peanuts),
            "SHELLFISH" => Some(Self::Shellfish),
            "FISH" => Some(Self::Fish),
            "EGGS" | "EGG" => Some(Self::Eggs),
            "SOY" | "SOYA" => Some(Self::Soy),
            "SESAME" => Some(Self::Sesame),
            "MUSTARD" => Some(Self::Mustard),
            _ => None,
        }
    }

    /// Canonical uppercase label used in warnings and safety notes.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Dairy => "DAIRY",
            Self::Milk => "MILK",
            Self::Gluten => "GLUTEN",
            Self::Wheat => "WHEAT",
            Self::TreeNuts => "TREE_NUTS",
            Self::Peanuts => "PEANUTS",
            Self::Shellfish => "SHELLFISH",
            Self::Fish => "FISH",
            Self::Eggs => "EGGS",
            Self::Soy => "SOY",
            Self::Sesame => "SESAME",
            Self::Mustard => "MUSTARD",
        }
    }

    /// Peanuts, tree nuts and shellfish drive the severest reactions and
    /// weigh more in contamination-risk derivation.
    pub fn is_high_potency(&self) -> bool {
        matches!(self, Self::Peanuts | Self::TreeNuts | Self::Shellfish)
    }
}

/// Coarse contamination-risk level reported alongside the numeric score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContaminationRisk {
    Low,
    Medium,
    High,
}

/// Allergen findings for a menu item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergenInfo {
    /// Deduplicated, sorted for order-independent equality.
    pub allergens: Vec<Allergen>,
    pub risk: ContaminationRisk,
    /// Numeric risk in [0, 1]; strictly greater for High than Low derivations.
    pub risk_score: f64,
    pub safety_notes: Vec<String>,
}

/// Reaction severity declared in a student profile. Ordinal:
/// Low < Moderate < Severe < LifeThreatening.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AllergySeverity {
    Low,
    Moderate,
    Severe,
    LifeThreatening,
}

/// Outcome of matching a menu item against one student's declared allergens.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAllergenAssessment {
    pub safe: bool,
    /// One entry per matched allergen, carrying the allergen label.
    pub warnings: Vec<String>,
    /// Maximum severity across matched allergens; `None` when nothing matched.
    pub severity: Option<AllergySeverity>,
    /// The matched allergens themselves, for downstream safety logic.
    pub matched: Vec<Allergen>,
}
