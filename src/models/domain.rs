use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default shared-interest importance when a respondent skipped the question
pub const NEUTRAL_IMPORTANCE: f64 = 3.0;

/// Coarse gender categories used by the orientation check
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenderCategory {
    Man,
    Woman,
    Other,
}

/// Best-effort professional data pulled from an external profile service
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProfessionalProfile {
    #[serde(default)]
    pub headline: Option<String>,
    #[serde(rename = "currentRole", default)]
    pub current_role: Option<String>,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub education: Vec<String>,
    #[serde(rename = "inferredTraits", default)]
    pub inferred_traits: Vec<String>,
}

impl ProfessionalProfile {
    pub fn is_empty(&self) -> bool {
        self.headline.is_none()
            && self.current_role.is_none()
            && self.skills.is_empty()
            && self.education.is_empty()
            && self.inferred_traits.is_empty()
    }
}

/// Normalized survey respondent
///
/// Only `name` and `email` identify a person. Everything else is optional and
/// an absent value carries no signal for eligibility or scoring.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    pub name: String,
    pub email: String,
    pub gender: Option<String>,
    #[serde(rename = "interestedIn", default)]
    pub interested_in: Vec<String>,
    pub year: Option<String>,
    #[serde(rename = "lookingFor")]
    pub looking_for: Option<String>,
    #[serde(rename = "socialBattery")]
    pub social_battery: Option<String>,
    #[serde(rename = "fridayNight")]
    pub friday_night: Option<String>,
    #[serde(rename = "selfTraits", default)]
    pub self_traits: BTreeSet<String>,
    #[serde(default)]
    pub hobbies: BTreeSet<String>,
    #[serde(rename = "dreamDate")]
    pub dream_date: Option<String>,
    pub drinking: Option<String>,
    #[serde(rename = "substanceUse")]
    pub substance_use: Option<String>,
    pub ambition: Option<String>,
    #[serde(rename = "partnerValues", default)]
    pub partner_values: BTreeSet<String>,
    #[serde(rename = "sharedInterestsImportance")]
    pub shared_interests_importance: Option<f64>,
    #[serde(rename = "typeDescription")]
    pub type_description: Option<String>,
    pub dealbreakers: Option<String>,
    #[serde(default)]
    pub professional: Option<ProfessionalProfile>,
}

impl Person {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Shared-interest importance in 1..=5, neutral when unknown
    pub fn importance(&self) -> f64 {
        self.shared_interests_importance
            .filter(|v| v.is_finite())
            .map(|v| v.clamp(1.0, 5.0))
            .unwrap_or(NEUTRAL_IMPORTANCE)
    }

    /// Categories matched by this person's self-described gender
    ///
    /// Matching is substring based and case-insensitive. "woman" is removed
    /// before looking for "man" so that one never implies the other.
    pub fn gender_categories(&self) -> BTreeSet<GenderCategory> {
        let mut categories = BTreeSet::new();
        let Some(gender) = self.gender.as_deref() else {
            return categories;
        };
        let gender = gender.trim().to_lowercase();

        if gender.contains("woman") || gender.contains("female") {
            categories.insert(GenderCategory::Woman);
        }
        let without_woman = gender.replace("woman", "").replace("female", "");
        if without_woman.contains("man") || without_woman.contains("male") {
            categories.insert(GenderCategory::Man);
        }
        if gender.contains("non-binary") || gender.contains("nonbinary") || gender.contains("other") {
            categories.insert(GenderCategory::Other);
        }

        categories
    }

    /// Categories this person is interested in, parsed from the checkbox answers
    pub fn interest_categories(&self) -> BTreeSet<GenderCategory> {
        let mut categories = BTreeSet::new();

        for token in &self.interested_in {
            let token = token.trim().to_lowercase();
            if token.contains("women") {
                categories.insert(GenderCategory::Woman);
            }
            if token.replace("women", "").contains("men") {
                categories.insert(GenderCategory::Man);
            }
            if token.contains("other") || token.contains("non-binary") {
                categories.insert(GenderCategory::Other);
            }
        }

        categories
    }
}

/// Canonical unordered pair of distinct person indices
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PairKey {
    low: usize,
    high: usize,
}

impl PairKey {
    /// Returns `None` for `a == b`
    pub fn new(a: usize, b: usize) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { low: a, high: b }),
            std::cmp::Ordering::Greater => Some(Self { low: b, high: a }),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn low(&self) -> usize {
        self.low
    }

    pub fn high(&self) -> usize {
        self.high
    }

    pub fn contains(&self, vertex: usize) -> bool {
        self.low == vertex || self.high == vertex
    }
}

/// Per-factor contributions of the heuristic strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactorBreakdown {
    pub social_energy: f64,
    pub friday_night: f64,
    pub shared_hobbies: f64,
    pub dream_date: f64,
    pub drinking: f64,
    pub substance_use: f64,
    pub ambition: f64,
    pub shared_values: f64,
    pub trait_match: f64,
    pub ideal_type: f64,
}

impl FactorBreakdown {
    pub const MAX_TOTAL: f64 = 100.0;

    /// Sum of all factors, capped at 100
    pub fn total(&self) -> f64 {
        let sum = self.social_energy
            + self.friday_night
            + self.shared_hobbies
            + self.dream_date
            + self.drinking
            + self.substance_use
            + self.ambition
            + self.shared_values
            + self.trait_match
            + self.ideal_type;
        sum.clamp(0.0, Self::MAX_TOTAL)
    }
}

/// Explanatory fields attached to an edge
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeExplanation {
    pub shared_hobbies: Vec<String>,
    pub rationale: Option<String>,
    pub shared_interests: Vec<String>,
    pub key_matches: Vec<String>,
    pub concerns: Vec<String>,
    pub factors: Option<FactorBreakdown>,
}

/// Weighted edge between two eligible people
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompatibilityEdge {
    key: PairKey,
    weight: f64,
    explanation: EdgeExplanation,
}

impl CompatibilityEdge {
    pub fn new(key: PairKey, weight: f64, explanation: EdgeExplanation) -> Self {
        Self {
            key,
            weight,
            explanation,
        }
    }

    pub fn key(&self) -> PairKey {
        self.key
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn explanation(&self) -> &EdgeExplanation {
        &self.explanation
    }
}
