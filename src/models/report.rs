use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{FactorBreakdown, PairKey};

/// One selected pair, ready for export
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedPair {
    pub rank: usize,
    pub pair: PairKey,
    pub person1_name: String,
    pub person1_email: String,
    pub person2_name: String,
    pub person2_email: String,
    pub score: f64,
    pub shared_hobbies: Vec<String>,
    pub person1_looking_for: Option<String>,
    pub person2_looking_for: Option<String>,
    pub rationale: Option<String>,
    pub shared_interests: Vec<String>,
    pub key_matches: Vec<String>,
    pub concerns: Vec<String>,
    pub factors: Option<FactorBreakdown>,
}

impl MatchedPair {
    /// Score as shown to organizers, e.g. "87.5%"
    pub fn formatted_score(&self) -> String {
        format!("{:.1}%", self.score)
    }
}

/// Respondent left without a partner
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnmatchedPerson {
    pub index: usize,
    pub name: String,
    pub email: String,
}

/// Aggregate counters for one run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStats {
    pub strategy: String,
    pub cohort_size: usize,
    pub pairs_evaluated: usize,
    pub eligible_pairs: usize,
    pub edges: usize,
    pub degraded_pairs: usize,
    pub matched_pairs: usize,
    pub matched_people: usize,
    pub unmatched_people: usize,
    pub total_weight: f64,
}

/// Full output of a matching run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub stats: RunStats,
    pub matches: Vec<MatchedPair>,
    pub unmatched: Vec<UnmatchedPerson>,
}
