use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

use crate::core::scoring::{
    calculate_base_factors, ideal_type_score, ideal_type_text, self_description, shared_hobbies,
};
use crate::models::{EdgeExplanation, Person};
use crate::services::oracle::JudgmentOracle;
use crate::services::similarity::{SimilarityError, TextSimilarity};

/// Which scoring strategy a run uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScoringStrategy {
    #[default]
    Heuristic,
    Oracle,
}

impl fmt::Display for ScoringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScoringStrategy::Heuristic => write!(f, "heuristic"),
            ScoringStrategy::Oracle => write!(f, "oracle"),
        }
    }
}

/// Weight and explanation for one eligible pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assessment {
    pub weight: f64,
    pub explanation: EdgeExplanation,
    /// A collaborator failed and part or all of the weight was zeroed
    pub degraded: bool,
}

/// Pairwise compatibility weight in [0, 100]
///
/// Callers only pass eligible pairs. Implementations never fail: collaborator
/// errors are folded into a lower weight and flagged as `degraded`.
#[async_trait]
pub trait CompatibilityScorer: Send + Sync {
    async fn score(&self, a: &Person, b: &Person) -> Assessment;

    fn strategy(&self) -> ScoringStrategy;
}

/// Deterministic multi-factor heuristic
#[derive(Clone, Default)]
pub struct HeuristicScorer {
    similarity: Option<Arc<dyn TextSimilarity>>,
}

impl HeuristicScorer {
    pub fn new(similarity: Option<Arc<dyn TextSimilarity>>) -> Self {
        Self { similarity }
    }

    /// Heuristic without the text-similarity factor
    pub fn without_similarity() -> Self {
        Self { similarity: None }
    }

    /// Similarity of `seeker`'s ideal type to `candidate`'s synthesized profile
    async fn directional_similarity(
        similarity: &dyn TextSimilarity,
        seeker: &Person,
        candidate: &Person,
    ) -> Result<f64, SimilarityError> {
        match ideal_type_text(seeker) {
            Some(ideal) => similarity.similarity(ideal, &self_description(candidate)).await,
            None => Ok(0.0),
        }
    }
}

#[async_trait]
impl CompatibilityScorer for HeuristicScorer {
    async fn score(&self, a: &Person, b: &Person) -> Assessment {
        let mut factors = calculate_base_factors(a, b);
        let mut degraded = false;

        if let Some(similarity) = self.similarity.as_deref() {
            let a_to_b = Self::directional_similarity(similarity, a, b).await;
            let b_to_a = Self::directional_similarity(similarity, b, a).await;

            match (a_to_b, b_to_a) {
                (Ok(x), Ok(y)) => factors.ideal_type = ideal_type_score(x, y),
                (Err(e), _) | (_, Err(e)) => {
                    tracing::warn!(
                        backend = similarity.name(),
                        "Text similarity failed for {} + {}: {}",
                        a.name,
                        b.name,
                        e
                    );
                    degraded = true;
                }
            }
        }

        Assessment {
            weight: factors.total(),
            explanation: EdgeExplanation {
                shared_hobbies: shared_hobbies(a, b),
                factors: Some(factors),
                ..EdgeExplanation::default()
            },
            degraded,
        }
    }

    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Heuristic
    }
}

/// Delegates the whole judgment to an external evaluator
#[derive(Clone)]
pub struct OracleScorer {
    oracle: Arc<dyn JudgmentOracle>,
}

impl OracleScorer {
    pub fn new(oracle: Arc<dyn JudgmentOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl CompatibilityScorer for OracleScorer {
    async fn score(&self, a: &Person, b: &Person) -> Assessment {
        match self.oracle.judge(a, b).await {
            Ok(verdict) => {
                tracing::debug!("Oracle scored {} + {}: {}", a.name, b.name, verdict.score);
                Assessment {
                    weight: verdict.score,
                    explanation: EdgeExplanation {
                        shared_hobbies: shared_hobbies(a, b),
                        rationale: Some(verdict.rationale).filter(|r| !r.is_empty()),
                        shared_interests: verdict.shared_interests,
                        key_matches: verdict.key_matches,
                        concerns: verdict.concerns,
                        factors: None,
                    },
                    degraded: false,
                }
            }
            Err(e) => {
                tracing::warn!("Oracle evaluation failed for {} + {}: {}", a.name, b.name, e);
                Assessment {
                    weight: 0.0,
                    explanation: EdgeExplanation {
                        concerns: vec!["Evaluation failed".to_string()],
                        ..EdgeExplanation::default()
                    },
                    degraded: true,
                }
            }
        }
    }

    fn strategy(&self) -> ScoringStrategy {
        ScoringStrategy::Oracle
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::oracle::{OracleError, OracleVerdict};
    use crate::services::similarity::LexicalSimilarity;

    struct FailingSimilarity;

    #[async_trait]
    impl TextSimilarity for FailingSimilarity {
        async fn similarity(&self, _: &str, _: &str) -> Result<f64, SimilarityError> {
            Err(SimilarityError::ApiError("unavailable".to_string()))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    struct FixedOracle(Option<f64>);

    #[async_trait]
    impl JudgmentOracle for FixedOracle {
        async fn judge(&self, _: &Person, _: &Person) -> Result<OracleVerdict, OracleError> {
            match self.0 {
                Some(score) => Ok(OracleVerdict {
                    score,
                    rationale: "Both love the outdoors.".to_string(),
                    shared_interests: vec!["Hiking".to_string()],
                    key_matches: vec![],
                    concerns: vec!["Different years".to_string()],
                }),
                None => Err(OracleError::InvalidResponse("garbled".to_string())),
            }
        }
    }

    fn create_test_person(name: &str, type_description: &str, traits: &[&str]) -> Person {
        Person {
            type_description: Some(type_description.to_string()),
            self_traits: traits.iter().map(|s| s.to_string()).collect(),
            hobbies: ["Hiking".to_string(), "Cooking".to_string()].into_iter().collect(),
            social_battery: Some("Netflix is my best friend".to_string()),
            ..Person::new(name, format!("{}@usc.edu", name.to_lowercase()))
        }
    }

    #[tokio::test]
    async fn test_heuristic_includes_ideal_type() {
        let a = create_test_person("Ana", "funny and adventurous", &["Smart"]);
        let b = create_test_person("Ben", "smart", &["Funny", "Adventurous"]);

        let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
        let assessment = scorer.score(&a, &b).await;
        let factors = assessment.explanation.factors.unwrap();

        assert!(factors.ideal_type > 0.0);
        assert!(!assessment.degraded);
        assert_eq!(assessment.weight, factors.total());
        assert_eq!(assessment.explanation.shared_hobbies, vec!["Cooking", "Hiking"]);
    }

    #[tokio::test]
    async fn test_heuristic_survives_similarity_failure() {
        let a = create_test_person("Ana", "funny", &["Smart"]);
        let b = create_test_person("Ben", "smart", &["Funny"]);

        let failing = HeuristicScorer::new(Some(Arc::new(FailingSimilarity)));
        let baseline = HeuristicScorer::without_similarity();

        let degraded = failing.score(&a, &b).await;
        let expected = baseline.score(&a, &b).await;

        assert!(degraded.degraded);
        assert_eq!(degraded.weight, expected.weight);
        assert_eq!(degraded.explanation.factors.unwrap().ideal_type, 0.0);
    }

    #[tokio::test]
    async fn test_heuristic_is_symmetric() {
        let a = create_test_person("Ana", "someone kind who cooks", &["Funny"]);
        let b = create_test_person("Ben", "adventurous hiker", &["Kind/caring"]);

        let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
        assert_eq!(scorer.score(&a, &b).await.weight, scorer.score(&b, &a).await.weight);
    }

    #[tokio::test]
    async fn test_oracle_verdict_becomes_assessment() {
        let scorer = OracleScorer::new(Arc::new(FixedOracle(Some(88.0))));
        let a = create_test_person("Ana", "", &[]);
        let b = create_test_person("Ben", "", &[]);

        let assessment = scorer.score(&a, &b).await;
        assert_eq!(assessment.weight, 88.0);
        assert_eq!(
            assessment.explanation.rationale.as_deref(),
            Some("Both love the outdoors.")
        );
        assert_eq!(assessment.explanation.concerns, vec!["Different years"]);
        assert_eq!(scorer.strategy(), ScoringStrategy::Oracle);
    }

    #[tokio::test]
    async fn test_oracle_failure_zeroes_weight() {
        let scorer = OracleScorer::new(Arc::new(FixedOracle(None)));
        let a = create_test_person("Ana", "", &[]);
        let b = create_test_person("Ben", "", &[]);

        let assessment = scorer.score(&a, &b).await;
        assert_eq!(assessment.weight, 0.0);
        assert!(assessment.degraded);
    }
}
