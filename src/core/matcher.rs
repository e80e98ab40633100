use chrono::Utc;
use std::cmp::Ordering;
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::core::blossom::MatchingError;
use crate::core::builder::{CompatibilityGraphBuilder, GraphBuildStats};
use crate::core::graph::{GraphError, Matching};
use crate::core::scoring::shared_hobbies;
use crate::core::strategy::{CompatibilityScorer, HeuristicScorer, ScoringStrategy};
use crate::models::{MatchReport, MatchedPair, Person, RunStats, UnmatchedPerson};
use crate::services::similarity::LexicalSimilarity;

/// Fatal failures of a matching run
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Compatibility graph invariant violated: {0}")]
    Graph(#[from] GraphError),

    #[error("Matching engine failed: {0}")]
    Matching(#[from] MatchingError),
}

pub const DEFAULT_CONCURRENCY: usize = 8;

/// Main matching orchestrator
///
/// # Pipeline Stages
/// 1. Eligibility filtering and scoring of every unordered pair
/// 2. Maximum-weight matching over the resulting graph
/// 3. Result assembly, ordered by descending score
#[derive(Clone)]
pub struct Matcher {
    builder: CompatibilityGraphBuilder,
}

impl Matcher {
    pub fn new(scorer: Arc<dyn CompatibilityScorer>, concurrency: usize) -> Self {
        Self {
            builder: CompatibilityGraphBuilder::new(scorer, concurrency),
        }
    }

    /// Heuristic scoring with the local lexical text similarity
    pub fn with_default_scorer() -> Self {
        let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
        Self::new(Arc::new(scorer), DEFAULT_CONCURRENCY)
    }

    pub fn strategy(&self) -> ScoringStrategy {
        self.builder.scorer().strategy()
    }

    /// Pair up the cohort
    ///
    /// Collaborator failures only lower individual weights. Errors returned
    /// here mean the graph or the engine itself is broken.
    pub async fn run(&self, people: &[Person]) -> Result<MatchReport, PipelineError> {
        tracing::info!("Matching cohort of {} people", people.len());

        let (graph, build_stats) = self.builder.build(people).await?;
        tracing::info!(
            "Compatibility graph has {} edges over {} people",
            graph.edge_count(),
            graph.vertex_count()
        );

        let matching = graph.max_weight_matching()?;
        tracing::info!(
            "Selected {} pairs with total weight {:.1}",
            matching.len(),
            matching.total_weight()
        );

        Ok(assemble_results(people, matching, &build_stats, self.strategy()))
    }
}

impl Default for Matcher {
    fn default() -> Self {
        Self::with_default_scorer()
    }
}

/// Order the matching by descending score and attach the report fields
pub fn assemble_results(
    people: &[Person],
    matching: Matching,
    build_stats: &GraphBuildStats,
    strategy: ScoringStrategy,
) -> MatchReport {
    let total_weight = matching.total_weight();
    let mut edges = matching.into_edges();

    // Sort by score (descending) and then by pair key
    edges.sort_by(|a, b| {
        b.weight()
            .partial_cmp(&a.weight())
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key().cmp(&b.key()))
    });

    let mut matched = vec![false; people.len()];
    let matches: Vec<MatchedPair> = edges
        .into_iter()
        .enumerate()
        .map(|(position, edge)| {
            let key = edge.key();
            let (first, second) = (&people[key.low()], &people[key.high()]);
            matched[key.low()] = true;
            matched[key.high()] = true;

            let explanation = edge.explanation().clone();
            MatchedPair {
                rank: position + 1,
                pair: key,
                person1_name: first.name.clone(),
                person1_email: first.email.clone(),
                person2_name: second.name.clone(),
                person2_email: second.email.clone(),
                score: edge.weight(),
                shared_hobbies: shared_hobbies(first, second),
                person1_looking_for: first.looking_for.clone(),
                person2_looking_for: second.looking_for.clone(),
                rationale: explanation.rationale,
                shared_interests: explanation.shared_interests,
                key_matches: explanation.key_matches,
                concerns: explanation.concerns,
                factors: explanation.factors,
            }
        })
        .collect();

    let unmatched: Vec<UnmatchedPerson> = people
        .iter()
        .enumerate()
        .filter(|(index, _)| !matched[*index])
        .map(|(index, person)| UnmatchedPerson {
            index,
            name: person.name.clone(),
            email: person.email.clone(),
        })
        .collect();

    let stats = RunStats {
        strategy: strategy.to_string(),
        cohort_size: people.len(),
        pairs_evaluated: build_stats.pairs_evaluated,
        eligible_pairs: build_stats.eligible_pairs,
        edges: build_stats.edges,
        degraded_pairs: build_stats.degraded_pairs,
        matched_pairs: matches.len(),
        matched_people: 2 * matches.len(),
        unmatched_people: people.len() - 2 * matches.len(),
        total_weight,
    };

    MatchReport {
        run_id: Uuid::new_v4(),
        generated_at: Utc::now(),
        stats,
        matches,
        unmatched,
    }
}
