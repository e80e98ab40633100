use futures::stream::{self, StreamExt};
use std::sync::Arc;

use crate::core::eligibility::is_eligible;
use crate::core::graph::{CompatibilityGraph, GraphError};
use crate::core::strategy::{Assessment, CompatibilityScorer};
use crate::models::{PairKey, Person};

/// Counters collected while building a graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphBuildStats {
    pub pairs_evaluated: usize,
    pub eligible_pairs: usize,
    pub zero_weight_pairs: usize,
    pub degraded_pairs: usize,
    pub edges: usize,
}

/// Evaluates every unordered pair of a cohort and collects the weighted edges
///
/// # Pipeline Stages
/// 1. Eligibility filter (pure, no collaborator calls)
/// 2. Scoring of eligible pairs, fanned out up to `concurrency` at a time
/// 3. Edge insertion in pair-key order, dropping zero weights
#[derive(Clone)]
pub struct CompatibilityGraphBuilder {
    scorer: Arc<dyn CompatibilityScorer>,
    concurrency: usize,
}

impl CompatibilityGraphBuilder {
    pub fn new(scorer: Arc<dyn CompatibilityScorer>, concurrency: usize) -> Self {
        Self {
            scorer,
            concurrency: concurrency.max(1),
        }
    }

    pub fn scorer(&self) -> &dyn CompatibilityScorer {
        self.scorer.as_ref()
    }

    pub async fn build(
        &self,
        people: &[Person],
    ) -> Result<(CompatibilityGraph, GraphBuildStats), GraphError> {
        let n = people.len();
        let mut stats = GraphBuildStats {
            pairs_evaluated: n * n.saturating_sub(1) / 2,
            ..GraphBuildStats::default()
        };

        let eligible: Vec<PairKey> = (0..n)
            .flat_map(|i| (i + 1..n).filter_map(move |j| PairKey::new(i, j)))
            .filter(|key| is_eligible(&people[key.low()], &people[key.high()]))
            .collect();
        stats.eligible_pairs = eligible.len();

        tracing::info!(
            "{} of {} pairs eligible, scoring with {} strategy",
            stats.eligible_pairs,
            stats.pairs_evaluated,
            self.scorer.strategy()
        );

        let scorer = self.scorer.as_ref();
        let mut assessed: Vec<(PairKey, Assessment)> = stream::iter(eligible)
            .map(|key| async move {
                let assessment = scorer.score(&people[key.low()], &people[key.high()]).await;
                (key, assessment)
            })
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        // Completion order is arbitrary; insertion order feeds the matching tie-break
        assessed.sort_by_key(|(key, _)| *key);

        let mut graph = CompatibilityGraph::new(n);
        for (key, assessment) in assessed {
            if assessment.degraded {
                stats.degraded_pairs += 1;
            }
            if assessment.weight > 0.0 {
                graph.connect(key.low(), key.high(), assessment.weight, assessment.explanation)?;
            } else {
                tracing::debug!(
                    "Dropping zero-weight pair {} + {}",
                    people[key.low()].name,
                    people[key.high()].name
                );
                stats.zero_weight_pairs += 1;
            }
        }
        stats.edges = graph.edge_count();

        if stats.degraded_pairs > 0 {
            tracing::warn!(
                "{} pairs scored with degraded collaborator results",
                stats.degraded_pairs
            );
        }

        Ok((graph, stats))
    }
}
