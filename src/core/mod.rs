// Core algorithm exports
pub mod blossom;
pub mod builder;
pub mod eligibility;
pub mod graph;
pub mod matcher;
pub mod scoring;
pub mod strategy;

pub use blossom::{max_weight_matching, MatchingError};
pub use builder::{CompatibilityGraphBuilder, GraphBuildStats};
pub use eligibility::is_eligible;
pub use graph::{CompatibilityGraph, GraphError, Matching};
pub use matcher::{assemble_results, Matcher, PipelineError};
pub use scoring::calculate_base_factors;
pub use strategy::{Assessment, CompatibilityScorer, HeuristicScorer, OracleScorer, ScoringStrategy};
