//! Cohort Match - optimal one-to-one pairing of survey respondents
//!
//! This library scores every eligible pair of a cohort, either with a
//! deterministic multi-factor heuristic or through an external judgment
//! oracle, and selects the pairs that maximize total compatibility with a
//! maximum-weight matching on the general compatibility graph.

pub mod config;
pub mod core;
pub mod export;
pub mod models;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    max_weight_matching, CompatibilityGraph, CompatibilityScorer, HeuristicScorer, Matcher,
    Matching, OracleScorer, PipelineError, ScoringStrategy,
};
pub use self::models::{MatchReport, MatchedPair, PairKey, Person, SurveyResponse};
