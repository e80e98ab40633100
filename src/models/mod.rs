// Model exports
pub mod domain;
pub mod report;
pub mod survey;

pub use domain::{
    CompatibilityEdge, EdgeExplanation, FactorBreakdown, GenderCategory, PairKey, Person,
    ProfessionalProfile,
};
pub use report::{MatchReport, MatchedPair, RunStats, UnmatchedPerson};
pub use survey::SurveyResponse;
