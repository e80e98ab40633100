// External collaborators and input plumbing
pub mod enrichment;
pub mod ingest;
pub mod oracle;
pub mod similarity;

pub use enrichment::{enrich_cohort, EnrichmentError, EnrichmentSummary, HttpProfileSource, ProfileSource};
pub use ingest::{load_responses, parse_responses, parse_responses_as, IngestError, InputFormat};
pub use oracle::{ClaudeJudge, JudgmentOracle, OracleError, OracleVerdict};
pub use similarity::{EmbeddingSimilarity, LexicalSimilarity, SimilarityError, TextSimilarity};
