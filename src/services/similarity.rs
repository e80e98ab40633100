use async_trait::async_trait;
use moka::future::Cache;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::models::survey::is_placeholder;

/// Errors from a text-similarity backend
#[derive(Debug, Error)]
pub enum SimilarityError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Embedding API returned error: {0}")]
    ApiError(String),

    #[error("Invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Semantic closeness of two texts in [0, 1]
///
/// Empty or placeholder text must yield 0 rather than an error.
#[async_trait]
pub trait TextSimilarity: Send + Sync {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64, SimilarityError>;

    fn name(&self) -> &'static str;
}

/// Cosine similarity clamped to [0, 1]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        tracing::warn!(
            a_len = a.len(),
            b_len = b.len(),
            "embedding dimension mismatch; returning zero similarity"
        );
        return 0.0;
    }

    let dot: f64 = a.iter().zip(b).map(|(x, y)| *x as f64 * *y as f64).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
}

/// Local bag-of-words cosine similarity
///
/// Needs no network and is deterministic, so it is the default backend.
#[derive(Debug, Clone, Default)]
pub struct LexicalSimilarity;

impl LexicalSimilarity {
    pub fn new() -> Self {
        Self
    }

    fn term_frequencies(text: &str) -> HashMap<String, f64> {
        let mut counts = HashMap::new();
        for token in text
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| token.len() > 1)
        {
            *counts.entry(token.to_lowercase()).or_insert(0.0) += 1.0;
        }
        counts
    }

    pub fn score(text_a: &str, text_b: &str) -> f64 {
        if is_placeholder(text_a) || is_placeholder(text_b) {
            return 0.0;
        }

        let a = Self::term_frequencies(text_a);
        let b = Self::term_frequencies(text_b);

        let dot: f64 = a
            .iter()
            .filter_map(|(term, weight)| b.get(term).map(|other| weight * other))
            .sum();
        let norm_a = a.values().map(|w| w * w).sum::<f64>().sqrt();
        let norm_b = b.values().map(|w| w * w).sum::<f64>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }

        (dot / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

#[async_trait]
impl TextSimilarity for LexicalSimilarity {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64, SimilarityError> {
        Ok(Self::score(text_a, text_b))
    }

    fn name(&self) -> &'static str {
        "lexical"
    }
}

#[derive(Debug, Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: Vec<&'a str>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// Similarity over sentence embeddings from an OpenAI-compatible endpoint
///
/// Each description is compared against every other respondent, so vectors
/// are cached by text for the lifetime of the client.
pub struct EmbeddingSimilarity {
    base_url: String,
    api_key: Option<String>,
    model: String,
    client: Client,
    cache: Cache<String, Arc<Vec<f32>>>,
}

impl EmbeddingSimilarity {
    pub fn new(
        base_url: String,
        api_key: Option<String>,
        model: String,
        timeout: Duration,
        cache_size: u64,
    ) -> Result<Self, SimilarityError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            client,
            cache: Cache::new(cache_size),
        })
    }

    async fn embed(&self, text: &str) -> Result<Arc<Vec<f32>>, SimilarityError> {
        if let Some(vector) = self.cache.get(text).await {
            tracing::trace!("Embedding cache hit");
            return Ok(vector);
        }

        let url = format!("{}/embeddings", self.base_url.trim_end_matches('/'));
        let mut request = self.client.post(&url).json(&EmbeddingRequest {
            model: &self.model,
            input: vec![text],
        });
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(SimilarityError::ApiError(format!(
                "Failed to embed text: {}",
                response.status()
            )));
        }

        let body: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| SimilarityError::InvalidResponse(e.to_string()))?;

        let vector = body
            .data
            .into_iter()
            .next()
            .map(|d| Arc::new(d.embedding))
            .ok_or_else(|| SimilarityError::InvalidResponse("Missing embedding data".into()))?;

        self.cache.insert(text.to_string(), vector.clone()).await;
        Ok(vector)
    }
}

#[async_trait]
impl TextSimilarity for EmbeddingSimilarity {
    async fn similarity(&self, text_a: &str, text_b: &str) -> Result<f64, SimilarityError> {
        if is_placeholder(text_a) || is_placeholder(text_b) {
            return Ok(0.0);
        }

        let a = self.embed(text_a.trim()).await?;
        let b = self.embed(text_b.trim()).await?;
        Ok(cosine_similarity(&a, &b))
    }

    fn name(&self) -> &'static str {
        "embeddings"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cosine_similarity_identical() {
        let v = vec![0.3, 0.4, 0.5];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_cosine_similarity_clamps_opposite_vectors() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_cosine_similarity_dimension_mismatch() {
        assert_eq!(cosine_similarity(&[1.0, 0.0, 0.0], &[1.0, 0.0]), 0.0);
    }

    #[test]
    fn test_lexical_similarity_bounds() {
        let same = LexicalSimilarity::score("funny adventurous", "Adventurous, funny");
        assert!((same - 1.0).abs() < 1e-9);

        let partial = LexicalSimilarity::score(
            "someone funny who loves hiking",
            "Personality: Funny, Smart. Hobbies: Reading.",
        );
        assert!(partial > 0.0 && partial < 1.0);

        assert_eq!(LexicalSimilarity::score("tall", "short"), 0.0);
    }

    #[tokio::test]
    async fn test_placeholder_text_scores_zero() {
        let lexical = LexicalSimilarity::new();
        assert_eq!(lexical.similarity("", "anything").await.unwrap(), 0.0);
        assert_eq!(lexical.similarity("nan", "nan").await.unwrap(), 0.0);
    }

    #[tokio::test]
    async fn test_embedding_similarity_uses_endpoint_and_cache() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/embeddings")
            .match_header("authorization", "Bearer test_key")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"embedding":[0.6,0.8]}]}"#)
            .expect(1)
            .create_async()
            .await;

        let similarity = EmbeddingSimilarity::new(
            server.url(),
            Some("test_key".to_string()),
            "test-model".to_string(),
            Duration::from_secs(5),
            100,
        )
        .unwrap();

        let score = similarity.similarity("same text", "same text").await.unwrap();
        assert!((score - 1.0).abs() < 1e-6);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_embedding_similarity_surfaces_api_errors() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", "/embeddings")
            .with_status(503)
            .create_async()
            .await;

        let similarity = EmbeddingSimilarity::new(
            server.url(),
            None,
            "test-model".to_string(),
            Duration::from_secs(5),
            100,
        )
        .unwrap();

        let result = similarity.similarity("one", "two").await;
        assert!(matches!(result, Err(SimilarityError::ApiError(_))));
    }
}
