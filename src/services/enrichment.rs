use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::models::{Person, ProfessionalProfile};

/// Errors that can occur when fetching supplementary profile data
#[derive(Debug, Error)]
pub enum EnrichmentError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Profile API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Source of career/education signals for a respondent
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn fetch(&self, person: &Person) -> Result<ProfessionalProfile, EnrichmentError>;
}

/// Outcome counters of an enrichment pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnrichmentSummary {
    pub enriched: usize,
    pub missing: usize,
    pub failed: usize,
}

/// HTTP client for a professional-profile lookup service
///
/// Looks profiles up by contact email: `GET {base}/profiles?email=...`.
pub struct HttpProfileSource {
    base_url: String,
    api_key: Option<String>,
    client: Client,
}

impl HttpProfileSource {
    pub fn new(base_url: String, api_key: Option<String>, timeout: Duration) -> Result<Self, EnrichmentError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url,
            api_key,
            client,
        })
    }
}

#[async_trait]
impl ProfileSource for HttpProfileSource {
    async fn fetch(&self, person: &Person) -> Result<ProfessionalProfile, EnrichmentError> {
        let url = format!(
            "{}/profiles?email={}",
            self.base_url.trim_end_matches('/'),
            urlencoding::encode(&person.email)
        );

        tracing::debug!("Fetching professional profile for: {}", person.email);

        let mut request = self.client.get(&url);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }
        let response = request.send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(EnrichmentError::NotFound(person.email.clone()));
        }
        if !response.status().is_success() {
            return Err(EnrichmentError::ApiError(format!(
                "Failed to fetch profile: {}",
                response.status()
            )));
        }

        let json: Value = response.json().await?;
        let data = json.get("data").unwrap_or(&json);
        parse_profile(data)
    }
}

/// Pick out whichever sections are present; malformed sections are dropped
pub fn parse_profile(data: &Value) -> Result<ProfessionalProfile, EnrichmentError> {
    if !data.is_object() {
        return Err(EnrichmentError::InvalidResponse("Expected a profile object".into()));
    }

    let text = |key: &str| {
        data.get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let list = |key: &str| -> Vec<String> {
        data.get(key)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| {
                        item.as_str()
                            .map(str::to_string)
                            .or_else(|| item.get("name").and_then(Value::as_str).map(str::to_string))
                    })
                    .collect()
            })
            .unwrap_or_default()
    };

    let education = data
        .get("education")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(|item| {
                    item.as_str().map(str::to_string).or_else(|| {
                        let school = item.get("school").and_then(Value::as_str)?;
                        match item.get("degree").and_then(Value::as_str) {
                            Some(degree) => Some(format!("{} ({})", school, degree)),
                            None => Some(school.to_string()),
                        }
                    })
                })
                .collect()
        })
        .unwrap_or_default();

    Ok(ProfessionalProfile {
        headline: text("headline"),
        current_role: text("currentRole").or_else(|| text("current_role")),
        skills: list("skills"),
        education,
        inferred_traits: list("traits"),
    })
}

/// Attach supplementary data to every person the source knows about
///
/// Failures only leave the person's `professional` field empty.
pub async fn enrich_cohort(
    source: &dyn ProfileSource,
    people: &mut [Person],
    concurrency: usize,
) -> EnrichmentSummary {
    let results: Vec<(usize, Result<ProfessionalProfile, EnrichmentError>)> = {
        let people_ref: &[Person] = people;
        stream::iter(people_ref.iter().enumerate())
            .map(|(index, person)| async move { (index, source.fetch(person).await) })
            .buffer_unordered(concurrency.max(1))
            .collect()
            .await
    };

    let mut summary = EnrichmentSummary::default();
    for (index, result) in results {
        match result {
            Ok(profile) if !profile.is_empty() => {
                people[index].professional = Some(profile);
                summary.enriched += 1;
            }
            Ok(_) | Err(EnrichmentError::NotFound(_)) => summary.missing += 1,
            Err(e) => {
                tracing::warn!("Profile enrichment failed for {}: {}", people[index].email, e);
                summary.failed += 1;
            }
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_profile_partial_sections() {
        let profile = parse_profile(&json!({
            "headline": "Economics @ USC",
            "skills": ["Excel", {"name": "Python"}, 42],
            "education": [{"school": "USC", "degree": "BA"}],
            "experience": "not a list"
        }))
        .unwrap();

        assert_eq!(profile.headline.as_deref(), Some("Economics @ USC"));
        assert_eq!(profile.skills, vec!["Excel", "Python"]);
        assert_eq!(profile.education, vec!["USC (BA)"]);
        assert!(profile.current_role.is_none());
    }

    #[test]
    fn test_parse_profile_rejects_non_object() {
        assert!(parse_profile(&json!(["nope"])).is_err());
    }

    #[tokio::test]
    async fn test_enrich_cohort_tolerates_failures() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/profiles")
            .match_query(mockito::Matcher::UrlEncoded("email".into(), "ana@usc.edu".into()))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data": {"headline": "Film student", "skills": ["Editing"]}}"#)
            .create_async()
            .await;
        server
            .mock("GET", "/profiles")
            .match_query(mockito::Matcher::UrlEncoded("email".into(), "ben@usc.edu".into()))
            .with_status(404)
            .create_async()
            .await;
        server
            .mock("GET", "/profiles")
            .match_query(mockito::Matcher::UrlEncoded("email".into(), "cleo@usc.edu".into()))
            .with_status(500)
            .create_async()
            .await;

        let source = HttpProfileSource::new(server.url(), None, Duration::from_secs(5)).unwrap();
        let mut people = vec![
            Person::new("Ana", "ana@usc.edu"),
            Person::new("Ben", "ben@usc.edu"),
            Person::new("Cleo", "cleo@usc.edu"),
        ];

        let summary = enrich_cohort(&source, &mut people, 2).await;

        assert_eq!(
            summary,
            EnrichmentSummary {
                enriched: 1,
                missing: 1,
                failed: 1
            }
        );
        assert_eq!(
            people[0].professional.as_ref().and_then(|p| p.headline.as_deref()),
            Some("Film student")
        );
        assert!(people[1].professional.is_none());
        assert!(people[2].professional.is_none());
    }
}
