use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use validator::Validate;

use crate::models::Person;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Errors that can occur when asking the judgment service about a pair
#[derive(Debug, Error)]
pub enum OracleError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Judgment API returned error: {0}")]
    ApiError(String),

    #[error("Invalid verdict: {0}")]
    InvalidResponse(String),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),
}

/// Pairwise judgment returned by the external evaluator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct OracleVerdict {
    #[serde(rename = "compatibility_score")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub score: f64,
    #[serde(rename = "reasoning", default)]
    pub rationale: String,
    #[serde(default)]
    pub shared_interests: Vec<String>,
    #[serde(default)]
    pub key_matches: Vec<String>,
    #[serde(rename = "potential_concerns", default)]
    pub concerns: Vec<String>,
}

/// External evaluator that scores a pair of profiles
#[async_trait]
pub trait JudgmentOracle: Send + Sync {
    async fn judge(&self, a: &Person, b: &Person) -> Result<OracleVerdict, OracleError>;
}

/// Judgment oracle backed by the Anthropic Messages API
pub struct ClaudeJudge {
    base_url: String,
    api_key: String,
    model: String,
    max_tokens: u32,
    client: Client,
}

#[derive(Debug, Serialize)]
struct MessagesRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    messages: Vec<RequestMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    #[serde(default)]
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    text: Option<String>,
}

impl ClaudeJudge {
    pub fn new(
        base_url: String,
        api_key: String,
        model: String,
        max_tokens: u32,
        timeout: Duration,
    ) -> Result<Self, OracleError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            base_url,
            api_key,
            model,
            max_tokens,
            client,
        })
    }

    fn headers(&self) -> Result<HeaderMap, OracleError> {
        let mut headers = HeaderMap::new();
        headers.insert("x-api-key", HeaderValue::from_str(&self.api_key)?);
        headers.insert("anthropic-version", HeaderValue::from_static(ANTHROPIC_VERSION));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }
}

#[async_trait]
impl JudgmentOracle for ClaudeJudge {
    async fn judge(&self, a: &Person, b: &Person) -> Result<OracleVerdict, OracleError> {
        let url = format!("{}/v1/messages", self.base_url.trim_end_matches('/'));
        let request = MessagesRequest {
            model: &self.model,
            max_tokens: self.max_tokens,
            messages: vec![RequestMessage {
                role: "user",
                content: build_prompt(a, b),
            }],
        };

        tracing::debug!(model = %self.model, "Judging {} + {}", a.name, b.name);

        let response = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(OracleError::ApiError(format!("{}: {}", status, body)));
        }

        let body: MessagesResponse = response
            .json()
            .await
            .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;

        let text = body
            .content
            .into_iter()
            .filter(|block| block.kind == "text")
            .find_map(|block| block.text)
            .ok_or_else(|| OracleError::InvalidResponse("No text content in response".into()))?;

        parse_verdict(&text)
    }
}

/// Extract and validate the JSON verdict from a model reply
///
/// The reply may wrap the JSON in a fenced code block.
pub fn parse_verdict(text: &str) -> Result<OracleVerdict, OracleError> {
    let json = extract_json(text);
    let verdict: OracleVerdict = serde_json::from_str(json)
        .map_err(|e| OracleError::InvalidResponse(format!("Failed to parse verdict: {}", e)))?;
    verdict
        .validate()
        .map_err(|e| OracleError::InvalidResponse(e.to_string()))?;
    Ok(verdict)
}

fn extract_json(text: &str) -> &str {
    if let Some((_, rest)) = text.split_once("```json") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    if let Some((_, rest)) = text.split_once("```") {
        return rest.split("```").next().unwrap_or(rest).trim();
    }
    text.trim()
}

/// Readable profile block used in the judgment prompt
pub fn person_profile(person: &Person) -> String {
    fn field(value: Option<&str>) -> &str {
        value.filter(|v| !v.trim().is_empty()).unwrap_or("N/A")
    }
    fn list<'a>(values: impl Iterator<Item = &'a String>) -> String {
        let joined = values.cloned().collect::<Vec<_>>().join(", ");
        if joined.is_empty() {
            "N/A".to_string()
        } else {
            joined
        }
    }

    let importance = person
        .shared_interests_importance
        .map(|v| v.to_string())
        .unwrap_or_else(|| "N/A".to_string());

    let mut profile = format!(
        "Name: {name}\n\
         Gender: {gender}\n\
         Year: {year}\n\
         Looking for: {looking_for}\n\
         \n\
         Personality Traits: {traits}\n\
         Social Battery: {social}\n\
         Friday Nights: {friday}\n\
         Hobbies: {hobbies}\n\
         Dream Date: {dream}\n\
         \n\
         Lifestyle:\n\
         - Drinking: {drinking}\n\
         - Weed: {weed}\n\
         - Ambition: {ambition}\n\
         \n\
         What they value in a partner: {values}\n\
         Shared interests importance (1-5): {importance}\n\
         Their type: {type_description}\n\
         Deal-breakers: {dealbreakers}",
        name = person.name,
        gender = field(person.gender.as_deref()),
        year = field(person.year.as_deref()),
        looking_for = field(person.looking_for.as_deref()),
        traits = list(person.self_traits.iter()),
        social = field(person.social_battery.as_deref()),
        friday = field(person.friday_night.as_deref()),
        hobbies = list(person.hobbies.iter()),
        dream = field(person.dream_date.as_deref()),
        drinking = field(person.drinking.as_deref()),
        weed = field(person.substance_use.as_deref()),
        ambition = field(person.ambition.as_deref()),
        values = list(person.partner_values.iter()),
        importance = importance,
        type_description = field(person.type_description.as_deref()),
        dealbreakers = field(person.dealbreakers.as_deref()),
    );

    if let Some(professional) = person.professional.as_ref().filter(|p| !p.is_empty()) {
        profile.push_str("\n\nProfessional background:");
        if let Some(headline) = &professional.headline {
            profile.push_str(&format!("\n- Headline: {}", headline));
        }
        if let Some(role) = &professional.current_role {
            profile.push_str(&format!("\n- Current role: {}", role));
        }
        if !professional.education.is_empty() {
            profile.push_str(&format!("\n- Education: {}", professional.education.join(", ")));
        }
        if !professional.skills.is_empty() {
            profile.push_str(&format!("\n- Skills: {}", professional.skills.join(", ")));
        }
        if !professional.inferred_traits.is_empty() {
            profile.push_str(&format!(
                "\n- Inferred traits: {}",
                professional.inferred_traits.join(", ")
            ));
        }
    }

    profile
}

/// Matchmaking prompt for one pair
pub fn build_prompt(a: &Person, b: &Person) -> String {
    format!(
        r#"You are an expert matchmaker analyzing compatibility between two students for a blind date matching program.

Here are their profiles:

PERSON A:
{profile_a}

PERSON B:
{profile_b}

Please analyze their compatibility across these dimensions:
1. Personality compatibility (traits, social energy, lifestyle)
2. Shared interests and hobbies
3. What each person wants vs. what the other person offers
4. Lifestyle alignment (drinking, ambition, social habits)
5. Deal-breakers (if any)

Provide your analysis in JSON format:
{{
    "compatibility_score": <number 0-100>,
    "reasoning": "<2-3 sentence explanation>",
    "shared_interests": ["<interest1>", "<interest2>"],
    "key_matches": ["<what makes them compatible>"],
    "potential_concerns": ["<any concerns>"]
}}

Be honest - some matches will be great (80-100), some okay (50-79), some poor (0-49)."#,
        profile_a = person_profile(a),
        profile_b = person_profile(b),
    )
}
