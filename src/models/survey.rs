use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::BTreeSet;

use crate::models::domain::Person;

/// One raw form response, keyed by the form's column headers
///
/// Every field accepts a string, a number or null. Anything else, or a
/// spreadsheet placeholder such as "nan", is treated as absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyResponse {
    #[serde(rename = "Timestamp", default, deserialize_with = "lenient_string")]
    pub timestamp: Option<String>,
    #[serde(rename = "Name (first and last)", alias = "name", default, deserialize_with = "lenient_string")]
    pub name: Option<String>,
    #[serde(rename = "Email", alias = "email", default, deserialize_with = "lenient_string")]
    pub email: Option<String>,
    #[serde(rename = "Gender", alias = "gender", default, deserialize_with = "lenient_string")]
    pub gender: Option<String>,
    #[serde(rename = "Sexual Orientation", alias = "orientation", default, deserialize_with = "lenient_string")]
    pub orientation: Option<String>,
    #[serde(rename = "I'm interested in", alias = "interested_in", default, deserialize_with = "lenient_string")]
    pub interested_in: Option<String>,
    #[serde(rename = "Year in school", alias = "year", default, deserialize_with = "lenient_string")]
    pub year: Option<String>,
    #[serde(rename = "What are you looking for?", alias = "looking_for", default, deserialize_with = "lenient_string")]
    pub looking_for: Option<String>,
    #[serde(rename = "My social battery is...", alias = "social_battery", default, deserialize_with = "lenient_string")]
    pub social_battery: Option<String>,
    #[serde(rename = "On a Friday night you'll find me..", alias = "friday_night", default, deserialize_with = "lenient_string")]
    pub friday_night: Option<String>,
    #[serde(rename = "My fav social media", alias = "social_media", default, deserialize_with = "lenient_string")]
    pub social_media: Option<String>,
    #[serde(rename = "How would your friends describe you? (pick top 3)", alias = "self_traits", default, deserialize_with = "lenient_string")]
    pub self_traits: Option<String>,
    #[serde(rename = "What do you do for fun? (top 3)", alias = "hobbies", default, deserialize_with = "lenient_string")]
    pub hobbies: Option<String>,
    #[serde(rename = "Dream date activity?", alias = "dream_date", default, deserialize_with = "lenient_string")]
    pub dream_date: Option<String>,
    #[serde(rename = "Drinking", alias = "drinking", default, deserialize_with = "lenient_string")]
    pub drinking: Option<String>,
    #[serde(rename = "Weed", alias = "weed", default, deserialize_with = "lenient_string")]
    pub weed: Option<String>,
    #[serde(rename = "What matters most in a partner? (Pick your top 3)", alias = "partner_values", default, deserialize_with = "lenient_string")]
    pub partner_values: Option<String>,
    #[serde(
        rename = "How important is it that they share your interests/hobbies? (Scale 1-5)",
        alias = "shared_interests_importance",
        default,
        deserialize_with = "lenient_string"
    )]
    pub shared_interests_importance: Option<String>,
    #[serde(rename = "Describe your type (qualities, physical type, etc.)", alias = "type_description", default, deserialize_with = "lenient_string")]
    pub type_description: Option<String>,
    #[serde(rename = "Career/ambition level?", alias = "ambition", default, deserialize_with = "lenient_string")]
    pub ambition: Option<String>,
    #[serde(rename = "Deal-breakers?", alias = "dealbreakers", default, deserialize_with = "lenient_string")]
    pub dealbreakers: Option<String>,
}

impl SurveyResponse {
    /// Normalize into a `Person`
    ///
    /// Returns `None` only when the row has neither a name nor an email.
    pub fn into_person(self) -> Option<Person> {
        if self.name.is_none() && self.email.is_none() {
            return None;
        }

        Some(Person {
            name: self.name.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            gender: self.gender,
            interested_in: split_answers(self.interested_in.as_deref(), ",")
                .into_iter()
                .collect(),
            year: self.year,
            looking_for: self.looking_for,
            social_battery: self.social_battery,
            friday_night: self.friday_night,
            self_traits: split_answers(self.self_traits.as_deref(), ", "),
            hobbies: split_answers(self.hobbies.as_deref(), ", "),
            dream_date: self.dream_date,
            drinking: self.drinking,
            substance_use: self.weed,
            ambition: self.ambition,
            partner_values: split_answers(self.partner_values.as_deref(), ", "),
            shared_interests_importance: parse_importance(self.shared_interests_importance.as_deref()),
            type_description: self.type_description,
            dealbreakers: self.dealbreakers,
            professional: None,
        })
    }
}

/// True for empty strings and the placeholders spreadsheets emit for blanks
pub fn is_placeholder(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("nan")
        || trimmed.eq_ignore_ascii_case("n/a")
        || trimmed.eq_ignore_ascii_case("null")
}

/// Split a multi-select answer into its non-empty options
pub fn split_answers(raw: Option<&str>, separator: &str) -> BTreeSet<String> {
    raw.map(|value| {
        value
            .split(separator)
            .map(str::trim)
            .filter(|item| !is_placeholder(item))
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}

/// Parse a 1-5 rating leniently ("4", "4.0", " 3.5 "), clamped but not rounded
pub fn parse_importance(raw: Option<&str>) -> Option<f64> {
    let value: f64 = raw?.trim().parse().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(1.0, 5.0))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let text = match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    };
    Ok(text
        .map(|s| s.trim().to_string())
        .filter(|s| !is_placeholder(s)))
}
