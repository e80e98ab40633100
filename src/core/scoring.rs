use crate::models::{survey::is_placeholder, FactorBreakdown, Person};

pub const SOCIAL_ENERGY_CAP: f64 = 15.0;
pub const FRIDAY_NIGHT_CAP: f64 = 10.0;
pub const SHARED_HOBBIES_CAP: f64 = 20.0;
pub const DREAM_DATE_CAP: f64 = 10.0;
pub const DRINKING_CAP: f64 = 10.0;
pub const SUBSTANCE_USE_CAP: f64 = 5.0;
pub const AMBITION_CAP: f64 = 10.0;
pub const SHARED_VALUES_CAP: f64 = 5.0;
pub const TRAIT_MATCH_CAP: f64 = 15.0;
pub const IDEAL_TYPE_CAP: f64 = 10.0;

/// Number of overlapping picks that earns a full set-overlap factor
const FULL_OVERLAP: f64 = 3.0;

const SOCIAL_ENERGY_LEVELS: [(&str, u8); 4] = [
    ("I'm out every night", 4),
    ("I like going out but also need my nights in", 3),
    ("Homebody but down for occasional plans", 2),
    ("Netflix is my best friend", 1),
];

const DRINKING_LEVELS: [(&str, u8); 4] = [
    ("Go out/party regularly", 4),
    ("Social drinker", 3),
    ("Occasionally", 2),
    ("Nah, not for me", 1),
];

/// How friends describe someone -> what a partner says they want
const TRAIT_TO_VALUE: [(&str, &str); 9] = [
    ("funny", "sense of humor"),
    ("smart", "smart/intellectual"),
    ("hardworking", "ambition/has goals"),
    ("ambitious/driven", "ambition/has goals"),
    ("adventurous", "adventurous"),
    ("kind/caring", "kind/caring"),
    ("life of the party", "fun/spontaneous"),
    ("spontaneous", "fun/spontaneous"),
    ("reliable/loyal", "good communicator"),
];

/// Compute every locally computable factor
///
/// The ideal-type factor needs the text-similarity collaborator and is left at
/// zero here; see [`ideal_type_score`].
pub fn calculate_base_factors(a: &Person, b: &Person) -> FactorBreakdown {
    FactorBreakdown {
        social_energy: social_energy_score(a, b),
        friday_night: categorical_score(a.friday_night.as_deref(), b.friday_night.as_deref(), FRIDAY_NIGHT_CAP),
        shared_hobbies: shared_hobby_score(a, b),
        dream_date: categorical_score(a.dream_date.as_deref(), b.dream_date.as_deref(), DREAM_DATE_CAP),
        drinking: drinking_score(a, b),
        substance_use: categorical_score(a.substance_use.as_deref(), b.substance_use.as_deref(), SUBSTANCE_USE_CAP),
        ambition: ambition_score(a, b),
        shared_values: shared_values_score(a, b),
        trait_match: trait_match_score(a, b),
        ideal_type: 0.0,
    }
}

/// Closer social-energy levels score higher: 15 - 5 per step apart
pub fn social_energy_score(a: &Person, b: &Person) -> f64 {
    ordinal_score(
        ordinal(&SOCIAL_ENERGY_LEVELS, a.social_battery.as_deref()),
        ordinal(&SOCIAL_ENERGY_LEVELS, b.social_battery.as_deref()),
        SOCIAL_ENERGY_CAP,
        5.0,
    )
}

/// Closer drinking habits score higher: 10 - 3 per step apart
pub fn drinking_score(a: &Person, b: &Person) -> f64 {
    ordinal_score(
        ordinal(&DRINKING_LEVELS, a.drinking.as_deref()),
        ordinal(&DRINKING_LEVELS, b.drinking.as_deref()),
        DRINKING_CAP,
        3.0,
    )
}

/// Shared hobbies, weighted by how much both people care about shared interests
pub fn shared_hobby_score(a: &Person, b: &Person) -> f64 {
    let shared = a.hobbies.intersection(&b.hobbies).count() as f64;
    let avg_importance = (a.importance() + b.importance()) / 2.0;

    let score = (shared / FULL_OVERLAP) * SHARED_HOBBIES_CAP * (avg_importance / 5.0);
    score.min(SHARED_HOBBIES_CAP)
}

/// Full points for the same career track, half when either is "balanced"
pub fn ambition_score(a: &Person, b: &Person) -> f64 {
    let a_ambition = a.ambition.as_deref().map(str::trim).unwrap_or("");
    let b_ambition = b.ambition.as_deref().map(str::trim).unwrap_or("");

    if !a_ambition.is_empty() && a_ambition == b_ambition {
        AMBITION_CAP
    } else if is_balanced(a_ambition) || is_balanced(b_ambition) {
        AMBITION_CAP / 2.0
    } else {
        0.0
    }
}

/// Overlap between what both people look for in a partner
pub fn shared_values_score(a: &Person, b: &Person) -> f64 {
    let shared = a.partner_values.intersection(&b.partner_values).count() as f64;
    ((shared / FULL_OVERLAP) * SHARED_VALUES_CAP).min(SHARED_VALUES_CAP)
}

/// How well each person's traits answer the other's wish list
pub fn trait_match_score(a: &Person, b: &Person) -> f64 {
    let a_for_b = trait_matches(b, a) as f64;
    let b_for_a = trait_matches(a, b) as f64;
    let average = (a_for_b + b_for_a) / 2.0;

    ((average / FULL_OVERLAP) * TRAIT_MATCH_CAP).min(TRAIT_MATCH_CAP)
}

/// Count map entries where `seeker` wants the value and `candidate` has the trait
pub fn trait_matches(seeker: &Person, candidate: &Person) -> usize {
    let wanted = lowercase_set(seeker.partner_values.iter());
    let traits = lowercase_set(candidate.self_traits.iter());

    TRAIT_TO_VALUE
        .iter()
        .filter(|(trait_name, value)| wanted.contains(*value) && traits.contains(*trait_name))
        .count()
}

/// Average of the two directional similarities, scaled to 10
pub fn ideal_type_score(a_to_b: f64, b_to_a: f64) -> f64 {
    let average = (a_to_b.clamp(0.0, 1.0) + b_to_a.clamp(0.0, 1.0)) / 2.0;
    average * IDEAL_TYPE_CAP
}

/// Description of a person synthesized from traits and hobbies
pub fn self_description(person: &Person) -> String {
    let traits = person.self_traits.iter().cloned().collect::<Vec<_>>().join(", ");
    let hobbies = person.hobbies.iter().cloned().collect::<Vec<_>>().join(", ");
    format!("Personality: {}. Hobbies: {}.", traits, hobbies)
}

/// The "type" text a person wrote, if it carries any signal
pub fn ideal_type_text(person: &Person) -> Option<&str> {
    person
        .type_description
        .as_deref()
        .map(str::trim)
        .filter(|text| !is_placeholder(text))
}

/// Sorted intersection of both hobby sets
pub fn shared_hobbies(a: &Person, b: &Person) -> Vec<String> {
    a.hobbies.intersection(&b.hobbies).cloned().collect()
}

#[inline]
fn categorical_score(a: Option<&str>, b: Option<&str>, points: f64) -> f64 {
    match (a.map(str::trim), b.map(str::trim)) {
        (Some(x), Some(y)) if !x.is_empty() && x == y => points,
        _ => 0.0,
    }
}

#[inline]
fn ordinal(levels: &[(&str, u8)], value: Option<&str>) -> Option<u8> {
    let value = value?.trim();
    levels
        .iter()
        .find(|(label, _)| *label == value)
        .map(|(_, level)| *level)
}

#[inline]
fn ordinal_score(a: Option<u8>, b: Option<u8>, cap: f64, penalty_per_step: f64) -> f64 {
    match (a, b) {
        (Some(x), Some(y)) => {
            let diff = (x as f64 - y as f64).abs();
            (cap - penalty_per_step * diff).max(0.0)
        }
        _ => 0.0,
    }
}

fn is_balanced(ambition: &str) -> bool {
    ambition.to_lowercase().contains("balanced")
}

fn lowercase_set<'a>(items: impl Iterator<Item = &'a String>) -> std::collections::HashSet<String> {
    items.map(|item| item.trim().to_lowercase()).collect()
}
