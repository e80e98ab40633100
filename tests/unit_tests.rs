// Unit tests for the cohort-match scoring and eligibility rules

use cohort_match::core::eligibility::{is_eligible, orientation_compatible};
use cohort_match::core::scoring::{
    calculate_base_factors, AMBITION_CAP, DREAM_DATE_CAP, DRINKING_CAP, FRIDAY_NIGHT_CAP,
    IDEAL_TYPE_CAP, SHARED_HOBBIES_CAP, SHARED_VALUES_CAP, SOCIAL_ENERGY_CAP, SUBSTANCE_USE_CAP,
    TRAIT_MATCH_CAP,
};
use cohort_match::core::{CompatibilityScorer, HeuristicScorer};
use cohort_match::models::{FactorBreakdown, Person};
use cohort_match::services::LexicalSimilarity;
use std::sync::Arc;

fn create_test_person(name: &str, gender: &str, interested_in: &[&str]) -> Person {
    Person {
        gender: Some(gender.to_string()),
        interested_in: interested_in.iter().map(|s| s.to_string()).collect(),
        ..Person::new(name, format!("{}@usc.edu", name.to_lowercase()))
    }
}

fn create_full_profile(name: &str, gender: &str, interested_in: &[&str]) -> Person {
    Person {
        year: Some("Junior".to_string()),
        looking_for: Some("Something serious".to_string()),
        social_battery: Some("I like going out but also need my nights in".to_string()),
        friday_night: Some("At a house party".to_string()),
        self_traits: ["Funny", "Adventurous", "Kind/caring"].iter().map(|s| s.to_string()).collect(),
        hobbies: ["Hiking", "Cooking", "Live music"].iter().map(|s| s.to_string()).collect(),
        dream_date: Some("Picnic at the beach".to_string()),
        drinking: Some("Social drinker".to_string()),
        substance_use: Some("No".to_string()),
        ambition: Some("Balanced".to_string()),
        partner_values: ["Sense of humor", "Adventurous", "Kind/caring"]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        shared_interests_importance: Some(5.0),
        type_description: Some("Someone funny and adventurous who likes hiking".to_string()),
        ..create_test_person(name, gender, interested_in)
    }
}

fn assert_within_caps(factors: &FactorBreakdown) {
    let caps = [
        (factors.social_energy, SOCIAL_ENERGY_CAP),
        (factors.friday_night, FRIDAY_NIGHT_CAP),
        (factors.shared_hobbies, SHARED_HOBBIES_CAP),
        (factors.dream_date, DREAM_DATE_CAP),
        (factors.drinking, DRINKING_CAP),
        (factors.substance_use, SUBSTANCE_USE_CAP),
        (factors.ambition, AMBITION_CAP),
        (factors.shared_values, SHARED_VALUES_CAP),
        (factors.trait_match, TRAIT_MATCH_CAP),
        (factors.ideal_type, IDEAL_TYPE_CAP),
    ];
    for (value, cap) in caps {
        assert!((0.0..=cap).contains(&value), "{} exceeds cap {}", value, cap);
    }
}

#[test]
fn test_identical_lifestyles_score_at_least_seventy() {
    let a = create_full_profile("Ana", "Woman", &["Men"]);
    let b = create_full_profile("Ben", "Man", &["Women"]);

    let factors = calculate_base_factors(&a, &b);

    assert_eq!(factors.social_energy, SOCIAL_ENERGY_CAP);
    assert_eq!(factors.friday_night, FRIDAY_NIGHT_CAP);
    assert_eq!(factors.shared_hobbies, SHARED_HOBBIES_CAP);
    assert_eq!(factors.dream_date, DREAM_DATE_CAP);
    assert_eq!(factors.drinking, DRINKING_CAP);
    assert_eq!(factors.substance_use, SUBSTANCE_USE_CAP);
    assert!(factors.total() >= 70.0);
    assert!(factors.total() <= 100.0);
}

#[tokio::test]
async fn test_heuristic_weight_is_bounded_and_symmetric() {
    let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
    let a = create_full_profile("Ana", "Woman", &["Men"]);
    let mut b = create_full_profile("Ben", "Man", &["Women"]);
    b.social_battery = Some("I'm out every night".to_string());
    b.drinking = Some("Nah, not for me".to_string());
    b.ambition = Some("Career-focused".to_string());
    b.shared_interests_importance = Some(1.0);

    let ab = scorer.score(&a, &b).await;
    let ba = scorer.score(&b, &a).await;

    assert_eq!(ab.weight, ba.weight);
    assert!((0.0..=100.0).contains(&ab.weight));
    assert_within_caps(ab.explanation.factors.as_ref().unwrap());

    // 15 - 5 for one level apart, 10 - 3*2 for two levels apart
    let factors = ab.explanation.factors.unwrap();
    assert_eq!(factors.social_energy, 10.0);
    assert_eq!(factors.drinking, 4.0);
    assert_eq!(factors.ambition, AMBITION_CAP / 2.0);
}

#[tokio::test]
async fn test_fully_aligned_pair_stays_within_one_hundred() {
    let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
    let mut a = create_full_profile("Ana", "Woman", &["Men"]);
    a.hobbies.insert("Gaming".to_string());
    a.ambition = Some("Career-focused".to_string());
    let mut b = a.clone();
    b.name = "Ben".to_string();
    b.gender = Some("Man".to_string());

    let assessment = scorer.score(&a, &b).await;
    assert!(assessment.weight <= 100.0);
    assert!(assessment.weight > 90.0);
    assert_within_caps(assessment.explanation.factors.as_ref().unwrap());
}

#[tokio::test]
async fn test_empty_profiles_score_zero_without_error() {
    let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
    let a = Person::new("Ana", "ana@usc.edu");
    let b = Person::new("Ben", "ben@usc.edu");

    let assessment = scorer.score(&a, &b).await;
    assert_eq!(assessment.weight, 0.0);
    assert!(!assessment.degraded);
}

#[tokio::test]
async fn test_empty_profile_scores_against_every_other_profile() {
    let scorer = HeuristicScorer::new(Some(Arc::new(LexicalSimilarity::new())));
    let empty = Person::new("Ana", "ana@usc.edu");
    let others = vec![
        create_full_profile("Ben", "Man", &["Women"]),
        create_full_profile("Cleo", "Woman", &["Men", "Women"]),
        create_test_person("Dev", "Non-binary", &["Women"]),
        Person::new("Eli", "eli@usc.edu"),
    ];

    for other in &others {
        for (a, b) in [(&empty, other), (other, &empty)] {
            let assessment = scorer.score(a, b).await;
            assert!(assessment.weight.is_finite(), "{} + {}", a.name, b.name);
            assert!((0.0..=100.0).contains(&assessment.weight), "{} + {}", a.name, b.name);
            assert!(!assessment.degraded, "{} + {}", a.name, b.name);
        }
    }
}

#[test]
fn test_eligibility_is_mutual() {
    let people = vec![
        create_test_person("Ana", "Woman", &["Men"]),
        create_test_person("Ben", "Man", &["Women"]),
        create_test_person("Cleo", "Woman", &["Women", "Men"]),
        create_test_person("Dev", "Non-binary", &["Other", "Women"]),
        create_test_person("Eli", "Man", &["Men"]),
    ];

    for a in &people {
        for b in &people {
            assert_eq!(is_eligible(a, b), is_eligible(b, a), "{} / {}", a.name, b.name);
        }
    }

    assert!(is_eligible(&people[0], &people[1]));
    assert!(is_eligible(&people[2], &people[1]));
    assert!(!is_eligible(&people[0], &people[2]));
    // Dev wants women, but Cleo does not list non-binary people
    assert!(!orientation_compatible(&people[2], &people[3]));
    assert!(!is_eligible(&people[0], &people[4]));
}

#[test]
fn test_person_interested_in_nobody_is_never_eligible() {
    let loner = create_test_person("Fay", "Woman", &["Other"]);
    let others = [
        create_test_person("Ben", "Man", &["Women"]),
        create_test_person("Cleo", "Woman", &["Women"]),
    ];

    assert!(others.iter().all(|other| !is_eligible(&loner, other)));
}

#[test]
fn test_smoker_dealbreaker_blocks_pair() {
    let mut a = create_test_person("Ana", "Woman", &["Men"]);
    a.dealbreakers = Some("Smoker, bad communicator".to_string());
    let mut b = create_test_person("Ben", "Man", &["Women"]);

    b.substance_use = Some("Yes".to_string());
    assert!(!is_eligible(&a, &b));
    assert!(!is_eligible(&b, &a));

    b.substance_use = Some("Sometimes".to_string());
    assert!(is_eligible(&a, &b));
}
