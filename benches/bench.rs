// Criterion benchmarks for cohort-match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use cohort_match::core::scoring::calculate_base_factors;
use cohort_match::core::{max_weight_matching, Matcher};
use cohort_match::models::Person;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const BATTERIES: [&str; 4] = [
    "I'm out every night",
    "I like going out but also need my nights in",
    "Homebody but down for occasional plans",
    "Netflix is my best friend",
];
const HOBBIES: [&str; 8] = [
    "Hiking", "Cooking", "Reading", "Gaming", "Dancing", "Live music", "Yoga", "Film",
];

fn create_person(id: usize) -> Person {
    Person {
        gender: Some(if id % 2 == 0 { "Woman" } else { "Man" }.to_string()),
        interested_in: vec![if id % 3 == 0 { "Men, Women" } else if id % 2 == 0 { "Men" } else { "Women" }.to_string()],
        social_battery: Some(BATTERIES[id % 4].to_string()),
        friday_night: Some(if id % 5 < 2 { "Out" } else { "In" }.to_string()),
        hobbies: (0..3).map(|k| HOBBIES[(id + k * 3) % 8].to_string()).collect(),
        drinking: Some("Social drinker".to_string()),
        shared_interests_importance: Some((id % 5 + 1) as f64),
        type_description: Some(format!("Someone into {}", HOBBIES[id % 8].to_lowercase())),
        ..Person::new(format!("Person {}", id), format!("p{}@usc.edu", id))
    }
}

fn random_edges(n: usize, density: f64, seed: u64) -> Vec<(usize, usize, f64)> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.gen_bool(density) {
                edges.push((i, j, rng.gen_range(1.0..100.0)));
            }
        }
    }
    edges
}

fn bench_base_factors(c: &mut Criterion) {
    let a = create_person(0);
    let b = create_person(1);

    c.bench_function("calculate_base_factors", |bench| {
        bench.iter(|| calculate_base_factors(black_box(&a), black_box(&b)));
    });
}

fn bench_max_weight_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("max_weight_matching");

    for size in [20, 50, 100, 200].iter() {
        let edges = random_edges(*size, 0.3, *size as u64);
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, &n| {
            bench.iter(|| max_weight_matching(black_box(n), black_box(&edges)));
        });
    }

    group.finish();
}

fn bench_heuristic_pipeline(c: &mut Criterion) {
    let matcher = Matcher::with_default_scorer();
    let mut group = c.benchmark_group("heuristic_pipeline");

    for size in [25, 100].iter() {
        let people: Vec<Person> = (0..*size).map(create_person).collect();
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |bench, _| {
            bench.iter(|| tokio_test::block_on(matcher.run(black_box(&people))));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_base_factors,
    bench_max_weight_matching,
    bench_heuristic_pipeline
);
criterion_main!(benches);
