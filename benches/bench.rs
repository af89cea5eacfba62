// Criterion benchmarks for Estate Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use estate_match::core::{filter_listings, Matcher};
use estate_match::models::{BedroomCount, FilterConstraints, ListingKind, PreferenceProfile, PropertyRecord, SortMode};
use chrono::{Duration, Utc};

const CITIES: &[&str] = &["Lekki", "Ikeja", "Yaba", "Abuja", "Ibadan", "Enugu"];
const TYPES: &[&str] = &["Apartment", "House", "Duplex", "Terrace", "Land"];
const AMENITIES: &[&str] = &["Parking", "Swimming Pool", "Gym", "CCTV", "24/7 Power", "Borehole"];

fn create_listing(id: usize) -> PropertyRecord {
    PropertyRecord {
        id: id.to_string(),
        title: format!("{} in {}", TYPES[id % TYPES.len()], CITIES[id % CITIES.len()]),
        price: 500_000 + (id as u64 * 750_000) % 150_000_000,
        currency: "NGN".to_string(),
        listing_kind: if id % 3 == 0 { ListingKind::Rent } else { ListingKind::Sale },
        city: CITIES[id % CITIES.len()].to_string(),
        state: "Lagos".to_string(),
        property_type: TYPES[id % TYPES.len()].to_string(),
        bedrooms: (id % 6) as u32,
        bathrooms: (id % 4) as u32,
        size_sqm: Some(60.0 + (id % 400) as f64),
        amenities: AMENITIES
            .iter()
            .enumerate()
            .filter(|(i, _)| (id + i) % 2 == 0)
            .map(|(_, a)| a.to_string())
            .collect(),
        images: vec![],
        created_at: Utc::now() - Duration::minutes(id as i64),
        status: Default::default(),
        landlord_id: None,
        match_score: None,
    }
}

fn create_profile() -> PreferenceProfile {
    PreferenceProfile {
        buyer_id: "buyer".to_string(),
        preferred_city: "Lekki".to_string(),
        preferred_property_type: "Duplex".to_string(),
        budget: Some(60_000_000),
        bedroom_preference: Some("3+".to_string()),
    }
}

fn create_constraints() -> FilterConstraints {
    FilterConstraints {
        min_price: Some(1_000_000),
        max_price: Some(50_000_000),
        property_types: vec!["Flat / Apartment".to_string(), "Duplex".to_string()],
        bedrooms: Some(BedroomCount::AtLeast(2)),
        amenities: vec!["parking".to_string()],
        query: Some("lagos".to_string()),
    }
}

fn bench_filtering(c: &mut Criterion) {
    let listings: Vec<PropertyRecord> = (0..500).map(create_listing).collect();
    let constraints = create_constraints();

    c.bench_function("filter_500_listings", |b| {
        b.iter(|| black_box(filter_listings(black_box(&listings), black_box(&constraints))));
    });
}

fn bench_projection(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let profile = create_profile();
    let constraints = create_constraints();

    let mut group = c.benchmark_group("projection");

    for listing_count in [10, 50, 100, 500, 1000].iter() {
        let listings: Vec<PropertyRecord> = (0..*listing_count).map(create_listing).collect();

        group.bench_with_input(
            BenchmarkId::new("recommended", listing_count),
            listing_count,
            |b, _| {
                b.iter(|| {
                    matcher.project(
                        black_box(&listings),
                        black_box(&constraints),
                        SortMode::Recommended,
                        Some(black_box(&profile)),
                    )
                });
            },
        );

        group.bench_with_input(
            BenchmarkId::new("newest", listing_count),
            listing_count,
            |b, _| {
                b.iter(|| {
                    matcher.project(
                        black_box(&listings),
                        black_box(&FilterConstraints::default()),
                        SortMode::Newest,
                        None,
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_recommend(c: &mut Criterion) {
    let matcher = Matcher::with_default_weights();
    let profile = create_profile();
    let listings: Vec<PropertyRecord> = (0..1000).map(create_listing).collect();

    c.bench_function("recommend_top5_1000_listings", |b| {
        b.iter(|| {
            matcher.recommend(
                black_box(&listings),
                black_box(&FilterConstraints::default()),
                black_box(&profile),
            )
        });
    });
}

criterion_group!(benches, bench_filtering, bench_projection, bench_recommend);

criterion_main!(benches);
