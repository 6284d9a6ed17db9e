use criterion::{black_box, criterion_group, criterion_main, Criterion};
use footprint_logger::models::{Activity, Category};
use footprint_logger::services::{leaderboard, stats, streak};
use std::collections::HashMap;

/// Build a synthetic record set: `users` users with `per_user` activities
/// spread over a year of weeks.
fn synthetic_records(users: usize, per_user: usize) -> Vec<Activity> {
    let categories = [Category::Transport, Category::Food, Category::Energy];
    let mut records = Vec::with_capacity(users * per_user);

    for user in 0..users {
        for n in 0..per_user {
            let week = (n % 52 + 1) as u32;
            records.push(Activity {
                id: format!("u{}-a{}", user, n),
                user_id: format!("user-{}", user),
                category: categories[n % categories.len()],
                activity_key: "bench".to_string(),
                activity_label: "Bench".to_string(),
                co2_kg: (n % 30) as f64 * 0.5,
                occurred_at: format!("2025-01-01T00:00:{:02}Z", n % 60),
                week,
                year: 2025,
            });
        }
    }

    records
}

fn benchmark_aggregation(c: &mut Criterion) {
    let records = synthetic_records(100, 100);
    let as_of = chrono::Utc::now();

    let mut group = c.benchmark_group("aggregation");

    group.bench_function("summarize_10k_records", |b| {
        b.iter(|| stats::summarize(black_box(&records), as_of))
    });

    group.bench_function("community_stats_10k_records", |b| {
        b.iter(|| stats::community_stats(black_box(&records), "user-50"))
    });

    group.bench_function("leaderboard_sums_10k_records", |b| {
        b.iter(|| leaderboard::sum_per_user(black_box(&records)))
    });

    group.finish();
}

fn benchmark_streak(c: &mut Criterion) {
    // A full year of weekly totals alternating around the threshold.
    let weekly_totals: HashMap<u32, f64> = (1..=52)
        .map(|week| (week, if week % 3 == 0 { 150.0 } else { 40.0 }))
        .collect();

    c.bench_function("streak_full_year", |b| {
        b.iter(|| streak::streak(black_box(&weekly_totals), 100.0))
    });
}

criterion_group!(benches, benchmark_aggregation, benchmark_streak);
criterion_main!(benches);
