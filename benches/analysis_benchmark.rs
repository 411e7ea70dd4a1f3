//! Analysis Pipeline Benchmarks
//!
//! Reply normalization and analytics aggregation, the CPU-bound parts of a
//! feedback submission.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use smartbiz::domain::analysis::parse_reply;
use smartbiz::{Feedback, FeedbackAnalysisResult, FeedbackAnalytics, Sentiment};
use std::time::Duration;

const CLEAN_REPLY: &str = r#"{"sentiment":"positive","sentimentScore":0.92,"summary":"Customer praises delivery speed.","recommendations":["Keep courier partner","Highlight speed in marketing","Ask for a review"]}"#;

const WRAPPED_REPLY: &str = "Here is the analysis you asked for:\n```json\n{\"sentiment\":\"Negative\",\"sentimentScore\":\"0.2\",\"summary\":\"\",\"recommendations\":[\"Refund\",{\"step\":2},\"\",\"Apologize\",\"Escalate\"]}\n```\nLet me know if you need more.";

fn bench_parse_reply(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_reply");
    group.throughput(Throughput::Elements(1));
    group.measurement_time(Duration::from_secs(5));

    group.bench_function("clean_json", |b| {
        b.iter(|| black_box(parse_reply(black_box(CLEAN_REPLY))))
    });
    group.bench_function("wrapped_and_dirty", |b| {
        b.iter(|| black_box(parse_reply(black_box(WRAPPED_REPLY))))
    });
    group.bench_function("unparsable", |b| {
        b.iter(|| black_box(parse_reply(black_box("no json here at all"))))
    });

    group.finish();
}

fn sample_feedback(count: usize) -> Vec<Feedback> {
    (0..count)
        .map(|i| {
            let sentiment = Sentiment::ALL[i % Sentiment::ALL.len()];
            Feedback::new(
                format!("Feedback number {i}"),
                FeedbackAnalysisResult {
                    sentiment,
                    sentiment_score: sentiment.default_score(),
                    summary: format!("Summary {i}"),
                    recommendations: vec![format!("Action {}", i % 17), "Ask for a review".to_string()],
                },
            )
        })
        .collect()
}

fn bench_analytics(c: &mut Criterion) {
    let mut group = c.benchmark_group("analytics");

    for count in [10, 100, 1000] {
        let feedback = sample_feedback(count);
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("from_feedback", count), &feedback, |b, feedback| {
            b.iter(|| black_box(FeedbackAnalytics::from_feedback(black_box(feedback))))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse_reply, bench_analytics);
criterion_main!(benches);
