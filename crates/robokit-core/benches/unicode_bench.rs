//! Criterion benchmarks for the escape tokenizer and code-point indexing.
//!
//! Run with:
//! ```bash
//! cargo bench --package robokit-core --bench unicode_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use robokit_core::unicode::{ascii_escape, char_code_at, escape_segments, CodepointStream};

// ── Inputs ────────────────────────────────────────────────────────────────────

const INPUTS: &[(&str, &str)] = &[
    ("ascii", "The quick brown fox jumps over the lazy dog."),
    ("latin1", "Grüße aus Köln, où est la gare? ¡Olé!"),
    ("cjk", "你好，世界。今日は良い天気です。"),
    ("mixed", "build #42 ✓ passed in 3.2s → deploy 🚀 (team: Zoë, 李)"),
];

// ── Benchmark groups ──────────────────────────────────────────────────────────

fn bench_ascii_escape(c: &mut Criterion) {
    let mut group = c.benchmark_group("ascii_escape");
    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| ascii_escape(black_box(text)))
        });
    }
    group.finish();
}

fn bench_escape_segments(c: &mut Criterion) {
    let mut group = c.benchmark_group("escape_segments");
    for (name, text) in INPUTS {
        group.bench_with_input(BenchmarkId::from_parameter(name), text, |b, text| {
            b.iter(|| escape_segments(black_box(text)))
        });
    }
    group.finish();
}

/// Indexing every position one by one is quadratic; this keeps it visible.
fn bench_char_code_at(c: &mut Criterion) {
    let mut group = c.benchmark_group("char_code_at");
    for (name, text) in INPUTS {
        let len = CodepointStream::new(text).len();
        group.bench_with_input(BenchmarkId::new("every_index", name), text, |b, text| {
            b.iter(|| (0..len).filter_map(|i| char_code_at(black_box(text), i)).count())
        });
        group.bench_with_input(BenchmarkId::new("stream_iter", name), text, |b, text| {
            b.iter(|| CodepointStream::new(black_box(text)).iter().count())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_ascii_escape, bench_escape_segments, bench_char_code_at);
criterion_main!(benches);
