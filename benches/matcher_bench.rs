use blockscan::{MatcherKind, PhraseSet};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::hint::black_box;

const WORDS: &[&str] = &[
    "supplier", "invoice", "payment", "acme", "corp", "globex", "limited", "holdings",
    "shipment", "order", "account", "transfer", "bank", "trading", "group", "services",
];

// Test data generators
fn generate_phrases(count: usize, rng: &mut StdRng) -> Vec<String> {
    (0..count)
        .map(|i| {
            let words = rng.random_range(1..=4);
            let mut phrase: Vec<String> = (0..words)
                .map(|_| WORDS[rng.random_range(0..WORDS.len())].to_string())
                .collect();
            // Keep every phrase distinct
            phrase.push(format!("entity{}", i));
            phrase.join(" ")
        })
        .collect()
}

fn generate_lines(count: usize, phrases: &[String], match_rate: f64, rng: &mut StdRng) -> Vec<String> {
    (0..count)
        .map(|_| {
            let mut line: Vec<&str> = (0..rng.random_range(5..20))
                .map(|_| WORDS[rng.random_range(0..WORDS.len())])
                .collect();
            if rng.random_bool(match_rate) {
                let pos = rng.random_range(0..=line.len());
                line.insert(pos, &phrases[rng.random_range(0..phrases.len())]);
            }
            line.join(" ")
        })
        .collect()
}

// Benchmark 1: Build Performance
fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let mut rng = StdRng::seed_from_u64(7);

    for count in [10, 100, 1000, 5000] {
        let phrases = PhraseSet::new(generate_phrases(count, &mut rng));

        group.throughput(Throughput::Elements(count as u64));
        for kind in MatcherKind::ALL {
            group.bench_with_input(BenchmarkId::new(kind.as_str(), count), &phrases, |b, phrases| {
                b.iter(|| {
                    let matcher = kind.build(black_box(phrases.clone()));
                    matcher.warm();
                    black_box(matcher);
                });
            });
        }
    }

    group.finish();
}

// Benchmark 2: Line Check Performance
fn bench_check(c: &mut Criterion) {
    let mut group = c.benchmark_group("check");
    let mut rng = StdRng::seed_from_u64(11);

    for count in [10, 1000] {
        let raw = generate_phrases(count, &mut rng);
        for (label, rate) in [("none", 0.0), ("low", 0.1), ("high", 0.9)] {
            let lines = generate_lines(1000, &raw, rate, &mut rng);
            let bytes: usize = lines.iter().map(String::len).sum();
            group.throughput(Throughput::Bytes(bytes as u64));

            for kind in MatcherKind::ALL {
                let matcher = kind.build(PhraseSet::new(&raw));
                matcher.warm();
                group.bench_with_input(
                    BenchmarkId::new(format!("{}_p{}", kind, count), label),
                    &lines,
                    |b, lines| {
                        b.iter(|| {
                            let hits = lines
                                .iter()
                                .filter(|line| matcher.check_line(black_box(line)))
                                .count();
                            black_box(hits);
                        });
                    },
                );
            }
        }
    }

    group.finish();
}

criterion_group!(benches, bench_build, bench_check);
criterion_main!(benches);
