//! Benchmarks for argument and value resolution.
//!
//! - Token parsing
//! - Source chain lookups at different depths
//! - Value resolution through the default resolver order

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use keyroute_args::source::{DefaultsSource, OverrideSource};
use keyroute_args::{ArgumentImportance, ArgumentSourceChain, ArgumentToken};
use keyroute_resolve::{default_chain, LocalCardDirectory, SourceKinds};

fn benchmark_token_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("token_parse");
    for raw in ["email:alice@example.com", "privkey:alice.key:Alice", "password=hunter2"] {
        group.bench_with_input(BenchmarkId::new("parse", raw), raw, |b, raw| {
            b.iter(|| ArgumentToken::parse(black_box(raw)).unwrap());
        });
    }
    group.finish();
}

fn source_chain(depth: usize) -> ArgumentSourceChain {
    let mut chain = ArgumentSourceChain::new();
    for level in 0..depth {
        chain.add(Box::new(
            DefaultsSource::named(format!("level-{level}")).with(format!("unused-{level}"), "x"),
        ));
    }
    chain.add(Box::new(OverrideSource::new(vec![
        "recipient-id=email:alice@example.com".to_string(),
    ])));
    chain.init().unwrap();
    chain
}

fn benchmark_source_chain_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("source_chain");
    for depth in [0usize, 4, 16] {
        let mut chain = source_chain(depth);
        group.bench_with_input(BenchmarkId::new("depth", depth), &depth, |b, _| {
            b.iter(|| {
                chain
                    .read_list(black_box("recipient-id"), ArgumentImportance::Required)
                    .unwrap()
            });
        });
    }
    group.finish();
}

fn benchmark_value_resolution(c: &mut Criterion) {
    let cards = std::env::temp_dir().join("keyroute-bench-cards");
    let chain = default_chain(Arc::new(LocalCardDirectory::new(cards)));
    let token = ArgumentToken::parse("pubkey:AAECAwQFBgcICQoLDA0ODw").unwrap();

    c.bench_function("resolution/public_key_base64", |b| {
        b.iter(|| chain.read_public_key(black_box(&token), SourceKinds::ALL).unwrap());
    });

    c.bench_function("resolution/key_algorithm", |b| {
        b.iter(|| {
            chain
                .read_key_algorithm(black_box("secp256r1"), SourceKinds::ALL)
                .unwrap()
        });
    });

    c.bench_function("resolution/password_text", |b| {
        b.iter(|| chain.read_password(black_box("hunter2"), SourceKinds::LOCAL).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_token_parse,
    benchmark_source_chain_depth,
    benchmark_value_resolution
);
criterion_main!(benches);
