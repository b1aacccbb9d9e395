// SPDX-License-Identifier: LGPL-3.0-or-later

//! Criterion benchmarks for the control-path operations the streaming
//! thread touches per buffer.

use criterion::{criterion_group, criterion_main, Criterion};
use crossfeed_core::{negotiate, CrossfeedParams, Preset, StreamFormat};
use std::hint::black_box;

fn bench_preset_derivation(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolver");
    let params = CrossfeedParams::new();

    group.bench_function("preset_matching", |b| {
        params.set_preset(Preset::Jmeier).unwrap();
        b.iter(|| black_box(params.preset()));
    });

    group.bench_function("preset_none", |b| {
        params.set_fcut(999).unwrap();
        b.iter(|| black_box(params.preset()));
    });

    group.bench_function("snapshot", |b| {
        b.iter(|| black_box(params.snapshot()));
    });

    group.finish();
}

fn bench_negotiate(c: &mut Criterion) {
    let mut group = c.benchmark_group("negotiate");
    let accepted = StreamFormat::float(64, 64);
    let rejected = StreamFormat::integer(16, 16).with_channels(3);

    group.bench_function("accept", |b| {
        b.iter(|| black_box(negotiate(black_box(&accepted))));
    });
    group.bench_function("reject", |b| {
        b.iter(|| black_box(negotiate(black_box(&rejected))));
    });

    group.finish();
}

criterion_group!(benches, bench_preset_derivation, bench_negotiate);
criterion_main!(benches);
