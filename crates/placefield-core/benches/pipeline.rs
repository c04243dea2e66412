//! Benchmarks for the full rate-map pipeline
//!
//! Tests end-to-end analysis performance with:
//! - Various session lengths (10k, 50k, 200k samples)
//! - Various population sizes (10, 50, 200 neurons)

#![allow(clippy::expect_used)] // Fine in benchmarks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use placefield_core::{analyze, generate_session, AnalysisConfig, SyntheticSessionConfig};

fn session_config(n_samples: usize, n_neurons: usize) -> SyntheticSessionConfig {
	SyntheticSessionConfig {
		n_samples,
		n_neurons,
		laps: (n_samples / 10_000).max(1),
		..Default::default()
	}
}

fn bench_session_length(c: &mut Criterion) {
	let mut group = c.benchmark_group("analyze_by_samples");
	let config = AnalysisConfig::default();

	for n_samples in &[10_000_usize, 50_000, 200_000] {
		let session = generate_session(&session_config(*n_samples, 10)).expect("valid session");

		let _ = group.throughput(Throughput::Elements(*n_samples as u64));
		let _ = group.bench_with_input(
			BenchmarkId::new("samples", n_samples),
			n_samples,
			|bench, _| {
				bench.iter(|| analyze(black_box(&session), black_box(&config)));
			},
		);
	}

	group.finish();
}

fn bench_population_size(c: &mut Criterion) {
	let mut group = c.benchmark_group("analyze_by_neurons");
	let config = AnalysisConfig::default();

	for n_neurons in &[10_usize, 50, 200] {
		let session = generate_session(&session_config(10_000, *n_neurons)).expect("valid session");

		let _ = group.throughput(Throughput::Elements(*n_neurons as u64));
		let _ = group.bench_with_input(
			BenchmarkId::new("neurons", n_neurons),
			n_neurons,
			|bench, _| {
				bench.iter(|| analyze(black_box(&session), black_box(&config)));
			},
		);
	}

	group.finish();
}

criterion_group!(benches, bench_session_length, bench_population_size);
criterion_main!(benches);
