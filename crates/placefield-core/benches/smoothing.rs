//! Benchmarks for map-level stages
//!
//! Tests performance of:
//! - Gaussian smoothing (various σ and map sizes)
//! - Weighted histogram aggregation

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use placefield_core::{weighted_histogram, GaussianSmoother};
use rand::Rng;

/// Generate a random spike-count map
fn generate_map(n_bins: usize) -> Vec<f64> {
	let mut rng = rand::thread_rng();
	(0..n_bins).map(|_| f64::from(rng.gen_range(0_u32..20))).collect()
}

fn bench_smoothing(c: &mut Criterion) {
	let mut group = c.benchmark_group("gaussian_smoothing");

	for sigma in &[1.0, 3.0] {
		let Ok(smoother) = GaussianSmoother::new(*sigma) else {
			continue;
		};
		for n_bins in &[50_usize, 200, 1000] {
			let map = generate_map(*n_bins);
			let _ = group.throughput(Throughput::Elements(*n_bins as u64));
			let _ = group.bench_with_input(
				BenchmarkId::new(format!("sigma_{sigma}"), n_bins),
				n_bins,
				|bench, _| {
					bench.iter(|| smoother.smooth(black_box(&map)));
				},
			);
		}
	}

	group.finish();
}

fn bench_histogram(c: &mut Criterion) {
	let mut group = c.benchmark_group("weighted_histogram");
	let mut rng = rand::thread_rng();
	let n_bins = 50;

	for n_samples in &[10_000_usize, 100_000] {
		let weights: Vec<Option<f64>> = (0..*n_samples)
			.map(|_| {
				if rng.gen_bool(0.9) {
					Some(f64::from(rng.gen_range(0_u32..3)))
				} else {
					None
				}
			})
			.collect();
		let bins: Vec<Option<usize>> = (0..*n_samples)
			.map(|_| Some(rng.gen_range(0..n_bins)))
			.collect();

		let _ = group.throughput(Throughput::Elements(*n_samples as u64));
		let _ = group.bench_with_input(
			BenchmarkId::new("samples", n_samples),
			n_samples,
			|bench, _| {
				bench.iter(|| weighted_histogram(black_box(&weights), black_box(&bins), n_bins));
			},
		);
	}

	group.finish();
}

criterion_group!(benches, bench_smoothing, bench_histogram);
criterion_main!(benches);
