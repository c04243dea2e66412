//! Place-Cell Classification
//!
//! After normalization every active neuron peaks at 1.0, so the peak alone
//! says nothing. What separates a place cell is how far that peak stands
//! above the rest of its own map. For neuron `n`:
//!
//! ```text
//! c_n = peak_n − mean_n                      (spatial contrast)
//! θ_n = mean_n + μ(c) + k·σ(c)               (per-neuron threshold)
//! s_n = std_n / mean_n                       (selectivity)
//! place cell  ⇔  peak_n > θ_n  or  s_n > 1
//! ```
//!
//! `μ(c)` and `σ(c)` are the mean and population standard deviation of the
//! contrast across all non-degenerate neurons. Degenerate neurons (silent,
//! or with no valid bins) are left out of the statistics and never flagged.
//!
//! The population test only finds a minority of outliers. With `k = 1.5` a
//! single neuron can reach at most `(n−1)/√n` standard deviations above the
//! mean, so populations of three or fewer neurons never pass it, and a
//! population where half the neurons are tuned has no outliers at all. The
//! selectivity test covers those cases from each map alone: a map whose
//! spread across bins exceeds its mean concentrates its firing in a small
//! part of the track. Uniform firing keeps `s_n` well below 1.

use serde::{Deserialize, Serialize};

use crate::rate::NormalizedMap;

/// Selectivity above which a map counts as spatially tuned on its own.
pub const SELECTIVITY_FLOOR: f64 = 1.0;

/// Outcome of classifying a population of normalized rate maps.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Classification {
	/// Spatial contrast per neuron, `None` for degenerate maps
	pub contrast: Vec<Option<f64>>,
	/// Std over mean of each map, `None` for degenerate maps
	pub selectivity: Vec<Option<f64>>,
	/// Threshold each neuron's peak had to exceed, `None` for degenerate maps
	pub threshold: Vec<Option<f64>>,
	/// Place-cell flag per neuron
	pub is_place_cell: Vec<bool>,
	/// Mean contrast over the population
	pub population_mean: f64,
	/// Standard deviation of contrast over the population
	pub population_std: f64,
	/// `k` used for the threshold
	pub std_multiplier: f64,
}

impl Classification {
	/// Indices of neurons flagged as place cells.
	#[must_use]
	pub fn place_cell_indices(&self) -> Vec<usize> {
		self.is_place_cell
			.iter()
			.enumerate()
			.filter_map(|(i, &flag)| flag.then_some(i))
			.collect()
	}

	/// Number of place cells.
	#[must_use]
	pub fn count(&self) -> usize {
		self.is_place_cell.iter().filter(|&&f| f).count()
	}
}

/// Peak, mean and spread of one non-degenerate map.
#[derive(Clone, Copy, Debug)]
struct MapSummary {
	peak: f64,
	mean: f64,
	std: f64,
}

impl MapSummary {
	fn of(map: &NormalizedMap) -> Option<Self> {
		if map.degenerate {
			return None;
		}
		let values: Vec<f64> = map.valid().collect();
		if values.is_empty() {
			return None;
		}
		let (mean, std) = mean_and_std(&values);
		Some(Self {
			peak: map.max()?,
			mean,
			std,
		})
	}

	fn contrast(self) -> f64 {
		self.peak - self.mean
	}

	fn selectivity(self) -> Option<f64> {
		(self.mean > 0.0).then_some(self.std / self.mean)
	}
}

/// Mean and population standard deviation.
#[must_use]
pub fn mean_and_std(values: &[f64]) -> (f64, f64) {
	if values.is_empty() {
		return (0.0, 0.0);
	}
	#[allow(clippy::cast_precision_loss)]
	let n = values.len() as f64;
	let mean = values.iter().sum::<f64>() / n;
	let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
	(mean, variance.sqrt())
}

/// Flag place cells among `maps` using multiplier `k`.
#[must_use]
pub fn classify(maps: &[NormalizedMap], std_multiplier: f64) -> Classification {
	let summaries: Vec<Option<MapSummary>> = maps.iter().map(MapSummary::of).collect();
	let contrast: Vec<Option<f64>> = summaries
		.iter()
		.map(|s| s.map(MapSummary::contrast))
		.collect();
	let selectivity: Vec<Option<f64>> = summaries
		.iter()
		.map(|s| s.and_then(MapSummary::selectivity))
		.collect();

	let population: Vec<f64> = contrast.iter().flatten().copied().collect();
	let (population_mean, population_std) = mean_and_std(&population);
	let margin = std_multiplier.mul_add(population_std, population_mean);

	let threshold: Vec<Option<f64>> = summaries
		.iter()
		.map(|s| s.map(|s| s.mean + margin))
		.collect();
	// peak > mean + margin, compared as contrast > margin
	let is_place_cell = contrast
		.iter()
		.zip(&selectivity)
		.map(|(c, s)| {
			c.is_some_and(|c| c > margin) || s.is_some_and(|s| s > SELECTIVITY_FLOOR)
		})
		.collect();

	Classification {
		contrast,
		selectivity,
		threshold,
		is_place_cell,
		population_mean,
		population_std,
		std_multiplier,
	}
}
