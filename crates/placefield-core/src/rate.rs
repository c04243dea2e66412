//! Rate Maps
//!
//! `rate[i] = spikes[i] / occupancy[i]` (Hz), after both maps have been
//! smoothed. A bin the animal never occupied has no rate: it is kept as
//! `None` and left out of every statistic computed from the map.
//!
//! Normalizing divides by the map's own peak so maps of neurons with very
//! different firing rates become comparable on `[0, 1]`.

use serde::{Deserialize, Serialize};

/// Firing rate per bin (Hz); `None` marks a bin without occupancy.
pub type RateMap = Vec<Option<f64>>;

/// Divide smoothed spike counts by smoothed occupancy.
///
/// Bins where the occupancy is zero or non-finite are `None`.
#[must_use]
pub fn rate_map(smoothed_counts: &[f64], smoothed_occupancy: &[f64]) -> RateMap {
	smoothed_counts
		.iter()
		.zip(smoothed_occupancy)
		.map(|(&count, &occupancy)| {
			if occupancy.is_finite() && occupancy > 0.0 {
				Some(count / occupancy)
			} else {
				None
			}
		})
		.collect()
}

/// Largest valid value and its bin.
#[must_use]
pub fn peak(map: &[Option<f64>]) -> Option<(usize, f64)> {
	map.iter()
		.enumerate()
		.filter_map(|(i, v)| v.map(|v| (i, v)))
		.fold(None, |best, (i, v)| match best {
			Some((_, b)) if b >= v => best,
			_ => Some((i, v)),
		})
}

/// Bin of the largest valid value.
#[must_use]
pub fn peak_bin(map: &[Option<f64>]) -> Option<usize> {
	peak(map).map(|(i, _)| i)
}

/// A rate map scaled to its own peak.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct NormalizedMap {
	/// Normalized rate per bin in `[0, 1]`, `None` where invalid
	pub values: RateMap,
	/// Peak rate the map was divided by (Hz)
	pub peak_rate_hz: f64,
	/// `true` when there was nothing to normalize: no valid bins or no firing
	pub degenerate: bool,
}

impl NormalizedMap {
	/// Valid values only.
	pub fn valid(&self) -> impl Iterator<Item = f64> + '_ {
		self.values.iter().filter_map(|v| *v)
	}

	/// Number of bins with a defined value.
	#[must_use]
	pub fn valid_bins(&self) -> usize {
		self.valid().count()
	}

	/// Mean over valid bins.
	#[must_use]
	pub fn mean(&self) -> Option<f64> {
		let n = self.valid_bins();
		if n == 0 {
			return None;
		}
		#[allow(clippy::cast_precision_loss)]
		let mean = self.valid().sum::<f64>() / n as f64;
		Some(mean)
	}

	/// Highest normalized value (1.0 unless degenerate).
	#[must_use]
	pub fn max(&self) -> Option<f64> {
		peak(&self.values).map(|(_, v)| v)
	}

	/// Bin of the highest normalized value.
	#[must_use]
	pub fn peak_bin(&self) -> Option<usize> {
		peak_bin(&self.values)
	}
}

/// Divide a rate map by its peak.
///
/// A map whose peak is not positive (a silent neuron) stays all zeros on
/// its valid bins and is marked degenerate.
#[must_use]
pub fn normalize(map: &[Option<f64>]) -> NormalizedMap {
	match peak(map) {
		Some((_, peak_rate_hz)) if peak_rate_hz > 0.0 => NormalizedMap {
			values: map.iter().map(|v| v.map(|v| v / peak_rate_hz)).collect(),
			peak_rate_hz,
			degenerate: false,
		},
		_ => NormalizedMap {
			values: map.iter().map(|v| v.map(|_| 0.0)).collect(),
			peak_rate_hz: 0.0,
			degenerate: true,
		},
	}
}
