//! Map Aggregation
//!
//! Spike-count and occupancy maps are both weighted histograms over the
//! sample → bin mapping; only the weights differ (spike counts vs. time
//! spent). Undefined weights and unbinned samples are skipped.

/// Sum `weights` into `n_bins` bins. Samples with an undefined weight, no
/// bin, or a bin outside `[0, n_bins)` contribute nothing.
#[must_use]
pub fn weighted_histogram(weights: &[Option<f64>], bins: &[Option<usize>], n_bins: usize) -> Vec<f64> {
	let mut histogram = vec![0.0; n_bins];
	for (weight, bin) in weights.iter().zip(bins) {
		if let (Some(w), Some(b)) = (weight, bin) {
			if let Some(slot) = histogram.get_mut(*b) {
				*slot += w;
			}
		}
	}
	histogram
}

/// Spike-count map of one motion-filtered neuron.
#[must_use]
pub fn spike_count_map(masked_spikes: &[Option<f64>], bins: &[Option<usize>], n_bins: usize) -> Vec<f64> {
	weighted_histogram(masked_spikes, bins, n_bins)
}

/// Time elapsed since the previous sample (s).
///
/// The first sample has no predecessor, and a backwards step marks a clock
/// reset; both are `None`.
#[must_use]
pub fn time_deltas(time: &[f64]) -> Vec<Option<f64>> {
	let mut deltas = Vec::with_capacity(time.len());
	if !time.is_empty() {
		deltas.push(None);
	}
	deltas.extend(time.windows(2).map(|w| {
		let dt = w[1] - w[0];
		(dt >= 0.0).then_some(dt)
	}));
	deltas
}

/// Occupancy map: seconds spent moving in each bin.
#[must_use]
pub fn occupancy_map(
	deltas: &[Option<f64>],
	moving: &[bool],
	bins: &[Option<usize>],
	n_bins: usize,
) -> Vec<f64> {
	let weights: Vec<Option<f64>> = deltas
		.iter()
		.zip(moving)
		.map(|(&dt, &keep)| dt.filter(|_| keep))
		.collect();
	weighted_histogram(&weights, bins, n_bins)
}
