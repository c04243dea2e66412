//! Analysis Pipeline
//!
//! The complete rate-map analysis in one pass:
//!
//! 1. Filter samples by running speed
//! 2. Assign samples to spatial bins
//! 3. Build spike-count and occupancy maps
//! 4. Smooth both
//! 5. Divide into rate maps and normalize to peak
//! 6. Classify place cells
//!
//! Each stage finishes before the next starts and every intermediate
//! product is kept on the returned [`Analysis`].

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::binning::PositionBinner;
use crate::classify::{classify, Classification};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::maps::{occupancy_map, spike_count_map, time_deltas};
use crate::motion::{filter_session, MotionFilter};
use crate::rate::{normalize, rate_map, NormalizedMap, RateMap};
use crate::session::Session;
use crate::smoothing::GaussianSmoother;

// ============================================================================
// Output
// ============================================================================

/// Everything computed for one session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Analysis {
	/// Parameters of the run
	pub config: AnalysisConfig,
	/// Bin geometry used
	pub binner: PositionBinner,
	/// Neuron ids, in map order
	pub neuron_ids: Vec<String>,
	/// Speed, movement mask and masked spikes
	pub motion: MotionFilter,
	/// Bin index per sample
	pub bins: Vec<Option<usize>>,
	/// Raw spike-count map per neuron
	pub spike_maps: Vec<Vec<f64>>,
	/// Raw occupancy map (s)
	pub occupancy: Vec<f64>,
	/// Smoothed spike-count map per neuron
	pub smoothed_spike_maps: Vec<Vec<f64>>,
	/// Smoothed occupancy map (s)
	pub smoothed_occupancy: Vec<f64>,
	/// Firing rate per bin per neuron (Hz)
	pub rate_maps: Vec<RateMap>,
	/// Rate maps scaled to their peak
	pub normalized_maps: Vec<NormalizedMap>,
	/// Place-cell decision per neuron
	pub classification: Classification,
}

impl Analysis {
	/// Seconds the animal spent moving, i.e. the total of the occupancy map.
	#[must_use]
	pub fn moving_time_s(&self) -> f64 {
		self.occupancy.iter().sum()
	}

	/// Ids of neurons classified as place cells.
	#[must_use]
	pub fn place_cell_ids(&self) -> Vec<&str> {
		self.classification
			.place_cell_indices()
			.into_iter()
			.map(|i| self.neuron_ids[i].as_str())
			.collect()
	}

	/// Normalized maps of the place cells only, with their ids.
	#[must_use]
	pub fn place_cell_maps(&self) -> Vec<(&str, &NormalizedMap)> {
		self.classification
			.place_cell_indices()
			.into_iter()
			.map(|i| (self.neuron_ids[i].as_str(), &self.normalized_maps[i]))
			.collect()
	}

	/// Compact per-neuron summary for export.
	#[must_use]
	pub fn report(&self) -> AnalysisReport {
		let neurons = self
			.neuron_ids
			.iter()
			.enumerate()
			.map(|(i, id)| NeuronReport {
				id: id.clone(),
				peak_rate_hz: self.normalized_maps[i].peak_rate_hz,
				peak_bin: self.normalized_maps[i].peak_bin(),
				threshold: self.classification.threshold[i],
				selectivity: self.classification.selectivity[i],
				is_place_cell: self.classification.is_place_cell[i],
				normalized_map: self.normalized_maps[i].values.clone(),
			})
			.collect();

		AnalysisReport {
			config: self.config.clone(),
			n_bins: self.binner.n_bins,
			bin_centers_cm: self.binner.centers(),
			moving_samples: self.motion.moving_samples(),
			moving_time_s: self.moving_time_s(),
			occupancy_s: self.occupancy.clone(),
			place_cells: self.place_cell_ids().into_iter().map(String::from).collect(),
			neurons,
		}
	}
}

// ============================================================================
// Report
// ============================================================================

/// Exportable summary of an [`Analysis`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnalysisReport {
	/// Parameters of the run
	pub config: AnalysisConfig,
	/// Number of spatial bins
	pub n_bins: usize,
	/// Bin centres (cm)
	pub bin_centers_cm: Vec<f64>,
	/// Samples that passed the motion filter
	pub moving_samples: usize,
	/// Total moving time (s)
	pub moving_time_s: f64,
	/// Raw occupancy per bin (s)
	pub occupancy_s: Vec<f64>,
	/// Ids of place cells
	pub place_cells: Vec<String>,
	/// Per-neuron results
	pub neurons: Vec<NeuronReport>,
}

/// Result for one neuron.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NeuronReport {
	/// Neuron id
	pub id: String,
	/// Peak firing rate (Hz)
	pub peak_rate_hz: f64,
	/// Bin of the peak
	pub peak_bin: Option<usize>,
	/// Threshold the peak was tested against
	pub threshold: Option<f64>,
	/// Std over mean of the normalized map
	pub selectivity: Option<f64>,
	/// Place-cell flag
	pub is_place_cell: bool,
	/// Normalized rate map; `null` marks unoccupied bins
	pub normalized_map: RateMap,
}

// ============================================================================
// Pipeline
// ============================================================================

/// Run the full analysis on a session.
///
/// # Errors
///
/// Fails if the configuration is invalid or no bin geometry can be derived
/// from it and the session.
#[instrument(skip_all, fields(samples = session.len(), neurons = session.n_neurons()))]
pub fn analyze(session: &Session, config: &AnalysisConfig) -> Result<Analysis> {
	config.validate()?;

	// 1. Motion filter
	let motion = filter_session(session, config.speed_threshold_cm_s);
	debug!(
		moving = motion.moving_samples(),
		threshold = config.speed_threshold_cm_s,
		"Motion filter applied"
	);
	if motion.moving_samples() == 0 {
		warn!("No samples above the speed threshold; all maps will be empty");
	}

	// 2. Binning
	let binner = PositionBinner::from_config(config, session.max_position())?;
	let bins = binner.assign(session.position());
	debug!(n_bins = binner.n_bins, bin_width_cm = binner.bin_width_cm, "Positions binned");

	// 3. Aggregation
	let spike_maps: Vec<Vec<f64>> = motion
		.spikes
		.iter()
		.map(|spikes| spike_count_map(spikes, &bins, binner.n_bins))
		.collect();
	let deltas = time_deltas(session.time());
	let occupancy = occupancy_map(&deltas, &motion.moving, &bins, binner.n_bins);
	debug!(
		moving_time_s = occupancy.iter().sum::<f64>(),
		"Occupancy map built"
	);

	// 4. Smoothing
	let smoother = GaussianSmoother::new(config.smoothing_sigma_bins)?;
	let smoothed_spike_maps = smoother.smooth_all(&spike_maps);
	let smoothed_occupancy = smoother.smooth(&occupancy);

	// 5. Rate maps
	let rate_maps: Vec<RateMap> = smoothed_spike_maps
		.iter()
		.map(|counts| rate_map(counts, &smoothed_occupancy))
		.collect();
	let invalid_bins = rate_maps
		.first()
		.map_or(0, |m| m.iter().filter(|v| v.is_none()).count());
	if invalid_bins > 0 {
		warn!(invalid_bins, "Bins without occupancy excluded from rate maps");
	}
	let normalized_maps: Vec<NormalizedMap> = rate_maps.iter().map(|m| normalize(m)).collect();

	let neuron_ids: Vec<String> = session.neurons().iter().map(|n| n.id.clone()).collect();
	for (id, map) in neuron_ids.iter().zip(&normalized_maps) {
		if map.degenerate {
			warn!(neuron = %id, "Neuron has no spatial firing; excluded from classification");
		}
	}

	// 6. Classification
	let classification = classify(&normalized_maps, config.place_cell_std_multiplier);
	debug!(
		place_cells = classification.count(),
		population_mean = classification.population_mean,
		population_std = classification.population_std,
		"Place cells classified"
	);

	Ok(Analysis {
		config: config.clone(),
		binner,
		neuron_ids,
		motion,
		bins,
		spike_maps,
		occupancy,
		smoothed_spike_maps,
		smoothed_occupancy,
		rate_maps,
		normalized_maps,
		classification,
	})
}

// ============================================================================
// Tests
// ============================================================================
