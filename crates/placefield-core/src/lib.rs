//! # Placefield Core
//!
//! Spatial firing-rate maps and place-cell detection for neurons recorded
//! while an animal runs a linear track.
//!
//! ## Why Rate Maps?
//!
//! A raw spike train tells you *when* a neuron fired. Place cells only make
//! sense once you know *where* the animal was, and for how long:
//!
//! - **Running matters** - Spikes during rest reflect replay, not location
//! - **Time spent matters** - A bin visited twice as long collects twice the spikes
//! - **Noise matters** - Sparse counts need smoothing before peaks mean anything
//!
//! ## Pipeline
//!
//! 1. **Motion filter** - drop samples below the speed threshold
//!    ```text
//!    v[i] = (x[i+1] − x[i]) · f_s
//!    ```
//! 2. **Binning** - assign each sample to `[i·w, (i+1)·w)`
//! 3. **Aggregation** - spike-count and occupancy histograms
//! 4. **Smoothing** - Gaussian kernel with replicated edges
//! 5. **Rate maps** - `rate = spikes / occupancy`, normalized to peak
//! 6. **Classification** - peak contrast against `mean + k·std` of the population,
//!    or a map whose spread exceeds its mean
//!
//! ## Example
//!
//! ```rust
//! use placefield_core::{analyze, AnalysisConfig, Neuron, Session};
//!
//! // Two laps over a 10 cm track at 10 cm/s, sampled at 10 Hz
//! let mut time = Vec::new();
//! let mut position = Vec::new();
//! for lap in 0..2_i32 {
//!     for step in 0..10 {
//!         time.push(f64::from(lap * 10 + step) * 0.1);
//!         position.push(f64::from(step));
//!     }
//! }
//! let mut spikes = vec![0.0; 20];
//! spikes[5] = 1.0;
//! spikes[15] = 1.0;
//!
//! let session = Session::new(time, position, vec![Neuron::new("cell", spikes)], 10.0)?;
//! let config = AnalysisConfig {
//!     n_bins: 5,
//!     speed_threshold_cm_s: 5.0,
//!     ..Default::default()
//! };
//!
//! let analysis = analyze(&session, &config)?;
//! assert_eq!(analysis.normalized_maps[0].peak_bin(), Some(2));
//! # Ok::<(), placefield_core::PlacefieldError>(())
//! ```
//!
//! ## References
//!
//! - O'Keefe, J., & Dostrovsky, J. (1971). *The hippocampus as a spatial map* -
//!   Place cells
//! - Skaggs, W. E., et al. (1996). *Theta phase precession in hippocampal
//!   neuronal populations* - Occupancy-normalized rate maps

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod binning;
pub mod classify;
pub mod config;
pub mod error;
pub mod maps;
pub mod motion;
pub mod pipeline;
pub mod rate;
pub mod session;
pub mod smoothing;
#[cfg(feature = "synthetic")]
pub mod synthetic;

pub use binning::{PositionBinner, MAX_BINS};
pub use classify::{classify, mean_and_std, Classification, SELECTIVITY_FLOOR};
pub use config::AnalysisConfig;
pub use error::{PlacefieldError, Result};
pub use maps::{occupancy_map, spike_count_map, time_deltas, weighted_histogram};
pub use motion::{compute_speed, filter_session, mask_spikes, movement_mask, MotionFilter};
pub use pipeline::{analyze, Analysis, AnalysisReport, NeuronReport};
pub use rate::{normalize, peak, peak_bin, rate_map, NormalizedMap, RateMap};
pub use session::{Neuron, Session};
pub use smoothing::GaussianSmoother;
#[cfg(feature = "synthetic")]
pub use synthetic::{generate_session, SyntheticSessionConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
