//! Analysis Configuration
//!
//! Every stage takes its parameters from one [`AnalysisConfig`],
//! passed explicitly down the pipeline.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::binning::MAX_BINS;
use crate::error::{PlacefieldError, Result};

/// Parameters for a rate-map analysis run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
	/// Number of spatial bins along the track (default: 50)
	pub n_bins: usize,
	/// Bin width in cm; overrides `n_bins` when set
	pub bin_width_cm: Option<f64>,
	/// Track length in cm; derived from the maximum position when unset
	pub track_length_cm: Option<f64>,
	/// Minimum running speed for a sample to count (default: 10 cm/s)
	pub speed_threshold_cm_s: f64,
	/// Gaussian smoothing scale in bins (default: 1)
	pub smoothing_sigma_bins: f64,
	/// `k` in the place-cell threshold `mean + k·std` (default: 1.5)
	pub place_cell_std_multiplier: f64,
	/// Sampling rate used when a session does not carry its own (default: 1000 Hz)
	pub sample_rate_hz: f64,
}

impl Default for AnalysisConfig {
	fn default() -> Self {
		Self {
			n_bins: 50,
			bin_width_cm: None,
			track_length_cm: None,
			speed_threshold_cm_s: 10.0,
			smoothing_sigma_bins: 1.0,
			place_cell_std_multiplier: 1.5,
			sample_rate_hz: 1000.0,
		}
	}
}

impl AnalysisConfig {
	/// Load a configuration from a JSON file. Missing keys take their defaults.
	///
	/// # Errors
	///
	/// Returns an error if the file cannot be read, is not valid JSON,
	/// or holds out-of-range values.
	pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
		let reader = BufReader::new(File::open(path)?);
		let config: Self = serde_json::from_reader(reader)?;
		config.validate()?;
		Ok(config)
	}

	/// Reject parameter combinations no stage can work with.
	///
	/// # Errors
	///
	/// Returns [`PlacefieldError::InvalidConfig`] naming the first bad field.
	pub fn validate(&self) -> Result<()> {
		if self.n_bins == 0 {
			return Err(invalid("n_bins must be at least 1"));
		}
		if self.n_bins > MAX_BINS {
			return Err(invalid(format!(
				"n_bins must be at most {MAX_BINS}, got {}",
				self.n_bins
			)));
		}
		if let Some(width) = self.bin_width_cm {
			if !(width.is_finite() && width > 0.0) {
				return Err(invalid(format!("bin_width_cm must be positive, got {width}")));
			}
		}
		if let Some(length) = self.track_length_cm {
			if !(length.is_finite() && length > 0.0) {
				return Err(invalid(format!("track_length_cm must be positive, got {length}")));
			}
		}
		if !(self.speed_threshold_cm_s.is_finite() && self.speed_threshold_cm_s >= 0.0) {
			return Err(invalid(format!(
				"speed_threshold_cm_s must be non-negative, got {}",
				self.speed_threshold_cm_s
			)));
		}
		if !(self.smoothing_sigma_bins.is_finite() && self.smoothing_sigma_bins >= 0.0) {
			return Err(invalid(format!(
				"smoothing_sigma_bins must be non-negative, got {}",
				self.smoothing_sigma_bins
			)));
		}
		if !(self.place_cell_std_multiplier.is_finite() && self.place_cell_std_multiplier >= 0.0) {
			return Err(invalid(format!(
				"place_cell_std_multiplier must be non-negative, got {}",
				self.place_cell_std_multiplier
			)));
		}
		if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
			return Err(PlacefieldError::InvalidSampleRate(self.sample_rate_hz));
		}
		Ok(())
	}
}

fn invalid(message: impl Into<String>) -> PlacefieldError {
	PlacefieldError::InvalidConfig(message.into())
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	#[test]
	fn defaults_match_reference_parameters() {
		let config = AnalysisConfig::default();
		assert_eq!(config.n_bins, 50);
		assert_eq!(config.speed_threshold_cm_s, 10.0);
		assert_eq!(config.smoothing_sigma_bins, 1.0);
		assert_eq!(config.place_cell_std_multiplier, 1.5);
		assert_eq!(config.sample_rate_hz, 1000.0);
		assert!(config.validate().is_ok());
	}

	#[test]
	fn partial_json_fills_defaults() {
		let config: AnalysisConfig =
			serde_json::from_str(r#"{ "n_bins": 40, "bin_width_cm": 5.0 }"#).unwrap();
		assert_eq!(config.n_bins, 40);
		assert_eq!(config.bin_width_cm, Some(5.0));
		assert_eq!(config.speed_threshold_cm_s, 10.0);
	}

	#[test]
	fn validate_rejects_bad_values() {
		let zero_bins = AnalysisConfig {
			n_bins: 0,
			..Default::default()
		};
		assert!(zero_bins.validate().is_err());

		let too_many_bins = AnalysisConfig {
			n_bins: MAX_BINS + 1,
			..Default::default()
		};
		assert!(too_many_bins.validate().is_err());

		let negative_sigma = AnalysisConfig {
			smoothing_sigma_bins: -1.0,
			..Default::default()
		};
		assert!(negative_sigma.validate().is_err());

		let bad_rate = AnalysisConfig {
			sample_rate_hz: 0.0,
			..Default::default()
		};
		assert!(matches!(
			bad_rate.validate(),
			Err(PlacefieldError::InvalidSampleRate(_))
		));
	}
}
