//! Position Binning
//!
//! The track `[0, L)` is cut into `n` equal bins and each sample is
//! assigned to the half-open interval `[i·w, (i+1)·w)` holding its
//! position.
//!
//! Edge handling clamps: positions below 0 fall into the first bin,
//! positions at or past the end fall into the last bin, and when the bin
//! width does not divide the track the last bin absorbs the remainder.
//! Every finite position therefore maps to exactly one bin.

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::{PlacefieldError, Result};

/// Upper bound on the number of bins a track may be cut into.
pub const MAX_BINS: usize = 100_000;

/// Maps track positions onto spatial bins.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PositionBinner {
	/// Track length (cm)
	pub track_length_cm: f64,
	/// Width of every bin except possibly the last (cm)
	pub bin_width_cm: f64,
	/// Number of bins
	pub n_bins: usize,
}

impl PositionBinner {
	/// Split the track into `n_bins` bins of equal width.
	///
	/// # Errors
	///
	/// Returns [`PlacefieldError::InvalidGeometry`] for a non-positive track
	/// length, zero bins, or more than [`MAX_BINS`] bins.
	pub fn with_bin_count(track_length_cm: f64, n_bins: usize) -> Result<Self> {
		check_track_length(track_length_cm)?;
		if n_bins == 0 {
			return Err(PlacefieldError::InvalidGeometry(
				"at least one bin is required".into(),
			));
		}
		check_bin_count(n_bins)?;

		#[allow(clippy::cast_precision_loss)]
		let bin_width_cm = track_length_cm / n_bins as f64;
		Ok(Self {
			track_length_cm,
			bin_width_cm,
			n_bins,
		})
	}

	/// Split the track into bins of a fixed width. A trailing partial
	/// interval is merged into the last bin.
	///
	/// # Errors
	///
	/// Returns [`PlacefieldError::InvalidGeometry`] for a non-positive track
	/// length or bin width, or a width so narrow the track would need more
	/// than [`MAX_BINS`] bins.
	pub fn with_bin_width(track_length_cm: f64, bin_width_cm: f64) -> Result<Self> {
		check_track_length(track_length_cm)?;
		if !(bin_width_cm.is_finite() && bin_width_cm > 0.0) {
			return Err(PlacefieldError::InvalidGeometry(format!(
				"bin width must be positive, got {bin_width_cm}"
			)));
		}

		let ratio = (track_length_cm / bin_width_cm).floor();
		#[allow(clippy::cast_precision_loss)]
		let limit = MAX_BINS as f64;
		if ratio > limit {
			return Err(PlacefieldError::InvalidGeometry(format!(
				"bin width {bin_width_cm} cm splits a {track_length_cm} cm track into more than {MAX_BINS} bins"
			)));
		}
		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let n_bins = (ratio as usize).max(1);
		Ok(Self {
			track_length_cm,
			bin_width_cm,
			n_bins,
		})
	}

	/// Build the binner an analysis run asks for.
	///
	/// The track length comes from the configuration, falling back to the
	/// largest observed position.
	///
	/// # Errors
	///
	/// Fails when neither source yields a positive track length.
	pub fn from_config(config: &AnalysisConfig, max_position: Option<f64>) -> Result<Self> {
		let track_length_cm = config.track_length_cm.or(max_position).ok_or_else(|| {
			PlacefieldError::InvalidGeometry("no finite position to derive track length from".into())
		})?;
		match config.bin_width_cm {
			Some(width) => Self::with_bin_width(track_length_cm, width),
			None => Self::with_bin_count(track_length_cm, config.n_bins),
		}
	}

	/// Bin index for one position, `None` if the position is not finite.
	#[must_use]
	pub fn bin_of(&self, position_cm: f64) -> Option<usize> {
		if !position_cm.is_finite() {
			return None;
		}
		if position_cm <= 0.0 {
			return Some(0);
		}

		#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
		let raw = (position_cm / self.bin_width_cm).floor() as usize;
		Some(raw.min(self.n_bins - 1))
	}

	/// Bin index for every sample.
	#[must_use]
	pub fn assign(&self, positions: &[f64]) -> Vec<Option<usize>> {
		positions.iter().map(|&p| self.bin_of(p)).collect()
	}

	/// Left edge of every bin plus the track end.
	#[must_use]
	pub fn edges(&self) -> Vec<f64> {
		#[allow(clippy::cast_precision_loss)]
		let mut edges: Vec<f64> = (0..self.n_bins)
			.map(|i| i as f64 * self.bin_width_cm)
			.collect();
		edges.push(self.track_length_cm);
		edges
	}

	/// Centre of every bin (cm).
	#[must_use]
	pub fn centers(&self) -> Vec<f64> {
		self.edges()
			.windows(2)
			.map(|w| 0.5 * (w[0] + w[1]))
			.collect()
	}
}

fn check_bin_count(n_bins: usize) -> Result<()> {
	if n_bins <= MAX_BINS {
		Ok(())
	} else {
		Err(PlacefieldError::InvalidGeometry(format!(
			"{n_bins} bins exceeds the limit of {MAX_BINS}"
		)))
	}
}

fn check_track_length(track_length_cm: f64) -> Result<()> {
	if track_length_cm.is_finite() && track_length_cm > 0.0 {
		Ok(())
	} else {
		Err(PlacefieldError::InvalidGeometry(format!(
			"track length must be positive, got {track_length_cm}"
		)))
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	#[test]
	fn half_open_intervals() {
		let binner = PositionBinner::with_bin_count(200.0, 50).unwrap();
		assert_eq!(binner.bin_width_cm, 4.0);
		assert_eq!(binner.bin_of(0.0), Some(0));
		assert_eq!(binner.bin_of(3.999), Some(0));
		assert_eq!(binner.bin_of(4.0), Some(1));
		assert_eq!(binner.bin_of(102.0), Some(25));
		assert_eq!(binner.bin_of(199.9), Some(49));
	}

	#[test]
	fn out_of_range_positions_are_clamped() {
		let binner = PositionBinner::with_bin_count(100.0, 10).unwrap();
		assert_eq!(binner.bin_of(-3.0), Some(0));
		assert_eq!(binner.bin_of(100.0), Some(9));
		assert_eq!(binner.bin_of(150.0), Some(9));
		assert_eq!(binner.bin_of(f64::NAN), None);
		assert_eq!(binner.bin_of(f64::INFINITY), None);
	}

	#[test]
	fn remainder_is_merged_into_last_bin() {
		let binner = PositionBinner::with_bin_width(10.0, 3.0).unwrap();
		assert_eq!(binner.n_bins, 3);
		assert_eq!(binner.bin_of(8.5), Some(2));
		assert_eq!(binner.bin_of(9.9), Some(2));
		assert_eq!(binner.edges(), vec![0.0, 3.0, 6.0, 10.0]);
		assert_eq!(binner.centers(), vec![1.5, 4.5, 8.0]);
	}

	#[test]
	fn narrow_track_still_has_one_bin() {
		let binner = PositionBinner::with_bin_width(2.0, 5.0).unwrap();
		assert_eq!(binner.n_bins, 1);
		assert_eq!(binner.bin_of(1.9), Some(0));
	}

	#[test]
	fn binning_is_total_for_finite_positions() {
		let binner = PositionBinner::with_bin_count(37.0, 7).unwrap();
		let positions: Vec<f64> = (-20..80_i32).map(|i| f64::from(i) * 0.5).collect();
		for bin in binner.assign(&positions) {
			let bin = bin.unwrap();
			assert!(bin < binner.n_bins);
		}
	}

	#[test]
	fn invalid_geometry_is_rejected() {
		assert!(PositionBinner::with_bin_count(0.0, 10).is_err());
		assert!(PositionBinner::with_bin_count(100.0, 0).is_err());
		assert!(PositionBinner::with_bin_width(100.0, -1.0).is_err());
		assert!(PositionBinner::from_config(&AnalysisConfig::default(), None).is_err());
	}

	#[test]
	fn bin_count_is_bounded() {
		assert!(PositionBinner::with_bin_count(200.0, MAX_BINS).is_ok());
		assert!(PositionBinner::with_bin_count(200.0, MAX_BINS + 1).is_err());
		assert!(PositionBinner::with_bin_count(200.0, usize::MAX).is_err());

		let err = PositionBinner::with_bin_width(200.0, 1e-12).unwrap_err();
		assert!(matches!(err, PlacefieldError::InvalidGeometry(_)));
		assert!(err.is_config_error());
	}

	#[test]
	fn config_prefers_explicit_track_length() {
		let config = AnalysisConfig {
			track_length_cm: Some(200.0),
			..Default::default()
		};
		let binner = PositionBinner::from_config(&config, Some(150.0)).unwrap();
		assert_eq!(binner.n_bins, 50);
		assert_eq!(binner.bin_width_cm, 4.0);

		let derived = PositionBinner::from_config(&AnalysisConfig::default(), Some(150.0)).unwrap();
		assert_eq!(derived.track_length_cm, 150.0);
	}
}
