//! Motion Filter
//!
//! Spatial tuning is only meaningful while the animal runs. Samples where
//! it sits still (or where the track teleports it back to the start) are
//! marked undefined so that later stages never count them.
//!
//! Speed is the forward difference of position scaled to cm/s:
//!
//! ```text
//! v[i] = (x[i+1] − x[i]) · f_s
//! ```
//!
//! The last sample has no forward neighbour and is undefined.

use serde::{Deserialize, Serialize};

use crate::session::Session;

/// Motion-filtered copy of a session's spike trains.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MotionFilter {
	/// Instantaneous speed per sample (cm/s), `None` where undefined
	pub speed: Vec<Option<f64>>,
	/// `true` for samples at or above the speed threshold
	pub moving: Vec<bool>,
	/// Per-neuron spike counts with non-moving samples set to `None`
	pub spikes: Vec<Vec<Option<f64>>>,
}

impl MotionFilter {
	/// Number of samples that passed the filter.
	#[must_use]
	pub fn moving_samples(&self) -> usize {
		self.moving.iter().filter(|&&m| m).count()
	}
}

/// Forward-difference speed in cm/s.
///
/// Negative speed means the position was reset (teleport) and is reported
/// as `None`, as are steps touching a non-finite position.
#[must_use]
pub fn compute_speed(position: &[f64], sample_rate_hz: f64) -> Vec<Option<f64>> {
	let mut speed: Vec<Option<f64>> = position
		.windows(2)
		.map(|w| {
			let v = (w[1] - w[0]) * sample_rate_hz;
			(v.is_finite() && v >= 0.0).then_some(v)
		})
		.collect();
	if !position.is_empty() {
		speed.push(None);
	}
	speed
}

/// Samples whose speed is defined and at least `threshold_cm_s`.
#[must_use]
pub fn movement_mask(speed: &[Option<f64>], threshold_cm_s: f64) -> Vec<bool> {
	speed
		.iter()
		.map(|v| v.is_some_and(|v| v >= threshold_cm_s))
		.collect()
}

/// Replace spike counts of non-moving samples with `None`.
#[must_use]
pub fn mask_spikes(spikes: &[f64], moving: &[bool]) -> Vec<Option<f64>> {
	spikes
		.iter()
		.zip(moving)
		.map(|(&count, &keep)| keep.then_some(count))
		.collect()
}

/// Apply the motion filter to every neuron of a session.
///
/// The session itself is left untouched.
#[must_use]
pub fn filter_session(session: &Session, threshold_cm_s: f64) -> MotionFilter {
	let speed = compute_speed(session.position(), session.sample_rate_hz());
	let moving = movement_mask(&speed, threshold_cm_s);
	let spikes = session
		.neurons()
		.iter()
		.map(|neuron| mask_spikes(&neuron.spikes, &moving))
		.collect();

	MotionFilter {
		speed,
		moving,
		spikes,
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;
	use crate::session::Neuron;

	#[test]
	fn speed_is_forward_difference_times_rate() {
		let speed = compute_speed(&[0.0, 0.02, 0.05, 0.05], 1000.0);
		assert_eq!(speed.len(), 4);
		assert!((speed[0].unwrap() - 20.0).abs() < 1e-9);
		assert!((speed[1].unwrap() - 30.0).abs() < 1e-9);
		assert_eq!(speed[2], Some(0.0));
		assert_eq!(speed[3], None);
	}

	#[test]
	fn teleport_and_dropout_are_undefined() {
		let speed = compute_speed(&[190.0, 199.0, 0.0, f64::NAN, 2.0], 1.0);
		assert_eq!(speed[0], Some(9.0));
		assert_eq!(speed[1], None); // reset to track start
		assert_eq!(speed[2], None);
		assert_eq!(speed[3], None);
		assert_eq!(speed[4], None);
	}

	#[test]
	fn threshold_is_inclusive() {
		let mask = movement_mask(&[Some(9.9), Some(10.0), Some(25.0), None], 10.0);
		assert_eq!(mask, vec![false, true, true, false]);
	}

	#[test]
	fn masked_spikes_are_undefined_not_zero() {
		let masked = mask_spikes(&[3.0, 1.0, 0.0], &[false, true, true]);
		assert_eq!(masked, vec![None, Some(1.0), Some(0.0)]);
	}

	#[test]
	fn filter_session_covers_all_neurons() {
		let session = Session::new(
			vec![0.0, 0.001, 0.002, 0.003],
			vec![0.0, 0.0, 0.05, 0.1],
			vec![
				Neuron::new("a", vec![1.0, 1.0, 1.0, 1.0]),
				Neuron::new("b", vec![0.0, 2.0, 0.0, 0.0]),
			],
			1000.0,
		)
		.unwrap();
		let filtered = filter_session(&session, 10.0);
		assert_eq!(filtered.moving, vec![false, true, true, false]);
		assert_eq!(filtered.moving_samples(), 2);
		assert_eq!(filtered.spikes.len(), 2);
		assert_eq!(filtered.spikes[1], vec![None, Some(2.0), Some(0.0), None]);
		// Source untouched
		assert_eq!(session.neurons()[0].spikes, vec![1.0; 4]);
	}
}
