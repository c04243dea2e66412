//! Synthetic Sessions
//!
//! Generates a linear-track session with known ground truth: one neuron
//! with a Gaussian place field and a population of neurons firing at a
//! uniform background rate.
//!
//! The animal runs at constant speed from 0 to the end of the track, then
//! teleports back to 0 for the next lap. The tuned neuron fires
//! deterministically whenever its integrated rate crosses a whole spike,
//! so its spatial profile follows the field exactly; background neurons
//! fire as independent Bernoulli trials drawn from a seeded RNG.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::error::{PlacefieldError, Result};
use crate::session::{Neuron, Session};

/// Parameters for [`generate_session`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyntheticSessionConfig {
	/// Number of samples (default: 10,000)
	pub n_samples: usize,
	/// Sampling rate (default: 1000 Hz)
	pub sample_rate_hz: f64,
	/// Track length (default: 200 cm)
	pub track_length_cm: f64,
	/// Laps run over the session (default: 1)
	pub laps: usize,
	/// Total neurons, tuned one included (default: 10)
	pub n_neurons: usize,
	/// Index of the tuned neuron (default: 0)
	pub tuned_neuron: usize,
	/// Place-field centre (default: 102 cm, the middle of bin 25 of 50)
	pub field_center_cm: f64,
	/// Place-field standard deviation (default: 8 cm)
	pub field_width_cm: f64,
	/// In-field peak rate (default: 100 Hz)
	pub field_peak_hz: f64,
	/// Out-of-field rate of the tuned neuron (default: 1 Hz)
	pub baseline_hz: f64,
	/// Rate of the untuned neurons (default: 30 Hz)
	pub background_hz: f64,
	/// RNG seed for the untuned neurons
	pub seed: u64,
}

impl Default for SyntheticSessionConfig {
	fn default() -> Self {
		Self {
			n_samples: 10_000,
			sample_rate_hz: 1000.0,
			track_length_cm: 200.0,
			laps: 1,
			n_neurons: 10,
			tuned_neuron: 0,
			field_center_cm: 102.0,
			field_width_cm: 8.0,
			field_peak_hz: 100.0,
			baseline_hz: 1.0,
			background_hz: 30.0,
			seed: 42,
		}
	}
}

impl SyntheticSessionConfig {
	fn validate(&self) -> Result<()> {
		if self.n_samples == 0 {
			return Err(invalid("n_samples must be at least 1"));
		}
		if self.laps == 0 || self.laps > self.n_samples {
			return Err(invalid("laps must be between 1 and n_samples"));
		}
		if self.tuned_neuron >= self.n_neurons {
			return Err(invalid(format!(
				"tuned_neuron {} out of range for {} neurons",
				self.tuned_neuron, self.n_neurons
			)));
		}
		if !(self.sample_rate_hz.is_finite() && self.sample_rate_hz > 0.0) {
			return Err(PlacefieldError::InvalidSampleRate(self.sample_rate_hz));
		}
		if !(self.track_length_cm > 0.0 && self.field_width_cm > 0.0) {
			return Err(invalid("track length and field width must be positive"));
		}
		let max_rate = self.field_peak_hz.max(self.background_hz) + self.baseline_hz;
		if max_rate > self.sample_rate_hz || self.background_hz < 0.0 || self.baseline_hz < 0.0 {
			return Err(invalid(
				"rates must be non-negative and below the sample rate",
			));
		}
		Ok(())
	}

	/// Firing rate of the tuned neuron at a position (Hz).
	#[must_use]
	pub fn field_rate(&self, position_cm: f64) -> f64 {
		let z = (position_cm - self.field_center_cm) / self.field_width_cm;
		self.field_peak_hz.mul_add((-0.5 * z * z).exp(), self.baseline_hz)
	}
}

fn invalid(message: impl Into<String>) -> PlacefieldError {
	PlacefieldError::InvalidConfig(message.into())
}

/// Build a synthetic session.
///
/// Neuron ids are `n00`, `n01`, … so that sorted order matches index order.
///
/// # Errors
///
/// Returns [`PlacefieldError::InvalidConfig`] for inconsistent parameters.
pub fn generate_session(config: &SyntheticSessionConfig) -> Result<Session> {
	config.validate()?;

	let dt = 1.0 / config.sample_rate_hz;
	let samples_per_lap = config.n_samples.div_ceil(config.laps);
	#[allow(clippy::cast_precision_loss)]
	let step_cm = config.track_length_cm / samples_per_lap as f64;

	#[allow(clippy::cast_precision_loss)]
	let time: Vec<f64> = (0..config.n_samples).map(|i| i as f64 * dt).collect();
	#[allow(clippy::cast_precision_loss)]
	let position: Vec<f64> = (0..config.n_samples)
		.map(|i| (i % samples_per_lap) as f64 * step_cm)
		.collect();

	let mut rng = StdRng::seed_from_u64(config.seed);
	let background_p = config.background_hz * dt;

	let neurons = (0..config.n_neurons)
		.map(|index| {
			let spikes = if index == config.tuned_neuron {
				integrate_and_fire(&position, dt, |p| config.field_rate(p))
			} else {
				position
					.iter()
					.map(|_| if rng.gen_bool(background_p) { 1.0 } else { 0.0 })
					.collect()
			};
			Neuron::new(format!("n{index:02}"), spikes)
		})
		.collect();

	Session::new(time, position, neurons, config.sample_rate_hz)
}

/// Emit a spike each time the integrated rate crosses a whole number.
fn integrate_and_fire(position: &[f64], dt: f64, rate: impl Fn(f64) -> f64) -> Vec<f64> {
	let mut accumulated = 0.0;
	position
		.iter()
		.map(|&p| {
			accumulated += rate(p) * dt;
			if accumulated >= 1.0 {
				accumulated -= 1.0;
				1.0
			} else {
				0.0
			}
		})
		.collect()
}
