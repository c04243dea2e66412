//! Recording Sessions
//!
//! A session is one run of the animal on the track: position and time
//! sampled at a fixed rate, with a spike-count train per neuron aligned
//! to the same samples.
//!
//! On disk a session is a JSON table:
//!
//! ```text
//! {
//!   "behavior": { "position": [..], "time": [..] },
//!   "neurons": { "<id>": [..], .. },
//!   "sample_rate_hz": 1000.0        // optional
//! }
//! ```

use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{PlacefieldError, Result};

/// Spike-count train of a single neuron.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Neuron {
	/// Neuron identifier
	pub id: String,
	/// Spike count per sample
	pub spikes: Vec<f64>,
}

impl Neuron {
	/// Create a neuron from an id and its spike train.
	pub fn new(id: impl Into<String>, spikes: Vec<f64>) -> Self {
		Self {
			id: id.into(),
			spikes,
		}
	}

	/// Total number of spikes in the train.
	#[must_use]
	pub fn total_spikes(&self) -> f64 {
		self.spikes.iter().sum()
	}
}

/// A validated recording session. All vectors share one sample index.
#[derive(Clone, Debug, PartialEq)]
pub struct Session {
	time: Vec<f64>,
	position: Vec<f64>,
	neurons: Vec<Neuron>,
	sample_rate_hz: f64,
}

// Wire layout of a session file.
#[derive(Serialize, Deserialize)]
struct SessionFile {
	behavior: BehaviorColumns,
	neurons: BTreeMap<String, Vec<f64>>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	sample_rate_hz: Option<f64>,
}

#[derive(Serialize, Deserialize)]
struct BehaviorColumns {
	position: Vec<f64>,
	time: Vec<f64>,
}

impl Session {
	/// Build a session, checking that every field is aligned with `time`.
	///
	/// Positions may be non-finite (tracking dropouts); those samples are
	/// treated as undefined downstream.
	///
	/// # Errors
	///
	/// Fails fast on the first missing or mismatched field.
	pub fn new(
		time: Vec<f64>,
		position: Vec<f64>,
		neurons: Vec<Neuron>,
		sample_rate_hz: f64,
	) -> Result<Self> {
		if time.is_empty() {
			return Err(PlacefieldError::EmptySession);
		}
		if !(sample_rate_hz.is_finite() && sample_rate_hz > 0.0) {
			return Err(PlacefieldError::InvalidSampleRate(sample_rate_hz));
		}
		if let Some(index) = time.iter().position(|t| !t.is_finite()) {
			return Err(PlacefieldError::NonFiniteTime { index });
		}
		if position.len() != time.len() {
			return Err(PlacefieldError::length_mismatch(
				"behavior.position",
				time.len(),
				position.len(),
			));
		}

		let mut seen = HashSet::with_capacity(neurons.len());
		for neuron in &neurons {
			if !seen.insert(neuron.id.as_str()) {
				return Err(PlacefieldError::DuplicateNeuron(neuron.id.clone()));
			}
			if neuron.spikes.len() != time.len() {
				return Err(PlacefieldError::length_mismatch(
					format!("neurons.{}", neuron.id),
					time.len(),
					neuron.spikes.len(),
				));
			}
			if let Some((index, &value)) = neuron
				.spikes
				.iter()
				.enumerate()
				.find(|(_, &count)| !(count.is_finite() && count >= 0.0))
			{
				return Err(PlacefieldError::InvalidSpikeCount {
					neuron: neuron.id.clone(),
					index,
					value,
				});
			}
		}

		Ok(Self {
			time,
			position,
			neurons,
			sample_rate_hz,
		})
	}

	/// Parse a session from JSON. `default_sample_rate_hz` is used when the
	/// file has no `sample_rate_hz` key. Neurons are ordered by id.
	///
	/// # Errors
	///
	/// Returns an error naming the missing or misaligned field.
	pub fn from_json_reader(reader: impl Read, default_sample_rate_hz: f64) -> Result<Self> {
		let file: SessionFile = serde_json::from_reader(reader)?;
		Self::from_file(file, default_sample_rate_hz)
	}

	/// Parse a session from a JSON string.
	///
	/// # Errors
	///
	/// See [`Session::from_json_reader`].
	pub fn from_json_str(json: &str, default_sample_rate_hz: f64) -> Result<Self> {
		let file: SessionFile = serde_json::from_str(json)?;
		Self::from_file(file, default_sample_rate_hz)
	}

	/// Load a session from a JSON file on disk.
	///
	/// # Errors
	///
	/// See [`Session::from_json_reader`]; also fails if the file cannot be opened.
	pub fn from_json_file(path: impl AsRef<Path>, default_sample_rate_hz: f64) -> Result<Self> {
		let reader = BufReader::new(File::open(path)?);
		Self::from_json_reader(reader, default_sample_rate_hz)
	}

	fn from_file(file: SessionFile, default_sample_rate_hz: f64) -> Result<Self> {
		let neurons = file
			.neurons
			.into_iter()
			.map(|(id, spikes)| Neuron { id, spikes })
			.collect();
		Self::new(
			file.behavior.time,
			file.behavior.position,
			neurons,
			file.sample_rate_hz.unwrap_or(default_sample_rate_hz),
		)
	}

	/// Write the session in the same JSON layout it is read from.
	///
	/// # Errors
	///
	/// Returns an error if serialization or the underlying writer fails.
	pub fn to_json_writer(&self, writer: impl Write) -> Result<()> {
		let file = SessionFile {
			behavior: BehaviorColumns {
				position: self.position.clone(),
				time: self.time.clone(),
			},
			neurons: self
				.neurons
				.iter()
				.map(|n| (n.id.clone(), n.spikes.clone()))
				.collect(),
			sample_rate_hz: Some(self.sample_rate_hz),
		};
		serde_json::to_writer(writer, &file)?;
		Ok(())
	}

	/// Write the session to a JSON file.
	///
	/// # Errors
	///
	/// See [`Session::to_json_writer`].
	pub fn to_json_file(&self, path: impl AsRef<Path>) -> Result<()> {
		let mut writer = BufWriter::new(File::create(path)?);
		self.to_json_writer(&mut writer)?;
		writer.flush()?;
		Ok(())
	}

	/// Sample timestamps (s).
	#[must_use]
	pub fn time(&self) -> &[f64] {
		&self.time
	}

	/// Animal position per sample (cm).
	#[must_use]
	pub fn position(&self) -> &[f64] {
		&self.position
	}

	/// Recorded neurons, in session order.
	#[must_use]
	pub fn neurons(&self) -> &[Neuron] {
		&self.neurons
	}

	/// Look up a neuron by id.
	#[must_use]
	pub fn neuron(&self, id: &str) -> Option<&Neuron> {
		self.neurons.iter().find(|n| n.id == id)
	}

	/// Sampling rate (Hz).
	#[must_use]
	pub const fn sample_rate_hz(&self) -> f64 {
		self.sample_rate_hz
	}

	/// Number of samples.
	#[must_use]
	pub fn len(&self) -> usize {
		self.time.len()
	}

	/// `true` if the session has no samples. Never the case after validation.
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.time.is_empty()
	}

	/// Number of neurons.
	#[must_use]
	pub fn n_neurons(&self) -> usize {
		self.neurons.len()
	}

	/// Largest finite position, if any.
	#[must_use]
	pub fn max_position(&self) -> Option<f64> {
		self.position
			.iter()
			.copied()
			.filter(|p| p.is_finite())
			.reduce(f64::max)
	}

	/// Elapsed recording time, summed over forward steps so that teleport
	/// resets of the clock do not cancel out earlier laps.
	#[must_use]
	pub fn duration_s(&self) -> f64 {
		self.time
			.windows(2)
			.map(|w| w[1] - w[0])
			.filter(|dt| *dt > 0.0)
			.sum()
	}
}
