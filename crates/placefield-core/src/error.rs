//! Error types for rate-map analysis.

/// Errors that can occur while loading a session or running the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PlacefieldError {
	/// Session contains no samples.
	#[error("Session has no samples")]
	EmptySession,

	/// A field is not aligned with the session's time base.
	#[error("Length mismatch in `{field}`: expected {expected} samples, found {actual}")]
	LengthMismatch {
		/// Name of the misaligned field
		field: String,
		/// Number of samples in `behavior.time`
		expected: usize,
		/// Number of samples in the field
		actual: usize,
	},

	/// Two neurons share the same id.
	#[error("Duplicate neuron id: {0}")]
	DuplicateNeuron(String),

	/// A spike count is negative or not a number.
	#[error("Invalid spike count {value} for neuron `{neuron}` at sample {index}")]
	InvalidSpikeCount {
		/// Neuron id
		neuron: String,
		/// Sample index
		index: usize,
		/// Offending value
		value: f64,
	},

	/// A timestamp is NaN or infinite.
	#[error("Non-finite value in `behavior.time` at sample {index}")]
	NonFiniteTime {
		/// Sample index
		index: usize,
	},

	/// Sample rate is zero, negative or not finite.
	#[error("Invalid sample rate: {0} Hz")]
	InvalidSampleRate(f64),

	/// Track or bin geometry cannot produce any bins.
	#[error("Invalid bin geometry: {0}")]
	InvalidGeometry(String),

	/// A configuration value is out of range.
	#[error("Invalid configuration: {0}")]
	InvalidConfig(String),

	/// JSON (de)serialization error.
	#[error("Failed to parse session JSON: {0}")]
	Json(#[from] serde_json::Error),

	/// I/O error.
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl PlacefieldError {
	/// Check if this error was caused by malformed input data rather than configuration.
	#[must_use]
	pub const fn is_input_error(&self) -> bool {
		matches!(
			self,
			Self::EmptySession
				| Self::LengthMismatch { .. }
				| Self::DuplicateNeuron(_)
				| Self::InvalidSpikeCount { .. }
				| Self::NonFiniteTime { .. }
				| Self::Json(_)
		)
	}

	/// Check if this error was caused by analysis parameters.
	#[must_use]
	pub const fn is_config_error(&self) -> bool {
		matches!(
			self,
			Self::InvalidConfig(_) | Self::InvalidGeometry(_) | Self::InvalidSampleRate(_)
		)
	}

	pub(crate) fn length_mismatch(field: impl Into<String>, expected: usize, actual: usize) -> Self {
		Self::LengthMismatch {
			field: field.into(),
			expected,
			actual,
		}
	}
}

/// Result type alias for placefield operations.
pub type Result<T> = std::result::Result<T, PlacefieldError>;

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn length_mismatch_names_the_field() {
		let err = PlacefieldError::length_mismatch("neurons.n3", 100, 99);
		let message = err.to_string();
		assert!(message.contains("neurons.n3"));
		assert!(message.contains("100"));
		assert!(message.contains("99"));
		assert!(err.is_input_error());
		assert!(!err.is_config_error());
	}

	#[test]
	fn config_errors_are_classified() {
		assert!(PlacefieldError::InvalidSampleRate(0.0).is_config_error());
		assert!(PlacefieldError::InvalidGeometry("zero bins".into()).is_config_error());
		assert!(!PlacefieldError::EmptySession.is_config_error());
	}
}
