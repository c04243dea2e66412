//! Gaussian Smoothing
//!
//! Maps are convolved with a normalized Gaussian kernel about 7σ wide.
//! Before convolving, each end is padded by repeating its edge value so
//! the first and last bins are not pulled toward zero:
//!
//! ```text
//! [a a a | a b c … x y z | z z z]  ⊛  G(σ)  →  central n values
//! ```
//!
//! The pad is ≈2.5σ, widened to the kernel half-width when that is larger
//! so every output tap reads real or replicated data. Both are capped at the
//! map length, which keeps very large σ from outgrowing the map.

use serde::{Deserialize, Serialize};

use crate::error::{PlacefieldError, Result};

/// Gaussian smoother for binned maps.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GaussianSmoother {
	/// Standard deviation in bins
	pub sigma_bins: f64,
	/// Edge pad length as a multiple of σ (default: 2.5)
	pub pad_factor: f64,
	/// Kernel width as a multiple of σ (default: 7)
	pub kernel_factor: f64,
}

impl GaussianSmoother {
	/// Smoother with the default pad and kernel widths.
	///
	/// # Errors
	///
	/// Returns [`PlacefieldError::InvalidConfig`] if `sigma_bins` is negative
	/// or not finite.
	pub fn new(sigma_bins: f64) -> Result<Self> {
		if !(sigma_bins.is_finite() && sigma_bins >= 0.0) {
			return Err(PlacefieldError::InvalidConfig(format!(
				"smoothing sigma must be non-negative, got {sigma_bins}"
			)));
		}
		Ok(Self {
			sigma_bins,
			pad_factor: 2.5,
			kernel_factor: 7.0,
		})
	}

	/// Taps on each side of the kernel centre for a map of `len` bins.
	///
	/// Capped at `len`: taps further out would only read replicated edge
	/// values.
	#[must_use]
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	pub fn half_width(&self, len: usize) -> usize {
		let half = (self.kernel_factor * self.sigma_bins / 2.0).ceil() as usize;
		half.min(len)
	}

	/// Replicated values added at each end of a map of `len` bins.
	#[must_use]
	#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
	pub fn pad_len(&self, len: usize) -> usize {
		let pad = (self.pad_factor * self.sigma_bins).ceil() as usize;
		pad.min(len).max(self.half_width(len))
	}

	/// Normalized kernel of `2·half_width + 1` taps for a map of `len` bins.
	#[must_use]
	pub fn kernel(&self, len: usize) -> Vec<f64> {
		let half = self.half_width(len);
		if half == 0 {
			return vec![1.0];
		}

		#[allow(clippy::cast_precision_loss)]
		let raw: Vec<f64> = (0..=2 * half)
			.map(|i| {
				let x = i as f64 - half as f64;
				(-0.5 * (x / self.sigma_bins).powi(2)).exp()
			})
			.collect();
		let total: f64 = raw.iter().sum();
		raw.into_iter().map(|w| w / total).collect()
	}

	/// Smooth one map, returning a vector of the same length.
	#[must_use]
	pub fn smooth(&self, values: &[f64]) -> Vec<f64> {
		let (Some(&first), Some(&last)) = (values.first(), values.last()) else {
			return Vec::new();
		};
		let kernel = self.kernel(values.len());
		if kernel.len() == 1 {
			return values.to_vec();
		}

		let pad = self.pad_len(values.len());
		let half = self.half_width(values.len());
		let mut padded = Vec::with_capacity(values.len() + 2 * pad);
		padded.extend(std::iter::repeat(first).take(pad));
		padded.extend_from_slice(values);
		padded.extend(std::iter::repeat(last).take(pad));

		(0..values.len())
			.map(|i| {
				let start = i + pad - half;
				padded[start..start + kernel.len()]
					.iter()
					.zip(&kernel)
					.fold(0.0, |acc, (&v, &w)| v.mul_add(w, acc))
			})
			.collect()
	}

	/// Smooth a set of maps.
	#[must_use]
	pub fn smooth_all(&self, maps: &[Vec<f64>]) -> Vec<Vec<f64>> {
		maps.iter().map(|m| self.smooth(m)).collect()
	}
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
	use super::*;

	#[test]
	fn kernel_is_normalized_and_symmetric() {
		let smoother = GaussianSmoother::new(1.0).unwrap();
		let kernel = smoother.kernel(50);
		assert_eq!(kernel.len(), 9);
		assert!((kernel.iter().sum::<f64>() - 1.0).abs() < 1e-12);
		for i in 0..kernel.len() / 2 {
			assert!((kernel[i] - kernel[kernel.len() - 1 - i]).abs() < 1e-15);
		}
		assert!(kernel[4] > kernel[3]);
	}

	#[test]
	fn pad_covers_kernel() {
		let smoother = GaussianSmoother::new(1.0).unwrap();
		assert_eq!(smoother.half_width(50), 4);
		assert_eq!(smoother.pad_len(50), 4);

		let wide_pad = GaussianSmoother {
			pad_factor: 5.0,
			..smoother
		};
		assert_eq!(wide_pad.pad_len(50), 5);
	}

	#[test]
	fn huge_sigma_is_bounded_by_map_length() {
		let smoother = GaussianSmoother::new(1e20).unwrap();
		assert_eq!(smoother.half_width(5), 5);
		assert_eq!(smoother.pad_len(5), 5);
		assert_eq!(smoother.kernel(5).len(), 11);

		// A kernel that wide is flat, so every bin becomes the window mean
		let smoothed = smoother.smooth(&[0.0, 0.0, 4.0, 0.0, 0.0]);
		assert_eq!(smoothed.len(), 5);
		for v in smoothed {
			assert!((v - 4.0 / 11.0).abs() < 1e-12);
		}
	}

	#[test]
	fn constant_input_is_unchanged() {
		let smoother = GaussianSmoother::new(2.0).unwrap();
		let smoothed = smoother.smooth(&[3.5; 20]);
		assert_eq!(smoothed.len(), 20);
		for v in smoothed {
			assert!((v - 3.5).abs() < 1e-12);
		}
	}

	#[test]
	fn total_mass_is_approximately_conserved() {
		let smoother = GaussianSmoother::new(1.0).unwrap();
		let mut values = vec![0.0; 50];
		values[25] = 10.0;
		values[20] = 4.0;
		let smoothed = smoother.smooth(&values);
		let before: f64 = values.iter().sum();
		let after: f64 = smoothed.iter().sum();
		assert!((before - after).abs() < 1e-9);
		assert!(smoothed[25] < 10.0);
		assert!(smoothed[24] > 0.0 && smoothed[26] > 0.0);
	}

	#[test]
	fn zero_sigma_is_identity() {
		let smoother = GaussianSmoother::new(0.0).unwrap();
		assert_eq!(smoother.smooth(&[1.0, 5.0, 2.0]), vec![1.0, 5.0, 2.0]);
	}

	#[test]
	fn edges_are_not_attenuated() {
		let smoother = GaussianSmoother::new(1.5).unwrap();
		let values: Vec<f64> = (0..10_i32).map(f64::from).collect();
		let smoothed = smoother.smooth(&values);
		// Replicated padding pulls the first bin up toward its neighbours
		assert!(smoothed[0] >= values[0]);
		assert!(smoothed[9] <= values[9]);
		assert!(smoothed[9] > 8.0);
	}

	#[test]
	fn empty_and_short_inputs() {
		let smoother = GaussianSmoother::new(1.0).unwrap();
		assert!(smoother.smooth(&[]).is_empty());
		assert!((smoother.smooth(&[7.0])[0] - 7.0).abs() < 1e-12);
		assert_eq!(smoother.smooth_all(&[vec![1.0; 3], vec![]]).len(), 2);
	}

	#[test]
	fn rejects_negative_sigma() {
		assert!(GaussianSmoother::new(-0.5).is_err());
		assert!(GaussianSmoother::new(f64::NAN).is_err());
	}
}
