//! Synthetic Place-Cell Example
//!
//! This example demonstrates the full rate-map pipeline:
//! 1. Generate a session with one tuned neuron and nine untuned ones
//! 2. Run the analysis with default parameters
//! 3. Print each neuron's map and the place-cell decision
//!
//! Run with: `cargo run --example synthetic_session`

use placefield_core::{analyze, generate_session, AnalysisConfig, SyntheticSessionConfig};

fn main() -> Result<(), Box<dyn std::error::Error>> {
	println!("=== Synthetic Place-Cell Session ===\n");

	// 10 s on a 200 cm track at 1 kHz; neuron n00 has a field at 102 cm
	let session_config = SyntheticSessionConfig::default();
	let session = generate_session(&session_config)?;
	println!(
		"Session: {} samples, {} neurons, {:.1} s",
		session.len(),
		session.n_neurons(),
		session.duration_s()
	);

	// 50 bins, 10 cm/s threshold, σ = 1 bin, k = 1.5
	let config = AnalysisConfig::default();
	let analysis = analyze(&session, &config)?;

	println!(
		"Moving: {} samples ({:.2} s), {} bins of {:.2} cm\n",
		analysis.motion.moving_samples(),
		analysis.moving_time_s(),
		analysis.binner.n_bins,
		analysis.binner.bin_width_cm
	);

	println!("{:<6} {:>9} {:>5} {:>9} {:>9}  map", "id", "peak Hz", "bin", "contrast", "place");
	for (i, id) in analysis.neuron_ids.iter().enumerate() {
		let map = &analysis.normalized_maps[i];
		let sparkline: String = map
			.values
			.iter()
			.map(|v| match v {
				Some(v) if *v > 0.8 => '█',
				Some(v) if *v > 0.6 => '▆',
				Some(v) if *v > 0.4 => '▄',
				Some(v) if *v > 0.2 => '▂',
				Some(_) => '▁',
				None => ' ',
			})
			.collect();
		println!(
			"{:<6} {:>9.1} {:>5} {:>9.3} {:>9}  {}",
			id,
			map.peak_rate_hz,
			map.peak_bin().map_or_else(|| "-".to_string(), |b| b.to_string()),
			analysis.classification.contrast[i].unwrap_or(0.0),
			if analysis.classification.is_place_cell[i] { "yes" } else { "no" },
			sparkline
		);
	}

	println!(
		"\nThreshold margin: {:.3} + {} × {:.3}",
		analysis.classification.population_mean,
		analysis.classification.std_multiplier,
		analysis.classification.population_std
	);
	println!("Place cells: {:?}", analysis.place_cell_ids());

	Ok(())
}
