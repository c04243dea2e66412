//! Placefield command-line front end.
//!
//! Usage:
//!   placefield analyze --input session.json --output report.json
//!   placefield analyze --input session.json --config analysis.json --sigma 2
//!   placefield synth --output session.json --seed 7

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use placefield_core::{
	analyze, generate_session, AnalysisConfig, AnalysisReport, Session, SyntheticSessionConfig,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Spatial rate maps and place-cell detection for linear-track recordings
#[derive(Parser, Debug)]
#[command(name = "placefield")]
#[command(version = placefield_core::VERSION)]
struct Cli {
	/// Log debug output (overridden by RUST_LOG)
	#[arg(short, long, global = true)]
	verbose: bool,

	#[command(subcommand)]
	command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
	/// Compute rate maps and classify place cells for one session
	Analyze(AnalyzeArgs),
	/// Write a synthetic session with one tuned neuron
	Synth(SynthArgs),
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
	/// Session JSON file
	#[arg(short, long)]
	input: PathBuf,

	/// Analysis configuration JSON; flags below override it
	#[arg(short, long)]
	config: Option<PathBuf>,

	/// Report JSON file (stdout if omitted)
	#[arg(short, long)]
	output: Option<PathBuf>,

	/// Number of position bins
	#[arg(long)]
	bins: Option<usize>,

	/// Bin width in cm (overrides --bins)
	#[arg(long)]
	bin_width: Option<f64>,

	/// Track length in cm (default: largest observed position)
	#[arg(long)]
	track_length: Option<f64>,

	/// Minimum running speed in cm/s
	#[arg(long)]
	speed_threshold: Option<f64>,

	/// Gaussian smoothing σ in bins
	#[arg(long)]
	sigma: Option<f64>,

	/// Place-cell threshold multiplier k
	#[arg(long)]
	std_multiplier: Option<f64>,

	/// Sample rate in Hz, used when the session file has none
	#[arg(long)]
	sample_rate: Option<f64>,
}

#[derive(Args, Debug)]
struct SynthArgs {
	/// Session JSON file to write
	#[arg(short, long)]
	output: PathBuf,

	/// RNG seed for the untuned neurons
	#[arg(long, default_value = "42")]
	seed: u64,

	/// Number of samples
	#[arg(long, default_value = "10000")]
	samples: usize,

	/// Number of neurons
	#[arg(long, default_value = "10")]
	neurons: usize,
}

impl AnalyzeArgs {
	/// Defaults, then the config file, then command-line flags.
	fn resolve_config(&self) -> Result<AnalysisConfig> {
		let mut config = match &self.config {
			Some(path) => AnalysisConfig::from_json_file(path)
				.with_context(|| format!("loading config {}", path.display()))?,
			None => AnalysisConfig::default(),
		};

		if let Some(bins) = self.bins {
			config.n_bins = bins;
		}
		if self.bin_width.is_some() {
			config.bin_width_cm = self.bin_width;
		}
		if self.track_length.is_some() {
			config.track_length_cm = self.track_length;
		}
		if let Some(threshold) = self.speed_threshold {
			config.speed_threshold_cm_s = threshold;
		}
		if let Some(sigma) = self.sigma {
			config.smoothing_sigma_bins = sigma;
		}
		if let Some(k) = self.std_multiplier {
			config.place_cell_std_multiplier = k;
		}
		if let Some(rate) = self.sample_rate {
			config.sample_rate_hz = rate;
		}

		config.validate().context("invalid analysis parameters")?;
		Ok(config)
	}
}

fn main() -> Result<()> {
	let cli = Cli::parse();
	init_tracing(cli.verbose);

	match cli.command {
		Command::Analyze(args) => run_analyze(&args),
		Command::Synth(args) => run_synth(&args),
	}
}

fn init_tracing(verbose: bool) {
	let default_level = if verbose { "debug" } else { "info" };
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
	let config = args.resolve_config()?;
	debug!(?config, "Resolved analysis config");

	let session = Session::from_json_file(&args.input, config.sample_rate_hz)
		.with_context(|| format!("loading session {}", args.input.display()))?;
	info!(
		samples = session.len(),
		neurons = session.n_neurons(),
		sample_rate_hz = session.sample_rate_hz(),
		"Session loaded"
	);

	let analysis = analyze(&session, &config).context("analysis failed")?;
	let report = analysis.report();
	info!(
		place_cells = report.place_cells.len(),
		moving_time_s = report.moving_time_s,
		"Analysis complete"
	);

	write_report(&report, args.output.as_ref())
}

fn write_report(report: &AnalysisReport, output: Option<&PathBuf>) -> Result<()> {
	match output {
		Some(path) => {
			let file = File::create(path)
				.with_context(|| format!("creating report {}", path.display()))?;
			let mut writer = BufWriter::new(file);
			serde_json::to_writer_pretty(&mut writer, report)?;
			writer.flush()?;
			info!(path = %path.display(), "Report written");
		}
		None => {
			let stdout = io::stdout();
			let mut handle = stdout.lock();
			serde_json::to_writer_pretty(&mut handle, report)?;
			writeln!(handle)?;
		}
	}
	Ok(())
}

fn run_synth(args: &SynthArgs) -> Result<()> {
	let config = SyntheticSessionConfig {
		n_samples: args.samples,
		n_neurons: args.neurons,
		laps: (args.samples / 10_000).max(1),
		seed: args.seed,
		..Default::default()
	};
	let session = generate_session(&config).context("generating synthetic session")?;
	session
		.to_json_file(&args.output)
		.with_context(|| format!("writing session {}", args.output.display()))?;
	info!(
		path = %args.output.display(),
		samples = session.len(),
		neurons = session.n_neurons(),
		"Synthetic session written"
	);
	Ok(())
}
