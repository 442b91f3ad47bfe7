//! xmlform binary.
//!
//! Replays a scripted editing session against the in-memory model and prints
//! every page refresh plus a summary of what the model observed.

mod script;

use std::path::PathBuf;

use clap::Parser;
use tracing::info;
use xmlform_editor::EditorConfig;

use crate::script::Script;

/// Command line arguments.
#[derive(Parser, Debug)]
#[command(name = "xmlform")]
#[command(about = "Replay an XML form editing script")]
struct Args {
	/// Script to replay (TOML)
	#[arg(value_name = "SCRIPT")]
	script: PathBuf,

	/// Editor configuration file
	#[arg(short, long, value_name = "PATH")]
	config: Option<PathBuf>,

	/// Verbose logging
	#[arg(short, long)]
	verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
	let args = Args::parse();

	setup_tracing(args.verbose);

	let config = match &args.config {
		Some(path) => EditorConfig::load(path)?,
		None => EditorConfig::default(),
	};
	info!(script = %args.script.display(), "replaying script");

	let script = Script::load(&args.script)?;
	let report = script::run(&script, config)?;
	println!("{report}");

	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("xmlform_editor=trace,xmlform_model=trace,debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}
