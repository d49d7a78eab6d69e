use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "synapse")]
#[command(about = "Inspect and convert serialized layer models")]
#[command(version)]
/// Command-line arguments.
pub struct Cli {
	/// Verbose logging
	#[arg(short, long, global = true)]
	pub verbose: bool,

	/// TOML config file with `[registry]` and `[output]` tables
	#[arg(long, value_name = "PATH", global = true)]
	pub config: Option<PathBuf>,

	#[command(subcommand)]
	pub command: Command,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
	/// List registered layer type names
	Types {
		#[arg(long, value_enum, default_value_t = Format::Json)]
		format: Format,
	},
	/// Load a model and print one line per layer
	Inspect {
		file: PathBuf,

		/// Wire format of FILE (guessed from the extension if omitted)
		#[arg(long, value_enum)]
		format: Option<Format>,
	},
	/// Re-encode a model in another wire format
	Convert {
		input: PathBuf,
		output: PathBuf,

		#[arg(long, value_enum)]
		from: Option<Format>,

		#[arg(long, value_enum)]
		to: Option<Format>,

		/// Pretty-print JSON output
		#[arg(long)]
		pretty: bool,
	},
}

/// Wire format selector.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
	Json,
	Binary,
}

impl Format {
	/// `.json` files are JSON; anything else is treated as binary.
	pub fn guess(path: &Path) -> Self {
		match path.extension().and_then(|ext| ext.to_str()) {
			Some(ext) if ext.eq_ignore_ascii_case("json") => Format::Json,
			_ => Format::Binary,
		}
	}

	pub fn or_guess(format: Option<Self>, path: &Path) -> Self {
		format.unwrap_or_else(|| Self::guess(path))
	}
}
