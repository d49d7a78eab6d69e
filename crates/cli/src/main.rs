//! `synapse`: list registered layer types, inspect and convert model files.

mod cli;
mod config;

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Command, Format};
use config::CliConfig;
use synapse_archive::{Binary, Json};
use synapse_layers::{Layer, LayerFormat, Sequential, init_registry};

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();
	setup_tracing(cli.verbose);

	let config = CliConfig::load(cli.config.as_deref())?;
	init_registry::<Json>(config.registry.clone());
	init_registry::<Binary>(config.registry.clone());

	match cli.command {
		Command::Types { format } => {
			let names = match format {
				Format::Json => type_names::<Json>(),
				Format::Binary => type_names::<Binary>(),
			};
			for name in names {
				println!("{name}");
			}
		}
		Command::Inspect { file, format } => {
			let model = read_model(&file, Format::or_guess(format, &file))?;
			println!("{} ({} layers)", model.name(), model.len());
			for (index, layer) in model.layers().iter().enumerate() {
				println!("{}", describe(index, layer.as_ref()));
			}
		}
		Command::Convert {
			input,
			output,
			from,
			to,
			pretty,
		} => {
			let model = read_model(&input, Format::or_guess(from, &input))?;
			let to = Format::or_guess(to, &output);
			write_model(&model, &output, to, pretty || config.output.pretty)?;
			tracing::info!(
				input = %input.display(),
				output = %output.display(),
				layers = model.len(),
				?to,
				"converted model"
			);
		}
	}
	Ok(())
}

fn setup_tracing(verbose: bool) {
	use tracing_subscriber::EnvFilter;

	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
		if verbose {
			EnvFilter::new("debug")
		} else {
			EnvFilter::new("warn")
		}
	});

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.init();
}

fn type_names<F: LayerFormat>() -> Vec<&'static str> {
	synapse_layers::registry::<F>().names()
}

fn read_model(path: &Path, format: Format) -> anyhow::Result<Sequential> {
	let model = match format {
		Format::Json => {
			let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
			Sequential::read_json(BufReader::new(file))
		}
		Format::Binary => {
			let bytes = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
			Sequential::from_bytes(&bytes)
		}
	};
	model.with_context(|| format!("failed to load model from {}", path.display()))
}

fn write_model(model: &Sequential, path: &Path, format: Format, pretty: bool) -> anyhow::Result<()> {
	match format {
		Format::Json => {
			let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
			model
				.write_json(BufWriter::new(file), pretty)
				.with_context(|| format!("failed to write model to {}", path.display()))
		}
		Format::Binary => {
			let bytes = model.to_bytes().context("failed to encode model")?;
			std::fs::write(path, bytes).with_context(|| format!("failed to write {}", path.display()))
		}
	}
}

fn describe(index: usize, layer: &dyn Layer) -> String {
	let activation = layer
		.activation()
		.map(|name| format!(" [{name}]"))
		.unwrap_or_default();
	format!(
		"{index:>3}  {:<16} {} -> {}{activation}",
		layer.kind().to_string(),
		layer.in_shape(),
		layer.out_shape()
	)
}
