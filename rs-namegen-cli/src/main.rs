use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Deserialize;

use rs_namegen_core::io::{CsvColumnLoader, Loader, WordListLoader};
use rs_namegen_core::{GenerationConfig, MarkovModel, ModelConfig};

/// Generate random names from a sample of training data using Markov chains.
#[derive(Parser, Debug)]
#[command(name = "namegen", version)]
struct Args {
	/// Training data file.
	file: PathBuf,

	/// Layout of the training data file.
	#[arg(short, long, value_enum, default_value_t = Format::Lines)]
	format: Format,

	/// Order of the Markov model [default: 3].
	#[arg(short, long)]
	order: Option<usize>,

	/// Prior value for the probability distribution [default: 0].
	#[arg(short, long)]
	prior: Option<f64>,

	/// Maximum length of the generated word in characters [default: 10].
	#[arg(short, long)]
	max_length: Option<usize>,

	/// Lowest order to fall back to when a higher order does not know a context [default: 1].
	#[arg(short = 'b', long)]
	backoff_floor: Option<usize>,

	/// Number of retries when a generated name is already in the training data [default: 0].
	#[arg(long)]
	nb_try: Option<usize>,

	/// How many names to generate.
	#[arg(short, long, default_value_t = 1)]
	number: usize,

	/// City names only: a language (english, german, spanish, portuguese)
	/// or a comma-separated list of ISO 3166-1 alpha-2 country codes.
	#[arg(short, long)]
	language: Option<String>,

	/// Seed for reproducible output.
	#[arg(long)]
	seed: Option<u64>,

	/// TOML file with `[model]` and `[generation]` tables.
	#[arg(short, long)]
	config: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum Format {
	/// One word per line.
	Lines,
	/// World cities CSV export.
	Cities,
	/// Greek mythology CSV export.
	GreekMythology,
}

/// Contents of the `--config` file.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
struct FileConfig {
	model: ModelConfig,
	generation: GenerationConfig,
}

impl Args {
	/// Merges defaults, the config file and command-line flags, in that order.
	fn configs(&self) -> anyhow::Result<(ModelConfig, GenerationConfig)> {
		let file = match &self.config {
			Some(path) => {
				let text = fs::read_to_string(path)
					.with_context(|| format!("cannot read config file {}", path.display()))?;
				toml::from_str::<FileConfig>(&text)
					.with_context(|| format!("invalid config file {}", path.display()))?
			}
			None => FileConfig::default(),
		};
		file.model.validate().context("invalid [model] table in config file")?;
		file.generation.validate().context("invalid [generation] table in config file")?;

		let mut model = file.model;
		if let Some(order) = self.order {
			model.set_order(order)?;
		}
		if let Some(prior) = self.prior {
			model.set_prior(prior)?;
		}
		if let Some(floor) = self.backoff_floor {
			model.set_backoff_floor(floor)?;
		}
		model.validate()?;

		let mut generation = file.generation;
		if let Some(max_length) = self.max_length {
			generation.set_max_length(max_length)?;
		}
		if let Some(nb_try) = self.nb_try {
			generation.nb_try = nb_try;
		}
		generation.validate()?;

		Ok((model, generation))
	}

	fn loader(&self) -> Box<dyn Loader> {
		match self.format {
			Format::Lines => Box::new(WordListLoader),
			Format::Cities => Box::new(CsvColumnLoader::world_cities(self.language.as_deref())),
			Format::GreekMythology => Box::new(CsvColumnLoader::greek_mythology()),
		}
	}
}

fn main() -> anyhow::Result<()> {
	env_logger::init();
	let args = Args::parse();
	log::debug!("Arguments: {:?}", args);

	let (model_config, generation_config) = args.configs()?;
	let words = args
		.loader()
		.load(&args.file)
		.with_context(|| format!("cannot load training data from {}", args.file.display()))?;

	let model = MarkovModel::new(&words, &model_config)?;

	let mut rng = match args.seed {
		Some(seed) => StdRng::seed_from_u64(seed),
		None => StdRng::from_rng(&mut rand::rng()),
	};

	for (i, name) in model.generate_many(args.number, &generation_config, &mut rng)?.iter().enumerate() {
		println!("{i:02}: {name}");
	}

	Ok(())
}
