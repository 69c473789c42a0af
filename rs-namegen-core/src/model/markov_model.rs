use std::collections::HashSet;

use log::{debug, trace, warn};
use rand::Rng;
use rand::seq::IndexedRandom;

use super::chain::Chain;
use super::config::{GenerationConfig, ModelConfig, validate_max_length};
use super::symbol::Symbol;
use crate::error::{Error, Result};

/// The multi-order Markov model used to generate names.
///
/// This struct manages:
/// - `chains`: one `Chain` per order, `chains[k - 1]` has order `k`.
/// - `valid_startpoints`: the first `order` characters of every training
///   word long enough, in input order, duplicates kept.
/// - `words`: the lowercased training words, used to avoid re-generating them.
#[derive(Clone, Debug)]
pub struct MarkovModel {
	order: usize,
	backoff_floor: usize,
	chains: Vec<Chain>,
	valid_startpoints: Vec<String>,
	words: HashSet<String>,
}

impl MarkovModel {
	/// Trains a model on `words`.
	///
	/// # Behavior
	/// - Validates `config` before any training work.
	/// - Collects the start-points.
	/// - Trains one chain per order `1..=config.order`, each on the full set.
	///
	/// # Errors
	/// Returns a configuration error if `config` is invalid.
	pub fn new<S: AsRef<str>>(words: &[S], config: &ModelConfig) -> Result<Self> {
		config.validate()?;

		let order = config.order;
		let valid_startpoints: Vec<String> = words
			.iter()
			.map(|word| word.as_ref())
			.filter(|word| word.chars().count() >= order)
			.map(|word| word.chars().take(order).collect())
			.collect();

		let chains = (1..=order)
			.map(|k| Chain::new(words, k, config.prior))
			.collect::<Result<Vec<_>>>()?;

		let words = words.iter().map(|w| w.as_ref().to_lowercase()).collect();

		debug!(
			"order-{} model: {} start-points, back-off floor {}",
			order,
			valid_startpoints.len(),
			config.backoff_floor
		);

		Ok(Self {
			order,
			backoff_floor: config.backoff_floor,
			chains,
			valid_startpoints,
			words,
		})
	}

	/// Trains a model with the default back-off floor.
	pub fn with_order<S: AsRef<str>>(words: &[S], order: usize, prior: f64) -> Result<Self> {
		Self::new(words, &ModelConfig { order, prior, ..ModelConfig::default() })
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn backoff_floor(&self) -> usize {
		self.backoff_floor
	}

	/// Chain of order `k`, if `1 <= k <= order`.
	pub fn chain(&self, k: usize) -> Option<&Chain> {
		k.checked_sub(1).and_then(|i| self.chains.get(i))
	}

	pub fn valid_startpoints(&self) -> &[String] {
		&self.valid_startpoints
	}

	/// Case-insensitive membership test against the training set.
	pub fn is_training_word(&self, word: &str) -> bool {
		self.words.contains(&word.to_lowercase())
	}

	/// Samples the next symbol for `context`, backing off across orders.
	///
	/// Starting at `order`, each unseen context (or missing chain) drops its
	/// leading character and retries one order lower; the order-1 miss
	/// retries with an empty context at order 0. Reaching order 0, or going
	/// below the back-off floor, yields the sentinel.
	///
	/// Never fails and performs at most `order` chain lookups before
	/// settling on the sentinel.
	pub fn sample<R: Rng + ?Sized>(&self, context: &str, order: usize, rng: &mut R) -> Symbol {
		self.sample_with_steps(context, order, rng).0
	}

	/// Back-off loop behind `sample`, also returning the number of orders
	/// visited, the final order 0 (or floor) step included.
	fn sample_with_steps<R: Rng + ?Sized>(&self, context: &str, order: usize, rng: &mut R) -> (Symbol, usize) {
		let floor = self.backoff_floor.max(1);
		let mut order = order;
		let mut context = context;
		let mut steps = 0;

		while order >= floor {
			steps += 1;
			if let Some(symbol) = self.chain(order).and_then(|chain| chain.sample(context, rng)) {
				return (symbol, steps);
			}
			trace!("context {:?} unseen at order {}, backing off", context, order);
			context = if order == 1 { "" } else { drop_first_char(context) };
			order -= 1;
		}

		(Symbol::End, steps + 1)
	}

	/// Generates a word of at most `max_length` characters.
	///
	/// A random start-point is extended one sampled character at a time
	/// until the sentinel is drawn or the length limit is reached. The
	/// first character of the result is capitalized.
	///
	/// # Errors
	/// - Configuration error if `max_length == 0`.
	/// - `Error::EmptyStartpoints` if no training word reaches the order.
	pub fn generate<R: Rng + ?Sized>(&self, max_length: usize, rng: &mut R) -> Result<String> {
		validate_max_length(max_length)?;
		if self.valid_startpoints.is_empty() {
			return Err(Error::EmptyStartpoints { order: self.order });
		}
		Ok(self.generate_unchecked(max_length, rng))
	}

	fn generate_unchecked<R: Rng + ?Sized>(&self, max_length: usize, rng: &mut R) -> String {
		let mut word: Vec<char> = match self.valid_startpoints.choose(rng) {
			Some(start) => start.chars().collect(),
			None => Vec::new(),
		};

		while word.len() < max_length {
			let context: String = word[word.len().saturating_sub(self.order)..].iter().collect();
			match self.sample(&context, self.order, rng) {
				Symbol::Char(c) => word.push(c),
				Symbol::End => break,
			}
		}

		capitalize(&word)
	}

	/// Generates a word, retrying while it reproduces a training word.
	///
	/// Up to `config.nb_try` regenerations are attempted. When they run out,
	/// the last generated word is returned even if it is a duplicate.
	///
	/// # Errors
	/// Same as `generate`.
	pub fn generate_with<R: Rng + ?Sized>(&self, config: &GenerationConfig, rng: &mut R) -> Result<String> {
		let mut word = self.generate(config.max_length, rng)?;
		let mut nb_try = config.nb_try;

		while nb_try > 0 && self.is_training_word(&word) {
			word = self.generate_unchecked(config.max_length, rng);
			nb_try -= 1;
		}
		if config.nb_try > 0 && self.is_training_word(&word) {
			warn!("no novel word after {} attempts, returning {:?}", config.nb_try, word);
		}

		Ok(word)
	}

	/// Generates `count` words with the same configuration.
	pub fn generate_many<R: Rng + ?Sized>(
		&self,
		count: usize,
		config: &GenerationConfig,
		rng: &mut R,
	) -> Result<Vec<String>> {
		(0..count).map(|_| self.generate_with(config, rng)).collect()
	}
}

/// Returns `s` without its first character (UTF-8 aware).
fn drop_first_char(s: &str) -> &str {
	let mut chars = s.chars();
	chars.next();
	chars.as_str()
}

/// Uppercases the first character, leaving the rest untouched.
///
/// Characters whose uppercase form spans several characters (`ß` -> `SS`)
/// are kept as they are, so the length never changes.
fn capitalize(chars: &[char]) -> String {
	let Some((first, rest)) = chars.split_first() else {
		return String::new();
	};
	let mut upper = first.to_uppercase();
	let first = match (upper.next(), upper.next()) {
		(Some(c), None) => c,
		_ => *first,
	};
	std::iter::once(first).chain(rest.iter().copied()).collect()
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;
	use crate::error::ConfigError;
	use crate::model::chain::tests::{CITIES, assert_chain, expected_updates};

	fn rng() -> StdRng {
		StdRng::seed_from_u64(0x5eed)
	}

	#[test]
	fn single_word_model() {
		let model = MarkovModel::with_order(&["hamburg"], 3, 0.0).unwrap();
		assert_eq!(model.order(), 3);
		assert_eq!(model.valid_startpoints(), &["ham".to_owned()]);
		for k in 1..=3 {
			assert_eq!(model.chain(k).map(Chain::order), Some(k));
		}
		assert!(model.chain(0).is_none());
		assert!(model.chain(4).is_none());
	}

	#[test]
	fn every_order_gets_a_chain() {
		let model = MarkovModel::with_order(&["hamburg"], 5, 0.0).unwrap();
		for k in 1..=5 {
			assert_eq!(model.chain(k).unwrap().order(), k);
		}
	}

	#[test]
	fn prior_is_shared_by_all_chains() {
		let model = MarkovModel::with_order(&["hamburg"], 3, 0.2).unwrap();
		let expected = [0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.2, 0.0];
		for k in 1..=3 {
			assert_eq!(model.chain(k).unwrap().prior(), &expected);
		}
	}

	#[test]
	fn multiple_words_model() {
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		assert_eq!(model.valid_startpoints(), &["hamb", "berl", "heil", "heid"]);
		for k in 1..=4 {
			assert_chain(model.chain(k).unwrap(), &expected_updates(k), 0.0);
		}
	}

	#[test]
	fn startpoints_keep_duplicates_and_skip_short_words() {
		let model = MarkovModel::with_order(&["abcd", "ab", "abce", "xy"], 3, 0.0).unwrap();
		assert_eq!(model.valid_startpoints(), &["abc", "abc"]);
	}

	#[test]
	fn sample_with_back_off() {
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		let mut rng = rng();
		assert_eq!(model.sample("ambu", 4, &mut rng), Symbol::Char('r'));
		assert_eq!(model.sample("erli", 4, &mut rng), Symbol::Char('n'));
		assert_eq!(model.sample("burg", 4, &mut rng), Symbol::End);
		assert_eq!(model.sample("ham", 3, &mut rng), Symbol::Char('b'));
		assert_eq!(model.sample("il", 2, &mut rng), Symbol::Char('b'));
		// One back-off step.
		assert_eq!(model.sample("xmbu", 4, &mut rng), Symbol::Char('r'));
		assert_eq!(model.sample("yrg", 3, &mut rng), Symbol::End);
		// Several steps.
		assert_eq!(model.sample("xyzg", 4, &mut rng), Symbol::End);
		// Nothing known at any order.
		assert_eq!(model.sample("xyzq", 4, &mut rng), Symbol::End);
	}

	#[test]
	fn sample_is_total() {
		let model = MarkovModel::with_order(&CITIES, 3, 0.0).unwrap();
		let mut rng = rng();
		assert_eq!(model.sample("", 0, &mut rng), Symbol::End);
		assert_eq!(model.sample("anything", 0, &mut rng), Symbol::End);
		assert_eq!(model.sample("", 3, &mut rng), Symbol::End);
		// Orders above the model's back off to the chains it has.
		assert_eq!(model.sample("xham", 4, &mut rng), Symbol::Char('b'));
	}

	#[test]
	fn backoff_floor_stops_early() {
		let config = ModelConfig { order: 4, prior: 0.0, backoff_floor: 3 };
		let model = MarkovModel::new(&CITIES, &config).unwrap();
		let mut rng = rng();
		// "mbu" is known at order 3.
		assert_eq!(model.sample("xmbu", 4, &mut rng), Symbol::Char('r'));
		// "il" -> 'b' only exists at order 2, which is below the floor.
		assert_eq!(model.sample("xxil", 4, &mut rng), Symbol::End);

		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		assert_eq!(model.sample("xxil", 4, &mut rng), Symbol::Char('b'));
	}

	#[test]
	fn generate_recreates_training_words_at_high_order() {
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		let mut rng = rng();
		let outcomes = ["Hamburg", "Berlin", "Heilbronn", "Heidelberg"];
		for _ in 0..50 {
			let word = model.generate(20, &mut rng).unwrap();
			assert!(outcomes.contains(&word.as_str()), "unexpected {word}");
		}
		for _ in 0..20 {
			assert_eq!(model.generate(4, &mut rng).unwrap().chars().count(), 4);
		}
	}

	#[test]
	fn generate_can_leave_training_data() {
		let model = MarkovModel::with_order(&CITIES, 3, 0.0).unwrap();
		let mut rng = rng();
		let outcomes = ["Hamburg", "Berlin", "Heilbronn", "Heidelberg", "Berg", "Heidelberlin"];
		for _ in 0..50 {
			let word = model.generate(20, &mut rng).unwrap();
			assert!(outcomes.contains(&word.as_str()), "unexpected {word}");
		}
	}

	#[test]
	fn generate_is_deterministic_for_a_seed() {
		let model = MarkovModel::with_order(&CITIES, 2, 0.3).unwrap();
		let run = || {
			let mut rng = rng();
			(0..10).map(|_| model.generate(12, &mut rng).unwrap()).collect::<Vec<_>>()
		};
		let first = run();
		let second = run();
		assert_eq!(first, second);
	}

	#[test]
	fn generate_errors() {
		let model = MarkovModel::with_order(&["ab", "c"], 3, 0.0).unwrap();
		assert!(matches!(model.generate(10, &mut rng()), Err(Error::EmptyStartpoints { order: 3 })));

		let model = MarkovModel::with_order(&CITIES, 3, 0.0).unwrap();
		assert!(matches!(
			model.generate(0, &mut rng()),
			Err(Error::Config(ConfigError::InvalidMaxLength { max_length: 0 }))
		));
	}

	#[test]
	fn invalid_model_config() {
		assert!(matches!(
			MarkovModel::with_order(&CITIES, 0, 0.0),
			Err(Error::Config(ConfigError::InvalidOrder { order: 0 }))
		));
		let config = ModelConfig { order: 2, prior: 0.0, backoff_floor: 3 };
		assert!(matches!(
			MarkovModel::new(&CITIES, &config),
			Err(Error::Config(ConfigError::InvalidBackoffFloor { floor: 3, order: 2 }))
		));
	}

	#[test]
	fn max_length_below_order_keeps_startpoint() {
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		let word = model.generate(2, &mut rng()).unwrap();
		assert_eq!(word.chars().count(), 4);
	}

	#[test]
	fn nb_try_avoids_training_words_when_possible() {
		// Only "Berg" and "Heidelberlin" are novel at order 3.
		let model = MarkovModel::with_order(&CITIES, 3, 0.0).unwrap();
		let config = GenerationConfig { max_length: 20, nb_try: 500 };
		let mut rng = rng();
		for _ in 0..10 {
			let word = model.generate_with(&config, &mut rng).unwrap();
			assert!(word == "Berg" || word == "Heidelberlin", "unexpected {word}");
		}
		assert!(model.is_training_word("HAMBURG"));
		assert!(!model.is_training_word("Berg"));

		// No novel word exists at order 4: the last attempt is returned.
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		let config = GenerationConfig { max_length: 20, nb_try: 3 };
		assert!(model.is_training_word(&model.generate_with(&config, &mut rng).unwrap()));
	}

	#[test]
	fn generate_many_counts() {
		let model = MarkovModel::with_order(&CITIES, 3, 0.1).unwrap();
		let words = model.generate_many(7, &GenerationConfig::default(), &mut rng()).unwrap();
		assert_eq!(words.len(), 7);
		assert!(words.iter().all(|w| w.chars().count() <= 10));
	}

	#[test]
	fn generate_keeps_length_when_uppercase_expands() {
		let model = MarkovModel::with_order(&["ßab", "ßaba"], 3, 0.0).unwrap();
		let mut rng = rng();
		for max_length in 3..6 {
			let word = model.generate(max_length, &mut rng).unwrap();
			assert!(word.starts_with('ß'), "unexpected {word}");
			assert!(word.chars().count() <= max_length, "{word} longer than {max_length}");
			assert!(model.is_training_word(&word));
		}
	}

	#[test]
	fn back_off_visits_at_most_order_plus_one_steps() {
		let model = MarkovModel::with_order(&CITIES, 4, 0.0).unwrap();
		let mut rng = rng();
		// Known at the requested order: one lookup.
		assert_eq!(model.sample_with_steps("ambu", 4, &mut rng), (Symbol::Char('r'), 1));
		// One miss, then order 3.
		assert_eq!(model.sample_with_steps("xmbu", 4, &mut rng), (Symbol::Char('r'), 2));
		// Unknown at every order: four misses, then order 0.
		assert_eq!(model.sample_with_steps("xyzq", 4, &mut rng), (Symbol::End, 5));
		assert_eq!(model.sample_with_steps("", 0, &mut rng), (Symbol::End, 1));
		for order in 0..=6 {
			for context in ["", "q", "zzzz", "xyzqwv", "berl"] {
				let (_, steps) = model.sample_with_steps(context, order, &mut rng);
				assert!(steps <= order + 1, "{steps} steps for order {order}, context {context:?}");
			}
		}
	}

	#[test]
	fn capitalize_first_char_only() {
		assert_eq!(capitalize(&['b', 'e', 'r', 'g']), "Berg");
		assert_eq!(capitalize(&['ß', 'a']), "ßa");
		assert_eq!(capitalize(&['é', 'a']), "Éa");
		assert_eq!(capitalize(&[]), "");
		assert_eq!(drop_first_char("übu"), "bu");
	}
}
