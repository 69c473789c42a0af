use std::collections::HashMap;
use std::fmt;

use log::debug;
use rand::Rng;

use super::alphabet::Alphabet;
use super::config::{validate_order, validate_prior};
use super::state::State;
use super::symbol::Symbol;
use crate::error::Result;

/// A fixed-order character Markov chain.
///
/// The `Chain` maps every context of exactly `order` characters seen in
/// training to a `State` holding the weight of each possible next symbol.
///
/// # Responsibilities
/// - Compute the alphabet and prior vector of the training set
/// - Build transition rows from every training word
/// - Sample the next symbol given a context
///
/// # Invariants
/// - `order` is always >= 1
/// - Every key in `states` is exactly `order` characters long
/// - Every state holds `alphabet.width()` weights
/// - The sentinel entry of `prior` is always 0
#[derive(Clone, Debug)]
pub struct Chain {
	/// Number of characters in a context.
	order: usize,

	/// Sorted training characters, sentinel implied.
	alphabet: Alphabet,

	/// Seed row copied into every new state.
	prior: Vec<f64>,

	/// Mapping from a context to its transition row.
	states: HashMap<String, State>,
}

impl Chain {
	/// Builds a chain of the given order from a training set.
	///
	/// Words shorter than `order` contribute nothing. An empty training set
	/// yields a chain with no contexts, on which every sample misses.
	///
	/// # Errors
	/// Returns a configuration error if `order < 1` or if `prior` is
	/// negative or not finite. Nothing is learned in that case.
	pub fn new<S: AsRef<str>>(words: &[S], order: usize, prior: f64) -> Result<Self> {
		validate_order(order)?;
		validate_prior(prior)?;

		let alphabet = Alphabet::from_words(words);
		let mut prior_row = vec![prior; alphabet.width()];
		if let Some(end) = prior_row.last_mut() {
			*end = 0.0;
		}

		let mut chain = Self {
			order,
			alphabet,
			prior: prior_row,
			states: HashMap::new(),
		};
		for word in words {
			chain.learn(word.as_ref());
		}

		debug!(
			"order-{} chain: {} symbols, {} contexts",
			chain.order,
			chain.alphabet.len(),
			chain.states.len()
		);
		Ok(chain)
	}

	/// Learns one word.
	///
	/// Every window of `order` characters is linked to the character that
	/// follows it, then the final window is linked to the sentinel. The tail
	/// context may thus be counted twice, which strengthens word endings.
	/// A word of exactly `order` characters records a single sentinel
	/// transition.
	fn learn(&mut self, word: &str) {
		let chars: Vec<char> = word.chars().collect();
		let k = self.order;
		if chars.len() < k {
			return;
		}

		for pos in 0..chars.len() - k {
			let context: String = chars[pos..pos + k].iter().collect();
			self.update(&context, Symbol::Char(chars[pos + k]));
		}

		let tail: String = chars[chars.len() - k..].iter().collect();
		self.update(&tail, Symbol::End);
	}

	/// Records a transition, creating the context's row from the prior if needed.
	fn update(&mut self, context: &str, next: Symbol) {
		// Training characters always belong to the alphabet.
		let Some(index) = self.alphabet.index_of(next) else {
			return;
		};
		self.state_or_seed(context).add_transition(index);
	}

	/// Returns the row of `context`, seeding it with a copy of the prior first.
	fn state_or_seed(&mut self, context: &str) -> &mut State {
		let prior = &self.prior;
		self.states
			.entry(context.to_owned())
			.or_insert_with(|| State::seeded(context, prior))
	}

	/// Samples the symbol following `context`.
	///
	/// Returns `None` if the context was never observed, which tells the
	/// caller to back off to a lower order.
	pub fn sample<R: Rng + ?Sized>(&self, context: &str, rng: &mut R) -> Option<Symbol> {
		self.states.get(context).map(|state| state.predict(&self.alphabet, rng))
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn alphabet(&self) -> &Alphabet {
		&self.alphabet
	}

	/// The seed row, in alphabet order followed by the sentinel.
	pub fn prior(&self) -> &[f64] {
		&self.prior
	}

	/// Row of a context, if observed.
	pub fn state(&self, context: &str) -> Option<&State> {
		self.states.get(context)
	}

	/// `(symbol, weight)` pairs of a context, in row order.
	pub fn counts(&self, context: &str) -> Option<Vec<(Symbol, f64)>> {
		self.state(context).map(|state| state.counts(&self.alphabet).collect())
	}

	/// Observed contexts, in unspecified order.
	pub fn contexts(&self) -> impl Iterator<Item = &str> {
		self.states.keys().map(String::as_str)
	}

	/// Number of observed contexts.
	pub fn len(&self) -> usize {
		self.states.len()
	}

	pub fn is_empty(&self) -> bool {
		self.states.is_empty()
	}
}

impl fmt::Display for Chain {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut contexts: Vec<&String> = self.states.keys().collect();
		contexts.sort();
		for context in contexts {
			writeln!(f, "{context}:")?;
			for (symbol, count) in self.states[context].counts(&self.alphabet) {
				writeln!(f, "    {symbol}: {count}")?;
			}
		}
		Ok(())
	}
}
