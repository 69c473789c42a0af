use rand::Rng;

use super::alphabet::Alphabet;
use super::symbol::Symbol;

/// Represents a state in a Markov chain.
///
/// A `State` corresponds to a fixed K-character context (`key`) and stores
/// the weight of every possible next symbol, indexed like the chain's
/// `Alphabet` (characters in sorted order, then the sentinel).
///
/// ## Responsibilities:
/// - Start from a copy of the prior vector when the context is first seen
/// - Accumulate transition observations during learning
/// - Predict the next symbol using weighted random sampling
///
/// ## Invariants
/// - `counts.len()` equals the alphabet width (no sparse rows)
/// - Every count is finite and `>= 0`
#[derive(Clone, Debug, PartialEq)]
pub struct State {
	/// Identifier of the state (the context).
	key: String,
	/// One weight per alphabet symbol, sentinel last.
	/// Example with alphabet [a, b] and prior 0: { a => 0, b => 1, \n => 2 }
	counts: Vec<f64>,
}

impl State {
	/// Creates a state seeded with a fresh copy of the prior vector.
	pub fn seeded(key: &str, prior: &[f64]) -> Self {
		Self {
			key: key.to_owned(),
			counts: prior.to_vec(),
		}
	}

	pub fn key(&self) -> &str {
		&self.key
	}

	/// Raw weights, in alphabet order followed by the sentinel.
	pub fn weights(&self) -> &[f64] {
		&self.counts
	}

	/// Pairs every symbol with its weight.
	pub fn counts<'a>(&'a self, alphabet: &'a Alphabet) -> impl Iterator<Item = (Symbol, f64)> + 'a {
		alphabet.symbols().zip(self.counts.iter().copied())
	}

	/// Weight of a single symbol, `None` if it is outside the alphabet.
	pub fn count_of(&self, alphabet: &Alphabet, symbol: Symbol) -> Option<f64> {
		alphabet.index_of(symbol).and_then(|i| self.counts.get(i).copied())
	}

	pub fn total(&self) -> f64 {
		self.counts.iter().sum()
	}

	/// Records one occurrence of the symbol at `index`.
	pub(crate) fn add_transition(&mut self, index: usize) {
		if let Some(count) = self.counts.get_mut(index) {
			*count += 1.0;
		}
	}

	/// Predicts the next symbol using weighted random sampling.
	///
	/// The probability of selecting a symbol is proportional to its weight.
	/// A draw in `[0, total)` is walked down the row in index order, so
	/// zero-weight symbols are never selected while the total is positive.
	///
	/// If every weight is zero, the first symbol of the row is returned.
	pub fn predict<R: Rng + ?Sized>(&self, alphabet: &Alphabet, rng: &mut R) -> Symbol {
		let total = self.total();
		if total <= 0.0 {
			return alphabet.symbol_at(0).unwrap_or(Symbol::End);
		}

		let mut r = rng.random_range(0.0..total);

		let mut fallback = None;
		for (index, weight) in self.counts.iter().enumerate() {
			if *weight <= 0.0 {
				continue;
			}
			if r < *weight {
				return alphabet.symbol_at(index).unwrap_or(Symbol::End);
			}
			r -= weight;
			fallback = Some(index);
		}

		// Rounding residue: the draw ran past the last positive weight.
		fallback.and_then(|i| alphabet.symbol_at(i)).unwrap_or(Symbol::End)
	}
}
