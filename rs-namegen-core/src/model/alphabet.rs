use super::symbol::Symbol;

/// The support of a chain: every distinct character seen in training,
/// sorted, plus the implicit end-of-word sentinel at the last index.
///
/// ## Invariants
/// - `chars` is sorted and deduplicated
/// - The sentinel index is always `chars.len()`
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Alphabet {
	chars: Vec<char>,
}

impl Alphabet {
	/// Collects the alphabet of a set of words.
	pub fn from_words<S: AsRef<str>>(words: &[S]) -> Self {
		let mut chars: Vec<char> = words.iter().flat_map(|w| w.as_ref().chars()).collect();
		chars.sort_unstable();
		chars.dedup();
		Self { chars }
	}

	/// Number of real characters (sentinel excluded).
	pub fn len(&self) -> usize {
		self.chars.len()
	}

	pub fn is_empty(&self) -> bool {
		self.chars.is_empty()
	}

	/// Number of entries in a transition row: every character plus the sentinel.
	pub fn width(&self) -> usize {
		self.chars.len() + 1
	}

	pub fn chars(&self) -> &[char] {
		&self.chars
	}

	/// Row index of a symbol, `None` for characters outside the alphabet.
	pub fn index_of(&self, symbol: Symbol) -> Option<usize> {
		match symbol {
			Symbol::Char(c) => self.chars.binary_search(&c).ok(),
			Symbol::End => Some(self.chars.len()),
		}
	}

	/// Inverse of `index_of`.
	pub fn symbol_at(&self, index: usize) -> Option<Symbol> {
		match index.cmp(&self.chars.len()) {
			std::cmp::Ordering::Less => Some(Symbol::Char(self.chars[index])),
			std::cmp::Ordering::Equal => Some(Symbol::End),
			std::cmp::Ordering::Greater => None,
		}
	}

	/// Iterates symbols in row order: alphabet order, then the sentinel.
	pub fn symbols(&self) -> impl Iterator<Item = Symbol> + '_ {
		self.chars.iter().map(|c| Symbol::Char(*c)).chain(std::iter::once(Symbol::End))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn sorted_and_deduplicated() {
		let alphabet = Alphabet::from_words(&["hamburg", "ham"]);
		assert_eq!(alphabet.chars(), &['a', 'b', 'g', 'h', 'm', 'r', 'u']);
		assert_eq!(alphabet.width(), 8);
	}

	#[test]
	fn indices_round_trip_through_symbols() {
		let alphabet = Alphabet::from_words(&["cab"]);
		assert_eq!(alphabet.index_of(Symbol::Char('a')), Some(0));
		assert_eq!(alphabet.index_of(Symbol::Char('c')), Some(2));
		assert_eq!(alphabet.index_of(Symbol::End), Some(3));
		assert_eq!(alphabet.index_of(Symbol::Char('z')), None);
		assert_eq!(alphabet.symbol_at(3), Some(Symbol::End));
		assert_eq!(alphabet.symbol_at(4), None);
		let symbols: Vec<Symbol> = alphabet.symbols().collect();
		assert_eq!(symbols, vec![Symbol::Char('a'), Symbol::Char('b'), Symbol::Char('c'), Symbol::End]);
	}

	#[test]
	fn empty_alphabet_still_has_sentinel() {
		let alphabet = Alphabet::from_words::<&str>(&[]);
		assert!(alphabet.is_empty());
		assert_eq!(alphabet.width(), 1);
		assert_eq!(alphabet.symbol_at(0), Some(Symbol::End));
	}
}
