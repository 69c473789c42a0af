use std::fmt;

/// A symbol emitted by a chain: either a real character or the
/// end-of-word sentinel.
///
/// The sentinel is its own variant, so it can never collide with a
/// character found in the training data.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Symbol {
	Char(char),
	End,
}

impl Symbol {
	/// Returns the character, or `None` for the sentinel.
	pub fn as_char(self) -> Option<char> {
		match self {
			Symbol::Char(c) => Some(c),
			Symbol::End => None,
		}
	}

	pub fn is_end(self) -> bool {
		self == Symbol::End
	}
}

impl From<char> for Symbol {
	fn from(c: char) -> Self {
		Symbol::Char(c)
	}
}

impl fmt::Display for Symbol {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Symbol::Char(c) => write!(f, "{c}"),
			Symbol::End => f.write_str("\\n"),
		}
	}
}
