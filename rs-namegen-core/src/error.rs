use thiserror::Error;

/// Invalid configuration values, rejected before any training or sampling.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
	/// Orders start at 1.
	#[error("order must be >= 1, got {order}")]
	InvalidOrder { order: usize },

	/// Priors are additive pseudo-counts.
	#[error("prior must be a finite, non-negative number, got {prior}")]
	InvalidPrior { prior: f64 },

	/// A generated word holds at least one character.
	#[error("max length must be >= 1, got {max_length}")]
	InvalidMaxLength { max_length: usize },

	/// The back-off floor must lie between 1 and the model order.
	#[error("back-off floor must be between 1 and {order}, got {floor}")]
	InvalidBackoffFloor { floor: usize, order: usize },
}

/// Crate-level errors.
#[derive(Error, Debug)]
pub enum Error {
	#[error("invalid configuration: {0}")]
	Config(#[from] ConfigError),

	/// No training word is long enough to provide a start-point.
	#[error("no training word has at least {order} characters, no start-point available")]
	EmptyStartpoints { order: usize },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("column '{column}' not found in CSV header")]
	MissingColumn { column: String },
}

pub type Result<T> = std::result::Result<T, Error>;
