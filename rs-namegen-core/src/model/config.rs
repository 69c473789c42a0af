use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Training parameters of a `MarkovModel`.
///
/// # Fields
/// - `order`: highest chain order; start-points are `order` characters long.
/// - `prior`: additive pseudo-count given to every real character of a
///   freshly seen context (the sentinel always starts at 0).
/// - `backoff_floor`: lowest order back-off may descend to before the
///   model gives up and ends the word.
///
/// # Invariants (checked by `validate`)
/// - `order >= 1`
/// - `prior` is finite and `>= 0`
/// - `1 <= backoff_floor <= order`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
	pub order: usize,
	pub prior: f64,
	pub backoff_floor: usize,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { order: 3, prior: 0.0, backoff_floor: 1 }
	}
}

impl ModelConfig {
	pub fn new(order: usize, prior: f64) -> Result<Self, ConfigError> {
		let config = Self { order, prior, ..Self::default() };
		config.validate()?;
		Ok(config)
	}

	/// Checks every field, reporting the first invalid one.
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_order(self.order)?;
		validate_prior(self.prior)?;
		if self.backoff_floor < 1 || self.backoff_floor > self.order {
			return Err(ConfigError::InvalidBackoffFloor { floor: self.backoff_floor, order: self.order });
		}
		Ok(())
	}

	/// Sets the order.
	///
	/// The back-off floor is left untouched; a floor above the new order is
	/// reported by `validate`.
	///
	/// # Errors
	/// Returns an error if `order < 1`.
	pub fn set_order(&mut self, order: usize) -> Result<(), ConfigError> {
		validate_order(order)?;
		self.order = order;
		Ok(())
	}

	/// Sets the prior.
	///
	/// # Errors
	/// Returns an error if the value is negative or not finite.
	pub fn set_prior(&mut self, prior: f64) -> Result<(), ConfigError> {
		validate_prior(prior)?;
		self.prior = prior;
		Ok(())
	}

	/// Sets the back-off floor.
	///
	/// # Errors
	/// Returns an error if the floor is outside `1..=order`.
	pub fn set_backoff_floor(&mut self, floor: usize) -> Result<(), ConfigError> {
		if floor < 1 || floor > self.order {
			return Err(ConfigError::InvalidBackoffFloor { floor, order: self.order });
		}
		self.backoff_floor = floor;
		Ok(())
	}
}

/// Generation parameters.
///
/// - `max_length`: upper bound on the generated word, in characters.
/// - `nb_try`: number of regenerations allowed when the output is already
///   a training word (0 disables the check).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct GenerationConfig {
	pub max_length: usize,
	pub nb_try: usize,
}

impl Default for GenerationConfig {
	fn default() -> Self {
		Self { max_length: 10, nb_try: 0 }
	}
}

impl GenerationConfig {
	pub fn validate(&self) -> Result<(), ConfigError> {
		validate_max_length(self.max_length)
	}

	/// Sets the maximum length.
	///
	/// # Errors
	/// Returns an error if `max_length < 1`.
	pub fn set_max_length(&mut self, max_length: usize) -> Result<(), ConfigError> {
		validate_max_length(max_length)?;
		self.max_length = max_length;
		Ok(())
	}
}

pub(crate) fn validate_order(order: usize) -> Result<(), ConfigError> {
	if order < 1 {
		return Err(ConfigError::InvalidOrder { order });
	}
	Ok(())
}

pub(crate) fn validate_prior(prior: f64) -> Result<(), ConfigError> {
	if !prior.is_finite() || prior < 0.0 {
		return Err(ConfigError::InvalidPrior { prior });
	}
	Ok(())
}

pub(crate) fn validate_max_length(max_length: usize) -> Result<(), ConfigError> {
	if max_length < 1 {
		return Err(ConfigError::InvalidMaxLength { max_length });
	}
	Ok(())
}
