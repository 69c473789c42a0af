//! Markov-chain name generation library.
//!
//! This crate learns character-level statistics from a list of example
//! words and samples new, plausible names from them:
//! - Fixed-order character chains with additive priors
//! - A multi-order model with back-off across orders
//! - Duplicate-avoiding generation
//! - Loaders turning word lists and CSV exports into training data
//!
//! Models are built once from a training corpus and are read-only
//! afterwards, so a single model can serve any number of generation calls.

/// Chains, the multi-order model and their configuration.
pub mod model;

/// Error types shared by the whole crate.
pub mod error;

/// Training data loaders (word lists, CSV columns).
pub mod io;

pub use error::{ConfigError, Error, Result};
pub use model::chain::Chain;
pub use model::config::{GenerationConfig, ModelConfig};
pub use model::markov_model::MarkovModel;
pub use model::symbol::Symbol;
