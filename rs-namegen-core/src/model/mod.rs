//! Top-level module for the Markov name model.
//!
//! This module provides:
//! - Fixed-order character chains (`Chain`)
//! - The multi-order model with back-off (`MarkovModel`)
//! - Transition rows (`State`) over a sorted `Alphabet`
//! - The `Symbol` type, with its end-of-word sentinel
//! - Training and generation parameters (`ModelConfig`, `GenerationConfig`)

/// Fixed-order chain (`order >= 1`).
///
/// Handles alphabet and prior computation, window-based learning and
/// probabilistic next-symbol sampling.
pub mod chain;

/// Multi-order model composed of one `Chain` per order.
///
/// Supports start-point selection, back-off sampling and word generation.
pub mod markov_model;

/// Transition row of a single context.
pub mod state;

/// Sorted training characters plus the sentinel.
pub mod alphabet;

pub mod symbol;

/// Validated training and generation parameters.
pub mod config;
