//! Synthetic data for exercising clustering code.
//!
//! The generators here produce either tables of observation vectors or
//! condensed pairwise-distance arrays, with seedable variants for
//! reproducible tests and benchmarks.

pub mod random_data;
