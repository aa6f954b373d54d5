//!
//! Traits Module
//!
//! - [`comparator`]: the strategy trait used to score a pair of texts.

pub mod comparator;
