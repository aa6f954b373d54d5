//! # Comparators
//!
//! Implementations of [`TextComparator`](crate::traits::comparator::TextComparator).
//!
//! - [`sequence_comparator`]: character-level matching-block ratio (the default).

pub mod sequence_comparator;
