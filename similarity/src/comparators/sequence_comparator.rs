//! A comparator that scores two texts by the length of their shared contiguous blocks.
//!
//! Texts are compared character by character (Unicode scalar values). The greedy block
//! search is not symmetric in how it breaks ties, so the pair is first put in a canonical
//! order: shorter text first, then the lexicographically smaller one.

use crate::matcher::SequenceMatcher;
use crate::traits::comparator::TextComparator;
use std::cmp::Ordering;

/// Character-level matching-block ratio: `2 * M / T`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SequenceComparator;

impl TextComparator for SequenceComparator {
    fn similarity(&self, a: &str, b: &str) -> f64 {
        let a: Vec<char> = a.chars().collect();
        let b: Vec<char> = b.chars().collect();

        let (first, second) = match a.len().cmp(&b.len()).then_with(|| a.cmp(&b)) {
            Ordering::Greater => (&b, &a),
            _ => (&a, &b),
        };

        SequenceMatcher::new(first, second).ratio()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_texts() {
        let comparator = SequenceComparator;
        assert_eq!(comparator.similarity("lorem ipsum", "lorem ipsum"), 1.0);
    }

    #[test]
    fn test_empty_texts() {
        let comparator = SequenceComparator;
        assert_eq!(comparator.similarity("", ""), 1.0);
        assert_eq!(comparator.similarity("", "abc"), 0.0);
        assert_eq!(comparator.similarity("abc", ""), 0.0);
    }

    #[test]
    fn test_disjoint_texts() {
        let comparator = SequenceComparator;
        assert_eq!(comparator.similarity("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_multibyte_characters_count_once() {
        let comparator = SequenceComparator;
        // One shared char, three chars in total.
        assert_eq!(comparator.similarity("é", "éx"), 2.0 / 3.0);
    }

    #[test]
    fn test_symmetry() {
        let comparator = SequenceComparator;
        let pairs = [
            ("abcd", "acbd"),
            ("the quick brown fox", "quick the fox brown"),
            ("aab", "abb"),
            ("banana", "ananas"),
            ("submission one text", "one submission, text"),
            ("", "x"),
        ];
        for (a, b) in pairs {
            assert_eq!(
                comparator.similarity(a, b),
                comparator.similarity(b, a),
                "asymmetric for {a:?} / {b:?}"
            );
        }
    }

    #[test]
    fn test_ratio_in_range() {
        let comparator = SequenceComparator;
        for (a, b) in [("x", "y"), ("xy", "yx"), ("hello", "hello world"), ("abc", "cba")] {
            let r = comparator.similarity(a, b);
            assert!((0.0..=1.0).contains(&r), "{r} out of range");
        }
    }
}
