//! # Sequence Matcher
//!
//! Greedy matching-block search over two sequences. The matcher finds the longest
//! contiguous block shared by both sequences, then repeats the search on the unmatched
//! remainders to the left and to the right of that block until nothing more matches.
//!
//! The total length of all blocks found this way (`M`) drives the similarity ratio
//! `2 * M / T`, where `T` is the combined length of both sequences.
//!
//! No "junk" heuristic is applied: every element can start a match, so a sequence
//! compared with itself always produces a single block covering the whole input.

use std::collections::HashMap;
use std::hash::Hash;

/// A matching block: `a[a..a + size] == b[b..b + size]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Match {
    pub a: usize,
    pub b: usize,
    pub size: usize,
}

/// Finds matching blocks between two borrowed sequences.
pub struct SequenceMatcher<'s, T> {
    a: &'s [T],
    b: &'s [T],
    /// Element of `b` -> ascending positions at which it occurs.
    b2j: HashMap<T, Vec<usize>>,
}

impl<'s, T> SequenceMatcher<'s, T>
where
    T: Eq + Hash + Copy,
{
    pub fn new(a: &'s [T], b: &'s [T]) -> Self {
        let mut b2j: HashMap<T, Vec<usize>> = HashMap::new();
        for (j, elt) in b.iter().enumerate() {
            b2j.entry(*elt).or_default().push(j);
        }
        Self { a, b, b2j }
    }

    /// Longest matching block inside `a[alo..ahi]` and `b[blo..bhi]`.
    ///
    /// Among blocks of maximal size, the one starting earliest in `a` wins, and of
    /// those the one starting earliest in `b`. Returns a block of size 0 positioned at
    /// `(alo, blo)` when the windows share no element.
    pub fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> Match {
        self.longest_match_with(&mut Rows::new(self.b.len()), alo, ahi, blo, bhi)
    }

    fn longest_match_with(
        &self,
        rows: &mut Rows,
        alo: usize,
        ahi: usize,
        blo: usize,
        bhi: usize,
    ) -> Match {
        let mut best = Match {
            a: alo,
            b: blo,
            size: 0,
        };

        for i in alo..ahi {
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                let start = positions.partition_point(|&j| j < blo);
                for &j in positions[start..].iter().take_while(|&&j| j < bhi) {
                    let k = rows.extend(j);
                    if k > best.size {
                        best = Match {
                            a: i + 1 - k,
                            b: j + 1 - k,
                            size: k,
                        };
                    }
                }
            }
            rows.advance();
        }
        rows.advance();

        best
    }

    /// All matching blocks, ordered by position, with adjacent blocks merged.
    ///
    /// The list always ends with the sentinel `Match { a: a.len(), b: b.len(), size: 0 }`.
    pub fn matching_blocks(&self) -> Vec<Match> {
        let (la, lb) = (self.a.len(), self.b.len());

        let mut rows = Rows::new(lb);
        let mut pending = vec![(0, la, 0, lb)];
        let mut blocks: Vec<Match> = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = pending.pop() {
            let m = self.longest_match_with(&mut rows, alo, ahi, blo, bhi);
            if m.size == 0 {
                continue;
            }
            blocks.push(m);
            if alo < m.a && blo < m.b {
                pending.push((alo, m.a, blo, m.b));
            }
            if m.a + m.size < ahi && m.b + m.size < bhi {
                pending.push((m.a + m.size, ahi, m.b + m.size, bhi));
            }
        }

        blocks.sort();

        let mut merged: Vec<Match> = Vec::with_capacity(blocks.len() + 1);
        for m in blocks {
            match merged.last_mut() {
                Some(last) if last.a + last.size == m.a && last.b + last.size == m.b => {
                    last.size += m.size;
                }
                _ => merged.push(m),
            }
        }

        merged.push(Match {
            a: la,
            b: lb,
            size: 0,
        });
        merged
    }

    /// Total number of matched elements across all blocks.
    pub fn matched_len(&self) -> usize {
        self.matching_blocks().iter().map(|m| m.size).sum()
    }

    /// Similarity ratio `2 * M / T` in `[0.0, 1.0]`.
    ///
    /// Two empty sequences are identical and score 1.0; one empty sequence scores 0.0.
    pub fn ratio(&self) -> f64 {
        let total = self.a.len() + self.b.len();
        if total == 0 {
            return 1.0;
        }
        2.0 * self.matched_len() as f64 / total as f64
    }
}

/// Run lengths of the previous and current row of the longest-match scan.
///
/// `prev[j + 1]` is the length of the block ending at the previous element of `a` and
/// `b[j]`. Both rows are all zeros between scans; only slots written in a row are
/// cleared, so a row costs as much as the matches it records.
struct Rows {
    prev: Vec<usize>,
    cur: Vec<usize>,
    prev_written: Vec<usize>,
    cur_written: Vec<usize>,
}

impl Rows {
    fn new(len: usize) -> Self {
        Self {
            prev: vec![0; len + 1],
            cur: vec![0; len + 1],
            prev_written: Vec::new(),
            cur_written: Vec::new(),
        }
    }

    /// Records a match at `b[j]` in the current row and returns its block length.
    fn extend(&mut self, j: usize) -> usize {
        let k = self.prev[j] + 1;
        self.cur[j + 1] = k;
        self.cur_written.push(j + 1);
        k
    }

    /// Makes the current row the previous one and starts an empty row.
    fn advance(&mut self) {
        for &slot in &self.prev_written {
            self.prev[slot] = 0;
        }
        self.prev_written.clear();
        std::mem::swap(&mut self.prev, &mut self.cur);
        std::mem::swap(&mut self.prev_written, &mut self.cur_written);
    }
}
