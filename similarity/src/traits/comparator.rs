/// TextComparator is a strategy trait for scoring how similar two texts are.
///
/// Implementations must be pure, symmetric and return a ratio in `[0.0, 1.0]`,
/// with two empty texts scoring 1.0 and exactly one empty text scoring 0.0.
pub trait TextComparator: Send + Sync {
    fn similarity(&self, a: &str, b: &str) -> f64;
}
