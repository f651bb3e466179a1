/// Round to the nearest integer, sending exact halves toward negative infinity.
///
/// `0.5 -> 0`, `-0.5 -> -1`, `1.5 -> 1`. The tie rule decides which of two
///
/// equally short size-reductions is applied, so reduced bases are reproducible.
pub fn round_ties_down(x: f64) -> f64 {
    (x - 0.5).ceil()
}
