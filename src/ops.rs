//! Scaled-sum operations applied elementwise by an [`Algebra`](crate::algebra::Algebra).

use crate::point::Point;

/// Computes `base + c[0] * terms[0] + ... + c[K-1] * terms[K-1]`.
///
/// The terms are accumulated left to right, so the result for a given element
/// doesn't depend on how the ensemble is partitioned between threads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaledSum<const K: usize> {
    coeffs: [f64; K],
}

/// Base plus one scaled term, e.g. `x + dt/2 * k1`.
pub type ScaleSum2 = ScaledSum<1>;
pub type ScaleSum3 = ScaledSum<2>;
pub type ScaleSum4 = ScaledSum<3>;
/// Base plus four scaled terms, the final RK4 combination.
pub type ScaleSum5 = ScaledSum<4>;
pub type ScaleSum6 = ScaledSum<5>;

impl<const K: usize> ScaledSum<K> {
    pub const fn new(coeffs: [f64; K]) -> Self {
        ScaledSum { coeffs }
    }

    pub fn coeffs(&self) -> &[f64; K] {
        &self.coeffs
    }

    /// Evaluates the sum for a single point.
    pub fn apply<const N: usize>(&self, base: &Point<N>, terms: [&Point<N>; K]) -> Point<N> {
        let mut out = *base;
        for i in 0..N {
            for (c, term) in self.coeffs.iter().zip(terms.iter()) {
                out[i] += c * term[i];
            }
        }
        out
    }
}
