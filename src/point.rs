//! Fixed-size points and ensemble states.

use ndarray::Array1;
use std::ops::{Add, AddAssign, Index, IndexMut, Mul, Neg, Sub, SubAssign};

/// State of one ensemble member: `N` double-precision components.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point<const N: usize>(pub [f64; N]);

/// An ensemble: one point per member, in member order.
pub type State<const N: usize> = Array1<Point<N>>;

impl<const N: usize> Point<N> {
    pub const fn new(components: [f64; N]) -> Self {
        Point(components)
    }

    pub const fn zero() -> Self {
        Point([0.; N])
    }

    /// Point with every component equal to `value`.
    pub const fn splat(value: f64) -> Self {
        Point([value; N])
    }

    pub fn as_array(&self) -> &[f64; N] {
        &self.0
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        self.0.iter().map(|c| c * c).sum::<f64>().sqrt()
    }
}

impl<const N: usize> Default for Point<N> {
    fn default() -> Self {
        Point::zero()
    }
}

impl<const N: usize> From<[f64; N]> for Point<N> {
    fn from(components: [f64; N]) -> Self {
        Point(components)
    }
}

impl<const N: usize> Index<usize> for Point<N> {
    type Output = f64;

    fn index(&self, i: usize) -> &f64 {
        &self.0[i]
    }
}

impl<const N: usize> IndexMut<usize> for Point<N> {
    fn index_mut(&mut self, i: usize) -> &mut f64 {
        &mut self.0[i]
    }
}

impl<const N: usize> AddAssign for Point<N> {
    fn add_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(&rhs.0) {
            *a += b;
        }
    }
}

impl<const N: usize> SubAssign for Point<N> {
    fn sub_assign(&mut self, rhs: Self) {
        for (a, b) in self.0.iter_mut().zip(&rhs.0) {
            *a -= b;
        }
    }
}

impl<const N: usize> Add for Point<N> {
    type Output = Self;

    fn add(mut self, rhs: Self) -> Self {
        self += rhs;
        self
    }
}

impl<const N: usize> Sub for Point<N> {
    type Output = Self;

    fn sub(mut self, rhs: Self) -> Self {
        self -= rhs;
        self
    }
}

impl<const N: usize> Mul<f64> for Point<N> {
    type Output = Self;

    fn mul(mut self, rhs: f64) -> Self {
        self.0.iter_mut().for_each(|c| *c *= rhs);
        self
    }
}

impl<const N: usize> Mul<Point<N>> for f64 {
    type Output = Point<N>;

    fn mul(self, rhs: Point<N>) -> Point<N> {
        rhs * self
    }
}

impl<const N: usize> Neg for Point<N> {
    type Output = Self;

    fn neg(self) -> Self {
        self * -1.
    }
}
