//! Ensemble of Lorenz systems, one control parameter `R` per member.
//!
//! ```text
//! dx/dt = -sigma (x - y)
//! dy/dt = R x - y - x z
//! dz/dt = -b z + x y
//! ```

use ndarray::prelude::*;

use crate::algebra::Algebra;
use crate::point::Point;
use crate::{Error, OdeSystem};

pub const SIGMA: f64 = 10.;
pub const B: f64 = 8. / 3.;

/// Lorenz right-hand side for a single member.
pub fn derivative(p: &Point<3>, r: f64, sigma: f64, b: f64) -> Point<3> {
    Point::new([
        -sigma * (p[0] - p[1]),
        r * p[0] - p[1] - p[0] * p[2],
        -b * p[2] + p[0] * p[1],
    ])
}

/// Lorenz ensemble system.
///
/// Member `i` uses `r[i]`. The parameters are borrowed read-only for the
/// lifetime of the system and shared by all worker threads.
#[derive(Clone, Debug)]
pub struct Lorenz<'a, A> {
    r: ArrayView1<'a, f64>,
    sigma: f64,
    b: f64,
    algebra: A,
}

impl<'a, A> Lorenz<'a, A>
where
    A: Algebra,
{
    /// Classic Lorenz system (`sigma = 10`, `b = 8/3`) evaluated with
    /// `algebra`.
    pub fn new(r: ArrayView1<'a, f64>, algebra: A) -> Self {
        Lorenz {
            r,
            sigma: SIGMA,
            b: B,
            algebra,
        }
    }

    pub fn with_constants(mut self, sigma: f64, b: f64) -> Self {
        self.sigma = sigma;
        self.b = b;
        self
    }

    pub fn r(&self) -> ArrayView1<'a, f64> {
        self.r
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }
}

impl<A> OdeSystem<3> for Lorenz<'_, A>
where
    A: Algebra,
{
    fn eval(
        &mut self,
        x: ArrayView1<'_, Point<3>>,
        dxdt: ArrayViewMut1<'_, Point<3>>,
        _t: f64,
    ) -> Result<(), Error> {
        let (sigma, b) = (self.sigma, self.b);
        self.algebra.for_each3(dxdt, x, self.r, move |d, p, &r| {
            *d = derivative(p, r, sigma, b)
        })
    }
}
