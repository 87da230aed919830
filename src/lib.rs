//! Fixed-step integration of ensembles of independent ODE systems.
//!
//! The numerical method ([`rk::RungeKutta4`]) is written once against the
//! [`algebra::Algebra`] trait, which decides whether elementwise arithmetic
//! over the ensemble runs on the calling thread or on a worker pool.

pub mod algebra;
pub mod config;
pub mod ensemble;
mod error;
pub mod integrate;
pub mod lorenz;
pub mod ops;
pub mod point;
pub mod rk;
pub mod timing;

pub use crate::error::Error;
pub use crate::point::{Point, State};

use ndarray::prelude::*;

/// Right-hand side of an ensemble ODE system.
///
/// `eval` must fill `dxdt` with the derivative of `x` at time `t`. It may only
/// write to `dxdt` and may only read `x`, `t` and data captured read-only at
/// construction.
pub trait OdeSystem<const N: usize> {
    fn eval(
        &mut self,
        x: ArrayView1<'_, Point<N>>,
        dxdt: ArrayViewMut1<'_, Point<N>>,
        t: f64,
    ) -> Result<(), Error>;
}

impl<F, const N: usize> OdeSystem<N> for F
where
    F: FnMut(ArrayView1<'_, Point<N>>, ArrayViewMut1<'_, Point<N>>, f64),
{
    fn eval(
        &mut self,
        x: ArrayView1<'_, Point<N>>,
        dxdt: ArrayViewMut1<'_, Point<N>>,
        t: f64,
    ) -> Result<(), Error> {
        if x.len() != dxdt.len() {
            return Err(Error::ShapeMismatch {
                expected: x.len(),
                found: dxdt.len(),
            });
        }
        self(x, dxdt, t);
        Ok(())
    }
}

/// A fixed-step integration method.
pub trait FixedStepper<const N: usize> {
    /// Order of the method.
    fn order(&self) -> usize;

    /// Advances `x` from `t` to `t + dt` in place.
    ///
    /// On error `x` is left unmodified.
    fn do_step<S>(
        &mut self,
        system: &mut S,
        x: &mut State<N>,
        t: f64,
        dt: f64,
    ) -> Result<(), Error>
    where
        S: OdeSystem<N>;
}
