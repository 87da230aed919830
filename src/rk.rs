//! Classical fourth-order Runge–Kutta stepper.

use ndarray::prelude::*;

use crate::algebra::Algebra;
use crate::error::check_len;
use crate::ops::{ScaleSum2, ScaleSum5};
use crate::point::{Point, State};
use crate::{Error, FixedStepper, OdeSystem};

fn zeroed<const N: usize>(len: usize) -> State<N> {
    Array1::from_elem(len, Point::zero())
}

/// Fixed-step RK4 over an ensemble state.
///
/// One step evaluates the system four times:
///
/// ```text
/// k1 = f(x, t)
/// k2 = f(x + dt/2 k1, t + dt/2)
/// k3 = f(x + dt/2 k2, t + dt/2)
/// k4 = f(x + dt k3, t + dt)
/// x <- x + dt/6 k1 + dt/3 k2 + dt/3 k3 + dt/6 k4
/// ```
///
/// Every combination is a single pass of the stepper's algebra over the
/// ensemble, so the execution strategy is decided entirely by `A`.
///
/// The stages are kept in scratch buffers owned by the stepper. They are
/// sized on the first step (or by [`with_len`](RungeKutta4::with_len)) and
/// reused afterwards; a state of any other length is rejected.
#[derive(Clone, Debug)]
pub struct RungeKutta4<A, const N: usize> {
    algebra: A,
    /// Storage for the four stages.
    k: [State<N>; 4],
    /// Input of the next system evaluation, `x + c * dt * k`.
    x_tmp: State<N>,
    /// Ensemble length the scratch buffers were sized for.
    len: Option<usize>,
}

impl<A, const N: usize> RungeKutta4<A, N>
where
    A: Algebra,
{
    /// Creates a stepper whose scratch buffers are sized on the first step.
    pub fn new(algebra: A) -> Self {
        RungeKutta4 {
            algebra,
            k: [zeroed(0), zeroed(0), zeroed(0), zeroed(0)],
            x_tmp: zeroed(0),
            len: None,
        }
    }

    /// Creates a stepper for ensembles of `len` members.
    pub fn with_len(algebra: A, len: usize) -> Self {
        let mut stepper = Self::new(algebra);
        stepper.resize(len);
        stepper
    }

    /// Ensemble length of the scratch buffers, or `None` before the first
    /// step.
    pub fn len(&self) -> Option<usize> {
        self.len
    }

    pub fn algebra(&self) -> &A {
        &self.algebra
    }

    /// Releases the scratch buffers so the next step may use any ensemble
    /// length.
    pub fn reset(&mut self) {
        self.resize(0);
        self.len = None;
    }

    fn resize(&mut self, len: usize) {
        for k in &mut self.k {
            *k = zeroed(len);
        }
        self.x_tmp = zeroed(len);
        self.len = Some(len);
    }

    /// Computes `x_tmp = x + coeff * k` with the stepper's algebra.
    fn stage_input(
        algebra: &A,
        x_tmp: &mut State<N>,
        x: ArrayView1<'_, Point<N>>,
        k: &State<N>,
        coeff: f64,
    ) -> Result<(), Error> {
        let op = ScaleSum2::new([coeff]);
        algebra.for_each3(x_tmp.view_mut(), x, k.view(), move |out, x, k| {
            *out = op.apply(x, [k])
        })
    }
}

impl<A, const N: usize> FixedStepper<N> for RungeKutta4<A, N>
where
    A: Algebra,
{
    fn order(&self) -> usize {
        4
    }

    fn do_step<S>(
        &mut self,
        system: &mut S,
        x: &mut State<N>,
        t: f64,
        dt: f64,
    ) -> Result<(), Error>
    where
        S: OdeSystem<N>,
    {
        match self.len {
            Some(len) => check_len(len, &[x.len()])?,
            None => self.resize(x.len()),
        }

        let RungeKutta4 { algebra, k, x_tmp, .. } = self;
        let [k1, k2, k3, k4] = k;
        let half = dt / 2.;

        system.eval(x.view(), k1.view_mut(), t)?;
        Self::stage_input(algebra, x_tmp, x.view(), k1, half)?;
        system.eval(x_tmp.view(), k2.view_mut(), t + half)?;
        Self::stage_input(algebra, x_tmp, x.view(), k2, half)?;
        system.eval(x_tmp.view(), k3.view_mut(), t + half)?;
        Self::stage_input(algebra, x_tmp, x.view(), k3, dt)?;
        system.eval(x_tmp.view(), k4.view_mut(), t + dt)?;

        // `x` is written only here, after every evaluation has succeeded.
        let op = ScaleSum5::new([dt / 6., dt / 3., dt / 3., dt / 6.]);
        algebra.for_each5(
            x.view_mut(),
            k1.view(),
            k2.view(),
            k3.view(),
            k4.view(),
            move |x, k1, k2, k3, k4| *x = op.apply(x, [k1, k2, k3, k4]),
        )
    }
}
