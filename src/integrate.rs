//! Fixed-step integration driver.

use ndarray::prelude::*;

use crate::point::{Point, State};
use crate::{Error, FixedStepper, OdeSystem};

/// Slack when deciding whether one more full step fits into the time span,
/// relative to the step size.
const STEP_SLACK: f64 = 1e-9;

/// Number of whole steps of size `dt` between `t0` and `t_end`.
///
/// A trailing partial interval is not counted. Fails with
/// [`Error::TimeNotFinite`] if the span overflows to infinitely many steps.
pub fn step_count(t0: f64, t_end: f64, dt: f64) -> Result<usize, Error> {
    if !t0.is_finite() || !t_end.is_finite() {
        return Err(Error::TimeNotFinite);
    }
    if !dt.is_finite() || dt == 0. {
        return Err(Error::InvalidStep(dt));
    }
    let span = (t_end - t0) / dt;
    if !span.is_finite() {
        return Err(Error::TimeNotFinite);
    }
    if span < 0. {
        return Err(Error::WrongDirection);
    }
    Ok((span + STEP_SLACK).floor() as usize)
}

/// Integrates `x` from `t0` towards `t_end` with constant step `dt`.
///
/// Step `i` starts at `t0 + i * dt`. Integration stops after the last step
/// that ends at or before `t_end`; a remaining partial interval is left
/// alone. On return `x` holds the final state. Returns the number of steps
/// taken.
///
/// A failing step aborts the run and the error is returned; `x` then holds
/// the state after the last successful step.
pub fn integrate_const<St, S, const N: usize>(
    stepper: &mut St,
    system: &mut S,
    x: &mut State<N>,
    t0: f64,
    t_end: f64,
    dt: f64,
) -> Result<usize, Error>
where
    St: FixedStepper<N>,
    S: OdeSystem<N>,
{
    integrate_const_observed(stepper, system, x, t0, t_end, dt, |_, _| {})
}

/// Like [`integrate_const`], but calls `observer` with the state and time at
/// `t0` and after every step.
pub fn integrate_const_observed<St, S, O, const N: usize>(
    stepper: &mut St,
    system: &mut S,
    x: &mut State<N>,
    t0: f64,
    t_end: f64,
    dt: f64,
    mut observer: O,
) -> Result<usize, Error>
where
    St: FixedStepper<N>,
    S: OdeSystem<N>,
    O: FnMut(ArrayView1<'_, Point<N>>, f64),
{
    let steps = step_count(t0, t_end, dt)?;
    log::debug!(
        "integrating {} members from t={} to t={} in {} steps of {}",
        x.len(),
        t0,
        t_end,
        steps,
        dt
    );

    observer(x.view(), t0);
    for i in 0..steps {
        let t = t0 + i as f64 * dt;
        stepper.do_step(system, x, t, dt)?;
        log::trace!("step {} done at t={}", i + 1, t + dt);
        observer(x.view(), t0 + (i + 1) as f64 * dt);
    }

    log::debug!("integration finished after {} steps", steps);
    Ok(steps)
}
