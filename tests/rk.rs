use approx::assert_abs_diff_eq;
use ndarray::prelude::*;

use ndarray_ensemble_ode::algebra::{Algebra, ParallelAlgebra, SequentialAlgebra};
use ndarray_ensemble_ode::ensemble::{linspace, uniform_state};
use ndarray_ensemble_ode::integrate::{integrate_const, integrate_const_observed};
use ndarray_ensemble_ode::lorenz::Lorenz;
use ndarray_ensemble_ode::rk::RungeKutta4;
use ndarray_ensemble_ode::{Error, FixedStepper, OdeSystem, Point, State};

/// Lorenz ensemble whose members have already drifted apart.
fn spread_state(r: ArrayView1<f64>) -> State<3> {
    let mut x = uniform_state(r.len(), Point::splat(10.));
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    let mut system = Lorenz::new(r, SequentialAlgebra);
    integrate_const(&mut stepper, &mut system, &mut x, 0., 0.5, 0.01).unwrap();
    x
}

fn one_step<A: Algebra + Clone>(algebra: A, r: ArrayView1<f64>, x0: &State<3>) -> State<3> {
    let mut x = x0.clone();
    let mut stepper = RungeKutta4::new(algebra.clone());
    let mut system = Lorenz::new(r, algebra);
    stepper.do_step(&mut system, &mut x, 0.5, 0.01).unwrap();
    x
}

#[test]
fn parallel_step_matches_sequential() {
    for &m in &[1, 3, 100, 5000] {
        let r = linspace(m, 0.1, 50.).unwrap();
        let x0 = spread_state(r.view());
        let expected = one_step(SequentialAlgebra, r.view(), &x0);
        for &threads in &[1, 2, 4] {
            let parallel = ParallelAlgebra::new(threads).unwrap().with_threshold(0);
            let stepped = one_step(parallel, r.view(), &x0);
            assert_eq!(stepped, expected, "m={} threads={}", m, threads);
        }
    }
}

#[test]
fn integrate_two_steps_equals_two_single_steps() {
    let r = linspace(16, 0.1, 50.).unwrap();
    let x0 = spread_state(r.view());
    let (t0, dt) = (0.5, 0.01);

    let mut integrated = x0.clone();
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    let mut system = Lorenz::new(r.view(), SequentialAlgebra);
    let steps =
        integrate_const(&mut stepper, &mut system, &mut integrated, t0, t0 + 2. * dt, dt).unwrap();
    assert_eq!(steps, 2);

    let mut stepped = x0.clone();
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    stepper.do_step(&mut system, &mut stepped, t0, dt).unwrap();
    stepper.do_step(&mut system, &mut stepped, t0 + dt, dt).unwrap();

    assert_eq!(integrated, stepped);
    assert_ne!(integrated, x0);
}

#[test]
fn shape_mismatch_leaves_state_unmodified() {
    let r = linspace(10, 0.1, 50.).unwrap();
    let x0 = spread_state(r.view());
    let mut x = x0.clone();
    let mut stepper = RungeKutta4::with_len(SequentialAlgebra, 20);
    let mut system = Lorenz::new(r.view(), SequentialAlgebra);

    match stepper.do_step(&mut system, &mut x, 0., 0.01) {
        Err(Error::ShapeMismatch { expected: 20, found: 10 }) => {}
        other => panic!("expected shape mismatch, got {:?}", other),
    }
    assert_eq!(x, x0);

    assert!(integrate_const(&mut stepper, &mut system, &mut x, 0., 1., 0.01).is_err());
    assert_eq!(x, x0);
}

#[test]
fn thread_count_change_reaches_system_function() {
    let r = linspace(200, 0.1, 50.).unwrap();
    let x0 = spread_state(r.view());
    let algebra = ParallelAlgebra::new(4).unwrap().with_threshold(0);
    let mut stepper = RungeKutta4::new(algebra.clone());
    let mut system = Lorenz::new(r.view(), algebra);

    stepper.algebra().set_threads(1).unwrap();
    assert_eq!(stepper.algebra().threads(), 1);
    assert_eq!(system.algebra().threads(), 1);

    system.algebra().set_threads(2).unwrap();
    assert_eq!(stepper.algebra().threads(), 2);

    let mut x = x0.clone();
    stepper.do_step(&mut system, &mut x, 0.5, 0.01).unwrap();
    assert_eq!(x, one_step(SequentialAlgebra, r.view(), &x0));
}

#[test]
fn parameter_mismatch_aborts_without_partial_result() {
    let r = linspace(8, 0.1, 50.).unwrap();
    let x0 = uniform_state(9, Point::splat(10.));
    let mut x = x0.clone();
    let mut stepper = RungeKutta4::new(ParallelAlgebra::new(2).unwrap());
    let mut system = Lorenz::new(r.view(), SequentialAlgebra);
    assert!(matches!(
        stepper.do_step(&mut system, &mut x, 0., 0.01),
        Err(Error::ShapeMismatch { .. })
    ));
    assert_eq!(x, x0);
}

struct Linear {
    rate: f64,
    calls: usize,
}

impl OdeSystem<1> for Linear {
    fn eval(
        &mut self,
        x: ArrayView1<'_, Point<1>>,
        mut dxdt: ArrayViewMut1<'_, Point<1>>,
        t: f64,
    ) -> Result<(), Error> {
        self.calls += 1;
        azip!((d in &mut dxdt, p in &x) *d = Point::new([self.rate * p[0] + t]));
        Ok(())
    }
}

#[test]
fn four_evaluations_per_step_and_observer_times() {
    // dx/dt = -x + t, x(0) = 1  =>  x(t) = t - 1 + 2 exp(-t)
    let mut system = Linear { rate: -1., calls: 0 };
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    let mut x = array![Point::new([1.])];
    let mut times = Vec::new();
    let steps =
        integrate_const_observed(&mut stepper, &mut system, &mut x, 0., 1.05, 0.1, |_, t| {
            times.push(t)
        })
        .unwrap();

    assert_eq!(steps, 10);
    assert_eq!(system.calls, 40);
    assert_eq!(times.len(), 11);
    assert_abs_diff_eq!(times[10], 1., epsilon = 1e-12);
    // The partial interval after t = 1 is not integrated.
    assert_abs_diff_eq!(x[0][0], 2. * (-1f64).exp(), epsilon = 1e-6);
}

#[test]
fn backward_integration() {
    let mut system = Linear { rate: -1., calls: 0 };
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    let t1: f64 = 1.;
    let mut x = array![Point::new([t1 - 1. + 2. * (-t1).exp()])];
    let steps = integrate_const(&mut stepper, &mut system, &mut x, t1, 0., -0.01).unwrap();
    assert_eq!(steps, 100);
    assert_abs_diff_eq!(x[0][0], 1., epsilon = 1e-8);
}

#[test]
fn rejects_invalid_time_arguments() {
    let mut system = Linear { rate: -1., calls: 0 };
    let mut stepper = RungeKutta4::new(SequentialAlgebra);
    let mut x = array![Point::new([1.])];
    assert!(matches!(
        integrate_const(&mut stepper, &mut system, &mut x, 0., 1., 0.),
        Err(Error::InvalidStep(_))
    ));
    assert!(matches!(
        integrate_const(&mut stepper, &mut system, &mut x, 0., 1., -0.1),
        Err(Error::WrongDirection)
    ));
    assert!(matches!(
        integrate_const(&mut stepper, &mut system, &mut x, f64::NAN, 1., 0.1),
        Err(Error::TimeNotFinite)
    ));
    assert_eq!(system.calls, 0);
    assert_eq!(stepper.len(), None);
}
