//! Times an ensemble of Lorenz systems on all available threads against a
//! single thread.
//!
//! Run with `cargo run --release --example lorenz_ensemble`.

use ndarray_ensemble_ode::algebra::Execution;
use ndarray_ensemble_ode::config::RunConfig;
use ndarray_ensemble_ode::ensemble::{linspace, uniform_state};
use ndarray_ensemble_ode::integrate::integrate_const;
use ndarray_ensemble_ode::lorenz::Lorenz;
use ndarray_ensemble_ode::rk::RungeKutta4;
use ndarray_ensemble_ode::{timing, Error};

fn main() -> Result<(), Error> {
    let config = RunConfig::default();
    let r = linspace(config.ensemble_size, config.r_min, config.r_max)?;
    let mut x = uniform_state(config.ensemble_size, config.initial);

    let algebra = config.pool.build()?;
    let threads = algebra.threads();
    // Stepper and system share one pool, so resizing it reaches both.
    let mut stepper = RungeKutta4::with_len(algebra.clone(), config.ensemble_size);
    let mut system = Lorenz::new(r.view(), algebra.clone());
    let mut run = || -> Result<(), Error> {
        integrate_const(&mut stepper, &mut system, &mut x, 0., config.t_max, config.dt)?;
        Ok(())
    };

    for _ in 0..config.repetitions {
        match &algebra {
            Execution::Parallel(pool) => {
                let comparison = timing::compare(pool, threads, |_| run())?;
                println!("{}", comparison);
            }
            Execution::Sequential(_) => {
                let (res, elapsed) = timing::time(&mut run);
                res?;
                println!("1t={:.3}s", elapsed.as_secs_f64());
            }
        }
    }
    Ok(())
}
