//! Wall-clock comparison of parallel and single-threaded runs.
//!
//! This wraps independent calls to the integration driver; nothing here
//! changes how a run integrates.

use std::fmt;
use std::time::{Duration, Instant};

use crate::algebra::ParallelAlgebra;
use crate::Error;

/// Runs `f` and returns its result together with the elapsed time.
pub fn time<R>(f: impl FnOnce() -> R) -> (R, Duration) {
    let start = Instant::now();
    let out = f();
    (out, start.elapsed())
}

/// One parallel run and one single-threaded run of the same work.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    /// Threads used by the parallel run.
    pub threads: usize,
    pub parallel: Duration,
    pub serial: Duration,
}

impl Comparison {
    /// `serial / parallel`; infinite if the parallel run took no measurable
    /// time.
    pub fn speedup(&self) -> f64 {
        self.serial.as_secs_f64() / self.parallel.as_secs_f64()
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}t={:.3}s\t1t={:.3}s\tspeedup={:.2}",
            self.threads,
            self.parallel.as_secs_f64(),
            self.serial.as_secs_f64(),
            self.speedup()
        )
    }
}

/// Times `run` with `algebra` at `threads` workers and again at one worker.
///
/// The thread count of `algebra`, and of every clone sharing its pool, is
/// left at one afterwards; callers that repeat the comparison rebuild it
/// through this function each time.
pub fn compare<F>(
    algebra: &ParallelAlgebra,
    threads: usize,
    mut run: F,
) -> Result<Comparison, Error>
where
    F: FnMut(&ParallelAlgebra) -> Result<(), Error>,
{
    algebra.set_threads(threads)?;
    let threads = algebra.threads();
    let (res, parallel) = time(|| run(algebra));
    res?;

    algebra.set_threads(1)?;
    let (res, serial) = time(|| run(algebra));
    res?;

    let comparison = Comparison {
        threads,
        parallel,
        serial,
    };
    log::info!("{}", comparison);
    Ok(comparison)
}
