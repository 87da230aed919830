//! Pool and run configuration.

use crate::algebra::{DEFAULT_PARALLEL_THRESHOLD, Execution, ParallelAlgebra, SequentialAlgebra};
use crate::point::Point;
use crate::Error;

/// How elementwise work is spread over threads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PoolConfig {
    /// Number of worker threads; 0 uses every available CPU.
    pub threads: usize,
    /// Ensembles shorter than this run on the calling thread.
    pub parallel_threshold: usize,
    /// Skip the pool entirely and scan on the calling thread.
    pub sequential: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            threads: 0,
            parallel_threshold: DEFAULT_PARALLEL_THRESHOLD,
            sequential: false,
        }
    }
}

impl PoolConfig {
    /// Pool with a fixed number of threads.
    pub fn with_threads(threads: usize) -> Self {
        PoolConfig {
            threads,
            ..Default::default()
        }
    }

    /// Configuration that never leaves the calling thread.
    pub fn sequential() -> Self {
        PoolConfig {
            sequential: true,
            ..Default::default()
        }
    }

    pub fn parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Builds the algebra, starting a fresh thread pool unless sequential.
    pub fn build(&self) -> Result<Execution, Error> {
        if self.sequential {
            return Ok(SequentialAlgebra.into());
        }
        let algebra = ParallelAlgebra::new(self.threads)?.with_threshold(self.parallel_threshold);
        Ok(algebra.into())
    }
}

/// Settings of the Lorenz ensemble timing run.
#[derive(Clone, Debug, PartialEq)]
pub struct RunConfig {
    /// Number of ensemble members.
    pub ensemble_size: usize,
    /// Smallest control parameter `R`.
    pub r_min: f64,
    /// Largest control parameter `R`.
    pub r_max: f64,
    /// Starting point shared by every member.
    pub initial: Point<3>,
    pub t_max: f64,
    pub dt: f64,
    pub pool: PoolConfig,
    /// Number of parallel/serial comparisons.
    pub repetitions: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            ensemble_size: 1024,
            r_min: 0.1,
            r_max: 50.,
            initial: Point::splat(10.),
            t_max: 10.,
            dt: 0.01,
            pool: PoolConfig::default(),
            repetitions: 10,
        }
    }
}
