//! Execution strategies for elementwise operations over ensembles.
//!
//! An [`Algebra`] applies an operation to every index of one output container
//! and up to five input containers of the same length. The operation at index
//! `i` may only touch index `i` of each container, so the strategy used to
//! visit the indices (a plain scan or a partitioned scan on a thread pool)
//! never changes the result.

use ndarray::prelude::*;
use ndarray::Zip;
use rayon::{ThreadPool, ThreadPoolBuilder};
use std::sync::{Arc, PoisonError, RwLock};

use crate::error::{check_len, Error};

/// Below this many elements [`ParallelAlgebra`] stays on the calling thread.
pub const DEFAULT_PARALLEL_THRESHOLD: usize = 64;

macro_rules! zip {
    ($out:expr $(, $part:expr)*) => {
        Zip::from($out)$(.and($part))*
    };
}

/// Expands `$body` once for every arity, `for_each2` to `for_each6`.
macro_rules! with_arities {
    ($body:ident) => {
        $body! {
            for_each2(b: B);
            for_each3(b: B, c: C);
            for_each4(b: B, c: C, d: D);
            for_each5(b: B, c: C, d: D, e: E);
            for_each6(b: B, c: C, d: D, e: E, g: G);
        }
    };
}

macro_rules! declare_for_each {
    ($($name:ident($($arg:ident: $T:ident),+);)+) => {$(
        #[allow(clippy::too_many_arguments)]
        fn $name<Out, $($T,)+ F>(
            &self,
            out: ArrayViewMut1<'_, Out>,
            $($arg: ArrayView1<'_, $T>,)+
            op: F,
        ) -> Result<(), Error>
        where
            Out: Send,
            $($T: Sync,)+
            F: Fn(&mut Out, $(&$T),+) + Sync + Send;
    )+};
}

macro_rules! sequential_for_each {
    ($($name:ident($($arg:ident: $T:ident),+);)+) => {$(
        fn $name<Out, $($T,)+ F>(
            &self,
            out: ArrayViewMut1<'_, Out>,
            $($arg: ArrayView1<'_, $T>,)+
            op: F,
        ) -> Result<(), Error>
        where
            Out: Send,
            $($T: Sync,)+
            F: Fn(&mut Out, $(&$T),+) + Sync + Send,
        {
            check_len(out.len(), &[$($arg.len()),+])?;
            zip!(out $(, $arg)+).for_each(op);
            Ok(())
        }
    )+};
}

macro_rules! parallel_for_each {
    ($($name:ident($($arg:ident: $T:ident),+);)+) => {$(
        fn $name<Out, $($T,)+ F>(
            &self,
            out: ArrayViewMut1<'_, Out>,
            $($arg: ArrayView1<'_, $T>,)+
            op: F,
        ) -> Result<(), Error>
        where
            Out: Send,
            $($T: Sync,)+
            F: Fn(&mut Out, $(&$T),+) + Sync + Send,
        {
            check_len(out.len(), &[$($arg.len()),+])?;
            if out.len() < self.threshold {
                zip!(out $(, $arg)+).for_each(op);
            } else {
                self.pool().install(|| zip!(out $(, $arg)+).par_for_each(op));
            }
            Ok(())
        }
    )+};
}

macro_rules! dispatch_for_each {
    ($($name:ident($($arg:ident: $T:ident),+);)+) => {$(
        fn $name<Out, $($T,)+ F>(
            &self,
            out: ArrayViewMut1<'_, Out>,
            $($arg: ArrayView1<'_, $T>,)+
            op: F,
        ) -> Result<(), Error>
        where
            Out: Send,
            $($T: Sync,)+
            F: Fn(&mut Out, $(&$T),+) + Sync + Send,
        {
            match self {
                Execution::Sequential(a) => a.$name(out, $($arg,)+ op),
                Execution::Parallel(a) => a.$name(out, $($arg,)+ op),
            }
        }
    )+};
}

/// Applies element-local operations across ensemble containers.
///
/// `for_eachK` takes the output container and `K - 1` inputs. Every method
/// checks that all inputs have the length of `out` and returns
/// [`Error::ShapeMismatch`] before writing anything if they don't.
pub trait Algebra {
    with_arities!(declare_for_each);
}

/// Visits indices in order on the calling thread.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequentialAlgebra;

impl Algebra for SequentialAlgebra {
    with_arities!(sequential_for_each);
}

/// Splits the index range between the workers of a thread pool.
///
/// Each call blocks until every partition has finished. Clones share the pool,
/// including any later replacement by [`set_threads`](Self::set_threads), so a
/// stepper and a system function built from the same algebra always run on
/// the same workers.
#[derive(Clone, Debug)]
pub struct ParallelAlgebra {
    pool: Arc<RwLock<Arc<ThreadPool>>>,
    threshold: usize,
}

fn build_pool(threads: usize) -> Result<Arc<ThreadPool>, Error> {
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("ensemble-worker-{}", i))
        .build()?;
    log::debug!("built worker pool with {} threads", pool.current_num_threads());
    Ok(Arc::new(pool))
}

impl ParallelAlgebra {
    /// Creates a pool with `threads` workers.
    ///
    /// `threads == 0` lets rayon pick, which is normally the number of
    /// available CPUs.
    pub fn new(threads: usize) -> Result<Self, Error> {
        Ok(ParallelAlgebra {
            pool: Arc::new(RwLock::new(build_pool(threads)?)),
            threshold: DEFAULT_PARALLEL_THRESHOLD,
        })
    }

    /// Sets the ensemble length below which calls run on the calling thread.
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threads(&self) -> usize {
        self.pool().current_num_threads()
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Replaces the pool with one of `threads` workers.
    ///
    /// Seen by this algebra and all of its clones. Calls already running
    /// finish on the old pool.
    pub fn set_threads(&self, threads: usize) -> Result<(), Error> {
        let pool = build_pool(threads)?;
        *self.pool.write().unwrap_or_else(PoisonError::into_inner) = pool;
        Ok(())
    }

    fn pool(&self) -> Arc<ThreadPool> {
        Arc::clone(&self.pool.read().unwrap_or_else(PoisonError::into_inner))
    }
}

impl Algebra for ParallelAlgebra {
    with_arities!(parallel_for_each);
}

/// Algebra chosen at runtime, usually from a
/// [`PoolConfig`](crate::config::PoolConfig).
#[derive(Clone, Debug)]
pub enum Execution {
    Sequential(SequentialAlgebra),
    Parallel(ParallelAlgebra),
}

impl Execution {
    /// Number of threads that calls may run on.
    pub fn threads(&self) -> usize {
        match self {
            Execution::Sequential(_) => 1,
            Execution::Parallel(p) => p.threads(),
        }
    }
}

impl From<SequentialAlgebra> for Execution {
    fn from(algebra: SequentialAlgebra) -> Self {
        Execution::Sequential(algebra)
    }
}

impl From<ParallelAlgebra> for Execution {
    fn from(algebra: ParallelAlgebra) -> Self {
        Execution::Parallel(algebra)
    }
}

impl Algebra for Execution {
    with_arities!(dispatch_for_each);
}
