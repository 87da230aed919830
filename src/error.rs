use thiserror::Error;

/// Errors produced while setting up or running an ensemble integration.
#[derive(Debug, Error)]
pub enum Error {
    /// Two containers taking part in the same operation have different
    /// lengths.
    ///
    /// This covers the state against the stepper's scratch buffers, the
    /// state against a derivative buffer or parameter array, and the operands
    /// of a single algebra call.
    #[error("shape mismatch: expected length {expected}, found {found}")]
    ShapeMismatch { expected: usize, found: usize },
    /// The step size is zero, NaN or infinite.
    #[error("step size {0} is not a finite non-zero number")]
    InvalidStep(f64),
    #[error("start or end time is not finite")]
    TimeNotFinite,
    /// The sign of the step size disagrees with the direction of the time
    /// span.
    #[error("step size points away from the end time")]
    WrongDirection,
    #[error("invalid parameter range [{min}, {max}]")]
    InvalidRange { min: f64, max: f64 },
    #[error("failed to build thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Returns `ShapeMismatch` unless every length in `found` equals `expected`.
pub(crate) fn check_len(expected: usize, found: &[usize]) -> Result<(), Error> {
    match found.iter().find(|&&len| len != expected) {
        Some(&len) => Err(Error::ShapeMismatch {
            expected,
            found: len,
        }),
        None => Ok(()),
    }
}
