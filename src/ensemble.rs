//! Ensemble set-up: parameter sweeps and initial states.

use ndarray::prelude::*;

use crate::point::{Point, State};
use crate::Error;

/// `n` values evenly spaced over `[min, max]`, both endpoints included.
///
/// The last value is exactly `max`. For `n == 1` the result is `[min]`.
pub fn linspace(n: usize, min: f64, max: f64) -> Result<Array1<f64>, Error> {
    if !min.is_finite() || !max.is_finite() || min > max {
        return Err(Error::InvalidRange { min, max });
    }
    if n <= 1 {
        return Ok(Array1::from_elem(n, min));
    }
    let step = (max - min) / (n - 1) as f64;
    let mut values = Array1::from_shape_fn(n, |i| min + step * i as f64);
    values[n - 1] = max;
    Ok(values)
}

/// State with every one of the `n` members at `point`.
pub fn uniform_state<const N: usize>(n: usize, point: Point<N>) -> State<N> {
    Array1::from_elem(n, point)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn degenerate_sizes() {
        assert_eq!(linspace(0, 1., 2.).unwrap().len(), 0);
        assert_eq!(linspace(1, 1., 2.).unwrap(), array![1.]);
        assert_eq!(linspace(3, 2., 2.).unwrap(), array![2., 2., 2.]);
    }

    #[test]
    fn invalid_range() {
        assert!(matches!(linspace(4, 2., 1.), Err(Error::InvalidRange { .. })));
        assert!(linspace(4, 0., f64::NAN).is_err());
    }

    #[test]
    fn uniform() {
        let x = uniform_state(4, Point::new([10., 10., 10.]));
        assert_eq!(x.len(), 4);
        assert!(x.iter().all(|p| *p == Point::splat(10.)));
    }
}
