use crate::error::{Error, Result};
use crate::ValueExt;

use itertools::Itertools;

/// Relative tolerance used when comparing bin widths
const RELATIVE_TOLERANCE: f64 = 1e-5;

/// Absolute tolerance used when comparing bin widths
const ABSOLUTE_TOLERANCE: f64 = 1e-8;

/// Extends functionality for slices of float arrays
pub trait SliceExt<T> {
    /// Find the minimum value in float arrays
    ///
    /// Only provides the minimum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use mctools_utils::SliceExt;
    /// # use mctools_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_min(), Ok(0.5));
    /// assert_eq!([1.1, f64::MIN, 2.2].try_min(), Ok(f64::MIN));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::NAN, 2.2].try_min(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_min(), Err(Error::SliceContainsNoValues));
    /// ```
    ///
    /// The float primitives do not implement `Ord` due to `NaN` being
    /// incomparable, so this uses `total_cmp` on the validated values.
    fn try_min(&self) -> Result<T>;

    /// Find the maximum value in float arrays
    ///
    /// Only provides the maximum value from a collection of valid numbers. Any
    /// NAN values, infinite values, or empty slices will return an error.
    ///
    /// ```rust
    /// # use mctools_utils::SliceExt;
    /// # use mctools_utils::Error;
    /// // Successful cases
    /// assert_eq!([1.1, 0.5, 2.2].try_max(), Ok(2.2));
    ///
    /// // Error cases
    /// assert_eq!([1.1, f64::INFINITY, 2.2].try_max(), Err(Error::SliceContainsUndefinedValues));
    /// assert_eq!(Vec::<f64>::new().try_max(), Err(Error::SliceContainsNoValues));
    /// ```
    fn try_max(&self) -> Result<T>;

    /// Midpoints between consecutive bin edges
    ///
    /// Every midpoint is rounded to 5 decimal places, so `n` bounds always give
    /// `n-1` midpoints and fewer than two bounds give none.
    ///
    /// ```rust
    /// # use mctools_utils::SliceExt;
    /// assert_eq!([1.0, 9.0].midpoints(), vec![5.0]);
    /// assert_eq!([-1.0, -1.5].midpoints(), vec![-1.25]);
    /// assert_eq!([1.0, 2.0, 3.0, 4.0].midpoints(), vec![1.5, 2.5, 3.5]);
    /// assert!([1.0].midpoints().is_empty());
    /// ```
    fn midpoints(&self) -> Vec<T>;

    /// Check that bin edges are equally spaced
    ///
    /// Widths are compared against the first with a small relative and
    /// absolute tolerance. Anything with fewer than two edges has no width to
    /// compare and is never uniform.
    ///
    /// ```rust
    /// # use mctools_utils::SliceExt;
    /// assert!([1.0, 2.0, 3.0, 4.0, 5.0].is_uniform());
    /// assert!([-10.0, -8.0, -6.0].is_uniform());
    /// assert!(![1.0, 10.0, 11.0, 15.0, 50.0].is_uniform());
    /// assert!(!Vec::<f64>::new().is_uniform());
    /// ```
    fn is_uniform(&self) -> bool;

    /// Find the value closest to `value`
    ///
    /// Ties resolve to the first candidate in the slice.
    ///
    /// ```rust
    /// # use mctools_utils::SliceExt;
    /// assert_eq!([4.0, 5.0].find_nearest(4.6), Ok(5.0));
    /// assert_eq!([3.1, 3.35].find_nearest(3.2), Ok(3.1));
    /// assert_eq!([1.0, 3.0].find_nearest(2.0), Ok(1.0));
    /// assert!(Vec::<f64>::new().find_nearest(2.0).is_err());
    /// ```
    fn find_nearest(&self, value: T) -> Result<T>;

    /// Find the index of the value closest to `value`
    ///
    /// Same rules as [find_nearest()](SliceExt::find_nearest), returning the
    /// position rather than the value.
    fn find_nearest_index(&self, value: T) -> Result<usize>;
}

impl SliceExt<f64> for [f64] {
    fn try_min(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .min_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn try_max(&self) -> Result<f64> {
        if self.iter().any(|v| !v.is_finite()) {
            return Err(Error::SliceContainsUndefinedValues);
        };

        self.iter()
            .max_by(|a, b| a.total_cmp(b))
            .copied()
            .ok_or(Error::SliceContainsNoValues)
    }

    fn midpoints(&self) -> Vec<f64> {
        self.iter()
            .tuple_windows()
            .map(|(low, high)| ((low + high) * 0.5).round_to(5))
            .collect()
    }

    fn is_uniform(&self) -> bool {
        let widths: Vec<f64> = self.iter().tuple_windows().map(|(a, b)| b - a).collect();

        match widths.first() {
            None => false,
            Some(first) => widths
                .iter()
                .all(|w| (w - first).abs() <= ABSOLUTE_TOLERANCE + RELATIVE_TOLERANCE * first.abs()),
        }
    }

    fn find_nearest(&self, value: f64) -> Result<f64> {
        let index = self.find_nearest_index(value)?;
        Ok(self[index])
    }

    fn find_nearest_index(&self, value: f64) -> Result<usize> {
        let mut best: Option<(usize, f64)> = None;

        // strict comparison keeps the first of any equally close candidates
        for (idx, candidate) in self.iter().enumerate() {
            let distance = (candidate - value).abs();
            match best {
                Some((_, closest)) if distance >= closest => (),
                _ => best = Some((idx, distance)),
            }
        }

        best.map(|(idx, _)| idx).ok_or(Error::SliceContainsNoValues)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_with_integers_and_negatives() {
        assert_eq!([2.0, 11.0, 12.0].find_nearest(10.0), Ok(11.0));
        assert_eq!([-3.5, -3.9].find_nearest(-3.1), Ok(-3.5));
        assert_eq!([7.0, 11.0].find_nearest(7.2), Ok(7.0));
        assert_eq!([7.0, 11.0].find_nearest_index(10.0), Ok(1));
    }

    #[test]
    fn midpoints_round_to_five_places() {
        assert_eq!([0.0, 1.0].midpoints(), vec![0.5]);
        assert_eq!([1.0, 1.5].midpoints(), vec![1.25]);
        assert_eq!([-1.0, 1.0].midpoints(), vec![0.0]);
        assert_eq!([-1.0, 0.6, 2.2].midpoints(), vec![-0.2, 1.4]);
        assert_eq!([0.0, 1.0 / 3.0].midpoints(), vec![0.16667]);
    }

    #[test]
    fn uniform_needs_two_edges() {
        assert!(![1.0].is_uniform());
        assert!([1.0, 3.0].is_uniform());
        assert!([0.0, 0.1, 0.2, 0.3].is_uniform());
        assert!(![0.0, 0.1, 0.2, 0.4].is_uniform());
    }
}
