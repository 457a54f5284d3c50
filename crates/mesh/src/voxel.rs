//! Module for voxel-related data and implementations

// crate modules
use crate::group::Group;

// mctools modules
use mctools_utils::{OptionExt, ValueExt};

// external crates
use serde::{Deserialize, Serialize};

/// One data row of a mesh tally
///
/// Every row of the mesh table is kept as printed, so the voxel carries its
/// own coordinates and, for 6-column layouts, the energy or time [Group].
///
/// The coordinates are the voxel midpoints printed in the file, and should
/// match the midpoints derived from the bounds of the
/// [MeshGrid](crate::MeshGrid).
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voxel {
    /// Energy or time group, `None` for the 5-column layout
    pub group: Option<Group>,
    /// Voxel x coordinate
    pub x: f64,
    /// Voxel y coordinate
    pub y: f64,
    /// Voxel z coordinate
    pub z: f64,
    /// Tallied voxel result
    pub result: f64,
    /// Relative error on result
    pub error: f64,
}

impl Voxel {
    /// Returns the absolute error for the voxel
    ///
    ///```rust
    /// # use mctools_mesh::Voxel;
    /// let voxel = Voxel {
    ///     result: 50.0,
    ///     error: 0.10,
    ///     ..Default::default()
    /// };
    ///
    /// // 10% relative error => 50.0 +/-5.0
    /// assert_eq!(voxel.absolute_error(), 5.0);
    /// ```
    pub fn absolute_error(&self) -> f64 {
        self.result * self.error
    }

    /// Result plus the absolute error
    pub fn upper(&self) -> f64 {
        self.result + self.absolute_error()
    }

    /// Result minus the absolute error
    pub fn lower(&self) -> f64 {
        self.result - self.absolute_error()
    }

    /// Coordinates as an array
    pub fn coordinates(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    /// Sum of two voxels with relative errors added in quadrature
    ///
    /// Note that the combined error is not weighted by the contribution of
    /// each result, i.e. `sqrt(e1^2 + e2^2)`. The coordinates and group of
    /// `self` are kept.
    ///
    /// ```rust
    /// # use mctools_mesh::Voxel;
    /// let a = Voxel { result: 1.0, error: 0.3, ..Default::default() };
    /// let b = Voxel { result: 2.0, error: 0.4, ..Default::default() };
    ///
    /// let sum = a.combine(&b);
    /// assert_eq!(sum.result, 3.0);
    /// assert!((sum.error - 0.5).abs() < 1e-12);
    /// ```
    pub fn combine(&self, other: &Voxel) -> Voxel {
        Voxel {
            result: self.result + other.result,
            error: (self.error.powi(2) + other.error.powi(2)).sqrt(),
            ..*self
        }
    }
}

impl std::fmt::Display for Voxel {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "{:>10}{:>10.3}{:>10.3}{:>10.3}{:>13}{:>13}",
            self.group.display(),
            self.x,
            self.y,
            self.z,
            self.result.sci(5, 2),
            self.error.sci(5, 2)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_bounds() {
        let voxel = Voxel {
            result: 6.38182E-07,
            error: 1.89457E-02,
            ..Default::default()
        };

        assert!((voxel.upper() - 6.50273e-7).abs() < 1e-11);
        assert!((voxel.lower() - 6.26091e-7).abs() < 1e-11);
    }

    #[test]
    fn combine_keeps_position() {
        let a = Voxel {
            group: Some(Group::Value(20.0)),
            x: -9.0,
            y: 1.0,
            z: 2.0,
            result: 1.0,
            error: 0.1,
        };

        let sum = a.combine(&a);
        assert_eq!(sum.coordinates(), [-9.0, 1.0, 2.0]);
        assert_eq!(sum.group, Some(Group::Value(20.0)));
        assert_eq!(sum.result, 2.0);
    }
}
