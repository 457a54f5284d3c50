//! Point, line, and plane queries on a [MeshGrid]

// crate modules
use crate::error::{Error, Result};
use crate::grid::MeshGrid;
use crate::group::Group;
use crate::voxel::Voxel;

// mctools modules
use mctools_utils::SliceExt;

// external crates
use log::{debug, trace};
use ndarray::Array2;
use std::str::FromStr;

/// Plane of a 2D slice through the mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Plane {
    XY,
    XZ,
    YZ,
}

impl Plane {
    /// In-plane axis indices and the fixed axis index, as (i, j, fixed)
    fn axes(&self) -> (usize, usize, usize) {
        match self {
            Plane::XY => (0, 1, 2),
            Plane::XZ => (0, 2, 1),
            Plane::YZ => (1, 2, 0),
        }
    }
}

impl FromStr for Plane {
    type Err = Error;

    /// Case-insensitive match on `XY`, `XZ`, or `YZ`
    ///
    /// ```rust
    /// # use mctools_mesh::Plane;
    /// assert_eq!("xz".parse::<Plane>().unwrap(), Plane::XZ);
    /// assert!("ZX".parse::<Plane>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "XY" => Ok(Plane::XY),
            "XZ" => Ok(Plane::XZ),
            "YZ" => Ok(Plane::YZ),
            _ => Err(Error::UnknownPlane(s.to_string())),
        }
    }
}

impl std::fmt::Display for Plane {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A 2D projection of mesh results at a fixed coordinate
///
/// Arrays are indexed `[[j, i]]`, i.e. one row per `j_mids` entry and one
/// column per `i_mids` entry. Voxels missing from the data are left as zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Slice {
    /// Plane of the slice
    pub plane: Plane,
    /// Midpoints along the first in-plane axis
    pub i_mids: Vec<f64>,
    /// Midpoints along the second in-plane axis
    pub j_mids: Vec<f64>,
    /// Midpoint of the fixed axis the slice was taken at
    pub fixed: f64,
    /// Results, shape `(|j_mids|, |i_mids|)`
    pub values: Array2<f64>,
    /// Relative errors, shape `(|j_mids|, |i_mids|)`
    pub errors: Array2<f64>,
    /// Axis label for i, e.g. "X co-ord (cm)"
    pub i_label: String,
    /// Axis label for j, e.g. "Y co-ord (cm)"
    pub j_label: String,
}

const LABELS: [&str; 3] = ["X co-ord (cm)", "Y co-ord (cm)", "Z co-ord (cm)"];

impl MeshGrid {
    /// Results of the voxel containing a point
    ///
    /// Each coordinate is resolved to the nearest midpoint and rows are
    /// matched exactly on all three. Every matching group is returned unless
    /// a `group` filter is given, which is an error for the 5-column layout.
    ///
    /// ```rust
    /// # use mctools_mesh::{MeshGrid, Voxel};
    /// let mut mesh = MeshGrid::new(4);
    /// mesh.set_x_bounds(vec![0.0, 2.0, 4.0]);
    /// mesh.set_y_bounds(vec![0.0, 2.0]);
    /// mesh.set_z_bounds(vec![0.0, 2.0]);
    /// mesh.voxels = vec![
    ///     Voxel { x: 1.0, y: 1.0, z: 1.0, result: 5.0, ..Default::default() },
    ///     Voxel { x: 3.0, y: 1.0, z: 1.0, result: 7.0, ..Default::default() },
    /// ];
    ///
    /// assert_eq!(mesh.point(3.6, 0.0, 0.0, None).unwrap(), vec![7.0]);
    /// ```
    pub fn point(&self, x: f64, y: f64, z: f64, group: Option<Group>) -> Result<Vec<f64>> {
        let group = self.check_group(group)?;
        let x = self.x_mids.find_nearest(x)?;
        let y = self.y_mids.find_nearest(y)?;
        let z = self.z_mids.find_nearest(z)?;
        trace!("Point resolved to ({x}, {y}, {z})");

        Ok(self
            .voxels
            .iter()
            .filter(|v| v.x == x && v.y == y && v.z == z)
            .filter(|v| matches_group(v, group))
            .map(|v| v.result)
            .collect())
    }

    /// Results along a line varying in one axis
    ///
    /// The two constant coordinates are resolved to their nearest midpoints
    /// and the results returned in row order. Lines varying along more than
    /// one axis are [Error::UnsupportedLine], while identical points give the
    /// same as [point()](MeshGrid::point).
    pub fn line(&self, p1: [f64; 3], p2: [f64; 3], group: Option<Group>) -> Result<Vec<f64>> {
        let group = self.check_group(group)?;
        let varying = (0..3).filter(|&k| p1[k] != p2[k]).count();
        if varying > 1 {
            return Err(Error::UnsupportedLine);
        }

        let mids = [&self.x_mids, &self.y_mids, &self.z_mids];
        let mut fixed: [Option<f64>; 3] = [None; 3];
        for k in (0..3).filter(|&k| p1[k] == p2[k]) {
            fixed[k] = Some(mids[k].find_nearest(p1[k])?);
        }
        debug!("Line fixed at {fixed:?}");

        Ok(self
            .voxels
            .iter()
            .filter(|v| {
                v.coordinates()
                    .iter()
                    .zip(fixed.iter())
                    .all(|(c, f)| f.map_or(true, |f| *c == f))
            })
            .filter(|v| matches_group(v, group))
            .map(|v| v.result)
            .collect())
    }

    /// A 2D slice of results and errors through the mesh
    ///
    /// The `value` on the fixed axis is resolved to the nearest midpoint.
    /// Only one group can be shown at a time, so grouped meshes with no
    /// `group` filter use the last group in the data.
    pub fn slice(&self, plane: Plane, value: f64, group: Option<Group>) -> Result<Slice> {
        let group = self.single_group(group)?;
        let mids = [&self.x_mids, &self.y_mids, &self.z_mids];
        let (i_axis, j_axis, fixed_axis) = plane.axes();

        let fixed = mids[fixed_axis].find_nearest(value)?;
        let i_mids = mids[i_axis].clone();
        let j_mids = mids[j_axis].clone();
        debug!("Slice {plane} at {fixed} for group {group:?}");

        let mut values = Array2::<f64>::zeros((j_mids.len(), i_mids.len()));
        let mut errors = Array2::<f64>::zeros((j_mids.len(), i_mids.len()));

        let in_plane = self
            .voxels
            .iter()
            .filter(|v| v.coordinates()[fixed_axis] == fixed)
            .filter(|v| matches_group(v, group));

        for voxel in in_plane {
            let c = voxel.coordinates();
            let i = i_mids.iter().position(|m| *m == c[i_axis]);
            let j = j_mids.iter().position(|m| *m == c[j_axis]);
            if let (Some(i), Some(j)) = (i, j) {
                values[[j, i]] = voxel.result;
                errors[[j, i]] = voxel.error;
            }
        }

        Ok(Slice {
            plane,
            i_mids,
            j_mids,
            fixed,
            values,
            errors,
            i_label: LABELS[i_axis].to_string(),
            j_label: LABELS[j_axis].to_string(),
        })
    }
}

fn matches_group(voxel: &Voxel, group: Option<Group>) -> bool {
    group.map_or(true, |g| voxel.group == Some(g))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::ColumnLayout;

    /// 2x2x2 mesh with results numbered in z-fastest row order
    fn cube() -> MeshGrid {
        let mut mesh = MeshGrid::new(1);
        mesh.set_x_bounds(vec![0.0, 1.0, 2.0]);
        mesh.set_y_bounds(vec![0.0, 1.0, 2.0]);
        mesh.set_z_bounds(vec![0.0, 1.0, 2.0]);

        let mut n = 0.0;
        for x in [0.5, 1.5] {
            for y in [0.5, 1.5] {
                for z in [0.5, 1.5] {
                    mesh.voxels.push(Voxel {
                        x,
                        y,
                        z,
                        result: n,
                        error: n / 10.0,
                        ..Default::default()
                    });
                    n += 1.0;
                }
            }
        }
        mesh
    }

    #[test]
    fn lines_along_each_axis() {
        let mesh = cube();
        assert_eq!(mesh.line([0.0, 0.0, 0.0], [0.0, 0.0, 2.0], None).unwrap(), vec![0.0, 1.0]);
        assert_eq!(mesh.line([0.0, 2.0, 2.0], [2.0, 2.0, 2.0], None).unwrap(), vec![3.0, 7.0]);
        assert_eq!(mesh.line([1.0, 1.0, 1.0], [1.0, 1.0, 1.0], None).unwrap(), vec![0.0]);
        assert!(matches!(
            mesh.line([0.0, 0.0, 0.0], [1.0, 1.0, 0.0], None),
            Err(Error::UnsupportedLine)
        ));
    }

    #[test]
    fn slice_orientation() {
        let mesh = cube();
        let slice = mesh.slice(Plane::XZ, 1.9, None).unwrap();

        assert_eq!(slice.fixed, 1.5);
        assert_eq!(slice.i_label, "X co-ord (cm)");
        assert_eq!(slice.j_label, "Z co-ord (cm)");
        assert_eq!(slice.values.shape(), &[2, 2]);

        // rows follow z, columns follow x
        assert_eq!(slice.values[[0, 0]], 2.0);
        assert_eq!(slice.values[[1, 0]], 3.0);
        assert_eq!(slice.values[[0, 1]], 6.0);
        assert_eq!(slice.errors[[1, 1]], 0.7);
    }

    #[test]
    fn group_filters() {
        let mut mesh = cube();
        assert!(matches!(
            mesh.point(0.0, 0.0, 0.0, Some(Group::Value(1.0))),
            Err(Error::NoGroupColumn(1))
        ));

        mesh.layout = ColumnLayout::Energy;
        for (i, voxel) in mesh.voxels.iter_mut().enumerate() {
            voxel.group = Some(if i < 4 { Group::Value(1.0) } else { Group::Total });
        }

        // voxels of x = 1.5 are all in the total group
        assert_eq!(mesh.point(2.0, 0.0, 0.0, None).unwrap(), vec![4.0]);
        assert!(mesh.point(2.0, 0.0, 0.0, Some(1.0.into())).unwrap().is_empty());
    }
}
