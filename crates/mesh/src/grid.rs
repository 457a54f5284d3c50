//! Module for mesh-related data and implementations

// crate modules
use crate::error::{Error, Result};
use crate::group::Group;
use crate::voxel::Voxel;

// mctools modules
use mctools_utils::{f, SliceExt, ValueExt};

// external crates
use log::{debug, info};
use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Add;

/// Column layout of the mesh table
///
/// | Layout     | Columns                                       |
/// | ---------- | --------------------------------------------- |
/// | `Position` | `X Y Z Result Rel Error`                      |
/// | `Energy`   | `Energy X Y Z Result Rel Error`               |
/// | `Time`     | `Time X Y Z Result Rel Error`                 |
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColumnLayout {
    /// 5-column, coordinates only
    #[default]
    Position,
    /// 6-column with a leading energy
    Energy,
    /// 6-column with a leading time
    Time,
}

impl ColumnLayout {
    /// Number of columns in every data row
    pub fn columns(&self) -> usize {
        match self {
            Self::Position => 5,
            Self::Energy | Self::Time => 6,
        }
    }

    /// Check for a leading energy or time column
    pub fn has_group(&self) -> bool {
        !matches!(self, Self::Position)
    }
}

impl std::fmt::Display for ColumnLayout {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Self::Position => "5-column",
            Self::Energy => "6-column energy",
            Self::Time => "6-column time",
        };
        write!(f, "{name}")
    }
}

/// Auxiliary columns that may be derived from the results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DerivedColumn {
    /// Result plus the absolute error
    Upper,
    /// Result minus the absolute error
    Lower,
}

/// Common data structure representing a mesh tally
///
/// Everything is public, though a [MeshGrid] is not modified once read other
/// than by [add_derived()](MeshGrid::add_derived). Arithmetic always returns a
/// new grid.
///
/// ## Bounds and midpoints
///
/// Axis bounds are the values printed in the file, and midpoints are derived
/// immediately with `mid[i] = round((b[i] + b[i+1]) / 2, 5)`. Energy and time
/// bounds are kept as the literal labels printed.
///
/// ## Voxels
///
/// There is one [Voxel] per data row. For energy or time layouts the full set
/// of spatial voxels is repeated for every group.
///
/// ```rust
/// # use mctools_mesh::{MeshGrid, Voxel};
/// let mut mesh = MeshGrid::new(104);
/// mesh.set_x_bounds(vec![0.0, 1.0, 2.0]);
/// mesh.set_y_bounds(vec![0.0, 1.0]);
/// mesh.set_z_bounds(vec![0.0, 2.0]);
///
/// assert_eq!(mesh.x_mids, vec![0.5, 1.5]);
/// assert_eq!(mesh.number_voxels(), 2);
/// assert_eq!(mesh.voxel_volume(), 2.0);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshGrid {
    /// Mesh tally number e.g fmesh104 => id = 104
    pub id: u32,
    /// Particle name, e.g. "neutron"
    pub particle: String,
    /// Column layout of the data rows
    pub layout: ColumnLayout,
    /// X boundaries
    pub x_bounds: Vec<f64>,
    /// Y boundaries
    pub y_bounds: Vec<f64>,
    /// Z boundaries
    pub z_bounds: Vec<f64>,
    /// Energy bin boundary labels, empty if not printed
    pub e_bounds: Vec<String>,
    /// Time bin boundary labels, empty if not printed
    pub t_bounds: Vec<String>,
    /// X voxel midpoints
    pub x_mids: Vec<f64>,
    /// Y voxel midpoints
    pub y_mids: Vec<f64>,
    /// Z voxel midpoints
    pub z_mids: Vec<f64>,
    /// One voxel per data row
    pub voxels: Vec<Voxel>,
    /// Auxiliary columns, one value per voxel
    pub derived: BTreeMap<DerivedColumn, Vec<f64>>,
}

impl MeshGrid {
    /// Initialise an empty mesh with the given id
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }

    /// Set the x bounds and derive the midpoints
    pub fn set_x_bounds(&mut self, bounds: Vec<f64>) {
        self.x_mids = bounds.midpoints();
        self.x_bounds = bounds;
    }

    /// Set the y bounds and derive the midpoints
    pub fn set_y_bounds(&mut self, bounds: Vec<f64>) {
        self.y_mids = bounds.midpoints();
        self.y_bounds = bounds;
    }

    /// Set the z bounds and derive the midpoints
    pub fn set_z_bounds(&mut self, bounds: Vec<f64>) {
        self.z_mids = bounds.midpoints();
        self.z_bounds = bounds;
    }

    /// Number of spatial voxels, `|x_mids| * |y_mids| * |z_mids|`
    pub fn number_voxels(&self) -> usize {
        self.x_mids.len() * self.y_mids.len() * self.z_mids.len()
    }

    /// Distinct groups in the order they appear in the data
    pub fn groups(&self) -> Vec<Group> {
        let mut groups: Vec<Group> = Vec::new();
        for group in self.voxels.iter().filter_map(|v| v.group) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
        groups
    }

    /// Volume of a single voxel
    ///
    /// Uniform meshes give the product of the constant spacing on each axis.
    /// Anything else falls back to the average, i.e. the volume of the
    /// bounding box divided by [number_voxels()](MeshGrid::number_voxels).
    /// A mesh without any voxels has a volume of zero.
    ///
    /// ```rust
    /// # use mctools_mesh::MeshGrid;
    /// let mut mesh = MeshGrid::new(4);
    /// mesh.set_x_bounds(vec![0.0, 1.0, 3.0]);
    /// mesh.set_y_bounds(vec![0.0, 1.0]);
    /// mesh.set_z_bounds(vec![0.0, 1.0]);
    ///
    /// // non-uniform in x, so the average is used
    /// assert_eq!(mesh.voxel_volume(), 1.5);
    /// ```
    pub fn voxel_volume(&self) -> f64 {
        if self.number_voxels() == 0 {
            return 0.0;
        }

        let axes = [&self.x_bounds, &self.y_bounds, &self.z_bounds];

        if axes.iter().all(|b| b.is_uniform()) {
            return axes.iter().map(|b| (b[1] - b[0]).abs()).product();
        }

        info!("Mesh {} non-uniform, using average voxel volume", self.id);
        let extent = |b: &Vec<f64>| match (b.try_min(), b.try_max()) {
            (Ok(min), Ok(max)) => max - min,
            _ => 0.0,
        };

        let total: f64 = axes.iter().map(|b| extent(*b)).product();
        total / self.number_voxels() as f64
    }

    /// Number of rows with a result of exactly zero
    pub fn count_zeros(&self) -> usize {
        self.voxels.iter().filter(|v| v.result == 0.0).count()
    }

    /// Result plus absolute error for every row
    pub fn upper_values(&self) -> Vec<f64> {
        self.voxels.iter().map(|v| v.upper()).collect()
    }

    /// Result minus absolute error for every row
    pub fn lower_values(&self) -> Vec<f64> {
        self.voxels.iter().map(|v| v.lower()).collect()
    }

    /// Calculate and store an auxiliary column
    ///
    /// Existing columns are left untouched, and calling this again simply
    /// refreshes the derived values.
    pub fn add_derived(&mut self, column: DerivedColumn) {
        let values = match column {
            DerivedColumn::Upper => self.upper_values(),
            DerivedColumn::Lower => self.lower_values(),
        };
        debug!("Mesh {} added {column:?} column", self.id);
        self.derived.insert(column, values);
    }

    /// Combine two compatible meshes into a new one
    ///
    /// Bounds are checked for x, y, and z, then the energy or time bounds,
    /// before the layout and number of rows. Results are summed and relative
    /// errors added in quadrature, see [Voxel::combine()].
    ///
    /// Derived columns are not carried over.
    pub fn combine(&self, other: &MeshGrid) -> Result<MeshGrid> {
        self.check_compatible(other)?;

        let voxels = self
            .voxels
            .iter()
            .zip(other.voxels.iter())
            .map(|(a, b)| a.combine(b))
            .collect();

        let mut mesh = MeshGrid {
            id: self.id,
            particle: self.particle.clone(),
            layout: self.layout,
            e_bounds: self.e_bounds.clone(),
            t_bounds: self.t_bounds.clone(),
            voxels,
            ..Default::default()
        };

        mesh.set_x_bounds(self.x_bounds.clone());
        mesh.set_y_bounds(self.y_bounds.clone());
        mesh.set_z_bounds(self.z_bounds.clone());
        Ok(mesh)
    }

    /// Dense `(x, y, z)` arrays of results and relative errors
    ///
    /// Only one group may be converted at a time. With no group given, the
    /// last group in the data is used, which is the `Total` bin of any energy
    /// mesh that printed one. Coordinates are matched to the nearest midpoint.
    pub fn to_3d(&self, group: Option<Group>) -> Result<(Array3<f64>, Array3<f64>)> {
        let group = self.single_group(group)?;
        let shape = (self.x_mids.len(), self.y_mids.len(), self.z_mids.len());
        let mut values = Array3::<f64>::zeros(shape);
        let mut errors = Array3::<f64>::zeros(shape);

        for voxel in self.voxels.iter().filter(|v| v.group == group) {
            let i = self.x_mids.find_nearest_index(voxel.x)?;
            let j = self.y_mids.find_nearest_index(voxel.y)?;
            let k = self.z_mids.find_nearest_index(voxel.z)?;
            values[[i, j, k]] = voxel.result;
            errors[[i, j, k]] = voxel.error;
        }

        Ok((values, errors))
    }

    /// Pretty JSON representation of the mesh
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ! ------------------------------------------------------------------------
// !                            Crate helpers
// ! ------------------------------------------------------------------------

impl MeshGrid {
    fn check_compatible(&self, other: &MeshGrid) -> Result<()> {
        let mismatch = |dimension: &str| Error::BoundsMismatch {
            dimension: dimension.to_string(),
        };

        if self.x_bounds != other.x_bounds {
            return Err(mismatch("x"));
        }
        if self.y_bounds != other.y_bounds {
            return Err(mismatch("y"));
        }
        if self.z_bounds != other.z_bounds {
            return Err(mismatch("z"));
        }
        if self.layout == ColumnLayout::Energy && self.e_bounds != other.e_bounds {
            return Err(mismatch("energy"));
        }
        if self.layout == ColumnLayout::Time && self.t_bounds != other.t_bounds {
            return Err(mismatch("time"));
        }

        if self.layout != other.layout {
            return Err(Error::LayoutMismatch {
                left: self.layout,
                right: other.layout,
            });
        }

        if self.voxels.len() != other.voxels.len() {
            return Err(Error::RowCountMismatch {
                expected: self.voxels.len(),
                found: other.voxels.len(),
            });
        }

        Ok(())
    }

    /// Check a group filter against the layout
    pub(crate) fn check_group(&self, group: Option<Group>) -> Result<Option<Group>> {
        match (self.layout, group) {
            (ColumnLayout::Position, Some(_)) => Err(Error::NoGroupColumn(self.id)),
            (_, group) => Ok(group),
        }
    }

    /// Resolve a group filter to exactly one group for 2D and 3D views
    pub(crate) fn single_group(&self, group: Option<Group>) -> Result<Option<Group>> {
        match self.check_group(group)? {
            None if self.layout.has_group() => Ok(self.voxels.last().and_then(|v| v.group)),
            group => Ok(group),
        }
    }
}

impl Add for &MeshGrid {
    type Output = Result<MeshGrid>;

    fn add(self, rhs: Self) -> Self::Output {
        self.combine(rhs)
    }
}

impl std::fmt::Display for MeshGrid {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let head: String = f!(" > Mesh {} [{}, {}]", self.id, self.particle, self.layout);
        let mut s = f!("{}\n{}\n{}\n", "-".repeat(40), head, "-".repeat(40));

        let axes = [
            ("x", &self.x_bounds),
            ("y", &self.y_bounds),
            ("z", &self.z_bounds),
        ];

        for (name, bounds) in axes {
            if let (Some(first), Some(last)) = (bounds.first(), bounds.last()) {
                s += &f!(
                    "{name}     : {:>10} - {:>10} cm ({} bins)\n",
                    first.sci(2, 2),
                    last.sci(2, 2),
                    bounds.len() - 1
                );
            }
        }

        if !self.e_bounds.is_empty() {
            s += &f!("energy: {}\n", self.e_bounds.join(" "));
        }
        if !self.t_bounds.is_empty() {
            s += &f!("time  : {}\n", self.t_bounds.join(" "));
        }

        s += &f!("voxels: {} ({} rows)", self.number_voxels(), self.voxels.len());
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small(layout: ColumnLayout, results: &[f64]) -> MeshGrid {
        let mut mesh = MeshGrid::new(1);
        mesh.layout = layout;
        mesh.set_x_bounds(vec![0.0, 1.0, 2.0]);
        mesh.set_y_bounds(vec![0.0, 1.0]);
        mesh.set_z_bounds(vec![0.0, 1.0]);
        mesh.voxels = results
            .iter()
            .enumerate()
            .map(|(i, r)| Voxel {
                x: mesh.x_mids[i % 2],
                y: 0.5,
                z: 0.5,
                result: *r,
                error: 0.1,
                ..Default::default()
            })
            .collect();
        mesh
    }

    #[test]
    fn combine_checks_bounds_in_order() {
        let a = small(ColumnLayout::Position, &[1.0, 2.0]);
        let mut b = a.clone();
        b.set_y_bounds(vec![0.0, 2.0]);
        b.set_z_bounds(vec![0.0, 2.0]);

        let result = a.combine(&b);
        assert!(matches!(result, Err(Error::BoundsMismatch { dimension }) if dimension == "y"));
    }

    #[test]
    fn combine_checks_layout_and_rows() {
        let a = small(ColumnLayout::Position, &[1.0, 2.0]);
        let b = small(ColumnLayout::Energy, &[1.0, 2.0]);
        assert!(matches!(a.combine(&b), Err(Error::LayoutMismatch { .. })));

        let b = small(ColumnLayout::Position, &[1.0]);
        assert!(matches!(
            a.combine(&b),
            Err(Error::RowCountMismatch {
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn derived_columns() {
        let mut mesh = small(ColumnLayout::Position, &[2.0, 0.0]);
        mesh.voxels[0].error = 0.5;
        mesh.add_derived(DerivedColumn::Upper);
        mesh.add_derived(DerivedColumn::Lower);

        assert_eq!(mesh.derived[&DerivedColumn::Upper], vec![3.0, 0.0]);
        assert_eq!(mesh.derived[&DerivedColumn::Lower], vec![1.0, 0.0]);
        assert_eq!(mesh.voxels[0].result, 2.0);
        assert_eq!(mesh.count_zeros(), 1);
    }

    #[test]
    fn dense_arrays() {
        let mesh = small(ColumnLayout::Position, &[1.0, 2.0]);
        let (values, errors) = mesh.to_3d(None).unwrap();
        assert_eq!(values.shape(), &[2, 1, 1]);
        assert_eq!(values[[1, 0, 0]], 2.0);
        assert_eq!(errors[[0, 0, 0]], 0.1);

        assert!(matches!(
            mesh.to_3d(Some(Group::Total)),
            Err(Error::NoGroupColumn(1))
        ));
    }

    #[test]
    fn empty_mesh_volume() {
        let mut mesh = MeshGrid::new(1);
        assert_eq!(mesh.voxel_volume(), 0.0);

        // one axis with a single bound still has no voxels
        mesh.set_x_bounds(vec![0.0, 1.0, 3.0]);
        mesh.set_y_bounds(vec![0.0, 1.0]);
        mesh.set_z_bounds(vec![0.0]);
        assert_eq!(mesh.voxel_volume(), 0.0);
    }

    #[test]
    fn summary_display() {
        let mut mesh = small(ColumnLayout::Energy, &[1.0, 2.0]);
        mesh.particle = "neutron".to_string();
        mesh.e_bounds = vec!["0.00E+00".to_string(), "1.00E+36".to_string()];

        let text = mesh.to_string();
        assert!(text.contains(" > Mesh 1 [neutron, 6-column energy]"));
        assert!(text.contains("energy: 0.00E+00 1.00E+36"));
        assert!(text.ends_with("voxels: 2 (2 rows)"));
    }
}
