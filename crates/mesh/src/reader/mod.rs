//! Reader for meshtal files
//!
//! All functions are re-exported to the crate root for easy access.
//!
//! # Quickstart
//!
//! The simplest methods for reading meshes from a meshtal file are the
//! convenience functions:
//!
//! ```rust, no_run
//! # use mctools_mesh::{read_meshtal, read_meshtal_target, MeshGrid};
//! // Extract all meshes from a file into a Vec<MeshGrid>
//! let mesh_list = read_meshtal("/path/to/meshtal.msht").unwrap();
//!
//! // Extract just one target mesh from a file into a single MeshGrid
//! let mesh = read_meshtal_target("/path/to/meshtal.msht", 214).unwrap();
//! ```
//!
//! Under the hood these initialise the [MeshtalReader]. This is made public for
//! fine control if needed, but the convenience functions are the preferred API
//! for this module.
//!
//! ```rust, no_run
//! # use mctools_mesh::reader::MeshtalReader;
//! let mut reader = MeshtalReader::new();
//! reader.disable_progress(); // disable the progress bar
//! reader.set_target_id(214); // choose a specific tally
//!
//! let mesh_list = reader.parse("/path/to/meshtal.msht").unwrap();
//! ```
//!
//! # Implementation overview
//!
//! Files are read line-by-line using a buffered input stream so that, at most,
//! a single line is held in memory. Every line is classified once and handed
//! to the mesh currently being built.
//!
//! - `Mesh Tally Number` closes any open mesh and starts a new one
//! - `<particle> mesh tally.` sets the particle
//! - `X|Y|Z direction:` sets the bounds and derives the midpoints
//! - `Energy|Time bin boundaries:` keep the literal labels
//! - the column header fixes the layout of every following data row
//!
//! Only the column-format (`out=col`) layouts are supported:
//!
//! | Header                                        | Layout                  |
//! | --------------------------------------------- | ----------------------- |
//! | `X  Y  Z  Result  Rel Error`                  | [ColumnLayout::Position]|
//! | `Energy  X  Y  Z  Result  Rel Error`          | [ColumnLayout::Energy]  |
//! | `Time  X  Y  Z  Result  Rel Error`            | [ColumnLayout::Time]    |
//!
//! Anything else, such as the extra volume columns of `cf` output, is an
//! [Error::UnsupportedColumnLayout](crate::Error::UnsupportedColumnLayout).
//!
//! # Formatting notes
//!
//! **Time meshes drop the `Total` and zero time rows**
//!
//! > The `Total` rows and rows at a time of exactly zero are not kept for the
//! > time layout. Energy meshes keep their `Total` rows as [Group::Total].
//!
//! **Broken exponential formatting is handled**
//!
//! > For example, `1.00+002` is recognised and parsed as `1.00E+002` as though
//! > the missing exponent character is there.
//!
//! [ColumnLayout::Position]: crate::ColumnLayout::Position
//! [ColumnLayout::Energy]: crate::ColumnLayout::Energy
//! [ColumnLayout::Time]: crate::ColumnLayout::Time
//! [Group::Total]: crate::Group::Total

// reader modules
mod meshtal;

// re-exports for clean API + documentation
#[doc(inline)]
pub use meshtal::MeshtalReader;

// library imports
use crate::error::{Error, Result};
use crate::MeshGrid;

// external crates
use mctools_scan::{classify, Line};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read all meshes in a meshtal file
///
/// Returns a result containing a vector of [MeshGrid] structs extracted from
/// the file at `path` by the parser.
///
/// Example
/// ```rust, no_run
/// # use mctools_mesh::{MeshGrid, read_meshtal};
/// // Read every mesh contained in the file
/// let mesh_tallies: Vec<MeshGrid> = read_meshtal("path/to/meshtal.msht").unwrap();
/// ```
pub fn read_meshtal<P: AsRef<Path>>(path: P) -> Result<Vec<MeshGrid>> {
    let mut reader = MeshtalReader::new();
    reader.disable_progress();
    reader.parse(path)
}

/// Read only the specified mesh from a meshtal file
///
/// Returns a result of the targeted [MeshGrid] if it was successfully
/// extracted from the file at `path`. Reading stops as soon as the mesh is
/// complete.
///
/// Example
/// ```rust, no_run
/// # use mctools_mesh::{MeshGrid, read_meshtal_target};
/// // Read only tally 214 (i.e. FMESH214) from the file
/// let mesh: MeshGrid = read_meshtal_target("path/to/meshtal.msht", 214).unwrap();
/// ```
pub fn read_meshtal_target<P: AsRef<Path>>(path: P, target: u32) -> Result<MeshGrid> {
    let mut reader = MeshtalReader::new();
    reader.disable_progress();
    reader.set_target_id(target);
    reader
        .parse(path)?
        .into_iter()
        .next()
        .ok_or(Error::MeshNotFound(target))
}

/// Map every mesh id to the 0-based line index of its header
///
/// This is a lightweight pass over the file that only looks for the
/// `Mesh Tally Number` markers.
///
/// ```rust, no_run
/// # use mctools_mesh::mesh_index;
/// let index = mesh_index("path/to/meshtal.msht").unwrap();
/// println!("Mesh ids: {:?}", index.keys());
/// ```
pub fn mesh_index<P: AsRef<Path>>(path: P) -> Result<BTreeMap<u32, usize>> {
    let mut index = BTreeMap::new();
    for (i, line) in file_lines(path.as_ref())?.enumerate() {
        if let Line::MeshHeader(id) = classify(&line?) {
            index.insert(id, i);
        }
    }
    Ok(index)
}

/// Start of the next mesh id in sorted order
///
/// `None` for the last mesh, or any id that is not in the index.
///
/// ```rust
/// # use mctools_mesh::next_mesh_start;
/// # use std::collections::BTreeMap;
/// let index = BTreeMap::from([(4, 10), (14, 500), (24, 90)]);
/// assert_eq!(next_mesh_start(&index, 4), Some(500));
/// assert_eq!(next_mesh_start(&index, 14), Some(90));
/// assert_eq!(next_mesh_start(&index, 24), None);
/// assert_eq!(next_mesh_start(&index, 5), None);
/// ```
pub fn next_mesh_start(index: &BTreeMap<u32, usize>, id: u32) -> Option<usize> {
    if !index.contains_key(&id) {
        return None;
    }
    index
        .range((std::ops::Bound::Excluded(id), std::ops::Bound::Unbounded))
        .next()
        .map(|(_, start)| *start)
}

/// Lines of a file with any invalid UTF-8 replaced
pub(crate) fn file_lines(path: &Path) -> Result<impl Iterator<Item = std::io::Result<String>>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(reader.split(b'\n').map(|bytes| {
        bytes.map(|b| {
            let mut line = String::from_utf8_lossy(&b).into_owned();
            if line.ends_with('\r') {
                line.pop();
            }
            line
        })
    }))
}
