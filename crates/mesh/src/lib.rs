//! Mesh tally parsing, queries and arithmetic
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod grid;
mod group;
mod query;
mod voxel;

pub mod reader;

// inline important the mesh-related modules for a nice public API
#[doc(inline)]
pub use reader::{mesh_index, next_mesh_start, read_meshtal, read_meshtal_target};

#[doc(inline)]
pub use grid::{ColumnLayout, DerivedColumn, MeshGrid};

#[doc(inline)]
pub use group::Group;

#[doc(inline)]
pub use query::{Plane, Slice};

#[doc(inline)]
pub use voxel::Voxel;

#[doc(inline)]
pub use error::{Error, Result};
