//! Result and Error types for mctools-mesh

use crate::grid::ColumnLayout;

/// Type alias for Result<T, mesh::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mctools-mesh` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to serialise mesh data")]
    SerdeError(#[from] serde_json::Error),

    #[error("failed operation on mesh values")]
    UtilsError(#[from] mctools_utils::Error),

    #[error("failed to initialise progress bar: {0}")]
    ProgressBarError(String),

    #[error("mesh {id} has an unsupported column layout \"{header}\"")]
    UnsupportedColumnLayout { id: u32, header: String },

    #[error("mesh {0} not found")]
    MeshNotFound(u32),

    #[error("mesh {id} failed to parse \"{text}\" on line {line}")]
    MalformedRow { id: u32, line: usize, text: String },

    #[error("lines may only vary along a single axis")]
    UnsupportedLine,

    #[error("plane \"{0}\" not recognised, expected XY, XZ, or YZ")]
    UnknownPlane(String),

    #[error("{dimension} bounds are not equal")]
    BoundsMismatch { dimension: String },

    #[error("column layouts are not equal ({left} != {right})")]
    LayoutMismatch {
        left: ColumnLayout,
        right: ColumnLayout,
    },

    #[error("inconsistent number of rows (expected {expected}, found {found})")]
    RowCountMismatch { expected: usize, found: usize },

    #[error("mesh {0} has no energy or time column to filter on")]
    NoGroupColumn(u32),
}
