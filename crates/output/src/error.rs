//! Result and Error types for mctools-output

/// Type alias for Result<T, output::Error>
pub type Result<T> = core::result::Result<T, Error>;

/// The error type for the `mctools-output` crate
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("failed input/output stream")]
    IOError(#[from] std::io::Error),

    #[error("failed to serialise output data")]
    SerdeError(#[from] serde_json::Error),

    #[error("parser failed")]
    ParseError(String),

    #[error("tally {0} not found")]
    TallyNotFound(u32),

    #[error("tally {tally} failed to parse \"{text}\" on line {line}")]
    MalformedTallyLine { tally: u32, line: usize, text: String },

    #[error("tally {tally} has inconsistent {dimension} bins (expected {expected}, found {found})")]
    InconsistentBins {
        tally: u32,
        dimension: String,
        expected: usize,
        found: usize,
    },

    #[error("tally {tally} result shape {result:?} does not match error shape {err:?}")]
    ShapeMismatch {
        tally: u32,
        result: Vec<usize>,
        err: Vec<usize>,
    },

    #[error("failed to initialise progress bar: {0}")]
    ProgressBarError(String),

    #[error("malformed row in print table {table} on line {line}")]
    MalformedTableRow { table: u32, line: usize },
}

// this should really implement nom::error::ParseError<&str> for Error
impl From<nom::Err<nom::error::Error<&str>>> for Error {
    fn from(err: nom::Err<nom::error::Error<&str>>) -> Self {
        Self::ParseError(format!("{err:?}"))
    }
}
