//! Tallies, print tables and run summaries from MCNP output files
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod builder;
mod core;
mod error;
mod export;
mod output;
mod parsers;

pub mod reader;

#[doc(inline)]
pub use crate::core::{
    CellActivity, CellMass, Detector, MissCategory, ParticleLimits, PrintTable, TableRecord,
    TallyRecord,
};

#[doc(inline)]
pub use crate::output::OutputFile;

#[doc(inline)]
pub use crate::reader::{
    count_rendezvous, read_comments_warnings, read_output, read_tally, read_version,
    rendezvous_lines, tally_numbers, tally_text, OutputReader, TallyIndex,
};

#[doc(inline)]
pub use crate::export::{write_json, write_tally_json, write_tally_lines};

#[doc(inline)]
pub use crate::error::{Error, Result};
