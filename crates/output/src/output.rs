// Crate types
use crate::core::{CellActivity, CellMass, ParticleLimits, PrintTable, TableRecord, TallyRecord};
use crate::error::{Error, Result};
use crate::reader::OutputReader;

// Other libraries
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Data structure to store output file content
///
/// This [OutputFile] is the primary data structure containing the parsed file
/// data. It is built once per parse and everything of interest is public.
///
/// | Field              | Description                                         |
/// | ------------------ | --------------------------------------------------- |
/// | `tally_data`       | one [TallyRecord] per tally number                  |
/// | `tables`           | every print table, keyed by the table number        |
/// | `comments`         | raw `comment.` lines in order                       |
/// | `warnings`         | raw `warning.` lines in order                       |
/// | `num_tallies`      | distinct tally numbers found in the file            |
/// | `rendezvous_count` | number of `master set rendezvous` markers           |
/// | `rendezvous_lines` | 0-based line index of every rendezvous marker       |
/// | `version`          | code name and version, if printed                   |
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputFile {
    /// Collection of tallies in first-seen order
    pub tally_data: Vec<TallyRecord>,
    /// Generic print tables keyed by the table number
    pub tables: BTreeMap<String, PrintTable>,
    /// Raw comment lines
    pub comments: Vec<String>,
    /// Raw warning lines
    pub warnings: Vec<String>,
    /// Number of distinct tally numbers
    pub num_tallies: usize,
    /// Number of rendezvous markers
    pub rendezvous_count: usize,
    /// Line indices of the rendezvous markers
    pub rendezvous_lines: Vec<usize>,
    /// Code name and version, e.g. "MCNP6, 1.0"
    pub version: Option<String>,
}

impl OutputFile {
    /// Create a new empty [OutputFile] with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Read an output file
    ///
    /// Parses the file at `path` into the [OutputFile] data structure for
    /// post-processing. The progress bar is disabled.
    ///
    /// Example
    /// ```rust, no_run
    /// # use mctools_output::OutputFile;
    /// let outp = OutputFile::from_file("path/to/outp").unwrap();
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        info!("Reading {}", path.as_ref().display());
        let mut reader = OutputReader::new();
        reader.disable_progress();
        reader.parse(path)
    }

    /// Find a specific tally
    ///
    /// If the tally exists it is returned as `Some(&TallyRecord)`, otherwise
    /// `None`.
    pub fn get_tally(&self, number: u32) -> Option<&TallyRecord> {
        self.tally_data.iter().find(|tally| tally.number == number)
    }

    /// Sorted list of the tally numbers that were read
    pub fn tally_numbers(&self) -> Vec<u32> {
        let mut numbers: Vec<u32> = self.tally_data.iter().map(|t| t.number).collect();
        numbers.sort();
        numbers
    }

    /// Any print table by number
    pub fn table(&self, number: u32) -> Option<&PrintTable> {
        self.tables.get(&number.to_string())
    }

    /// Typed rows of a known print table
    ///
    /// A table that was never printed gives an empty list. Rows that are too
    /// short or contain text where a number is expected are an error.
    pub fn records<T: TableRecord>(&self) -> Result<Vec<T>> {
        let Some(table) = self.table(T::TABLE) else {
            return Ok(Vec::new());
        };

        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                T::from_row(row).ok_or(Error::MalformedTableRow {
                    table: T::TABLE,
                    line: table.row_lines.get(i).copied().unwrap_or(table.line),
                })
            })
            .collect()
    }

    /// Cell volumes and masses from print table 60
    pub fn cell_masses(&self) -> Result<Vec<CellMass>> {
        self.records()
    }

    /// Particle energy limits from print table 101
    pub fn particle_limits(&self) -> Result<Vec<ParticleLimits>> {
        self.records()
    }

    /// Particle activity in each cell from print table 126
    pub fn cell_activity(&self) -> Result<Vec<CellActivity>> {
        self.records()
    }

    /// Check for a multi-process run
    pub fn is_multiprocess(&self) -> bool {
        self.rendezvous_count > 0
    }

    /// Pretty JSON representation of everything read
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
