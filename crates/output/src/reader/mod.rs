//! Readers for MCNP output files
//!
//! All functions are re-exported to the crate root for easy access.
//!
//! # Quickstart
//!
//! The simplest methods for reading an output file are the convenience
//! functions:
//!
//! ```rust, no_run
//! # use mctools_output::{read_output, read_tally, OutputFile, TallyRecord};
//! // Extract everything of interest from the file
//! let outp: OutputFile = read_output("/path/to/outp").unwrap();
//!
//! // Extract just one tally, without reading the rest of the file
//! let tally: TallyRecord = read_tally("/path/to/outp", 14).unwrap();
//! ```
//!
//! Under the hood these initialise the [OutputReader], which is public for
//! fine control over the progress bar.
//!
//! ```rust, no_run
//! # use mctools_output::reader::OutputReader;
//! let mut reader = OutputReader::new();
//! reader.disable_progress();
//! let outp = reader.parse("/path/to/outp").unwrap();
//! ```
//!
//! # Implementation overview
//!
//! Files are read line-by-line through a buffered stream so that only a single
//! line is held in memory. Every line is classified once and then handed to
//! whichever tally or print table printout is currently open.
//!
//! A tally printout is closed by the next tally header, a print table header,
//! a page break (`1` in the first column), a `=====` separator, or the end of
//! the file.
//!
//! Tallies printed more than once keep the last printout, but stay in the
//! position they were first seen.
//!
//! # Summary helpers
//!
//! For text already held in memory, [read_version()], [read_comments_warnings()],
//! [rendezvous_lines()], [count_rendezvous()], and [tally_numbers()] pull out
//! run summary details from any slice of lines.

mod index;
mod outp;
mod summary;

#[doc(inline)]
pub use index::TallyIndex;

#[doc(inline)]
pub use outp::OutputReader;

#[doc(inline)]
pub use summary::{
    count_rendezvous, read_comments_warnings, read_version, rendezvous_lines, tally_numbers,
};

// crate modules
use crate::builder::{closes_block, Stage, TallyBuilder};
use crate::core::TallyRecord;
use crate::error::{Error, Result};
use crate::OutputFile;

// external crates
use log::debug;
use mctools_scan::classify;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Read everything of interest from an output file
///
/// Returns an [OutputFile] with every tally, print table and run summary
/// detail found in the file at `path`.
///
/// Example
/// ```rust, no_run
/// # use mctools_output::read_output;
/// let outp = read_output("path/to/outp").unwrap();
/// println!("{} tallies", outp.num_tallies);
/// ```
pub fn read_output<P: AsRef<Path>>(path: P) -> Result<OutputFile> {
    let mut reader = OutputReader::new();
    reader.disable_progress();
    reader.parse(path)
}

/// Read a single tally from an output file
///
/// Only the last printout of tally `number` is parsed, located through a
/// [TallyIndex] of the file. An absent tally is [Error::TallyNotFound].
///
/// Example
/// ```rust, no_run
/// # use mctools_output::read_tally;
/// let tally = read_tally("path/to/outp", 4).unwrap();
/// println!("{tally}");
/// ```
pub fn read_tally<P: AsRef<Path>>(path: P, number: u32) -> Result<TallyRecord> {
    let (start, lines) = tally_block(path.as_ref(), number)?;
    build_tally(&lines, start)
}

/// Raw text of the last printout of a tally
///
/// Lines run from the tally header up to the start of the next tally number
/// in sorted order, or to the end of the file when the next tally was printed
/// earlier.
///
/// Example
/// ```rust, no_run
/// # use mctools_output::tally_text;
/// let lines = tally_text("path/to/outp", 4).unwrap();
/// assert!(lines[0].starts_with("1tally"));
/// ```
pub fn tally_text<P: AsRef<Path>>(path: P, number: u32) -> Result<Vec<String>> {
    Ok(tally_block(path.as_ref(), number)?.1)
}

/// Start index and lines of the last printout of a tally
fn tally_block(path: &Path, number: u32) -> Result<(usize, Vec<String>)> {
    let index = TallyIndex::from_file(path)?;
    let start = index.start(number).ok_or(Error::TallyNotFound(number))?;
    let end = index.next_start(number).filter(|end| *end > start);
    debug!("Tally {number} spans lines {start}..{end:?}");

    let lines = file_lines(path)?
        .skip(start)
        .take(end.map_or(usize::MAX, |end| end - start))
        .collect::<std::io::Result<Vec<String>>>()?;

    Ok((start, lines))
}

/// Assemble a record from the lines of a single printout
///
/// `offset` is the 0-based index of the first line within the file.
fn build_tally<S: AsRef<str>>(lines: &[S], offset: usize) -> Result<TallyRecord> {
    let mut builder = TallyBuilder::new();

    for (i, raw) in lines.iter().enumerate() {
        let raw = raw.as_ref();
        let event = classify(raw);
        if builder.stage() != Stage::AwaitingHeader && closes_block(raw, &event) {
            break;
        }
        builder.push(offset + i + 1, raw, &event)?;
    }

    match builder.stage() {
        Stage::AwaitingHeader => Err(Error::ParseError(
            "no tally header found in printout".to_string(),
        )),
        _ => builder.finish(),
    }
}

/// Lines of a file with any invalid UTF-8 replaced
///
/// Trailing carriage returns are dropped so that files written on Windows read
/// the same.
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
