//! Writers for extracted results

// crate modules
use crate::error::Result;
use crate::{OutputFile, TallyRecord};

// external crates
use log::info;
use mctools_utils::f;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Write raw tally lines to `<prefix><number>.txt`
///
/// Typically used with [tally_text()](crate::tally_text) to keep a copy of a
/// single tally printout. The path written is returned.
///
/// ```rust, no_run
/// # use mctools_output::{tally_text, write_tally_lines};
/// let lines = tally_text("path/to/outp", 14).unwrap();
/// let path = write_tally_lines(&lines, "results/tally_", 14).unwrap();
/// assert_eq!(path.to_str(), Some("results/tally_14.txt"));
/// ```
pub fn write_tally_lines<S: AsRef<str>>(lines: &[S], prefix: &str, number: u32) -> Result<PathBuf> {
    let path = PathBuf::from(f!("{prefix}{number}.txt"));
    let mut writer = init_writer(&path)?;

    for line in lines {
        writeln!(writer, "{}", line.as_ref())?;
    }

    writer.flush()?;
    info!("Tally {number} written to {}", path.display());
    Ok(path)
}

/// Write everything read from an output file to JSON
///
/// ```rust, no_run
/// # use mctools_output::{read_output, write_json};
/// let outp = read_output("path/to/outp").unwrap();
/// write_json(&outp, "outp.json").unwrap();
/// ```
pub fn write_json<P: AsRef<Path>>(output: &OutputFile, path: P) -> Result<()> {
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, output)?;
    Ok(())
}

/// Write a single tally record to JSON
pub fn write_tally_json<P: AsRef<Path>>(tally: &TallyRecord, path: P) -> Result<()> {
    let writer = init_writer(path)?;
    serde_json::to_writer_pretty(writer, tally)?;
    Ok(())
}

/// Initialise a writer from anything that can be turned into a path
fn init_writer<P: AsRef<Path>>(path: P) -> Result<BufWriter<File>> {
    let file = File::create(path)?;
    Ok(BufWriter::new(file))
}
