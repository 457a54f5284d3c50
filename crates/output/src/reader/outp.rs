// crate modules
use crate::builder::{closes_block, TableBuilder, TallyBuilder};
use crate::core::TallyRecord;
use crate::error::{Error, Result};
use crate::reader::{file_lines, TallyIndex};
use crate::OutputFile;

// external crates
use kdam::{Bar, BarBuilder, BarExt};
use log::{debug, info, warn};
use mctools_scan::{classify, Line};
use std::path::Path;

/// Parses MCNP output files line by line
///
/// The reader owns the [OutputFile] under construction and any tally or print
/// table printout still open. Prefer the [read_output()](crate::read_output)
/// convenience function unless the progress bar is wanted.
#[derive(Debug, Default)]
pub struct OutputReader {
    /// Results under construction
    output: OutputFile,
    /// Where each tally was last printed
    index: TallyIndex,
    /// Currently open tally printout
    tally: Option<TallyBuilder>,
    /// Currently open print table
    table: Option<TableBuilder>,
    /// Hide the progress bar
    disable_progress: bool,
}

impl OutputReader {
    /// Initialise a new reader with the progress bar enabled
    pub fn new() -> Self {
        Default::default()
    }

    /// Do not display a progress bar while reading
    pub fn disable_progress(&mut self) {
        self.disable_progress = true;
    }

    /// Tally index from the pre-pass of the last parse
    pub fn index(&self) -> &TallyIndex {
        &self.index
    }

    /// Parse the output file at `path`
    ///
    /// Any state left from a previous parse is cleared first, so the reader
    /// may be reused.
    pub fn parse<P: AsRef<Path>>(&mut self, path: P) -> Result<OutputFile> {
        let path = path.as_ref();
        *self = Self {
            disable_progress: self.disable_progress,
            ..Default::default()
        };
        info!("Parsing {}", path.display());

        // lightweight pre-pass for where each tally was last printed
        self.index = TallyIndex::from_file(path)?;
        debug!("Indexed tallies {:?}", self.index.numbers());

        let mut progress_bar = self.init_progress_bar()?;
        if !self.disable_progress {
            progress_bar.refresh()?;
        }

        for (i, line) in file_lines(path)?.enumerate() {
            progress_bar.update(1)?;
            self.process(i, &line?)?;
        }

        self.close_table();
        self.close_tally()?;

        // need an extra line for clean spacing if the progress bar is printed
        if !self.disable_progress {
            eprintln!()
        };

        self.output.num_tallies = self.index.len();
        if self.output.num_tallies != self.output.tally_data.len() {
            warn!(
                "Found {} tally numbers but only {} printouts were read",
                self.output.num_tallies,
                self.output.tally_data.len()
            );
        }

        info!(
            "Found {} tallies and {} print tables",
            self.output.tally_data.len(),
            self.output.tables.len()
        );

        Ok(std::mem::take(&mut self.output))
    }
}

// ! ------------------------------------------------------------------------
// !                           Line processing
// ! ------------------------------------------------------------------------

impl OutputReader {
    /// Handle line index `i` of the file
    fn process(&mut self, i: usize, raw: &str) -> Result<()> {
        let event = classify(raw);
        self.summary(i, &event);

        // tables end on any new header, or the first line after the data
        let table_complete = match (&event, self.table.as_mut()) {
            (Line::TallyHeader { .. } | Line::TableHeader { .. }, Some(_)) => true,
            (_, Some(table)) => !table.push(i + 1, raw),
            (_, None) => false,
        };

        if table_complete {
            self.close_table();
        }

        if self.tally.is_some() && closes_block(raw, &event) {
            self.close_tally()?;
        }

        match event {
            Line::TallyHeader { .. } => {
                let mut builder = TallyBuilder::new();
                builder.push(i + 1, raw, &event)?;
                self.tally = Some(builder);
            }
            Line::TableHeader { number, title } => {
                self.table = Some(TableBuilder::new(number, i + 1, title));
            }
            _ => {
                if let Some(builder) = &mut self.tally {
                    builder.push(i + 1, raw, &event)?;
                }
            }
        }

        Ok(())
    }

    /// Version, comments, warnings, and rendezvous markers
    fn summary(&mut self, i: usize, event: &Line) {
        let output = &mut self.output;
        match event {
            Line::Version(version) if output.version.is_none() => {
                debug!("Version     = {version}");
                output.version = Some(version.to_string());
            }
            Line::Comment(text) => output.comments.push(text.to_string()),
            Line::Warning(text) => output.warnings.push(text.to_string()),
            Line::Rendezvous => {
                output.rendezvous_lines.push(i);
                output.rendezvous_count += 1;
            }
            _ => (),
        }
    }

    fn close_tally(&mut self) -> Result<()> {
        if let Some(builder) = self.tally.take() {
            let tally = builder.finish()?;
            self.store_tally(tally);
        }
        Ok(())
    }

    fn close_table(&mut self) {
        if let Some(builder) = self.table.take() {
            let table = builder.finish();
            if let Some(previous) = self.output.tables.insert(table.number.to_string(), table) {
                debug!("Print table {} replaced by later printout", previous.number);
            }
        }
    }

    /// Later printouts replace earlier ones in the same position
    fn store_tally(&mut self, tally: TallyRecord) {
        match self
            .output
            .tally_data
            .iter_mut()
            .find(|t| t.number == tally.number)
        {
            Some(existing) => {
                debug!(
                    "Tally {} replaced with printout at nps {}",
                    tally.number, tally.nps
                );
                *existing = tally;
            }
            None => self.output.tally_data.push(tally),
        }
    }

    /// Initialise the progress bar, if wanted
    fn init_progress_bar(&self) -> Result<Bar> {
        BarBuilder::default()
            .unit(" lines")
            .unit_scale(true)
            .disable(self.disable_progress)
            .bar_format("{count} lines [{rate} lines/s]   ")
            .build()
            .map_err(Error::ProgressBarError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_from_pre_pass() {
        let mut reader = OutputReader::new();
        reader.disable_progress();
        let output = reader.parse("./data/multi.io").unwrap();

        let index = TallyIndex::from_file("./data/multi.io").unwrap();
        assert_eq!(reader.index(), &index);
        assert_eq!(output.num_tallies, index.len());
        assert_eq!(reader.index().start(14), Some(71));
    }

    #[test]
    fn missing_file() {
        let mut reader = OutputReader::new();
        reader.disable_progress();
        let result = reader.parse("./data/missing.io");
        assert!(matches!(result, Err(Error::IOError(_))));
    }
}
