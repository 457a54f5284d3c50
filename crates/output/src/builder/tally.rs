// crate modules
use crate::core::{Detector, TallyRecord};
use crate::error::{Error, Result};
use crate::parsers::{self, Region};

// mctools modules
use mctools_scan::{number, tokens, ColumnKind, Line};
use mctools_utils::f;

// external crates
use log::{debug, trace, warn};
use ndarray::{ArrayD, IxDyn};

/// Progress through a single tally printout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stage {
    AwaitingHeader,
    ReadingMetadata,
    ReadingResultRows,
}

/// Which bins the rows of a slab run over
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RowAxis {
    Energy,
    Time,
}

impl RowAxis {
    fn name(&self) -> &'static str {
        match self {
            RowAxis::Energy => "energy",
            RowAxis::Time => "time",
        }
    }
}

/// Normalisation list printed under `volumes`, `areas` or `masses`
#[derive(Debug, Clone, Copy, PartialEq)]
enum Normalisation {
    Closed,
    AwaitingIds,
    AwaitingValues(usize),
}

/// One row of results, with a value/error pair per column
#[derive(Debug, Default)]
struct Row {
    label: Option<String>,
    pairs: Vec<(f64, f64)>,
}

/// Results printed under a single region, user bin, or angle bin header
#[derive(Debug, Default)]
struct Slab {
    rows: Vec<Row>,
    /// Time columns for energy and time binned tallies
    times: Vec<String>,
    /// Width of the current chunk of time columns
    chunk_width: usize,
    /// Row position within the current chunk
    chunk_row: usize,
}

impl Slab {
    fn is_dual(&self) -> bool {
        !self.times.is_empty()
    }
}

/// Assembles a [TallyRecord] from the classified lines of one printout
///
/// Lines are pushed one at a time from the tally header until the block is
/// closed by the reader, at which point [finish()](TallyBuilder::finish)
/// resolves the shape of the result arrays.
#[derive(Debug)]
pub(crate) struct TallyBuilder {
    stage: Stage,
    number: u32,
    nps: u64,
    tally_type: Option<u32>,
    particle: String,
    normalisation: Normalisation,
    region: Option<Region>,
    cells: Vec<String>,
    surfaces: Vec<String>,
    vols: Vec<String>,
    user_bins: Vec<String>,
    ang_bins: Vec<String>,
    detector: Option<Detector>,
    located: bool,
    axis: Option<RowAxis>,
    slabs: Vec<Slab>,
}

impl Default for TallyBuilder {
    fn default() -> Self {
        Self {
            stage: Stage::AwaitingHeader,
            number: 0,
            nps: 0,
            tally_type: None,
            particle: String::new(),
            normalisation: Normalisation::Closed,
            region: None,
            cells: Vec::new(),
            surfaces: Vec::new(),
            vols: Vec::new(),
            user_bins: Vec::new(),
            ang_bins: Vec::new(),
            detector: None,
            located: false,
            axis: None,
            slabs: Vec::new(),
        }
    }
}

// ! ------------------------------------------------------------------------
// !                               Crate API
// ! ------------------------------------------------------------------------

impl TallyBuilder {
    pub(crate) fn new() -> Self {
        Default::default()
    }

    /// Tally number, zero until the header is read
    pub(crate) fn number(&self) -> u32 {
        self.number
    }

    pub(crate) fn stage(&self) -> Stage {
        self.stage
    }

    /// Feed the next line of the printout to the builder
    ///
    /// `line` is the 1-based line number used for error context.
    pub(crate) fn push(&mut self, line: usize, raw: &str, event: &Line) -> Result<()> {
        match (self.stage, event) {
            (Stage::AwaitingHeader, Line::TallyHeader { number, nps }) => {
                debug!("---------------------");
                debug!(" Parsing Tally block ");
                debug!("---------------------");
                debug!("Tally       = {number}");
                debug!("nps         = {nps}");
                self.number = *number;
                self.nps = *nps;
                self.stage = Stage::ReadingMetadata;
            }
            (Stage::AwaitingHeader, _) => (),
            (_, Line::TallyHeader { .. }) => {
                return Err(Error::ParseError(f!(
                    "tally {} still open at line {line}",
                    self.number
                )))
            }
            (_, Line::ColumnHeader(kind)) => self.column_header(line, raw, *kind)?,
            (_, Line::TimeColumns(labels)) => self.time_columns(labels),
            (_, Line::DataRow(values)) => self.data_row(line, raw, values)?,
            (_, Line::Blank) => (),
            _ => self.metadata(line, raw)?,
        }

        Ok(())
    }

    /// Close the block and assemble the record
    pub(crate) fn finish(self) -> Result<TallyRecord> {
        let number = self.number;

        if self.normalisation != Normalisation::Closed {
            warn!("Tally {number} normalisation list incomplete");
        }

        let tally_type = self.tally_type.unwrap_or_else(|| {
            warn!("Tally {number} has no tally type, set to 0");
            0
        });

        let (eng, times) = self.bin_labels()?;
        let (result, err) = self.result_arrays(&eng, &times)?;

        if result.shape() != err.shape() {
            return Err(Error::ShapeMismatch {
                tally: number,
                result: result.shape().to_vec(),
                err: err.shape().to_vec(),
            });
        }

        debug!("Shape       = {:?}", result.shape());

        // type 5 always carries detector data, even if none was printed
        let detector = match (tally_type, self.detector) {
            (5, None) => Some(Detector::default()),
            (_, detector) => detector,
        };

        Ok(TallyRecord {
            number,
            tally_type,
            particle: self.particle,
            nps: self.nps,
            eng,
            times,
            user_bins: non_empty(self.user_bins),
            ang_bins: non_empty(self.ang_bins),
            result,
            err,
            cells: non_empty(self.cells),
            surfaces: non_empty(self.surfaces),
            vols: non_empty(self.vols),
            detector,
        })
    }
}

// ! ------------------------------------------------------------------------
// !                           Line processing
// ! ------------------------------------------------------------------------

impl TallyBuilder {
    fn malformed(&self, line: usize, raw: &str) -> Error {
        Error::MalformedTallyLine {
            tally: self.number,
            line,
            text: raw.trim().to_string(),
        }
    }

    /// Last slab, making an implicit one for tallies printed without a header
    fn current_slab(&mut self) -> &mut Slab {
        if self.slabs.is_empty() {
            self.slabs.push(Slab::default());
        }
        let last = self.slabs.len() - 1;
        &mut self.slabs[last]
    }

    fn column_header(&mut self, line: usize, raw: &str, kind: ColumnKind) -> Result<()> {
        let axis = match kind {
            ColumnKind::Energy => RowAxis::Energy,
            ColumnKind::Time => RowAxis::Time,
            _ => return Err(self.malformed(line, raw)),
        };

        match self.axis {
            Some(current) if current != axis => Err(self.malformed(line, raw)),
            _ => {
                trace!("Rows binned in {}", axis.name());
                self.axis = Some(axis);
                Ok(())
            }
        }
    }

    fn time_columns(&mut self, labels: &[&str]) {
        trace!("Time columns {labels:?}");
        let slab = self.current_slab();
        slab.times.extend(labels.iter().map(|l| l.to_string()));
        slab.chunk_width = labels.len();
        slab.chunk_row = 0;
    }

    fn data_row(&mut self, line: usize, raw: &str, values: &[&str]) -> Result<()> {
        // values following a normalisation list may span several tokens
        if let Normalisation::AwaitingValues(_) = self.normalisation {
            self.normalisation_values(line, raw, values)?;
            return Ok(());
        }

        self.stage = Stage::ReadingResultRows;

        let axis = self.axis;
        let dual = self.current_slab().is_dual();
        let (label, numbers) = match (axis, dual) {
            (_, true) | (Some(_), false) => match values.split_first() {
                Some((label, numbers)) => (Some(label.to_string()), numbers),
                None => return Err(self.malformed(line, raw)),
            },
            (None, false) => (None, values),
        };

        let pairs = value_pairs(numbers).ok_or_else(|| self.malformed(line, raw))?;

        if dual {
            self.dual_row(line, raw, label, pairs)
        } else if pairs.len() != 1 {
            Err(self.malformed(line, raw))
        } else {
            trace!("{label:?} => {pairs:?}");
            self.current_slab().rows.push(Row { label, pairs });
            Ok(())
        }
    }

    /// Rows of each chunk extend the matching row of the first chunk
    fn dual_row(
        &mut self,
        line: usize,
        raw: &str,
        label: Option<String>,
        pairs: Vec<(f64, f64)>,
    ) -> Result<()> {
        let error = self.malformed(line, raw);
        let slab = self.current_slab();

        if pairs.len() != slab.chunk_width {
            return Err(error);
        }

        // first chunk creates the rows
        let first_chunk = slab.times.len() == slab.chunk_width;
        match slab.rows.get_mut(slab.chunk_row) {
            Some(row) if !first_chunk => {
                if row.label != label {
                    return Err(error);
                }
                row.pairs.extend(pairs);
            }
            None if first_chunk => slab.rows.push(Row { label, pairs }),
            _ => return Err(error),
        }

        slab.chunk_row += 1;
        Ok(())
    }

    /// Anything that is not a result row or column header
    fn metadata(&mut self, line: usize, raw: &str) -> Result<()> {
        match self.normalisation {
            Normalisation::AwaitingIds => {
                if let Ok((_, (region, ids))) = parsers::normalisation_ids(raw) {
                    self.normalisation_ids(region, &ids);
                    return Ok(());
                }
            }
            Normalisation::AwaitingValues(_) => {
                let values = tokens(raw);
                if !values.is_empty() && values.iter().all(|v| number(v).is_some()) {
                    return self.normalisation_values(line, raw, &values);
                }
            }
            Normalisation::Closed => (),
        }

        if let Ok((_, tally_type)) = parsers::tally_type(raw) {
            debug!("Type        = {tally_type}");
            self.tally_type = Some(tally_type);
        } else if let Ok((_, particle)) = parsers::particles(raw) {
            debug!("Particle    = {particle}");
            self.particle = particle.to_string();
        } else if parsers::is_normalisation(raw) {
            self.normalisation = Normalisation::AwaitingIds;
        } else if let Ok((_, [x, y, z])) = parsers::detector_location(raw) {
            debug!("Detector    = [{x}, {y}, {z}]");
            self.stage = Stage::ReadingResultRows;
            self.open_slab();
            // only the first detector location is kept
            let detector = self.detector.get_or_insert_with(Detector::default);
            if !self.located {
                (detector.x, detector.y, detector.z) = (x, y, z);
                self.located = true;
            }
        } else if let Ok((_, (score, nps))) = parsers::largest_score(raw) {
            let detector = self.detector.get_or_insert_with(Detector::default);
            detector.largest_score = score;
            detector.largest_score_nps = nps;
        } else if let Ok((_, average)) = parsers::average_per_history(raw) {
            let detector = self.detector.get_or_insert_with(Detector::default);
            detector.average_per_history = average;
        } else if let Some((category, count)) = parsers::miss_count(raw) {
            trace!("Misses {category} = {count}");
            let detector = self.detector.get_or_insert_with(Detector::default);
            detector.misses.insert(category, count);
        } else {
            self.slab_header(raw);
        }

        Ok(())
    }

    /// Region, user bin, and angle bin headers start a new slab
    fn slab_header(&mut self, raw: &str) {
        let words = tokens(raw);
        let is = |i: usize, tag: &str| words.get(i).is_some_and(|w| w.eq_ignore_ascii_case(tag));

        if words.len() < 2 {
            return;
        }

        let rest = |from: usize| words[from..].join(" ");

        if is(0, "cell") {
            // normalisation lists already give the identifiers
            if self.region != Some(Region::Cell) {
                self.cells.push(rest(1));
            }
        } else if is(0, "surface") {
            if self.region != Some(Region::Surface) {
                self.surfaces.push(rest(1));
            }
        } else if is(0, "user") && is(1, "bin") && words.len() > 2 {
            self.user_bins.push(rest(2));
        } else if is(0, "angle") && is(1, "bin") && words.len() > 2 {
            self.ang_bins.push(rest(2));
        } else {
            trace!("Skipped: {}", raw.trim());
            return;
        }

        trace!("New slab: {}", raw.trim());
        self.stage = Stage::ReadingResultRows;
        self.open_slab();
    }

    /// Start a new slab unless the last one has nothing in it yet
    ///
    /// Nested headers such as a user bin under a cell only give one slab.
    fn open_slab(&mut self) {
        match self.slabs.last() {
            Some(slab) if slab.rows.is_empty() && slab.times.is_empty() => (),
            _ => self.slabs.push(Slab::default()),
        }
    }

    fn normalisation_ids(&mut self, region: Region, ids: &[&str]) {
        let ids: Vec<String> = ids.iter().map(|s| s.to_string()).collect();
        debug!("{region:?} ids  = {ids:?}");

        self.normalisation = Normalisation::AwaitingValues(ids.len());
        self.region = Some(region);
        match region {
            Region::Cell => self.cells.extend(ids),
            Region::Surface => self.surfaces.extend(ids),
        }
    }

    fn normalisation_values(&mut self, line: usize, raw: &str, values: &[&str]) -> Result<()> {
        let Normalisation::AwaitingValues(expected) = self.normalisation else {
            return Ok(());
        };

        self.vols.extend(values.iter().map(|v| v.to_string()));
        debug!("Norm values = {:?}", self.vols);

        match self.vols.len() {
            n if n == expected => self.normalisation = Normalisation::Closed,
            n if n > expected => {
                return Err(Error::InconsistentBins {
                    tally: self.number,
                    dimension: f!("normalisation (line {line}: {})", raw.trim()),
                    expected,
                    found: n,
                })
            }
            _ => (),
        }

        Ok(())
    }
}

// ! ------------------------------------------------------------------------
// !                          Record assembly
// ! ------------------------------------------------------------------------

impl TallyBuilder {
    /// Energy and time labels, checking every slab agrees
    fn bin_labels(&self) -> Result<(Option<Vec<String>>, Option<Vec<String>>)> {
        let Some(first) = self.slabs.first() else {
            return Ok((None, None));
        };

        for slab in &self.slabs {
            self.check_slab(first, slab)?;
        }

        let row_labels = || -> Vec<String> {
            first
                .rows
                .iter()
                .map(|r| r.label.clone().unwrap_or_default())
                .collect()
        };

        Ok(match (self.axis, first.is_dual()) {
            (_, true) => (Some(row_labels()), Some(first.times.clone())),
            (Some(RowAxis::Energy), false) => (Some(row_labels()), None),
            (Some(RowAxis::Time), false) => (None, Some(row_labels())),
            (None, false) => (None, None),
        })
    }

    fn check_slab(&self, first: &Slab, slab: &Slab) -> Result<()> {
        let dimension = self.axis.map(|a| a.name()).unwrap_or("result");

        // unbinned tallies have a single result per slab
        let expected_rows = match (self.axis, first.is_dual()) {
            (None, false) => 1,
            _ => first.rows.len(),
        };

        if slab.rows.len() != expected_rows {
            return Err(Error::InconsistentBins {
                tally: self.number,
                dimension: dimension.to_string(),
                expected: expected_rows,
                found: slab.rows.len(),
            });
        }

        let expected_columns = first.times.len().max(1);
        for row in &slab.rows {
            if row.pairs.len() != expected_columns {
                return Err(Error::InconsistentBins {
                    tally: self.number,
                    dimension: "time".to_string(),
                    expected: expected_columns,
                    found: row.pairs.len(),
                });
            }
        }

        Ok(())
    }

    /// Flatten every slab into arrays following the shape rule
    fn result_arrays(
        &self,
        eng: &Option<Vec<String>>,
        times: &Option<Vec<String>>,
    ) -> Result<(ArrayD<f64>, ArrayD<f64>)> {
        let mut shape = Vec::with_capacity(3);
        if self.slabs.len() > 1 || (eng.is_none() && times.is_none()) {
            shape.push(self.slabs.len());
        }
        if let Some(e) = eng {
            shape.push(e.len());
        }
        if let Some(t) = times {
            shape.push(t.len());
        }

        let (values, errors): (Vec<f64>, Vec<f64>) = self
            .slabs
            .iter()
            .flat_map(|slab| slab.rows.iter())
            .flat_map(|row| row.pairs.iter().copied())
            .unzip();

        let result = ArrayD::from_shape_vec(IxDyn(&shape), values);
        let err = ArrayD::from_shape_vec(IxDyn(&shape), errors);

        match (result, err) {
            (Ok(result), Ok(err)) => Ok((result, err)),
            (result, err) => Err(Error::ShapeMismatch {
                tally: self.number,
                result: result.map(|r| r.shape().to_vec()).unwrap_or(shape.clone()),
                err: err.map(|e| e.shape().to_vec()).unwrap_or(shape),
            }),
        }
    }
}

/// Check for any line that ends a tally printout
///
/// New tally or table headers, page breaks with `1` in the first column, and
/// `=====` separators all close the block.
pub(crate) fn closes_block(raw: &str, event: &Line) -> bool {
    matches!(event, Line::TallyHeader { .. } | Line::TableHeader { .. })
        || raw.starts_with('1')
        || raw.trim_start().starts_with("=====")
}

/// Pair up value and error tokens
fn value_pairs(tokens: &[&str]) -> Option<Vec<(f64, f64)>> {
    if tokens.is_empty() || tokens.len() % 2 != 0 {
        return None;
    }

    tokens
        .chunks_exact(2)
        .map(|pair| Some((number(pair[0])?, number(pair[1])?)))
        .collect()
}

fn non_empty(list: Vec<String>) -> Option<Vec<String>> {
    if list.is_empty() {
        None
    } else {
        Some(list)
    }
}
