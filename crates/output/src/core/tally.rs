use std::collections::BTreeMap;
use std::fmt;

use ndarray::ArrayD;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use mctools_utils::{f, ValueExt};

/// Results of a single standard tally
///
/// One record is kept per tally number. If the same tally is printed more than
/// once in an output file the last printout is the one kept.
///
/// ### Result shape
///
/// The rank of `result` and `err` follows the binning that was printed:
///
/// | Binning             | Shape                |
/// | ------------------- | -------------------- |
/// | none                | `(regions,)`         |
/// | energy *or* time    | `(n,)`               |
/// | energy *and* time   | `(n, m)`             |
///
/// A leading region axis is only added to binned tallies when more than one
/// region was printed, e.g. a cell tally over two cells with 14 energy bins
/// has shape `(2, 14)`.
///
/// Any `total` bin is kept as the last entry of `eng` or `times`.
///
/// ### Supported tallies
///
/// | Type | Tally Description                  |
/// | ---- | ---------------------------------- |
/// | 1    | Integrated surface current         |
/// | 2    | Surface flux                       |
/// | 4    | Cell flux                          |
/// | 5    | Flux at a point or ring detector   |
/// | 6    | Cell energy deposition             |
/// | 7    | Cell fission energy deposition     |
/// | 8    | Pulse height tally                 |
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TallyRecord {
    /// Tally number
    pub number: u32,
    /// Tally type, e.g. `4` for cell flux
    pub tally_type: u32,
    /// Particle description, e.g. "photons"
    pub particle: String,
    /// Number of histories at the time of the printout
    pub nps: u64,
    /// Energy bin labels
    pub eng: Option<Vec<String>>,
    /// Time bin labels
    pub times: Option<Vec<String>>,
    /// User bin labels
    pub user_bins: Option<Vec<String>>,
    /// Angle bin labels
    pub ang_bins: Option<Vec<String>>,
    /// Tally results
    pub result: ArrayD<f64>,
    /// Relative errors on the tally results
    pub err: ArrayD<f64>,
    /// Cell identifiers
    pub cells: Option<Vec<String>>,
    /// Surface identifiers
    pub surfaces: Option<Vec<String>>,
    /// Volumes, areas, or masses used to normalise the results
    pub vols: Option<Vec<String>>,
    /// Point detector data for type 5 tallies
    pub detector: Option<Detector>,
}

impl TallyRecord {
    /// Shape of the result and error arrays
    pub fn shape(&self) -> &[usize] {
        self.result.shape()
    }

    /// Absolute errors on the tally results
    pub fn absolute_error(&self) -> ArrayD<f64> {
        &self.result * &self.err
    }

    /// Check if the tally was binned in both energy and time
    pub fn is_dual_binned(&self) -> bool {
        self.eng.is_some() && self.times.is_some()
    }

    /// Pretty JSON representation of the record
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl fmt::Display for TallyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shape = self
            .shape()
            .iter()
            .map(|n| f!("{n}"))
            .collect::<Vec<String>>()
            .join("x");

        writeln!(f, "Tally {} (type {}, {})", self.number, self.tally_type, self.particle)?;
        writeln!(f, "  nps    : {}", self.nps)?;
        writeln!(f, "  shape  : ({shape})")?;

        // only really useful for single valued tallies
        if let (Some(value), Some(error)) = (self.result.iter().last(), self.err.iter().last()) {
            write!(f, "  last   : {} +/- {:.4}", value.sci(5, 2), error)?;
        }

        Ok(())
    }
}

/// Point detector data for type 5 tallies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Detector {
    /// Detector x coordinate
    pub x: f64,
    /// Detector y coordinate
    pub y: f64,
    /// Detector z coordinate
    pub z: f64,
    /// Largest single score
    pub largest_score: f64,
    /// History number of the largest score
    pub largest_score_nps: u64,
    /// Average tally per history
    pub average_per_history: f64,
    /// Counts for every miss category, zero if not printed
    pub misses: BTreeMap<MissCategory, u64>,
}

impl Default for Detector {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            z: 0.0,
            largest_score: 0.0,
            largest_score_nps: 0,
            average_per_history: 0.0,
            misses: MissCategory::ALL.iter().map(|m| (*m, 0)).collect(),
        }
    }
}

impl Detector {
    /// Count for a miss category
    pub fn misses(&self, category: MissCategory) -> u64 {
        self.misses.get(&category).copied().unwrap_or_default()
    }
}

/// Reasons a point detector contribution was not scored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MissCategory {
    #[serde(rename = "russian roulette on pd")]
    RussianRouletteOnPd,
    #[serde(rename = "psc=0")]
    PscZero,
    #[serde(rename = "russian roulette in transmission")]
    RussianRouletteInTransmission,
    #[serde(rename = "underflow in transmission")]
    UnderflowInTransmission,
    #[serde(rename = "hit a zero-importance cell")]
    ZeroImportanceCell,
    #[serde(rename = "energy cutoff")]
    EnergyCutoff,
}

impl MissCategory {
    /// Every category in print order
    pub const ALL: [MissCategory; 6] = [
        Self::RussianRouletteOnPd,
        Self::PscZero,
        Self::RussianRouletteInTransmission,
        Self::UnderflowInTransmission,
        Self::ZeroImportanceCell,
        Self::EnergyCutoff,
    ];

    /// Label as printed in the output file
    pub fn label(&self) -> &'static str {
        match self {
            Self::RussianRouletteOnPd => "russian roulette on pd",
            Self::PscZero => "psc=0",
            Self::RussianRouletteInTransmission => "russian roulette in transmission",
            Self::UnderflowInTransmission => "underflow in transmission",
            Self::ZeroImportanceCell => "hit a zero-importance cell",
            Self::EnergyCutoff => "energy cutoff",
        }
    }

    /// Find the category for a printed label
    ///
    /// Case and whitespace are ignored, and the trailing `.` of `psc=0.` is
    /// dropped.
    ///
    /// ```rust
    /// # use mctools_output::MissCategory;
    /// assert_eq!(MissCategory::from_label("psc=0."), Some(MissCategory::PscZero));
    /// assert_eq!(
    ///     MissCategory::from_label("  Underflow   in transmission"),
    ///     Some(MissCategory::UnderflowInTransmission)
    /// );
    /// assert_eq!(MissCategory::from_label("energy"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label
            .split_whitespace()
            .collect::<Vec<&str>>()
            .join(" ")
            .to_lowercase();
        let label = label.strip_suffix('.').unwrap_or(&label);

        Self::ALL.into_iter().find(|m| m.label() == label)
    }
}

impl fmt::Display for MissCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
