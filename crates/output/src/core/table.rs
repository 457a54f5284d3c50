use serde::{Deserialize, Serialize};

/// Raw rows of a print table
///
/// Every table found in the output is kept in this generic form. Rows are the
/// whitespace separated tokens of each data line, which are lines starting
/// with an unsigned integer index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrintTable {
    /// Print table number, e.g. `60`
    pub number: u32,
    /// Line number of the table header (1-based)
    pub line: usize,
    /// Title text preceding `print table`
    pub title: String,
    /// Tokens of every data row
    pub rows: Vec<Vec<String>>,
    /// Line number of every data row (1-based)
    pub row_lines: Vec<usize>,
}

impl PrintTable {
    /// Number of data rows captured
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check for a table without any data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Typed access to the rows of a known print table
pub trait TableRecord: Sized {
    /// Print table number the record is read from
    const TABLE: u32;

    /// Build a record from the tokens of one row
    fn from_row(row: &[String]) -> Option<Self>;
}

/// Row of print table 60, cells
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellMass {
    pub index: u32,
    pub cell: u32,
    pub material: u32,
    pub atom_density: f64,
    pub gram_density: f64,
    pub volume: f64,
    pub mass: f64,
    pub pieces: u32,
}

impl TableRecord for CellMass {
    const TABLE: u32 = 60;

    fn from_row(row: &[String]) -> Option<Self> {
        Some(Self {
            index: row.first()?.parse().ok()?,
            cell: row.get(1)?.parse().ok()?,
            material: row.get(2)?.parse().ok()?,
            atom_density: float(row.get(3)?)?,
            gram_density: float(row.get(4)?)?,
            volume: float(row.get(5)?)?,
            mass: float(row.get(6)?)?,
            pieces: row.get(7)?.parse().ok()?,
        })
    }
}

/// Row of print table 101, particles and energy limits
///
/// The table limits are not printed for every particle type, so only the
/// first five columns are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticleLimits {
    pub index: u32,
    pub symbol: String,
    pub name: String,
    pub cutoff_energy: f64,
    pub maximum_energy: f64,
    pub smallest_table: Option<f64>,
    pub largest_table: Option<f64>,
    pub always_table_below: Option<f64>,
    pub always_model_above: Option<f64>,
}

impl TableRecord for ParticleLimits {
    const TABLE: u32 = 101;

    fn from_row(row: &[String]) -> Option<Self> {
        // anything present must still be a number
        let optional = |i: usize| match row.get(i) {
            Some(value) => float(value).map(Some),
            None => Some(None),
        };

        Some(Self {
            index: row.first()?.parse().ok()?,
            symbol: row.get(1)?.clone(),
            name: row.get(2)?.clone(),
            cutoff_energy: float(row.get(3)?)?,
            maximum_energy: float(row.get(4)?)?,
            smallest_table: optional(5)?,
            largest_table: optional(6)?,
            always_table_below: optional(7)?,
            always_model_above: optional(8)?,
        })
    }
}

/// Row of print table 126, particle activity in each cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellActivity {
    pub index: u32,
    pub cell: u32,
    pub tracks_entering: u64,
    pub population: u64,
    pub collisions: u64,
    pub collisions_weight: f64,
    pub number_weighted_energy: f64,
    pub flux_weighted_energy: f64,
    pub average_track_weight: f64,
    pub average_track_mfp: f64,
}

impl TableRecord for CellActivity {
    const TABLE: u32 = 126;

    fn from_row(row: &[String]) -> Option<Self> {
        Some(Self {
            index: row.first()?.parse().ok()?,
            cell: row.get(1)?.parse().ok()?,
            tracks_entering: row.get(2)?.parse().ok()?,
            population: row.get(3)?.parse().ok()?,
            collisions: row.get(4)?.parse().ok()?,
            collisions_weight: float(row.get(5)?)?,
            number_weighted_energy: float(row.get(6)?)?,
            flux_weighted_energy: float(row.get(7)?)?,
            average_track_weight: float(row.get(8)?)?,
            average_track_mfp: float(row.get(9)?)?,
        })
    }
}

fn float(token: &str) -> Option<f64> {
    mctools_scan::number(token)
}
