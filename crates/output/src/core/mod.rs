//! Core data structures of an output file
mod table;
mod tally;

// Flatten
pub use table::{CellActivity, CellMass, ParticleLimits, PrintTable, TableRecord};
pub use tally::{Detector, MissCategory, TallyRecord};
