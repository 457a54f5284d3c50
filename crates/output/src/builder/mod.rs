//! Builders fed one classified line at a time
mod table;
mod tally;

pub(crate) use table::TableBuilder;
pub(crate) use tally::{closes_block, Stage, TallyBuilder};
