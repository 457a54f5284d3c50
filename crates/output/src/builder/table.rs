// crate modules
use crate::core::PrintTable;

// mctools modules
use mctools_scan::{is_unsigned, tokens};

// external crates
use log::{debug, warn};

/// Upper bound on the number of rows captured for one table
pub(crate) const MAX_TABLE_ROWS: usize = 100_000;

/// Upper bound on header lines skipped before the first data row
const MAX_HEADER_LINES: usize = 100;

/// Captures the data rows following a `print table` header
///
/// Header lines are skipped until the first data row, which is any line led by
/// an unsigned integer. Capture ends on the first line that is not a data row
/// once data has started.
#[derive(Debug)]
pub(crate) struct TableBuilder {
    table: PrintTable,
    skipped: usize,
}

impl TableBuilder {
    pub(crate) fn new(number: u32, line: usize, title: &str) -> Self {
        debug!("---------------------");
        debug!(" Parsing Table {number:<5} ");
        debug!("---------------------");
        Self {
            table: PrintTable {
                number,
                line,
                title: title.to_string(),
                ..Default::default()
            },
            skipped: 0,
        }
    }

    /// Feed the next raw line, returning `false` once the capture is complete
    pub(crate) fn push(&mut self, line: usize, raw: &str) -> bool {
        let row = tokens(raw);

        match row.first() {
            Some(index) if is_unsigned(index) => {
                self.table.rows.push(row.iter().map(|s| s.to_string()).collect());
                self.table.row_lines.push(line);

                if self.table.rows.len() >= MAX_TABLE_ROWS {
                    warn!(
                        "Print table {} truncated to {MAX_TABLE_ROWS} rows",
                        self.table.number
                    );
                    return false;
                }
                true
            }
            _ if !self.table.rows.is_empty() => false,
            _ => {
                self.skipped += 1;
                self.skipped < MAX_HEADER_LINES
            }
        }
    }

    pub(crate) fn finish(self) -> PrintTable {
        debug!("Rows        = {}", self.table.rows.len());
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capture_stops_after_data() {
        let lines = [
            "",
            "              cell      mat   density",
            "",
            "        1        1      1  8.00000E-02",
            "        2        2      0  0.00000E+00",
            " total                     3.66519E+03",
            "        3        3      0  0.00000E+00",
        ];

        let mut builder = TableBuilder::new(60, 1, "cells");
        for (i, line) in lines.iter().enumerate() {
            if !builder.push(i + 2, line) {
                break;
            }
        }

        let table = builder.finish();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[1][0], "2");
        assert_eq!(table.row_lines, vec![5, 6]);
    }

    #[test]
    fn headers_only() {
        let mut builder = TableBuilder::new(98, 1, "");
        let open = (0..MAX_HEADER_LINES).all(|_| builder.push(1, " some text"));
        assert!(!open);
        assert!(builder.finish().is_empty());
    }
}
