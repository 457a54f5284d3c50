// crate modules
use crate::error::Result;
use crate::reader::file_lines;

// external crates
use log::trace;
use mctools_scan::{classify, Line};
use std::collections::BTreeMap;
use std::path::Path;

/// Where each tally was last printed
///
/// Maps every tally number to the 0-based line index of its last printout
/// header. Tallies printed more than once keep only the latest start.
///
/// ```rust
/// # use mctools_output::TallyIndex;
/// let lines = [
///     "1tally        4        nps =     1000",
///     "                 1.0E+00 0.1000",
///     "1tally        2        nps =     1000",
///     "                 2.0E+00 0.2000",
///     "1tally        4        nps =     2000",
/// ];
///
/// let index = TallyIndex::from_lines(&lines);
/// assert_eq!(index.len(), 2);
/// assert_eq!(index.start(4), Some(4));
/// assert_eq!(index.next_start(2), Some(4));
/// assert_eq!(index.next_start(4), None);
/// ```
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TallyIndex {
    starts: BTreeMap<u32, usize>,
}

impl TallyIndex {
    /// Scan a file for tally headers
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut index = Self::default();
        for (i, line) in file_lines(path.as_ref())?.enumerate() {
            index.scan(i, &line?);
        }
        Ok(index)
    }

    /// Scan lines already held in memory for tally headers
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut index = Self::default();
        for (i, line) in lines.iter().enumerate() {
            index.scan(i, line.as_ref());
        }
        index
    }

    /// Record a tally header found at line index `line`
    pub fn insert(&mut self, number: u32, line: usize) {
        trace!("Tally {number} header at line index {line}");
        self.starts.insert(number, line);
    }

    /// Number of distinct tallies
    pub fn len(&self) -> usize {
        self.starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty()
    }

    /// Sorted tally numbers
    pub fn numbers(&self) -> Vec<u32> {
        self.starts.keys().copied().collect()
    }

    /// Line index of the last printout of a tally
    pub fn start(&self, number: u32) -> Option<usize> {
        self.starts.get(&number).copied()
    }

    /// Start of the next tally number in sorted order
    ///
    /// `None` for the highest tally number or any number not in the index.
    pub fn next_start(&self, number: u32) -> Option<usize> {
        if !self.starts.contains_key(&number) {
            return None;
        }

        self.starts
            .range(number.saturating_add(1)..)
            .next()
            .map(|(_, start)| *start)
            .filter(|_| number < u32::MAX)
    }

    /// Iterate over `(number, start)` pairs in tally order
    pub fn iter(&self) -> impl Iterator<Item = (u32, usize)> + '_ {
        self.starts.iter().map(|(n, s)| (*n, *s))
    }

    fn scan(&mut self, i: usize, line: &str) {
        if let Line::TallyHeader { number, .. } = classify(line) {
            self.insert(number, i);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_tallies() {
        let index = TallyIndex::from_lines(&["1tally        4        nps =     1000"]);
        assert_eq!(index.start(14), None);
        assert_eq!(index.next_start(14), None);
        assert_eq!(index.next_start(4), None);
        assert!(TallyIndex::from_lines::<&str>(&[]).is_empty());
    }

    #[test]
    fn earlier_next_start() {
        // tally 14 printed before 4, so next_start(4) is behind it
        let lines = vec![
            "1tally       14        nps =     1000".to_string(),
            "".to_string(),
            "1tally        4        nps =     1000".to_string(),
        ];
        let index = TallyIndex::from_lines(&lines);
        assert_eq!(index.numbers(), vec![4, 14]);
        assert_eq!(index.next_start(4), Some(0));
        assert_eq!(index.iter().collect::<Vec<_>>(), vec![(4, 2), (14, 0)]);
    }
}
