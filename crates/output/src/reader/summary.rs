//! Run summary details from lines held in memory

// external crates
use mctools_scan::{classify, Line};
use std::collections::BTreeSet;

/// Code name and version from the first version line
///
/// ```rust
/// # use mctools_output::read_version;
/// let lines = ["          Code Name & Version = MCNP6, 1.0", "  other text"];
/// assert_eq!(read_version(&lines), Some("MCNP6, 1.0".to_string()));
/// assert_eq!(read_version(&lines[1..]), None);
/// ```
pub fn read_version<S: AsRef<str>>(lines: &[S]) -> Option<String> {
    lines.iter().find_map(|line| match classify(line.as_ref()) {
        Line::Version(version) => Some(version.to_string()),
        _ => None,
    })
}

/// Raw comment and warning lines, in order
///
/// ```rust
/// # use mctools_output::read_comments_warnings;
/// let lines = [
///     "  comment. total nubar used if fissionable isotopes are present.",
///     "  warning. 1 materials had unnormalized fractions.",
///     "  none of the above",
/// ];
/// let (comments, warnings) = read_comments_warnings(&lines);
/// assert_eq!(comments, vec![lines[0]]);
/// assert_eq!(warnings, vec![lines[1]]);
/// ```
pub fn read_comments_warnings<S: AsRef<str>>(lines: &[S]) -> (Vec<String>, Vec<String>) {
    let mut comments = Vec::new();
    let mut warnings = Vec::new();

    for line in lines {
        match classify(line.as_ref()) {
            Line::Comment(text) => comments.push(text.to_string()),
            Line::Warning(text) => warnings.push(text.to_string()),
            _ => (),
        }
    }

    (comments, warnings)
}

/// 0-based line indices of every `master set rendezvous` marker
pub fn rendezvous_lines<S: AsRef<str>>(lines: &[S]) -> Vec<usize> {
    lines
        .iter()
        .enumerate()
        .filter(|(_, line)| matches!(classify(line.as_ref()), Line::Rendezvous))
        .map(|(i, _)| i)
        .collect()
}

/// Number of `master set rendezvous` markers
///
/// ```rust
/// # use mctools_output::count_rendezvous;
/// let lines = [
///     " master set rendezvous nps =       50000,  work ratios = 0.0000 1.0000",
///     "",
///     " master set rendezvous nps =      100000,  work ratios = 0.0000 1.0000",
/// ];
/// assert_eq!(count_rendezvous(&lines), 2);
/// ```
pub fn count_rendezvous<S: AsRef<str>>(lines: &[S]) -> usize {
    rendezvous_lines(lines).len()
}

/// Sorted distinct tally numbers
pub fn tally_numbers<S: AsRef<str>>(lines: &[S]) -> Vec<u32> {
    lines
        .iter()
        .filter_map(|line| match classify(line.as_ref()) {
            Line::TallyHeader { number, .. } => Some(number),
            _ => None,
        })
        .collect::<BTreeSet<u32>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_of_nothing() {
        let lines: Vec<String> = Vec::new();
        assert_eq!(read_version(&lines), None);
        assert_eq!(read_comments_warnings(&lines), (vec![], vec![]));
        assert!(rendezvous_lines(&lines).is_empty());
        assert!(tally_numbers(&lines).is_empty());
    }

    #[test]
    fn repeated_tallies() {
        let lines = [
            "1tally       14        nps =     1000",
            "1tally        4        nps =     1000",
            "1tally       14        nps =     2000",
        ];
        assert_eq!(tally_numbers(&lines), vec![4, 14]);
    }
}
