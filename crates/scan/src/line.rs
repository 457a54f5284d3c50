//! Line events and the classifier that produces them

use crate::number::{is_number, is_value, tokens};
use crate::parsers;

/// Cartesian axis of a set of mesh bounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// Kind of group boundaries printed in a mesh header
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinKind {
    Energy,
    Time,
}

/// Column layout announced by a column header
///
/// Mesh tallies print a full header, e.g. `Energy X Y Z Result Rel Error`,
/// while tally printouts only give a bare `energy` or `time` above the rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    /// `X Y Z Result Rel Error`
    Position,
    /// `Energy X Y Z Result Rel Error` or a bare `energy`
    Energy,
    /// `Time X Y Z Result Rel Error` or a bare `time`
    Time,
    /// Any other result table header
    Unsupported,
}

/// A single classified line
///
/// Borrowed text always points into the line that was classified.
#[derive(Debug, Clone, PartialEq)]
pub enum Line<'a> {
    /// Only whitespace
    Blank,
    /// `1tally <n> nps = <nps>`
    TallyHeader { number: u32, nps: u64 },
    /// `Mesh Tally Number <n>`
    MeshHeader(u32),
    /// Anything ending `print table <n>`, with the leading text as a title
    TableHeader { number: u32, title: &'a str },
    /// Text following `Code Name & Version =`
    Version(&'a str),
    /// Raw line starting `comment.`
    Comment(&'a str),
    /// Raw line starting `warning.`
    Warning(&'a str),
    /// A `master set rendezvous` marker
    Rendezvous,
    /// `X|Y|Z direction:` followed by the bound values
    AxisBounds(Axis, Vec<f64>),
    /// `Energy|Time bin boundaries:` followed by the literal labels
    BinBoundaries(BinKind, Vec<&'a str>),
    /// The particle word in `This is a <particle> mesh tally.`
    MeshParticle(&'a str),
    /// Result column header
    ColumnHeader(ColumnKind),
    /// `time:` followed by the labels of a chunk of time columns
    TimeColumns(Vec<&'a str>),
    /// Numeric row, possibly led by a `total` label
    DataRow(Vec<&'a str>),
    /// Anything else
    Other(&'a str),
}

/// Classify a single line of a report
///
/// Purely lexical, so the same line always gives the same event regardless of
/// where it appears. Checks are made in a fixed order and the first match
/// wins.
///
/// ```rust
/// # use mctools_scan::{classify, Axis, ColumnKind, Line};
/// assert_eq!(
///     classify("     X direction:    -10.00     -8.00"),
///     Line::AxisBounds(Axis::X, vec![-10.0, -8.0])
/// );
/// assert_eq!(
///     classify("   Energy         X         Y         Z     Result     Rel Error"),
///     Line::ColumnHeader(ColumnKind::Energy)
/// );
/// assert_eq!(
///     classify("      total      1.91076E-03 0.0006"),
///     Line::DataRow(vec!["total", "1.91076E-03", "0.0006"])
/// );
/// ```
pub fn classify(line: &str) -> Line<'_> {
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Line::Blank;
    }

    if let Ok((_, (number, nps))) = parsers::tally_header(line) {
        return Line::TallyHeader { number, nps };
    }

    if let Ok((_, id)) = parsers::mesh_id(line) {
        return Line::MeshHeader(id);
    }

    if let Some((number, title)) = table_header(trimmed) {
        return Line::TableHeader { number, title };
    }

    if let Ok((_, text)) = parsers::version(line) {
        return Line::Version(text);
    }

    if starts_with_ignore_case(trimmed, "comment.") {
        return Line::Comment(line);
    }

    if starts_with_ignore_case(trimmed, "warning.") {
        return Line::Warning(line);
    }

    let words = tokens(trimmed);

    if is_rendezvous(&words) {
        return Line::Rendezvous;
    }

    if let Ok((_, (axis, values))) = parsers::axis_bounds(line) {
        return Line::AxisBounds(axis, values);
    }

    if let Ok((labels, kind)) = parsers::bin_boundaries(line) {
        return Line::BinBoundaries(kind, tokens(labels));
    }

    if let Some(particle) = mesh_particle(&words) {
        return Line::MeshParticle(particle);
    }

    if let Some(kind) = column_header(&words) {
        return Line::ColumnHeader(kind);
    }

    if let Ok((_, labels)) = parsers::time_columns(line) {
        return Line::TimeColumns(tokens(labels));
    }

    if is_data_row(&words) {
        return Line::DataRow(words);
    }

    Line::Other(line)
}

/// Case-insensitive prefix check
fn starts_with_ignore_case(i: &str, prefix: &str) -> bool {
    i.get(..prefix.len())
        .is_some_and(|start| start.eq_ignore_ascii_case(prefix))
}

/// Lines ending `print table <n>`
fn table_header(trimmed: &str) -> Option<(u32, &str)> {
    let (head, number) = trimmed.rsplit_once(char::is_whitespace)?;
    let number = number.parse::<u32>().ok()?;

    let head = head.trim_end();
    let (head, table) = head.rsplit_once(char::is_whitespace)?;
    if !table.eq_ignore_ascii_case("table") {
        return None;
    }

    let head = head.trim_end();
    let (title, print) = match head.rsplit_once(char::is_whitespace) {
        Some((title, print)) => (title.trim(), print),
        None => ("", head),
    };
    if !print.eq_ignore_ascii_case("print") {
        return None;
    }

    // carriage control on page headers
    let title = title.strip_prefix('1').unwrap_or(title).trim_start();
    Some((number, title))
}

/// Lines containing `master set rendezvous`
fn is_rendezvous(words: &[&str]) -> bool {
    words.windows(3).any(|w| {
        w[0].eq_ignore_ascii_case("master")
            && w[1].eq_ignore_ascii_case("set")
            && w[2].eq_ignore_ascii_case("rendezvous")
    })
}

/// The word before a trailing `mesh tally.`
fn mesh_particle<'a>(words: &[&'a str]) -> Option<&'a str> {
    match words {
        [.., particle, mesh, tally]
            if mesh.eq_ignore_ascii_case("mesh") && tally.eq_ignore_ascii_case("tally.") =>
        {
            Some(*particle)
        }
        _ => None,
    }
}

/// Result table headers for both mesh tallies and tally printouts
fn column_header(words: &[&str]) -> Option<ColumnKind> {
    fn is(word: &str, expected: &str) -> bool {
        word.eq_ignore_ascii_case(expected)
    }

    match words {
        [word] if is(word, "energy") => Some(ColumnKind::Energy),
        [word] if is(word, "time") => Some(ColumnKind::Time),
        [head @ .., result, rel, error]
            if is(result, "result") && is(rel, "rel") && is(error, "error") =>
        {
            let kind = match head {
                [x, y, z] if is(x, "x") && is(y, "y") && is(z, "z") => ColumnKind::Position,
                [group, x, y, z] if is(x, "x") && is(y, "y") && is(z, "z") => {
                    if is(group, "energy") {
                        ColumnKind::Energy
                    } else if is(group, "time") {
                        ColumnKind::Time
                    } else {
                        ColumnKind::Unsupported
                    }
                }
                _ => ColumnKind::Unsupported,
            };
            Some(kind)
        }
        _ => None,
    }
}

/// At least two tokens, led by a number or `total`, with numbers after
fn is_data_row(words: &[&str]) -> bool {
    match words {
        [first, rest @ ..] if !rest.is_empty() => {
            (is_number(first) || first.eq_ignore_ascii_case("total"))
                && rest.iter().all(|t| is_value(t))
        }
        _ => false,
    }
}
