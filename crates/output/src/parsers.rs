//! Library of tally metadata parsers

// crate modules
use crate::core::MissCategory;

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::{tag, tag_no_case, take_until1};
use nom::character::complete::{self, char, space0, space1};
use nom::combinator::{map, rest};
use nom::error::{Error, ErrorKind};
use nom::number::complete::double;
use nom::sequence::{preceded, tuple};
use nom::IResult;

/// Region a normalisation list belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Region {
    Cell,
    Surface,
}

/// Parse the tally type following `tally type`
pub(crate) fn tally_type(i: &str) -> IResult<&str, u32> {
    preceded(
        tuple((tag_no_case("tally"), space1, tag_no_case("type"), space1)),
        complete::u32,
    )(i.trim_start())
}

/// Parse the particle description following `particle(s):`
pub(crate) fn particles(i: &str) -> IResult<&str, &str> {
    preceded(
        tuple((tag_no_case("particle(s)"), space0, char(':'), space0)),
        map(rest, |s: &str| s.trim()),
    )(i.trim_start())
}

/// Recognise the `volumes`, `areas`, or `masses` normalisation tags
pub(crate) fn is_normalisation(i: &str) -> bool {
    let i = i.trim();
    ["volumes", "areas", "masses"]
        .iter()
        .any(|t| i.eq_ignore_ascii_case(t))
}

/// Parse the `cell:` or `surface:` identifiers of a normalisation list
pub(crate) fn normalisation_ids(i: &str) -> IResult<&str, (Region, Vec<&str>)> {
    let (i, region) = alt((
        map(tag_no_case("cell"), |_| Region::Cell),
        map(tag_no_case("surface"), |_| Region::Surface),
    ))(i.trim_start())?;
    let (i, _) = tuple((space0, char(':')))(i)?;
    Ok(("", (region, i.split_whitespace().collect())))
}

/// Parse three numerical values following `detector located at x,y,z =`
pub(crate) fn detector_location(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, _) = tuple((
        tag_no_case("detector"),
        space1,
        tag_no_case("located"),
        take_until1("="),
        tag("="),
    ))(i.trim_start())?;
    coordinate_array(i)
}

/// Parse the score and history number of `the largest score` line
pub(crate) fn largest_score(i: &str) -> IResult<&str, (f64, u64)> {
    let (i, _) = tuple((
        tag_no_case("the"),
        space1,
        tag_no_case("largest"),
        space1,
        tag_no_case("score"),
    ))(i.trim_start())?;

    // first number is the score, last is the history
    let values: Vec<&str> = i
        .split_whitespace()
        .filter(|t| mctools_scan::is_number(t))
        .collect();

    match (values.first(), values.last()) {
        (Some(score), Some(nps)) if values.len() > 1 => {
            let (_, score) = double(*score)?;
            let (_, nps) = complete::u64(*nps)?;
            Ok(("", (score, nps)))
        }
        _ => Err(nom::Err::Error(Error::new(i, ErrorKind::Count))),
    }
}

/// Parse the value following `average tally per history =`
pub(crate) fn average_per_history(i: &str) -> IResult<&str, f64> {
    preceded(
        tuple((
            tag_no_case("average"),
            space1,
            tag_no_case("tally"),
            space1,
            tag_no_case("per"),
            space1,
            tag_no_case("history"),
            space0,
            char('='),
            space0,
        )),
        double,
    )(i.trim_start())
}

/// Parse a miss category label followed by its count
pub(crate) fn miss_count(i: &str) -> Option<(MissCategory, u64)> {
    let (label, count) = i.trim().rsplit_once(char::is_whitespace)?;
    let category = MissCategory::from_label(label)?;
    Some((category, count.parse().ok()?))
}

/// Parse any three numbers into an array
fn coordinate_array(i: &str) -> IResult<&str, [f64; 3]> {
    let (i, a) = double(i.trim_start())?;
    let (i, b) = double(i.trim_start())?;
    let (i, c) = double(i.trim_start())?;
    Ok((i, [a, b, c]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_descriptors() {
        assert_eq!(
            tally_type("           tally type 4    track length estimate of particle flux."),
            Ok(("    track length estimate of particle flux.", 4))
        );
        assert_eq!(
            particles("           particle(s): photons  "),
            Ok(("", "photons"))
        );
        assert!(tally_type("tally 4").is_err());
    }

    #[test]
    fn normalisation_lists() {
        assert!(is_normalisation("           volumes "));
        assert!(is_normalisation("MASSES"));
        assert!(!is_normalisation("volumes 1"));
        assert_eq!(
            normalisation_ids("                   cell:       2            3"),
            Ok(("", (Region::Cell, vec!["2", "3"])))
        );
        assert_eq!(
            normalisation_ids(" surface: 1"),
            Ok(("", (Region::Surface, vec!["1"])))
        );
        assert!(normalisation_ids(" cell  2").is_err());
    }

    #[test]
    fn detector_values() {
        assert_eq!(
            detector_location(" detector located at x,y,z = 1.50000E+01 0.00000E+00 -1.0"),
            Ok(("", [15.0, 0.0, -1.0]))
        );
        assert_eq!(
            largest_score(" the largest score =  2.32897E-01 occurred on history number    492485"),
            Ok(("", (2.32897E-01, 492485)))
        );
        assert_eq!(
            average_per_history(" average tally per history = 3.42950E-04"),
            Ok(("", 3.42950E-04))
        );
        assert_eq!(
            miss_count("      russian roulette in transmission      935317"),
            Some((MissCategory::RussianRouletteInTransmission, 935317))
        );
        assert_eq!(miss_count("      psc=0.   0"), Some((MissCategory::PscZero, 0)));
        assert_eq!(miss_count("      energy 0"), None);
    }
}
