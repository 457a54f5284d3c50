//! Library of marker parsers

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{self, char, one_of, space0, space1};
use nom::combinator::{map, opt, rest};
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;

use crate::line::{Axis, BinKind};
use crate::number::vector_of_f64;

/// Parse `[1]tally <n> nps = <nps>` into the tally number and history count
pub(crate) fn tally_header(i: &str) -> IResult<&str, (u32, u64)> {
    let (i, _) = opt(char('1'))(i.trim_start())?;
    let (i, _) = terminated(tag_no_case("tally"), space1)(i)?;
    let (i, number) = complete::u32(i)?;
    let (i, _) = tuple((space1, tag_no_case("nps"), space0, char('='), space0))(i)?;
    let (i, nps) = complete::u64(i)?;
    Ok((i, (number, nps)))
}

/// Parse the number following a `Mesh Tally Number` tag to a u32
pub(crate) fn mesh_id(i: &str) -> IResult<&str, u32> {
    let (i, _) = tuple((
        tag_no_case("mesh"),
        space1,
        tag_no_case("tally"),
        space1,
        tag_no_case("number"),
        space1,
    ))(i.trim_start())?;
    complete::u32(i)
}

/// Parse the text following `Code Name & Version =`
pub(crate) fn version(i: &str) -> IResult<&str, &str> {
    let (i, _) = tuple((
        tag_no_case("code"),
        space1,
        tag_no_case("name"),
        space0,
        char('&'),
        space0,
        tag_no_case("version"),
        space0,
        char('='),
        space0,
    ))(i.trim_start())?;
    map(rest, |s: &str| s.trim())(i)
}

/// Parse `X|Y|Z direction:` followed by the bound values
pub(crate) fn axis_bounds(i: &str) -> IResult<&str, (Axis, Vec<f64>)> {
    let (i, axis) = map(one_of("XYZxyz"), |c| match c.to_ascii_uppercase() {
        'X' => Axis::X,
        'Y' => Axis::Y,
        _ => Axis::Z,
    })(i.trim_start())?;
    let (i, _) = tuple((space1, tag_no_case("direction"), space0, char(':')))(i)?;
    let (i, values) = vector_of_f64(i)?;
    Ok((i, (axis, values)))
}

/// Recognise `Energy|Time bin boundaries:` and return the remaining labels
pub(crate) fn bin_boundaries(i: &str) -> IResult<&str, BinKind> {
    let (i, kind) = alt((
        map(tag_no_case("energy"), |_| BinKind::Energy),
        map(tag_no_case("time"), |_| BinKind::Time),
    ))(i.trim_start())?;
    let (i, _) = tuple((
        space1,
        tag_no_case("bin"),
        space1,
        tag_no_case("boundaries"),
        space0,
        char(':'),
    ))(i)?;
    Ok((i, kind))
}

/// Recognise the `time:` tag heading a chunk of dual-binned columns
pub(crate) fn time_columns(i: &str) -> IResult<&str, &str> {
    preceded(
        tuple((tag_no_case("time"), space0, char(':'))),
        rest,
    )(i.trim_start())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_headers() {
        assert_eq!(
            tally_header("1tally        4        nps =     1000000"),
            Ok(("", (4, 1000000)))
        );
        assert_eq!(tally_header("tally 14 nps=20"), Ok(("", (14, 20))));
        assert!(tally_header("1tally fluctuation charts").is_err());
        assert!(tally_header("1tally        4").is_err());
    }

    #[test]
    fn mesh_ids() {
        assert_eq!(mesh_id(" Mesh Tally Number   214"), Ok(("", 214)));
        assert_eq!(mesh_id("mesh tally number 4"), Ok(("", 4)));
        assert!(mesh_id(" Mesh Tally Number").is_err());
    }

    #[test]
    fn code_versions() {
        assert_eq!(
            version("          Code Name & Version = MCNP6, 1.0  "),
            Ok(("", "MCNP6, 1.0"))
        );
        assert!(version("Code Name").is_err());
    }

    #[test]
    fn geometry_bounds() {
        assert_eq!(
            axis_bounds("  X direction:     -1.00      0.00"),
            Ok(("", (Axis::X, vec![-1.0, 0.0])))
        );
        assert_eq!(
            axis_bounds("Z direction: -3.50"),
            Ok(("", (Axis::Z, vec![-3.5])))
        );
        // cylindrical meshes are not recognised
        assert!(axis_bounds("R direction: 0.0 1.0").is_err());
        assert!(axis_bounds("X direction").is_err());
    }

    #[test]
    fn group_bounds() {
        assert_eq!(
            bin_boundaries("Energy  bin boundaries: 0.00E+00 1.00E+36"),
            Ok((" 0.00E+00 1.00E+36", BinKind::Energy))
        );
        assert!(bin_boundaries("Time bin boundaries").is_err());
        assert!(bin_boundaries("Energybin boundaries:").is_err());
    }
}
