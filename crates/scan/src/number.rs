//! Numeric helpers shared by the report readers

// nom parser combinators
use nom::character::complete::{char, digit1, one_of, space0};
use nom::combinator::{all_consuming, opt, recognize};
use nom::error::{Error, ErrorKind};
use nom::multi::many1;
use nom::number::complete::double;
use nom::sequence::{preceded, terminated, tuple};
use nom::IResult;

use log::warn;

/// Split a line on collapsed whitespace
///
/// ```rust
/// # use mctools_scan::tokens;
/// assert_eq!(tokens("  total      1.91076E-03 0.0006 "), vec!["total", "1.91076E-03", "0.0006"]);
/// assert!(tokens("   ").is_empty());
/// ```
pub fn tokens(i: &str) -> Vec<&str> {
    i.split_whitespace().collect()
}

/// Check that a whole token is a number
///
/// ```rust
/// # use mctools_scan::is_number;
/// assert!(is_number("1.0000E-01"));
/// assert!(is_number("-9.000"));
/// assert!(is_number("42"));
/// assert!(!is_number("total"));
/// assert!(!is_number("cell:"));
/// ```
pub fn is_number(token: &str) -> bool {
    all_consuming(double::<&str, ()>)(token).is_ok()
}

/// Check that a whole token is an unsigned integer
///
/// ```rust
/// # use mctools_scan::is_unsigned;
/// assert!(is_unsigned("60"));
/// assert!(!is_unsigned("-1"));
/// assert!(!is_unsigned("1.0"));
/// ```
pub fn is_unsigned(token: &str) -> bool {
    all_consuming(digit1::<&str, ()>)(token).is_ok()
}

/// Parse a whole token into an f64
///
/// Fortran drops the `E` from exponents that run to three digits, so
/// `1.00000-100` is repaired to `1.00000E-100` before giving up.
///
/// ```rust
/// # use mctools_scan::number;
/// assert_eq!(number("1.16486E+00"), Some(1.16486));
/// assert_eq!(number("1.5-100"), Some(1.5e-100));
/// assert_eq!(number("total"), None);
/// ```
pub fn number(token: &str) -> Option<f64> {
    if let Ok((_, value)) = all_consuming(double::<&str, ()>)(token) {
        return Some(value);
    }

    match all_consuming(broken_scientific)(token) {
        Ok((_, value)) => {
            warn!("Repaired exponent formatting for \"{token}\"");
            Some(value)
        }
        Err(_) => None,
    }
}

/// Check that a whole token is a number, allowing for a missing `E`
pub(crate) fn is_value(token: &str) -> bool {
    is_number(token) || all_consuming(broken_scientific)(token).is_ok()
}

/// List of consecutive doubles as a vector of f64 values
pub fn vector_of_f64(i: &str) -> IResult<&str, Vec<f64>> {
    many1(terminated(double, space0))(i.trim_start())
}

/// Mantissa followed directly by a signed exponent, e.g. `1.111-101`
fn broken_scientific(i: &str) -> IResult<&str, f64> {
    let (i, mantissa) = recognize(tuple((
        opt(one_of("-+")),
        digit1,
        opt(preceded(char('.'), digit1)),
    )))(i)?;
    let (i, exponent) = recognize(preceded(one_of("-+"), digit1))(i)?;

    let value = format!("{mantissa}e{exponent}")
        .parse::<f64>()
        .map_err(|_| nom::Err::Error(Error::new(i, ErrorKind::Float)))?;
    Ok((i, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn broken_exponents() {
        assert_eq!(broken_scientific("1.111+001"), Ok(("", 11.11)));
        assert_eq!(broken_scientific("1.111-001"), Ok(("", 0.1111)));
        assert_eq!(broken_scientific("-2.5-101"), Ok(("", -2.5e-101)));
        assert!(broken_scientific("total").is_err());
    }

    #[test]
    fn list_of_doubles() {
        assert_eq!(
            vector_of_f64("  -10.00 -8.00 -6.00"),
            Ok(("", vec![-10.0, -8.0, -6.0]))
        );
        assert!(vector_of_f64("X direction:").is_err());
    }

    #[test]
    fn repaired_numbers() {
        assert_eq!(number("8.15942-132"), Some(8.15942e-132));
        assert_eq!(number("0.0006"), Some(0.0006));
        assert_eq!(number(""), None);
    }
}
