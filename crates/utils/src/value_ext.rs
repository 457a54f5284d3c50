use crate::f;

/// Extends primitives with more specific formatting options
pub trait ValueExt {
    /// Better scientific number formatting
    ///
    /// The default is not very consistent for scientific in particular, so this
    /// allows easy definition.
    ///
    /// ```rust
    /// # use mctools_utils::ValueExt;
    /// let number = -1.0_f64;
    /// assert_eq!(number.sci(5, 2), "-1.00000e+00".to_string());
    /// assert_eq!((1.0_f64).sci(5, 2), "1.00000e+00".to_string());
    /// ```
    fn sci(&self, precision: usize, exp_pad: usize) -> String;

    /// Round to a fixed number of decimal places
    ///
    /// Halfway cases round away from zero.
    ///
    /// ```rust
    /// # use mctools_utils::ValueExt;
    /// assert_eq!((1.0_f64 / 3.0).round_to(5), 0.33333);
    /// assert_eq!(((0.6_f64 + 2.2) / 2.0).round_to(5), 1.4);
    /// assert_eq!((-1.25_f64).round_to(1), -1.3);
    /// ```
    fn round_to(&self, decimals: i32) -> f64;
}

impl ValueExt for f64 {
    fn sci(&self, precision: usize, exp_pad: usize) -> String {
        let mut num = f!("{:.precision$e}", &self, precision = precision);
        // `LowerExp` output always contains an 'e'
        let exp = num.split_off(num.find('e').unwrap_or(num.len()));
        // Make sure the exponent is signed
        let (sign, exp) = match exp.strip_prefix("e-") {
            Some(exp) => ('-', exp),
            None => ('+', exp.get(1..).unwrap_or("0")),
        };
        // Pad the exponent with zeros if needed and put it back on the number
        num.push_str(&f!("e{}{:0>pad$}", sign, exp, pad = exp_pad));
        num
    }

    fn round_to(&self, decimals: i32) -> f64 {
        let factor = 10_f64.powi(decimals);
        (self * factor).round() / factor
    }
}
