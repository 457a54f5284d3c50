use crate::f;

/// Extends Option for easy display formatting
pub trait OptionExt {
    /// Better option outputs
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or "none" for the `None` variant.
    ///
    /// ```rust
    /// # use mctools_utils::OptionExt;
    /// let version: Option<&str> = Some("MCNP6, 1.0");
    /// assert_eq!(version.display(), "MCNP6, 1.0");
    ///
    /// let version: Option<&str> = None;
    /// assert_eq!(version.display(), "none");
    /// ```
    fn display(&self) -> String;
}

impl<T: std::fmt::Display> OptionExt for Option<T> {
    fn display(&self) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => "none".to_string(),
        }
    }
}
