use mctools_scan::number;
use mctools_utils::ValueExt;
use serde::{Deserialize, Serialize};

/// Energy/Time groups are either `Total` or a bin value
///
/// The leading column of a 6-column mesh row is either the literal `Total` or
/// the energy or time of the bin.
///
/// | Leading column | Group         |
/// | -------------- | ------------- |
/// | `1.000E+36`    | Value(1e36)   |
/// | `2.000E+01`    | Value(20.0)   |
/// | `Total`        | Total         |
///
/// Time rows for `Total`, or a time of exactly zero, are dropped by the reader
/// so only energy meshes carry a [Group::Total].
#[derive(Debug, PartialEq, Clone, Copy, PartialOrd, Serialize, Deserialize)]
pub enum Group {
    /// The 'Total' bin group
    Total,
    /// The value printed for the bin
    Value(f64),
}

impl Group {
    #[inline]
    /// Check if the Group is the `Total` variant
    ///
    /// ```rust
    /// # use mctools_mesh::Group;
    /// assert_eq!(Group::Total.is_total(), true);
    /// assert_eq!(Group::Value(2.0).is_total(), false);
    /// ```
    pub const fn is_total(&self) -> bool {
        matches!(*self, Self::Total)
    }

    #[inline]
    /// Check if the Group is the `Value` variant
    pub const fn is_value(&self) -> bool {
        !self.is_total()
    }

    /// Interpret the leading column of a data row
    ///
    /// ```rust
    /// # use mctools_mesh::Group;
    /// assert_eq!(Group::from_label("Total"), Some(Group::Total));
    /// assert_eq!(Group::from_label("1.000E+36"), Some(Group::Value(1e36)));
    /// assert_eq!(Group::from_label("bin"), None);
    /// ```
    pub fn from_label(label: &str) -> Option<Self> {
        if label.eq_ignore_ascii_case("total") {
            Some(Self::Total)
        } else {
            number(label).map(Self::Value)
        }
    }
}

impl From<f64> for Group {
    fn from(value: f64) -> Self {
        Self::Value(value)
    }
}

impl std::fmt::Display for Group {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Value(value) => write!(f, "{}", value.sci(3, 2)),
            Self::Total => write!(f, "Total"),
        }
    }
}
