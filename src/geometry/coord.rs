use std::fmt;

use crate::foundation::core::finite_or;

/// A layer coordinate: absolute template units or a percentage of a reference extent.
///
/// Coordinates come straight from UI fields, so parsing never fails. Anything that is neither a
/// number nor a percentage becomes `Absolute(0.0)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(from = "RawCoordinate", into = "RawCoordinate")]
pub enum Coordinate {
    /// Template units.
    Absolute(f64),
    /// Percent of the reference extent (`50.0` means half).
    Percent(f64),
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::Absolute(0.0)
    }
}

impl Coordinate {
    pub fn percent(p: f64) -> Self {
        Self::Percent(finite_or(p, 0.0))
    }

    pub fn absolute(v: f64) -> Self {
        Self::Absolute(finite_or(v, 0.0))
    }

    /// Parse `"50%"`, `"12.5"`, `" 7 "`. Everything else is `Absolute(0.0)`.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if let Some(pct) = s.strip_suffix('%') {
            return match pct.trim().parse::<f64>() {
                Ok(v) if v.is_finite() => Self::Percent(v),
                _ => Self::Absolute(0.0),
            };
        }
        match s.parse::<f64>() {
            Ok(v) if v.is_finite() => Self::Absolute(v),
            _ => Self::Absolute(0.0),
        }
    }

    pub fn is_percent(self) -> bool {
        matches!(self, Self::Percent(_))
    }

    /// Resolve against a reference `extent` starting at `offset`.
    pub fn resolve(self, extent: f64, offset: f64) -> f64 {
        resolve_coordinate(self, extent, offset)
    }
}

/// `offset + (percent ? pct/100 * extent : n)`, always finite.
pub fn resolve_coordinate(coord: Coordinate, extent: f64, offset: f64) -> f64 {
    let extent = finite_or(extent, 0.0);
    let offset = finite_or(offset, 0.0);
    let local = match coord {
        Coordinate::Absolute(v) => finite_or(v, 0.0),
        Coordinate::Percent(p) => finite_or(p, 0.0) / 100.0 * extent,
    };
    finite_or(offset + local, 0.0)
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Absolute(v) => write!(f, "{}", crate::foundation::core::fmt_num(*v)),
            Self::Percent(p) => write!(f, "{}%", crate::foundation::core::fmt_num(*p)),
        }
    }
}

#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
enum RawCoordinate {
    Number(f64),
    Text(String),
    Null(()),
}

impl From<RawCoordinate> for Coordinate {
    fn from(raw: RawCoordinate) -> Self {
        match raw {
            RawCoordinate::Number(v) => Coordinate::absolute(v),
            RawCoordinate::Text(s) => Coordinate::parse(&s),
            RawCoordinate::Null(()) => Coordinate::default(),
        }
    }
}

impl From<Coordinate> for RawCoordinate {
    fn from(c: Coordinate) -> Self {
        match c {
            Coordinate::Absolute(v) => RawCoordinate::Number(v),
            Coordinate::Percent(_) => RawCoordinate::Text(c.to_string()),
        }
    }
}

impl From<f64> for Coordinate {
    fn from(v: f64) -> Self {
        Coordinate::absolute(v)
    }
}

impl From<&str> for Coordinate {
    fn from(s: &str) -> Self {
        Coordinate::parse(s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geometry/coord.rs"]
mod tests;
