use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Errors raised while constructing or parsing a precision level.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PrecisionError {
    #[error("geohash precision must be between {min} and {max}, got {0}", min = GeohashPrecision::MIN, max = GeohashPrecision::MAX)]
    OutOfRange(i64),
    #[error("cannot parse precision from '{0}'")]
    Unparseable(String),
}

/// A geohash precision level accepted for grouping (2 through 9).
///
/// # Examples
///
/// ```
/// use geocluster_types::precision::GeohashPrecision;
///
/// let level = GeohashPrecision::new(5).unwrap();
/// assert_eq!(level.get(), 5);
/// assert!(GeohashPrecision::new(1).is_err());
/// assert!(GeohashPrecision::new(10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct GeohashPrecision(u8);

impl GeohashPrecision {
    pub const MIN: u8 = 2;
    pub const MAX: u8 = 9;

    pub fn new(level: i64) -> Result<Self, PrecisionError> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&level) {
            Ok(Self(level as u8))
        } else {
            Err(PrecisionError::OutOfRange(level))
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Every supported level, ascending.
    pub fn all() -> impl Iterator<Item = GeohashPrecision> {
        (Self::MIN..=Self::MAX).map(Self)
    }
}

impl TryFrom<i64> for GeohashPrecision {
    type Error = PrecisionError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GeohashPrecision> for u8 {
    fn from(level: GeohashPrecision) -> Self {
        level.0
    }
}

impl fmt::Display for GeohashPrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Grouping precision chosen by the user: no grouping, or a geohash level.
///
/// Parses from and displays as the labels of the precision control:
/// `none`, `2`, `3`, ..., `9`.
///
/// # Examples
///
/// ```
/// use geocluster_types::precision::Precision;
///
/// let none: Precision = "none".parse().unwrap();
/// assert_eq!(none, Precision::None);
///
/// let level: Precision = "4".parse().unwrap();
/// assert_eq!(level.to_string(), "4");
/// assert!("12".parse::<Precision>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Precision {
    /// Render ungrouped points.
    #[default]
    None,
    /// Group by geohash prefix at this level.
    Level(GeohashPrecision),
}

impl Precision {
    /// Convenience constructor from a raw level.
    pub fn level(level: i64) -> Result<Self, PrecisionError> {
        GeohashPrecision::new(level).map(Precision::Level)
    }

    /// The level, if grouping is enabled.
    pub fn as_level(self) -> Option<GeohashPrecision> {
        match self {
            Precision::None => None,
            Precision::Level(level) => Some(level),
        }
    }

    pub fn is_none(self) -> bool {
        matches!(self, Precision::None)
    }

    /// All control options in display order.
    pub fn options() -> impl Iterator<Item = Precision> {
        std::iter::once(Precision::None).chain(GeohashPrecision::all().map(Precision::Level))
    }
}

impl From<GeohashPrecision> for Precision {
    fn from(level: GeohashPrecision) -> Self {
        Precision::Level(level)
    }
}

impl fmt::Display for Precision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Precision::None => f.write_str("none"),
            Precision::Level(level) => write!(f, "{}", level),
        }
    }
}

impl FromStr for Precision {
    type Err = PrecisionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
            return Ok(Precision::None);
        }
        let level: i64 = trimmed
            .parse()
            .map_err(|_| PrecisionError::Unparseable(s.to_string()))?;
        Precision::level(level)
    }
}

impl Serialize for Precision {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Precision {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Number(i64),
            Text(String),
        }

        let parsed = match Repr::deserialize(deserializer)? {
            Repr::Number(level) => Precision::level(level),
            Repr::Text(text) => text.parse(),
        };
        parsed.map_err(serde::de::Error::custom)
    }
}
