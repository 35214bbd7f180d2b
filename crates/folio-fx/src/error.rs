#![forbid(unsafe_code)]

//! Configuration validation errors.
//!
//! Engines perform no I/O, so the only failures they report are configs that
//! could not produce a meaningful animation. Everything else (unmounted
//! elements, re-triggers, empty text) degrades to "no visual change".

use core::fmt;

/// A rejected engine configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The substitute alphabet has no characters.
    EmptyAlphabet,
    /// The scramble step interval is zero.
    ZeroSpeed,
    /// A timing value is negative, NaN, or infinite.
    InvalidDuration {
        field: &'static str,
        value: f64,
    },
    /// Automatic focus cycling needs a positive period.
    ZeroCyclePeriod,
    /// A `[min, max]` range has `min > max` or a non-finite bound.
    InvalidRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
    /// The particle population is zero.
    EmptyPopulation,
    /// A threshold is negative or not finite.
    InvalidThreshold(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyAlphabet => write!(f, "scramble alphabet is empty"),
            Self::ZeroSpeed => write!(f, "scramble speed must be greater than zero"),
            Self::InvalidDuration { field, value } => {
                write!(f, "{field} must be a finite, non-negative number of seconds (got {value})")
            }
            Self::ZeroCyclePeriod => write!(
                f,
                "animation duration plus pause must be greater than zero in automatic mode"
            ),
            Self::InvalidRange { field, min, max } => {
                write!(f, "{field} range is invalid: [{min}, {max}]")
            }
            Self::EmptyPopulation => write!(f, "particle population must be at least one"),
            Self::InvalidThreshold(value) => {
                write!(f, "scroll threshold must be finite and non-negative (got {value})")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Check that a seconds value is finite and non-negative.
pub(crate) fn check_seconds(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidDuration { field, value })
    }
}

/// Check that `[min, max]` is ordered and finite.
pub(crate) fn check_range(field: &'static str, min: f64, max: f64) -> Result<(), ConfigError> {
    if min.is_finite() && max.is_finite() && min <= max {
        Ok(())
    } else {
        Err(ConfigError::InvalidRange { field, min, max })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_field() {
        let err = ConfigError::InvalidDuration {
            field: "pause_between_animations",
            value: -1.0,
        };
        assert!(err.to_string().contains("pause_between_animations"));
    }

    #[test]
    fn range_checks() {
        assert!(check_range("size", 1.0, 3.0).is_ok());
        assert!(check_range("size", 2.0, 2.0).is_ok());
        assert_eq!(
            check_range("size", 3.0, 1.0),
            Err(ConfigError::InvalidRange {
                field: "size",
                min: 3.0,
                max: 1.0
            })
        );
        assert!(check_range("size", f64::NAN, 1.0).is_err());
    }

    #[test]
    fn seconds_checks() {
        assert!(check_seconds("d", 0.0).is_ok());
        assert!(check_seconds("d", f64::INFINITY).is_err());
        assert!(check_seconds("d", -0.5).is_err());
    }
}
