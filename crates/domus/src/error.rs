//! Errors shared by the geometry generators.

use thiserror::Error;

/// Precondition failures reported by the generators.
///
/// All generators validate their whole input before building anything, so
/// an error always means no geometry was produced.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// A list that must have at least one element is empty.
    #[error("{0} must not be empty")]
    Empty(&'static str),

    /// A length, height or factor that must be finite and strictly positive
    /// is not.
    #[error("{what} must be finite and positive, got {value}")]
    NonPositive {
        /// Which input was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// An angle or coordinate is infinite or NaN.
    #[error("{what} must be finite, got {value}")]
    NonFinite {
        /// Which input was rejected.
        what: &'static str,
        /// The rejected value.
        value: f64,
    },

    /// Two inputs disagree on their dimensions.
    #[error("shape mismatch in {what}: expected {expected}, got {actual}")]
    ShapeMismatch {
        /// Which input was rejected.
        what: String,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// A polyhedron cell references a vertex that does not exist.
    #[error("cell {cell} references vertex {index}, but only {len} vertices exist")]
    InvalidCell {
        /// Cell position.
        cell: usize,
        /// Offending vertex index.
        index: usize,
        /// Number of vertices available.
        len: usize,
    },

    /// An occupancy flag other than 0 or 1.
    #[error("occupancy[{row}][{col}] must be 0 or 1, got {value}")]
    InvalidOccupancy {
        /// Row index.
        row: usize,
        /// Column index.
        col: usize,
        /// Rejected flag.
        value: u8,
    },

    /// A dimension is below the minimum the generator can work with.
    #[error("{what} must be at least {min}, got {value}")]
    TooSmall {
        /// Which input was rejected.
        what: &'static str,
        /// Smallest accepted value.
        min: f64,
        /// The rejected value.
        value: f64,
    },

    /// The shared frame layout was asked to reuse one grid for stories of
    /// different heights.
    #[error("shared frame layout requires uniform story heights")]
    NonUniformStories,
}

pub(crate) fn ensure_non_empty<T>(what: &'static str, items: &[T]) -> Result<(), GeometryError> {
    if items.is_empty() {
        return Err(GeometryError::Empty(what));
    }
    Ok(())
}

pub(crate) fn ensure_positive(what: &'static str, value: f64) -> Result<(), GeometryError> {
    if !(value.is_finite() && value > 0.0) {
        return Err(GeometryError::NonPositive { what, value });
    }
    Ok(())
}

pub(crate) fn ensure_finite(what: &'static str, value: f64) -> Result<(), GeometryError> {
    if !value.is_finite() {
        return Err(GeometryError::NonFinite { what, value });
    }
    Ok(())
}

pub(crate) fn ensure_all_positive(what: &'static str, values: &[f64]) -> Result<(), GeometryError> {
    ensure_non_empty(what, values)?;
    values.iter().try_for_each(|&v| ensure_positive(what, v))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_nan_and_zero() {
        assert!(ensure_positive("x", f64::NAN).is_err());
        assert_eq!(
            ensure_positive("x", 0.0),
            Err(GeometryError::NonPositive {
                what: "x",
                value: 0.0
            })
        );
        assert!(ensure_positive("x", 1e-9).is_ok());
    }

    #[test]
    fn test_rejects_infinity() {
        assert_eq!(
            ensure_positive("stair height", f64::INFINITY),
            Err(GeometryError::NonPositive {
                what: "stair height",
                value: f64::INFINITY
            })
        );
        assert!(ensure_positive("x", f64::NEG_INFINITY).is_err());
        assert!(ensure_all_positive("spacings", &[4.0, f64::INFINITY]).is_err());
        assert_eq!(
            ensure_finite("slope angle", f64::NAN).map_err(|e| e.to_string()),
            Err("slope angle must be finite, got NaN".to_string())
        );
        assert!(ensure_finite("slope angle", -0.4).is_ok());
    }

    #[test]
    fn test_all_positive_requires_elements() {
        assert_eq!(
            ensure_all_positive("spacings", &[]),
            Err(GeometryError::Empty("spacings"))
        );
        assert!(ensure_all_positive("spacings", &[1.0, -2.0]).is_err());
    }

    #[test]
    fn test_error_display() {
        let err = GeometryError::ShapeMismatch {
            what: "occupancy rows".to_string(),
            expected: 2,
            actual: 3,
        };
        assert!(err.to_string().contains("expected 2, got 3"));
    }
}
