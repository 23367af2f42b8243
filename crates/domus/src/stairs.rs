//! Spiral stairs fitted into a box.

use crate::error::{ensure_positive, GeometryError};
use crate::Part;

/// Nominal step size `(run, depth, rise)`.
pub const STEP_SIZE: (f64, f64, f64) = (0.4, 0.8, 0.16);

/// How far a tread extends past the nominal run.
const TREAD_OVERLAP: f64 = 1.3;

/// Derived stair parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StairLayout {
    /// Tread size `(x, y, z)`.
    pub step: (f64, f64, f64),
    /// Rotation about Z between consecutive steps, in radians.
    pub rotation: f64,
    /// Radius of the empty core.
    pub inner_radius: f64,
    /// Number of steps.
    pub steps: usize,
}

/// Fit the stair parameters into a `dx × dy × dz` box.
///
/// # Errors
///
/// Returns [`GeometryError`] for non-positive sizes or a footprint too
/// narrow for one tread.
pub fn stair_layout(dx: f64, dy: f64, dz: f64) -> Result<StairLayout, GeometryError> {
    ensure_positive("stair width", dx)?;
    ensure_positive("stair depth", dy)?;
    ensure_positive("stair height", dz)?;

    let (run, depth, rise) = STEP_SIZE;
    let radius = dx.min(dy) / 2.0;
    let tread = radius.min(depth);
    if tread < run {
        return Err(GeometryError::TooSmall {
            what: "stair footprint",
            min: 2.0 * run,
            value: dx.min(dy),
        });
    }

    Ok(StairLayout {
        step: (run, tread, rise),
        rotation: (run / tread).asin(),
        inner_radius: radius - tread,
        steps: (dz / rise).floor() as usize + 1,
    })
}

/// Spiral stairs filling a `dx × dy × dz` box, winding around the Z axis.
///
/// # Errors
///
/// See [`stair_layout`].
pub fn spiral_stairs(dx: f64, dy: f64, dz: f64) -> Result<Part, GeometryError> {
    let layout = stair_layout(dx, dy, dz)?;
    let (run, tread, rise) = layout.step;

    let steps = (0..layout.steps).map(|i| {
        let i = i as f64;
        Part::cuboid("step", TREAD_OVERLAP * run, tread, rise)
            .translate(0.0, layout.inner_radius, 0.0)
            .rotate(0.0, 0.0, i * layout.rotation)
            .translate(0.0, 0.0, i * rise)
    });

    tracing::debug!(steps = layout.steps, rotation = layout.rotation, "built spiral stairs");

    Ok(Part::group("stairs", steps))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::flatten;
    use approx::assert_relative_eq;

    #[test]
    fn test_layout_wide_box() {
        let layout = stair_layout(3.0, 2.0, 3.0).unwrap();
        assert_eq!(layout.step, (0.4, 0.8, 0.16));
        assert_relative_eq!(layout.inner_radius, 0.2);
        assert_relative_eq!(layout.rotation, 0.5f64.asin());
        assert_eq!(layout.steps, 19);
    }

    #[test]
    fn test_layout_narrow_box() {
        let layout = stair_layout(1.0, 1.0, 1.0).unwrap();
        assert_relative_eq!(layout.step.1, 0.5);
        assert_relative_eq!(layout.inner_radius, 0.0);
    }

    #[test]
    fn test_too_narrow() {
        assert!(matches!(
            stair_layout(0.6, 2.0, 3.0),
            Err(GeometryError::TooSmall { .. })
        ));
        assert!(stair_layout(2.0, 2.0, 0.0).is_err());
    }

    #[test]
    fn test_rejects_infinite_box() {
        assert!(matches!(
            stair_layout(2.0, 2.0, f64::INFINITY),
            Err(GeometryError::NonPositive { what: "stair height", .. })
        ));
        assert!(spiral_stairs(f64::INFINITY, 2.0, 3.0).is_err());
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(spiral_stairs(2.0, 2.0, 3.0).unwrap(), spiral_stairs(2.0, 2.0, 3.0).unwrap());
    }

    #[test]
    fn test_steps_climb() {
        let stairs = spiral_stairs(2.0, 2.0, 0.5).unwrap();
        let placed = flatten(stairs.node());
        assert_eq!(placed.len(), 4);
        for (i, step) in placed.iter().enumerate() {
            assert_relative_eq!(step.origin()[2], i as f64 * 0.16, epsilon = 1e-12);
        }
    }
}
