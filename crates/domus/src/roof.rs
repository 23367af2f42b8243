//! Hip roofs from a ridge polygon and per-corner eave directions.
//!
//! The eave polygon is derived from one [`Direction`] per footprint corner:
//! each base point is pushed out diagonally by the overhang, with the sign
//! of the push on each axis chosen by the corner's [`Quadrant`], and moved
//! vertically by `overhang * sin(slope_angle)`. Slope faces then join each
//! ridge edge to the matching eave edge.

use domus_ir::Vec3;
use std::f64::consts::FRAC_PI_4;

use crate::error::{ensure_finite, ensure_non_empty, ensure_positive, GeometryError};
use crate::Part;

/// Overhang used when none is given.
pub const DEFAULT_EAVE_OVERHANG: f64 = 30.0;

/// Texture attached to roofs by default.
pub const DEFAULT_ROOF_TEXTURE: &str = "txt/roof.jpg";

/// Corner class selecting the horizontal eave offset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Quadrant {
    /// No horizontal offset.
    #[default]
    None,
    /// Offset towards (+x, +y).
    First,
    /// Offset towards (-x, +y).
    Second,
    /// Offset towards (-x, -y).
    Third,
    /// Offset towards (+x, -y).
    Fourth,
}

impl Quadrant {
    /// Map the numeric tag 1–4; anything else is [`Quadrant::None`].
    pub fn from_tag(tag: i64) -> Self {
        match tag {
            1 => Quadrant::First,
            2 => Quadrant::Second,
            3 => Quadrant::Third,
            4 => Quadrant::Fourth,
            _ => Quadrant::None,
        }
    }

    /// Sign of the offset on X and Y.
    pub fn signs(self) -> (f64, f64) {
        match self {
            Quadrant::None => (0.0, 0.0),
            Quadrant::First => (1.0, 1.0),
            Quadrant::Second => (-1.0, 1.0),
            Quadrant::Third => (-1.0, -1.0),
            Quadrant::Fourth => (1.0, -1.0),
        }
    }
}

/// A footprint corner and the way its eave vertex is pushed out.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Direction {
    /// Base point.
    pub point: Vec3,
    /// Offset class.
    pub quadrant: Quadrant,
}

impl Direction {
    /// Create a direction entry.
    pub fn new(point: Vec3, quadrant: Quadrant) -> Self {
        Self { point, quadrant }
    }
}

/// Roof parameters that rarely change.
#[derive(Debug, Clone, PartialEq)]
pub struct RoofOptions {
    /// Diagonal eave overhang.
    pub overhang: f64,
    /// Texture attached to the finished roof.
    pub texture: Option<String>,
}

impl Default for RoofOptions {
    fn default() -> Self {
        Self {
            overhang: DEFAULT_EAVE_OVERHANG,
            texture: Some(DEFAULT_ROOF_TEXTURE.to_string()),
        }
    }
}

/// Eave vertices for `directions`, closed by repeating the first vertex.
///
/// The horizontal push is `overhang * cos(π/4)` on each axis. This assumes
/// corners bisected at 45°; the actual corner geometry is not consulted.
pub fn eave_points(directions: &[Direction], slope_angle: f64, overhang: f64) -> Vec<Vec3> {
    let reach = overhang * FRAC_PI_4.cos();
    let lift = overhang * slope_angle.sin();
    let mut points: Vec<Vec3> = directions
        .iter()
        .map(|d| {
            let (sx, sy) = d.quadrant.signs();
            Vec3::new(d.point.x + sx * reach, d.point.y + sy * reach, d.point.z + lift)
        })
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

/// Pairs of consecutive items, wrapping the last back to the first.
pub fn cyclic_edges<T: Copy>(items: &[T]) -> Vec<(T, T)> {
    items
        .iter()
        .zip(items.iter().cycle().skip(1))
        .map(|(&a, &b)| (a, b))
        .collect()
}

fn validate_cells(cells: &[Vec<usize>], len: usize) -> Result<(), GeometryError> {
    ensure_non_empty("roof cells", cells)?;
    for (cell, indices) in cells.iter().enumerate() {
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(GeometryError::InvalidCell { cell, index, len });
        }
    }
    Ok(())
}

/// Build a roof with [`RoofOptions::default`].
///
/// * `ridge` - ridge polygon vertices, in order
/// * `cells` - 0-based vertex cells for the flat caps
/// * `slope_angle` - signed angle (radians) of the eave drop
/// * `directions` - one entry per ridge vertex
///
/// # Errors
///
/// See [`build_roof_with`].
pub fn build_roof(
    ridge: &[Vec3],
    cells: &[Vec<usize>],
    slope_angle: f64,
    directions: &[Direction],
) -> Result<Part, GeometryError> {
    build_roof_with(ridge, cells, slope_angle, directions, &RoofOptions::default())
}

/// Build a roof: ridge cap, one slope face per ridge edge, eave cap, with
/// the texture attached to the whole union.
///
/// # Errors
///
/// Returns [`GeometryError`] when the ridge, cells or directions are empty,
/// the directions do not pair one-to-one with ridge vertices, a cell points
/// past the ridge vertices, or the overhang is not positive.
pub fn build_roof_with(
    ridge: &[Vec3],
    cells: &[Vec<usize>],
    slope_angle: f64,
    directions: &[Direction],
    options: &RoofOptions,
) -> Result<Part, GeometryError> {
    ensure_non_empty("ridge vertices", ridge)?;
    ensure_non_empty("roof directions", directions)?;
    if directions.len() != ridge.len() {
        return Err(GeometryError::ShapeMismatch {
            what: "roof directions".to_string(),
            expected: ridge.len(),
            actual: directions.len(),
        });
    }
    validate_cells(cells, ridge.len())?;
    ensure_positive("eave overhang", options.overhang)?;
    ensure_finite("slope angle", slope_angle)?;

    let eave = eave_points(directions, slope_angle, options.overhang);
    let open_eave = &eave[..eave.len() - 1];

    let slopes = cyclic_edges(ridge)
        .into_iter()
        .zip(cyclic_edges(open_eave))
        .map(|((r0, r1), (e0, e1))| {
            // Points go ridge start, ridge end, eave start, eave end; the face
            // walks them around the quad.
            Part::polyhedron("slope", vec![r0, r1, e0, e1], vec![vec![0, 1, 3, 2]])
        });

    let mut parts = vec![Part::polyhedron("ridge", ridge.to_vec(), cells.to_vec())];
    parts.extend(slopes);
    parts.push(Part::polyhedron("eave", eave, cells.to_vec()));

    tracing::debug!(
        ridge_vertices = ridge.len(),
        slopes = ridge.len(),
        slope_angle,
        "built roof"
    );

    Ok(Part::group("roof", parts).with_texture(options.texture.as_deref()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::flatten;
    use approx::assert_relative_eq;
    use domus_ir::{Primitive, SceneNode};

    fn square_ridge() -> Vec<Vec3> {
        vec![
            Vec3::new(10.0, 10.0, 5.0),
            Vec3::new(0.0, 10.0, 5.0),
            Vec3::new(0.0, 0.0, 5.0),
            Vec3::new(10.0, 0.0, 5.0),
        ]
    }

    fn corner_directions() -> Vec<Direction> {
        square_ridge()
            .into_iter()
            .zip([Quadrant::First, Quadrant::Second, Quadrant::Third, Quadrant::Fourth])
            .map(|(p, q)| Direction::new(p, q))
            .collect()
    }

    #[test]
    fn test_quadrant_tags() {
        assert_eq!(Quadrant::from_tag(3), Quadrant::Third);
        assert_eq!(Quadrant::from_tag(0), Quadrant::None);
        assert_eq!(Quadrant::from_tag(7), Quadrant::None);
        assert_eq!(Quadrant::None.signs(), (0.0, 0.0));
    }

    #[test]
    fn test_flat_eave_is_horizontal_offset() {
        let directions = corner_directions();
        let eave = eave_points(&directions, 0.0, DEFAULT_EAVE_OVERHANG);
        assert_eq!(eave.len(), 5);
        assert_eq!(eave[0], eave[4]);

        let reach = DEFAULT_EAVE_OVERHANG * FRAC_PI_4.cos();
        let mut signs = Vec::new();
        for (d, e) in directions.iter().zip(&eave) {
            assert_relative_eq!(e.z, d.point.z);
            let dx = e.x - d.point.x;
            let dy = e.y - d.point.y;
            assert_relative_eq!(dx.abs(), reach);
            assert_relative_eq!(dy.abs(), reach);
            signs.push((dx > 0.0, dy > 0.0));
        }
        signs.sort();
        signs.dedup();
        assert_eq!(signs.len(), 4);
    }

    #[test]
    fn test_slope_angle_lifts_eave() {
        let eave = eave_points(&corner_directions(), -0.5, 2.0);
        for e in &eave {
            assert_relative_eq!(e.z, 5.0 + 2.0 * (-0.5f64).sin());
        }
    }

    #[test]
    fn test_unclassified_corner_stays_put() {
        let p = Vec3::new(1.0, 2.0, 3.0);
        let eave = eave_points(&[Direction::new(p, Quadrant::None)], 0.0, 30.0);
        assert_eq!(eave, [p, p]);
    }

    #[test]
    fn test_cyclic_edges() {
        assert_eq!(cyclic_edges(&[1, 2, 3]), [(1, 2), (2, 3), (3, 1)]);
        assert_eq!(cyclic_edges(&[7]), [(7, 7)]);
        assert!(cyclic_edges::<i32>(&[]).is_empty());
    }

    #[test]
    fn test_roof_structure() {
        let roof = build_roof(&square_ridge(), &[vec![0, 1, 2, 3]], 0.3, &corner_directions()).unwrap();
        let SceneNode::Texture { path, .. } = roof.node() else {
            panic!("texture should wrap the whole roof");
        };
        assert_eq!(path, DEFAULT_ROOF_TEXTURE);

        let names: Vec<String> = flatten(roof.node()).into_iter().filter_map(|p| p.name).collect();
        assert_eq!(names, ["ridge", "slope", "slope", "slope", "slope", "eave"]);
    }

    #[test]
    fn test_slope_faces_join_matching_edges() {
        let directions = corner_directions();
        let roof = build_roof_with(
            &square_ridge(),
            &[vec![0, 1, 2, 3]],
            0.0,
            &directions,
            &RoofOptions {
                overhang: 2.0,
                texture: None,
            },
        )
        .unwrap();
        let eave = eave_points(&directions, 0.0, 2.0);
        let placed = flatten(roof.node());
        let last = placed
            .iter()
            .filter(|p| p.name.as_deref() == Some("slope"))
            .last()
            .unwrap();
        let Primitive::Polyhedron { points, cells } = &last.primitive else {
            panic!("slope should be a polyhedron");
        };
        let ridge = square_ridge();
        assert_eq!(points, &vec![ridge[3], ridge[0], eave[3], eave[0]]);
        assert_eq!(cells, &vec![vec![0, 1, 3, 2]]);
        assert!(placed.iter().all(|p| p.texture.is_none()));
    }

    #[test]
    fn test_rejects_bad_input() {
        let ridge = square_ridge();
        let cells = vec![vec![0, 1, 2, 3]];
        assert_eq!(
            build_roof(&[], &cells, 0.0, &[]).unwrap_err(),
            GeometryError::Empty("ridge vertices")
        );
        assert_eq!(
            build_roof(&ridge, &[], 0.0, &corner_directions()).unwrap_err(),
            GeometryError::Empty("roof cells")
        );
        assert!(matches!(
            build_roof(&ridge, &cells, f64::INFINITY, &corner_directions()),
            Err(GeometryError::NonFinite { what: "slope angle", .. })
        ));
        assert_eq!(
            build_roof(&ridge, &cells, 0.0, &[]).unwrap_err(),
            GeometryError::Empty("roof directions")
        );
        assert!(matches!(
            build_roof(&ridge, &cells, 0.0, &corner_directions()[..3]),
            Err(GeometryError::ShapeMismatch { expected: 4, actual: 3, .. })
        ));
        assert_eq!(
            build_roof(&ridge, &[vec![0, 4]], 0.0, &corner_directions()).unwrap_err(),
            GeometryError::InvalidCell {
                cell: 0,
                index: 4,
                len: 4
            }
        );
    }

    #[test]
    fn test_idempotent() {
        let build = || build_roof(&square_ridge(), &[vec![0, 1, 2, 3]], -0.4, &corner_directions()).unwrap();
        assert_eq!(build(), build());
    }
}
