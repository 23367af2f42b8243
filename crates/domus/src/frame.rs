//! Reinforced-concrete space frames.
//!
//! A story is a row of pillars along the Y axis with one beam between each
//! pair of neighbouring pillars, laid on top of the pillars. Stories are
//! stacked bottom to top; each one starts `height + beam depth` above the
//! previous one so the next pillars stand on the beams.

use serde::Deserialize;

use crate::error::{ensure_all_positive, ensure_positive, GeometryError};
use crate::Part;

/// A rectangular cross-section.
///
/// For beams this is `(x, z)`: width across the frame and depth of the beam.
/// For pillars it is `(x, y)`: the pillar footprint.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Section {
    /// First dimension (always along X).
    pub width: f64,
    /// Second dimension (Z for beams, Y for pillars).
    pub depth: f64,
}

impl Section {
    /// Create a new section.
    pub fn new(width: f64, depth: f64) -> Self {
        Self { width, depth }
    }

    fn validate(&self, what: &'static str) -> Result<(), GeometryError> {
        ensure_positive(what, self.width)?;
        ensure_positive(what, self.depth)
    }
}

/// How per-story geometry is produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FrameLayout {
    /// Regenerate pillars and beams for every story, so each story can have
    /// its own height.
    #[default]
    PerStory,
    /// Build the pillar row and beam row once and reuse them for every
    /// story. Only valid when all stories share one height.
    Shared,
}

/// Y offsets of the pillars: `0, s0 + py, s0 + s1 + 2py, ...`.
pub fn pillar_offsets(pillar_depth: f64, spacings: &[f64]) -> Vec<f64> {
    let mut offsets = Vec::with_capacity(spacings.len() + 1);
    let mut y = 0.0;
    offsets.push(y);
    for spacing in spacings {
        y += spacing + pillar_depth;
        offsets.push(y);
    }
    offsets
}

/// Beam lengths along Y.
///
/// Every beam covers `spacing + py`; the first and the last beam are each
/// widened by `py / 2` so the beam row lines up with the outer pillar faces.
/// A single beam is both first and last and gets both halves, which keeps
/// the beam row exactly as long as the pillar row.
pub fn beam_lengths(pillar_depth: f64, spacings: &[f64]) -> Vec<f64> {
    let half = pillar_depth / 2.0;
    let last = spacings.len().saturating_sub(1);
    spacings
        .iter()
        .enumerate()
        .map(|(i, spacing)| {
            let mut length = spacing + pillar_depth;
            if i == 0 {
                length += half;
            }
            if i == last {
                length += half;
            }
            length
        })
        .collect()
}

/// One story's pillar row (standing at z = 0) and beam row (at z = 0, to be
/// lifted onto the pillars).
fn story_rows(beam: Section, pillar: Section, spacings: &[f64], height: f64) -> (Part, Part) {
    let pillars = pillar_offsets(pillar.depth, spacings)
        .into_iter()
        .map(|y| Part::cuboid("pillar", pillar.width, pillar.depth, height).translate(0.0, y, 0.0));

    let mut y = 0.0;
    let beams: Vec<Part> = beam_lengths(pillar.depth, spacings)
        .into_iter()
        .map(|length| {
            let part = Part::cuboid("beam", beam.width, length, beam.depth).translate(0.0, y, 0.0);
            y += length;
            part
        })
        .collect();

    (Part::group("pillars", pillars), Part::group("beams", beams))
}

/// Build a space frame.
///
/// * `beam` - beam section `(bx, bz)`
/// * `pillar` - pillar section `(px, py)`
/// * `spacings` - distances between consecutive pillar axes (pillar faces
///   are `spacing` apart)
/// * `heights` - story heights, bottom to top
///
/// Each story contributes its pillars, then its beams lifted by the story
/// height; the next story starts `height + bz` higher.
///
/// # Errors
///
/// Returns [`GeometryError`] for empty lists, non-positive dimensions, or
/// non-uniform heights with [`FrameLayout::Shared`].
pub fn build_frame(
    beam: Section,
    pillar: Section,
    spacings: &[f64],
    heights: &[f64],
    layout: FrameLayout,
) -> Result<Part, GeometryError> {
    beam.validate("beam section")?;
    pillar.validate("pillar section")?;
    ensure_all_positive("axis spacings", spacings)?;
    ensure_all_positive("story heights", heights)?;

    let shared = match layout {
        FrameLayout::PerStory => None,
        FrameLayout::Shared => {
            let first = heights[0];
            if heights.iter().any(|&h| h != first) {
                return Err(GeometryError::NonUniformStories);
            }
            Some(story_rows(beam, pillar, spacings, first))
        }
    };

    let mut stories = Vec::with_capacity(heights.len());
    let mut z = 0.0;
    for &height in heights {
        let (pillars, beams) = match &shared {
            Some((pillars, beams)) => (pillars.clone(), beams.clone()),
            None => story_rows(beam, pillar, spacings, height),
        };
        stories.push(Part::group(
            "story",
            [
                pillars.translate(0.0, 0.0, z),
                beams.translate(0.0, 0.0, z + height),
            ],
        ));
        z += height + beam.depth;
    }

    tracing::debug!(
        stories = heights.len(),
        pillars_per_story = spacings.len() + 1,
        beams_per_story = spacings.len(),
        total_height = z,
        "built space frame"
    );

    Ok(Part::group("frame", stories))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::flatten;
    use approx::assert_relative_eq;
    use domus_ir::Primitive;

    fn sample(layout: FrameLayout) -> Part {
        build_frame(
            Section::new(0.3, 0.5),
            Section::new(0.3, 0.3),
            &[4.0, 4.0],
            &[3.0, 3.0],
            layout,
        )
        .unwrap()
    }

    fn placed_z(frame: &Part, name: &str) -> Vec<f64> {
        flatten(frame.node())
            .into_iter()
            .filter(|p| p.name.as_deref() == Some(name))
            .map(|p| p.origin()[2])
            .collect()
    }

    #[test]
    fn test_counts_per_story() {
        let frame = sample(FrameLayout::PerStory);
        assert_eq!(frame.node().count_named("pillar"), 6);
        assert_eq!(frame.node().count_named("beam"), 4);
    }

    #[test]
    fn test_second_story_lift() {
        let frame = sample(FrameLayout::PerStory);
        let pillars = placed_z(&frame, "pillar");
        assert_eq!(pillars.len(), 6);
        for z in &pillars[..3] {
            assert_relative_eq!(*z, 0.0);
        }
        for z in &pillars[3..] {
            assert_relative_eq!(*z, 3.0 + 0.5);
        }

        let beams = placed_z(&frame, "beam");
        assert_relative_eq!(beams[0], 3.0);
        assert_relative_eq!(beams[3], 3.5 + 3.0);
    }

    #[test]
    fn test_canonical_order() {
        let frame = sample(FrameLayout::PerStory);
        let names: Vec<String> = flatten(frame.node())
            .into_iter()
            .filter_map(|p| p.name)
            .collect();
        assert_eq!(
            names,
            ["pillar", "pillar", "pillar", "beam", "beam", "pillar", "pillar", "pillar", "beam", "beam"]
        );
    }

    #[test]
    fn test_pillar_offsets() {
        let offsets = pillar_offsets(0.3, &[4.0, 2.0]);
        assert_eq!(offsets.len(), 3);
        assert_relative_eq!(offsets[1], 4.3);
        assert_relative_eq!(offsets[2], 6.6);
    }

    #[test]
    fn test_beam_row_tiles_pillar_row() {
        for spacings in [vec![4.0], vec![4.0, 4.0], vec![3.0, 5.5, 2.25, 4.0]] {
            let py = 0.3;
            let n = spacings.len() as f64;
            let beams = beam_lengths(py, &spacings);
            assert_eq!(beams.len(), spacings.len());

            let total: f64 = beams.iter().sum();
            let sum: f64 = spacings.iter().sum();
            assert_relative_eq!(total, sum + (n + 1.0) * py, epsilon = 1e-12);

            // Pillar row extent: last pillar offset plus one pillar depth.
            let last = *pillar_offsets(py, &spacings).last().unwrap();
            assert_relative_eq!(total, last + py, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_half_width_rule() {
        let beams = beam_lengths(0.4, &[4.0, 4.0, 4.0]);
        assert_relative_eq!(beams[0], 4.0 + 0.4 + 0.2);
        assert_relative_eq!(beams[1], 4.0 + 0.4);
        assert_relative_eq!(beams[2], 4.0 + 0.4 + 0.2);
    }

    #[test]
    fn test_beams_are_contiguous() {
        let frame = sample(FrameLayout::PerStory);
        let beams: Vec<_> = flatten(frame.node())
            .into_iter()
            .filter(|p| p.name.as_deref() == Some("beam"))
            .take(2)
            .collect();
        let Primitive::Cuboid { size } = &beams[0].primitive else {
            panic!("beam should be a cuboid");
        };
        assert_relative_eq!(beams[1].origin()[1], size.y);
        assert_relative_eq!(size.x, 0.3);
        assert_relative_eq!(size.z, 0.5);
    }

    #[test]
    fn test_layouts_agree_on_uniform_heights() {
        let per_story = sample(FrameLayout::PerStory);
        let shared = sample(FrameLayout::Shared);
        assert_eq!(per_story, shared);
    }

    #[test]
    fn test_shared_rejects_mixed_heights() {
        let err = build_frame(
            Section::new(0.3, 0.5),
            Section::new(0.3, 0.3),
            &[4.0],
            &[3.0, 2.7],
            FrameLayout::Shared,
        )
        .unwrap_err();
        assert_eq!(err, GeometryError::NonUniformStories);
    }

    #[test]
    fn test_per_story_heights() {
        let frame = build_frame(
            Section::new(0.3, 0.5),
            Section::new(0.3, 0.3),
            &[4.0],
            &[3.0, 2.5],
            FrameLayout::PerStory,
        )
        .unwrap();
        let heights: Vec<f64> = flatten(frame.node())
            .into_iter()
            .filter(|p| p.name.as_deref() == Some("pillar"))
            .map(|p| match p.primitive {
                Primitive::Cuboid { size } => size.z,
                _ => 0.0,
            })
            .collect();
        assert_eq!(heights, [3.0, 3.0, 2.5, 2.5]);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let beam = Section::new(0.3, 0.5);
        let pillar = Section::new(0.3, 0.3);
        assert_eq!(
            build_frame(beam, pillar, &[], &[3.0], FrameLayout::PerStory).unwrap_err(),
            GeometryError::Empty("axis spacings")
        );
        assert_eq!(
            build_frame(beam, pillar, &[4.0], &[], FrameLayout::PerStory).unwrap_err(),
            GeometryError::Empty("story heights")
        );
        assert!(matches!(
            build_frame(Section::new(0.0, 0.5), pillar, &[4.0], &[3.0], FrameLayout::PerStory),
            Err(GeometryError::NonPositive { what: "beam section", .. })
        ));
    }

    #[test]
    fn test_idempotent() {
        assert_eq!(sample(FrameLayout::PerStory), sample(FrameLayout::PerStory));
    }
}
