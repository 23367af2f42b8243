//! Multi-storey house composition from a declarative configuration.
//!
//! The configuration is TOML. Each floor lists the drawings that make up its
//! pavements and walls, the window strips cut out of a drawing, and the
//! window/door panels placed on it. An optional space frame, roof and
//! spiral staircase complete the building.
//!
//! ```toml
//! [[floors]]
//! height = 3.0
//! [[floors.walls]]
//! lines_file = "lines/f1/ext_walls.lines"
//! height = 3.0
//! ```

use std::path::Path;

use domus_ir::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::error::{ensure_positive, GeometryError};
use crate::frame::{build_frame, FrameLayout, Section};
use crate::lines::{DrawingSource, LinesError, DEFAULT_DRAWING_SCALE};
use crate::panel::{door, window, Depths};
use crate::roof::{build_roof_with, Direction, Quadrant, RoofOptions, DEFAULT_EAVE_OVERHANG};
use crate::stairs::spiral_stairs;
use crate::Part;

/// Errors from loading a configuration or composing a house.
#[derive(Debug, Error)]
pub enum HouseError {
    /// The configuration file could not be read.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration is not valid TOML or does not match the schema.
    #[error("invalid configuration: {0}")]
    Toml(#[from] toml::de::Error),

    /// A drawing could not be loaded.
    #[error(transparent)]
    Lines(#[from] LinesError),

    /// A generator rejected its input.
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    /// The house has no floors.
    #[error("house has no floors")]
    NoFloors,
}

fn default_drawing_scale() -> f64 {
    DEFAULT_DRAWING_SCALE
}

fn default_overhang() -> f64 {
    DEFAULT_EAVE_OVERHANG
}

fn unit_scale() -> [f64; 3] {
    [1.0, 1.0, 1.0]
}

fn default_sill() -> f64 {
    1.0
}

fn default_lintel_base() -> f64 {
    2.5
}

fn default_lintel() -> f64 {
    0.5
}

/// A whole building.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HouseConfig {
    /// Display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Scale applied to every drawing.
    #[serde(default = "default_drawing_scale")]
    pub drawing_scale: f64,
    /// Floors, bottom to top.
    pub floors: Vec<FloorConfig>,
    /// Structural frame spanning all floors.
    #[serde(default)]
    pub frame: Option<FrameConfig>,
    /// Roof placed on top of the last floor.
    #[serde(default)]
    pub roof: Option<RoofConfig>,
    /// Spiral staircase.
    #[serde(default)]
    pub stairs: Option<StairsConfig>,
}

/// One floor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FloorConfig {
    /// Story height; the next floor starts this much higher.
    pub height: f64,
    /// Floor slabs.
    #[serde(default)]
    pub pavement: Vec<LayerSpec>,
    /// Walls.
    #[serde(default)]
    pub walls: Vec<LayerSpec>,
    /// Wall strips below and above windows.
    #[serde(default)]
    pub window_strips: Vec<WindowStripSpec>,
    /// Window and door panels.
    #[serde(default)]
    pub openings: Vec<OpeningSpec>,
}

/// A drawing extruded to a height, optionally textured.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayerSpec {
    /// Drawing name, resolved by the [`DrawingSource`].
    pub lines_file: String,
    /// Extrusion height.
    pub height: f64,
    /// Texture reference; absent or empty means untextured.
    #[serde(default)]
    pub texture: Option<String>,
}

/// The wall strips framing a row of windows.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WindowStripSpec {
    /// Drawing of the window openings.
    pub lines_file: String,
    /// Height of the strip under the windows.
    #[serde(default = "default_sill")]
    pub sill: f64,
    /// Where the strip above the windows starts.
    #[serde(default = "default_lintel_base")]
    pub lintel_base: f64,
    /// Height of the strip above the windows.
    #[serde(default = "default_lintel")]
    pub lintel: f64,
}

/// Which panel preset an opening uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    /// White-framed window.
    Window,
    /// Black-framed door.
    Door,
}

/// A window or door panel.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OpeningSpec {
    /// Preset.
    pub kind: OpeningKind,
    /// Column widths.
    pub x_quotes: Vec<f64>,
    /// Row heights.
    pub y_quotes: Vec<f64>,
    /// `[glass depth, frame depth]`.
    pub depths: [f64; 2],
    /// `occupancy[row][col]`: 1 for framing, 0 for glass.
    pub occupancy: Vec<Vec<u8>>,
    /// Final per-axis scale.
    #[serde(default = "unit_scale")]
    pub scale: [f64; 3],
    /// Position on the floor.
    #[serde(default)]
    pub position: [f64; 3],
}

/// Space frame parameters; story heights come from the floors.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FrameConfig {
    /// Beam section `[x, z]`.
    pub beam: [f64; 2],
    /// Pillar section `[x, y]`.
    pub pillar: [f64; 2],
    /// Distances between pillar axes.
    pub spacings: Vec<f64>,
    /// Geometry layout.
    #[serde(default)]
    pub layout: FrameLayout,
}

/// One roof corner.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DirectionConfig {
    /// Base point.
    pub point: [f64; 3],
    /// Quadrant tag 1–4, or 0 for no horizontal offset.
    #[serde(default)]
    pub quadrant: i64,
}

/// Roof parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RoofConfig {
    /// Ridge polygon, relative to the top of the last floor.
    pub ridge: Vec<[f64; 3]>,
    /// Cap cells as 0-based ridge vertex indices.
    pub cells: Vec<Vec<usize>>,
    /// Eave slope angle in radians.
    #[serde(default)]
    pub slope_angle: f64,
    /// One entry per ridge vertex.
    pub directions: Vec<DirectionConfig>,
    /// Diagonal eave overhang.
    #[serde(default = "default_overhang")]
    pub overhang: f64,
    /// Roof texture.
    #[serde(default)]
    pub texture: Option<String>,
}

/// Spiral staircase parameters.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StairsConfig {
    /// Bounding box `[dx, dy, dz]`.
    pub size: [f64; 3],
    /// Position of the box.
    #[serde(default)]
    pub position: [f64; 3],
}

impl HouseConfig {
    /// Parse a TOML configuration.
    pub fn from_toml_str(text: &str) -> Result<Self, HouseError> {
        Ok(toml::from_str(text)?)
    }

    /// Read and parse a TOML configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, HouseError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Story heights, bottom to top.
    pub fn story_heights(&self) -> Vec<f64> {
        self.floors.iter().map(|f| f.height).collect()
    }

    /// Combined height of all floors.
    pub fn total_height(&self) -> f64 {
        self.floors.iter().map(|f| f.height).sum()
    }
}

fn extrude_layers(
    name: &str,
    layers: &[LayerSpec],
    scale: f64,
    source: &impl DrawingSource,
) -> Result<Part, HouseError> {
    let parts = layers
        .iter()
        .map(|layer| {
            let drawing = source.load(&layer.lines_file)?.scaled(scale);
            Ok(Part::extruded_drawing(name, &drawing, layer.height).with_texture(layer.texture.as_deref()))
        })
        .collect::<Result<Vec<_>, HouseError>>()?;
    Ok(Part::group(name, parts))
}

fn window_strips(
    strips: &[WindowStripSpec],
    scale: f64,
    source: &impl DrawingSource,
) -> Result<Part, HouseError> {
    let parts = strips
        .iter()
        .map(|strip| {
            let drawing = source.load(&strip.lines_file)?.scaled(scale);
            let sill = Part::extruded_drawing("sill", &drawing, strip.sill);
            let lintel =
                Part::extruded_drawing("lintel", &drawing, strip.lintel).translate(0.0, 0.0, strip.lintel_base);
            Ok(Part::group("window-strip", [sill, lintel]))
        })
        .collect::<Result<Vec<_>, HouseError>>()?;
    Ok(Part::group("window-strips", parts))
}

fn opening(opening: &OpeningSpec) -> Result<Part, GeometryError> {
    let depths = Depths::new(opening.depths[0], opening.depths[1]);
    let panel = match opening.kind {
        OpeningKind::Window => window(&opening.x_quotes, &opening.y_quotes, depths, &opening.occupancy)?,
        OpeningKind::Door => door(&opening.x_quotes, &opening.y_quotes, depths, &opening.occupancy)?,
    };
    let [dx, dy, dz] = opening.scale;
    let [x, y, z] = opening.position;
    Ok(panel.scaled(dx, dy, dz)?.translate(x, y, z))
}

/// Compose one floor at its own origin.
pub fn compose_floor(
    floor: &FloorConfig,
    drawing_scale: f64,
    source: &impl DrawingSource,
) -> Result<Part, HouseError> {
    ensure_positive("floor height", floor.height)?;

    let openings = floor
        .openings
        .iter()
        .map(opening)
        .collect::<Result<Vec<_>, _>>()?;

    let sections = [
        extrude_layers("pavement", &floor.pavement, drawing_scale, source)?,
        extrude_layers("walls", &floor.walls, drawing_scale, source)?,
        window_strips(&floor.window_strips, drawing_scale, source)?,
        Part::group("openings", openings),
    ];
    Ok(Part::group(
        "floor",
        sections.into_iter().filter(|section| !section.is_empty()),
    ))
}

/// Compose the whole house.
///
/// Floors are stacked by their heights. The frame uses the floor heights as
/// its story heights, the roof sits on the last floor, and the stairs stand
/// at their configured position.
///
/// # Errors
///
/// Returns [`HouseError`] when a drawing cannot be loaded or a generator
/// rejects its parameters. Nothing is returned on failure.
pub fn compose(config: &HouseConfig, source: &impl DrawingSource) -> Result<Part, HouseError> {
    if config.floors.is_empty() {
        return Err(HouseError::NoFloors);
    }
    ensure_positive("drawing scale", config.drawing_scale)?;

    let name = config.name.clone().unwrap_or_else(|| "house".to_string());
    let mut parts = Vec::with_capacity(config.floors.len() + 3);
    let mut z = 0.0;
    for (i, floor) in config.floors.iter().enumerate() {
        if floor.walls.is_empty() {
            tracing::warn!(floor = i, "floor has no walls");
        }
        let part = compose_floor(floor, config.drawing_scale, source)?;
        tracing::info!(floor = i, base = z, leaves = part.node().leaf_count(), "composed floor");
        parts.push(part.translate(0.0, 0.0, z));
        z += floor.height;
    }

    if let Some(frame) = &config.frame {
        parts.push(build_frame(
            Section::new(frame.beam[0], frame.beam[1]),
            Section::new(frame.pillar[0], frame.pillar[1]),
            &frame.spacings,
            &config.story_heights(),
            frame.layout,
        )?);
    }

    if let Some(roof) = &config.roof {
        let ridge: Vec<Vec3> = roof.ridge.iter().copied().map(Vec3::from).collect();
        let directions: Vec<Direction> = roof
            .directions
            .iter()
            .map(|d| Direction::new(d.point.into(), Quadrant::from_tag(d.quadrant)))
            .collect();
        let options = RoofOptions {
            overhang: roof.overhang,
            texture: roof.texture.clone(),
        };
        let part = build_roof_with(&ridge, &roof.cells, roof.slope_angle, &directions, &options)?;
        parts.push(part.translate(0.0, 0.0, z));
    } else {
        tracing::debug!("no roof configured");
    }

    if let Some(stairs) = &config.stairs {
        let [dx, dy, dz] = stairs.size;
        let [x, y, sz] = stairs.position;
        parts.push(spiral_stairs(dx, dy, dz)?.translate(x, y, sz));
    }

    let house = Part::group(name, parts);
    tracing::info!(
        floors = config.floors.len(),
        height = z,
        leaves = house.node().leaf_count(),
        "composed house"
    );
    Ok(house)
}
