//! Glazed panels (windows and doors) partitioned from an occupancy grid.
//!
//! A panel is a grid of cells: column widths come from `x_quotes`, row
//! heights from `y_quotes`. Each cell is either structural (framing) or
//! glazed. Each row is folded into maximal runs of one material, and every
//! run becomes a single box, so neighbouring cells of the same class never
//! produce separate solids.
//!
//! Building happens in two stages. [`build_panel`] validates the grid and
//! computes the partition; [`Panel::scaled`] then emits the geometry at a
//! caller-chosen scale, so the final panel size is independent of the cell
//! count.

use crate::error::{ensure_all_positive, ensure_positive, GeometryError};
use crate::{Part, Rgba};

/// Cell classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Material {
    /// Opaque framing.
    Structural,
    /// Glass.
    Glazed,
}

impl Material {
    fn from_flag(row: usize, col: usize, flag: u8) -> Result<Self, GeometryError> {
        match flag {
            1 => Ok(Material::Structural),
            0 => Ok(Material::Glazed),
            value => Err(GeometryError::InvalidOccupancy { row, col, value }),
        }
    }
}

/// A maximal run of same-class cells within one row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpanRun {
    /// Material of every cell in the run.
    pub material: Material,
    /// Total width of the run.
    pub width: f64,
}

/// Fold one row of classified cells into maximal runs.
///
/// Adjacent runs always have different materials.
pub fn merge_runs(cells: impl IntoIterator<Item = (Material, f64)>) -> Vec<SpanRun> {
    cells
        .into_iter()
        .fold(Vec::new(), |mut runs: Vec<SpanRun>, (material, width)| {
            match runs.last_mut() {
                Some(last) if last.material == material => last.width += width,
                _ => runs.push(SpanRun { material, width }),
            }
            runs
        })
}

/// One partitioned row of a panel.
#[derive(Debug, Clone, PartialEq)]
pub struct PanelRow {
    /// Offset of the row's bottom edge along Y.
    pub y: f64,
    /// Row height.
    pub height: f64,
    /// Maximal runs, left to right.
    pub runs: Vec<SpanRun>,
}

impl PanelRow {
    /// Signed profile for `material`: its runs as positive widths, the other
    /// material's runs as negative gaps.
    pub fn profile(&self, material: Material) -> Vec<f64> {
        self.runs
            .iter()
            .map(|r| if r.material == material { r.width } else { -r.width })
            .collect()
    }

    /// Runs of `material` with their X offsets.
    pub fn placed_runs(&self, material: Material) -> Vec<(f64, f64)> {
        let mut x = 0.0;
        let mut placed = Vec::new();
        for run in &self.runs {
            if run.material == material {
                placed.push((x, run.width));
            }
            x += run.width;
        }
        placed
    }

    /// Total emitted width of `material` in this row.
    pub fn width_of(&self, material: Material) -> f64 {
        self.placed_runs(material).iter().map(|(_, w)| w).sum()
    }
}

/// Glass and framing colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Color of glazed runs.
    pub glass: Rgba,
    /// Color of structural runs.
    pub frame: Rgba,
}

impl Palette {
    /// Light blue glass in white framing.
    pub fn window() -> Self {
        Self {
            glass: Rgba::from_u8(182, 208, 249),
            frame: Rgba::from_u8(255, 255, 255),
        }
    }

    /// Light blue glass in black framing.
    pub fn door() -> Self {
        Self {
            glass: Rgba::from_u8(182, 208, 249),
            frame: Rgba::from_u8(0, 0, 0),
        }
    }
}

/// Layer depths along Z.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Depths {
    /// Depth of the glass layer.
    pub glass: f64,
    /// Depth of the framing layer.
    pub frame: f64,
}

impl Depths {
    /// Create layer depths.
    pub fn new(glass: f64, frame: f64) -> Self {
        Self { glass, frame }
    }
}

/// A validated, partitioned panel awaiting its final scale.
#[derive(Debug, Clone, PartialEq)]
pub struct Panel {
    rows: Vec<PanelRow>,
    depths: Depths,
    palette: Palette,
}

/// Partition a panel.
///
/// `occupancy[row][col]` is 1 for framing and 0 for glass; it must have one
/// row per `y_quotes` entry and one column per `x_quotes` entry.
///
/// # Errors
///
/// Returns [`GeometryError`] for empty or non-positive quotes and depths,
/// a grid whose shape disagrees with the quotes, or flags other than 0/1.
pub fn build_panel(
    x_quotes: &[f64],
    y_quotes: &[f64],
    depths: Depths,
    occupancy: &[Vec<u8>],
    palette: Palette,
) -> Result<Panel, GeometryError> {
    ensure_all_positive("x quotes", x_quotes)?;
    ensure_all_positive("y quotes", y_quotes)?;
    ensure_positive("glass depth", depths.glass)?;
    ensure_positive("frame depth", depths.frame)?;
    if occupancy.len() != y_quotes.len() {
        return Err(GeometryError::ShapeMismatch {
            what: "occupancy rows".to_string(),
            expected: y_quotes.len(),
            actual: occupancy.len(),
        });
    }
    for (i, row) in occupancy.iter().enumerate() {
        if row.len() != x_quotes.len() {
            return Err(GeometryError::ShapeMismatch {
                what: format!("occupancy row {i}"),
                expected: x_quotes.len(),
                actual: row.len(),
            });
        }
    }

    let mut rows = Vec::with_capacity(y_quotes.len());
    let mut y = 0.0;
    for (iy, (&height, flags)) in y_quotes.iter().zip(occupancy).enumerate() {
        let cells = flags
            .iter()
            .zip(x_quotes)
            .enumerate()
            .map(|(ix, (&flag, &width))| Ok((Material::from_flag(iy, ix, flag)?, width)))
            .collect::<Result<Vec<_>, GeometryError>>()?;
        rows.push(PanelRow {
            y,
            height,
            runs: merge_runs(cells),
        });
        y += height;
    }

    tracing::debug!(
        rows = rows.len(),
        runs = rows.iter().map(|r| r.runs.len()).sum::<usize>(),
        "partitioned panel"
    );

    Ok(Panel {
        rows,
        depths,
        palette,
    })
}

/// Partition a window: light blue glass, white framing.
pub fn window(
    x_quotes: &[f64],
    y_quotes: &[f64],
    depths: Depths,
    occupancy: &[Vec<u8>],
) -> Result<Panel, GeometryError> {
    build_panel(x_quotes, y_quotes, depths, occupancy, Palette::window())
}

/// Partition a door: light blue glass, black framing.
pub fn door(
    x_quotes: &[f64],
    y_quotes: &[f64],
    depths: Depths,
    occupancy: &[Vec<u8>],
) -> Result<Panel, GeometryError> {
    build_panel(x_quotes, y_quotes, depths, occupancy, Palette::door())
}

impl Panel {
    /// The partitioned rows, bottom to top.
    pub fn rows(&self) -> &[PanelRow] {
        &self.rows
    }

    fn layer(&self, material: Material, name: &str, depth: f64) -> Part {
        let boxes = self.rows.iter().flat_map(|row| {
            row.placed_runs(material)
                .into_iter()
                .map(move |(x, width)| Part::cuboid(name, width, row.height, depth).translate(x, row.y, 0.0))
        });
        Part::group(name, boxes)
    }

    /// Emit the panel geometry scaled by `(dx, dy, dz)`.
    ///
    /// The glass layer sits `frame depth / 2` along Z from the framing layer.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonPositive`] for a non-positive factor.
    pub fn scaled(&self, dx: f64, dy: f64, dz: f64) -> Result<Part, GeometryError> {
        ensure_positive("panel scale", dx)?;
        ensure_positive("panel scale", dy)?;
        ensure_positive("panel scale", dz)?;

        let glass = self
            .layer(Material::Glazed, "glazing", self.depths.glass)
            .color(self.palette.glass)
            .translate(0.0, 0.0, self.depths.frame / 2.0);
        let frame = self
            .layer(Material::Structural, "framing", self.depths.frame)
            .color(self.palette.frame);

        Ok(Part::group("panel", [glass, frame]).scale(dx, dy, dz))
    }
}
