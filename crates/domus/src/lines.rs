//! `.lines` 2D drawings.
//!
//! A drawing is plain text with one segment per line: four comma-separated
//! numbers `a,b,c,d`. The segment runs from `(b, a)` to `(d, c)`; the
//! exporting tool writes rows before columns, so x and y are swapped on read.
//! Blank lines are ignored.

use std::collections::HashMap;
use std::path::PathBuf;
use std::str::FromStr;

use domus_ir::Segment2;
use thiserror::Error;

/// Scale applied to drawings by default (drawing units to meters).
pub const DEFAULT_DRAWING_SCALE: f64 = 0.015;

/// Errors from loading or parsing a drawing.
#[derive(Debug, Error)]
pub enum LinesError {
    /// The drawing could not be read.
    #[error("cannot read drawing {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// A row is not four comma-separated numbers.
    #[error("line {line}: {reason}")]
    Parse {
        /// 1-based line number.
        line: usize,
        /// What was wrong.
        reason: String,
    },

    /// The drawing source has no drawing under this name.
    #[error("unknown drawing: {0}")]
    NotFound(String),
}

/// A set of 2D segments in the XY plane.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineDrawing {
    segments: Vec<Segment2>,
}

impl LineDrawing {
    /// Create a drawing from segments.
    pub fn new(segments: Vec<Segment2>) -> Self {
        Self { segments }
    }

    /// The drawing's segments.
    pub fn segments(&self) -> &[Segment2] {
        &self.segments
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the drawing has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Uniformly scale all coordinates.
    pub fn scaled(mut self, factor: f64) -> Self {
        for s in &mut self.segments {
            for v in s.start.iter_mut().chain(s.end.iter_mut()) {
                *v *= factor;
            }
        }
        self
    }
}

impl FromStr for LineDrawing {
    type Err = LinesError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut segments = Vec::new();
        for (i, row) in text.lines().enumerate() {
            let row = row.trim();
            if row.is_empty() {
                continue;
            }
            let values = row
                .split(',')
                .map(|field| field.trim().parse::<f64>())
                .collect::<Result<Vec<_>, _>>()
                .map_err(|e| LinesError::Parse {
                    line: i + 1,
                    reason: e.to_string(),
                })?;
            let [a, b, c, d] = values[..] else {
                return Err(LinesError::Parse {
                    line: i + 1,
                    reason: format!("expected 4 values, got {}", values.len()),
                });
            };
            segments.push(Segment2::new([b, a], [d, c]));
        }
        Ok(Self { segments })
    }
}

/// Where the composer gets its drawings from.
pub trait DrawingSource {
    /// Load the raw (unscaled) drawing named `name`.
    fn load(&self, name: &str) -> Result<LineDrawing, LinesError>;
}

/// Drawings read from files relative to a base directory.
#[derive(Debug, Clone)]
pub struct FsDrawings {
    base: PathBuf,
}

impl FsDrawings {
    /// Resolve drawing names against `base`.
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }
}

impl DrawingSource for FsDrawings {
    fn load(&self, name: &str) -> Result<LineDrawing, LinesError> {
        let path = self.base.join(name);
        let text = std::fs::read_to_string(&path).map_err(|source| LinesError::Io {
            path: path.clone(),
            source,
        })?;
        let drawing: LineDrawing = text.parse()?;
        tracing::debug!(path = %path.display(), segments = drawing.len(), "loaded drawing");
        Ok(drawing)
    }
}

/// Drawings held in memory, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct InMemoryDrawings {
    drawings: HashMap<String, String>,
}

impl InMemoryDrawings {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `text` under `name`.
    pub fn insert(&mut self, name: impl Into<String>, text: impl Into<String>) {
        self.drawings.insert(name.into(), text.into());
    }
}

impl DrawingSource for InMemoryDrawings {
    fn load(&self, name: &str) -> Result<LineDrawing, LinesError> {
        self.drawings
            .get(name)
            .ok_or_else(|| LinesError::NotFound(name.to_string()))?
            .parse()
    }
}
