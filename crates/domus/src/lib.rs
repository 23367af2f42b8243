#![warn(missing_docs)]

//! domus - parametric building geometry
//!
//! Turns compact numeric descriptions of a building (axis spacings, story
//! heights, section sizes, opening occupancy grids, roof directions) into a
//! composed scene tree of primitive solids.
//!
//! # Example
//!
//! ```rust
//! use domus::frame::{build_frame, FrameLayout, Section};
//!
//! let frame = build_frame(
//!     Section::new(0.3, 0.5),
//!     Section::new(0.3, 0.3),
//!     &[4.0, 4.0],
//!     &[3.0, 3.0],
//!     FrameLayout::PerStory,
//! )
//! .unwrap();
//! assert_eq!(frame.node().count_named("pillar"), 6);
//! assert_eq!(frame.node().count_named("beam"), 4);
//! ```

use domus_ir::{Primitive, SceneNode, Transform, Vec3};

pub mod error;
pub mod frame;
pub mod house;
pub mod inspect;
pub mod lines;
pub mod panel;
pub mod roof;
pub mod stairs;

pub use error::GeometryError;
pub use lines::LineDrawing;

/// An RGBA color with channels in 0.0..1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba(pub [f64; 4]);

impl Rgba {
    /// Opaque white.
    pub const WHITE: Rgba = Rgba([1.0, 1.0, 1.0, 1.0]);
    /// Opaque black.
    pub const BLACK: Rgba = Rgba([0.0, 0.0, 0.0, 1.0]);

    /// Build an opaque color from 0–255 channels.
    pub fn from_u8(r: u8, g: u8, b: u8) -> Self {
        Self([r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0, 1.0])
    }
}

/// A named piece of generated geometry.
///
/// Parts are the building block every generator returns. Create leaves with
/// [`Part::cuboid`], [`Part::polyhedron`] or [`Part::extruded_drawing`],
/// then place and combine them with [`Part::translate`], [`Part::union`],
/// [`Part::group`] or the `+` operator. All builder methods consume the part:
/// the scene subtree has exactly one owner at a time.
#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    /// Human-readable name for this part.
    pub name: String,
    node: SceneNode,
}

impl Part {
    /// Wrap an existing scene subtree.
    pub fn new(name: impl Into<String>, node: SceneNode) -> Self {
        Self {
            name: name.into(),
            node,
        }
    }

    fn leaf(name: impl Into<String>, primitive: Primitive) -> Self {
        let name = name.into();
        let node = SceneNode::Primitive {
            name: Some(name.clone()),
            primitive,
        };
        Self::new(name, node)
    }

    /// Create a box with one corner at the origin.
    pub fn cuboid(name: impl Into<String>, x: f64, y: f64, z: f64) -> Self {
        Self::leaf(
            name,
            Primitive::Cuboid {
                size: Vec3::new(x, y, z),
            },
        )
    }

    /// Create a polyhedral cell complex from points and 0-based cells.
    ///
    /// Cell indices are not checked here; generators validate them first.
    pub fn polyhedron(name: impl Into<String>, points: Vec<Vec3>, cells: Vec<Vec<usize>>) -> Self {
        Self::leaf(name, Primitive::Polyhedron { points, cells })
    }

    /// Fill a line drawing and extrude it by `height` along +Z.
    pub fn extruded_drawing(name: impl Into<String>, drawing: &LineDrawing, height: f64) -> Self {
        Self::leaf(
            name,
            Primitive::ExtrudedLines {
                segments: drawing.segments().to_vec(),
                height,
            },
        )
    }

    /// Union of parts, preserving their order.
    pub fn group(name: impl Into<String>, parts: impl IntoIterator<Item = Part>) -> Self {
        let children = parts.into_iter().map(Part::into_node).collect();
        Self::new(name, SceneNode::Group { children })
    }

    fn wrap(self, transform: Transform) -> Self {
        Self {
            name: self.name,
            node: SceneNode::Transform {
                transform,
                child: Box::new(self.node),
            },
        }
    }

    /// Translate the part.
    pub fn translate(self, x: f64, y: f64, z: f64) -> Self {
        self.wrap(Transform::Translate {
            offset: Vec3::new(x, y, z),
        })
    }

    /// Rotate the part (angles in radians, applied X then Y then Z).
    pub fn rotate(self, x: f64, y: f64, z: f64) -> Self {
        self.wrap(Transform::Rotate {
            angles: Vec3::new(x, y, z),
        })
    }

    /// Scale the part per axis.
    pub fn scale(self, x: f64, y: f64, z: f64) -> Self {
        self.wrap(Transform::Scale {
            factor: Vec3::new(x, y, z),
        })
    }

    /// Boolean union (self + other).
    ///
    /// Groups are flattened one level so repeated unions stay shallow.
    pub fn union(self, other: Part) -> Self {
        let mut children = match self.node {
            SceneNode::Group { children } => children,
            node => vec![node],
        };
        children.push(other.node);
        Self::new(self.name, SceneNode::Group { children })
    }

    /// Apply a color to the whole part.
    pub fn color(self, rgba: Rgba) -> Self {
        Self {
            name: self.name,
            node: SceneNode::Color {
                rgba: rgba.0,
                child: Box::new(self.node),
            },
        }
    }

    /// Attach a texture reference, or pass the part through unchanged when
    /// `texture` is `None` or empty.
    pub fn with_texture(self, texture: Option<&str>) -> Self {
        match texture {
            Some(path) if !path.is_empty() => Self {
                name: self.name,
                node: SceneNode::Texture {
                    path: path.to_string(),
                    child: Box::new(self.node),
                },
            },
            _ => self,
        }
    }

    /// Borrow the scene subtree.
    pub fn node(&self) -> &SceneNode {
        &self.node
    }

    /// Take ownership of the scene subtree.
    pub fn into_node(self) -> SceneNode {
        self.node
    }

    /// Check if the part contains no primitives.
    pub fn is_empty(&self) -> bool {
        self.node.is_empty()
    }
}

/// Union: `a + b`
impl std::ops::Add for Part {
    type Output = Part;
    fn add(self, rhs: Part) -> Part {
        self.union(rhs)
    }
}
