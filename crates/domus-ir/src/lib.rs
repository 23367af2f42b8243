#![warn(missing_docs)]

//! Scene tree representation for the domus building generator.
//!
//! A generated building is an immutable tree: leaves are primitive solids,
//! internal nodes are rigid transforms, appearance attributes, or groups.
//! Every node owns its children outright, so the tree is acyclic by
//! construction and can be handed between generators without sharing.
//!
//! The IR is purely declarative. Meshing and rendering are left to whoever
//! consumes the tree.

use serde::Serialize;

/// 3D vector with f64 components (conventionally meters).
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component.
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// Create a new Vec3.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

/// A straight 2D segment of a line drawing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment2 {
    /// Start point `[x, y]`.
    pub start: [f64; 2],
    /// End point `[x, y]`.
    pub end: [f64; 2],
}

impl Segment2 {
    /// Create a new segment.
    pub fn new(start: [f64; 2], end: [f64; 2]) -> Self {
        Self { start, end }
    }
}

/// Leaf solids of the scene tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Primitive {
    /// Axis-aligned box with one corner at the origin.
    Cuboid {
        /// Size along each axis.
        size: Vec3,
    },
    /// Convex cell complex given by points and vertex-index cells.
    Polyhedron {
        /// Vertex positions.
        points: Vec<Vec3>,
        /// Cells as lists of 0-based indices into `points`.
        cells: Vec<Vec<usize>>,
    },
    /// A 2D line drawing filled into regions and extruded along +Z.
    ExtrudedLines {
        /// Drawing segments in the XY plane.
        segments: Vec<Segment2>,
        /// Extrusion height.
        height: f64,
    },
}

/// Rigid (and scaling) transforms applied to a subtree.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Transform {
    /// Translation by an offset vector.
    Translate {
        /// Translation offset.
        offset: Vec3,
    },
    /// Rotation by Euler angles in radians (applied as X, then Y, then Z).
    Rotate {
        /// Rotation angles in radians.
        angles: Vec3,
    },
    /// Non-uniform scale.
    Scale {
        /// Scale factors per axis.
        factor: Vec3,
    },
}

/// A node of the composed scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "node")]
pub enum SceneNode {
    /// A leaf solid.
    Primitive {
        /// Optional human-readable name ("pillar", "beam", ...).
        name: Option<String>,
        /// The solid.
        primitive: Primitive,
    },
    /// A transform applied to one child.
    Transform {
        /// The transform.
        transform: Transform,
        /// Transformed subtree.
        child: Box<SceneNode>,
    },
    /// A color applied to one child.
    Color {
        /// RGBA color in 0.0..1.0.
        rgba: [f64; 4],
        /// Colored subtree.
        child: Box<SceneNode>,
    },
    /// An opaque texture reference (usually an image path) applied to one child.
    Texture {
        /// Texture identifier.
        path: String,
        /// Textured subtree.
        child: Box<SceneNode>,
    },
    /// Union of children, in order.
    Group {
        /// Child subtrees.
        children: Vec<SceneNode>,
    },
}

impl SceneNode {
    /// Check whether the subtree contains no primitive at all.
    pub fn is_empty(&self) -> bool {
        self.leaf_count() == 0
    }

    /// Number of primitive leaves in the subtree.
    pub fn leaf_count(&self) -> usize {
        match self {
            SceneNode::Primitive { .. } => 1,
            SceneNode::Transform { child, .. }
            | SceneNode::Color { child, .. }
            | SceneNode::Texture { child, .. } => child.leaf_count(),
            SceneNode::Group { children } => children.iter().map(SceneNode::leaf_count).sum(),
        }
    }

    /// Number of leaves whose name equals `name`.
    pub fn count_named(&self, name: &str) -> usize {
        let mut count = 0;
        self.visit_primitives(&mut |leaf_name, _| {
            if leaf_name == Some(name) {
                count += 1;
            }
        });
        count
    }

    /// Depth-first, in-order walk over primitive leaves.
    pub fn visit_primitives<'a>(&'a self, f: &mut impl FnMut(Option<&'a str>, &'a Primitive)) {
        match self {
            SceneNode::Primitive { name, primitive } => f(name.as_deref(), primitive),
            SceneNode::Transform { child, .. }
            | SceneNode::Color { child, .. }
            | SceneNode::Texture { child, .. } => child.visit_primitives(f),
            SceneNode::Group { children } => {
                for child in children {
                    child.visit_primitives(f);
                }
            }
        }
    }
}
