//! Scene inspection: flattening to placed leaves, bounds, and summaries.

use domus_ir::{Primitive, SceneNode, Transform};
use nalgebra::{Matrix4, Point3, Rotation3, Vector3};
use serde::Serialize;

/// A primitive leaf together with everything inherited from its ancestors.
#[derive(Debug, Clone, PartialEq)]
pub struct Placed {
    /// Leaf name.
    pub name: Option<String>,
    /// The leaf solid in its local frame.
    pub primitive: Primitive,
    /// Accumulated local-to-scene transform.
    pub transform: Matrix4<f64>,
    /// Innermost color applied above the leaf, if any.
    pub color: Option<[f64; 4]>,
    /// Innermost texture applied above the leaf, if any.
    pub texture: Option<String>,
}

impl Placed {
    /// Scene position of the leaf's local origin.
    pub fn origin(&self) -> [f64; 3] {
        let p = self.transform.transform_point(&Point3::origin());
        [p.x, p.y, p.z]
    }

    /// Leaf vertices in scene coordinates.
    pub fn points(&self) -> Vec<Point3<f64>> {
        local_points(&self.primitive)
            .into_iter()
            .map(|p| self.transform.transform_point(&p))
            .collect()
    }
}

fn local_points(primitive: &Primitive) -> Vec<Point3<f64>> {
    match primitive {
        Primitive::Cuboid { size } => {
            let mut corners = Vec::with_capacity(8);
            for &x in &[0.0, size.x] {
                for &y in &[0.0, size.y] {
                    for &z in &[0.0, size.z] {
                        corners.push(Point3::new(x, y, z));
                    }
                }
            }
            corners
        }
        Primitive::Polyhedron { points, .. } => {
            points.iter().map(|p| Point3::new(p.x, p.y, p.z)).collect()
        }
        Primitive::ExtrudedLines { segments, height } => segments
            .iter()
            .flat_map(|s| [s.start, s.end])
            .flat_map(|[x, y]| [Point3::new(x, y, 0.0), Point3::new(x, y, *height)])
            .collect(),
    }
}

fn bounds_of(points: impl IntoIterator<Item = Point3<f64>>) -> Option<([f64; 3], [f64; 3])> {
    let mut min = [f64::MAX; 3];
    let mut max = [f64::MIN; 3];
    let mut any = false;
    for p in points {
        any = true;
        for i in 0..3 {
            min[i] = min[i].min(p[i]);
            max[i] = max[i].max(p[i]);
        }
    }
    any.then_some((min, max))
}

/// Matrix of one transform node.
pub fn transform_matrix(transform: &Transform) -> Matrix4<f64> {
    match transform {
        Transform::Translate { offset } => {
            Matrix4::new_translation(&Vector3::new(offset.x, offset.y, offset.z))
        }
        Transform::Rotate { angles } => {
            Rotation3::from_euler_angles(angles.x, angles.y, angles.z).to_homogeneous()
        }
        Transform::Scale { factor } => {
            Matrix4::new_nonuniform_scaling(&Vector3::new(factor.x, factor.y, factor.z))
        }
    }
}

/// Flatten a scene into its leaves, in depth-first order.
pub fn flatten(node: &SceneNode) -> Vec<Placed> {
    let mut out = Vec::new();
    flatten_into(node, Matrix4::identity(), None, None, &mut out);
    out
}

fn flatten_into(
    node: &SceneNode,
    transform: Matrix4<f64>,
    color: Option<[f64; 4]>,
    texture: Option<&str>,
    out: &mut Vec<Placed>,
) {
    match node {
        SceneNode::Primitive { name, primitive } => out.push(Placed {
            name: name.clone(),
            primitive: primitive.clone(),
            transform,
            color,
            texture: texture.map(str::to_string),
        }),
        SceneNode::Transform { transform: t, child } => {
            flatten_into(child, transform * transform_matrix(t), color, texture, out)
        }
        SceneNode::Color { rgba, child } => flatten_into(child, transform, Some(*rgba), texture, out),
        SceneNode::Texture { path, child } => {
            flatten_into(child, transform, color, Some(path), out)
        }
        SceneNode::Group { children } => {
            for child in children {
                flatten_into(child, transform, color, texture, out);
            }
        }
    }
}

/// Axis-aligned bounds of the whole scene, or `None` when it has no points.
pub fn bounding_box(node: &SceneNode) -> Option<([f64; 3], [f64; 3])> {
    bounds_of(flatten(node).iter().flat_map(Placed::points))
}

/// Summary of a composed scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneStats {
    /// Total number of leaves.
    pub leaves: usize,
    /// Cuboid leaves.
    pub cuboids: usize,
    /// Polyhedron leaves.
    pub polyhedra: usize,
    /// Extruded drawing leaves.
    pub extrusions: usize,
    /// Leaves under a texture node.
    pub textured: usize,
    /// Scene bounds as `[min, max]`.
    pub bounds: Option<[[f64; 3]; 2]>,
}

impl SceneStats {
    /// Compute the summary of `node`.
    pub fn of(node: &SceneNode) -> Self {
        let placed = flatten(node);
        let count = |f: fn(&Primitive) -> bool| placed.iter().filter(|p| f(&p.primitive)).count();
        Self {
            leaves: placed.len(),
            cuboids: count(|p| matches!(p, Primitive::Cuboid { .. })),
            polyhedra: count(|p| matches!(p, Primitive::Polyhedron { .. })),
            extrusions: count(|p| matches!(p, Primitive::ExtrudedLines { .. })),
            textured: placed.iter().filter(|p| p.texture.is_some()).count(),
            bounds: bounds_of(placed.iter().flat_map(Placed::points)).map(|(lo, hi)| [lo, hi]),
        }
    }
}
