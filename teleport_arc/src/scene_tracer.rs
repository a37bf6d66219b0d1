use cgmath::{EuclideanSpace, InnerSpace, Point3, Vector3, vec3};
use collision::{Aabb3, Continuous, Plane, Ray3};
use serde::{Deserialize, Serialize};

use crate::teleport::{MAX_TRACE_HITS, SpatialTracer, SurfaceTag, TraceHit, TraceLayers};

/// Serializable shape of a collider in a scene description
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ShapeDescription {
    /// Infinite plane through `point`, facing `normal`
    Plane {
        point: Vector3<f32>,
        normal: Vector3<f32>,
    },
    /// Axis-aligned box between two opposite corners
    Box {
        min: Vector3<f32>,
        max: Vector3<f32>,
    },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ColliderDescription {
    pub shape: ShapeDescription,
    pub surface: SurfaceTag,
    #[serde(default)]
    pub layers: TraceLayers,
}

/// A whole scene, as loaded from JSON by tools and tests
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SceneDescription {
    pub colliders: Vec<ColliderDescription>,
}

impl SceneDescription {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

enum Shape {
    Plane(Plane<f32>),
    Box(Aabb3<f32>),
}

struct Collider {
    shape: Shape,
    surface: SurfaceTag,
    layers: TraceLayers,
}

impl Collider {
    /// Intersection point and surface normal along `ray`, if any
    fn cast(&self, ray: &Ray3<f32>) -> Option<(Vector3<f32>, Vector3<f32>)> {
        match &self.shape {
            Shape::Plane(plane) => {
                let denominator = ray.direction.dot(plane.n);
                if denominator.abs() <= f32::EPSILON {
                    return None;
                }

                let t = (plane.d - ray.origin.to_vec().dot(plane.n)) / denominator;
                if t < 0.0 {
                    return None;
                }

                Some((ray.origin.to_vec() + ray.direction * t, plane.n))
            }
            Shape::Box(aabb) => {
                let point = aabb.intersection(ray)?.to_vec();
                Some((point, box_face_normal(aabb, point)))
            }
        }
    }
}

/// Outward normal of the box face `point` lies closest to
fn box_face_normal(aabb: &Aabb3<f32>, point: Vector3<f32>) -> Vector3<f32> {
    let faces = [
        ((point.x - aabb.min.x).abs(), vec3(-1.0, 0.0, 0.0)),
        ((point.x - aabb.max.x).abs(), vec3(1.0, 0.0, 0.0)),
        ((point.y - aabb.min.y).abs(), vec3(0.0, -1.0, 0.0)),
        ((point.y - aabb.max.y).abs(), vec3(0.0, 1.0, 0.0)),
        ((point.z - aabb.min.z).abs(), vec3(0.0, 0.0, -1.0)),
        ((point.z - aabb.max.z).abs(), vec3(0.0, 0.0, 1.0)),
    ];

    faces
        .iter()
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map_or(vec3(0.0, 1.0, 0.0), |face| face.1)
}

/// Minimal [`SpatialTracer`] over tagged planes and boxes.
///
/// Reports every collider the segment crosses, in insertion order.
#[derive(Default)]
pub struct SceneTracer {
    colliders: Vec<Collider>,
}

impl SceneTracer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_description(description: &SceneDescription) -> Self {
        let mut tracer = SceneTracer::new();

        for collider in &description.colliders {
            match collider.shape {
                ShapeDescription::Plane { point, normal } => {
                    tracer.add_plane(point, normal, collider.surface, collider.layers);
                }
                ShapeDescription::Box { min, max } => {
                    tracer.add_box(min, max, collider.surface, collider.layers);
                }
            }
        }

        tracer
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn add_plane(
        &mut self,
        point: Vector3<f32>,
        normal: Vector3<f32>,
        surface: SurfaceTag,
        layers: TraceLayers,
    ) -> &mut Self {
        let normal = normal.normalize();
        self.colliders.push(Collider {
            shape: Shape::Plane(Plane::new(normal, normal.dot(point))),
            surface,
            layers,
        });
        self
    }

    pub fn add_box(
        &mut self,
        min: Vector3<f32>,
        max: Vector3<f32>,
        surface: SurfaceTag,
        layers: TraceLayers,
    ) -> &mut Self {
        self.colliders.push(Collider {
            shape: Shape::Box(Aabb3::new(Point3::from_vec(min), Point3::from_vec(max))),
            surface,
            layers,
        });
        self
    }
}

impl SpatialTracer for SceneTracer {
    fn trace(
        &self,
        from: Vector3<f32>,
        to: Vector3<f32>,
        layers: TraceLayers,
        hits: &mut Vec<TraceHit>,
    ) {
        let delta = to - from;
        let length = delta.magnitude();
        if length <= f32::EPSILON {
            return;
        }

        let ray = Ray3::new(Point3::from_vec(from), delta / length);

        for collider in self.colliders.iter().filter(|c| c.layers.intersects(layers)) {
            if hits.len() >= MAX_TRACE_HITS {
                break;
            }

            let Some((point, normal)) = collider.cast(&ray) else {
                continue;
            };

            let distance = (point - from).magnitude();
            if distance <= length {
                hits.push(TraceHit {
                    point,
                    normal,
                    distance,
                    surface: collider.surface,
                });
            }
        }
    }
}
