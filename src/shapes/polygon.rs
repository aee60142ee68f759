use super::line_segment::LineSegment;
use crate::error::{PhysicsError, Result};
use crate::math::transform::Transform;
use crate::math::vec2::Vec2;

const AREA_EPSILON: f64 = 1e-10;
const CONVEXITY_EPSILON: f64 = 1e-9;

/// A convex polygon stored as a counter-clockwise vertex loop.
///
/// Construction validates the loop: at least three vertices, non-zero area,
/// and no reflex corners. Clockwise input is reversed rather than rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    vertices: Vec<Vec2>,
}

impl Polygon {
    pub fn new(mut vertices: Vec<Vec2>) -> Result<Self> {
        if vertices.len() < 3 {
            return Err(PhysicsError::InvalidShape(format!(
                "polygon needs at least 3 vertices, got {}",
                vertices.len()
            )));
        }
        if vertices.iter().any(|v| !v.x.is_finite() || !v.y.is_finite()) {
            return Err(PhysicsError::InvalidShape(
                "polygon vertices must be finite".to_string(),
            ));
        }

        let signed_area = signed_area(&vertices);
        if signed_area.abs() < AREA_EPSILON {
            return Err(PhysicsError::InvalidShape(
                "polygon has zero area".to_string(),
            ));
        }
        if signed_area < 0.0 {
            vertices.reverse();
        }

        let n = vertices.len();
        for i in 0..n {
            let a = vertices[i];
            let b = vertices[(i + 1) % n];
            let c = vertices[(i + 2) % n];
            if (b - a).cross(c - b) < -CONVEXITY_EPSILON {
                return Err(PhysicsError::InvalidShape(format!(
                    "polygon is not convex at vertex {}",
                    (i + 1) % n
                )));
            }
        }

        Ok(Self { vertices })
    }

    /// Axis-aligned box centered on the local origin.
    pub fn rectangle(half_width: f64, half_height: f64) -> Result<Self> {
        Self::new(vec![
            Vec2::new(-half_width, -half_height),
            Vec2::new(half_width, -half_height),
            Vec2::new(half_width, half_height),
            Vec2::new(-half_width, half_height),
        ])
    }

    pub fn vertices(&self) -> &[Vec2] {
        &self.vertices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge(&self, index: usize) -> LineSegment {
        let n = self.vertices.len();
        LineSegment::new(self.vertices[index % n], self.vertices[(index + 1) % n])
    }

    pub fn edges(&self) -> impl Iterator<Item = LineSegment> + '_ {
        (0..self.vertices.len()).map(move |i| self.edge(i))
    }

    pub fn area(&self) -> f64 {
        signed_area(&self.vertices).abs()
    }

    /// Center of mass for uniform density.
    pub fn centroid(&self) -> Vec2 {
        let mut centroid = Vec2::ZERO;
        let mut area_sum = 0.0;
        let origin = self.vertices[0];

        for window in self.vertices[1..].windows(2) {
            let (v2, v3) = (window[0], window[1]);
            let triangle_area = (v2 - origin).cross(v3 - origin) * 0.5;
            area_sum += triangle_area;
            centroid += (origin + v2 + v3) / 3.0 * triangle_area;
        }
        centroid / area_sum
    }

    /// Moment of inertia about the local origin for a uniform polygon of `mass`.
    pub fn moment_about_origin(&self, mass: f64) -> f64 {
        let n = self.vertices.len();
        let mut inertia_sum = 0.0;
        for i in 0..n {
            let v1 = self.vertices[i];
            let v2 = self.vertices[(i + 1) % n];
            inertia_sum += v1.cross(v2) * (v1.length_squared() + v1.dot(v2) + v2.length_squared());
        }
        // inertia_sum / 12 is the unit-density moment; scale by density = mass / area
        (inertia_sum / 12.0) * (mass / self.area())
    }

    pub fn transformed(&self, transform: Transform) -> Self {
        Self {
            vertices: self.vertices.iter().map(|&v| transform.apply(v)).collect(),
        }
    }

    pub fn translate(&mut self, displacement: Vec2) {
        for v in &mut self.vertices {
            *v += displacement;
        }
    }

    /// Boundary-inclusive containment test.
    pub fn contains(&self, point: Vec2) -> bool {
        self.edges()
            .all(|edge| edge.direction().cross(point - edge.a) >= 0.0)
    }

    /// Closest point on the boundary and the index of the edge it lies on.
    pub fn closest_boundary_point(&self, point: Vec2) -> (Vec2, usize) {
        let mut best = (self.vertices[0], 0);
        let mut best_dist_sq = f64::INFINITY;
        for (i, edge) in self.edges().enumerate() {
            let candidate = edge.closest_point(point);
            let dist_sq = candidate.distance_squared(point);
            if dist_sq < best_dist_sq {
                best_dist_sq = dist_sq;
                best = (candidate, i);
            }
        }
        best
    }

    /// Closest point of the solid polygon: the point itself when inside.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        if self.contains(point) {
            point
        } else {
            self.closest_boundary_point(point).0
        }
    }

    /// Vertex furthest along `direction`. Ties resolve to the lowest index.
    pub fn support(&self, direction: Vec2) -> Vec2 {
        let mut best = self.vertices[0];
        let mut best_proj = best.dot(direction);
        for &v in &self.vertices[1..] {
            let proj = v.dot(direction);
            if proj > best_proj {
                best_proj = proj;
                best = v;
            }
        }
        best
    }
}

fn signed_area(vertices: &[Vec2]) -> f64 {
    let n = vertices.len();
    let mut area = 0.0;
    for i in 0..n {
        area += vertices[i].cross(vertices[(i + 1) % n]);
    }
    area * 0.5
}
