//! Narrow-phase routines for every unordered pair of collider shapes.
//!
//! All routines work on world-space geometry and report normals pointing from
//! the second shape toward the first. Touching shapes (zero penetration) do
//! not count as overlapping.

use super::manifold::Manifold2;
use crate::math::vec2::{Vec2, NEAR_ZERO};
use crate::shapes::{LineSegment, Polygon};

const MAX_ITERATIONS: usize = 64;
const EPA_TOLERANCE: f64 = 1e-9;
/// Vertices within this distance of a support plane belong to the same face.
const FACE_TOLERANCE: f64 = 1e-6;

// --- Disc vs Disc ---

pub fn disc_vs_disc(
    center_a: Vec2,
    radius_a: f64,
    center_b: Vec2,
    radius_b: f64,
) -> Option<Manifold2> {
    let offset = center_a - center_b;
    let distance = offset.length();
    let penetration = radius_a + radius_b - distance;
    if penetration <= 0.0 {
        return None;
    }

    let normal = if distance > NEAR_ZERO {
        offset / distance
    } else {
        // Coincident centers: any direction separates them
        Vec2::UP
    };

    let surface_a = center_a - normal * radius_a;
    let surface_b = center_b + normal * radius_b;
    Some(Manifold2::from_point(
        surface_a.lerp(surface_b, 0.5),
        normal,
        penetration,
    ))
}

pub fn discs_intersect(center_a: Vec2, radius_a: f64, center_b: Vec2, radius_b: f64) -> bool {
    let radii = radius_a + radius_b;
    center_a.distance_squared(center_b) < radii * radii
}

// --- Disc vs Polygon ---

/// Disc is the first shape; the normal points from the polygon toward the disc.
pub fn disc_vs_polygon(center: Vec2, radius: f64, polygon: &Polygon) -> Option<Manifold2> {
    let (closest, edge_index) = polygon.closest_boundary_point(center);
    let offset = center - closest;
    let distance = offset.length();

    let (normal, penetration) = if distance <= NEAR_ZERO {
        // Center sits exactly on the boundary
        let edge_normal = polygon.edge(edge_index).outward_normal();
        let normal = if edge_normal.is_near_zero() {
            Vec2::UP
        } else {
            edge_normal
        };
        (normal, radius)
    } else if polygon.contains(center) {
        // Push the whole disc out through the nearest edge
        (-offset / distance, radius + distance)
    } else {
        let penetration = radius - distance;
        if penetration <= 0.0 {
            return None;
        }
        (offset / distance, penetration)
    };

    let deepest = center - normal * radius;
    Some(Manifold2::from_point(
        closest.lerp(deepest, 0.5),
        normal,
        penetration,
    ))
}

pub fn disc_intersects_polygon(center: Vec2, radius: f64, polygon: &Polygon) -> bool {
    if polygon.contains(center) {
        return true;
    }
    let (closest, _) = polygon.closest_boundary_point(center);
    closest.distance_squared(center) < radius * radius
}

// --- Polygon vs Polygon ---

/// Normal points from `b` toward `a`. The contact edge lies on `a`'s face,
/// clipped to the extent of `b`'s face.
pub fn polygon_vs_polygon(a: &Polygon, b: &Polygon) -> Option<Manifold2> {
    let simplex = enclosing_simplex(a, b)?;
    let (expansion_normal, penetration) = expand_polytope(a, b, simplex)?;
    if penetration <= EPA_TOLERANCE {
        return None;
    }

    // The expansion normal points out of A - B; A leaves along its negation.
    let normal = -expansion_normal;
    let (start, end) = clip_contact_edge(a, b, normal);
    Some(Manifold2::from_edge(start, end, normal, penetration))
}

pub fn polygons_intersect(a: &Polygon, b: &Polygon) -> bool {
    enclosing_simplex(a, b).is_some()
}

fn minkowski_support(a: &Polygon, b: &Polygon, direction: Vec2) -> Vec2 {
    a.support(direction) - b.support(-direction)
}

fn vertex_mean(polygon: &Polygon) -> Vec2 {
    let sum = polygon
        .vertices()
        .iter()
        .fold(Vec2::ZERO, |acc, &v| acc + v);
    sum / polygon.vertex_count() as f64
}

/// Searches A - B for a triangle of support points enclosing the origin.
/// `None` means the polygons are separated or only touching.
fn enclosing_simplex(a: &Polygon, b: &Polygon) -> Option<[Vec2; 3]> {
    let mut direction = vertex_mean(a) - vertex_mean(b);
    if direction.is_near_zero() {
        direction = Vec2::RIGHT;
    }

    let mut simplex = Vec::with_capacity(3);
    simplex.push(minkowski_support(a, b, direction));
    direction = -simplex[0];

    for _ in 0..MAX_ITERATIONS {
        if direction.is_near_zero() {
            return None;
        }
        let point = minkowski_support(a, b, direction);
        if point.dot(direction) <= 0.0 {
            return None;
        }
        simplex.push(point);
        if evolve_simplex(&mut simplex, &mut direction) {
            return Some([simplex[0], simplex[1], simplex[2]]);
        }
    }
    None
}

/// Keeps the newest point last. Returns true once the triangle holds the origin.
fn evolve_simplex(simplex: &mut Vec<Vec2>, direction: &mut Vec2) -> bool {
    match simplex.len() {
        2 => {
            let (b, a) = (simplex[0], simplex[1]);
            let to_origin = -a;
            let mut perp = (b - a).perpendicular();
            if perp.dot(to_origin) < 0.0 {
                perp = -perp;
            }
            *direction = perp;
            false
        }
        3 => {
            let (c, b, a) = (simplex[0], simplex[1], simplex[2]);
            let to_origin = -a;
            let ab = b - a;
            let ac = c - a;

            let mut ab_perp = ab.perpendicular();
            if ab_perp.dot(ac) > 0.0 {
                ab_perp = -ab_perp;
            }
            if ab_perp.dot(to_origin) > 0.0 {
                simplex.remove(0);
                *direction = ab_perp;
                return false;
            }

            let mut ac_perp = ac.perpendicular();
            if ac_perp.dot(ab) > 0.0 {
                ac_perp = -ac_perp;
            }
            if ac_perp.dot(to_origin) > 0.0 {
                simplex.remove(1);
                *direction = ac_perp;
                return false;
            }
            true
        }
        _ => false,
    }
}

/// Polytope edge nearest the origin: insertion index, outward normal, distance.
fn closest_edge(polytope: &[Vec2]) -> Option<(usize, Vec2, f64)> {
    let n = polytope.len();
    let mut best: Option<(usize, Vec2, f64)> = None;
    for i in 0..n {
        let edge = LineSegment::new(polytope[i], polytope[(i + 1) % n]);
        let normal = edge.outward_normal();
        if normal.is_near_zero() {
            continue;
        }
        let distance = normal.dot(edge.a);
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((i, normal, distance));
        }
    }
    best
}

/// Grows the enclosing triangle toward the boundary of A - B until the edge
/// nearest the origin lies on it. Returns that edge's outward normal and
/// distance from the origin.
fn expand_polytope(a: &Polygon, b: &Polygon, simplex: [Vec2; 3]) -> Option<(Vec2, f64)> {
    let mut polytope = simplex.to_vec();
    let winding = (polytope[1] - polytope[0]).cross(polytope[2] - polytope[0]);
    if winding.abs() <= NEAR_ZERO {
        return None;
    }
    if winding < 0.0 {
        polytope.swap(1, 2);
    }

    for _ in 0..MAX_ITERATIONS {
        let (index, normal, distance) = closest_edge(&polytope)?;
        let support = minkowski_support(a, b, normal);
        if support.dot(normal) - distance <= EPA_TOLERANCE {
            return Some((normal, distance));
        }
        polytope.insert(index + 1, support);
    }

    log::trace!("polytope expansion hit the iteration cap; using best edge");
    closest_edge(&polytope).map(|(_, normal, distance)| (normal, distance))
}

/// Vertices lying on the support plane of `polygon` along `direction`,
/// reduced to a segment ordered along the plane's tangent.
fn support_face(polygon: &Polygon, direction: Vec2) -> LineSegment {
    let plane = polygon.support(direction).dot(direction);
    let tangent = direction.perpendicular();

    let mut low: Option<(f64, Vec2)> = None;
    let mut high: Option<(f64, Vec2)> = None;
    for &v in polygon.vertices() {
        if plane - v.dot(direction) > FACE_TOLERANCE {
            continue;
        }
        let t = v.dot(tangent);
        if low.map_or(true, |(lt, _)| t < lt) {
            low = Some((t, v));
        }
        if high.map_or(true, |(ht, _)| t > ht) {
            high = Some((t, v));
        }
    }

    match (low, high) {
        (Some((_, lo)), Some((_, hi))) => LineSegment::new(lo, hi),
        // Unreachable for a non-empty polygon: the support vertex is on its own plane
        _ => {
            let p = polygon.support(direction);
            LineSegment::new(p, p)
        }
    }
}

/// Clips the incident face of `incident` against the culling segment on
/// `reference` (its face through the deepest support along `normal`).
fn clip_contact_edge(incident: &Polygon, reference: &Polygon, normal: Vec2) -> (Vec2, Vec2) {
    let culling = support_face(reference, normal);
    if culling.is_degenerate() {
        return (culling.a, culling.a);
    }
    let face = support_face(incident, -normal);
    if face.is_degenerate() {
        return (face.a, face.a);
    }

    let tangent = normal.perpendicular();
    let (ref_lo, ref_hi) = ordered(culling.a.dot(tangent), culling.b.dot(tangent));
    let (inc_a, inc_b) = (face.a.dot(tangent), face.b.dot(tangent));
    let span = inc_b - inc_a;
    if span.abs() <= NEAR_ZERO {
        return (face.a, face.a);
    }

    let (inc_lo, inc_hi) = ordered(inc_a, inc_b);
    let lo = inc_lo.max(ref_lo);
    let hi = inc_hi.min(ref_hi);
    if lo > hi {
        // Faces do not overlap along the tangent; fall back to the incident midpoint
        let mid = face.midpoint();
        return (mid, mid);
    }

    let at = |t: f64| face.a.lerp(face.b, (t - inc_a) / span);
    (at(lo), at(hi))
}

fn ordered(a: f64, b: f64) -> (f64, f64) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::transform::Transform;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::FRAC_PI_4;

    const EPSILON: f64 = 1e-9;

    fn square_at(center: Vec2, half: f64) -> Polygon {
        Polygon::rectangle(half, half)
            .unwrap()
            .transformed(Transform::new(center, 0.0))
    }

    // --- Disc-Disc ---

    #[test]
    fn test_disc_vs_disc_scenario() {
        let m = disc_vs_disc(Vec2::ZERO, 1.0, Vec2::new(1.5, 0.0), 1.0).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.5, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.x, -1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.y, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(m.contact_point().x, 0.75, epsilon = EPSILON);
        assert!(m.is_point_contact());
    }

    #[test]
    fn test_disc_vs_disc_normal_parallel_to_center_offset() {
        let (ca, cb) = (Vec2::new(0.3, -0.2), Vec2::new(1.0, 0.9));
        let m = disc_vs_disc(ca, 0.8, cb, 0.9).unwrap();
        let expected = (ca - cb).normalize();
        assert_abs_diff_eq!(m.normal.cross(expected), 0.0, epsilon = EPSILON);
        assert!(m.normal.dot(expected) > 0.0);
        assert_abs_diff_eq!(m.penetration, 1.7 - ca.distance(cb), epsilon = EPSILON);
    }

    #[test]
    fn test_disc_vs_disc_touching_is_not_overlap() {
        assert!(disc_vs_disc(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0).is_none());
        assert!(!discs_intersect(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
        assert!(discs_intersect(Vec2::ZERO, 1.0, Vec2::new(1.9, 0.0), 1.0));
    }

    #[test]
    fn test_disc_vs_disc_concentric_fallback() {
        let m = disc_vs_disc(Vec2::ZERO, 2.0, Vec2::ZERO, 1.0).unwrap();
        assert_abs_diff_eq!(m.penetration, 3.0, epsilon = EPSILON);
        assert_eq!(m.normal, Vec2::UP);
        assert!(!m.contact_point().x.is_nan());
    }

    // --- Disc-Polygon ---

    #[test]
    fn test_disc_vs_polygon_outside() {
        let square = square_at(Vec2::ZERO, 0.5);
        let m = disc_vs_polygon(Vec2::new(0.8, 0.0), 0.5, &square).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.2, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.x, 1.0, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.y, 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_disc_vs_polygon_separated() {
        let square = square_at(Vec2::ZERO, 0.5);
        assert!(disc_vs_polygon(Vec2::new(2.0, 0.0), 0.5, &square).is_none());
        assert!(!disc_intersects_polygon(Vec2::new(2.0, 0.0), 0.5, &square));
    }

    #[test]
    fn test_disc_vs_polygon_center_inside_pushes_fully_out() {
        let square = square_at(Vec2::ZERO, 1.0);
        let m = disc_vs_polygon(Vec2::new(0.7, 0.0), 0.25, &square).unwrap();
        // Nearest boundary is x = 1, 0.3 away
        assert_abs_diff_eq!(m.penetration, 0.25 + 0.3, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.x, 1.0, epsilon = EPSILON);
        assert!(disc_intersects_polygon(Vec2::new(0.7, 0.0), 0.25, &square));
    }

    #[test]
    fn test_disc_vs_polygon_center_on_edge() {
        let square = square_at(Vec2::ZERO, 0.5);
        let m = disc_vs_polygon(Vec2::new(0.0, 0.5), 0.3, &square).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.3, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.x, 0.0, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.y, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_disc_vs_polygon_vertex_region() {
        let square = square_at(Vec2::ZERO, 0.5);
        let dir = Vec2::new(1.0, 1.0).normalize();
        let center = Vec2::new(0.5, 0.5) + dir * 0.4;
        let m = disc_vs_polygon(center, 0.5, &square).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.1, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.x, dir.x, epsilon = EPSILON);
        assert_abs_diff_eq!(m.normal.y, dir.y, epsilon = EPSILON);
    }

    // --- Polygon-Polygon ---

    #[test]
    fn test_polygon_vs_polygon_face_contact() {
        let a = square_at(Vec2::new(0.8, 0.0), 0.5);
        let b = square_at(Vec2::ZERO, 0.5);
        let m = polygon_vs_polygon(&a, &b).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.2, epsilon = 1e-7);
        assert_abs_diff_eq!(m.normal.x, 1.0, epsilon = 1e-7);
        assert_abs_diff_eq!(m.normal.y, 0.0, epsilon = 1e-7);
        // Incident face of A (x = 0.3) clipped to B's face extent
        assert_abs_diff_eq!(m.contact_start.x, 0.3, epsilon = 1e-7);
        assert_abs_diff_eq!(m.contact_end.x, 0.3, epsilon = 1e-7);
        assert_abs_diff_eq!((m.contact_end - m.contact_start).length(), 1.0, epsilon = 1e-7);
    }

    #[test]
    fn test_polygon_vs_polygon_clips_to_shorter_face() {
        // Small box resting into the top of a wide one
        let a = square_at(Vec2::new(2.0, 1.4), 0.5);
        let b = Polygon::rectangle(5.0, 1.0).unwrap();
        let m = polygon_vs_polygon(&a, &b).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.1, epsilon = 1e-7);
        assert_abs_diff_eq!(m.normal.y, 1.0, epsilon = 1e-7);
        let (lo, hi) = ordered(m.contact_start.x, m.contact_end.x);
        assert_abs_diff_eq!(lo, 1.5, epsilon = 1e-7);
        assert_abs_diff_eq!(hi, 2.5, epsilon = 1e-7);
        assert_abs_diff_eq!(m.contact_point().y, 0.9, epsilon = 1e-7);
    }

    #[test]
    fn test_polygon_vs_polygon_vertex_contact_short_circuits_to_point() {
        let diamond_center = Vec2::new(0.0, 0.5 + 0.5 * 2f64.sqrt() - 0.1);
        let diamond = Polygon::rectangle(0.5, 0.5)
            .unwrap()
            .transformed(Transform::new(diamond_center, FRAC_PI_4));
        let floor = square_at(Vec2::ZERO, 0.5);

        let m = polygon_vs_polygon(&diamond, &floor).unwrap();
        assert_abs_diff_eq!(m.penetration, 0.1, epsilon = 1e-6);
        assert_abs_diff_eq!(m.normal.y, 1.0, epsilon = 1e-6);
        assert!(m.is_point_contact());
        assert_abs_diff_eq!(m.contact_point().x, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(m.contact_point().y, 0.4, epsilon = 1e-6);
    }

    #[test]
    fn test_polygon_vs_polygon_separated_and_touching() {
        let b = square_at(Vec2::ZERO, 0.5);
        let far = square_at(Vec2::new(3.0, 0.0), 0.5);
        let touching = square_at(Vec2::new(1.0, 0.0), 0.5);
        assert!(polygon_vs_polygon(&far, &b).is_none());
        assert!(!polygons_intersect(&far, &b));
        assert!(polygon_vs_polygon(&touching, &b).is_none());
    }

    #[test]
    fn test_polygon_vs_polygon_is_antisymmetric() {
        let a = square_at(Vec2::new(0.3, 0.75), 0.5);
        let b = square_at(Vec2::ZERO, 0.5);
        let ab = polygon_vs_polygon(&a, &b).unwrap();
        let ba = polygon_vs_polygon(&b, &a).unwrap();
        assert_abs_diff_eq!(ab.penetration, ba.penetration, epsilon = 1e-7);
        assert_abs_diff_eq!(ab.normal.x, -ba.normal.x, epsilon = 1e-7);
        assert_abs_diff_eq!(ab.normal.y, -ba.normal.y, epsilon = 1e-7);
        assert!(polygons_intersect(&a, &b));
    }

    #[test]
    fn test_polygon_vs_polygon_containment() {
        let inner = square_at(Vec2::new(0.1, 0.0), 0.2);
        let outer = square_at(Vec2::ZERO, 1.0);
        let m = polygon_vs_polygon(&inner, &outer).unwrap();
        // Leaves through the right face: 1.0 - (0.1 - 0.2)
        assert_abs_diff_eq!(m.penetration, 1.1, epsilon = 1e-7);
        assert_abs_diff_eq!(m.normal.x, 1.0, epsilon = 1e-7);
    }
}
