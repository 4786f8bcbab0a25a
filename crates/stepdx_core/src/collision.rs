//! Pairwise collision test for convex, clockwise polygons.
//!
//! The test only uses the polygons' own edges as candidate separating lines.
//! That is enough for convex shapes with consistent winding, and avoids any
//! projection work:
//!
//!  1. **Separator search** -- if every vertex of one polygon lies strictly
//!     outside some edge of the other (in either direction), they are apart.
//!  2. **Deepest vertex** -- otherwise, find the vertex of one polygon that is
//!     inside all edges of the other and buried deepest. Its shallowest edge
//!     gives the contact normal and the distance needed to push it out.
//!
//! Edge lines are written `a*x + b*y + c = 0` with `(a, b)` the outward normal
//! of a clockwise edge, so `r = a*x + b*y + c > 0` means "outside".

use glam::Vec2;

use crate::shape::Shape;

/// Which argument of [`test`] supplied the penetrating vertex.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VertexOwner {
    First,
    Second,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    /// Unit normal of the penetrated edge, pointing out of the edge polygon.
    pub normal: Vec2,
    pub depth: f32,
    pub owner: VertexOwner,
}

impl Contact {
    /// Offset that moves the first polygon out of the second.
    pub fn push_out_first(&self) -> Vec2 {
        match self.owner {
            VertexOwner::First => self.normal * self.depth,
            VertexOwner::Second => self.normal * -self.depth,
        }
    }
}

/// Test two shapes using their current vertices.
pub fn test_shapes(first: &Shape, second: &Shape) -> Option<Contact> {
    test(first.vertices(), second.vertices())
}

/// Test two convex clockwise polygons for overlap.
///
/// Returns `None` when an edge of either polygon separates them, and also
/// when they merely touch (no vertex is strictly buried).
///
/// # Panics
///
/// Panics if either polygon has fewer than 3 vertices.
pub fn test(first: &[Vec2], second: &[Vec2]) -> Option<Contact> {
    assert!(
        first.len() >= 3 && second.len() >= 3,
        "collision test needs polygons with at least 3 vertices (got {} and {})",
        first.len(),
        second.len()
    );

    if has_separating_edge(first, second) || has_separating_edge(second, first) {
        return None;
    }

    if let Some((normal, depth)) = deepest_vertex(first, second) {
        return Some(Contact {
            normal,
            depth,
            owner: VertexOwner::First,
        });
    }
    deepest_vertex(second, first).map(|(normal, depth)| Contact {
        normal,
        depth,
        owner: VertexOwner::Second,
    })
}

/// Edges of a polygon as (start, end) pairs, beginning with last -> first.
fn edges(polygon: &[Vec2]) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
    let n = polygon.len();
    (0..n).map(move |i| (polygon[(i + n - 1) % n], polygon[i]))
}

/// True if some edge of `edge_poly` has every vertex of `vertex_poly`
/// strictly on its outer side.
fn has_separating_edge(vertex_poly: &[Vec2], edge_poly: &[Vec2]) -> bool {
    edges(edge_poly).any(|(p0, p1)| {
        let a = p0.y - p1.y;
        let b = p1.x - p0.x;
        let c = -a * p0.x - b * p0.y;
        vertex_poly.iter().all(|v| a * v.x + b * v.y + c > 0.0)
    })
}

/// Find the vertex of `vertex_poly` buried deepest inside `edge_poly`.
///
/// A vertex counts only if it is inside or on every edge. Its depth is the
/// distance to the nearest edge; the first edge wins ties. Among vertices the
/// strictly deepest wins, so a polygon that only touches yields `None`.
fn deepest_vertex(vertex_poly: &[Vec2], edge_poly: &[Vec2]) -> Option<(Vec2, f32)> {
    let mut best: Option<(Vec2, f32)> = None;
    let mut best_depth = 0.0;

    for v in vertex_poly {
        let mut inside = true;
        let mut least_depth = f32::MAX;
        let mut least_normal = Vec2::ZERO;

        for (p0, p1) in edges(edge_poly) {
            let normal = Vec2::new(p0.y - p1.y, p1.x - p0.x);
            let normal = normal / normal.length();
            let c = -normal.dot(p0);
            let r = normal.dot(*v) + c;

            if r > 0.0 {
                inside = false;
                break;
            }
            if -r < least_depth {
                least_depth = -r;
                least_normal = normal;
            }
        }

        if inside && least_depth > best_depth {
            best_depth = least_depth;
            best = Some((least_normal, least_depth));
        }
    }

    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f32, y0: f32, x1: f32, y1: f32) -> Vec<Vec2> {
        vec![
            Vec2::new(x0, y0),
            Vec2::new(x0, y1),
            Vec2::new(x1, y1),
            Vec2::new(x1, y0),
        ]
    }

    fn actor_at(x: f32, y: f32) -> Vec<Vec2> {
        rect(-0.2 + x, y, 0.2 + x, 1.0 + y)
    }

    fn floor() -> Vec<Vec2> {
        rect(0.0, 0.9, 32.0, 1.0)
    }

    fn translated(polygon: &[Vec2], offset: Vec2) -> Vec<Vec2> {
        polygon.iter().map(|v| *v + offset).collect()
    }

    #[test]
    fn disjoint_polygons_do_not_collide() {
        let a = rect(0.0, 0.0, 1.0, 1.0);
        let b = rect(2.0, 0.0, 3.0, 1.0);
        assert!(test(&a, &b).is_none());
        assert!(test(&b, &a).is_none());

        let above = rect(0.0, 1.5, 1.0, 2.5);
        assert!(test(&a, &above).is_none());
    }

    #[test]
    fn triangle_separated_by_its_own_edge() {
        let triangle = vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0)];
        // Sits past the hypotenuse; the bounding boxes overlap.
        let square = rect(1.2, 1.2, 1.8, 1.8);
        assert!(test(&triangle, &square).is_none());
        assert!(test(&square, &triangle).is_none());
    }

    #[test]
    fn actor_touching_floor_has_no_actionable_contact() {
        assert!(test(&actor_at(0.4, 1.0), &floor()).is_none());
    }

    #[test]
    fn actor_sunk_into_floor_is_pushed_up() {
        let contact = test(&actor_at(0.4, 0.98), &floor()).expect("actor overlaps floor");
        assert_eq!(contact.owner, VertexOwner::First);
        assert!((contact.normal - Vec2::new(0.0, 1.0)).length() < 1e-6);
        assert!((contact.depth - 0.02).abs() < 1e-5);
        assert!((contact.push_out_first() - Vec2::new(0.0, 0.02)).length() < 1e-5);
    }

    #[test]
    fn half_floor_penetration_reports_depth() {
        // Halfway into a 0.1 thick floor both faces are equally near.
        let contact = test(&actor_at(0.4, 0.95), &floor()).expect("actor overlaps floor");
        assert!((contact.depth - 0.05).abs() < 1e-5);
        assert!((contact.normal.y.abs() - 1.0).abs() < 1e-6);
        assert_eq!(contact.normal.x, 0.0);
    }

    #[test]
    fn falls_back_to_second_polygon_vertex() {
        // A small wedge poking into the actor's side from the right: no actor
        // vertex is inside the wedge, but the wedge tip is inside the actor.
        let actor = actor_at(0.0, 0.0);
        let wedge = vec![Vec2::new(0.15, 0.5), Vec2::new(0.6, 0.8), Vec2::new(0.6, 0.2)];
        let contact = test(&actor, &wedge).expect("wedge tip is inside actor");
        assert_eq!(contact.owner, VertexOwner::Second);
        assert!((contact.normal - Vec2::new(1.0, 0.0)).length() < 1e-6);
        assert!((contact.depth - 0.05).abs() < 1e-5);
        // Pushing the actor out moves it left, away from the wedge.
        assert!(contact.push_out_first().x < 0.0);
    }

    #[test]
    fn detection_is_symmetric() {
        let cases = [
            (actor_at(0.4, 0.97), floor()),
            (rect(0.0, 0.0, 1.0, 1.0), rect(0.9, 0.5, 2.0, 0.8)),
            (rect(0.0, 0.0, 1.0, 1.0), rect(1.0, 0.0, 2.0, 1.0)),
            (rect(0.0, 0.0, 1.0, 1.0), rect(3.0, 3.0, 4.0, 4.0)),
            (
                vec![Vec2::new(0.0, 0.0), Vec2::new(0.0, 2.0), Vec2::new(2.0, 0.0)],
                rect(0.5, 0.5, 1.5, 1.5),
            ),
        ];
        for (a, b) in &cases {
            assert_eq!(test(a, b).is_some(), test(b, a).is_some());
        }
    }

    #[test]
    fn swapping_arguments_flips_owner() {
        let actor = actor_at(0.4, 0.98);
        let forward = test(&actor, &floor()).expect("overlap");
        let reverse = test(&floor(), &actor).expect("overlap");
        assert_eq!(forward.owner, VertexOwner::First);
        assert_eq!(reverse.owner, VertexOwner::Second);
        assert_eq!(forward.normal, reverse.normal);
        assert!((forward.push_out_first() + reverse.push_out_first()).length() < 1e-6);
    }

    #[test]
    fn resolution_removes_overlap() {
        let cases = [
            (actor_at(0.4, 0.97), floor()),
            (actor_at(0.0, 0.0), rect(0.1, 0.3, 1.0, 0.6)),
            (rect(0.0, 0.0, 1.0, 1.0), rect(0.8, 0.9, 2.0, 2.0)),
        ];
        for (a, b) in &cases {
            let contact = test(a, b).expect("cases overlap");
            let moved = translated(a, contact.push_out_first());
            if let Some(left) = test(&moved, b) {
                assert!(left.depth < 1e-5, "residual depth {}", left.depth);
            }
        }
    }

    #[test]
    fn shape_wrapper_reads_current_vertices() {
        let a = Shape::fixed(rect(0.0, 0.0, 1.0, 1.0)).expect("valid shape");
        let b = Shape::fixed(rect(0.5, 0.5, 1.5, 1.5)).expect("valid shape");
        assert!(test_shapes(&a, &b).is_some());
    }

    #[test]
    #[should_panic(expected = "at least 3 vertices")]
    fn degenerate_input_fails_fast() {
        let line = vec![Vec2::ZERO, Vec2::new(1.0, 0.0)];
        test(&line, &rect(0.0, 0.0, 1.0, 1.0));
    }
}
