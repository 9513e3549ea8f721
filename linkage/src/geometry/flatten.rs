use crate::geometry::math::dist_point_to_seg_sq;
use crate::geometry::tolerance::MAX_FLATTEN_DEPTH;
use crate::model::{PathNode, Point};

pub fn flatten_cubic(points: &mut Vec<Point>, p0: Point, p1: Point, p2: Point, p3: Point, tol: f32, depth: u32) {
    let d1 = dist_point_to_seg_sq(p1, p0, p3);
    let d2 = dist_point_to_seg_sq(p2, p0, p3);
    let tol2 = tol * tol;
    if d1.max(d2) <= tol2 || depth > MAX_FLATTEN_DEPTH {
        points.push(p3);
        return;
    }
    let mid = |a: Point, b: Point| Point { x: 0.5*(a.x + b.x), y: 0.5*(a.y + b.y) };
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p012 = mid(p01, p12);
    let p123 = mid(p12, p23);
    let p0123 = mid(p012, p123);
    flatten_cubic(points, p0, p01, p012, p0123, tol, depth+1);
    flatten_cubic(points, p0123, p123, p23, p3, tol, depth+1);
}

/// Flatten a node path into a polyline. Segment `i -> i+1` runs from node
/// `i`'s outgoing control to node `i+1`'s incoming control; closed paths wrap.
pub fn flatten_path(nodes: &[PathNode], closed: bool, tol: f32) -> Vec<Point> {
    let mut out = Vec::new();
    let Some(first) = nodes.first() else { return out };
    out.push(first.main);
    let seg_count = if closed && nodes.len() > 1 { nodes.len() } else { nodes.len().saturating_sub(1) };
    for i in 0..seg_count {
        let a = &nodes[i];
        let b = &nodes[(i + 1) % nodes.len()];
        if a.c2 == a.main && b.c1 == b.main {
            out.push(b.main);
        } else {
            flatten_cubic(&mut out, a.main, a.c2, b.c1, b.main, tol, 0);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_path_keeps_corners() {
        let nodes = [
            PathNode::corner(Point::new(0.0, 0.0)),
            PathNode::corner(Point::new(10.0, 0.0)),
            PathNode::corner(Point::new(10.0, 10.0)),
        ];
        assert_eq!(flatten_path(&nodes, false, 0.25).len(), 3);
        let closed = flatten_path(&nodes, true, 0.25);
        assert_eq!(closed.len(), 4);
        assert_eq!(closed[3], Point::new(0.0, 0.0));
    }

    #[test]
    fn curved_segment_subdivides() {
        let nodes = [
            PathNode::curved(Point::new(0.0, 0.0), Point::new(0.0, 0.0), Point::new(0.0, 40.0)),
            PathNode::curved(Point::new(40.0, 0.0), Point::new(40.0, 40.0), Point::new(40.0, 0.0)),
        ];
        let pts = flatten_path(&nodes, false, 0.25);
        assert!(pts.len() > 4);
        assert_eq!(*pts.last().unwrap(), Point::new(40.0, 0.0));
    }

    #[test]
    fn empty_and_single() {
        assert!(flatten_path(&[], true, 0.25).is_empty());
        let one = [PathNode::corner(Point::new(3.0, 4.0))];
        assert_eq!(flatten_path(&one, true, 0.25), vec![Point::new(3.0, 4.0)]);
    }
}
