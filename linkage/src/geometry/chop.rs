//! Boundary crossings used by chopping connectors.
//!
//! Every function walks the segment `toward -> reference` and reports the
//! crossing nearest `toward`, so an edge arriving from outside stops at the
//! silhouette. `None` means the segment never meets the outline.

use crate::geometry::intersect::intersect_segments;
use crate::geometry::tolerance::{EPS_DENOM, EPS_LEN, EPS_POS};
use crate::model::{Point, Rect};

/// Crossing against a polyline; `closed` adds the wrap-around segment.
pub fn chop_polyline(points: &[Point], closed: bool, reference: Point, toward: Point) -> Option<Point> {
    if points.len() < 2 || toward.distance(reference) <= EPS_LEN {
        return None;
    }
    let mut best: Option<f64> = None;
    let n = points.len();
    let seg_count = if closed { n } else { n - 1 };
    for i in 0..seg_count {
        let a = points[i];
        let b = points[(i + 1) % n];
        if let Some(t) = intersect_segments(toward, reference, a, b, EPS_POS, EPS_DENOM).first_t() {
            if best.map_or(true, |bt| t < bt) {
                best = Some(t);
            }
        }
    }
    best.map(|t| {
        let t = t as f32;
        Point {
            x: toward.x + (reference.x - toward.x) * t,
            y: toward.y + (reference.y - toward.y) * t,
        }
    })
}

pub fn chop_rect(bounds: &Rect, reference: Point, toward: Point) -> Option<Point> {
    chop_polyline(&bounds.corners(), true, reference, toward)
}

/// Crossing against the ellipse inscribed in `bounds`.
pub fn chop_ellipse(bounds: &Rect, reference: Point, toward: Point) -> Option<Point> {
    let rx = 0.5 * bounds.w as f64;
    let ry = 0.5 * bounds.h as f64;
    if rx <= EPS_LEN as f64 || ry <= EPS_LEN as f64 {
        return chop_rect(bounds, reference, toward);
    }
    let c = bounds.center();
    let x0 = (toward.x - c.x) as f64 / rx;
    let y0 = (toward.y - c.y) as f64 / ry;
    let dx = (reference.x - toward.x) as f64 / rx;
    let dy = (reference.y - toward.y) as f64 / ry;
    let qa = dx * dx + dy * dy;
    if qa <= EPS_DENOM as f64 {
        return None;
    }
    let qb = 2.0 * (x0 * dx + y0 * dy);
    let qc = x0 * x0 + y0 * y0 - 1.0;
    let disc = qb * qb - 4.0 * qa * qc;
    if disc < 0.0 {
        return None;
    }
    let sq = disc.sqrt();
    let t1 = (-qb - sq) / (2.0 * qa);
    let t2 = (-qb + sq) / (2.0 * qa);
    let t = [t1, t2].into_iter().find(|t| (0.0..=1.0).contains(t))? as f32;
    Some(Point {
        x: toward.x + (reference.x - toward.x) * t,
        y: toward.y + (reference.y - toward.y) * t,
    })
}
