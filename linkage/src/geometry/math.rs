use crate::model::Point;
use super::tolerance::EPS_LEN;

pub fn seg_distance_sq(p: Point, a: Point, b: Point) -> (f32, f32) {
    let vx = b.x - a.x; let vy = b.y - a.y;
    let wx = p.x - a.x; let wy = p.y - a.y;
    let vv = vx*vx + vy*vy;
    let mut t = if vv > 0.0 { (wx*vx + wy*vy) / vv } else { 0.0 };
    if t < 0.0 { t = 0.0; } else if t > 1.0 { t = 1.0; }
    let projx = a.x + t * vx; let projy = a.y + t * vy;
    let dx = p.x - projx; let dy = p.y - projy;
    (dx*dx + dy*dy, t)
}

pub fn dist_point_to_seg_sq(p: Point, a: Point, b: Point) -> f32 {
    let (d2, _) = seg_distance_sq(p, a, b);
    d2
}

pub fn cubic_point(t: f32, p0: Point, p1: Point, p2: Point, p3: Point) -> Point {
    let u = 1.0 - t;
    let tt = t*t; let uu = u*u;
    let uuu = uu*u; let ttt = tt*t;
    Point {
        x: uuu*p0.x + 3.0*uu*t*p1.x + 3.0*u*tt*p2.x + ttt*p3.x,
        y: uuu*p0.y + 3.0*uu*t*p1.y + 3.0*u*tt*p2.y + ttt*p3.y,
    }
}

#[inline]
pub fn lerp(a: Point, b: Point, t: f32) -> Point {
    Point { x: a.x + (b.x - a.x) * t, y: a.y + (b.y - a.y) * t }
}

/// Unit direction from `a` to `b`, or `None` when they coincide.
pub fn direction(a: Point, b: Point) -> Option<(f32, f32)> {
    let dx = b.x - a.x; let dy = b.y - a.y;
    let len = (dx*dx + dy*dy).sqrt();
    if len > EPS_LEN { Some((dx/len, dy/len)) } else { None }
}

/// Walk a polyline and return the point at `fraction` of its total length.
pub fn point_along(points: &[Point], fraction: f32) -> Option<Point> {
    let first = *points.first()?;
    let total: f32 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= EPS_LEN { return Some(first); }
    let target = fraction * total;
    let mut acc = 0.0;
    for w in points.windows(2) {
        let seg = w[0].distance(w[1]);
        if seg > 0.0 && acc + seg >= target {
            return Some(lerp(w[0], w[1], (target - acc) / seg));
        }
        acc += seg;
    }
    points.last().copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_along_walks_by_length() {
        let pts = [Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 30.0)];
        let mid = point_along(&pts, 0.5).unwrap();
        assert!((mid.x - 10.0).abs() < 1e-4 && (mid.y - 10.0).abs() < 1e-4);
        assert_eq!(point_along(&pts, 1.0).unwrap(), Point::new(10.0, 30.0));
        assert_eq!(point_along(&pts, 0.0).unwrap(), Point::new(0.0, 0.0));
    }

    #[test]
    fn degenerate_polyline() {
        assert!(point_along(&[], 0.3).is_none());
        let p = Point::new(4.0, 5.0);
        assert_eq!(point_along(&[p, p], 0.7), Some(p));
    }

    #[test]
    fn cubic_endpoints() {
        let (a, b, c, d) = (Point::new(0.0, 0.0), Point::new(0.0, 10.0), Point::new(10.0, 10.0), Point::new(10.0, 0.0));
        assert_eq!(cubic_point(0.0, a, b, c, d), a);
        assert_eq!(cubic_point(1.0, a, b, c, d), d);
        let m = cubic_point(0.5, a, b, c, d);
        assert!((m.x - 5.0).abs() < 1e-4 && (m.y - 7.5).abs() < 1e-4);
    }
}
