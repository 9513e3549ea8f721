// Robust segment-segment intersection using f64 with tolerances.
// Classifies proper crossings, endpoint touches, and collinear overlaps.

use crate::model::Point;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegIntersection {
    None,
    // Proper interior intersection (not at endpoints within tolerance)
    Proper { t: f64, u: f64, x: f64, y: f64 },
    // Touch at endpoints (may be both endpoints). t/u may be 0 or 1 within tolerance
    Touch { t: f64, u: f64, x: f64, y: f64 },
    // Collinear overlapping span: parameter range on the first segment (inclusive, ordered)
    CollinearOverlap { t0: f64, t1: f64 },
}

impl SegIntersection {
    /// Parameter on the first segment of the earliest shared point.
    pub fn first_t(&self) -> Option<f64> {
        match *self {
            SegIntersection::None => None,
            SegIntersection::Proper { t, .. } | SegIntersection::Touch { t, .. } => Some(t),
            SegIntersection::CollinearOverlap { t0, .. } => Some(t0),
        }
    }
}

#[inline]
fn orient(ax: f64, ay: f64, bx: f64, by: f64, cx: f64, cy: f64) -> f64 {
    (bx - ax) * (cy - ay) - (by - ay) * (cx - ax)
}

#[inline]
fn within_eps(x: f64, eps: f64) -> bool { x.abs() <= eps }

#[inline]
fn clamp01f64(x: f64) -> f64 { x.clamp(0.0, 1.0) }

// Project CD onto AB's dominant axis and compute the overlapping t-range on AB.
fn collinear_overlap(ax: f64, ay: f64, bx: f64, by: f64,
                     cx: f64, cy: f64, dx: f64, dy: f64,
                     eps: f64) -> SegIntersection {
    let use_x = (bx - ax).abs() >= (by - ay).abs();
    let (pa1, pa2, pc1, pc2) = if use_x { (ax, bx, cx, dx) } else { (ay, by, cy, dy) };
    let len_ab = pa2 - pa1;
    if within_eps(len_ab, eps) {
        // AB is a point lying on CD
        return SegIntersection::Touch { t: 0.0, u: 0.0, x: ax, y: ay };
    }
    let t_c1 = (pc1 - pa1) / len_ab;
    let t_c2 = (pc2 - pa1) / len_ab;
    let lo = t_c1.min(t_c2);
    let hi = t_c1.max(t_c2);
    if hi < -eps || lo > 1.0 + eps { return SegIntersection::None; }
    let lo = lo.max(0.0);
    let hi = hi.min(1.0);
    if hi < lo { return SegIntersection::None; }
    SegIntersection::CollinearOverlap { t0: lo, t1: hi }
}

pub fn intersect_segments(a: Point, b: Point, c: Point, d: Point,
                          eps_pos: f32, eps_denom: f32) -> SegIntersection {
    let ax = a.x as f64; let ay = a.y as f64; let bx = b.x as f64; let by = b.y as f64;
    let cx = c.x as f64; let cy = c.y as f64; let dx = d.x as f64; let dy = d.y as f64;
    let eps = eps_pos as f64;
    let denom_eps = eps_denom as f64;

    let o1 = orient(ax, ay, bx, by, cx, cy);
    let o2 = orient(ax, ay, bx, by, dx, dy);
    let o3 = orient(cx, cy, dx, dy, ax, ay);
    let o4 = orient(cx, cy, dx, dy, bx, by);

    if within_eps(o1, eps) && within_eps(o2, eps) && within_eps(o3, eps) && within_eps(o4, eps) {
        return collinear_overlap(ax, ay, bx, by, cx, cy, dx, dy, eps);
    }

    let inter1 = (o1 > 0.0 && o2 < 0.0) || (o1 < 0.0 && o2 > 0.0) || within_eps(o1, eps) || within_eps(o2, eps);
    let inter2 = (o3 > 0.0 && o4 < 0.0) || (o3 < 0.0 && o4 > 0.0) || within_eps(o3, eps) || within_eps(o4, eps);
    if !(inter1 && inter2) {
        return SegIntersection::None;
    }

    let r_x = bx - ax; let r_y = by - ay;
    let s_x = dx - cx; let s_y = dy - cy;
    let rxs = r_x * s_y - r_y * s_x;
    let q_p_x = cx - ax; let q_p_y = cy - ay;
    let qpxr = q_p_x * r_y - q_p_y * r_x;

    if within_eps(rxs, denom_eps) {
        // Parallel but not collinear (already handled)
        return SegIntersection::None;
    }

    let t = (q_p_x * s_y - q_p_y * s_x) / rxs;
    let u = qpxr / rxs;
    let x = ax + t * r_x;
    let y = ay + t * r_y;

    let is_touch = within_eps(t, eps) || within_eps(1.0 - t, eps) || within_eps(u, eps) || within_eps(1.0 - u, eps);

    if is_touch {
        SegIntersection::Touch { t: clamp01f64(t), u: clamp01f64(u), x, y }
    } else if t >= -eps && t <= 1.0 + eps && u >= -eps && u <= 1.0 + eps {
        SegIntersection::Proper { t, u, x, y }
    } else {
        SegIntersection::None
    }
}
