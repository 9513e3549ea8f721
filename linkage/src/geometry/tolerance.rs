// Centralized tolerances and helpers for robust geometry

pub const EPS_POS: f32 = 1e-4;            // point coincidence threshold (px)
pub const EPS_LEN: f32 = 1e-6;            // zero-length vector threshold
pub const EPS_DENOM: f32 = 1e-8;          // denominator guard for ratios

// Adaptive flattening
pub const DEFAULT_FLATTEN_TOL: f32 = 0.25; // px
pub const MAX_FLATTEN_DEPTH: u32 = 16;

#[inline] pub fn clamp01(x: f32) -> f32 { x.max(0.0).min(1.0) }
#[inline] pub fn approx_eq(a: f32, b: f32, eps: f32) -> bool { (a - b).abs() <= eps }

#[inline]
pub fn safe_div(num: f32, den: f32, fallback: f32) -> f32 {
    if den.abs() <= EPS_DENOM { fallback } else { num/den }
}

#[inline]
pub fn valid_tolerance(tol: f32) -> bool { tol.is_finite() && tol > 0.0 }
