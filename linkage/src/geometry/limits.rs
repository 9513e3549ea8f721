// Centralized ingestion limits to harden against untrusted documents

// Drawing size caps
pub const MAX_SHAPES: usize = 100_000;
pub const MAX_EDGES: usize = 200_000;
pub const MAX_PATH_NODES_PER_SHAPE: usize = 8_000;
pub const MAX_PATH_NODES_TOTAL: usize = 1_000_000;

// Locator attribute bounds
pub const MAX_LOCATOR_INDEX: i64 = i32::MAX as i64;
pub const MIN_LOCATOR_INDEX: i64 = i32::MIN as i64;

// Numeric bounds
pub const COORD_MIN: f32 = -10_000_000.0;
pub const COORD_MAX: f32 =  10_000_000.0;
pub const DURATION_MAX: f32 = 1.0e9;

#[inline]
pub fn in_coord_bounds(x: f32) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_duration_bounds(d: f32) -> bool { d.is_finite() && d >= 0.0 && d <= DURATION_MAX }
