// Centralized ingestion limits to harden against untrusted scene files

// Scene size caps
pub const MAX_NODES: usize = 200_000;
pub const MAX_EDGES: usize = 300_000;
pub const MAX_OPENABLES: usize = 50_000;
pub const MAX_MOVABLES: usize = 50_000;
pub const MAX_DIMS_PER_RECTANGLE: usize = 16;

// Node ids at or above this are rejected on load and never handed out
pub const MAX_NODE_ID: u32 = 1 << 31;

// Data URLs can be large, but not unbounded
pub const MAX_IMAGE_BYTES: usize = 64 * 1024 * 1024;

// Numeric bounds
pub const COORD_MIN: f64 = -10_000_000.0;
pub const COORD_MAX: f64 =  10_000_000.0;
pub const SIZE_MAX: f64 = 1_000_000.0;

#[inline]
pub fn in_coord_bounds(x: f64) -> bool { x.is_finite() && x >= COORD_MIN && x <= COORD_MAX }

#[inline]
pub fn in_size_bounds(w: f64) -> bool { w.is_finite() && w >= 0.0 && w <= SIZE_MAX }
