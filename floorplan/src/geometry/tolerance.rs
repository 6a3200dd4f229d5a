// Centralized tolerances for robust geometry (world units are mm)

pub const EPS_LEN: f64 = 1e-9;            // zero-length wall threshold
pub const EPS_DENOM: f64 = 1e-12;         // denominator guard for ratios
pub const EPS_FACE_AREA: f64 = 1e-2;      // tiny face area threshold (mm^2)

// Square millimeters per square meter
pub const MM2_PER_M2: f64 = 1e6;

#[inline]
pub fn safe_div(num: f64, den: f64, fallback: f64) -> f64 {
    if den.abs() <= EPS_DENOM { fallback } else { num/den }
}
