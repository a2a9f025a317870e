//! Mapping from raw optimizer coordinates to inverter power factors.

/// Smallest power-factor magnitude an inverter is allowed to run at.
pub const MIN_PF_MAGNITUDE: f64 = 0.90;

/// Map any real value onto `[-1.0, -0.90] ∪ [0.90, 1.0]`, keeping the sign.
///
/// The optimizer searches the continuous interval `[-1, 1]`; values whose
/// magnitude falls below 0.90 are pushed out to ±0.90. Exactly zero (and NaN)
/// has no usable sign: scaling its sign by 0.90 would yield 0.0, which is not a
/// valid power factor, so it maps to +0.90 instead.
pub fn sanitize_pf(raw: f64) -> f64 {
    if raw.is_nan() || raw == 0.0 {
        return MIN_PF_MAGNITUDE;
    }
    let clipped = raw.clamp(-1.0, 1.0);
    let magnitude = clipped.abs().max(MIN_PF_MAGNITUDE);
    magnitude.copysign(clipped)
}

pub fn sanitize_all(raw: &[f64]) -> Vec<f64> {
    raw.iter().copied().map(sanitize_pf).collect()
}
