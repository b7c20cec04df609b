//! Blending helpers used to soften hard noise thresholds.


/// Cubic Hermite blend `t² (3 − 2t)`, the input is clamped to `[0, 1]` first.
#[inline]
pub fn smoothstep(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}

/// Blend a value through a symmetric transition band of half-width `band` centered on
/// `threshold`. Returns 0 below `threshold - band`, 1 above `threshold + band` and the
/// smoothstep in between. A non-positive band degenerates into a hard step.
#[inline]
pub fn band_blend(value: f64, threshold: f64, band: f64) -> f64 {
    if band <= 0.0 {
        return if value > threshold { 1.0 } else { 0.0 };
    }
    smoothstep((value - (threshold - band)) / (2.0 * band))
}
