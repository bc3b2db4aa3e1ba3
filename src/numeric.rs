//! Numeric conversion helpers used across the project.
//!
//! These utilities guard conversions between grid indices and world-space
//! floats. They rely on debug assertions to flag unexpected overflows while
//! keeping the call-sites ergonomic.

/// Convert a grid index into world-space `f32`.
#[expect(
    clippy::cast_precision_loss,
    reason = "Grid dimensions stay far below 2^24 cells per axis."
)]
#[must_use]
pub fn index_to_f32(index: usize) -> f32 {
    debug_assert!(index < (1 << 24), "grid index {index} loses precision as f32");
    index as f32
}

/// Floor a world coordinate expressed in cells, returning `None` when it lies
/// before the origin or is not finite.
#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "The floored value is validated as finite and non-negative."
)]
#[must_use]
pub fn floor_to_index(value: f32) -> Option<usize> {
    if !value.is_finite() {
        return None;
    }
    let floored = value.floor();
    if floored < 0.0 {
        return None;
    }
    Some(floored as usize)
}
