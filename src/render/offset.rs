//! Slot fan-out geometry.
//!
//! Several connectors may anchor at the same slot; rather than stacking them
//! on one pixel, they fan out symmetrically around the anchor.

/// Pixel pitch between connectors sharing one slot anchor.
pub const SLOT_PITCH: f32 = 12.0;

/// Horizontal offset for the k-th of n connectors sharing a slot (0-indexed).
///
/// Offsets are centered on the anchor and evenly spaced: one connector sits
/// at 0, two at ±PITCH/2, three at −PITCH/0/+PITCH, and so on. The set of
/// offsets for any n is symmetric about zero.
pub fn slot_offset(k: usize, n: usize) -> f32 {
    SLOT_PITCH * ((k + 1) as f32 - n as f32 / 2.0 - 0.5)
}
