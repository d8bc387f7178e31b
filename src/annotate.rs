// src/annotate.rs - Overlay placement for downstream renderers
use crate::landmarks::Hand;

pub const DEFAULT_MARGIN: i32 = 10;

/// Pixel position for the handedness label: top-left of the hand's bounding
/// box, lifted by `margin` pixels.
pub fn label_anchor(hand: &Hand, width: u32, height: u32, margin: i32) -> (i32, i32) {
    let (min_x, min_y, _, _) = hand.bounding_box();
    let x = (min_x * width as f64) as i32;
    let y = (min_y * height as f64) as i32 - margin;
    (x, y)
}
