// src/gesture.rs - Ordered rule cascade from finger state to gesture
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::fingers::FingerState;

pub const FIST_CONFIDENCE: f64 = 0.80;
pub const POINT_CONFIDENCE: f64 = 0.85;
pub const UNKNOWN_CONFIDENCE_FLOOR: f64 = 0.15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GestureType {
    OpenPalm,
    Fist,
    Point,
    Unknown,
}

impl GestureType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OpenPalm => "OPEN_PALM",
            Self::Fist => "FIST",
            Self::Point => "POINT",
            Self::Unknown => "UNKNOWN",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureResult {
    pub gesture: GestureType,
    pub confidence: f64,
}

impl GestureResult {
    fn new(gesture: GestureType, confidence: f64) -> Self {
        Self { gesture, confidence }
    }
}

/// Index up with middle and ring down. Thumb and pinky are not consulted.
pub fn is_point(state: &FingerState) -> bool {
    state.index && !state.middle && !state.ring
}

/// Classifies a finger state. The rules are checked in order and the first match wins:
/// FIST, then OPEN_PALM, then POINT, then UNKNOWN.
pub fn classify(state: &FingerState) -> GestureResult {
    let four_fingers_down = !state.index && !state.middle && !state.ring && !state.pinky;
    let up_count = state.extended_count();
    let count_confidence = up_count as f64 / 5.0;

    // Thumb is ignored here, a fist with the thumb out is still a fist.
    let result = if four_fingers_down {
        GestureResult::new(GestureType::Fist, FIST_CONFIDENCE)
    } else if up_count >= 4 {
        GestureResult::new(GestureType::OpenPalm, count_confidence)
    } else if is_point(state) {
        GestureResult::new(GestureType::Point, POINT_CONFIDENCE)
    } else {
        GestureResult::new(
            GestureType::Unknown,
            count_confidence.max(UNKNOWN_CONFIDENCE_FLOOR),
        )
    };

    debug!(
        gesture = result.gesture.as_str(),
        confidence = result.confidence,
        up_count,
        "classified hand"
    );
    result
}
