//! Hand gesture classification from per-frame hand landmarks.
//!
//! Landmarks come from an external detector (21 normalized points per hand plus an
//! optional "Left"/"Right" label). [`fingers::evaluate`] turns them into per-finger
//! extended flags and [`gesture::classify`] maps those flags to a gesture with a
//! confidence. Both are pure functions; [`tracking::HandTracker`] drives them over
//! a stream of detector frames.

pub mod annotate;
pub mod data;
pub mod error;
pub mod fingers;
pub mod gesture;
pub mod landmarks;
pub mod tracking;

pub use error::{Result, TrackingError};
pub use fingers::{evaluate, Finger, FingerState};
pub use gesture::{classify, GestureResult, GestureType};
pub use landmarks::{Hand, HandLandmark, Handedness, Landmark, LANDMARK_COUNT};
pub use tracking::{DetectedHand, DetectionFrame, HandTracker, TrackerConfig, TrackingResult};
