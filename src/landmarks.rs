// src/landmarks.rs - MediaPipe 21-point hand topology
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TrackingError};

pub const LANDMARK_COUNT: usize = 21;

/// Landmark indices as emitted by the hand landmark detector.
///
/// The numeric values are part of the detector contract and must not be reordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(usize)]
pub enum HandLandmark {
    Wrist = 0,
    ThumbCmc = 1,
    ThumbMcp = 2,
    ThumbIp = 3,
    ThumbTip = 4,
    IndexMcp = 5,
    IndexPip = 6,
    IndexDip = 7,
    IndexTip = 8,
    MiddleMcp = 9,
    MiddlePip = 10,
    MiddleDip = 11,
    MiddleTip = 12,
    RingMcp = 13,
    RingPip = 14,
    RingDip = 15,
    RingTip = 16,
    PinkyMcp = 17,
    PinkyPip = 18,
    PinkyDip = 19,
    PinkyTip = 20,
}

impl HandLandmark {
    pub const ALL: [HandLandmark; LANDMARK_COUNT] = [
        Self::Wrist,
        Self::ThumbCmc,
        Self::ThumbMcp,
        Self::ThumbIp,
        Self::ThumbTip,
        Self::IndexMcp,
        Self::IndexPip,
        Self::IndexDip,
        Self::IndexTip,
        Self::MiddleMcp,
        Self::MiddlePip,
        Self::MiddleDip,
        Self::MiddleTip,
        Self::RingMcp,
        Self::RingPip,
        Self::RingDip,
        Self::RingTip,
        Self::PinkyMcp,
        Self::PinkyPip,
        Self::PinkyDip,
        Self::PinkyTip,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Wrist => "wrist",
            Self::ThumbCmc => "thumb-cmc",
            Self::ThumbMcp => "thumb-mcp",
            Self::ThumbIp => "thumb-ip",
            Self::ThumbTip => "thumb-tip",
            Self::IndexMcp => "index-mcp",
            Self::IndexPip => "index-pip",
            Self::IndexDip => "index-dip",
            Self::IndexTip => "index-tip",
            Self::MiddleMcp => "middle-mcp",
            Self::MiddlePip => "middle-pip",
            Self::MiddleDip => "middle-dip",
            Self::MiddleTip => "middle-tip",
            Self::RingMcp => "ring-mcp",
            Self::RingPip => "ring-pip",
            Self::RingDip => "ring-dip",
            Self::RingTip => "ring-tip",
            Self::PinkyMcp => "pinky-mcp",
            Self::PinkyPip => "pinky-pip",
            Self::PinkyDip => "pinky-dip",
            Self::PinkyTip => "pinky-tip",
        }
    }
}

/// A single normalized landmark. x/y are image-relative, z is depth relative to the wrist.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Landmark {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f64; 3]> for Landmark {
    fn from(p: [f64; 3]) -> Self {
        Self::new(p[0], p[1], p[2])
    }
}

impl From<Landmark> for [f64; 3] {
    fn from(lm: Landmark) -> Self {
        [lm.x, lm.y, lm.z]
    }
}

impl From<Vector3<f64>> for Landmark {
    fn from(v: Vector3<f64>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Landmark> for Vector3<f64> {
    fn from(lm: Landmark) -> Self {
        Vector3::new(lm.x, lm.y, lm.z)
    }
}

/// One detected hand: exactly 21 landmarks in detector order.
#[derive(Debug, Clone, PartialEq)]
pub struct Hand {
    landmarks: [Landmark; LANDMARK_COUNT],
}

impl Hand {
    pub fn new(landmarks: [Landmark; LANDMARK_COUNT]) -> Self {
        Self { landmarks }
    }

    /// Builds a hand from raw detector output, failing fast on anything that
    /// is not 21 finite points.
    pub fn from_points(points: &[[f64; 3]]) -> Result<Self> {
        if points.len() != LANDMARK_COUNT {
            return Err(TrackingError::LandmarkCount {
                expected: LANDMARK_COUNT,
                found: points.len(),
            });
        }

        let mut landmarks = [Landmark::default(); LANDMARK_COUNT];
        for (i, p) in points.iter().enumerate() {
            let lm = Landmark::from(*p);
            if !lm.is_finite() {
                return Err(TrackingError::NonFiniteLandmark { index: i });
            }
            landmarks[i] = lm;
        }

        Ok(Self { landmarks })
    }

    pub fn landmark(&self, id: HandLandmark) -> Landmark {
        self.landmarks[id.index()]
    }

    pub fn landmarks(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.landmarks
    }

    pub fn position(&self, id: HandLandmark) -> Vector3<f64> {
        self.landmark(id).into()
    }

    /// (min_x, min_y, max_x, max_y) over all landmarks.
    pub fn bounding_box(&self) -> (f64, f64, f64, f64) {
        self.landmarks.iter().fold(
            (f64::INFINITY, f64::INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY),
            |(min_x, min_y, max_x, max_y), lm| {
                (min_x.min(lm.x), min_y.min(lm.y), max_x.max(lm.x), max_y.max(lm.y))
            },
        )
    }
}

/// Which physical hand the detector believes it saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
    #[default]
    Unknown,
}

impl Handedness {
    /// Maps the detector's category label. Any known label other than "Right"
    /// is treated as a left hand.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            None => Self::Unknown,
            Some("Right") => Self::Right,
            Some(_) => Self::Left,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "Left",
            Self::Right => "Right",
            Self::Unknown => "Unknown",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(n: usize) -> Vec<[f64; 3]> {
        (0..n).map(|i| [i as f64 * 0.01, 0.5, 0.0]).collect()
    }

    #[test]
    fn test_indices_match_detector_topology() {
        assert_eq!(HandLandmark::Wrist.index(), 0);
        assert_eq!(HandLandmark::ThumbCmc.index(), 1);
        assert_eq!(HandLandmark::ThumbMcp.index(), 2);
        assert_eq!(HandLandmark::ThumbTip.index(), 4);
        assert_eq!(HandLandmark::IndexMcp.index(), 5);
        assert_eq!(HandLandmark::IndexTip.index(), 8);
        assert_eq!(HandLandmark::MiddleMcp.index(), 9);
        assert_eq!(HandLandmark::RingMcp.index(), 13);
        assert_eq!(HandLandmark::PinkyMcp.index(), 17);
        assert_eq!(HandLandmark::PinkyTip.index(), 20);

        for (i, lm) in HandLandmark::ALL.iter().enumerate() {
            assert_eq!(lm.index(), i, "{} out of order", lm.as_str());
        }
    }

    #[test]
    fn test_from_points_rejects_wrong_count() {
        match Hand::from_points(&points(20)) {
            Err(TrackingError::LandmarkCount { expected, found }) => {
                assert_eq!(expected, 21);
                assert_eq!(found, 20);
            }
            other => panic!("expected LandmarkCount error, got {:?}", other),
        }
        assert!(Hand::from_points(&points(22)).is_err());
        assert!(Hand::from_points(&[]).is_err());
    }

    #[test]
    fn test_from_points_rejects_nan() {
        let mut pts = points(21);
        pts[7][1] = f64::NAN;
        assert!(matches!(
            Hand::from_points(&pts),
            Err(TrackingError::NonFiniteLandmark { index: 7 })
        ));
    }

    #[test]
    fn test_landmark_lookup() {
        let hand = Hand::from_points(&points(21)).unwrap();
        let tip = hand.landmark(HandLandmark::IndexTip);
        assert!((tip.x - 0.08).abs() < 1e-12);
        assert_eq!(hand.position(HandLandmark::IndexTip), Vector3::new(tip.x, tip.y, tip.z));
    }

    #[test]
    fn test_bounding_box() {
        let hand = Hand::from_points(&points(21)).unwrap();
        let (min_x, min_y, max_x, max_y) = hand.bounding_box();
        assert_eq!(min_x, 0.0);
        assert!((max_x - 0.2).abs() < 1e-12);
        assert_eq!(min_y, 0.5);
        assert_eq!(max_y, 0.5);
    }

    #[test]
    fn test_handedness_labels() {
        assert_eq!(Handedness::from_label(Some("Right")), Handedness::Right);
        assert_eq!(Handedness::from_label(Some("Left")), Handedness::Left);
        assert_eq!(Handedness::from_label(Some("right")), Handedness::Left);
        assert_eq!(Handedness::from_label(None), Handedness::Unknown);
        assert_eq!(Handedness::Unknown.as_str(), "Unknown");
    }
}
