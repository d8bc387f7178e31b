// src/fingers.rs - Per-finger extended/flexed evaluation
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::trace;

use crate::landmarks::{Hand, HandLandmark, Handedness, Landmark};

/// Minimum |tip.x - ip.x| for the thumb to count as extended when handedness is unknown.
pub const THUMB_DISPLACEMENT_THRESHOLD: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// The three landmarks a finger is judged by, base to tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FingerJoints {
    pub mcp: HandLandmark,
    pub pip: HandLandmark,
    pub tip: HandLandmark,
}

impl Finger {
    pub const ALL: [Finger; 5] = [
        Self::Thumb,
        Self::Index,
        Self::Middle,
        Self::Ring,
        Self::Pinky,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Thumb => "thumb",
            Self::Index => "index",
            Self::Middle => "middle",
            Self::Ring => "ring",
            Self::Pinky => "pinky",
        }
    }

    /// For the thumb, `mcp` is landmark 1 and `pip` (the IP joint) is landmark 2.
    pub fn joints(&self) -> FingerJoints {
        use HandLandmark::*;
        let (mcp, pip, tip) = match self {
            Self::Thumb => (ThumbCmc, ThumbMcp, ThumbTip),
            Self::Index => (IndexMcp, IndexPip, IndexTip),
            Self::Middle => (MiddleMcp, MiddlePip, MiddleTip),
            Self::Ring => (RingMcp, RingPip, RingTip),
            Self::Pinky => (PinkyMcp, PinkyPip, PinkyTip),
        };
        FingerJoints { mcp, pip, tip }
    }
}

/// Extended flag for every finger of one hand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FingerState {
    pub thumb: bool,
    pub index: bool,
    pub middle: bool,
    pub ring: bool,
    pub pinky: bool,
}

impl FingerState {
    pub fn is_extended(&self, finger: Finger) -> bool {
        match finger {
            Finger::Thumb => self.thumb,
            Finger::Index => self.index,
            Finger::Middle => self.middle,
            Finger::Ring => self.ring,
            Finger::Pinky => self.pinky,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Finger, bool)> + '_ {
        Finger::ALL.iter().map(move |f| (*f, self.is_extended(*f)))
    }

    pub fn extended_count(&self) -> usize {
        self.iter().filter(|(_, up)| *up).count()
    }

    /// Two display lines, "Index: up  Middle: down" and "Ring: ..  Pinky: ..".
    pub fn status_lines(&self) -> [String; 2] {
        let part = |f: Finger| {
            let name = f.as_str();
            let mut label = name[..1].to_uppercase();
            label.push_str(&name[1..]);
            format!("{}: {}", label, if self.is_extended(f) { "up" } else { "down" })
        };

        [
            format!("{}  {}", part(Finger::Index), part(Finger::Middle)),
            format!("{}  {}", part(Finger::Ring), part(Finger::Pinky)),
        ]
    }
}

impl Serialize for FingerState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Finger::ALL.len()))?;
        for (finger, up) in self.iter() {
            map.serialize_entry(finger.as_str(), &up)?;
        }
        map.end()
    }
}

/// Computes the extended state of all five fingers.
///
/// Non-thumb fingers are extended when tip, pip and mcp climb strictly upward
/// in the image (y grows downward). The thumb moves sideways, so it is judged on x,
/// mirrored by handedness, with a displacement fallback when handedness is unknown.
pub fn evaluate(hand: &Hand, handedness: Handedness) -> FingerState {
    let state = FingerState {
        thumb: thumb_extended(hand, handedness),
        index: finger_extended(hand, Finger::Index),
        middle: finger_extended(hand, Finger::Middle),
        ring: finger_extended(hand, Finger::Ring),
        pinky: finger_extended(hand, Finger::Pinky),
    };
    trace!(?handedness, ?state, "evaluated finger state");
    state
}

fn chain(hand: &Hand, finger: Finger) -> (Landmark, Landmark, Landmark) {
    let j = finger.joints();
    (hand.landmark(j.tip), hand.landmark(j.pip), hand.landmark(j.mcp))
}

fn finger_extended(hand: &Hand, finger: Finger) -> bool {
    let (tip, pip, mcp) = chain(hand, finger);
    tip.y < pip.y && pip.y < mcp.y
}

fn thumb_extended(hand: &Hand, handedness: Handedness) -> bool {
    let (tip, ip, mcp) = chain(hand, Finger::Thumb);
    match handedness {
        Handedness::Unknown => (tip.x - ip.x).abs() > THUMB_DISPLACEMENT_THRESHOLD,
        Handedness::Right => tip.x > ip.x && ip.x > mcp.x,
        Handedness::Left => tip.x < ip.x && ip.x < mcp.x,
    }
}


#[cfg(test)]
mod tests {
    use super::test_hands::*;
    use super::*;

    #[test]
    fn test_open_palm_all_extended() {
        let state = evaluate(&open_palm(), Handedness::Right);
        assert!(Finger::ALL.iter().all(|f| state.is_extended(*f)), "{:?}", state);
        assert_eq!(state.extended_count(), 5);
    }

    #[test]
    fn test_fist_all_flexed() {
        let state = evaluate(&fist(), Handedness::Right);
        assert_eq!(state, FingerState::default());
    }

    #[test]
    fn test_finger_requires_strict_monotonic_chain() {
        let cases = [
            ((0.2, 0.4, 0.6), true),
            // tip above mcp but pip out of line: tilted, not straight
            ((0.2, 0.1, 0.6), false),
            ((0.2, 0.7, 0.6), false),
            // equality is never extended
            ((0.4, 0.4, 0.6), false),
            ((0.2, 0.6, 0.6), false),
            ((0.6, 0.4, 0.2), false),
        ];

        for ((tip, pip, mcp), expected) in cases {
            for finger in [Finger::Index, Finger::Middle, Finger::Ring, Finger::Pinky] {
                let mut lms = neutral();
                set_finger(&mut lms, finger, tip, pip, mcp);
                let state = evaluate(&Hand::new(lms), Handedness::Unknown);
                assert_eq!(
                    state.is_extended(finger),
                    expected,
                    "{} with tip={} pip={} mcp={}",
                    finger.as_str(),
                    tip,
                    pip,
                    mcp
                );
            }
        }
    }

    #[test]
    fn test_fingers_are_independent() {
        let mut lms = neutral();
        set_finger(&mut lms, Finger::Middle, 0.2, 0.4, 0.6);
        let state = evaluate(&Hand::new(lms), Handedness::Right);
        assert!(state.middle);
        assert!(!state.index && !state.ring && !state.pinky);
    }

    #[test]
    fn test_thumb_right_and_left() {
        let mut lms = neutral();
        set_thumb(&mut lms, 0.7, 0.6, 0.5);
        let hand = Hand::new(lms);
        assert!(evaluate(&hand, Handedness::Right).thumb);
        assert!(!evaluate(&hand, Handedness::Left).thumb);

        let mut lms = neutral();
        set_thumb(&mut lms, 0.3, 0.4, 0.5);
        let hand = Hand::new(lms);
        assert!(!evaluate(&hand, Handedness::Right).thumb);
        assert!(evaluate(&hand, Handedness::Left).thumb);
    }

    #[test]
    fn test_thumb_mirroring() {
        let axis = 0.5;
        let samples = [
            (0.7, 0.6, 0.55),
            (0.7, 0.6, 0.65),
            (0.6, 0.6, 0.5),
            (0.52, 0.51, 0.5),
            (0.4, 0.6, 0.8),
        ];

        for (tip, ip, mcp) in samples {
            let mut right = neutral();
            set_thumb(&mut right, tip, ip, mcp);
            let mut left = neutral();
            set_thumb(&mut left, 2.0 * axis - tip, 2.0 * axis - ip, 2.0 * axis - mcp);

            assert_eq!(
                evaluate(&Hand::new(right), Handedness::Right).thumb,
                evaluate(&Hand::new(left), Handedness::Left).thumb,
                "mirror mismatch for tip={} ip={} mcp={}",
                tip,
                ip,
                mcp
            );
        }
    }

    #[test]
    fn test_thumb_unknown_handedness_uses_displacement() {
        let mut lms = neutral();
        set_thumb(&mut lms, 0.53, 0.5, 0.9);
        assert!(evaluate(&Hand::new(lms), Handedness::Unknown).thumb);

        let mut lms = neutral();
        set_thumb(&mut lms, 0.47, 0.5, 0.1);
        assert!(evaluate(&Hand::new(lms), Handedness::Unknown).thumb);

        let mut lms = neutral();
        set_thumb(&mut lms, 0.51, 0.5, 0.1);
        assert!(!evaluate(&Hand::new(lms), Handedness::Unknown).thumb);
    }

    #[test]
    fn test_thumb_strict_equality_not_extended() {
        let mut lms = neutral();
        set_thumb(&mut lms, 0.7, 0.6, 0.6);
        assert!(!evaluate(&Hand::new(lms), Handedness::Right).thumb);

        let mut lms = neutral();
        set_thumb(&mut lms, 0.6, 0.6, 0.5);
        assert!(!evaluate(&Hand::new(lms), Handedness::Right).thumb);
    }

    #[test]
    fn test_evaluate_is_deterministic() {
        let hand = open_palm();
        let first = evaluate(&hand, Handedness::Left);
        for _ in 0..10 {
            assert_eq!(evaluate(&hand, Handedness::Left), first);
        }
    }

    #[test]
    fn test_status_lines() {
        let state = FingerState {
            thumb: true,
            index: true,
            middle: false,
            ring: false,
            pinky: true,
        };
        let [line1, line2] = state.status_lines();
        assert_eq!(line1, "Index: up  Middle: down");
        assert_eq!(line2, "Ring: down  Pinky: up");
    }

    #[test]
    fn test_serializes_all_five_keys() {
        let json = serde_json::to_value(FingerState::default()).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), 5);
        for finger in Finger::ALL {
            assert_eq!(obj[finger.as_str()], serde_json::Value::Bool(false));
        }
    }
}
