// src/tracking.rs - Frame-by-frame hand classification over detector output
use std::collections::VecDeque;
use std::time::Instant;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::annotate::{label_anchor, DEFAULT_MARGIN};
use crate::error::{Result, TrackingError};
use crate::fingers::{evaluate, FingerState};
use crate::gesture::{classify, GestureResult};
use crate::landmarks::{Hand, Handedness};

/// One hand as delivered by the external landmark detector.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectedHand {
    pub landmarks: Vec<[f64; 3]>,
    #[serde(default)]
    pub handedness: Option<String>,
}

/// Detector output for a single video frame.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DetectionFrame {
    #[serde(default)]
    pub hands: Vec<DetectedHand>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub max_hands: usize,
    pub frame_rate: f64,
    pub skip_invalid_hands: bool,
    pub frame_width: u32,
    pub frame_height: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            max_hands: 2,
            frame_rate: 30.0,
            skip_invalid_hands: true,
            frame_width: 640,
            frame_height: 480,
        }
    }
}

impl TrackerConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_hands == 0 {
            return Err(TrackingError::Config("max_hands must be at least 1".into()));
        }
        if !self.frame_rate.is_finite() || self.frame_rate <= 0.0 {
            return Err(TrackingError::Config(format!(
                "frame_rate must be positive, got {}",
                self.frame_rate
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HandResult {
    pub hand_index: usize,
    pub handedness: Handedness,
    pub finger_state: FingerState,
    pub gesture: GestureResult,
    pub label_anchor: (i32, i32),
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct TrackingResult {
    pub frame: u64,
    pub timestamp_ms: u64,
    pub hands: Vec<HandResult>,
    pub invalid_hands: usize,
}

#[derive(Debug, Clone, Default)]
pub struct PerformanceMetrics {
    pub frames_processed: u64,
    pub hands_classified: u64,
    pub avg_processing_time_ms: f64,
    frame_times: VecDeque<f64>,
}

const METRICS_WINDOW: usize = 30;

impl PerformanceMetrics {
    pub fn new() -> Self {
        Self {
            frame_times: VecDeque::with_capacity(METRICS_WINDOW),
            ..Default::default()
        }
    }

    fn record(&mut self, elapsed_ms: f64, hands: usize) {
        self.frames_processed += 1;
        self.hands_classified += hands as u64;

        self.frame_times.push_front(elapsed_ms);
        if self.frame_times.len() > METRICS_WINDOW {
            self.frame_times.pop_back();
        }
        self.avg_processing_time_ms =
            self.frame_times.iter().sum::<f64>() / self.frame_times.len() as f64;
    }
}

/// Runs finger evaluation and gesture classification on every hand of every frame.
///
/// Only the frame counter and metrics persist between frames; each hand is
/// classified from its own landmarks alone.
pub struct HandTracker {
    config: TrackerConfig,
    frame_counter: u64,
    metrics: PerformanceMetrics,
}

impl HandTracker {
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            frame_counter: 0,
            metrics: PerformanceMetrics::new(),
        })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    fn timestamp_ms(&self, frame: u64) -> u64 {
        (frame as f64 * 1000.0 / self.config.frame_rate) as u64
    }

    pub fn process_frame(&mut self, frame: &DetectionFrame) -> Result<TrackingResult> {
        let start = Instant::now();

        let mut result = TrackingResult {
            frame: self.frame_counter,
            timestamp_ms: self.timestamp_ms(self.frame_counter),
            ..Default::default()
        };

        if frame.hands.len() > self.config.max_hands {
            debug!(
                detected = frame.hands.len(),
                max = self.config.max_hands,
                "dropping hands beyond max_hands"
            );
        }

        for (i, detected) in frame.hands.iter().take(self.config.max_hands).enumerate() {
            match self.process_hand_landmarks(detected, i) {
                Ok(hand) => result.hands.push(hand),
                Err(e) if self.config.skip_invalid_hands => {
                    warn!(frame = result.frame, hand = i, "skipping hand: {}", e);
                    result.invalid_hands += 1;
                }
                Err(e) => return Err(e),
            }
        }

        self.frame_counter += 1;
        self.metrics
            .record(start.elapsed().as_secs_f64() * 1000.0, result.hands.len());

        Ok(result)
    }

    fn process_hand_landmarks(&self, detected: &DetectedHand, hand_index: usize) -> Result<HandResult> {
        let hand = Hand::from_points(&detected.landmarks)?;
        let handedness = Handedness::from_label(detected.handedness.as_deref());

        let finger_state = evaluate(&hand, handedness);
        let gesture = classify(&finger_state);

        Ok(HandResult {
            hand_index,
            handedness,
            finger_state,
            gesture,
            label_anchor: label_anchor(
                &hand,
                self.config.frame_width,
                self.config.frame_height,
                DEFAULT_MARGIN,
            ),
        })
    }
}
