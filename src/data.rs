// src/data.rs
use std::collections::BTreeMap;
use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::Local;
use csv::Writer;
use serde::Serialize;
use tracing::info;

use crate::error::Result;
use crate::gesture::GestureType;
use crate::tracking::TrackingResult;

#[derive(Debug, Serialize)]
struct GestureRecord<'a> {
    frame: u64,
    timestamp_ms: u64,
    hand_index: usize,
    handedness: &'a str,
    thumb: bool,
    index: bool,
    middle: bool,
    ring: bool,
    pinky: bool,
    gesture: &'a str,
    confidence: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionSummary {
    pub session: String,
    pub total_frames: usize,
    pub total_hands: usize,
    pub invalid_hands: usize,
    pub gesture_counts: BTreeMap<String, usize>,
}

pub struct DataExporter {
    output_dir: PathBuf,
    session_name: String,
    tracking_data: Vec<TrackingResult>,
}

impl DataExporter {
    pub fn new(output_dir: impl AsRef<Path>, session_name: Option<String>) -> Self {
        let session_name = session_name.unwrap_or_else(|| {
            format!("session_{}", Local::now().format("%Y%m%d_%H%M%S"))
        });

        Self {
            output_dir: output_dir.as_ref().to_path_buf(),
            session_name,
            tracking_data: Vec::new(),
        }
    }

    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn session_dir(&self) -> PathBuf {
        self.output_dir.join(&self.session_name)
    }

    pub fn add_frame(&mut self, result: TrackingResult) {
        self.tracking_data.push(result);
    }

    pub fn export_csv(&self) -> Result<PathBuf> {
        let csv_path = self.session_dir().join("gestures.csv");
        if let Some(parent) = csv_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let file = File::create(&csv_path)?;
        let mut writer = Writer::from_writer(file);

        for result in &self.tracking_data {
            for hand in &result.hands {
                let fs = &hand.finger_state;
                writer.serialize(GestureRecord {
                    frame: result.frame,
                    timestamp_ms: result.timestamp_ms,
                    hand_index: hand.hand_index,
                    handedness: hand.handedness.as_str(),
                    thumb: fs.thumb,
                    index: fs.index,
                    middle: fs.middle,
                    ring: fs.ring,
                    pinky: fs.pinky,
                    gesture: hand.gesture.gesture.as_str(),
                    confidence: hand.gesture.confidence,
                })?;
            }
        }

        writer.flush()?;
        info!(path = %csv_path.display(), "exported gesture csv");
        Ok(csv_path)
    }

    pub fn summary(&self) -> SessionSummary {
        let mut gesture_counts: BTreeMap<String, usize> = [
            GestureType::OpenPalm,
            GestureType::Fist,
            GestureType::Point,
            GestureType::Unknown,
        ]
        .iter()
        .map(|g| (g.as_str().to_string(), 0))
        .collect();

        let mut total_hands = 0;
        let mut invalid_hands = 0;
        for result in &self.tracking_data {
            invalid_hands += result.invalid_hands;
            for hand in &result.hands {
                total_hands += 1;
                *gesture_counts
                    .entry(hand.gesture.gesture.as_str().to_string())
                    .or_insert(0) += 1;
            }
        }

        SessionSummary {
            session: self.session_name.clone(),
            total_frames: self.tracking_data.len(),
            total_hands,
            invalid_hands,
            gesture_counts,
        }
    }

    pub fn export_summary(&self) -> Result<PathBuf> {
        let path = self.session_dir().join("summary.json");
        std::fs::create_dir_all(self.session_dir())?;

        let file = File::create(&path)?;
        serde_json::to_writer_pretty(file, &self.summary())?;
        info!(path = %path.display(), "exported session summary");
        Ok(path)
    }
}
