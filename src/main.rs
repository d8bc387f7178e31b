// src/main.rs
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{debug, info};

use hand_gestures::data::DataExporter;
use hand_gestures::{DetectionFrame, HandTracker, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "hand_gestures", about = "Classify hand gestures from detector landmark streams")]
struct Cli {
    /// JSON Lines file with one detector frame per line (default: stdin)
    #[arg(long)]
    input: Option<PathBuf>,

    /// Tracker config as JSON
    #[arg(long)]
    config: Option<PathBuf>,

    /// Directory for exported sessions
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Session name (default: session_<timestamp>)
    #[arg(long)]
    session: Option<String>,

    /// Write gestures.csv and summary.json at the end of the stream
    #[arg(long)]
    export: bool,

    /// Frame width in pixels, for label placement
    #[arg(long)]
    width: Option<u32>,

    /// Frame height in pixels, for label placement
    #[arg(long)]
    height: Option<u32>,
}

fn default_output_dir() -> PathBuf {
    directories::UserDirs::new()
        .and_then(|dirs| dirs.document_dir().map(|p| p.join("HandGestures")))
        .unwrap_or_else(|| PathBuf::from("./output"))
}

fn load_config(cli: &Cli) -> Result<TrackerConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open config {}", path.display()))?;
            serde_json::from_reader(BufReader::new(file))
                .with_context(|| format!("failed to parse config {}", path.display()))?
        }
        None => TrackerConfig::default(),
    };

    if let Some(width) = cli.width {
        config.frame_width = width;
    }
    if let Some(height) = cli.height {
        config.frame_height = height;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hand_gestures=info".into()),
        )
        .with_writer(io::stderr)
        .init();

    let config = load_config(&cli)?;
    info!(?config, "starting hand gesture tracker");
    let mut tracker = HandTracker::new(config).context("invalid tracker config")?;

    let reader: Box<dyn BufRead> = match &cli.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("failed to open {}", path.display()))?,
        )),
        None => Box::new(BufReader::new(io::stdin())),
    };

    let mut exporter = cli.export.then(|| {
        DataExporter::new(
            cli.output_dir.clone().unwrap_or_else(default_output_dir),
            cli.session.clone(),
        )
    });

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if line.trim().is_empty() {
            continue;
        }

        let frame: DetectionFrame = serde_json::from_str(&line)
            .with_context(|| format!("malformed detector frame on line {}", line_no + 1))?;
        let result = tracker.process_frame(&frame)?;

        for hand in &result.hands {
            let [line1, line2] = hand.finger_state.status_lines();
            println!(
                "frame {} hand {} [{}] {} ({:.2})  {}  {}",
                result.frame,
                hand.hand_index,
                hand.handedness.as_str(),
                hand.gesture.gesture.as_str(),
                hand.gesture.confidence,
                line1,
                line2
            );
        }
        debug!(frame = result.frame, hands = result.hands.len(), "frame processed");

        if let Some(exporter) = exporter.as_mut() {
            exporter.add_frame(result);
        }
    }

    let metrics = tracker.metrics();
    info!(
        frames = metrics.frames_processed,
        hands = metrics.hands_classified,
        avg_ms = metrics.avg_processing_time_ms,
        "stream finished"
    );

    if let Some(exporter) = exporter {
        let csv_path = exporter.export_csv().context("failed to export csv")?;
        let summary_path = exporter.export_summary().context("failed to export summary")?;
        println!("Exported {} and {}", csv_path.display(), summary_path.display());
    }

    Ok(())
}
