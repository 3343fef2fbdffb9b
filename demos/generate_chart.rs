//! Example: Generate a chart from one pitch trace
//!
//! Usage:
//!   cargo run --example generate_chart -- [trace.json]
//!
//! `trace.json` is a JSON array of `{ "time", "frequency_hz", "confidence" }`
//! objects. Without an argument a short synthetic melody is used. The chart is
//! printed to stdout as pretty JSON.

use notechart::{compute_summary, generate_chart, ChartConfig, PitchFrame};
use std::env;
use std::fs;

/// A four-note phrase at a 10 ms hop
fn synthetic_trace() -> Vec<PitchFrame> {
    let hop = 0.01;
    let notes: [(f32, Option<f32>); 6] = [
        (0.3, None),
        (0.5, Some(261.63)),
        (0.5, Some(293.66)),
        (0.1, None),
        (0.5, Some(329.63)),
        (1.0, Some(261.63)),
    ];

    let mut frames = Vec::new();
    for (duration, freq) in notes {
        for _ in 0..(duration / hop).round() as usize {
            let time = frames.len() as f32 * hop;
            frames.push(match freq {
                Some(f) => PitchFrame::new(time, f, 0.9),
                None => PitchFrame::new(time, 0.0, 0.0),
            });
        }
    }
    frames
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::init();

    let (name, frames) = match env::args().nth(1) {
        Some(path) => {
            let text = fs::read_to_string(&path)?;
            let frames: Vec<PitchFrame> = serde_json::from_str(&text)?;
            (path, frames)
        }
        None => ("synthetic".to_string(), synthetic_trace()),
    };

    let config = ChartConfig::default();
    let chart = generate_chart(&name, &frames, &config)?;
    let summary = compute_summary(&chart);

    eprintln!("Chart '{}':", chart.name);
    eprintln!("  Length: {:.2}s", chart.length);
    eprintln!("  Notes: {} in {} lanes", chart.notes.len(), chart.lanes);
    eprintln!("  Voiced: {:.0}%", summary.voiced_ratio * 100.0);
    if !summary.is_clean() {
        eprintln!("  Flags: {:?}", summary.flags);
    }

    println!("{}", serde_json::to_string_pretty(&chart)?);

    Ok(())
}
