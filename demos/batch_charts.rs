//! Example: Generate charts for many pitch traces in parallel
//!
//! Usage:
//!   cargo run --release --example batch_charts -- [--jobs N] [--json] <trace.json> ...
//!
//! Notes:
//! - Parallelism is across tracks. Each chart is still built single-threaded.
//! - Default workers: (available CPU threads - 1), keeping one core free for the system.

use notechart::{compute_summary, generate_chart, ChartConfig, PitchFrame};
use rayon::prelude::*;
use std::env;
use std::fs;
use std::time::Instant;

fn default_jobs() -> usize {
    let n = std::thread::available_parallelism().map(|v| v.get()).unwrap_or(1);
    std::cmp::max(1, n.saturating_sub(1))
}

fn load_trace(path: &str) -> Result<Vec<PitchFrame>, Box<dyn std::error::Error + Send + Sync>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

struct ItemOut {
    path: String,
    notes: usize,
    length: f32,
    voiced_ratio: f32,
    error: Option<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args: Vec<String> = env::args().skip(1).collect();

    let mut json = false;
    let mut jobs: Option<usize> = None;
    let mut paths: Vec<String> = Vec::new();

    while let Some(a) = args.first().cloned() {
        args.remove(0);
        match a.as_str() {
            "--json" => json = true,
            "--jobs" => {
                let v = args
                    .first()
                    .ok_or("--jobs requires a value")?
                    .parse::<usize>()?;
                args.remove(0);
                jobs = Some(std::cmp::max(1, v));
            }
            "--help" | "-h" => {
                eprintln!(
                    "Usage: batch_charts [--jobs N] [--json] <trace1.json> <trace2.json> ...\n\
                     \n\
                     --jobs N   Parallel workers (default: CPU-1)\n\
                     --json     Emit one JSON object per line (JSONL)\n"
                );
                return Ok(());
            }
            _ => paths.push(a),
        }
    }

    if paths.is_empty() {
        eprintln!("ERROR: Provide at least one trace file. Use --help for usage.");
        std::process::exit(2);
    }

    let jobs = jobs.unwrap_or_else(default_jobs);
    eprintln!("Batch: {} traces, jobs={}", paths.len(), jobs);

    let config = ChartConfig::default();

    let t0 = Instant::now();
    let pool = rayon::ThreadPoolBuilder::new().num_threads(jobs).build()?;

    let outs: Vec<ItemOut> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let chart = load_trace(path)
                    .map_err(|e| format!("load failed: {e}"))
                    .and_then(|frames| {
                        generate_chart(path, &frames, &config)
                            .map_err(|e| format!("generation failed: {e}"))
                    });
                match chart {
                    Ok(chart) => {
                        let summary = compute_summary(&chart);
                        ItemOut {
                            path: path.clone(),
                            notes: summary.note_count,
                            length: chart.length,
                            voiced_ratio: summary.voiced_ratio,
                            error: None,
                        }
                    }
                    Err(e) => ItemOut {
                        path: path.clone(),
                        notes: 0,
                        length: 0.0,
                        voiced_ratio: 0.0,
                        error: Some(e),
                    },
                }
            })
            .collect()
    });

    for (idx, o) in outs.iter().enumerate() {
        match (&o.error, json) {
            (None, true) => println!(
                "{{\"file\":{},\"notes\":{},\"length\":{:.3},\"voiced_ratio\":{:.4}}}",
                serde_json::to_string(&o.path)?,
                o.notes,
                o.length,
                o.voiced_ratio
            ),
            (Some(e), true) => println!(
                "{{\"file\":{},\"error\":{}}}",
                serde_json::to_string(&o.path)?,
                serde_json::to_string(e)?
            ),
            (None, false) => println!(
                "[{}/{}] {}: {} notes over {:.2}s (voiced {:.0}%)",
                idx + 1,
                outs.len(),
                o.path,
                o.notes,
                o.length,
                o.voiced_ratio * 100.0
            ),
            (Some(e), false) => println!("[{}/{}] {}: ERROR: {}", idx + 1, outs.len(), o.path, e),
        }
    }

    let ok = outs.iter().filter(|o| o.error.is_none()).count();
    eprintln!(
        "Done: ok={}/{} wall={:.0}ms",
        ok,
        outs.len(),
        t0.elapsed().as_secs_f64() * 1000.0
    );

    Ok(())
}
