// Leitmotif CLI
// Mines MIDI files for recurring motifs and writes a summary MIDI file

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;

use leitmotif_lib::{MinerConfig, MotifMiner};

/// Leitmotif - recurring melodic motif miner
#[derive(Parser, Debug)]
#[command(name = "leitmotif")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Find recurring melodic motifs in MIDI files", long_about = None)]
struct Args {
    /// MIDI files to analyze
    #[arg(value_name = "FILE", required = true)]
    inputs: Vec<PathBuf>,

    /// Note events per sliding window
    #[arg(short, long, default_value_t = 20)]
    window_length: usize,

    /// Directory for the summary file (emptied on every run)
    #[arg(short, long, default_value = "output")]
    output_dir: PathBuf,

    /// Also write one MIDI file per top pattern
    #[arg(long)]
    per_pattern: bool,

    /// Append a JSONL trace of the run to this file
    #[arg(long, value_name = "FILE")]
    trace: Option<PathBuf>,

    /// Print the run summary as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .init();

    let args = Args::parse();

    let config = MinerConfig {
        window_length: args.window_length,
        output_dir: args.output_dir,
        per_pattern_files: args.per_pattern,
        trace_path: args.trace,
        ..Default::default()
    };

    let summary = match MotifMiner::new(config).run(&args.inputs) {
        Ok(summary) => summary,
        Err(_) => return ExitCode::FAILURE,
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                log::error!("Failed to serialize run summary: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("Top patterns:");
        for pattern in &summary.top_patterns {
            println!(
                "  {:>2}. {}  motifs: {}  prevalence: {:.2}%  duration: {:.2}%",
                pattern.rank,
                pattern.key,
                pattern.motif_count,
                pattern.prevalence_score * 100.0,
                pattern.duration_score * 100.0
            );
        }
        println!("Saved {}", summary.output.path.display());
    }

    ExitCode::SUCCESS
}
