//! pcmframe - PCM frame processor

use anyhow::Context;
use clap::Parser;
use std::process;
use pcmframe::config::Config;
use pcmframe::processing::AudioProcessor;
use pcmframe::{init_logging, Args, PcmError};

fn main() {
    let args = Args::parse();
    init_logging(args.verbose);

    if let Err(e) = run(args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: Args) -> anyhow::Result<()> {
    if args.verbose {
        println!("{} v{}", pcmframe::NAME, pcmframe::VERSION);
        println!();
    }

    let config = Config::from_args_and_config(args)?;

    if !config.input_path.exists() {
        return Err(PcmError::config(format!(
            "Input file does not exist: {}", config.input_path.display()
        )).into());
    }

    let verbose = config.verbose();
    let input_path = config.input_path.clone();
    let mut processor = AudioProcessor::new(config)?;
    let result = processor
        .run()
        .with_context(|| format!("Failed to process {}", input_path.display()))?;

    println!("=== Processing Complete ===");
    println!("Input: {}", result.input_path.display());
    println!("Output: {}", result.output_path.display());
    println!("Frames: {}", result.frame_count);
    println!("Duration: {:.2}s", result.duration_seconds);
    println!("Format: {}", result.output_format);
    if verbose {
        println!("Source format: {}", result.input_format);
        println!("Peak: {:.4}", result.output_peak);
        println!("Time: {:.3}s", result.processing_time_seconds);
    }

    Ok(())
}
