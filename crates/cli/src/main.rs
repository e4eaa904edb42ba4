// ABOUTME: CLI for normalizing and scoring scraped study program batches.
// ABOUTME: Reads scraper JSON from a file or stdin, runs the pipeline, and writes JSON (plus optional CSV).

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use unimatch_core::{
    csv_path_for, write_json, write_programs_csv, Pipeline, PipelineConfig, ProcessedDataset,
    ScrapedBatch, UserProfile,
};

/// Normalize scraped program data and score it against a user profile.
#[derive(Parser, Debug)]
#[command(name = "unimatch")]
#[command(about = "Normalize and score scraped study programs", long_about = None)]
struct Args {
    /// Scraper output JSON (`{"programs": [...]}`). Use "-" to read from stdin.
    input: String,

    /// User profile JSON, structured or flat applicant form.
    #[arg(short = 'p', long)]
    profile: Option<PathBuf>,

    /// Pipeline configuration TOML.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// Output file path (default: stdout).
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,

    /// Also write `<output stem>_programs.csv` next to the output file.
    #[arg(long, default_value_t = false)]
    csv: bool,

    /// Output compact JSON instead of pretty.
    #[arg(long, default_value_t = false)]
    compact: bool,

    /// Number of top matches to print to stderr when a profile is given.
    #[arg(long, default_value_t = 10)]
    top: usize,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    if args.csv && args.output.is_none() {
        bail!("--csv requires --output");
    }

    let config = match &args.config {
        Some(path) => PipelineConfig::load_from_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => PipelineConfig::default(),
    };

    let batch = ScrapedBatch::from_json(&load_text(&args.input)?)
        .with_context(|| format!("reading batch {}", args.input))?;

    let profile = match &args.profile {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading profile {}", path.display()))?;
            let profile = UserProfile::from_json(&text)
                .with_context(|| format!("parsing profile {}", path.display()))?;
            Some(profile)
        }
        None => None,
    };

    let dataset = Pipeline::new(config).run(&batch.programs, profile.as_ref());

    match &args.output {
        Some(path) => {
            let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
            write_json(BufWriter::new(file), &dataset, !args.compact)?;
            info!(path = %path.display(), "processed data saved");

            if args.csv {
                let csv_path = csv_path_for(path);
                let file = File::create(&csv_path)
                    .with_context(|| format!("creating {}", csv_path.display()))?;
                write_programs_csv(BufWriter::new(file), &dataset.programs)?;
                info!(path = %csv_path.display(), "programs csv saved");
            }
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_json(&mut lock, &dataset, !args.compact)?;
            writeln!(lock)?;
        }
    }

    if profile.is_some() {
        print_top_matches(&dataset, args.top)?;
    }

    Ok(())
}

fn print_top_matches(dataset: &ProcessedDataset, n: usize) -> Result<()> {
    let mut err = io::stderr().lock();
    writeln!(err, "\nTop {} matches:", n.min(dataset.programs.len()))?;
    writeln!(err, "{}", "-".repeat(80))?;
    for (rank, program) in dataset.programs.iter().take(n).enumerate() {
        let tuition = program
            .tuition_eur
            .map(|t| format!("€{t}"))
            .unwrap_or_else(|| "N/A".to_string());
        writeln!(err, "{}. {}", rank + 1, program.title)?;
        writeln!(err, "   University: {}", program.university)?;
        writeln!(err, "   Country: {}", program.country)?;
        writeln!(err, "   Tuition: {tuition}")?;
        writeln!(
            err,
            "   Overall Match: {:.2}%",
            program.matching_scores.overall_fit * 100.0
        )?;
    }
    Ok(())
}

fn load_text(target: &str) -> Result<String> {
    if target == "-" {
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        return Ok(buf);
    }

    let path = PathBuf::from(target);
    if !path.exists() {
        bail!("file not found: {}", target);
    }
    Ok(fs::read_to_string(path)?)
}
