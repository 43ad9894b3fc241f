use clap::{Parser, Subcommand};
use serde::Serialize;
use stegsniff::naming::{capacity_summary, download_name_for, format_bytes};
use stegsniff::{Detector, RiffPolicy, SignatureTable};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "stegsniff", about = "Detect extracted payload types from magic bytes")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected extension of each file
    Detect {
        #[arg(required = true, num_args = 1..)]
        files: Vec<PathBuf>,
        /// Use the RIFF form tag (bytes 8..12) to tell .avi from .wav
        #[arg(long)]
        riff_form_type: bool,
        /// Emit one JSON object per file
        #[arg(long)]
        json: bool,
    },
    /// Print the download name for an extracted payload
    Name {
        file: PathBuf,
        #[arg(long)]
        riff_form_type: bool,
    },
    /// Format a byte count the way the capacity preview shows it
    Size {
        bytes: u64,
    },
    /// List the signature table in match order
    Signatures,
}

#[derive(Serialize)]
struct DetectRecord {
    path:      String,
    extension: &'static str,
    header:    String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {

        // ── Detect ───────────────────────────────────────────────────────────
        Commands::Detect { files, riff_form_type, json } => {
            let detector = detector(riff_form_type);
            let mut failed = 0usize;
            for path in &files {
                let header = match detector.probe_path(path) {
                    Ok(header) => header,
                    Err(e) => {
                        warn!("{e}");
                        failed += 1;
                        continue;
                    }
                };
                let kind = detector.detect_header(&header);
                if json {
                    let record = DetectRecord {
                        path:      path.display().to_string(),
                        extension: kind.extension(),
                        header:    header.hex().to_string(),
                    };
                    println!("{}", serde_json::to_string(&record)?);
                } else {
                    println!("{:<40} {}", path.display(), kind);
                }
            }
            if failed > 0 {
                return Err(format!("{failed} file(s) could not be read").into());
            }
        }

        // ── Name ─────────────────────────────────────────────────────────────
        Commands::Name { file, riff_form_type } => {
            let kind = detector(riff_form_type).detect_path(&file)?;
            println!("{}", download_name_for(kind));
        }

        // ── Size ─────────────────────────────────────────────────────────────
        Commands::Size { bytes } => {
            println!("{}", format_bytes(bytes));
            println!("{}", capacity_summary(bytes));
        }

        // ── Signatures ───────────────────────────────────────────────────────
        Commands::Signatures => {
            let table = SignatureTable::builtin();
            let shadowed = table.shadowed();
            println!("{:>3}  {:<10} {:<6}", "#", "Prefix", "Ext");
            for (i, sig) in table.entries().iter().enumerate() {
                let note = if shadowed.contains(&i) { "  (shadowed)" } else { "" };
                println!("{:>3}  {:<10} {:<6}{}", i, sig.prefix, sig.kind, note);
            }
        }
    }

    Ok(())
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn detector(riff_form_type: bool) -> Detector {
    let policy = if riff_form_type { RiffPolicy::FormType } else { RiffPolicy::FirstMatch };
    Detector::new().with_riff_policy(policy)
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
