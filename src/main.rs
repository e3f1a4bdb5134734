use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use track_identify::console;
use track_identify::dispose::Disposition;
use track_identify::identify::Identifier;
use track_identify::library::{load_catalog, scan_input_dir};
use track_identify::probe::LoftyProbe;
use track_identify::progress::{create_progress_bar, format_elapsed, init_logging, set_log_only};
use track_identify::run::{run_batch, RunOptions};

#[derive(Parser)]
#[command(name = "track-identify")]
#[command(about = "Identify unstructured song files against a metadata export")]
struct Args {
    /// The metadata export in JSON format
    metadata: PathBuf,

    /// The input directory containing music files to identify
    #[arg(short = 'd', long = "dir")]
    dir: Option<PathBuf>,

    /// The output directory
    #[arg(short = 'o', long = "output-dir")]
    output_dir: Option<PathBuf>,

    /// Copy files instead of moving/renaming them
    #[arg(long)]
    copy: bool,

    /// Replace files that already exist in the output directory
    /// (by default such files are left alone and the source is skipped)
    #[arg(long)]
    overwrite: bool,

    /// Identify files but do not copy or move anything
    #[arg(long)]
    dry_run: bool,

    /// Disable colored distance/duration hints (also honors NO_COLOR)
    #[arg(long)]
    no_color: bool,

    /// Hide the progress bar; log lines only
    #[arg(long)]
    log_only: bool,

    /// Write run statistics as JSON to this path
    #[arg(long)]
    stats: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_logging();
    set_log_only(args.log_only);
    console::set_color(!args.no_color && std::env::var_os("NO_COLOR").is_none());

    let start = Instant::now();
    let cwd = std::env::current_dir().context("Failed to resolve current directory")?;
    let input_dir = args.dir.clone().unwrap_or_else(|| cwd.clone());
    let output_dir = args.output_dir.clone().unwrap_or(cwd);

    tracing::info!(path = %args.metadata.display(), "Loading metadata");
    let catalog = load_catalog(&args.metadata)?;
    let files = scan_input_dir(&input_dir)?;
    tracing::info!(
        entries = catalog.len(),
        files = files.len(),
        input = %input_dir.display(),
        "Catalog loaded"
    );

    let options = RunOptions {
        output_dir,
        disposition: if args.copy {
            Disposition::Copy
        } else {
            Disposition::Move
        },
        overwrite: args.overwrite,
        dry_run: args.dry_run,
    };

    let identifier = Identifier::new(&catalog, LoftyProbe);
    let stdin = std::io::stdin();
    let mut input = stdin.lock();
    let stdout = std::io::stdout();
    let mut output = stdout.lock();

    let pb = create_progress_bar(files.len() as u64, "Identifying");
    let mut stats = run_batch(&identifier, &files, &options, &mut input, &mut output, &pb)?;
    stats.elapsed_seconds = start.elapsed().as_secs_f64();

    writeln!(output, "\n{:=<60}", "")?;
    writeln!(output, "Identification complete!")?;
    writeln!(output, "  Files: {}", stats.files_seen)?;
    writeln!(
        output,
        "  Matched: {} ({} auto, {} chosen, {:.1}%)",
        stats.total_matches(),
        stats.auto_matched,
        stats.operator_selected,
        stats.match_rate()
    )?;
    writeln!(output, "  Skipped: {}", stats.operator_skipped)?;
    writeln!(output, "  Unreadable: {}", stats.probe_failures)?;
    writeln!(output, "  Refused targets: {}", stats.refused_targets)?;
    writeln!(output, "  Elapsed: {}", format_elapsed(start.elapsed()))?;
    writeln!(output, "{:=<60}", "")?;

    if let Some(path) = &args.stats {
        stats
            .write_to_file(path)
            .with_context(|| format!("Failed to write stats to {}", path.display()))?;
    }

    Ok(())
}
