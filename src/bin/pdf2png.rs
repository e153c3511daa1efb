//! CLI binary for pdf2png.
//!
//! A thin shell over the library crate: collects inputs and an output
//! directory, validates the selection, starts the background converter and
//! renders its progress.

use anyhow::{Context, Result};
use clap::Parser;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2png::{
    expand_inputs, ConversionConfig, ConversionEvent, ConversionJob, Converter, JobSummary,
};
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const EXIT_FAILED: u8 = 1;
const EXIT_INVALID: u8 = 2;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Two PDFs into ./out  →  out/report/report_page_1.png, …
  pdf2png report.pdf slides.pdf -o out

  # Every *.pdf in a folder, at 150 DPI
  pdf2png ~/scans -o ~/scans-png --dpi 150

  # Encrypted input
  pdf2png --password hunter2 locked.pdf -o out

  # Machine-readable summary of what was written
  pdf2png --json --no-progress report.pdf -o out > summary.json

OUTPUT LAYOUT:
  {output}/{name}/{name}_page_{N}.png for every page N (1-based) of {name}.pdf.
  Existing files are overwritten. Two inputs with the same file name write
  into the same folder.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (file or directory)
  RUST_LOG          Log filter, e.g. RUST_LOG=pdf2png=debug
"#;

/// Render every page of one or more PDFs to PNG images.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Render every page of one or more PDFs to PNG images",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF files, or directories whose *.pdf files should be converted.
    inputs: Vec<PathBuf>,

    /// Output directory; one sub-directory is created per input PDF.
    #[arg(short, long, env = "PDF2PNG_OUTPUT")]
    output: Option<PathBuf>,

    /// Rendering DPI (72–1200).
    #[arg(long, env = "PDF2PNG_DPI", default_value_t = pdf2png::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=1200))]
    dpi: u32,

    /// PDF user password, applied to every input.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// pdfium shared library, or the directory containing it.
    #[arg(long, env = "PDF2PNG_PDFIUM_LIB")]
    pdfium_lib: Option<PathBuf>,

    /// Print the job summary as JSON on stdout.
    #[arg(long, env = "PDF2PNG_JSON")]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Library INFO logs would tear the progress bar; keep them for the
    // no-bar case and for -v.
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Validate the selection before anything starts ───────────────────
    let job = match build_job(&cli) {
        Ok(job) => job,
        Err(e) => {
            eprintln!("{} {}", yellow("⚠"), bold(&format!("{e:#}")));
            return ExitCode::from(EXIT_INVALID);
        }
    };

    match run(&cli, job, show_progress).await {
        Ok(summary) => {
            if !cli.quiet {
                eprintln!(
                    "{} PDFs have been successfully converted to images!  {}",
                    green("✔"),
                    dim(&format!(
                        "{} files, {} pages, {}ms",
                        summary.total_documents(),
                        summary.total_pages,
                        summary.duration_ms
                    )),
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} An error occurred during PDF conversion.", red("✘"));
            eprintln!("  {}", red(&format!("{e:#}")));
            ExitCode::from(EXIT_FAILED)
        }
    }
}

/// Expand directory arguments and validate the result into a job.
fn build_job(cli: &Cli) -> Result<ConversionJob> {
    let inputs = expand_inputs(cli.inputs.as_slice()).context("Failed to read input selection")?;
    let output = cli.output.clone().unwrap_or_default();
    Ok(ConversionJob::new(inputs, output)?)
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder().dpi(cli.dpi);
    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_library(lib.clone());
    }
    builder.build().context("Invalid configuration")
}

async fn run(cli: &Cli, job: ConversionJob, show_progress: bool) -> Result<JobSummary> {
    let config = build_config(cli)?;
    let converter = Converter::with_pdfium(config).context("Failed to load the PDF engine")?;

    let handle = converter.start(job).context("Failed to start conversion")?;
    let (mut events, task) = handle.into_stream();

    let bar = show_progress.then(new_bar);
    while let Some(event) = events.next().await {
        if let Some(ref bar) = bar {
            render_event(bar, &event);
        }
    }

    let summary = task
        .await
        .context("Conversion task failed")?
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?;
        println!("{json}");
    }
    Ok(summary)
}

fn new_bar() -> ProgressBar {
    let bar = ProgressBar::new(100);
    let style = ProgressStyle::with_template(
        "{spinner:.cyan} {prefix:.bold}  \
         [{bar:42.green/238}] {pos:>3}%  {msg}  ⏱ {elapsed_precise}",
    )
    .unwrap_or_else(|_| ProgressStyle::default_bar())
    .progress_chars("█▉▊▋▌▍▎▏  ")
    .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

    bar.set_style(style);
    bar.set_prefix("Converting");
    bar.enable_steady_tick(Duration::from_millis(80));
    bar
}

fn render_event(bar: &ProgressBar, event: &ConversionEvent) {
    match event {
        ConversionEvent::Started { total_files } => {
            bar.set_message(format!("{total_files} PDFs"));
        }
        ConversionEvent::FileStarted {
            index,
            total,
            path,
            page_count,
        } => {
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            bar.set_message(format!("{name} (0/{page_count})"));
            bar.println(format!(
                "  {} [{index}/{total}] {name}  {}",
                dim("→"),
                dim(&format!("{page_count} pages"))
            ));
        }
        ConversionEvent::PageWritten {
            page, page_count, ..
        } => {
            bar.set_message(format!("page {page}/{page_count}"));
        }
        ConversionEvent::Progress(pct) => bar.set_position(u64::from(*pct)),
        ConversionEvent::Completed { success } => {
            if *success {
                bar.finish_and_clear();
            } else {
                bar.abandon();
            }
        }
    }
}
