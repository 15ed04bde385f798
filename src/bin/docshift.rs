//! CLI binary for docshift.
//!
//! A thin shim over the library crate: collects input files, maps flags to
//! `ConversionConfig`, runs the batch driver and prints the summary.

use anyhow::{Context, Result};
use clap::Parser;
use docshift::pipeline::input::collect_inputs;
use docshift::{
    convert_batch, format, BatchReport, ConversionConfig, ConversionProgressCallback, Engine,
    ProgressCallback, SvgWriteFailure, UnknownFormatPolicy,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::warn;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: one bar tick per file, one log line per file.
/// Works when files complete out of order (`--concurrency > 1`).
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} files  \
             ⏱ {elapsed_precise}  ETA {eta_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(style);
        bar.set_prefix("Converting");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_batch_start(&self, total_files: usize) {
        self.bar.set_length(total_files as u64);
        self.bar.reset_eta();
    }

    fn on_file_complete(&self, index: usize, total: usize, artifacts: usize) {
        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}",
            green("✓"),
            index + 1,
            total,
            dim(&format!("{artifacts} artifact(s)")),
        ));
        self.bar.inc(1);
    }

    fn on_file_error(&self, index: usize, total: usize, error: &str) {
        // Truncate very long error messages to keep output tidy.
        let msg = match error.char_indices().nth(100) {
            Some((cut, _)) => format!("{}\u{2026}", &error[..cut]),
            None => error.to_string(),
        };

        self.bar.println(format!(
            "  {} File {:>3}/{:<3}  {}",
            red("✗"),
            index + 1,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_batch_complete(&self, _report: &BatchReport) {
        self.bar.finish_and_clear();
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Every page of a PDF as PNG
  docshift scan.pdf --to PNG --out-dir pages/

  # A folder of images to WebP, four at a time
  docshift photos/ --to WEBP --out-dir webp/ --concurrency 4

  # Logo to SVG with the white background keyed out
  docshift logo.png --to SVG --out-dir out/

  # Refuse unknown format names instead of writing JPEG
  docshift a.png --to JPEG-XL --out-dir out/ --strict-format

  # Machine-readable report
  docshift inputs/ --to PDF --out-dir out/ --json > report.json

FORMAT RULES:
  Images and PDFs convert to image formats (and PDF); documents
  (.doc .docx .xls .xlsx .csv) only to EXCEL, WORD or CSV, copied byte for byte.
  Unknown format names produce JPEG unless --strict-format is given.

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium (file or directory)
  RUST_LOG          Override the log filter (e.g. docshift=debug)
"#;

/// Convert images, PDFs and documents to another format.
#[derive(Parser, Debug)]
#[command(
    name = "docshift",
    version,
    about = "Convert images, PDFs and documents to another format",
    long_about = "Convert raster images, PDFs and office documents into a chosen output format. \
PDF pages are rasterised individually; a failing page is skipped without aborting the rest.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Input files or directories (directories are not searched recursively).
    #[arg(required_unless_present = "list_formats")]
    inputs: Vec<PathBuf>,

    /// Target format name (see --list-formats).
    #[arg(short, long, env = "DOCSHIFT_FORMAT", required_unless_present = "list_formats")]
    to: Option<String>,

    /// Existing directory to write artifacts into.
    #[arg(short, long, env = "DOCSHIFT_OUT_DIR", required_unless_present = "list_formats")]
    out_dir: Option<PathBuf>,

    /// Number of files converted at once.
    #[arg(short, long, env = "DOCSHIFT_CONCURRENCY", default_value_t = 1)]
    concurrency: usize,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "DOCSHIFT_PASSWORD")]
    password: Option<String>,

    /// Fail files whose format name is not registered instead of writing JPEG.
    #[arg(long, env = "DOCSHIFT_STRICT_FORMAT")]
    strict_format: bool,

    /// Fail when an SVG cannot be written instead of logging and continuing.
    #[arg(long, env = "DOCSHIFT_STRICT_SVG")]
    strict_svg: bool,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "DOCSHIFT_JSON")]
    json: bool,

    /// List registered format names and exit.
    #[arg(long)]
    list_formats: bool,

    /// Disable progress bar.
    #[arg(long, env = "DOCSHIFT_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCSHIFT_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCSHIFT_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar provides the per-file feedback, so library INFO logs
    // are suppressed while it is active.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.json;
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

    // ── List formats ─────────────────────────────────────────────────────
    if cli.list_formats {
        for spec in format::FORMATS {
            println!("{:<10} {:<6} {}", spec.name, spec.extension, spec.encoder.id());
        }
        return Ok(());
    }

    let format_name = cli.to.clone().context("--to is required")?;
    let out_dir = cli.out_dir.clone().context("--out-dir is required")?;
    if !out_dir.is_dir() {
        anyhow::bail!("Output directory {} does not exist", out_dir.display());
    }

    // ── Collect inputs ───────────────────────────────────────────────────
    let collected = collect_inputs(&cli.inputs);
    for skipped in &collected.skipped {
        warn!("Skipping unsupported input {}", skipped.display());
        if !cli.quiet && !cli.json {
            eprintln!("{} skipping {}", cyan("⚠"), skipped.display());
        }
    }
    if collected.files.is_empty() {
        anyhow::bail!("No supported input files");
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let engine = Engine::new(config);
    let report = convert_batch(&engine, &collected.files, &out_dir, &format_name).await;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else if !cli.quiet {
        print_summary(&report, &out_dir);
    }

    if report.has_failures() {
        std::process::exit(1);
    }
    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .concurrency(cli.concurrency)
        .unknown_format(if cli.strict_format {
            UnknownFormatPolicy::Reject
        } else {
            UnknownFormatPolicy::FallbackToJpeg
        })
        .svg_write_failure(if cli.strict_svg {
            SvgWriteFailure::Propagate
        } else {
            SvgWriteFailure::LogAndContinue
        });

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

fn print_summary(report: &BatchReport, out_dir: &std::path::Path) {
    let ok = report.total_files - report.failed_files;
    eprintln!(
        "{}  {}/{} files  {} artifact(s)  {}ms  →  {}",
        if report.failed_files == 0 {
            green("✔")
        } else if ok == 0 {
            red("✘")
        } else {
            cyan("⚠")
        },
        ok,
        report.total_files,
        bold(&report.total_artifacts.to_string()),
        report.duration_ms,
        bold(&out_dir.display().to_string()),
    );

    let skipped_pages: usize = report
        .outcomes
        .iter()
        .filter_map(|o| o.output.as_ref())
        .map(|o| o.page_failures.len())
        .sum();
    if skipped_pages > 0 {
        eprintln!("   {} PDF page(s) skipped", red(&skipped_pages.to_string()));
    }

    for e in &report.errors {
        eprintln!("   {} {}", red("✗"), e);
    }
}
