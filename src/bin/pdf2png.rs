//! CLI binary for pdf2png.
//!
//! A thin shim over the library crate. Settings come from the environment
//! (every flag has an `env` fallback), are read once here, and are passed to
//! the library as a `ConversionConfig` plus a workspace handle. The result is
//! printed to stdout as `{"images": [...]}`; logs and progress go to stderr.

use anyhow::{bail, Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2png::{
    convert, ConversionConfig, ConversionProgressCallback, HttpWorkspace, LocalWorkspace,
    ProgressCallback, WorkspaceStore,
};
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Progress bar on stderr, one tick per page written.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    /// Spinner until the page count is known.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);

        bar.set_style(spinner_style);
        bar.set_prefix("Rendering");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len} pages  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Writing");
    }

    fn on_page_written(&self, _idx: usize, _total: usize, file_name: &str, png_bytes: usize) {
        self.bar.println(format!(
            "  {} {}  {}",
            green("✓"),
            file_name,
            dim(&format!("{:.1} KiB", png_bytes as f64 / 1024.0)),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!("{} {} pages written", green("✔"), total_pages);
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Host-provided workspace (settings from the environment)
  GPTSCRIPT_WORKSPACE_DIR=/run/ws PDF_FILE=report.pdf \
  GPTSCRIPT_URL=http://127.0.0.1:9090 GPTSCRIPT_WORKSPACE_ID=ws-123 pdf2png

  # Local directory as the workspace (reads ./ws/files/report.pdf)
  pdf2png --workspace-dir ./ws --local-workspace ./ws --pdf-file report.pdf

  # Lower resolution, two writes in flight
  pdf2png --dpi 150 --write-concurrency 2

OUTPUT:
  {"images": ["report_page_0.png", "report_page_1.png"]}

ENVIRONMENT VARIABLES:
  GPTSCRIPT_WORKSPACE_DIR    Local workspace root; scratch/ is created inside (required)
  PDF_FILE                   Workspace path of the PDF to convert (required)
  GPTSCRIPT_URL              Workspace API base URL
  GPTSCRIPT_WORKSPACE_ID     Workspace id sent with every request
  PDF2PNG_LOCAL_WORKSPACE    Use this directory as the workspace instead of the API
  PDF2PNG_DPI                Rendering DPI, 72–600 (default 300)
  PDF2PNG_PASSWORD           Password for encrypted PDFs
  PDF2PNG_WRITE_CONCURRENCY  Page writes in flight (default 1)
  PDF2PNG_PRETTY             Pretty-print the JSON result
  PDFIUM_LIB_PATH            Path to libpdfium; defaults to the system library
  RUST_LOG                   Log filter, overrides --verbose / --quiet
"#;

/// Rasterise a workspace PDF into one PNG per page.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2png",
    version,
    about = "Rasterise a workspace PDF into one PNG per page",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local workspace root; the scratch directory is created inside it.
    #[arg(long, env = "GPTSCRIPT_WORKSPACE_DIR")]
    workspace_dir: PathBuf,

    /// Workspace path of the PDF to convert.
    #[arg(long, env = "PDF_FILE")]
    pdf_file: String,

    /// Workspace API base URL.
    #[arg(long, env = "GPTSCRIPT_URL")]
    workspace_url: Option<String>,

    /// Workspace id sent with every API request.
    #[arg(long, env = "GPTSCRIPT_WORKSPACE_ID")]
    workspace_id: Option<String>,

    /// Use a local directory as the workspace instead of the API.
    /// Takes priority over --workspace-url.
    #[arg(long, env = "PDF2PNG_LOCAL_WORKSPACE")]
    local_workspace: Option<PathBuf>,

    /// Rendering DPI (72–600).
    #[arg(long, env = "PDF2PNG_DPI", default_value_t = pdf2png::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(72..=600))]
    dpi: u32,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PNG_PASSWORD")]
    password: Option<String>,

    /// Page writes allowed in flight at once.
    #[arg(long, env = "PDF2PNG_WRITE_CONCURRENCY", default_value_t = 1)]
    write_concurrency: usize,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib_path: Option<PathBuf>,

    /// Pretty-print the JSON result.
    #[arg(long, env = "PDF2PNG_PRETTY")]
    pretty: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2PNG_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PNG_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result.
    #[arg(short, long, env = "PDF2PNG_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO-level logs; --verbose brings them back.
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

    // ── Workspace + config ───────────────────────────────────────────────
    let store = open_workspace(&cli)?;

    let progress_cb: Option<ProgressCallback> = if show_progress {
        Some(CliProgressCallback::new_dynamic() as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };
    let config = build_config(&cli, progress_cb)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let output = convert(&*store, &config)
        .await
        .with_context(|| format!("Failed to convert '{}'", cli.pdf_file))?;

    let json = if cli.pretty {
        serde_json::to_string_pretty(&output)
    } else {
        serde_json::to_string(&output)
    }
    .context("Failed to serialise output")?;
    println!("{json}");

    Ok(())
}

/// Pick the workspace backend: a local directory when asked for, else the API.
/// The local directory wins even when the API settings are present.
fn open_workspace(cli: &Cli) -> Result<Box<dyn WorkspaceStore>> {
    if let Some(ref root) = cli.local_workspace {
        return Ok(Box::new(LocalWorkspace::new(root)));
    }

    let Some(ref url) = cli.workspace_url else {
        bail!(
            "No workspace configured.\n\
             Set GPTSCRIPT_URL (and GPTSCRIPT_WORKSPACE_ID), or PDF2PNG_LOCAL_WORKSPACE."
        );
    };
    let id = cli.workspace_id.clone().unwrap_or_default();

    let store = HttpWorkspace::new(url, id).context("Invalid workspace settings")?;
    Ok(Box::new(store))
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .workspace_dir(&cli.workspace_dir)
        .input_file(&cli.pdf_file)
        .dpi(cli.dpi)
        .write_concurrency(cli.write_concurrency);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref path) = cli.pdfium_lib_path {
        builder = builder.pdfium_lib_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
