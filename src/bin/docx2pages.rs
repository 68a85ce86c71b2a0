//! CLI binary for docx-pages.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints or writes results.

use anyhow::{Context, Result};
use clap::Parser;
use docx_pages::{
    write_pages, ConversionConfig, ConversionMode, ConversionProgressCallback, ConversionResponse,
    Converter, ImageFormat, ProgressCallback, TextResponse,
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io::{self, Write};
use std::net::SocketAddr;
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
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress bar. Starts as a spinner while the document is parsed
/// and laid out, then switches to a counter once the page total is known.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Reading document…");
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
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Rendering");
    }

    fn on_page_rendered(&self, page_num: usize, total_pages: usize, bytes: usize) {
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total_pages,
            dim(&format!("{bytes:>8} bytes")),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total_pages: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} pages rendered",
            green("✔"),
            bold(&total_pages.to_string())
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Page images as JSON ({"pages": [...]}) on stdout
  docx2pages report.docx > pages.json

  # Write page-1.jpg, page-2.jpg, … into a directory
  docx2pages report.docx -o out/

  # Lossless pages with a narrower column
  docx2pages --format png --wrap-width 40 report.docx -o out/

  # Flat text only (no font needed)
  docx2pages --text report.docx

  # Convert from URL
  docx2pages https://example.com/report.docx -o out/

  # HTTP service: POST /convert, POST /convert/text, GET /health
  docx2pages --serve 0.0.0.0:8080

ENVIRONMENT VARIABLES:
  Every flag has a DOCX2PAGES_* counterpart, e.g. DOCX2PAGES_WRAP_WIDTH=40.
  RUST_LOG overrides the log filter.
"#;

/// Render Word documents as paginated page images, or extract their text.
#[derive(Parser, Debug)]
#[command(
    name = "docx2pages",
    version,
    about = "Render .docx files as paginated page images, or extract their text",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local .docx path or HTTP/HTTPS URL.
    #[arg(required_unless_present = "serve")]
    input: Option<String>,

    /// Output flat text instead of page images.
    #[arg(long, env = "DOCX2PAGES_TEXT")]
    text: bool,

    /// Write page images into this directory instead of printing JSON.
    #[arg(short, long, env = "DOCX2PAGES_OUTPUT")]
    output: Option<PathBuf>,

    /// Print the JSON response even in text mode.
    #[arg(long, env = "DOCX2PAGES_JSON")]
    json: bool,

    /// Maximum characters per wrapped line.
    #[arg(long, env = "DOCX2PAGES_WRAP_WIDTH", default_value_t = 60)]
    wrap_width: usize,

    /// Page width in pixels.
    #[arg(long, env = "DOCX2PAGES_PAGE_WIDTH", default_value_t = 1600)]
    page_width: u32,

    /// Page height in pixels.
    #[arg(long, env = "DOCX2PAGES_PAGE_HEIGHT", default_value_t = 2200)]
    page_height: u32,

    /// Left and top padding in pixels.
    #[arg(long, env = "DOCX2PAGES_PADDING", default_value_t = 80)]
    padding: u32,

    /// Vertical distance between lines in pixels.
    #[arg(long, env = "DOCX2PAGES_LINE_SPACING", default_value_t = 60)]
    line_spacing: u32,

    /// Font size in pixels.
    #[arg(long, env = "DOCX2PAGES_FONT_SIZE", default_value_t = 36.0)]
    font_size: f32,

    /// Page image format.
    #[arg(long, env = "DOCX2PAGES_FORMAT", value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// JPEG quality (1–100).
    #[arg(long, env = "DOCX2PAGES_QUALITY", default_value_t = 85,
          value_parser = clap::value_parser!(u8).range(1..=100))]
    quality: u8,

    /// TrueType/OpenType font file. Defaults to a system font.
    #[arg(long, env = "DOCX2PAGES_FONT")]
    font: Option<PathBuf>,

    /// Keep blank paragraphs as blank lines.
    #[arg(long, env = "DOCX2PAGES_KEEP_BLANK")]
    keep_blank: bool,

    /// Pages rendered at once.
    #[arg(short, long, env = "DOCX2PAGES_CONCURRENCY", default_value_t = 4)]
    concurrency: usize,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "DOCX2PAGES_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Run the HTTP service on this address instead of converting INPUT.
    #[arg(long, env = "DOCX2PAGES_SERVE", value_name = "ADDR")]
    serve: Option<SocketAddr>,

    /// Disable progress bar.
    #[arg(long, env = "DOCX2PAGES_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "DOCX2PAGES_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "DOCX2PAGES_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for ImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Jpeg => ImageFormat::Jpeg,
            FormatArg::Png => ImageFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Quiet library logs while the progress bar owns the terminal.
    let show_progress =
        !cli.quiet && !cli.no_progress && !cli.text && cli.output.is_some() && cli.serve.is_none();
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

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let config = build_config(&cli, progress_cb)?;

    // ── Server mode ──────────────────────────────────────────────────────
    if let Some(addr) = cli.serve {
        let converter = Converter::from_config(config).context("Failed to load font")?;
        docx_pages::server::serve(addr, Arc::new(converter))
            .await
            .context("Server failed")?;
        return Ok(());
    }

    let input = cli
        .input
        .as_deref()
        .context("INPUT is required unless --serve is given")?;

    // ── Text mode ────────────────────────────────────────────────────────
    // No glyphs are drawn, so no font is loaded.
    if cli.text {
        let bytes = docx_pages::pipeline::input::resolve_input(input, cli.download_timeout)
            .await
            .context("Failed to read input")?;
        let text = docx_pages::text_from_bytes(bytes)
            .await
            .context("Conversion failed")?;

        if cli.json {
            let json = serde_json::to_string_pretty(&TextResponse::new(text))
                .context("Failed to serialise output")?;
            println!("{json}");
        } else {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(text.as_bytes())
                .context("Failed to write to stdout")?;
            if !text.ends_with('\n') {
                handle.write_all(b"\n").ok();
            }
        }
        return Ok(());
    }

    // ── Image mode ───────────────────────────────────────────────────────
    let converter = Converter::from_config(config).context("Failed to load font")?;

    if let Some(ref dir) = cli.output {
        let bytes = docx_pages::pipeline::input::resolve_input(input, cli.download_timeout)
            .await
            .context("Failed to read input")?;
        let output = converter
            .convert_pages(bytes)
            .await
            .context("Conversion failed")?;
        let written = write_pages(&output, dir)
            .await
            .with_context(|| format!("Failed to write pages to {}", dir.display()))?;

        if !cli.quiet {
            eprintln!(
                "{}  {} pages  {} lines  {}ms  →  {}",
                green("✔"),
                written.len(),
                output.stats.wrapped_lines,
                output.stats.total_duration_ms,
                bold(&dir.display().to_string()),
            );
        }
    } else {
        let response = converter
            .convert_input(input, ConversionMode::Images)
            .await
            .context("Conversion failed")?;
        let pages = match &response {
            ConversionResponse::Pages(p) => p.pages.len(),
            ConversionResponse::Text(_) => 0,
        };
        let json = serde_json::to_string_pretty(&response).context("Failed to serialise output")?;
        println!("{json}");

        if !cli.quiet {
            eprintln!("Rendered {} pages", pages);
        }
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, progress: Option<ProgressCallback>) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .wrap_width(cli.wrap_width)
        .page_size(cli.page_width, cli.page_height)
        .padding(cli.padding)
        .line_spacing(cli.line_spacing)
        .font_size(cli.font_size)
        .image_format(cli.format.into())
        .jpeg_quality(cli.quality)
        .keep_blank_paragraphs(cli.keep_blank)
        .render_concurrency(cli.concurrency)
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref path) = cli.font {
        builder = builder.font_path(path);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}
