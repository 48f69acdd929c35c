//! CLI binary for pdf2csv.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ExtractionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2csv::{
    extract_to_csv, inspect, CsvOutcome, DetectionStrategy, ExtractionConfig,
    ExtractionProgressCallback, PageErrorPolicy, PageSelection, ProgressCallback,
    StrategySettings,
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

/// Terminal progress callback: a single bar advanced once per page.
/// Pages are processed strictly in order, so no out-of-order bookkeeping is
/// needed.
struct CliProgressCallback {
    bar: ProgressBar,
}

impl CliProgressCallback {
    fn new() -> Arc<Self> {
        let bar = ProgressBar::new(0); // length set in on_start

        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self { bar })
    }
}

impl ExtractionProgressCallback for CliProgressCallback {
    fn on_start(&self, total_pages: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  [{bar:42.green/238}] {pos:>3}/{len} pages",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ");

        self.bar.set_length(total_pages as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Scanning");
    }

    fn on_page(&self, page_num: usize, total: usize, tables: usize, rows: usize) {
        if tables > 0 {
            self.bar.println(format!(
                "  {} Page {:>3}/{:<3}  {}",
                green("✓"),
                page_num,
                total,
                dim(&format!("{tables} table(s), {rows} row(s)")),
            ));
        }
        self.bar.inc(1);
    }

    fn on_page_error(&self, page_num: usize, total: usize, error: &str) {
        let msg = truncate_error(error);
        self.bar.println(format!(
            "  {} Page {:>3}/{:<3}  {}",
            red("✗"),
            page_num,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_complete(&self, _processed: usize, _rows: usize) {
        self.bar.finish_and_clear();
    }
}

/// Truncate very long error messages to keep output tidy.
///
/// Cuts on a character boundary; engine errors can embed non-ASCII paths and
/// typographic quotes, so a byte-offset slice is not safe here.
fn truncate_error(error: &str) -> String {
    if error.len() <= 80 {
        return error.to_string();
    }
    let cut: String = error
        .char_indices()
        .take_while(|(i, _)| *i < 79)
        .map(|(_, c)| c)
        .collect();
    format!("{cut}\u{2026}")
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Extract all tables to <stem>_extracted_tables.csv
  pdf2csv document.pdf

  # Explicit output path
  pdf2csv document.pdf tables.csv

  # Only the first five pages
  pdf2csv --pages 1-5 report.pdf

  # Text-alignment detection (tables without ruling lines)
  pdf2csv --vertical-strategy text --horizontal-strategy text scan.pdf

  # Extract from a URL
  pdf2csv https://example.org/api/reports/certificate.pdf

  # Keep going when a page fails
  pdf2csv --skip-failed-pages damaged.pdf

  # Page count only
  pdf2csv --inspect-only document.pdf

DETECTION STRATEGIES:
  lines     cell boundaries from ruling lines drawn on the page (default)
  text      boundaries inferred from text alignment patterns
  explicit  caller-supplied coordinates (library use only)

  Detection itself is delegated to the pdfplumber engine; pdf2csv only
  forwards the strategy choice.

OUTPUT FORMAT:
  UTF-8 CSV with header Page,Table,Column1..ColumnN (N ≥ 5). Every data row
  carries its 1-based page and table number; rows keep their source arity and
  may be wider or narrower than the header. When no tables are found, no file
  is written and a notice is printed instead.
"#;

/// Extract tables from PDF files and URLs to CSV.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2csv",
    version,
    about = "Extract tables from PDF files and URLs to CSV",
    long_about = "Extract tabular data from PDF documents (local files or HTTP/HTTPS URLs) and \
write it to a CSV file with page/table index prefixes and Unicode-normalised cells. \
Table detection is delegated to the pdfplumber engine.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path or HTTP/HTTPS URL.
    input: String,

    /// Output CSV path. Default: <stem>_extracted_tables[_<range>].csv.
    output: Option<PathBuf>,

    /// Page selection: all, 5, 3-15, or 1,3,5,7.
    #[arg(long, env = "PDF2CSV_PAGES", default_value = "all")]
    pages: String,

    /// Vertical (column) boundary strategy.
    #[arg(long, env = "PDF2CSV_VERTICAL_STRATEGY", value_enum, default_value = "lines")]
    vertical_strategy: StrategyArg,

    /// Horizontal (row) boundary strategy.
    #[arg(long, env = "PDF2CSV_HORIZONTAL_STRATEGY", value_enum, default_value = "lines")]
    horizontal_strategy: StrategyArg,

    /// Disable Unicode cell normalisation (category-C strip + NFC).
    #[arg(long, env = "PDF2CSV_NO_NORMALIZE")]
    no_normalize: bool,

    /// Skip pages where detection fails instead of aborting the run.
    #[arg(long, env = "PDF2CSV_SKIP_FAILED_PAGES")]
    skip_failed_pages: bool,

    /// PDF user password (rejected: the detection engine cannot decrypt).
    #[arg(long, env = "PDF2CSV_PASSWORD")]
    password: Option<String>,

    /// HTTP download timeout in seconds.
    #[arg(long, env = "PDF2CSV_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Print page count only, no extraction.
    #[arg(long)]
    inspect_only: bool,

    /// Print run statistics as JSON to stdout.
    #[arg(long, env = "PDF2CSV_JSON")]
    json: bool,

    /// Disable the progress bar.
    #[arg(long, env = "PDF2CSV_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CSV_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2CSV_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum StrategyArg {
    Lines,
    Text,
    Explicit,
}

impl From<StrategyArg> for DetectionStrategy {
    fn from(v: StrategyArg) -> Self {
        match v {
            StrategyArg::Lines => DetectionStrategy::Lines,
            StrategyArg::Text => DetectionStrategy::Text,
            StrategyArg::Explicit => DetectionStrategy::Explicit,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Suppress INFO-level library logs when the progress bar is active;
    // the bar provides all the feedback that matters to the user.
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

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let info = inspect(&cli.input).await.context("Failed to inspect PDF")?;
        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&info).context("Failed to serialise info")?
            );
        } else {
            println!("File:   {}", cli.input);
            println!("Pages:  {}", info.page_count);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, show_progress)?;

    // ── Run extraction ───────────────────────────────────────────────────
    let (stats, outcome) = extract_to_csv(&cli.input, cli.output.as_deref(), &config)
        .await
        .context("Extraction failed")?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "stats": stats,
                "outcome": outcome,
            }))
            .context("Failed to serialise stats")?
        );
        return Ok(());
    }

    match outcome {
        CsvOutcome::Written(path) => {
            if !cli.quiet {
                eprintln!(
                    "{}  {} rows from {} table(s) across {} page(s)  {}  →  {}",
                    green("✔"),
                    bold(&stats.rows_extracted.to_string()),
                    stats.tables_found,
                    stats.processed_pages,
                    dim(&format!("{}ms", stats.total_duration_ms)),
                    bold(&path.display().to_string()),
                );
                if stats.failed_pages > 0 {
                    eprintln!(
                        "   {} {} page(s) skipped after detection errors",
                        cyan("⚠"),
                        stats.failed_pages
                    );
                }
            }
        }
        CsvOutcome::NoTables => {
            // Deliberately a notice, not an error: an empty CSV would be
            // indistinguishable from a successful-but-empty result.
            eprintln!("No tables found in {}", cli.input);
        }
    }

    Ok(())
}

/// Map CLI args to `ExtractionConfig`.
fn build_config(cli: &Cli, show_progress: bool) -> Result<ExtractionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let strategy = StrategySettings {
        vertical: cli.vertical_strategy.clone().into(),
        horizontal: cli.horizontal_strategy.clone().into(),
        explicit_lines: None,
    };

    let mut builder = ExtractionConfig::builder()
        .pages(pages)
        .strategy(strategy)
        .normalize(!cli.no_normalize)
        .page_error_policy(if cli.skip_failed_pages {
            PageErrorPolicy::Skip
        } else {
            PageErrorPolicy::Abort
        })
        .download_timeout_secs(cli.download_timeout);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd.clone());
    }
    if show_progress {
        let cb: ProgressCallback = CliProgressCallback::new();
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` string into `PageSelection`.
fn parse_pages(s: &str) -> Result<PageSelection> {
    let s = s.trim().to_lowercase();

    if s == "all" {
        return Ok(PageSelection::All);
    }

    // Range: "3-15"
    if let Some((start, end)) = s.split_once('-') {
        let start: usize = start.trim().parse().context("Invalid start page in range")?;
        let end: usize = end.trim().parse().context("Invalid end page in range")?;

        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", start);
        }
        if start > end {
            anyhow::bail!("Invalid page range '{}-{}': start must be <= end", start, end);
        }

        return Ok(PageSelection::Range(start, end));
    }

    // Set: "1,3,5,7"
    if s.contains(',') {
        let pages: Vec<usize> = s
            .split(',')
            .map(|p| {
                p.trim()
                    .parse::<usize>()
                    .context(format!("Invalid page number: '{}'", p.trim()))
            })
            .collect::<Result<Vec<_>>>()?;

        for &p in &pages {
            if p < 1 {
                anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", p);
            }
        }

        return Ok(PageSelection::Set(pages));
    }

    // Single page: "5"
    let page: usize = s.parse().context("Invalid page number")?;
    if page < 1 {
        anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {})", page);
    }

    Ok(PageSelection::Single(page))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_variants() {
        assert_eq!(parse_pages("all").unwrap(), PageSelection::All);
        assert_eq!(parse_pages("5").unwrap(), PageSelection::Single(5));
        assert_eq!(parse_pages("1-5").unwrap(), PageSelection::Range(1, 5));
        assert_eq!(
            parse_pages("1,3,5").unwrap(),
            PageSelection::Set(vec![1, 3, 5])
        );
    }

    #[test]
    fn parse_pages_rejects_zero_and_inverted() {
        assert!(parse_pages("0").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("0-3").is_err());
    }

    #[test]
    fn short_error_messages_pass_through() {
        assert_eq!(truncate_error("plain error"), "plain error");
    }

    #[test]
    fn long_error_truncates_on_char_boundary() {
        // A multibyte character straddling the cut point must not panic.
        let msg = format!("{}é{}", "x".repeat(78), "x".repeat(10));
        let out = truncate_error(&msg);
        assert!(out.ends_with('\u{2026}'));
        assert!(out.starts_with(&"x".repeat(78)));
        assert!(out.chars().count() <= 81);
    }
}
