//! CLI binary for pdf2mp3.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ConversionConfig`, prompts interactively for a document path when none
//! is given, and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2mp3::pipeline::input::resolve_document;
use pdf2mp3::{convert, inspect, AudioEncoding, ConversionConfig};
use std::io::{self, BufRead, Write};
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

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert a whole document; audio lands next to it as document.mp3
  pdf2mp3 document.pdf

  # Prompt interactively for the path (re-prompts on invalid input)
  pdf2mp3

  # Convert selected pages with a different voice
  pdf2mp3 --pages 1,2,5 --voice en-GB-Standard-A report.pdf

  # Faster speech, uncompressed output
  pdf2mp3 --rate 1.25 --encoding linear16 notes.pdf

  # Inspect page count and metadata (no cloud access needed)
  pdf2mp3 --inspect-only thesis.pdf

VOICE SELECTION:
  The voice catalogue is service-side; any (language, voice) pair the API
  supports can be passed through --language / --voice.
  Catalogue: https://cloud.google.com/text-to-speech/docs/voices

ENVIRONMENT VARIABLES:
  GOOGLE_ACCESS_TOKEN     OAuth2 bearer token for the speech/storage APIs
  GOOGLE_PROJECT_ID       Cloud project (same as --project)
  PDF2MP3_BUCKET          Storage bucket (same as --bucket)
  PDF2MP3_LANGUAGE        Default language code
  PDF2MP3_VOICE           Default voice name

SETUP:
  1. Enable the Text-to-Speech API and create a storage bucket.
  2. export GOOGLE_ACCESS_TOKEN=$(gcloud auth print-access-token)
  3. pdf2mp3 document.pdf --project my-project --bucket my-bucket

  Documents are capped at 5 MiB; the synthesised audio is written to the
  bucket by the service and downloaded next to the source PDF.
"#;

/// Convert PDF documents to MP3 audio via cloud text-to-speech.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2mp3",
    version,
    about = "Convert PDF documents to MP3 audio via Google Cloud Text-to-Speech",
    long_about = "Extract the text of a PDF document (optionally selected pages) and convert \
it to an audio file using the Google Cloud Text-to-Speech long-audio API. The audio is \
synthesised into a Cloud Storage bucket and downloaded next to the source document.",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Path to the source PDF. Prompted for interactively when omitted.
    input: Option<String>,

    /// Pages to convert: "all", a single page, a range "2-5", or a list "1,3,5".
    #[arg(long, env = "PDF2MP3_PAGES", default_value = "all")]
    pages: String,

    /// BCP-47 language code of the synthesis voice.
    #[arg(long, env = "PDF2MP3_LANGUAGE", default_value = "en-GB")]
    language: String,

    /// Voice name within the language.
    #[arg(long, env = "PDF2MP3_VOICE", default_value = "en-GB-Standard-B")]
    voice: String,

    /// Speaking rate multiplier (0.25–4.0).
    #[arg(long, env = "PDF2MP3_RATE", default_value_t = 1.0)]
    rate: f64,

    /// Pitch adjustment in semitones (−20.0–20.0).
    #[arg(long, env = "PDF2MP3_PITCH", default_value_t = 0.0, allow_hyphen_values = true)]
    pitch: f64,

    /// Audio encoding of the output artifact.
    #[arg(long, env = "PDF2MP3_ENCODING", value_enum, default_value = "mp3")]
    encoding: EncodingArg,

    /// Google Cloud project that owns the Text-to-Speech quota.
    #[arg(long, env = "GOOGLE_PROJECT_ID")]
    project: Option<String>,

    /// Service location for the synthesis request parent.
    #[arg(long, env = "PDF2MP3_LOCATION", default_value = "global")]
    location: String,

    /// Cloud Storage bucket the service writes the audio into.
    #[arg(long, env = "PDF2MP3_BUCKET")]
    bucket: Option<String>,

    /// Deadline for the remote synthesis operation in seconds.
    #[arg(long, env = "PDF2MP3_SYNTHESIS_TIMEOUT", default_value_t = 300)]
    synthesis_timeout: u64,

    /// Timeout for downloading the synthesised object in seconds.
    #[arg(long, env = "PDF2MP3_DOWNLOAD_TIMEOUT", default_value_t = 120)]
    download_timeout: u64,

    /// Attempts allowed when prompting interactively for a valid path.
    #[arg(long, default_value_t = 3)]
    max_attempts: u32,

    /// Print document metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Disable the progress spinner.
    #[arg(long, env = "PDF2MP3_NO_PROGRESS")]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2MP3_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2MP3_QUIET")]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum EncodingArg {
    Mp3,
    Linear16,
    OggOpus,
}

impl From<EncodingArg> for AudioEncoding {
    fn from(v: EncodingArg) -> Self {
        match v {
            EncodingArg::Mp3 => AudioEncoding::Mp3,
            EncodingArg::Linear16 => AudioEncoding::Linear16,
            EncodingArg::OggOpus => AudioEncoding::OggOpus,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // Dropped-page notices are emitted at WARN, so even with the spinner
    // active the filter stays at "warn" rather than "error".
    let show_progress = !cli.quiet && !cli.no_progress;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else if show_progress {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    let encoding: AudioEncoding = cli.encoding.clone().into();

    // ── Resolve the source path ──────────────────────────────────────────
    // A path given on the command line fails fast (scriptable); the
    // interactive prompt re-asks on invalid input, bounded by
    // --max-attempts so persistent bad input terminates instead of
    // looping forever.
    let input = match cli.input.clone() {
        Some(path) => path,
        None => prompt_for_document(cli.max_attempts, encoding.extension())?,
    };

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect(&input).await.context("Failed to inspect PDF")?;
        println!("File:    {}", input);
        if let Some(ref t) = meta.title {
            println!("Title:   {}", t);
        }
        if let Some(ref a) = meta.author {
            println!("Author:  {}", a);
        }
        println!("Pages:   {}", meta.page_count);
        println!("Size:    {} bytes", meta.file_size_bytes);
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let config = build_config(&cli, encoding)?;

    // ── Run conversion ───────────────────────────────────────────────────
    let spinner = if show_progress {
        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]),
        );
        bar.set_message("Synthesising… this can take a few minutes for long documents");
        bar.enable_steady_tick(Duration::from_millis(80));
        Some(bar)
    } else {
        None
    };

    let result = convert(&input, &config).await;

    if let Some(bar) = spinner {
        bar.finish_and_clear();
    }

    let output = result.context("Conversion failed")?;

    if !cli.quiet {
        eprintln!(
            "{} {}  {}",
            green("✔"),
            bold(&output.audio_path.display().to_string()),
            dim(&format!("{} bytes", output.audio_bytes)),
        );
        eprintln!(
            "   {}/{} pages  {} chars  {}ms total {}",
            output.stats.selected_pages,
            output.stats.total_pages,
            output.stats.extracted_chars,
            output.stats.total_duration_ms,
            dim(&format!(
                "(synthesis {}ms, download {}ms)",
                output.stats.synthesis_duration_ms, output.stats.download_duration_ms
            )),
        );
    }

    Ok(())
}

/// Ask for a document path on stdin, re-prompting on invalid input.
///
/// An explicit bounded loop: persistent invalid input exhausts
/// `max_attempts` and terminates with an error instead of recursing.
fn prompt_for_document(max_attempts: u32, audio_extension: &str) -> Result<String> {
    let stdin = io::stdin();
    for attempt in 1..=max_attempts {
        eprint!("Please enter the file path of the PDF: ");
        io::stderr().flush().ok();

        let mut line = String::new();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("Failed to read from stdin")?;
        if read == 0 {
            anyhow::bail!("stdin closed before a valid document path was provided");
        }

        let candidate = line.trim();
        if candidate.is_empty() {
            continue;
        }

        match resolve_document(candidate, audio_extension) {
            Ok(_) => return Ok(candidate.to_string()),
            Err(e) => {
                eprintln!("{} {}", red("✗"), e);
                if attempt < max_attempts {
                    eprintln!("{}", dim("Please try again."));
                }
            }
        }
    }
    anyhow::bail!("No valid document path after {max_attempts} attempts")
}

/// Map CLI args to `ConversionConfig`.
fn build_config(cli: &Cli, encoding: AudioEncoding) -> Result<ConversionConfig> {
    let pages = parse_pages(&cli.pages)?;

    let mut builder = ConversionConfig::builder()
        .language_code(cli.language.clone())
        .voice_name(cli.voice.clone())
        .speaking_rate(cli.rate)
        .pitch(cli.pitch)
        .audio_encoding(encoding)
        .location(cli.location.clone())
        .synthesis_timeout_secs(cli.synthesis_timeout)
        .download_timeout_secs(cli.download_timeout)
        .pages(pages);

    if let Some(ref project) = cli.project {
        builder = builder.project_id(project.clone());
    }
    if let Some(ref bucket) = cli.bucket {
        builder = builder.bucket(bucket.clone());
    }

    builder.build().context("Invalid configuration")
}

/// Parse `--pages` into an explicit 1-indexed page list; empty = all.
fn parse_pages(s: &str) -> Result<Vec<u32>> {
    let s = s.trim().to_lowercase();

    if s == "all" || s.is_empty() {
        return Ok(Vec::new());
    }

    // Range: "2-5"
    if let Some((start, end)) = s.split_once('-') {
        let start: u32 = start.trim().parse().context("Invalid start page in range")?;
        let end: u32 = end.trim().parse().context("Invalid end page in range")?;
        if start < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {start})");
        }
        if start > end {
            anyhow::bail!("Invalid page range '{start}-{end}': start must be <= end");
        }
        return Ok((start..=end).collect());
    }

    // List: "1,3,5" (a single page is a one-element list)
    let pages: Vec<u32> = s
        .split(',')
        .map(|p| {
            p.trim()
                .parse::<u32>()
                .with_context(|| format!("Invalid page number: '{}'", p.trim()))
        })
        .collect::<Result<Vec<_>>>()?;

    for &p in &pages {
        if p < 1 {
            anyhow::bail!("Pages are 1-indexed, minimum is 1 (got {p})");
        }
    }

    Ok(pages)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_pages_all_and_empty() {
        assert!(parse_pages("all").unwrap().is_empty());
        assert!(parse_pages("  ALL ").unwrap().is_empty());
        assert!(parse_pages("").unwrap().is_empty());
    }

    #[test]
    fn parse_pages_single_and_list() {
        assert_eq!(parse_pages("4").unwrap(), vec![4]);
        assert_eq!(parse_pages("1,3,5").unwrap(), vec![1, 3, 5]);
    }

    #[test]
    fn parse_pages_range() {
        assert_eq!(parse_pages("2-5").unwrap(), vec![2, 3, 4, 5]);
    }

    #[test]
    fn parse_pages_rejects_garbage() {
        assert!(parse_pages("x").is_err());
        assert!(parse_pages("5-2").is_err());
        assert!(parse_pages("0").is_err());
    }
}
