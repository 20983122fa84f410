//! pdf-extract: thin demonstration CLI over `pdf-core`'s render driver.
//!
//! Opens a PDF file, walks its page tree, and prints the Unicode text each
//! page's content stream resolves to. Not a supported interface in its own
//! right (spec §6.4): file-open glue and argument parsing live here so
//! `pdf-core` itself stays a pure library.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pdf_core::{DefaultExtractor, Document, DocumentConfig, RenderEvent};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "pdf-extract")]
#[command(author, version, about = "Extract positioned text from a PDF", long_about = None)]
struct Args {
    /// Input PDF file
    #[arg(required = true)]
    input: PathBuf,

    /// Optional TOML config file overriding `DocumentConfig` defaults
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Treat unsupported graphics-state features and missing glyphs as hard
    /// errors instead of per-page recoverable faults
    #[arg(long)]
    strict: bool,

    /// Verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn load_config(args: &Args) -> Result<DocumentConfig> {
    let mut config = if let Some(path) = &args.config {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str(&text).context("config file does not match DocumentConfig shape")?
    } else {
        DocumentConfig::default()
    };

    if args.strict {
        config.strict = true;
    }
    Ok(config)
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = match args.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .init();

    let config = load_config(&args)?;

    info!("loading PDF: {}", args.input.display());
    let bytes = std::fs::read(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;
    let doc = Document::open(bytes, config)
        .with_context(|| format!("failed to open {}", args.input.display()))?;

    let mut page_num = 0usize;
    let mut extractor = DefaultExtractor::new();
    doc.render_document(|_, event, _| {
        match &event {
            RenderEvent::PageStart => {
                page_num += 1;
                info!("page {page_num}");
            }
            RenderEvent::PageEnd => {
                let line = extractor.take_page();
                // CLI output is intentional.
                #[allow(clippy::print_stdout)]
                {
                    println!("{line}");
                }
            }
            RenderEvent::PageException { message } => {
                // CLI output is intentional.
                #[allow(clippy::print_stderr)]
                {
                    eprintln!("page {page_num} fault: {message}");
                }
            }
            RenderEvent::RenderPagesStart
            | RenderEvent::RenderPagesEnd
            | RenderEvent::ChangeFont { .. } => {}
            RenderEvent::GlyphDraw { .. } | RenderEvent::SpaceDraw { .. } => {
                extractor.on_event(&event);
            }
        }
        false
    })
    .context("rendering failed")?;

    Ok(())
}
