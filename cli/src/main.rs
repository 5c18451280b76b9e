//! pagecells CLI - PDF layout cell extraction tool

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pagecells::render::{cells_to_json, SubmissionWriter};
use pagecells::{
    BatchRunner, DocumentLoader, DocumentOutcome, ExtractOptions, Extractor, GlyphDumpLoader,
    GlyphSource, JsonFormat, LayoutOptions, LayoutPipeline, SegmentationStrategy,
};

#[derive(Parser)]
#[command(name = "pagecells")]
#[command(author = "iyulab")]
#[command(version)]
#[command(about = "Extract paragraph layout cells from PDF glyph geometry", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every command that runs the layout pipeline.
#[derive(clap::Args)]
struct LayoutArgs {
    /// JSON file with layout options
    #[arg(long, value_name = "FILE", env = "PAGECELLS_CONFIG")]
    config: Option<PathBuf>,

    /// Block segmentation strategy (overrides the config file)
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Order blocks by coordinates only
    #[arg(long)]
    coordinate_order: bool,

    /// Attach font name and size of each block's first glyph
    #[arg(long)]
    font: bool,

    /// Process pages one at a time
    #[arg(long)]
    sequential: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Process a directory of glyph dumps into a submission CSV
    Batch {
        /// Directory of glyph dump files
        #[arg(value_name = "INPUT_DIR")]
        input: PathBuf,

        /// Output CSV file
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        /// Hide the progress bar
        #[arg(short, long)]
        quiet: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Print the cells of one document as JSON
    Page {
        /// Input glyph dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Only this page (1-indexed)
        #[arg(short, long)]
        page: Option<u32>,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Output compact JSON
        #[arg(long)]
        compact: bool,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show per-page layout statistics
    Info {
        /// Input glyph dump
        #[arg(value_name = "FILE")]
        input: PathBuf,

        #[command(flatten)]
        layout: LayoutArgs,
    },

    /// Show version information
    Version,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Statistical nearest-neighbour clustering (default)
    Docstrum,
    /// One block per row band
    RowBands,
}

impl From<Strategy> for SegmentationStrategy {
    fn from(strategy: Strategy) -> Self {
        match strategy {
            Strategy::Docstrum => SegmentationStrategy::Docstrum,
            Strategy::RowBands => SegmentationStrategy::RowBands,
        }
    }
}

impl LayoutArgs {
    fn to_options(&self) -> Result<ExtractOptions, Box<dyn std::error::Error>> {
        let mut layout = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .map_err(|e| format!("Cannot read config {}: {}", path.display(), e))?;
                serde_json::from_str::<LayoutOptions>(&text)
                    .map_err(|e| format!("Invalid config {}: {}", path.display(), e))?
            }
            None => LayoutOptions::default(),
        };

        if let Some(strategy) = self.strategy {
            layout.segmenter.strategy = strategy.into();
        }
        if self.coordinate_order {
            layout.reading_order.coordinate_only = true;
        }

        Ok(ExtractOptions::new()
            .with_layout(layout)
            .with_parallel(!self.sequential)
            .with_font(self.font))
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Batch {
            input,
            output,
            quiet,
            layout,
        } => cmd_batch(&input, &output, quiet, &layout),
        Commands::Page {
            input,
            page,
            output,
            compact,
            layout,
        } => cmd_page(&input, page, output.as_deref(), compact, &layout),
        Commands::Info { input, layout } => cmd_info(&input, &layout),
        Commands::Version => {
            cmd_version();
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn cmd_batch(
    input: &Path,
    output: &Path,
    quiet: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.to_options()?;
    let runner = BatchRunner::new(Extractor::new(options), Box::new(GlyphDumpLoader::new()));

    let paths = runner.discover(input)?;
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut sink = SubmissionWriter::create(output)?;

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        ProgressBar::new(paths.len() as u64)
    };
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let summary = runner.run_paths(&paths, &mut sink, |progress| {
        pb.set_position(progress.index as u64);
        pb.set_message(progress.outcome.id().to_string());
        if let DocumentOutcome::Failed { id, error } = progress.outcome {
            pb.suspend(|| eprintln!("{} {}: {}", "Skipped".yellow(), id, error));
        }
    })?;

    pb.finish_with_message("Done!");

    println!("\n{}", "Summary:".green().bold());
    println!("  {} {} documents found", "├─".dimmed(), summary.total);
    println!("  {} {} written", "├─".dimmed(), summary.written);
    println!("  {} {} without cells", "├─".dimmed(), summary.empty);
    println!("  {} {} failed", "├─".dimmed(), summary.failed);
    println!("  {} {} pages skipped", "├─".dimmed(), summary.pages_skipped);
    println!("  {} {} cells", "└─".dimmed(), summary.cells);
    if summary.cancelled {
        println!("{}", "Stopped before all documents were processed".yellow());
    }
    println!("{} {}", "Saved to".green(), output.display());

    Ok(())
}

fn cmd_page(
    input: &Path,
    page: Option<u32>,
    output: Option<&Path>,
    compact: bool,
    layout: &LayoutArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let extractor = Extractor::new(layout.to_options()?);
    let source = GlyphDumpLoader::new().open(input)?;

    let cells = match page {
        Some(number) => {
            let glyphs = source.page_glyphs(number)?;
            extractor.extract_page(&glyphs, number).cells
        }
        None => {
            let id = pagecells::document_id(input);
            match extractor.extract_document(&id, source.as_ref()) {
                DocumentOutcome::Extracted(result) => result.cells,
                DocumentOutcome::Failed { error, .. } => return Err(error.into()),
                _ => Vec::new(),
            }
        }
    };

    let format = if compact {
        JsonFormat::Compact
    } else {
        JsonFormat::Pretty
    };
    let json = cells_to_json(&cells, format)?;

    if let Some(path) = output {
        fs::write(path, &json)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        println!("{}", json);
    }

    Ok(())
}

fn cmd_info(input: &Path, layout: &LayoutArgs) -> Result<(), Box<dyn std::error::Error>> {
    let options = layout.to_options()?;
    let pipeline = LayoutPipeline::new(&options.layout);
    let extractor = Extractor::new(options);
    let source = GlyphDumpLoader::new().open(input)?;
    let page_count = source.page_count()?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());
    println!("{}: {}", "File".bold(), input.display());
    println!("{}: {}", "Id".bold(), pagecells::document_id(input));
    println!("{}: {}", "Pages".bold(), page_count);

    println!();
    println!("{}", "Page Layout".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    for number in 1..=page_count {
        let glyphs = match source.page_glyphs(number) {
            Ok(glyphs) => glyphs,
            Err(e) => {
                println!("{} {}: {}", "Page".bold(), number, format!("unreadable ({})", e).red());
                continue;
            }
        };

        let words = pipeline.word_assembler().assemble(&glyphs);
        let stats = pipeline.segmenter().spacing_stats(&words).ok();
        let report = extractor.extract_page(&glyphs, number);

        println!(
            "{} {}: {} glyphs, {} words, {} cells",
            "Page".bold(),
            number,
            glyphs.len(),
            words.len(),
            report.cells.len()
        );
        if let Some(stats) = stats {
            let pitch = stats
                .between_line
                .map(|p| format!("{:.2}", p))
                .unwrap_or_else(|| "-".to_string());
            println!(
                "  {} within-line gap {:.2}, line pitch {}",
                "├─".dimmed(),
                stats.within_line,
                pitch
            );
        }
        println!(
            "  {} segmentation fallback: {}, ordering fallback: {}",
            "└─".dimmed(),
            yes_no(report.segmentation_fallback),
            yes_no(report.ordering_fallback)
        );
    }

    Ok(())
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

fn cmd_version() {
    println!("{} {}", "pagecells".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF layout cell extraction tool");
    println!();
    println!("License: MIT");
}
