use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fmx::index::{FmIndex, FmIndexConfig, FmIndexReader, FmIndexWriter, stats};
use fmx::output;
use fmx::utils::{decode_document, progress};
use ignore::WalkBuilder;
use rayon::prelude::*;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "fmx")]
#[command(about = "Compressed full-text self-index with substring search")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log library activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an index from files and directories (one document per file)
    Build {
        /// Files or directories to index
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Index directory to write
        #[arg(short, long)]
        output: PathBuf,

        /// Sampling interval
        #[arg(long)]
        ddic: Option<u32>,

        /// Exclusive upper bound on UTF-16 code units
        #[arg(long)]
        max_char: Option<u16>,

        /// JSON file with an FmIndexConfig
        #[arg(long)]
        config: Option<PathBuf>,

        /// Suppress progress output
        #[arg(short, long)]
        quiet: bool,
    },
    /// Search an index for a keyword
    Search {
        /// Index directory
        index: PathBuf,

        /// Keyword to search for
        keyword: String,

        /// Maximum number of matches to print
        #[arg(long, default_value_t = 1000)]
        limit: usize,

        /// Code units of context on each side of a match
        #[arg(long, default_value_t = 20)]
        context: usize,

        /// Highlight matches
        #[arg(long)]
        color: bool,

        /// Print only sources with matches
        #[arg(short = 'l', long)]
        files_with_matches: bool,

        /// Print match count per source
        #[arg(short, long)]
        count: bool,
    },
    /// Print `len` code units of the indexed text starting at `pos`
    Extract {
        /// Index directory
        index: PathBuf,
        pos: usize,
        len: usize,
    },
    /// Show index statistics
    Stats {
        /// Index directory
        index: PathBuf,

        /// Emit JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        StderrLogger::install();
    }

    match cli.command {
        Commands::Build {
            paths,
            output,
            ddic,
            max_char,
            config,
            quiet,
        } => {
            let mut config = match config {
                Some(path) => FmIndexConfig::from_json_file(&path)?,
                None => FmIndexConfig::default(),
            };
            if let Some(ddic) = ddic {
                config.sample_interval = ddic;
            }
            if let Some(max_char) = max_char {
                config.max_char_code = max_char;
            }
            build_command(&paths, &output, &config, quiet)?;
        }
        Commands::Search {
            index,
            keyword,
            limit,
            context,
            color,
            files_with_matches,
            count,
        } => {
            let reader = open_reader(&index)?;
            if files_with_matches {
                let doc_ids = reader.index().search_documents(&keyword)?;
                output::print_files_only(&reader, &doc_ids)?;
            } else if count {
                let matches = reader.index().search_with_positions(&keyword, usize::MAX)?;
                output::print_match_counts(&reader, &matches)?;
            } else {
                let matches = reader.index().search_with_positions(&keyword, limit)?;
                let keyword_len = keyword.encode_utf16().count();
                let lines = output::build_match_lines(&reader, &matches, keyword_len, context)?;
                output::print_match_lines(&lines, color)?;
            }
        }
        Commands::Extract { index, pos, len } => {
            let reader = open_reader(&index)?;
            let text = reader
                .index()
                .substring(pos, len)
                .with_context(|| format!("Failed to extract {} code units at {}", len, pos))?;
            println!("{}", text);
        }
        Commands::Stats { index, json } => {
            stats::show_stats(&index, json)?;
        }
    }

    Ok(())
}

fn open_reader(index_path: &Path) -> Result<FmIndexReader> {
    FmIndexReader::open(index_path)?
        .with_context(|| format!("No index found at {}", index_path.display()))
}

/// Collect every file under `paths`, in a stable order
fn collect_files(paths: &[PathBuf]) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for path in paths {
        let walker = WalkBuilder::new(path)
            .hidden(true)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .filter_entry(|entry| {
                let name = entry.file_name().to_string_lossy();
                !matches!(name.as_ref(), ".git" | "node_modules" | "target")
            })
            .build();
        files.extend(
            walker
                .filter_map(|entry| entry.ok())
                .filter(|entry| entry.path().is_file())
                .map(|entry| entry.into_path()),
        );
    }
    files.sort();
    files.dedup();
    files
}

fn build_command(
    paths: &[PathBuf],
    output: &Path,
    config: &FmIndexConfig,
    quiet: bool,
) -> Result<()> {
    let spinner = progress::spinner("Discovering files...", quiet);
    let files = collect_files(paths);

    if let Some(spinner) = &spinner {
        spinner.set_message("Reading files...");
    }

    // Read in parallel, push in path order
    let documents: Vec<(PathBuf, String)> = files
        .into_par_iter()
        .filter_map(|path| {
            let content = std::fs::read(&path).ok()?;
            let text = decode_document(&content)?;
            Some((path, text))
        })
        .collect();

    if documents.is_empty() {
        if let Some(spinner) = spinner {
            spinner.finish_and_clear();
        }
        anyhow::bail!("No indexable documents found");
    }

    let mut index = FmIndex::new();
    let mut sources = Vec::with_capacity(documents.len());
    for (path, text) in &documents {
        index
            .push(text)
            .with_context(|| format!("Failed to add {}", path.display()))?;
        sources.push(path.display().to_string());
    }

    if let Some(spinner) = &spinner {
        spinner.set_message("Building index...");
    }
    index
        .build_with_config(config)
        .context("Failed to build index")?;

    if let Some(spinner) = &spinner {
        spinner.set_message("Writing index...");
    }
    FmIndexWriter::write(output, &index, &sources)?;

    if let Some(spinner) = spinner {
        spinner.finish_and_clear();
    }
    if !quiet {
        println!(
            "Indexed {} documents ({} rows) into {}",
            sources.len(),
            index.size(),
            output.display()
        );
    }

    Ok(())
}

/// Writes `log` records to stderr as `fmx: <message>`
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl StderrLogger {
    fn install() {
        if log::set_logger(&LOGGER).is_ok() {
            log::set_max_level(log::LevelFilter::Debug);
        }
    }
}

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::Level::Debug
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            eprintln!("fmx: {}", record.args());
        }
    }

    fn flush(&self) {}
}
