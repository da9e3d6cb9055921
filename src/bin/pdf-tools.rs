//! PDF Tools CLI
//!
//! Resize, split, merge, and compress PDF files from the command line.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use glob::glob;
use log::{info, LevelFilter};
use std::path::{Path, PathBuf};
use std::process;

use pdf_tools::output::Operation;
use pdf_tools::pdf::{
    compress_file, extract_file_metadata, merge_files, resize_file, split_file,
    CompressOptions, CompressionLevel, MergeOptions, ResizeOptions, SplitOptions,
};
use pdf_tools::{Error, ScaleFactor};

/// PDF Tools - resize, split, merge, and compress PDF files
#[derive(Parser)]
#[command(name = "pdf-tools")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    # Shrink every page to half size
    pdf-tools resize report.pdf --scale 0.5

    # Extract pages 1-3, 5 and 7-9 (written to split-report.pdf)
    pdf-tools split report.pdf --pages \"1-3,5,7-9\"

    # Merge numbered PDFs in order
    pdf-tools merge \"[0-9]*.pdf\" -o handout.pdf

    # Compress and show the size change
    pdf-tools compress report.pdf --level high")]
struct Cli {
    /// Directory for outputs when --output is not given
    #[arg(long, global = true, env = "PDF_TOOLS_OUTPUT_DIR", default_value = ".")]
    output_dir: PathBuf,

    /// Open the output file after creation
    #[arg(long, global = true)]
    open: bool,

    /// Show more detail (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scale every page's width and height by a factor
    Resize {
        /// Input PDF file
        input: PathBuf,

        /// Scale factor, e.g. 0.5, 1.25 or 150%
        #[arg(short, long, default_value = "1.0")]
        scale: ScaleFactor,

        /// Output PDF file path (default: resized-<input>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Extract selected pages into a new PDF
    Split {
        /// Input PDF file
        input: PathBuf,

        /// Pages to keep, e.g. "1-3,5,7-9"
        #[arg(short, long)]
        pages: String,

        /// Output PDF file path (default: split-<input>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Merge multiple PDF files into one
    Merge {
        /// Input PDF files (in order). Supports glob patterns like "*.pdf"
        #[arg(required = true)]
        inputs: Vec<String>,

        /// Output PDF file path (default: merged.pdf)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Re-save a PDF compactly and report the size change
    Compress {
        /// Input PDF file
        input: PathBuf,

        /// Compression level: low, medium or high
        #[arg(short, long, default_value = "medium")]
        level: CompressionLevel,

        /// Output PDF file path (default: compressed-<input>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show information about a PDF file
    Info {
        /// PDF file to inspect
        input: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Resize { ref input, scale, ref output } => {
            cmd_resize(&cli, input, scale, output.as_deref())
        }
        Commands::Split { ref input, ref pages, ref output } => {
            cmd_split(&cli, input, pages, output.as_deref())
        }
        Commands::Merge { ref inputs, ref output } => {
            cmd_merge(&cli, inputs, output.as_deref())
        }
        Commands::Compress { ref input, level, ref output } => {
            cmd_compress(&cli, input, level, output.as_deref())
        }
        Commands::Info { ref input } => cmd_info(input),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

/// Warnings by default, more with each -v; RUST_LOG overrides both
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        2 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };

    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// Explicit output path, or the operation's conventional name in --output-dir
fn output_path(cli: &Cli, explicit: Option<&Path>, operation: Operation, input: Option<&Path>) -> PathBuf {
    match explicit {
        Some(path) => path.to_path_buf(),
        None => cli.output_dir.join(operation.output_name(input)),
    }
}

/// Expand glob patterns in input paths
///
/// Arguments keep their order; matches of one pattern are sorted.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut paths = Vec::new();

    for pattern in patterns {
        // Check if pattern contains glob characters
        if pattern.contains('*') || pattern.contains('?') || pattern.contains('[') {
            let entries = glob(pattern).map_err(|e| Error::InvalidGlob(e.to_string()))?;

            let mut matched: Vec<PathBuf> = Vec::new();
            for entry in entries {
                match entry {
                    Ok(path) => matched.push(path),
                    Err(e) => log::warn!("glob error for {}: {}", pattern, e),
                }
            }
            if matched.is_empty() {
                return Err(Error::NoFilesMatched(pattern.clone()).into());
            }

            matched.sort();
            paths.extend(matched);
        } else {
            // No glob characters, treat as literal path
            paths.push(PathBuf::from(pattern));
        }
    }

    Ok(paths)
}

/// Open a file with the system default application
fn open_file(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open")
            .arg(path)
            .spawn()?;
    }
    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/C", "start", "", &path.display().to_string()])
            .spawn()?;
    }
    Ok(())
}

fn finish(cli: &Cli, output: &Path) -> Result<()> {
    eprintln!("Output: {}", output.display());

    if cli.open {
        open_file(output).with_context(|| format!("Failed to open {}", output.display()))?;
    }

    Ok(())
}

/// Resize every page of a PDF
fn cmd_resize(cli: &Cli, input: &Path, scale: ScaleFactor, output: Option<&Path>) -> Result<()> {
    let output = output_path(cli, output, Operation::Resize, Some(input));

    eprintln!("Resizing {} by {}...", input.display(), scale.get());

    let options = ResizeOptions {
        input_path: input.to_path_buf(),
        output_path: output.clone(),
        scale,
    };
    resize_file(&options).with_context(|| format!("Failed to resize {}", input.display()))?;

    finish(cli, &output)
}

/// Extract pages from a PDF
fn cmd_split(cli: &Cli, input: &Path, pages: &str, output: Option<&Path>) -> Result<()> {
    let output = output_path(cli, output, Operation::Split, Some(input));

    eprintln!("Extracting pages \"{}\" from {}...", pages, input.display());

    let options = SplitOptions {
        input_path: input.to_path_buf(),
        output_path: output.clone(),
        pages: pages.to_string(),
    };
    split_file(&options).with_context(|| format!("Failed to split {}", input.display()))?;

    finish(cli, &output)
}

/// Merge multiple PDFs into one
fn cmd_merge(cli: &Cli, inputs: &[String], output: Option<&Path>) -> Result<()> {
    // Expand glob patterns
    let inputs = expand_globs(inputs)?;

    if inputs.len() < 2 {
        bail!(Error::NoOperationTarget(format!(
            "merge needs at least 2 PDF files, got {}",
            inputs.len()
        )));
    }

    let output = output_path(cli, output, Operation::Merge, None);

    eprintln!("Merging {} PDF files...", inputs.len());
    info!("Merge order: {:?}", inputs);

    let options = MergeOptions {
        input_paths: inputs,
        output_path: output.clone(),
    };
    merge_files(&options).context("Failed to merge PDFs")?;

    finish(cli, &output)
}

/// Compress a PDF and print the size report
fn cmd_compress(cli: &Cli, input: &Path, level: CompressionLevel, output: Option<&Path>) -> Result<()> {
    let output = output_path(cli, output, Operation::Compress, Some(input));

    eprintln!("Compressing {} ({} level)...", input.display(), level);

    let options = CompressOptions {
        input_path: input.to_path_buf(),
        output_path: output.clone(),
        level,
    };
    let report = compress_file(&options)
        .with_context(|| format!("Failed to compress {}", input.display()))?;

    println!("{}", report);

    finish(cli, &output)
}

/// Show information about a PDF
fn cmd_info(input: &Path) -> Result<()> {
    let metadata = extract_file_metadata(input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    println!("File: {}", input.display());
    println!("Size: {}", pdf_tools::pdf::format_file_size(metadata.file_size));
    println!("Pages: {}", metadata.page_count);

    if let Some(title) = metadata.title {
        println!("Title: {}", title);
    }
    if let Some(author) = metadata.author {
        println!("Author: {}", author);
    }

    for (index, size) in metadata.page_sizes.iter().enumerate() {
        println!("  Page {}: {}", index + 1, size);
    }

    Ok(())
}
