//! docmind CLI - PDF section segmentation and retrieval tool

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use docmind::detect::pdf_version_from_path;
use docmind::{
    classify_line, Answerer, Document, DocumentLibrary, DocumentProcessor, JsonFormat,
    MemoryIndex, ProcessOptions, QueryRequest, RagEngine, RagOptions, SectionType,
};

#[derive(Parser)]
#[command(name = "docmind")]
#[command(version)]
#[command(about = "Segment PDFs into sections and search them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Split a PDF into titled, typed sections
    Sections {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output JSON instead of a listing
        #[arg(long)]
        json: bool,

        /// Output compact JSON
        #[arg(long, requires = "json")]
        compact: bool,

        /// Output file (stdout if not specified)
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Skip pages whose text cannot be extracted
        #[arg(long)]
        lenient: bool,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Classify lines as section headings
    Classify {
        /// Lines to classify
        #[arg(value_name = "LINE", required = true)]
        lines: Vec<String>,
    },

    /// Retrieve the passages that best match a question
    #[command(alias = "ask")]
    Search {
        /// Question to answer
        #[arg(value_name = "QUERY")]
        query: String,

        /// PDF files to search
        #[arg(short, long = "docs", value_name = "FILE", num_args = 1.., required = true)]
        docs: Vec<PathBuf>,

        /// Number of passages to retrieve
        #[arg(short = 'k', long, default_value = "5", env = "DOCMIND_TOP_K")]
        top_k: usize,

        /// Output JSON
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

/// Answerer that hands the retrieved context back as the answer.
struct ContextAnswerer;

impl Answerer for ContextAnswerer {
    fn name(&self) -> &str {
        "context"
    }

    fn generate(&self, prompt: &str) -> docmind::Result<String> {
        let context = prompt
            .split_once("Context:\n")
            .and_then(|(_, rest)| rest.split_once("\n\nQuestion:"))
            .map(|(context, _)| context)
            .unwrap_or(prompt);
        Ok(context.to_string())
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Sections {
            input,
            json,
            compact,
            output,
            lenient,
        }) => cmd_sections(&input, json, compact, output.as_deref(), lenient),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Classify { lines }) => {
            cmd_classify(&lines);
            Ok(())
        }
        Some(Commands::Search {
            query,
            docs,
            top_k,
            json,
        }) => cmd_search(&query, &docs, top_k, json),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            println!("{}", "Usage: docmind <COMMAND>".yellow());
            println!("       docmind --help for more information");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn processor(lenient: bool) -> DocumentProcessor {
    let options = if lenient {
        ProcessOptions::new().lenient()
    } else {
        ProcessOptions::new()
    };
    DocumentProcessor::new().with_options(options)
}

fn type_label(section_type: SectionType) -> colored::ColoredString {
    let label = format!("{:<12}", section_type.as_str());
    match section_type {
        SectionType::Title => label.magenta().bold(),
        SectionType::Section => label.dimmed(),
        _ => label.cyan(),
    }
}

fn cmd_sections(
    input: &Path,
    json: bool,
    compact: bool,
    output: Option<&Path>,
    lenient: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let doc = processor(lenient).process_file(input)?;

    let rendered = if json {
        let format = if compact {
            JsonFormat::Compact
        } else {
            JsonFormat::Pretty
        };
        docmind::to_json(&doc, format)?
    } else {
        let mut out = String::new();
        for section in &doc.sections {
            out.push_str(&format!(
                "p{:<4} {} {}\n",
                section.page_number,
                type_label(section.section_type),
                section.title
            ));
            if section.has_content() {
                out.push_str(&format!("       {}\n", section.content.dimmed()));
            }
        }
        out
    };

    if let Some(path) = output {
        fs::write(path, &rendered)?;
        println!("{} {}", "Saved to".green(), path.display());
    } else {
        print!("{}", rendered);
    }

    Ok(())
}

fn cmd_info(input: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let version = pdf_version_from_path(input)?;
    // Show what we can even if some pages fail to extract.
    let doc = processor(true).process_file(input)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    println!("{}: PDF {}", "Format".bold(), version);
    println!("{}: {}", "Pages".bold(), doc.page_count);
    println!("{}: {}", "Title".bold(), doc.title);
    println!(
        "{}: {}",
        "Abstract".bold(),
        if doc.metadata.has_abstract { "Yes" } else { "No" }
    );

    println!();
    println!("{}", "Section Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "Sections".bold(), doc.metadata.total_sections);
    for (section_type, count) in section_counts(&doc) {
        println!("  {} {}: {}", "├─".dimmed(), section_type, count);
    }
    println!("{}: {}", "Words".bold(), doc.word_count());

    Ok(())
}

/// Non-zero section counts, in taxonomy order.
fn section_counts(doc: &Document) -> Vec<(SectionType, usize)> {
    SectionType::ALL
        .iter()
        .map(|&t| (t, doc.sections_of_type(t).count()))
        .filter(|&(_, count)| count > 0)
        .collect()
}

fn cmd_classify(lines: &[String]) {
    for line in lines {
        match classify_line(line) {
            Some(section_type) => println!("{} {}", type_label(section_type), line),
            None => println!("{:<12} {}", "-".dimmed(), line),
        }
    }
}

fn cmd_search(
    query: &str,
    docs: &[PathBuf],
    top_k: usize,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let engine = RagEngine::new(Arc::new(MemoryIndex::new()), Arc::new(ContextAnswerer))
        .with_options(RagOptions::new().with_top_k(top_k).with_paper_search(false));
    let library = DocumentLibrary::new(processor(true), engine);

    let ingested = ingest_files(&library, docs)?;
    log::info!("Ingested {} of {} files", ingested, docs.len());

    let response = library.ask(&QueryRequest::new(query))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&response)?);
        return Ok(());
    }

    if response.sources.is_empty() {
        println!("{}", response.answer.yellow());
        return Ok(());
    }

    println!(
        "{} (confidence {:.2})",
        "Retrieved passages".cyan().bold(),
        response.confidence
    );
    println!("{}", "─".repeat(40).dimmed());
    println!("{}", response.answer);
    println!();
    for source in &response.sources {
        println!(
            "  {} {} p{} {} ({:.2})",
            "├─".dimmed(),
            source.filename,
            source.page_number,
            source.section_title,
            source.relevance_score
        );
    }

    Ok(())
}

/// Ingest files into the library, skipping unreadable or unprocessable ones.
///
/// Returns the number of files ingested.
fn ingest_files(
    library: &DocumentLibrary,
    docs: &[PathBuf],
) -> Result<usize, Box<dyn std::error::Error>> {
    let pb = ProgressBar::new(docs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")?
            .progress_chars("#>-"),
    );

    let mut ingested = 0;
    for path in docs {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        pb.set_message(filename.clone());

        let result = fs::read(path)
            .map_err(docmind::Error::from)
            .and_then(|bytes| library.ingest(&filename, &bytes));
        match result {
            Ok(summary) => {
                log::debug!("Ingested {} as {}", filename, summary.file_id);
                ingested += 1;
            }
            Err(e) => {
                log::warn!("Skipping {}: {}", filename, e);
                pb.println(format!("{} {}: {}", "Skipped".yellow(), filename, e));
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(ingested)
}

fn cmd_version() {
    println!("{} {}", "docmind".cyan().bold(), env!("CARGO_PKG_VERSION"));
    println!("PDF section segmentation and retrieval tool");
    println!();
    println!("License: MIT");
}
