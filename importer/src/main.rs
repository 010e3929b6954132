use anyhow::{Context, Result};
use bookrank::persist::{load_catalog, save_catalog, CatalogPaths};
use bookrank::tags::normalize_tag;
use bookrank::{Book, Catalog, NewBook};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};
use walkdir::WalkDir;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "importer")]
#[command(about = "Build and query a tagged book catalog", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build a catalog from input JSON/JSONL files or a directory
    Build {
        /// Input path (file or directory)
        #[arg(long)]
        input: String,
        /// Output catalog directory
        #[arg(long)]
        output: String,
    },
    /// Print books related to the given title, most similar first
    Related {
        #[arg(long)]
        catalog: String,
        #[arg(long)]
        title: String,
        /// Maximum number of results
        #[arg(long, default_value_t = 10)]
        k: usize,
    },
    /// Add a tag to a book and save the catalog
    Tag {
        #[arg(long)]
        catalog: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        tag: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { input, output } => build_catalog(&input, &output),
        Commands::Related { catalog, title, k } => print_related(&catalog, &title, k),
        Commands::Tag { catalog, title, tag } => tag_book(&catalog, &title, &tag),
    }
}

fn build_catalog(input: &str, output: &str) -> Result<()> {
    let mut catalog = Catalog::new();
    for file in input_files(Path::new(input))? {
        let records = if file.extension().and_then(|s| s.to_str()) == Some("jsonl") {
            read_jsonl(&file)?
        } else {
            read_json(&file)?
        };
        tracing::debug!(file = %file.display(), records = records.len(), "read input file");
        for record in records {
            ingest(&mut catalog, record);
        }
    }
    tracing::info!(num_books = catalog.len(), "ingested books");
    save_catalog(&CatalogPaths::new(output), &catalog)?;
    tracing::info!(output, "catalog build complete");
    Ok(())
}

/// JSON/JSONL files under `input_path`. Fails when the path is missing or holds
/// no input, so a typo never replaces a good catalog with an empty one.
fn input_files(input_path: &Path) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = Vec::new();
    if input_path.is_dir() {
        for entry in WalkDir::new(input_path).sort_by_file_name().into_iter().filter_map(|e| e.ok()) {
            let p = entry.path();
            if p.is_file() {
                if let Some(ext) = p.extension().and_then(|s| s.to_str()) {
                    if matches!(ext, "json" | "jsonl") {
                        files.push(p.to_path_buf());
                    }
                }
            }
        }
    } else if input_path.is_file() {
        files.push(input_path.to_path_buf());
    } else {
        anyhow::bail!("input path {} does not exist", input_path.display());
    }
    if files.is_empty() {
        anyhow::bail!("no .json or .jsonl files under {}", input_path.display());
    }
    Ok(files)
}

fn read_jsonl(file: &Path) -> Result<Vec<NewBook>> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let mut records = Vec::new();
    for (lineno, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() { continue; }
        let record: NewBook = serde_json::from_str(&line)
            .with_context(|| format!("{}:{}", file.display(), lineno + 1))?;
        records.push(record);
    }
    Ok(records)
}

fn read_json(file: &Path) -> Result<Vec<NewBook>> {
    let f = File::open(file)?;
    let reader = BufReader::new(f);
    let json: serde_json::Value = serde_json::from_reader(reader)
        .with_context(|| format!("parsing {}", file.display()))?;
    let records = match json {
        serde_json::Value::Array(arr) => arr
            .into_iter()
            .map(serde_json::from_value::<NewBook>)
            .collect::<serde_json::Result<Vec<NewBook>>>()?,
        serde_json::Value::Object(_) => vec![serde_json::from_value(json)?],
        _ => {
            tracing::warn!(file = %file.display(), "skipping input that is neither an object nor an array");
            Vec::new()
        }
    };
    Ok(records)
}

fn ingest(catalog: &mut Catalog, mut record: NewBook) {
    if record.title.trim().is_empty() {
        tracing::warn!("skipping record with an empty title");
        return;
    }
    record.tags = record.tags.iter().filter_map(|t| normalize_tag(t)).collect();
    let book = Book::from(record);
    let title = book.title().to_string();
    if catalog.add_book(book).is_some() {
        tracing::warn!(title, "duplicate title, keeping the later record");
    }
}

fn print_related(catalog_dir: &str, title: &str, k: usize) -> Result<()> {
    let catalog = load_catalog(&CatalogPaths::new(catalog_dir))?;
    let related = catalog.related(title)?;
    if related.is_empty() {
        println!("no books related to {title:?}");
    }
    for (book, score) in related.entries().take(k) {
        println!("{score}\t{}", book.title());
    }
    Ok(())
}

fn tag_book(catalog_dir: &str, title: &str, tag: &str) -> Result<()> {
    let paths = CatalogPaths::new(catalog_dir);
    let mut catalog = load_catalog(&paths)?;
    let tag = normalize_tag(tag).with_context(|| format!("{tag:?} is not a usable tag"))?;
    let new_tag = catalog.tag_book(title, &tag)?;
    tracing::info!(title, tag, new_tag, "tagged book");
    save_catalog(&paths, &catalog)?;
    Ok(())
}
