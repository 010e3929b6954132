use crate::catalog::Catalog;
use crate::entity::Book;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::{create_dir_all, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub const FORMAT_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_books: u32,
    pub created_at: String,
    pub version: u32,
}

impl MetaFile {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        Self {
            num_books: catalog.len() as u32,
            created_at: OffsetDateTime::now_utc().format(&Rfc3339).unwrap_or_default(),
            version: FORMAT_VERSION,
        }
    }
}

pub struct CatalogPaths {
    pub root: PathBuf,
}

impl CatalogPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn books(&self) -> PathBuf { self.root.join("books.json") }
    fn meta(&self) -> PathBuf { self.root.join("meta.json") }
}

pub fn catalog_exists(paths: &CatalogPaths) -> bool {
    paths.books().is_file() && paths.meta().is_file()
}

pub fn save_books(paths: &CatalogPaths, books: &[&Book]) -> Result<()> {
    create_dir_all(&paths.root)?;
    let f = File::create(paths.books())?;
    let mut w = BufWriter::new(f);
    serde_json::to_writer_pretty(&mut w, books)?;
    w.flush()?;
    Ok(())
}

pub fn load_books(paths: &CatalogPaths) -> Result<Vec<Book>> {
    let path = paths.books();
    let f = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    let books = serde_json::from_reader(BufReader::new(f))
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(books)
}

pub fn save_meta(paths: &CatalogPaths, meta: &MetaFile) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &CatalogPaths) -> Result<MetaFile> {
    let f = File::open(paths.meta())?;
    let meta: MetaFile = serde_json::from_reader(BufReader::new(f))?;
    Ok(meta)
}

/// Writes every book plus a fresh meta file.
pub fn save_catalog(paths: &CatalogPaths, catalog: &Catalog) -> Result<()> {
    save_books(paths, &catalog.books())?;
    save_meta(paths, &MetaFile::for_catalog(catalog))?;
    tracing::info!(root = %paths.root.display(), num_books = catalog.len(), "catalog saved");
    Ok(())
}

pub fn load_catalog(paths: &CatalogPaths) -> Result<Catalog> {
    let meta = load_meta(paths)?;
    if meta.version != FORMAT_VERSION {
        anyhow::bail!("unsupported catalog version {} (expected {FORMAT_VERSION})", meta.version);
    }
    let books = load_books(paths)?;
    if books.len() != meta.num_books as usize {
        tracing::warn!(expected = meta.num_books, found = books.len(), "catalog meta out of date");
    }
    let catalog: Catalog = books.into_iter().collect();
    tracing::info!(root = %paths.root.display(), num_books = catalog.len(), "catalog loaded");
    Ok(catalog)
}
