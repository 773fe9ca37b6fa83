//! Loading documents from category directories on disk.
//!
//! A corpus is an ordered list of categories, each a directory of plain text
//! files. Every regular file directly inside a category directory becomes one
//! document whose url is the configured base url followed by the file name.

use crate::error::{Result, SearchError};
use rayon::prelude::*;
use sha1::{Digest, Sha1};
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::UNIX_EPOCH;
use walkdir::WalkDir;

pub const DEFAULT_BASE_URL: &str = "https://wikipedia.com/wiki/";

/// Raw input to the index: a url and its (already normalized) text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDocument {
    pub url: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Category {
    pub name: String,
    pub dir: PathBuf,
}

impl FromStr for Category {
    type Err = String;

    /// Parses `name=dir`. A bare `dir` uses its final component as the name.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (name, dir) = match s.split_once('=') {
            Some((name, dir)) => (name.trim().to_string(), dir.trim()),
            None => {
                let name = Path::new(s)
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                (name, s.trim())
            }
        };
        if name.is_empty() || dir.is_empty() {
            return Err(format!("expected NAME=DIR, got {s:?}"));
        }
        Ok(Category { name, dir: PathBuf::from(dir) })
    }
}

#[derive(Debug, Clone)]
pub struct Corpus {
    pub categories: Vec<Category>,
    pub base_url: String,
}

impl Corpus {
    pub fn new(categories: Vec<Category>) -> Self {
        Self { categories, base_url: DEFAULT_BASE_URL.to_string() }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Read every document, categories in configured order and files sorted
    /// by name. Any unreadable file fails the whole load.
    pub fn load(&self) -> Result<Vec<SourceDocument>> {
        let mut documents = Vec::new();
        for category in &self.categories {
            let files = list_files(&category.dir)?;
            let loaded = files
                .par_iter()
                .map(|(name, path)| self.read_document(name, path))
                .collect::<Result<Vec<_>>>()?;
            tracing::info!(category = %category.name, docs = loaded.len(), "loaded category");
            documents.extend(loaded);
        }
        Ok(documents)
    }

    /// Hex SHA-1 over the base url and each file's category, name, size and
    /// modification time. Changes whenever a rebuild would see different input.
    pub fn fingerprint(&self) -> Result<String> {
        let mut hasher = Sha1::new();
        hasher.update(self.base_url.as_bytes());
        for category in &self.categories {
            hasher.update([0u8]);
            hasher.update(category.name.as_bytes());
            for (name, path) in list_files(&category.dir)? {
                let meta = fs::metadata(&path).map_err(|e| SearchError::ingestion(&path, e))?;
                let mtime = meta
                    .modified()
                    .ok()
                    .and_then(|t| t.duration_since(UNIX_EPOCH).ok())
                    .unwrap_or_default();
                hasher.update([0u8]);
                hasher.update(name.as_bytes());
                hasher.update(meta.len().to_le_bytes());
                hasher.update(mtime.as_nanos().to_le_bytes());
            }
        }
        Ok(format!("{:x}", hasher.finalize()))
    }

    fn read_document(&self, name: &str, path: &Path) -> Result<SourceDocument> {
        let bytes = fs::read(path).map_err(|e| SearchError::ingestion(path, e))?;
        // Invalid UTF-8 becomes U+FFFD; only I/O errors fail ingestion
        let raw = String::from_utf8_lossy(&bytes);
        Ok(SourceDocument {
            url: format!("{}{}", self.base_url, name),
            text: raw.to_lowercase().replace('\n', " "),
        })
    }
}

/// Regular files directly inside `dir`, sorted by file name.
fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(dir).to_path_buf();
            SearchError::ingestion(path, e.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().into_owned();
        files.push((name, entry.into_path()));
    }
    Ok(files)
}
