//! PDF loading and text extraction
//!
//! Extracts text per page through `lopdf` so chunks keep their page numbers;
//! documents whose pages yield nothing fall back to whole-file extraction
//! with `pdf-extract`.

use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::Document;

/// A PDF with its extracted page texts
#[derive(Debug)]
pub struct LoadedPdf {
    pub document: Document,
    pub pages: Vec<PdfPage>,
}

/// Extracted text for one page
#[derive(Debug)]
pub struct PdfPage {
    /// 1-indexed page number, `None` when only whole-file text was available
    pub number: Option<u32>,
    pub text: String,
}

/// Loads PDF files from disk
#[derive(Debug, Default)]
pub struct PdfLoader;

impl PdfLoader {
    pub fn new() -> Self {
        Self
    }

    /// Find all PDF files under a directory
    pub fn discover(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        if !dir.is_dir() {
            return Err(Error::Config(format!(
                "Data directory {} does not exist",
                dir.display()
            )));
        }

        let mut files: Vec<PathBuf> = WalkDir::new(dir)
            .into_iter()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_file())
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .map(|ext| ext.eq_ignore_ascii_case("pdf"))
                    .unwrap_or(false)
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Load a single PDF and extract its text
    pub fn load_file(&self, path: &Path) -> Result<LoadedPdf> {
        let filename = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown.pdf")
            .to_string();

        let bytes = std::fs::read(path)?;
        let content_hash = hex::encode(Sha256::digest(&bytes));

        let mut document = Document::new(filename.clone(), content_hash, bytes.len() as u64);
        let pages = self.extract_pages(&bytes, &filename)?;
        document.total_pages = pages.iter().filter_map(|p| p.number).max();

        if pages.iter().all(|p| p.text.is_empty()) {
            return Err(Error::file_parse(
                filename,
                "No extractable text in any page",
            ));
        }

        Ok(LoadedPdf { document, pages })
    }

    /// Extract per-page text, falling back to whole-file extraction
    fn extract_pages(&self, bytes: &[u8], filename: &str) -> Result<Vec<PdfPage>> {
        match self.extract_with_lopdf(bytes) {
            Ok(pages) if pages.iter().any(|p| !p.text.is_empty()) => Ok(pages),
            _ => {
                tracing::debug!(filename, "Per-page extraction empty, trying whole-file");
                let text = pdf_extract::extract_text_from_mem(bytes)
                    .map_err(|e| Error::file_parse(filename, e.to_string()))?;
                Ok(vec![PdfPage {
                    number: None,
                    text: clean_text(&text),
                }])
            }
        }
    }

    fn extract_with_lopdf(&self, bytes: &[u8]) -> Result<Vec<PdfPage>> {
        let doc = lopdf::Document::load_mem(bytes)
            .map_err(|e| Error::file_parse("pdf", e.to_string()))?;

        let mut pages = Vec::new();
        for (page_number, _) in doc.get_pages() {
            let text = doc.extract_text(&[page_number]).unwrap_or_default();
            pages.push(PdfPage {
                number: Some(page_number),
                text: clean_text(&text),
            });
        }
        Ok(pages)
    }
}

/// Strip null bytes and collapse runs of whitespace
fn clean_text(raw: &str) -> String {
    let without_nulls: String = raw.chars().filter(|c| *c != '\0').collect();
    let mut cleaned = String::with_capacity(without_nulls.len());
    let mut last_was_space = true;
    for c in without_nulls.chars() {
        if c.is_whitespace() {
            if !last_was_space {
                cleaned.push(' ');
            }
            last_was_space = true;
        } else {
            cleaned.push(c);
            last_was_space = false;
        }
    }
    cleaned.trim_end().to_string()
}
