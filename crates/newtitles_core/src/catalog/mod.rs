//! Static book catalog.
//!
//! # Responsibility
//! - Load the catalog once from JSON (bundled, in-memory text, or a file).
//! - Assign synthetic stable identity to every record at load time.
//!
//! # Invariants
//! - The catalog is never mutated after load; clones share one allocation.
//! - Book order matches the source order and `Book::position` reflects it.
//! - A missing or malformed acquisition date never fails the load.

use crate::model::book::{Book, BookId, BookRecord};
use crate::model::month::YearMonth;
use log::{error, info};
use std::collections::BTreeSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use uuid::Uuid;

/// Dataset compiled into the core crate.
const BUNDLED_CATALOG_JSON: &str = include_str!("../../data/books.json");

pub type CatalogResult<T> = Result<T, CatalogError>;

/// Catalog load errors.
#[derive(Debug)]
pub enum CatalogError {
    /// Catalog file could not be read.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Catalog text is not a JSON array of book records.
    Parse(serde_json::Error),
}

impl Display for CatalogError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => {
                write!(f, "failed to read catalog `{}`: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid catalog data: {err}"),
        }
    }
}

impl Error for CatalogError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for CatalogError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Immutable, shareable set of loaded books.
#[derive(Debug, Clone)]
pub struct Catalog {
    books: Arc<[Book]>,
}

impl Catalog {
    /// Builds a catalog from wire records, assigning ids in source order.
    pub fn from_records(records: Vec<BookRecord>) -> Self {
        let books = records
            .into_iter()
            .enumerate()
            .map(|(position, record)| Book::from_record(Uuid::new_v4(), position, record))
            .collect::<Vec<_>>();
        let catalog = Self {
            books: books.into(),
        };
        info!(
            "event=catalog_load module=catalog status=ok books={} undated={}",
            catalog.len(),
            catalog.undated_count()
        );
        catalog
    }

    /// Parses a JSON array of book records.
    pub fn from_json_str(json: &str) -> CatalogResult<Self> {
        let records: Vec<BookRecord> = serde_json::from_str(json).map_err(|err| {
            error!("event=catalog_load module=catalog status=error reason=parse");
            CatalogError::from(err)
        })?;
        Ok(Self::from_records(records))
    }

    /// Reads and parses a catalog file.
    pub fn load_path(path: impl AsRef<Path>) -> CatalogResult<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| {
            error!("event=catalog_load module=catalog status=error reason=io");
            CatalogError::Io {
                path: path.to_path_buf(),
                source,
            }
        })?;
        Self::from_json_str(&json)
    }

    /// Loads the dataset bundled with this crate.
    pub fn bundled() -> CatalogResult<Self> {
        Self::from_json_str(BUNDLED_CATALOG_JSON)
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn len(&self) -> usize {
        self.books.len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    /// Looks up a book by its load-time id.
    pub fn get(&self, id: BookId) -> Option<&Book> {
        self.books.iter().find(|book| book.id == id)
    }

    /// Distinct acquisition months present in the catalog, newest first.
    pub fn acquisition_months(&self) -> Vec<YearMonth> {
        let months = self
            .books
            .iter()
            .filter_map(|book| book.acquired)
            .collect::<BTreeSet<_>>();
        months.into_iter().rev().collect()
    }

    fn undated_count(&self) -> usize {
        self.books
            .iter()
            .filter(|book| book.acquired.is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::Catalog;

    #[test]
    fn bundled_catalog_loads_and_is_dated() {
        let catalog = Catalog::bundled().expect("bundled catalog should parse");
        assert!(!catalog.is_empty());
        assert!(!catalog.acquisition_months().is_empty());
    }

    #[test]
    fn clones_share_the_same_books() {
        let catalog = Catalog::bundled().unwrap();
        let clone = catalog.clone();
        assert!(std::ptr::eq(catalog.books(), clone.books()));
    }
}
