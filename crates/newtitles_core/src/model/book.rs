//! Book domain model.
//!
//! # Responsibility
//! - Define the wire record read from the bundled catalog file.
//! - Define the loaded `Book` with synthetic identity and parsed month.
//!
//! # Invariants
//! - `id` is assigned once at catalog load and never reused.
//! - `position` is the zero-based index in the source catalog and is the
//!   tie-breaker for stable ordering.
//! - `acquired` is `None` when the raw date is missing or malformed.

use crate::model::month::{parse_acquisition_month, YearMonth};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned to each book at catalog load time.
pub type BookId = Uuid;

/// Geographic coordinate in decimal degrees. Not bounds-checked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lng: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Catalog entry exactly as stored in the dataset file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    /// Publisher/edition statement.
    #[serde(default)]
    pub imprint: Option<String>,
    /// Library call number; display value and sort key.
    pub callno: String,
    /// Acquisition date; only year and month are meaningful.
    #[serde(default)]
    pub date: Option<String>,
    pub lat: f64,
    pub lng: f64,
    /// Link to the record in the library catalog.
    #[serde(default)]
    pub bobcat_url: String,
}

/// Loaded, immutable book.
#[derive(Debug, Clone, PartialEq)]
pub struct Book {
    pub id: BookId,
    pub position: usize,
    pub title: String,
    pub imprint: Option<String>,
    pub callno: String,
    pub acquired: Option<YearMonth>,
    pub location: GeoPoint,
    pub bobcat_url: String,
}

impl Book {
    /// Builds a loaded book from a wire record with a caller-provided id.
    pub fn from_record(id: BookId, position: usize, record: BookRecord) -> Self {
        let acquired = record.date.as_deref().and_then(parse_acquisition_month);
        let imprint = record
            .imprint
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        Self {
            id,
            position,
            title: record.title,
            imprint,
            callno: record.callno,
            acquired,
            location: GeoPoint::new(record.lat, record.lng),
            bobcat_url: record.bobcat_url,
        }
    }

    /// Whether this book was acquired in `month`.
    pub fn acquired_in(&self, month: YearMonth) -> bool {
        self.acquired == Some(month)
    }

    /// List display line: `title imprint [callno]`.
    pub fn list_line(&self) -> String {
        match &self.imprint {
            Some(imprint) => format!("{} {} [{}]", self.title, imprint, self.callno),
            None => format!("{} [{}]", self.title, self.callno),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Book, BookRecord};
    use crate::model::month::YearMonth;
    use uuid::Uuid;

    fn record(imprint: Option<&str>, date: Option<&str>) -> BookRecord {
        BookRecord {
            title: "Tablets from Nippur".to_string(),
            imprint: imprint.map(str::to_string),
            callno: "PJ3721 .N5 2024".to_string(),
            date: date.map(str::to_string),
            lat: 32.13,
            lng: 45.23,
            bobcat_url: "https://library.example.edu/record/1".to_string(),
        }
    }

    #[test]
    fn list_line_includes_imprint_when_present() {
        let book = Book::from_record(Uuid::new_v4(), 0, record(Some("Leiden, 2024"), None));
        assert_eq!(
            book.list_line(),
            "Tablets from Nippur Leiden, 2024 [PJ3721 .N5 2024]"
        );
    }

    #[test]
    fn list_line_omits_blank_imprint() {
        let book = Book::from_record(Uuid::new_v4(), 0, record(Some("  "), None));
        assert_eq!(book.list_line(), "Tablets from Nippur [PJ3721 .N5 2024]");
    }

    #[test]
    fn malformed_date_leaves_book_undated() {
        let book = Book::from_record(Uuid::new_v4(), 3, record(None, Some("someday")));
        assert_eq!(book.acquired, None);
        assert_eq!(book.position, 3);
    }

    #[test]
    fn acquired_in_matches_year_and_month() {
        let book = Book::from_record(Uuid::new_v4(), 0, record(None, Some("2024-03-15")));
        assert!(book.acquired_in(YearMonth::new(2024, 3).unwrap()));
        assert!(!book.acquired_in(YearMonth::new(2023, 3).unwrap()));
    }

    #[test]
    fn record_tolerates_missing_optional_fields() {
        let record: BookRecord = serde_json::from_str(
            r#"{"title":"T","callno":"A1","lat":1.5,"lng":2.5}"#,
        )
        .unwrap();
        assert_eq!(record.imprint, None);
        assert_eq!(record.date, None);
        assert!(record.bobcat_url.is_empty());
    }
}
