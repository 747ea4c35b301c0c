//! Core logic for the library new-titles map.
//! UI hosts render; this crate decides what is listed, paged and selected.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod logging;
pub mod map;
pub mod model;
pub mod service;

pub use catalog::{Catalog, CatalogError, CatalogResult};
pub use config::{load_catalog, AppConfig, ConfigError, MapSettings, CATALOG_PATH_ENV};
pub use engine::month_filter::{compare_callno, filter_and_sort, target_month};
pub use engine::pagination::{page_count, paginate, PageCursor, DEFAULT_PAGE_SIZE};
pub use logging::{default_log_level, init_logging, logging_status};
pub use map::{
    Callout, ControlAction, ControlPosition, MapCommand, MapCommandQueue, MapControl,
    MapPresentation, MapSetup, Marker, MarkerIcon, TileLayer, ViewportTarget, HOME_CONTROL_ID,
};
pub use model::book::{Book, BookId, BookRecord, GeoPoint};
pub use model::month::{parse_acquisition_month, MonthError, MonthStep, YearMonth};
pub use service::selection::{SelectionController, SelectionPolicy};
pub use service::session::{
    BrowseSession, PageItem, PageView, SessionError, SessionResult, UiEvent,
};

/// Minimal health-check API for host integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
