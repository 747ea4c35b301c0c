//! Application configuration.
//!
//! # Responsibility
//! - Define session/map settings with defaults matching the public site.
//! - Parse optional JSON overrides supplied by the UI host.
//! - Resolve the catalog source (env override or bundled dataset).
//!
//! # Invariants
//! - Every field has a default; `{}` is a valid configuration.
//! - `page_size` is normalized on read, never stored as zero.

use crate::catalog::{Catalog, CatalogResult};
use crate::engine::pagination::{normalize_page_size, DEFAULT_PAGE_SIZE};
use crate::map::{
    ControlAction, ControlPosition, MapControl, MapSetup, MarkerIcon, TileLayer, HOME_CONTROL_ID,
};
use crate::model::book::GeoPoint;
use crate::model::month::FALLBACK_LOCALE;
use crate::service::selection::SelectionPolicy;
use log::info;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

/// Environment variable that points at an alternative catalog file.
pub const CATALOG_PATH_ENV: &str = "NEWTITLES_CATALOG_PATH";

const DEFAULT_CENTER: GeoPoint = GeoPoint {
    lat: 37.58,
    lng: 58.20,
};
const DEFAULT_ZOOM: f64 = 3.0;

/// Configuration parse/validation errors.
#[derive(Debug)]
pub enum ConfigError {
    Parse(serde_json::Error),
    /// Value parsed but is unusable.
    Invalid(String),
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "invalid config JSON: {err}"),
            Self::Invalid(message) => write!(f, "invalid config: {message}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(value: serde_json::Error) -> Self {
        Self::Parse(value)
    }
}

/// Home control appearance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HomeControlSettings {
    pub icon: String,
    pub tooltip: String,
    pub position: ControlPosition,
}

impl Default for HomeControlSettings {
    fn default() -> Self {
        Self {
            icon: "\u{1F3E0}".to_string(),
            tooltip: "Home".to_string(),
            position: ControlPosition::TopLeft,
        }
    }
}

/// Map widget settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapSettings {
    pub default_center: GeoPoint,
    pub default_zoom: f64,
    /// Zoom used when focusing a selected book; `None` keeps the current zoom.
    pub focus_zoom: Option<f64>,
    pub tiles: TileLayer,
    pub marker_icon: MarkerIcon,
    pub home_control: HomeControlSettings,
}

impl Default for MapSettings {
    fn default() -> Self {
        Self {
            default_center: DEFAULT_CENTER,
            default_zoom: DEFAULT_ZOOM,
            focus_zoom: None,
            tiles: TileLayer::default(),
            marker_icon: MarkerIcon::default(),
            home_control: HomeControlSettings::default(),
        }
    }
}

impl MapSettings {
    pub fn setup(&self) -> MapSetup {
        MapSetup {
            center: self.default_center,
            zoom: self.default_zoom,
            tiles: self.tiles.clone(),
            marker_icon: self.marker_icon.clone(),
        }
    }

    pub fn home_control(&self) -> MapControl {
        MapControl {
            id: HOME_CONTROL_ID.to_string(),
            icon: self.home_control.icon.clone(),
            tooltip: self.home_control.tooltip.clone(),
            position: self.home_control.position,
            action: ControlAction::ResetView,
        }
    }
}

/// Top-level configuration for one browse session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub page_size: usize,
    /// Locale for the month label, e.g. `en_US`.
    pub locale: String,
    pub selection_policy: SelectionPolicy,
    pub map: MapSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            locale: FALLBACK_LOCALE.to_string(),
            selection_policy: SelectionPolicy::default(),
            map: MapSettings::default(),
        }
    }
}

impl AppConfig {
    /// Parses JSON overrides on top of defaults.
    ///
    /// # Errors
    /// - `Parse` for malformed JSON or wrong field types.
    /// - `Invalid` for non-finite or negative zoom levels.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Page size after normalization.
    pub fn effective_page_size(&self) -> usize {
        normalize_page_size(self.page_size)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zooms = std::iter::once(self.map.default_zoom).chain(self.map.focus_zoom);
        for zoom in zooms {
            if !zoom.is_finite() || zoom < 0.0 {
                return Err(ConfigError::Invalid(format!(
                    "zoom must be a non-negative number, got {zoom}"
                )));
            }
        }
        Ok(())
    }
}

/// Catalog path from `NEWTITLES_CATALOG_PATH`, if set and non-blank.
pub fn catalog_path_override() -> Option<PathBuf> {
    let raw = std::env::var(CATALOG_PATH_ENV).ok()?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(PathBuf::from(trimmed))
}

/// Loads the overridden catalog file, or the bundled dataset.
pub fn load_catalog() -> CatalogResult<Catalog> {
    match catalog_path_override() {
        Some(path) => {
            info!(
                "event=catalog_source module=config status=ok source=file path={}",
                path.display()
            );
            Catalog::load_path(path)
        }
        None => {
            info!("event=catalog_source module=config status=ok source=bundled");
            Catalog::bundled()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppConfig, ConfigError};
    use crate::map::{ControlAction, HOME_CONTROL_ID};
    use crate::service::selection::SelectionPolicy;

    #[test]
    fn empty_object_yields_defaults() {
        let config = AppConfig::from_json_str("{}").expect("empty config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.map.default_zoom, 3.0);
        assert_eq!(config.map.default_center.lat, 37.58);
        assert_eq!(config.map.default_center.lng, 58.20);
    }

    #[test]
    fn overrides_are_applied() {
        let config = AppConfig::from_json_str(
            r#"{"page_size":0,"selection_policy":"keep","map":{"focus_zoom":6}}"#,
        )
        .unwrap();
        assert_eq!(config.effective_page_size(), 10);
        assert_eq!(config.selection_policy, SelectionPolicy::Keep);
        assert_eq!(config.map.focus_zoom, Some(6.0));
        assert_eq!(config.map.default_zoom, 3.0);
    }

    #[test]
    fn negative_zoom_is_rejected() {
        let err = AppConfig::from_json_str(r#"{"map":{"default_zoom":-1}}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn home_control_resets_view() {
        let control = AppConfig::default().map.home_control();
        assert_eq!(control.id, HOME_CONTROL_ID);
        assert_eq!(control.tooltip, "Home");
        assert_eq!(control.action, ControlAction::ResetView);
    }
}
