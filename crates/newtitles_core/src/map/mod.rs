//! Map presentation contract.
//!
//! # Responsibility
//! - Describe everything the core asks of a map widget: initial setup,
//!   declarative controls, markers with callouts, viewport moves.
//! - Provide `MapCommandQueue`, a recording implementation that UI hosts
//!   drain and replay against their real widget.
//!
//! # Invariants
//! - Marker icon and tile configuration are passed in at setup time; the
//!   core never mutates widget-global defaults.
//! - At most one callout is open, identified by `BookId`.

use crate::model::book::{Book, BookId, GeoPoint};
use serde::{Deserialize, Serialize};

/// Link label shown in every marker callout.
pub const CATALOG_LINK_LABEL: &str = "View in Library Catalog";
/// Control id of the built-in reset-view control.
pub const HOME_CONTROL_ID: &str = "home";

/// Marker image assets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarkerIcon {
    pub icon_url: String,
    pub shadow_url: String,
}

impl Default for MarkerIcon {
    fn default() -> Self {
        Self {
            icon_url: "marker-icon.png".to_string(),
            shadow_url: "marker-shadow.png".to_string(),
        }
    }
}

/// Raster tile source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileLayer {
    /// URL template with `{s}`, `{z}`, `{x}`, `{y}` placeholders.
    pub url_template: String,
    pub attribution: String,
}

impl Default for TileLayer {
    fn default() -> Self {
        Self {
            url_template: "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png".to_string(),
            attribution: "&copy; <a href=\"https://www.openstreetmap.org/copyright\">OpenStreetMap</a> contributors".to_string(),
        }
    }
}

/// Everything a map widget needs before the first render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapSetup {
    pub center: GeoPoint,
    pub zoom: f64,
    pub tiles: TileLayer,
    pub marker_icon: MarkerIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// What the core does when a registered control is clicked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlAction {
    /// Return to the default center and zoom.
    ResetView,
}

/// Declarative custom control; the widget renders it and reports clicks by `id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MapControl {
    pub id: String,
    /// Glyph or image reference shown on the button.
    pub icon: String,
    pub tooltip: String,
    pub position: ControlPosition,
    pub action: ControlAction,
}

/// Target of a viewport move.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportTarget {
    pub center: GeoPoint,
    /// `None` keeps the widget's current zoom level.
    pub zoom: Option<f64>,
}

/// Informational popup content for one marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Callout {
    pub title: String,
    pub callno: String,
    pub link_url: String,
    pub link_label: String,
}

impl Callout {
    pub fn for_book(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            callno: book.callno.clone(),
            link_url: book.bobcat_url.clone(),
            link_label: CATALOG_LINK_LABEL.to_string(),
        }
    }
}

/// One marker per listed book.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub book_id: BookId,
    pub position: GeoPoint,
    pub callout: Callout,
}

impl Marker {
    pub fn for_book(book: &Book) -> Self {
        Self {
            book_id: book.id,
            position: book.location,
            callout: Callout::for_book(book),
        }
    }
}

/// Map widget capabilities used by the browse session.
pub trait MapPresentation {
    /// Applies initial view, tiles and marker icon.
    fn configure(&mut self, setup: &MapSetup);
    /// Adds a custom control.
    fn register_control(&mut self, control: &MapControl);
    /// Replaces all markers.
    fn show_markers(&mut self, markers: &[Marker]);
    /// Animated pan/zoom to a target.
    fn fly_to(&mut self, target: ViewportTarget);
    /// Immediate view change.
    fn set_view(&mut self, center: GeoPoint, zoom: f64);
    /// Opens the callout of one marker, closing any other.
    fn open_callout(&mut self, book_id: BookId);
    fn close_callout(&mut self);
}

/// Recorded map instruction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MapCommand {
    Configure(MapSetup),
    RegisterControl(MapControl),
    ShowMarkers { markers: Vec<Marker> },
    FlyTo(ViewportTarget),
    SetView { center: GeoPoint, zoom: f64 },
    OpenCallout { book_id: BookId },
    CloseCallout,
}

/// `MapPresentation` that queues commands for a host to replay.
#[derive(Debug, Default)]
pub struct MapCommandQueue {
    commands: Vec<MapCommand>,
}

impl MapCommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queued commands, oldest first.
    pub fn pending(&self) -> &[MapCommand] {
        &self.commands
    }

    /// Takes all queued commands.
    pub fn drain(&mut self) -> Vec<MapCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl MapPresentation for MapCommandQueue {
    fn configure(&mut self, setup: &MapSetup) {
        self.commands.push(MapCommand::Configure(setup.clone()));
    }

    fn register_control(&mut self, control: &MapControl) {
        self.commands
            .push(MapCommand::RegisterControl(control.clone()));
    }

    fn show_markers(&mut self, markers: &[Marker]) {
        self.commands.push(MapCommand::ShowMarkers {
            markers: markers.to_vec(),
        });
    }

    fn fly_to(&mut self, target: ViewportTarget) {
        self.commands.push(MapCommand::FlyTo(target));
    }

    fn set_view(&mut self, center: GeoPoint, zoom: f64) {
        self.commands.push(MapCommand::SetView { center, zoom });
    }

    fn open_callout(&mut self, book_id: BookId) {
        self.commands.push(MapCommand::OpenCallout { book_id });
    }

    fn close_callout(&mut self) {
        self.commands.push(MapCommand::CloseCallout);
    }
}
