//! FFI use-case API for the Flutter host.
//!
//! # Responsibility
//! - Expose the browse session as synchronous, envelope-returning calls.
//! - Hand queued map commands to the host, which replays them on its widget.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - One browse session per process; `session_open` replaces it.
//! - Every session call returns a full snapshot, with map commands drained.

use log::{info, warn};
use newtitles_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, load_catalog,
    ping as ping_inner, AppConfig, BrowseSession, MapCommand, MapCommandQueue, Marker,
    MonthStep, YearMonth,
};
use once_cell::sync::Lazy;
use std::sync::{Mutex, PoisonError};
use uuid::Uuid;

type HostSession = BrowseSession<MapCommandQueue>;

static SESSION: Lazy<Mutex<Option<HostSession>>> = Lazy::new(|| Mutex::new(None));

/// Minimal health-check API for FRB smoke integration.
///
/// # FFI contract
/// - Sync call, non-blocking.
/// - Never throws; always returns a UTF-8 string.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// Input semantics:
/// - `level`: one of `trace|debug|info|warn|error` (case-insensitive).
/// - `log_dir`: absolute directory path where rolling logs are written.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`; conflicting calls fail.
/// - Never panics; returns empty string on success and error message on failure.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One row of the current list page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub book_id: String,
    /// Index in the full month listing.
    pub absolute_index: u32,
    pub line: String,
    pub selected: bool,
}

/// One map marker with its callout content.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerItem {
    pub book_id: String,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub callno: String,
    pub link_url: String,
    pub link_label: String,
}

/// Map command for the host widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapInstruction {
    /// `configure|register_control|show_markers|fly_to|set_view|open_callout|close_callout`.
    pub kind: String,
    /// Full command as JSON, including `kind`.
    pub payload_json: String,
}

/// Session state envelope returned by every session call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionSnapshot {
    /// Whether the requested operation succeeded.
    pub ok: bool,
    /// Human-readable diagnostics; empty on plain success.
    pub message: String,
    /// `YYYY-MM`; empty when no session is open.
    pub reference_month: String,
    pub month_label: String,
    pub page: u32,
    pub page_count: u32,
    pub total: u32,
    pub items: Vec<ListItem>,
    pub markers: Vec<MarkerItem>,
    pub selected_book_id: Option<String>,
    /// Commands queued since the previous call, oldest first.
    pub map_commands: Vec<MapInstruction>,
}

/// Opens (or replaces) the browse session.
///
/// Input semantics:
/// - `reference_month`: `YYYY-MM`; `None`/blank means the current month.
/// - `config_json`: `AppConfig` overrides; `None`/blank means defaults.
///
/// The catalog comes from `NEWTITLES_CATALOG_PATH` when set, else the
/// bundled dataset.
#[flutter_rust_bridge::frb(sync)]
pub fn session_open(reference_month: Option<String>, config_json: Option<String>) -> SessionSnapshot {
    match build_session(reference_month, config_json) {
        Ok(session) => {
            let mut slot = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
            let session = slot.insert(session);
            info!(
                "event=ffi_session_open module=ffi status=ok reference={}",
                session.reference_month()
            );
            snapshot(session, Ok(()))
        }
        Err(message) => {
            warn!("event=ffi_session_open module=ffi status=error");
            SessionSnapshot {
                ok: false,
                message: format!("session_open failed: {message}"),
                ..SessionSnapshot::default()
            }
        }
    }
}

/// Current state without changing it.
#[flutter_rust_bridge::frb(sync)]
pub fn session_snapshot() -> SessionSnapshot {
    with_session(|_| Ok(()))
}

/// "Previous Month" button.
#[flutter_rust_bridge::frb(sync)]
pub fn session_previous_month() -> SessionSnapshot {
    with_session(|session| {
        session.previous_month();
        Ok(())
    })
}

/// "Next Month" button.
#[flutter_rust_bridge::frb(sync)]
pub fn session_next_month() -> SessionSnapshot {
    with_session(|session| {
        session.next_month();
        Ok(())
    })
}

/// Month navigation by `-1` or `+1`; other deltas are rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn session_advance_month(delta: i32) -> SessionSnapshot {
    with_session(|session| {
        let step = MonthStep::from_delta(delta).map_err(|err| err.to_string())?;
        session.advance_month(step);
        Ok(())
    })
}

/// Page picker change; out-of-range pages are clamped.
#[flutter_rust_bridge::frb(sync)]
pub fn session_go_to_page(page: u32) -> SessionSnapshot {
    with_session(|session| {
        session.go_to_page(page as usize);
        Ok(())
    })
}

/// List row click, `index` relative to the current page.
#[flutter_rust_bridge::frb(sync)]
pub fn session_select_list_item(index: u32) -> SessionSnapshot {
    with_session(|session| {
        session
            .select_from_list(index as usize)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

/// Marker click.
#[flutter_rust_bridge::frb(sync)]
pub fn session_select_marker(book_id: String) -> SessionSnapshot {
    with_session(|session| {
        let book_id = Uuid::parse_str(book_id.trim())
            .map_err(|err| format!("invalid book id `{}`: {err}", book_id.trim()))?;
        session
            .select_from_map(book_id)
            .map(|_| ())
            .map_err(|err| err.to_string())
    })
}

/// Custom map control click (e.g. `home`).
#[flutter_rust_bridge::frb(sync)]
pub fn session_control_clicked(control_id: String) -> SessionSnapshot {
    with_session(|session| {
        session
            .handle_control(control_id.trim())
            .map_err(|err| err.to_string())
    })
}

fn build_session(
    reference_month: Option<String>,
    config_json: Option<String>,
) -> Result<HostSession, String> {
    let reference = match non_blank(reference_month) {
        Some(raw) => raw
            .parse::<YearMonth>()
            .map_err(|err| err.to_string())?,
        None => YearMonth::current(),
    };
    let config = match non_blank(config_json) {
        Some(raw) => AppConfig::from_json_str(&raw).map_err(|err| err.to_string())?,
        None => AppConfig::default(),
    };
    let catalog = load_catalog().map_err(|err| err.to_string())?;
    Ok(BrowseSession::new(
        catalog,
        config,
        reference,
        MapCommandQueue::new(),
    ))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|raw| !raw.is_empty())
}

fn with_session(f: impl FnOnce(&mut HostSession) -> Result<(), String>) -> SessionSnapshot {
    let mut slot = SESSION.lock().unwrap_or_else(PoisonError::into_inner);
    match slot.as_mut() {
        Some(session) => {
            let outcome = f(session);
            if let Err(message) = &outcome {
                warn!(
                    "event=ffi_call module=ffi status=error reason_len={}",
                    message.len()
                );
            }
            snapshot(session, outcome)
        }
        None => SessionSnapshot {
            ok: false,
            message: "session is not open; call session_open first".to_string(),
            ..SessionSnapshot::default()
        },
    }
}

fn snapshot(session: &mut HostSession, outcome: Result<(), String>) -> SessionSnapshot {
    let view = session.page_view();
    let markers = session
        .listing()
        .iter()
        .map(|book| to_marker_item(&Marker::for_book(book)))
        .collect();
    let selected_book_id = session.selected_book().map(|book| book.id.to_string());
    let map_commands = session
        .map_mut()
        .drain()
        .iter()
        .map(to_map_instruction)
        .collect();
    let (ok, message) = match outcome {
        Ok(()) => (true, String::new()),
        Err(message) => (false, message),
    };

    SessionSnapshot {
        ok,
        message,
        reference_month: view.reference_month.to_string(),
        month_label: view.month_label,
        page: to_u32(view.page),
        page_count: to_u32(view.page_count),
        total: to_u32(view.total),
        items: view
            .items
            .into_iter()
            .map(|item| ListItem {
                book_id: item.book_id.to_string(),
                absolute_index: to_u32(item.absolute_index),
                line: item.line,
                selected: item.selected,
            })
            .collect(),
        markers,
        selected_book_id,
        map_commands,
    }
}

fn to_marker_item(marker: &Marker) -> MarkerItem {
    MarkerItem {
        book_id: marker.book_id.to_string(),
        lat: marker.position.lat,
        lng: marker.position.lng,
        title: marker.callout.title.clone(),
        callno: marker.callout.callno.clone(),
        link_url: marker.callout.link_url.clone(),
        link_label: marker.callout.link_label.clone(),
    }
}

fn to_map_instruction(command: &MapCommand) -> MapInstruction {
    match serde_json::to_value(command) {
        Ok(value) => MapInstruction {
            kind: value["kind"].as_str().unwrap_or_default().to_string(),
            payload_json: value.to_string(),
        },
        Err(err) => MapInstruction {
            kind: "unencodable".to_string(),
            payload_json: format!("{{\"error\":\"{err}\"}}"),
        },
    }
}

fn to_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
