//! Browse session: month navigation, paging and list/map selection sync.
//!
//! # Responsibility
//! - Recompute the month listing whenever the reference month changes.
//! - Keep the page cursor, selection and map markers consistent with it.
//! - Translate list/map/control interactions into map viewport commands.
//!
//! # Invariants
//! - `listing` is always `filter_and_sort(catalog, reference)`.
//! - Every listing change bumps `generation`, which resets the page to 1.
//! - A callout is open only for the selected book, and only while listed.
//! - All transitions are synchronous; nothing blocks or retries.

use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::engine::month_filter::{filter_and_sort, target_month};
use crate::engine::pagination::{page_count, PageCursor};
use crate::map::{ControlAction, MapControl, MapPresentation, Marker, ViewportTarget};
use crate::model::book::{Book, BookId};
use crate::model::month::{MonthStep, YearMonth};
use crate::service::selection::SelectionController;
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type SessionResult<T> = Result<T, SessionError>;

/// Interaction errors. None of these leave the session inconsistent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// List click outside the current page.
    IndexOutOfPage { index: usize, page_len: usize },
    /// Marker click for a book that is not in the current listing.
    BookNotListed(BookId),
    /// Click on a control id that was never registered.
    UnknownControl(String),
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IndexOutOfPage { index, page_len } => write!(
                f,
                "list index {index} is outside the current page of {page_len} item(s)"
            ),
            Self::BookNotListed(book_id) => {
                write!(f, "book is not in the current listing: {book_id}")
            }
            Self::UnknownControl(id) => write!(f, "unknown map control: `{id}`"),
        }
    }
}

impl Error for SessionError {}

/// Discrete user interactions coming from the presentation layers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    PreviousMonth,
    NextMonth,
    /// Page picker moved to a 1-based page.
    PageChanged(usize),
    /// List item clicked, index relative to the current page.
    ListItemClicked(usize),
    MarkerClicked(BookId),
    ControlClicked(String),
}

/// One rendered list row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    pub book_id: BookId,
    /// Index in the full month listing.
    pub absolute_index: usize,
    pub line: String,
    pub selected: bool,
}

/// Everything the list presentation needs for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageView {
    pub reference_month: YearMonth,
    pub month_label: String,
    pub page: usize,
    pub page_count: usize,
    pub total: usize,
    pub items: Vec<PageItem>,
}

/// Session state for one UI instance.
pub struct BrowseSession<M: MapPresentation> {
    catalog: Catalog,
    config: AppConfig,
    reference: YearMonth,
    listing: Vec<Book>,
    generation: u64,
    pager: PageCursor,
    selection: SelectionController,
    controls: Vec<MapControl>,
    map: M,
}

impl<M: MapPresentation> BrowseSession<M> {
    /// Starts a session: configures the map, registers the home control and
    /// computes the first listing.
    pub fn new(catalog: Catalog, config: AppConfig, reference: YearMonth, mut map: M) -> Self {
        map.configure(&config.map.setup());
        let home = config.map.home_control();
        map.register_control(&home);

        let mut session = Self {
            pager: PageCursor::new(config.effective_page_size()),
            selection: SelectionController::new(config.selection_policy),
            catalog,
            config,
            reference,
            listing: Vec::new(),
            generation: 0,
            controls: vec![home],
            map,
        };
        session.refresh_listing();
        info!(
            "event=session_start module=session status=ok reference={} books={}",
            session.reference,
            session.catalog.len()
        );
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut M {
        &mut self.map
    }

    pub fn reference_month(&self) -> YearMonth {
        self.reference
    }

    /// Month whose acquisitions are listed.
    pub fn target_month(&self) -> YearMonth {
        target_month(self.reference)
    }

    /// Reference month rendered for the configured locale.
    pub fn month_label(&self) -> String {
        self.reference.label(&self.config.locale)
    }

    /// Current month listing, sorted by call number.
    pub fn listing(&self) -> &[Book] {
        &self.listing
    }

    /// Listing generation; changes on every recompute.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn page(&self) -> usize {
        self.pager.page()
    }

    pub fn page_count(&self) -> usize {
        page_count(self.listing.len(), self.pager.page_size())
    }

    /// Books on the current page.
    pub fn current_page(&self) -> &[Book] {
        self.pager.slice(&self.listing)
    }

    /// Selected book, looked up in the full catalog.
    ///
    /// Under `SelectionPolicy::Keep` this may be a book from another month.
    pub fn selected_book(&self) -> Option<&Book> {
        self.selection
            .selected()
            .and_then(|book_id| self.catalog.get(book_id))
    }

    pub fn is_callout_open(&self, book_id: BookId) -> bool {
        self.selection.callout_target(&self.listing) == Some(book_id)
    }

    pub fn page_view(&self) -> PageView {
        let offset = self.pager.absolute_index(0);
        let items = self
            .current_page()
            .iter()
            .enumerate()
            .map(|(relative, book)| PageItem {
                book_id: book.id,
                absolute_index: offset + relative,
                line: book.list_line(),
                selected: self.selection.is_selected(book.id),
            })
            .collect();
        PageView {
            reference_month: self.reference,
            month_label: self.month_label(),
            page: self.page(),
            page_count: self.page_count(),
            total: self.listing.len(),
            items,
        }
    }

    /// Moves the reference month one step and recomputes the listing.
    pub fn advance_month(&mut self, step: MonthStep) -> YearMonth {
        let next = self.reference.shifted(step);
        self.set_reference_month(next);
        self.reference
    }

    pub fn previous_month(&mut self) -> YearMonth {
        self.advance_month(MonthStep::Backward)
    }

    pub fn next_month(&mut self) -> YearMonth {
        self.advance_month(MonthStep::Forward)
    }

    /// Jumps to `month`. Returns `false` when it is already the reference.
    pub fn set_reference_month(&mut self, month: YearMonth) -> bool {
        if month == self.reference {
            return false;
        }
        let previous = self.reference;
        self.reference = month;
        info!(
            "event=month_change module=session status=ok from={} to={}",
            previous, month
        );
        self.refresh_listing();
        true
    }

    /// Moves the page picker, clamped into range. Returns the applied page.
    pub fn go_to_page(&mut self, requested: usize) -> usize {
        let applied = self.pager.go_to(requested, self.listing.len());
        if applied != requested {
            debug!(
                "event=page_clamp module=session status=ok requested={} applied={}",
                requested, applied
            );
        }
        applied
    }

    /// Selects the item at `index` on the current page and focuses the map on it.
    pub fn select_from_list(&mut self, index: usize) -> SessionResult<&Book> {
        let page_len = self.current_page().len();
        if index >= page_len {
            warn!(
                "event=select module=session status=error source=list index={} page_len={}",
                index, page_len
            );
            return Err(SessionError::IndexOutOfPage { index, page_len });
        }
        let absolute = self.pager.absolute_index(index);
        self.focus(absolute, "list");
        Ok(&self.listing[absolute])
    }

    /// Selects the book behind a clicked marker and focuses the map on it.
    ///
    /// The page cursor follows the book so the list reflects the choice.
    pub fn select_from_map(&mut self, book_id: BookId) -> SessionResult<&Book> {
        let Some(absolute) = self.listing.iter().position(|book| book.id == book_id) else {
            warn!(
                "event=select module=session status=error source=map book_id={}",
                book_id
            );
            return Err(SessionError::BookNotListed(book_id));
        };
        let page = absolute / self.pager.page_size() + 1;
        self.pager.go_to(page, self.listing.len());
        self.focus(absolute, "map");
        Ok(&self.listing[absolute])
    }

    /// Returns the map to its default center and zoom.
    pub fn reset_view(&mut self) {
        let settings = &self.config.map;
        self.map
            .set_view(settings.default_center, settings.default_zoom);
        info!("event=view_reset module=session status=ok");
    }

    /// Runs the action bound to a registered control.
    pub fn handle_control(&mut self, control_id: &str) -> SessionResult<()> {
        let action = self
            .controls
            .iter()
            .find(|control| control.id == control_id)
            .map(|control| control.action)
            .ok_or_else(|| SessionError::UnknownControl(control_id.to_string()))?;
        match action {
            ControlAction::ResetView => self.reset_view(),
        }
        Ok(())
    }

    /// Dispatches one UI event.
    pub fn handle(&mut self, event: UiEvent) -> SessionResult<()> {
        match event {
            UiEvent::PreviousMonth => {
                self.previous_month();
            }
            UiEvent::NextMonth => {
                self.next_month();
            }
            UiEvent::PageChanged(page) => {
                self.go_to_page(page);
            }
            UiEvent::ListItemClicked(index) => {
                self.select_from_list(index)?;
            }
            UiEvent::MarkerClicked(book_id) => {
                self.select_from_map(book_id)?;
            }
            UiEvent::ControlClicked(control_id) => self.handle_control(&control_id)?,
        }
        Ok(())
    }

    fn focus(&mut self, absolute: usize, source: &str) {
        let book = &self.listing[absolute];
        let target = ViewportTarget {
            center: book.location,
            zoom: self.config.map.focus_zoom,
        };
        let book_id = book.id;
        self.selection.select(book_id);
        self.map.fly_to(target);
        self.map.open_callout(book_id);
        info!(
            "event=select module=session status=ok source={} index={} book_id={}",
            source, absolute, book_id
        );
    }

    fn refresh_listing(&mut self) {
        self.listing = filter_and_sort(self.catalog.books(), self.reference)
            .into_iter()
            .cloned()
            .collect();
        self.generation += 1;
        self.pager.observe_listing(self.generation);

        if self.selection.on_listing_changed() {
            self.map.close_callout();
        }
        let markers = self.listing.iter().map(Marker::for_book).collect::<Vec<_>>();
        self.map.show_markers(&markers);
        if let Some(book_id) = self.selection.callout_target(&self.listing) {
            self.map.open_callout(book_id);
        }

        info!(
            "event=listing_refresh module=session status=ok target={} books={} generation={}",
            self.target_month(),
            self.listing.len(),
            self.generation
        );
    }
}
