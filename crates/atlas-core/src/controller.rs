//! Interaction controller: the only owner of filter and selection state.
//!
//! Input events are applied one at a time. Every applied batch leaves the
//! controller with a subset, count and map render that agree with each other,
//! and a snapshot can be taken with [`Controller::view`] at any point.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::{
    filter::{self, CategoryFilter, FilterState},
    map_view::{CategoryPalette, MapRender, MapView, Viewport},
    overlay::{self, OverlayState, OverlayView},
    record::RecordId,
    store::RecordStore,
};

/// Process-wide reference data, built once and shared read-only.
#[derive(Debug)]
pub struct ReferenceData {
    pub store: RecordStore,
    pub palette: CategoryPalette,
    pub home: Viewport,
}

impl ReferenceData {
    pub fn new(store: RecordStore, palette: CategoryPalette, home: Viewport) -> Self {
        Self {
            store,
            palette,
            home,
        }
    }
}

/// User input delivered by the host UI.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum UiEvent {
    CategoryChanged { category: CategoryFilter },
    SearchChanged { text: String },
    MarkerClicked { record_id: RecordId },
    /// Click on the map area that hit no marker.
    BackgroundClicked,
    CloseOverlay,
    ViewportChanged { viewport: Viewport },
    ResetViewport,
}

impl UiEvent {
    /// Short name used in logs and metric labels.
    pub fn kind(&self) -> &'static str {
        match self {
            UiEvent::CategoryChanged { .. } => "category_changed",
            UiEvent::SearchChanged { .. } => "search_changed",
            UiEvent::MarkerClicked { .. } => "marker_clicked",
            UiEvent::BackgroundClicked => "background_clicked",
            UiEvent::CloseOverlay => "close_overlay",
            UiEvent::ViewportChanged { .. } => "viewport_changed",
            UiEvent::ResetViewport => "reset_viewport",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ControllerError {
    #[error("no company record with id {0}")]
    UnknownRecord(RecordId),
    #[error("zoom level {0} is outside 0..=22")]
    InvalidZoom(u8),
    #[error("map centre ({lat}, {lon}) is outside the valid latitude/longitude range")]
    InvalidCenter { lat: f64, lon: f64 },
}

/// One option of the category selector.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CategoryOption {
    pub value: CategoryFilter,
    pub label: &'static str,
}

/// Consistent snapshot of everything the dashboard displays.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DashboardView {
    pub revision: u64,
    pub filters: FilterState,
    pub category_options: Vec<CategoryOption>,
    pub count: usize,
    pub count_label: String,
    pub map: MapRender,
    pub overlay: OverlayView,
}

pub const MAX_ZOOM: u8 = 22;

/// Per-session dashboard state machine.
#[derive(Clone, Debug)]
pub struct Controller {
    data: Arc<ReferenceData>,
    filters: FilterState,
    overlay: OverlayState,
    map: MapView,
    visible: Vec<RecordId>,
    revision: u64,
}

impl Controller {
    /// Fresh session: default filters, overlay hidden, home viewport.
    pub fn new(data: Arc<ReferenceData>) -> Self {
        let map = MapView::new(data.home);
        let visible = filter::filter(data.store.records(), CategoryFilter::All, "").ids();
        Self {
            data,
            filters: FilterState::default(),
            overlay: OverlayState::Hidden,
            map,
            visible,
            revision: 0,
        }
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn overlay(&self) -> OverlayState {
        self.overlay
    }

    pub fn visible(&self) -> &[RecordId] {
        &self.visible
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Apply a single event.
    pub fn apply(&mut self, event: UiEvent) -> Result<(), ControllerError> {
        self.apply_batch(std::iter::once(event))
    }

    /// Apply events in delivery order as one update.
    ///
    /// The batch is all-or-nothing: if any event is rejected the controller
    /// is left exactly as it was. Later events override earlier ones, so a
    /// close followed by a click leaves the clicked record showing. An empty
    /// batch changes nothing, revision included.
    pub fn apply_batch<I>(&mut self, events: I) -> Result<(), ControllerError>
    where
        I: IntoIterator<Item = UiEvent>,
    {
        let mut events = events.into_iter().peekable();
        if events.peek().is_none() {
            return Ok(());
        }

        let mut next = self.clone();
        let mut filters_changed = false;
        for event in events {
            debug!(kind = event.kind(), revision = self.revision, "applying ui event");
            filters_changed |= next.apply_one(event)?;
        }
        if filters_changed {
            next.recompute();
        }
        next.revision = next.revision.saturating_add(1);
        *self = next;
        Ok(())
    }

    fn apply_one(&mut self, event: UiEvent) -> Result<bool, ControllerError> {
        match event {
            UiEvent::CategoryChanged { category } => {
                let changed = self.filters.category != category;
                self.filters.category = category;
                Ok(changed)
            }
            UiEvent::SearchChanged { text } => {
                let changed = self.filters.search != text;
                self.filters.search = text;
                Ok(changed)
            }
            UiEvent::MarkerClicked { record_id } => {
                if self.data.store.get(record_id).is_none() {
                    return Err(ControllerError::UnknownRecord(record_id));
                }
                self.overlay.show(record_id);
                Ok(false)
            }
            UiEvent::BackgroundClicked | UiEvent::CloseOverlay => {
                self.overlay.close();
                Ok(false)
            }
            UiEvent::ViewportChanged { viewport } => {
                if viewport.zoom > MAX_ZOOM {
                    return Err(ControllerError::InvalidZoom(viewport.zoom));
                }
                let center = viewport.center;
                if !center.is_valid() {
                    return Err(ControllerError::InvalidCenter {
                        lat: center.lat,
                        lon: center.lon,
                    });
                }
                self.map.record_user_viewport(viewport);
                Ok(false)
            }
            UiEvent::ResetViewport => {
                self.map.reset();
                Ok(false)
            }
        }
    }

    fn recompute(&mut self) {
        self.visible = filter::filter(
            self.data.store.records(),
            self.filters.category,
            &self.filters.search,
        )
        .ids();
    }

    /// Snapshot of subset, count, map and overlay.
    pub fn view(&self) -> DashboardView {
        let store = &self.data.store;
        let records = self.visible.iter().filter_map(|id| store.get(*id));
        let map = self.map.render(records, &self.data.palette);
        let selection = self.overlay.selection().and_then(|id| store.get(id));
        DashboardView {
            revision: self.revision,
            filters: self.filters.clone(),
            category_options: CategoryFilter::OPTIONS
                .iter()
                .map(|option| CategoryOption {
                    value: *option,
                    label: option.label(),
                })
                .collect(),
            count: self.visible.len(),
            count_label: filter::count_label(self.visible.len()),
            map,
            overlay: overlay::render(selection),
        }
    }
}
