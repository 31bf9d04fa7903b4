//! Map view: turns a filtered subset into coloured markers and keeps track of
//! the map viewport across re-renders.
//!
//! Rendering is technology independent. The output is a list of markers
//! plus a viewport that any Leaflet-like client can draw wholesale.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::record::{BusinessType, CompanyRecord, GeoPoint, RecordId};

pub const LIFE_SCIENCES_COLOR: &str = "#1f77b4";
pub const TECHNOLOGY_COLOR: &str = "#ff7f0e";
pub const DEFAULT_COLOR: &str = "#7f7f7f";

pub const MARKER_SIZE: u32 = 10;
pub const MARKER_OPACITY: f32 = 0.8;

/// Longest description shown in hover text before truncation.
pub const HOVER_DESCRIPTION_LIMIT: usize = 100;
pub const TRUNCATION_MARKER: &str = "...";

/// Category label to marker colour table.
#[derive(Clone, Debug)]
pub struct CategoryPalette {
    colors: HashMap<String, String>,
    default_color: String,
}

impl Default for CategoryPalette {
    fn default() -> Self {
        Self::new()
            .with_color(BusinessType::LIFE_SCIENCES_LABEL, LIFE_SCIENCES_COLOR)
            .with_color(BusinessType::TECHNOLOGY_LABEL, TECHNOLOGY_COLOR)
    }
}

impl CategoryPalette {
    /// Empty palette; every category falls back to the default colour.
    pub fn new() -> Self {
        Self {
            colors: HashMap::new(),
            default_color: DEFAULT_COLOR.to_string(),
        }
    }

    pub fn with_color(mut self, label: impl Into<String>, color: impl Into<String>) -> Self {
        self.colors.insert(label.into(), color.into());
        self
    }

    pub fn color_for(&self, business_type: &BusinessType) -> &str {
        self.colors
            .get(business_type.label())
            .map(String::as_str)
            .unwrap_or(&self.default_color)
    }

    pub fn default_color(&self) -> &str {
        &self.default_color
    }
}

/// One clickable map marker.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Marker {
    pub record_id: RecordId,
    pub position: GeoPoint,
    pub color: String,
    pub size: u32,
    pub opacity: f32,
    /// Plain-text hover summary, one field per line.
    pub hover: String,
}

/// Map centre and zoom level.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub center: GeoPoint,
    pub zoom: u8,
}

impl Viewport {
    /// Cambridge, MA.
    pub const CAMBRIDGE: Viewport = Viewport {
        center: GeoPoint {
            lat: 42.3736,
            lon: -71.1097,
        },
        zoom: 12,
    };
}

impl Default for Viewport {
    fn default() -> Self {
        Self::CAMBRIDGE
    }
}

/// Everything a client needs to draw the map.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct MapRender {
    pub markers: Vec<Marker>,
    pub viewport: Viewport,
    /// Bumped on each explicit reset; clients re-apply the viewport when it changes.
    pub viewport_epoch: u64,
    pub user_moved: bool,
}

/// Viewport state of one map, plus the rendering entry point.
#[derive(Clone, Debug)]
pub struct MapView {
    home: Viewport,
    current: Viewport,
    user_moved: bool,
    epoch: u64,
}

impl MapView {
    pub fn new(home: Viewport) -> Self {
        Self {
            home,
            current: home,
            user_moved: false,
            epoch: 0,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.current
    }

    /// Remember a pan/zoom made by the user; later renders keep it.
    pub fn record_user_viewport(&mut self, viewport: Viewport) {
        self.current = viewport;
        self.user_moved = true;
    }

    /// Return to the home viewport on explicit request.
    pub fn reset(&mut self) {
        self.current = self.home;
        self.user_moved = false;
        self.epoch = self.epoch.saturating_add(1);
    }

    /// Render one marker per record; the viewport is left untouched.
    pub fn render<'a, I>(&self, records: I, palette: &CategoryPalette) -> MapRender
    where
        I: IntoIterator<Item = &'a CompanyRecord>,
    {
        MapRender {
            markers: records
                .into_iter()
                .map(|record| marker_for(record, palette))
                .collect(),
            viewport: self.current,
            viewport_epoch: self.epoch,
            user_moved: self.user_moved,
        }
    }
}

fn marker_for(record: &CompanyRecord, palette: &CategoryPalette) -> Marker {
    Marker {
        record_id: record.id,
        position: record.location,
        color: palette.color_for(&record.business_type).to_string(),
        size: MARKER_SIZE,
        opacity: MARKER_OPACITY,
        hover: hover_text(record),
    }
}

/// Hover summary: name, type, address, short description, website.
pub fn hover_text(record: &CompanyRecord) -> String {
    let mut lines = vec![
        record.name.clone(),
        format!("Type: {}", record.business_type),
        format!("Address: {}", record.address_line()),
    ];
    if let Some(description) = record.description.as_deref() {
        lines.push(format!(
            "Description: {}",
            truncate_chars(description, HOVER_DESCRIPTION_LIMIT)
        ));
    }
    if let Some(website) = record.website.as_deref() {
        lines.push(format!("Website: {website}"));
    }
    lines.join("\n")
}

/// Cut `text` to at most `limit` characters, appending the truncation marker.
pub fn truncate_chars(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => format!("{}{TRUNCATION_MARKER}", &text[..byte_index]),
        None => text.to_string(),
    }
}
