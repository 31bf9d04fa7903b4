//! Detail overlay: a two-state machine (hidden or showing one record) and the
//! content rendered for the visible state.

use serde::Serialize;

use crate::record::{CompanyRecord, RecordId};

/// Overlay state. `Hidden` is the initial state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverlayState {
    #[default]
    Hidden,
    Visible(RecordId),
}

impl OverlayState {
    /// Marker click: show `id`, replacing whatever is showing.
    pub fn show(&mut self, id: RecordId) {
        *self = OverlayState::Visible(id);
    }

    /// Close action: always back to hidden.
    pub fn close(&mut self) {
        *self = OverlayState::Hidden;
    }

    pub fn selection(&self) -> Option<RecordId> {
        match self {
            OverlayState::Hidden => None,
            OverlayState::Visible(id) => Some(*id),
        }
    }

    pub fn is_visible(&self) -> bool {
        matches!(self, OverlayState::Visible(_))
    }
}

/// Link opened from the overlay.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WebsiteLink {
    pub href: String,
    pub label: &'static str,
    /// Browsing context target; always a new one.
    pub target: &'static str,
}

/// Full, untruncated details for one record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverlayContent {
    pub record_id: RecordId,
    pub title: String,
    pub business_type: String,
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year_established: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<WebsiteLink>,
}

/// Rendered overlay: visibility plus content.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct OverlayView {
    pub visible: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<OverlayContent>,
}

impl OverlayView {
    pub fn hidden() -> Self {
        Self {
            visible: false,
            content: None,
        }
    }
}

/// Render the overlay for the current selection.
pub fn render(selection: Option<&CompanyRecord>) -> OverlayView {
    match selection {
        None => OverlayView::hidden(),
        Some(record) => OverlayView {
            visible: true,
            content: Some(OverlayContent {
                record_id: record.id,
                title: record.name.clone(),
                business_type: record.business_type.label().to_string(),
                address: record.address_line(),
                year_established: record.year_established,
                description: record.description.clone(),
                website: record.website.as_ref().map(|href| WebsiteLink {
                    href: href.clone(),
                    label: "Visit Website",
                    target: "_blank",
                }),
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{BusinessType, GeoPoint};

    fn record() -> CompanyRecord {
        CompanyRecord {
            id: RecordId(3),
            name: "Kendall Robotics".into(),
            business_type: BusinessType::Technology,
            address: "300 Third St".into(),
            city: "Cambridge".into(),
            state: "MA".into(),
            zip_code: "02142".into(),
            description: Some("d".repeat(150)),
            website: Some("https://kendall.example".into()),
            year_established: None,
            location: GeoPoint::new(42.36, -71.08),
        }
    }

    #[test]
    fn hidden_when_nothing_selected() {
        assert_eq!(render(None), OverlayView::hidden());
    }

    #[test]
    fn visible_content_is_untruncated_and_skips_absent_fields() {
        let record = record();
        let view = render(Some(&record));
        assert!(view.visible);
        let content = view.content.expect("content");
        assert_eq!(content.title, "Kendall Robotics");
        assert_eq!(content.business_type, "Technology");
        assert_eq!(content.address, "300 Third St, Cambridge, MA 02142");
        assert_eq!(content.description.map(|d| d.chars().count()), Some(150));
        assert_eq!(content.year_established, None);
        let link = content.website.expect("website");
        assert_eq!(link.href, "https://kendall.example");
        assert_eq!(link.target, "_blank");
    }

    #[test]
    fn no_link_without_website() {
        let record = CompanyRecord {
            website: None,
            ..record()
        };
        let content = render(Some(&record)).content.expect("content");
        assert!(content.website.is_none());
    }

    #[test]
    fn state_machine_transitions() {
        let mut state = OverlayState::default();
        assert_eq!(state, OverlayState::Hidden);

        state.show(RecordId(1));
        assert_eq!(state.selection(), Some(RecordId(1)));

        state.show(RecordId(2));
        assert_eq!(state, OverlayState::Visible(RecordId(2)));

        state.close();
        assert!(!state.is_visible());

        state.close();
        assert_eq!(state, OverlayState::Hidden);
    }
}
