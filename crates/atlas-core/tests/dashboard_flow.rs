use std::sync::Arc;

use atlas_core::{
    CategoryFilter, CategoryPalette, Controller, RawRow, RecordStore, ReferenceData, UiEvent,
    Viewport, record::columns,
};

fn company(name: &str, kind: &str, lat: &str, lon: &str, description: &str) -> RawRow {
    RawRow::new()
        .with(columns::NAME, name)
        .with(columns::BUSINESS_TYPE, kind)
        .with(columns::ADDRESS, "1 Broadway")
        .with(columns::CITY, "Cambridge")
        .with(columns::STATE, "MA")
        .with(columns::ZIP_CODE, "02142")
        .with(columns::DESCRIPTION, description)
        .with(columns::WEBSITE, "example.com")
        .with(columns::YEAR_ESTABLISHED, "2010")
        .with(columns::LATITUDE, lat)
        .with(columns::LONGITUDE, lon)
}

fn reference(rows: Vec<RawRow>) -> Arc<ReferenceData> {
    Arc::new(ReferenceData::new(
        RecordStore::from_rows(rows),
        CategoryPalette::default(),
        Viewport::CAMBRIDGE,
    ))
}

#[test]
fn three_company_walkthrough() {
    let data = reference(vec![
        company("BioGenix Labs", "Life Sciences", "42.3663", "-71.0905", ""),
        company("Helix Therapeutics", "Life Sciences", "42.3625", "-71.0862", ""),
        company("Kendall Robotics", "Technology", "42.3629", "-71.0840", ""),
    ]);
    let mut controller = Controller::new(data);

    let view = controller.view();
    assert_eq!(view.count_label, "3 companies");
    assert_eq!(view.map.markers.len(), 3);

    controller
        .apply(UiEvent::CategoryChanged {
            category: CategoryFilter::Technology,
        })
        .unwrap();
    let view = controller.view();
    assert_eq!(view.count_label, "1 company");
    assert_eq!(view.map.markers.len(), 1);
    let marker = view.map.markers[0].clone();
    assert_eq!(marker.color, "#ff7f0e");

    controller
        .apply(UiEvent::MarkerClicked {
            record_id: marker.record_id,
        })
        .unwrap();
    let overlay = controller.view().overlay;
    assert!(overlay.visible);
    let content = overlay.content.unwrap();
    assert_eq!(content.title, "Kendall Robotics");
    assert_eq!(content.business_type, "Technology");
    assert_eq!(content.year_established, Some(2010));
    assert_eq!(content.website.unwrap().href, "https://example.com");

    controller.apply(UiEvent::CloseOverlay).unwrap();
    let overlay = controller.view().overlay;
    assert!(!overlay.visible);
    assert!(overlay.content.is_none());
}

#[test]
fn unmappable_rows_reduce_the_count_exactly() {
    let rows = vec![
        company("A", "Life Sciences", "42.36", "-71.09", ""),
        company("B", "Technology", "0", "-71.09", ""),
        company("C", "Technology", "42.36", "", ""),
        company("D", "Technology", "lat", "-71.09", ""),
        company("E", "Technology", "42.36", "-71.09", ""),
    ];
    let total = rows.len();
    let data = reference(rows);
    assert_eq!(data.store.len(), total - 3);
    assert_eq!(data.store.dropped(), 3);
    assert_eq!(Controller::new(data).view().count, 2);
}

#[test]
fn hover_truncates_while_overlay_keeps_full_description() {
    let description = "a".repeat(150);
    let data = reference(vec![company(
        "Verbose Bio",
        "Life Sciences",
        "42.36",
        "-71.09",
        &description,
    )]);
    let mut controller = Controller::new(data);

    let marker = controller.view().map.markers[0].clone();
    let hover_description = marker
        .hover
        .lines()
        .find_map(|line| line.strip_prefix("Description: "))
        .unwrap()
        .to_string();
    assert_eq!(hover_description, format!("{}...", "a".repeat(100)));

    controller
        .apply(UiEvent::MarkerClicked {
            record_id: marker.record_id,
        })
        .unwrap();
    let content = controller.view().overlay.content.unwrap();
    assert_eq!(content.description.as_deref(), Some(description.as_str()));
}

#[test]
fn sessions_share_reference_data_but_not_state() {
    let data = reference(vec![
        company("BioGenix Labs", "Life Sciences", "42.3663", "-71.0905", ""),
        company("Kendall Robotics", "Technology", "42.3629", "-71.0840", ""),
    ]);
    let mut first = Controller::new(Arc::clone(&data));
    let second = Controller::new(Arc::clone(&data));

    first
        .apply(UiEvent::SearchChanged {
            text: "kendall".into(),
        })
        .unwrap();
    assert_eq!(first.view().count, 1);
    assert_eq!(second.view().count, 2);
}

#[test]
fn view_serializes_for_the_browser() {
    let data = reference(vec![company(
        "BioGenix Labs",
        "Life Sciences",
        "42.3663",
        "-71.0905",
        "",
    )]);
    let controller = Controller::new(data);
    let json = serde_json::to_value(controller.view()).unwrap();

    assert_eq!(json["count_label"], "1 company");
    assert_eq!(json["filters"]["category"], "All");
    assert_eq!(json["category_options"][1]["label"], "Life Sciences");
    assert_eq!(json["map"]["markers"][0]["record_id"], 0);
    assert_eq!(json["map"]["viewport"]["zoom"], 12);
    assert_eq!(json["overlay"]["visible"], false);
}
