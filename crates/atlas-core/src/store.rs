//! Record store: turns raw dataset rows into the canonical, immutable
//! collection of mappable company records.
//!
//! Cleaning is fixed and minimal. Rows without usable coordinates are not
//! errors, they are simply not mappable and are left out.

use tracing::debug;

use crate::record::{BusinessType, CompanyRecord, GeoPoint, RawRow, RecordId, columns};

/// Canonical, read-only collection of company records.
#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<CompanyRecord>,
    dropped: usize,
}

/// Per-category record counts, used for the startup summary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryCounts {
    pub life_sciences: usize,
    pub technology: usize,
    pub other: usize,
}

impl RecordStore {
    /// Clean every row, keeping input order and counting excluded rows.
    pub fn from_rows<I>(rows: I) -> Self
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut records = Vec::new();
        let mut dropped = 0usize;
        for (row_index, row) in rows.into_iter().enumerate() {
            match clean_row(RecordId(records.len()), &row) {
                Some(record) => records.push(record),
                None => {
                    dropped += 1;
                    debug!(row = row_index, "dropping row without mappable coordinates");
                }
            }
        }
        Self { records, dropped }
    }

    pub fn records(&self) -> &[CompanyRecord] {
        &self.records
    }

    pub fn get(&self, id: RecordId) -> Option<&CompanyRecord> {
        self.records.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of rows excluded at load time.
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn category_counts(&self) -> CategoryCounts {
        self.records
            .iter()
            .fold(CategoryCounts::default(), |mut counts, record| {
                match record.business_type {
                    BusinessType::LifeSciences => counts.life_sciences += 1,
                    BusinessType::Technology => counts.technology += 1,
                    BusinessType::Other(_) => counts.other += 1,
                }
                counts
            })
    }
}

/// Load raw rows into canonical records, preserving input order.
pub fn load<I>(rows: I) -> Vec<CompanyRecord>
where
    I: IntoIterator<Item = RawRow>,
{
    RecordStore::from_rows(rows).records
}

fn clean_row(id: RecordId, row: &RawRow) -> Option<CompanyRecord> {
    let lat = parse_coordinate(row, columns::LATITUDE)?;
    let lon = parse_coordinate(row, columns::LONGITUDE)?;

    Some(CompanyRecord {
        id,
        name: row.text(columns::NAME).trim().to_string(),
        business_type: BusinessType::from_label(&row.text(columns::BUSINESS_TYPE)),
        address: row.text(columns::ADDRESS),
        city: row.text(columns::CITY),
        state: row.text(columns::STATE),
        zip_code: row.text(columns::ZIP_CODE),
        description: non_empty(row.text(columns::DESCRIPTION)),
        website: normalize_website(&row.text(columns::WEBSITE)),
        year_established: parse_year(row),
        location: GeoPoint::new(lat, lon),
    })
}

fn parse_coordinate(row: &RawRow, column: &str) -> Option<f64> {
    let value = row.get(column)?.as_f64()?;
    if !value.is_finite() || value == 0.0 {
        return None;
    }
    Some(value)
}

fn parse_year(row: &RawRow) -> Option<i32> {
    let value = row.get(columns::YEAR_ESTABLISHED)?.as_f64()?;
    if !value.is_finite() || value.fract() != 0.0 {
        return None;
    }
    if value < i32::MIN as f64 || value > i32::MAX as f64 {
        return None;
    }
    Some(value as i32)
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Trim a website and make it absolute, defaulting the scheme to https.
pub fn normalize_website(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        Some(trimmed.to_string())
    } else {
        Some(format!("https://{trimmed}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RawValue;

    fn row(name: &str, kind: &str, lat: &str, lon: &str) -> RawRow {
        RawRow::new()
            .with(columns::NAME, name)
            .with(columns::BUSINESS_TYPE, kind)
            .with(columns::ADDRESS, "1 Kendall Sq")
            .with(columns::CITY, "Cambridge")
            .with(columns::STATE, "MA")
            .with(columns::ZIP_CODE, "02139")
            .with(columns::LATITUDE, lat)
            .with(columns::LONGITUDE, lon)
    }

    #[test]
    fn drops_rows_with_missing_zero_or_garbage_coordinates() {
        let mut missing = row("Missing", "Technology", "42.36", "-71.09");
        missing = missing.with(columns::LONGITUDE, "");
        let rows = vec![
            row("Good A", "Life Sciences", "42.36", "-71.09"),
            row("Zero", "Technology", "0", "-71.09"),
            row("Garbage", "Technology", "north", "-71.09"),
            missing,
            row("Good B", "Technology", "42.37", "-71.10"),
            row("Infinite", "Technology", "inf", "-71.10"),
        ];
        let store = RecordStore::from_rows(rows);

        assert_eq!(store.len(), 2);
        assert_eq!(store.dropped(), 4);
        let names: Vec<_> = store.records().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["Good A", "Good B"]);
    }

    #[test]
    fn ids_follow_canonical_order() {
        let store = RecordStore::from_rows(vec![
            row("A", "Technology", "0", "0"),
            row("B", "Technology", "42.1", "-71.1"),
            row("C", "Technology", "42.2", "-71.2"),
        ]);
        assert_eq!(store.records()[0].id, RecordId(0));
        assert_eq!(store.records()[1].id, RecordId(1));
        assert_eq!(store.get(RecordId(1)).map(|r| r.name.as_str()), Some("C"));
        assert!(store.get(RecordId(2)).is_none());
    }

    #[test]
    fn accepts_numeric_cells() {
        let raw = RawRow::new()
            .with(columns::NAME, "Numeric")
            .with(columns::LATITUDE, RawValue::Number(42.36))
            .with(columns::LONGITUDE, RawValue::Number(-71.09));
        let records = load(vec![raw]);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].location, GeoPoint::new(42.36, -71.09));
    }

    #[test]
    fn website_normalization() {
        assert_eq!(
            normalize_website("example.com").as_deref(),
            Some("https://example.com")
        );
        assert_eq!(
            normalize_website("http://example.com").as_deref(),
            Some("http://example.com")
        );
        assert_eq!(
            normalize_website("  https://example.com/path ").as_deref(),
            Some("https://example.com/path")
        );
        assert_eq!(normalize_website(""), None);
        assert_eq!(normalize_website("   "), None);
    }

    #[test]
    fn optional_fields_become_absent_when_empty() {
        let raw = row("Quiet Co", "Technology", "42.36", "-71.09")
            .with(columns::DESCRIPTION, "")
            .with(columns::WEBSITE, "")
            .with(columns::YEAR_ESTABLISHED, "");
        let record = &load(vec![raw])[0];
        assert_eq!(record.description, None);
        assert_eq!(record.website, None);
        assert_eq!(record.year_established, None);
    }

    #[test]
    fn year_accepts_integral_floats_only() {
        let year = |cell: &str| {
            let raw = row("Y", "Technology", "42.36", "-71.09")
                .with(columns::YEAR_ESTABLISHED, cell);
            load(vec![raw])[0].year_established
        };
        assert_eq!(year("1998"), Some(1998));
        assert_eq!(year("2004.0"), Some(2004));
        assert_eq!(year("2004.5"), None);
        assert_eq!(year("unknown"), None);
    }

    #[test]
    fn unknown_business_type_is_kept() {
        let store = RecordStore::from_rows(vec![
            row("A", "Life Sciences", "42.1", "-71.1"),
            row("B", "Technology", "42.1", "-71.1"),
            row("C", "Consulting", "42.1", "-71.1"),
        ]);
        assert_eq!(
            store.category_counts(),
            CategoryCounts {
                life_sciences: 1,
                technology: 1,
                other: 1,
            }
        );
        assert_eq!(
            store.records()[2].business_type,
            BusinessType::Other("Consulting".into())
        );
    }
}
