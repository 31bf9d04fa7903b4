//! Canonical company records and the raw rows they are cleaned from.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};

/// Column names of the source dataset.
pub mod columns {
    pub const NAME: &str = "Business Name";
    pub const BUSINESS_TYPE: &str = "Business Type";
    pub const ADDRESS: &str = "Address";
    pub const CITY: &str = "City";
    pub const STATE: &str = "State";
    pub const ZIP_CODE: &str = "Zip Code";
    pub const DESCRIPTION: &str = "Business Description";
    pub const WEBSITE: &str = "Website";
    pub const YEAR_ESTABLISHED: &str = "Year Established";
    pub const LONGITUDE: &str = "Longitude";
    pub const LATITUDE: &str = "Latitude";

    /// Every column the record store reads.
    pub const ALL: [&str; 11] = [
        NAME,
        BUSINESS_TYPE,
        ADDRESS,
        CITY,
        STATE,
        ZIP_CODE,
        DESCRIPTION,
        WEBSITE,
        YEAR_ESTABLISHED,
        LONGITUDE,
        LATITUDE,
    ];
}

/// Stable identifier of a canonical record: its position in load order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub usize);

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Business category of a company.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum BusinessType {
    LifeSciences,
    Technology,
    /// Any label outside the known categories, kept verbatim for display.
    Other(String),
}

impl BusinessType {
    pub const LIFE_SCIENCES_LABEL: &'static str = "Life Sciences";
    pub const TECHNOLOGY_LABEL: &'static str = "Technology";

    /// Map a raw dataset label onto a category.
    pub fn from_label(raw: &str) -> Self {
        match raw.trim() {
            Self::LIFE_SCIENCES_LABEL => BusinessType::LifeSciences,
            Self::TECHNOLOGY_LABEL => BusinessType::Technology,
            other => BusinessType::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            BusinessType::LifeSciences => Self::LIFE_SCIENCES_LABEL,
            BusinessType::Technology => Self::TECHNOLOGY_LABEL,
            BusinessType::Other(label) => label,
        }
    }
}

impl fmt::Display for BusinessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for BusinessType {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// WGS84 coordinate pair.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite latitude within ±90 and longitude within ±180.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }
}

/// One cleaned, mappable row of the dataset.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CompanyRecord {
    pub id: RecordId,
    pub name: String,
    pub business_type: BusinessType,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
    pub description: Option<String>,
    pub website: Option<String>,
    pub year_established: Option<i32>,
    pub location: GeoPoint,
}

impl CompanyRecord {
    /// Street, city and "state zip" joined with commas, skipping empty parts.
    pub fn address_line(&self) -> String {
        let state_zip = format!("{} {}", self.state.trim(), self.zip_code.trim());
        [self.address.trim(), self.city.trim(), state_zip.trim()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A single cell of a raw row.
#[derive(Clone, Debug, PartialEq)]
pub enum RawValue {
    Empty,
    Text(String),
    Number(f64),
}

impl RawValue {
    /// Build a cell from CSV text; blank text counts as empty.
    pub fn from_cell(cell: &str) -> Self {
        if cell.trim().is_empty() {
            RawValue::Empty
        } else {
            RawValue::Text(cell.to_string())
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            RawValue::Empty => true,
            RawValue::Text(text) => text.trim().is_empty(),
            RawValue::Number(_) => false,
        }
    }

    /// Numeric view of the cell, if it holds or parses as a number.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            RawValue::Empty => None,
            RawValue::Number(value) => Some(*value),
            RawValue::Text(text) => text.trim().parse::<f64>().ok(),
        }
    }

    /// Text view of the cell; numbers are formatted, empty cells yield "".
    pub fn to_text(&self) -> String {
        match self {
            RawValue::Empty => String::new(),
            RawValue::Text(text) => text.clone(),
            RawValue::Number(value) => value.to_string(),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::from_cell(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        RawValue::Number(value)
    }
}

/// Column name to raw cell mapping for one source row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawRow {
    cells: BTreeMap<String, RawValue>,
}

impl RawRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Builder-style insert, handy for assembling rows by hand.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<RawValue>) -> Self {
        self.insert(column, value);
        self
    }

    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    /// Text of a column; absent and empty cells both yield "".
    pub fn text(&self, column: &str) -> String {
        self.get(column).map(RawValue::to_text).unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<K: Into<String>, V: Into<RawValue>> FromIterator<(K, V)> for RawRow {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = RawRow::new();
        for (column, value) in iter {
            row.insert(column, value);
        }
        row
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_type_maps_known_labels_and_keeps_others() {
        assert_eq!(
            BusinessType::from_label("Life Sciences"),
            BusinessType::LifeSciences
        );
        assert_eq!(
            BusinessType::from_label(" Technology "),
            BusinessType::Technology
        );
        let other = BusinessType::from_label("Consulting");
        assert_eq!(other, BusinessType::Other("Consulting".into()));
        assert_eq!(other.label(), "Consulting");
    }

    #[test]
    fn raw_value_parses_numbers_from_text() {
        assert_eq!(RawValue::from_cell(" 42.37 ").as_f64(), Some(42.37));
        assert_eq!(RawValue::from_cell("n/a").as_f64(), None);
        assert!(RawValue::from_cell("   ").is_empty());
        assert_eq!(RawValue::Number(-71.1).as_f64(), Some(-71.1));
    }

    #[test]
    fn address_line_skips_blank_parts() {
        let record = CompanyRecord {
            id: RecordId(0),
            name: "Acme".into(),
            business_type: BusinessType::Technology,
            address: "1 Main St".into(),
            city: "Cambridge".into(),
            state: "MA".into(),
            zip_code: "02139".into(),
            description: None,
            website: None,
            year_established: None,
            location: GeoPoint::new(42.37, -71.1),
        };
        assert_eq!(record.address_line(), "1 Main St, Cambridge, MA 02139");

        let sparse = CompanyRecord {
            address: String::new(),
            zip_code: String::new(),
            ..record
        };
        assert_eq!(sparse.address_line(), "Cambridge, MA");
    }
}
