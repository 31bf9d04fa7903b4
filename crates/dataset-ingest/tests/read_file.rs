use std::io::Write;

use atlas_core::{RecordStore, record::columns};
use dataset_ingest::{IngestError, read_rows};

#[test]
fn reads_dataset_file_into_store() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "Business Name,Business Type,Address,City,State,Zip Code,Business Description,Website,Year Established,Longitude,Latitude"
    )
    .unwrap();
    writeln!(
        file,
        "BioGenix Labs,Life Sciences,1 Kendall Sq,Cambridge,MA,02139,Gene editing,biogenix.example,2001,-71.0905,42.3663"
    )
    .unwrap();
    writeln!(file, "Nowhere Inc,Technology,,,,,,,,0,0").unwrap();
    file.flush().unwrap();

    let rows = read_rows(file.path()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].text(columns::CITY), "Cambridge");

    let store = RecordStore::from_rows(rows);
    assert_eq!(store.len(), 1);
    assert_eq!(store.dropped(), 1);
    assert_eq!(
        store.records()[0].website.as_deref(),
        Some("https://biogenix.example")
    );
}

#[test]
fn missing_file_is_an_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = read_rows(&dir.path().join("absent.csv")).unwrap_err();
    assert!(matches!(err, IngestError::Open { .. }));
    assert!(err.to_string().contains("absent.csv"));
}
