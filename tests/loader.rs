use std::path::PathBuf;

use report_cards::loader::{load_dataset, LoadOptions};
use report_cards::model::{Cell, ScoreSheet, Subject};
use report_cards::LoadError;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[test]
fn loads_first_worksheet_regardless_of_column_order() {
    let dataset =
        load_dataset(fixture("students.xlsx"), &LoadOptions::new()).expect("load fixture");

    assert_eq!(dataset.len(), 2);
    assert!(dataset.columns().iter().any(|column| column == "Notes"));

    let ada = &dataset.records()[0];
    assert_eq!(ada.id_label(), "1");
    assert_eq!(ada.name(), &Cell::from("Ada Lovelace"));
    assert_eq!(ada.gender().to_string(), "F");
    assert_eq!(ada.age().to_string(), "15");
    assert_eq!(ada.section().to_string(), "A");
    assert_eq!(ada.score(Subject::Maths).as_number(), Some(90.0));

    let scores = ScoreSheet::from_record(&dataset.records()[1]).expect("numeric scores");
    assert_eq!(scores.score(Subject::History), 70.25);
    assert_eq!(scores.total(), 334.25);
    assert_eq!(scores.formatted_average(), "83.56");
}

#[test]
fn named_worksheet_is_selected() {
    let options = LoadOptions::new().with_sheet(Some("Term 2".to_string()));
    let dataset = load_dataset(fixture("students.xlsx"), &options).expect("load fixture");

    let ids: Vec<_> = dataset.iter().map(|record| record.id_label()).collect();
    assert_eq!(ids, vec!["3"]);
}

#[test]
fn unknown_worksheet_lists_available_sheets() {
    let options = LoadOptions::new().with_sheet(Some("Term 3".to_string()));
    let err = load_dataset(fixture("students.xlsx"), &options).unwrap_err();

    match err {
        LoadError::SheetNotFound { name, available } => {
            assert_eq!(name, "Term 3");
            assert_eq!(available, vec!["Term 1", "Term 2"]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_file_is_reported_as_io_error() {
    let err = load_dataset(fixture("absent.xlsx"), &LoadOptions::new()).unwrap_err();
    assert!(matches!(err, LoadError::Io { .. }), "got {err:?}");
}
