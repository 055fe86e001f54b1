use std::fs;
use std::path::{Path, PathBuf};

use report_cards::batch::{run_batch, run_batch_with, BatchConfig};
use report_cards::fonts;
use report_cards::{BatchError, LoadError, RenderError};

const HEADER: &str = "id,Name,Gender,Age,Section,Science,English,History,Maths";

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

fn write_csv(dir: &Path, lines: &[&str]) -> PathBuf {
    let path = dir.join("students.csv");
    fs::write(&path, lines.join("\n")).expect("write csv");
    path
}

fn pdf_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .expect("list output directory")
        .map(|entry| {
            entry
                .expect("directory entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

fn fonts_missing(test: &str) -> bool {
    if fonts::fonts_available(None) {
        return false;
    }
    eprintln!(
        "Skipping {}: no usable fonts found. Set REPORT_CARDS_FONTS_DIR or copy assets/fonts next to the binary.",
        test
    );
    true
}

#[test]
fn writes_one_report_card_per_student() {
    if fonts_missing("writes_one_report_card_per_student") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let output = dir.path().join("nested/report_cards");
    let config = BatchConfig::new()
        .with_input_path(fixture("students.xlsx"))
        .with_output_directory(&output);

    let summary = run_batch(&config).expect("batch runs");
    assert!(summary.is_success());
    assert_eq!(summary.total(), 2);
    assert_eq!(
        pdf_names(&output),
        vec!["report_card_1.pdf", "report_card_2.pdf"]
    );

    let names: Vec<_> = summary
        .outcomes()
        .iter()
        .map(|outcome| outcome.name.as_str())
        .collect();
    assert_eq!(names, vec!["Ada Lovelace", "Alan Turing"]);

    let rerun = run_batch(&config).expect("batch reruns");
    assert_eq!(rerun.succeeded(), 2);
    assert_eq!(
        pdf_names(&output),
        vec!["report_card_1.pdf", "report_card_2.pdf"]
    );
    for path in rerun.artifacts() {
        let bytes = fs::read(path).expect("read report card");
        assert!(bytes.starts_with(b"%PDF"), "{} is not a PDF", path.display());
    }
}

#[test]
fn invalid_score_only_skips_that_student() {
    if fonts_missing("invalid_score_only_skips_that_student") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(
        dir.path(),
        &[
            HEADER,
            "1,Ada,F,15,A,80,72,64,90",
            "2,Bo,M,16,B,70,abc,60,50",
            "3,Cy,M,15,A,55,65,75,85",
        ],
    );
    let output = dir.path().join("out");

    let summary = run_batch(
        &BatchConfig::new()
            .with_input_path(input)
            .with_output_directory(&output),
    )
    .expect("batch runs");

    assert_eq!(summary.total(), 3);
    assert_eq!(summary.succeeded(), 2);
    assert!(!summary.is_success());

    let failures: Vec<_> = summary.failures().collect();
    assert_eq!(failures.len(), 1);
    assert_eq!(failures[0].0, "2");
    assert!(matches!(failures[0].1, RenderError::InvalidScore { .. }));

    assert_eq!(
        pdf_names(&output),
        vec!["report_card_1.pdf", "report_card_3.pdf"]
    );
}

#[test]
fn missing_column_aborts_before_rendering() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(
        dir.path(),
        &[
            "id,Name,Gender,Age,Section,Science,English,History",
            "1,Ada,F,15,A,80,72,64",
        ],
    );
    let output = dir.path().join("out");

    let err = run_batch(
        &BatchConfig::new()
            .with_input_path(&input)
            .with_output_directory(&output),
    )
    .unwrap_err();

    match err {
        BatchError::Load { path, source } => {
            assert_eq!(path, input);
            match source {
                LoadError::MissingColumns { missing } => assert_eq!(missing, vec!["Maths"]),
                other => panic!("unexpected load error: {other}"),
            }
        }
        other => panic!("unexpected batch error: {other}"),
    }
    assert!(output.is_dir(), "output directory is created first");
    assert!(pdf_names(&output).is_empty());
}

#[test]
fn empty_cell_fails_the_whole_batch() {
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(
        dir.path(),
        &[
            HEADER,
            "1,Ada,F,15,A,80,72,64,90",
            "2,Bo,M,16,B,,60,60,50",
        ],
    );
    let output = dir.path().join("out");

    let err = run_batch(
        &BatchConfig::new()
            .with_input_path(&input)
            .with_output_directory(&output),
    )
    .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("error loading file {}", input.display())
    );
    assert!(matches!(
        err,
        BatchError::Load {
            source: LoadError::IncompleteData { row: 3, ref column },
            ..
        } if column == "Science"
    ));
    assert!(pdf_names(&output).is_empty());
}

#[test]
fn header_only_sheet_produces_nothing() {
    if fonts_missing("header_only_sheet_produces_nothing") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(dir.path(), &[HEADER]);
    let output = dir.path().join("out");

    let summary = run_batch(
        &BatchConfig::new()
            .with_input_path(input)
            .with_output_directory(&output),
    )
    .expect("batch runs");

    assert_eq!(summary.total(), 0);
    assert!(summary.is_success());
    assert!(pdf_names(&output).is_empty());
}

#[test]
fn outcomes_are_reported_as_each_card_is_written() {
    if fonts_missing("outcomes_are_reported_as_each_card_is_written") {
        return;
    }
    let dir = tempfile::tempdir().expect("temp dir");
    let input = write_csv(
        dir.path(),
        &[
            HEADER,
            "1,Ada,F,15,A,80,72,64,90",
            "2,Bo,M,16,B,70,abc,60,50",
            "3,Cy,M,15,A,55,65,75,85",
        ],
    );
    let output = dir.path().join("out");

    let mut reported = Vec::new();
    let summary = run_batch_with(
        &BatchConfig::new()
            .with_input_path(input)
            .with_output_directory(&output),
        |outcome| {
            let written = outcome
                .result
                .as_ref()
                .map(|path| path.is_file())
                .unwrap_or(false);
            reported.push((outcome.id.clone(), written, pdf_names(&output).len()));
        },
    )
    .expect("batch runs");

    assert_eq!(summary.total(), 3);
    assert_eq!(
        reported,
        vec![
            ("1".to_string(), true, 1),
            ("2".to_string(), false, 1),
            ("3".to_string(), true, 2),
        ]
    );
}
