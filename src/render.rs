//! Report card layout and artifact writing.
//!
//! Every report card is a single US Letter page with a fixed layout.  The
//! coordinates below are expressed in points from the top edge of the page and
//! converted to millimetres when the document is assembled.  Text positions
//! are baselines; the table position is its bottom edge.

use std::fmt;
use std::io::Write;
use std::path::{Path, PathBuf};

use genpdf::style::Color;
use genpdf::Mm;
use log::info;
use tempfile::NamedTempFile;

use crate::builder::DocumentBuilder;
use crate::elements::{mm_from_f64, FixedLayout, GridColumn, GridTable};
use crate::error::RenderError;
use crate::fonts::FontSource;
use crate::model::{Cell, ScoreSheet, StudentRecord};
use crate::richtext::Span;

/// Prefix of every report card file name.
pub const REPORT_FILE_PREFIX: &str = "report_card_";

/// Extension of every report card file name.
pub const REPORT_FILE_EXTENSION: &str = "pdf";

const MM_PER_POINT: f64 = 25.4 / 72.0;

const LEFT_PT: f64 = 100.0;
const HEADER_PT: f64 = 80.0;
const GENDER_PT: f64 = 120.0;
const AGE_PT: f64 = 140.0;
const SECTION_PT: f64 = 160.0;
const TOTAL_PT: f64 = 200.0;
const AVERAGE_PT: f64 = 220.0;
const TABLE_BOTTOM_PT: f64 = 320.0;
const SUBJECT_COLUMN_PT: f64 = 200.0;
const SCORE_COLUMN_PT: f64 = 100.0;
const CELL_PADDING_PT: f64 = 3.0;

const HEADER_FONT_SIZE: u8 = 16;
const BODY_FONT_SIZE: u8 = 12;
const TABLE_FONT_SIZE: u8 = 10;

const HEADER_COLOR: Color = Color::Rgb(0, 0, 139);
const TEXT_COLOR: Color = Color::Rgb(0, 0, 0);
const TABLE_HEADER_BACKGROUND: Color = Color::Rgb(128, 128, 128);
const TABLE_HEADER_TEXT: Color = Color::Rgb(255, 255, 255);
const TABLE_BORDER: Color = Color::Rgb(0, 0, 0);

fn pt(value: f64) -> Mm {
    mm_from_f64(value * MM_PER_POINT)
}

/// Returns the path of the report card of `record` inside `output_dir`.
///
/// The id is sanitized so that it always names a file directly inside
/// `output_dir`; ordinary ids are used verbatim.
pub fn report_card_path(output_dir: &Path, record: &StudentRecord) -> PathBuf {
    let id = sanitize_filename::sanitize(record.id_label());
    output_dir.join(format!(
        "{}{}.{}",
        REPORT_FILE_PREFIX, id, REPORT_FILE_EXTENSION
    ))
}

/// Builds the subject table in report order.
pub fn subject_table(scores: &ScoreSheet) -> GridTable {
    let mut table = GridTable::new(vec![
        GridColumn::new("Subject", pt(SUBJECT_COLUMN_PT)),
        GridColumn::new("Score", pt(SCORE_COLUMN_PT)),
    ])
    .with_header_background(TABLE_HEADER_BACKGROUND)
    .with_header_text(TABLE_HEADER_TEXT)
    .with_border(TABLE_BORDER)
    .with_padding(pt(CELL_PADDING_PT))
    .with_font_size(TABLE_FONT_SIZE);

    for (subject, score) in scores.rows() {
        table.push_row([subject.to_string(), Cell::Number(score).to_string()]);
    }
    table
}

fn detail(label: &str, value: impl fmt::Display) -> Span {
    Span::labelled(label, value)
        .sized(BODY_FONT_SIZE)
        .colored(TEXT_COLOR)
}

/// Lays out the report card of `record` on a single page.
pub fn report_card_layout(record: &StudentRecord, scores: &ScoreSheet) -> FixedLayout {
    let header = Span::new(format!(
        "Report Card - {} (ID: {})",
        record.name(),
        record.id()
    ))
    .bold()
    .sized(HEADER_FONT_SIZE)
    .colored(HEADER_COLOR);

    FixedLayout::new()
        .with_text(pt(LEFT_PT), pt(HEADER_PT), header)
        .with_text(pt(LEFT_PT), pt(GENDER_PT), detail("Gender", record.gender()))
        .with_text(pt(LEFT_PT), pt(AGE_PT), detail("Age", record.age()))
        .with_text(pt(LEFT_PT), pt(SECTION_PT), detail("Section", record.section()))
        .with_text(
            pt(LEFT_PT),
            pt(TOTAL_PT),
            detail("Total Score", Cell::Number(scores.total())),
        )
        .with_text(
            pt(LEFT_PT),
            pt(AVERAGE_PT),
            detail("Average Score", scores.formatted_average()),
        )
        .with_table(pt(LEFT_PT), pt(TABLE_BOTTOM_PT), subject_table(scores))
}

/// Renders the report card of `record` into PDF bytes.
pub fn render_report_card_bytes(
    record: &StudentRecord,
    fonts: &FontSource,
) -> Result<Vec<u8>, RenderError> {
    let scores = ScoreSheet::from_record(record)?;

    let mut document = DocumentBuilder::new()
        .with_title(format!("Report Card - {}", record.name()))
        .with_font_size(BODY_FONT_SIZE)
        .build(fonts);
    document.push(report_card_layout(record, &scores));

    let mut bytes = Vec::new();
    document.render(&mut bytes)?;
    Ok(bytes)
}

/// Renders the report card of `record` and writes it into `output_dir`.
///
/// An existing file with the same name is replaced.  The file only appears
/// under its final name once it has been written completely.
pub fn render_report_card(
    record: &StudentRecord,
    output_dir: &Path,
    fonts: &FontSource,
) -> Result<PathBuf, RenderError> {
    let bytes = render_report_card_bytes(record, fonts)?;
    let path = report_card_path(output_dir, record);

    write_atomically(output_dir, &path, &bytes).map_err(|source| RenderError::Io {
        path: path.clone(),
        source,
    })?;

    info!(
        "Wrote report card for {} ({} bytes) to {}",
        record.name(),
        bytes.len(),
        path.display()
    );
    Ok(path)
}

fn write_atomically(directory: &Path, path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = NamedTempFile::new_in(directory)?;
    file.write_all(bytes)?;
    file.as_file().sync_all()?;
    file.persist(path).map_err(|err| err.error)?;
    Ok(())
}
