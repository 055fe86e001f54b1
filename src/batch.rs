//! Batch orchestration: load every record once, then render each one.
//!
//! Loading is all-or-nothing.  Rendering is per record: a failing record is
//! reported in the [`BatchSummary`] and the remaining records are still
//! processed.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::error::{BatchError, RenderError};
use crate::fonts::FontSource;
use crate::loader::{self, LoadOptions};
use crate::model::{Dataset, StudentRecord};
use crate::render;

/// Input spreadsheet read when no path is configured.
pub const DEFAULT_INPUT_PATH: &str = "student_scores.xlsx";

/// Directory report cards are written to when none is configured.
pub const DEFAULT_OUTPUT_DIRECTORY: &str = "report_cards";

/// Settings of one batch run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchConfig {
    /// Spreadsheet holding one row per student.
    pub input_path: PathBuf,
    /// Directory receiving the report cards; created when missing.
    pub output_directory: PathBuf,
    /// Worksheet to read; the first worksheet when `None`.
    pub sheet: Option<String>,
    /// Directory searched first for the font family.
    pub fonts_dir: Option<PathBuf>,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_directory: PathBuf::from(DEFAULT_OUTPUT_DIRECTORY),
            sheet: None,
            fonts_dir: None,
        }
    }
}

impl BatchConfig {
    /// Creates a configuration with the default input and output locations.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input spreadsheet and returns the updated configuration.
    pub fn with_input_path(mut self, input_path: impl Into<PathBuf>) -> Self {
        self.input_path = input_path.into();
        self
    }

    /// Sets the output directory and returns the updated configuration.
    pub fn with_output_directory(mut self, output_directory: impl Into<PathBuf>) -> Self {
        self.output_directory = output_directory.into();
        self
    }

    /// Selects the worksheet and returns the updated configuration.
    pub fn with_sheet(mut self, sheet: impl Into<Option<String>>) -> Self {
        self.sheet = sheet.into();
        self
    }

    /// Sets the font directory override and returns the updated configuration.
    pub fn with_fonts_dir(mut self, fonts_dir: impl Into<Option<PathBuf>>) -> Self {
        self.fonts_dir = fonts_dir.into();
        self
    }

    fn load_options(&self) -> LoadOptions {
        LoadOptions::new().with_sheet(self.sheet.clone())
    }
}

/// Outcome of rendering a single record.
#[derive(Debug)]
pub struct RecordOutcome {
    /// Student id as printed on the report card.
    pub id: String,
    /// Student name.
    pub name: String,
    /// Path of the written report card, or why it could not be produced.
    pub result: Result<PathBuf, RenderError>,
}

impl RecordOutcome {
    fn new(record: &StudentRecord, result: Result<PathBuf, RenderError>) -> Self {
        Self {
            id: record.id_label(),
            name: record.name().to_string(),
            result,
        }
    }

    /// Returns whether the report card was written.
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Per-record outcomes of a batch, in dataset order.
#[derive(Debug, Default)]
pub struct BatchSummary {
    outcomes: Vec<RecordOutcome>,
}

impl BatchSummary {
    /// Returns every outcome in dataset order.
    pub fn outcomes(&self) -> &[RecordOutcome] {
        &self.outcomes
    }

    /// Number of processed records.
    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    /// Number of report cards written.
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|outcome| outcome.is_success()).count()
    }

    /// Paths of the written report cards, in dataset order.
    pub fn artifacts(&self) -> impl Iterator<Item = &Path> + '_ {
        self.outcomes
            .iter()
            .filter_map(|outcome| outcome.result.as_ref().ok())
            .map(PathBuf::as_path)
    }

    /// Ids and reasons of the records that failed, in dataset order.
    pub fn failures(&self) -> impl Iterator<Item = (&str, &RenderError)> + '_ {
        self.outcomes.iter().filter_map(|outcome| match &outcome.result {
            Ok(_) => None,
            Err(err) => Some((outcome.id.as_str(), err)),
        })
    }

    /// Returns whether every record produced a report card.
    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(RecordOutcome::is_success)
    }
}

/// Runs a whole batch as described by `config`.
///
/// The output directory is created first, then the spreadsheet is loaded.  Any
/// failure up to this point, or failing to find fonts, aborts the run before a
/// single report card is written.  Afterwards every record is rendered
/// independently.
pub fn run_batch(config: &BatchConfig) -> Result<BatchSummary, BatchError> {
    run_batch_with(config, |_| {})
}

/// Like [`run_batch`], but hands every outcome to `on_outcome` as soon as the
/// record has been processed.
pub fn run_batch_with<F>(config: &BatchConfig, on_outcome: F) -> Result<BatchSummary, BatchError>
where
    F: FnMut(&RecordOutcome),
{
    fs::create_dir_all(&config.output_directory).map_err(|source| {
        BatchError::OutputDirectory {
            path: config.output_directory.clone(),
            source,
        }
    })?;

    let dataset = loader::load_dataset(&config.input_path, &config.load_options()).map_err(
        |source| {
            debug!(
                "Failed to load {}: {}",
                config.input_path.display(),
                source
            );
            BatchError::Load {
                path: config.input_path.clone(),
                source,
            }
        },
    )?;

    let fonts = FontSource::resolve(config.fonts_dir.as_deref()).map_err(|err| {
        debug!("Failed to resolve fonts: {}", err);
        BatchError::Fonts(err)
    })?;
    debug!("Rendering with {}", fonts.description());

    Ok(render_dataset_with(
        &dataset,
        &config.output_directory,
        &fonts,
        on_outcome,
    ))
}

/// Renders every record of `dataset` into `output_dir`.
///
/// Records are processed in order and independently of each other.
pub fn render_dataset(dataset: &Dataset, output_dir: &Path, fonts: &FontSource) -> BatchSummary {
    render_dataset_with(dataset, output_dir, fonts, |_| {})
}

/// Like [`render_dataset`], but hands every outcome to `on_outcome` right
/// after its record has been processed.
pub fn render_dataset_with<F>(
    dataset: &Dataset,
    output_dir: &Path,
    fonts: &FontSource,
    mut on_outcome: F,
) -> BatchSummary
where
    F: FnMut(&RecordOutcome),
{
    let mut outcomes = Vec::with_capacity(dataset.len());
    for record in dataset {
        let result = render::render_report_card(record, output_dir, fonts);
        if let Err(err) = &result {
            debug!(
                "Error generating report card for ID {}: {}",
                record.id(),
                err
            );
        }
        let outcome = RecordOutcome::new(record, result);
        on_outcome(&outcome);
        outcomes.push(outcome);
    }

    let summary = BatchSummary { outcomes };
    info!(
        "Generated {} of {} report cards in {}",
        summary.succeeded(),
        summary.total(),
        output_dir.display()
    );
    summary
}
