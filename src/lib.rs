//! Batch generation of PDF report cards from student spreadsheets.
//!
//! A run loads every student row from an `.xlsx` (or other calamine supported
//! workbook, or CSV) file, then writes one single page PDF per student into an
//! output directory.  See [`batch::run_batch`] for the entry point.

pub mod batch;
pub mod builder;
pub mod elements;
pub mod error;
pub mod fonts;
pub mod loader;
pub mod model;
pub mod render;
pub mod richtext;

pub use batch::{
    render_dataset, render_dataset_with, run_batch, run_batch_with, BatchConfig, BatchSummary,
    RecordOutcome,
};
pub use error::{BatchError, LoadError, RenderError};
pub use loader::{load_dataset, LoadOptions};
pub use model::{Cell, Dataset, ScoreSheet, StudentRecord, Subject};
pub use render::{render_report_card, render_report_card_bytes, report_card_path};
