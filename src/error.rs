//! Error types shared by the loader, the renderer and the batch runner.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::Subject;

/// Failures that prevent a spreadsheet from being turned into a dataset.
///
/// Every variant is batch-fatal: when loading fails no report card is produced.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The input file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// Path of the spreadsheet.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The workbook could not be opened or a worksheet could not be parsed.
    #[error("failed to read workbook {}", path.display())]
    Workbook {
        /// Path of the workbook.
        path: PathBuf,
        /// Error reported by `calamine`.
        #[source]
        source: calamine::Error,
    },

    /// The CSV file could not be parsed.
    #[error("failed to parse CSV file {}", path.display())]
    Csv {
        /// Path of the CSV file.
        path: PathBuf,
        /// Error reported by the `csv` reader.
        #[source]
        source: csv::Error,
    },

    /// The file extension does not name a supported spreadsheet format.
    #[error(
        "unsupported spreadsheet format for {}; expected .xlsx, .xlsm, .xlsb, .xls, .ods or .csv",
        path.display()
    )]
    UnsupportedFormat {
        /// Path of the rejected file.
        path: PathBuf,
    },

    /// The requested worksheet does not exist in the workbook.
    #[error("worksheet '{name}' not found; available sheets: {}", available.join(", "))]
    SheetNotFound {
        /// Requested worksheet name.
        name: String,
        /// Worksheets present in the workbook.
        available: Vec<String>,
    },

    /// The workbook has no worksheet to read from.
    #[error("workbook {} contains no worksheets", path.display())]
    NoWorksheets {
        /// Path of the workbook.
        path: PathBuf,
    },

    /// The sheet does not even contain a header row.
    #[error("the spreadsheet is empty; expected a header row")]
    EmptySheet,

    /// One or more required columns are absent from the header row.
    #[error(
        "the spreadsheet must contain the columns: id, Name, Gender, Age, Section, Science, English, History, Maths (missing: {})",
        missing.join(", ")
    )]
    MissingColumns {
        /// Required column names that were not found, in canonical order.
        missing: Vec<String>,
    },

    /// A cell somewhere in the dataset is empty.
    #[error(
        "the spreadsheet contains missing data at row {row}, column '{column}'; please clean the data and try again"
    )]
    IncompleteData {
        /// Spreadsheet row number (1-based, header included).
        row: usize,
        /// Header of the column holding the empty cell.
        column: String,
    },
}

/// Failures while producing a single report card.
///
/// These are record-local: the batch reports them and moves on to the next record.
#[derive(Debug, Error)]
pub enum RenderError {
    /// A subject score could not be coerced into a number.
    #[error("{subject} score '{value}' is not a number")]
    InvalidScore {
        /// Subject whose score is malformed.
        subject: Subject,
        /// The offending cell, as displayed.
        value: String,
    },

    /// `genpdf` failed while laying out or serializing the document.
    #[error("failed to render PDF document")]
    Pdf(#[from] genpdf::error::Error),

    /// The rendered document could not be written to disk.
    #[error("failed to write {}", path.display())]
    Io {
        /// Destination of the report card.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

/// Failures that abort a whole batch before any report card is written.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The output directory could not be created.
    #[error("failed to create output directory {}", path.display())]
    OutputDirectory {
        /// Requested output directory.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The input spreadsheet failed to load or validate.
    #[error("error loading file {}", path.display())]
    Load {
        /// Path of the spreadsheet.
        path: PathBuf,
        /// Loader failure.
        #[source]
        source: LoadError,
    },

    /// No usable font family could be found for rendering.
    #[error("no usable font family for rendering report cards")]
    Fonts(#[source] genpdf::error::Error),
}
