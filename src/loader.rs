//! Spreadsheet loading and validation.
//!
//! A spreadsheet is read into a [`Table`] of raw cells first, then validated
//! and converted into a [`Dataset`].  Workbooks (`.xlsx`, `.xlsm`, `.xlsb`,
//! `.xls`, `.ods`) are read with `calamine`, comma separated files with the
//! `csv` crate.  In both cases the first row is the header row and column order
//! does not matter.

use std::fs;
use std::mem;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};
use log::debug;

use crate::error::LoadError;
use crate::model::{Cell, Dataset, StudentRecord, Subject, REQUIRED_COLUMNS};

/// Options that influence how a spreadsheet is read.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoadOptions {
    sheet: Option<String>,
}

impl LoadOptions {
    /// Creates options that read the first worksheet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the worksheet to read, if one was requested.
    pub fn sheet(&self) -> Option<&str> {
        self.sheet.as_deref()
    }

    /// Selects the worksheet by name and returns the updated options.
    ///
    /// Ignored for CSV input.
    pub fn with_sheet(mut self, sheet: impl Into<Option<String>>) -> Self {
        self.sheet = sheet.into();
        self
    }
}

/// Spreadsheet formats understood by the loader.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SourceFormat {
    /// Excel or OpenDocument workbook.
    Workbook,
    /// Comma separated values.
    Csv,
}

impl SourceFormat {
    /// Detects the format from the file extension (case-insensitive).
    pub fn detect(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            "csv" => Some(Self::Csv),
            _ => None,
        }
    }
}

/// Position of each required column, in [`REQUIRED_COLUMNS`] order.
type ColumnIndices = [usize; REQUIRED_COLUMNS.len()];

/// Header and body cells of a sheet, before validation.
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    rows: Vec<Vec<Cell>>,
    header_row: usize,
}

impl Table {
    /// Creates a table whose header sits on spreadsheet row 1.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<Cell>>) -> Self {
        Self {
            headers,
            rows,
            header_row: 1,
        }
    }

    /// Sets the spreadsheet row number of the header, used in error messages.
    pub fn with_header_row(mut self, header_row: usize) -> Self {
        self.header_row = header_row;
        self
    }

    /// Returns the trimmed header names.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Returns the body rows.
    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Validates the table and converts it into a dataset.
    ///
    /// Fails with [`LoadError::MissingColumns`] when a required column is absent
    /// and with [`LoadError::IncompleteData`] when any cell of any column is
    /// empty.  Blank rows at the end of the sheet are not data rows.
    pub fn into_dataset(self) -> Result<Dataset, LoadError> {
        let Table {
            headers,
            mut rows,
            header_row,
        } = self;

        if headers.iter().all(|header| header.is_empty()) {
            return Err(LoadError::EmptySheet);
        }

        let mut indices: ColumnIndices = [0; REQUIRED_COLUMNS.len()];
        let mut missing = Vec::new();
        for (slot, name) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            match headers.iter().position(|header| header == name) {
                Some(index) => *slot = index,
                None => missing.push(name.to_owned()),
            }
        }
        if !missing.is_empty() {
            return Err(LoadError::MissingColumns { missing });
        }

        while rows
            .last()
            .is_some_and(|row| row.iter().all(Cell::is_empty))
        {
            rows.pop();
        }

        for (offset, row) in rows.iter().enumerate() {
            for (column, header) in headers.iter().enumerate() {
                if row.get(column).map_or(true, Cell::is_empty) {
                    return Err(LoadError::IncompleteData {
                        row: header_row + offset + 1,
                        column: header.clone(),
                    });
                }
            }
        }

        let records = rows
            .into_iter()
            .map(|row| record_from_row(row, &indices))
            .collect();
        Ok(Dataset::new(headers, records))
    }
}

fn record_from_row(mut row: Vec<Cell>, indices: &ColumnIndices) -> StudentRecord {
    let [id, name, gender, age, section, science, english, history, maths] = *indices;
    let mut take = |index: usize| mem::take(&mut row[index]);

    StudentRecord::new(take(id), take(name))
        .with_gender(take(gender))
        .with_age(take(age))
        .with_section(take(section))
        .with_score(Subject::Science, take(science))
        .with_score(Subject::English, take(english))
        .with_score(Subject::History, take(history))
        .with_score(Subject::Maths, take(maths))
}

/// Loads and validates the spreadsheet at `path`.
///
/// An `Err` is the "no dataset" signal: callers must not render anything when
/// loading fails.
pub fn load_dataset(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Dataset, LoadError> {
    let path = path.as_ref();
    let dataset = read_table(path, options)?.into_dataset()?;
    debug!(
        "Loaded {} student records from {}",
        dataset.len(),
        path.display()
    );
    Ok(dataset)
}

/// Reads the raw table of the spreadsheet at `path` without validating it.
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<Table, LoadError> {
    let format = SourceFormat::detect(path).ok_or_else(|| LoadError::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;

    fs::metadata(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    match format {
        SourceFormat::Workbook => read_workbook(path, options.sheet()),
        SourceFormat::Csv => read_csv(path),
    }
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table, LoadError> {
    let workbook_error = |source| LoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_error)?;
    let range = match sheet {
        Some(name) => {
            let available = workbook.sheet_names();
            if !available.iter().any(|candidate| candidate == name) {
                return Err(LoadError::SheetNotFound {
                    name: name.to_owned(),
                    available,
                });
            }
            workbook.worksheet_range(name).map_err(workbook_error)?
        }
        None => workbook
            .worksheet_range_at(0)
            .ok_or_else(|| LoadError::NoWorksheets {
                path: path.to_path_buf(),
            })?
            .map_err(workbook_error)?,
    };

    Ok(table_from_range(&range))
}

fn table_from_range(range: &Range<Data>) -> Table {
    let header_row = range
        .start()
        .map(|(row, _)| row as usize + 1)
        .unwrap_or(1);

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|header| {
            header
                .iter()
                .map(|data| cell_from_data(data).to_string())
                .collect()
        })
        .unwrap_or_default();
    let body: Vec<Vec<Cell>> = rows
        .map(|row| row.iter().map(cell_from_data).collect())
        .collect();

    Table::new(headers, body).with_header_row(header_row)
}

/// Error cells such as `#N/A` count as missing data.
fn cell_from_data(data: &Data) -> Cell {
    match data {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(text) => Cell::text(text.as_str()),
        Data::Float(value) => Cell::Number(*value),
        Data::Int(value) => Cell::from(*value),
        Data::Bool(value) => Cell::Bool(*value),
        other => Cell::text(other.to_string()),
    }
}

fn read_csv(path: &Path) -> Result<Table, LoadError> {
    let csv_error = |source| LoadError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .map_err(csv_error)?;
    let headers: Vec<String> = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .map(|header| header.trim().to_owned())
        .collect();

    let mut rows: Vec<Vec<Cell>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(csv_error)?;
        rows.push(record.iter().map(Cell::text).collect());
    }

    Ok(Table::new(headers, rows))
}
