//! Data structures describing the students read from a spreadsheet.
//!
//! Records keep their cells exactly as loaded.  Coercing the subject scores
//! into numbers is deferred to [`ScoreSheet::from_record`] so that a malformed
//! score only affects the report card of the student it belongs to.

use std::fmt;

use crate::error::RenderError;

/// Column names every input spreadsheet must provide.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    "id", "Name", "Gender", "Age", "Section", "Science", "English", "History", "Maths",
];

/// A single spreadsheet value.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum Cell {
    /// Missing value.
    #[default]
    Empty,
    /// Free-form text.
    Text(String),
    /// Numeric value; integers are stored as floats as well.
    Number(f64),
    /// Boolean value.
    Bool(bool),
}

impl Cell {
    /// Creates a text cell, mapping blank input to [`Cell::Empty`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Empty
        } else {
            Self::Text(value)
        }
    }

    /// Returns whether the cell counts as missing data.
    ///
    /// Whitespace-only text is treated as missing.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.trim().is_empty(),
            Self::Number(_) | Self::Bool(_) => false,
        }
    }

    /// Coerces the cell into a finite number, if possible.
    ///
    /// Text is trimmed and parsed, so `" 88 "` yields `88.0`.
    pub fn as_number(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => *value,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Empty | Self::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Text(text) => f.write_str(text.trim()),
            Self::Number(value) => write!(f, "{}", value),
            Self::Bool(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i32> for Cell {
    fn from(value: i32) -> Self {
        Self::Number(f64::from(value))
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for Cell {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// Subjects scored on every report card, in the order they are printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Subject {
    /// Science.
    Science,
    /// English.
    English,
    /// History.
    History,
    /// Maths.
    Maths,
}

impl Subject {
    /// All subjects in report order.
    pub const ALL: [Subject; 4] = [
        Subject::Science,
        Subject::English,
        Subject::History,
        Subject::Maths,
    ];

    /// Name of the spreadsheet column holding the subject score.
    pub fn column(self) -> &'static str {
        match self {
            Subject::Science => "Science",
            Subject::English => "English",
            Subject::History => "History",
            Subject::Maths => "Maths",
        }
    }

    fn index(self) -> usize {
        match self {
            Subject::Science => 0,
            Subject::English => 1,
            Subject::History => 2,
            Subject::Maths => 3,
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// One student's row of input data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StudentRecord {
    id: Cell,
    name: Cell,
    gender: Cell,
    age: Cell,
    section: Cell,
    scores: [Cell; 4],
}

impl StudentRecord {
    /// Creates a record with the given identity; all other cells start empty.
    pub fn new(id: impl Into<Cell>, name: impl Into<Cell>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the id cell.
    pub fn id(&self) -> &Cell {
        &self.id
    }

    /// Returns the id as printed on the report card and used in file names.
    pub fn id_label(&self) -> String {
        self.id.to_string()
    }

    /// Returns the name cell.
    pub fn name(&self) -> &Cell {
        &self.name
    }

    /// Returns the gender cell.
    pub fn gender(&self) -> &Cell {
        &self.gender
    }

    /// Returns the age cell.
    pub fn age(&self) -> &Cell {
        &self.age
    }

    /// Returns the section cell.
    pub fn section(&self) -> &Cell {
        &self.section
    }

    /// Returns the raw score cell of `subject`.
    pub fn score(&self, subject: Subject) -> &Cell {
        &self.scores[subject.index()]
    }

    /// Sets the gender and returns the updated record.
    pub fn with_gender(mut self, gender: impl Into<Cell>) -> Self {
        self.gender = gender.into();
        self
    }

    /// Sets the age and returns the updated record.
    pub fn with_age(mut self, age: impl Into<Cell>) -> Self {
        self.age = age.into();
        self
    }

    /// Sets the section and returns the updated record.
    pub fn with_section(mut self, section: impl Into<Cell>) -> Self {
        self.section = section.into();
        self
    }

    /// Sets the score of `subject` and returns the updated record.
    pub fn with_score(mut self, subject: Subject, score: impl Into<Cell>) -> Self {
        self.scores[subject.index()] = score.into();
        self
    }
}

/// Numeric scores of one student together with the derived total and average.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreSheet {
    scores: [f64; 4],
}

impl ScoreSheet {
    /// Coerces the score cells of `record`.
    ///
    /// Fails on the first subject, in report order, whose cell is not numeric.
    pub fn from_record(record: &StudentRecord) -> Result<Self, RenderError> {
        let mut scores = [0.0; 4];
        for subject in Subject::ALL {
            let cell = record.score(subject);
            scores[subject.index()] = cell.as_number().ok_or_else(|| RenderError::InvalidScore {
                subject,
                value: cell.to_string(),
            })?;
        }
        Ok(Self { scores })
    }

    /// Returns the score of `subject`.
    pub fn score(&self, subject: Subject) -> f64 {
        self.scores[subject.index()]
    }

    /// Iterates over the scores in report order.
    pub fn rows(&self) -> impl Iterator<Item = (Subject, f64)> + '_ {
        Subject::ALL
            .into_iter()
            .map(move |subject| (subject, self.score(subject)))
    }

    /// Sum of the four subject scores.
    pub fn total(&self) -> f64 {
        self.scores.iter().sum()
    }

    /// Total divided by the number of subjects.
    pub fn average(&self) -> f64 {
        self.total() / Subject::ALL.len() as f64
    }

    /// Average with exactly two decimal places, as printed on the report card.
    pub fn formatted_average(&self) -> String {
        format!("{:.2}", self.average())
    }
}

/// Ordered collection of records, one per spreadsheet data row.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Dataset {
    columns: Vec<String>,
    records: Vec<StudentRecord>,
}

impl Dataset {
    /// Creates a dataset from already validated parts.
    pub fn new(columns: Vec<String>, records: Vec<StudentRecord>) -> Self {
        Self { columns, records }
    }

    /// Header names as they appeared in the spreadsheet.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Records in spreadsheet row order.
    pub fn records(&self) -> &[StudentRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Iterates over the records in row order.
    pub fn iter(&self) -> std::slice::Iter<'_, StudentRecord> {
        self.records.iter()
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a StudentRecord;
    type IntoIter = std::slice::Iter<'a, StudentRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(science: impl Into<Cell>, english: impl Into<Cell>) -> StudentRecord {
        StudentRecord::new(1, "Ada")
            .with_score(Subject::Science, science)
            .with_score(Subject::English, english)
            .with_score(Subject::History, 75)
            .with_score(Subject::Maths, 85)
    }

    #[test]
    fn total_and_average_use_all_four_subjects() {
        let sheet = ScoreSheet::from_record(&record(80, 80)).expect("numeric scores");
        assert_eq!(sheet.total(), 320.0);
        assert_eq!(sheet.average(), 80.0);
        assert_eq!(sheet.formatted_average(), "80.00");
    }

    #[test]
    fn average_is_rounded_to_two_places() {
        let sheet = ScoreSheet::from_record(&record(90.5, 71)).expect("numeric scores");
        assert_eq!(sheet.total(), 321.5);
        assert_eq!(sheet.formatted_average(), "80.38");
    }

    #[test]
    fn numeric_text_is_coerced() {
        let sheet = ScoreSheet::from_record(&record(" 91 ", "64.5")).expect("numeric text");
        assert_eq!(sheet.score(Subject::Science), 91.0);
        assert_eq!(sheet.score(Subject::English), 64.5);
    }

    #[test]
    fn non_numeric_score_is_rejected() {
        let err = ScoreSheet::from_record(&record(80, "excellent")).unwrap_err();
        match err {
            RenderError::InvalidScore { subject, value } => {
                assert_eq!(subject, Subject::English);
                assert_eq!(value, "excellent");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn non_finite_and_boolean_scores_are_rejected() {
        assert!(ScoreSheet::from_record(&record("NaN", 70)).is_err());
        assert!(ScoreSheet::from_record(&record(true, 70)).is_err());
    }

    #[test]
    fn rows_follow_report_order() {
        let sheet = ScoreSheet::from_record(&record(1, 2)).expect("numeric scores");
        let subjects: Vec<_> = sheet.rows().map(|(subject, _)| subject).collect();
        assert_eq!(subjects, Subject::ALL.to_vec());
        let scores: Vec<_> = sheet.rows().map(|(_, score)| score).collect();
        assert_eq!(scores, vec![1.0, 2.0, 75.0, 85.0]);
    }

    #[test]
    fn cells_display_like_the_spreadsheet() {
        assert_eq!(Cell::Number(15.0).to_string(), "15");
        assert_eq!(Cell::Number(85.5).to_string(), "85.5");
        assert_eq!(Cell::text("  B ").to_string(), "B");
        assert_eq!(Cell::text("   "), Cell::Empty);
        assert!(Cell::Text(" ".into()).is_empty());
        assert!(!Cell::Bool(false).is_empty());
    }
}
