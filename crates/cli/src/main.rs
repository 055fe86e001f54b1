use std::error::Error;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use report_cards::batch::{
    self, BatchConfig, BatchSummary, RecordOutcome, DEFAULT_INPUT_PATH, DEFAULT_OUTPUT_DIRECTORY,
};

/// Exit status used when at least one report card could not be generated.
const EXIT_RECORD_FAILURES: i32 = 2;

/// Generates one PDF report card per student listed in a spreadsheet.
///
/// The spreadsheet needs the columns id, Name, Gender, Age, Section, Science,
/// English, History and Maths in any order.  Set `RUST_LOG=info` for progress
/// logging.
#[derive(Debug, Parser)]
#[command(name = "report-cards", author, version, about)]
struct Cli {
    /// Spreadsheet to read (.xlsx, .xlsm, .xlsb, .xls, .ods or .csv).
    #[arg(env = "REPORT_CARDS_INPUT", default_value = DEFAULT_INPUT_PATH)]
    input: PathBuf,

    /// Directory the report cards are written to; created when missing.
    #[arg(
        short,
        long,
        env = "REPORT_CARDS_OUTPUT_DIR",
        default_value = DEFAULT_OUTPUT_DIRECTORY
    )]
    output_dir: PathBuf,

    /// Worksheet to read instead of the first one.
    #[arg(long, env = "REPORT_CARDS_SHEET")]
    sheet: Option<String>,

    /// Directory holding the LiberationSans font files.
    #[arg(long, env = "REPORT_CARDS_FONTS_DIR")]
    fonts_dir: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> BatchConfig {
        BatchConfig::new()
            .with_input_path(self.input)
            .with_output_directory(self.output_dir)
            .with_sheet(self.sheet)
            .with_fonts_dir(self.fonts_dir)
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let config = Cli::parse().into_config();

    match batch::run_batch_with(&config, print_outcome) {
        Ok(summary) => {
            print_summary(&summary);
            if !summary.is_success() {
                process::exit(EXIT_RECORD_FAILURES);
            }
        }
        Err(err) => {
            for line in error_lines(&err) {
                println!("{}", line);
            }
            process::exit(1);
        }
    }
}

fn print_outcome(outcome: &RecordOutcome) {
    println!("{}", outcome_line(outcome));
}

fn outcome_line(outcome: &RecordOutcome) -> String {
    match &outcome.result {
        Ok(path) => format!(
            "Report card for {} saved at {}",
            outcome.name,
            path.display()
        ),
        Err(err) => format!(
            "Error generating report card for ID {}: {}",
            outcome.id, err
        ),
    }
}

fn print_summary(summary: &BatchSummary) {
    println!(
        "{} of {} report cards generated.",
        summary.succeeded(),
        summary.total()
    );
}

fn error_lines(error: &(dyn Error + 'static)) -> Vec<String> {
    let mut lines = vec![format!("Error: {}", error)];
    let mut current = error;
    while let Some(source) = current.source() {
        lines.push(format!("  caused by: {}", source));
        current = source;
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use report_cards::{BatchError, LoadError, RenderError, Subject};

    #[test]
    fn command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn flags_map_onto_the_batch_config() {
        let cli = Cli::try_parse_from([
            "report-cards",
            "scores.csv",
            "-o",
            "out",
            "--sheet",
            "Term 1",
            "--fonts-dir",
            "fonts",
        ])
        .expect("valid arguments");

        let config = cli.into_config();
        assert_eq!(config.input_path, PathBuf::from("scores.csv"));
        assert_eq!(config.output_directory, PathBuf::from("out"));
        assert_eq!(config.sheet.as_deref(), Some("Term 1"));
        assert_eq!(config.fonts_dir, Some(PathBuf::from("fonts")));
    }

    #[test]
    fn outcome_lines_name_the_student_or_the_id() {
        let saved = RecordOutcome {
            id: "1".to_string(),
            name: "Ada".to_string(),
            result: Ok(PathBuf::from("report_cards/report_card_1.pdf")),
        };
        assert_eq!(
            outcome_line(&saved),
            "Report card for Ada saved at report_cards/report_card_1.pdf"
        );

        let failed = RecordOutcome {
            id: "2".to_string(),
            name: "Bo".to_string(),
            result: Err(RenderError::InvalidScore {
                subject: Subject::English,
                value: "abc".to_string(),
            }),
        };
        assert_eq!(
            outcome_line(&failed),
            "Error generating report card for ID 2: English score 'abc' is not a number"
        );
    }

    #[test]
    fn fatal_errors_list_every_cause() {
        let err = BatchError::Load {
            path: PathBuf::from("student_scores.xlsx"),
            source: LoadError::MissingColumns {
                missing: vec!["Maths".to_string()],
            },
        };
        let lines = error_lines(&err);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "Error: error loading file student_scores.xlsx");
        assert!(lines[1].starts_with("  caused by: the spreadsheet must contain the columns"));
        assert!(lines[1].ends_with("(missing: Maths)"));
    }
}
