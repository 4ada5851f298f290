//! CSV and TSV sweep reports
//!
//! Both formats share the header `M,Status,Witness,Proof` (tab-separated
//! for TSV). A field is double-quoted when it contains the delimiter, a
//! quote or a line break, with embedded quotes doubled.

use crate::result::ModulusOutcome;
use std::borrow::Cow;

pub const HEADER: [&str; 4] = ["M", "Status", "Witness", "Proof"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Tsv,
}

impl ReportFormat {
    pub fn delimiter(self) -> char {
        match self {
            ReportFormat::Csv => ',',
            ReportFormat::Tsv => '\t',
        }
    }
}

/// Quote `field` if it would otherwise break the row
pub fn quote_field(field: &str, delimiter: char) -> Cow<'_, str> {
    let needs_quotes = field
        .chars()
        .any(|c| c == delimiter || c == '"' || c == '\n' || c == '\r');
    if needs_quotes {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

fn join_row<'a>(fields: impl IntoIterator<Item = &'a str>, format: ReportFormat) -> String {
    let delimiter = format.delimiter();
    let mut line = fields
        .into_iter()
        .map(|f| quote_field(f, delimiter))
        .collect::<Vec<_>>()
        .join(&delimiter.to_string());
    line.push('\n');
    line
}

pub fn render_header(format: ReportFormat) -> String {
    join_row(HEADER, format)
}

pub fn render_row(outcome: &ModulusOutcome, format: ReportFormat) -> String {
    let modulus = outcome.modulus.to_string();
    let witness = outcome.witness_or_note();
    let proof = outcome.proof_note();
    join_row(
        [
            modulus.as_str(),
            outcome.status().as_str(),
            witness.as_str(),
            proof.as_str(),
        ],
        format,
    )
}

/// Full report: header followed by one row per outcome
pub fn render(outcomes: &[ModulusOutcome], format: ReportFormat) -> String {
    let mut text = render_header(format);
    for outcome in outcomes {
        text.push_str(&render_row(outcome, format));
    }
    text
}
