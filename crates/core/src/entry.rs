use chrono::format::{Item, StrftimeItems};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// `filename`, `date` and `output` are fixed at construction; only `selected`
/// is toggled afterwards, by the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RenameEntry {
    pub filename: String,
    pub date: NaiveDateTime,
    pub output: String,
    pub selected: bool,
}

impl RenameEntry {
    pub fn new(filename: String, date: NaiveDateTime, output_date_format: &str) -> Self {
        let output = derive_output(&filename, date, output_date_format);
        Self {
            filename,
            date,
            output,
            selected: true,
        }
    }

    pub fn unchanged(&self) -> bool {
        self.output == self.filename
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FormatError {
    #[error("日付フォーマットが空です")]
    Empty,
    #[error("不正な日付フォーマットです: {0}")]
    Invalid(String),
}

/// Rendered date stamp, underscore, original name. A file already carrying
/// the stamp keeps its name, so a second pass plans nothing.
pub fn derive_output(filename: &str, date: NaiveDateTime, output_date_format: &str) -> String {
    let stamp = date.format(output_date_format).to_string();
    let already_prefixed = filename
        .strip_prefix(&stamp)
        .is_some_and(|rest| rest.starts_with('_'));
    if already_prefixed {
        return filename.to_string();
    }
    format!("{}_{}", stamp, filename)
}

/// Formatting an unknown specifier panics inside `to_string`, so patterns are
/// validated before any entry is built.
pub fn validate_date_format(input: &str) -> Result<(), FormatError> {
    if input.is_empty() {
        return Err(FormatError::Empty);
    }
    let has_error = StrftimeItems::new(input).any(|item| matches!(item, Item::Error));
    if has_error {
        return Err(FormatError::Invalid(input.to_string()));
    }
    Ok(())
}
