use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

use crate::domain::SheetError;
use crate::record::{Field, JobRequest};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    /// Name of the file an export is delivered to.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "spreadsheet-data.csv",
            ExportFormat::Json => "spreadsheet-data.json",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            other => Err(format!("unknown export format \"{other}\"")),
        }
    }
}

/// Header line of record keys, then one line per record with every value wrapped in
/// double quotes. Values are not escaped. No records gives an empty document.
pub fn to_csv<'a>(records: impl IntoIterator<Item = &'a JobRequest>) -> String {
    let mut lines: Vec<String> = Vec::new();
    for record in records {
        if lines.is_empty() {
            lines.push(Field::ALL.map(|f| f.key()).join(","));
        }
        let row = Field::ALL
            .iter()
            .map(|&f| format!("\"{}\"", record.value(f)))
            .collect::<Vec<String>>()
            .join(",");
        lines.push(row);
    }
    lines.join("\n")
}

/// Pretty printed array of full records, two space indentation.
pub fn to_json(records: &[&JobRequest]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(records)
}

/// Writes an export below `dir` and returns the written path.
pub fn deliver(dir: &Path, format: ExportFormat, contents: &str) -> Result<PathBuf, SheetError> {
    let path = dir.join(format.file_name());
    fs::write(&path, contents)?;
    info!("Wrote {} bytes to {:?}", contents.len(), path);
    Ok(path)
}
