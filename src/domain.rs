use derive_setters::Setters;
use polars::error::PolarsError;
use ratatui::crossterm::event::KeyEvent;
use std::fmt;
use std::io::Error;
use std::path::PathBuf;

use crate::export::ExportFormat;
use crate::record::Field;
use crate::sheet::ViewPolicy;

#[derive(Debug)]
pub enum SheetError {
    IoError(Error),
    PolarsError(PolarsError),
    JsonError(serde_json::Error),
    LoadingFailed(String),
    FileNotFound,
    PermissionDenied,
    UnknownFileType,
    InvalidRecord { row: usize, reason: String },
}

impl fmt::Display for SheetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetError::IoError(e) => write!(f, "io error: {e}"),
            SheetError::PolarsError(e) => write!(f, "could not read table: {e}"),
            SheetError::JsonError(e) => write!(f, "json error: {e}"),
            SheetError::LoadingFailed(msg) => write!(f, "loading failed: {msg}"),
            SheetError::FileNotFound => write!(f, "file not found"),
            SheetError::PermissionDenied => write!(f, "permission denied"),
            SheetError::UnknownFileType => {
                write!(f, "unknown file type (expected csv, parquet, arrow or json)")
            }
            SheetError::InvalidRecord { row, reason } => write!(f, "row {row}: {reason}"),
        }
    }
}

impl std::error::Error for SheetError {}

impl From<Error> for SheetError {
    fn from(err: Error) -> Self {
        SheetError::IoError(err)
    }
}

impl From<PolarsError> for SheetError {
    fn from(err: PolarsError) -> Self {
        SheetError::PolarsError(err)
    }
}

impl From<serde_json::Error> for SheetError {
    fn from(err: serde_json::Error) -> Self {
        SheetError::JsonError(err)
    }
}

#[derive(Debug, Clone, Setters)]
pub struct SheetConfig {
    pub event_poll_time: u64,
    pub max_column_width: usize,
    pub export_dir: PathBuf,
    pub view_policy: ViewPolicy,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            event_poll_time: 100,
            max_column_width: 40,
            export_dir: PathBuf::from("."),
            view_policy: ViewPolicy::default(),
        }
    }
}

/// What the command line input is collected for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CmdMode {
    Raw,
    Search,
    Filter(Field),
    AddRow,
}

impl CmdMode {
    pub fn prompt(&self) -> String {
        match self {
            CmdMode::Raw => ":".to_string(),
            CmdMode::Search => "/".to_string(),
            CmdMode::Filter(field) => format!("filter {}: ", field.key()),
            CmdMode::AddRow => "new row (title | submitter | assigned | priority | due | value): "
                .to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    Quit,
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MovePageUp,
    MovePageDown,
    MoveBeginning,
    MoveEnd,
    Sort,
    Search,
    Filter,
    ClearFilters,
    HideColumn,
    ShowAllColumns,
    SelectRow,
    AddRow,
    AddColumn,
    Export(ExportFormat),
    CopyCell,
    CopyRow,
    EnterCommand,
    Help,
    Exit,
    Resize(usize, usize),
    RawKey(KeyEvent),
}

pub const HELP_TEXT: &str = "\
q          quit
arrows/hjkl move
PgUp/PgDn  page up / down
g / G      first / last row
s          sort by current column (again to reverse)
/          search all fields
f          filter current column (Status, Priority, Submitter)
F          clear filters and search
x / X      hide current column / show all columns
space      select row
a          add row
+          add custom column
e / E      export csv / json
c / C      copy cell / row
:          command (sort, filter, search, toggle, select, add, column, export, quit)
?          this help
Esc        close";
