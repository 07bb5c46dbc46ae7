use polars::prelude::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info, info_span};

use crate::domain::SheetError;
use crate::record::{Field, JobRequest, JobStatus, Priority};

#[derive(Debug, PartialEq)]
enum FileType {
    Csv,
    Parquet,
    Arrow,
    Json,
}

fn detect_file_type(path: &Path) -> Result<FileType, SheetError> {
    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_uppercase())
        .as_deref()
    {
        Some("CSV") => Ok(FileType::Csv),
        Some("PARQUET") | Some("PQ") => Ok(FileType::Parquet),
        Some("ARROW") | Some("IPC") | Some("FEATHER") => Ok(FileType::Arrow),
        Some("JSON") => Ok(FileType::Json),
        _ => Err(SheetError::UnknownFileType),
    }
}

fn get_file_type(path: &Path) -> Result<FileType, SheetError> {
    let metadata = fs::metadata(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SheetError::FileNotFound,
        ErrorKind::PermissionDenied => SheetError::PermissionDenied,
        _ => SheetError::IoError(e),
    })?;
    if !metadata.is_file() {
        return Err(SheetError::LoadingFailed("Not a file!".into()));
    }
    debug!("{:?} has {} bytes", path, metadata.len());
    detect_file_type(path)
}

/// Loads job requests from a csv, parquet, arrow or json file.
///
/// Tabular files are matched by column name against the record keys. Columns that are
/// missing get defaults: ids count up from 1, style tags follow status and priority,
/// text fields stay empty. Json files must hold an array of records as written by the
/// json export.
pub fn load_data_file(path: PathBuf) -> Result<Vec<JobRequest>, SheetError> {
    let _span = info_span!("load", path = %path.display()).entered();
    let file_type = get_file_type(&path)?;
    let start_time = Instant::now();

    let records = match file_type {
        FileType::Json => load_json(&path)?,
        FileType::Csv => records_from_frame(load_csv(&path)?)?,
        FileType::Parquet => records_from_frame(load_parquet(&path)?)?,
        FileType::Arrow => records_from_frame(load_arrow(&path)?)?,
    };
    check_ids(&records)?;

    info!(
        "Loaded {} records from {:?} in {}ms",
        records.len(),
        file_type,
        start_time.elapsed().as_millis()
    );
    Ok(records)
}

fn load_csv(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyCsvReader::new(PlPath::Local(path.into()))
        .with_has_header(true)
        .finish()
}

fn load_parquet(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_parquet(PlPath::Local(path.into()), ScanArgsParquet::default())
}

fn load_arrow(path: &Path) -> Result<LazyFrame, PolarsError> {
    LazyFrame::scan_ipc(
        PlPath::Local(path.into()),
        polars::io::ipc::IpcScanOptions,
        UnifiedScanArgs::default(),
    )
}

fn load_json(path: &Path) -> Result<Vec<JobRequest>, SheetError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}

// Every value of a column as text, nulls become empty strings.
fn load_column(df: &DataFrame, col_name: &str) -> Result<Vec<String>, PolarsError> {
    let col = df.column(col_name)?.cast(&DataType::String)?;
    let series = col.str()?;
    Ok(series
        .into_iter()
        .map(|value| value.map(|s| s.trim().to_string()).unwrap_or_default())
        .collect())
}

fn records_from_frame(frame: LazyFrame) -> Result<Vec<JobRequest>, SheetError> {
    let df = frame.collect()?;
    let names: Vec<String> = df
        .get_column_names()
        .iter()
        .map(|name| name.to_string())
        .collect();

    // Each known column is converted in its own task
    let loaded: Result<Vec<(Field, Vec<String>)>, PolarsError> = names
        .par_iter()
        .filter_map(|name| Field::from_key(name).map(|field| (field, name)))
        .map(|(field, name)| load_column(&df, name).map(|data| (field, data)))
        .collect();
    let columns: HashMap<Field, Vec<String>> = loaded?.into_iter().collect();

    let ignored: Vec<&String> = names
        .iter()
        .filter(|name| Field::from_key(name).is_none())
        .collect();
    if !ignored.is_empty() {
        debug!("Ignoring unknown columns {:?}", ignored);
    }

    build_records(&columns, df.height())
}

fn build_records(
    columns: &HashMap<Field, Vec<String>>,
    nrows: usize,
) -> Result<Vec<JobRequest>, SheetError> {
    let mut records = Vec::with_capacity(nrows);
    for idx in 0..nrows {
        let row = idx + 1;
        let get = |field: Field| -> String {
            columns
                .get(&field)
                .and_then(|data| data.get(idx))
                .cloned()
                .unwrap_or_default()
        };
        let invalid = |reason: String| SheetError::InvalidRecord { row, reason };

        let id = match get(Field::Id).as_str() {
            "" => row as u64,
            raw => raw
                .parse::<u64>()
                .map_err(|_| invalid(format!("id \"{raw}\" is not a positive integer")))?,
        };
        let status = match get(Field::Status).as_str() {
            "" => JobStatus::NeedToStart,
            raw => raw.parse::<JobStatus>().map_err(invalid)?,
        };
        let priority = match get(Field::Priority).as_str() {
            "" => Priority::Medium,
            raw => raw.parse::<Priority>().map_err(invalid)?,
        };
        let status_color = Some(get(Field::StatusColor))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| status.color_tag().to_string());
        let priority_color = Some(get(Field::PriorityColor))
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| priority.color_tag().to_string());

        records.push(JobRequest {
            id,
            title: get(Field::Title),
            submitted_date: get(Field::SubmittedDate),
            status,
            status_color,
            submitter: get(Field::Submitter),
            url: get(Field::Url),
            assigned: get(Field::Assigned),
            priority,
            priority_color,
            due_date: get(Field::DueDate),
            est_value: get(Field::EstValue),
        });
    }
    Ok(records)
}

fn check_ids(records: &[JobRequest]) -> Result<(), SheetError> {
    let mut seen = HashSet::with_capacity(records.len());
    for (idx, record) in records.iter().enumerate() {
        if record.id == 0 {
            return Err(SheetError::InvalidRecord {
                row: idx + 1,
                reason: "id must be positive".to_string(),
            });
        }
        // New rows take max + 1, which must stay representable
        if record.id == u64::MAX {
            return Err(SheetError::InvalidRecord {
                row: idx + 1,
                reason: format!("id {} is out of range", record.id),
            });
        }
        if !seen.insert(record.id) {
            return Err(SheetError::InvalidRecord {
                row: idx + 1,
                reason: format!("duplicate id {}", record.id),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export;
    use crate::record::seed_data;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_the_csv_export() {
        let dir = tempfile::tempdir().unwrap();
        let seed = seed_data();
        let path = write_file(&dir, "sheet.csv", &export::to_csv(&seed));

        let records = load_data_file(path).unwrap();
        assert_eq!(records, seed);
    }

    #[test]
    fn loads_the_json_export() {
        let dir = tempfile::tempdir().unwrap();
        let seed = seed_data();
        let refs: Vec<&JobRequest> = seed.iter().collect();
        let path = write_file(&dir, "sheet.json", &export::to_json(&refs).unwrap());

        assert_eq!(load_data_file(path).unwrap(), seed);
    }

    #[test]
    fn loads_the_fixture_with_partial_columns() {
        let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/job_requests.csv");
        let records = load_data_file(path).unwrap();

        assert_eq!(records.len(), 3);
        assert_eq!(records.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert_eq!(records[0].title, "Refresh onboarding deck");
        assert_eq!(records[0].status, JobStatus::Complete);
        assert_eq!(records[0].status_color, JobStatus::Complete.color_tag());
        assert_eq!(records[1].priority, Priority::Medium);
        assert_eq!(records[2].est_value, "12,000");
        assert_eq!(records[2].url, "");
    }

    #[test]
    fn rejects_unknown_enum_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "bad.csv", "title,status\nfirst,Blocked\nsecond,Done\n");
        match load_data_file(path) {
            Err(SheetError::InvalidRecord { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_the_largest_id() {
        let dir = tempfile::tempdir().unwrap();
        let mut seed = seed_data();
        seed[4].id = u64::MAX;
        let refs: Vec<&JobRequest> = seed.iter().collect();
        let path = write_file(&dir, "max.json", &export::to_json(&refs).unwrap());

        match load_data_file(path) {
            Err(SheetError::InvalidRecord { row, reason }) => {
                assert_eq!(row, 5);
                assert!(reason.contains("out of range"));
            }
            other => panic!("expected invalid record, got {other:?}"),
        }
    }

    #[test]
    fn rejects_duplicate_ids() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "dup.csv", "id,title\n1,a\n2,b\n1,c\n");
        assert!(matches!(
            load_data_file(path),
            Err(SheetError::InvalidRecord { row: 3, .. })
        ));
    }

    #[test]
    fn missing_and_unknown_files() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_data_file(dir.path().join("absent.csv")),
            Err(SheetError::FileNotFound)
        ));
        let path = write_file(&dir, "sheet.xlsx", "");
        assert!(matches!(load_data_file(path), Err(SheetError::UnknownFileType)));
        assert!(matches!(
            load_data_file(dir.path().to_path_buf()),
            Err(SheetError::LoadingFailed(_))
        ));
    }
}
