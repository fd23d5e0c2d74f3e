//! Upload parsing and schema validation
//!
//! Accepts raw file bytes plus the client's file name, parses CSV or XLSX
//! into a [`Dataset`], and checks the fixed employee schema. Nothing here
//! touches the session; the caller stores the table only on success.

use std::io::Cursor;

use attrition_common::{schema, Error, Result};
use calamine::{Data, Reader, Xlsx};
use polars::prelude::*;
use tracing::{debug, info};

use super::Dataset;
use crate::error::{ApiError, ApiResult};

/// Supported upload formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
}

impl FileFormat {
    /// Detect format from the file extension (case-sensitive)
    pub fn from_filename(filename: &str) -> Option<Self> {
        if filename.ends_with(".csv") {
            Some(FileFormat::Csv)
        } else if filename.ends_with(".xlsx") {
            Some(FileFormat::Xlsx)
        } else {
            None
        }
    }
}

/// Parse and validate an uploaded file
pub fn load_upload(filename: &str, bytes: &[u8]) -> ApiResult<Dataset> {
    let format = FileFormat::from_filename(filename).ok_or(ApiError::UnsupportedFormat)?;

    let dataset = match format {
        FileFormat::Csv => parse_csv(bytes)?,
        FileFormat::Xlsx => parse_xlsx(bytes)?,
    };
    debug!(
        "Parsed {} as {:?}: {} rows x {} columns",
        filename,
        format,
        dataset.n_rows(),
        dataset.n_cols()
    );

    validate_schema(&dataset)?;

    info!("Accepted upload {} ({} rows)", filename, dataset.n_rows());
    Ok(dataset)
}

/// Fail with every required column the table lacks
pub fn validate_schema(dataset: &Dataset) -> ApiResult<()> {
    let missing = schema::missing_required(&dataset.columns());
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ApiError::MissingColumns(missing))
    }
}

/// Parse comma-separated text with a header row
///
/// Column types are inferred over the whole file; empty fields are null.
pub fn parse_csv(bytes: &[u8]) -> Result<Dataset> {
    let frame = CsvReader::new(Cursor::new(bytes))
        .has_header(true)
        .infer_schema(None)
        .finish()
        .map_err(|e| Error::Parse(format!("Invalid CSV: {}", e)))?;
    into_dataset(frame)
}

/// Parse the first worksheet of an Excel workbook
pub fn parse_xlsx(bytes: &[u8]) -> Result<Dataset> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))
        .map_err(|e| Error::Parse(format!("Invalid XLSX: {}", e)))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| Error::Parse("Workbook has no worksheets".to_string()))?
        .map_err(|e| Error::Parse(format!("Invalid XLSX: {}", e)))?;

    let mut rows = range.rows();
    let header = rows
        .next()
        .ok_or_else(|| Error::Parse("No columns to parse from file".to_string()))?;
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(j, cell)| {
            let name = match cell {
                Data::Empty => format!("Unnamed: {}", j),
                other => other.to_string(),
            };
            let cells: Vec<&Data> = body.iter().map(|row| &row[j]).collect();
            excel_series(&name, &cells)
        })
        .collect();

    let frame =
        DataFrame::new(columns).map_err(|e| Error::Parse(format!("Invalid XLSX: {}", e)))?;
    into_dataset(frame)
}

/// One worksheet column as the narrowest series that holds every cell
fn excel_series(name: &str, cells: &[&Data]) -> Series {
    let filled = || {
        cells
            .iter()
            .filter(|c| !matches!(c, Data::Empty | Data::Error(_)))
    };

    // Excel stores every number as a double
    if filled().all(|c| matches!(c, Data::Int(_)) || matches!(c, Data::Float(f) if is_whole(*f))) {
        let values: Vec<Option<i64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i),
                Data::Float(f) => Some(*f as i64),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if filled().all(|c| matches!(c, Data::Int(_) | Data::Float(_))) {
        let values: Vec<Option<f64>> = cells
            .iter()
            .map(|c| match c {
                Data::Int(i) => Some(*i as f64),
                Data::Float(f) => Some(*f),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else if filled().all(|c| matches!(c, Data::Bool(_))) {
        let values: Vec<Option<bool>> = cells
            .iter()
            .map(|c| match c {
                Data::Bool(b) => Some(*b),
                _ => None,
            })
            .collect();
        Series::new(name, values)
    } else {
        let values: Vec<Option<String>> = cells
            .iter()
            .map(|c| match c {
                Data::Empty | Data::Error(_) => None,
                Data::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect();
        Series::new(name, values)
    }
}

fn is_whole(f: f64) -> bool {
    f.fract() == 0.0 && f.abs() < 9.0e15
}

fn into_dataset(frame: DataFrame) -> Result<Dataset> {
    if frame.width() == 0 {
        return Err(Error::Parse("No columns to parse from file".to_string()));
    }
    Dataset::new(frame).map_err(|e| Error::Parse(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "EmployeeNumber,Age,DistanceFromHome,MonthlyIncome,NumCompaniesWorked,\
PercentSalaryHike,TotalWorkingYears,TrainingTimesLastYear,YearsAtCompany,YearsInCurrentRole,\
YearsSinceLastPromotion,BusinessTravel,Department,EducationField,Gender,JobRole,MaritalStatus,OverTime";

    const WORKBOOK: &[u8] = include_bytes!("../../tests/fixtures/employees.xlsx");

    fn csv_with(rows: &[&str]) -> Vec<u8> {
        let mut text = String::from(HEADER);
        for row in rows {
            text.push('\n');
            text.push_str(row);
        }
        text.into_bytes()
    }

    fn dtype(ds: &Dataset, column: &str) -> DataType {
        ds.frame().column(column).unwrap().dtype().clone()
    }

    fn is_parse_error(err: &ApiError) -> bool {
        matches!(err, ApiError::Common(Error::Parse(_)))
    }

    #[test]
    fn test_format_detection() {
        assert_eq!(FileFormat::from_filename("hr.csv"), Some(FileFormat::Csv));
        assert_eq!(FileFormat::from_filename("hr.xlsx"), Some(FileFormat::Xlsx));
        assert_eq!(FileFormat::from_filename("hr.xls"), None);
        assert_eq!(FileFormat::from_filename("hr.json"), None);
    }

    #[test]
    fn test_extension_match_is_case_sensitive() {
        assert_eq!(FileFormat::from_filename("HR.CSV"), None);
        assert_eq!(FileFormat::from_filename("HR.XLSX"), None);
        let err = load_upload("HR.CSV", &csv_with(&[])).unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFormat));
    }

    #[test]
    fn test_unsupported_extension_rejected() {
        let err = load_upload("employees.txt", b"a,b\n1,2").unwrap_err();
        assert!(matches!(err, ApiError::UnsupportedFormat));
    }

    #[test]
    fn test_valid_single_row_csv() {
        let bytes = csv_with(&[
            "1,41,1,5993,8,11,8,0,6,4,0,Travel_Rarely,Sales,Life Sciences,Female,Sales Executive,Single,Yes",
        ]);
        let ds = load_upload("hr.csv", &bytes).unwrap();
        assert_eq!(ds.n_rows(), 1);
        assert_eq!(ds.n_cols(), 18);
        assert_eq!(dtype(&ds, "MonthlyIncome"), DataType::Int64);
        assert_eq!(ds.row(0).unwrap().number("MonthlyIncome"), Some(5993.0));
    }

    #[test]
    fn test_valid_xlsx_keeps_cell_types() {
        let ds = load_upload("hr.xlsx", WORKBOOK).unwrap();
        assert_eq!(ds.n_rows(), 2);
        assert_eq!(ds.n_cols(), 18);
        assert_eq!(ds.columns()[0], "EmployeeNumber");

        assert_eq!(dtype(&ds, "MonthlyIncome"), DataType::Int64);
        assert_eq!(dtype(&ds, "PercentSalaryHike"), DataType::Float64);
        assert_eq!(dtype(&ds, "OverTime"), DataType::Utf8);

        let first = ds.row(0).unwrap();
        assert_eq!(first.number("MonthlyIncome"), Some(5993.0));
        assert_eq!(first.text("MonthlyIncome").as_deref(), Some("5993"));
        assert_eq!(first.text("OverTime").as_deref(), Some("Yes"));

        let second = ds.row(1).unwrap();
        assert_eq!(second.number("PercentSalaryHike"), Some(23.5));
        assert_eq!(second.text("Department").as_deref(), Some("Research & Development"));
        assert_eq!(ds.missing_counts().get("Age"), Some(&1));
    }

    #[test]
    fn test_missing_column_listed() {
        let text = "Age,Department\n30,Sales\n";
        match load_upload("hr.csv", text.as_bytes()).unwrap_err() {
            ApiError::MissingColumns(missing) => {
                assert_eq!(missing.len(), 15);
                assert!(missing.contains(&"JobRole".to_string()));
                assert!(!missing.contains(&"Age".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_blank_cells_are_null() {
        let bytes = csv_with(&[
            "1,,1,5993,8,11,8,0,6,4,0,Travel_Rarely,Sales,Life Sciences,Female,Sales Executive,Single,",
            "2,35,1,4000,8,11,8,0,6,4,0,Travel_Rarely,Sales,Life Sciences,Female,Sales Executive,Single,No",
        ]);
        let ds = load_upload("hr.csv", &bytes).unwrap();
        let missing = ds.missing_counts();
        assert_eq!(missing.get("Age"), Some(&1));
        assert_eq!(missing.get("OverTime"), Some(&1));
        assert_eq!(missing.get("Department"), Some(&0));
    }

    #[test]
    fn test_garbage_xlsx_is_parse_error() {
        let err = load_upload("hr.xlsx", b"definitely not a zip archive").unwrap_err();
        assert!(is_parse_error(&err));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_empty_file_is_parse_error() {
        let err = load_upload("hr.csv", b"").unwrap_err();
        assert!(is_parse_error(&err));
    }
}
