//! Table loading and CSV export.
//!
//! Loading accepts CSV (header row, comma separated, double-quote quoting),
//! spreadsheets (first sheet, first row as header) and Parquet. Every load
//! failure surfaces as [`ScrubError::Load`] or
//! [`ScrubError::UnsupportedFormat`] so callers can keep their previous state.

use crate::config::ScrubConfig;
use crate::error::{Result, ScrubError};
use calamine::{Data, DataType as _, Range, Reader, open_workbook_auto};
use polars::io::csv::read::{CsvParseOptions, CsvReadOptions};
use polars::prelude::*;
use std::fs::{self, File};
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};

/// Supported input formats, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Spreadsheet,
    Parquet,
}

impl TableFormat {
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "ods" => Ok(Self::Spreadsheet),
            "parquet" => Ok(Self::Parquet),
            _ => Err(ScrubError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

fn csv_read_options(config: &ScrubConfig) -> CsvReadOptions {
    CsvReadOptions::default()
        .with_infer_schema_length(config.infer_schema_length)
        .with_has_header(true)
        .with_parse_options(CsvParseOptions::default().with_quote_char(Some(b'"')))
}

/// Load a table from a CSV, spreadsheet or Parquet file.
pub fn load_table(path: &Path, config: &ScrubConfig) -> Result<DataFrame> {
    let source_name = path.display().to_string();
    let format = TableFormat::from_path(path)?;
    if !path.is_file() {
        return Err(ScrubError::load(source_name, "file not found"));
    }

    let df = match format {
        TableFormat::Csv => csv_read_options(config)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))
            .and_then(|reader| reader.finish())
            .map_err(|e| ScrubError::load(&source_name, e))?,
        TableFormat::Spreadsheet => read_spreadsheet(path, &source_name)?,
        TableFormat::Parquet => {
            let file = File::open(path).map_err(|e| ScrubError::load(&source_name, e))?;
            ParquetReader::new(file)
                .finish()
                .map_err(|e| ScrubError::load(&source_name, e))?
        }
    };

    info!(
        "Loaded '{}': {} rows x {} columns",
        source_name,
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Read the first worksheet of a workbook.
fn read_spreadsheet(path: &Path, source_name: &str) -> Result<DataFrame> {
    let mut workbook = open_workbook_auto(path).map_err(|e| ScrubError::load(source_name, e))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ScrubError::load(source_name, "workbook has no sheets"))?
        .map_err(|e| ScrubError::load(source_name, e))?;
    range_to_frame(&range).map_err(|e| ScrubError::load(source_name, e))
}

/// Column type inferred from a sheet column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellColumn {
    Text,
    Float,
    Int,
    Boolean,
}

/// Build a frame from a sheet range: first row is the header, each column
/// gets the narrowest dtype that holds all of its non-empty cells.
fn range_to_frame(range: &Range<Data>) -> PolarsResult<DataFrame> {
    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Ok(DataFrame::empty());
    };
    let body: Vec<&[Data]> = rows.collect();

    let columns = header
        .iter()
        .enumerate()
        .map(|(i, cell)| {
            let name = if is_blank(cell) {
                format!("column_{}", i + 1)
            } else {
                cell.to_string()
            };
            let cells: Vec<Option<&Data>> = body
                .iter()
                .map(|row| row.get(i).filter(|c| !is_blank(c)))
                .collect();
            cells_to_column(&name, &cells)
        })
        .collect();

    DataFrame::new(columns)
}

fn is_blank(cell: &Data) -> bool {
    match cell {
        Data::Empty => true,
        Data::String(s) => s.is_empty(),
        _ => false,
    }
}

fn is_integral(value: f64) -> bool {
    value.is_finite() && value.fract() == 0.0 && value.abs() < 9.0e15
}

fn cells_to_column(name: &str, cells: &[Option<&Data>]) -> Column {
    let present: Vec<&Data> = cells.iter().flatten().copied().collect();
    let kind = if present.is_empty() {
        CellColumn::Text
    } else if present.iter().all(|c| matches!(c, Data::Bool(_))) {
        CellColumn::Boolean
    } else if present
        .iter()
        .all(|c| matches!(c, Data::Int(_)) || matches!(c, Data::Float(f) if is_integral(*f)))
    {
        CellColumn::Int
    } else if present
        .iter()
        .all(|c| matches!(c, Data::Int(_) | Data::Float(_)))
    {
        CellColumn::Float
    } else {
        CellColumn::Text
    };

    let series = match kind {
        CellColumn::Boolean => {
            let values: Vec<Option<bool>> =
                cells.iter().map(|c| c.and_then(|c| c.get_bool())).collect();
            Series::new(name.into(), values)
        }
        CellColumn::Int => {
            let values: Vec<Option<i64>> =
                cells.iter().map(|c| c.and_then(|c| c.as_i64())).collect();
            Series::new(name.into(), values)
        }
        CellColumn::Float => {
            let values: Vec<Option<f64>> =
                cells.iter().map(|c| c.and_then(|c| c.as_f64())).collect();
            Series::new(name.into(), values)
        }
        CellColumn::Text => {
            let values: Vec<Option<String>> = cells.iter().map(|c| c.map(cell_text)).collect();
            Series::new(name.into(), values)
        }
    };
    series.into_column()
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::DateTime(_) => cell
            .as_datetime()
            .map(|dt| dt.to_string())
            .unwrap_or_else(|| cell.to_string()),
        other => other.to_string(),
    }
}

/// Parse CSV content handed over by an upload collaborator.
pub fn read_csv_bytes(bytes: &[u8], source_name: &str, config: &ScrubConfig) -> Result<DataFrame> {
    let cursor = Cursor::new(bytes.to_vec());
    let df = csv_read_options(config)
        .into_reader_with_file_handle(cursor)
        .finish()
        .map_err(|e| ScrubError::load(source_name, e))?;

    debug!(
        "Parsed '{}' from {} bytes: {} rows x {} columns",
        source_name,
        bytes.len(),
        df.height(),
        df.width()
    );
    Ok(df)
}

/// Write a table as CSV: header row, comma separated, `"` quoting where
/// needed, nulls as empty fields.
pub fn write_csv<W: Write>(df: &DataFrame, writer: &mut W) -> Result<()> {
    // CsvWriter needs a mutable frame; the clone only copies column handles
    let mut df = df.clone();
    CsvWriter::new(writer)
        .include_header(true)
        .with_separator(b',')
        .with_quote_char(b'"')
        .finish(&mut df)?;
    Ok(())
}

/// Serialize a table to CSV bytes.
pub fn to_csv_bytes(df: &DataFrame) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    write_csv(df, &mut buffer)?;
    Ok(buffer)
}

/// Write a table as CSV to `path`, creating parent directories.
pub fn save_csv(df: &DataFrame, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    write_csv(df, &mut file)?;
    info!("Dataset saved: {}", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            TableFormat::from_path(Path::new("data.CSV")).unwrap(),
            TableFormat::Csv
        );
        assert_eq!(
            TableFormat::from_path(Path::new("data.parquet")).unwrap(),
            TableFormat::Parquet
        );
        assert_eq!(
            TableFormat::from_path(Path::new("data.xlsx")).unwrap(),
            TableFormat::Spreadsheet
        );
        let err = TableFormat::from_path(Path::new("data.json")).unwrap_err();
        assert_eq!(err.error_code(), "UNSUPPORTED_FORMAT");
    }

    #[test]
    fn test_missing_file_is_load_error() {
        let err = load_table(&PathBuf::from("does/not/exist.csv"), &ScrubConfig::default())
            .unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
    }

    #[test]
    fn test_read_csv_bytes() {
        let bytes = b"age,city\n10,NY\n,\"Paris, FR\"\n";
        let df = read_csv_bytes(bytes, "upload.csv", &ScrubConfig::default()).unwrap();
        assert_eq!(df.shape(), (2, 2));
        assert_eq!(df.column("age").unwrap().null_count(), 1);
        assert_eq!(
            df.column("city")
                .unwrap()
                .as_materialized_series()
                .str()
                .unwrap()
                .get(1),
            Some("Paris, FR")
        );
    }

    #[test]
    fn test_csv_quoting_and_nulls() {
        let df = df! {
            "name" => &[Some("a,b"), Some("say \"hi\""), None],
            "n" => &[Some(1i64), None, Some(3)],
        }
        .unwrap();
        let text = String::from_utf8(to_csv_bytes(&df).unwrap()).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "name,n");
        assert_eq!(lines[1], "\"a,b\",1");
        assert_eq!(lines[2], "\"say \"\"hi\"\"\",");
        assert_eq!(lines[3], ",3");
    }

    #[test]
    fn test_csv_round_trip() {
        let df = df! {
            "age" => &[Some(10.5), None, Some(16.0)],
            "city" => &[Some("ny"), Some("la, ca"), None],
            "n" => &[1i64, 2, 3],
        }
        .unwrap();
        let bytes = to_csv_bytes(&df).unwrap();
        let back = read_csv_bytes(&bytes, "roundtrip.csv", &ScrubConfig::default()).unwrap();
        assert!(back.equals_missing(&df));
    }

    fn sheet(cells: &[(u32, u32, Data)], end: (u32, u32)) -> Range<Data> {
        let mut range = Range::new((0, 0), end);
        for (row, col, value) in cells {
            range.set_value((*row, *col), value.clone());
        }
        range
    }

    #[test]
    fn test_sheet_column_types() {
        let range = sheet(
            &[
                (0, 0, Data::String("id".into())),
                (0, 1, Data::String("score".into())),
                (0, 2, Data::String("city".into())),
                (0, 3, Data::String("active".into())),
                (1, 0, Data::Float(1.0)),
                (1, 1, Data::Float(3.5)),
                (1, 2, Data::String("NY".into())),
                (1, 3, Data::Bool(true)),
                (2, 0, Data::Int(2)),
                (2, 2, Data::Float(7.0)),
                (2, 3, Data::Bool(false)),
            ],
            (2, 3),
        );
        let df = range_to_frame(&range).unwrap();

        assert_eq!(df.shape(), (2, 4));
        assert_eq!(df.column("id").unwrap().dtype(), &DataType::Int64);
        assert_eq!(df.column("score").unwrap().dtype(), &DataType::Float64);
        assert_eq!(df.column("score").unwrap().null_count(), 1);
        assert_eq!(df.column("city").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("active").unwrap().dtype(), &DataType::Boolean);

        let city = df.column("city").unwrap().as_materialized_series();
        assert_eq!(city.str().unwrap().get(1), Some("7"));
    }

    #[test]
    fn test_sheet_blank_header_and_cells() {
        let range = sheet(
            &[
                (0, 0, Data::String("name".into())),
                (1, 0, Data::String("".into())),
                (1, 1, Data::Float(2.0)),
            ],
            (1, 1),
        );
        let df = range_to_frame(&range).unwrap();

        assert_eq!(df.get_column_names_str(), vec!["name", "column_2"]);
        assert_eq!(df.column("name").unwrap().null_count(), 1);
        assert_eq!(df.column("column_2").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_corrupt_spreadsheet_is_load_error() {
        let path =
            std::env::temp_dir().join(format!("datascrub_corrupt_{}.xlsx", std::process::id()));
        fs::write(&path, b"not a zip archive").unwrap();
        let err = load_table(&path, &ScrubConfig::default()).unwrap_err();
        assert_eq!(err.error_code(), "LOAD_ERROR");
        let _ = fs::remove_file(path);
    }
}
