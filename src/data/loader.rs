//! CSV reading and writing, and conversion of frames to numeric arrays

use crate::error::{Result, TrainerError};
use ndarray::Array2;
use polars::prelude::*;
use std::fs::{self, File};
use std::path::Path;

/// Number of rows used to infer column types
const INFER_SCHEMA_ROWS: usize = 1000;

/// Read a headered CSV file
pub fn load_csv(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    if !path.is_file() {
        return Err(TrainerError::MissingInput {
            path: path.to_path_buf(),
        });
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()?;
    Ok(df)
}

/// Write `df` as a headered CSV file, creating parent directories
pub fn save_csv(df: &mut DataFrame, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

/// Convert every column of `df` into a row-major `f64` matrix.
///
/// Column order is preserved, so a label stored as the last CSV column ends
/// up in the last array column. Null or non-numeric cells are rejected.
pub fn frame_to_array(df: &DataFrame) -> Result<Array2<f64>> {
    let n_rows = df.height();

    let columns: Vec<Vec<f64>> = df
        .get_columns()
        .iter()
        .map(|column| {
            let name = column.name().to_string();
            let series = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| TrainerError::Data(format!("column '{}': {}", name, e)))?;
            let values = series.f64()?;

            let missing = values.null_count();
            if missing > 0 {
                return Err(TrainerError::Data(format!(
                    "column '{}' has {} missing or non-numeric values",
                    name, missing
                )));
            }
            Ok(values.into_iter().map(|v| v.unwrap_or(f64::NAN)).collect())
        })
        .collect::<Result<_>>()?;

    Ok(Array2::from_shape_fn((n_rows, columns.len()), |(r, c)| {
        columns[c][r]
    }))
}

/// Load a CSV file straight into a numeric matrix
pub fn load_array(path: impl AsRef<Path>) -> Result<Array2<f64>> {
    let df = load_csv(path)?;
    frame_to_array(&df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    fn create_test_csv(rows: &[&str]) -> NamedTempFile {
        let mut file = NamedTempFile::with_suffix(".csv").unwrap();
        for row in rows {
            writeln!(file, "{}", row).unwrap();
        }
        file
    }

    #[test]
    fn test_load_csv() {
        let file = create_test_csv(&["a,b,c", "1,2,3", "4,5,6", "7,8,9"]);
        let df = load_csv(file.path()).unwrap();

        assert_eq!(df.height(), 3);
        assert_eq!(df.width(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_csv(dir.path().join("nope.csv")).unwrap_err();
        assert!(matches!(err, TrainerError::MissingInput { .. }));
    }

    #[test]
    fn test_frame_to_array_keeps_column_order() {
        let file = create_test_csv(&["x1,x2,y", "1,2.5,10", "3,4.5,20"]);
        let arr = load_array(file.path()).unwrap();

        assert_eq!(arr.dim(), (2, 3));
        assert_eq!(arr[[0, 1]], 2.5);
        assert_eq!(arr[[1, 2]], 20.0);
    }

    #[test]
    fn test_non_numeric_column_rejected() {
        let file = create_test_csv(&["cut,price", "Ideal,10", "Premium,20"]);
        let err = load_array(file.path()).unwrap_err();
        match err {
            TrainerError::Data(msg) => assert!(msg.contains("cut"), "{}", msg),
            other => panic!("unexpected error: {}", other),
        }
    }

    #[test]
    fn test_missing_cells_rejected() {
        let file = create_test_csv(&["a,b", "1,2", "3,", "5,6"]);
        assert!(matches!(load_array(file.path()), Err(TrainerError::Data(_))));
    }

    #[test]
    fn test_save_csv_round_trip() {
        let mut df = df!(
            "a" => &[1.0, 2.0, 3.0],
            "b" => &[4.0, 5.0, 6.0]
        )
        .unwrap();

        let dir = tempdir().unwrap();
        let path = dir.path().join("out").join("frame.csv");
        save_csv(&mut df, &path).unwrap();

        let loaded = load_csv(&path).unwrap();
        assert_eq!(loaded.height(), 3);
        assert_eq!(loaded.width(), 2);
    }
}
