//! In-memory employee table
//!
//! The table is a polars [`DataFrame`] whose columns are normalized on
//! construction to one of four dtypes: `Int64`, `Float64`, `Boolean` or
//! `Utf8`. Every accessor below relies on that, so the frame is private.

pub mod ingest;

use polars::prelude::*;
use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

use crate::format;

/// Insertion-ordered string-keyed map, serialized as a JSON object
#[derive(Debug, Clone, PartialEq)]
pub struct OrderedMap<V>(pub Vec<(String, V)>);

impl<V> OrderedMap<V> {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: V) {
        self.0.push((key.into(), value));
    }

    pub fn get(&self, key: &str) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<V> Default for OrderedMap<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Serialize> Serialize for OrderedMap<V> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Uploaded table
#[derive(Debug, Clone)]
pub struct Dataset {
    frame: DataFrame,
}

impl Dataset {
    /// Wrap a frame, normalizing every column dtype
    pub fn new(frame: DataFrame) -> PolarsResult<Self> {
        let columns = frame
            .get_columns()
            .iter()
            .map(normalize)
            .collect::<PolarsResult<Vec<_>>>()?;
        Ok(Self {
            frame: DataFrame::new(columns)?,
        })
    }

    pub fn frame(&self) -> &DataFrame {
        &self.frame
    }

    pub fn columns(&self) -> Vec<String> {
        self.frame
            .get_column_names()
            .into_iter()
            .map(String::from)
            .collect()
    }

    pub fn n_rows(&self) -> usize {
        self.frame.height()
    }

    pub fn n_cols(&self) -> usize {
        self.frame.width()
    }

    pub fn is_empty(&self) -> bool {
        self.frame.height() == 0
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.frame.column(name).is_ok()
    }

    /// Column cast to floats; unparseable text and NaN become null
    pub fn numeric_column(&self, name: &str) -> Option<Float64Chunked> {
        let cast = self.frame.column(name).ok()?.cast(&DataType::Float64).ok()?;
        let values = cast.f64().ok()?;
        Some(values.into_iter().map(|v| v.filter(|x| !x.is_nan())).collect())
    }

    /// Display text of every cell in a column, top to bottom
    pub fn text_column(&self, name: &str) -> Option<Vec<Option<String>>> {
        let series = self.frame.column(name).ok()?;
        Some((0..series.len()).map(|i| text_at(series, i)).collect())
    }

    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        (index < self.n_rows()).then_some(RowView {
            dataset: self,
            index,
        })
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.n_rows()).map(move |index| RowView {
            dataset: self,
            index,
        })
    }

    /// Null count per column, in column order
    pub fn missing_counts(&self) -> OrderedMap<usize> {
        let mut counts = OrderedMap::new();
        for series in self.frame.get_columns() {
            counts.insert(series.name(), series.null_count());
        }
        counts
    }

    /// First `n` rows as field -> value objects
    pub fn preview(&self, n: usize) -> Vec<Map<String, Value>> {
        let head = self.frame.head(Some(n));
        (0..head.height())
            .map(|i| {
                head.get_columns()
                    .iter()
                    .map(|series| (series.name().to_string(), json_at(series, i)))
                    .collect()
            })
            .collect()
    }

    /// Copy of the table without `name` (unchanged if the column is absent)
    pub fn without_column(&self, name: &str) -> Dataset {
        match self.frame.drop(name) {
            Ok(frame) => Dataset { frame },
            Err(_) => self.clone(),
        }
    }
}

/// Borrowed view of one row, addressed by column name
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    dataset: &'a Dataset,
    index: usize,
}

impl<'a> RowView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Numeric value of a column, `None` when absent or not a number
    pub fn number(&self, column: &str) -> Option<f64> {
        let series = self.dataset.frame.column(column).ok()?;
        let value = match series.dtype() {
            DataType::Int64 => series.i64().ok()?.get(self.index)? as f64,
            DataType::Float64 => series.f64().ok()?.get(self.index)?,
            DataType::Boolean => f64::from(u8::from(series.bool().ok()?.get(self.index)?)),
            DataType::Utf8 => series.utf8().ok()?.get(self.index)?.parse().ok()?,
            _ => return None,
        };
        (!value.is_nan()).then_some(value)
    }

    /// Non-null display text of a column
    pub fn text(&self, column: &str) -> Option<String> {
        let series = self.dataset.frame.column(column).ok()?;
        text_at(series, self.index)
    }
}

fn normalize(series: &Series) -> PolarsResult<Series> {
    let target = match series.dtype() {
        DataType::Int64 | DataType::Float64 | DataType::Boolean | DataType::Utf8 => {
            return Ok(series.clone())
        }
        dtype if dtype.is_float() => DataType::Float64,
        dtype if dtype.is_numeric() => DataType::Int64,
        _ => DataType::Utf8,
    };
    series.cast(&target)
}

/// Cell rendered the way it reads in an exported table
pub(crate) fn text_at(series: &Series, i: usize) -> Option<String> {
    match series.dtype() {
        DataType::Utf8 => series.utf8().ok()?.get(i).map(str::to_string),
        DataType::Int64 => series.i64().ok()?.get(i).map(|v| v.to_string()),
        DataType::Float64 => series
            .f64()
            .ok()?
            .get(i)
            .filter(|v| !v.is_nan())
            .map(format::decimal),
        DataType::Boolean => series
            .bool()
            .ok()?
            .get(i)
            .map(|b| if b { "True" } else { "False" }.to_string()),
        _ => None,
    }
}

/// JSON scalar for one cell; non-finite floats become null
fn json_at(series: &Series, i: usize) -> Value {
    let value = match series.dtype() {
        DataType::Int64 => series.i64().ok().and_then(|ca| ca.get(i)).map(Value::from),
        DataType::Float64 => series
            .f64()
            .ok()
            .and_then(|ca| ca.get(i))
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number),
        DataType::Boolean => series.bool().ok().and_then(|ca| ca.get(i)).map(Value::Bool),
        DataType::Utf8 => series
            .utf8()
            .ok()
            .and_then(|ca| ca.get(i))
            .map(|s| Value::String(s.to_string())),
        _ => None,
    };
    value.unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::df;

    fn sample() -> Dataset {
        let frame = df!(
            "Age" => &[Some(30i64), None],
            "Department" => &["Sales", "R&D"],
            "Attrition" => &[Some("No"), None]
        )
        .unwrap();
        Dataset::new(frame).unwrap()
    }

    #[test]
    fn test_narrow_dtypes_are_widened() {
        let frame = df!(
            "a" => &[1i32, 2],
            "b" => &[1.5f32, 2.5],
            "c" => &[7u32, 8]
        )
        .unwrap();
        let ds = Dataset::new(frame).unwrap();
        assert_eq!(ds.frame().column("a").unwrap().dtype(), &DataType::Int64);
        assert_eq!(ds.frame().column("b").unwrap().dtype(), &DataType::Float64);
        assert_eq!(ds.frame().column("c").unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn test_numeric_column_coerces_text_and_drops_nan() {
        let frame = df!(
            "n" => &["12", "Sales", "4.5"],
            "f" => &[1.0, f64::NAN, 3.0]
        )
        .unwrap();
        let ds = Dataset::new(frame).unwrap();

        let n: Vec<Option<f64>> = ds.numeric_column("n").unwrap().into_iter().collect();
        assert_eq!(n, vec![Some(12.0), None, Some(4.5)]);
        let f: Vec<Option<f64>> = ds.numeric_column("f").unwrap().into_iter().collect();
        assert_eq!(f, vec![Some(1.0), None, Some(3.0)]);
        assert!(ds.numeric_column("missing").is_none());
    }

    #[test]
    fn test_row_view_reads_typed_cells() {
        let frame = df!(
            "flag" => &[true],
            "score" => &[11.0],
            "label" => &["7"]
        )
        .unwrap();
        let ds = Dataset::new(frame).unwrap();
        let row = ds.row(0).unwrap();
        assert_eq!(row.number("flag"), Some(1.0));
        assert_eq!(row.text("flag").as_deref(), Some("True"));
        assert_eq!(row.text("score").as_deref(), Some("11.0"));
        assert_eq!(row.number("label"), Some(7.0));
        assert!(ds.row(1).is_none());
    }

    #[test]
    fn test_missing_counts_in_column_order() {
        let counts = sample().missing_counts();
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["Age", "Department", "Attrition"]);
        assert_eq!(counts.get("Age"), Some(&1));
        assert_eq!(counts.get("Department"), Some(&0));
        assert_eq!(counts.get("Attrition"), Some(&1));
    }

    #[test]
    fn test_preview_serializes_scalars() {
        let preview = sample().preview(5);
        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0]["Age"], serde_json::json!(30));
        assert_eq!(preview[1]["Age"], Value::Null);
        assert_eq!(preview[1]["Department"], serde_json::json!("R&D"));
    }

    #[test]
    fn test_without_column_preserves_order() {
        let features = sample().without_column("Attrition");
        assert_eq!(features.columns(), vec!["Age".to_string(), "Department".to_string()]);
        assert_eq!(features.row(0).unwrap().text("Department").as_deref(), Some("Sales"));
        assert!(!features.has_column("Attrition"));

        let unchanged = sample().without_column("Missing");
        assert_eq!(unchanged.n_cols(), 3);
    }

    #[test]
    fn test_ordered_map_serializes_in_insertion_order() {
        let mut map = OrderedMap::new();
        map.insert("b", 1);
        map.insert("a", 2);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"b":1,"a":2}"#);
    }
}
