use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::dialect::text::same_name;

/// One decoded value from a catalog row.
///
/// Catalogs disagree on the types of the same logical column (a nullable
/// flag may be `'YES'`, `1` or `true`), so the accessors convert loosely and
/// never fail: a value that cannot be read as the requested kind is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RowValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Timestamp(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl RowValue {
    pub fn is_null(&self) -> bool {
        matches!(self, RowValue::Null)
    }

    /// Text form of any non-null scalar. Bytes are read as UTF-8, lossily.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RowValue::Null => None,
            RowValue::Bool(v) => Some(v.to_string()),
            RowValue::Int(v) => Some(v.to_string()),
            RowValue::Float(v) => Some(v.to_string()),
            RowValue::Text(v) => Some(v.clone()),
            RowValue::Timestamp(v) => Some(v.to_string()),
            RowValue::Bytes(v) => Some(String::from_utf8_lossy(v).into_owned()),
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RowValue::Int(v) => Some(*v),
            RowValue::Bool(v) => Some(i64::from(*v)),
            RowValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            RowValue::Text(v) => v.trim().parse().ok(),
            _ => None,
        }
    }

    /// `1`, `'YES'`, `'Y'`, `'true'` read as true; `0`, `'NO'`, `'N'`, `'false'` as false.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            RowValue::Bool(v) => Some(*v),
            RowValue::Int(v) => Some(*v != 0),
            RowValue::Text(v) => match v.trim().to_ascii_lowercase().as_str() {
                "1" | "yes" | "y" | "true" | "t" => Some(true),
                "0" | "no" | "n" | "false" | "f" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    pub fn as_timestamp(&self) -> Option<NaiveDateTime> {
        match self {
            RowValue::Timestamp(v) => Some(*v),
            RowValue::Text(v) => parse_timestamp(v.trim()),
            _ => None,
        }
    }
}

fn parse_timestamp(text: &str) -> Option<NaiveDateTime> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M"];
    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
}

impl From<&str> for RowValue {
    fn from(value: &str) -> Self {
        RowValue::Text(value.to_string())
    }
}

impl From<String> for RowValue {
    fn from(value: String) -> Self {
        RowValue::Text(value)
    }
}

impl From<i64> for RowValue {
    fn from(value: i64) -> Self {
        RowValue::Int(value)
    }
}

impl From<i32> for RowValue {
    fn from(value: i32) -> Self {
        RowValue::Int(value.into())
    }
}

impl From<bool> for RowValue {
    fn from(value: bool) -> Self {
        RowValue::Bool(value)
    }
}

impl From<f64> for RowValue {
    fn from(value: f64) -> Self {
        RowValue::Float(value)
    }
}

impl From<NaiveDateTime> for RowValue {
    fn from(value: NaiveDateTime) -> Self {
        RowValue::Timestamp(value)
    }
}

impl<T: Into<RowValue>> From<Option<T>> for RowValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(RowValue::Null, Into::into)
    }
}

/// A catalog result row: column names in result order with their values.
///
/// Lookups ignore case, since catalogs differ on `TABLE_NAME` vs `table_name`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    columns: Vec<(String, RowValue)>,
}

impl CatalogRow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            columns: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, name: impl Into<String>, value: RowValue) {
        self.columns.push((name.into(), value));
    }

    /// Builder form of [`CatalogRow::push`].
    pub fn with(mut self, name: impl Into<String>, value: impl Into<RowValue>) -> Self {
        self.push(name, value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&RowValue> {
        self.columns
            .iter()
            .find(|(column, _)| column == name)
            .or_else(|| self.columns.iter().find(|(column, _)| same_name(column, name)))
            .map(|(_, value)| value)
    }

    /// First non-null value among several candidate column names.
    pub fn get_any(&self, names: &[&str]) -> Option<&RowValue> {
        names
            .iter()
            .filter_map(|name| self.get(name))
            .find(|value| !value.is_null())
    }

    pub fn first(&self) -> Option<&RowValue> {
        self.columns.first().map(|(_, value)| value)
    }

    pub fn into_first(self) -> Option<RowValue> {
        self.columns.into_iter().next().map(|(_, value)| value)
    }

    /// Non-empty text of a column.
    pub fn text(&self, name: &str) -> Option<String> {
        self.get(name)
            .and_then(RowValue::as_text)
            .filter(|text| !text.is_empty())
    }

    pub fn text_any(&self, names: &[&str]) -> Option<String> {
        names.iter().find_map(|name| self.text(name))
    }

    pub fn int(&self, name: &str) -> Option<i64> {
        self.get(name).and_then(RowValue::as_i64)
    }

    pub fn int_any(&self, names: &[&str]) -> Option<i64> {
        names.iter().find_map(|name| self.int(name))
    }

    /// Boolean column; missing, null and unreadable values are false.
    pub fn flag(&self, name: &str) -> bool {
        self.get(name).and_then(RowValue::as_bool).unwrap_or(false)
    }

    pub fn timestamp(&self, name: &str) -> Option<NaiveDateTime> {
        self.get(name).and_then(RowValue::as_timestamp)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &RowValue)> {
        self.columns.iter().map(|(name, value)| (name.as_str(), value))
    }
}
