//! Query parameters and placeholder rewriting.
//!
//! Generic SQL names its parameters with a backend prefix (`@customer_id`,
//! `$from`). Drivers that only bind by position get the text rewritten to
//! positional placeholders plus a parameter list in encounter order. The
//! same scan also renders parameters as SQL literals for logging and
//! `EXPLAIN`-style diagnostics.

use std::fmt::Write as _;

use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::text::same_name;

/// A value bound to a query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ParameterValue {
    Null,
    Bool(bool),
    Int(i64),
    /// Floating point and decimal values.
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Bytes(Vec<u8>),
}

impl ParameterValue {
    /// Render the value as a SQL literal.
    pub fn to_sql_literal(&self) -> String {
        match self {
            ParameterValue::Null => "NULL".to_string(),
            ParameterValue::Bool(true) => "1".to_string(),
            ParameterValue::Bool(false) => "0".to_string(),
            ParameterValue::Int(v) => v.to_string(),
            ParameterValue::Float(v) => v.to_string(),
            ParameterValue::Text(v) => quote_text(v),
            ParameterValue::Date(v) => format!("'{}'", v.format("%Y-%m-%d")),
            ParameterValue::DateTime(v) => format!("'{}'", v.format("%Y-%m-%d")),
            ParameterValue::Bytes(bytes) => {
                let mut hex = String::with_capacity(bytes.len() * 2 + 2);
                hex.push('\'');
                for byte in bytes {
                    let _ = write!(hex, "{:02X}", byte);
                }
                hex.push('\'');
                hex
            }
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ParameterValue::Null)
    }
}

fn quote_text(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Int(value.into())
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Int(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Float(value)
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<NaiveDate> for ParameterValue {
    fn from(value: NaiveDate) -> Self {
        ParameterValue::Date(value)
    }
}

impl From<NaiveDateTime> for ParameterValue {
    fn from(value: NaiveDateTime) -> Self {
        ParameterValue::DateTime(value)
    }
}

impl From<Vec<u8>> for ParameterValue {
    fn from(value: Vec<u8>) -> Self {
        ParameterValue::Bytes(value)
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParameterValue::Null, Into::into)
    }
}

/// Direction of a parameter, mirroring ADO-style command parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParameterDirection {
    #[default]
    Input,
    Output,
    InputOutput,
    ReturnValue,
}

/// A named query parameter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    name: String,
    value: ParameterValue,
    direction: ParameterDirection,
    length: usize,
}

impl Parameter {
    pub fn new(name: impl Into<String>, value: impl Into<ParameterValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            direction: ParameterDirection::Input,
            length: 0,
        }
    }

    pub fn with_direction(mut self, direction: ParameterDirection) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_length(mut self, length: usize) -> Self {
        self.length = length;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ParameterValue {
        &self.value
    }

    pub fn direction(&self) -> ParameterDirection {
        self.direction
    }

    pub fn length(&self) -> usize {
        self.length
    }
}

/// Ordered parameter collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Parameters {
    items: Vec<Parameter>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an input parameter.
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<ParameterValue>) -> &mut Self {
        self.items.push(Parameter::new(name, value));
        self
    }

    /// Append a text parameter cut to at most `length` characters.
    pub fn add_text_truncated(
        &mut self,
        name: impl Into<String>,
        value: Option<&str>,
        length: usize,
    ) -> &mut Self {
        let value = value.map(|text| match text.char_indices().nth(length) {
            Some((end, _)) => text[..end].to_string(),
            None => text.to_string(),
        });
        self.items
            .push(Parameter::new(name, value).with_length(length));
        self
    }

    pub fn push(&mut self, parameter: Parameter) -> &mut Self {
        self.items.push(parameter);
        self
    }

    /// Case-insensitive lookup that also accepts the name with a leading prefix
    /// character (`@id` finds `id` and the other way round).
    pub fn find(&self, name: &str) -> Option<&Parameter> {
        let bare = strip_prefix_char(name);
        self.items.iter().find(|parameter| {
            same_name(parameter.name(), name) || same_name(strip_prefix_char(parameter.name()), bare)
        })
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Resolve a placeholder token found in SQL text against this collection.
    ///
    /// A token matches a parameter named either `name` or `<prefix>name`.
    /// Unmatched tokens resolve to a null input parameter.
    fn resolve(&self, token: &str, prefix: &str, index: usize) -> Parameter {
        let found = self.items.iter().find(|parameter| {
            same_name(token, parameter.name())
                || same_name(token, &format!("{}{}", prefix, parameter.name()))
        });
        match found {
            Some(parameter) => Parameter {
                name: format!("{}{}{}", prefix, parameter.name(), index),
                value: parameter.value.clone(),
                direction: parameter.direction,
                length: parameter.length,
            },
            None => Parameter::new(
                format!("{}{}{}", prefix, token.strip_prefix(prefix).unwrap_or(token), index),
                ParameterValue::Null,
            ),
        }
    }
}

fn strip_prefix_char(name: &str) -> &str {
    name.strip_prefix(['@', '$', ':', '?']).unwrap_or(name)
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl FromIterator<Parameter> for Parameters {
    fn from_iter<I: IntoIterator<Item = Parameter>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

/// How positional placeholders are spelled by the target driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderStyle {
    /// `?` (ODBC, MySQL, SQLite)
    QuestionMark,
    /// `$1`, `$2`, ... (PostgreSQL wire protocol)
    Numbered,
}

impl PlaceholderStyle {
    fn placeholder(self, index: usize) -> String {
        match self {
            PlaceholderStyle::QuestionMark => "?".to_string(),
            PlaceholderStyle::Numbered => format!("${}", index + 1),
        }
    }
}

/// Quoted spans are matched too so that the scan can step over them.
fn placeholder_pattern(prefix: &str) -> Option<Regex> {
    Regex::new(&format!(r#"'[^']*'|"[^"]*"|{}\w+"#, regex::escape(prefix))).ok()
}

/// Byte ranges of the `<prefix>name` tokens in `sql`.
///
/// Text inside `'...'` literals and `"..."` identifiers is skipped, as is a
/// prefix glued to a preceding word (`a@b`) or to another prefix (`@@ROWCOUNT`).
fn placeholder_spans(sql: &str, prefix: &str) -> Vec<(usize, usize)> {
    let Some(pattern) = placeholder_pattern(prefix) else {
        return Vec::new();
    };
    pattern
        .find_iter(sql)
        .filter(|found| !found.as_str().starts_with(['\'', '"']))
        .filter(|found| {
            sql[..found.start()]
                .chars()
                .next_back()
                .map_or(true, |c| !(c.is_alphanumeric() || c == '_' || prefix.contains(c)))
        })
        .map(|found| (found.start(), found.end()))
        .collect()
}

/// Replace every `<prefix>name` token with a positional placeholder.
///
/// Returns the rewritten SQL and one parameter per token, in encounter order.
/// A name used twice in the text yields two parameters.
pub fn rewrite_placeholders(
    sql: &str,
    parameters: &Parameters,
    prefix: &str,
    style: PlaceholderStyle,
) -> (String, Parameters) {
    let mut resolved = Parameters::new();
    let mut output = String::with_capacity(sql.len());
    let mut last = 0;
    for (start, end) in placeholder_spans(sql, prefix) {
        output.push_str(&sql[last..start]);
        last = end;
        let index = resolved.len();
        output.push_str(&style.placeholder(index));
        resolved.push(parameters.resolve(&sql[start..end], prefix, index));
    }
    output.push_str(&sql[last..]);

    (output, resolved)
}

/// Replace every `<prefix>name` token with the parameter's SQL literal.
pub fn inline_literals(sql: &str, parameters: &Parameters, prefix: &str) -> String {
    let mut output = String::with_capacity(sql.len());
    let mut last = 0;
    for (start, end) in placeholder_spans(sql, prefix) {
        output.push_str(&sql[last..start]);
        last = end;
        output.push_str(&parameters.resolve(&sql[start..end], prefix, 0).value().to_sql_literal());
    }
    output.push_str(&sql[last..]);
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Parameters {
        let mut params = Parameters::new();
        params.add("Id", 42).add("@name", "O'Brien");
        params
    }

    #[test]
    fn test_rewrite_orders_parameters_by_encounter() {
        let (sql, resolved) = rewrite_placeholders(
            "SELECT * FROM t WHERE name = @Name AND id = @id OR parent = @ID",
            &sample(),
            "@",
            PlaceholderStyle::QuestionMark,
        );
        assert_eq!(sql, "SELECT * FROM t WHERE name = ? AND id = ? OR parent = ?");
        let names: Vec<&str> = resolved.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["@@name0", "@Id1", "@Id2"]);
        assert_eq!(resolved.iter().nth(1).unwrap().value(), &ParameterValue::Int(42));
    }

    #[test]
    fn test_rewrite_unmatched_token_becomes_null() {
        let (sql, resolved) = rewrite_placeholders(
            "SELECT @missing",
            &Parameters::new(),
            "@",
            PlaceholderStyle::QuestionMark,
        );
        assert_eq!(sql, "SELECT ?");
        assert_eq!(resolved.len(), 1);
        let param = resolved.iter().next().unwrap();
        assert_eq!(param.name(), "@missing0");
        assert!(param.value().is_null());
    }

    #[test]
    fn test_rewrite_numbered_placeholders() {
        let (sql, resolved) = rewrite_placeholders(
            "UPDATE t SET a = @a WHERE id = @id",
            &Parameters::from_iter([Parameter::new("a", 1), Parameter::new("id", 2)]),
            "@",
            PlaceholderStyle::Numbered,
        );
        assert_eq!(sql, "UPDATE t SET a = $1 WHERE id = $2");
        assert_eq!(resolved.len(), 2);
    }

    #[test]
    fn test_dollar_prefix_is_escaped() {
        let mut params = Parameters::new();
        params.add("from", "2024-01-01");
        let (sql, resolved) =
            rewrite_placeholders("SELECT * FROM e WHERE d >= $from", &params, "$", PlaceholderStyle::QuestionMark);
        assert_eq!(sql, "SELECT * FROM e WHERE d >= ?");
        assert_eq!(resolved.iter().next().unwrap().name(), "$from0");
    }

    #[test]
    fn test_rewrite_skips_quoted_text_and_operators() {
        let mut params = Parameters::new();
        params.add("tags", "{a}").add("mail", "x@y.z");
        let (sql, resolved) = rewrite_placeholders(
            "SELECT * FROM t WHERE tags @> @tags AND note <> 'ping @tags' AND \"@col\" = @mail",
            &params,
            "@",
            PlaceholderStyle::Numbered,
        );
        assert_eq!(
            sql,
            "SELECT * FROM t WHERE tags @> $1 AND note <> 'ping @tags' AND \"@col\" = $2"
        );
        let names: Vec<&str> = resolved.iter().map(|p| p.name()).collect();
        assert_eq!(names, vec!["@tags0", "@mail1"]);
    }

    #[test]
    fn test_rewrite_ignores_glued_prefixes() {
        let (sql, resolved) = rewrite_placeholders(
            "SELECT @@ROWCOUNT, owner@host, @id",
            &Parameters::from_iter([Parameter::new("id", 1)]),
            "@",
            PlaceholderStyle::QuestionMark,
        );
        assert_eq!(sql, "SELECT @@ROWCOUNT, owner@host, ?");
        assert_eq!(resolved.len(), 1);
    }

    #[test]
    fn test_inline_leaves_string_literals_alone() {
        let mut params = Parameters::new();
        params.add("id", 7);
        assert_eq!(
            inline_literals("SELECT 'a@id' AS s, @id AS n", &params, "@"),
            "SELECT 'a@id' AS s, 7 AS n"
        );
    }

    #[test]
    fn test_inline_literals() {
        let mut params = Parameters::new();
        params
            .add("name", "O'Brien")
            .add("active", true)
            .add("ratio", 0.5)
            .add("born", NaiveDate::from_ymd_opt(1990, 7, 4).unwrap())
            .add("note", None::<String>);
        let sql = inline_literals(
            "SELECT @name, @active, @ratio, @born, @note, @unknown",
            &params,
            "@",
        );
        assert_eq!(sql, "SELECT 'O''Brien', 1, 0.5, '1990-07-04', NULL, NULL");
    }

    #[test]
    fn test_datetime_literal_keeps_date_part() {
        let value = ParameterValue::DateTime(
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(13, 45, 0)
                .unwrap(),
        );
        assert_eq!(value.to_sql_literal(), "'2024-02-29'");
    }

    #[test]
    fn test_bytes_literal_is_quoted_hex() {
        assert_eq!(ParameterValue::Bytes(vec![0xde, 0xad, 0x01]).to_sql_literal(), "'DEAD01'");
    }

    #[test]
    fn test_find_tolerates_prefix() {
        let params = sample();
        assert!(params.find("@id").is_some());
        assert!(params.find("NAME").is_some());
        assert!(params.find("other").is_none());
    }

    #[test]
    fn test_add_text_truncated() {
        let mut params = Parameters::new();
        params.add_text_truncated("code", Some("ñandú-123"), 5);
        assert_eq!(
            params.find("code").unwrap().value(),
            &ParameterValue::Text("ñandú".to_string())
        );
        assert_eq!(params.find("code").unwrap().length(), 5);
    }
}
