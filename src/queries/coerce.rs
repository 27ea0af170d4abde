//! Operator legality and literal rendering per type category.
//!
//! Legality is decided from the (category, operator) pair before the raw value
//! is looked at, so an illegal combination fails the same way for every input.

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::BuildError;
use crate::db::{escape_literal, quote_literal};
use crate::schema::TypeCategory;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(?:\d+\.?\d*|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid regex"));

const TRUE_TOKENS: &[&str] = &["true", "t", "1", "yes", "y"];
const FALSE_TOKENS: &[&str] = &["false", "f", "0", "no", "n"];

/// Comparison operators accepted in filters, CASE conditions, HAVING and CHECK.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Lt,
    Gte,
    Lte,
    Between,
    Like,
    ILike,
    Regex,
    RegexInsensitive,
    NotRegex,
    NotRegexInsensitive,
    SimilarTo,
    NotSimilarTo,
    IsNull,
    IsNotNull,
}

impl Operator {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::NotEq => "<>",
            Self::Gt => ">",
            Self::Lt => "<",
            Self::Gte => ">=",
            Self::Lte => "<=",
            Self::Between => "BETWEEN",
            Self::Like => "LIKE",
            Self::ILike => "ILIKE",
            Self::Regex => "~",
            Self::RegexInsensitive => "~*",
            Self::NotRegex => "!~",
            Self::NotRegexInsensitive => "!~*",
            Self::SimilarTo => "SIMILAR TO",
            Self::NotSimilarTo => "NOT SIMILAR TO",
            Self::IsNull => "IS NULL",
            Self::IsNotNull => "IS NOT NULL",
        }
    }

    /// `>`, `<`, `>=`, `<=` and `BETWEEN`.
    pub fn is_ordering(self) -> bool {
        matches!(self, Self::Gt | Self::Lt | Self::Gte | Self::Lte | Self::Between)
    }

    pub fn is_pattern(self) -> bool {
        matches!(
            self,
            Self::Like
                | Self::ILike
                | Self::Regex
                | Self::RegexInsensitive
                | Self::NotRegex
                | Self::NotRegexInsensitive
                | Self::SimilarTo
                | Self::NotSimilarTo
        )
    }

    pub fn is_null_test(self) -> bool {
        matches!(self, Self::IsNull | Self::IsNotNull)
    }

    /// Binary operators usable against `ANY`/`ALL` subqueries.
    pub fn is_scalar_comparison(self) -> bool {
        matches!(self, Self::Eq | Self::NotEq | Self::Gt | Self::Lt | Self::Gte | Self::Lte)
    }

    fn is_like_family(self) -> bool {
        matches!(self, Self::Like | Self::ILike)
    }

    pub fn is_legal_for(self, category: TypeCategory) -> bool {
        match self {
            Self::Eq | Self::NotEq | Self::IsNull | Self::IsNotNull => true,
            op if op.is_ordering() => {
                matches!(category, TypeCategory::Numeric | TypeCategory::DateTime)
            }
            _ => category == TypeCategory::Text,
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sql())
    }
}

impl FromStr for Operator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.split_whitespace().collect::<Vec<_>>().join(" ").to_uppercase();
        let op = match normalized.as_str() {
            "=" | "==" => Self::Eq,
            "<>" | "!=" => Self::NotEq,
            ">" => Self::Gt,
            "<" => Self::Lt,
            ">=" => Self::Gte,
            "<=" => Self::Lte,
            "BETWEEN" => Self::Between,
            "LIKE" => Self::Like,
            "ILIKE" => Self::ILike,
            "~" => Self::Regex,
            "~*" => Self::RegexInsensitive,
            "!~" => Self::NotRegex,
            "!~*" => Self::NotRegexInsensitive,
            "SIMILAR TO" => Self::SimilarTo,
            "NOT SIMILAR TO" => Self::NotSimilarTo,
            "IS NULL" => Self::IsNull,
            "IS NOT NULL" => Self::IsNotNull,
            _ => return Err(format!("unknown operator '{s}'")),
        };
        Ok(op)
    }
}

impl TryFrom<String> for Operator {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.sql().to_string()
    }
}

/// A literal that is safe to splice into SQL text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlLiteral(String);

impl SqlLiteral {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SqlLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Fail unless `op` may be applied to a column of `category`.
pub fn check_operator(category: TypeCategory, op: Operator) -> Result<(), BuildError> {
    if op.is_legal_for(category) {
        Ok(())
    } else {
        Err(BuildError::InvalidOperatorForType { category, operator: op })
    }
}

/// Turn a raw user value into a literal for comparison with `op`.
///
/// Returns `None` for `IS NULL`/`IS NOT NULL`, which take no literal.
/// Date/time values are only quoted; the server validates them on execution.
pub fn coerce(raw: &str, category: TypeCategory, op: Operator) -> Result<Option<SqlLiteral>, BuildError> {
    check_operator(category, op)?;
    if op.is_null_test() {
        return Ok(None);
    }
    let value = normalize(raw, category, op)?;
    Ok(Some(render(&value, category)))
}

/// Canonical unquoted text of a value; also what gets bound as a parameter.
pub(crate) fn normalize(raw: &str, category: TypeCategory, op: Operator) -> Result<String, BuildError> {
    if raw.contains('\0') {
        return Err(invalid(raw, category, "contains a NUL character"));
    }
    match category {
        TypeCategory::Numeric => {
            let candidate = raw.trim().replace(',', ".");
            let finite = candidate.parse::<f64>().map(f64::is_finite).unwrap_or(false);
            if NUMBER.is_match(&candidate) && finite {
                Ok(candidate)
            } else {
                Err(invalid(raw, category, "not a number"))
            }
        }
        TypeCategory::Boolean => {
            let token = raw.trim().to_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                Ok("true".to_string())
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                Ok("false".to_string())
            } else {
                Err(invalid(raw, category, "expected true/false, yes/no, t/f, y/n or 1/0"))
            }
        }
        TypeCategory::Text if op.is_like_family() && !raw.contains(['%', '_']) => {
            Ok(format!("%{raw}%"))
        }
        TypeCategory::Array => {
            array_literal(raw).ok_or_else(|| invalid(raw, category, "unbalanced quotes or braces in array literal"))
        }
        TypeCategory::Text
        | TypeCategory::DateTime
        | TypeCategory::Enum
        | TypeCategory::Composite
        | TypeCategory::Other => Ok(raw.to_string()),
    }
}

/// Render a normalized value: numbers and booleans bare, everything else quoted.
pub(crate) fn render(value: &str, category: TypeCategory) -> SqlLiteral {
    match category {
        TypeCategory::Numeric | TypeCategory::Boolean => SqlLiteral(value.to_string()),
        _ => SqlLiteral(quote_literal(value)),
    }
}

/// Quote a label (CASE result, padding fill, separator) as a text literal.
pub(crate) fn text_literal(value: &str) -> Result<SqlLiteral, BuildError> {
    if value.contains('\0') {
        return Err(invalid(value, TypeCategory::Text, "contains a NUL character"));
    }
    Ok(SqlLiteral(format!("'{}'", escape_literal(value))))
}

/// One `lhs op value` condition with its raw operands.
///
/// Shared by WHERE filters, CASE conditions, HAVING and CHECK constraints.
pub(crate) struct Comparison<'a> {
    pub lhs: &'a str,
    pub category: TypeCategory,
    pub declared_type: &'a str,
    pub op: Operator,
    pub value: Option<&'a str>,
    pub value2: Option<&'a str>,
}

impl Comparison<'_> {
    /// Render the condition. With `params`, operands become `$n` placeholders
    /// and their normalized values are appended to the list.
    pub fn render(&self, context: &str, mut params: Option<&mut Vec<String>>) -> Result<String, BuildError> {
        check_operator(self.category, self.op)?;
        if self.op.is_null_test() {
            return Ok(format!("{} {}", self.lhs, self.op.sql()));
        }

        let value = self.value.ok_or_else(|| missing(context, "value"))?;
        let first = self.operand(value, &mut params)?;
        if self.op == Operator::Between {
            let high = self.value2.ok_or_else(|| missing(context, "value2"))?;
            let second = self.operand(high, &mut params)?;
            return Ok(format!("{} BETWEEN {} AND {}", self.lhs, first, second));
        }
        Ok(format!("{} {} {}", self.lhs, self.op.sql(), first))
    }

    fn operand(&self, raw: &str, params: &mut Option<&mut Vec<String>>) -> Result<String, BuildError> {
        let normalized = normalize(raw, self.category, self.op)?;
        match params {
            Some(list) => {
                list.push(normalized);
                Ok(placeholder(list.len(), self.category, self.declared_type))
            }
            None => Ok(render(&normalized, self.category).to_string()),
        }
    }
}

/// `$n` for text columns; other types receive text and cast it server-side.
///
/// Numbers are cast to `numeric` rather than the column type so a value
/// such as `3.5` compares against an integer column instead of failing the
/// cast.
fn placeholder(index: usize, category: TypeCategory, declared_type: &str) -> String {
    match category {
        TypeCategory::Text => format!("${index}"),
        TypeCategory::Numeric => format!("${index}::text::numeric"),
        _ => format!("${index}::text::{declared_type}"),
    }
}

pub(crate) fn missing(context: &str, parameter: &str) -> BuildError {
    BuildError::MissingParameter {
        context: context.to_string(),
        parameter: parameter.to_string(),
    }
}

/// Array literal for `raw`.
///
/// A braced literal (`{1,2}`, `{{1,2},{3,4}}`, `{"a,b",c}`) is checked and
/// passed through unchanged. A bare list (`a, b`) becomes `{"a","b"}`, where
/// unquoted `NULL` elements stay NULL. `None` when quotes or braces are
/// unbalanced or a braced literal has an empty element.
fn array_literal(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if let Some(body) = trimmed.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
        if body.trim().is_empty() {
            return Some("{}".to_string());
        }
        let elements = split_array_elements(body)?;
        if elements.iter().any(|element| element.trim().is_empty()) {
            return None;
        }
        return Some(trimmed.to_string());
    }
    if trimmed.is_empty() {
        return Some("{}".to_string());
    }

    let elements: Vec<String> = split_array_elements(trimmed)?
        .into_iter()
        .map(str::trim)
        .map(|element| {
            if element.eq_ignore_ascii_case("null") {
                return "NULL".to_string();
            }
            let text = match element.strip_prefix('"').and_then(|s| s.strip_suffix('"')) {
                Some(quoted) => unescape_element(quoted),
                None => element.to_string(),
            };
            format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
        })
        .collect();
    Some(format!("{{{}}}", elements.join(",")))
}

/// Split at commas outside double quotes and nested braces.
fn split_array_elements(body: &str) -> Option<Vec<&str>> {
    let mut elements = Vec::new();
    let mut depth = 0usize;
    let mut in_quotes = false;
    let mut escaped = false;
    let mut start = 0;
    for (i, c) in body.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '"' => in_quotes = !in_quotes,
            '{' if !in_quotes => depth += 1,
            '}' if !in_quotes => depth = depth.checked_sub(1)?,
            ',' if !in_quotes && depth == 0 => {
                elements.push(&body[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if in_quotes || escaped || depth != 0 {
        return None;
    }
    elements.push(&body[start..]);
    Some(elements)
}

fn unescape_element(quoted: &str) -> String {
    let mut text = String::with_capacity(quoted.len());
    let mut chars = quoted.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            text.extend(chars.next());
        } else {
            text.push(c);
        }
    }
    text
}

fn invalid(raw: &str, category: TypeCategory, reason: &str) -> BuildError {
    BuildError::InvalidLiteral {
        category,
        value: raw.to_string(),
        reason: reason.to_string(),
    }
}
