//! Structured query descriptors.
//!
//! A [`QuerySpec`] never carries SQL text: filter values stay raw until the
//! assembler coerces them against the column they are compared with.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::coerce::Operator;

/// Column reference, written `column` or `table.column`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnRef {
    pub table: Option<String>,
    pub column: String,
}

impl ColumnRef {
    pub fn new(column: &str) -> Self {
        Self {
            table: None,
            column: column.to_string(),
        }
    }

    pub fn qualified(table: &str, column: &str) -> Self {
        Self {
            table: Some(table.to_string()),
            column: column.to_string(),
        }
    }
}

impl fmt::Display for ColumnRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.table {
            Some(table) => write!(f, "{}.{}", table, self.column),
            None => f.write_str(&self.column),
        }
    }
}

impl FromStr for ColumnRef {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.split_once('.') {
            Some((table, column)) if !table.is_empty() && !column.is_empty() => {
                Ok(Self::qualified(table, column))
            }
            Some(_) => Err(format!("malformed column reference '{s}'")),
            None if s.is_empty() => Err("empty column reference".to_string()),
            None => Ok(Self::new(s)),
        }
    }
}

impl TryFrom<String> for ColumnRef {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ColumnRef> for String {
    fn from(column: ColumnRef) -> Self {
        column.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JoinKind {
    Inner,
    Left,
    Right,
    Full,
}

impl JoinKind {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
            Self::Full => "FULL JOIN",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinSpec {
    pub left: String,
    pub right: String,
    pub left_key: String,
    pub right_key: String,
    #[serde(default = "default_join_kind")]
    pub kind: JoinKind,
}

fn default_join_kind() -> JoinKind {
    JoinKind::Inner
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    /// A table or view name.
    Table(String),
    Join(JoinSpec),
}

impl Source {
    /// Relations read by this source, left first.
    pub fn tables(&self) -> Vec<&str> {
        match self {
            Self::Table(name) => vec![name.as_str()],
            Self::Join(join) => vec![join.left.as_str(), join.right.as_str()],
        }
    }
}

/// `column op value [AND value2]`, with the value still raw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    pub column: ColumnRef,
    pub op: Operator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Upper bound for `BETWEEN`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
    /// Send the value as a bound parameter instead of an inline literal.
    #[serde(default)]
    pub bind: bool,
}

impl Filter {
    pub fn new(column: &str, op: Operator, value: &str) -> Self {
        Self {
            column: column.parse().unwrap_or_else(|_| ColumnRef::new(column)),
            op,
            value: Some(value.to_string()),
            value2: None,
            bind: false,
        }
    }

    pub fn between(column: &str, low: &str, high: &str) -> Self {
        Self {
            value2: Some(high.to_string()),
            ..Self::new(column, Operator::Between, low)
        }
    }

    pub fn null_test(column: &str, op: Operator) -> Self {
        Self {
            value: None,
            ..Self::new(column, op, "")
        }
    }

    pub fn bound(mut self) -> Self {
        self.bind = true;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubqueryMode {
    Any,
    All,
    Exists,
    NotExists,
}

/// `left op ANY|ALL (SELECT ...)` or `[NOT] EXISTS (SELECT ...)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubqueryPredicate {
    pub mode: SubqueryMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<ColumnRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub operator: Option<Operator>,
    pub inner_table: String,
    pub inner_column: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inner_filter: Option<Filter>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupingMode {
    Plain,
    Rollup,
    Cube,
    GroupingSets,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Grouping {
    pub mode: GroupingMode,
    pub columns: Vec<ColumnRef>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunction {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunction {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Count => "COUNT",
            Self::Sum => "SUM",
            Self::Avg => "AVG",
            Self::Min => "MIN",
            Self::Max => "MAX",
        }
    }
}

/// Alias of the aggregate column in the result set.
pub const AGGREGATE_ALIAS: &str = "agg_value";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Aggregate {
    pub function: AggregateFunction,
    /// Column to aggregate; `*` is allowed for `count`.
    pub target: ColumnRef,
}

/// `func(column) op value`; the value is always coerced as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HavingPredicate {
    pub function: AggregateFunction,
    pub column: ColumnRef,
    pub op: Operator,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value2: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ordering {
    pub column: ColumnRef,
    #[serde(default)]
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StringFunction {
    Upper,
    Lower,
    Trim,
    Substring,
    Lpad,
    Rpad,
    Concat,
}

impl StringFunction {
    pub fn name(self) -> &'static str {
        match self {
            Self::Upper => "upper",
            Self::Lower => "lower",
            Self::Trim => "trim",
            Self::Substring => "substring",
            Self::Lpad => "lpad",
            Self::Rpad => "rpad",
            Self::Concat => "concat",
        }
    }
}

/// Derived projection columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComputedExpr {
    /// `CASE WHEN column op value THEN 'then' [ELSE 'else'] END`; results are text.
    Case {
        column: ColumnRef,
        op: Operator,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        value2: Option<String>,
        then: String,
        #[serde(default, rename = "else", skip_serializing_if = "Option::is_none")]
        otherwise: Option<String>,
    },
    Coalesce {
        column: ColumnRef,
        fallback: String,
    },
    Nullif {
        column: ColumnRef,
        compare: String,
    },
    StringOp {
        function: StringFunction,
        source: ColumnRef,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        second: Option<ColumnRef>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        separator: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        start: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        length: Option<i64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        fill: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expression {
    Column(ColumnRef),
    Computed(ComputedExpr),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projection {
    pub expr: Expression,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

impl Projection {
    pub fn column(column: &str) -> Self {
        Self {
            expr: Expression::Column(column.parse().unwrap_or_else(|_| ColumnRef::new(column))),
            alias: None,
        }
    }

    pub fn computed(expr: ComputedExpr) -> Self {
        Self {
            expr: Expression::Computed(expr),
            alias: None,
        }
    }

    pub fn with_alias(mut self, alias: &str) -> Self {
        self.alias = Some(alias.to_string());
        self
    }
}

/// Everything needed to render one SELECT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuerySpec {
    pub source: Source,
    #[serde(default)]
    pub projections: Vec<Projection>,
    #[serde(default)]
    pub predicates: Vec<Filter>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subquery: Option<SubqueryPredicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping: Option<Grouping>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aggregate: Option<Aggregate>,
    #[serde(default)]
    pub having: Vec<HavingPredicate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ordering: Option<Ordering>,
    /// Appended to the select list after `projections`, with default aliases.
    #[serde(default)]
    pub computed_expressions: Vec<ComputedExpr>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl QuerySpec {
    pub fn new(source: Source) -> Self {
        Self {
            source,
            projections: Vec::new(),
            predicates: Vec::new(),
            subquery: None,
            grouping: None,
            aggregate: None,
            having: Vec::new(),
            ordering: None,
            computed_expressions: Vec::new(),
            limit: None,
        }
    }

    pub fn table(name: &str) -> Self {
        Self::new(Source::Table(name.to_string()))
    }

    /// Every relation whose metadata rendering needs.
    pub fn referenced_tables(&self) -> Vec<&str> {
        let mut tables = self.source.tables();
        if let Some(sub) = &self.subquery {
            if !tables.contains(&sub.inner_table.as_str()) {
                tables.push(sub.inner_table.as_str());
            }
        }
        tables
    }
}
