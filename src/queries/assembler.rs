//! Deterministic rendering of one SELECT statement from a [`QuerySpec`].
//!
//! Clause order is fixed: select list, source, WHERE, GROUP BY, HAVING,
//! ORDER BY, LIMIT. Rendering only reads the descriptor and the table metadata, so
//! the same input always yields byte-identical SQL.

use std::collections::HashSet;

use serde::Serialize;

use super::coerce::{check_operator, missing, Comparison};
use super::expressions::{flatten, render_computed};
use super::spec::{
    AggregateFunction, ColumnRef, ComputedExpr, Expression, Filter, Grouping, GroupingMode, HavingPredicate,
    Ordering, Projection, QuerySpec, Source, SubqueryMode, SubqueryPredicate, AGGREGATE_ALIAS,
};
use super::BuildError;
use crate::db::{quote_ident, quote_qualified, Connection};
use crate::schema::{describe_table, ColumnMetadata, IntrospectionError, TableMetadata, TypeCategory};

/// Cap for every grouping mode; grouping sets enumerate every subset.
const MAX_GROUPING_COLUMNS: usize = 3;

/// SQL text plus the values for its `$n` placeholders, in order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedQuery {
    pub sql: String,
    pub params: Vec<String>,
}

/// Renders query descriptors against a fixed set of table metadata.
#[derive(Debug, Clone)]
pub struct Assembler {
    schema: String,
    tables: Vec<TableMetadata>,
}

impl Assembler {
    pub fn new(schema: &str, tables: Vec<TableMetadata>) -> Self {
        Self {
            schema: schema.to_string(),
            tables,
        }
    }

    /// Describe every table `spec` reads and build an assembler over them.
    pub fn load(conn: &mut dyn Connection, schema: &str, spec: &QuerySpec) -> Result<Self, IntrospectionError> {
        let mut tables = Vec::new();
        for name in spec.referenced_tables() {
            tables.push(describe_table(conn, schema, name)?);
        }
        Ok(Self::new(schema, tables))
    }

    pub fn schema(&self) -> &str {
        &self.schema
    }

    pub fn render(&self, spec: &QuerySpec) -> Result<RenderedQuery, BuildError> {
        let (from, scope) = self.source(&spec.source)?;
        let mut params = Vec::new();

        let mut sql = format!("SELECT {} FROM {}", select_list(&scope, spec)?, from);

        let mut conditions = Vec::new();
        for filter in &spec.predicates {
            conditions.push(render_filter(&scope, filter, &mut params)?);
        }
        if let Some(subquery) = &spec.subquery {
            conditions.push(self.subquery(&scope, subquery, &mut params)?);
        }
        if !conditions.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&conditions.join(" AND "));
        }

        if let Some(grouping) = &spec.grouping {
            sql.push_str(" GROUP BY ");
            sql.push_str(&group_by(&scope, grouping)?);
        }

        if !spec.having.is_empty() {
            if spec.grouping.is_none() && spec.aggregate.is_none() {
                return Err(BuildError::HavingWithoutAggregation);
            }
            let having = spec
                .having
                .iter()
                .map(|predicate| render_having(&scope, predicate))
                .collect::<Result<Vec<_>, _>>()?;
            sql.push_str(" HAVING ");
            sql.push_str(&having.join(" AND "));
        }

        if let Some(ordering) = &spec.ordering {
            sql.push_str(" ORDER BY ");
            sql.push_str(&order_by(&scope, spec, ordering)?);
        }

        if let Some(limit) = spec.limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }

        Ok(RenderedQuery { sql, params })
    }

    fn table(&self, name: &str) -> Result<&TableMetadata, BuildError> {
        self.tables
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| BuildError::UnknownTable {
                table: name.to_string(),
            })
    }

    fn source(&self, source: &Source) -> Result<(String, Scope<'_>), BuildError> {
        match source {
            Source::Table(name) => {
                let table = self.table(name)?;
                Ok((quote_qualified(&self.schema, &table.name), Scope::single(table)))
            }
            Source::Join(join) => {
                if join.left == join.right {
                    return Err(BuildError::InvalidParameter {
                        context: format!("join of {}", join.left),
                        reason: "a table cannot be joined with itself".to_string(),
                    });
                }
                let left = self.table(&join.left)?;
                let right = self.table(&join.right)?;
                let scope = Scope::joined(left, right);

                let left_key = scope.resolve(&ColumnRef::qualified(&left.name, &join.left_key))?;
                let right_key = scope.resolve(&ColumnRef::qualified(&right.name, &join.right_key))?;
                if left_key.column.category != right_key.column.category {
                    return Err(BuildError::IncompatibleJoinKeys {
                        left: format!("{}.{}", left.name, join.left_key),
                        left_category: left_key.column.category,
                        right: format!("{}.{}", right.name, join.right_key),
                        right_category: right_key.column.category,
                    });
                }

                let from = format!(
                    "{} {} {} ON {} = {}",
                    quote_qualified(&self.schema, &left.name),
                    join.kind.sql(),
                    quote_qualified(&self.schema, &right.name),
                    left_key.sql,
                    right_key.sql
                );
                Ok((from, scope))
            }
        }
    }

    fn subquery(
        &self,
        scope: &Scope<'_>,
        subquery: &SubqueryPredicate,
        params: &mut Vec<String>,
    ) -> Result<String, BuildError> {
        let inner = self.table(&subquery.inner_table)?;
        let inner_scope = Scope::single(inner);
        let inner_column = inner_scope.resolve(&ColumnRef::new(&subquery.inner_column))?;

        let mut select = format!(
            "SELECT {} FROM {}",
            inner_column.sql,
            quote_qualified(&self.schema, &inner.name)
        );
        if let Some(filter) = &subquery.inner_filter {
            select.push_str(" WHERE ");
            select.push_str(&render_filter(&inner_scope, filter, params)?);
        }

        match subquery.mode {
            SubqueryMode::Exists => Ok(format!("EXISTS ({select})")),
            SubqueryMode::NotExists => Ok(format!("NOT EXISTS ({select})")),
            SubqueryMode::Any | SubqueryMode::All => {
                let context = "subquery predicate";
                let left = subquery.left.as_ref().ok_or_else(|| missing(context, "left"))?;
                let op = subquery.operator.ok_or_else(|| missing(context, "operator"))?;
                let left = scope.resolve(left)?;
                if !op.is_scalar_comparison() {
                    return Err(BuildError::InvalidParameter {
                        context: context.to_string(),
                        reason: format!("{op} cannot be combined with ANY/ALL"),
                    });
                }
                check_operator(left.column.category, op)?;
                let quantifier = if subquery.mode == SubqueryMode::Any { "ANY" } else { "ALL" };
                Ok(format!("{} {} {} ({})", left.sql, op.sql(), quantifier, select))
            }
        }
    }
}

/// Tables visible to column references, with or without qualification.
pub(crate) struct Scope<'a> {
    tables: Vec<&'a TableMetadata>,
    qualify: bool,
}

pub(crate) struct Resolved<'a> {
    pub table: &'a TableMetadata,
    pub column: &'a ColumnMetadata,
    /// Quoted reference, `table.column` when the scope is a join.
    pub sql: String,
}

impl<'a> Scope<'a> {
    pub fn single(table: &'a TableMetadata) -> Self {
        Self {
            tables: vec![table],
            qualify: false,
        }
    }

    pub fn joined(left: &'a TableMetadata, right: &'a TableMetadata) -> Self {
        Self {
            tables: vec![left, right],
            qualify: true,
        }
    }

    fn table(&self, name: &str) -> Result<&'a TableMetadata, BuildError> {
        self.tables
            .iter()
            .copied()
            .find(|t| t.name == name)
            .ok_or_else(|| BuildError::UnknownTable {
                table: name.to_string(),
            })
    }

    pub fn resolve(&self, reference: &ColumnRef) -> Result<Resolved<'a>, BuildError> {
        let candidates = match &reference.table {
            Some(name) => vec![self.table(name)?],
            None => self.tables.clone(),
        };
        let mut matches = candidates
            .into_iter()
            .filter_map(|table| table.column(&reference.column).map(|column| (table, column)));

        let (table, column) = matches.next().ok_or_else(|| BuildError::UnknownColumn {
            column: reference.to_string(),
        })?;
        if matches.next().is_some() {
            return Err(BuildError::AmbiguousColumn {
                column: reference.column.clone(),
            });
        }

        let sql = if self.qualify {
            format!("{}.{}", quote_ident(&table.name), quote_ident(&column.name))
        } else {
            quote_ident(&column.name)
        };
        Ok(Resolved { table, column, sql })
    }
}

fn select_list(scope: &Scope<'_>, spec: &QuerySpec) -> Result<String, BuildError> {
    if let Some(aggregate) = &spec.aggregate {
        let mut items = Vec::new();
        if let Some(grouping) = &spec.grouping {
            for column in &grouping.columns {
                items.push(scope.resolve(column)?.sql);
            }
        }
        items.push(format!(
            "{} AS {}",
            aggregate_call(scope, aggregate.function, &aggregate.target)?,
            AGGREGATE_ALIAS
        ));
        return Ok(items.join(", "));
    }

    let mut aliases = Aliases::default();
    let mut items = spec
        .projections
        .iter()
        .map(|projection| render_projection(scope, projection, &mut aliases))
        .collect::<Result<Vec<_>, _>>()?;
    if items.is_empty() {
        items.push("*".to_string());
    }
    for expr in &spec.computed_expressions {
        items.push(computed_item(scope, expr, None, &mut aliases)?);
    }
    Ok(items.join(", "))
}

fn render_projection(scope: &Scope<'_>, projection: &Projection, aliases: &mut Aliases) -> Result<String, BuildError> {
    match &projection.expr {
        Expression::Column(column) if column.column == "*" => match &column.table {
            Some(name) => Ok(format!("{}.*", quote_ident(&scope.table(name)?.name))),
            None => Ok("*".to_string()),
        },
        Expression::Column(column) => {
            let resolved = scope.resolve(column)?;
            let alias = match &projection.alias {
                Some(alias) => aliases.explicit(alias)?,
                None => aliases.derived(flatten(&format!("{}_{}", resolved.table.name, resolved.column.name))),
            };
            Ok(format!("{} AS {}", resolved.sql, quote_ident(&alias)))
        }
        Expression::Computed(expr) => computed_item(scope, expr, projection.alias.as_deref(), aliases),
    }
}

fn computed_item(
    scope: &Scope<'_>,
    expr: &ComputedExpr,
    alias: Option<&str>,
    aliases: &mut Aliases,
) -> Result<String, BuildError> {
    let (sql, default_alias) = render_computed(scope, expr)?;
    let alias = match alias {
        Some(alias) => aliases.explicit(alias)?,
        None => aliases.derived(default_alias),
    };
    Ok(format!("{} AS {}", sql, quote_ident(&alias)))
}

/// Output names already taken in one select list.
///
/// A view cannot have two columns with the same name, so derived aliases get
/// a `_2`, `_3`, ... suffix and a repeated caller alias is rejected.
#[derive(Default)]
struct Aliases(HashSet<String>);

impl Aliases {
    fn explicit(&mut self, alias: &str) -> Result<String, BuildError> {
        if self.0.insert(alias.to_string()) {
            Ok(alias.to_string())
        } else {
            Err(BuildError::DuplicateEntry {
                name: "select list".to_string(),
                what: "alias",
                value: alias.to_string(),
            })
        }
    }

    fn derived(&mut self, base: String) -> String {
        let mut alias = base.clone();
        let mut n = 1;
        while !self.0.insert(alias.clone()) {
            n += 1;
            alias = format!("{base}_{n}");
        }
        alias
    }
}

fn aggregate_call(scope: &Scope<'_>, function: AggregateFunction, target: &ColumnRef) -> Result<String, BuildError> {
    let context = format!("{} aggregate", function.sql());
    if target.column == "*" {
        if function != AggregateFunction::Count {
            return Err(BuildError::InvalidParameter {
                context,
                reason: "only COUNT accepts *".to_string(),
            });
        }
        return Ok("COUNT(*)".to_string());
    }

    let resolved = scope.resolve(target)?;
    let numeric_only = matches!(function, AggregateFunction::Sum | AggregateFunction::Avg);
    if numeric_only && resolved.column.category != TypeCategory::Numeric {
        return Err(BuildError::InvalidParameter {
            context,
            reason: format!("'{}' is a {} column", target, resolved.column.category),
        });
    }
    Ok(format!("{}({})", function.sql(), resolved.sql))
}

pub(crate) fn render_filter(scope: &Scope<'_>, filter: &Filter, params: &mut Vec<String>) -> Result<String, BuildError> {
    let resolved = scope.resolve(&filter.column)?;
    let context = format!("filter on {}", filter.column);
    Comparison {
        lhs: &resolved.sql,
        category: resolved.column.category,
        declared_type: &resolved.column.declared_type,
        op: filter.op,
        value: filter.value.as_deref(),
        value2: filter.value2.as_deref(),
    }
    .render(&context, filter.bind.then_some(params))
}

fn render_having(scope: &Scope<'_>, predicate: &HavingPredicate) -> Result<String, BuildError> {
    let lhs = aggregate_call(scope, predicate.function, &predicate.column)?;
    Comparison {
        lhs: &lhs,
        category: TypeCategory::Numeric,
        declared_type: "numeric",
        op: predicate.op,
        value: Some(&predicate.value),
        value2: predicate.value2.as_deref(),
    }
    .render("having", None)
}

fn group_by(scope: &Scope<'_>, grouping: &Grouping) -> Result<String, BuildError> {
    let count = grouping.columns.len();
    if count == 0 || count > MAX_GROUPING_COLUMNS {
        return Err(BuildError::GroupingColumnCount { count });
    }
    let columns = grouping
        .columns
        .iter()
        .map(|column| scope.resolve(column).map(|r| r.sql))
        .collect::<Result<Vec<_>, _>>()?;
    let list = columns.join(", ");

    Ok(match grouping.mode {
        GroupingMode::Plain => list,
        GroupingMode::Rollup => format!("ROLLUP({list})"),
        GroupingMode::Cube => format!("CUBE({list})"),
        GroupingMode::GroupingSets => format!("GROUPING SETS ({})", grouping_sets(&columns).join(", ")),
    })
}

/// Every subset of `columns` as `(a, b)`, largest first, then in column order.
fn grouping_sets(columns: &[String]) -> Vec<String> {
    let n = columns.len();
    let mut subsets: Vec<Vec<usize>> = (0..(1u32 << n))
        .map(|mask| (0..n).filter(|i| mask & (1 << i) != 0).collect())
        .collect();
    subsets.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    subsets
        .into_iter()
        .map(|subset| {
            let names: Vec<&str> = subset.iter().map(|&i| columns[i].as_str()).collect();
            format!("({})", names.join(", "))
        })
        .collect()
}

fn order_by(scope: &Scope<'_>, spec: &QuerySpec, ordering: &Ordering) -> Result<String, BuildError> {
    let column = &ordering.column;
    let sql = if spec.aggregate.is_none() {
        scope.resolve(column)?.sql
    } else if column.table.is_none() && column.column == AGGREGATE_ALIAS {
        AGGREGATE_ALIAS.to_string()
    } else {
        let invalid = || BuildError::InvalidOrderColumn {
            column: column.to_string(),
        };
        let target = scope.resolve(column).map_err(|_| invalid())?;
        let grouped = spec.grouping.iter().flat_map(|g| &g.columns).any(|c| {
            scope
                .resolve(c)
                .is_ok_and(|r| std::ptr::eq(r.column, target.column))
        });
        if !grouped {
            return Err(invalid());
        }
        target.sql
    };
    Ok(format!("{} {}", sql, ordering.direction.sql()))
}
