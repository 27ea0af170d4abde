//! Rendering of CASE, COALESCE, NULLIF and string-function projections.

use super::assembler::Scope;
use super::coerce::{missing, normalize, render, text_literal, Comparison, Operator};
use super::spec::{ComputedExpr, StringFunction};
use super::BuildError;

/// Render `expr`, returning its SQL and the alias used when none is given.
pub(crate) fn render_computed(scope: &Scope<'_>, expr: &ComputedExpr) -> Result<(String, String), BuildError> {
    match expr {
        ComputedExpr::Case {
            column,
            op,
            value,
            value2,
            then,
            otherwise,
        } => {
            let resolved = scope.resolve(column)?;
            let context = format!("case on {column}");
            let condition = Comparison {
                lhs: &resolved.sql,
                category: resolved.column.category,
                declared_type: &resolved.column.declared_type,
                op: *op,
                value: value.as_deref(),
                value2: value2.as_deref(),
            }
            .render(&context, None)?;
            let mut sql = format!("CASE WHEN {} THEN {}", condition, text_literal(then)?);
            if let Some(otherwise) = otherwise {
                sql.push_str(&format!(" ELSE {}", text_literal(otherwise)?));
            }
            sql.push_str(" END");
            Ok((sql, default_alias(&column.column, "case")))
        }
        ComputedExpr::Coalesce { column, fallback } => {
            let resolved = scope.resolve(column)?;
            let category = resolved.column.category;
            let literal = render(&normalize(fallback, category, Operator::Eq)?, category);
            Ok((
                format!("COALESCE({}, {})", resolved.sql, literal),
                default_alias(&column.column, "coalesce"),
            ))
        }
        ComputedExpr::Nullif { column, compare } => {
            let resolved = scope.resolve(column)?;
            let category = resolved.column.category;
            let literal = render(&normalize(compare, category, Operator::Eq)?, category);
            Ok((
                format!("NULLIF({}, {})", resolved.sql, literal),
                default_alias(&column.column, "nullif"),
            ))
        }
        ComputedExpr::StringOp {
            function,
            source,
            second,
            separator,
            start,
            length,
            fill,
        } => {
            let resolved = scope.resolve(source)?;
            let text = format!("{}::text", resolved.sql);
            let context = format!("{} on {}", function.name(), source);
            let sql = match function {
                StringFunction::Upper => format!("UPPER({text})"),
                StringFunction::Lower => format!("LOWER({text})"),
                StringFunction::Trim => format!("TRIM({text})"),
                StringFunction::Substring => {
                    let start = start.ok_or_else(|| missing(&context, "start"))?;
                    let length = length.ok_or_else(|| missing(&context, "length"))?;
                    if start < 1 {
                        return Err(invalid(&context, "start is 1-based and must be at least 1"));
                    }
                    if length < 0 {
                        return Err(invalid(&context, "length cannot be negative"));
                    }
                    format!("SUBSTRING({text} FROM {start} FOR {length})")
                }
                StringFunction::Lpad | StringFunction::Rpad => {
                    let length = length.ok_or_else(|| missing(&context, "length"))?;
                    let fill = fill.as_deref().ok_or_else(|| missing(&context, "fill"))?;
                    if length < 0 {
                        return Err(invalid(&context, "length cannot be negative"));
                    }
                    let name = if *function == StringFunction::Lpad { "LPAD" } else { "RPAD" };
                    format!("{name}({text}, {length}, {})", text_literal(fill)?)
                }
                StringFunction::Concat => {
                    let second = second.as_ref().ok_or_else(|| missing(&context, "second"))?;
                    let other = scope.resolve(second)?;
                    let separator = separator.as_deref().unwrap_or(" ");
                    format!("CONCAT({text}, {}, {}::text)", text_literal(separator)?, other.sql)
                }
            };
            Ok((sql, default_alias(&source.column, function.name())))
        }
    }
}

fn default_alias(column: &str, operation: &str) -> String {
    flatten(&format!("{column}_{operation}"))
}

/// Drop everything but letters, digits and underscores.
pub(crate) fn flatten(name: &str) -> String {
    name.chars().filter(|c| c.is_alphanumeric() || *c == '_').collect()
}

fn invalid(context: &str, reason: &str) -> BuildError {
    BuildError::InvalidParameter {
        context: context.to_string(),
        reason: reason.to_string(),
    }
}
