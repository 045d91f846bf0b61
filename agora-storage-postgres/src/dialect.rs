use agora_query::{CompiledFilter, JsonPredicate, Operator, Query, QueryCompiler, QueryValue, RangeClause, RangeQueryParams};

/// Compiles the shared predicate tree to PostgreSQL's `#>>'{...}'` JSONB
/// path-text extraction, with `ILIKE` for substring matches (mirroring the
/// source's case-insensitive `LIKE`→`ILIKE` substitution, since Postgres
/// `LIKE` is case-sensitive and SQLite's isn't by default).
///
/// Uses `#>>` over a path array rather than `->>` over a single key: a
/// dotted path like `business.rating` is two levels of nesting, and `->>`
/// only ever extracts one. (The source's own PostgreSQL backend builds
/// `data->>'business.rating'` — a literal top-level key lookup that can
/// never match a nested field — which is a latent bug there; `#>>` is
/// the fix, not a new behavior.)
///
/// Placeholders are emitted as `?` here, same as the SQLite dialect, and
/// renumbered to `$1, $2, ...` once by [`crate::binding::renumber`] at the
/// point each controller assembles its final SQL string. Compiling a
/// self-contained, backend-agnostic fragment first and renumbering once at
/// the end avoids threading a running placeholder counter through every
/// recursive call.
pub(crate) struct PostgresDialect;

impl QueryCompiler for PostgresDialect {
    fn compile_query(&self, query: &Query) -> CompiledFilter {
        compile(query)
    }

    fn compile_range(&self, range: &RangeQueryParams) -> RangeClause {
        let mut conditions = Vec::new();
        let mut binds = Vec::new();

        if let Some(after) = range.after {
            conditions.push("created_at > ?".to_string());
            binds.push(QueryValue::Text(after.to_rfc3339()));
        }
        if let Some(before) = range.before {
            conditions.push("created_at < ?".to_string());
            binds.push(QueryValue::Text(before.to_rfc3339()));
        }
        if let Some(after_index) = range.after_index {
            conditions.push("row_index > ?".to_string());
            binds.push(QueryValue::Number(after_index as f64));
        }
        if let Some(before_index) = range.before_index {
            conditions.push("row_index < ?".to_string());
            binds.push(QueryValue::Number(before_index as f64));
        }

        let predicate = if conditions.is_empty() {
            None
        } else {
            Some(CompiledFilter {
                sql: conditions.join(" AND "),
                binds,
            })
        };

        let mut suffix = String::from(" ORDER BY row_index ASC");
        let mut suffix_binds = Vec::new();
        if let Some(limit) = range.limit {
            suffix.push_str(" LIMIT ?");
            suffix_binds.push(QueryValue::Number(limit as f64));
        }
        if let Some(offset) = range.offset {
            suffix.push_str(" OFFSET ?");
            suffix_binds.push(QueryValue::Number(offset as f64));
        }

        RangeClause {
            predicate,
            suffix,
            suffix_binds,
        }
    }
}

fn compile(query: &Query) -> CompiledFilter {
    match query {
        Query::Leaf(predicate) => compile_leaf(predicate),
        Query::And(left, right) => combine(left, right, "AND"),
        Query::Or(left, right) => combine(left, right, "OR"),
    }
}

fn combine(left: &Query, right: &Query, op: &str) -> CompiledFilter {
    let left = compile(left);
    let right = compile(right);
    let sql = format!("({} {op} {})", left.sql, right.sql);
    let mut binds = left.binds;
    binds.extend(right.binds);
    CompiledFilter { sql, binds }
}

fn compile_leaf(predicate: &JsonPredicate) -> CompiledFilter {
    let segments: Vec<&str> = predicate.path.split('.').collect();
    let extract = format!("data#>>'{{{}}}'", segments.join(","));
    match predicate.operator {
        Operator::IsNull => CompiledFilter {
            sql: format!("{extract} IS NULL"),
            binds: Vec::new(),
        },
        Operator::IsNotNull => CompiledFilter {
            sql: format!("{extract} IS NOT NULL"),
            binds: Vec::new(),
        },
        Operator::In | Operator::NotIn => {
            let values = match &predicate.value {
                QueryValue::List(values) => values.clone(),
                other => vec![other.clone()],
            };
            let placeholders = vec!["?"; values.len()].join(", ");
            let op_sql = if matches!(predicate.operator, Operator::In) {
                "IN"
            } else {
                "NOT IN"
            };
            CompiledFilter {
                sql: format!("{extract} {op_sql} ({placeholders})"),
                binds: values,
            }
        }
        Operator::Like => CompiledFilter {
            sql: format!("{extract} ILIKE ?"),
            binds: vec![wildcard(&predicate.value)],
        },
        Operator::NotLike => CompiledFilter {
            sql: format!("{extract} NOT ILIKE ?"),
            binds: vec![wildcard(&predicate.value)],
        },
        _ => {
            let op_sql = match predicate.operator {
                Operator::Eq => "=",
                Operator::NotEq => "!=",
                Operator::Gt => ">",
                Operator::Gte => ">=",
                Operator::Lt => "<",
                Operator::Lte => "<=",
                _ => unreachable!("handled above"),
            };
            CompiledFilter {
                sql: format!("{extract} {op_sql} ?"),
                binds: vec![predicate.value.clone()],
            }
        }
    }
}

fn wildcard(value: &QueryValue) -> QueryValue {
    match value {
        QueryValue::Text(s) => QueryValue::Text(format!("%{s}%")),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiles_leaf_with_jsonb_path_extraction() {
        let filter = compile(&Query::eq("business.rating", 4.0));
        assert_eq!(filter.sql, "data#>>'{business,rating}' = ?");
    }

    #[test]
    fn like_becomes_ilike() {
        let filter = compile(&Query::like("name", "diner"));
        assert!(filter.sql.contains("ILIKE"));
    }
}
