use agora_query::{CompiledFilter, JsonPredicate, Operator, Query, QueryCompiler, QueryValue, RangeClause, RangeQueryParams};

/// Compiles the shared predicate tree to SQLite's `json_extract` syntax with
/// `?` placeholders, and renders range constraints against the hidden
/// `rowid`, which this backend uses as the authoritative row index.
pub(crate) struct SqliteDialect;

impl QueryCompiler for SqliteDialect {
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
            conditions.push("rowid > ?".to_string());
            binds.push(QueryValue::Number(after_index as f64));
        }
        if let Some(before_index) = range.before_index {
            conditions.push("rowid < ?".to_string());
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

        let mut suffix = String::from(" ORDER BY rowid ASC");
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
    let extract = format!("json_extract(data, '$.{}')", predicate.path);
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
            sql: format!("{extract} LIKE ?"),
            binds: vec![wildcard(&predicate.value)],
        },
        Operator::NotLike => CompiledFilter {
            sql: format!("{extract} NOT LIKE ?"),
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

/// `LIKE` predicates get wrapped in `%...%`, matching the source's
/// automatic-substring-match convention.
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
    fn compiles_leaf_eq() {
        let filter = compile(&Query::eq("business.rating", 4.0));
        assert_eq!(filter.sql, "json_extract(data, '$.business.rating') = ?");
        assert_eq!(filter.binds, vec![QueryValue::Number(4.0)]);
    }

    #[test]
    fn compiles_and_tree() {
        let q = Query::gte("business.rating", 4.0).and(Query::eq("amenity_features.wifi", true));
        let filter = compile(&q);
        assert!(filter.sql.starts_with('('));
        assert_eq!(filter.binds.len(), 2);
    }

    #[test]
    fn like_wraps_with_wildcards() {
        let filter = compile(&Query::like("name", "diner"));
        assert_eq!(filter.binds, vec![QueryValue::Text("%diner%".to_string())]);
    }

    #[test]
    fn range_orders_by_rowid_and_overfetches() {
        let dialect = SqliteDialect;
        let range = RangeQueryParams::new().with_limit(10).with_offset(5);
        let clause = dialect.compile_range(&range);
        assert!(clause.suffix.contains("ORDER BY rowid ASC"));
        assert_eq!(clause.suffix_binds.len(), 2);
    }
}
