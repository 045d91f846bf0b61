use sqlx::postgres::{PgArguments, Postgres};
use sqlx::query::Query;

use agora_query::QueryValue;

/// Rewrites the generic `?` placeholders produced by the dialect into
/// Postgres's positional `$1, $2, ...` syntax, in order. Placeholders never
/// appear inside a bound value (everything is parameterized, never
/// string-interpolated), so a left-to-right scan is unambiguous.
pub(crate) fn renumber(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len() + 8);
    let mut n = 0usize;
    for ch in sql.chars() {
        if ch == '?' {
            n += 1;
            out.push('$');
            out.push_str(&n.to_string());
        } else {
            out.push(ch);
        }
    }
    out
}

pub(crate) fn bind_values<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    values: &'q [QueryValue],
) -> Query<'q, Postgres, PgArguments> {
    for value in values {
        query = match value {
            QueryValue::Null => query.bind(None::<String>),
            QueryValue::Bool(b) => query.bind(*b),
            QueryValue::Number(n) => query.bind(*n),
            QueryValue::Text(s) => query.bind(s.as_str()),
            QueryValue::List(items) => bind_values(query, items),
        };
    }
    query
}
