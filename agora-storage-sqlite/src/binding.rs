use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

use agora_query::QueryValue;

/// Applies positional binds from a [`CompiledFilter`]/[`RangeClause`] to a
/// prepared statement, in order. `List` values never reach here: the
/// compiler flattens `IN`/`NOT IN` into one placeholder per element before
/// returning its binds.
pub(crate) fn bind_values<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    values: &'q [QueryValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
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
