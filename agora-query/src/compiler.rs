use crate::query::QueryValue;
use crate::{Query, RangeQueryParams};

/// A query compiled down to a backend's native dialect: a boolean SQL
/// fragment plus the positional bind values it references, in order.
///
/// This is the only backend-specific artifact handler code ever produces —
/// it never sees SQL text directly, only this opaque result.
#[derive(Debug, Clone)]
pub struct CompiledFilter {
    pub sql: String,
    pub binds: Vec<QueryValue>,
}

impl CompiledFilter {
    pub fn always_true() -> Self {
        Self {
            sql: "1=1".to_string(),
            binds: Vec::new(),
        }
    }
}

/// The range portion of a query, compiled separately from [`CompiledFilter`]
/// because `ORDER BY`/`LIMIT`/`OFFSET` are not boolean predicates and cannot
/// be ANDed into a `WHERE` clause the way a filter can.
#[derive(Debug, Clone)]
pub struct RangeClause {
    /// Extra predicate from `after`/`before`/`after_index`/`before_index`,
    /// ANDed with the caller's filter when present.
    pub predicate: Option<CompiledFilter>,
    /// `ORDER BY ... [LIMIT ?] [OFFSET ?]` text, appended after the WHERE
    /// clause. Always orders by row index ascending, the only authoritative
    /// order, since timestamps are not guaranteed monotonic.
    pub suffix: String,
    /// Binds referenced by `suffix`, in order.
    pub suffix_binds: Vec<QueryValue>,
}

/// Implemented once per storage backend. Renders the shared [`Query`] AST and
/// [`RangeQueryParams`] into that backend's SQL dialect (placeholder style,
/// JSON extraction syntax, index/timestamp column names).
pub trait QueryCompiler {
    fn compile_query(&self, query: &Query) -> CompiledFilter;
    fn compile_range(&self, range: &RangeQueryParams) -> RangeClause;
}
