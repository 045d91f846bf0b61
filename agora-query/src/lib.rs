//! Language-neutral, composable JSON-path predicate tree.
//!
//! A [`Query`] is a tree whose leaves are JSON-path predicates over a row's
//! `data` payload and whose internal nodes are logical AND/OR. Backends
//! compile the tree into their native query language via [`QueryCompiler`];
//! handler code never constructs SQL directly.

mod compiler;
mod query;
mod range;

pub use compiler::{CompiledFilter, QueryCompiler, RangeClause};
pub use query::{JsonPredicate, Operator, Query, QueryValue};
pub use range::RangeQueryParams;
