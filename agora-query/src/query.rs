/// Comparison/membership operators recognized by every backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Eq,
    NotEq,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    NotIn,
    /// Case-insensitive substring match.
    Like,
    NotLike,
    IsNull,
    IsNotNull,
}

/// A leaf-level bind value. `List` only makes sense with `In`/`NotIn`.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<QueryValue>),
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Text(value)
    }
}

impl From<bool> for QueryValue {
    fn from(value: bool) -> Self {
        QueryValue::Bool(value)
    }
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        QueryValue::Number(value)
    }
}

impl From<i64> for QueryValue {
    fn from(value: i64) -> Self {
        QueryValue::Number(value as f64)
    }
}

/// A single `(path, operator, value)` predicate over a row's JSON payload.
/// `path` is a dot-separated JSON path, e.g. `business.rating` or
/// `amenity_features.wifi`.
#[derive(Debug, Clone)]
pub struct JsonPredicate {
    pub path: String,
    pub operator: Operator,
    pub value: QueryValue,
}

/// A predicate tree: leaves are [`JsonPredicate`]s, internal nodes are AND/OR.
/// No short-circuit semantics are specified — backends may evaluate leaves in
/// any order.
#[derive(Debug, Clone)]
pub enum Query {
    Leaf(JsonPredicate),
    And(Box<Query>, Box<Query>),
    Or(Box<Query>, Box<Query>),
}

impl Query {
    fn leaf(path: impl Into<String>, operator: Operator, value: impl Into<QueryValue>) -> Self {
        Query::Leaf(JsonPredicate {
            path: path.into(),
            operator,
            value: value.into(),
        })
    }

    pub fn eq(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Eq, value)
    }

    pub fn ne(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::NotEq, value)
    }

    pub fn gt(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Gt, value)
    }

    pub fn gte(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Gte, value)
    }

    pub fn lt(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Lt, value)
    }

    pub fn lte(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Lte, value)
    }

    pub fn like(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::Like, value)
    }

    pub fn not_like(path: impl Into<String>, value: impl Into<QueryValue>) -> Self {
        Self::leaf(path, Operator::NotLike, value)
    }

    pub fn is_in(path: impl Into<String>, values: Vec<QueryValue>) -> Self {
        Self::leaf(path, Operator::In, QueryValue::List(values))
    }

    pub fn not_in(path: impl Into<String>, values: Vec<QueryValue>) -> Self {
        Self::leaf(path, Operator::NotIn, QueryValue::List(values))
    }

    pub fn is_null(path: impl Into<String>) -> Self {
        Self::leaf(path, Operator::IsNull, QueryValue::Null)
    }

    pub fn is_not_null(path: impl Into<String>) -> Self {
        Self::leaf(path, Operator::IsNotNull, QueryValue::Null)
    }

    pub fn and(self, other: Query) -> Query {
        Query::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: Query) -> Query {
        Query::Or(Box::new(self), Box::new(other))
    }

    /// Fold a non-empty list of queries together with AND.
    pub fn all_of(mut queries: Vec<Query>) -> Option<Query> {
        let mut iter = queries.drain(..);
        let first = iter.next()?;
        Some(iter.fold(first, |acc, q| acc.and(q)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn and_composes_left_to_right() {
        let q = Query::eq("to_agent_id", "b").and(Query::eq("from_agent_id", "a"));
        match q {
            Query::And(left, right) => {
                assert!(matches!(*left, Query::Leaf(_)));
                assert!(matches!(*right, Query::Leaf(_)));
            }
            _ => panic!("expected And"),
        }
    }

    #[test]
    fn all_of_folds_constraints() {
        let q = Query::all_of(vec![
            Query::gte("business.rating", 4.0),
            Query::eq("amenity_features.wifi", true),
        ])
        .unwrap();
        assert!(matches!(q, Query::And(_, _)));
    }

    #[test]
    fn all_of_empty_is_none() {
        assert!(Query::all_of(vec![]).is_none());
    }
}
