use chrono::{DateTime, Utc};

use agora_model::RowIndex;

/// Range constraints layered on top of any predicate tree. Applies after
/// filtering; result order is always ascending by row index, never by
/// timestamp (timestamps may not be monotonic).
#[derive(Debug, Clone, Default)]
pub struct RangeQueryParams {
    pub offset: Option<i64>,
    pub limit: Option<i64>,
    /// Exclusive lower bound on `created_at`.
    pub after: Option<DateTime<Utc>>,
    /// Exclusive upper bound on `created_at`.
    pub before: Option<DateTime<Utc>>,
    pub after_index: Option<RowIndex>,
    pub before_index: Option<RowIndex>,
}

impl RangeQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_after_index(mut self, index: RowIndex) -> Self {
        self.after_index = Some(index);
        self
    }

    /// The pagination hack: request one more row than asked for so the
    /// caller can detect whether more results exist without a second count
    /// query.
    pub fn with_overfetch(&self) -> Self {
        let mut params = self.clone();
        params.limit = self.limit.map(|l| l + 1);
        params
    }
}
