use agora_model::{Business, ParticipantRow};
use agora_query::Query;

/// The predicate every search algorithm starts from: only rows carrying a
/// business payload are candidates.
pub fn business_filter() -> Query {
    Query::is_not_null("metadata.business")
}

pub fn rows_to_businesses(rows: &[ParticipantRow]) -> Vec<Business> {
    rows.iter().filter_map(|row| row.data.business()).collect()
}
