use agora_model::Business;
use agora_query::RangeQueryParams;
use agora_storage::{ParticipantController, StorageError};

use crate::action::SearchRequest;

use super::shingle::shingle_overlap_score;
use super::utils::{business_filter, rows_to_businesses};
use super::paginate;

const SHINGLE_K: usize = 4;

pub async fn execute_lexical_search(
    search: &SearchRequest,
    participants: &dyn ParticipantController,
) -> Result<(Vec<Business>, i64, i64), StorageError> {
    let rows = participants
        .find(&business_filter(), &RangeQueryParams::new())
        .await?;
    let mut businesses = rows_to_businesses(&rows);

    // Rating order first: it's both the tie-break and the no-query fallback.
    businesses.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    if !search.query.is_empty() {
        let mut scored: Vec<(f64, Business)> = businesses
            .into_iter()
            .map(|business| {
                let score = shingle_overlap_score(&search.query, &business.searchable_text(), SHINGLE_K);
                (score, business)
            })
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));
        businesses = scored.into_iter().map(|(_, business)| business).collect();
    }

    Ok(paginate(businesses, search.page, search.limit))
}
