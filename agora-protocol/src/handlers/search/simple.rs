use agora_model::Business;
use agora_query::RangeQueryParams;
use agora_storage::ParticipantController;

use crate::action::SearchRequest;

use super::utils::{business_filter, rows_to_businesses};
use super::paginate;

pub async fn execute_simple_search(
    search: &SearchRequest,
    participants: &dyn ParticipantController,
) -> Result<(Vec<Business>, i64, i64), agora_storage::StorageError> {
    let rows = participants
        .find(&business_filter(), &RangeQueryParams::new())
        .await?;
    let mut businesses = rows_to_businesses(&rows);
    businesses.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    Ok(paginate(businesses, search.page, search.limit))
}
