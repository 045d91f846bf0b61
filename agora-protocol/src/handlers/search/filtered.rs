use agora_model::Business;
use agora_query::{Query, RangeQueryParams};
use agora_storage::{ParticipantController, StorageError};

use crate::action::{SearchConstraints, SearchRequest};

use super::utils::{business_filter, rows_to_businesses};
use super::paginate;

pub async fn execute_filtered_search(
    search: &SearchRequest,
    participants: &dyn ParticipantController,
) -> Result<(Vec<Business>, i64, i64), StorageError> {
    let mut query = business_filter();

    if !search.query.is_empty() {
        let text_query = Query::like("metadata.business.name", search.query.clone())
            .or(Query::like("metadata.business.description", search.query.clone()));
        query = query.and(text_query);
    }

    if let Some(constraints) = &search.constraints {
        query = apply_constraints(query, constraints);
    }

    let rows = participants.find(&query, &RangeQueryParams::new()).await?;
    let mut businesses = rows_to_businesses(&rows);
    businesses.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    Ok(paginate(businesses, search.page, search.limit))
}

fn apply_constraints(mut query: Query, constraints: &SearchConstraints) -> Query {
    if let Some(threshold) = constraints.rating_threshold {
        query = query.and(Query::gte("metadata.business.rating", threshold));
    }
    if let Some(amenities) = &constraints.amenity_features {
        for amenity in amenities {
            query = query.and(Query::eq(
                format!("metadata.business.amenity_features.{amenity}"),
                true,
            ));
        }
    }
    if let Some(menu_items) = &constraints.menu_items {
        for item in menu_items {
            query = query.and(Query::is_not_null(format!(
                "metadata.business.menu_features.{item}"
            )));
        }
    }
    query
}
