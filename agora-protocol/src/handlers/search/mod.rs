mod filtered;
mod lexical;
mod optimal;
mod shingle;
mod simple;
mod utils;

use agora_model::{ActionExecutionResult, Business, Customer};
use agora_storage::ParticipantController;

use crate::action::{SearchAlgorithm, SearchRequest, SearchResponse};

/// Slices a rating-or-score-sorted business list into one page, applying the
/// same `page`/`limit` convention across every algorithm: `offset =
/// (page - 1) * limit`, `total_pages = ceil(total / limit)`. A non-positive
/// limit returns everything on a single page, matching "no pagination
/// requested".
fn paginate(businesses: Vec<Business>, page: i64, limit: i64) -> (Vec<Business>, i64, i64) {
    let total = businesses.len() as i64;
    if limit <= 0 {
        return (businesses, total, 1);
    }
    let page = page.max(1);
    let start = ((page - 1) * limit).max(0) as usize;
    let end = (start + limit as usize).min(businesses.len());
    let page_slice = if start >= businesses.len() {
        Vec::new()
    } else {
        businesses[start..end].to_vec()
    };
    let total_pages = ((total as f64) / (limit as f64)).ceil() as i64;
    (page_slice, total, total_pages.max(1))
}

/// Runs the requested search algorithm. `caller` supplies the customer
/// context `optimal` needs; it's `None` for callers with no customer
/// payload, which makes `optimal` fail as a caller error rather than panic.
pub async fn execute_search(
    search: &SearchRequest,
    caller: Option<&Customer>,
    participants: &dyn ParticipantController,
) -> ActionExecutionResult {
    let outcome = match search.search_algorithm {
        SearchAlgorithm::Simple => simple::execute_simple_search(search, participants).await,
        SearchAlgorithm::Filtered => {
            filtered::execute_filtered_search(search, participants).await
        }
        SearchAlgorithm::Lexical => lexical::execute_lexical_search(search, participants).await,
        SearchAlgorithm::Optimal => {
            let Some(customer) = caller else {
                return ActionExecutionResult::error(serde_json::json!({
                    "error_type": "not_a_customer",
                    "message": "optimal search requires a customer profile on the caller",
                }));
            };
            optimal::execute_optimal_search(search, customer, participants).await
        }
        SearchAlgorithm::Rnr => {
            return ActionExecutionResult::error(serde_json::json!({
                "error_type": "unsupported_algorithm",
                "message": "rnr requires an embedding model and is not implemented",
            }));
        }
    };

    match outcome {
        Ok((businesses, total_possible_results, total_pages)) => {
            let response = SearchResponse {
                businesses,
                search_algorithm: search.search_algorithm,
                total_possible_results,
                total_pages,
            };
            ActionExecutionResult::success(
                serde_json::to_value(response).unwrap_or(serde_json::Value::Null),
            )
        }
        Err(err) => ActionExecutionResult::error(serde_json::json!({"error": err.to_string()})),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn business(id: &str, rating: f64) -> Business {
        Business {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            rating,
            progenitor_customer: String::new(),
            menu_features: Default::default(),
            amenity_features: Default::default(),
            min_price_factor: 1.0,
        }
    }

    #[test]
    fn paginate_slices_by_page() {
        let businesses = vec![business("a", 5.0), business("b", 4.0), business("c", 3.0)];
        let (page, total, total_pages) = paginate(businesses, 2, 2);
        assert_eq!(total, 3);
        assert_eq!(total_pages, 2);
        assert_eq!(page.len(), 1);
        assert_eq!(page[0].id, "c");
    }

    #[test]
    fn paginate_with_no_limit_returns_everything() {
        let businesses = vec![business("a", 5.0), business("b", 4.0)];
        let (page, total, total_pages) = paginate(businesses, 1, 0);
        assert_eq!(page.len(), 2);
        assert_eq!(total, 2);
        assert_eq!(total_pages, 1);
    }

    #[test]
    fn paginate_past_the_end_is_empty() {
        let businesses = vec![business("a", 5.0)];
        let (page, _, _) = paginate(businesses, 5, 10);
        assert!(page.is_empty());
    }
}
