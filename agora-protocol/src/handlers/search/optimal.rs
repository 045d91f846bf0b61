use std::collections::BTreeSet;

use agora_model::{Business, Customer};
use agora_query::RangeQueryParams;
use agora_storage::{ParticipantController, StorageError};

use crate::action::SearchRequest;

use super::utils::{business_filter, rows_to_businesses};
use super::paginate;

/// True if `business` can fully satisfy `customer`'s menu request — its
/// menu keys are a (non-strict) superset of the customer's.
fn can_fulfill(customer: &Customer, business: &Business) -> bool {
    let wanted: BTreeSet<&String> = customer.menu_features.keys().collect();
    let available: BTreeSet<&String> = business.menu_features.keys().collect();
    wanted.is_subset(&available)
}

pub async fn execute_optimal_search(
    search: &SearchRequest,
    customer: &Customer,
    participants: &dyn ParticipantController,
) -> Result<(Vec<Business>, i64, i64), StorageError> {
    let rows = participants
        .find(&business_filter(), &RangeQueryParams::new())
        .await?;
    let mut businesses: Vec<Business> = rows_to_businesses(&rows)
        .into_iter()
        .filter(|business| can_fulfill(customer, business))
        .collect();
    businesses.sort_by(|a, b| b.rating.total_cmp(&a.rating));

    Ok(paginate(businesses, search.page, search.limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn business(id: &str, rating: f64, items: &[&str]) -> Business {
        Business {
            id: id.to_string(),
            name: id.to_string(),
            description: String::new(),
            rating,
            progenitor_customer: String::new(),
            menu_features: items.iter().map(|i| (i.to_string(), 1.0)).collect(),
            amenity_features: BTreeMap::new(),
            min_price_factor: 1.0,
        }
    }

    #[test]
    fn only_supersets_fulfill() {
        let customer = Customer {
            id: "c".into(),
            name: "c".into(),
            request: String::new(),
            menu_features: BTreeMap::from([("bread".to_string(), 1.0), ("milk".to_string(), 1.0)]),
            amenity_features: vec![],
        };

        assert!(!can_fulfill(&customer, &business("a", 1.0, &["bread"])));
        assert!(can_fulfill(&customer, &business("b", 1.0, &["bread", "milk"])));
        assert!(can_fulfill(
            &customer,
            &business("c", 1.0, &["bread", "milk", "eggs"])
        ));
    }
}
