use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A registered identity, regardless of role. `metadata` is an arbitrary JSON
/// object; domain-specific shapes (business, customer, ...) live inside it
/// rather than as separate participant kinds, matching the source's
/// `extra="allow"` model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    pub id: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl AgentProfile {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            metadata: Map::new(),
        }
    }

    /// Build a profile carrying a business payload under `metadata.business`.
    pub fn for_business(business: &Business) -> Self {
        let mut metadata = Map::new();
        metadata.insert("type".into(), Value::String("business".into()));
        metadata.insert(
            "business".into(),
            serde_json::to_value(business).expect("Business always serializes"),
        );
        Self {
            id: business.id.clone(),
            metadata,
        }
    }

    /// Build a profile carrying a customer payload under `metadata.customer`.
    pub fn for_customer(customer: &Customer) -> Self {
        let mut metadata = Map::new();
        metadata.insert("type".into(), Value::String("customer".into()));
        metadata.insert(
            "customer".into(),
            serde_json::to_value(customer).expect("Customer always serializes"),
        );
        Self {
            id: customer.id.clone(),
            metadata,
        }
    }

    /// Recover the business payload, if this profile carries one.
    pub fn business(&self) -> Option<Business> {
        self.metadata
            .get("business")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }

    /// Recover the customer payload, if this profile carries one.
    pub fn customer(&self) -> Option<Customer> {
        self.metadata
            .get("customer")
            .cloned()
            .and_then(|v| serde_json::from_value(v).ok())
    }
}

/// A customer with required menu items and amenities.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub request: String,
    /// Menu item name -> requested price.
    pub menu_features: BTreeMap<String, f64>,
    /// Required amenities.
    pub amenity_features: Vec<String>,
}

/// A business with menu items, amenities, and a rating used for ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: String,
    pub name: String,
    pub description: String,
    pub rating: f64,
    pub progenitor_customer: String,
    /// Menu item name -> price.
    pub menu_features: BTreeMap<String, f64>,
    /// Amenity name -> available.
    pub amenity_features: BTreeMap<String, bool>,
    pub min_price_factor: f64,
}

impl Business {
    /// Derived (never stored) text used for lexical-similarity search.
    pub fn searchable_text(&self) -> String {
        let mut parts = vec![self.name.clone(), self.description.clone()];
        parts.extend(self.menu_features.keys().cloned());
        parts.extend(
            self.amenity_features
                .iter()
                .filter(|(_, available)| **available)
                .map(|(name, _)| name.clone()),
        );
        parts.join(", ")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_business() -> Business {
        Business {
            id: "biz-1".into(),
            name: "Moonlight Diner".into(),
            description: "Late-night comfort food".into(),
            rating: 4.5,
            progenitor_customer: "cust-1".into(),
            menu_features: BTreeMap::from([("bread".into(), 3.0), ("milk".into(), 2.0)]),
            amenity_features: BTreeMap::from([
                ("wifi".into(), true),
                ("parking".into(), false),
            ]),
            min_price_factor: 0.8,
        }
    }

    #[test]
    fn searchable_text_excludes_unavailable_amenities() {
        let text = sample_business().searchable_text();
        assert!(text.contains("Moonlight Diner"));
        assert!(text.contains("bread"));
        assert!(text.contains("wifi"));
        assert!(!text.contains("parking"));
    }

    #[test]
    fn profile_roundtrips_business_payload() {
        let business = sample_business();
        let profile = AgentProfile::for_business(&business);
        assert_eq!(profile.id, "biz-1");
        let recovered = profile.business().expect("business payload present");
        assert_eq!(recovered.name, business.name);
    }
}
