use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};
use std::time::Duration;

use reqwest::Client;

/// Identity a pooled `reqwest::Client` is shared under. Two resource views
/// constructed with the same base URL and timeout reuse one underlying
/// connection pool instead of each opening their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PoolKey {
    base_url: String,
    timeout_millis: u128,
}

fn registry() -> &'static Mutex<HashMap<PoolKey, Client>> {
    static REGISTRY: OnceLock<Mutex<HashMap<PoolKey, Client>>> = OnceLock::new();
    REGISTRY.get_or_init(|| Mutex::new(HashMap::new()))
}

/// Returns the shared client for `(base_url, timeout)`, building and
/// registering one on first use. `reqwest::Client` is itself an `Arc`
/// around its connection pool, so cloning it here is cheap and every
/// caller ends up sharing the same pool.
pub fn shared_client(base_url: &str, timeout: Duration) -> Client {
    let key = PoolKey {
        base_url: base_url.to_string(),
        timeout_millis: timeout.as_millis(),
    };

    let mut registry = registry().lock().expect("pool registry mutex poisoned");
    registry
        .entry(key)
        .or_insert_with(|| {
            Client::builder()
                .timeout(timeout)
                .build()
                .expect("reqwest client with a fixed timeout always builds")
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_base_url_and_timeout_reuse_one_registry_entry() {
        let before = registry().lock().unwrap().len();
        let _a = shared_client("http://localhost:8080", Duration::from_secs(5));
        let _b = shared_client("http://localhost:8080", Duration::from_secs(5));
        let after = registry().lock().unwrap().len();
        assert_eq!(after, before + 1);
    }

    #[test]
    fn different_timeouts_get_different_registry_entries() {
        let before = registry().lock().unwrap().len();
        let _a = shared_client("http://localhost:9090", Duration::from_secs(1));
        let _b = shared_client("http://localhost:9090", Duration::from_secs(2));
        let after = registry().lock().unwrap().len();
        assert_eq!(after, before + 2);
    }
}
