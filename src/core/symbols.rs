//! Static ticker-symbol to upstream-identifier lookup.
//!
//! The table lives in `docs/symbol_map.yaml`, embedded at compile time and
//! parsed once. Unknown symbols fall back to the lowercased ticker, which
//! matches the upstream identifier for many smaller assets.

use std::collections::HashMap;
use std::sync::OnceLock;

static SYMBOL_MAP: OnceLock<HashMap<String, String>> = OnceLock::new();

fn symbol_map() -> &'static HashMap<String, String> {
    SYMBOL_MAP.get_or_init(|| {
        serde_yaml::from_str(include_str!("../../docs/symbol_map.yaml"))
            .expect("embedded symbol map must be valid YAML")
    })
}

/// Resolves a ticker symbol to the market-data API's asset identifier.
pub fn resolve(symbol: &str) -> String {
    let ticker = symbol.trim().to_uppercase();
    symbol_map()
        .get(&ticker)
        .cloned()
        .unwrap_or_else(|| ticker.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_symbols_resolve_to_ids() {
        assert_eq!(resolve("BTC"), "bitcoin");
        assert_eq!(resolve("eth"), "ethereum");
        assert_eq!(resolve(" avax "), "avalanche-2");
    }

    #[test]
    fn test_unknown_symbol_falls_back_to_lowercase() {
        assert_eq!(resolve("NEWCOIN"), "newcoin");
    }

    #[test]
    fn test_embedded_map_is_valid() {
        // Forces the OnceLock init and sanity-checks a few invariants.
        let map = symbol_map();
        assert!(map.len() > 100);
        assert!(map.keys().all(|k| *k == k.to_uppercase()));
    }
}
