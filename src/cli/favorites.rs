use super::ui;
use crate::core::accounts::{DEFAULT_FAVORITES, ProfileStore};
use crate::core::asset::UserProfile;
use crate::core::market::MarketDataProvider;
use crate::core::symbols;
use anyhow::Result;
use comfy_table::Cell;
use futures::future::join_all;

/// The owner's favorites, falling back to the starter set when no profile
/// exists yet.
async fn current_favorites(profiles: &dyn ProfileStore, owner: &str) -> Result<Vec<String>> {
    Ok(match profiles.profile(owner).await? {
        Some(profile) => profile.favorites,
        None => DEFAULT_FAVORITES.iter().map(|s| s.to_string()).collect(),
    })
}

/// Displays the owner's favorite assets with their current prices.
pub async fn list(
    market: &dyn MarketDataProvider,
    profiles: &dyn ProfileStore,
    owner: &str,
    currency: &str,
) -> Result<()> {
    let favorites = current_favorites(profiles, owner).await?;
    if favorites.is_empty() {
        println!("No favorites yet. Add one with `favorites add <SYMBOL>`.");
        return Ok(());
    }

    let pb = ui::new_progress_bar(favorites.len() as u64, true);
    pb.set_message("Fetching prices...");

    let price_futures = favorites.iter().map(|symbol| {
        let pb_clone = pb.clone();
        async move {
            let res = market.price(&symbols::resolve(symbol), currency).await;
            pb_clone.inc(1);
            (symbol.clone(), res)
        }
    });
    let prices = join_all(price_futures).await;
    pb.finish_and_clear();

    let currency_upper = currency.to_uppercase();
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell(&format!("Price ({currency_upper})")),
    ]);

    for (symbol, price) in prices {
        let price_cell = match price {
            Ok(price) => ui::format_optional_cell(Some(price), ui::format_price),
            Err(e) => Cell::new(format!("Error: {e}")).fg(comfy_table::Color::Red),
        };
        table.add_row(vec![Cell::new(symbol), price_cell]);
    }

    println!("{table}");
    Ok(())
}

/// Adds a symbol to the owner's favorites. Re-adding is a no-op.
pub async fn add(profiles: &dyn ProfileStore, owner: &str, symbol: &str) -> Result<()> {
    let favorites = current_favorites(profiles, owner).await?;
    let mut profile = UserProfile::new(owner, "", "", &[]);
    profile.favorites = favorites;

    if !profile.add_favorite(symbol) {
        println!("{} is already a favorite.", symbol.to_uppercase());
        return Ok(());
    }

    profiles.write_favorites(owner, &profile.favorites).await?;
    println!("Added {} to favorites.", symbol.to_uppercase());
    Ok(())
}

/// Removes a symbol from the owner's favorites.
pub async fn remove(profiles: &dyn ProfileStore, owner: &str, symbol: &str) -> Result<()> {
    let favorites = current_favorites(profiles, owner).await?;
    let mut profile = UserProfile::new(owner, "", "", &[]);
    profile.favorites = favorites;

    if !profile.remove_favorite(symbol) {
        println!("{} is not in your favorites.", symbol.to_uppercase());
        return Ok(());
    }

    profiles.write_favorites(owner, &profile.favorites).await?;
    println!("Removed {} from favorites.", symbol.to_uppercase());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::StoreError;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    #[derive(Default)]
    struct MemoryProfiles {
        profiles: Mutex<HashMap<String, UserProfile>>,
    }

    #[async_trait]
    impl ProfileStore for MemoryProfiles {
        async fn profile(&self, uid: &str) -> Result<Option<UserProfile>, StoreError> {
            Ok(self.profiles.lock().await.get(uid).cloned())
        }

        async fn write_favorites(
            &self,
            uid: &str,
            favorites: &[String],
        ) -> Result<(), StoreError> {
            let mut profiles = self.profiles.lock().await;
            let profile = profiles
                .entry(uid.to_string())
                .or_insert_with(|| UserProfile::new(uid, "", "", &[]));
            profile.favorites = favorites.to_vec();
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_first_add_starts_from_defaults() {
        let profiles = MemoryProfiles::default();
        add(&profiles, "anon", "sol").await.unwrap();

        let favorites = current_favorites(&profiles, "anon").await.unwrap();
        assert_eq!(
            favorites,
            vec!["BTC".to_string(), "ETH".to_string(), "SOL".to_string()]
        );
    }

    #[tokio::test]
    async fn test_add_is_idempotent() {
        let profiles = MemoryProfiles::default();
        add(&profiles, "anon", "btc").await.unwrap();
        add(&profiles, "anon", "BTC").await.unwrap();

        let favorites = current_favorites(&profiles, "anon").await.unwrap();
        assert_eq!(favorites, vec!["BTC".to_string(), "ETH".to_string()]);
    }

    #[tokio::test]
    async fn test_remove_then_list_excludes_symbol() {
        let profiles = MemoryProfiles::default();
        remove(&profiles, "anon", "eth").await.unwrap();

        let favorites = current_favorites(&profiles, "anon").await.unwrap();
        assert_eq!(favorites, vec!["BTC".to_string()]);
    }
}
