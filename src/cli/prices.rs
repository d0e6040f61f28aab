use super::ui;
use crate::core::accounts::ProfileStore;
use crate::core::market::MarketDataProvider;
use anyhow::Result;
use comfy_table::Cell;

/// Displays the top assets by market capitalization. Favorites of the
/// current owner are marked with a star.
pub async fn run(
    market: &dyn MarketDataProvider,
    profiles: &dyn ProfileStore,
    owner: &str,
    limit: u32,
) -> Result<()> {
    let assets = market.top_assets(limit).await?;
    if assets.is_empty() {
        println!("No market data available.");
        return Ok(());
    }

    let favorites = profiles
        .profile(owner)
        .await?
        .map(|p| p.favorites)
        .unwrap_or_default();

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("#"),
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("24h"),
        ui::header_cell("Market Cap"),
        ui::header_cell("Volume"),
    ]);

    for (i, asset) in assets.iter().enumerate() {
        let symbol = if favorites.iter().any(|f| *f == asset.symbol) {
            format!("★ {}", asset.symbol)
        } else {
            asset.symbol.clone()
        };

        table.add_row(vec![
            Cell::new((i + 1).to_string()),
            Cell::new(symbol),
            Cell::new(&asset.name),
            ui::format_optional_cell(Some(asset.price), ui::format_price),
            ui::change_cell(asset.change_24h),
            ui::format_optional_cell(asset.market_cap, ui::format_compact),
            ui::format_optional_cell(asset.volume, ui::format_compact),
        ]);
    }

    println!("{table}");
    Ok(())
}
