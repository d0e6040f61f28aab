use super::ui;
use crate::core::market::MarketDataProvider;
use crate::providers::caching::MIN_SEARCH_LEN;
use anyhow::Result;
use comfy_table::Cell;

/// Searches assets by free text and displays the matches with market data.
pub async fn run(market: &dyn MarketDataProvider, query: &str) -> Result<()> {
    let results = market.search(query).await?;

    if results.is_empty() {
        if query.trim().chars().count() < MIN_SEARCH_LEN {
            println!(
                "{}",
                ui::style_text(
                    &format!("Type at least {MIN_SEARCH_LEN} characters to search."),
                    ui::StyleType::Subtle
                )
            );
        } else {
            println!("No assets matched {:?}.", query.trim());
        }
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Symbol"),
        ui::header_cell("Name"),
        ui::header_cell("Price (USD)"),
        ui::header_cell("24h"),
        ui::header_cell("Market Cap"),
    ]);

    for asset in &results {
        table.add_row(vec![
            Cell::new(&asset.symbol),
            Cell::new(&asset.name),
            ui::format_optional_cell(Some(asset.price), ui::format_price),
            ui::change_cell(asset.change_24h),
            ui::format_optional_cell(asset.market_cap, ui::format_compact),
        ]);
    }

    println!("{table}");
    Ok(())
}
