use super::ui;
use crate::core::market::{MarketDataProvider, SeriesPoint};
use crate::core::symbols;
use anyhow::Result;
use chrono::DateTime;
use comfy_table::Cell;

/// At most this many series samples are rendered as table rows.
const MAX_ROWS: usize = 12;

/// Displays a price history summary and a sampled series table for one
/// asset over a trailing window of days.
pub async fn run(
    market: &dyn MarketDataProvider,
    symbol: &str,
    days: u32,
    currency: &str,
) -> Result<()> {
    let asset_id = symbols::resolve(symbol);
    let detail = market.detail(&asset_id).await?;
    let chart = market.chart(&asset_id, days, currency).await?;

    if chart.prices.is_empty() {
        println!("No chart data for {} over the last {days} days.", detail.name);
        return Ok(());
    }

    let currency_upper = currency.to_uppercase();
    println!(
        "{} ({}) over the last {days} days, in {currency_upper}",
        ui::style_text(&detail.name, ui::StyleType::Title),
        detail.symbol,
    );

    let first = chart.prices[0].1;
    let last = chart.prices[chart.prices.len() - 1].1;
    let min = chart.prices.iter().map(|&(_, v)| v).fold(f64::INFINITY, f64::min);
    let max = chart
        .prices
        .iter()
        .map(|&(_, v)| v)
        .fold(f64::NEG_INFINITY, f64::max);
    let change_pct = if first != 0.0 {
        Some((last - first) / first * 100.0)
    } else {
        None
    };

    let mut summary = ui::new_styled_table();
    summary.set_header(vec![
        ui::header_cell("Latest"),
        ui::header_cell("Low"),
        ui::header_cell("High"),
        ui::header_cell("Change"),
    ]);
    summary.add_row(vec![
        Cell::new(ui::format_price(last)),
        Cell::new(ui::format_price(min)),
        Cell::new(ui::format_price(max)),
        ui::change_cell(change_pct),
    ]);
    println!("{summary}");

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Date"),
        ui::header_cell(&format!("Price ({currency_upper})")),
    ]);
    for &(ts, price) in sample(&chart.prices, MAX_ROWS) {
        table.add_row(vec![
            Cell::new(format_timestamp(ts)),
            ui::format_optional_cell(Some(price), ui::format_price),
        ]);
    }
    println!("{table}");
    Ok(())
}

/// Picks up to `max` evenly spaced samples, always keeping the last point.
fn sample(points: &[SeriesPoint], max: usize) -> impl Iterator<Item = &SeriesPoint> {
    let step = points.len().div_ceil(max).max(1);
    points
        .iter()
        .enumerate()
        .filter(move |(i, _)| i % step == 0 || *i == points.len() - 1)
        .map(|(_, p)| p)
}

fn format_timestamp(unix_millis: i64) -> String {
    DateTime::from_timestamp_millis(unix_millis)
        .map(|dt| dt.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| unix_millis.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_bounds_row_count() {
        let points: Vec<SeriesPoint> = (0..100).map(|i| (i, i as f64)).collect();
        let sampled: Vec<_> = sample(&points, 12).collect();
        assert!(sampled.len() <= 13);
        // The last point is always kept.
        assert_eq!(sampled.last().unwrap().0, 99);
    }

    #[test]
    fn test_sample_short_series_is_untouched() {
        let points: Vec<SeriesPoint> = (0..5).map(|i| (i, i as f64)).collect();
        let sampled: Vec<_> = sample(&points, 12).collect();
        assert_eq!(sampled.len(), 5);
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(1700000000000), "2023-11-14 22:13");
    }
}
