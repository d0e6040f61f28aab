use super::ui;
use crate::core::convert::{ConversionOutcome, Converter};
use anyhow::Result;

/// Converts an amount of a crypto asset into a fiat currency and prints
/// the result plus the rate used.
pub async fn run(
    converter: &Converter,
    owner: Option<&str>,
    from_symbol: &str,
    to_currency: &str,
    amount: f64,
) -> Result<()> {
    let ConversionOutcome { record, persisted } = converter
        .convert(owner, from_symbol, to_currency, amount)
        .await?;

    println!(
        "{} {} = {}",
        ui::style_text(&ui::format_price(record.amount), ui::StyleType::TotalLabel),
        record.from_symbol,
        ui::style_text(
            &format!("{} {}", ui::format_price(record.result), record.to_symbol),
            ui::StyleType::TotalValue
        ),
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "Rate: 1 {} = {} {}",
                record.from_symbol,
                ui::format_price(record.rate),
                record.to_symbol
            ),
            ui::StyleType::Subtle
        )
    );

    if owner.is_some() && !persisted {
        println!(
            "{}",
            ui::style_text(
                "Warning: this conversion could not be saved to your history.",
                ui::StyleType::Error
            )
        );
    }

    Ok(())
}
