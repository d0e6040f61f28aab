use super::ui;
use crate::core::accounts::ConversionLedger;
use anyhow::Result;
use comfy_table::Cell;

/// Displays the owner's conversion history, newest first.
pub async fn list(ledger: &dyn ConversionLedger, owner: &str) -> Result<()> {
    let records = ledger.list(owner).await?;
    if records.is_empty() {
        println!("No conversions recorded yet.");
        return Ok(());
    }

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("When"),
        ui::header_cell("Amount"),
        ui::header_cell("From"),
        ui::header_cell("Result"),
        ui::header_cell("To"),
        ui::header_cell("Rate"),
        ui::header_cell("Id"),
    ]);

    for record in &records {
        table.add_row(vec![
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M").to_string()),
            ui::format_optional_cell(Some(record.amount), ui::format_price),
            Cell::new(&record.from_symbol),
            ui::format_optional_cell(Some(record.result), ui::format_price),
            Cell::new(&record.to_symbol),
            ui::format_optional_cell(Some(record.rate), ui::format_price),
            Cell::new(&record.id),
        ]);
    }

    println!("{table}");
    Ok(())
}

/// Deletes one record by its id.
pub async fn remove(ledger: &dyn ConversionLedger, owner: &str, id: &str) -> Result<()> {
    ledger.delete(owner, id).await?;
    println!("Removed conversion {id}.");
    Ok(())
}

/// Deletes the owner's entire history.
pub async fn clear(ledger: &dyn ConversionLedger, owner: &str) -> Result<()> {
    let count = ledger.list(owner).await?.len();
    if count == 0 {
        println!("History is already empty.");
        return Ok(());
    }

    ledger.clear(owner).await?;
    println!("Cleared {count} conversion(s).");
    Ok(())
}
