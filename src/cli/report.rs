use super::{funds::funds_table, ui};
use crate::core::Portfolio;
use crate::core::report::ReportSnapshot;
use anyhow::Result;
use comfy_table::Cell;

pub fn summary_table(snapshot: &ReportSnapshot) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Metric"), ui::header_cell("Value")]);
    for (metric, value) in snapshot.summary() {
        table.add_row(vec![Cell::new(metric), Cell::new(value)]);
    }
    table.to_string()
}

/// Prints the snapshot that PDF/XLSX renderers receive.
pub async fn run(portfolio: &Portfolio) -> Result<()> {
    let snapshot = portfolio.report_snapshot().await?;

    println!("{}\n", ui::style_text("Summary", ui::StyleType::Title));
    println!("{}", summary_table(&snapshot));
    ui::print_separator();
    println!("{}\n", ui::style_text("Fund Details", ui::StyleType::Title));
    println!("{}", funds_table(&snapshot.funds));
    Ok(())
}
