use super::ui;
use crate::core::Portfolio;
use crate::core::history::{HistoryView, NavHistoryEntry};
use anyhow::Result;
use comfy_table::Cell;

const BAR_WIDTH: usize = 40;

fn table_view(entries: &[NavHistoryEntry]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Date"), ui::header_cell("NAV")]);
    for entry in entries {
        let nav = match entry.nav_value {
            Some(v) => ui::number_cell(format!("{v:.4}")),
            None => ui::na_cell(true),
        };
        table.add_row(vec![Cell::new(&entry.formatted_date), nav]);
    }
    table.to_string()
}

/// Oldest first, one bar per day scaled between the period's low and high.
fn chart_view(entries: &[NavHistoryEntry]) -> String {
    let values: Vec<f64> = entries.iter().filter_map(|e| e.nav_value).collect();
    let low = values.iter().copied().fold(f64::INFINITY, f64::min);
    let high = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let span = high - low;

    let mut out = String::new();
    for entry in entries {
        let Some(value) = entry.nav_value else {
            continue;
        };
        let filled = if span > 0.0 {
            1 + (((value - low) / span) * (BAR_WIDTH - 1) as f64).round() as usize
        } else {
            BAR_WIDTH
        };
        out.push_str(&format!(
            "{:>13} {:>12.4} {}\n",
            entry.formatted_date,
            value,
            "█".repeat(filled)
        ));
    }
    out
}

pub async fn run(portfolio: &Portfolio, scheme_code: &str, chart: bool) -> Result<()> {
    let funds = portfolio.list_funds().await?;
    let selected = funds.iter().find(|f| f.scheme_code == scheme_code.trim());

    let fetched = match selected {
        Some(fund) => Some(portfolio.nav_history(&fund.scheme_code).await),
        None => None,
    };

    match HistoryView::resolve(selected, fetched) {
        HistoryView::Loaded(history) => {
            if let Some(fund) = selected {
                println!(
                    "{}\n",
                    ui::style_text(
                        &format!("365-Day NAV History: {}", fund.display_name()),
                        ui::StyleType::Title
                    )
                );
            }
            if chart {
                print!("{}", chart_view(&history.chart));
            } else {
                println!("{}", table_view(&history.table));
            }
            Ok(())
        }
        HistoryView::Failed(e) => Err(e.into()),
        view => {
            if let Some(message) = view.message() {
                ui::print_placeholder(&message);
            }
            Ok(())
        }
    }
}
