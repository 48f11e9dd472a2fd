use super::{funds::funds_table, ui};
use crate::core::Portfolio;
use anyhow::Result;
use tracing::info;

pub async fn run(portfolio: &Portfolio) -> Result<()> {
    let count = portfolio.list_funds().await?.len() as u64;
    info!("Refreshing NAV for {} fund(s)", count);

    let pb = ui::new_progress_bar(count, true);
    pb.set_message("Fetching latest NAV...");
    let outcome = portfolio.refresh_navs(&|| pb.inc(1)).await;
    pb.finish_and_clear();
    let outcome = outcome?;

    if !outcome.updated.is_empty() {
        println!("{}", funds_table(&outcome.updated));
    }
    println!(
        "\nUpdated {} of {} fund(s).",
        outcome.updated.len(),
        count
    );

    for scheme_code in &outcome.unresolved {
        println!(
            "{}",
            ui::style_text(
                &format!("No NAV data available for scheme {scheme_code}; kept previous values."),
                ui::StyleType::Error
            )
        );
    }
    for failure in &outcome.persist_failures {
        println!("{}", ui::style_text(&failure.to_string(), ui::StyleType::Error));
    }
    Ok(())
}
