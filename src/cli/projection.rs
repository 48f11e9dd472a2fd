use super::ui;
use crate::ProjectionArgs;
use crate::core::Portfolio;
use crate::core::config::ProjectionConfig;
use crate::core::projection::{Assumptions, ProjectionPoint};
use anyhow::Result;
use comfy_table::Cell;

/// Command line flags win over configured defaults.
pub fn merge_assumptions(args: &ProjectionArgs, defaults: &ProjectionConfig) -> Assumptions {
    let base = Assumptions::from(defaults);
    Assumptions {
        contribution_units: args.contribution_units.unwrap_or(base.contribution_units),
        frequency: args.frequency.unwrap_or(base.frequency),
        growth_rate: args.growth_rate.unwrap_or(base.growth_rate),
        years: args.years.unwrap_or(base.years),
    }
}

fn projection_table(series: &[ProjectionPoint]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Year"),
        ui::header_cell("Projected Value (INR)"),
    ]);
    for point in series {
        table.add_row(vec![
            Cell::new(point.year),
            ui::number_cell(ui::format_inr(point.value, 0)),
        ]);
    }
    table.to_string()
}

pub async fn run(
    portfolio: &Portfolio,
    fund_id: &str,
    args: &ProjectionArgs,
    defaults: &ProjectionConfig,
) -> Result<()> {
    let assumptions = merge_assumptions(args, defaults);
    let series = portfolio.project(fund_id, &assumptions).await?;

    // A lone year 0 point has nothing to project.
    if series.len() <= 1 {
        ui::print_placeholder("Select a fund and set parameters to calculate projection.");
        return Ok(());
    }

    println!(
        "{}",
        ui::style_text("Investment Projection", ui::StyleType::Title)
    );
    println!(
        "{}\n",
        ui::style_text(
            &format!(
                "{} units {}, {}% per year, {} year(s)",
                assumptions.contribution_units,
                assumptions.frequency,
                assumptions.growth_rate,
                assumptions.years
            ),
            ui::StyleType::Subtle
        )
    );
    println!("{}", projection_table(&series));

    if let Some(last) = series.last() {
        println!(
            "\n{}: {}",
            ui::style_text(
                &format!("Value after year {}", last.year),
                ui::StyleType::TotalLabel
            ),
            ui::style_text(&ui::format_inr(last.value, 0), ui::StyleType::TotalValue)
        );
    }
    Ok(())
}
