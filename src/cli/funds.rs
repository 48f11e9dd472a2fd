use super::ui;
use crate::core::history::UPSTREAM_DATE_FORMAT;
use crate::core::{Fund, Portfolio};
use anyhow::Result;
use chrono::NaiveDate;
use comfy_table::Cell;

/// `05-01-2024` is shown as `05-Jan-2024` on fund rows.
fn nav_date_cell(nav_date: Option<&str>) -> Cell {
    match nav_date {
        Some(date) => Cell::new(
            NaiveDate::parse_from_str(date, UPSTREAM_DATE_FORMAT)
                .map(|d| d.format("%d-%b-%Y").to_string())
                .unwrap_or_else(|_| date.to_string()),
        ),
        None => ui::na_cell(false),
    }
}

pub fn funds_table(funds: &[Fund]) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Scheme Code"),
        ui::header_cell("Fund"),
        ui::header_cell("Category"),
        ui::header_cell("Units"),
        ui::header_cell("NAV"),
        ui::header_cell("NAV Date"),
        ui::header_cell("Value (INR)"),
    ]);

    for fund in funds {
        let nav = if fund.has_nav() {
            ui::number_cell(format!("{:.2}", fund.nav()))
        } else {
            ui::na_cell(false)
        };
        table.add_row(vec![
            Cell::new(&fund.scheme_code),
            Cell::new(fund.display_name()),
            Cell::new(&fund.category),
            ui::number_cell(format!("{:.3}", fund.units())),
            nav,
            nav_date_cell(fund.nav_date.as_deref()),
            ui::number_cell(ui::format_inr(fund.current_value(), 2)),
        ]);
    }

    table.to_string()
}

pub async fn list(portfolio: &Portfolio) -> Result<()> {
    let funds = portfolio.list_funds().await?;
    let user = portfolio.user();
    let greeting = if user.display_name.is_empty() {
        "Welcome!".to_string()
    } else {
        format!("Welcome, {}!", user.display_name)
    };
    println!("{}\n", ui::style_text(&greeting, ui::StyleType::Title));

    if funds.is_empty() {
        println!("No fund details added.");
        ui::print_placeholder("Run `navfolio add <scheme-code>` to start tracking your investments.");
        return Ok(());
    }

    let total: f64 = funds.iter().map(Fund::current_value).sum();
    println!("{}", funds_table(&funds));
    println!(
        "\n{}: {}",
        ui::style_text("Total Portfolio Value", ui::StyleType::TotalLabel),
        ui::style_text(&ui::format_inr(total, 0), ui::StyleType::TotalValue)
    );
    Ok(())
}

pub async fn add(portfolio: &Portfolio, scheme_code: &str) -> Result<()> {
    let fund = portfolio.add_fund(scheme_code).await?;
    println!(
        "Added {}. Run `navfolio refresh` to fetch its latest NAV.",
        ui::style_text(&fund.name, ui::StyleType::TotalLabel)
    );
    Ok(())
}

pub async fn remove(portfolio: &Portfolio, fund_id: &str) -> Result<()> {
    portfolio.delete_fund(fund_id).await?;
    println!("Removed fund {fund_id}.");
    Ok(())
}

pub async fn set_units(portfolio: &Portfolio, fund_id: &str, units: f64) -> Result<()> {
    let fund = portfolio.update_units(fund_id, units).await?;
    println!(
        "{}: {:.3} units, current value {}",
        fund.display_name(),
        fund.units(),
        ui::style_text(
            &ui::format_inr(fund.current_value(), 2),
            ui::StyleType::TotalValue
        )
    );
    Ok(())
}
