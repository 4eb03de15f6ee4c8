use super::ui;
use crate::core::{
    FormatOptions, PlanKind, PricingContext, Quote, format_currency, format_percentage,
};
use anyhow::{Context, Result};
use comfy_table::{Attribute, Cell};
use rust_decimal::Decimal;
use tracing::{debug, info};

/// Renders a quote as a breakdown table.
pub fn render(context: &PricingContext, quote: &Quote) -> String {
    let registry = context.registry();
    let money = |amount: Decimal| {
        format_currency(
            registry,
            amount,
            &quote.currency,
            FormatOptions::with_fraction_digits(2),
        )
    };

    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Item"), ui::header_cell("Amount")]);

    table.add_row(vec![Cell::new("Fixed monthly"), ui::value_cell(money(quote.fixed_monthly))]);
    if quote.plan == PlanKind::Scale {
        table.add_row(vec![
            Cell::new(format!("Departments ({})", context.departments())),
            ui::value_cell(money(quote.department_cost)),
        ]);
    }
    let rate_label = match quote.tier {
        Some(tier) => format!(
            "Revenue fee ({}, tier {tier})",
            format_percentage(quote.effective_rate, 2)
        ),
        None => format!("Revenue fee ({})", format_percentage(quote.effective_rate, 2)),
    };
    table.add_row(vec![Cell::new(rate_label), ui::value_cell(money(quote.revenue_fee))]);
    table.add_row(vec![
        Cell::new("Total per month").add_attribute(Attribute::Bold),
        ui::total_cell(money(quote.total)),
    ]);

    let revenue = format_currency(
        registry,
        quote.revenue,
        &quote.currency,
        FormatOptions::default(),
    );
    let mut output = format!(
        "{} plan at {} monthly revenue\n\n",
        ui::style_text(&quote.plan.to_string(), ui::StyleType::Title),
        ui::style_text(&revenue, ui::StyleType::TotalLabel)
    );
    output.push_str(&table.to_string());
    output
}

/// Serializes a quote for machine consumption.
pub fn render_json(quote: &Quote) -> Result<String> {
    serde_json::to_string_pretty(quote).context("Failed to serialize quote")
}

pub fn run(context: &PricingContext, plan: PlanKind, revenue: Decimal, json: bool) -> Result<()> {
    info!("Quoting {plan} plan for revenue {revenue}");
    let quote = context.quote(plan, revenue)?;
    debug!("Quote: {quote:#?}");

    if json {
        println!("{}", render_json(&quote)?);
        return Ok(());
    }

    println!("{}", render(context, &quote));
    if context.exceeds_display_cap(revenue) {
        let cap = format_currency(
            context.registry(),
            context.currency().max_revenue,
            &context.currency().code,
            FormatOptions::compact(),
        );
        println!(
            "\n{}",
            ui::style_text(
                &format!("Revenue is above the {cap} calculator range."),
                ui::StyleType::Subtle
            )
        );
    }
    Ok(())
}
