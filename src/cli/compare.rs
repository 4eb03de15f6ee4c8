use super::ui;
use crate::core::{
    FormatOptions, PlanComparison, PlanKind, PricingContext, Quote, format_currency,
    format_percentage,
};
use anyhow::Result;
use comfy_table::Cell;
use rust_decimal::Decimal;
use tracing::info;

fn quote_row(context: &PricingContext, quote: &Quote, cheaper: PlanKind) -> Vec<Cell> {
    let money = |amount: Decimal| {
        format_currency(
            context.registry(),
            amount,
            &quote.currency,
            FormatOptions::with_fraction_digits(2),
        )
    };
    let total = if quote.plan == cheaper {
        ui::total_cell(money(quote.total))
    } else {
        ui::value_cell(money(quote.total))
    };

    vec![
        Cell::new(quote.plan),
        ui::value_cell(money(quote.fixed_monthly)),
        ui::value_cell(money(quote.department_cost)),
        ui::value_cell(money(quote.revenue_fee)),
        ui::value_cell(format_percentage(quote.effective_rate, 2)),
        ui::format_optional_cell(quote.tier, |t| t.to_string()),
        total,
    ]
}

/// Renders both plans side by side with the cheaper one and the break-even
/// revenue.
pub fn render(
    context: &PricingContext,
    comparison: &PlanComparison,
    break_even: Option<Decimal>,
) -> String {
    let registry = context.registry();
    let code = &comparison.launch.currency;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Plan"),
        ui::header_cell("Fixed"),
        ui::header_cell("Departments"),
        ui::header_cell("Revenue fee"),
        ui::header_cell("Rate"),
        ui::header_cell("Tier"),
        ui::header_cell("Total"),
    ]);
    table.add_row(quote_row(context, &comparison.launch, comparison.cheaper));
    table.add_row(quote_row(context, &comparison.scale, comparison.cheaper));

    let revenue = format_currency(
        registry,
        comparison.launch.revenue,
        code,
        FormatOptions::default(),
    );
    let saving = format_currency(
        registry,
        comparison.saving,
        code,
        FormatOptions::with_fraction_digits(2),
    );
    let break_even = match break_even {
        Some(revenue) => format_currency(registry, revenue, code, FormatOptions::default()),
        None => "never".to_string(),
    };

    let mut output = format!(
        "{}\n\n",
        ui::style_text(
            &format!("Plan comparison at {revenue} monthly revenue"),
            ui::StyleType::Title
        )
    );
    output.push_str(&table.to_string());
    output.push_str(&format!(
        "\n\nCheaper plan: {} (saves {})",
        ui::style_text(&comparison.cheaper.to_string(), ui::StyleType::TotalValue),
        saving
    ));
    output.push_str(&format!(
        "\nScale becomes cheaper from: {}",
        ui::style_text(&break_even, ui::StyleType::TotalLabel)
    ));
    output
}

pub fn run(context: &PricingContext, revenue: Decimal) -> Result<()> {
    info!("Comparing plans for revenue {revenue}");
    let comparison = context.compare(revenue)?;
    let break_even = context.break_even()?;
    println!("{}", render(context, &comparison, break_even));
    Ok(())
}
