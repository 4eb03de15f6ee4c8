use super::ui;
use crate::core::{
    CurrencyConverter, PricingContext, format_compact_currency, format_percentage,
};
use anyhow::Result;
use comfy_table::Cell;

/// Renders the Scale plan schedule with thresholds in the display currency.
pub fn render(context: &PricingContext) -> Result<String> {
    let schedule = context.schedule()?;
    let registry = context.registry();
    let code = &context.currency().code;
    let converter = CurrencyConverter::new(registry);

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Tier"),
        ui::header_cell(&format!("Revenue from ({code})")),
        ui::header_cell("Take rate"),
        ui::header_cell("Multiplier"),
        ui::header_cell("Rate reduction"),
    ]);

    for tier in schedule.iter() {
        let threshold = converter.from_base(tier.revenue_threshold, code);
        table.add_row(vec![
            Cell::new(tier.tier),
            ui::value_cell(format_compact_currency(registry, threshold, code)),
            ui::value_cell(format_percentage(tier.take_rate, 2)),
            ui::format_optional_cell(tier.revenue_multiplier, |m| format!("×{}", m.normalize())),
            ui::format_optional_cell(tier.rate_reduction, |r| format_percentage(r, 2)),
        ]);
    }

    let mut output = format!(
        "{}\n\n",
        ui::style_text("Scale plan tiers", ui::StyleType::Title)
    );
    if schedule.is_empty() {
        output.push_str(&ui::style_text("No tiers configured.", ui::StyleType::Subtle));
    } else {
        output.push_str(&table.to_string());
    }
    Ok(output)
}

pub fn run(context: &PricingContext) -> Result<()> {
    println!("{}", render(context)?);
    Ok(())
}
