use super::ui;
use crate::core::{CurrencyRegistry, format_compact_currency};
use comfy_table::{Attribute, Cell};

/// Renders the registry, marking the base currency.
pub fn render(registry: &CurrencyRegistry) -> String {
    let base = &registry.base().code;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Code"),
        ui::header_cell("Symbol"),
        ui::header_cell("Locale"),
        ui::header_cell(&format!("Per {base}")),
        ui::header_cell("Max revenue"),
    ]);

    for currency in registry.iter() {
        let code_cell = if &currency.code == base {
            Cell::new(format!("{} (base)", currency.code)).add_attribute(Attribute::Bold)
        } else {
            Cell::new(&currency.code)
        };
        table.add_row(vec![
            code_cell,
            Cell::new(&currency.symbol),
            Cell::new(&currency.locale),
            ui::value_cell(currency.conversion_rate.normalize().to_string()),
            ui::value_cell(format_compact_currency(
                registry,
                currency.max_revenue,
                &currency.code,
            )),
        ]);
    }

    format!(
        "{}\n\n{table}",
        ui::style_text("Currencies", ui::StyleType::Title)
    )
}

pub fn run(registry: &CurrencyRegistry) {
    println!("{}", render(registry));
}
