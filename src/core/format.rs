//! Locale-aware rendering of currency amounts and percentages.
//!
//! Only the handful of locales the registry uses are known. Each locale
//! supplies its separators, where the currency symbol goes, and the suffixes
//! used by compact notation. Unknown locale tags render as `en-US`.
use crate::core::currency::CurrencyRegistry;
use rust_decimal::{Decimal, RoundingStrategy};

/// Options for [`format_currency`]. The default is full notation with no
/// fraction digits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FormatOptions {
    pub compact: bool,
    pub max_fraction_digits: Option<u32>,
}

impl FormatOptions {
    pub fn compact() -> Self {
        Self {
            compact: true,
            max_fraction_digits: Some(1),
        }
    }

    pub fn with_fraction_digits(digits: u32) -> Self {
        Self {
            compact: false,
            max_fraction_digits: Some(digits),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SymbolPosition {
    /// `$1,234`
    Prefix,
    /// `1 234 kr`
    Suffix,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleFormat {
    group: &'static str,
    decimal: &'static str,
    position: SymbolPosition,
    /// Thousand, million, billion and trillion suffixes.
    compact: [&'static str; 4],
}

const EN: LocaleFormat = LocaleFormat {
    group: ",",
    decimal: ".",
    position: SymbolPosition::Prefix,
    compact: ["K", "M", "B", "T"],
};

impl LocaleFormat {
    fn for_tag(tag: &str) -> Self {
        match tag {
            "de-DE" | "de-AT" => LocaleFormat {
                group: ".",
                decimal: ",",
                position: SymbolPosition::Suffix,
                compact: [" Tsd.", " Mio.", " Mrd.", " Bio."],
            },
            "de-CH" => LocaleFormat {
                group: "'",
                decimal: ".",
                position: SymbolPosition::Prefix,
                compact: [" Tsd.", " Mio.", " Mrd.", " Bio."],
            },
            "fr-FR" => LocaleFormat {
                group: " ",
                decimal: ",",
                position: SymbolPosition::Suffix,
                compact: [" k", " M", " Md", " Bn"],
            },
            "nb-NO" => LocaleFormat {
                group: " ",
                decimal: ",",
                position: SymbolPosition::Suffix,
                compact: ["k", " mill.", " mrd.", " bill."],
            },
            "sv-SE" => LocaleFormat {
                group: " ",
                decimal: ",",
                position: SymbolPosition::Suffix,
                compact: [" tn", " mn", " md", " bn"],
            },
            "da-DK" => LocaleFormat {
                group: ".",
                decimal: ",",
                position: SymbolPosition::Suffix,
                compact: [" t", " mio.", " mia.", " bio."],
            },
            _ => EN,
        }
    }
}

fn round(value: Decimal, digits: u32) -> Decimal {
    let mut rounded = value.round_dp_with_strategy(digits, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(digits);
    rounded
}

/// Renders the magnitude of `value` with grouping; sign handling is left to
/// the caller. `trim` drops trailing fractional zeros.
fn render_number(value: Decimal, digits: u32, trim: bool, locale: &LocaleFormat) -> String {
    let text = round(value.abs(), digits).to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (text.as_str(), ""),
    };
    let frac_part = if trim {
        frac_part.trim_end_matches('0')
    } else {
        frac_part
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push_str(locale.group);
        }
        grouped.push(ch);
    }

    if frac_part.is_empty() {
        grouped
    } else {
        format!("{grouped}{}{frac_part}", locale.decimal)
    }
}

/// Scales `value` to the largest compact unit it reaches, promoting to the
/// next unit when rounding would print 1000 of the current one.
fn compact_unit(value: Decimal, digits: u32) -> Option<(Decimal, usize)> {
    let magnitude = value.abs();
    let thousand = Decimal::ONE_THOUSAND;
    if magnitude < thousand {
        return None;
    }

    let mut unit = thousand;
    let mut index = 0;
    while index < 3 && magnitude >= unit * thousand {
        unit *= thousand;
        index += 1;
    }
    if index < 3 && round(magnitude / unit, digits) >= thousand {
        unit *= thousand;
        index += 1;
    }
    Some((value / unit, index))
}

/// Formats `amount`, given in the currency `code`, with that currency's
/// locale. Unknown codes format as the base currency.
pub fn format_currency(
    registry: &CurrencyRegistry,
    amount: Decimal,
    code: &str,
    options: FormatOptions,
) -> String {
    let currency = registry.get(code);
    let locale = LocaleFormat::for_tag(&currency.locale);

    let digits = options.max_fraction_digits.unwrap_or(0);

    let number = match compact_unit(amount, digits).filter(|_| options.compact) {
        Some((scaled, index)) => format!(
            "{}{}",
            render_number(scaled, digits, true, &locale),
            locale.compact[index]
        ),
        None => render_number(amount, digits, options.compact, &locale),
    };
    let sign = if round(amount, digits) < Decimal::ZERO {
        "-"
    } else {
        ""
    };

    match locale.position {
        SymbolPosition::Prefix => format!("{sign}{}{number}", currency.symbol),
        SymbolPosition::Suffix => format!("{sign}{number} {}", currency.symbol),
    }
}

/// Compact notation with at most one fraction digit, e.g. `$1.5M`.
pub fn format_compact_currency(
    registry: &CurrencyRegistry,
    amount: Decimal,
    code: &str,
) -> String {
    format_currency(registry, amount, code, FormatOptions::compact())
}

/// `value * 100` with exactly `decimals` places and a trailing `%`.
pub fn format_percentage(value: Decimal, decimals: u32) -> String {
    let percent = round(value * Decimal::ONE_HUNDRED, decimals);
    if percent.is_zero() {
        return format!("{}%", percent.abs());
    }
    format!("{percent}%")
}
