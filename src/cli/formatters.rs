use std::collections::HashMap;

use chrono::NaiveDate;
use expense_config::Config;
use expense_core::format::ExpenseFormatter;
use once_cell::sync::Lazy;

static CURRENCY_SYMBOLS: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("USD", "$"),
        ("CAD", "$"),
        ("AUD", "$"),
        ("EUR", "€"),
        ("GBP", "£"),
        ("JPY", "¥"),
        ("INR", "₹"),
        ("BRL", "R$"),
    ])
});

/// Number and date conventions for a locale tag such as `en-US`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LocaleStyle {
    decimal: char,
    grouping: char,
    symbol_first: bool,
    month_first: bool,
}

impl LocaleStyle {
    fn for_tag(tag: &str) -> Self {
        let lowered = tag.trim().to_ascii_lowercase().replace('_', "-");
        let language = lowered.split('-').next().unwrap_or("en");
        match language {
            "en" => Self {
                decimal: '.',
                grouping: ',',
                symbol_first: true,
                month_first: lowered == "en" || lowered == "en-us",
            },
            "de" | "es" | "it" | "pt" | "nl" | "da" | "id" | "tr" => Self {
                decimal: ',',
                grouping: '.',
                symbol_first: false,
                month_first: false,
            },
            "fr" | "sv" | "nb" | "fi" | "pl" | "cs" | "ru" => Self {
                decimal: ',',
                grouping: ' ',
                symbol_first: false,
                month_first: false,
            },
            _ => Self {
                decimal: '.',
                grouping: ',',
                symbol_first: true,
                month_first: false,
            },
        }
    }
}

/// Formatter implementations driven by the active CLI configuration.
#[derive(Debug, Clone)]
pub struct CliFormatters {
    currency: String,
    style: LocaleStyle,
}

impl CliFormatters {
    pub fn from_config(config: &Config) -> Self {
        Self {
            currency: config.currency.clone(),
            style: LocaleStyle::for_tag(&config.locale),
        }
    }

    fn group_digits(&self, amount: f64) -> String {
        let fixed = format!("{:.2}", amount.abs());
        let (whole, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
        let mut grouped = String::new();
        for (idx, digit) in whole.chars().enumerate() {
            if idx > 0 && (whole.len() - idx) % 3 == 0 {
                grouped.push(self.style.grouping);
            }
            grouped.push(digit);
        }
        let sign = if amount < 0.0 && fixed != "0.00" { "-" } else { "" };
        format!("{sign}{grouped}{}{fraction}", self.style.decimal)
    }
}

impl ExpenseFormatter for CliFormatters {
    fn amount(&self, value: f64) -> String {
        let digits = self.group_digits(value);
        let code = self.currency.as_str();
        match CURRENCY_SYMBOLS.get(code) {
            Some(symbol) if self.style.symbol_first => format!("{symbol}{digits}"),
            Some(symbol) => format!("{digits} {symbol}"),
            None => format!("{digits} {code}"),
        }
    }

    fn date(&self, date: NaiveDate) -> String {
        if self.style.month_first {
            date.format("%b %-d, %Y").to_string()
        } else {
            date.format("%-d %b %Y").to_string()
        }
    }

    fn percentage(&self, value: f64) -> String {
        let text = format!("{value:.1}");
        if self.style.decimal == '.' {
            format!("{text}%")
        } else {
            format!("{}%", text.replace('.', &self.style.decimal.to_string()))
        }
    }
}
