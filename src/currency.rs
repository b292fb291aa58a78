//! Static ISO-4217 currency lookup.
//!
//! Amounts everywhere in the engine are integers in minor units, so the only
//! currency facts the model needs are the code, display names, and the number
//! of decimal places.

use std::collections::HashMap;

use once_cell::sync::Lazy;

/// A currency description from the static table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Currency {
    pub code: &'static str,
    pub name: &'static str,
    pub symbols: &'static [&'static str],
    /// Number of digits after the decimal separator; minor units per major
    /// unit is `10^decimals`.
    pub decimals: u32,
}

impl Currency {
    /// Looks up a currency by its uppercase ISO code.
    pub fn for_code(code: &str) -> Option<&'static Currency> {
        CURRENCIES.get(code)
    }

    /// Rounds a fractional amount of minor units to a whole number.
    pub fn round_amount(&self, amount: f64) -> i64 {
        amount.round() as i64
    }
}

/// Whether `code` names a currency in the static table.
pub fn is_known_currency(code: &str) -> bool {
    CURRENCIES.contains_key(code)
}

type CurrencyRow = (
    &'static str,
    &'static str,
    &'static [&'static str],
    u32,
);

const CURRENCY_ROWS: &[CurrencyRow] = &[
    ("AUD", "Australian Dollar", &["AU$", "$"], 2),
    ("BHD", "Bahraini Dinar", &[".د.ب"], 3),
    ("BRL", "Brazilian Real", &["R$"], 2),
    ("CAD", "Canadian Dollar", &["CA$", "$"], 2),
    ("CHF", "Swiss Franc", &["CHF"], 2),
    ("CNY", "Chinese Yuan", &["CN¥", "¥"], 2),
    ("CZK", "Czech Koruna", &["Kč"], 2),
    ("DKK", "Danish Krone", &["kr"], 2),
    ("EUR", "Euro", &["€"], 2),
    ("GBP", "Pound Sterling", &["£"], 2),
    ("HKD", "Hong Kong Dollar", &["HK$", "$"], 2),
    ("INR", "Indian Rupee", &["₹"], 2),
    ("JPY", "Japanese Yen", &["¥"], 0),
    ("KRW", "South Korean Won", &["₩"], 0),
    ("KWD", "Kuwaiti Dinar", &["د.ك"], 3),
    ("MXN", "Mexican Peso", &["MX$", "$"], 2),
    ("NOK", "Norwegian Krone", &["kr"], 2),
    ("NZD", "New Zealand Dollar", &["NZ$", "$"], 2),
    ("PLN", "Polish Zloty", &["zł"], 2),
    ("RUB", "Russian Ruble", &["₽"], 2),
    ("SEK", "Swedish Krona", &["kr"], 2),
    ("SGD", "Singapore Dollar", &["S$", "$"], 2),
    ("TRY", "Turkish Lira", &["₺"], 2),
    ("USD", "United States Dollar", &["$"], 2),
    ("XBT", "Bitcoin", &["₿"], 8),
    ("ZAR", "South African Rand", &["R"], 2),
];

static CURRENCIES: Lazy<HashMap<&'static str, Currency>> = Lazy::new(|| {
    CURRENCY_ROWS
        .iter()
        .map(|&(code, name, symbols, decimals)| {
            (
                code,
                Currency {
                    code,
                    name,
                    symbols,
                    decimals,
                },
            )
        })
        .collect()
});
