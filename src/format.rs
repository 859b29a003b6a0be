//! Money formatting for text output.

use std::sync::OnceLock;

use numfmt::{Formatter, Precision};

use crate::model::MinorUnits;

const CURRENCY_SYMBOL: &str = "₹";

/// Format `amount` paise as rupees with two decimal places, e.g. `₹12.50`.
pub fn format_minor_units(amount: MinorUnits) -> String {
    static POSITIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();
    static NEGATIVE_FMT: OnceLock<Option<Formatter>> = OnceLock::new();

    let sign = if amount < 0 { "-" } else { "" };
    let major = amount.unsigned_abs() / 100;
    let minor = amount.unsigned_abs() % 100;

    let formatter = if amount < 0 {
        NEGATIVE_FMT.get_or_init(|| whole_units_formatter(&format!("-{CURRENCY_SYMBOL}")))
    } else {
        POSITIVE_FMT.get_or_init(|| whole_units_formatter(CURRENCY_SYMBOL))
    };

    // Zero is hardcoded as "0" by numfmt, so the symbol must be added here.
    let major = match formatter {
        Some(formatter) if major > 0 => formatter.fmt_string(major as f64),
        _ => format!("{sign}{CURRENCY_SYMBOL}{major}"),
    };

    format!("{major}.{minor:02}")
}

fn whole_units_formatter(prefix: &str) -> Option<Formatter> {
    Formatter::currency(prefix)
        .ok()
        .map(|formatter| formatter.precision(Precision::Decimals(0)))
}
