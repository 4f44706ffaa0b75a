//! Number, currency and calendar-label formatting shared by reports and exports.

/// Currency symbol for an ISO 4217 code; unknown codes print as themselves.
pub fn symbol_for(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "CAD" => "CA$".into(),
        "AUD" => "A$".into(),
        _ => code.into(),
    }
}

/// `$` followed by exactly two decimals, e.g. `$80.00`, `$-5.25`.
pub fn format_currency(amount: f64) -> String {
    format_currency_with(amount, "USD")
}

pub fn format_currency_with(amount: f64, code: &str) -> String {
    format!("{}{:.2}", symbol_for(code), normalize_zero(amount))
}

/// Shortest decimal form that parses back to the same value: `2`, `1.5`, `0.655`.
pub fn format_number(value: f64) -> String {
    format!("{}", normalize_zero(value))
}

/// Three-letter English month name for a 1-based month number.
pub fn month_label(month: u32) -> &'static str {
    match month {
        1 => "Jan",
        2 => "Feb",
        3 => "Mar",
        4 => "Apr",
        5 => "May",
        6 => "Jun",
        7 => "Jul",
        8 => "Aug",
        9 => "Sep",
        10 => "Oct",
        11 => "Nov",
        12 => "Dec",
        _ => "",
    }
}

// -0.0 would otherwise render with a sign.
fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_uses_two_decimals_and_dollar_prefix() {
        assert_eq!(format_currency(80.0), "$80.00");
        assert_eq!(format_currency(73.449), "$73.45");
        assert_eq!(format_currency(-0.0), "$0.00");
        assert_eq!(format_currency(-5.25), "$-5.25");
    }

    #[test]
    fn configured_currency_picks_its_symbol() {
        assert_eq!(format_currency_with(12.5, "EUR"), "€12.50");
        assert_eq!(format_currency_with(3.0, "CHF"), "CHF3.00");
    }

    #[test]
    fn numbers_use_shortest_form() {
        assert_eq!(format_number(2.0), "2");
        assert_eq!(format_number(1.5), "1.5");
        assert_eq!(format_number(0.655), "0.655");
    }

    #[test]
    fn month_labels_cover_the_year() {
        let labels: Vec<&str> = (1..=12).map(month_label).collect();
        assert_eq!(labels.first(), Some(&"Jan"));
        assert_eq!(labels.last(), Some(&"Dec"));
        assert_eq!(month_label(13), "");
    }
}
