//! Display formatting for table cells and metric values.

use chrono::NaiveDate;

/// Fractions render as percentages: 0.05 -> "5.00%".
pub fn percent(value: f64) -> String {
    format!("{:.2}%", value * 100.0)
}

/// Dollar prices with two decimals.
pub fn price(value: f64) -> String {
    format!("${value:.2}")
}

/// Exit price may be absent while a position is still open.
pub fn optional_price(value: Option<f64>) -> String {
    match value {
        Some(v) => price(v),
        None => "-".into(),
    }
}

/// US short date, matching the backend's locale.
pub fn short_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// Trade side from the sign of the signal.
pub fn side_label(signal: i32) -> &'static str {
    if signal > 0 {
        "Buy"
    } else {
        "Sell"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_formatting() {
        assert_eq!(percent(0.05), "5.00%");
        assert_eq!(percent(-0.0312), "-3.12%");
        assert_eq!(percent(1.0), "100.00%");
    }

    #[test]
    fn price_formatting() {
        assert_eq!(price(123.456), "$123.46");
        assert_eq!(optional_price(Some(99.9)), "$99.90");
        assert_eq!(optional_price(None), "-");
    }

    #[test]
    fn short_date_is_us_order() {
        let d = NaiveDate::from_ymd_opt(2023, 1, 5).unwrap();
        assert_eq!(short_date(d), "01/05/2023");
    }

    #[test]
    fn side_from_signal_sign() {
        assert_eq!(side_label(1), "Buy");
        assert_eq!(side_label(3), "Buy");
        assert_eq!(side_label(-1), "Sell");
        assert_eq!(side_label(0), "Sell");
    }
}
