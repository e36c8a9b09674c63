/// Render an amount with exactly two decimal digits and a comma thousands separator.
///
/// `None`, NaN and infinities render as the zero placeholder `0.00`. Values are only
/// rounded here; everything upstream keeps full precision.
pub fn format_currency(amount: Option<f64>) -> String {
    let amt = match amount {
        Some(amt) if amt.is_finite() => amt,
        _ => return "0.00".to_string(),
    };

    let fixed = format!("{:.2}", amt.abs());
    let (whole, cents) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    // -0.004 rounds to zero and should not keep its sign
    let sign = if amt < 0. && fixed != "0.00" { "-" } else { "" };
    format!("{}{}.{}", sign, grouped, cents)
}

#[cfg(test)]
mod tests {
    use super::format_currency;
    use test_log::test;

    #[test]
    fn test_placeholder() {
        assert_eq!(format_currency(None), "0.00");
        assert_eq!(format_currency(Some(f64::NAN)), "0.00");
        assert_eq!(format_currency(Some(f64::INFINITY)), "0.00");
    }

    #[test]
    fn test_two_decimals_and_separators() {
        assert_eq!(format_currency(Some(0.)), "0.00");
        assert_eq!(format_currency(Some(5.)), "5.00");
        assert_eq!(format_currency(Some(183.333333)), "183.33");
        assert_eq!(format_currency(Some(999.999)), "1,000.00");
        assert_eq!(format_currency(Some(1100.)), "1,100.00");
        assert_eq!(format_currency(Some(123456.5)), "123,456.50");
        assert_eq!(format_currency(Some(1_000_000.)), "1,000,000.00");
        assert_eq!(format_currency(Some(37_000_000.25)), "37,000,000.25");
    }

    #[test]
    fn test_negative() {
        assert_eq!(format_currency(Some(-1234.5)), "-1,234.50");
        assert_eq!(format_currency(Some(-0.004)), "0.00");
    }
}
