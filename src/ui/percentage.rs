use crate::config::SunburstConfig;

/// `100 * value / total`, or 0 when there is no total to divide by.
pub fn percentage_of(value: f64, total: f64) -> f64 {
    if !(total > 0.0) || !total.is_finite() || !value.is_finite() {
        return 0.0;
    }
    100.0 * value / total
}

/// Percentage label for a hovered node, e.g. `"60.0%"`, `"12.3%"`, `"< 0.1%"`.
///
/// Rounds to the configured number of significant digits; values that round
/// below the low cutoff print as the literal `"< {cutoff}%"`. An empty total
/// prints `"0%"`.
pub fn format_percentage(value: f64, total: f64, config: &SunburstConfig) -> String {
    if !(total > 0.0) || !total.is_finite() {
        return "0%".to_string();
    }
    let percentage = percentage_of(value, total);
    let digits = config.percentage_significant_digits.max(1);
    let rounded = round_significant(percentage, digits);
    if rounded < config.percentage_low_cutoff {
        return format!("< {}%", config.percentage_low_cutoff);
    }
    format!("{}%", to_precision(percentage, digits))
}

fn round_significant(x: f64, digits: u32) -> f64 {
    if x == 0.0 || !x.is_finite() {
        return x;
    }
    let magnitude = x.abs().log10().floor() as i32;
    let factor = 10f64.powi(digits as i32 - 1 - magnitude);
    (x * factor).round() / factor
}

/// Fixed-point rendering with `digits` significant digits, keeping trailing
/// zeros (`60` → `"60.0"`, `12.345` → `"12.3"`, `100` → `"100"`).
pub fn to_precision(x: f64, digits: u32) -> String {
    let digits = digits.max(1);
    if x == 0.0 || !x.is_finite() {
        return format!("{:.*}", digits as usize - 1, 0.0);
    }
    // Magnitude after rounding, so 99.96 becomes "100" rather than "100.0".
    let rounded = round_significant(x, digits);
    let magnitude = rounded.abs().log10().floor() as i32;
    let decimals = (digits as i32 - 1 - magnitude).max(0) as usize;
    format!("{:.*}", decimals, rounded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: f64, total: f64) -> String {
        format_percentage(value, total, &SunburstConfig::default())
    }

    #[test]
    fn three_significant_digits() {
        assert_eq!(fmt(60.0, 100.0), "60.0%");
        assert_eq!(fmt(12.345, 100.0), "12.3%");
        assert_eq!(fmt(100.0, 100.0), "100%");
        assert_eq!(fmt(1.0, 3.0), "33.3%");
        assert_eq!(fmt(0.5, 100.0), "0.500%");
    }

    #[test]
    fn tiny_shares_print_cutoff_literal() {
        assert_eq!(fmt(0.05, 100.0), "< 0.1%");
        assert_eq!(fmt(0.0, 100.0), "< 0.1%");
        // Rounds up to the cutoff, so it is shown numerically.
        assert_eq!(fmt(0.09996, 100.0), "0.100%");
    }

    #[test]
    fn zero_total_reports_zero_percent() {
        assert_eq!(fmt(5.0, 0.0), "0%");
        assert_eq!(percentage_of(5.0, 0.0), 0.0);
    }

    #[test]
    fn precision_handles_rounding_across_magnitudes() {
        assert_eq!(to_precision(99.96, 3), "100");
        assert_eq!(to_precision(9.996, 3), "10.0");
        assert_eq!(to_precision(0.0, 3), "0.00");
        assert_eq!(to_precision(75.0, 2), "75");
    }
}
