//! Small numeric helpers shared by the aggregator and the reporters

/// Decimal places used for ratios and averages in reports
pub const REPORT_PRECISION: i32 = 4;

/// Mean of `values`; 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by N); 0 for fewer than two values
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let avg = mean(values);
    let variance =
        values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `numerator / denominator`, or 0 when the denominator is 0
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        0.0
    }
}

/// Round half away from zero to `places` decimals
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Round to [`REPORT_PRECISION`] decimals
pub fn round_report(value: f64) -> f64 {
    round_to(value, REPORT_PRECISION)
}

/// Format a ratio as a percentage string
pub fn as_percentage(rate: f64) -> String {
    format!("{:.1}%", rate * 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert!((mean(&[0.7, 0.9]) - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_population_std_dev() {
        assert_eq!(population_std_dev(&[0.4]), 0.0);
        assert_eq!(population_std_dev(&[0.5, 0.5, 0.5]), 0.0);
        assert!((population_std_dev(&[0.7, 0.9]) - 0.1).abs() < 1e-12);
        // Sample std of [1, 3] would be ~1.414
        assert!((population_std_dev(&[1.0, 3.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_ratio_guards_zero() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(1.0, 4.0), 0.25);
    }

    #[test]
    fn test_round_report() {
        assert_eq!(round_report(0.123456), 0.1235);
        assert_eq!(round_report(2.0 / 3.0), 0.6667);
        assert_eq!(round_report(0.0075), 0.0075);
    }

    #[test]
    fn test_as_percentage() {
        assert_eq!(as_percentage(0.8), "80.0%");
    }
}
