// File: crates/chart-core/src/format.rs
// Summary: Number formatting for tick labels (fixed precision with thousands grouping).

/// Decimal exponent of `x`, i.e. `floor(log10(|x|))`. Zero maps to 0.
pub fn exponent(x: f64) -> i32 {
    let x = x.abs();
    if x == 0.0 || !x.is_finite() { return 0; }
    x.log10().floor() as i32
}

/// Number of decimals needed to distinguish multiples of `step`.
pub fn precision_fixed(step: f64) -> usize {
    (-exponent(step)).max(0) as usize
}

/// Format with `decimals` fixed digits and `,` between thousands.
pub fn format_grouped(value: f64, decimals: usize) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let raw = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match raw.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (raw.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 4);
    let digits = int_part.as_bytes();
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d as char);
    }
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    // "-0.00" reads as noise on an axis
    let is_zero = raw.bytes().all(|b| b == b'0' || b == b'.');
    if value < 0.0 && !is_zero {
        grouped.insert(0, '-');
    }
    grouped
}

/// Formatter for ticks spaced `step` apart.
pub fn step_formatter(step: f64) -> impl Fn(f64) -> String {
    let decimals = precision_fixed(step);
    move |v| format_grouped(v, decimals)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands() {
        assert_eq!(format_grouped(1234567.0, 0), "1,234,567");
        assert_eq!(format_grouped(999.0, 0), "999");
        assert_eq!(format_grouped(-1500.0, 0), "-1,500");
    }

    #[test]
    fn keeps_fraction_digits() {
        assert_eq!(format_grouped(0.25, 2), "0.25");
        assert_eq!(format_grouped(1000.5, 1), "1,000.5");
    }

    #[test]
    fn negative_zero_prints_plain() {
        assert_eq!(format_grouped(-0.0001, 2), "0.00");
    }

    #[test]
    fn precision_follows_step() {
        assert_eq!(precision_fixed(20.0), 0);
        assert_eq!(precision_fixed(0.5), 1);
        assert_eq!(precision_fixed(0.05), 2);
    }
}
