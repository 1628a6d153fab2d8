//! Numeric formatting for CSS serialization.

/// Formats a number with at most `precision` decimals and no trailing zeros.
///
/// Only trims trailing zeros if the formatted number contains a decimal point,
/// so integer-valued inputs like 40.0 are formatted as "40", not "4".
/// Negative zero is written as "0".
pub fn format_number(v: f32, precision: usize) -> String {
    let s = format!("{v:.precision$}");
    let trimmed = if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.')
    } else {
        s.as_str()
    };
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1.0, 2), "1");
        assert_eq!(format_number(1.5, 2), "1.5");
        assert_eq!(format_number(0.0, 2), "0");
        assert_eq!(format_number(40.0, 2), "40");
        assert_eq!(format_number(100.0, 0), "100");
        assert_eq!(format_number(0.6789, 2), "0.68");
        assert_eq!(format_number(-0.0001, 2), "0");
    }
}
