//! Display formatting shared by the engine and the translator.

/// Maximum number of fractional digits shown before a value is rounded.
pub const MAX_FRACTION_DIGITS: usize = 10;

/// Formats a raw value for the display.
///
/// NaN becomes `"Error"`, infinities are spelled out, values that need an
/// exponent are passed through, and anything with more than ten fractional
/// digits is rounded to ten with trailing zeros removed.
pub fn format_result(value: f64) -> String {
    if value.is_nan() {
        return "Error".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let plain = number_to_string(value);
    if plain.contains('e') {
        return plain;
    }

    match plain.split_once('.') {
        Some((_, fraction)) if fraction.len() > MAX_FRACTION_DIGITS => {
            let rounded = format!("{:.*}", MAX_FRACTION_DIGITS, value);
            rounded
                .trim_end_matches('0')
                .trim_end_matches('.')
                .to_string()
        }
        _ => plain,
    }
}

/// Shortest round-trip decimal form of a number.
///
/// Magnitudes outside `[1e-6, 1e21)` switch to exponent notation with an
/// explicit exponent sign (`1e+21`, `1.5e-7`). Negative zero prints as `0`.
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if !(1e-6..1e21).contains(&magnitude) {
        let scientific = format!("{:e}", value);
        return match scientific.split_once('e') {
            Some((mantissa, exponent)) if !exponent.starts_with('-') => {
                format!("{}e+{}", mantissa, exponent)
            }
            _ => scientific,
        };
    }

    format!("{}", value)
}

/// Reads a display string back as a number. Anything unparsable is NaN.
pub fn parse_display(text: &str) -> f64 {
    text.trim().parse::<f64>().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_values() {
        assert_eq!(format_result(f64::NAN), "Error");
        assert_eq!(format_result(f64::INFINITY), "Infinity");
        assert_eq!(format_result(f64::NEG_INFINITY), "-Infinity");
        assert_eq!(format_result(-0.0), "0");
    }

    #[test]
    fn test_plain_values_untouched() {
        assert_eq!(format_result(10.0), "10");
        assert_eq!(format_result(12.5), "12.5");
        assert_eq!(format_result(-3.25), "-3.25");
    }

    #[test]
    fn test_long_fraction_rounded() {
        // 0.1 + 0.2 = 0.30000000000000004
        assert_eq!(format_result(0.1 + 0.2), "0.3");
        assert_eq!(format_result(1.0 / 3.0), "0.3333333333");
        assert_eq!(format_result(2.0 / 3.0), "0.6666666667");
    }

    #[test]
    fn test_exponent_passthrough() {
        assert_eq!(format_result(1e21), "1e+21");
        assert_eq!(format_result(1.5e-7), "1.5e-7");
        assert_eq!(format_result(-2e25), "-2e+25");
    }

    #[test]
    fn test_idempotent() {
        for value in [0.1 + 0.2, 1.0 / 3.0, 12.96, 1e21, 1.5e-7, -42.0, 123.456] {
            let once = format_result(value);
            let twice = format_result(parse_display(&once));
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_parse_display() {
        assert_eq!(parse_display("0."), 0.0);
        assert_eq!(parse_display("-12.5"), -12.5);
        assert_eq!(parse_display("Infinity"), f64::INFINITY);
        assert!(parse_display("Error").is_nan());
        assert!(parse_display("-").is_nan());
    }
}
