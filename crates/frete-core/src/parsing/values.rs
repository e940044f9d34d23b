use rust_decimal::Decimal;

use crate::model::Cell;
use crate::parsing::normalize::strip_quotes;

/// Parse a locale-formatted number ("1.234,56") into a decimal.
///
/// Dots are thousands separators, the first comma is the decimal mark and
/// anything that is not a digit or dot is dropped. Blank or unparseable
/// input gives zero. Numeric cells pass through unchanged.
pub fn parse_numeric(cell: Option<&Cell>) -> Decimal {
    match cell {
        Some(Cell::Number(n)) if n.is_finite() => f64_to_decimal(*n),
        Some(Cell::Text(s)) => parse_numeric_str(s),
        _ => Decimal::ZERO,
    }
}

pub fn parse_numeric_str(s: &str) -> Decimal {
    let cleaned: String = strip_quotes(s)
        .replace('.', "")
        .replacen(',', ".", 1)
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();

    leading_number(&cleaned)
        .map(f64_to_decimal)
        .unwrap_or(Decimal::ZERO)
}

/// Parse a volume count: the leading integer of the text, or the
/// truncated value of a numeric cell. Anything else counts as zero.
pub fn parse_volumes(cell: Option<&Cell>) -> i64 {
    match cell {
        Some(Cell::Number(n)) if n.is_finite() => n.trunc() as i64,
        Some(Cell::Text(s)) => leading_integer(s).unwrap_or(0),
        _ => 0,
    }
}

/// Longest numeric prefix of `s` (after leading whitespace) as a float.
///
/// Mirrors how spreadsheet tools read "44000 dias" or "19/06/2020" as 44000
/// and 19 respectively.
pub fn leading_number(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    // Optional exponent, only consumed when complete.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return None;
    }
    s[..end].parse::<i64>().ok()
}

/// Convert f64 to Decimal, preserving reasonable precision.
///
/// Uses string round-trip to avoid floating-point artifacts
/// (e.g., 0.0035_f64 becoming 0.00349999...).
pub fn f64_to_decimal(f: f64) -> Decimal {
    format!("{f}")
        .parse::<Decimal>()
        .unwrap_or_else(|_| Decimal::try_from(f).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn text(s: &str) -> Cell {
        Cell::Text(s.into())
    }

    #[test]
    fn brazilian_thousands_and_decimal_comma() {
        assert_eq!(parse_numeric(Some(&text("1.234,56"))), dec!(1234.56));
        assert_eq!(parse_numeric(Some(&text("R$ 12.000,00"))), dec!(12000));
        assert_eq!(parse_numeric(Some(&text("'350,5'"))), dec!(350.5));
    }

    #[test]
    fn numeric_cells_pass_through() {
        assert_eq!(parse_numeric(Some(&Cell::Number(1234.5))), dec!(1234.5));
        assert_eq!(parse_numeric(Some(&Cell::Number(0.0035))), dec!(0.0035));
    }

    #[test]
    fn blank_or_garbage_is_zero() {
        assert_eq!(parse_numeric(None), Decimal::ZERO);
        assert_eq!(parse_numeric(Some(&Cell::Empty)), Decimal::ZERO);
        assert_eq!(parse_numeric(Some(&text("N/A"))), Decimal::ZERO);
        assert_eq!(parse_numeric(Some(&text("--"))), Decimal::ZERO);
    }

    #[test]
    fn dot_decimal_text_reads_as_thousands() {
        // Exports are pt-BR: a dot is always a thousands separator.
        assert_eq!(parse_numeric(Some(&text("10.5"))), dec!(105));
    }

    #[test]
    fn volumes_leading_integer() {
        assert_eq!(parse_volumes(Some(&text("12"))), 12);
        assert_eq!(parse_volumes(Some(&text(" 7 cx"))), 7);
        assert_eq!(parse_volumes(Some(&text("cx 7"))), 0);
        assert_eq!(parse_volumes(Some(&Cell::Number(3.9))), 3);
        assert_eq!(parse_volumes(None), 0);
    }

    #[test]
    fn leading_number_prefixes() {
        assert_eq!(leading_number("44000"), Some(44000.0));
        assert_eq!(leading_number("44000.25abc"), Some(44000.25));
        assert_eq!(leading_number("19/06/2020"), Some(19.0));
        assert_eq!(leading_number("2020-06-19"), Some(2020.0));
        assert_eq!(leading_number("  -3.5"), Some(-3.5));
        assert_eq!(leading_number("1e3x"), Some(1000.0));
        assert_eq!(leading_number("1ex"), Some(1.0));
        assert_eq!(leading_number("abc"), None);
        assert_eq!(leading_number("."), None);
        assert_eq!(leading_number(""), None);
    }

    #[test]
    fn f64_to_decimal_preserves_precision() {
        assert_eq!(f64_to_decimal(0.0035), dec!(0.0035));
        assert_eq!(f64_to_decimal(68.0), dec!(68));
        assert_eq!(f64_to_decimal(1.23), dec!(1.23));
    }
}
