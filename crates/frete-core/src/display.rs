use rust_decimal::{Decimal, RoundingStrategy};

const COMPACT_UNITS: [(i64, &str); 4] = [
    (1_000_000_000_000, "tri"),
    (1_000_000_000, "bi"),
    (1_000_000, "mi"),
    (1_000, "mil"),
];

/// Full Brazilian currency rendering, e.g. `R$ 1.234,56`.
pub fn format_brl(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = abs.split_once('.').unwrap_or((abs.as_str(), "00"));
    format!("{sign}R$ {},{frac_part}", group_thousands(int_part))
}

/// Abbreviated currency with at most one fraction digit, e.g. `R$ 1,2 mi`.
pub fn format_compact_brl(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    let abs = value.abs();

    for (i, (scale, unit)) in COMPACT_UNITS.iter().enumerate() {
        let scale = Decimal::from(*scale);
        if abs < scale {
            continue;
        }
        let scaled = one_fraction_digit(abs / scale);
        // 999.96 mil rounds up to the next unit.
        if scaled >= Decimal::ONE_THOUSAND && i > 0 {
            let (_, bigger) = COMPACT_UNITS[i - 1];
            return format!("{sign}R$ 1 {bigger}");
        }
        return format!("{sign}R$ {} {unit}", decimal_pt_br(scaled));
    }

    let scaled = one_fraction_digit(abs);
    if scaled >= Decimal::ONE_THOUSAND {
        return format!("{sign}R$ 1 mil");
    }
    format!("{sign}R$ {}", decimal_pt_br(scaled))
}

/// `count / total * 100` with one decimal, `0` when `total` is zero.
pub fn share_percent(count: usize, total: usize) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    let share = Decimal::from(count) * Decimal::ONE_HUNDRED / Decimal::from(total);
    one_fraction_digit(share)
}

/// Integer with `.` thousands separators, e.g. `12.345`.
pub fn format_count(n: usize) -> String {
    group_thousands(&n.to_string())
}

fn one_fraction_digit(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
        .normalize()
}

/// pt-BR rendering of an already-rounded, non-negative decimal.
fn decimal_pt_br(d: Decimal) -> String {
    let text = d.normalize().to_string();
    match text.split_once('.') {
        Some((int_part, frac)) => format!("{},{frac}", group_thousands(int_part)),
        None => group_thousands(&text),
    }
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}
