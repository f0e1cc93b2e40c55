use vizij_countup_core::{
    format_number, wrap_per_character, ConfigError, FormatOptions, NumberFormat,
};

fn fmt(decimals: i32, decimal: &str, separator: &str) -> NumberFormat {
    FormatOptions {
        decimals,
        decimal_separator: decimal.into(),
        thousands_separator: separator.into(),
        ..FormatOptions::default()
    }
    .validate()
    .expect("valid options")
}

/// it should group thousands and keep one decimal
#[test]
fn groups_and_decimals() {
    let f = fmt(1, ".", ",");
    assert_eq!(format_number(1234567.5, &f), "1,234,567.5");
    assert_eq!(format_number(0.0, &f), "0.0");
    assert_eq!(format_number(999.96, &f), "1,000.0");
}

/// it should keep the sign outside the grouped digit run
#[test]
fn negative_values_group_magnitude() {
    let f = fmt(0, ".", ",");
    assert_eq!(format_number(-1234.0, &f), "-1,234");
    assert_eq!(format_number(-123.0, &f), "-123");
    assert_eq!(format_number(-1234567.0, &f), "-1,234,567");
}

/// it should suppress a thousands separator that parses as a number
#[test]
fn numeric_separator_is_suppressed() {
    let f = fmt(0, ".", "5");
    assert_eq!(f.grouping(), None);
    assert_eq!(format_number(1234.0, &f), "1234");
    assert_eq!(format_number(1234.0, &fmt(0, ".", " 1")), "1234");
    assert_eq!(format_number(1234.0, &fmt(0, ".", ".5x")), "1234");
}

/// it should skip grouping entirely when the separator is empty
#[test]
fn empty_separator_disables_grouping() {
    assert_eq!(format_number(9876543.0, &fmt(0, ".", "")), "9876543");
}

/// it should support locale-style separators, including multi-character ones
#[test]
fn locale_separators() {
    assert_eq!(
        format_number(1234567.891, &fmt(2, ",", ".")),
        "1.234.567,89"
    );
    assert_eq!(
        format_number(1234567.0, &fmt(0, ".", "\u{202f}")),
        "1\u{202f}234\u{202f}567"
    );
    assert_eq!(
        format_number(1234.5, &fmt(1, " pt ", "&nbsp;")),
        "1&nbsp;234 pt 5"
    );
}

/// it should wrap the number in prefix and suffix
#[test]
fn prefix_and_suffix() {
    let f = FormatOptions {
        prefix: "$".into(),
        suffix: " USD".into(),
        decimals: 2,
        ..FormatOptions::default()
    }
    .validate()
    .unwrap();
    assert_eq!(format_number(1500.0, &f), "$1,500.00 USD");
    assert_eq!(format_number(-0.5, &f), "$-0.50 USD");
}

/// it should round exact ties away from zero like toFixed
#[test]
fn rounding_matches_fixed_point_semantics() {
    let f0 = fmt(0, ".", ",");
    assert_eq!(format_number(0.5, &f0), "1");
    assert_eq!(format_number(1.5, &f0), "2");
    assert_eq!(format_number(2.5, &f0), "3");
    assert_eq!(format_number(-2.5, &f0), "-3");
    assert_eq!(format_number(999.5, &f0), "1,000");
    assert_eq!(format_number(-0.4, &f0), "0");

    let f2 = fmt(2, ".", ",");
    assert_eq!(format_number(1.005, &f2), "1.00");
    assert_eq!(format_number(0.125, &f2), "0.13");
    assert_eq!(format_number(1234.5678, &f2), "1,234.57");
}

/// it should print large magnitudes as plain digits
#[test]
fn large_values_use_plain_digits() {
    let f = fmt(0, ".", ",");
    assert_eq!(format_number(1e21, &f), "1,000,000,000,000,000,000,000");
}

/// it should render non-finite values without grouping instead of panicking
#[test]
fn non_finite_values() {
    let f = FormatOptions {
        prefix: "[".into(),
        suffix: "]".into(),
        ..FormatOptions::default()
    }
    .validate()
    .unwrap();
    assert_eq!(format_number(f64::NAN, &f), "[NaN]");
    assert_eq!(format_number(f64::INFINITY, &f), "[Infinity]");
    assert_eq!(format_number(f64::NEG_INFINITY, &f), "[-Infinity]");
}

/// it should reject decimals outside 0..=100
#[test]
fn decimals_are_validated() {
    assert_eq!(
        fmt_err(-1),
        ConfigError::NegativeDecimals(-1)
    );
    assert_eq!(fmt_err(101), ConfigError::DecimalsOutOfRange { got: 101 });
    let f = fmt(100, ".", ",");
    assert_eq!(format_number(1.0, &f).len(), 102);
}

fn fmt_err(decimals: i32) -> ConfigError {
    FormatOptions {
        decimals,
        ..FormatOptions::default()
    }
    .validate()
    .unwrap_err()
}

/// it should wrap each character, and render() should only wrap when a tag is set
#[test]
fn per_character_wrapping() {
    assert_eq!(
        wrap_per_character("-1,2", "b"),
        "<b>-</b><b>1</b><b>,</b><b>2</b>"
    );

    let plain = NumberFormat::default();
    assert_eq!(plain.render("1,234"), "1,234");

    let wrapped = FormatOptions {
        per_character_wrap: Some("i".into()),
        ..FormatOptions::default()
    }
    .validate()
    .unwrap();
    assert_eq!(wrapped.per_character_wrap(), Some("i"));
    assert_eq!(wrapped.render(&wrapped.format(12.0)), "<i>1</i><i>2</i>");

    // An empty tag name means no wrapping.
    let empty = FormatOptions {
        per_character_wrap: Some(String::new()),
        ..FormatOptions::default()
    }
    .validate()
    .unwrap();
    assert_eq!(empty.render("7"), "7");
}
