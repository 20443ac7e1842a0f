use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Number of fractional digits shown for every user-facing amount.
pub const AMOUNT_PRECISION: u32 = 2;

/// Locale-aware formatting preferences.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LocaleConfig {
    pub language_tag: String,
    pub decimal_separator: char,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grouping_separator: Option<char>,
}

impl Default for LocaleConfig {
    fn default() -> Self {
        Self {
            language_tag: "ru-RU".into(),
            decimal_separator: ',',
            grouping_separator: None,
        }
    }
}

/// Renders `value` with two fractional digits using the locale's separators.
pub fn format_amount(locale: &LocaleConfig, value: Decimal) -> String {
    let mut rounded =
        value.round_dp_with_strategy(AMOUNT_PRECISION, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        // drop the sign of a negative zero
        rounded = Decimal::ZERO;
    }
    let mut body = format!("{:.*}", AMOUNT_PRECISION as usize, rounded);
    if locale.decimal_separator != '.' {
        if let Some(pos) = body.find('.') {
            body.replace_range(pos..=pos, &locale.decimal_separator.to_string());
        }
    }
    if let Some(separator) = locale.grouping_separator {
        let split = body.find(locale.decimal_separator).unwrap_or(body.len());
        let mut int_part = body[..split].to_string();
        insert_grouping(&mut int_part, separator);
        body = format!("{}{}", int_part, &body[split..]);
    }
    body
}

/// Parses user input, accepting either `.` or `,` as the decimal separator.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let normalized = input.trim().replace(',', ".");
    if normalized.is_empty() {
        return None;
    }
    Decimal::from_str(&normalized).ok()
}

fn insert_grouping(int_part: &mut String, separator: char) {
    if let Some(digits) = int_part.strip_prefix('-') {
        *int_part = format!("-{}", group_digits(digits, separator));
    } else {
        *int_part = group_digits(int_part, separator);
    }
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::new();
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn formats_with_comma_by_default() {
        let locale = LocaleConfig::default();
        assert_eq!(format_amount(&locale, dec!(1234.5)), "1234,50");
        assert_eq!(format_amount(&locale, dec!(0)), "0,00");
        assert_eq!(format_amount(&locale, dec!(-50)), "-50,00");
    }

    #[test]
    fn rounds_half_away_from_zero() {
        let locale = LocaleConfig::default();
        assert_eq!(format_amount(&locale, dec!(2.005)), "2,01");
        assert_eq!(format_amount(&locale, dec!(-2.005)), "-2,01");
    }

    #[test]
    fn honours_grouping_and_point_separator() {
        let locale = LocaleConfig {
            language_tag: "en-US".into(),
            decimal_separator: '.',
            grouping_separator: Some(','),
        };
        assert_eq!(format_amount(&locale, dec!(1234567.891)), "1,234,567.89");
        assert_eq!(format_amount(&locale, dec!(-1000)), "-1,000.00");
    }

    #[test]
    fn parses_both_separators() {
        assert_eq!(parse_amount("10"), Some(dec!(10)));
        assert_eq!(parse_amount("10,5"), Some(dec!(10.5)));
        assert_eq!(parse_amount(" 7.25 "), Some(dec!(7.25)));
        assert_eq!(parse_amount("-3"), Some(dec!(-3)));
        assert_eq!(parse_amount("abc"), None);
        assert_eq!(parse_amount(""), None);
    }
}
