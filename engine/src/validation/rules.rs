//! Per-type validation rules
//!
//! Each rule looks at one value and answers whether it is acceptable; rules
//! that normalize also return the rewritten text.

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use super::datetime;

/// Positive decimal without leading zeros, after separators are removed
static BIG_DECIMAL: Lazy<Regex> = Lazy::new(|| {
    RegexBuilder::new(r"^[1-9]\d*(\.\d+)?$")
        .case_insensitive(true)
        .build()
        .expect("big decimal pattern is a valid regex")
});

/// Outcome of a normalizing rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Normalized {
    /// Valid, with the rewritten value
    Valid(String),
    /// Invalid; carries the value to store (possibly rewritten)
    Invalid(Option<String>),
}

/// String rule: the value must contain a match of the pattern
pub fn matches_pattern(matcher: &Regex, value: &str) -> bool {
    matcher.is_match(value)
}

/// Integer rule: base-10 signed 32-bit, surrounding whitespace allowed
pub fn is_integer(value: &str) -> bool {
    value.trim().parse::<i32>().is_ok()
}

/// Big decimal rule: drop `,` separators, then require a positive decimal.
///
/// The separator removal is kept even when the value is rejected.
pub fn normalize_big_decimal(value: &str) -> Normalized {
    let stripped = value.replace(',', "");
    if BIG_DECIMAL.is_match(&stripped) {
        Normalized::Valid(stripped)
    } else {
        Normalized::Invalid(Some(stripped))
    }
}

/// Datetime rule: parse and rewrite to the canonical form
pub fn normalize_datetime(value: &str) -> Normalized {
    match datetime::normalize(value) {
        Some(canonical) => Normalized::Valid(canonical),
        None => Normalized::Invalid(None),
    }
}

/// Human-readable description of every data type
pub fn data_types_description() -> String {
    format!(
        r#"Available target data types:

| Type | Rule | Normalization |
|------|------|---------------|
| string | must contain a match of `pattern` (case-insensitive) when set | - |
| integer | base-10 signed 32-bit integer, surrounding spaces allowed | - |
| bigDecimal | positive decimal `^[1-9]\d*(\.\d+)?$` once `,` is removed | `,` removed |
| datetime | ISO, US (month first), month-name or RFC 3339/2822 date/time | rewritten as `{}` |

Example column in JSON:
{{"targetColumn": "amount", "targetDataType": "bigDecimal", "sourceColumns": ["Amount"]}}"#,
        datetime::CANONICAL_FORMAT
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_rule() {
        assert!(is_integer("42"));
        assert!(is_integer("-3"));
        assert!(is_integer("+7"));
        assert!(is_integer(" 12 "));
        assert!(is_integer("2147483647"));
        assert!(is_integer("-2147483648"));

        assert!(!is_integer("4.2"));
        assert!(!is_integer("99999999999"));
        assert!(!is_integer("2147483648"));
        assert!(!is_integer(""));
        assert!(!is_integer("1,000"));
        assert!(!is_integer("abc"));
    }

    #[test]
    fn test_big_decimal_rule() {
        assert_eq!(
            normalize_big_decimal("1,234.50"),
            Normalized::Valid("1234.50".into())
        );
        assert_eq!(normalize_big_decimal("7"), Normalized::Valid("7".into()));
        assert_eq!(
            normalize_big_decimal("1,000,000"),
            Normalized::Valid("1000000".into())
        );
    }

    #[test]
    fn test_big_decimal_rejections_keep_stripping() {
        assert_eq!(normalize_big_decimal("0"), Normalized::Invalid(Some("0".into())));
        assert_eq!(normalize_big_decimal("0.5"), Normalized::Invalid(Some("0.5".into())));
        assert_eq!(normalize_big_decimal("-5"), Normalized::Invalid(Some("-5".into())));
        assert_eq!(normalize_big_decimal("1."), Normalized::Invalid(Some("1.".into())));
        assert_eq!(
            normalize_big_decimal("-1,000"),
            Normalized::Invalid(Some("-1000".into()))
        );
    }

    #[test]
    fn test_pattern_rule_is_substring() {
        let matcher = RegexBuilder::new("[0-9]{3}")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(matches_pattern(&matcher, "abc123def"));
        assert!(!matches_pattern(&matcher, "ab12"));

        let anchored = RegexBuilder::new("^[a-z]+$")
            .case_insensitive(true)
            .build()
            .unwrap();
        assert!(matches_pattern(&anchored, "HELLO"));
        assert!(!matches_pattern(&anchored, "hello world"));
    }

    #[test]
    fn test_datetime_rule() {
        assert_eq!(
            normalize_datetime("2024-01-05"),
            Normalized::Valid("01/05/2024 00:00:00".into())
        );
        assert_eq!(normalize_datetime("not-a-date"), Normalized::Invalid(None));
    }

    #[test]
    fn test_description_lists_all_types() {
        let description = data_types_description();
        for data_type in crate::schema::DataType::ALL {
            assert!(description.contains(data_type.as_str()), "{}", data_type);
        }
    }
}
