//! Attribute text to typed value coercion.

use crate::error::CoercionError;
use crate::schema::{AttributeRule, RuleKind};
use crate::value::PropValue;

/// Coerces raw attribute text (absent as `None`) according to `rule`.
///
/// `this` is the owning instance; it is only handed to converters. `name` is
/// used for diagnostics.
///
/// # Errors
///
/// Only structured rules fail, when the text is not a valid literal.
pub fn coerce<C>(
    rule: &AttributeRule<C>,
    this: &C,
    name: &str,
    raw: Option<&str>,
) -> Result<PropValue, CoercionError> {
    let value = match rule.kind() {
        // Absent text is read as the literal `null`.
        RuleKind::Object | RuleKind::Array => {
            let text = raw.unwrap_or("null");
            let parsed: serde_json::Value =
                serde_json::from_str(text).map_err(|source| CoercionError::MalformedStructured {
                    attribute: name.to_string(),
                    source,
                })?;
            PropValue::from(parsed)
        }
        RuleKind::Number => raw.map_or(PropValue::Null, |text| PropValue::Number(parse_float(text))),
        RuleKind::Boolean => raw.map_or(PropValue::Null, |text| PropValue::Bool(text == "true")),
        RuleKind::String => PropValue::from(raw.map(str::to_string)),
        RuleKind::Converter(converter) => converter.call(this, raw),
        RuleKind::Unknown(tag) => {
            tracing::warn!(
                attribute = name,
                tag = tag.as_str(),
                "unrecognized attribute type, using value as text"
            );
            PropValue::from(raw.map(str::to_string))
        }
    };
    Ok(value)
}

/// Parses the longest leading decimal number in `text`, after leading
/// whitespace. Returns NaN when there is none.
///
/// `"42px"` is 42, `" -1.5e3x"` is -1500, `"Infinity"` is infinite.
pub fn parse_float(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    if text[end..].starts_with("Infinity") {
        let infinity = f64::INFINITY;
        return if text.starts_with('-') { -infinity } else { infinity };
    }

    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut mantissa_digits = end - digits_start;
    if end < bytes.len() && bytes[end] == b'.' {
        let fraction_start = end + 1;
        let mut fraction_end = fraction_start;
        while fraction_end < bytes.len() && bytes[fraction_end].is_ascii_digit() {
            fraction_end += 1;
        }
        mantissa_digits += fraction_end - fraction_start;
        if mantissa_digits > 0 {
            end = fraction_end;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // An exponent only counts when at least one digit follows it.
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

    text[..end].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{normalize, Descriptor, SchemaEntry, TypeTag};

    struct Host {
        separator: char,
    }

    const HOST: Host = Host { separator: ':' };

    fn rule(tag: TypeTag) -> AttributeRule<Host> {
        normalize(SchemaEntry::Type(tag))
    }

    #[test]
    fn number_zero_is_not_null() {
        let value = coerce(&rule(TypeTag::Number), &HOST, "n", Some("0")).unwrap();
        assert_eq!(value, PropValue::Number(0.0));
    }

    #[test]
    fn number_absent_is_null() {
        let value = coerce(&rule(TypeTag::Number), &HOST, "n", None).unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn number_malformed_is_nan() {
        let value = coerce(&rule(TypeTag::Number), &HOST, "n", Some("abc")).unwrap();
        assert!(value.as_number().is_some_and(f64::is_nan));
    }

    #[test]
    fn only_exact_true_is_true() {
        let boolean = rule(TypeTag::Boolean);
        for (text, expected) in [("true", true), ("false", false), ("TRUE", false), ("1", false), ("", false)] {
            let value = coerce(&boolean, &HOST, "b", Some(text)).unwrap();
            assert_eq!(value, PropValue::Bool(expected), "text {text:?}");
        }
        assert!(coerce(&boolean, &HOST, "b", None).unwrap().is_null());
    }

    #[test]
    fn string_is_identity() {
        let string = rule(TypeTag::String);
        assert_eq!(coerce(&string, &HOST, "s", Some(" x ")).unwrap(), PropValue::from(" x "));
        assert!(coerce(&string, &HOST, "s", None).unwrap().is_null());
    }

    #[test]
    fn unknown_tag_passes_text_through() {
        let unknown = rule(TypeTag::from_name("Date"));
        assert_eq!(coerce(&unknown, &HOST, "d", Some("2024")).unwrap(), PropValue::from("2024"));
    }

    #[test]
    fn structured_parses_literal() {
        let object = rule(TypeTag::Object);
        let value = coerce(&object, &HOST, "o", Some(r#"{"a":[1,2]}"#)).unwrap();
        assert_eq!(value.as_structured(), Some(&serde_json::json!({"a": [1, 2]})));
        assert!(coerce(&rule(TypeTag::Array), &HOST, "o", None).unwrap().is_null());
    }

    #[test]
    fn structured_malformed_is_an_error() {
        let err = coerce(&rule(TypeTag::Array), &HOST, "items", Some("[1,")).unwrap_err();
        assert!(matches!(err, CoercionError::MalformedStructured { ref attribute, .. } if attribute == "items"));
    }

    #[test]
    fn converter_sees_instance_and_raw_text() {
        let rule = normalize(SchemaEntry::Descriptor(
            Descriptor::new()
                .ty(TypeTag::Number)
                .converter(|host: &Host, raw| match raw {
                    Some(text) => PropValue::list(
                        text.split(host.separator).map(PropValue::from),
                    ),
                    None => PropValue::empty_list(),
                }),
        ));
        let value = coerce(&rule, &HOST, "parts", Some("1:2")).unwrap();
        assert_eq!(value, PropValue::list([PropValue::from("1"), PropValue::from("2")]));
        let empty = coerce(&rule, &HOST, "parts", None).unwrap();
        assert_eq!(empty.as_list().map(<[PropValue]>::len), Some(0));
    }

    #[test]
    fn parse_float_prefixes() {
        assert_eq!(parse_float("42"), 42.0);
        assert_eq!(parse_float("42px"), 42.0);
        assert_eq!(parse_float("  -1.5e3x"), -1500.0);
        assert_eq!(parse_float(".5"), 0.5);
        assert_eq!(parse_float("5."), 5.0);
        assert_eq!(parse_float("1e"), 1.0);
        assert_eq!(parse_float("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float("").is_nan());
        assert!(parse_float(".").is_nan());
        assert!(parse_float("-").is_nan());
        assert!(parse_float("px42").is_nan());
    }
}
