//! Built-in rules.
//!
//! All built-ins treat an absent value as the empty string.

use regex::Regex;

use crate::registry::{ParamKind, Rule, RuleInput};
use crate::SchemaError;

/// Rule name for presence checks.
pub const REQUIRED: &str = "required";
/// Rule name for email address checks.
pub const EMAIL: &str = "email";
/// Rule name for enumerated values.
pub const ONE_OF: &str = "oneof";
/// Rule name for conditional presence.
pub const REQUIRED_WITH: &str = "required_with";
/// Rule name reported for failed type conversions. Cannot be registered.
pub const TYPE: &str = "type";

/// Names of every built-in rule.
pub const BUILTIN_RULES: [&str; 4] = [REQUIRED, EMAIL, ONE_OF, REQUIRED_WITH];

const EMAIL_PATTERN: &str =
    r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9-]+(\.[A-Za-z0-9-]+)+$";

pub(crate) fn all() -> Result<Vec<Rule>, SchemaError> {
    let email = Regex::new(EMAIL_PATTERN).map_err(|e| SchemaError::InvalidPattern {
        name: EMAIL.to_string(),
        message: e.to_string(),
    })?;

    Ok(vec![
        Rule::new(REQUIRED, ParamKind::Optional, required),
        Rule::new(EMAIL, ParamKind::Optional, move |input: &RuleInput<'_>| {
            email.is_match(input.value.as_str())
        })
        .with_detail(|_| "must be a valid email address".to_string()),
        Rule::new(ONE_OF, ParamKind::Required, one_of)
            .with_detail(|param| format!("must be one of [{param}]")),
        Rule::new(REQUIRED_WITH, ParamKind::FieldRef, required_with)
            .with_detail(|param| format!("required when '{param}' is present")),
    ])
}

fn required(input: &RuleInput<'_>) -> bool {
    !input.value.is_empty()
}

fn one_of(input: &RuleInput<'_>) -> bool {
    let value = input.value.as_str();
    !value.is_empty()
        && input
            .param
            .unwrap_or_default()
            .split_whitespace()
            .any(|allowed| allowed == value)
}

fn required_with(input: &RuleInput<'_>) -> bool {
    if !input.value.is_empty() {
        return true;
    }
    input
        .param
        .map_or(true, |other| input.fields.get(other).is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RawValues;
    use agora_extract::RawValue;
    use proptest::prelude::*;

    fn check(rule: &str, value: RawValue, param: Option<&str>, fields: &RawValues) -> bool {
        let rules = all().unwrap();
        let rule = rules.iter().find(|r| r.name() == rule).unwrap();
        rule.evaluate(&RuleInput {
            value: &value,
            param,
            fields,
        })
    }

    fn present(s: &str) -> RawValue {
        RawValue::present(s)
    }

    #[test]
    fn test_required() {
        let none = RawValues::new();
        assert!(!check(REQUIRED, RawValue::Absent, None, &none));
        assert!(!check(REQUIRED, present(""), None, &none));
        assert!(check(REQUIRED, present(" "), None, &none));
        assert!(check(REQUIRED, present("0"), None, &none));
    }

    #[test]
    fn test_email() {
        let none = RawValues::new();
        assert!(check(EMAIL, present("a@b.com"), None, &none));
        assert!(check(EMAIL, present("first.last+tag@mail.example.org"), None, &none));
        assert!(!check(EMAIL, present("a@b"), None, &none));
        assert!(!check(EMAIL, present("a@b..com"), None, &none));
        assert!(!check(EMAIL, present("@b.com"), None, &none));
        assert!(!check(EMAIL, present("a b@c.com"), None, &none));
        assert!(!check(EMAIL, present(""), None, &none));
        assert!(!check(EMAIL, RawValue::Absent, None, &none));
    }

    #[test]
    fn test_one_of() {
        let none = RawValues::new();
        let roles = Some("Basic Admin");
        assert!(check(ONE_OF, present("Admin"), roles, &none));
        assert!(check(ONE_OF, present("Basic"), roles, &none));
        assert!(!check(ONE_OF, present("basic"), roles, &none));
        assert!(!check(ONE_OF, present(""), roles, &none));
        assert!(!check(ONE_OF, RawValue::Absent, roles, &none));
        assert!(!check(ONE_OF, present("Basic Admin"), roles, &none));
    }

    #[test]
    fn test_required_with_truth_table() {
        let param = Some("street_address");
        let b_absent = RawValues::new();
        let b_empty: RawValues = [("street_address", present(""))].into_iter().collect();
        let b_present: RawValues = [("street_address", present("Main St"))].into_iter().collect();

        assert!(check(REQUIRED_WITH, RawValue::Absent, param, &b_absent));
        assert!(check(REQUIRED_WITH, RawValue::Absent, param, &b_empty));
        assert!(!check(REQUIRED_WITH, RawValue::Absent, param, &b_present));
        assert!(!check(REQUIRED_WITH, present(""), param, &b_present));
        assert!(check(REQUIRED_WITH, present("12"), param, &b_present));
        assert!(check(REQUIRED_WITH, present("0"), param, &b_present));
        assert!(check(REQUIRED_WITH, present("12"), param, &b_absent));
    }

    proptest! {
        #[test]
        fn prop_required_matches_non_empty(s in ".*") {
            let none = RawValues::new();
            prop_assert_eq!(check(REQUIRED, present(&s), None, &none), !s.is_empty());
        }

        #[test]
        fn prop_one_of_accepts_every_listed_word(
            words in prop::collection::vec("[A-Za-z]{1,8}", 1..5),
            pick in any::<prop::sample::Index>(),
        ) {
            let none = RawValues::new();
            let list = words.join(" ");
            let chosen = pick.get(&words).clone();
            prop_assert!(check(ONE_OF, present(&chosen), Some(&list), &none));
        }

        #[test]
        fn prop_present_value_always_satisfies_required_with(
            a in ".+",
            b in proptest::option::of(".*"),
        ) {
            let fields: RawValues = [("b", RawValue::from(b))].into_iter().collect();
            prop_assert!(check(REQUIRED_WITH, present(&a), Some("b"), &fields));
        }
    }
}
