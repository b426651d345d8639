//! Rule declarations.
//!
//! Rules are declared as a comma-separated list of `name` or `name=param`
//! items, e.g. `"required,oneof=Basic Admin"`.

use std::fmt;

use crate::SchemaError;

/// One declared rule with its optional parameter.
///
/// # Example
///
/// ```rust
/// use agora_validate::RuleSpec;
///
/// let rules = RuleSpec::parse_list("required,oneof=Basic Admin").unwrap();
/// assert_eq!(rules[0], RuleSpec::new("required"));
/// assert_eq!(rules[1].name(), "oneof");
/// assert_eq!(rules[1].param(), Some("Basic Admin"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleSpec {
    name: String,
    param: Option<String>,
}

impl RuleSpec {
    /// Declares a rule without a parameter.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: None,
        }
    }

    /// Declares a rule with a parameter.
    #[must_use]
    pub fn with_param(name: impl Into<String>, param: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            param: Some(param.into()),
        }
    }

    /// Parses a single `name` or `name=param` item.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidRuleSyntax`] for an empty name.
    pub fn parse(item: &str) -> Result<Self, SchemaError> {
        let (name, param) = match item.split_once('=') {
            Some((name, param)) => (name.trim(), Some(param.trim())),
            None => (item.trim(), None),
        };
        if name.is_empty() {
            return Err(SchemaError::InvalidRuleSyntax {
                input: item.to_string(),
                reason: "empty rule name".to_string(),
            });
        }
        Ok(Self {
            name: name.to_string(),
            param: param.filter(|p| !p.is_empty()).map(String::from),
        })
    }

    /// Parses a comma-separated rule list. An empty list declares no rules.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidRuleSyntax`] if any item has an empty
    /// name, including a stray comma.
    pub fn parse_list(list: &str) -> Result<Vec<Self>, SchemaError> {
        if list.trim().is_empty() {
            return Ok(Vec::new());
        }
        list.split(',')
            .map(|item| {
                Self::parse(item).map_err(|_| SchemaError::InvalidRuleSyntax {
                    input: list.to_string(),
                    reason: "empty rule name".to_string(),
                })
            })
            .collect()
    }

    /// Returns the rule name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the parameter, if one was declared.
    #[must_use]
    pub fn param(&self) -> Option<&str> {
        self.param.as_deref()
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.param {
            Some(param) => write!(f, "{}={}", self.name, param),
            None => f.write_str(&self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_list() {
        let rules = RuleSpec::parse_list("required,password").unwrap();
        assert_eq!(rules, vec![RuleSpec::new("required"), RuleSpec::new("password")]);
    }

    #[test]
    fn test_param_keeps_inner_spaces() {
        let rule = RuleSpec::parse("oneof=Basic Admin").unwrap();
        assert_eq!(rule, RuleSpec::with_param("oneof", "Basic Admin"));
        assert_eq!(rule.to_string(), "oneof=Basic Admin");
    }

    #[test]
    fn test_empty_param_is_none() {
        let rule = RuleSpec::parse("required_with=").unwrap();
        assert_eq!(rule.param(), None);
    }

    #[test]
    fn test_empty_list() {
        assert!(RuleSpec::parse_list("").unwrap().is_empty());
        assert!(RuleSpec::parse_list("  ").unwrap().is_empty());
    }

    #[test]
    fn test_stray_comma_rejected() {
        let err = RuleSpec::parse_list("required,,email").unwrap_err();
        assert!(matches!(err, SchemaError::InvalidRuleSyntax { .. }));
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(RuleSpec::parse("=Basic").is_err());
    }
}
