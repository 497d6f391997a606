//! Prometheus label validation and ordered label sets.
//!
//! A label token arrives from the command line as `name="value"`. The name
//! must match `[A-Za-z_][A-Za-z0-9_]*` and the value must be a non-empty
//! literal wrapped in double quotes, per the Prometheus exposition format.
//! Accepted labels keep their first-seen order so repeated runs with the
//! same arguments produce byte-identical output.

use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("'{0}' does not have an '=' sign, so it is not a valid label_name=\"label_value\" pair")]
    MissingSeparator(String),
    #[error("'{0}' is not a valid Prometheus label_name")]
    InvalidName(String),
    #[error("'{0}' is not a valid Prometheus label_value (a non-empty string in double quotes)")]
    InvalidValue(String),
}

/// A validated `name="value"` pair. The value keeps its surrounding double
/// quotes so it can be emitted verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Label {
    name: String,
    quoted_value: String,
}

impl Label {
    /// Validate a raw `name="value"` token.
    pub fn parse(token: &str) -> Result<Self, ValidationError> {
        let (name, value) = token
            .split_once('=')
            .ok_or_else(|| ValidationError::MissingSeparator(token.to_string()))?;

        if !is_valid_name(name) {
            return Err(ValidationError::InvalidName(name.to_string()));
        }
        if !is_quoted_non_empty(value) {
            return Err(ValidationError::InvalidValue(value.to_string()));
        }

        Ok(Self {
            name: name.to_string(),
            quoted_value: value.to_string(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn quoted_value(&self) -> &str {
        &self.quoted_value
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.name, self.quoted_value)
    }
}

// [A-Za-z_][A-Za-z0-9_]*
fn is_valid_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn is_quoted_non_empty(value: &str) -> bool {
    value.len() >= 3 && value.starts_with('"') && value.ends_with('"')
}

/// Append-only, order-preserving collection of validated labels.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LabelSet {
    labels: Vec<Label>,
}

impl LabelSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, label: Label) {
        self.labels.push(label);
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Label> {
        self.labels.iter()
    }
}

impl fmt::Display for LabelSet {
    /// Renders `{a="1", b="2"}`, or nothing at all when the set is empty.
    /// Empty braces are not valid in a metric line.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            return Ok(());
        }
        f.write_str("{")?;
        for (i, label) in self.labels.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", label)?;
        }
        f.write_str("}")
    }
}

impl FromIterator<Label> for LabelSet {
    fn from_iter<I: IntoIterator<Item = Label>>(iter: I) -> Self {
        Self {
            labels: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_tokens() {
        let label = Label::parse(r#"zone="us-east""#).unwrap();
        assert_eq!(label.name(), "zone");
        assert_eq!(label.quoted_value(), r#""us-east""#);
        assert_eq!(label.to_string(), r#"zone="us-east""#);
    }

    #[test]
    fn accepts_underscore_and_digit_names() {
        assert!(Label::parse(r#"_private="x""#).is_ok());
        assert!(Label::parse(r#"rack_42="x""#).is_ok());
    }

    #[test]
    fn rejects_token_without_separator() {
        assert_eq!(
            Label::parse("no_separator"),
            Err(ValidationError::MissingSeparator("no_separator".to_string()))
        );
    }

    #[test]
    fn rejects_bad_names() {
        assert_eq!(
            Label::parse(r#"9lives="x""#),
            Err(ValidationError::InvalidName("9lives".to_string()))
        );
        assert_eq!(
            Label::parse(r#"zo-ne="x""#),
            Err(ValidationError::InvalidName("zo-ne".to_string()))
        );
        assert_eq!(
            Label::parse(r#"="x""#),
            Err(ValidationError::InvalidName(String::new()))
        );
    }

    #[test]
    fn rejects_unquoted_or_empty_values() {
        assert_eq!(
            Label::parse("zone=us-east"),
            Err(ValidationError::InvalidValue("us-east".to_string()))
        );
        assert_eq!(
            Label::parse(r#"zone="""#),
            Err(ValidationError::InvalidValue(r#""""#.to_string()))
        );
        assert_eq!(
            Label::parse("zone="),
            Err(ValidationError::InvalidValue(String::new()))
        );
    }

    #[test]
    fn set_preserves_insertion_order() {
        let set: LabelSet = [r#"zone="us-east""#, r#"host="pi3""#, r#"rack="b2""#]
            .iter()
            .map(|t| Label::parse(t).unwrap())
            .collect();
        assert_eq!(
            set.to_string(),
            r#"{zone="us-east", host="pi3", rack="b2"}"#
        );
    }

    #[test]
    fn empty_set_renders_nothing() {
        assert_eq!(LabelSet::new().to_string(), "");
    }

    #[test]
    fn single_label_has_no_trailing_comma() {
        let mut set = LabelSet::new();
        set.push(Label::parse(r#"zone="eu""#).unwrap());
        assert_eq!(set.to_string(), r#"{zone="eu"}"#);
    }
}
