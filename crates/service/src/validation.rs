//! Field rule sets in the `"required|string|max:255"` notation.
//!
//! A [`RuleSet`] maps field names to pipe-separated rules and turns a raw JSON
//! body into a [`Validated`] map whose keys are always a subset of the rule
//! keys. Failures carry per-field messages ([`ValidationErrors`]).
//!
//! Input is normalized before the rules run: strings are trimmed and blank
//! strings count as `null`.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

/// A single constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Required,
    /// Only validate the field when the key is present.
    Sometimes,
    Nullable,
    String,
    Integer,
    Boolean,
    Email,
    Date,
    Min(u64),
    Max(u64),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RuleError {
    #[error("unknown rule `{rule}` for field `{field}`")]
    Unknown { field: String, rule: String },
    #[error("rule `{rule}` for field `{field}` needs a numeric parameter")]
    InvalidParameter { field: String, rule: String },
}

impl Rule {
    fn parse(field: &str, raw: &str) -> Result<Self, RuleError> {
        let (name, param) = match raw.split_once(':') {
            Some((n, p)) => (n.trim(), Some(p.trim())),
            None => (raw.trim(), None),
        };
        let numeric = |param: Option<&str>| {
            param
                .and_then(|p| p.parse::<u64>().ok())
                .ok_or_else(|| RuleError::InvalidParameter { field: field.to_string(), rule: name.to_string() })
        };
        Ok(match name {
            "required" => Rule::Required,
            "sometimes" => Rule::Sometimes,
            "nullable" => Rule::Nullable,
            "string" => Rule::String,
            "integer" => Rule::Integer,
            "boolean" => Rule::Boolean,
            "email" => Rule::Email,
            "date" => Rule::Date,
            "min" => Rule::Min(numeric(param)?),
            "max" => Rule::Max(numeric(param)?),
            other => return Err(RuleError::Unknown { field: field.to_string(), rule: other.to_string() }),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct FieldRules {
    field: String,
    rules: Vec<Rule>,
}

impl FieldRules {
    fn has(&self, rule: Rule) -> bool {
        self.rules.contains(&rule)
    }
}

/// Ordered field → rules mapping.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    fields: Vec<FieldRules>,
}

impl RuleSet {
    /// Parse `(field, "rule|rule:param")` pairs.
    pub fn parse<'a, I>(spec: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut fields = Vec::new();
        for (field, rules) in spec {
            let rules = rules
                .split('|')
                .filter(|r| !r.trim().is_empty())
                .map(|r| Rule::parse(field, r))
                .collect::<Result<Vec<_>, _>>()?;
            fields.push(FieldRules { field: field.to_string(), rules });
        }
        Ok(Self { fields })
    }

    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|f| f.field.as_str())
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f.field == field)
    }

    /// Same rules, but every field is only checked when sent. Used for partial updates.
    pub fn as_optional(&self) -> Self {
        let fields = self
            .fields
            .iter()
            .map(|f| {
                let mut rules = f.rules.clone();
                if !rules.contains(&Rule::Sometimes) {
                    rules.insert(0, Rule::Sometimes);
                }
                FieldRules { field: f.field.clone(), rules }
            })
            .collect();
        Self { fields }
    }

    /// Validate a JSON body. Anything other than an object is treated as an empty body.
    pub fn validate(&self, input: &Value) -> Result<Validated, ValidationErrors> {
        let empty = Map::new();
        let body = input.as_object().unwrap_or(&empty);
        let mut validated = Map::new();
        let mut errors = ValidationErrors::default();

        for spec in &self.fields {
            let raw = body.get(&spec.field);
            if raw.is_none() && spec.has(Rule::Sometimes) {
                continue;
            }
            let value = raw.map(normalize);
            match value {
                None | Some(Value::Null) if spec.has(Rule::Required) => {
                    errors.add(&spec.field, format!("The {} field is required.", attribute(&spec.field)));
                    continue;
                }
                None => continue,
                Some(Value::Null) if spec.has(Rule::Nullable) => {
                    validated.insert(spec.field.clone(), Value::Null);
                    continue;
                }
                _ => {}
            }
            let value = value.unwrap_or(Value::Null);

            let before = errors.len();
            for rule in &spec.rules {
                if let Some(message) = check(spec, *rule, &value) {
                    errors.add(&spec.field, message);
                }
            }
            if errors.len() == before {
                validated.insert(spec.field.clone(), value);
            }
        }

        if errors.is_empty() {
            Ok(Validated(validated))
        } else {
            Err(errors)
        }
    }
}

fn normalize(value: &Value) -> Value {
    match value {
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Value::Null
            } else {
                Value::String(trimmed.to_string())
            }
        }
        other => other.clone(),
    }
}

fn attribute(field: &str) -> String {
    field.replace('_', " ")
}

fn check(spec: &FieldRules, rule: Rule, value: &Value) -> Option<String> {
    let name = attribute(&spec.field);
    match rule {
        Rule::Required | Rule::Sometimes | Rule::Nullable => None,
        Rule::String => (!value.is_string()).then(|| format!("The {name} field must be a string.")),
        Rule::Integer => (!is_integer(value)).then(|| format!("The {name} field must be an integer.")),
        Rule::Boolean => (!is_boolean(value)).then(|| format!("The {name} field must be true or false.")),
        Rule::Email => (!value.as_str().map(is_email).unwrap_or(false))
            .then(|| format!("The {name} field must be a valid email address.")),
        Rule::Date => (!value.as_str().map(is_date).unwrap_or(false))
            .then(|| format!("The {name} field must be a valid date.")),
        Rule::Min(min) => match size(spec, value) {
            Some(Size::Chars(n)) if n < min => Some(format!("The {name} field must be at least {min} characters.")),
            Some(Size::Number(n)) if n < min as f64 => Some(format!("The {name} field must be at least {min}.")),
            _ => None,
        },
        Rule::Max(max) => match size(spec, value) {
            Some(Size::Chars(n)) if n > max => {
                Some(format!("The {name} field must not be greater than {max} characters."))
            }
            Some(Size::Number(n)) if n > max as f64 => Some(format!("The {name} field must not be greater than {max}.")),
            _ => None,
        },
    }
}

enum Size {
    Chars(u64),
    Number(f64),
}

fn size(spec: &FieldRules, value: &Value) -> Option<Size> {
    match value {
        Value::String(s) if spec.has(Rule::Integer) => s.parse::<f64>().ok().map(Size::Number),
        Value::String(s) => Some(Size::Chars(s.chars().count() as u64)),
        Value::Number(n) => n.as_f64().map(Size::Number),
        _ => None,
    }
}

fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.is_i64() || n.is_u64(),
        Value::String(s) => s.parse::<i64>().is_ok(),
        _ => false,
    }
}

fn is_boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_i64(), Some(0) | Some(1)),
        Value::String(s) => matches!(s.as_str(), "0" | "1"),
        _ => false,
    }
}

fn is_email(s: &str) -> bool {
    if s.chars().any(char::is_whitespace) {
        return false;
    }
    match s.rsplit_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}

fn is_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
        || DateTime::parse_from_rfc3339(s).is_ok()
}

/// Fields that passed their rules, keyed exactly like the rule set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validated(Map<String, Value>);

impl Validated {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.0.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Decode into a typed struct (create fields or a patch).
    pub fn deserialize<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(Value::Object(self.0.clone()))
    }
}

/// Per-field messages in rule-set order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    fields: Vec<(String, Vec<String>)>,
}

impl ValidationErrors {
    /// Errors for a single field, for checks that live outside the rule set (e.g. uniqueness).
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message.into());
        errors
    }

    pub fn add(&mut self, field: &str, message: String) {
        match self.fields.iter_mut().find(|(f, _)| f == field) {
            Some((_, messages)) => messages.push(message),
            None => self.fields.push((field.to_string(), vec![message])),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Total number of messages.
    pub fn len(&self) -> usize {
        self.fields.iter().map(|(_, m)| m.len()).sum()
    }

    pub fn field(&self, field: &str) -> Option<&[String]> {
        self.fields.iter().find(|(f, _)| f == field).map(|(_, m)| m.as_slice())
    }

    pub fn first_message(&self) -> Option<&str> {
        self.fields.first().and_then(|(_, m)| m.first()).map(String::as_str)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let first = self.first_message().unwrap_or("The given data was invalid.");
        match self.len().saturating_sub(1) {
            0 => write!(f, "{first}"),
            1 => write!(f, "{first} (and 1 more error)"),
            n => write!(f, "{first} (and {n} more errors)"),
        }
    }
}

impl Serialize for ValidationErrors {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (field, messages) in &self.fields {
            map.serialize_entry(field, messages)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn note_rules() -> RuleSet {
        RuleSet::parse([("title", "required|string|max:255"), ("content", "required|string")]).unwrap()
    }

    #[test]
    fn parse_rejects_unknown_rule() {
        let err = RuleSet::parse([("title", "required|shiny")]).unwrap_err();
        assert_eq!(err, RuleError::Unknown { field: "title".into(), rule: "shiny".into() });
    }

    #[test]
    fn parse_rejects_missing_parameter() {
        assert!(matches!(
            RuleSet::parse([("title", "max")]),
            Err(RuleError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn validated_keys_are_subset_of_rules() {
        let validated = note_rules()
            .validate(&json!({"title": "A", "content": "B", "owner": 99}))
            .unwrap();
        let keys: Vec<_> = validated.keys().collect();
        assert_eq!(keys, vec!["content", "title"]);
        assert_eq!(validated.get("title"), Some(&json!("A")));
    }

    #[test]
    fn required_fields_report_in_rule_order() {
        let errors = note_rules().validate(&json!({})).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors.first_message(), Some("The title field is required."));
        assert_eq!(errors.to_string(), "The title field is required. (and 1 more error)");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let errors = note_rules().validate(&json!({"title": "   ", "content": "x"})).unwrap_err();
        assert_eq!(errors.field("title").unwrap(), ["The title field is required."]);
    }

    #[test]
    fn max_counts_characters_not_bytes() {
        let rules = RuleSet::parse([("title", "string|max:3")]).unwrap();
        assert!(rules.validate(&json!({"title": "ñññ"})).is_ok());
        let errors = rules.validate(&json!({"title": "abcd"})).unwrap_err();
        assert_eq!(errors.to_string(), "The title field must not be greater than 3 characters.");
    }

    #[test]
    fn type_rules_reject_wrong_json_types() {
        let errors = note_rules().validate(&json!({"title": 5, "content": ["x"]})).unwrap_err();
        assert_eq!(errors.field("title").unwrap(), ["The title field must be a string."]);
        assert_eq!(errors.field("content").unwrap(), ["The content field must be a string."]);
    }

    #[test]
    fn optional_rules_skip_absent_fields() {
        let rules = note_rules().as_optional();
        let validated = rules.validate(&json!({"content": "only content"})).unwrap();
        assert_eq!(validated.len(), 1);
        assert!(validated.get("title").is_none());
        assert!(rules.validate(&json!({})).unwrap().is_empty());
        // present but blank is still required
        assert!(rules.validate(&json!({"title": ""})).is_err());
    }

    #[test]
    fn user_style_rules() {
        let rules = RuleSet::parse([
            ("email", "required|email"),
            ("password", "required|string|min:6"),
            ("birthday", "required|date"),
        ])
        .unwrap();
        let errors = rules
            .validate(&json!({"email": "nope", "password": "123", "birthday": "31-12-1999"}))
            .unwrap_err();
        assert_eq!(errors.field("email").unwrap(), ["The email field must be a valid email address."]);
        assert_eq!(errors.field("password").unwrap(), ["The password field must be at least 6 characters."]);
        assert_eq!(errors.field("birthday").unwrap(), ["The birthday field must be a valid date."]);

        let ok = rules
            .validate(&json!({"email": " a@b.co ", "password": "secret", "birthday": "1999-12-31"}))
            .unwrap();
        assert_eq!(ok.get("email"), Some(&json!("a@b.co")));
    }

    #[test]
    fn nullable_keeps_explicit_null() {
        let rules = RuleSet::parse([("nickname", "nullable|string")]).unwrap();
        let validated = rules.validate(&json!({"nickname": null})).unwrap();
        assert_eq!(validated.get("nickname"), Some(&Value::Null));
    }

    #[test]
    fn integer_bounds_are_numeric() {
        let rules = RuleSet::parse([("priority", "integer|min:1|max:5")]).unwrap();
        assert!(rules.validate(&json!({"priority": 3})).is_ok());
        let errors = rules.validate(&json!({"priority": 9})).unwrap_err();
        assert_eq!(errors.to_string(), "The priority field must not be greater than 5.");
    }

    #[test]
    fn errors_serialize_as_field_map() {
        let errors = ValidationErrors::single("email", "The email has already been taken.");
        assert_eq!(
            serde_json::to_value(&errors).unwrap(),
            json!({"email": ["The email has already been taken."]})
        );
    }
}
