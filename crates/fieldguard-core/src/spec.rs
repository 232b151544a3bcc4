//! # Declarative Rules
//!
//! [`RuleSpec`] is the data form of a built-in validator or transformer, as
//! written in a route configuration file. A field is declared with either a
//! single rule or a list of rules ([`FieldSpec`]):
//!
//! ```yaml
//! name: [trim, required, string, { length: [2, 40] }]
//! email: [required, email]
//! tags: { each: [string, { max_length: 20 }] }
//! address:
//!   - fields:
//!       city: [required, string]
//! ```
//!
//! Bare names select rules without arguments. A single-key mapping selects a
//! parameterized rule; the value is its argument. Every rule is checked while
//! deserializing, so an unknown name or a malformed argument is reported by
//! the configuration loader, never at request time.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ConfigError;
use crate::schema::{FieldRules, Schema};
use crate::transform::{capitalize_string, trim_string};
use crate::validator::Validator;
use crate::validators::{self, parse_date};

/// One rule as written in configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub enum RuleSpec {
    /// `required`
    Required,
    /// `string`
    String,
    /// `number`
    Number,
    /// `boolean`
    Boolean,
    /// `array`
    Array,
    /// `object`
    Object,
    /// `integer`
    Integer,
    /// `positive`
    Positive,
    /// `negative`
    Negative,
    /// `email`
    Email,
    /// `alpha`
    Alpha,
    /// `alphanumeric`
    Alphanumeric,
    /// `lowercase`
    Lowercase,
    /// `uppercase`
    Uppercase,
    /// `country_code`
    CountryCode,
    /// `mongo_id`
    MongoId,
    /// `date`
    Date,
    /// `future_date`
    FutureDate,
    /// `past_date`
    PastDate,
    /// `trim` (transformer)
    Trim,
    /// `capitalize` (transformer)
    Capitalize,
    /// `{ min_length: n }`
    MinLength(usize),
    /// `{ max_length: n }`
    MaxLength(usize),
    /// `{ length: [min, max] }`
    Length(usize, usize),
    /// `{ min_value: x }`
    MinValue(f64),
    /// `{ max_value: x }`
    MaxValue(f64),
    /// `{ array_min_length: n }`
    ArrayMinLength(usize),
    /// `{ array_max_length: n }`
    ArrayMaxLength(usize),
    /// `{ pattern: "regex" }`, checked to compile.
    Pattern(String),
    /// `{ has_key: name }`
    HasKey(String),
    /// `{ before_date: date }`
    BeforeDate(DateTime<Utc>),
    /// `{ date_range: [start, end] }`
    DateRange(DateTime<Utc>, DateTime<Utc>),
    /// `{ each: rules }`: validators for every array element.
    Each(Vec<RuleSpec>),
    /// `{ fields: { name: rules } }`: validators for a nested object.
    Fields(BTreeMap<String, FieldSpec>),
}

impl RuleSpec {
    /// The configuration name of this rule.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::String => "string",
            Self::Number => "number",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Integer => "integer",
            Self::Positive => "positive",
            Self::Negative => "negative",
            Self::Email => "email",
            Self::Alpha => "alpha",
            Self::Alphanumeric => "alphanumeric",
            Self::Lowercase => "lowercase",
            Self::Uppercase => "uppercase",
            Self::CountryCode => "country_code",
            Self::MongoId => "mongo_id",
            Self::Date => "date",
            Self::FutureDate => "future_date",
            Self::PastDate => "past_date",
            Self::Trim => "trim",
            Self::Capitalize => "capitalize",
            Self::MinLength(_) => "min_length",
            Self::MaxLength(_) => "max_length",
            Self::Length(..) => "length",
            Self::MinValue(_) => "min_value",
            Self::MaxValue(_) => "max_value",
            Self::ArrayMinLength(_) => "array_min_length",
            Self::ArrayMaxLength(_) => "array_max_length",
            Self::Pattern(_) => "pattern",
            Self::HasKey(_) => "has_key",
            Self::BeforeDate(_) => "before_date",
            Self::DateRange(..) => "date_range",
            Self::Each(_) => "each",
            Self::Fields(_) => "fields",
        }
    }

    /// Whether this rule normalizes the value instead of checking it.
    pub fn is_transformer(&self) -> bool {
        matches!(self, Self::Trim | Self::Capitalize)
    }

    /// Build the validator for this rule. Transformers have no validator
    /// form and fail with [`ConfigError::MisplacedRule`] naming `context`.
    pub fn to_validator(&self, context: &str) -> Result<Validator, ConfigError> {
        use validators as v;

        Ok(match self {
            Self::Required => v::is_required(),
            Self::String => v::is_string(),
            Self::Number => v::is_number(),
            Self::Boolean => v::is_boolean(),
            Self::Array => v::is_array(),
            Self::Object => v::is_object(),
            Self::Integer => v::is_integer(),
            Self::Positive => v::is_positive(),
            Self::Negative => v::is_negative(),
            Self::Email => v::is_email(),
            Self::Alpha => v::is_alpha(),
            Self::Alphanumeric => v::is_alphanumeric(),
            Self::Lowercase => v::is_lowercase(),
            Self::Uppercase => v::is_uppercase(),
            Self::CountryCode => v::is_country_code(),
            Self::MongoId => v::is_mongo_id(),
            Self::Date => v::is_date(),
            Self::FutureDate => v::is_future_date(),
            Self::PastDate => v::is_past_date(),
            Self::Trim | Self::Capitalize => {
                return Err(ConfigError::MisplacedRule {
                    rule: self.name().to_string(),
                    context: context.to_string(),
                })
            }
            Self::MinLength(n) => v::min_length(*n),
            Self::MaxLength(n) => v::max_length(*n),
            Self::Length(min, max) => v::is_length(*min, *max),
            Self::MinValue(x) => v::min_value(*x),
            Self::MaxValue(x) => v::max_value(*x),
            Self::ArrayMinLength(n) => v::array_min_length(*n),
            Self::ArrayMaxLength(n) => v::array_max_length(*n),
            Self::Pattern(pattern) => v::matches_pattern(compile_pattern(pattern)?),
            Self::HasKey(key) => v::is_key_in_object(key.clone()),
            Self::BeforeDate(limit) => v::is_before_date(*limit),
            Self::DateRange(start, end) => v::is_date_in_range(*start, *end),
            Self::Each(rules) => v::array_elements(
                rules
                    .iter()
                    .map(|rule| rule.to_validator("each"))
                    .collect::<Result<_, _>>()?,
            ),
            Self::Fields(fields) => v::object_keys(nested_schema(fields)?),
        })
    }
}

impl fmt::Display for RuleSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<Value> for RuleSpec {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(name) => named(&name),
            Value::Object(object) => {
                let mut entries = object.into_iter();
                match (entries.next(), entries.next()) {
                    (Some((name, argument)), None) => parameterized(&name, argument),
                    _ => Err(ConfigError::Parse(
                        "a parameterized rule must be a mapping with exactly one key".into(),
                    )),
                }
            }
            other => Err(ConfigError::Parse(format!(
                "expected a rule name or a single-key mapping, found {other}"
            ))),
        }
    }
}

fn named(name: &str) -> Result<RuleSpec, ConfigError> {
    Ok(match name {
        "required" => RuleSpec::Required,
        "string" => RuleSpec::String,
        "number" => RuleSpec::Number,
        "boolean" => RuleSpec::Boolean,
        "array" => RuleSpec::Array,
        "object" => RuleSpec::Object,
        "integer" => RuleSpec::Integer,
        "positive" => RuleSpec::Positive,
        "negative" => RuleSpec::Negative,
        "email" => RuleSpec::Email,
        "alpha" => RuleSpec::Alpha,
        "alphanumeric" => RuleSpec::Alphanumeric,
        "lowercase" => RuleSpec::Lowercase,
        "uppercase" => RuleSpec::Uppercase,
        "country_code" => RuleSpec::CountryCode,
        "mongo_id" => RuleSpec::MongoId,
        "date" => RuleSpec::Date,
        "future_date" => RuleSpec::FutureDate,
        "past_date" => RuleSpec::PastDate,
        "trim" => RuleSpec::Trim,
        "capitalize" => RuleSpec::Capitalize,
        "min_length" | "max_length" | "length" | "min_value" | "max_value"
        | "array_min_length" | "array_max_length" | "pattern" | "has_key" | "before_date"
        | "date_range" | "each" | "fields" => {
            return Err(invalid(name, "an argument is required"))
        }
        other => return Err(ConfigError::UnknownRule(other.to_string())),
    })
}

fn parameterized(name: &str, argument: Value) -> Result<RuleSpec, ConfigError> {
    Ok(match name {
        "min_length" => RuleSpec::MinLength(count(name, &argument)?),
        "max_length" => RuleSpec::MaxLength(count(name, &argument)?),
        "length" => {
            let (min, max) = pair(name, &argument, |v| count(name, v))?;
            if min > max {
                return Err(invalid(name, "minimum exceeds maximum"));
            }
            RuleSpec::Length(min, max)
        }
        "min_value" => RuleSpec::MinValue(number(name, &argument)?),
        "max_value" => RuleSpec::MaxValue(number(name, &argument)?),
        "array_min_length" => RuleSpec::ArrayMinLength(count(name, &argument)?),
        "array_max_length" => RuleSpec::ArrayMaxLength(count(name, &argument)?),
        "pattern" => {
            let pattern = text(name, &argument)?;
            compile_pattern(&pattern)?;
            RuleSpec::Pattern(pattern)
        }
        "has_key" => RuleSpec::HasKey(text(name, &argument)?),
        "before_date" => RuleSpec::BeforeDate(date(name, &argument)?),
        "date_range" => {
            let (start, end) = pair(name, &argument, |v| date(name, v))?;
            if start > end {
                return Err(invalid(name, "start is after end"));
            }
            RuleSpec::DateRange(start, end)
        }
        "each" => RuleSpec::Each(FieldSpec::try_from(argument)?.into_rules()),
        "fields" => match argument {
            Value::Object(object) => RuleSpec::Fields(
                object
                    .into_iter()
                    .map(|(field, spec)| Ok((field, FieldSpec::try_from(spec)?)))
                    .collect::<Result<_, ConfigError>>()?,
            ),
            _ => return Err(invalid(name, "expected a mapping of field names to rules")),
        },
        other => match named(other) {
            Ok(_) => return Err(invalid(other, "takes no argument")),
            Err(err) => return Err(err),
        },
    })
}

fn invalid(rule: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidArgument {
        rule: rule.to_string(),
        reason: reason.to_string(),
    }
}

fn count(rule: &str, value: &Value) -> Result<usize, ConfigError> {
    value
        .as_u64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| invalid(rule, "expected a non-negative integer"))
}

fn number(rule: &str, value: &Value) -> Result<f64, ConfigError> {
    value.as_f64().ok_or_else(|| invalid(rule, "expected a number"))
}

fn text(rule: &str, value: &Value) -> Result<String, ConfigError> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| invalid(rule, "expected a string"))
}

fn date(rule: &str, value: &Value) -> Result<DateTime<Utc>, ConfigError> {
    value
        .as_str()
        .and_then(parse_date)
        .ok_or_else(|| invalid(rule, "expected an RFC 3339 or YYYY-MM-DD date"))
}

fn pair<T>(
    rule: &str,
    value: &Value,
    item: impl Fn(&Value) -> Result<T, ConfigError>,
) -> Result<(T, T), ConfigError> {
    match value.as_array().map(Vec::as_slice) {
        Some([first, second]) => Ok((item(first)?, item(second)?)),
        _ => Err(invalid(rule, "expected a list of two values")),
    }
}

fn compile_pattern(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|err| invalid("pattern", &err.to_string()))
}

fn nested_schema(fields: &BTreeMap<String, FieldSpec>) -> Result<Schema, ConfigError> {
    fields.iter().try_fold(Schema::new(), |schema, (name, spec)| {
        let validators = spec
            .rules()
            .iter()
            .map(|rule| rule.to_validator("fields"))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(schema.field(name.clone(), validators))
    })
}

// ── Field specs ─────────────────────────────────────────────────────────────

/// The rules of one field: a single rule or an ordered list.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Value")]
pub struct FieldSpec(Vec<RuleSpec>);

impl FieldSpec {
    /// Wrap an ordered list of rules.
    pub fn new(rules: Vec<RuleSpec>) -> Self {
        Self(rules)
    }

    /// The rules in declaration order.
    pub fn rules(&self) -> &[RuleSpec] {
        &self.0
    }

    /// Take the rules.
    pub fn into_rules(self) -> Vec<RuleSpec> {
        self.0
    }

    /// Compile into [`FieldRules`]. Transformers may appear anywhere in the
    /// list; they always run before the validators.
    pub fn compile(&self) -> Result<FieldRules, ConfigError> {
        self.0.iter().try_fold(FieldRules::new(), |rules, spec| {
            Ok(match spec {
                RuleSpec::Trim => rules.transform(trim_string()),
                RuleSpec::Capitalize => rules.transform(capitalize_string()),
                other => rules.rule(other.to_validator("a field")?),
            })
        })
    }
}

impl TryFrom<Value> for FieldSpec {
    type Error = ConfigError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Array(items) => items
                .into_iter()
                .map(RuleSpec::try_from)
                .collect::<Result<_, _>>()
                .map(Self),
            single => Ok(Self(vec![RuleSpec::try_from(single)?])),
        }
    }
}

/// Compile a mapping of field names to rules into a [`Schema`].
pub fn compile_schema<'a, I>(fields: I) -> Result<Schema, ConfigError>
where
    I: IntoIterator<Item = (&'a String, &'a FieldSpec)>,
{
    fields.into_iter().try_fold(Schema::new(), |schema, (name, spec)| {
        Ok(schema.field(name.clone(), spec.compile()?))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Map};

    fn field(yaml: &str) -> FieldSpec {
        serde_yaml::from_str(yaml).unwrap()
    }

    fn field_err(yaml: &str) -> String {
        serde_yaml::from_str::<FieldSpec>(yaml).unwrap_err().to_string()
    }

    fn check(spec: &FieldSpec, value: Value) -> Option<String> {
        let schema = Schema::new().field("f", spec.compile().unwrap());
        let mut data = Map::new();
        data.insert("f".into(), value);
        schema.validate(&data).get("f").map(str::to_string)
    }

    #[test]
    fn parses_names_and_parameters() {
        let spec = field("[trim, required, string, { length: [2, 40] }]");
        assert_eq!(
            spec.rules(),
            &[
                RuleSpec::Trim,
                RuleSpec::Required,
                RuleSpec::String,
                RuleSpec::Length(2, 40)
            ]
        );
    }

    #[test]
    fn single_rule_without_list() {
        assert_eq!(field("email").rules(), &[RuleSpec::Email]);
        assert_eq!(field("{ min_value: 1.5 }").rules(), &[RuleSpec::MinValue(1.5)]);
    }

    #[test]
    fn compiled_rules_produce_builtin_messages() {
        let spec = field("[trim, required, { min_length: 3 }]");
        assert_eq!(check(&spec, json!("  ab  ")).as_deref(), Some("f must be at least 3 characters"));
        assert_eq!(check(&spec, json!("  abc ")), None);
    }

    #[test]
    fn each_and_fields_nest() {
        let tags = field("{ each: [number] }");
        assert_eq!(check(&tags, json!([1, "x"])).as_deref(), Some("f[1] must be a number"));

        let address = field("{ fields: { city: [required, string] } }");
        assert_eq!(check(&address, json!({})).as_deref(), Some("f.city is required"));
    }

    #[test]
    fn dates_are_parsed_at_load() {
        let spec = field("{ date_range: ['2020-01-01', '2020-12-31'] }");
        assert_eq!(check(&spec, json!("2020-06-01")), None);
        assert_eq!(
            check(&spec, json!("2021-06-01")).as_deref(),
            Some("f must be between 2020-01-01T00:00:00.000Z and 2020-12-31T00:00:00.000Z")
        );
        assert!(field_err("{ before_date: tomorrow }").contains("before_date"));
    }

    #[test]
    fn unknown_rule_is_rejected() {
        assert!(field_err("[required, shiny]").contains("unknown rule \"shiny\""));
    }

    #[test]
    fn bad_arguments_are_rejected() {
        assert!(field_err("{ min_length: -1 }").contains("min_length"));
        assert!(field_err("{ length: [5, 2] }").contains("minimum exceeds maximum"));
        assert!(field_err("{ pattern: '([' }").contains("pattern"));
        assert!(field_err("min_length").contains("an argument is required"));
        assert!(field_err("{ email: true }").contains("takes no argument"));
        assert!(field_err("{ a: 1, b: 2 }").contains("exactly one key"));
    }

    #[test]
    fn transformers_inside_composites_are_misplaced() {
        let spec = field("{ each: [trim] }");
        let err = spec.compile().unwrap_err();
        assert!(matches!(err, ConfigError::MisplacedRule { ref rule, ref context }
            if rule == "trim" && context == "each"));
    }

    #[test]
    fn pattern_rule_matches() {
        let spec = field("{ pattern: '^[a-z]+$' }");
        assert_eq!(check(&spec, json!("abc")), None);
        assert_eq!(
            check(&spec, json!("ABC")).as_deref(),
            Some("f does not match the required pattern")
        );
    }

    #[test]
    fn compile_schema_keeps_every_field() {
        let fields: BTreeMap<String, FieldSpec> =
            serde_yaml::from_str("name: required\nage: number\n").unwrap();
        let schema = compile_schema(&fields).unwrap();
        let errors = schema.validate(&Map::new());
        assert_eq!(errors.get("name"), Some("name is required"));
        assert_eq!(errors.get("age"), Some("age must be a number"));
    }
}
