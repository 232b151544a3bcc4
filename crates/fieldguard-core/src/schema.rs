//! # Schemas
//!
//! A [`Schema`] is an ordered list of fields, each with its [`FieldRules`].
//! Evaluating a schema against one lookup object (a request body, a query
//! string, path parameters, or a merge of these) produces an [`Evaluation`]:
//! the normalized data and a [`ValidationErrors`] map holding at most one
//! message per field.
//!
//! ## Algorithm
//!
//! For each declared field, in declaration order:
//!
//! 1. apply the field's transformers to its value, if present;
//! 2. run its validators in order, stopping at the first message;
//! 3. record that message as the field's error.
//!
//! A failing field never stops other fields from being checked: errors
//! accumulate across fields and short-circuit only within one field.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::async_validator::AsyncValidator;
use crate::transform::Transformer;
use crate::validator::{first_failure, Validator};

// ── Field rules ─────────────────────────────────────────────────────────────

/// Everything declared for one field: transformers, validators, and
/// asynchronous validators, each kept in declaration order.
#[derive(Clone, Default)]
pub struct FieldRules {
    transformers: Vec<Transformer>,
    validators: Vec<Validator>,
    async_validators: Vec<Arc<dyn AsyncValidator>>,
}

impl FieldRules {
    /// Empty rules: the field is accepted as is.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a transformer.
    pub fn transform(mut self, transformer: Transformer) -> Self {
        self.transformers.push(transformer);
        self
    }

    /// Append a validator.
    pub fn rule(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }

    /// Append an asynchronous validator.
    pub fn rule_async<A>(mut self, validator: A) -> Self
    where
        A: AsyncValidator + 'static,
    {
        self.async_validators.push(Arc::new(validator));
        self
    }

    /// The declared transformers.
    pub fn transformers(&self) -> &[Transformer] {
        &self.transformers
    }

    /// The declared validators.
    pub fn validators(&self) -> &[Validator] {
        &self.validators
    }

    /// Number of declared asynchronous validators.
    pub fn async_len(&self) -> usize {
        self.async_validators.len()
    }

    /// Whether nothing at all is declared.
    pub fn is_empty(&self) -> bool {
        self.transformers.is_empty()
            && self.validators.is_empty()
            && self.async_validators.is_empty()
    }

    fn normalize(&self, value: Value) -> Value {
        self.transformers
            .iter()
            .fold(value, |value, transformer| transformer.apply(value))
    }

    async fn first_async_failure(&self, value: Option<&Value>, key: &str) -> Option<String> {
        for validator in &self.async_validators {
            if let Some(message) = validator.check(value, key).await {
                return Some(message);
            }
        }
        None
    }
}

impl fmt::Debug for FieldRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldRules")
            .field("transformers", &self.transformers)
            .field("validators", &self.validators.len())
            .field("async_validators", &self.async_validators.len())
            .finish()
    }
}

impl From<Validator> for FieldRules {
    fn from(validator: Validator) -> Self {
        Self::new().rule(validator)
    }
}

impl From<Vec<Validator>> for FieldRules {
    fn from(validators: Vec<Validator>) -> Self {
        Self {
            validators,
            ..Self::default()
        }
    }
}

impl<const N: usize> From<[Validator; N]> for FieldRules {
    fn from(validators: [Validator; N]) -> Self {
        Self::from(Vec::from(validators))
    }
}

// ── Validation errors ───────────────────────────────────────────────────────

/// Field name to error message. Empty means the data is valid.
///
/// Serializes as a plain JSON object: `{"age": "age must be a number"}`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, String>);

impl ValidationErrors {
    /// An empty error map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` for `field` unless the field already has one.
    /// Returns whether the message was recorded.
    pub fn insert(&mut self, field: impl Into<String>, message: impl Into<String>) -> bool {
        match self.0.entry(field.into()) {
            std::collections::btree_map::Entry::Occupied(_) => false,
            std::collections::btree_map::Entry::Vacant(slot) => {
                slot.insert(message.into());
                true
            }
        }
    }

    /// The message recorded for `field`.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has an error.
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Number of failing fields.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no field failed.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate `(field, message)` pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// The underlying map.
    pub fn into_map(self) -> BTreeMap<String, String> {
        self.0
    }
}

impl IntoIterator for ValidationErrors {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, String)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        let mut errors = Self::new();
        for (field, message) in iter {
            errors.insert(field, message);
        }
        errors
    }
}

// ── Evaluation ──────────────────────────────────────────────────────────────

/// Result of evaluating a schema against one lookup object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Evaluation {
    /// The lookup object after transformers ran.
    pub data: Map<String, Value>,
    /// One message per failing field.
    pub errors: ValidationErrors,
}

impl Evaluation {
    /// Whether every field passed.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }
}

// ── Schema ──────────────────────────────────────────────────────────────────

/// Ordered mapping from field name to its rules.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    fields: Vec<(String, FieldRules)>,
}

impl Schema {
    /// An empty schema. Every lookup object passes it.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `name` with `rules`. Declaring a field again replaces its rules
    /// but keeps its original position.
    pub fn field(mut self, name: impl Into<String>, rules: impl Into<FieldRules>) -> Self {
        let name = name.into();
        let rules = rules.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = rules,
            None => self.fields.push((name, rules)),
        }
        self
    }

    /// Rules declared for `name`.
    pub fn get(&self, name: &str) -> Option<&FieldRules> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, rules)| rules)
    }

    /// Declared field names in declaration order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Number of declared fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether no field is declared.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any field declares an asynchronous validator.
    pub fn has_async(&self) -> bool {
        self.fields.iter().any(|(_, rules)| rules.async_len() > 0)
    }

    /// Run transformers and synchronous validators.
    pub fn evaluate(&self, data: &Map<String, Value>) -> Evaluation {
        let mut normalized = data.clone();
        let mut errors = ValidationErrors::new();

        for (name, rules) in &self.fields {
            if !rules.transformers.is_empty() {
                if let Some(value) = normalized.remove(name) {
                    normalized.insert(name.clone(), rules.normalize(value));
                }
            }
            if let Some(message) = first_failure(&rules.validators, normalized.get(name), name) {
                errors.insert(name.as_str(), message);
            }
        }

        Evaluation {
            data: normalized,
            errors,
        }
    }

    /// Run the synchronous pass, then the asynchronous validators of every
    /// field that passed it.
    pub async fn evaluate_async(&self, data: &Map<String, Value>) -> Evaluation {
        let mut evaluation = self.evaluate(data);

        let pending: Vec<_> = self
            .fields
            .iter()
            .filter(|(name, rules)| rules.async_len() > 0 && !evaluation.errors.contains(name))
            .map(|(name, rules)| {
                let value = evaluation.data.get(name).cloned();
                async move {
                    let message = rules.first_async_failure(value.as_ref(), name).await;
                    (name, message)
                }
            })
            .collect();

        for (name, message) in join_all(pending).await {
            if let Some(message) = message {
                evaluation.errors.insert(name.as_str(), message);
            }
        }

        evaluation
    }

    /// Shorthand for `evaluate(data).errors`.
    pub fn validate(&self, data: &Map<String, Value>) -> ValidationErrors {
        self.evaluate(data).errors
    }

    /// First synchronous failure over a nested object, with field names
    /// reported as `{prefix}.{field}`. Transformers and async validators
    /// do not apply to nested objects.
    pub(crate) fn first_nested_failure(
        &self,
        object: &Map<String, Value>,
        prefix: &str,
    ) -> Option<String> {
        self.fields.iter().find_map(|(name, rules)| {
            first_failure(&rules.validators, object.get(name), &format!("{prefix}.{name}"))
        })
    }
}
