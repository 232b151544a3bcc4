//! # Request Validator
//!
//! [`RequestValidator`] is the compiled form of a validation setup. It is
//! built once, cloned cheaply into every request, and never mutated.
//!
//! ## Modes
//!
//! - **Fixed target**: one [`Schema`] evaluated against one [`DataSource`]
//!   for every request ([`RequestValidator::new`],
//!   [`RequestValidator::with_options`], [`RequestValidator::for_target`]).
//! - **Route-aware**: a list of route templates, each with its own schema
//!   and source ([`RequestValidator::routes`]). Templates are tried in
//!   declaration order and the first match is evaluated. A request that
//!   matches no template is not validated at all.
//!
//! Both modes produce an [`Outcome`]. Path parameters captured by a route
//! template are overlaid on the parameters the host framework supplied.

use std::borrow::Cow;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ConfigError;
use crate::schema::{Evaluation, Schema, ValidationErrors};
use crate::source::{DataSource, RequestData};
use crate::template::PathTemplate;

/// Default maximum body size buffered for validation (2 MiB).
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

// ── Options ─────────────────────────────────────────────────────────────────

/// Options for fixed-target mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ValidationOptions {
    /// The section validated. Defaults to the body.
    pub source: DataSource,
}

impl ValidationOptions {
    /// Options selecting the source named `target`.
    pub fn target(target: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            source: target.parse()?,
        })
    }
}

// ── Outcome ─────────────────────────────────────────────────────────────────

/// What the validator decided for one request.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    /// No route template matched; the request is not validated.
    Unmatched,
    /// Every field passed.
    Valid {
        /// The matched template, `None` in fixed-target mode.
        route: Option<String>,
        /// The validated lookup object after transformers ran.
        data: Map<String, Value>,
    },
    /// At least one field failed.
    Invalid {
        /// The matched template, `None` in fixed-target mode.
        route: Option<String>,
        /// One message per failing field.
        errors: ValidationErrors,
    },
}

impl Outcome {
    fn from_evaluation(route: Option<&PathTemplate>, evaluation: Evaluation) -> Self {
        let route = route.map(|t| t.as_str().to_string());
        if evaluation.is_valid() {
            Self::Valid {
                route,
                data: evaluation.data,
            }
        } else {
            Self::Invalid {
                route,
                errors: evaluation.errors,
            }
        }
    }

    /// The field errors, if the request was rejected.
    pub fn errors(&self) -> Option<&ValidationErrors> {
        match self {
            Self::Invalid { errors, .. } => Some(errors),
            _ => None,
        }
    }

    /// Whether the request may continue to the next handler.
    pub fn should_continue(&self) -> bool {
        !matches!(self, Self::Invalid { .. })
    }
}

// ── Selection ───────────────────────────────────────────────────────────────

/// The schema chosen for one request path, before any data is read.
#[derive(Debug, Clone)]
pub struct Selection<'a> {
    route: Option<&'a PathTemplate>,
    source: DataSource,
    schema: &'a Schema,
    params: Map<String, Value>,
}

impl<'a> Selection<'a> {
    /// The matched template, `None` in fixed-target mode.
    pub fn route(&self) -> Option<&'a str> {
        self.route.map(PathTemplate::as_str)
    }

    /// The section to validate.
    pub fn source(&self) -> DataSource {
        self.source
    }

    /// The schema to evaluate.
    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    /// Parameters captured from the path by the route template.
    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    /// The lookup object for `request`, with captured parameters overlaid.
    pub fn target(&self, request: &RequestData) -> Map<String, Value> {
        let request = if self.params.is_empty() {
            Cow::Borrowed(request)
        } else {
            let mut owned = request.clone();
            owned.params.extend(self.params.clone());
            Cow::Owned(owned)
        };
        request.target(self.source)
    }

    /// Run transformers and synchronous validators.
    pub fn evaluate(&self, request: &RequestData) -> Outcome {
        let evaluation = self.schema.evaluate(&self.target(request));
        Outcome::from_evaluation(self.route, evaluation)
    }

    /// Run transformers, synchronous and asynchronous validators.
    pub async fn evaluate_async(&self, request: &RequestData) -> Outcome {
        let evaluation = self.schema.evaluate_async(&self.target(request)).await;
        Outcome::from_evaluation(self.route, evaluation)
    }
}

// ── Validator ───────────────────────────────────────────────────────────────

#[derive(Debug)]
struct Route {
    template: PathTemplate,
    source: DataSource,
    schema: Schema,
}

#[derive(Debug)]
enum Mode {
    Fixed { source: DataSource, schema: Schema },
    Routes(Vec<Route>),
}

/// One declared schema, as listed by [`RequestValidator::entries`].
#[derive(Debug, Clone, Copy)]
pub struct Entry<'a> {
    /// The route template, `None` in fixed-target mode.
    pub template: Option<&'a PathTemplate>,
    /// The section validated.
    pub source: DataSource,
    /// The schema.
    pub schema: &'a Schema,
}

/// Compiled, shareable request validator.
#[derive(Debug, Clone)]
pub struct RequestValidator {
    mode: Arc<Mode>,
    body_limit: usize,
}

impl RequestValidator {
    /// Validate the body of every request against `schema`.
    pub fn new(schema: Schema) -> Self {
        Self::with_options(schema, ValidationOptions::default())
    }

    /// Validate the section chosen in `options` of every request.
    pub fn with_options(schema: Schema, options: ValidationOptions) -> Self {
        Self {
            mode: Arc::new(Mode::Fixed {
                source: options.source,
                schema,
            }),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    /// Validate the section named `target` of every request.
    ///
    /// An unknown name fails here, not when the first request arrives.
    pub fn for_target(schema: Schema, target: &str) -> Result<Self, ConfigError> {
        Ok(Self::with_options(schema, ValidationOptions::target(target)?))
    }

    /// Start a route-aware validator.
    pub fn routes() -> RoutesBuilder {
        RoutesBuilder::default()
    }

    /// Change the maximum body size buffered for validation.
    pub fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Maximum body size, in bytes, that adapters should buffer.
    pub fn body_limit(&self) -> usize {
        self.body_limit
    }

    /// List every declared schema with its template and source.
    pub fn entries(&self) -> Vec<Entry<'_>> {
        match self.mode.as_ref() {
            Mode::Fixed { source, schema } => vec![Entry {
                template: None,
                source: *source,
                schema,
            }],
            Mode::Routes(routes) => routes
                .iter()
                .map(|route| Entry {
                    template: Some(&route.template),
                    source: route.source,
                    schema: &route.schema,
                })
                .collect(),
        }
    }

    /// Choose the schema for `path`. `None` means no template matched.
    pub fn select(&self, path: &str) -> Option<Selection<'_>> {
        match self.mode.as_ref() {
            Mode::Fixed { source, schema } => Some(Selection {
                route: None,
                source: *source,
                schema,
                params: Map::new(),
            }),
            Mode::Routes(routes) => routes.iter().find_map(|route| {
                route.template.matches(path).map(|params| Selection {
                    route: Some(&route.template),
                    source: route.source,
                    schema: &route.schema,
                    params,
                })
            }),
        }
    }

    /// Validate `request` with synchronous validators only.
    pub fn validate(&self, request: &RequestData) -> Outcome {
        match self.select(&request.path) {
            Some(selection) => selection.evaluate(request),
            None => Outcome::Unmatched,
        }
    }

    /// Validate `request`, awaiting asynchronous validators.
    pub async fn validate_async(&self, request: &RequestData) -> Outcome {
        match self.select(&request.path) {
            Some(selection) => selection.evaluate_async(request).await,
            None => Outcome::Unmatched,
        }
    }
}

// ── Builder ─────────────────────────────────────────────────────────────────

/// Collects route declarations for a route-aware [`RequestValidator`].
#[derive(Debug, Default)]
pub struct RoutesBuilder {
    routes: Vec<(String, DataSource, Schema)>,
    body_limit: Option<usize>,
}

impl RoutesBuilder {
    /// Validate the body of requests matching `template`.
    pub fn route(self, template: impl Into<String>, schema: Schema) -> Self {
        self.route_with(template, DataSource::Body, schema)
    }

    /// Validate the `source` section of requests matching `template`.
    pub fn route_with(
        mut self,
        template: impl Into<String>,
        source: DataSource,
        schema: Schema,
    ) -> Self {
        self.routes.push((template.into(), source, schema));
        self
    }

    /// Change the maximum body size buffered for validation.
    pub fn body_limit(mut self, limit: usize) -> Self {
        self.body_limit = Some(limit);
        self
    }

    /// Compile every template.
    ///
    /// Fails on a malformed template, or on a template that can never match
    /// because an earlier one has the same shape (`/a/:x` after `/a/{y}`).
    pub fn build(self) -> Result<RequestValidator, ConfigError> {
        let mut routes: Vec<Route> = Vec::with_capacity(self.routes.len());
        for (raw, source, schema) in self.routes {
            let template = PathTemplate::parse(&raw)?;
            if routes.iter().any(|r| same_shape(&r.template, &template)) {
                return Err(ConfigError::DuplicateRoute(raw));
            }
            routes.push(Route {
                template,
                source,
                schema,
            });
        }

        tracing::debug!(routes = routes.len(), "compiled route validator");

        Ok(RequestValidator {
            mode: Arc::new(Mode::Routes(routes)),
            body_limit: self.body_limit.unwrap_or(DEFAULT_BODY_LIMIT),
        })
    }
}

/// Two templates have the same shape when they match exactly the same paths.
fn same_shape(a: &PathTemplate, b: &PathTemplate) -> bool {
    let probe = |t: &PathTemplate| {
        t.as_str()
            .trim_end_matches('/')
            .split('/')
            .map(|s| {
                if s.starts_with(':') || (s.starts_with('{') && s.ends_with('}')) {
                    None
                } else {
                    Some(s.to_string())
                }
            })
            .collect::<Vec<_>>()
    };
    probe(a) == probe(b)
}
