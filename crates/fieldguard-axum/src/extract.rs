//! # Request Extraction
//!
//! Builds the framework-neutral [`RequestData`] from an Axum request. Only
//! the sections the selected [`DataSource`] reads are extracted:
//!
//! - **query**: `application/x-www-form-urlencoded` pairs; every value is
//!   a string. A repeated key keeps its last value. A pair that does not
//!   percent-decode to UTF-8 is rejected.
//! - **params**: the host router's [`RawPathParams`] when it has matched a
//!   route with placeholders. Template captures are overlaid later.
//! - **body**: buffered up to the configured limit and parsed as JSON. An
//!   empty body reads as `{}`. The buffered bytes are put back on the
//!   request so downstream extractors see the body unchanged.

use axum::body::{Body, Bytes};
use axum::extract::{FromRequestParts, RawPathParams, Request};
use fieldguard_core::{DataSource, RequestData};
use http_body_util::LengthLimitError;
use serde_json::{Map, Value};

use crate::error::Rejection;

/// Extract what `source` needs from `request`, returning the request
/// (body restored) alongside the extracted data.
pub async fn request_data(
    request: Request,
    source: DataSource,
    body_limit: usize,
) -> Result<(Request, RequestData), Rejection> {
    let (mut parts, body) = request.into_parts();
    let mut data = RequestData::new(parts.uri.path());

    if matches!(source, DataSource::Query | DataSource::Merged) {
        data.query = query_map(&parts.uri)?;
    }

    if matches!(source, DataSource::Params | DataSource::Merged) {
        // No matched route, or a route without placeholders, means no params.
        if let Ok(raw) = RawPathParams::from_request_parts(&mut parts, &()).await {
            data.params = raw
                .iter()
                .map(|(name, value)| (name.to_string(), Value::String(value.to_string())))
                .collect();
        }
    }

    let body = if source.needs_body() {
        let bytes = buffer_body(body, body_limit).await?;
        data.body = parse_body(&bytes)?;
        Body::from(bytes)
    } else {
        body
    };

    Ok((Request::from_parts(parts, body), data))
}

fn query_map(uri: &axum::http::Uri) -> Result<Map<String, Value>, Rejection> {
    let mut query = Map::new();
    for pair in uri.query().unwrap_or_default().split('&') {
        if pair.is_empty() {
            continue;
        }
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        query.insert(decode_component(key)?, Value::String(decode_component(value)?));
    }
    Ok(query)
}

fn decode_component(raw: &str) -> Result<String, Rejection> {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| Rejection::MalformedQuery(e.to_string()))
}

async fn buffer_body(body: Body, limit: usize) -> Result<Bytes, Rejection> {
    axum::body::to_bytes(body, limit).await.map_err(|err| {
        let inner = err.into_inner();
        if inner.is::<LengthLimitError>() {
            Rejection::BodyTooLarge { limit }
        } else {
            Rejection::UnreadableBody(inner.to_string())
        }
    })
}

fn parse_body(bytes: &[u8]) -> Result<Value, Rejection> {
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Object(Map::new()));
    }
    serde_json::from_slice(bytes).map_err(|e| Rejection::MalformedBody(e.to_string()))
}
