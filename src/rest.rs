//! JSON transport over HTTPS.
//!
//! Each method's HTTP binding (verb, path template, body selector) lives in
//! its descriptor; this module renders the binding against the request's
//! JSON form. Path templates use `{field=pattern}` segments matched against
//! the request field; unbound leaf fields travel as query parameters, the
//! body per the method's selector. Non-2xx responses parse the standard
//! error envelope into the same status set the binary transport produces.

use std::future::Future;
use std::pin::Pin;

use serde_json::Value;

use crate::config::ResolvedConfig;
use crate::descriptor::{BodySelector, HttpRule, HttpVerb, Method};
use crate::errors::{Error, Result, TransportError, TransportErrorKind};
use crate::metadata::{encode_routing_value, CallMetadata};
use crate::status::service_error_from_http;
use crate::transport::{CallContext, Transport};
use crate::types::ApiMessage;

/// REST transport; the cooperative-async half of the JSON pair.
#[derive(Clone)]
pub struct RestTransport {
    http: reqwest::Client,
    base_url: String,
}

impl RestTransport {
    pub(crate) fn from_config(config: &ResolvedConfig) -> Result<Self> {
        let http = match &config.http_client {
            Some(client) => client.clone(),
            None => {
                let mut builder = reqwest::Client::builder();
                if config.use_client_cert {
                    if let Some(source) = config.credentials.certificate_source() {
                        let identity = source.client_identity()?;
                        let mut pem = identity.cert_pem;
                        pem.extend_from_slice(&identity.key_pem);
                        let identity = reqwest::Identity::from_pem(&pem).map_err(|e| {
                            TransportError::new(
                                TransportErrorKind::Tls,
                                "invalid client certificate",
                            )
                            .with_source(e)
                        })?;
                        builder = builder.identity(identity);
                    }
                }
                builder.build().map_err(|e| {
                    TransportError::new(TransportErrorKind::Other, "cannot build HTTP client")
                        .with_source(e)
                })?
            }
        };
        Ok(Self {
            http,
            base_url: config.endpoint.url(),
        })
    }

    async fn dispatch<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> Result<M::Response> {
        let rule = M::http_rule(&request);
        let json = request.to_json()?;
        let plan = RenderedCall::render(&rule, &json)?;

        let verb = match rule.verb {
            HttpVerb::Get => reqwest::Method::GET,
            HttpVerb::Post => reqwest::Method::POST,
            HttpVerb::Patch => reqwest::Method::PATCH,
            HttpVerb::Delete => reqwest::Method::DELETE,
        };
        let url = format!("{}{}", self.base_url, plan.path);
        let mut builder = self.http.request(verb, url);
        if !plan.query.is_empty() {
            builder = builder.query(&plan.query);
        }
        if let Some(body) = plan.body {
            builder = builder.json(&body);
        }
        builder = builder.headers(header_map(&context.metadata)?);
        if let Some(timeout) = context.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(request_error)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(request_error)?;
        if !status.is_success() {
            return Err(service_error_from_http(status.as_u16(), &bytes).into());
        }
        let value = if bytes.is_empty() {
            Value::Object(serde_json::Map::new())
        } else {
            serde_json::from_slice(&bytes)?
        };
        M::Response::from_json(value)
    }
}

impl Transport for RestTransport {
    fn unary<M: Method>(
        &self,
        request: M::Request,
        context: CallContext,
    ) -> Pin<Box<dyn Future<Output = Result<M::Response>> + Send + '_>> {
        Box::pin(self.dispatch::<M>(request, context))
    }

    fn kind(&self) -> &'static str {
        "rest"
    }
}

impl std::fmt::Debug for RestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestTransport")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

pub(crate) fn request_error(e: reqwest::Error) -> Error {
    let kind = if e.is_timeout() {
        TransportErrorKind::Timeout
    } else if e.is_connect() {
        TransportErrorKind::Connect
    } else {
        TransportErrorKind::Request
    };
    TransportError::new(kind, "request failed").with_source(e).into()
}

pub(crate) fn header_map(metadata: &CallMetadata) -> Result<reqwest::header::HeaderMap> {
    let mut map = reqwest::header::HeaderMap::new();
    for entry in metadata {
        let key = reqwest::header::HeaderName::from_bytes(entry.key.as_bytes())
            .map_err(|_| Error::validation("invalid metadata key", &entry.key))?;
        let value = reqwest::header::HeaderValue::from_str(&entry.value)
            .map_err(|_| Error::validation("invalid metadata value", &entry.key))?;
        map.append(key, value);
    }
    Ok(map)
}

/// The three wire-facing pieces of one JSON call.
#[derive(Debug)]
pub(crate) struct RenderedCall {
    pub(crate) path: String,
    pub(crate) query: Vec<(String, String)>,
    pub(crate) body: Option<Value>,
}

impl RenderedCall {
    pub(crate) fn render(rule: &HttpRule, request: &Value) -> Result<Self> {
        let object = request.as_object().ok_or_else(|| {
            Error::from(crate::errors::ValidationError::new(
                "request did not serialize to a JSON object",
            ))
        })?;

        let (path, bound) = render_path(rule.template, request)?;

        let body_field = match rule.body {
            BodySelector::Field(name) => Some(snake_to_camel(name)),
            _ => None,
        };
        let body = match rule.body {
            BodySelector::None => None,
            BodySelector::Wildcard => {
                let mut trimmed = object.clone();
                for field in &bound {
                    trimmed.remove(field);
                }
                Some(Value::Object(trimmed))
            }
            BodySelector::Field(_) => {
                let name = body_field.as_deref().unwrap_or_default();
                Some(
                    object
                        .get(name)
                        .cloned()
                        .unwrap_or_else(|| Value::Object(serde_json::Map::new())),
                )
            }
        };

        let mut query = Vec::new();
        if !matches!(rule.body, BodySelector::Wildcard) {
            for (key, value) in object {
                if bound.contains(key) || body_field.as_deref() == Some(key.as_str()) {
                    continue;
                }
                push_query(&mut query, key, value);
            }
        }

        Ok(Self { path, query, body })
    }
}

/// Substitutes `{field=pattern}` template segments from the request,
/// returning the rendered path and the top-level fields it consumed.
fn render_path(template: &str, request: &Value) -> Result<(String, Vec<String>)> {
    let mut path = String::with_capacity(template.len());
    let mut bound = Vec::new();
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        path.push_str(&rest[..open]);
        let close = rest[open..]
            .find('}')
            .map(|i| open + i)
            .ok_or_else(|| Error::config(format!("unterminated template segment in {template:?}")))?;
        let group = &rest[open + 1..close];
        let (field, pattern) = match group.split_once('=') {
            Some((field, pattern)) => (field, pattern),
            None => (group, "*"),
        };

        let value = lookup_field(request, field)
            .ok_or_else(|| Error::validation("missing required path parameter", field))?;
        if !pattern_matches(pattern, value) {
            return Err(Error::validation(
                format!("value {value:?} does not match `{pattern}`"),
                field,
            ));
        }
        path.push_str(&encode_routing_value(value));

        if !field.contains('.') {
            bound.push(snake_to_camel(field));
        }
        rest = &rest[close + 1..];
    }
    path.push_str(rest);
    Ok((path, bound))
}

/// Resolves a possibly-dotted proto field reference against the request's
/// JSON form. Returns `None` for absent or empty values.
fn lookup_field<'a>(request: &'a Value, field: &str) -> Option<&'a str> {
    let mut current = request;
    for segment in field.split('.') {
        current = current.get(snake_to_camel(segment))?;
    }
    match current.as_str() {
        Some("") | None => None,
        Some(s) => Some(s),
    }
}

/// Matches a resource name against a path pattern: `*` is one segment,
/// `**` the whole remainder, anything else literal.
pub(crate) fn pattern_matches(pattern: &str, value: &str) -> bool {
    let mut value_segments = value.split('/');
    let mut pattern_segments = pattern.split('/').peekable();
    while let Some(expected) = pattern_segments.next() {
        if expected == "**" && pattern_segments.peek().is_none() {
            return value_segments.next().is_some_and(|s| !s.is_empty());
        }
        match value_segments.next() {
            Some(actual) if !actual.is_empty() => {
                if expected != "*" && expected != "**" && expected != actual {
                    return false;
                }
            }
            _ => return false,
        }
    }
    value_segments.next().is_none()
}

/// Leaf fields become query parameters; proto3 defaults (empty strings,
/// zeros, `false`) are left off the wire, message-typed fields never
/// transcode to queries.
fn push_query(query: &mut Vec<(String, String)>, key: &str, value: &Value) {
    match value {
        Value::String(s) if !s.is_empty() => query.push((key.to_string(), s.clone())),
        Value::Number(n) => {
            if n.as_i64() != Some(0) && n.as_u64() != Some(0) && n.as_f64() != Some(0.0) {
                query.push((key.to_string(), n.to_string()));
            }
        }
        Value::Bool(true) => query.push((key.to_string(), "true".to_string())),
        Value::Array(items) => {
            for item in items {
                push_query(query, key, item);
            }
        }
        _ => {}
    }
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
