//! Console proxy: forwards every request to a fixed upstream and strips the
//! headers that stop its pages from rendering inside an iframe.

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS,
    ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN, SET_COOKIE,
};
use axum::http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::{debug, error, info};

use crate::config::ProxyConfig;
use crate::error::ProxyError;

/// Response headers never passed back to the browser.
pub const STRIPPED_RESPONSE_HEADERS: [&str; 7] = [
    "x-frame-options",
    "content-security-policy",
    "x-content-security-policy",
    "content-encoding",
    "content-length",
    "transfer-encoding",
    "connection",
];

/// Request headers not forwarded upstream.
const SKIPPED_REQUEST_HEADERS: [&str; 4] = ["host", "connection", "content-length", "accept-encoding"];

const ALLOWED_METHODS: &str = "GET, POST, PUT, DELETE, OPTIONS, PATCH";

/// Largest request body forwarded upstream.
const MAX_BODY_BYTES: usize = 32 * 1024 * 1024;

/// Shared state for proxy routes.
#[derive(Clone)]
pub struct ProxyState {
    client: reqwest::Client,
    upstream: String,
    cookie_domain: String,
}

impl ProxyState {
    pub fn new(config: &ProxyConfig) -> Result<Self, ProxyError> {
        let parsed = reqwest::Url::parse(&config.upstream).map_err(|e| {
            ProxyError::InvalidUpstream {
                url: config.upstream.clone(),
                reason: e.to_string(),
            }
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ProxyError::InvalidUpstream {
                url: config.upstream.clone(),
                reason: format!("unsupported scheme {}", parsed.scheme()),
            });
        }

        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            client,
            upstream: config.upstream.trim_end_matches('/').to_string(),
            cookie_domain: config.cookie_domain.clone(),
        })
    }

    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    fn upstream_url(&self, path: &str, query: Option<&str>) -> String {
        match query {
            Some(q) if !q.is_empty() => format!("{}{}?{}", self.upstream, path, q),
            _ => format!("{}{}", self.upstream, path),
        }
    }
}

/// Build the proxy router: `/health` plus a catch-all forwarder.
pub fn proxy_routes(state: ProxyState) -> Router {
    Router::new()
        .route("/health", get(health))
        .fallback(forward)
        .with_state(state)
}

async fn health(State(state): State<ProxyState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "proxy_target": state.upstream,
    }))
}

async fn forward(State(state): State<ProxyState>, request: Request) -> Response {
    if request.method() == Method::OPTIONS {
        let mut response = StatusCode::OK.into_response();
        add_cors_headers(response.headers_mut(), false);
        return response;
    }

    let method = request.method().clone();
    let path = request.uri().path().to_string();

    match forward_upstream(&state, request).await {
        Ok(response) => {
            info!(method = %method, path = %path, status = %response.status(), "Proxied request");
            response
        }
        Err(e) => {
            error!(method = %method, path = %path, error = %e, "Proxy request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Proxy Error: {e}"),
            )
                .into_response()
        }
    }
}

async fn forward_upstream(state: &ProxyState, request: Request) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let url = state.upstream_url(parts.uri.path(), parts.uri.query());
    let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|e| ProxyError::RequestBody(e.to_string()))?;

    let mut headers = HeaderMap::new();
    for (name, value) in &parts.headers {
        if !SKIPPED_REQUEST_HEADERS.contains(&name.as_str()) {
            headers.append(name.clone(), value.clone());
        }
    }

    debug!(url = %url, "Forwarding to upstream");
    let upstream = state
        .client
        .request(parts.method, &url)
        .headers(headers)
        .body(body)
        .send()
        .await?;

    let status = upstream.status();
    let upstream_headers = upstream.headers().clone();
    let bytes = upstream.bytes().await?;

    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    copy_response_headers(&upstream_headers, response.headers_mut(), &state.cookie_domain);
    add_cors_headers(response.headers_mut(), true);
    Ok(response)
}

/// Copy upstream headers, dropping frame-blocking and hop-by-hop headers and
/// rewriting cookies onto the proxy's domain.
fn copy_response_headers(upstream: &HeaderMap, out: &mut HeaderMap, cookie_domain: &str) {
    for (name, value) in upstream {
        if is_stripped(name) {
            continue;
        }
        if name == SET_COOKIE {
            let rewritten = value
                .to_str()
                .ok()
                .and_then(|raw| rewrite_set_cookie(raw, cookie_domain))
                .and_then(|cookie| HeaderValue::from_str(&cookie).ok());
            if let Some(cookie) = rewritten {
                out.append(SET_COOKIE, cookie);
            }
            continue;
        }
        out.append(name.clone(), value.clone());
    }
}

fn is_stripped(name: &HeaderName) -> bool {
    STRIPPED_RESPONSE_HEADERS.contains(&name.as_str())
}

/// Reduce an upstream `Set-Cookie` value to its name and value, scoped to
/// `domain` at path `/`. Upstream attributes are dropped.
pub fn rewrite_set_cookie(raw: &str, domain: &str) -> Option<String> {
    let pair = raw.split(';').next()?.trim();
    let (name, value) = pair.split_once('=')?;
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(format!("{name}={}; Domain={domain}; Path=/", value.trim()))
}

fn add_cors_headers(headers: &mut HeaderMap, allow_credentials: bool) {
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, HeaderValue::from_static("*"));
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(ALLOWED_METHODS),
    );
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, HeaderValue::from_static("*"));
    if allow_credentials {
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
    }
}
