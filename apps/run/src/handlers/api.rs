use crate::dispatch::HandlerDescriptor;
use crate::models::{Context, Outcome};
use anyhow::{Context as _, Result};
use folio_domain::config::MAX_TIMEOUT_SECONDS;
use folio_flags::{FlagError, FlagKind, FlagMap, FlagSpec, one_of_choices};
use reqwest::Method;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use std::time::Duration;

pub const NAME: &str = "api";
pub const DOCS: &str = include_str!("../../docs/api.md");

const METHODS: &[&str] = &["GET", "POST", "PUT", "PATCH", "DELETE"];

#[must_use]
pub fn descriptor() -> HandlerDescriptor {
    HandlerDescriptor::new(NAME, DOCS, validate_flags, run)
}

fn spec() -> FlagSpec {
    FlagSpec::new()
        .flag("path", FlagKind::Text)
        .flag("method", FlagKind::Text)
        .flag("body", FlagKind::Text)
        .flag("headers", FlagKind::List)
        .flag("timeout", FlagKind::Text)
        .required("path")
        .with_default("method", "GET")
}

/// Checks api flags. The method is upper-cased; headers must read `Name: value`.
///
/// # Errors
/// Any [`FlagError`] describing the first problem found.
pub fn validate_flags(flags: FlagMap) -> folio_flags::Result<FlagMap> {
    let mut flags = spec().validate(flags)?;
    if let Some(method) = flags.text("method").map(str::to_ascii_uppercase) {
        flags.insert("method", method);
    }
    one_of_choices(&flags, "method", METHODS)?;

    for header in flags.list("headers").unwrap_or_default() {
        parse_header(header)?;
    }
    if flags.contains("timeout") {
        parse_timeout(&flags)?;
    }
    Ok(flags)
}

fn parse_header(raw: &str) -> folio_flags::Result<(&str, &str)> {
    raw.split_once(':')
        .map(|(name, value)| (name.trim(), value.trim()))
        .filter(|(name, _)| !name.is_empty() && !name.contains(char::is_whitespace))
        .ok_or_else(|| FlagError::InvalidValue {
            flag: "headers".to_owned(),
            value: raw.to_owned(),
            reason: "expected 'Name: value'".into(),
        })
}

fn parse_timeout(flags: &FlagMap) -> folio_flags::Result<Option<u64>> {
    let Some(raw) = flags.text("timeout") else { return Ok(None) };
    raw.parse::<u64>()
        .ok()
        .filter(|secs| (1..=MAX_TIMEOUT_SECONDS).contains(secs))
        .map(Some)
        .ok_or_else(|| FlagError::InvalidValue {
            flag: "timeout".to_owned(),
            value: raw.to_owned(),
            reason: format!("expected seconds from 1 to {MAX_TIMEOUT_SECONDS}").into(),
        })
}

fn request_timeout(flags: &FlagMap, ctx: &Context<'_>) -> folio_flags::Result<Duration> {
    let secs = parse_timeout(flags)?.unwrap_or_else(|| ctx.config.api.timeout_seconds());
    Ok(Duration::from_secs(secs))
}

/// Joins the configured base URL and a request path. Absolute URLs pass through.
#[must_use]
pub fn build_url(base_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_owned();
    }
    let base = base_url.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    format!("{base}/{path}")
}

/// Sends one request to the local API Gateway and prints the response.
///
/// # Errors
/// Returns an error if the client cannot be built or the request cannot be sent.
pub fn run(flags: &FlagMap, ctx: &Context<'_>) -> Result<Outcome> {
    let client = Client::builder()
        .user_agent(concat!("folio-run/", env!("CARGO_PKG_VERSION")))
        .timeout(request_timeout(flags, ctx)?)
        .no_proxy()
        .build()
        .context("Failed to create HTTP client")?;

    let method_name = flags.text("method").unwrap_or("GET");
    let method = Method::from_bytes(method_name.as_bytes()).context("Invalid HTTP method")?;
    let url = build_url(&ctx.config.api.base_url, flags.text("path").unwrap_or("/"));

    let mut request = client.request(method, &url);
    for header in flags.list("headers").unwrap_or_default() {
        let (name, value) = parse_header(header)?;
        request = request.header(name, value);
    }
    if let Some(body) = flags.text("body") {
        if serde_json::from_str::<serde_json::Value>(body).is_ok() {
            request = request.header(CONTENT_TYPE, "application/json");
        }
        request = request.body(body.to_owned());
    }

    println!("➡️ {method_name} {url}");
    let response = request.send().with_context(|| format!("Request to {url} failed"))?;
    let status = response.status();
    let text = response.text().context("Failed to read response body")?;

    let icon = if status.is_success() { "✅" } else { "❌" };
    println!("{icon} {status}");
    if !text.is_empty() {
        println!("{}", pretty_body(&text));
    }

    Ok(if status.is_success() { Outcome::Success } else { Outcome::ISSUES_FOUND })
}

fn pretty_body(text: &str) -> String {
    serde_json::from_str::<serde_json::Value>(text)
        .and_then(|value| serde_json::to_string_pretty(&value))
        .unwrap_or_else(|_| text.to_owned())
}
