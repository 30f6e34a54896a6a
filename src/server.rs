//! HTTP endpoint adapter: query parsing, auth check, pipeline invocation,
//! static file serving for everything else.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use chrono::Utc;
use scraper::Html;
use serde::Deserialize;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Error;
use crate::extract::{self, ExtractionSpec};
use crate::feed;
use crate::fetch;
use crate::rss;

/// Shared read-only state: configuration plus the reused HTTP client.
pub struct AppState {
    pub config: Config,
    pub client: reqwest::Client,
}

/// Query parameters of `GET /html2rss`. Axum percent-decodes all values.
#[derive(Debug, Deserialize)]
pub struct FeedQuery {
    /// Target page URL.
    url: Option<String>,
    /// CSS selector for link elements.
    a: Option<String>,
    /// CSS selector for title elements.
    #[serde(default)]
    t: String,
    /// Character encoding of the target page.
    #[serde(default = "default_charset")]
    charset: String,
    /// "a" = ascending, anything else = descending, for link order.
    #[serde(rename = "as", default = "default_order")]
    link_order: String,
    /// Same, for title order. Independent of `as`.
    #[serde(rename = "ts", default = "default_order")]
    title_order: String,
    /// Attribute read off each link element.
    #[serde(default = "default_attribute")]
    attr: String,
    /// Shared secret.
    code: Option<String>,
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_order() -> String {
    "a".to_string()
}

fn default_attribute() -> String {
    "href".to_string()
}

/// The full application router: the feed endpoint plus webroot static files.
/// Directory paths get `index.html` appended by `ServeDir`.
pub fn router(state: Arc<AppState>) -> Router {
    let webroot = state.config.webroot.clone();
    Router::new()
        .route("/html2rss", get(html2rss))
        .fallback_service(ServeDir::new(webroot))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn html2rss(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Response, Error> {
    // Auth first: a missing or wrong code must never trigger a fetch.
    if query.code.as_deref() != Some(state.config.verification_code.as_str()) {
        return Err(Error::InvalidCode);
    }
    let url = match query.url.as_deref() {
        Some(url) if !url.is_empty() => url,
        _ => return Err(Error::MissingParameter("url")),
    };
    let link_selector = match query.a.as_deref() {
        Some(selector) if !selector.is_empty() => selector,
        _ => return Err(Error::MissingParameter("a")),
    };

    let spec = ExtractionSpec {
        link_selector: link_selector.to_string(),
        title_selector: query.t.clone(),
        attribute: query.attr.clone(),
        link_reversed: query.link_order != "a",
        title_reversed: query.title_order != "a",
    };

    let body = fetch::fetch_page(&state.client, url, &query.charset).await?;
    // `Html` is not Send; everything after the fetch stays synchronous.
    let document = Html::parse_document(&body);
    let (meta, pairs) = extract::extract(&document, url, &spec)?;
    tracing::debug!(url, links = pairs.len(), "extracted link pairs");

    let now = Utc::now();
    let items = feed::synthesize(&meta.description, pairs, now);
    let xml = rss::serialize(&meta, &items, &feed::build_date(now))?;

    Ok((
        [(header::CONTENT_TYPE, "application/xml; charset=utf-8")],
        xml,
    )
        .into_response())
}
