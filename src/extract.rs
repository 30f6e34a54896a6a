//! Selector-based extraction of (title, link) pairs and channel metadata.

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use url::Url;

static TITLE_SELECTOR: Lazy<Selector> = Lazy::new(|| Selector::parse("title").unwrap());
static META_DESCRIPTION_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());

/// Link values carrying one of these schemes are used verbatim; anything else
/// is resolved against the page URL.
const ABSOLUTE_SCHEMES: [&str; 4] = ["magnet:", "http:", "https:", "ftp:"];

/// How to pick link and title elements out of the document.
#[derive(Debug, Clone)]
pub struct ExtractionSpec {
    /// CSS selector for link elements. Required; invalid or non-matching is a
    /// hard failure.
    pub link_selector: String,
    /// Optional CSS selector for title elements; empty means "use link text".
    pub title_selector: String,
    /// Attribute read off each link element, normally `href`.
    pub attribute: String,
    pub link_reversed: bool,
    pub title_reversed: bool,
}

/// One extracted candidate: title text plus the resolved link value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkPair {
    pub title: String,
    pub href: String,
}

/// Channel-level metadata pulled from the document head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelMeta {
    /// The document's `<title>` text, empty if none.
    pub title: String,
    /// The source page URL.
    pub link: String,
    /// `meta[name=description]`'s content attribute, empty if none.
    pub description: String,
}

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid link selector {selector:?}: {message}")]
    InvalidLinkSelector { selector: String, message: String },
    #[error("no links matched selector {0:?}")]
    NoLinks(String),
}

/// Match the selectors against `document` and pair links with titles by index.
///
/// Titles come from the title selector only when it matched exactly as many
/// elements as the link selector did; any mismatch (including no selector or
/// an invalid one) silently substitutes the link elements themselves. The two
/// reversal flags reindex the link and title sequences independently.
/// Elements whose link attribute is absent or empty contribute nothing.
pub fn extract(
    document: &Html,
    url: &str,
    spec: &ExtractionSpec,
) -> Result<(ChannelMeta, Vec<LinkPair>), ExtractError> {
    let link_selector =
        Selector::parse(&spec.link_selector).map_err(|e| ExtractError::InvalidLinkSelector {
            selector: spec.link_selector.clone(),
            message: e.to_string(),
        })?;
    let links: Vec<ElementRef> = document.select(&link_selector).collect();
    if links.is_empty() {
        return Err(ExtractError::NoLinks(spec.link_selector.clone()));
    }

    let titles = match title_elements(document, &spec.title_selector) {
        Some(titles) if titles.len() == links.len() => titles,
        // Count mismatch is not an error: each link element titles itself.
        _ => links.clone(),
    };

    let base = Url::parse(url).ok();
    let n = links.len();
    let mut pairs = Vec::with_capacity(n);
    for i in 0..n {
        let link = links[if spec.link_reversed { n - 1 - i } else { i }];
        let title = titles[if spec.title_reversed { n - 1 - i } else { i }];
        let Some(value) = link.value().attr(&spec.attribute) else {
            continue;
        };
        if value.is_empty() {
            continue;
        }
        let mut text = element_text(title);
        if text.is_empty() {
            text = element_text(link);
        }
        pairs.push(LinkPair {
            title: text,
            href: resolve_link(base.as_ref(), value),
        });
    }

    Ok((channel_meta(document, url), pairs))
}

fn title_elements<'a>(document: &'a Html, selector: &str) -> Option<Vec<ElementRef<'a>>> {
    if selector.is_empty() {
        return None;
    }
    match Selector::parse(selector) {
        Ok(sel) => Some(document.select(&sel).collect()),
        Err(e) => {
            tracing::warn!(selector, error = %e, "invalid title selector, falling back to link text");
            None
        }
    }
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect()
}

fn resolve_link(base: Option<&Url>, value: &str) -> String {
    if ABSOLUTE_SCHEMES
        .iter()
        .any(|scheme| value.starts_with(scheme))
    {
        return value.to_string();
    }
    match base.and_then(|b| b.join(value).ok()) {
        Some(resolved) => resolved.into(),
        None => value.to_string(),
    }
}

fn channel_meta(document: &Html, url: &str) -> ChannelMeta {
    let title = document
        .select(&TITLE_SELECTOR)
        .next()
        .map(element_text)
        .unwrap_or_default();
    let description = document
        .select(&META_DESCRIPTION_SELECTOR)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .unwrap_or_default()
        .to_string();
    ChannelMeta {
        title,
        link: url.to_string(),
        description,
    }
}
