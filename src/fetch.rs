//! Charset-aware page fetching.

use encoding_rs::Encoding;
use thiserror::Error;

/// Errors from fetching and decoding the target page.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, timeout).
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// Upstream responded with a non-2xx status.
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// The `charset` parameter does not name a known encoding.
    #[error("unknown charset: {0}")]
    UnknownCharset(String),
}

/// Fetch `url` and decode the body with the named encoding.
///
/// An empty charset or any casing of "utf-8" takes the UTF-8 path directly;
/// every other value must be a label `encoding_rs` knows, checked before the
/// request goes out. Decoding is lossy — undecodable bytes become U+FFFD
/// rather than failing the whole page.
pub async fn fetch_page(
    client: &reqwest::Client,
    url: &str,
    charset: &str,
) -> Result<String, FetchError> {
    let encoding = if charset.is_empty() || charset.eq_ignore_ascii_case("utf-8") {
        encoding_rs::UTF_8
    } else {
        Encoding::for_label(charset.as_bytes())
            .ok_or_else(|| FetchError::UnknownCharset(charset.to_string()))?
    };

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FetchError::HttpStatus(response.status().as_u16()));
    }

    let bytes = response.bytes().await?;
    let (text, _, _) = encoding.decode(&bytes);
    Ok(text.into_owned())
}
