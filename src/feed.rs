//! Turning extracted link pairs into RSS feed items.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use url::form_urlencoded;

use crate::extract::LinkPair;

const MAGNET_SCHEME: &str = "magnet:";

/// One fully shaped RSS item. Built once per extracted pair, immutable after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedItem {
    pub title: String,
    pub link: String,
    /// SHA-256 of the link, lowercase hex. Stable across runs for the same link.
    pub guid: String,
    /// RFC-822 formatted synthetic publish time.
    pub pub_date: String,
    pub description: String,
    pub magnet: bool,
    /// The magnet link truncated at the first `&`, rendered as an enclosure.
    pub enclosure: Option<String>,
}

/// Shape extracted pairs into feed items, in order.
///
/// Titles are trimmed; a title that is itself a raw magnet URI, or an empty
/// title on a magnet link, is replaced by the link's `dn` parameter when one
/// exists. The `now` instant only contributes the calendar date — publish
/// times are a synthetic increasing counter so readers keep the page's order.
pub fn synthesize(
    channel_description: &str,
    pairs: Vec<LinkPair>,
    now: DateTime<Utc>,
) -> Vec<FeedItem> {
    pairs
        .into_iter()
        .enumerate()
        .map(|(index, pair)| {
            let magnet = pair.href.starts_with(MAGNET_SCHEME);
            let mut title = pair.title.trim().to_string();
            if title.starts_with(MAGNET_SCHEME) {
                if let Some(dn) = magnet_display_name(&title) {
                    title = dn;
                }
            }
            if magnet && title.chars().count() < 2 {
                if let Some(dn) = magnet_display_name(&pair.href) {
                    title = dn;
                }
            }
            let description = if title.is_empty() {
                channel_description.to_string()
            } else {
                title.clone()
            };
            let enclosure = magnet.then(|| {
                let cut = pair.href.find('&').unwrap_or(pair.href.len());
                pair.href[..cut].to_string()
            });
            FeedItem {
                guid: link_guid(&pair.href),
                pub_date: synthetic_pub_date(now, index),
                link: pair.href,
                title,
                description,
                magnet,
                enclosure,
            }
        })
        .collect()
}

/// The channel's lastBuildDate: the actual current time, RFC-822.
pub fn build_date(now: DateTime<Utc>) -> String {
    now.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

fn link_guid(link: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(link.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Synthetic publish time for the item at `index`, on today's date.
///
/// The minute counter runs 1..=59 and rolls into the hour counter, resetting
/// to 1 rather than 0 — inherited behavior, kept for compatibility with feeds
/// already generated this way.
fn synthetic_pub_date(now: DateTime<Utc>, index: usize) -> String {
    let hour = 1 + index / 59;
    let minute = 1 + index % 59;
    format!(
        "{} {:02}:{:02}:00 GMT",
        now.format("%a, %d %b %Y"),
        hour,
        minute
    )
}

/// Percent-decoded `dn` (display name) parameter of a magnet URI.
fn magnet_display_name(link: &str) -> Option<String> {
    let query = link.strip_prefix(MAGNET_SCHEME)?.strip_prefix('?')?;
    form_urlencoded::parse(query.as_bytes())
        .find(|(name, _)| name == "dn")
        .map(|(_, value)| value.into_owned())
}
