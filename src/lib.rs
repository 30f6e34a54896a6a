//! Convert arbitrary HTML pages into RSS 2.0 feeds via CSS selectors.
//!
//! The pipeline for a single request is strictly sequential:
//! fetch (charset-aware) → extract (title, link) pairs → synthesize feed
//! items → serialize RSS XML. The HTTP adapter lives in [`server`].

pub mod config;
pub mod error;
pub mod extract;
pub mod feed;
pub mod fetch;
pub mod rss;
pub mod server;
