//! # RSS Listing Source
//!
//! Implements `ListingSource` against a classifieds RSS search feed (Kijiji
//! style). Every ad preference and search parameter is passed through as a
//! query-string pair; `feedUrl` in the ad preferences overrides the endpoint.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use quick_xml::de::from_str;
use reqwest::{Client, Url};
use serde::Deserialize;
use std::time::Duration;

use crate::domain::errors::QueryError;
use crate::domain::properties::PropertyGroup;
use crate::domain::traits::ListingSource;
use crate::domain::types::Listing;

pub const DEFAULT_FEED_URL: &str = "https://www.kijiji.ca/rss-srp/l0";
pub const FEED_URL_KEY: &str = "feedUrl";

#[derive(Debug, Deserialize)]
struct Rss {
    channel: Channel,
}

#[derive(Debug, Deserialize)]
struct Channel {
    #[serde(rename = "item", default)]
    items: Vec<Item>,
}

#[derive(Debug, Deserialize)]
struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    #[serde(rename = "dc:date", alias = "date")]
    dc_date: Option<String>,
    #[serde(rename = "pubDate")]
    pub_date: Option<String>,
    #[serde(rename = "g-core:price", alias = "price")]
    price: Option<String>,
}

pub struct RssListingSource {
    client: Client,
}

impl RssListingSource {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self { client })
    }

    async fn fetch(&self, url: Url) -> Result<String> {
        tracing::debug!("Fetching URL: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Failed to fetch feed")?;

        if !response.status().is_success() {
            anyhow::bail!("feed returned status {}", response.status());
        }
        response.text().await.context("Failed to read response body")
    }
}

#[async_trait]
impl ListingSource for RssListingSource {
    async fn query(
        &self,
        preferences: &PropertyGroup,
        parameters: &PropertyGroup,
    ) -> Result<Vec<Listing>, QueryError> {
        let url = query_url(preferences, parameters)?;
        let body = self
            .fetch(url)
            .await
            .map_err(|e| QueryError(format!("{e:#}")))?;
        let listings = parse_feed(&body)?;
        tracing::debug!("Feed returned {} listings", listings.len());
        Ok(listings)
    }

    fn render(&self, listing: &Listing) -> String {
        let mut out = listing.title.clone();
        if let Some(price) = &listing.price {
            out.push_str(&format!(" ({price})"));
        }
        if let Some(link) = &listing.link {
            out.push('\n');
            out.push_str(link);
        }
        out
    }
}

pub fn query_url(preferences: &PropertyGroup, parameters: &PropertyGroup) -> Result<Url, QueryError> {
    let base = preferences
        .get(FEED_URL_KEY)
        .ok()
        .and_then(|v| v.as_str())
        .unwrap_or(DEFAULT_FEED_URL);

    let pairs: Vec<(String, String)> = preferences
        .iter()
        .chain(parameters.iter())
        .filter(|(key, _)| *key != FEED_URL_KEY)
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect();

    Url::parse_with_params(base, &pairs)
        .map_err(|e| QueryError(format!("invalid feed url '{base}': {e}")))
}

pub fn parse_feed(xml: &str) -> Result<Vec<Listing>, QueryError> {
    let xml_clean = scrub_html_entities_for_xml(xml);
    let rss: Rss = from_str(&xml_clean).map_err(|e| QueryError(format!("parsing feed xml: {e}")))?;

    Ok(rss
        .channel
        .items
        .into_iter()
        .map(|item| Listing {
            title: item.title.unwrap_or_default().trim().to_string(),
            link: item.link,
            description: item.description,
            price: item.price,
            published: item
                .dc_date
                .as_deref()
                .or(item.pub_date.as_deref())
                .and_then(parse_date),
        })
        .collect())
}

/// RFC 3339 (`dc:date`) or RFC 2822 (`pubDate`).
fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw)
        .or_else(|_| DateTime::parse_from_rfc2822(raw))
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

fn scrub_html_entities_for_xml(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&ndash;", "-")
        .replace("&mdash;", "-")
        .replace("&rsquo;", "'")
        .replace("&lsquo;", "'")
        .replace("&ldquo;", "\"")
        .replace("&rdquo;", "\"")
}
