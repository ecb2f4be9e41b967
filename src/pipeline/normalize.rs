use std::fmt;
use std::sync::Arc;

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::extract::{
    extract_price, extract_start_time, is_sold_out, locate, resolve_category, segment,
};
use crate::geocode::{Geocoder, GeocodingResolver};
use crate::models::{EventRecord, RawEventBlock};

/// Why a block produced no record
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SkipReason {
    MissingTicketLink,
    UnresolvableLink { link: String, detail: String },
    InsufficientText,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingTicketLink => f.write_str("no ticket link"),
            SkipReason::UnresolvableLink { link, detail } => {
                write!(f, "cannot resolve link '{}': {}", link, detail)
            }
            SkipReason::InsufficientText => f.write_str("no text lines"),
        }
    }
}

/// Per-block result: a finished draft, or the reason it was skipped
pub type BlockOutcome = std::result::Result<EventRecord, SkipReason>;

/// What the engine knows about the page a block came from
#[derive(Debug, Clone)]
pub struct PageContext {
    /// Origin relative links are resolved against
    pub base: Url,
    /// Wall-clock time in the venues' civil time
    pub now: NaiveDateTime,
}

/// Turns raw blocks into draft records
pub struct Normalizer {
    resolver: GeocodingResolver,
}

impl Normalizer {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self {
            resolver: GeocodingResolver::new(geocoder),
        }
    }

    /// Builds one record. The link is checked before anything else so that
    /// unreferenceable cards cost no geocoding calls.
    pub async fn normalize(&self, block: &RawEventBlock, page: &PageContext) -> BlockOutcome {
        let ticket_url = resolve_link(block.link.as_deref(), &page.base)?;

        let lines = segment(&block.text);
        let fields = locate(&lines).ok_or(SkipReason::InsufficientText)?;

        let start_time = extract_start_time(&block.text, page.now);
        let price = extract_price(&block.text);
        let geo = self.resolver.resolve(&fields.venue).await;
        let category = resolve_category(block.category, &fields.title);

        let image_url = block
            .image
            .as_deref()
            .and_then(|image| page.base.join(image.trim()).ok())
            .map(String::from)
            .unwrap_or_default();

        debug!(
            "Normalized '{}' at '{}' ({:?}, {})",
            fields.title, fields.venue, geo.source, start_time
        );

        Ok(EventRecord {
            description: format!("{} mekanında gerçekleşecek.", fields.venue),
            address: fields.venue.clone(),
            title: fields.title,
            venue_name: fields.venue,
            category,
            price,
            start_time,
            ticket_url,
            image_url,
            lat: geo.coordinates.lat,
            lng: geo.coordinates.lng,
            is_approved: false,
            sold_out: is_sold_out(&block.text),
        })
    }
}

/// Absolute http(s) URL for a card link, resolving site-relative links
/// against the page's base origin
pub fn resolve_link(link: Option<&str>, base: &Url) -> Result<String, SkipReason> {
    let link = link
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .ok_or(SkipReason::MissingTicketLink)?;

    let url = base
        .join(link)
        .map_err(|e| SkipReason::UnresolvableLink {
            link: link.to_string(),
            detail: e.to_string(),
        })?;

    match url.scheme() {
        "http" | "https" => Ok(url.into()),
        other => Err(SkipReason::UnresolvableLink {
            link: link.to_string(),
            detail: format!("unsupported scheme '{}'", other),
        }),
    }
}
