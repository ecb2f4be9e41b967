use std::collections::HashSet;

use once_cell::sync::Lazy;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

use crate::config::SourceConfig;
use crate::error::{Result, ScoutError};
use crate::models::RawEventBlock;

static LINK_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[href]").expect("valid link selector"));
static IMAGE_SELECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("img").expect("valid image selector"));

/// Lazy-load attribute first, then the regular one
const IMAGE_ATTRS: [&str; 2] = ["data-src", "src"];

/// Finds the event cards on a listing page and turns each into a raw block.
///
/// Links are made absolute against the source's base origin before they
/// are filtered and de-duplicated. Cards with too little text, or whose
/// link does not look like an event page, are dropped. Cards without any
/// link are kept so the engine can report them.
pub fn extract_blocks(html: &str, source: &SourceConfig) -> Result<Vec<RawEventBlock>> {
    let card_selector = Selector::parse(&source.card_selector).map_err(|e| {
        ScoutError::Config(format!(
            "invalid card selector '{}' for {}: {}",
            source.card_selector, source.name, e
        ))
    })?;
    let base = source.base_url()?;

    let document = Html::parse_document(html);
    let cards: Vec<_> = document.select(&card_selector).collect();
    info!("[{}] Found {} potential cards", source.name, cards.len());

    let mut seen_links = HashSet::new();
    let mut blocks = Vec::new();

    for card in cards {
        let text = card_text(&card);
        if text.chars().count() < source.min_text_len {
            continue;
        }

        let link = card_link(&card).map(|href| absolute_link(&base, href));
        if let Some(link) = &link {
            if !looks_like_event_link(link, &source.link_keywords) {
                debug!("[{}] Ignoring non-event link {}", source.name, link);
                continue;
            }
            if !seen_links.insert(link.clone()) {
                continue;
            }
        }

        let mut block = RawEventBlock::new(text, link, source.category);
        if let Some(image) = card_image(&card) {
            block = block.with_image(image);
        }
        blocks.push(block);
    }

    info!("[{}] Kept {} cards", source.name, blocks.len());
    Ok(blocks)
}

/// Each text node on its own line, the way a rendered card reads
fn card_text(card: &ElementRef<'_>) -> String {
    card.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn card_link(card: &ElementRef<'_>) -> Option<String> {
    let own = card.value().attr("href");
    own.or_else(|| {
        card.select(&LINK_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
    })
    .map(str::trim)
    .filter(|href| !href.is_empty())
    .map(str::to_string)
}

/// Hrefs the base cannot join are passed on as-is for the engine to reject
fn absolute_link(base: &Url, href: String) -> String {
    base.join(&href).map(String::from).unwrap_or(href)
}

fn card_image(card: &ElementRef<'_>) -> Option<String> {
    let img = card.select(&IMAGE_SELECTOR).next()?;
    IMAGE_ATTRS
        .iter()
        .find_map(|attr| img.value().attr(attr).filter(|v| !v.trim().is_empty()))
        .map(|v| v.trim().to_string())
}

fn looks_like_event_link(link: &str, keywords: &[String]) -> bool {
    keywords.is_empty() || keywords.iter().any(|kw| link.contains(kw.as_str()))
}
