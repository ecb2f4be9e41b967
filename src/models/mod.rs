use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::ScoutError;

/// Venue name used when neither a keyword nor a positional match exists
pub const UNKNOWN_VENUE: &str = "Unknown";

/// Event category as stored in the `events` table
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Category {
    #[serde(rename = "Müzik")]
    Music,
    #[serde(rename = "Tiyatro")]
    Theatre,
    #[serde(rename = "Spor")]
    Sports,
    #[serde(rename = "Stand-Up")]
    StandUp,
    #[serde(rename = "Sanat")]
    Arts,
    #[serde(rename = "Festival")]
    Festival,
    #[serde(rename = "Parti")]
    Party,
    #[serde(rename = "Aile")]
    Family,
    #[serde(rename = "Eğitim")]
    Education,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Music => "Müzik",
            Category::Theatre => "Tiyatro",
            Category::Sports => "Spor",
            Category::StandUp => "Stand-Up",
            Category::Arts => "Sanat",
            Category::Festival => "Festival",
            Category::Party => "Parti",
            Category::Family => "Aile",
            Category::Education => "Eğitim",
        }
    }

    const ALL: [Category; 9] = [
        Category::Music,
        Category::Theatre,
        Category::Sports,
        Category::StandUp,
        Category::Arts,
        Category::Festival,
        Category::Party,
        Category::Family,
        Category::Education,
    ];
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Category {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        Category::ALL
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
            .ok_or_else(|| ScoutError::Config(format!("unknown category '{}'", s)))
    }
}

/// How a block's category is decided: fixed by the page it came from, or
/// detected from its title.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(try_from = "String", into = "String")]
pub enum CategoryHint {
    Fixed(Category),
    Detect,
}

impl TryFrom<String> for CategoryHint {
    type Error = ScoutError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.trim().eq_ignore_ascii_case("auto") {
            Ok(CategoryHint::Detect)
        } else {
            value.parse().map(CategoryHint::Fixed)
        }
    }
}

impl From<CategoryHint> for String {
    fn from(hint: CategoryHint) -> Self {
        match hint {
            CategoryHint::Fixed(category) => category.label().to_string(),
            CategoryHint::Detect => "auto".to_string(),
        }
    }
}

/// One scraped card before normalization
#[derive(Debug, Clone, PartialEq)]
pub struct RawEventBlock {
    pub text: String,
    /// Absolute or site-relative link target
    pub link: Option<String>,
    pub image: Option<String>,
    pub category: CategoryHint,
}

impl RawEventBlock {
    pub fn new(text: impl Into<String>, link: Option<String>, category: CategoryHint) -> Self {
        Self {
            text: text.into(),
            link,
            image: None,
            category,
        }
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }
}

/// Decimal-degree coordinate pair
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinates {
    /// Central Istanbul, used whenever a venue cannot be located
    pub const FALLBACK: Coordinates = Coordinates {
        lat: 41.0082,
        lng: 28.9784,
    };
}

/// Draft event row, serialized exactly as the `events` table expects it
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct EventRecord {
    pub title: String,
    pub venue_name: String,
    pub category: Category,
    pub price: String,
    /// Venue local civil time, no offset
    pub start_time: NaiveDateTime,
    pub ticket_url: String,
    pub image_url: String,
    pub description: String,
    pub lat: f64,
    pub lng: f64,
    pub is_approved: bool,
    pub address: String,
    pub sold_out: bool,
}
