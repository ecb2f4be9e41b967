pub mod nominatim;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::Result;
use crate::models::{Coordinates, UNKNOWN_VENUE};

pub use nominatim::NominatimGeocoder;

/// Generic venue-type words dropped before the second lookup,
/// e.g. "Dorock XL Kadıköy Sahne" -> "Dorock XL Kadıköy"
pub const GENERIC_VENUE_WORDS: &[&str] = &["Sahne", "Performance Hall", "Event Hall"];

/// A place-name lookup restricted to one country
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates of the best match, or `None` when nothing matched
    async fn lookup(&self, query: &str) -> Result<Option<Coordinates>>;

    /// Get the name of the geocoding provider
    fn provider_name(&self) -> &'static str;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoSource {
    /// Matched on the venue name as written
    Exact,
    /// Matched after dropping generic venue words
    Simplified,
    /// Nothing matched; the default coordinate was used
    Fallback,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoResolution {
    pub coordinates: Coordinates,
    pub source: GeoSource,
}

impl GeoResolution {
    fn fallback() -> Self {
        Self {
            coordinates: Coordinates::FALLBACK,
            source: GeoSource::Fallback,
        }
    }

    pub fn is_resolved(&self) -> bool {
        self.source != GeoSource::Fallback
    }
}

/// Venue name to coordinates, degrading to the default coordinate.
///
/// Lookup errors and timeouts are treated as "no result"; at most two
/// lookups are made per venue.
pub struct GeocodingResolver {
    geocoder: Arc<dyn Geocoder>,
}

impl GeocodingResolver {
    pub fn new(geocoder: Arc<dyn Geocoder>) -> Self {
        Self { geocoder }
    }

    pub async fn resolve(&self, venue: &str) -> GeoResolution {
        let name = venue.trim();
        if name.is_empty() || name == UNKNOWN_VENUE {
            return GeoResolution::fallback();
        }

        if let Some(coordinates) = self.attempt(name).await {
            return GeoResolution {
                coordinates,
                source: GeoSource::Exact,
            };
        }

        let simplified = simplify_venue_name(name);
        if !simplified.is_empty() && simplified != name {
            if let Some(coordinates) = self.attempt(&simplified).await {
                return GeoResolution {
                    coordinates,
                    source: GeoSource::Simplified,
                };
            }
        }

        warn!("Location not found for '{}', using default coordinates", venue);
        GeoResolution::fallback()
    }

    async fn attempt(&self, query: &str) -> Option<Coordinates> {
        match self.geocoder.lookup(query).await {
            Ok(found) => {
                debug!(
                    "{} lookup '{}' -> {:?}",
                    self.geocoder.provider_name(),
                    query,
                    found
                );
                found
            }
            Err(e) => {
                warn!(
                    "{} lookup failed for '{}': {}",
                    self.geocoder.provider_name(),
                    query,
                    e
                );
                None
            }
        }
    }
}

/// Drops the generic venue words and collapses the leftover whitespace
pub fn simplify_venue_name(name: &str) -> String {
    let stripped = GENERIC_VENUE_WORDS
        .iter()
        .fold(name.to_string(), |acc, word| acc.replace(word, ""));
    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}
