//! Normalizes scraped ticketing-site event cards into draft event records
//! and stores each one at most once per ticket link.

pub mod config;
pub mod error;
pub mod extract;
pub mod geocode;
pub mod logging;
pub mod models;
pub mod pipeline;
pub mod scrapers;
pub mod store;

pub use error::{Result, ScoutError};
pub use models::{Category, CategoryHint, Coordinates, EventRecord, RawEventBlock};
