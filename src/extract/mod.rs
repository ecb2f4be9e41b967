//! Pure text heuristics that turn a scraped card into event fields.
//!
//! Every extractor here is infallible: missing data degrades to a default.

pub mod category;
pub mod datetime;
pub mod fields;
pub mod price;
pub mod segment;

pub use category::{detect_category, resolve_category};
pub use datetime::{default_start, extract_start_time};
pub use fields::{locate, LocatedFields};
pub use price::{extract_price, PRICE_NOT_LISTED};
pub use segment::segment;

const SOLD_OUT_MARKER: &str = "tükendi";

/// True when the card announces the event as sold out
pub fn is_sold_out(text: &str) -> bool {
    text.to_lowercase().contains(SOLD_OUT_MARKER)
}
