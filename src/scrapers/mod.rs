pub mod browser;
pub mod cards;
pub mod http;
pub mod traits;

pub use browser::BrowserPageSource;
pub use cards::extract_blocks;
pub use http::HttpPageSource;
pub use traits::PageSource;
