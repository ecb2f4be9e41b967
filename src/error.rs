use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Environment variable {name} is not set")]
    MissingEnv { name: String },

    #[error("Geocoding failed: {0}")]
    Geocode(String),

    #[error("Store returned {status}: {message}")]
    Store { status: u16, message: String },

    #[error("Record with ticket_url {0} already exists")]
    Duplicate(String),
}

pub type Result<T> = std::result::Result<T, ScoutError>;
