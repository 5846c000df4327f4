use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DashError {
    #[error("Failed to parse config file {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write {path}: {reason}")]
    ConfigWrite { path: PathBuf, reason: String },

    #[error("Config directory already exists at {0}")]
    AlreadyInitialized(PathBuf),

    #[error("Not logged in. Run 'waterdesk login <username>' first.")]
    NotAuthenticated,

    #[error("Access denied: role '{role}' cannot open {route}")]
    Forbidden { role: String, route: String },

    #[error("{0}")]
    Api(String),

    #[error("Request to {url} failed: {reason}")]
    Network { url: String, reason: String },

    #[error("Unexpected response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Invalid order status '{0}'. Use 'completed', 'pending', or 'canceled'.")]
    InvalidStatus(String),

    #[error("Amount must be greater than zero")]
    InvalidAmount,

    #[error("Invalid month {0}. Use a value between 1 and 12.")]
    InvalidMonth(u32),

    #[error("Typst not found. Install it from https://typst.app/ or run: cargo install typst-cli")]
    TypstNotFound,

    #[error("Failed to generate PDF: {0}")]
    PdfGeneration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DashError>;
