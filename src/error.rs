//! Error types for mailprobe

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// The polling budget ran out before the awaited value appeared.
    #[error("Gave up after {attempts} attempts: {message}")]
    RetryExhausted { message: String, attempts: u32 },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IMAP error: {0}")]
    Imap(String),

    #[error("SMTP error: {0}")]
    Smtp(String),

    #[error("Email parsing error: {0}")]
    Parse(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TLS error: {0}")]
    Tls(String),
}

pub type Result<T> = std::result::Result<T, Error>;
