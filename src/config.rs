//! Service endpoint configuration

use crate::error::{Error, Result};
use std::env;
use std::str::FromStr;

/// Endpoints and TLS settings for the mail service under test.
///
/// The defaults target a public disposable-mailbox service
/// (account issuance over HTTPS, IMAP on 993 with implicit TLS,
/// SMTP submission on 587 with STARTTLS). Tests point the same
/// struct at in-process fakes instead.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub account_url: String,
    pub imap_host: String,
    pub imap_port: u16,
    pub smtp_host: String,
    pub smtp_port: u16,
    /// Upgrade the SMTP connection with STARTTLS. Off for plaintext
    /// test servers.
    pub smtp_starttls: bool,
    /// Skip certificate verification. Only for servers presenting
    /// self-signed certificates.
    pub danger_accept_invalid_certs: bool,
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            account_url: "https://api.nodemailer.com/user".to_string(),
            imap_host: "imap.ethereal.email".to_string(),
            imap_port: 993,
            smtp_host: "smtp.ethereal.email".to_string(),
            smtp_port: 587,
            smtp_starttls: true,
            danger_accept_invalid_certs: false,
        }
    }
}

impl MailConfig {
    /// Load configuration from environment variables.
    ///
    /// Reads from `.env` if present. All variables are optional and
    /// fall back to [`MailConfig::default`]:
    /// - `ACCOUNT_URL`
    /// - `IMAP_HOST` / `IMAP_PORT`
    /// - `SMTP_HOST` / `SMTP_PORT` / `SMTP_STARTTLS`
    /// - `DANGER_ACCEPT_INVALID_CERTS`
    ///
    /// # Errors
    ///
    /// Returns an error if a set variable fails to parse.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        Ok(Self {
            account_url: env::var("ACCOUNT_URL").unwrap_or(defaults.account_url),
            imap_host: env::var("IMAP_HOST").unwrap_or(defaults.imap_host),
            imap_port: parse_var("IMAP_PORT", defaults.imap_port)?,
            smtp_host: env::var("SMTP_HOST").unwrap_or(defaults.smtp_host),
            smtp_port: parse_var("SMTP_PORT", defaults.smtp_port)?,
            smtp_starttls: parse_var("SMTP_STARTTLS", defaults.smtp_starttls)?,
            danger_accept_invalid_certs: parse_var(
                "DANGER_ACCEPT_INVALID_CERTS",
                defaults.danger_accept_invalid_certs,
            )?,
        })
    }
}

fn parse_var<T>(name: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid {name}: {e}"))),
        Err(_) => Ok(default),
    }
}
