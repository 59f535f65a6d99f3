//! Message data model
//!
//! Three shapes of the same email at different stages:
//! [`OutboundMessage`] before submission, [`RawMessage`] as fetched
//! off the wire, and [`ParsedMessage`] after MIME decoding.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An email ready for submission.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutboundMessage {
    /// Sender, as `addr` or `Display Name <addr>`.
    pub from: String,
    /// Recipients in send order. Joined into a single `To:` header.
    pub to: Vec<String>,
    pub subject: String,
    /// Plain-text body.
    pub text: String,
    /// HTML body, sent as the preferred alternative.
    pub html: String,
    pub attachments: Vec<OutboundAttachment>,
}

/// A file attached to an [`OutboundMessage`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundAttachment {
    pub filename: String,
    pub content: Vec<u8>,
    /// MIME type. `application/octet-stream` when unset.
    pub content_type: Option<String>,
}

impl OutboundAttachment {
    #[must_use]
    pub fn new(filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            filename: filename.into(),
            content,
            content_type: None,
        }
    }

    #[must_use]
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// A fetched message: the UID the server assigned plus the verbatim
/// RFC 2822 bytes. Feed it to [`crate::parse_message`] to look inside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMessage {
    pub uid: u32,
    pub body: Vec<u8>,
}

impl RawMessage {
    #[must_use]
    pub const fn new(uid: u32, body: Vec<u8>) -> Self {
        Self { uid, body }
    }
}

/// A decoded message, shaped for assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedMessage {
    /// Decoded subject. Empty when the header is missing.
    pub subject: String,
    pub from: Option<String>,
    /// Recipient addresses in header order.
    pub to: Vec<String>,
    pub date: Option<DateTime<Utc>>,
    /// First `text/plain` part, transfer- and charset-decoded.
    pub text: Option<String>,
    /// First `text/html` part, transfer- and charset-decoded.
    pub html: Option<String>,
    /// Attachments in document order.
    pub attachments: Vec<ParsedAttachment>,
}

/// An attachment pulled out of a [`ParsedMessage`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAttachment {
    pub filename: String,
    pub content_type: String,
    /// Transfer-decoded bytes.
    pub content: Vec<u8>,
}
