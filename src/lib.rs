//! End-to-end email delivery testing toolkit
//!
//! Everything a test suite needs to watch an email make it all the
//! way through a system: provision a disposable mailbox over HTTP,
//! submit messages over SMTP, pull the latest message back over IMAP
//! (implicit TLS), and decode MIME into assertable structures.
//!
//! Mail is asynchronous by nature, so the glue is [`until_ready`]:
//! a polling orchestrator that re-runs a probe on a fixed delay
//! until the awaited value shows up or a time budget runs out.

mod account;
mod config;
mod connection;
mod error;
mod fetch;
mod message;
mod parse;
mod retry;
mod send;
mod signup;

pub use account::{AccountService, TestAccount};
pub use config::MailConfig;
pub use error::{Error, Result};
pub use fetch::InboxClient;
pub use message::{
    OutboundAttachment, OutboundMessage, ParsedAttachment, ParsedMessage, RawMessage,
};
pub use parse::parse_message;
pub use retry::{Readiness, RetryPolicy, until_ready};
pub use send::Mailer;
pub use signup::{EMAIL_FIELD, PASSWORD_FIELD, SUBMIT_BUTTON, SignupDriver, SignupFlow};
