//! Disposable mailbox provisioning

use crate::config::MailConfig;
use crate::error::Result;
use crate::retry::Readiness;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

/// Credentials for a provisioned test mailbox.
///
/// `user` is the full login address; [`TestAccount::username`] gives
/// the bare identifier for flows that want the local part.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestAccount {
    pub user: String,
    pub pass: String,
}

impl TestAccount {
    #[must_use]
    pub fn new(user: impl Into<String>, pass: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            pass: pass.into(),
        }
    }

    /// Local part of the mailbox address.
    #[must_use]
    pub fn username(&self) -> &str {
        self.user.split('@').next().unwrap_or(&self.user)
    }
}

/// Client for the account-issuing HTTP endpoint.
pub struct AccountService {
    client: reqwest::Client,
    account_url: String,
}

impl AccountService {
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &MailConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
            .build()?;
        Ok(Self {
            client,
            account_url: config.account_url.clone(),
        })
    }

    /// Request a fresh disposable mailbox.
    ///
    /// The service answers with `{"user": .., "pass": ..}` once a
    /// mailbox is available and with an empty object while it is
    /// still warming up; the latter maps to [`Readiness::NotReady`]
    /// so callers can poll via [`crate::until_ready`].
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure or a non-success status.
    pub async fn create_account(&self) -> Result<Readiness<TestAccount>> {
        debug!("Requesting test account from {}", self.account_url);

        let response = self
            .client
            .post(&self.account_url)
            .json(&serde_json::json!({
                "requestor": env!("CARGO_PKG_NAME"),
                "version": env!("CARGO_PKG_VERSION"),
            }))
            .send()
            .await?
            .error_for_status()?;

        let body = response.text().await?;
        let readiness = account_from_reply(&body);
        if let Readiness::Ready(account) = &readiness {
            info!("Provisioned test account {}", account.user);
        }
        Ok(readiness)
    }
}

/// Map an issuance reply to readiness. Only a JSON object carrying
/// non-empty `user` and `pass` counts as a mailbox.
fn account_from_reply(body: &str) -> Readiness<TestAccount> {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return Readiness::NotReady;
    };

    let user = value.get("user").and_then(Value::as_str).unwrap_or_default();
    let pass = value.get("pass").and_then(Value::as_str).unwrap_or_default();
    if user.is_empty() || pass.is_empty() {
        return Readiness::NotReady;
    }

    Readiness::Ready(TestAccount::new(user, pass))
}
