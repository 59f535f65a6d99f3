//! Mail retrieval over IMAP

use crate::account::TestAccount;
use crate::config::MailConfig;
use crate::connection::{self, TlsStream};
use crate::error::{Error, Result};
use crate::message::RawMessage;
use async_imap::Session;
use futures::StreamExt;
use tokio_util::compat::{Compat, TokioAsyncReadCompatExt};
use tracing::{debug, info};

type ImapSession = Session<Compat<TlsStream>>;

/// IMAP client scoped to a test mailbox's INBOX.
///
/// Opens a fresh session per call: connect, LOGIN, do the work,
/// LOGOUT. Disposable mailboxes are short-lived, so there is nothing
/// to gain from holding a connection across polls.
pub struct InboxClient {
    config: MailConfig,
}

impl InboxClient {
    #[must_use]
    pub const fn new(config: MailConfig) -> Self {
        Self { config }
    }

    /// Fetch the most recent message in the INBOX, if any.
    ///
    /// UIDs are assigned in arrival order, so the highest UID is the
    /// newest message. An empty mailbox is `Ok(None)`; callers decide
    /// whether to ask again.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, LOGIN, SELECT, SEARCH, or
    /// FETCH fails.
    pub async fn fetch_last_message(&self, account: &TestAccount) -> Result<Option<RawMessage>> {
        let mut session = self.connect(account).await?;
        let result = last_message(&mut session).await;
        session.logout().await.ok();
        result
    }

    async fn connect(&self, account: &TestAccount) -> Result<ImapSession> {
        let tls_stream = connection::connect_tls(
            &self.config.imap_host,
            self.config.imap_port,
            self.config.danger_accept_invalid_certs,
        )
        .await?;

        let client = async_imap::Client::new(tls_stream.compat());
        let session = client
            .login(&account.user, &account.pass)
            .await
            .map_err(|(e, _)| Error::Imap(format!("Login failed: {e}")))?;

        info!("Authenticated to IMAP server as {}", account.user);
        Ok(session)
    }
}

async fn last_message(session: &mut ImapSession) -> Result<Option<RawMessage>> {
    session
        .select("INBOX")
        .await
        .map_err(|e| Error::Imap(format!("Failed to select INBOX: {e}")))?;

    let uids = session
        .uid_search("ALL")
        .await
        .map_err(|e| Error::Imap(format!("Search failed: {e}")))?;

    let Some(uid) = uids.into_iter().max() else {
        debug!("Mailbox is empty");
        return Ok(None);
    };

    let uid_set = format!("{uid}");
    let mut messages = session
        .uid_fetch(&uid_set, "(BODY.PEEK[])")
        .await
        .map_err(|e| Error::Imap(format!("Fetch failed: {e}")))?;

    if let Some(msg_result) = messages.next().await {
        let msg = msg_result.map_err(|e| Error::Imap(format!("Fetch error: {e}")))?;
        if let Some(body) = msg.body() {
            debug!("Fetched message UID {} ({} bytes)", uid, body.len());
            return Ok(Some(RawMessage::new(uid, body.to_vec())));
        }
    }

    Err(Error::Imap(format!("No body found for UID {uid}")))
}
