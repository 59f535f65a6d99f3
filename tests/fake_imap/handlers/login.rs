//! LOGIN command handler.
//!
//! Checks the presented credentials against the inbox state. A mailbox
//! without configured credentials accepts anyone, which keeps tests
//! that don't care about authentication short.

use crate::fake_imap::io::write_line;
use crate::fake_imap::state::InboxState;
use tokio::io::{AsyncRead, AsyncWrite, BufReader};

/// Handle the LOGIN command. Returns `false` if the response could not
/// be written and the connection should be dropped.
pub async fn handle_login<S: AsyncRead + AsyncWrite + Unpin>(
    tag: &str,
    username: &str,
    password: &str,
    inbox: &InboxState,
    stream: &mut BufReader<S>,
) -> bool {
    let resp = if inbox.accepts(username, password) {
        format!("{tag} OK LOGIN completed\r\n")
    } else {
        format!("{tag} NO LOGIN failed: invalid credentials\r\n")
    };
    write_line(stream, &resp).await.is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::BufReader;

    /// Create a `BufReader` over an in-memory duplex stream, run the
    /// handler, and return what was written to the client.
    async fn run(tag: &str, username: &str, password: &str, inbox: &InboxState) -> (String, bool) {
        let (client, server) = tokio::io::duplex(1024);
        let mut stream = BufReader::new(server);

        let ok = handle_login(tag, username, password, inbox, &mut stream).await;
        drop(stream);

        let mut buf = Vec::new();
        tokio::io::AsyncReadExt::read_to_end(&mut BufReader::new(client), &mut buf)
            .await
            .unwrap();
        (String::from_utf8(buf).unwrap(), ok)
    }

    #[tokio::test]
    async fn open_mailbox_accepts_any_credentials() {
        let inbox = InboxState::new();
        let (output, ok) = run("A0001", "anyone", "anything", &inbox).await;
        assert!(ok);
        assert_eq!(output, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn matching_credentials_are_accepted() {
        let inbox = InboxState::with_credentials("fred@example.test", "secret123");
        let (output, _) = run("A0001", "fred@example.test", "secret123", &inbox).await;
        assert_eq!(output, "A0001 OK LOGIN completed\r\n");
    }

    #[tokio::test]
    async fn wrong_password_gets_no() {
        let inbox = InboxState::with_credentials("fred@example.test", "secret123");
        let (output, ok) = run("A0001", "fred@example.test", "nope", &inbox).await;
        assert!(ok, "a NO reply is still a successful write");
        assert_eq!(output, "A0001 NO LOGIN failed: invalid credentials\r\n");
    }

    #[tokio::test]
    async fn echoes_client_tag() {
        let inbox = InboxState::new();
        let (output, _) = run("TAG42", "a", "b", &inbox).await;
        assert!(output.starts_with("TAG42 "));
    }
}
