//! Fake signup site
//!
//! Implements the browser-driving trait against an in-process
//! "application": an email field, a password field, and a submit
//! button that redirects to `/verify`. Submitting schedules a
//! confirmation email to whatever address was typed, delivered into
//! the shared inbox after a delay. The delay is the point: it forces
//! callers onto the poll-until-ready path instead of a lucky
//! first fetch.

use crate::fake_imap::state::SharedInbox;
use mailprobe::{EMAIL_FIELD, PASSWORD_FIELD, Result, SUBMIT_BUTTON, SignupDriver};
use std::time::Duration;

pub struct FakeSignupSite {
    inbox: SharedInbox,
    delivery_delay: Duration,
    location: String,
    email: Option<String>,
    password: Option<String>,
}

impl FakeSignupSite {
    pub fn new(inbox: SharedInbox, delivery_delay: Duration) -> Self {
        Self {
            inbox,
            delivery_delay,
            location: "/".to_string(),
            email: None,
            password: None,
        }
    }
}

impl SignupDriver for FakeSignupSite {
    async fn visit(&mut self, path: &str) -> Result<()> {
        self.location = path.to_string();
        Ok(())
    }

    async fn type_into(&mut self, selector: &str, value: &str) -> Result<()> {
        match selector {
            EMAIL_FIELD => self.email = Some(value.to_string()),
            PASSWORD_FIELD => self.password = Some(value.to_string()),
            other => panic!("no such element: {other}"),
        }
        Ok(())
    }

    async fn click(&mut self, selector: &str) -> Result<()> {
        assert_eq!(selector, SUBMIT_BUTTON, "no such element: {selector}");
        let email = self.email.clone().expect("email field not filled");
        self.password.as_ref().expect("password field not filled");

        self.location = "/verify".to_string();

        let inbox = self.inbox.clone();
        let delay = self.delivery_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inbox.lock().unwrap().deliver(confirmation_email(&email));
        });
        Ok(())
    }

    async fn location_path(&mut self) -> Result<String> {
        Ok(self.location.clone())
    }
}

/// The confirmation email the "application" sends after signup.
fn confirmation_email(to: &str) -> Vec<u8> {
    format!(
        concat!(
            "From: The App <no-reply@app.test>\r\n",
            "To: {to}\r\n",
            "Subject: Activate your account\r\n",
            "MIME-Version: 1.0\r\n",
            "Content-Type: multipart/alternative; boundary=\"confirm\"\r\n",
            "\r\n",
            "--confirm\r\n",
            "Content-Type: text/plain; charset=utf-8\r\n",
            "\r\n",
            "Activate your account: https://app.test/activate?code=0001\r\n",
            "--confirm\r\n",
            "Content-Type: text/html; charset=utf-8\r\n",
            "\r\n",
            "<h1>Activate your account</h1>\r\n",
            "<a class=\"link-button\" href=\"https://app.test/activate?code=0001\">Verify Email</a>\r\n",
            "--confirm--\r\n",
        ),
        to = to
    )
    .into_bytes()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fake_imap::state::{InboxState, shared};
    use mailprobe::{RawMessage, SignupFlow, parse_message};

    #[test]
    fn confirmation_email_parses_cleanly() {
        let raw = RawMessage::new(1, confirmation_email("fred@example.test"));
        let parsed = parse_message(&raw).unwrap();

        assert_eq!(parsed.subject, "Activate your account");
        assert_eq!(parsed.to, vec!["fred@example.test".to_string()]);
        assert!(parsed.html.unwrap().contains("Verify Email"));
        assert!(parsed.text.unwrap().contains("https://app.test/activate"));
    }

    #[tokio::test]
    async fn submit_redirects_then_delivers_after_delay() {
        let inbox = shared(InboxState::new());
        let mut site = FakeSignupSite::new(inbox.clone(), Duration::from_millis(50));

        let flow = SignupFlow::default();
        let landed = flow
            .sign_up(&mut site, "fred@example.test", "secret123")
            .await
            .unwrap();

        assert_eq!(landed, "/verify");
        assert!(inbox.lock().unwrap().messages.is_empty());

        tokio::time::sleep(Duration::from_millis(200)).await;
        let state = inbox.lock().unwrap();
        assert_eq!(state.messages.len(), 1);
        assert!(
            String::from_utf8_lossy(&state.messages[0].raw).contains("To: fred@example.test")
        );
    }
}
