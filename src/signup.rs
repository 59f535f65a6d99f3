//! Browser-driving seam for the signup flow
//!
//! The application under test confirms signups over email. Driving
//! its form is outside this crate, so the flow talks to a trait and
//! callers plug in whatever automation they have. Tests use an
//! in-process fake site.

use crate::error::Result;
use tracing::info;

/// Email input on the signup form.
pub const EMAIL_FIELD: &str = "#email";
/// Password input on the signup form.
pub const PASSWORD_FIELD: &str = "[type=password]";
/// Form submit button.
pub const SUBMIT_BUTTON: &str = "button[type=submit]";

/// Driver for a browser session on the application under test.
#[allow(async_fn_in_trait)]
pub trait SignupDriver {
    /// Navigate to a path on the application.
    async fn visit(&mut self, path: &str) -> Result<()>;
    /// Type a value into the element matched by `selector`.
    async fn type_into(&mut self, selector: &str, value: &str) -> Result<()>;
    /// Click the element matched by `selector`.
    async fn click(&mut self, selector: &str) -> Result<()>;
    /// Path portion of the current location.
    async fn location_path(&mut self) -> Result<String>;
}

/// Fills in the signup form and submits it.
pub struct SignupFlow {
    signup_path: String,
}

impl Default for SignupFlow {
    fn default() -> Self {
        Self::new("/signup/email")
    }
}

impl SignupFlow {
    #[must_use]
    pub fn new(signup_path: impl Into<String>) -> Self {
        Self {
            signup_path: signup_path.into(),
        }
    }

    /// Register `address` with `password` and return the path the
    /// application navigated to after submit. Callers assert on the
    /// returned path; a confirmation email should be on its way once
    /// this resolves.
    ///
    /// # Errors
    ///
    /// Returns an error if any driver step fails.
    pub async fn sign_up<D: SignupDriver>(
        &self,
        driver: &mut D,
        address: &str,
        password: &str,
    ) -> Result<String> {
        driver.visit(&self.signup_path).await?;
        driver.type_into(EMAIL_FIELD, address).await?;
        driver.type_into(PASSWORD_FIELD, password).await?;
        driver.click(SUBMIT_BUTTON).await?;

        let path = driver.location_path().await?;
        info!("Signup for {} landed on {}", address, path);
        Ok(path)
    }
}
