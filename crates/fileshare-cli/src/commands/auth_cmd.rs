use fileshare_core::auth::AuthBackend;
use fileshare_core::storage::StorageBackend;

use crate::commands::common::{format_file_lines, format_identity_lines};
use crate::error::CliError;
use crate::shell::Shell;

impl<A: AuthBackend, S: StorageBackend> Shell<A, S> {
    pub(crate) async fn run_signup(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Vec<String>, CliError> {
        self.session.sign_up(email, password).await?;
        Ok(vec![format!(
            "Check {} for a confirmation link, then run `login`.",
            email.trim()
        )])
    }

    /// Sign in, then load the listing so the signed-in view starts populated.
    pub(crate) async fn run_login(
        &mut self,
        email: &str,
        password: &str,
    ) -> Result<Vec<String>, CliError> {
        let identity = self.session.sign_in(email, password).await?;
        // Rows from an earlier sign-in belong to that user's folder.
        self.listing.clear();
        let mut output = vec![format!("Signed in as {}", identity.email)];

        match self.dispatcher.refresh(&mut self.session).await {
            Ok(listing) => {
                output.extend(format_file_lines(&listing, self.session.confirmations()));
                self.listing = listing;
            }
            Err(error) => output.push(format!("Could not load your files: {error}")),
        }
        Ok(output)
    }

    pub(crate) async fn run_logout(&mut self) -> Vec<String> {
        if self.session.identity().is_none() {
            return vec!["Not signed in.".to_string()];
        }
        self.session.sign_out().await;
        vec!["Signed out.".to_string()]
    }

    pub(crate) fn run_whoami(&self) -> Result<Vec<String>, CliError> {
        let Some(identity) = self.session.identity() else {
            return Ok(vec!["Not signed in.".to_string()]);
        };
        let namespace = identity.namespace()?;
        Ok(format_identity_lines(identity, &namespace))
    }
}
