//! The administrator account
//!
//! There is a single administrator, configured from the environment on startup.

use anyhow::Result;
use anyhow::anyhow;
use uuid::Uuid;

use crate::password::generate;
use crate::password::hash;
use crate::password::verify;
use crate::utils::env_var_or_else;

/// Username when `ADMIN_USERNAME` is not set
const DEFAULT_USERNAME: &str = "admin";

/// The administrator account
#[derive(Clone, Debug)]
pub struct AdminAccount {
    /// Username to log in with
    pub username: String,

    /// Argon2 hash of the password
    hashed_password: String,

    /// Session of this process, tokens of earlier processes no longer match
    pub session_id: Uuid,
}

impl AdminAccount {
    /// Create the account with a plain password
    pub fn new(username: &str, password: &str) -> Result<Self> {
        let hashed_password =
            hash(password).map_err(|err| anyhow!("Could not hash admin password: {err}"))?;

        Ok(Self {
            username: username.to_string(),
            hashed_password,
            session_id: Uuid::new_v4(),
        })
    }

    /// Create the account from `ADMIN_USERNAME` and `ADMIN_PASSWORD`
    ///
    /// A missing password is generated and logged
    pub fn from_env() -> Result<Self> {
        let username = env_var_or_else("ADMIN_USERNAME", || String::from(DEFAULT_USERNAME));

        let password = env_var_or_else("ADMIN_PASSWORD", || {
            let password = generate();
            tracing::info!("`ADMIN_PASSWORD` not set, generating new password: {password}");
            password
        });

        Self::new(&username, &password)
    }

    /// Check the credentials against this account
    pub fn check_credentials(&self, username: &str, password: &str) -> bool {
        // verified regardless of the username
        let password_matches = verify(&self.hashed_password, password);

        username == self.username && password_matches
    }
}
