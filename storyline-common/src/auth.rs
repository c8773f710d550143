//! Credential store for the wizard login gate
//!
//! Accounts come from the environment:
//! - `ADMIN_USERNAME` (default `admin`) and `ADMIN_PASSWORD`
//! - `STAFF_ACCOUNTS` as `user:pass,user:pass`
//!
//! Only SHA-256 digests of the passwords are held in memory. There is no
//! built-in default password: without `ADMIN_PASSWORD` the admin account is
//! simply not created.
//!
//! # Pure Functions
//!
//! No HTTP framework dependencies; the wizard wraps this in its login middleware.

use sha2::{Digest, Sha256};
use std::collections::HashMap;
use tracing::{info, warn};

/// Environment variable holding the admin user name
pub const ADMIN_USERNAME_VAR: &str = "ADMIN_USERNAME";
/// Environment variable holding the admin password
pub const ADMIN_PASSWORD_VAR: &str = "ADMIN_PASSWORD";
/// Environment variable holding extra `user:pass` pairs
pub const STAFF_ACCOUNTS_VAR: &str = "STAFF_ACCOUNTS";

/// Calculate the SHA-256 hex digest of a password
///
/// # Examples
///
/// ```
/// use storyline_common::auth::hash_password;
///
/// let digest = hash_password("secret");
/// assert_eq!(digest.len(), 64);
/// assert_eq!(digest, hash_password("secret"));
/// ```
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Parse `user:pass,user:pass` into pairs.
///
/// Each entry is split at its first `:`, so passwords may contain colons.
/// Entries without a colon or with an empty user name are skipped.
pub fn parse_staff_accounts(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|entry| {
            let entry = entry.trim();
            if entry.is_empty() {
                return None;
            }
            match entry.split_once(':') {
                Some((user, pass)) if !user.trim().is_empty() => {
                    Some((user.trim().to_string(), pass.to_string()))
                }
                _ => {
                    warn!("Skipping malformed {} entry", STAFF_ACCOUNTS_VAR);
                    None
                }
            }
        })
        .collect()
}

/// User name → password digest
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    users: HashMap<String, String>,
}

impl CredentialStore {
    /// Build a store from plain-text pairs (digests are computed here)
    pub fn from_pairs<I, U, P>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (U, P)>,
        U: Into<String>,
        P: AsRef<str>,
    {
        let users = pairs
            .into_iter()
            .map(|(user, pass)| (user.into(), hash_password(pass.as_ref())))
            .collect();
        Self { users }
    }

    /// Load the admin account and staff accounts from the environment
    pub fn from_env() -> Self {
        let admin_user =
            std::env::var(ADMIN_USERNAME_VAR).unwrap_or_else(|_| "admin".to_string());
        let admin_pass = std::env::var(ADMIN_PASSWORD_VAR).ok();
        let staff = std::env::var(STAFF_ACCOUNTS_VAR).unwrap_or_default();
        Self::from_sources(&admin_user, admin_pass.as_deref(), &staff)
    }

    /// Same as [`CredentialStore::from_env`] but with explicit inputs
    pub fn from_sources(admin_user: &str, admin_pass: Option<&str>, staff_accounts: &str) -> Self {
        let mut pairs = Vec::new();
        match admin_pass {
            Some(pass) if !pass.is_empty() => pairs.push((admin_user.to_string(), pass.to_string())),
            _ => warn!(
                "{} not set; admin account '{}' is disabled",
                ADMIN_PASSWORD_VAR, admin_user
            ),
        }
        pairs.extend(parse_staff_accounts(staff_accounts));

        let store = Self::from_pairs(pairs);
        info!(accounts = store.len(), "Credential store loaded");
        store
    }

    /// Check a user name / password pair
    pub fn authenticate(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .is_some_and(|digest| *digest == hash_password(password))
    }

    pub fn contains(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}
