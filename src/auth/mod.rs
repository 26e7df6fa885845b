//! Credential provider
//!
//! Hands out an access token for the read-only spreadsheet scope:
//! the stored token if it is still valid, a refreshed one if it has a
//! refresh token, and otherwise the result of the interactive consent flow.
//! Whatever was obtained is written back to `token.json`.

pub mod client_secret;
pub mod oauth;
pub mod token;

pub use client_secret::ClientSecret;
pub use oauth::OAuthClient;
pub use token::{AuthorizedUser, TokenResponse};

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use log::{debug, info};

use crate::config::ReportPaths;
use crate::error::{ReportError, ReportResult};
use crate::storage::{read_json_optional, write_json_atomic};

/// Read-only access to spreadsheets
pub const SPREADSHEETS_READONLY: &str = "https://www.googleapis.com/auth/spreadsheets.readonly";

/// What to do with the stored credentials
#[derive(Debug, Clone, PartialEq)]
pub enum TokenAction {
    /// The stored access token is still good
    UseStored(String),
    /// The stored credentials can be refreshed
    Refresh(AuthorizedUser),
    /// Nothing usable is stored; ask the user
    Authorize,
}

/// Decide how to obtain a token from what is on disk
pub fn plan_token_action(stored: Option<AuthorizedUser>, now: DateTime<Utc>) -> TokenAction {
    match stored {
        Some(user) if user.is_valid(now) => match user.token {
            Some(token) => TokenAction::UseStored(token),
            None => TokenAction::Authorize,
        },
        Some(user) if user.can_refresh() => TokenAction::Refresh(user),
        _ => TokenAction::Authorize,
    }
}

/// Obtains and persists OAuth credentials
pub struct CredentialProvider {
    token_path: PathBuf,
    secret_path: PathBuf,
    scopes: Vec<String>,
    oauth: OAuthClient,
}

impl CredentialProvider {
    /// Create a provider for the read-only spreadsheet scope
    pub fn new(paths: &ReportPaths) -> ReportResult<Self> {
        Ok(Self {
            token_path: paths.token_file(),
            secret_path: paths.client_secret_file(),
            scopes: vec![SPREADSHEETS_READONLY.to_string()],
            oauth: OAuthClient::new()?,
        })
    }

    /// Return a usable access token, refreshing or authorizing as needed
    pub fn access_token(&self) -> ReportResult<String> {
        let now = Utc::now();
        let stored: Option<AuthorizedUser> = read_json_optional(&self.token_path)?;

        let user = match plan_token_action(stored, now) {
            TokenAction::UseStored(token) => {
                debug!("Using stored access token from {}", self.token_path.display());
                return Ok(token);
            }
            TokenAction::Refresh(user) => {
                info!("Refreshing expired access token");
                self.oauth.refresh(&user, now)?
            }
            TokenAction::Authorize => {
                let secret = ClientSecret::load(&self.secret_path)?;
                info!("No usable token, starting authorization flow");
                self.oauth.authorize(&secret, &self.scopes, now)?
            }
        };

        write_json_atomic(&self.token_path, &user)?;
        info!("Saved credentials to {}", self.token_path.display());

        user.token
            .ok_or_else(|| ReportError::Auth("Token endpoint returned no access token".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap()
    }

    fn user(token: Option<&str>, refresh: Option<&str>, expiry: DateTime<Utc>) -> AuthorizedUser {
        AuthorizedUser {
            token: token.map(str::to_string),
            refresh_token: refresh.map(str::to_string),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            scopes: vec![SPREADSHEETS_READONLY.into()],
            expiry: Some(expiry),
        }
    }

    #[test]
    fn test_plan_uses_valid_token() {
        let stored = user(Some("at"), Some("rt"), now() + Duration::hours(1));
        assert_eq!(
            plan_token_action(Some(stored), now()),
            TokenAction::UseStored("at".into())
        );
    }

    #[test]
    fn test_plan_refreshes_expired_token() {
        let stored = user(Some("at"), Some("rt"), now() - Duration::hours(1));
        assert!(matches!(
            plan_token_action(Some(stored), now()),
            TokenAction::Refresh(_)
        ));
    }

    #[test]
    fn test_plan_authorizes_without_refresh_token() {
        let stored = user(Some("at"), None, now() - Duration::hours(1));
        assert_eq!(plan_token_action(Some(stored), now()), TokenAction::Authorize);
        assert_eq!(plan_token_action(None, now()), TokenAction::Authorize);
    }

    #[test]
    fn test_access_token_reads_stored_token() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());
        let stored = user(Some("stored"), Some("rt"), Utc::now() + Duration::hours(1));
        write_json_atomic(paths.token_file(), &stored).unwrap();

        let provider = CredentialProvider::new(&paths).unwrap();
        assert_eq!(provider.access_token().unwrap(), "stored");
    }

    #[test]
    fn test_access_token_without_any_credentials_fails() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ReportPaths::with_base_dir(temp_dir.path().to_path_buf());

        let provider = CredentialProvider::new(&paths).unwrap();
        let err = provider.access_token().unwrap_err();
        assert!(matches!(err, ReportError::Auth(_)));
        assert!(!paths.token_file().exists());
    }
}
