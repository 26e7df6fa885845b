//! Stored OAuth credentials
//!
//! `token.json` uses the "authorized user" layout, so a token written by
//! other Google client libraries can be reused as-is. Unknown fields are
//! ignored on read.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Tokens are treated as expired this long before their actual expiry
const EXPIRY_SKEW_SECS: i64 = 60;

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Credentials of an authorized user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthorizedUser {
    /// Current access token
    #[serde(default)]
    pub token: Option<String>,

    /// Long-lived refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Endpoint used for refreshing
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    pub client_id: String,

    pub client_secret: String,

    /// Scopes granted to the token
    #[serde(default)]
    pub scopes: Vec<String>,

    /// Expiry of the access token
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry: Option<DateTime<Utc>>,
}

/// Successful response of the token endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub scope: Option<String>,
}

impl AuthorizedUser {
    /// Build credentials from a fresh authorization-code exchange
    pub fn from_response(
        client_id: &str,
        client_secret: &str,
        token_uri: &str,
        scopes: &[String],
        response: TokenResponse,
        now: DateTime<Utc>,
    ) -> Self {
        let mut user = Self {
            token: None,
            refresh_token: None,
            token_uri: token_uri.to_string(),
            client_id: client_id.to_string(),
            client_secret: client_secret.to_string(),
            scopes: scopes.to_vec(),
            expiry: None,
        };
        user.apply(response, now);
        user
    }

    /// Merge a token endpoint response; the refresh token is kept when the
    /// response does not rotate it
    pub fn apply(&mut self, response: TokenResponse, now: DateTime<Utc>) {
        self.token = Some(response.access_token);
        self.expiry = response
            .expires_in
            .map(|secs| now + Duration::seconds(secs));
        if let Some(refresh) = response.refresh_token {
            self.refresh_token = Some(refresh);
        }
        if let Some(scope) = response.scope {
            self.scopes = scope.split_whitespace().map(str::to_string).collect();
        }
    }

    /// Whether the access token has expired (or is about to)
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expiry
            .map(|expiry| now + Duration::seconds(EXPIRY_SKEW_SECS) >= expiry)
            .unwrap_or(false)
    }

    /// Whether the access token can be used as-is
    pub fn is_valid(&self, now: DateTime<Utc>) -> bool {
        self.token.is_some() && !self.is_expired(now)
    }

    /// Whether a refresh can be attempted
    pub fn can_refresh(&self) -> bool {
        self.refresh_token.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 2, 10, 12, 0, 0).unwrap()
    }

    fn user(expiry: Option<DateTime<Utc>>) -> AuthorizedUser {
        AuthorizedUser {
            token: Some("ya29.token".into()),
            refresh_token: Some("1//refresh".into()),
            token_uri: default_token_uri(),
            client_id: "id".into(),
            client_secret: "secret".into(),
            scopes: vec![],
            expiry,
        }
    }

    #[test]
    fn test_reads_authorized_user_file() {
        let json = r#"{
            "token": "ya29.a0",
            "refresh_token": "1//0g",
            "token_uri": "https://oauth2.googleapis.com/token",
            "client_id": "123.apps.googleusercontent.com",
            "client_secret": "shh",
            "scopes": ["https://www.googleapis.com/auth/spreadsheets.readonly"],
            "universe_domain": "googleapis.com",
            "account": "",
            "expiry": "2024-02-10T12:34:56.789012Z"
        }"#;
        let user: AuthorizedUser = serde_json::from_str(json).unwrap();
        assert_eq!(user.token.as_deref(), Some("ya29.a0"));
        assert_eq!(user.scopes.len(), 1);
        assert!(user.is_valid(now()));
        assert!(!user.is_valid(now() + Duration::hours(1)));
    }

    #[test]
    fn test_expiry_skew() {
        let u = user(Some(now() + Duration::seconds(30)));
        assert!(u.is_expired(now()));
        let u = user(Some(now() + Duration::minutes(10)));
        assert!(!u.is_expired(now()));
    }

    #[test]
    fn test_no_expiry_is_valid() {
        assert!(user(None).is_valid(now()));
        let mut u = user(None);
        u.token = None;
        assert!(!u.is_valid(now()));
    }

    #[test]
    fn test_apply_keeps_refresh_token() {
        let mut u = user(Some(now()));
        u.apply(
            TokenResponse {
                access_token: "new".into(),
                expires_in: Some(3599),
                refresh_token: None,
                scope: None,
            },
            now(),
        );
        assert_eq!(u.token.as_deref(), Some("new"));
        assert_eq!(u.refresh_token.as_deref(), Some("1//refresh"));
        assert_eq!(u.expiry, Some(now() + Duration::seconds(3599)));
    }

    #[test]
    fn test_from_response() {
        let scopes = vec!["scope-a".to_string()];
        let u = AuthorizedUser::from_response(
            "id",
            "secret",
            "https://example.test/token",
            &scopes,
            TokenResponse {
                access_token: "at".into(),
                expires_in: None,
                refresh_token: Some("rt".into()),
                scope: Some("scope-a scope-b".into()),
            },
            now(),
        );
        assert!(u.can_refresh());
        assert_eq!(u.scopes, vec!["scope-a", "scope-b"]);
        assert_eq!(u.token_uri, "https://example.test/token");
    }
}
