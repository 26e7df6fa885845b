//! OAuth client descriptor (`credentials.json`)

use std::path::Path;

use serde::Deserialize;

use crate::error::{ReportError, ReportResult};
use crate::storage::read_json_required;

fn default_auth_uri() -> String {
    "https://accounts.google.com/o/oauth2/auth".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Client identity used for the consent flow
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ClientSecret {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_auth_uri")]
    pub auth_uri: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
    #[serde(default)]
    pub redirect_uris: Vec<String>,
}

/// Top-level layout of a downloaded client secret file
#[derive(Debug, Deserialize)]
struct ClientSecretFile {
    installed: Option<ClientSecret>,
    web: Option<ClientSecret>,
}

impl ClientSecret {
    /// Load a descriptor of either the "installed" or "web" application type
    pub fn load(path: &Path) -> ReportResult<Self> {
        let file: ClientSecretFile = read_json_required(path).map_err(|e| match e {
            ReportError::NotFound { .. } => ReportError::Auth(format!(
                "No usable token and no client secret file at {}",
                path.display()
            )),
            other => other,
        })?;

        file.installed.or(file.web).ok_or_else(|| {
            ReportError::Auth(format!(
                "{} has neither an \"installed\" nor a \"web\" section",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_installed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        std::fs::write(
            &path,
            r#"{"installed": {"client_id": "id", "project_id": "p", "client_secret": "s",
                "auth_uri": "https://accounts.google.com/o/oauth2/auth",
                "token_uri": "https://oauth2.googleapis.com/token",
                "redirect_uris": ["http://localhost"]}}"#,
        )
        .unwrap();

        let secret = ClientSecret::load(&path).unwrap();
        assert_eq!(secret.client_id, "id");
        assert_eq!(secret.redirect_uris, vec!["http://localhost"]);
    }

    #[test]
    fn test_load_web_with_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"web": {"client_id": "id", "client_secret": "s"}}"#).unwrap();

        let secret = ClientSecret::load(&path).unwrap();
        assert_eq!(secret.token_uri, default_token_uri());
        assert_eq!(secret.auth_uri, default_auth_uri());
    }

    #[test]
    fn test_missing_file_is_auth_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");

        let err = ClientSecret::load(&path).unwrap_err();
        assert!(matches!(err, ReportError::Auth(_)));
        assert!(err.to_string().contains("credentials.json"));
    }

    #[test]
    fn test_missing_section() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("credentials.json");
        std::fs::write(&path, r#"{"other": {}}"#).unwrap();

        assert!(matches!(
            ClientSecret::load(&path),
            Err(ReportError::Auth(_))
        ));
    }
}
