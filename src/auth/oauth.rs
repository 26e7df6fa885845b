//! OAuth 2.0 token endpoint calls and the installed-app consent flow
//!
//! The consent flow listens on a loopback port, prints the consent URL and
//! waits for the browser to be redirected back with an authorization code.
//! The code is bound to this run by a random `state` and an S256 PKCE
//! challenge.

use std::io::{BufRead, BufReader, Write};
use std::net::{TcpListener, TcpStream};

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{DateTime, Utc};
use log::{debug, info};
use reqwest::blocking::{Client, Response};
use reqwest::Url;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use uuid::Uuid;

use super::client_secret::ClientSecret;
use super::token::{AuthorizedUser, TokenResponse};
use crate::error::{ReportError, ReportResult};

const SUCCESS_PAGE: &str = "<html><body><p>The authentication flow has completed. \
                            You may close this window.</p></body></html>";

/// Error body of the token endpoint
#[derive(Debug, Deserialize)]
struct TokenError {
    error: String,
    #[serde(default)]
    error_description: Option<String>,
}

/// PKCE verifier and its S256 challenge
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pkce {
    pub verifier: String,
    pub challenge: String,
}

impl Pkce {
    /// Fresh random verifier of 64 hex characters
    pub fn new() -> Self {
        Self::from_verifier(format!(
            "{}{}",
            Uuid::new_v4().simple(),
            Uuid::new_v4().simple()
        ))
    }

    pub fn from_verifier(verifier: impl Into<String>) -> Self {
        let verifier = verifier.into();
        let challenge = URL_SAFE_NO_PAD.encode(Sha256::digest(verifier.as_bytes()));
        Self {
            verifier,
            challenge,
        }
    }
}

impl Default for Pkce {
    fn default() -> Self {
        Self::new()
    }
}

/// Talks to the OAuth authorization server
pub struct OAuthClient {
    http: Client,
}

impl OAuthClient {
    pub fn new() -> ReportResult<Self> {
        let http = Client::builder()
            .user_agent(concat!("expense-report/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { http })
    }

    /// Exchange a refresh token for a new access token
    pub fn refresh(&self, user: &AuthorizedUser, now: DateTime<Utc>) -> ReportResult<AuthorizedUser> {
        let refresh_token = user
            .refresh_token
            .as_deref()
            .ok_or_else(|| ReportError::Auth("Stored credentials have no refresh token".into()))?;

        let response = self
            .http
            .post(&user.token_uri)
            .form(&[
                ("grant_type", "refresh_token"),
                ("refresh_token", refresh_token),
                ("client_id", user.client_id.as_str()),
                ("client_secret", user.client_secret.as_str()),
            ])
            .send()?;

        let token = parse_token_response(response, "Token refresh")?;
        let mut refreshed = user.clone();
        refreshed.apply(token, now);
        Ok(refreshed)
    }

    /// Run the interactive consent flow and exchange the resulting code
    pub fn authorize(
        &self,
        secret: &ClientSecret,
        scopes: &[String],
        now: DateTime<Utc>,
    ) -> ReportResult<AuthorizedUser> {
        let listener = TcpListener::bind("127.0.0.1:0")
            .map_err(|e| ReportError::Auth(format!("Failed to open loopback listener: {}", e)))?;
        let port = listener.local_addr()?.port();
        let redirect_uri = format!("http://localhost:{}/", port);
        let state = new_state();
        let pkce = Pkce::new();

        let url = authorization_url(secret, &redirect_uri, scopes, &state, &pkce.challenge)?;
        info!("Waiting for authorization on {}", redirect_uri);
        println!("Please visit this URL to authorize this application: {}", url);

        let code = wait_for_code(&listener, &state)?;
        debug!("Received authorization code, exchanging for tokens");

        let response = self
            .http
            .post(&secret.token_uri)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code.as_str()),
                ("redirect_uri", redirect_uri.as_str()),
                ("client_id", secret.client_id.as_str()),
                ("client_secret", secret.client_secret.as_str()),
                ("code_verifier", pkce.verifier.as_str()),
            ])
            .send()?;

        let token = parse_token_response(response, "Authorization code exchange")?;
        Ok(AuthorizedUser::from_response(
            &secret.client_id,
            &secret.client_secret,
            &secret.token_uri,
            scopes,
            token,
            now,
        ))
    }
}

/// Build the consent URL for the loopback redirect
pub fn authorization_url(
    secret: &ClientSecret,
    redirect_uri: &str,
    scopes: &[String],
    state: &str,
    code_challenge: &str,
) -> ReportResult<Url> {
    let scope = scopes.join(" ");
    Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("response_type", "code"),
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("scope", scope.as_str()),
            ("state", state),
            ("code_challenge", code_challenge),
            ("code_challenge_method", "S256"),
            ("access_type", "offline"),
            ("prompt", "consent"),
        ],
    )
    .map_err(|e| ReportError::Auth(format!("Invalid auth_uri '{}': {}", secret.auth_uri, e)))
}

/// Extract the authorization code from the redirect's request line
///
/// Returns `Ok(None)` for unrelated requests such as `/favicon.ico`.
pub fn parse_callback(request_line: &str, expected_state: &str) -> ReportResult<Option<String>> {
    let target = request_line
        .split_whitespace()
        .nth(1)
        .ok_or_else(|| ReportError::Auth(format!("Malformed redirect request: {}", request_line)))?;

    let url = Url::parse("http://localhost")
        .and_then(|base| base.join(target))
        .map_err(|e| ReportError::Auth(format!("Malformed redirect target: {}", e)))?;

    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "error" => {
                return Err(ReportError::Auth(format!(
                    "Authorization was denied: {}",
                    value
                )))
            }
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            _ => {}
        }
    }

    match code {
        Some(_) if state.as_deref() != Some(expected_state) => Err(ReportError::Auth(
            "Authorization response state does not match the request".into(),
        )),
        other => Ok(other),
    }
}

fn wait_for_code(listener: &TcpListener, state: &str) -> ReportResult<String> {
    for stream in listener.incoming() {
        let mut stream = stream?;
        let mut request_line = String::new();
        BufReader::new(&stream).read_line(&mut request_line)?;

        match parse_callback(&request_line, state) {
            Ok(Some(code)) => {
                respond(&mut stream, "200 OK", SUCCESS_PAGE)?;
                return Ok(code);
            }
            Ok(None) => respond(&mut stream, "404 Not Found", "")?,
            Err(e) => {
                respond(&mut stream, "400 Bad Request", &e.to_string())?;
                return Err(e);
            }
        }
    }
    Err(ReportError::Auth("Loopback listener closed before authorization".into()))
}

fn respond(stream: &mut TcpStream, status: &str, body: &str) -> ReportResult<()> {
    write!(
        stream,
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    )?;
    stream.flush()?;
    Ok(())
}

fn parse_token_response(response: Response, action: &str) -> ReportResult<TokenResponse> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json()?);
    }

    let body = response.text().unwrap_or_default();
    let detail = match serde_json::from_str::<TokenError>(&body) {
        Ok(err) => match err.error_description {
            Some(description) => format!("{}: {}", err.error, description),
            None => err.error,
        },
        Err(_) => body,
    };
    Err(ReportError::Auth(format!("{} failed ({}): {}", action, status, detail)))
}

/// Anti-forgery value echoed back by the authorization server
fn new_state() -> String {
    Uuid::new_v4().simple().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret() -> ClientSecret {
        ClientSecret {
            client_id: "123.apps.googleusercontent.com".into(),
            client_secret: "shh".into(),
            auth_uri: "https://accounts.google.com/o/oauth2/auth".into(),
            token_uri: "https://oauth2.googleapis.com/token".into(),
            redirect_uris: vec![],
        }
    }

    #[test]
    fn test_authorization_url() {
        let scopes = vec!["https://www.googleapis.com/auth/spreadsheets.readonly".to_string()];
        let url = authorization_url(
            &secret(),
            "http://localhost:8080/",
            &scopes,
            "xyz",
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM",
        )
        .unwrap();
        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert!(url.as_str().starts_with("https://accounts.google.com/o/oauth2/auth?"));
        assert!(pairs.contains(&("response_type".into(), "code".into())));
        assert!(pairs.contains(&("redirect_uri".into(), "http://localhost:8080/".into())));
        assert!(pairs.contains(&("scope".into(), scopes[0].clone())));
        assert!(pairs.contains(&("state".into(), "xyz".into())));
        assert!(pairs.contains(&("access_type".into(), "offline".into())));
        assert!(pairs.contains(&(
            "code_challenge".into(),
            "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM".into()
        )));
        assert!(pairs.contains(&("code_challenge_method".into(), "S256".into())));
    }

    #[test]
    fn test_pkce_s256_challenge() {
        // Appendix B of RFC 7636
        let pkce = Pkce::from_verifier("dBjftJeZ4CVP-mB92K27uhbUJU1p1r_wW1gFWFOEjXk");
        assert_eq!(pkce.challenge, "E9Melhoa2OwvFrEMTJguCHaoeK1t8URWbuGJSstw-cM");
    }

    #[test]
    fn test_pkce_verifier_is_random() {
        let a = Pkce::new();
        let b = Pkce::new();
        assert_eq!(a.verifier.len(), 64);
        assert!(a.verifier.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a.verifier, b.verifier);
        assert_ne!(a.challenge, b.challenge);
    }

    #[test]
    fn test_parse_callback_code() {
        let line = "GET /?state=xyz&code=4%2F0Ab&scope=s HTTP/1.1\r\n";
        assert_eq!(parse_callback(line, "xyz").unwrap(), Some("4/0Ab".to_string()));
    }

    #[test]
    fn test_parse_callback_state_mismatch() {
        let line = "GET /?state=other&code=abc HTTP/1.1";
        assert!(matches!(parse_callback(line, "xyz"), Err(ReportError::Auth(_))));
    }

    #[test]
    fn test_parse_callback_denied() {
        let line = "GET /?error=access_denied&state=xyz HTTP/1.1";
        let err = parse_callback(line, "xyz").unwrap_err();
        assert_eq!(err.to_string(), "Authorization error: Authorization was denied: access_denied");
    }

    #[test]
    fn test_parse_callback_unrelated_request() {
        assert_eq!(parse_callback("GET /favicon.ico HTTP/1.1", "xyz").unwrap(), None);
        assert!(parse_callback("", "xyz").is_err());
    }

    #[test]
    fn test_new_state_is_hex() {
        let state = new_state();
        assert_eq!(state.len(), 32);
        assert!(state.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_new_state_differs_per_call() {
        assert_ne!(new_state(), new_state());
    }
}
