// src/google.rs
use reqwest::Url;
use serde::Deserialize;

use crate::config::Config;
use crate::error::AppError;

const AUTH_URL: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const TOKEN_URL: &str = "https://oauth2.googleapis.com/token";
const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// The identity claims we keep from the provider's userinfo response.
#[derive(Debug, Deserialize)]
pub struct GoogleUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub picture: String,
}

/// Build the consent URL the browser gets redirected to. `state` is an
/// opaque echo value carrying the post-login redirect target.
pub fn consent_url(config: &Config, state: &str) -> String {
    let mut params = vec![
        ("client_id", config.google_client_id.as_str()),
        ("redirect_uri", config.google_redirect_uri.as_str()),
        ("response_type", "code"),
        ("scope", "openid email profile"),
        ("access_type", "offline"),
        ("prompt", "consent"),
        ("hd", config.allowed_domain.as_str()),
    ];
    if !state.is_empty() {
        params.push(("state", state));
    }
    Url::parse_with_params(AUTH_URL, &params)
        .expect("consent base url is valid")
        .to_string()
}

/// Exchange a one-time authorization code for the user's identity.
///
/// Two upstream calls: code -> access token, then access token ->
/// userinfo. The code is single-use, so a failure here surfaces to the
/// caller instead of being retried.
pub async fn exchange_code(config: &Config, code: &str) -> Result<GoogleUser, AppError> {
    let client = reqwest::Client::new();

    let token_resp = client
        .post(TOKEN_URL)
        .form(&[
            ("code", code),
            ("client_id", config.google_client_id.as_str()),
            ("client_secret", config.google_client_secret.as_str()),
            ("redirect_uri", config.google_redirect_uri.as_str()),
            ("grant_type", "authorization_code"),
        ])
        .send()
        .await
        .map_err(|e| AppError::UpstreamAuth(e.to_string()))?;
    if !token_resp.status().is_success() {
        return Err(AppError::UpstreamAuth(format!(
            "token endpoint returned {}",
            token_resp.status()
        )));
    }
    let tokens: TokenResponse = token_resp
        .json()
        .await
        .map_err(|e| AppError::UpstreamAuth(e.to_string()))?;

    let user_resp = client
        .get(USERINFO_URL)
        .bearer_auth(&tokens.access_token)
        .send()
        .await
        .map_err(|e| AppError::UpstreamAuth(e.to_string()))?;
    if !user_resp.status().is_success() {
        return Err(AppError::UpstreamAuth(format!(
            "userinfo endpoint returned {}",
            user_resp.status()
        )));
    }

    user_resp
        .json()
        .await
        .map_err(|e| AppError::UpstreamAuth(e.to_string()))
}

/// Domain restriction check applied after the exchange, before any
/// user record exists.
pub fn email_matches_domain(email: &str, domain: &str) -> bool {
    email.ends_with(&format!("@{domain}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> Config {
        Config {
            port: 8000,
            database_url: "postgres://localhost/test".into(),
            google_client_id: "client-123".into(),
            google_client_secret: "secret".into(),
            google_redirect_uri: "http://localhost:8000/api/auth/callback".into(),
            jwt_secret: "secret".into(),
            allowed_origins: vec![],
            allowed_domain: "example.edu".into(),
            frontend_url: "http://localhost:3000".into(),
        }
    }

    #[test]
    fn consent_url_carries_required_params() {
        let url = consent_url(&test_config(), "");
        assert!(url.starts_with(AUTH_URL));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("hd=example.edu"));
        // redirect_uri must be query-encoded
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8000%2Fapi%2Fauth%2Fcallback"));
        assert!(!url.contains("state="));
    }

    #[test]
    fn consent_url_echoes_state() {
        let url = consent_url(&test_config(), "https://frontend/page");
        assert!(url.contains("state=https%3A%2F%2Ffrontend%2Fpage"));
    }

    #[test]
    fn domain_check_requires_exact_suffix() {
        assert!(email_matches_domain("student@example.edu", "example.edu"));
        assert!(!email_matches_domain("student@gmail.com", "example.edu"));
        // a lookalike suffix on another domain must not pass
        assert!(!email_matches_domain("student@notexample.edu", "example.edu"));
        assert!(!email_matches_domain("example.edu", "example.edu"));
    }
}
