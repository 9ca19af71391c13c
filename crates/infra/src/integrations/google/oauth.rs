//! Google OAuth2 authorization-code flow.
//!
//! The application credentials are an explicit configuration value passed in
//! from the loader; there is no process-wide OAuth state.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::{Duration, Utc};
use openslot_domain::{GoogleConfig, OpenSlotError, Result, TokenSet};
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

const GOOGLE_AUTH_ENDPOINT: &str = "https://accounts.google.com/o/oauth2/v2/auth";
const GOOGLE_TOKEN_ENDPOINT: &str = "https://oauth2.googleapis.com/token";

/// Scopes requested during authorization. Calendar access is read-only; the
/// identity scopes provide the ID token the callback uses to learn which
/// user authorized.
const GOOGLE_SCOPES: &[&str] =
    &["https://www.googleapis.com/auth/calendar.readonly", "openid", "email"];

/// Google OAuth2 flow for the authorization-code grant.
pub struct GoogleOAuthFlow {
    config: GoogleConfig,
    http: Client,
    auth_endpoint: String,
    token_endpoint: String,
}

impl GoogleOAuthFlow {
    /// Create a flow against the Google endpoints.
    pub fn new(config: GoogleConfig) -> Self {
        Self {
            config,
            http: Client::new(),
            auth_endpoint: GOOGLE_AUTH_ENDPOINT.to_string(),
            token_endpoint: GOOGLE_TOKEN_ENDPOINT.to_string(),
        }
    }

    /// Override the provider endpoints (primarily for tests).
    pub fn with_endpoints(
        mut self,
        auth_endpoint: impl Into<String>,
        token_endpoint: impl Into<String>,
    ) -> Self {
        self.auth_endpoint = auth_endpoint.into();
        self.token_endpoint = token_endpoint.into();
        self
    }

    /// Authorization URL to open in the user's browser.
    ///
    /// `access_type=offline` and `prompt=consent` ask Google to issue a
    /// refresh token alongside the access token.
    pub fn authorization_url(&self, state: &str) -> Result<String> {
        let mut url = Url::parse(&self.auth_endpoint).map_err(|err| {
            OpenSlotError::Config(format!("invalid OAuth endpoint URL: {err}"))
        })?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.config.client_id)
            .append_pair("redirect_uri", &self.config.redirect_uri)
            .append_pair("response_type", "code")
            .append_pair("scope", &GOOGLE_SCOPES.join(" "))
            .append_pair("state", state)
            .append_pair("access_type", "offline")
            .append_pair("prompt", "consent");

        Ok(url.into())
    }

    /// Exchange an authorization code for a token set.
    pub async fn exchange_code(&self, code: &str) -> Result<TokenSet> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("code", code),
                ("grant_type", "authorization_code"),
                ("redirect_uri", self.config.redirect_uri.as_str()),
            ])
            .send()
            .await
            .map_err(|err| {
                OpenSlotError::Network(format!("token exchange request failed: {err}"))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenSlotError::Auth(format!(
                "token exchange failed ({status}): {error_text}"
            )));
        }

        let token: GoogleTokenResponse = response.json().await.map_err(|err| {
            OpenSlotError::Auth(format!("failed to parse token response: {err}"))
        })?;

        debug!("authorization code exchanged");
        Ok(token.into_token_set())
    }

    /// Refresh an expired access token.
    ///
    /// Google omits the refresh token from refresh responses; the returned
    /// set carries the one that was used.
    pub async fn refresh_access_token(&self, refresh_token: &str) -> Result<TokenSet> {
        let response = self
            .http
            .post(&self.token_endpoint)
            .form(&[
                ("client_id", self.config.client_id.as_str()),
                ("client_secret", self.config.client_secret.as_str()),
                ("refresh_token", refresh_token),
                ("grant_type", "refresh_token"),
            ])
            .send()
            .await
            .map_err(|err| OpenSlotError::Auth(format!("token refresh request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text =
                response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            return Err(OpenSlotError::Auth(format!(
                "token refresh failed ({status}): {error_text}"
            )));
        }

        let token: GoogleTokenResponse = response.json().await.map_err(|err| {
            OpenSlotError::Auth(format!("failed to parse token response: {err}"))
        })?;

        let mut tokens = token.into_token_set();
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token.to_string());
        }
        Ok(tokens)
    }
}

/// Extract the email claim from an ID token (JWT).
pub fn extract_email_from_id_token(id_token: &str) -> Result<String> {
    let parts: Vec<&str> = id_token.split('.').collect();
    if parts.len() != 3 {
        return Err(OpenSlotError::InvalidInput("invalid ID token format".into()));
    }

    let payload_bytes = URL_SAFE_NO_PAD.decode(parts[1]).map_err(|err| {
        OpenSlotError::InvalidInput(format!("failed to decode ID token payload: {err}"))
    })?;
    let payload_str = String::from_utf8(payload_bytes).map_err(|err| {
        OpenSlotError::InvalidInput(format!("invalid UTF-8 in ID token payload: {err}"))
    })?;

    let payload: serde_json::Value = serde_json::from_str(&payload_str).map_err(|err| {
        OpenSlotError::InvalidInput(format!("failed to parse ID token payload: {err}"))
    })?;

    payload
        .get("email")
        .and_then(|value| value.as_str())
        .map(str::to_string)
        .ok_or_else(|| OpenSlotError::InvalidInput("email claim missing from ID token".into()))
}

#[derive(Debug, Deserialize)]
struct GoogleTokenResponse {
    access_token: String,
    refresh_token: Option<String>,
    expires_in: i64,
    id_token: Option<String>,
}

impl GoogleTokenResponse {
    fn into_token_set(self) -> TokenSet {
        TokenSet {
            access_token: self.access_token,
            refresh_token: self.refresh_token,
            expires_at: Utc::now() + Duration::seconds(self.expires_in),
            id_token: self.id_token,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> GoogleConfig {
        GoogleConfig {
            client_id: "client-123".to_string(),
            client_secret: "secret".to_string(),
            redirect_uri: "http://localhost:8080/oauth2callback".to_string(),
        }
    }

    #[test]
    fn authorization_url_carries_offline_access() {
        let flow = GoogleOAuthFlow::new(config());
        let url = flow.authorization_url("state-xyz").unwrap();

        assert!(url.starts_with(GOOGLE_AUTH_ENDPOINT));
        assert!(url.contains("client_id=client-123"));
        assert!(url.contains("state=state-xyz"));
        assert!(url.contains("access_type=offline"));
        assert!(url.contains("prompt=consent"));
        assert!(url.contains("calendar.readonly"));
    }

    #[test]
    fn email_is_extracted_from_id_token_payload() {
        let payload = URL_SAFE_NO_PAD.encode(r#"{"email":"ada@example.com","aud":"x"}"#);
        let id_token = format!("header.{payload}.signature");

        assert_eq!(extract_email_from_id_token(&id_token).unwrap(), "ada@example.com");
    }

    #[test]
    fn malformed_id_token_is_rejected() {
        assert!(extract_email_from_id_token("not-a-jwt").is_err());

        let payload = URL_SAFE_NO_PAD.encode(r#"{"aud":"x"}"#);
        let id_token = format!("header.{payload}.signature");
        assert!(extract_email_from_id_token(&id_token).is_err());
    }
}
