//! HTTP client for the hosted store's REST interface
//!
//! Wraps `reqwest` with the headers every PostgREST call needs (`apikey` plus
//! a bearer token) and maps HTTP failures to [`StoreError`].

use super::models::ApiErrorBody;
use crate::config::{RestConfig, SecretString};
use crate::domain::{AgendaError, Result, StoreError};
use reqwest::{Client, ClientBuilder, RequestBuilder, Response};
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

type StoreResult<T> = std::result::Result<T, StoreError>;

/// Client for `/rest/v1` and `/auth/v1` on one project
#[derive(Debug, Clone)]
pub struct RestClient {
    base_url: String,
    http: Client,
    api_key: SecretString,
    access_token: Option<SecretString>,
}

impl RestClient {
    /// Creates a client without a user token
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &RestConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds));

        if !config.tls_verify {
            tracing::warn!(
                base_url = %config.base_url,
                "TLS certificate verification is DISABLED for the REST store. \
                Use this only in development."
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let http = builder.build().map_err(|e| {
            AgendaError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            api_key: config.api_key.clone(),
            access_token: None,
        })
    }

    /// Returns a copy of this client that authenticates as a signed-in user
    pub fn with_access_token(&self, token: SecretString) -> Self {
        Self {
            access_token: Some(token),
            ..self.clone()
        }
    }

    /// Project base URL
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub(crate) fn auth_url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    /// Adds `apikey` and `Authorization` headers
    ///
    /// Without a user token the API key is sent as the bearer.
    pub(crate) fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_ref().unwrap_or(&self.api_key);
        request
            .header("apikey", self.api_key.expose_secret().as_str())
            .bearer_auth(bearer.expose_secret().as_str())
    }

    pub(crate) fn http(&self) -> &Client {
        &self.http
    }

    /// GET rows from a table
    pub async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> StoreResult<Vec<T>> {
        let request = self.authorize(self.http.get(self.rest_url(table))).query(query);
        let response = send(request).await?;
        response
            .json::<Vec<T>>()
            .await
            .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse {table} rows: {e}")))
    }

    /// POST one row
    pub async fn insert<B: Serialize + ?Sized>(&self, table: &str, body: &B) -> StoreResult<()> {
        let request = self
            .authorize(self.http.post(self.rest_url(table)))
            .header("Prefer", "return=minimal")
            .json(body);
        send(request).await.map(|_| ())
    }

    /// PATCH rows matching `query`, returning how many changed
    pub async fn update<B: Serialize + ?Sized>(
        &self,
        table: &str,
        query: &[(&str, String)],
        body: &B,
    ) -> StoreResult<u64> {
        let request = self
            .authorize(self.http.patch(self.rest_url(table)))
            .query(query)
            .header("Prefer", "return=representation")
            .json(body);
        count_rows(send(request).await?).await
    }

    /// DELETE rows matching `query`, returning how many were removed
    pub async fn delete(&self, table: &str, query: &[(&str, String)]) -> StoreResult<u64> {
        let request = self
            .authorize(self.http.delete(self.rest_url(table)))
            .query(query)
            .header("Prefer", "return=representation");
        count_rows(send(request).await?).await
    }
}

/// Sends a request and turns transport errors and non-2xx statuses into
/// [`StoreError`]
pub(crate) async fn send(request: RequestBuilder) -> StoreResult<Response> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            StoreError::Timeout(e.to_string())
        } else {
            StoreError::ConnectionFailed(e.to_string())
        }
    })?;

    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    Err(StoreError::from_status(
        status.as_u16(),
        ApiErrorBody::describe(&body),
    ))
}

async fn count_rows(response: Response) -> StoreResult<u64> {
    let rows: Vec<serde_json::Value> = response
        .json()
        .await
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse mutation result: {e}")))?;
    Ok(rows.len() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::secret_string;

    fn config(base_url: &str) -> RestConfig {
        RestConfig {
            base_url: base_url.to_string(),
            api_key: secret_string("anon".to_string()),
            timeout_seconds: 5,
            tls_verify: true,
        }
    }

    #[test]
    fn test_urls_strip_trailing_slash() {
        let client = RestClient::new(&config("https://project.supabase.co/")).unwrap();
        assert_eq!(
            client.rest_url("tb_patients"),
            "https://project.supabase.co/rest/v1/tb_patients"
        );
        assert_eq!(
            client.auth_url("logout"),
            "https://project.supabase.co/auth/v1/logout"
        );
    }

    #[tokio::test]
    async fn test_bearer_uses_access_token_when_present() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/rest/v1/tb_patients")
            .match_header("apikey", "anon")
            .match_header("authorization", "Bearer user-jwt")
            .with_status(200)
            .with_body("[]")
            .create_async()
            .await;

        let client = RestClient::new(&config(&server.url()))
            .unwrap()
            .with_access_token(secret_string("user-jwt".to_string()));
        let rows: Vec<serde_json::Value> = client.select("tb_patients", &[]).await.unwrap();
        assert!(rows.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_error_status_is_classified() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/rest/v1/tb_appointments")
            .with_status(409)
            .with_body(r#"{"code":"23505","message":"duplicate key value"}"#)
            .create_async()
            .await;

        let client = RestClient::new(&config(&server.url())).unwrap();
        let err = client
            .insert("tb_appointments", &serde_json::json!({}))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            StoreError::ConstraintViolation("duplicate key value".to_string())
        );
    }
}
