//! Password sign-in against the hosted auth service
//!
//! `POST /auth/v1/token?grant_type=password` exchanges an email and password
//! for an access token and the user's id; `POST /auth/v1/logout` revokes it.

use super::client::{send, RestClient};
use super::models::{PasswordGrantRequest, TokenResponse};
use crate::config::{secret_string, SecretString};
use crate::domain::{AgendaError, Session, StoreError, UserId};
use secrecy::ExposeSecret;

/// Signs in and moves `session` to authenticated
///
/// On failure the session returns to anonymous and a
/// [`AgendaError::Session`] is returned.
pub async fn sign_in_with_password(
    client: &RestClient,
    session: &mut Session,
    email: &str,
    password: &SecretString,
) -> crate::domain::Result<()> {
    session.begin_authentication()?;

    match request_token(client, email, password).await {
        Ok((user_id, token)) => {
            tracing::info!(user_id = %user_id, "Signed in");
            session.complete_authentication(user_id, Some(token))
        }
        Err(e) => {
            session.fail_authentication()?;
            Err(AgendaError::Session(format!("Sign-in failed: {e}")))
        }
    }
}

/// Revokes the session's token and moves it to signed-out
pub async fn sign_out(client: &RestClient, session: &mut Session) -> crate::domain::Result<()> {
    if let Some(token) = session.access_token() {
        let user_client = client.with_access_token(token.clone());
        let request = user_client.authorize(user_client.http().post(user_client.auth_url("logout")));
        if let Err(e) = send(request).await {
            // The local session ends regardless of whether revocation worked
            tracing::warn!(error = %e, "Token revocation failed");
        }
    }
    session.sign_out()
}

async fn request_token(
    client: &RestClient,
    email: &str,
    password: &SecretString,
) -> std::result::Result<(UserId, SecretString), StoreError> {
    tracing::debug!(email = %email, "Requesting access token with password grant");

    let body = PasswordGrantRequest {
        email,
        password: password.expose_secret().as_str(),
    };
    let request = client
        .authorize(client.http().post(client.auth_url("token")))
        .query(&[("grant_type", "password")])
        .json(&body);

    let response: TokenResponse = send(request)
        .await?
        .json()
        .await
        .map_err(|e| StoreError::InvalidResponse(format!("Failed to parse token response: {e}")))?;

    let user_id = UserId::new(response.user.id).map_err(StoreError::InvalidResponse)?;
    tracing::debug!(expires_in = ?response.expires_in, "Access token acquired");
    Ok((user_id, secret_string(response.access_token)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RestConfig;

    fn client(url: &str) -> RestClient {
        RestClient::new(&RestConfig {
            base_url: url.to_string(),
            api_key: secret_string("anon".to_string()),
            timeout_seconds: 5,
            tls_verify: true,
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_sign_in_success() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::UrlEncoded(
                "grant_type".into(),
                "password".into(),
            ))
            .match_body(mockito::Matcher::PartialJsonString(
                r#"{"email":"ana@example.com"}"#.to_string(),
            ))
            .with_status(200)
            .with_body(r#"{"access_token":"jwt","expires_in":3600,"user":{"id":"u-42"}}"#)
            .create_async()
            .await;

        let mut session = Session::new();
        sign_in_with_password(
            &client(&server.url()),
            &mut session,
            "ana@example.com",
            &secret_string("pw".to_string()),
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert_eq!(session.user_id().unwrap().as_str(), "u-42");
        assert!(session.access_token().is_some());
    }

    #[tokio::test]
    async fn test_sign_in_rejected_returns_to_anonymous() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
            .create_async()
            .await;

        let mut session = Session::new();
        let err = sign_in_with_password(
            &client(&server.url()),
            &mut session,
            "ana@example.com",
            &secret_string("wrong".to_string()),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Invalid login credentials"));
        assert_eq!(session.state_name(), "anonymous");
    }

    #[tokio::test]
    async fn test_sign_out_revokes_token() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/auth/v1/logout")
            .match_header("authorization", "Bearer jwt")
            .with_status(204)
            .create_async()
            .await;

        let mut session = Session::authenticated(
            UserId::new("u-42").unwrap(),
            Some(secret_string("jwt".to_string())),
        );
        sign_out(&client(&server.url()), &mut session).await.unwrap();

        mock.assert_async().await;
        assert_eq!(session.state_name(), "signed-out");
    }
}
