//! Store and session factory
//!
//! Picks the backend named by `store.target` and resolves the session that
//! scopes every call. This is the composition root's only entry into the
//! adapters layer.

use crate::adapters::memory::MemoryStore;
use crate::adapters::postgresql::{PostgreSQLAdapter, PostgreSQLClient};
use crate::adapters::rest::{auth, RestClient, RestStore};
use crate::adapters::store::traits::ScheduleStore;
use crate::config::{AgendaConfig, PostgreSQLConfig, RestConfig, StoreTarget};
use crate::domain::{AgendaError, Result, Session, UserId};
use std::sync::Arc;

fn rest_config(config: &AgendaConfig) -> Result<&RestConfig> {
    config.store.rest.as_ref().ok_or_else(|| {
        AgendaError::Configuration("store.rest section is required for target rest".to_string())
    })
}

fn postgresql_config(config: &AgendaConfig) -> Result<&PostgreSQLConfig> {
    config.store.postgresql.as_ref().ok_or_else(|| {
        AgendaError::Configuration(
            "store.postgresql section is required for target postgresql".to_string(),
        )
    })
}

/// Resolves the signed-in user for the configured backend
///
/// The REST backend signs in with the configured email and password. The
/// other backends adopt `session.user_id` directly.
///
/// # Errors
///
/// Returns [`AgendaError::Session`] if sign-in fails and
/// [`AgendaError::Configuration`] if the needed credentials are missing.
pub async fn establish_session(config: &AgendaConfig) -> Result<Session> {
    let mut session = Session::new();

    match config.store.target {
        StoreTarget::Rest => {
            let email = config.session.email.as_deref().ok_or_else(|| {
                AgendaError::Configuration("session.email is required for target rest".to_string())
            })?;
            let password = config.session.password.as_ref().ok_or_else(|| {
                AgendaError::Configuration(
                    "session.password is required for target rest".to_string(),
                )
            })?;

            let client = RestClient::new(rest_config(config)?)?;
            auth::sign_in_with_password(&client, &mut session, email, password).await?;
        }
        StoreTarget::PostgreSQL | StoreTarget::Memory => {
            let raw = config.session.user_id.clone().ok_or_else(|| {
                AgendaError::Configuration(format!(
                    "session.user_id is required for target {}",
                    config.store.target
                ))
            })?;
            let user_id = UserId::new(raw).map_err(AgendaError::Configuration)?;

            session.begin_authentication()?;
            session.complete_authentication(user_id, None)?;
        }
    }

    tracing::debug!(
        backend = %config.store.target,
        state = session.state_name(),
        "Session established"
    );
    Ok(session)
}

/// Creates the store for the configured backend, scoped to `session`
///
/// # Errors
///
/// Returns an error if the session is not authenticated or the backend
/// client cannot be built.
pub async fn create_store(config: &AgendaConfig, session: &Session) -> Result<Arc<dyn ScheduleStore>> {
    session.user_id()?;

    match config.store.target {
        StoreTarget::Rest => {
            tracing::info!("Creating REST store");
            let mut client = RestClient::new(rest_config(config)?)?;
            if let Some(token) = session.access_token() {
                client = client.with_access_token(token.clone());
            }
            Ok(Arc::new(RestStore::new(client)) as Arc<dyn ScheduleStore>)
        }
        StoreTarget::PostgreSQL => {
            tracing::info!("Creating PostgreSQL store");
            let pg = postgresql_config(config)?;
            let client = PostgreSQLClient::new(pg.clone())?;
            if pg.apply_migrations {
                client
                    .ensure_schema()
                    .await
                    .map_err(|e| AgendaError::Connection(e.to_string()))?;
            }
            Ok(Arc::new(PostgreSQLAdapter::new(client)) as Arc<dyn ScheduleStore>)
        }
        StoreTarget::Memory => {
            tracing::warn!("Using the in-memory store; it starts empty and is discarded on exit");
            Ok(Arc::new(MemoryStore::new()) as Arc<dyn ScheduleStore>)
        }
    }
}

/// Ends the session, revoking the token on the REST backend
pub async fn end_session(config: &AgendaConfig, session: &mut Session) -> Result<()> {
    match config.store.target {
        StoreTarget::Rest => {
            let client = RestClient::new(rest_config(config)?)?;
            auth::sign_out(&client, session).await
        }
        StoreTarget::PostgreSQL | StoreTarget::Memory => session.sign_out(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, secret_string};

    fn unreachable_postgresql_config(apply_migrations: bool) -> AgendaConfig {
        let mut config = memory_config();
        config.store.target = StoreTarget::PostgreSQL;
        config.store.postgresql = Some(PostgreSQLConfig {
            connection_string: secret_string(
                "postgresql://agenda:pw@127.0.0.1:1/agenda".to_string(),
            ),
            max_connections: 1,
            connection_timeout_seconds: 1,
            statement_timeout_seconds: 1,
            ssl_mode: "disable".to_string(),
            apply_migrations,
        });
        config
    }

    fn memory_config() -> AgendaConfig {
        parse_config(
            r#"
[session]
user_id = "u-1"

[store]
target = "memory"
"#,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_memory_session_adopts_configured_user() {
        let config = memory_config();
        let session = establish_session(&config).await.unwrap();
        assert_eq!(session.user_id().unwrap().as_str(), "u-1");

        let store = create_store(&config, &session).await.unwrap();
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_create_store_requires_authenticated_session() {
        let config = memory_config();
        let result = create_store(&config, &Session::new()).await;
        assert!(matches!(result, Err(AgendaError::Session(_))));
    }

    #[tokio::test]
    async fn test_end_session() {
        let config = memory_config();
        let mut session = establish_session(&config).await.unwrap();
        end_session(&config, &mut session).await.unwrap();
        assert_eq!(session.state_name(), "signed-out");
    }

    #[tokio::test]
    async fn test_rest_session_signs_in() {
        let mut server = mockito::Server::new_async().await;
        let _token = server
            .mock("POST", "/auth/v1/token")
            .match_query(mockito::Matcher::Any)
            .with_status(200)
            .with_body(r#"{"access_token":"jwt","user":{"id":"u-9"}}"#)
            .create_async()
            .await;

        let mut config = memory_config();
        config.store.target = StoreTarget::Rest;
        config.store.rest = Some(RestConfig {
            base_url: server.url(),
            api_key: secret_string("anon".to_string()),
            timeout_seconds: 5,
            tls_verify: true,
        });
        config.session.email = Some("ana@example.com".to_string());
        config.session.password = Some(secret_string("pw".to_string()));

        let session = establish_session(&config).await.unwrap();
        assert_eq!(session.user_id().unwrap().as_str(), "u-9");

        let store = create_store(&config, &session).await.unwrap();
        assert_eq!(store.backend_name(), "rest");
    }

    #[tokio::test]
    async fn test_postgresql_store_skips_schema_bootstrap_by_default() {
        // Nothing listens on port 1: any statement at creation time would fail.
        let config = unreachable_postgresql_config(false);
        let session = establish_session(&config).await.unwrap();

        let store = create_store(&config, &session).await.unwrap();
        assert_eq!(store.backend_name(), "postgresql");
    }

    #[tokio::test]
    async fn test_postgresql_store_bootstraps_schema_when_enabled() {
        let config = unreachable_postgresql_config(true);
        let session = establish_session(&config).await.unwrap();

        let result = create_store(&config, &session).await;
        assert!(matches!(result, Err(AgendaError::Connection(_))));
    }
}
