//! Configuration loader with TOML parsing and environment variable overrides

use super::schema::{AgendaConfig, StoreTarget};
use super::secret::secret_string;
use crate::domain::errors::AgendaError;
use crate::domain::result::Result;
use regex::Regex;
use std::fs;
use std::path::Path;

/// Loads configuration from a TOML file
///
/// This function:
/// 1. Reads the TOML file
/// 2. Performs environment variable substitution (${VAR} syntax)
/// 3. Parses the TOML into AgendaConfig
/// 4. Applies environment variable overrides (AGENDA_* prefix)
/// 5. Validates the configuration
///
/// # Errors
///
/// Returns an error if:
/// - File cannot be read
/// - TOML parsing fails
/// - A referenced environment variable is not set
/// - Configuration validation fails
///
/// # Examples
///
/// ```no_run
/// use agenda::config::loader::load_config;
///
/// let config = load_config("agenda.toml").expect("Failed to load config");
/// ```
pub fn load_config(path: impl AsRef<Path>) -> Result<AgendaConfig> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(AgendaError::Configuration(format!(
            "Configuration file not found: {}",
            path.display()
        )));
    }

    let contents = fs::read_to_string(path).map_err(|e| {
        AgendaError::Configuration(format!(
            "Failed to read configuration file {}: {}",
            path.display(),
            e
        ))
    })?;

    parse_config(&contents)
}

/// Parses and validates configuration from TOML text
///
/// Runs the same substitution, override and validation steps as
/// [`load_config`].
pub fn parse_config(contents: &str) -> Result<AgendaConfig> {
    let contents = substitute_env_vars(contents)?;

    let mut config: AgendaConfig = toml::from_str(&contents)
        .map_err(|e| AgendaError::Configuration(format!("Failed to parse TOML: {}", e)))?;

    apply_env_overrides(&mut config)?;

    config.validate().map_err(|e| {
        AgendaError::Configuration(format!("Configuration validation failed: {}", e))
    })?;

    Ok(config)
}

/// Substitutes environment variables in the format ${VAR_NAME}
///
/// Comment lines are left untouched. Every missing variable is reported in a
/// single error.
fn substitute_env_vars(input: &str) -> Result<String> {
    let re = Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
        .map_err(|e| AgendaError::Configuration(format!("Invalid substitution pattern: {e}")))?;
    let mut result = String::with_capacity(input.len());
    let mut missing_vars: Vec<String> = Vec::new();

    for line in input.lines() {
        if line.trim_start().starts_with('#') {
            result.push_str(line);
            result.push('\n');
            continue;
        }

        let processed = re.replace_all(line, |caps: &regex::Captures| {
            let var_name = &caps[1];
            match std::env::var(var_name) {
                Ok(value) => value,
                Err(_) => {
                    if !missing_vars.iter().any(|v| v == var_name) {
                        missing_vars.push(var_name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        });
        result.push_str(&processed);
        result.push('\n');
    }

    if !missing_vars.is_empty() {
        return Err(AgendaError::Configuration(format!(
            "Missing required environment variables: {}",
            missing_vars.join(", ")
        )));
    }

    Ok(result)
}

/// Applies environment variable overrides using the AGENDA_* prefix
///
/// Environment variables follow the pattern AGENDA_<SECTION>_<KEY>, for
/// example AGENDA_STORE_TARGET or AGENDA_SCHEDULE_DEFAULT_TIME.
fn apply_env_overrides(config: &mut AgendaConfig) -> Result<()> {
    // Application overrides
    if let Ok(val) = std::env::var("AGENDA_APPLICATION_LOG_LEVEL") {
        config.application.log_level = val;
    }

    // Session overrides
    if let Ok(val) = std::env::var("AGENDA_SESSION_USER_ID") {
        config.session.user_id = Some(val);
    }
    if let Ok(val) = std::env::var("AGENDA_SESSION_EMAIL") {
        config.session.email = Some(val);
    }
    if let Ok(val) = std::env::var("AGENDA_SESSION_PASSWORD") {
        config.session.password = Some(secret_string(val));
    }

    // Store overrides
    if let Ok(val) = std::env::var("AGENDA_STORE_TARGET") {
        config.store.target = match val.to_lowercase().as_str() {
            "rest" => StoreTarget::Rest,
            "postgresql" => StoreTarget::PostgreSQL,
            "memory" => StoreTarget::Memory,
            other => {
                return Err(AgendaError::Configuration(format!(
                    "Invalid AGENDA_STORE_TARGET '{other}'. Must be one of: rest, postgresql, memory"
                )))
            }
        };
    }
    if let Some(ref mut rest) = config.store.rest {
        if let Ok(val) = std::env::var("AGENDA_STORE_REST_BASE_URL") {
            rest.base_url = val;
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_REST_API_KEY") {
            rest.api_key = secret_string(val);
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_REST_TIMEOUT_SECONDS") {
            if let Ok(timeout) = val.parse() {
                rest.timeout_seconds = timeout;
            }
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_REST_TLS_VERIFY") {
            rest.tls_verify = val.parse().unwrap_or(true);
        }
    }
    if let Some(ref mut pg) = config.store.postgresql {
        if let Ok(val) = std::env::var("AGENDA_STORE_POSTGRESQL_CONNECTION_STRING") {
            pg.connection_string = secret_string(val);
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_POSTGRESQL_MAX_CONNECTIONS") {
            if let Ok(max) = val.parse() {
                pg.max_connections = max;
            }
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_POSTGRESQL_SSL_MODE") {
            pg.ssl_mode = val;
        }
        if let Ok(val) = std::env::var("AGENDA_STORE_POSTGRESQL_APPLY_MIGRATIONS") {
            pg.apply_migrations = val.parse().unwrap_or(false);
        }
    }

    // Schedule overrides
    if let Ok(val) = std::env::var("AGENDA_SCHEDULE_DEFAULT_TIME") {
        config.schedule.default_time = val;
    }
    if let Ok(val) = std::env::var("AGENDA_SCHEDULE_STRICT_SLOT_MATCHING") {
        config.schedule.strict_slot_matching = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("AGENDA_SCHEDULE_ALLOW_PAST_DATES") {
        config.schedule.allow_past_dates = val.parse().unwrap_or(false);
    }

    // Logging overrides
    if let Ok(val) = std::env::var("AGENDA_LOGGING_LOCAL_ENABLED") {
        config.logging.local_enabled = val.parse().unwrap_or(false);
    }
    if let Ok(val) = std::env::var("AGENDA_LOGGING_LOCAL_PATH") {
        config.logging.local_path = val;
    }
    if let Ok(val) = std::env::var("AGENDA_LOGGING_LOCAL_ROTATION") {
        config.logging.local_rotation = val;
    }

    Ok(())
}
