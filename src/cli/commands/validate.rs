//! Validate config command implementation
//!
//! This module implements the `validate-config` command. Loading already runs
//! every check, so a file that loads is valid.

use super::{EXIT_CONFIG, EXIT_OK};
use crate::config::{load_config, AgendaConfig, StoreTarget};
use clap::Args;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(&self, config_path: &str) -> anyhow::Result<i32> {
        tracing::info!(config_path = %config_path, "Validating configuration");

        println!("🔍 Validating configuration file: {config_path}");
        println!();

        match load_config(config_path) {
            Ok(config) => {
                println!("✅ Configuration is valid");
                println!();
                println!("Configuration Summary:");
                for line in summary(&config) {
                    println!("  {line}");
                }
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Configuration validation failed");
                println!("   Error: {e}");
                println!();
                Ok(EXIT_CONFIG)
            }
        }
    }
}

fn summary(config: &AgendaConfig) -> Vec<String> {
    let mut lines = vec![
        format!("Environment: {:?}", config.environment),
        format!("Log Level: {}", config.application.log_level),
        format!("Store Target: {}", config.store.target),
    ];

    match config.store.target {
        StoreTarget::Rest => {
            if let Some(ref rest) = config.store.rest {
                lines.push(format!("REST Endpoint: {}", rest.base_url));
                lines.push(format!("Timeout: {}s", rest.timeout_seconds));
            }
            if let Some(ref email) = config.session.email {
                lines.push(format!("Sign-in Email: {email}"));
            }
        }
        StoreTarget::PostgreSQL => {
            if let Some(ref pg) = config.store.postgresql {
                use secrecy::ExposeSecret;
                lines.push(format!(
                    "PostgreSQL Connection: {}",
                    pg.connection_string
                        .expose_secret()
                        .as_str()
                        .split('@')
                        .next_back()
                        .unwrap_or("***")
                ));
                lines.push(format!("Max Connections: {}", pg.max_connections));
                lines.push(format!("SSL Mode: {}", pg.ssl_mode));
            }
        }
        StoreTarget::Memory => {}
    }

    if let Some(ref user_id) = config.session.user_id {
        lines.push(format!("User: {user_id}"));
    }
    lines.push(format!("Default Time: {}", config.schedule.default_time));
    lines.push(format!(
        "Strict Slot Matching: {}",
        config.schedule.strict_slot_matching
    ));
    lines.push(format!("Allow Past Dates: {}", config.schedule.allow_past_dates));
    lines
}
