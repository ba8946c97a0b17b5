//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file.

use super::{EXIT_CONFIG, EXIT_FATAL, EXIT_OK};
use clap::Args;
use std::fs;
use std::path::Path;

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "agenda.toml")]
    pub output: String,

    /// Include every section with comments
    #[arg(long)]
    pub with_examples: bool,

    /// Overwrite existing file
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output, "Initializing configuration file");

        println!("📝 Initializing Agenda configuration");
        println!();

        if Path::new(&self.output).exists() && !self.force {
            println!("❌ Configuration file already exists: {}", self.output);
            println!("   Use --force to overwrite");
            return Ok(EXIT_CONFIG);
        }

        let config_content = if self.with_examples {
            Self::generate_config_with_examples()
        } else {
            Self::generate_minimal_config()
        };

        match fs::write(&self.output, config_content) {
            Ok(_) => {
                println!("✅ Configuration file created: {}", self.output);
                println!();
                println!("Next steps:");
                println!("  1. Edit {} with your settings", self.output);
                println!("  2. Set store.target to 'rest' or 'postgresql'");
                println!("  3. Create a .env file with your credentials:");
                println!("     - Set AGENDA_API_KEY, AGENDA_EMAIL and AGENDA_PASSWORD (rest)");
                println!("     - Set AGENDA_PG_CONNECTION and AGENDA_USER_ID (postgresql)");
                println!("  4. Validate configuration: agenda validate-config");
                println!("  5. Show today's schedule: agenda day");
                println!();
                Ok(EXIT_OK)
            }
            Err(e) => {
                println!("❌ Failed to write configuration file");
                println!("   Error: {e}");
                Ok(EXIT_FATAL)
            }
        }
    }

    /// Generate minimal configuration
    fn generate_minimal_config() -> String {
        r#"# Agenda Configuration File

[application]
log_level = "info"

[session]
email = "${AGENDA_EMAIL}"
password = "${AGENDA_PASSWORD}"

[store]
target = "rest"  # rest | postgresql

[store.rest]
base_url = "https://your-project.supabase.co"
api_key = "${AGENDA_API_KEY}"

[schedule]
default_time = "09:00"
"#
        .to_string()
    }

    /// Generate configuration with every section documented
    fn generate_config_with_examples() -> String {
        r#"# Agenda Configuration File
#
# Values of the form ${VAR} are read from the environment (or a .env file).
# Any key can also be overridden with AGENDA_<SECTION>_<KEY>, for example
# AGENDA_STORE_TARGET=postgresql or AGENDA_SCHEDULE_DEFAULT_TIME=10:00.

# development | staging | production
environment = "development"

[application]
# trace | debug | info | warn | error
log_level = "info"

[session]
# The rest backend signs in with email and password
email = "${AGENDA_EMAIL}"
password = "${AGENDA_PASSWORD}"
# The postgresql backend acts as this user directly
# user_id = "${AGENDA_USER_ID}"

[store]
# rest | postgresql
# "memory" keeps appointments in the process only. Every command starts
# from an empty store, so it is only useful for tests.
target = "rest"

[store.rest]
base_url = "https://your-project.supabase.co"
api_key = "${AGENDA_API_KEY}"
timeout_seconds = 30
# Only allowed to be false outside production
tls_verify = true

# [store.postgresql]
# connection_string = "${AGENDA_PG_CONNECTION}"
# max_connections = 4
# connection_timeout_seconds = 30
# statement_timeout_seconds = 30
# ssl_mode = "prefer"  # disable | prefer | require
# Create the tables on connect. Needs CREATE rights on the schema.
# apply_migrations = false

[schedule]
# Time prefilled in the booking form (HH:mm)
default_time = "09:00"
# Fail instead of warning when two appointments share a slot
strict_slot_matching = false
# Allow selecting days before today
allow_past_dates = false

[logging]
local_enabled = false
local_path = "./logs"
local_rotation = "daily"  # daily | hourly
"#
        .to_string()
    }
}
