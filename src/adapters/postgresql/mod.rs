//! PostgreSQL store integration
//!
//! Reads and writes the `tb_patients` / `tb_appointments` tables directly,
//! for deployments that run the schema on their own database.

pub mod adapter;
pub mod client;
pub mod models;

pub use adapter::PostgreSQLAdapter;
pub use client::PostgreSQLClient;
