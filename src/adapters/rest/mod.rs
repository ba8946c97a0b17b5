//! Hosted store integration over HTTPS
//!
//! Talks to the project's PostgREST endpoint (`/rest/v1`) for data and its
//! auth endpoint (`/auth/v1`) for password sign-in.

pub mod adapter;
pub mod auth;
pub mod client;
pub mod models;

pub use adapter::RestStore;
pub use client::RestClient;
