//! Serverless functions behind the SystemCraft site: contact and quote forms,
//! account invitations, and the client dashboard's projects lookup.
//!
//! Each function is its own binary under `src/bin/`; everything they share
//! lives here.

pub mod config;
pub mod error;
pub mod handlers;
pub mod http;
pub mod mail;
pub mod models;
pub mod store;
