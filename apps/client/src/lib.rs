//! PerfectCV client: authenticated HTTP access to the resume-optimization
//! backend, plus the development proxy and connectivity diagnostics that
//! ship alongside it.

pub mod api;
pub mod auth;
pub mod config;
pub mod diagnostics;
pub mod errors;
pub mod models;
pub mod proxy;
pub mod services;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, Outcome};
pub use config::Config;
pub use errors::{ClientError, TokenError};
pub use services::Services;
