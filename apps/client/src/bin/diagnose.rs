//! Checks DNS, HTTP reachability, CORS and endpoint availability for the
//! configured API.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use perfectcv_client::auth::FileTokenStore;
use perfectcv_client::config::{resolve_api_base, Config};
use perfectcv_client::diagnostics::{diagnose, stored_token};

/// `diagnose` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "diagnose",
    about = "Check DNS, HTTP reachability, CORS and endpoint availability of the PerfectCV API",
    version
)]
struct CliArgs {
    /// API base URL. `/api/v1` is appended as for `API_URL`; defaults to the
    /// configured API.
    #[arg(value_name = "url")]
    base_url: Option<String>,
    /// Token file for the endpoint sweep. Falls back to `TOKEN_PATH`.
    #[arg(long = "token-path", value_name = "path")]
    token_path: Option<PathBuf>,
    /// Sweep endpoints without the stored bearer token.
    #[arg(long)]
    anonymous: bool,
}

impl CliArgs {
    fn target(&self, config: &Config) -> String {
        match &self.base_url {
            Some(url) => resolve_api_base(Some(url)),
            None => config.api_url.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = CliArgs::parse();
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "diagnose={level},perfectcv_client={level}",
                level = &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let target = args.target(&config);

    let token = if args.anonymous {
        None
    } else {
        let path = args.token_path.clone().unwrap_or_else(|| config.token_path.clone());
        stored_token(&FileTokenStore::new(path)).await
    };

    let http = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.http_timeout_secs))
        .build()?;

    let report = diagnose(&http, &target, token.as_deref())
        .await
        .with_context(|| format!("'{target}' is not a valid URL"))?;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if report.reachable() {
        info!("API reachable at {target}");
        Ok(())
    } else {
        warn!("API unreachable at {target}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use clap::{error::ErrorKind, CommandFactory};

    use super::*;

    fn config() -> Config {
        Config::from_lookup(|_| None).unwrap()
    }

    #[test]
    fn test_command_definition() {
        CliArgs::command().debug_assert();
    }

    #[test]
    fn test_help_and_version_are_not_urls() {
        let err = CliArgs::try_parse_from(["diagnose", "--help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);

        let err = CliArgs::try_parse_from(["diagnose", "--version"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        let err = CliArgs::try_parse_from(["diagnose", "--verbose"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnknownArgument);
    }

    #[test]
    fn test_positional_url_is_resolved() {
        let args = CliArgs::try_parse_from(["diagnose", "https://h.example/api"]).unwrap();
        assert_eq!(args.target(&config()), "https://h.example/api/v1");
        assert!(!args.anonymous);
    }

    #[test]
    fn test_default_target_is_configured_api() {
        let args = CliArgs::try_parse_from(["diagnose", "--anonymous"]).unwrap();
        assert_eq!(args.target(&config()), "http://localhost:8001/api/v1");
        assert!(args.anonymous);
    }

    #[test]
    fn test_token_path_flag() {
        let args =
            CliArgs::try_parse_from(["diagnose", "--token-path", "/tmp/tok"]).unwrap();
        assert_eq!(args.token_path, Some(PathBuf::from("/tmp/tok")));
    }
}
