//! CLI argument parsing and remote repository configuration.
use clap::Parser;
use color_eyre::eyre::WrapErr;
use secrecy::SecretString;
use std::env;
use url::Url;

use crate::{
    Result,
    error::ReleaseHelperError,
    forge::config::{DEFAULT_API_URL, DEFAULT_UPLOAD_URL, RemoteConfig},
};

/// Environment variable holding the repository in `owner/name` form.
pub const REPOSITORY_ENV_VAR: &str = "GITHUB_REPOSITORY";
/// Environment variable holding the API token.
pub const TOKEN_ENV_VAR: &str = "GITHUB_TOKEN";
/// Environment variable holding the REST API base URL.
pub const API_URL_ENV_VAR: &str = "GITHUB_API_URL";

/// Release management helper for CI workflows.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    #[arg(long, default_value = "")]
    /// Repository in owner/name form. Falls back to GITHUB_REPOSITORY env var.
    pub repo: String,

    #[arg(long, default_value = "")]
    /// API access token. Falls back to GITHUB_TOKEN env var.
    pub token: String,

    #[arg(long, default_value = "")]
    /// REST API base URL. Falls back to GITHUB_API_URL env var, then
    /// https://api.github.com.
    pub api_url: String,

    #[arg(long, default_value = DEFAULT_UPLOAD_URL)]
    /// Base URL for asset uploads.
    pub upload_url: String,

    #[arg(long, default_value_t = false)]
    /// Enable debug logging.
    pub debug: bool,

    /// Command to run.
    pub command: Option<String>,

    /// Positional arguments for the command.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

impl Args {
    /// Configure the remote repository connection from CLI arguments and
    /// environment.
    pub fn get_remote(&self) -> Result<RemoteConfig> {
        let repo = flag_or_env(&self.repo, REPOSITORY_ENV_VAR).ok_or_else(
            || {
                ReleaseHelperError::invalid_config(format!(
                    "must set --repo or {REPOSITORY_ENV_VAR}"
                ))
            },
        )?;

        let (owner, name) = parse_repository(&repo)?;

        let token = flag_or_env(&self.token, TOKEN_ENV_VAR).ok_or_else(|| {
            ReleaseHelperError::invalid_config(format!(
                "must set --token or {TOKEN_ENV_VAR}"
            ))
        })?;

        let api_url = flag_or_env(&self.api_url, API_URL_ENV_VAR)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());

        Ok(RemoteConfig {
            owner,
            repo: name,
            api_url: parse_http_url(&api_url)?,
            upload_url: parse_http_url(&self.upload_url)?,
            token: SecretString::from(token),
        })
    }
}

/// Use the flag value when set, otherwise a non-empty environment variable.
fn flag_or_env(flag: &str, var: &str) -> Option<String> {
    if !flag.is_empty() {
        return Some(flag.to_string());
    }

    env::var(var).ok().filter(|value| !value.is_empty())
}

/// Split `owner/name` into its parts.
fn parse_repository(repo: &str) -> Result<(String, String)> {
    match repo.trim().split_once('/') {
        Some((owner, name))
            if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
        {
            Ok((owner.to_string(), name.to_string()))
        }
        _ => Err(ReleaseHelperError::invalid_config(format!(
            "repository must be in owner/name form: {repo}"
        ))
        .into()),
    }
}

/// Parse a base URL, accepting only http and https.
fn parse_http_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw).wrap_err_with(|| format!("invalid url: {raw}"))?;

    match url.scheme() {
        "http" | "https" => Ok(url),
        _ => Err(ReleaseHelperError::invalid_config(
            "only http and https schemes are supported for api urls",
        )
        .into()),
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for CLI argument parsing and remote configuration.
    use secrecy::ExposeSecret;

    use super::*;

    fn cli_args(repo: &str, token: &str) -> Args {
        Args {
            repo: repo.into(),
            token: token.into(),
            api_url: "".into(),
            upload_url: DEFAULT_UPLOAD_URL.into(),
            debug: false,
            command: None,
            args: vec![],
        }
    }

    fn without_env<R>(f: impl FnOnce() -> R) -> R {
        temp_env::with_vars_unset(
            [REPOSITORY_ENV_VAR, TOKEN_ENV_VAR, API_URL_ENV_VAR],
            f,
        )
    }

    /// Test remote configuration from CLI flags.
    #[test]
    fn gets_remote_from_flags() {
        let remote = without_env(|| {
            cli_args("shaka-project/static-ffmpeg-binaries", "flag_token")
                .get_remote()
                .unwrap()
        });

        assert_eq!(remote.owner, "shaka-project");
        assert_eq!(remote.repo, "static-ffmpeg-binaries");
        assert_eq!(remote.token.expose_secret(), "flag_token");
        assert_eq!(remote.api_url.as_str(), "https://api.github.com/");
        assert_eq!(remote.upload_url.as_str(), "https://uploads.github.com/");
    }

    /// Test that repository, token and api url fall back to environment.
    #[test]
    fn gets_remote_from_env() {
        let remote = temp_env::with_vars(
            [
                (REPOSITORY_ENV_VAR, Some("owner/repo")),
                (TOKEN_ENV_VAR, Some("env_token")),
                (API_URL_ENV_VAR, Some("https://ghe.example.com/api/v3")),
            ],
            || cli_args("", "").get_remote().unwrap(),
        );

        assert_eq!(remote.path(), "owner/repo");
        assert_eq!(remote.token.expose_secret(), "env_token");
        assert_eq!(remote.api_url.host_str(), Some("ghe.example.com"));
    }

    /// Test that flags take precedence over environment.
    #[test]
    fn flags_override_env() {
        let remote = temp_env::with_vars(
            [
                (REPOSITORY_ENV_VAR, Some("env/repo")),
                (TOKEN_ENV_VAR, Some("env_token")),
            ],
            || cli_args("flag/repo", "flag_token").get_remote().unwrap(),
        );

        assert_eq!(remote.path(), "flag/repo");
        assert_eq!(remote.token.expose_secret(), "flag_token");
    }

    #[test]
    fn requires_token() {
        let result = without_env(|| cli_args("owner/repo", "").get_remote());
        assert!(result.is_err());
    }

    #[test]
    fn requires_repository() {
        let result = without_env(|| cli_args("", "token").get_remote());
        assert!(result.is_err());
    }

    #[test]
    fn rejects_malformed_repository() {
        for repo in ["owner", "/repo", "owner/", "a/b/c"] {
            let result = without_env(|| cli_args(repo, "token").get_remote());
            assert!(result.is_err(), "{repo} should be rejected");
        }
    }

    /// Test that only HTTP and HTTPS schemes are supported for api urls.
    #[test]
    fn only_supports_http_and_https_schemes() {
        let mut args = cli_args("owner/repo", "token");
        args.api_url = "ftp://example.com".into();

        let result = without_env(|| args.get_remote());
        assert!(result.is_err());
    }

    #[test]
    fn parses_command_and_trailing_args() {
        let args = Args::try_parse_from([
            "release-helper",
            "--debug",
            "update-release-body",
            "42",
            "- fixed --things",
        ])
        .unwrap();

        assert!(args.debug);
        assert_eq!(args.command.as_deref(), Some("update-release-body"));
        assert_eq!(args.args, vec!["42", "- fixed --things"]);
    }

    #[test]
    fn command_is_optional_at_parse_time() {
        let args = Args::try_parse_from(["release-helper"]).unwrap();
        assert!(args.command.is_none());
        assert!(args.args.is_empty());
    }
}
