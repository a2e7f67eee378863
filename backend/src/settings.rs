//! Startup configuration read from the process environment.
//!
//! All five variables are required. Reading goes through [`mockable::Env`]
//! so tests can drive it with `MockEnv` instead of mutating the process
//! environment. [`load_env_file`] may seed the environment from a `.env`
//! file first; variables already set in the process win.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use mockable::Env;

/// Shared secret probes pass as `api_token`.
pub const API_TOKEN_ENV: &str = "API_TOKEN";
/// Path of the SQLite database file.
pub const DB_NAME_ENV: &str = "DB_NAME";
/// Title rendered on the status page.
pub const HTML_TITLE_ENV: &str = "HTML_TITLE";
/// Host or IP address to listen on.
pub const HTTP_HOST_ENV: &str = "HTTP_HOST";
/// TCP port to listen on.
pub const HTTP_PORT_ENV: &str = "HTTP_PORT";

/// Validated application settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppSettings {
    pub api_token: String,
    pub database_url: String,
    pub page_title: String,
    pub bind_addr: SocketAddr,
}

/// Errors raised while validating startup configuration.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is absent or empty.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// A `.env` file exists but could not be read or parsed.
    #[error("failed to load .env file: {message}")]
    EnvFile { message: String },
}

fn env_file_outcome(
    result: Result<PathBuf, dotenvy::Error>,
) -> Result<Option<PathBuf>, SettingsError> {
    match result {
        Ok(path) => Ok(Some(path)),
        Err(err) if err.not_found() => Ok(None),
        Err(err) => Err(SettingsError::EnvFile {
            message: err.to_string(),
        }),
    }
}

/// Load variables from a `.env` file in the working directory or a parent.
///
/// A missing file is not an error; the process environment alone must then
/// carry every variable. Returns the path of the file that was loaded.
///
/// # Errors
/// Returns [`SettingsError::EnvFile`] when the file exists but cannot be read
/// or contains a malformed line.
pub fn load_env_file() -> Result<Option<PathBuf>, SettingsError> {
    env_file_outcome(dotenvy::dotenv())
}

fn required<E: Env>(env: &E, name: &'static str) -> Result<String, SettingsError> {
    env.string(name)
        .filter(|value| !value.is_empty())
        .ok_or(SettingsError::MissingEnv { name })
}

fn bind_addr(host: &str, port: &str) -> Result<SocketAddr, SettingsError> {
    let port: u16 = port.parse().map_err(|_| SettingsError::InvalidEnv {
        name: HTTP_PORT_ENV,
        value: port.to_owned(),
        expected: "a TCP port number",
    })?;
    let host_literal = host.trim_start_matches('[').trim_end_matches(']');
    let ip = if host_literal.eq_ignore_ascii_case("localhost") {
        Ok(IpAddr::V4(Ipv4Addr::LOCALHOST))
    } else {
        host_literal.parse::<IpAddr>()
    };
    ip.map(|ip| SocketAddr::new(ip, port))
        .map_err(|_| SettingsError::InvalidEnv {
            name: HTTP_HOST_ENV,
            value: host.to_owned(),
            expected: "an IP address or localhost",
        })
}

/// Build [`AppSettings`] from environment variables.
///
/// # Errors
/// Returns [`SettingsError::MissingEnv`] when a variable is absent or empty
/// and [`SettingsError::InvalidEnv`] when the host or port do not form a
/// socket address.
///
/// # Examples
/// ```
/// use incident_board::settings::settings_from_env;
/// use mockable::MockEnv;
///
/// let mut env = MockEnv::new();
/// env.expect_string().returning(|key| match key {
///     "API_TOKEN" => Some("secret".into()),
///     "DB_NAME" => Some("incidents.db".into()),
///     "HTML_TITLE" => Some("Incidents".into()),
///     "HTTP_HOST" => Some("127.0.0.1".into()),
///     "HTTP_PORT" => Some("8080".into()),
///     _ => None,
/// });
/// let settings = settings_from_env(&env).expect("valid settings");
/// assert_eq!(settings.bind_addr.port(), 8080);
/// ```
pub fn settings_from_env<E: Env>(env: &E) -> Result<AppSettings, SettingsError> {
    let api_token = required(env, API_TOKEN_ENV)?;
    let database_url = required(env, DB_NAME_ENV)?;
    let page_title = required(env, HTML_TITLE_ENV)?;
    let host = required(env, HTTP_HOST_ENV)?;
    let port = required(env, HTTP_PORT_ENV)?;

    Ok(AppSettings {
        api_token,
        database_url,
        page_title,
        bind_addr: bind_addr(&host, &port)?,
    })
}
