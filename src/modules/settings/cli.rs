// Copyright © 2025 mailgate
// Licensed under the MIT License

use clap::{builder::ValueParser, Parser};
use std::{collections::HashSet, sync::LazyLock};
use url::Url;

#[cfg(not(test))]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::parse);

#[cfg(test)]
pub static SETTINGS: LazyLock<Settings> = LazyLock::new(Settings::new_for_test);

#[derive(Debug, Parser)]
#[clap(
    name = "mailgate",
    about = "An HTTP gateway exposing webmail message actions (flag, seen, move, delete, list)
    on top of a WildDuck-compatible messaging backend.",
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Settings {
    /// mailgate log level (default: "info")
    #[clap(
        long,
        default_value = "info",
        env,
        help = "Set the log level for mailgate"
    )]
    pub mailgate_log_level: String,

    /// mailgate HTTP port (default: 3000)
    #[clap(
        long,
        default_value = "3000",
        env,
        help = "Set the HTTP port for mailgate",
        value_parser = clap::value_parser!(u16).range(1..)
    )]
    pub mailgate_http_port: u16,

    /// The IP address the server binds to, in IPv4 format (e.g., 192.168.1.1).
    #[clap(
        long,
        env,
        default_value = "0.0.0.0",
        help = "The IP address that the server binds to, in IPv4 format (e.g., 192.168.1.1).",
        value_parser = ValueParser::new(|s: &str| {
            if s.parse::<std::net::Ipv4Addr>().is_err() {
                return Err("The bind IP address must be a valid IPv4 address.".to_string());
            }
            Ok(s.to_string())
        })
    )]
    pub mailgate_bind_ip: Option<String>,

    /// Base URL of the messaging backend API (default: "http://127.0.0.1:8080")
    #[clap(
        long,
        default_value = "http://127.0.0.1:8080",
        env,
        help = "Set the base URL of the messaging backend API",
        value_parser = ValueParser::new(|s: &str| -> Result<String, String> {
            Url::parse(s).map_err(|_| format!("Invalid URL for the backend API: {}", s))?;
            Ok(s.trim_end_matches('/').to_string())
        })
    )]
    pub mailgate_backend_url: String,

    /// Access token sent to the backend with every request, if the backend
    /// requires one.
    #[clap(
        long,
        env,
        help = "Set the access token for the messaging backend API"
    )]
    pub mailgate_backend_access_token: Option<String>,

    #[clap(
        long,
        default_value = "30",
        env,
        help = "Set the request timeout for backend calls, in seconds",
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub mailgate_backend_timeout_secs: u64,

    /// CORS allowed origins (default: "*")
    #[clap(
        long,
        default_value = "*",
        env,
        help = "Set the allowed CORS origins (comma-separated list, e.g., \"https://example.com, https://another.com\")",
        value_parser = ValueParser::new(|s: &str| -> Result<HashSet<String>, String> {
            let set: HashSet<String> = s.split(',')
                .map(|origin| origin.trim().to_string())
                .filter(|origin| !origin.is_empty())
                .collect();
            Ok(set)
        })
    )]
    pub mailgate_cors_origins: HashSet<String>,

    /// CORS max age in seconds (default: 86400)
    #[clap(
        long,
        default_value = "86400",
        env,
        help = "Set the CORS max age in seconds"
    )]
    pub mailgate_cors_max_age: i32,

    /// Enable ANSI logs (default: true)
    #[clap(long, default_value = "true", env, help = "Enable ANSI formatted logs")]
    pub mailgate_ansi_logs: bool,

    /// Enable log file output (default: false)
    /// If false, logs will be printed to stdout
    #[clap(
        long,
        default_value = "false",
        env,
        help = "Enable log file output (otherwise logs go to stdout)"
    )]
    pub mailgate_log_to_file: bool,

    /// Directory for server log files (default: "logs")
    #[clap(
        long,
        default_value = "logs",
        env,
        help = "Set the directory for server log files"
    )]
    pub mailgate_log_dir: String,

    /// Maximum number of log files (default: 5)
    #[clap(
        long,
        default_value = "5",
        env,
        help = "Set the maximum number of server log files"
    )]
    pub mailgate_max_server_log_files: usize,

    #[clap(
        long,
        default_value = "true",
        env,
        help = "Enable compression for HTTP responses"
    )]
    pub mailgate_http_compression_enabled: bool,
}

impl Settings {
    #[cfg(test)]
    fn new_for_test() -> Self {
        Self {
            mailgate_log_level: "info".to_string(),
            mailgate_http_port: 3000,
            mailgate_bind_ip: Default::default(),
            mailgate_backend_url: "http://127.0.0.1:8080".to_string(),
            mailgate_backend_access_token: None,
            mailgate_backend_timeout_secs: 30,
            mailgate_cors_origins: Default::default(),
            mailgate_cors_max_age: 86400,
            mailgate_ansi_logs: false,
            mailgate_log_to_file: false,
            mailgate_log_dir: "logs".to_string(),
            mailgate_max_server_log_files: 5,
            mailgate_http_compression_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_port_must_fit_a_real_port() {
        assert!(Settings::try_parse_from(["mailgate", "--mailgate-http-port", "70000"]).is_err());
        assert!(Settings::try_parse_from(["mailgate", "--mailgate-http-port", "0"]).is_err());
        assert!(Settings::try_parse_from(["mailgate", "--mailgate-http-port", "-1"]).is_err());

        let settings =
            Settings::try_parse_from(["mailgate", "--mailgate-http-port", "8088"]).unwrap();
        assert_eq!(settings.mailgate_http_port, 8088);
    }
}
