use config::{Config as ConfigBuilder, ConfigError, Environment, File, Map};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::env;
use url::Url;

/// Origins a local frontend is usually served from during development.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 4] = [
    "http://localhost:3000",
    "http://localhost:5173",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:5173",
];

const RESERVED_PATHS: [&str; 3] = ["/", "/health", "/api/contact"];

/// Plain environment variables and the keys they override.
const FLAT_ENV_VARS: [(&str, &str); 14] = [
    ("HOST", "server.host"),
    ("PORT", "server.port"),
    ("DIAG_PATH", "server.diag_path"),
    ("SMTP_HOST", "email.smtp_host"),
    ("SMTP_PORT", "email.smtp_port"),
    ("SMTP_SECURE", "email.smtp_secure"),
    ("SMTP_USER", "email.smtp_username"),
    ("SMTP_PASS", "email.smtp_password"),
    ("SMTP_FROM_NAME", "email.from_name"),
    ("CONTACT_TO", "email.contact_address"),
    ("SMTP_VERIFY", "email.verify_connection"),
    ("ALLOWED_ORIGINS", "cors.allowed_origins"),
    ("LOG_LEVEL", "observability.log_level"),
    ("LOG_FORMAT", "observability.log_format"),
];

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub email: EmailConfig,
    #[serde(default)]
    pub cors: CorsConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Path of the configuration presence report, disabled when unset
    #[serde(default)]
    pub diag_path: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct EmailConfig {
    #[serde(default)]
    pub smtp_host: String,
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,
    /// Implicit TLS from connection start (usually port 465) instead of STARTTLS
    #[serde(default)]
    pub smtp_secure: bool,
    #[serde(default)]
    pub smtp_username: String,
    #[serde(default)]
    pub smtp_password: String,
    #[serde(default = "default_from_name")]
    pub from_name: String,
    #[serde(default)]
    pub contact_address: String,
    #[serde(default = "default_verify_connection")]
    pub verify_connection: bool,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            smtp_host: String::new(),
            smtp_port: default_smtp_port(),
            smtp_secure: false,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_name: default_from_name(),
            contact_address: String::new(),
            verify_connection: default_verify_connection(),
        }
    }
}

impl EmailConfig {
    /// Presence of every setting a send depends on. Values are never exposed.
    ///
    /// The password is optional: without one the relay connects unauthenticated.
    pub fn presence(&self) -> BTreeMap<&'static str, bool> {
        BTreeMap::from([
            ("SMTP_HOST", !self.smtp_host.trim().is_empty()),
            ("SMTP_USER", !self.smtp_username.trim().is_empty()),
            ("CONTACT_TO", !self.contact_address.trim().is_empty()),
        ])
    }

    pub fn missing_settings(&self) -> Vec<&'static str> {
        self.presence()
            .into_iter()
            .filter_map(|(name, present)| (!present).then_some(name))
            .collect()
    }
}

fn default_smtp_port() -> u16 {
    587
}

fn default_from_name() -> String {
    "Contact form".to_string()
}

fn default_verify_connection() -> bool {
    true
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct CorsConfig {
    /// Comma separated, merged with [`DEFAULT_ALLOWED_ORIGINS`]
    #[serde(default)]
    pub allowed_origins: String,
}

impl CorsConfig {
    /// Normalized allow-list: defaults first, then configured entries,
    /// without duplicates. Entries that are not valid origins are skipped.
    pub fn origins(&self) -> Vec<String> {
        let mut origins: Vec<String> = Vec::new();

        let configured = self
            .allowed_origins
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty());

        for entry in DEFAULT_ALLOWED_ORIGINS.into_iter().chain(configured) {
            let Some(origin) = normalize_origin(entry) else {
                tracing::warn!(entry, "Ignoring invalid allowed origin");
                continue;
            };

            if !origins.contains(&origin) {
                origins.push(origin);
            }
        }

        origins
    }
}

/// Serialize an origin as browsers send it in the `Origin` header:
/// lowercase scheme and host, default port omitted, no path.
pub fn normalize_origin(value: &str) -> Option<String> {
    let url = Url::parse(value.trim()).ok()?;
    let origin = url.origin();

    origin
        .is_tuple()
        .then(|| origin.ascii_serialization())
}

#[derive(Debug, Deserialize, Clone)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// "pretty" or "json"
    #[serde(default = "default_log_format")]
    pub log_format: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: default_log_format(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

impl Config {
    /// Load configuration from file and environment variables
    ///
    /// Priority (highest to lowest):
    /// 1. Flat environment variables (SMTP_HOST, CONTACT_TO, PORT, etc.)
    /// 2. Prefixed environment variables (MAILRELAY__EMAIL__SMTP_HOST, etc.)
    /// 3. Config file specified by path
    /// 4. Hardcoded defaults
    pub fn load(config_path: Option<String>) -> Result<Self, ConfigError> {
        Self::load_from(config_path, env::vars().collect())
    }

    /// Same as [`Config::load`] with the environment supplied as a map.
    pub fn load_from(
        config_path: Option<String>,
        vars: Map<String, String>,
    ) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        builder = builder
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 3000)?;

        let config_file_path = config_path
            .or_else(|| vars.get("CONFIG_PATH").cloned())
            .unwrap_or_else(|| "config/default.toml".to_string());

        // Config file is optional
        if std::path::Path::new(&config_file_path).exists() {
            builder = builder.add_source(File::with_name(&config_file_path));
        }

        builder = builder.add_source(
            Environment::with_prefix("MAILRELAY")
                .separator("__")
                .try_parsing(true)
                .source(Some(vars.clone())),
        );

        for (var, key) in FLAT_ENV_VARS {
            if let Some(value) = vars.get(var) {
                builder = builder.set_override(key, value.as_str())?;
            }
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration
    ///
    /// Only structurally unusable values are rejected. Missing SMTP settings
    /// are reported by [`Config::missing_settings`] and fail at send time.
    pub fn validate(&self) -> Result<(), String> {
        if self.server.port == 0 {
            return Err("Server port must be greater than 0".to_string());
        }
        if self.email.smtp_port == 0 {
            return Err("SMTP port must be greater than 0".to_string());
        }
        if let Some(path) = self.diag_path() {
            if !path.starts_with('/') {
                return Err("Diagnostic path must start with '/'".to_string());
            }
            // axum reads these as captures or wildcards and panics on a bad pattern
            if path.contains([':', '*', '{', '}']) {
                return Err(format!(
                    "Diagnostic path '{path}' must not contain ':', '*', '{{' or '}}'"
                ));
            }
            if RESERVED_PATHS.contains(&path) {
                return Err(format!("Diagnostic path '{path}' collides with a built-in route"));
            }
        }
        if !matches!(self.observability.log_format.as_str(), "pretty" | "json") {
            return Err("Log format must be 'pretty' or 'json'".to_string());
        }
        Ok(())
    }

    /// Diagnostic route path, `None` when unset or blank.
    pub fn diag_path(&self) -> Option<&str> {
        self.server
            .diag_path
            .as_deref()
            .map(str::trim)
            .filter(|path| !path.is_empty())
    }

    pub fn presence(&self) -> BTreeMap<&'static str, bool> {
        self.email.presence()
    }

    pub fn missing_settings(&self) -> Vec<&'static str> {
        self.email.missing_settings()
    }
}
