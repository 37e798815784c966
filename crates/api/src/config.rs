use domain::models::CreateInvitationOptions;
use domain::services::InviteLinks;
use serde::Deserialize;
use shared::validation::{validate_expires_in_days, validate_max_uses, MAX_EXPIRES_IN_DAYS};
use std::net::{AddrParseError, SocketAddr};

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
    /// Identity-provider token verification
    pub jwt: JwtAuthConfig,
    #[serde(default)]
    pub invites: InvitesConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SecurityConfig {
    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JwtAuthConfig {
    /// HS256 secret shared with the identity provider
    pub secret: String,

    /// Leeway in seconds for clock skew tolerance
    #[serde(default = "default_jwt_leeway")]
    pub leeway_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InvitesConfig {
    /// `development` or `production`; selects the default link origin
    #[serde(default = "default_invites_environment")]
    pub environment: String,

    /// Overrides the environment's link origin
    #[serde(default)]
    pub base_url: Option<String>,

    #[serde(default = "default_invite_max_uses")]
    pub default_max_uses: i32,

    #[serde(default = "default_invite_expires_in_days")]
    pub default_expires_in_days: i64,
}

impl Default for InvitesConfig {
    fn default() -> Self {
        Self {
            environment: default_invites_environment(),
            base_url: None,
            default_max_uses: default_invite_max_uses(),
            default_expires_in_days: default_invite_expires_in_days(),
        }
    }
}

impl InvitesConfig {
    pub fn links(&self) -> InviteLinks {
        match self.base_url.as_deref().filter(|url| !url.trim().is_empty()) {
            Some(url) => InviteLinks::new(url.trim()),
            None if self.environment == "production" => InviteLinks::production(),
            None => InviteLinks::development(),
        }
    }

    /// Invitation options applied to fields a create request leaves out.
    pub fn defaults(&self) -> CreateInvitationOptions {
        CreateInvitationOptions {
            max_uses: Some(self.default_max_uses),
            expires_in_days: Some(self.default_expires_in_days),
            ..Default::default()
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_connections() -> u32 {
    20
}
fn default_min_connections() -> u32 {
    5
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_jwt_leeway() -> u64 {
    30
}
fn default_invites_environment() -> String {
    "development".to_string()
}
fn default_invite_max_uses() -> i32 {
    domain::models::invitation::DEFAULT_MAX_USES
}
fn default_invite_expires_in_days() -> i64 {
    domain::models::invitation::DEFAULT_EXPIRES_IN_DAYS
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml
    /// 2. config/local.toml (optional, not in git)
    /// 3. Environment variables with BANDLY__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("BANDLY")
                    .prefix_separator("__")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration from embedded defaults plus overrides, without
    /// touching the file system.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30

            [database]
            url = ""
            max_connections = 20
            min_connections = 5
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []

            [jwt]
            secret = ""
            leeway_secs = 30

            [invites]
            environment = "development"
            default_max_uses = 1
            default_expires_in_days = 7
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BANDLY__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.jwt.secret.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "BANDLY__JWT__SECRET environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !matches!(
            self.invites.environment.as_str(),
            "development" | "production"
        ) {
            return Err(ConfigValidationError::InvalidValue(format!(
                "invites.environment must be development or production, got {}",
                self.invites.environment
            )));
        }

        if validate_max_uses(self.invites.default_max_uses).is_err()
            || validate_expires_in_days(self.invites.default_expires_in_days).is_err()
        {
            return Err(ConfigValidationError::InvalidValue(format!(
                "invite defaults must be positive and expire within {} days",
                MAX_EXPIRES_IN_DAYS
            )));
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, AddrParseError> {
        format!("{}:{}", self.server.host, self.server.port).parse()
    }
}
