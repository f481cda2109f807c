use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use dotenv::dotenv;
use jsonwebtoken::{DecodingKey, EncodingKey};
use std::{env, fmt, str::FromStr};
use zeroize::Zeroizing;

/// One year. Larger values overflow `chrono::Duration`.
pub const MAX_SESSION_TTL_MINUTES: i64 = 60 * 24 * 365;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AppEnvironment {
    Development,
    Production,
    Testing,
}

impl FromStr for AppEnvironment {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" => Ok(AppEnvironment::Development),
            "production" => Ok(AppEnvironment::Production),
            "testing" => Ok(AppEnvironment::Testing),
            _ => Err(ConfigError::Message(format!("Invalid environment: {}", s))),
        }
    }
}

/// Where entities are persisted.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct SocialLink {
    /// Network name, also used as the link's CSS class (`twitter`, `github`, ...).
    pub network: String,
    pub url: String,
}

/// Public profile shown by the layout, the home page and the CV page.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub brand: String,
    pub owner_name: String,
    pub statement: String,
    pub socials: Vec<SocialLink>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        let social = |network: &str, url: &str| SocialLink {
            network: network.to_string(),
            url: url.to_string(),
        };

        SiteConfig {
            brand: "Zenith".to_string(),
            owner_name: "William Matson".to_string(),
            statement: "Computer science student with an interest in backend systems, \
                        tooling and the web."
                .to_string(),
            socials: vec![
                social("twitter", "https://twitter.com/Willedmats"),
                social("instagram", "https://www.instagram.com/willedmatsypie/"),
                social("spotify", "https://open.spotify.com/user/willedmatsypie?si=FWpbPgjoTW2XyX0FGkP7fw"),
                social("linkedin", "https://www.linkedin.com/in/william-matson-589409171/"),
                social("github", "https://github.com/WillEdMatsypie"),
            ],
        }
    }
}

impl SiteConfig {
    pub fn page_title(&self) -> String {
        format!("{}'s Blog", self.brand)
    }
}

#[derive(Deserialize, Clone)]
#[serde(rename_all = "snake_case")]
pub struct AppConfig {
    #[serde(default = "default_env")]
    pub env: AppEnvironment,

    #[serde(default = "default_name")]
    pub name: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_worker_count")]
    pub worker_count: usize,

    #[serde(default = "default_storage")]
    pub storage: StorageBackend,

    #[serde(default)]
    pub database_url: String,

    #[serde(default)]
    pub redis_url: Option<String>,

    #[serde(default)]
    pub session_secret: String,

    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: i64,

    #[serde(default = "default_cookie_name")]
    pub session_cookie_name: String,

    #[serde(default = "default_throttle_burst")]
    pub throttle_burst: u32,

    #[serde(default = "default_throttle_per_minute")]
    pub throttle_per_minute: u32,

    #[serde(default)]
    pub trust_forwarded_for: bool,

    /// Owner account created at startup when missing.
    #[serde(default)]
    pub owner_username: Option<String>,

    #[serde(default)]
    pub owner_password: Option<String>,

    #[serde(default)]
    pub site: SiteConfig,
}

fn default_env() -> AppEnvironment {
    AppEnvironment::Development
}
fn default_name() -> String {
    "Zenith-Portfolio".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_worker_count() -> usize {
    num_cpus::get()
}
fn default_storage() -> StorageBackend {
    StorageBackend::Postgres
}
fn default_session_ttl() -> i64 {
    // two weeks
    60 * 24 * 14
}
fn default_cookie_name() -> String {
    "sessionid".to_string()
}
fn default_throttle_burst() -> u32 {
    10
}
fn default_throttle_per_minute() -> u32 {
    6
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        dotenv().ok();

        let raw_env = env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let env_name = AppEnvironment::from_str(&raw_env)
            .map_err(|_| ConfigError::Message(format!("Invalid APP_ENV value: {}", raw_env)))?;

        let builder = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env_name)).required(false))
            .add_source(
                Environment::with_prefix("APP")
                    .prefix_separator("_")
                    .separator("__")
                    .ignore_empty(true),
            );

        let mut config: Self = builder.build()?.try_deserialize()?;

        config.env = env_name;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let mut errors = Vec::new();

        if self.storage == StorageBackend::Postgres && self.database_url.trim().is_empty() {
            errors.push("DATABASE_URL cannot be empty");
        }
        if self.session_secret.len() < 32 {
            errors.push("SESSION_SECRET must be at least 32 characters");
        }
        if self.session_ttl_minutes <= 0 || self.session_ttl_minutes > MAX_SESSION_TTL_MINUTES {
            errors.push("SESSION_TTL_MINUTES must be between 1 and 525600");
        }
        if self.session_cookie_name.trim().is_empty() {
            errors.push("SESSION_COOKIE_NAME cannot be empty");
        }
        if self.throttle_burst == 0 || self.throttle_per_minute == 0 {
            errors.push("Throttle limits must be greater than zero");
        }
        if self.owner_username.is_some() != self.owner_password.is_some() {
            errors.push("OWNER_USERNAME and OWNER_PASSWORD must be set together");
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Message(errors.join(", ")))
        }
    }

    pub fn is_production(&self) -> bool {
        self.env == AppEnvironment::Production
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            cookie_name: self.session_cookie_name.clone(),
            secure_cookie: self.is_production(),
            trust_forwarded_for: self.trust_forwarded_for,
        }
    }
}

/// Cookie parameters the session layer needs at request time.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub cookie_name: String,
    pub secure_cookie: bool,
    pub trust_forwarded_for: bool,
}

impl fmt::Display for AppEnvironment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppEnvironment::Development => "development",
            AppEnvironment::Production => "production",
            AppEnvironment::Testing => "testing",
        };
        write!(f, "{s}")
    }
}

trait Redact {
    fn redact(&self) -> &str;
}

impl Redact for str {
    fn redact(&self) -> &str {
        if self.is_empty() {
            "[MISSING]"
        } else if self.len() < 32 {
            "[TOO_SHORT]"
        } else {
            "[REDACTED]"
        }
    }
}

impl Redact for String {
    fn redact(&self) -> &str {
        self.as_str().redact()
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("name", &self.name)
            .field("port", &self.port)
            .field("host", &self.host)
            .field("worker_count", &self.worker_count)
            .field("storage", &self.storage)
            .field("database_url", &self.database_url.redact())
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("session_secret", &self.session_secret.redact())
            .field("session_ttl_minutes", &self.session_ttl_minutes)
            .field("session_cookie_name", &self.session_cookie_name)
            .field("throttle_burst", &self.throttle_burst)
            .field("throttle_per_minute", &self.throttle_per_minute)
            .field("trust_forwarded_for", &self.trust_forwarded_for)
            .field("owner_username", &self.owner_username)
            .field("owner_password", &self.owner_password.as_ref().map(|_| "[REDACTED]"))
            .field("site", &self.site.brand)
            .finish()
    }
}

#[derive(Clone)]
pub struct JwtKeys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl From<&AppConfig> for JwtKeys {
    fn from(config: &AppConfig) -> Self {
        let secret = Zeroizing::new(config.session_secret.clone());

        JwtKeys {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

impl fmt::Debug for JwtKeys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtKeys")
            .field("encoding", &"[REDACTED]")
            .field("decoding", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> AppConfig {
        AppConfig {
            env: AppEnvironment::Testing,
            name: "test".into(),
            port: 0,
            host: "127.0.0.1".into(),
            worker_count: 1,
            storage: StorageBackend::Memory,
            database_url: String::new(),
            redis_url: None,
            session_secret: "a-session-secret-that-is-long-enough-123".into(),
            session_ttl_minutes: 30,
            session_cookie_name: "sessionid".into(),
            throttle_burst: 5,
            throttle_per_minute: 5,
            trust_forwarded_for: false,
            owner_username: None,
            owner_password: None,
            site: SiteConfig::default(),
        }
    }

    #[test]
    fn memory_storage_does_not_need_a_database_url() {
        assert!(base_config().validate().is_ok());
    }

    #[test]
    fn postgres_storage_requires_a_database_url() {
        let mut config = base_config();
        config.storage = StorageBackend::Postgres;

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("DATABASE_URL"));
    }

    #[test]
    fn short_session_secret_is_rejected() {
        let mut config = base_config();
        config.session_secret = "short".into();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("SESSION_SECRET"));
    }

    #[test]
    fn session_ttl_is_bounded() {
        let mut config = base_config();
        config.session_ttl_minutes = MAX_SESSION_TTL_MINUTES;
        assert!(config.validate().is_ok());

        for ttl in [0, MAX_SESSION_TTL_MINUTES + 1, i64::MAX] {
            config.session_ttl_minutes = ttl;
            let err = config.validate().unwrap_err().to_string();
            assert!(err.contains("SESSION_TTL_MINUTES"), "ttl {ttl} accepted");
        }
    }

    #[test]
    fn owner_credentials_come_in_pairs() {
        let mut config = base_config();
        config.owner_username = Some("will".into());

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("OWNER_PASSWORD"));

        config.owner_password = Some("violet-harbour-lantern-42".into());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = base_config();
        config.owner_password = Some("violet-harbour-lantern-42".into());

        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("a-session-secret"));
        assert!(!rendered.contains("violet-harbour"));
        assert!(rendered.contains("[REDACTED]"));
    }

    #[test]
    fn page_title_uses_brand() {
        assert_eq!(SiteConfig::default().page_title(), "Zenith's Blog");
    }

    #[test]
    fn session_cookie_is_secure_only_in_production() {
        let mut config = base_config();
        assert!(!config.session_settings().secure_cookie);

        config.env = AppEnvironment::Production;
        assert!(config.session_settings().secure_cookie);
    }
}
