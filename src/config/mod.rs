use serde::Deserialize;
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    #[serde(default)]
    pub admin: AdminConfig,
    #[serde(default)]
    pub mail: Option<MailConfig>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageConfig {
    pub data_dir: String,
    pub uploads_dir: String,
    pub uploads_url_prefix: String,
    pub max_upload_bytes: usize,
    #[serde(default)]
    pub read_fallback: ReadFallback,
}

/// What a listing shows when the backing file is empty, missing or unreadable.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ReadFallback {
    /// Built-in sample records for empty or unreadable stores.
    #[default]
    Samples,
    /// Unreadable stores list as empty.
    Empty,
    /// Unreadable stores surface as a server error.
    Error,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AdminConfig {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MailConfig {
    #[serde(default = "default_smtp_host")]
    pub smtp_host: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    pub from: Option<String>,
    pub recipient: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

fn default_smtp_host() -> String {
    "smtp.gmail.com".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "meveddet=debug,tower_http=debug,axum=debug".to_string(),
        }
    }
}

impl MailConfig {
    /// Credentials are optional; without them contact messages are only saved.
    pub fn has_credentials(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    pub fn sender(&self) -> &str {
        self.from.as_deref().unwrap_or(&self.username)
    }
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        // A missing .env is normal outside development
        let _ = dotenvy::dotenv();

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("server.base_url", "http://localhost:8080")?
            .set_default("storage.data_dir", "data")?
            .set_default("storage.uploads_dir", "public/uploads")?
            .set_default("storage.uploads_url_prefix", "/uploads")?
            .set_default("storage.max_upload_bytes", 10 * 1024 * 1024)?
            .set_default("storage.read_fallback", "samples")?
            .set_default("logging.level", LoggingConfig::default().level)?

            // Add config file if it exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))

            // Add environment variables (with MEVEDDET__ prefix, double underscore separates levels)
            .add_source(Environment::with_prefix("MEVEDDET").separator("__"))

            .build()?;

        config.try_deserialize()
    }

    /// Settings rooted at `dir`, used by tests and the seed binary.
    pub fn with_data_root(dir: &std::path::Path) -> Self {
        let mut settings = Self::default();
        settings.storage.data_dir = dir.join("data").to_string_lossy().into_owned();
        settings.storage.uploads_dir = dir.join("uploads").to_string_lossy().into_owned();
        settings
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 8080,
                base_url: "http://localhost:8080".to_string(),
            },
            storage: StorageConfig {
                data_dir: "data".to_string(),
                uploads_dir: "public/uploads".to_string(),
                uploads_url_prefix: "/uploads".to_string(),
                max_upload_bytes: 10 * 1024 * 1024,
                read_fallback: ReadFallback::Samples,
            },
            admin: AdminConfig::default(),
            mail: None,
            logging: LoggingConfig::default(),
        }
    }
}
