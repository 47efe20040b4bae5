use config::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub email: EmailConfig,
    pub business: BusinessConfig,
    pub uploads: UploadConfig,
    pub rate_limit: RateLimitConfig,
    pub cors: CorsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_host: Option<String>,
    pub smtp_port: u16,
    pub smtp_user: Option<String>,
    /// Opaque credential; never logged.
    pub smtp_password: Option<String>,
    pub from: String,
    /// The fixed recipients every lead notification goes to.
    pub recipients: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BusinessConfig {
    pub name: String,
    /// Surfaced to the user when dispatch fails, as the manual recovery path.
    pub fallback_phone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_photo_bytes: u64,
    pub max_photos: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub enable: bool,
    pub max_submissions: usize,
    pub window_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CorsConfig {
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            smtp_host: None,
            smtp_port: 587,
            smtp_user: None,
            smtp_password: None,
            from: "leads@example-renovations.co.uk".to_string(),
            recipients: vec![
                "owner@example-renovations.co.uk".to_string(),
                "office@example-renovations.co.uk".to_string(),
            ],
        }
    }
}

impl Default for BusinessConfig {
    fn default() -> Self {
        Self {
            name: "Example Renovations".to_string(),
            fallback_phone: "020 7946 0000".to_string(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_photo_bytes: 5 * 1024 * 1024,
            max_photos: 10,
        }
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            enable: true,
            max_submissions: 5,
            window_seconds: 3600,
        }
    }
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&AppConfig::default())?);

        if std::path::Path::new("config.toml").exists() {
            builder = builder.add_source(File::with_name("config"));
        }

        builder = builder.add_source(
            Environment::with_prefix("APP")
                .separator("_")
                .try_parsing(true),
        );

        let config = builder.build()?;
        let app_config: AppConfig = config.try_deserialize()?;

        app_config.validate()?;

        Ok(app_config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Message("Server port cannot be 0".to_string()));
        }

        if self.email.from.is_empty() {
            return Err(ConfigError::Message(
                "Email from address cannot be empty".to_string(),
            ));
        }

        if self.email.recipients.is_empty() {
            return Err(ConfigError::Message(
                "At least one notification recipient is required".to_string(),
            ));
        }

        if self.email.enabled && self.email.smtp_host.is_none() {
            tracing::warn!("SMTP host not configured - lead emails will only be logged");
        }

        if self.business.fallback_phone.is_empty() {
            return Err(ConfigError::Message(
                "Fallback phone number cannot be empty".to_string(),
            ));
        }

        if self.uploads.max_photo_bytes == 0 {
            return Err(ConfigError::Message(
                "Max photo size must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.max_submissions == 0 {
            return Err(ConfigError::Message(
                "Rate limit max submissions must be greater than 0".to_string(),
            ));
        }

        if self.rate_limit.window_seconds == 0 {
            return Err(ConfigError::Message(
                "Rate limit window must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
