pub mod settings;

pub use settings::{
    AppConfig, BusinessConfig, CorsConfig, EmailConfig, RateLimitConfig, ServerConfig,
    UploadConfig,
};
