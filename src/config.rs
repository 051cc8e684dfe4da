use config::{Config, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub server_address: String,
    pub database_url: String,
    pub environment: String,
    /// Marks the session cookie `Secure`; enable behind HTTPS.
    #[serde(default)]
    pub secure_cookies: bool,
    #[serde(default = "default_static_dir")]
    pub static_dir: String,
}

fn default_static_dir() -> String {
    "static".to_string()
}

impl AppConfig {
    pub fn load() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let env = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("server_address", "0.0.0.0:3000")?
            .set_default("database_url", "sqlite:data/garage.db")?
            .set_default("environment", env.as_str())?
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Add environment-specific configuration
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            // Add local configuration (for development overrides)
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix "GARAGE_"
            .add_source(Environment::with_prefix("GARAGE"))
            .build()
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?;

        Ok(s.try_deserialize()?)
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3000".to_string(),
            database_url: "sqlite:data/garage.db".to_string(),
            environment: "development".to_string(),
            secure_cookies: false,
            static_dir: default_static_dir(),
        }
    }
}
