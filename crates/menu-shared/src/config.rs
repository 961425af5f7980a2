//! Configuration management

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::constants::{
    DEFAULT_CATEGORIES, DEFAULT_EVENT_BUS_CAPACITY, DEFAULT_MAX_IMAGE_BYTES,
    DEFAULT_RECONCILIATION_JOURNAL_CAPACITY, DEFAULT_RECONCILIATION_QUEUE_CAPACITY,
    DEFAULT_SESSION_TTL_SECONDS, DEFAULT_UPLOAD_CHUNK_BYTES, MENU_ITEMS_COLLECTION,
};
use crate::error::AppError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub app: AppSettings,
    pub menu: MenuSettings,
    pub storage: StorageSettings,
    pub auth: AuthSettings,
    pub reconciliation: ReconciliationSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppSettings {
    pub env: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub cors_origin: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MenuSettings {
    pub collection: String,
    pub categories: Vec<String>,
    pub event_bus_capacity: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StorageSettings {
    pub upload_chunk_bytes: usize,
    pub max_image_bytes: usize,
    pub public_base_url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuthSettings {
    pub admin_email: String,
    pub admin_password: String,
    pub token_secret: String,
    pub session_ttl_seconds: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReconciliationSettings {
    pub queue_capacity: usize,
    /// Records kept before the oldest are dropped
    pub journal_capacity: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        let env = std::env::var("APP_ENV").unwrap_or_else(|_| "development".into());
        let config = Self::builder()?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(
                Environment::default()
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("menu.categories")
                    .try_parsing(true),
            )
            .build()?;
        let config: AppConfig = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Defaults only, no file or environment sources.
    pub fn defaults() -> Result<Self, AppError> {
        let config: AppConfig = Self::builder()?.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        Config::builder()
            .set_default("app.env", "development")?
            .set_default("app.host", "127.0.0.1")?
            .set_default("app.port", 8080)?
            .set_default("app.name", "menu-server")?
            .set_default("app.cors_origin", "http://localhost:5173")?
            .set_default("menu.collection", MENU_ITEMS_COLLECTION)?
            .set_default("menu.categories", DEFAULT_CATEGORIES.to_vec())?
            .set_default("menu.event_bus_capacity", DEFAULT_EVENT_BUS_CAPACITY as u64)?
            .set_default("storage.upload_chunk_bytes", DEFAULT_UPLOAD_CHUNK_BYTES as u64)?
            .set_default("storage.max_image_bytes", DEFAULT_MAX_IMAGE_BYTES as u64)?
            .set_default("storage.public_base_url", "http://127.0.0.1:8080/media")?
            .set_default("auth.admin_email", "admin@menu.local")?
            .set_default("auth.admin_password", "")?
            .set_default("auth.token_secret", "")?
            .set_default("auth.session_ttl_seconds", DEFAULT_SESSION_TTL_SECONDS)?
            .set_default(
                "reconciliation.queue_capacity",
                DEFAULT_RECONCILIATION_QUEUE_CAPACITY as u64,
            )?
            .set_default(
                "reconciliation.journal_capacity",
                DEFAULT_RECONCILIATION_JOURNAL_CAPACITY as u64,
            )
    }

    fn validate(&self) -> Result<(), AppError> {
        if self.menu.categories.iter().all(|c| c.trim().is_empty()) {
            return Err(AppError::InvalidConfig("menu.categories must not be empty".into()));
        }
        if self.storage.upload_chunk_bytes == 0 {
            return Err(AppError::InvalidConfig("storage.upload_chunk_bytes must be positive".into()));
        }
        if self.auth.session_ttl_seconds <= 0 {
            return Err(AppError::InvalidConfig("auth.session_ttl_seconds must be positive".into()));
        }
        if self.reconciliation.journal_capacity == 0 {
            return Err(AppError::InvalidConfig(
                "reconciliation.journal_capacity must be positive".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_carry_category_catalog() {
        let config = AppConfig::defaults().unwrap();
        assert_eq!(config.menu.collection, "menuItems");
        assert_eq!(config.menu.categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(config.menu.categories[1], "Burgers");
        assert_eq!(config.storage.upload_chunk_bytes, DEFAULT_UPLOAD_CHUNK_BYTES);
        assert_eq!(
            config.reconciliation.journal_capacity,
            DEFAULT_RECONCILIATION_JOURNAL_CAPACITY
        );
    }
}
