use std::sync::Arc;

use menu_core::repositories::ObjectStore;
use menu_core::services::{AuthService, MenuItemLifecycle};
use menu_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub lifecycle: Arc<MenuItemLifecycle>,
    pub auth: Arc<AuthService>,
    /// Read side of the object store, for serving image bytes
    pub objects: Arc<dyn ObjectStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(
        lifecycle: Arc<MenuItemLifecycle>,
        auth: Arc<AuthService>,
        objects: Arc<dyn ObjectStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            lifecycle,
            auth,
            objects,
            config: Arc::new(config),
        }
    }
}
