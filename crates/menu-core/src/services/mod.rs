//! Domain services (business logic)

pub mod auth_service;
pub mod event_bus;
pub mod lifecycle_service;
pub mod menu_browser;
pub mod mutation_guard;
pub mod session_guard;

pub use auth_service::AuthService;
pub use event_bus::{EventBus, MenuEvent};
pub use lifecycle_service::{LifecycleSettings, MenuItemLifecycle};
pub use menu_browser::{CategoryGroup, MenuBrowser};
pub use mutation_guard::{MutationGuard, MutationPermit};
pub use session_guard::{GuardDecision, SessionGuard};
