//! Application-wide constants

/// Document collection holding menu item records.
pub const MENU_ITEMS_COLLECTION: &str = "menuItems";

/// Root of the storage subtree owned by menu items (`menuItems/{id}/{filename}`).
pub const MENU_ITEMS_STORAGE_ROOT: &str = "menuItems";

/// Filter label that selects every category.
pub const ALL_ITEMS_LABEL: &str = "All Items";

pub const DEFAULT_CATEGORIES: [&str; 8] = [
    "Breakfast",
    "Burgers",
    "Pizza",
    "Ethiopian Dishes",
    "Arabian Specials",
    "Salads",
    "Desserts",
    "Beverages",
];

pub const DEFAULT_UPLOAD_CHUNK_BYTES: usize = 256 * 1024;
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;
pub const DEFAULT_SESSION_TTL_SECONDS: i64 = 8 * 3600;
pub const DEFAULT_EVENT_BUS_CAPACITY: usize = 256;
pub const DEFAULT_RECONCILIATION_QUEUE_CAPACITY: usize = 1_000;
pub const DEFAULT_RECONCILIATION_JOURNAL_CAPACITY: usize = 10_000;
