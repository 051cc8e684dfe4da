pub mod handlers;
pub mod models;
pub mod templates;

// Re-export commonly used items
pub use handlers::{delete_user, store_user, update_user, USER_INDEX};
pub use models::AdminUserResponse;
pub use templates::{admin_user_create_handler, admin_user_edit_handler, admin_users_list_handler};
