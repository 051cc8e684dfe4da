pub mod auth;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod templates;

/// Session key holding the signed-in [`UserSession`].
pub const SESSION_USER_KEY: &str = "user";

// Re-export commonly used items for convenience
pub use guard::require_auth;
pub use handlers::{login_user, logout_user, register_user};
pub use models::{LoginForm, NewUser, UpdateUserForm, User, UserForm, UserPatch, UserSession};
pub use repository::UserRepository;
pub use templates::{login_handler, register_handler};
