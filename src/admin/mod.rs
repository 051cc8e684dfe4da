pub mod cars;
pub mod dashboard;
pub mod users;

use axum::{
    middleware::from_fn_with_state,
    routing::{delete, get},
    Router,
};

use crate::users::require_auth;
use crate::AppState;

/// Route ids that do not parse are treated like ids with no row.
pub(crate) fn parse_id(raw: &str) -> Option<i64> {
    raw.parse().ok()
}

/// Routes mounted under `/admin`, all behind the session gate.
pub fn router(state: AppState) -> Router<AppState> {
    Router::new()
        .route("/home", get(dashboard::dashboard_handler))
        .route("/usermanagement", get(users::admin_users_list_handler))
        .route(
            "/user/createuser",
            get(users::admin_user_create_handler).post(users::store_user),
        )
        .route(
            "/user/edituser/:id",
            get(users::admin_user_edit_handler).put(users::update_user),
        )
        .route("/user/deleteuser/:id", delete(users::delete_user))
        .route("/car/management", get(cars::car_list_handler))
        .route(
            "/car/createcar",
            get(cars::car_create_handler).post(cars::store_car),
        )
        .route(
            "/car/editcar/:id",
            get(cars::car_edit_handler).put(cars::update_car),
        )
        .route("/car/deletecar/:id", delete(cars::delete_car))
        .route_layer(from_fn_with_state(state, require_auth))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        assert_eq!(parse_id("42"), Some(42));
        assert_eq!(parse_id("abc"), None);
        assert_eq!(parse_id("4.2"), None);
        assert_eq!(parse_id(""), None);
    }
}
