use askama::Template;
use axum::{
    extract::{Path, Query, State},
    response::Html,
    Extension,
};
use tower_sessions::Session;

use crate::admin::parse_id;
use crate::admin::users::models::AdminUserResponse;
use crate::error::AppError;
use crate::flash::{take_flash, Flash};
use crate::pagination::{Page, PageQuery};
use crate::templates::render;
use crate::users::{UserRepository, UserSession};
use crate::AppState;

#[derive(Template)]
#[template(path = "admin/users/list.html")]
pub struct AdminUsersListTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub users: Page<AdminUserResponse>,
}

/// Ten users per page, newest first.
pub async fn admin_users_list_handler(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>, AppError> {
    let repo = UserRepository::new(state.db.clone());
    let users = repo
        .paginate(query.page())
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to list users: {}", e)))?
        .map(AdminUserResponse::from);

    let template = AdminUsersListTemplate {
        title: "User Management - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
        users,
    };

    Ok(render(&template))
}

#[derive(Template)]
#[template(path = "admin/users/create.html")]
pub struct AdminUserCreateTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
}

pub async fn admin_user_create_handler(
    session: Session,
    Extension(actor): Extension<UserSession>,
) -> Result<Html<String>, AppError> {
    let template = AdminUserCreateTemplate {
        title: "Create User - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
    };

    Ok(render(&template))
}

#[derive(Template)]
#[template(path = "admin/users/edit.html")]
pub struct AdminUserEditTemplate {
    pub title: String,
    pub actor: UserSession,
    pub flash: Option<Flash>,
    pub user_id: String,
    /// `None` when no user has `user_id`; the form still renders.
    pub user: Option<AdminUserResponse>,
}

pub async fn admin_user_edit_handler(
    session: Session,
    State(state): State<AppState>,
    Extension(actor): Extension<UserSession>,
    Path(user_id): Path<String>,
) -> Result<Html<String>, AppError> {
    let user = match parse_id(&user_id) {
        Some(id) => UserRepository::new(state.db.clone())
            .find_by_id(id)
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to find user: {}", e)))?
            .map(AdminUserResponse::from),
        None => None,
    };

    let template = AdminUserEditTemplate {
        title: "Edit User - Garage Admin".to_string(),
        actor,
        flash: take_flash(&session).await?,
        user_id,
        user,
    };

    Ok(render(&template))
}
