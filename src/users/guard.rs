use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_sessions::Session;
use tracing::warn;

use crate::error::AppError;
use crate::flash::found;
use crate::users::models::UserSession;
use crate::users::repository::UserRepository;
use crate::users::SESSION_USER_KEY;
use crate::AppState;

/// Gate for `/admin`. Sends guests to `/login`; otherwise puts a
/// [`UserSession`] freshly loaded from the database into request extensions.
pub async fn require_auth(
    State(state): State<AppState>,
    session: Session,
    mut request: Request,
    next: Next,
) -> Response {
    let user_session = match session.get::<UserSession>(SESSION_USER_KEY).await {
        Ok(Some(user_session)) => user_session,
        Ok(None) => return found("/login"),
        Err(e) => return AppError::from(e).into_response(),
    };

    // The account may have been deleted since login.
    let repo = UserRepository::new(state.db.clone());
    let actor = match repo.find_by_id(user_session.user_id).await {
        Ok(Some(user)) => UserSession::from(&user),
        Ok(None) => {
            warn!(user_id = user_session.user_id, "Session refers to a deleted user");
            if let Err(e) = session.flush().await {
                return AppError::from(e).into_response();
            }
            return found("/login");
        }
        Err(e) => {
            return AppError::DatabaseError(format!("Failed to load session user: {}", e))
                .into_response()
        }
    };

    request.extensions_mut().insert(actor);
    next.run(request).await
}
